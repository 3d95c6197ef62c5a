//! Modal session state and the argument bags exchanged over the bus
//!
//! `ModalConfig` lives for exactly one open/close cycle of the library modal.
//! It is replaced wholesale on `show` and reset on confirmed close, so any
//! consumer that outlives the session (an in-flight fetch) must clone what it
//! needs instead of holding a reference.

use crate::model::template::{TemplateData, TemplateModel};

/// Library modal lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModalLifecycle {
    #[default]
    Closed,
    Opening,
    Open,
    Closing,
}

impl ModalLifecycle {
    pub fn is_open(self) -> bool {
        matches!(self, ModalLifecycle::Opening | ModalLifecycle::Open)
    }
}

/// Per-open-session state bag for the library modal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModalConfig {
    /// Skip route restoration and land on the default route.
    pub to_default: bool,
    /// Options forwarded to the document importer on a successful insert.
    pub import_options: ImportOptions,
}

/// Options the importer receives together with the fetched template data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportOptions {
    /// Element position to insert at; end of the document when absent.
    pub at_index: Option<usize>,
    /// Resolved page-settings decision, attached by the insert workflow.
    pub with_page_settings: Option<bool>,
}

/// Arguments of the `library/insert-template` command.
///
/// `with_page_settings` of `None` means the caller made no choice; the insert
/// workflow then decides via the document config or the confirmation dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertArgs {
    pub model: TemplateModel,
    pub with_page_settings: Option<bool>,
}

/// Arguments of the `document/elements/import` command.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportArgs {
    pub model: TemplateModel,
    pub data: TemplateData,
    pub options: ImportOptions,
}

/// Arguments of the `library/connect` route.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectArgs {
    /// Filled in by the route handler before the screen is shown.
    pub texts: Option<ConnectTexts>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConnectTexts {
    pub title: String,
    pub message: String,
    pub button: String,
}
