//! Layout contract of the library modal
//!
//! The component drives the modal through this trait and never renders
//! anything itself. All operations must be idempotent: a fetch that outlives
//! the modal may hide a loading view that is already hidden.

use crate::model::modal::ConnectArgs;
use crate::model::template::{Filter, TemplateModel};

pub trait LibraryLayout {
    /// One-time setup of the modal chrome. Called on first open only, but must
    /// tolerate repeated calls.
    fn init_modal(&mut self);

    fn show_modal(&mut self);

    fn hide_modal(&mut self);

    /// Reset the header to its default parts (logo, tab menu, close button).
    fn set_header_default_parts(&mut self);

    /// Show the browse screen for a resolved catalog filter.
    fn set_screen(&mut self, filter: Filter);

    fn show_import_view(&mut self);

    fn show_save_template_view(&mut self, model: TemplateModel);

    fn show_preview_view(&mut self, model: TemplateModel);

    fn show_connect_view(&mut self, args: ConnectArgs);

    fn show_loading_view(&mut self);

    fn hide_loading_view(&mut self);

    /// Surface a fetch failure; the modal stays open so the user can retry.
    fn show_error_dialog(&mut self, message: &str);
}
