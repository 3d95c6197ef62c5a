//! Import-settings confirmation dialog
//!
//! One confirm widget per library instance, created lazily on first use. The
//! widget is reused across inserts, so both outcome callbacks are rebound on
//! every show to close over the model of the current insert; callbacks left
//! over from an earlier, unanswered dialog are discarded by the rebind.

use crate::bus::{CommandArgs, Dispatcher};
use crate::library::commands;
use crate::model::modal::InsertArgs;
use crate::model::template::TemplateModel;
use std::rc::Rc;
use tracing::debug;

pub type OutcomeHandler = Box<dyn FnOnce()>;

/// Static configuration of a confirm widget.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmDialogConfig {
    pub id: &'static str,
    pub heading: String,
    pub message: String,
    pub confirm_label: String,
    pub cancel_label: String,
}

/// A confirm widget created by the dialog provider. Outcomes fire at most
/// once per bind; showing again requires rebinding.
pub trait ConfirmDialog {
    fn bind_outcomes(&mut self, on_confirm: OutcomeHandler, on_cancel: OutcomeHandler);
    fn show(&mut self);
}

/// Constructs confirm widgets; the generic dialog machinery is external.
pub trait DialogProvider {
    fn create_confirm(&self, config: ConfirmDialogConfig) -> Box<dyn ConfirmDialog>;
}

/// Owns the lazily created import-settings widget.
pub struct ImportSettingsDialog {
    provider: Rc<dyn DialogProvider>,
    widget: Option<Box<dyn ConfirmDialog>>,
}

impl ImportSettingsDialog {
    pub fn new(provider: Rc<dyn DialogProvider>) -> Self {
        Self {
            provider,
            widget: None,
        }
    }

    fn ensure_widget(&mut self) -> &mut dyn ConfirmDialog {
        self.widget
            .get_or_insert_with(|| {
                self.provider.create_confirm(ConfirmDialogConfig {
                    id: "pagecraft-insert-template-settings-dialog",
                    heading: "Import Document Settings".to_string(),
                    message: "This template comes with its own page settings.\n\
                              Apply them to the current page as well? Existing page \
                              settings may be overridden."
                        .to_string(),
                    confirm_label: "Yes".to_string(),
                    cancel_label: "No".to_string(),
                })
            })
            .as_mut()
    }

    /// Ask the user whether page settings should come along, then re-dispatch
    /// the insert with an explicit decision for the given model.
    pub fn show_import_dialog(&mut self, model: &TemplateModel, bus: &Rc<dyn Dispatcher>) {
        debug!(
            event = "library.import_dialog_shown",
            template_id = model.template_id
        );

        let widget = self.ensure_widget();

        let confirm_bus = Rc::clone(bus);
        let confirm_model = model.clone();
        let cancel_bus = Rc::clone(bus);
        let cancel_model = model.clone();

        widget.bind_outcomes(
            Box::new(move || {
                confirm_bus.run(
                    commands::INSERT_TEMPLATE,
                    CommandArgs::Insert(InsertArgs {
                        model: confirm_model,
                        with_page_settings: Some(true),
                    }),
                );
            }),
            Box::new(move || {
                cancel_bus.run(
                    commands::INSERT_TEMPLATE,
                    CommandArgs::Insert(InsertArgs {
                        model: cancel_model,
                        with_page_settings: Some(false),
                    }),
                );
            }),
        );
        widget.show();
    }
}
