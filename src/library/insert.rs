//! Insert-template workflow
//!
//! Decides whether page settings come along, then fetches the template
//! content and hands it to the document importer. The decision order is:
//!
//! 1. The document's auto-import flag forces `with_page_settings = true`.
//! 2. A caller who made no choice (`None`) on a template that has page
//!    settings is asked via the confirmation dialog; the dialog re-dispatches
//!    the insert with an explicit decision and this invocation ends here.
//! 3. Anything else fetches directly; an explicit caller choice is never
//!    second-guessed, and `None` on a template without page settings means
//!    the concept does not apply.
//!
//! Fetches resolve through `poll_fetches` on the main loop. Each invocation
//! closes over its own model and decision, so overlapping inserts are
//! independent; only the session config and the dialog widget are shared.

use crate::bus::CommandArgs;
use crate::library::TemplateLibrary;
use crate::model::document::commands as document_commands;
use crate::model::modal::{ImportArgs, InsertArgs};
use crate::model::template::{TemplateData, TemplateModel};
use crate::services::source::{FetchError, FetchPoll, FetchRequest, TemplateFetch};
use tracing::{info, warn};

/// An outstanding content fetch together with the insert it belongs to.
pub struct PendingFetch {
    model: TemplateModel,
    with_page_settings: Option<bool>,
    fetch: TemplateFetch,
}

impl TemplateLibrary {
    /// Entry point of the `library/insert-template` command. Returns
    /// immediately; the fetch (if any) resolves via `poll_fetches`.
    pub fn insert_template(&mut self, args: InsertArgs) {
        let InsertArgs {
            model,
            mut with_page_settings,
        } = args;

        if self.document.remote_library.auto_import_settings {
            with_page_settings = Some(true);
        }

        if with_page_settings.is_none() && model.has_page_settings {
            info!(
                event = "library.insert_awaiting_confirmation",
                template_id = model.template_id
            );
            self.import_dialog.show_import_dialog(&model, &self.bus);
            return;
        }

        info!(
            event = "library.insert_fetch_started",
            template_id = model.template_id,
            source = model.origin.as_str(),
            with_page_settings = ?with_page_settings
        );

        self.layout.show_loading_view();
        let fetch = self.source.request_template_content(
            model.origin,
            model.template_id,
            FetchRequest { with_page_settings },
        );
        self.pending.push(PendingFetch {
            model,
            with_page_settings,
            fetch,
        });
    }

    /// Drive outstanding fetches to completion. Returns whether any fetch
    /// finished, so the caller knows a redraw is due.
    pub fn poll_fetches(&mut self) -> bool {
        let mut finished = Vec::new();

        let mut index = 0;
        while index < self.pending.len() {
            match self.pending[index].fetch.poll() {
                FetchPoll::Pending => index += 1,
                FetchPoll::Done(message) => {
                    let request = self.pending.swap_remove(index);
                    finished.push((request, message));
                }
            }
        }

        let any_finished = !finished.is_empty();
        for (request, message) in finished {
            self.finish_fetch(request, message);
        }
        any_finished
    }

    fn finish_fetch(&mut self, request: PendingFetch, message: Result<TemplateData, FetchError>) {
        match message {
            Ok(data) => self.on_fetch_success(request, data),
            Err(error) => self.on_fetch_error(&request, &error),
        }
        // Completion step; runs exactly once per request whatever the outcome.
        self.layout.hide_loading_view();
    }

    fn on_fetch_success(&mut self, request: PendingFetch, data: TemplateData) {
        // Snapshot the session's import options: closing the modal clears the
        // live config, and the importer runs after the modal is hidden.
        let mut options = self.modal_config.import_options.clone();
        options.with_page_settings = request.with_page_settings;

        info!(
            event = "library.insert_fetch_succeeded",
            template_id = request.model.template_id
        );

        self.layout.hide_loading_view();
        self.layout.hide_modal();

        self.bus.run(
            document_commands::IMPORT_ELEMENTS,
            CommandArgs::Import(ImportArgs {
                model: request.model,
                data,
                options,
            }),
        );
    }

    fn on_fetch_error(&mut self, request: &PendingFetch, error: &FetchError) {
        warn!(
            event = "library.insert_fetch_failed",
            template_id = request.model.template_id,
            error = %error
        );
        // The modal stays open so the user can retry.
        self.layout.show_error_dialog(&error.to_string());
    }
}
