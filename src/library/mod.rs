//! Template library component
//!
//! The modal library panel of the editor: three catalog tabs, a set of named
//! commands and routes, and the asynchronous insert-template workflow. The
//! component composes external capability providers (bus, layout, template
//! source, dialog provider) and holds the orchestration logic only; rendering,
//! network transport, and document mutation live elsewhere.

pub mod dialog;
pub mod insert;
pub mod layout;
pub mod registry;
pub mod tabs;

use crate::bus::{CommandArgs, Dispatcher};
use crate::library::dialog::{DialogProvider, ImportSettingsDialog};
use crate::library::insert::PendingFetch;
use crate::library::layout::LibraryLayout;
use crate::library::registry::{CommandRegistry, LibraryCommand, RouteRegistry, RouteTarget};
use crate::library::tabs::{default_tabs, TabDefinition};
use crate::model::document::DocumentConfig;
use crate::model::modal::{ConnectArgs, ConnectTexts, ModalConfig, ModalLifecycle};
use crate::services::source::TemplateSource;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::rc::Rc;
use tracing::{info, warn};

/// Route-state persistence namespace of the library.
pub const NAMESPACE: &str = "library";

/// Navigation-fragment marker that auto-opens the library.
pub const FRAGMENT_MARKER: &str = "library";

pub mod commands {
    pub const OPEN: &str = "library/open";
    pub const CLOSE: &str = "library/close";
    pub const TOGGLE: &str = "library/toggle";
    pub const INSERT_TEMPLATE: &str = "library/insert-template";
    pub const IMPORT: &str = "library/import";
    pub const SAVE_TEMPLATE: &str = "library/save-template";
    pub const PREVIEW: &str = "library/preview";
    pub const CONNECT: &str = "library/connect";
}

pub mod routes {
    pub const BLOCKS: &str = "library/templates/blocks";
    pub const PAGES: &str = "library/templates/pages";
    pub const MY_TEMPLATES: &str = "library/templates/my-templates";
    pub const IMPORT: &str = "library/import";
    pub const SAVE_TEMPLATE: &str = "library/save-template";
    pub const PREVIEW: &str = "library/preview";
    pub const CONNECT: &str = "library/connect";
}

/// Page location, of which only the fragment matters here.
#[derive(Debug, Clone, Default)]
pub struct Location {
    pub fragment: Option<String>,
}

/// A key chord bound to a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortcut {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl Shortcut {
    /// Exact chord match: the modifier set must be equal, not a superset.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        let same_code = match (self.code, key.code) {
            (KeyCode::Char(a), KeyCode::Char(b)) => a.eq_ignore_ascii_case(&b),
            (a, b) => a == b,
        };
        same_code && key.modifiers == self.modifiers
    }
}

pub struct TemplateLibrary {
    bus: Rc<dyn Dispatcher>,
    source: Rc<dyn TemplateSource>,
    layout: Box<dyn LibraryLayout>,
    /// First-open lazy wiring: the layout is initialized once and reused.
    layout_bound: bool,
    lifecycle: ModalLifecycle,
    /// Optional veto hook consulted by the base close (unsaved-changes guard).
    close_guard: Option<Box<dyn Fn() -> bool>>,
    /// Config of the currently active document; replaced on document switch.
    document: DocumentConfig,
    default_route: String,
    modal_config: ModalConfig,
    import_dialog: ImportSettingsDialog,
    pending: Vec<PendingFetch>,
    commands: CommandRegistry,
    routes: RouteRegistry,
    tabs: Vec<TabDefinition>,
}

impl TemplateLibrary {
    pub fn new(
        bus: Rc<dyn Dispatcher>,
        source: Rc<dyn TemplateSource>,
        dialogs: Rc<dyn DialogProvider>,
        layout: Box<dyn LibraryLayout>,
        document: DocumentConfig,
    ) -> Self {
        let default_route = namespaced(&document.remote_library.default_route);
        Self {
            bus,
            source,
            layout,
            layout_bound: false,
            lifecycle: ModalLifecycle::Closed,
            close_guard: None,
            document,
            default_route,
            modal_config: ModalConfig::default(),
            import_dialog: ImportSettingsDialog::new(dialogs),
            pending: Vec::new(),
            commands: default_commands(),
            routes: default_routes(),
            tabs: default_tabs(),
        }
    }

    pub fn namespace(&self) -> &'static str {
        NAMESPACE
    }

    pub fn tabs(&self) -> &[TabDefinition] {
        &self.tabs
    }

    pub fn is_open(&self) -> bool {
        self.lifecycle.is_open()
    }

    pub fn default_route(&self) -> &str {
        &self.default_route
    }

    /// Default key bindings, command name to chord.
    pub fn default_shortcuts() -> Vec<(&'static str, Shortcut)> {
        vec![(
            commands::OPEN,
            Shortcut {
                code: KeyCode::Char('l'),
                modifiers: KeyModifiers::CONTROL | KeyModifiers::SHIFT,
            },
        )]
    }

    pub fn set_close_guard(&mut self, guard: Box<dyn Fn() -> bool>) {
        self.close_guard = Some(guard);
    }

    /// Dispatch a named command addressed to this component.
    pub fn handle_command(&mut self, name: &str, args: CommandArgs) {
        let Some(command) = self.commands.resolve(name) else {
            warn!(event = "library.unknown_command", command = name);
            return;
        };

        match command {
            LibraryCommand::Open => {
                let config = match args {
                    CommandArgs::Show(config) => config,
                    _ => ModalConfig::default(),
                };
                if self.open() {
                    self.show(config);
                }
            }
            LibraryCommand::Close => {
                self.close();
            }
            LibraryCommand::Toggle => {
                if self.is_open() {
                    self.close();
                } else if self.open() {
                    self.show(ModalConfig::default());
                }
            }
            LibraryCommand::InsertTemplate => match args {
                CommandArgs::Insert(insert) => self.insert_template(insert),
                other => warn!(event = "library.bad_insert_args", args = ?other),
            },
            LibraryCommand::ShowImport => self.bus.route(routes::IMPORT, args),
            LibraryCommand::ShowSaveTemplate => self.bus.route(routes::SAVE_TEMPLATE, args),
            LibraryCommand::ShowPreview => self.bus.route(routes::PREVIEW, args),
            LibraryCommand::ShowConnect => self.bus.route(routes::CONNECT, args),
        }
    }

    /// Dispatch a named route addressed to this component. Route handlers are
    /// pure delegation to the layout.
    pub fn handle_route(&mut self, name: &str, args: CommandArgs) {
        let Some(target) = self.routes.resolve(name) else {
            warn!(event = "library.unknown_route", route = name);
            return;
        };

        match target {
            RouteTarget::Tab => self.render_tab(name),
            RouteTarget::Import => self.layout.show_import_view(),
            RouteTarget::SaveTemplate => match args {
                CommandArgs::Model(model) => self.layout.show_save_template_view(model),
                other => warn!(event = "library.bad_route_args", route = name, args = ?other),
            },
            RouteTarget::Preview => match args {
                CommandArgs::Model(model) => self.layout.show_preview_view(model),
                other => warn!(event = "library.bad_route_args", route = name, args = ?other),
            },
            RouteTarget::Connect => {
                let mut connect = match args {
                    CommandArgs::Connect(connect) => connect,
                    _ => ConnectArgs::default(),
                };
                connect.texts = Some(ConnectTexts {
                    title: "Connect to the template catalog".to_string(),
                    message: "Access the full catalog of blocks and pages by \
                              connecting your account."
                        .to_string(),
                    button: "Connect".to_string(),
                });
                self.layout.show_connect_view(connect);
            }
        }
    }

    /// Resolve the tab's filter against the active document and hand it to the
    /// layout's screen.
    fn render_tab(&mut self, key: &str) {
        let Some(tab) = self.tabs.iter().find(|tab| tab.key == key) else {
            warn!(event = "library.unknown_tab", tab = key);
            return;
        };
        let filter = tab.resolve_filter(&self.document);
        self.layout.set_screen(filter);
    }

    /// Switch to a tab, persisting the route active before the switch.
    pub fn activate_tab(&mut self, tab: &str) {
        self.bus.save_route_state(NAMESPACE);
        self.bus.route(tab, CommandArgs::None);
    }

    fn base_open(&mut self) -> bool {
        match self.lifecycle {
            ModalLifecycle::Closing => false,
            ModalLifecycle::Opening | ModalLifecycle::Open => true,
            ModalLifecycle::Closed => {
                self.lifecycle = ModalLifecycle::Opening;
                self.layout.show_modal();
                self.lifecycle = ModalLifecycle::Open;
                true
            }
        }
    }

    fn base_close(&mut self) -> bool {
        if !self.lifecycle.is_open() {
            return false;
        }
        self.lifecycle = ModalLifecycle::Closing;
        if let Some(guard) = &self.close_guard {
            if !guard() {
                // Close vetoed; the modal stays up untouched.
                self.lifecycle = ModalLifecycle::Open;
                return false;
            }
        }
        self.layout.hide_modal();
        self.lifecycle = ModalLifecycle::Closed;
        true
    }

    /// Open the modal. Returns `false` when the base open aborts, in which
    /// case nothing else happens.
    pub fn open(&mut self) -> bool {
        if !self.base_open() {
            return false;
        }

        if !self.layout_bound {
            self.layout.init_modal();
            self.layout_bound = true;
        }
        self.layout.set_header_default_parts();

        info!(event = "library.opened");
        true
    }

    /// Close the modal. A vetoed base close propagates as `false` and leaves
    /// the session config untouched; the config is cleared only after the
    /// closure is confirmed.
    pub fn close(&mut self) -> bool {
        if !self.base_close() {
            return false;
        }

        self.modal_config = ModalConfig::default();

        info!(event = "library.closed");
        true
    }

    /// Start a modal session: replace the session config and navigate, either
    /// to the default route (explicit override or nothing to restore) or back
    /// to where the user left off.
    pub fn show(&mut self, config: ModalConfig) {
        let to_default = config.to_default;
        self.modal_config = config;

        if to_default || !self.bus.restore_route_state(NAMESPACE) {
            self.bus.route(&self.default_route, CommandArgs::None);
        }
    }

    /// React to a document switch: tab filters and the default route follow
    /// the new document's configuration.
    pub fn on_document_loaded(&mut self, document: &DocumentConfig, location: &mut Location) {
        self.document = document.clone();
        self.default_route = namespaced(&document.remote_library.default_route);

        info!(
            event = "library.document_loaded",
            default_route = self.default_route,
            category = self.document.remote_library.category
        );

        self.maybe_open_library(location);
    }

    /// Auto-open when the location fragment carries the library marker; the
    /// marker is consumed so it cannot re-trigger.
    pub fn maybe_open_library(&mut self, location: &mut Location) {
        if location.fragment.as_deref() == Some(FRAGMENT_MARKER) {
            self.bus.run(commands::OPEN, CommandArgs::None);
            location.fragment = None;
        }
    }
}

fn namespaced(route: &str) -> String {
    format!("{NAMESPACE}/{route}")
}

/// Base modal command set first, then the library set; a library entry with a
/// name already present overrides the base one.
fn default_commands() -> CommandRegistry {
    let mut registry = CommandRegistry::new();

    registry.register(commands::OPEN, LibraryCommand::Open);
    registry.register(commands::CLOSE, LibraryCommand::Close);
    registry.register(commands::TOGGLE, LibraryCommand::Toggle);

    registry.register(commands::INSERT_TEMPLATE, LibraryCommand::InsertTemplate);
    registry.register(commands::IMPORT, LibraryCommand::ShowImport);
    registry.register(commands::SAVE_TEMPLATE, LibraryCommand::ShowSaveTemplate);
    registry.register(commands::PREVIEW, LibraryCommand::ShowPreview);
    registry.register(commands::CONNECT, LibraryCommand::ShowConnect);

    registry
}

fn default_routes() -> RouteRegistry {
    let mut registry = RouteRegistry::new();

    registry.register(routes::BLOCKS, RouteTarget::Tab);
    registry.register(routes::PAGES, RouteTarget::Tab);
    registry.register(routes::MY_TEMPLATES, RouteTarget::Tab);

    registry.register(routes::IMPORT, RouteTarget::Import);
    registry.register(routes::SAVE_TEMPLATE, RouteTarget::SaveTemplate);
    registry.register(routes::PREVIEW, RouteTarget::Preview);
    registry.register(routes::CONNECT, RouteTarget::Connect);

    registry
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::model::template::TemplateOrigin;

    #[test]
    fn show_to_default_overrides_a_saved_route() {
        let mut h = harness_with_bus(
            StubBus::with_saved_route(routes::PAGES),
            document_config("landing-page", false),
        );

        h.library.show(ModalConfig {
            to_default: true,
            ..ModalConfig::default()
        });

        assert_eq!(h.bus.routed(), vec![routes::BLOCKS.to_string()]);
    }

    #[test]
    fn show_restores_the_saved_route() {
        let mut h = harness_with_bus(
            StubBus::with_saved_route(routes::PAGES),
            document_config("landing-page", false),
        );

        h.library.show(ModalConfig::default());

        assert_eq!(h.bus.routed(), vec![routes::PAGES.to_string()]);
    }

    #[test]
    fn show_falls_back_to_default_without_a_saved_route() {
        let mut h = harness(document_config("landing-page", false));

        h.library.show(ModalConfig::default());

        let calls = h.bus.calls.borrow().clone();
        assert_eq!(
            calls,
            vec![
                BusCall::RestoreRouteState(NAMESPACE.to_string()),
                BusCall::Route(routes::BLOCKS.to_string(), CommandArgs::None),
            ]
        );
    }

    #[test]
    fn activate_tab_saves_state_before_routing() {
        let mut h = harness(document_config("landing-page", false));

        h.library.activate_tab(routes::PAGES);

        let calls = h.bus.calls.borrow().clone();
        assert_eq!(
            calls,
            vec![
                BusCall::SaveRouteState(NAMESPACE.to_string()),
                BusCall::Route(routes::PAGES.to_string(), CommandArgs::None),
            ]
        );
    }

    #[test]
    fn open_initializes_the_layout_once_but_resets_header_every_time() {
        let mut h = harness(document_config("landing-page", false));

        assert!(h.library.open());
        assert!(h.library.close());
        assert!(h.library.open());

        let calls = h.layout_calls();
        let inits = calls
            .iter()
            .filter(|call| **call == LayoutCall::InitModal)
            .count();
        let headers = calls
            .iter()
            .filter(|call| **call == LayoutCall::SetHeaderDefaultParts)
            .count();
        assert_eq!(inits, 1);
        assert_eq!(headers, 2);
    }

    #[test]
    fn vetoed_close_returns_false_and_keeps_modal_config() {
        let mut h = harness(document_config("landing-page", false));
        h.library.set_close_guard(Box::new(|| false));

        h.library.open();
        let config = ModalConfig {
            to_default: true,
            import_options: crate::model::modal::ImportOptions {
                at_index: Some(1),
                with_page_settings: None,
            },
        };
        h.library.show(config.clone());

        assert!(!h.library.close());
        assert!(h.library.is_open());
        assert_eq!(h.library.modal_config, config);
    }

    #[test]
    fn confirmed_close_resets_modal_config() {
        let mut h = harness(document_config("landing-page", false));

        h.library.open();
        h.library.show(ModalConfig {
            to_default: true,
            import_options: crate::model::modal::ImportOptions {
                at_index: Some(1),
                with_page_settings: None,
            },
        });

        assert!(h.library.close());
        assert!(!h.library.is_open());
        assert_eq!(h.library.modal_config, ModalConfig::default());
        assert!(h.layout_calls().contains(&LayoutCall::HideModal));
    }

    #[test]
    fn close_when_already_closed_reports_false() {
        let mut h = harness(document_config("landing-page", false));
        assert!(!h.library.close());
    }

    #[test]
    fn blocks_tab_reflects_a_document_switch_without_re_registration() {
        let mut h = harness(document_config("landing-page", false));

        h.library.handle_route(routes::BLOCKS, CommandArgs::None);
        h.library
            .on_document_loaded(&document_config("shop", false), &mut Location::default());
        h.library.handle_route(routes::BLOCKS, CommandArgs::None);

        let subtypes: Vec<Option<String>> = h
            .layout_calls()
            .iter()
            .filter_map(|call| match call {
                LayoutCall::SetScreen(filter) => Some(filter.subtype.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(
            subtypes,
            vec![Some("landing-page".to_string()), Some("shop".to_string())]
        );
    }

    #[test]
    fn document_loaded_recomputes_the_default_route() {
        let mut h = harness(document_config("landing-page", false));

        let mut document = document_config("shop", false);
        document.remote_library.default_route = "templates/pages".to_string();
        h.library
            .on_document_loaded(&document, &mut Location::default());

        assert_eq!(h.library.default_route(), routes::PAGES);
        h.library.show(ModalConfig {
            to_default: true,
            ..ModalConfig::default()
        });
        assert_eq!(h.bus.routed(), vec![routes::PAGES.to_string()]);
    }

    #[test]
    fn library_fragment_auto_opens_once() {
        let mut h = harness(document_config("landing-page", false));
        let mut location = Location {
            fragment: Some(FRAGMENT_MARKER.to_string()),
        };

        h.library.maybe_open_library(&mut location);
        assert_eq!(location.fragment, None);
        assert_eq!(
            h.bus.runs(),
            vec![(commands::OPEN.to_string(), CommandArgs::None)]
        );

        // Consumed marker does not re-trigger.
        h.library.maybe_open_library(&mut location);
        assert_eq!(h.bus.runs().len(), 1);
    }

    #[test]
    fn connect_route_attaches_the_text_bundle() {
        let mut h = harness(document_config("landing-page", false));

        h.library
            .handle_route(routes::CONNECT, CommandArgs::Connect(ConnectArgs::default()));

        let calls = h.layout_calls();
        match &calls[0] {
            LayoutCall::ShowConnectView(args) => {
                let texts = args.texts.as_ref().expect("texts must be attached");
                assert_eq!(texts.button, "Connect");
            }
            other => panic!("expected connect view, got {other:?}"),
        }
    }

    #[test]
    fn preview_and_save_template_routes_delegate_the_model() {
        let mut h = harness(document_config("landing-page", false));
        let model = sample_model(5, TemplateOrigin::Local, false);

        h.library
            .handle_route(routes::PREVIEW, CommandArgs::Model(model.clone()));
        h.library
            .handle_route(routes::SAVE_TEMPLATE, CommandArgs::Model(model.clone()));

        assert_eq!(
            h.layout_calls(),
            vec![
                LayoutCall::ShowPreviewView(model.clone()),
                LayoutCall::ShowSaveTemplateView(model),
            ]
        );
    }

    #[test]
    fn unknown_commands_and_routes_are_ignored() {
        let mut h = harness(document_config("landing-page", false));
        h.library.handle_command("library/frobnicate", CommandArgs::None);
        h.library.handle_route("library/frobnicate", CommandArgs::None);
        assert!(h.layout_calls().is_empty());
    }

    #[test]
    fn toggle_opens_then_closes() {
        let mut h = harness(document_config("landing-page", false));

        h.library.handle_command(commands::TOGGLE, CommandArgs::None);
        assert!(h.library.is_open());

        h.library.handle_command(commands::TOGGLE, CommandArgs::None);
        assert!(!h.library.is_open());
    }

    #[test]
    fn open_shortcut_matches_the_chord_case_insensitively() {
        let (_, shortcut) = TemplateLibrary::default_shortcuts()[0];

        let lower = KeyEvent::new(
            KeyCode::Char('l'),
            KeyModifiers::CONTROL | KeyModifiers::SHIFT,
        );
        let upper = KeyEvent::new(
            KeyCode::Char('L'),
            KeyModifiers::CONTROL | KeyModifiers::SHIFT,
        );
        let plain = KeyEvent::new(KeyCode::Char('l'), KeyModifiers::NONE);
        let superset = KeyEvent::new(
            KeyCode::Char('l'),
            KeyModifiers::CONTROL | KeyModifiers::SHIFT | KeyModifiers::ALT,
        );

        assert!(shortcut.matches(&lower));
        assert!(shortcut.matches(&upper));
        assert!(!shortcut.matches(&plain));
        assert!(!shortcut.matches(&superset));
    }
}
