//! Root application state
//!
//! The editor shell hosting the template library. App owns the active
//! document, the dispatch bus, and the library component; it drains the bus
//! once per frame, feeds key events to whichever surface is on top (confirm
//! dialog, library modal, editor), and applies document-level commands such
//! as the template import.

use crate::bus::{BusMessage, CommandArgs, Dispatcher, QueueBus};
use crate::components::{
    draw_confirm_dialog, draw_library, fire_cancel, fire_confirm, LibraryScreen, LibraryView,
    LibraryViewState, TerminalDialogProvider,
};
use crate::config::EditorConfig;
use crate::library::dialog::DialogProvider;
use crate::library::{commands, Location, TemplateLibrary, NAMESPACE};
use crate::model::document::commands as document_commands;
use crate::model::modal::InsertArgs;
use crate::model::template::{TemplateData, TemplateModel, TemplateOrigin};
use crate::services::{CompositeSource, LocalTemplateSource, RemoteTemplateSource, TemplateSource};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::warn;

pub struct App {
    pub should_quit: bool,
    pub document: crate::model::Document,
    location: Location,
    bus: Rc<QueueBus>,
    library: TemplateLibrary,
    library_state: Rc<RefCell<LibraryViewState>>,
    dialogs: Rc<TerminalDialogProvider>,
    local_source: Rc<LocalTemplateSource>,
    /// Built-in slice of the remote catalog; the real listing endpoint is out
    /// of scope, content fetches still go through the remote source.
    remote_catalog: Vec<TemplateModel>,
    local_templates: Vec<TemplateModel>,
    status_message: Option<String>,
}

impl App {
    pub fn new(config: EditorConfig, document: crate::model::Document, location: Location) -> Self {
        let bus = Rc::new(QueueBus::new());
        let dialogs = Rc::new(TerminalDialogProvider::new());
        let local_source = Rc::new(LocalTemplateSource::new(config.templates_dir()));
        let remote_source = Rc::new(RemoteTemplateSource::new(config.remote_catalog_url.clone()));
        let source = Rc::new(CompositeSource::new(
            remote_source,
            Rc::clone(&local_source) as Rc<dyn TemplateSource>,
        ));

        let view = LibraryView::new();
        let library_state = view.state();

        let library = TemplateLibrary::new(
            Rc::clone(&bus) as Rc<dyn Dispatcher>,
            source,
            Rc::clone(&dialogs) as Rc<dyn DialogProvider>,
            Box::new(view),
            document.config.clone(),
        );

        Self {
            should_quit: false,
            document,
            location,
            bus,
            library,
            library_state,
            dialogs,
            local_source,
            remote_catalog: demo_remote_catalog(),
            local_templates: Vec::new(),
            status_message: None,
        }
    }

    /// Announce the loaded document to the library; this also honors a
    /// `#library` location fragment by auto-opening the modal.
    pub fn init(&mut self) -> Result<()> {
        let config = self.document.config.clone();
        self.library.on_document_loaded(&config, &mut self.location);
        self.local_templates = self.local_source.list();
        self.drain_bus();
        Ok(())
    }

    /// Per-frame work: settle finished fetches, then drain queued dispatches.
    pub fn tick(&mut self) {
        self.library.poll_fetches();
        self.drain_bus();
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        // The confirm dialog is topmost and swallows its keys.
        if let Some(dialog) = self.dialogs.visible_dialog() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => fire_confirm(&dialog),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => fire_cancel(&dialog),
                _ => {}
            }
            return Ok(());
        }

        let library_visible = self.library_state.borrow().visible;
        if library_visible {
            // An error popup is dismissed by any key.
            if self.library_state.borrow().error.is_some() {
                self.library_state.borrow_mut().error = None;
                return Ok(());
            }
            self.handle_library_key(key);
            return Ok(());
        }

        for (command, shortcut) in TemplateLibrary::default_shortcuts() {
            if shortcut.matches(&key) {
                self.bus.run(command, CommandArgs::None);
                return Ok(());
            }
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
        Ok(())
    }

    fn handle_library_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.bus.run(commands::CLOSE, CommandArgs::None);
            }
            KeyCode::Tab => self.activate_next_tab(),
            KeyCode::Char(digit @ '1'..='3') => {
                let index = digit as usize - '1' as usize;
                if let Some(tab) = self.library.tabs().get(index) {
                    let key = tab.key;
                    self.library.activate_tab(key);
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let len = self.visible_entries().len();
                self.library_state.borrow_mut().select_next(len);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.library_state.borrow_mut().select_prev();
            }
            KeyCode::Enter => self.handle_library_enter(),
            KeyCode::Char('p') => {
                if let Some(model) = self.selected_entry() {
                    self.bus.run(commands::PREVIEW, CommandArgs::Model(model));
                }
            }
            KeyCode::Char('s') => {
                if let Some(model) = self.selected_entry() {
                    self.bus
                        .run(commands::SAVE_TEMPLATE, CommandArgs::Model(model));
                }
            }
            _ => {}
        }
    }

    fn handle_library_enter(&mut self) {
        let screen = self.library_state.borrow().screen.clone();
        match screen {
            Some(LibraryScreen::Browse(_)) => {
                if let Some(model) = self.selected_entry() {
                    self.bus.run(
                        commands::INSERT_TEMPLATE,
                        CommandArgs::Insert(InsertArgs {
                            model,
                            // No explicit choice; the workflow decides.
                            with_page_settings: None,
                        }),
                    );
                }
            }
            Some(LibraryScreen::SaveTemplate(_)) => self.save_current_page(),
            _ => {}
        }
    }

    fn save_current_page(&mut self) {
        let page_settings = if self.document.settings.is_empty() {
            None
        } else {
            Some(serde_json::Value::Object(self.document.settings.clone()))
        };
        let data = TemplateData {
            content: self.document.elements.clone(),
            page_settings,
        };

        match self.local_source.save(&self.document.title, data) {
            Ok(saved) => {
                self.status_message = Some(format!("Saved \"{}\" to My Templates", saved.model.title));
                self.local_templates = self.local_source.list();
                self.library.activate_tab(crate::library::routes::MY_TEMPLATES);
            }
            Err(error) => {
                self.status_message = Some(format!("Save failed: {error}"));
            }
        }
    }

    fn activate_next_tab(&mut self) {
        let tabs = self.library.tabs();
        if tabs.is_empty() {
            return;
        }
        let current = self.bus.current_route(NAMESPACE);
        let index = tabs
            .iter()
            .position(|tab| current.as_deref() == Some(tab.key))
            .map(|index| (index + 1) % tabs.len())
            .unwrap_or(0);
        let key = tabs[index].key;
        self.library.activate_tab(key);
    }

    /// Catalog entries matching the browse screen's filter.
    fn visible_entries(&self) -> Vec<TemplateModel> {
        let state = self.library_state.borrow();
        let Some(filter) = state.browse_filter() else {
            return Vec::new();
        };

        let pool = match filter.source {
            TemplateOrigin::Remote => &self.remote_catalog,
            TemplateOrigin::Local => &self.local_templates,
        };
        pool.iter()
            .filter(|model| filter.matches(model))
            .cloned()
            .collect()
    }

    fn selected_entry(&self) -> Option<TemplateModel> {
        let entries = self.visible_entries();
        let selected = self.library_state.borrow().selected;
        entries.get(selected).cloned()
    }

    /// Drain queued commands and routes, dispatching each to its owner.
    pub fn drain_bus(&mut self) {
        while let Some(message) = self.bus.take_next() {
            match message {
                BusMessage::Command { name, args } => self.dispatch_command(&name, args),
                BusMessage::Route { name, args } => {
                    if name.starts_with("library/") {
                        self.library.handle_route(&name, args);
                    } else {
                        warn!(event = "app.unroutable", route = name);
                    }
                }
            }
        }
    }

    fn dispatch_command(&mut self, name: &str, args: CommandArgs) {
        match name {
            document_commands::IMPORT_ELEMENTS => {
                if let CommandArgs::Import(import) = args {
                    self.document
                        .import_template(&import.model, import.data, &import.options);
                    self.status_message = Some(format!("Inserted \"{}\"", import.model.title));
                    // The modal is already hidden; complete the close so the
                    // session config resets for the next open.
                    self.library.close();
                } else {
                    warn!(event = "app.bad_import_args");
                }
            }
            name if name.starts_with("library/") => {
                if name == commands::OPEN {
                    self.local_templates = self.local_source.list();
                }
                self.library.handle_command(name, args);
            }
            other => warn!(event = "app.unknown_command", command = other),
        }
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        self.draw_editor(frame, area);

        if self.library_state.borrow().visible {
            let entries = self.visible_entries();
            let active = self.bus.current_route(NAMESPACE);
            let state = self.library_state.borrow();
            draw_library(
                frame,
                area,
                &state,
                self.library.tabs(),
                active.as_deref(),
                &entries,
            );
        }

        if let Some(dialog) = self.dialogs.visible_dialog() {
            draw_confirm_dialog(frame, area, &dialog.borrow());
        }
    }

    fn draw_editor(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        let title = Paragraph::new(Line::from(vec![
            Span::styled(
                " pagecraft ",
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" {}", self.document.title)),
        ]));
        frame.render_widget(title, chunks[0]);

        let elements: Vec<Line> = if self.document.elements.is_empty() {
            vec![
                Line::from(""),
                Line::from("This page is empty."),
                Line::from("Press Ctrl+Shift+L to open the template library."),
            ]
        } else {
            self.document
                .elements
                .iter()
                .enumerate()
                .map(|(index, element)| Line::from(format!("{:>3}  {element}", index + 1)))
                .collect()
        };
        let body = Paragraph::new(elements).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Page Elements "),
        );
        frame.render_widget(body, chunks[1]);

        let status = self
            .status_message
            .as_deref()
            .unwrap_or("Ctrl+Shift+L library · q quit");
        frame.render_widget(
            Paragraph::new(Span::styled(status, Style::default().fg(Color::DarkGray))),
            chunks[2],
        );
    }
}

/// Built-in remote catalog entries used until a listing endpoint exists.
fn demo_remote_catalog() -> Vec<TemplateModel> {
    let block = |template_id: u64, title: &str, subtype: &str, has_page_settings: bool| {
        TemplateModel {
            template_id,
            origin: TemplateOrigin::Remote,
            title: title.to_string(),
            kind: "block".to_string(),
            subtype: Some(subtype.to_string()),
            has_page_settings,
        }
    };
    let page = |template_id: u64, title: &str, has_page_settings: bool| TemplateModel {
        template_id,
        origin: TemplateOrigin::Remote,
        title: title.to_string(),
        kind: "page".to_string(),
        subtype: None,
        has_page_settings,
    };

    vec![
        block(101, "Hero with CTA", "landing-page", false),
        block(102, "Feature Grid", "landing-page", false),
        block(103, "Product Shelf", "shop", false),
        block(104, "Checkout Banner", "shop", false),
        page(201, "SaaS Landing", true),
        page(202, "Portfolio", true),
        page(203, "Coming Soon", false),
    ]
}
