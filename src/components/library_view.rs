//! Library modal view
//!
//! Concrete layout provider of the template library. The component mutates a
//! shared view state through the `LibraryLayout` contract; the application
//! holds a clone of the state handle and draws it every frame.

use crate::components::layout::{calculate_modal_layout, centered_popup, truncate_to_width};
use crate::library::layout::LibraryLayout;
use crate::library::tabs::TabDefinition;
use crate::model::modal::ConnectArgs;
use crate::model::template::{Filter, TemplateModel};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};
use std::cell::RefCell;
use std::rc::Rc;

/// What the modal body currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum LibraryScreen {
    Browse(Filter),
    Import,
    SaveTemplate(TemplateModel),
    Preview(TemplateModel),
    Connect(ConnectArgs),
}

#[derive(Default)]
pub struct LibraryViewState {
    pub visible: bool,
    pub initialized: bool,
    pub header_parts: Vec<&'static str>,
    pub screen: Option<LibraryScreen>,
    pub loading: bool,
    pub error: Option<String>,
    /// Selection within the browse list.
    pub selected: usize,
}

impl LibraryViewState {
    /// The filter of the browse screen, if that is what is showing.
    pub fn browse_filter(&self) -> Option<&Filter> {
        match &self.screen {
            Some(LibraryScreen::Browse(filter)) => Some(filter),
            _ => None,
        }
    }

    pub fn select_next(&mut self, len: usize) {
        if len > 0 && self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

/// The `LibraryLayout` implementation handed to the component.
pub struct LibraryView {
    state: Rc<RefCell<LibraryViewState>>,
}

impl LibraryView {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(LibraryViewState::default())),
        }
    }

    /// Shared handle for the application's draw and key-handling paths.
    pub fn state(&self) -> Rc<RefCell<LibraryViewState>> {
        Rc::clone(&self.state)
    }
}

impl Default for LibraryView {
    fn default() -> Self {
        Self::new()
    }
}

impl LibraryLayout for LibraryView {
    fn init_modal(&mut self) {
        let mut state = self.state.borrow_mut();
        if state.initialized {
            return;
        }
        state.initialized = true;
    }

    fn show_modal(&mut self) {
        self.state.borrow_mut().visible = true;
    }

    fn hide_modal(&mut self) {
        self.state.borrow_mut().visible = false;
    }

    fn set_header_default_parts(&mut self) {
        self.state.borrow_mut().header_parts = vec!["logo", "menu", "close"];
    }

    fn set_screen(&mut self, filter: Filter) {
        let mut state = self.state.borrow_mut();
        state.screen = Some(LibraryScreen::Browse(filter));
        state.selected = 0;
        state.error = None;
    }

    fn show_import_view(&mut self) {
        self.state.borrow_mut().screen = Some(LibraryScreen::Import);
    }

    fn show_save_template_view(&mut self, model: TemplateModel) {
        self.state.borrow_mut().screen = Some(LibraryScreen::SaveTemplate(model));
    }

    fn show_preview_view(&mut self, model: TemplateModel) {
        self.state.borrow_mut().screen = Some(LibraryScreen::Preview(model));
    }

    fn show_connect_view(&mut self, args: ConnectArgs) {
        self.state.borrow_mut().screen = Some(LibraryScreen::Connect(args));
    }

    fn show_loading_view(&mut self) {
        self.state.borrow_mut().loading = true;
    }

    fn hide_loading_view(&mut self) {
        self.state.borrow_mut().loading = false;
    }

    fn show_error_dialog(&mut self, message: &str) {
        self.state.borrow_mut().error = Some(message.to_string());
    }
}

/// Draw the library modal over the editor.
pub fn draw_library(
    frame: &mut Frame,
    area: Rect,
    state: &LibraryViewState,
    tabs: &[TabDefinition],
    active_route: Option<&str>,
    entries: &[TemplateModel],
) {
    let modal_area = centered_popup(area, area.width.saturating_sub(8), area.height.saturating_sub(4));
    frame.render_widget(Clear, modal_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Template Library ")
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    let inner = block.inner(modal_area);
    frame.render_widget(block, modal_area);

    let layout = calculate_modal_layout(inner);
    draw_tabs(frame, layout.header, tabs, active_route);
    draw_body(frame, layout.body, state, entries);
    draw_footer(frame, layout.footer, state);

    if state.loading {
        draw_loading(frame, area);
    }
    if let Some(error) = &state.error {
        draw_error(frame, area, error);
    }
}

fn draw_tabs(frame: &mut Frame, area: Rect, tabs: &[TabDefinition], active_route: Option<&str>) {
    let max_title = (area.width as usize / tabs.len().max(1)).saturating_sub(4);
    let mut spans = Vec::new();

    for tab in tabs {
        let active = active_route == Some(tab.key);
        let style = if active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(
            format!(" {} ", truncate_to_width(tab.title, max_title)),
            style,
        ));
        spans.push(Span::raw(" "));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(paragraph, area);
}

fn draw_body(frame: &mut Frame, area: Rect, state: &LibraryViewState, entries: &[TemplateModel]) {
    match &state.screen {
        Some(LibraryScreen::Browse(filter)) => draw_browse(frame, area, filter, entries, state.selected),
        Some(LibraryScreen::Import) => {
            draw_message(frame, area, "Import", "Drop a template file path here to import it.")
        }
        Some(LibraryScreen::SaveTemplate(model)) => draw_message(
            frame,
            area,
            "Save Template",
            &format!("Save \"{}\" to My Templates?", model.title),
        ),
        Some(LibraryScreen::Preview(model)) => draw_message(
            frame,
            area,
            "Preview",
            &format!("{} ({})", model.title, model.kind),
        ),
        Some(LibraryScreen::Connect(args)) => {
            let texts = args.texts.as_ref();
            draw_message(
                frame,
                area,
                texts.map(|t| t.title.as_str()).unwrap_or("Connect"),
                texts.map(|t| t.message.as_str()).unwrap_or_default(),
            );
        }
        None => draw_message(frame, area, "Library", "Pick a tab to browse templates."),
    }
}

fn draw_browse(
    frame: &mut Frame,
    area: Rect,
    filter: &Filter,
    entries: &[TemplateModel],
    selected: usize,
) {
    let items: Vec<ListItem> = entries
        .iter()
        .map(|model| {
            let subtype = model
                .subtype
                .as_deref()
                .map(|s| format!(" · {s}"))
                .unwrap_or_default();
            ListItem::new(format!("{}  [{}{}]", model.title, model.kind, subtype))
        })
        .collect();

    let title = match &filter.subtype {
        Some(subtype) => format!(" {} / {} ", filter.source.as_str(), subtype),
        None => format!(" {} ", filter.source.as_str()),
    };

    let list = List::new(items)
        .block(Block::default().borders(Borders::NONE).title(title))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    let mut list_state = ListState::default();
    if !entries.is_empty() {
        list_state.select(Some(selected.min(entries.len() - 1)));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn draw_message(frame: &mut Frame, area: Rect, title: &str, message: &str) {
    let content: Vec<Line> = std::iter::once(Line::from(""))
        .chain(message.lines().map(|line| Line::from(line.to_string())))
        .collect();
    let paragraph = Paragraph::new(content)
        .block(Block::default().borders(Borders::NONE).title(format!(" {title} ")))
        .alignment(ratatui::layout::Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn draw_footer(frame: &mut Frame, area: Rect, state: &LibraryViewState) {
    let hints = match &state.screen {
        Some(LibraryScreen::Browse(_)) => {
            "↑/↓ select · Enter insert · p preview · Tab next tab · Esc close"
        }
        _ => "Esc close · Tab next tab",
    };
    let paragraph =
        Paragraph::new(Span::styled(hints, Style::default().fg(Color::DarkGray)));
    frame.render_widget(paragraph, area);
}

fn draw_loading(frame: &mut Frame, area: Rect) {
    let popup = centered_popup(area, 30, 3);
    frame.render_widget(Clear, popup);
    let paragraph = Paragraph::new("Fetching template…")
        .block(Block::default().borders(Borders::ALL))
        .alignment(ratatui::layout::Alignment::Center);
    frame.render_widget(paragraph, popup);
}

fn draw_error(frame: &mut Frame, area: Rect, error: &str) {
    let popup = centered_popup(area, 50, 7);
    frame.render_widget(Clear, popup);
    let content = vec![
        Line::from(""),
        Line::from(error.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "press any key to dismiss",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let paragraph = Paragraph::new(content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(" Error "),
        )
        .alignment(ratatui::layout::Alignment::Center);
    frame.render_widget(paragraph, popup);
}
