//! Confirm dialog widget
//!
//! Terminal implementation of the generic confirm dialog contract. The
//! provider keeps a handle to every widget it creates so the application can
//! draw whichever one is visible and feed it key outcomes; the widgets handed
//! to components share that state.

use crate::components::centered_popup;
use crate::library::dialog::{ConfirmDialog, ConfirmDialogConfig, DialogProvider, OutcomeHandler};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::cell::RefCell;
use std::rc::Rc;

pub struct ConfirmDialogState {
    pub config: ConfirmDialogConfig,
    pub visible: bool,
    on_confirm: Option<OutcomeHandler>,
    on_cancel: Option<OutcomeHandler>,
}

impl ConfirmDialogState {
    fn new(config: ConfirmDialogConfig) -> Self {
        Self {
            config,
            visible: false,
            on_confirm: None,
            on_cancel: None,
        }
    }
}

/// Resolve the dialog positively. The handler is invoked outside the borrow
/// because it may re-enter the bus.
pub fn fire_confirm(state: &Rc<RefCell<ConfirmDialogState>>) {
    let handler = {
        let mut state = state.borrow_mut();
        state.visible = false;
        state.on_cancel = None;
        state.on_confirm.take()
    };
    if let Some(handler) = handler {
        handler();
    }
}

/// Resolve the dialog negatively.
pub fn fire_cancel(state: &Rc<RefCell<ConfirmDialogState>>) {
    let handler = {
        let mut state = state.borrow_mut();
        state.visible = false;
        state.on_confirm = None;
        state.on_cancel.take()
    };
    if let Some(handler) = handler {
        handler();
    }
}

struct TerminalConfirmDialog {
    state: Rc<RefCell<ConfirmDialogState>>,
}

impl ConfirmDialog for TerminalConfirmDialog {
    fn bind_outcomes(&mut self, on_confirm: OutcomeHandler, on_cancel: OutcomeHandler) {
        let mut state = self.state.borrow_mut();
        state.on_confirm = Some(on_confirm);
        state.on_cancel = Some(on_cancel);
    }

    fn show(&mut self) {
        self.state.borrow_mut().visible = true;
    }
}

#[derive(Default)]
pub struct TerminalDialogProvider {
    created: RefCell<Vec<Rc<RefCell<ConfirmDialogState>>>>,
}

impl TerminalDialogProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently visible dialog, if any.
    pub fn visible_dialog(&self) -> Option<Rc<RefCell<ConfirmDialogState>>> {
        self.created
            .borrow()
            .iter()
            .find(|state| state.borrow().visible)
            .cloned()
    }
}

impl DialogProvider for TerminalDialogProvider {
    fn create_confirm(&self, config: ConfirmDialogConfig) -> Box<dyn ConfirmDialog> {
        let state = Rc::new(RefCell::new(ConfirmDialogState::new(config)));
        self.created.borrow_mut().push(Rc::clone(&state));
        Box::new(TerminalConfirmDialog { state })
    }
}

pub fn draw_confirm_dialog(frame: &mut Frame, area: Rect, state: &ConfirmDialogState) {
    let popup_area = centered_popup(area, 54, 9);

    frame.render_widget(Clear, popup_area);

    let mut content = vec![Line::from("")];
    for line in state.config.message.lines() {
        content.push(Line::from(Span::raw(line.trim().to_string())));
    }
    content.push(Line::from(""));
    content.push(Line::from(vec![
        Span::styled(
            " y ",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("{}  ", state.config.confirm_label)),
        Span::styled(
            " n/Esc ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::raw(state.config.cancel_label.clone()),
    ]));

    let paragraph = Paragraph::new(content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(format!(" {} ", state.config.heading))
                .title_style(
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .alignment(ratatui::layout::Alignment::Center);

    frame.render_widget(paragraph, popup_area);
}
