//! UI Components
//!
//! Concrete terminal implementations of the library's capability contracts:
//! the modal layout view and the confirm dialog provider, plus shared layout
//! helpers. Views write shared state; the application draws it.

pub mod confirm_dialog;
pub mod layout;
pub mod library_view;

pub use confirm_dialog::{
    draw_confirm_dialog, fire_cancel, fire_confirm, ConfirmDialogState, TerminalDialogProvider,
};
pub use layout::{calculate_modal_layout, centered_popup, truncate_to_width};
pub use library_view::{draw_library, LibraryScreen, LibraryView, LibraryViewState};
