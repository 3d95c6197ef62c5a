//! Model layer - documents, templates, and modal session state

pub mod document;
pub mod modal;
pub mod template;

pub use document::{Document, DocumentConfig, RemoteLibraryConfig};
pub use modal::{
    ConnectArgs, ConnectTexts, ImportArgs, ImportOptions, InsertArgs, ModalConfig, ModalLifecycle,
};
pub use template::{Filter, TemplateData, TemplateModel, TemplateOrigin};
