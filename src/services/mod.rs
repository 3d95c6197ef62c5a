//! External service interactions
//!
//! Template content providers: the remote HTTP catalog, the local user
//! library, and the composite that routes between them by origin.

pub mod local;
pub mod remote;
pub mod source;

pub use local::{LocalTemplateSource, SavedTemplate};
pub use remote::RemoteTemplateSource;
pub use source::{
    CompositeSource, FetchError, FetchPoll, FetchRequest, TemplateFetch, TemplateSource,
};
