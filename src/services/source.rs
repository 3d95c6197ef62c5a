//! Template content fetching
//!
//! Sources run their work on a background thread and deliver exactly one
//! message per request over a channel; the library component polls the
//! returned `TemplateFetch` from the main loop.

use crate::model::template::{TemplateData, TemplateOrigin};
use std::rc::Rc;
use std::sync::mpsc::{Receiver, TryRecvError};
use thiserror::Error;

/// Fetch failure taxonomy. All variants are user-visible and recoverable by
/// re-invoking the insert.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("template {template_id} was not found")]
    NotFound { template_id: u64 },
    #[error("catalog request failed: {0}")]
    Http(String),
    #[error("failed to read template: {0}")]
    Io(#[from] std::io::Error),
    #[error("template data is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("template source hung up before responding")]
    SourceDropped,
}

/// Request parameters forwarded with a content fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchRequest {
    pub with_page_settings: Option<bool>,
}

pub type FetchMessage = Result<TemplateData, FetchError>;

/// Handle to an outstanding template-content request.
pub struct TemplateFetch {
    receiver: Receiver<FetchMessage>,
}

/// Poll result for an outstanding fetch.
pub enum FetchPoll {
    Pending,
    Done(FetchMessage),
}

impl TemplateFetch {
    pub fn new(receiver: Receiver<FetchMessage>) -> Self {
        Self { receiver }
    }

    /// A fetch that is already resolved; used by synchronous sources and stubs.
    pub fn ready(message: FetchMessage) -> Self {
        let (tx, rx) = std::sync::mpsc::channel();
        // The message is buffered, so dropping the sender here is fine.
        let _ = tx.send(message);
        Self::new(rx)
    }

    /// Non-blocking poll. A source that hangs up without answering is reported
    /// as an error so the request still completes exactly once.
    pub fn poll(&self) -> FetchPoll {
        match self.receiver.try_recv() {
            Ok(message) => FetchPoll::Done(message),
            Err(TryRecvError::Empty) => FetchPoll::Pending,
            Err(TryRecvError::Disconnected) => FetchPoll::Done(Err(FetchError::SourceDropped)),
        }
    }
}

/// A provider of template content for one or more origins.
pub trait TemplateSource {
    fn request_template_content(
        &self,
        origin: TemplateOrigin,
        template_id: u64,
        request: FetchRequest,
    ) -> TemplateFetch;
}

/// Routes requests to the remote or local provider by origin.
pub struct CompositeSource {
    remote: Rc<dyn TemplateSource>,
    local: Rc<dyn TemplateSource>,
}

impl CompositeSource {
    pub fn new(remote: Rc<dyn TemplateSource>, local: Rc<dyn TemplateSource>) -> Self {
        Self { remote, local }
    }
}

impl TemplateSource for CompositeSource {
    fn request_template_content(
        &self,
        origin: TemplateOrigin,
        template_id: u64,
        request: FetchRequest,
    ) -> TemplateFetch {
        match origin {
            TemplateOrigin::Remote => self
                .remote
                .request_template_content(origin, template_id, request),
            TemplateOrigin::Local => self
                .local
                .request_template_content(origin, template_id, request),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct TaggedSource {
        tag: &'static str,
        requests: Rc<RefCell<Vec<(&'static str, u64)>>>,
    }

    impl TemplateSource for TaggedSource {
        fn request_template_content(
            &self,
            _origin: TemplateOrigin,
            template_id: u64,
            _request: FetchRequest,
        ) -> TemplateFetch {
            self.requests.borrow_mut().push((self.tag, template_id));
            TemplateFetch::ready(Ok(TemplateData::default()))
        }
    }

    #[test]
    fn composite_routes_by_origin() {
        let requests = Rc::new(RefCell::new(Vec::new()));
        let composite = CompositeSource::new(
            Rc::new(TaggedSource {
                tag: "remote",
                requests: Rc::clone(&requests),
            }),
            Rc::new(TaggedSource {
                tag: "local",
                requests: Rc::clone(&requests),
            }),
        );

        composite.request_template_content(TemplateOrigin::Remote, 1, FetchRequest::default());
        composite.request_template_content(TemplateOrigin::Local, 2, FetchRequest::default());

        assert_eq!(*requests.borrow(), vec![("remote", 1), ("local", 2)]);
    }

    #[test]
    fn ready_fetch_resolves_on_first_poll() {
        let fetch = TemplateFetch::ready(Ok(TemplateData::default()));
        match fetch.poll() {
            FetchPoll::Done(Ok(data)) => assert_eq!(data, TemplateData::default()),
            _ => panic!("expected a resolved fetch"),
        }
    }

    #[test]
    fn dropped_sender_resolves_to_source_dropped() {
        let (tx, rx) = std::sync::mpsc::channel::<FetchMessage>();
        let fetch = TemplateFetch::new(rx);
        assert!(matches!(fetch.poll(), FetchPoll::Pending));

        drop(tx);
        match fetch.poll() {
            FetchPoll::Done(Err(FetchError::SourceDropped)) => {}
            _ => panic!("expected a source-dropped error"),
        }
    }
}
