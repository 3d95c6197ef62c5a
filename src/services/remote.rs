//! Remote template catalog client
//!
//! Fetches template content over HTTP on a worker thread so the UI never
//! blocks on the network.

use crate::model::template::{TemplateData, TemplateOrigin};
use crate::services::source::{FetchError, FetchRequest, TemplateFetch, TemplateSource};
use std::sync::mpsc;
use std::thread;
use tracing::debug;

const USER_AGENT: &str = concat!("pagecraft/", env!("CARGO_PKG_VERSION"));

pub struct RemoteTemplateSource {
    base_url: String,
}

impl RemoteTemplateSource {
    pub fn new(base_url: String) -> Self {
        Self { base_url }
    }
}

pub(crate) fn template_url(base_url: &str, template_id: u64) -> String {
    format!(
        "{}/templates/{template_id}",
        base_url.trim_end_matches('/')
    )
}

fn fetch_template(
    url: &str,
    template_id: u64,
    with_page_settings: Option<bool>,
) -> Result<TemplateData, FetchError> {
    let mut request = ureq::get(url).set("User-Agent", USER_AGENT);
    if let Some(with) = with_page_settings {
        request = request.query("with_page_settings", if with { "1" } else { "0" });
    }

    match request.call() {
        Ok(response) => Ok(response.into_json::<TemplateData>()?),
        Err(ureq::Error::Status(404, _)) => Err(FetchError::NotFound { template_id }),
        Err(error) => Err(FetchError::Http(error.to_string())),
    }
}

impl TemplateSource for RemoteTemplateSource {
    fn request_template_content(
        &self,
        _origin: TemplateOrigin,
        template_id: u64,
        request: FetchRequest,
    ) -> TemplateFetch {
        let url = template_url(&self.base_url, template_id);
        debug!(event = "templates.remote_fetch_started", url = %url);

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(fetch_template(&url, template_id, request.with_page_settings));
        });

        TemplateFetch::new(rx)
    }
}
