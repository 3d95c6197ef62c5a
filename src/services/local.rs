//! Locally saved user templates
//!
//! "My Templates" entries are JSON files under the user's templates directory,
//! one file per template, named by template id.

use crate::model::template::{TemplateData, TemplateModel, TemplateOrigin};
use crate::services::source::{FetchError, FetchRequest, TemplateFetch, TemplateSource};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use tracing::{info, warn};

/// On-disk record of a user-saved template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedTemplate {
    pub model: TemplateModel,
    pub data: TemplateData,
    pub created_at: DateTime<Local>,
}

pub struct LocalTemplateSource {
    dir: PathBuf,
}

impl LocalTemplateSource {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, template_id: u64) -> PathBuf {
        self.dir.join(format!("{template_id}.json"))
    }

    /// List saved templates as catalog entries, ordered by id.
    pub fn list(&self) -> Vec<TemplateModel> {
        let Ok(entries) = std::fs::read_dir(&self.dir) else {
            return Vec::new();
        };

        let mut models: Vec<TemplateModel> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "json"))
            .filter_map(|entry| match read_saved(&entry.path()) {
                Ok(saved) => Some(saved.model),
                Err(error) => {
                    warn!(
                        event = "templates.local_entry_skipped",
                        path = %entry.path().display(),
                        error = %error
                    );
                    None
                }
            })
            .collect();

        models.sort_by_key(|model| model.template_id);
        models
    }

    /// Persist a new user template and return its record.
    pub fn save(&self, title: &str, data: TemplateData) -> anyhow::Result<SavedTemplate> {
        std::fs::create_dir_all(&self.dir)?;

        let next_id = self
            .list()
            .last()
            .map(|model| model.template_id + 1)
            .unwrap_or(1);

        let saved = SavedTemplate {
            model: TemplateModel {
                template_id: next_id,
                origin: TemplateOrigin::Local,
                title: title.to_string(),
                kind: "page".to_string(),
                subtype: None,
                has_page_settings: data.page_settings.is_some(),
            },
            data,
            created_at: Local::now(),
        };

        let contents = serde_json::to_string_pretty(&saved)?;
        std::fs::write(self.path_for(next_id), contents)?;

        info!(
            event = "templates.local_saved",
            template_id = next_id,
            title = title
        );
        Ok(saved)
    }
}

fn read_saved(path: &Path) -> Result<SavedTemplate, FetchError> {
    let contents = std::fs::read_to_string(path)?;
    let saved = serde_json::from_str(&contents)?;
    Ok(saved)
}

fn fetch_saved(path: PathBuf, template_id: u64) -> Result<TemplateData, FetchError> {
    if !path.exists() {
        return Err(FetchError::NotFound { template_id });
    }
    Ok(read_saved(&path)?.data)
}

impl TemplateSource for LocalTemplateSource {
    fn request_template_content(
        &self,
        _origin: TemplateOrigin,
        template_id: u64,
        _request: FetchRequest,
    ) -> TemplateFetch {
        // Saved templates already carry their page settings; the request's
        // with_page_settings only matters downstream at import time.
        let path = self.path_for(template_id);
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let _ = tx.send(fetch_saved(path, template_id));
        });

        TemplateFetch::new(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::source::FetchPoll;
    use serde_json::json;
    use std::time::Duration;

    fn temp_source(label: &str) -> LocalTemplateSource {
        let dir = std::env::temp_dir().join(format!(
            "pagecraft-local-{label}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        LocalTemplateSource::new(dir)
    }

    fn wait_for(fetch: &TemplateFetch) -> Result<TemplateData, FetchError> {
        for _ in 0..100 {
            if let FetchPoll::Done(message) = fetch.poll() {
                return message;
            }
            thread::sleep(Duration::from_millis(10));
        }
        panic!("fetch did not resolve in time");
    }

    #[test]
    fn save_list_and_fetch_round_trip() {
        let source = temp_source("roundtrip");

        let data = TemplateData {
            content: vec![json!({"el": "hero"})],
            page_settings: Some(json!({"background": "dark"})),
        };
        let saved = source.save("My Landing", data.clone()).unwrap();
        assert_eq!(saved.model.origin, TemplateOrigin::Local);
        assert!(saved.model.has_page_settings);

        let listed = source.list();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "My Landing");

        let fetch = source.request_template_content(
            TemplateOrigin::Local,
            saved.model.template_id,
            FetchRequest::default(),
        );
        assert_eq!(wait_for(&fetch).unwrap(), data);

        let _ = std::fs::remove_dir_all(source.dir);
    }

    #[test]
    fn ids_increase_monotonically() {
        let source = temp_source("ids");

        let first = source.save("One", TemplateData::default()).unwrap();
        let second = source.save("Two", TemplateData::default()).unwrap();
        assert!(second.model.template_id > first.model.template_id);

        let _ = std::fs::remove_dir_all(source.dir);
    }

    #[test]
    fn missing_template_resolves_to_not_found() {
        let source = temp_source("missing");

        let fetch =
            source.request_template_content(TemplateOrigin::Local, 42, FetchRequest::default());
        match wait_for(&fetch) {
            Err(FetchError::NotFound { template_id }) => assert_eq!(template_id, 42),
            other => panic!("expected not-found, got {other:?}"),
        }
    }
}
