//! The active document and its per-document configuration
//!
//! The library component never mutates the document directly; it dispatches
//! the `document/elements/import` command and the application applies it here.

use crate::model::modal::ImportOptions;
use crate::model::template::{TemplateData, TemplateModel};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Document-level commands dispatched over the bus.
pub mod commands {
    /// Insert fetched template content into the active document.
    pub const IMPORT_ELEMENTS: &str = "document/elements/import";
}

/// Per-document configuration of the template library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteLibraryConfig {
    /// Block category suggested for this document; the blocks tab filters by it.
    pub category: String,
    /// Route (without the `library/` prefix) shown when nothing is restorable.
    pub default_route: String,
    /// Always import page-level settings without asking.
    #[serde(default)]
    pub auto_import_settings: bool,
}

impl Default for RemoteLibraryConfig {
    fn default() -> Self {
        Self {
            category: "landing-page".to_string(),
            default_route: "templates/blocks".to_string(),
            auto_import_settings: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentConfig {
    #[serde(default)]
    pub remote_library: RemoteLibraryConfig,
}

/// The page being edited: an element tree plus page-level settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub config: DocumentConfig,
    #[serde(default)]
    pub elements: Vec<serde_json::Value>,
    #[serde(default)]
    pub settings: serde_json::Map<String, serde_json::Value>,
}

impl Document {
    pub fn sample() -> Self {
        Self {
            title: "Untitled Page".to_string(),
            config: DocumentConfig::default(),
            elements: Vec::new(),
            settings: serde_json::Map::new(),
        }
    }

    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let document = serde_json::from_str(&contents)?;
        Ok(document)
    }

    /// Apply a fetched template to this document.
    ///
    /// Content elements are spliced in at `options.at_index` (end of the
    /// document when absent). Page settings are merged only when the resolved
    /// decision is an explicit yes.
    pub fn import_template(
        &mut self,
        model: &TemplateModel,
        data: TemplateData,
        options: &ImportOptions,
    ) {
        let at = options
            .at_index
            .unwrap_or(self.elements.len())
            .min(self.elements.len());

        for (offset, element) in data.content.into_iter().enumerate() {
            self.elements.insert(at + offset, element);
        }

        if options.with_page_settings == Some(true) {
            if let Some(serde_json::Value::Object(map)) = data.page_settings {
                self.settings.extend(map);
            }
        }

        info!(
            event = "document.template_imported",
            template_id = model.template_id,
            source = model.origin.as_str(),
            with_page_settings = ?options.with_page_settings,
            elements = self.elements.len()
        );
    }
}
