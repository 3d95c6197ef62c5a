//! Template catalog types
//!
//! A template is a reusable piece of content: a remote catalog block/page or a
//! template the user saved locally. `TemplateModel` is the catalog entry; the
//! actual content arrives later as `TemplateData` when the template is fetched.

use serde::{Deserialize, Serialize};

/// Where a template lives: the remote catalog or the local user library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateOrigin {
    Remote,
    Local,
}

impl TemplateOrigin {
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateOrigin::Remote => "remote",
            TemplateOrigin::Local => "local",
        }
    }
}

/// A catalog entry describing an available template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateModel {
    pub template_id: u64,
    pub origin: TemplateOrigin,
    pub title: String,
    /// "block" or "page".
    #[serde(rename = "type")]
    pub kind: String,
    /// Block category ("hero", "footer", ...). Pages and saved templates have none.
    #[serde(default)]
    pub subtype: Option<String>,
    /// Whether the template carries page-level settings that the user may
    /// choose to import along with the content.
    #[serde(default)]
    pub has_page_settings: bool,
}

/// Fetched template content, ready to be handed to the document importer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateData {
    /// Content elements, kept opaque; only the document model interprets them.
    #[serde(default)]
    pub content: Vec<serde_json::Value>,
    #[serde(default)]
    pub page_settings: Option<serde_json::Value>,
}

/// Catalog filter a tab resolves to: which source to browse and, optionally,
/// which template type/subtype to narrow down to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub source: TemplateOrigin,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub subtype: Option<String>,
}

impl Filter {
    pub fn matches(&self, model: &TemplateModel) -> bool {
        if model.origin != self.source {
            return false;
        }
        if let Some(kind) = &self.kind {
            if &model.kind != kind {
                return false;
            }
        }
        if let Some(subtype) = &self.subtype {
            if model.subtype.as_ref() != Some(subtype) {
                return false;
            }
        }
        true
    }
}
