//! Library tab definitions
//!
//! Each tab pairs a route key with the catalog filter it browses. A tab holds
//! either a fixed filter or a resolver; resolvers run at render time so the
//! filter always reflects the currently active document, which can change
//! without the tabs being re-registered.

use crate::library::routes;
use crate::model::document::DocumentConfig;
use crate::model::template::{Filter, TemplateOrigin};

pub struct TabDefinition {
    /// Route key, also the persistence key for "resume where you left off".
    pub key: &'static str,
    pub title: &'static str,
    filter: TabFilter,
}

/// Exactly one of a fixed filter or a render-time resolver per tab.
enum TabFilter {
    Static(Filter),
    Dynamic(fn(&DocumentConfig) -> Filter),
}

impl TabDefinition {
    pub fn fixed(key: &'static str, title: &'static str, filter: Filter) -> Self {
        Self {
            key,
            title,
            filter: TabFilter::Static(filter),
        }
    }

    pub fn resolved(
        key: &'static str,
        title: &'static str,
        resolver: fn(&DocumentConfig) -> Filter,
    ) -> Self {
        Self {
            key,
            title,
            filter: TabFilter::Dynamic(resolver),
        }
    }

    /// Resolve the tab's filter against the active document. Fixed filters are
    /// returned as-is; dynamic ones are re-resolved on every call.
    pub fn resolve_filter(&self, document: &DocumentConfig) -> Filter {
        match &self.filter {
            TabFilter::Static(filter) => filter.clone(),
            TabFilter::Dynamic(resolver) => resolver(document),
        }
    }
}

/// The fixed tab set, in display order.
pub fn default_tabs() -> Vec<TabDefinition> {
    vec![
        TabDefinition::resolved(routes::BLOCKS, "Blocks", |document| Filter {
            source: TemplateOrigin::Remote,
            kind: Some("block".to_string()),
            subtype: Some(document.remote_library.category.clone()),
        }),
        TabDefinition::fixed(
            routes::PAGES,
            "Pages",
            Filter {
                source: TemplateOrigin::Remote,
                kind: Some("page".to_string()),
                subtype: None,
            },
        ),
        TabDefinition::fixed(
            routes::MY_TEMPLATES,
            "My Templates",
            Filter {
                source: TemplateOrigin::Local,
                kind: None,
                subtype: None,
            },
        ),
    ]
}
