//! Named command and route tables
//!
//! Registration is an explicit ordered step: entries keep their insertion
//! order and registering an existing name overrides the earlier handler in
//! place. The base modal command set is registered first, then the library
//! set, so a library entry with the same name wins.

/// What a library command resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryCommand {
    Open,
    Close,
    Toggle,
    InsertTemplate,
    ShowImport,
    ShowSaveTemplate,
    ShowPreview,
    ShowConnect,
}

/// What a library route resolves to. Routes are pure dispatch to the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteTarget {
    Tab,
    Import,
    SaveTemplate,
    Preview,
    Connect,
}

/// Ordered name -> entry table with override-on-duplicate semantics.
pub struct Registry<T: Copy> {
    entries: Vec<(String, T)>,
}

pub type CommandRegistry = Registry<LibraryCommand>;
pub type RouteRegistry = Registry<RouteTarget>;

impl<T: Copy> Registry<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register an entry. A duplicate name replaces the earlier entry in
    /// place, keeping its position in the table.
    pub fn register(&mut self, name: &str, entry: T) {
        if let Some(slot) = self.entries.iter_mut().find(|(n, _)| n == name) {
            slot.1 = entry;
        } else {
            self.entries.push((name.to_string(), entry));
        }
    }

    pub fn resolve(&self, name: &str) -> Option<T> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, entry)| *entry)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

impl<T: Copy> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}
