//! OSC 8 hyperlink interning
//!
//! Many cells typically share one hyperlink, so links are interned in a
//! table and cells hold cheap shared references. An entry lives as long
//! as any cell still points at it; `prune` drops the rest.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A hyperlink target identified by an optional explicit id and a URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hyperlink {
    /// The `id=` parameter from OSC 8, when present.
    pub id: Option<String>,
    pub uri: String,
}

/// Interned hyperlink storage keyed by explicit id or, absent one, by URI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HyperlinkTable {
    entries: HashMap<String, Arc<Hyperlink>>,
}

impl HyperlinkTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a hyperlink, returning a shared reference.
    ///
    /// Links with the same id (or same URI when no id is given) resolve
    /// to the same entry, so cells written under them compare pointer-equal.
    pub fn intern(&mut self, id: Option<&str>, uri: &str) -> Arc<Hyperlink> {
        let key = id.unwrap_or(uri);
        if let Some(existing) = self.entries.get(key) {
            if existing.uri == uri {
                return Arc::clone(existing);
            }
        }
        let link = Arc::new(Hyperlink {
            id: id.map(str::to_owned),
            uri: uri.to_owned(),
        });
        self.entries.insert(key.to_owned(), Arc::clone(&link));
        link
    }

    /// Drop entries no cell references anymore.
    pub fn prune(&mut self) {
        self.entries.retain(|_, link| Arc::strong_count(link) > 1);
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
