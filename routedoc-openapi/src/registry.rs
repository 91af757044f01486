use crate::document::{Operation, PathItem, PathsObject};
use routedoc_core::RouteMethod;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq)]
struct PathEntry {
    explicit: BTreeMap<RouteMethod, Operation>,
    all: Option<Operation>,
}

/// Accumulates normalized operations per (path, method).
///
/// `ALL` registrations are kept aside and only expanded in
/// [`into_paths`](Self::into_paths), so an explicit verb wins regardless of
/// registration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathRegistry {
    entries: BTreeMap<String, PathEntry>,
}

impl PathRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `operation`, replacing any previous one for the same
    /// (path, method) pair as a whole.
    pub fn register(&mut self, path: &str, method: RouteMethod, operation: Operation) {
        let entry = self.entries.entry(path.to_string()).or_default();
        if method.is_all() {
            entry.all = Some(operation);
        } else {
            entry.explicit.insert(method, operation);
        }
    }

    /// Operation registered for exactly this (path, method), without expansion.
    pub fn get(&self, path: &str, method: RouteMethod) -> Option<&Operation> {
        let entry = self.entries.get(path)?;
        if method.is_all() {
            entry.all.as_ref()
        } else {
            entry.explicit.get(&method)
        }
    }

    /// Number of distinct paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build the `paths` section, expanding each `ALL` registration into
    /// every standard verb not explicitly registered for that path.
    pub fn into_paths(self) -> PathsObject {
        self.entries
            .into_iter()
            .map(|(path, entry)| {
                let mut item: PathItem = entry
                    .explicit
                    .into_iter()
                    .map(|(method, operation)| (method.as_key().to_string(), operation))
                    .collect();
                if let Some(all) = entry.all {
                    for method in RouteMethod::STANDARD {
                        item.entry(method.as_key().to_string())
                            .or_insert_with(|| all.clone());
                    }
                }
                (path, item)
            })
            .collect()
    }
}
