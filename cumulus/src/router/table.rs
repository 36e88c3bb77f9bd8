//! Static route table: an ordered list of `(path, name, view)` entries,
//! validated once when the table is built.

use crate::error::{Error, Result};
use std::collections::HashSet;

/// One row of a [`RouteTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry<V> {
    pub path: &'static str,
    pub name: &'static str,
    pub view: V,
}

impl<V> RouteEntry<V> {
    pub const fn new(path: &'static str, name: &'static str, view: V) -> Self {
        Self { path, name, view }
    }
}

/// Ordered mapping from path to a named view.
///
/// Path matching ignores case, a trailing `/`, and any query string or
/// fragment, so `"/"` resolves to the `""` entry and `"/Detail/?x=1"` to
/// `"/detail"`.
#[derive(Debug, Clone)]
pub struct RouteTable<V> {
    entries: Vec<RouteEntry<V>>,
}

/// Normalize a path for matching.
fn normalize(path: &str) -> String {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    path[..end].trim_end_matches('/').to_lowercase()
}

impl<V: PartialEq> RouteTable<V> {
    /// Build and validate a table.
    pub fn new(entries: Vec<RouteEntry<V>>) -> Result<Self> {
        if entries.is_empty() {
            return Err(Error::EmptyRouteTable);
        }

        let mut paths = HashSet::new();
        let mut names = HashSet::new();
        for (i, entry) in entries.iter().enumerate() {
            if entry.name.is_empty() {
                return Err(Error::InvalidRoute {
                    name: format!("#{i}"),
                    reason: "route name is empty".to_string(),
                });
            }
            if !entry.path.is_empty() && !entry.path.starts_with('/') {
                return Err(Error::InvalidRoute {
                    name: entry.name.to_string(),
                    reason: format!("path '{}' must be empty or start with '/'", entry.path),
                });
            }
            if entry.path.contains(['?', '#']) {
                return Err(Error::InvalidRoute {
                    name: entry.name.to_string(),
                    reason: format!("path '{}' must not contain a query or fragment", entry.path),
                });
            }
            if !paths.insert(normalize(entry.path)) {
                return Err(Error::DuplicatePath { path: entry.path.to_string() });
            }
            if !names.insert(entry.name) {
                return Err(Error::DuplicateName { name: entry.name.to_string() });
            }
            if entries[..i].iter().any(|prev| prev.view == entry.view) {
                return Err(Error::DuplicateView { name: entry.name.to_string() });
            }
        }

        Ok(Self { entries })
    }

    /// Resolve a requested path to its entry.
    pub fn resolve(&self, path: &str) -> Result<&RouteEntry<V>> {
        let wanted = normalize(path);
        self.entries
            .iter()
            .find(|entry| normalize(entry.path) == wanted)
            .ok_or_else(|| Error::RouteNotFound { path: path.to_string() })
    }

    /// Look an entry up by its exact name.
    pub fn by_name(&self, name: &str) -> Result<&RouteEntry<V>> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .ok_or_else(|| Error::UnknownRouteName {
                name: name.to_string(),
                available: self.entries.iter().map(|e| e.name).collect::<Vec<_>>().join(", "),
            })
    }

    /// The entry bound to `view`, if any.
    pub fn by_view(&self, view: &V) -> Option<&RouteEntry<V>> {
        self.entries.iter().find(|entry| &entry.view == view)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RouteEntry<V>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a, V> IntoIterator for &'a RouteTable<V> {
    type Item = &'a RouteEntry<V>;
    type IntoIter = std::slice::Iter<'a, RouteEntry<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
