//! Parsed `Link` header entries.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// One link target and everything the header said about it.
///
/// `rel` holds lower-cased relation tokens. Every other parameter maps to
/// its distinct values in the order they were first seen.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LinkEntry {
    pub uri: String,
    pub rel: BTreeSet<String>,
    pub params: BTreeMap<String, Vec<String>>,
}

impl LinkEntry {
    pub fn new(uri: impl Into<String>) -> Self {
        LinkEntry {
            uri: uri.into(),
            ..Default::default()
        }
    }

    #[inline]
    pub fn has_rel(&self, rel: &str) -> bool {
        self.rel.contains(rel)
    }

    pub fn param(&self, name: &str) -> Option<&[String]> {
        self.params.get(name).map(Vec::as_slice)
    }

    pub fn first_param(&self, name: &str) -> Option<&str> {
        self.params
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// The first `datetime` parameter, undecoded.
    pub fn datetime(&self) -> Option<&str> {
        self.first_param("datetime")
    }

    /// Record a value for `name`, ignoring exact duplicates.
    pub(crate) fn push_param(&mut self, name: &str, value: String) {
        let values = self.params.entry(name.to_string()).or_default();
        if !values.contains(&value) {
            values.push(value);
        }
    }

    /// Split a `rel` value on spaces and fold each token to lower case.
    pub(crate) fn push_rel(&mut self, value: &str) {
        for token in value.split(' ').filter(|t| !t.is_empty()) {
            self.rel.insert(token.to_lowercase());
        }
    }
}

/// URI → [`LinkEntry`] mapping produced by one parse.
///
/// Entries keep the order in which their URI first appeared in the header.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkHeaderMap {
    entries: Vec<LinkEntry>,
    index: HashMap<String, usize>,
}

impl LinkHeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, uri: &str) -> Option<&LinkEntry> {
        self.index.get(uri).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.index.contains_key(uri)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LinkEntry> {
        self.entries.iter()
    }

    pub fn uris(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.uri.as_str())
    }

    /// Entries carrying `rel`, in header order.
    pub fn with_rel<'a: 'r, 'r>(
        &'a self,
        rel: &'r str,
    ) -> impl Iterator<Item = &'a LinkEntry> + 'r {
        self.entries.iter().filter(move |e| e.has_rel(rel))
    }

    /// Return the entry for `uri`, creating it on first sighting.
    pub(crate) fn entry_mut(&mut self, uri: &str) -> &mut LinkEntry {
        let i = match self.index.get(uri) {
            Some(&i) => i,
            None => {
                self.entries.push(LinkEntry::new(uri));
                let i = self.entries.len() - 1;
                self.index.insert(uri.to_string(), i);
                i
            }
        };
        &mut self.entries[i]
    }
}

impl<'a> IntoIterator for &'a LinkHeaderMap {
    type Item = &'a LinkEntry;
    type IntoIter = std::slice::Iter<'a, LinkEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for LinkHeaderMap {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.uri, entry)?;
        }
        map.end()
    }
}
