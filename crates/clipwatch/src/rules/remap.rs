//! URL prefix remapping.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, warn};

/// Ordered mapping of source URL prefixes to destination prefixes.
///
/// Serialized as a JSON object; key order in the file is the matching
/// order. A repeated key keeps its first position and takes the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlMapping {
    entries: Vec<(String, String)>,
}

impl UrlMapping {
    /// Create an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a mapping entry.
    ///
    /// An empty source prefix is ignored since every text starts with it.
    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>) {
        let from = from.into();
        let to = to.into();
        if from.is_empty() {
            warn!(to = %to, "Ignoring URL mapping with empty source prefix");
            return;
        }
        match self.entries.iter_mut().find(|(f, _)| *f == from) {
            Some(entry) => entry.1 = to,
            None => self.entries.push((from, to)),
        }
    }

    /// Iterate over `(from, to)` pairs in matching order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(f, t)| (f.as_str(), t.as_str()))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the mapping is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<F: Into<String>, T: Into<String>> FromIterator<(F, T)> for UrlMapping {
    fn from_iter<I: IntoIterator<Item = (F, T)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (from, to) in iter {
            mapping.insert(from, to);
        }
        mapping
    }
}

impl Serialize for UrlMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (from, to) in &self.entries {
            map.serialize_entry(from, to)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for UrlMapping {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MappingVisitor;

        impl<'de> Visitor<'de> for MappingVisitor {
            type Value = UrlMapping;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping URL prefixes to replacement prefixes")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<UrlMapping, A::Error> {
                let mut mapping = UrlMapping::new();
                while let Some((from, to)) = access.next_entry::<String, String>()? {
                    mapping.insert(from, to);
                }
                Ok(mapping)
            }
        }

        deserializer.deserialize_map(MappingVisitor)
    }
}

/// Rewrite the leading URL prefix of `text`.
///
/// The first entry whose source prefix starts `text` is applied and the
/// scan stops. Text that only contains a prefix further in is left alone.
/// Returns the resulting text and whether anything changed.
#[must_use]
pub fn remap(text: &str, mapping: &UrlMapping) -> (String, bool) {
    for (from, to) in mapping.iter() {
        if let Some(rest) = text.strip_prefix(from) {
            let rewritten = format!("{to}{rest}");
            let changed = rewritten != text;
            debug!(from = %from, to = %to, changed, "URL prefix matched");
            return (rewritten, changed);
        }
    }
    (text.to_string(), false)
}
