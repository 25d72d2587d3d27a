//! Ordered key/value settings with case-insensitive lookup and layer flattening.

use std::collections::HashMap;

/// Canonical form of a setting key: lowercase, with spaces, `_` and `-` removed.
///
/// `BiomeExtends`, `biome-extends` and `Biome Extends` all normalize to
/// `biomeextends`.
pub fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-' | '\t'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// An ordered set of raw `key -> value` pairs belonging to one named document.
///
/// Keys keep their original spelling for writing back; lookups go through
/// [`normalize_key`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SettingsMap {
    name: String,
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl SettingsMap {
    /// Creates an empty map for the document `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Builds a map from pairs; later duplicates override earlier ones.
    pub fn from_pairs<K, V>(name: impl Into<String>, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = Self::new(name);
        for (key, value) in pairs {
            map.insert(key, value);
        }
        map
    }

    /// Name of the document this map was read from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets `key` to `value`, returning the previous value.
    ///
    /// An existing key keeps its position and original spelling.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        let normalized = normalize_key(&key);
        match self.index.get(&normalized) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos].1, value)),
            None => {
                self.index.insert(normalized, self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Returns the raw value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(&normalize_key(key))
            .map(|&pos| self.entries[pos].1.as_str())
    }

    /// Returns `true` if `key` is defined in this map.
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(&normalize_key(key))
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flattens child-first `layers` into a single map named `name`.
    ///
    /// For every key the nearest layer that defines it wins. Keys appear in the
    /// order they are first met walking from the child outwards.
    pub fn flatten<'a>(
        name: impl Into<String>,
        layers: impl IntoIterator<Item = &'a SettingsMap>,
    ) -> SettingsMap {
        let mut flat = SettingsMap::new(name);
        for layer in layers {
            for (key, value) in layer.iter() {
                if !flat.contains_key(key) {
                    flat.insert(key, value);
                }
            }
        }
        flat
    }

    /// Returns a copy of `self` that falls back to `parent` for missing keys.
    pub fn with_fallback(&self, parent: &SettingsMap) -> SettingsMap {
        Self::flatten(self.name.clone(), [self, parent])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key_variants() {
        assert_eq!(normalize_key("BiomeExtends"), "biomeextends");
        assert_eq!(normalize_key("biome-extends"), "biomeextends");
        assert_eq!(normalize_key("Biome Extends"), "biomeextends");
        assert_eq!(normalize_key("inherit_mobs"), "inheritmobs");
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let map = SettingsMap::from_pairs("Forest", [("SmoothRadius", "4")]);
        assert_eq!(map.get("smoothradius"), Some("4"));
        assert_eq!(map.get("smooth-radius"), Some("4"));
        assert_eq!(map.get("BiomeColor"), None);
    }

    #[test]
    fn test_insert_override_keeps_position() {
        let mut map = SettingsMap::from_pairs("Forest", [("A", "1"), ("B", "2")]);
        let old = map.insert("a", "3");
        assert_eq!(old.as_deref(), Some("1"));
        let entries: Vec<_> = map.iter().collect();
        assert_eq!(entries, vec![("A", "3"), ("B", "2")]);
    }

    #[test]
    fn test_child_overrides_parent() {
        let parent = SettingsMap::from_pairs("Y", [("k", "5"), ("only_parent", "p")]);
        let child = SettingsMap::from_pairs("X", [("k", "7")]);
        let merged = child.with_fallback(&parent);
        assert_eq!(merged.name(), "X");
        assert_eq!(merged.get("k"), Some("7"));
        assert_eq!(merged.get("only_parent"), Some("p"));
    }

    #[test]
    fn test_missing_key_falls_back_to_parent() {
        let parent = SettingsMap::from_pairs("Y", [("k", "5")]);
        let child = SettingsMap::new("X");
        assert_eq!(child.with_fallback(&parent).get("k"), Some("5"));
    }

    #[test]
    fn test_flatten_nearest_layer_wins() {
        let root = SettingsMap::from_pairs("Root", [("a", "root"), ("b", "root"), ("c", "root")]);
        let mid = SettingsMap::from_pairs("Mid", [("b", "mid"), ("c", "mid")]);
        let leaf = SettingsMap::from_pairs("Leaf", [("c", "leaf")]);
        let flat = SettingsMap::flatten("Leaf", [&leaf, &mid, &root]);
        assert_eq!(flat.get("a"), Some("root"));
        assert_eq!(flat.get("b"), Some("mid"));
        assert_eq!(flat.get("c"), Some("leaf"));
        assert_eq!(flat.len(), 3);
    }
}
