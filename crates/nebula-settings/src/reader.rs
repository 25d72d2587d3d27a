//! Reader for the `Key: Value` biome config format.
//!
//! One setting per line. Blank lines and lines starting with `#` or `//` are
//! ignored. The first `:` separates key from value, so values such as
//! `minecraft:plains` survive intact.

use std::path::Path;

use crate::{SettingsError, SettingsMap};

/// Parses settings text for the document `name`.
///
/// Malformed lines are skipped and a repeated key overrides the earlier one;
/// both are logged as warnings.
pub fn parse_settings(name: &str, text: &str) -> SettingsMap {
    let mut map = SettingsMap::new(name);

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            tracing::warn!(
                "{}:{}: ignoring line without ':' separator: {}",
                name,
                line_no + 1,
                line
            );
            continue;
        };

        let key = key.trim();
        if key.is_empty() {
            tracing::warn!("{}:{}: ignoring setting with empty key", name, line_no + 1);
            continue;
        }

        if map.insert(key, value.trim()).is_some() {
            tracing::warn!(
                "{}:{}: setting '{}' is defined more than once, last value wins",
                name,
                line_no + 1,
                key
            );
        }
    }

    map
}

/// Reads and parses the settings file at `path` for the document `name`.
pub fn read_settings_file(name: &str, path: &Path) -> Result<SettingsMap, SettingsError> {
    let text = std::fs::read_to_string(path).map_err(|e| SettingsError::io(path, e))?;
    Ok(parse_settings(name, &text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_settings() {
        let text = "\
# Forest biome
BiomeExtends: Plains
SmoothRadius: 4

// trailing comment
ReplaceToBiomeName: minecraft:forest
";
        let map = parse_settings("Forest", text);
        assert_eq!(map.len(), 3);
        assert_eq!(map.get("BiomeExtends"), Some("Plains"));
        assert_eq!(map.get("SmoothRadius"), Some("4"));
        assert_eq!(map.get("ReplaceToBiomeName"), Some("minecraft:forest"));
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let map = parse_settings("Desert", "no separator here\n: empty key\nBiomeSize: 6\n");
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("BiomeSize"), Some("6"));
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let map = parse_settings("Desert", "BiomeSize: 6\nbiomesize: 8\n");
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("BiomeSize"), Some("8"));
    }

    #[test]
    fn test_empty_value_is_kept() {
        let map = parse_settings("Desert", "BiomeExtends:\n");
        assert_eq!(map.get("BiomeExtends"), Some(""));
    }

    #[test]
    fn test_read_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Swamp.bc");
        std::fs::write(&path, "BiomeColor: #2F4F2F\n").unwrap();
        let map = read_settings_file("Swamp", &path).unwrap();
        assert_eq!(map.name(), "Swamp");
        assert_eq!(map.get("biomecolor"), Some("#2F4F2F"));
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_settings_file("Nowhere", &dir.path().join("Nowhere.bc"));
        assert!(matches!(result, Err(SettingsError::Io { .. })));
    }
}
