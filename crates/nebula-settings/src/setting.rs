//! Declarative setting descriptors.
//!
//! A [`Setting`] names a key (plus aliases), its default, and a parse
//! function. Schemas are flat tables of `const` descriptors; reading a value
//! is a lookup plus a function-pointer call.

use crate::SettingsMap;

/// Name and aliases of a setting, without its value type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SettingInfo {
    /// Canonical key as written to files.
    pub name: &'static str,
    /// Alternative keys accepted on read.
    pub aliases: &'static [&'static str],
}

impl SettingInfo {
    /// Returns `true` if `key` refers to this setting.
    pub fn matches(&self, key: &str) -> bool {
        let key = crate::normalize_key(key);
        crate::normalize_key(self.name) == key
            || self.aliases.iter().any(|a| crate::normalize_key(a) == key)
    }
}

/// A value that could not be parsed. The caller falls back to the default.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidSetting {
    /// Canonical setting name.
    pub setting: &'static str,
    /// Raw value found in the document.
    pub value: String,
    /// Parser message.
    pub reason: String,
}

/// Typed descriptor for one setting.
pub struct Setting<T> {
    /// Canonical key as written to files.
    pub name: &'static str,
    /// Alternative keys accepted on read.
    pub aliases: &'static [&'static str],
    /// Value used when the key is absent or invalid.
    pub default: fn() -> T,
    /// Parses a trimmed raw value.
    pub parse: fn(&str) -> Result<T, String>,
}

impl<T> Setting<T> {
    /// Name and aliases of this setting.
    pub const fn info(&self) -> SettingInfo {
        SettingInfo {
            name: self.name,
            aliases: self.aliases,
        }
    }

    /// Raw value under the canonical name, else the first alias present.
    pub fn raw<'a>(&self, map: &'a SettingsMap) -> Option<&'a str> {
        map.get(self.name)
            .or_else(|| self.aliases.iter().find_map(|alias| map.get(alias)))
    }

    /// Parses the value if the key is present.
    pub fn read(&self, map: &SettingsMap) -> Option<Result<T, InvalidSetting>> {
        let raw = self.raw(map)?;
        Some((self.parse)(raw.trim()).map_err(|reason| InvalidSetting {
            setting: self.name,
            value: raw.to_string(),
            reason,
        }))
    }

    /// Parsed value, or the default when absent. An unparsable value is handed
    /// to `on_invalid` and also yields the default.
    pub fn get_or_default(&self, map: &SettingsMap, mut on_invalid: impl FnMut(InvalidSetting)) -> T {
        match self.read(map) {
            Some(Ok(value)) => value,
            Some(Err(invalid)) => {
                on_invalid(invalid);
                (self.default)()
            }
            None => (self.default)(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse helpers
// ---------------------------------------------------------------------------

/// Accepts any string.
pub fn parse_string(raw: &str) -> Result<String, String> {
    Ok(raw.to_string())
}

/// `true`/`false`, case-insensitive.
pub fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(format!("expected true or false, got {raw:?}")),
    }
}

/// Signed 32-bit integer.
pub fn parse_i32(raw: &str) -> Result<i32, String> {
    raw.parse::<i32>().map_err(|e| format!("{raw:?} is not an integer: {e}"))
}

/// 32-bit float.
pub fn parse_f32(raw: &str) -> Result<f32, String> {
    raw.parse::<f32>().map_err(|e| format!("{raw:?} is not a number: {e}"))
}

/// RGB color as `#RRGGBB`, `0xRRGGBB`, or a plain decimal integer.
pub fn parse_color(raw: &str) -> Result<u32, String> {
    let hex = raw
        .strip_prefix('#')
        .or_else(|| raw.strip_prefix("0x"))
        .or_else(|| raw.strip_prefix("0X"));
    let value = match hex {
        Some(digits) => u32::from_str_radix(digits, 16),
        None => raw.parse::<u32>(),
    }
    .map_err(|e| format!("{raw:?} is not a color: {e}"))?;
    if value > 0xFF_FFFF {
        return Err(format!("{raw:?} is outside #000000..#FFFFFF"));
    }
    Ok(value)
}

/// Comma-separated names; blanks are dropped.
pub fn parse_name_list(raw: &str) -> Result<Vec<String>, String> {
    Ok(raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zero() -> i32 {
        0
    }

    const SIZE: Setting<i32> = Setting {
        name: "BiomeSize",
        aliases: &["size"],
        default: zero,
        parse: parse_i32,
    };

    #[test]
    fn test_absent_setting_uses_default() {
        let map = SettingsMap::new("Plains");
        let mut invalid = Vec::new();
        assert_eq!(SIZE.get_or_default(&map, |e| invalid.push(e)), 0);
        assert!(invalid.is_empty());
    }

    #[test]
    fn test_alias_is_read() {
        let map = SettingsMap::from_pairs("Plains", [("size", "7")]);
        assert_eq!(SIZE.get_or_default(&map, |_| {}), 7);
    }

    #[test]
    fn test_invalid_value_reports_and_defaults() {
        let map = SettingsMap::from_pairs("Plains", [("BiomeSize", "huge")]);
        let mut invalid = Vec::new();
        assert_eq!(SIZE.get_or_default(&map, |e| invalid.push(e)), 0);
        assert_eq!(invalid.len(), 1);
        assert_eq!(invalid[0].setting, "BiomeSize");
        assert_eq!(invalid[0].value, "huge");
    }

    #[test]
    fn test_info_matches_aliases() {
        let info = SIZE.info();
        assert!(info.matches("biome_size"));
        assert!(info.matches("Size"));
        assert!(!info.matches("BiomeRarity"));
    }

    #[test]
    fn test_parse_color_forms() {
        assert_eq!(parse_color("#FF0000"), Ok(0xFF0000));
        assert_eq!(parse_color("0x00ff00"), Ok(0x00FF00));
        assert_eq!(parse_color("255"), Ok(255));
        assert!(parse_color("#1000000").is_err());
        assert!(parse_color("red").is_err());
    }

    #[test]
    fn test_parse_name_list_drops_blanks() {
        assert_eq!(
            parse_name_list(" Forest, ,Taiga ,"),
            Ok(vec!["Forest".to_string(), "Taiga".to_string()])
        );
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Ok(true));
        assert_eq!(parse_bool("false"), Ok(false));
        assert!(parse_bool("yes").is_err());
    }
}
