//! Writer for the `Key: Value` biome config format.

use std::io::Write;
use std::path::Path;

use crate::{SettingsError, SettingsMap};

/// Renders `map` as settings text, preceded by a comment naming the document.
pub fn render_settings(map: &SettingsMap) -> String {
    let mut out = format!("# {}\n", map.name());
    for (key, value) in map.iter() {
        out.push_str(key);
        out.push_str(": ");
        out.push_str(value);
        out.push('\n');
    }
    out
}

/// Writes `map` to `path`, going through a temporary sibling file so an
/// interrupted write never leaves a truncated file behind.
pub fn write_settings_file(map: &SettingsMap, path: &Path) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| SettingsError::io(parent, e))?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = Path::new(&tmp_name);

    let written = std::fs::File::create(tmp_path).and_then(|mut file| {
        file.write_all(render_settings(map).as_bytes())?;
        file.sync_all()
    });
    if let Err(e) = written {
        let _ = std::fs::remove_file(tmp_path);
        return Err(SettingsError::io(tmp_path, e));
    }

    std::fs::rename(tmp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(tmp_path);
        SettingsError::io(path, e)
    })
}
