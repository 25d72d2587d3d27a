//! Settings error types.

use std::path::PathBuf;

/// Errors raised while discovering, reading, or writing settings files.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// A settings file or directory could not be read or written.
    #[error("settings I/O failed for {path}: {source}")]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Two files in the same root define the same biome.
    #[error("biome '{name}' is defined twice: {first} and {second}")]
    DuplicateBiome {
        /// Biome name (the file stem).
        name: String,
        /// File seen first.
        first: PathBuf,
        /// File seen second.
        second: PathBuf,
    },
}

impl SettingsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
