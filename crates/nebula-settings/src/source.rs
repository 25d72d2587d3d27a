//! Discovery of biome settings documents.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::{SettingsError, SettingsMap, read_settings_file};

/// Directory inside a world preset that holds its biome configs.
pub const WORLD_BIOMES_DIR: &str = "WorldBiomes";

/// Folder name used by older presets.
pub const LEGACY_BIOMES_DIR: &str = "BiomeConfigs";

/// One discovered settings document.
#[derive(Clone, Debug, PartialEq)]
pub struct SettingsSourceEntry {
    /// Biome name.
    pub name: String,
    /// File the document was read from, if it came from disk.
    pub path: Option<PathBuf>,
    /// Raw settings.
    pub settings: SettingsMap,
}

/// Something that can list the settings documents of a world.
pub trait SettingsSource {
    /// Returns every document, sorted by name, one per biome name.
    fn list_settings_sources(&self) -> Result<Vec<SettingsSourceEntry>, SettingsError>;
}

// ---------------------------------------------------------------------------
// Directory source
// ---------------------------------------------------------------------------

/// Scans biome directories recursively for files with a given extension.
///
/// Roots are searched in order and the first root defining a biome name wins,
/// so world-local biomes shadow shared ones. The same name twice inside one
/// root is an error.
#[derive(Clone, Debug)]
pub struct DirectorySource {
    roots: Vec<PathBuf>,
    extension: String,
}

impl DirectorySource {
    /// Source over explicit roots.
    pub fn new(roots: Vec<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            roots,
            extension: extension.into(),
        }
    }

    /// Source for a world preset: its biome folder first, then the optional
    /// shared folder.
    pub fn for_world(settings_dir: &Path, global_dir: Option<&Path>, extension: &str) -> Self {
        let mut roots = vec![world_biomes_dir(settings_dir)];
        if let Some(global) = global_dir {
            roots.push(global.to_path_buf());
        }
        Self::new(roots, extension)
    }

    /// Directories searched, in precedence order.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    fn collect_files(&self, dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), SettingsError> {
        let entries = std::fs::read_dir(dir).map_err(|e| SettingsError::io(dir, e))?;
        for entry in entries {
            let path = entry.map_err(|e| SettingsError::io(dir, e))?.path();
            if path.is_dir() {
                self.collect_files(&path, out)?;
            } else if path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(&self.extension) && n.len() > self.extension.len())
            {
                out.push(path);
            }
        }
        Ok(())
    }

    fn biome_name(&self, path: &Path) -> Option<String> {
        let file_name = path.file_name()?.to_str()?;
        file_name
            .strip_suffix(&self.extension)
            .map(str::to_string)
    }
}

impl SettingsSource for DirectorySource {
    fn list_settings_sources(&self) -> Result<Vec<SettingsSourceEntry>, SettingsError> {
        let mut found: BTreeMap<String, SettingsSourceEntry> = BTreeMap::new();

        for root in &self.roots {
            if !root.is_dir() {
                tracing::debug!("Biome folder {} does not exist, skipping", root.display());
                continue;
            }

            let mut files = Vec::new();
            self.collect_files(root, &mut files)?;
            files.sort();

            let mut in_root: BTreeMap<String, PathBuf> = BTreeMap::new();
            for path in files {
                let Some(name) = self.biome_name(&path) else {
                    continue;
                };
                if let Some(first) = in_root.get(&name) {
                    return Err(SettingsError::DuplicateBiome {
                        name,
                        first: first.clone(),
                        second: path,
                    });
                }
                in_root.insert(name.clone(), path.clone());

                if found.contains_key(&name) {
                    tracing::debug!(
                        "Biome {} from {} is shadowed by an earlier folder",
                        name,
                        path.display()
                    );
                    continue;
                }
                let settings = read_settings_file(&name, &path)?;
                found.insert(
                    name.clone(),
                    SettingsSourceEntry {
                        name,
                        path: Some(path),
                        settings,
                    },
                );
            }
        }

        Ok(found.into_values().collect())
    }
}

/// The biome folder of a preset, accepting the legacy folder name.
pub fn world_biomes_dir(settings_dir: &Path) -> PathBuf {
    let current = settings_dir.join(WORLD_BIOMES_DIR);
    let legacy = settings_dir.join(LEGACY_BIOMES_DIR);
    if !current.is_dir() && legacy.is_dir() {
        tracing::warn!(
            "Using legacy biome folder {}; rename it to {}",
            legacy.display(),
            WORLD_BIOMES_DIR
        );
        return legacy;
    }
    current
}

// ---------------------------------------------------------------------------
// In-memory source
// ---------------------------------------------------------------------------

/// Settings documents held in memory. Useful for embedding and tests.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    entries: BTreeMap<String, SettingsMap>,
}

impl MemorySource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the document `name` built from `pairs`.
    pub fn with<K, V>(mut self, name: &str, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.insert(name, pairs);
        self
    }

    /// Adds (or replaces) the document `name` built from `pairs`.
    pub fn insert<K, V>(&mut self, name: &str, pairs: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.entries
            .insert(name.to_string(), SettingsMap::from_pairs(name, pairs));
    }

    /// Removes the document `name`.
    pub fn remove(&mut self, name: &str) -> Option<SettingsMap> {
        self.entries.remove(name)
    }
}

impl SettingsSource for MemorySource {
    fn list_settings_sources(&self) -> Result<Vec<SettingsSourceEntry>, SettingsError> {
        Ok(self
            .entries
            .iter()
            .map(|(name, settings)| SettingsSourceEntry {
                name: name.clone(),
                path: None,
                settings: settings.clone(),
            })
            .collect())
    }
}
