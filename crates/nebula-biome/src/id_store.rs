//! Durable biome id records.
//!
//! One RON file per save directory holds the records of every world saved
//! there. The file is always rewritten whole: serialize to a sibling temp
//! file, sync it, then rename over the old copy. A crash mid-write leaves the
//! previous file intact.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// File name of the id store inside a save directory.
pub const BIOME_ID_FILE: &str = "biome_ids.ron";

const FORMAT_VERSION: u32 = 1;

/// Errors reading or writing the id store.
#[derive(Debug, thiserror::Error)]
pub enum IdStoreError {
    /// Failed to read the id file.
    #[error("failed to read biome ids from {path}: {source}")]
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the id file.
    #[error("failed to write biome ids to {path}: {source}")]
    Write {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The id file is not valid RON.
    #[error("failed to parse biome ids: {0}")]
    Parse(#[source] ron::error::SpannedError),

    /// Records could not be serialized.
    #[error("failed to serialize biome ids: {0}")]
    Serialize(#[source] ron::Error),

    /// The file was written by a newer format.
    #[error("unsupported biome id file version {found}, expected {FORMAT_VERSION}")]
    UnsupportedVersion {
        /// Version in the file.
        found: u32,
    },
}

/// One persisted biome identity, keyed by `(world, biome)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedIdRecord {
    /// World the record belongs to.
    pub world: String,
    /// Biome name.
    pub biome: String,
    /// Index into the generation array.
    pub generation_id: u16,
    /// Id written into chunk data. `None` when it is taken from the save target
    /// on every load.
    pub saved_id: Option<u16>,
}

#[derive(Debug, Serialize, Deserialize)]
struct BiomeIdFile {
    version: u32,
    records: Vec<PersistedIdRecord>,
}

/// The id file of one save directory.
#[derive(Clone, Debug)]
pub struct BiomeIdStore {
    path: PathBuf,
}

impl BiomeIdStore {
    /// Store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store backed by [`BIOME_ID_FILE`] inside `save_dir`.
    pub fn in_save_dir(save_dir: &Path) -> Self {
        Self::new(save_dir.join(BIOME_ID_FILE))
    }

    /// Path of the id file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every record. A missing file yields `None`.
    pub fn load(&self) -> Result<Option<Vec<PersistedIdRecord>>, IdStoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(IdStoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        let file: BiomeIdFile = ron::from_str(&contents).map_err(IdStoreError::Parse)?;
        if file.version > FORMAT_VERSION {
            return Err(IdStoreError::UnsupportedVersion { found: file.version });
        }
        tracing::debug!("Read {} biome id records from {}", file.records.len(), self.path.display());
        Ok(Some(file.records))
    }

    /// Records of one world, in file order.
    pub fn load_world(&self, world: &str) -> Result<Vec<PersistedIdRecord>, IdStoreError> {
        Ok(self
            .load()?
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.world == world)
            .collect())
    }

    /// Replaces the whole file with `records`, sorted by world then generation id.
    pub fn save(&self, mut records: Vec<PersistedIdRecord>) -> Result<(), IdStoreError> {
        records.sort_by(|a, b| {
            a.world
                .cmp(&b.world)
                .then(a.generation_id.cmp(&b.generation_id))
                .then_with(|| a.biome.cmp(&b.biome))
        });
        let file = BiomeIdFile {
            version: FORMAT_VERSION,
            records,
        };
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .enumerate_arrays(false);
        let serialized = ron::ser::to_string_pretty(&file, pretty).map_err(IdStoreError::Serialize)?;
        self.write_atomic(serialized.as_bytes())?;
        tracing::debug!("Wrote {} biome id records to {}", file.records.len(), self.path.display());
        Ok(())
    }

    /// Replaces the records of `world`, keeping those of every other world.
    pub fn replace_world(&self, world: &str, records: Vec<PersistedIdRecord>) -> Result<(), IdStoreError> {
        let mut all: Vec<PersistedIdRecord> = self
            .load()?
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.world != world)
            .collect();
        all.extend(records);
        self.save(all)
    }

    fn write_atomic(&self, bytes: &[u8]) -> Result<(), IdStoreError> {
        let write_err = |source| IdStoreError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        File::create(&tmp_path)
            .and_then(|mut file| {
                file.write_all(bytes)?;
                file.sync_all()
            })
            .and_then(|()| fs::rename(&tmp_path, &self.path))
            .inspect_err(|_| {
                // No partial file is left next to the real one.
                let _ = fs::remove_file(&tmp_path);
            })
            .map_err(write_err)
    }
}
