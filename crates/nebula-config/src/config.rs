//! Configuration structs with sensible defaults and RON persistence.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Generation-id capacity used when the platform does not say otherwise.
pub const DEFAULT_MAX_BIOME_SLOTS: usize = 1024;

/// Number of biome ids the save format can physically store.
const PHYSICAL_SAVE_SLOTS: usize = 256;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// World identity and biome-id policy.
    pub world: WorldConfig,
    /// Where presets, shared biomes, and save data live.
    pub paths: PathsConfig,
    /// Biome file loading options.
    pub biomes: BiomesConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// How the generator picks biomes for a world.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum BiomeMode {
    /// Noise-driven biome layers.
    #[default]
    Normal,
    /// Biomes are painted from an image; each biome color maps to a biome.
    FromImage,
}

/// World configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// World name. Persisted biome ids are keyed by it.
    pub name: String,
    /// Biome whose identity backs virtual biomes with no resolvable save target.
    pub default_ocean_biome: String,
    /// Biome selection mode.
    pub biome_mode: BiomeMode,
    /// Size of the generation-id array supplied by the platform.
    pub max_biome_slots: usize,
    /// Legacy `name -> generation id` assignments from worlds that predate
    /// the biome id file. Only consulted when no records exist for the world.
    pub custom_biome_ids: BTreeMap<String, u16>,
}

/// Filesystem locations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    /// World preset directory (contains `WorldBiomes/`).
    pub settings_dir: PathBuf,
    /// Optional biome folder shared by every world.
    pub global_biomes_dir: Option<PathBuf>,
    /// World save folder holding the biome id file.
    pub save_dir: PathBuf,
}

/// Biome loading options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BiomesConfig {
    /// File extension of biome config files, including the leading dot.
    pub config_extension: String,
    /// Write flattened settings of extending biomes next to the source as
    /// `<file>.inherited`.
    pub write_inherited: bool,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: "world".to_string(),
            default_ocean_biome: "Ocean".to_string(),
            biome_mode: BiomeMode::Normal,
            max_biome_slots: DEFAULT_MAX_BIOME_SLOTS,
            custom_biome_ids: BTreeMap::new(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            settings_dir: PathBuf::from("presets/world"),
            global_biomes_dir: None,
            save_dir: PathBuf::from("saves/world"),
        }
    }
}

impl Default for BiomesConfig {
    fn default() -> Self {
        Self {
            config_extension: ".bc".to_string(),
            write_inherited: false,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            config.validate()?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
        new_config.validate()?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Reject values that would make biome registration impossible.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world.name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "world.name",
                reason: "must not be empty".to_string(),
            });
        }
        if self.world.max_biome_slots < PHYSICAL_SAVE_SLOTS
            || self.world.max_biome_slots > u16::MAX as usize + 1
        {
            return Err(ConfigError::InvalidValue {
                field: "world.max_biome_slots",
                reason: format!(
                    "{} is outside {PHYSICAL_SAVE_SLOTS}..={}",
                    self.world.max_biome_slots,
                    u16::MAX as usize + 1
                ),
            });
        }
        if !self.biomes.config_extension.starts_with('.') || self.biomes.config_extension.len() < 2
        {
            return Err(ConfigError::InvalidValue {
                field: "biomes.config_extension",
                reason: format!("{:?} must look like \".bc\"", self.biomes.config_extension),
            });
        }
        Ok(())
    }
}
