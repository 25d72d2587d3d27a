//! Configuration system for the Nebula biome pipeline.
//!
//! Provides world, path, and biome-loading settings that persist to disk as RON
//! files. Supports CLI overrides via clap, hot-reload detection, and
//! forward/backward compatible serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    BiomeMode, BiomesConfig, Config, DebugConfig, PathsConfig, WorldConfig,
    DEFAULT_MAX_BIOME_SLOTS,
};
pub use error::ConfigError;
