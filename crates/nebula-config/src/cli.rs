//! Command-line argument parsing for the biome tools.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "nebula-biomes", about = "Load and register a world's biome configs")]
pub struct CliArgs {
    /// World name (keys the persisted biome ids).
    #[arg(long)]
    pub world: Option<String>,

    /// World preset directory containing `WorldBiomes/`.
    #[arg(long)]
    pub settings_dir: Option<PathBuf>,

    /// World save directory holding the biome id file.
    #[arg(long)]
    pub save_dir: Option<PathBuf>,

    /// Write `<file>.inherited` for biomes that extend another biome.
    #[arg(long)]
    pub write_inherited: Option<bool>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref world) = args.world {
            self.world.name = world.clone();
        }
        if let Some(ref dir) = args.settings_dir {
            self.paths.settings_dir = dir.clone();
        }
        if let Some(ref dir) = args.save_dir {
            self.paths.save_dir = dir.clone();
        }
        if let Some(write) = args.write_inherited {
            self.biomes.write_inherited = write;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
