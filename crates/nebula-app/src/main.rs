//! `nebula-biomes`: loads a world's biome configs, registers their ids and
//! prints the resulting table.

mod platform;
mod summary;

use std::process::ExitCode;

use clap::Parser;
use nebula_biome::BiomeConfigProvider;
use nebula_config::{CliArgs, Config};

use crate::platform::PlatformDirs;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let dirs = match PlatformDirs::resolve() {
        Ok(dirs) => dirs.with_config_override(args.config.as_deref()),
        Err(e) => {
            eprintln!("Failed to resolve platform directories: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = dirs.create_dirs() {
        eprintln!("Failed to create platform directories: {e}");
        return ExitCode::FAILURE;
    }

    let mut config = match Config::load_or_create(&dirs.config_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config from {}: {e}", dirs.config_dir.display());
            return ExitCode::FAILURE;
        }
    };
    config.apply_cli_overrides(&args);
    if let Err(e) = config.validate() {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    nebula_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));
    tracing::info!(
        "Loading biomes of world {} from {}",
        config.world.name,
        config.paths.settings_dir.display()
    );

    match BiomeConfigProvider::from_config(&config) {
        Ok((provider, report)) => {
            print!("{}", summary::render_summary(&provider.index(), &report));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
