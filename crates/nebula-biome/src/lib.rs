//! Biome configuration pipeline: `extends`/`inherit-mobs` resolution, stable
//! two-tier biome ids persisted per world, and the published lookup index the
//! generator reads every tick.
//!
//! Data flows one way: settings documents → [`SettingsStub`]s → resolved
//! [`ResolvedBiomeConfig`]s → [`BiomeIdentity`] assignment → [`BiomeIndex`].
//! [`BiomeConfigProvider`] runs the whole pass and swaps the finished index in.

pub mod catalog;
mod config;
mod error;
pub mod id_registry;
pub mod id_store;
mod identity;
mod index;
pub mod inheritance;
pub mod mob_inheritance;
pub mod mobs;
mod provider;
pub mod schema;
mod stub;

pub use catalog::{DefaultBiomeCatalog, VanillaBiomeCatalog};
pub use config::{BlockReplacement, ResolvedBiomeConfig};
pub use error::{BiomeLoadError, ErrorKind, LoadWarning};
pub use id_registry::{BiomeIdRegistry, Registration};
pub use id_store::{BIOME_ID_FILE, BiomeIdStore, IdStoreError, PersistedIdRecord};
pub use identity::{BiomeIdentity, MAX_INHERITANCE_DEPTH, PHYSICAL_BIOME_LIMIT};
pub use index::{BiomeIndex, RegisteredBiome, WorldBiomeStats};
pub use mobs::{MobGroup, MobSpawnEntry, MobSpawnTable};
pub use provider::{BiomeConfigProvider, LoadReport};
pub use stub::SettingsStub;
