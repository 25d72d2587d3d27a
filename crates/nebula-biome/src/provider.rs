//! Per-world load pipeline and the published biome index.
//!
//! A load runs discovery, `extends` and `inherit-mobs` resolution, id
//! registration and persistence to completion before anything is published.
//! Readers always see either the previous index or the complete new one.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;

use arc_swap::ArcSwap;
use nebula_config::{Config, WorldConfig};
use nebula_settings::{DirectorySource, SettingsSource, write_settings_file};

use crate::catalog::{DefaultBiomeCatalog, VanillaBiomeCatalog};
use crate::config::ResolvedBiomeConfig;
use crate::error::{BiomeLoadError, LoadWarning};
use crate::id_registry::BiomeIdRegistry;
use crate::id_store::BiomeIdStore;
use crate::index::BiomeIndex;
use crate::inheritance::resolve_inheritance;
use crate::mob_inheritance::resolve_mob_inheritance;
use crate::schema;
use crate::stub::SettingsStub;

/// Summary of a successful load.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// World name.
    pub world: String,
    /// Number of registered biomes.
    pub biome_count: usize,
    /// Registered biome names, sorted.
    pub biome_names: Vec<String>,
    /// How many of them are virtual.
    pub virtual_count: usize,
    /// Recorded biomes that no longer resolve.
    pub orphaned: Vec<String>,
    /// Everything that degraded a biome without failing the load.
    pub warnings: Vec<LoadWarning>,
}

/// Loads a world's biome configs and publishes the lookup index.
pub struct BiomeConfigProvider {
    world: WorldConfig,
    write_inherited: bool,
    source: Box<dyn SettingsSource + Send + Sync>,
    catalog: Arc<dyn DefaultBiomeCatalog>,
    store: BiomeIdStore,
    index: ArcSwap<BiomeIndex>,
}

impl BiomeConfigProvider {
    /// Creates a provider with an empty index. Call [`Self::load`] to fill it.
    pub fn new(
        world: WorldConfig,
        source: impl SettingsSource + Send + Sync + 'static,
        catalog: Arc<dyn DefaultBiomeCatalog>,
        store: BiomeIdStore,
    ) -> Self {
        let index = ArcSwap::from_pointee(BiomeIndex::empty(&world));
        Self {
            world,
            write_inherited: false,
            source: Box::new(source),
            catalog,
            store,
            index,
        }
    }

    /// Also write each extending biome's flattened settings next to its file.
    pub fn with_write_inherited(mut self, write_inherited: bool) -> Self {
        self.write_inherited = write_inherited;
        self
    }

    /// Provider for the world described by `config`, loaded once.
    ///
    /// Biome files come from the world's biome folder (plus the global folder,
    /// if set), ids are stored in the save directory.
    pub fn from_config(config: &Config) -> Result<(Self, LoadReport), BiomeLoadError> {
        let source = DirectorySource::for_world(
            &config.paths.settings_dir,
            config.paths.global_biomes_dir.as_deref(),
            &config.biomes.config_extension,
        );
        let provider = Self::new(
            config.world.clone(),
            source,
            Arc::new(VanillaBiomeCatalog),
            BiomeIdStore::in_save_dir(&config.paths.save_dir),
        )
        .with_write_inherited(config.biomes.write_inherited);
        let report = provider.load()?;
        Ok((provider, report))
    }

    /// World this provider serves.
    pub fn world(&self) -> &WorldConfig {
        &self.world
    }

    /// Runs the full pipeline and publishes the result. On error the current
    /// index stays published and the id file is left untouched.
    pub fn load(&self) -> Result<LoadReport, BiomeLoadError> {
        let (index, report) = self.run_pipeline().inspect_err(|e| {
            tracing::error!("Loading biomes of world {} failed: {}", self.world.name, e);
        })?;
        self.index.store(Arc::new(index));
        tracing::debug!("{} biomes loaded", report.biome_count);
        tracing::info!(
            "World {}: {} biomes ({} virtual), {} warnings",
            report.world,
            report.biome_count,
            report.virtual_count,
            report.warnings.len()
        );
        Ok(report)
    }

    /// Re-reads every biome file and rebuilds the index, reusing the stored
    /// ids. A failed reload keeps the world running on the previous index.
    pub fn reload(&self) -> Result<LoadReport, BiomeLoadError> {
        tracing::info!("Reloading biome configs of world {}", self.world.name);
        self.load().inspect_err(|_| {
            tracing::warn!("Keeping previously loaded biomes of world {}", self.world.name);
        })
    }

    /// The currently published index.
    pub fn index(&self) -> Arc<BiomeIndex> {
        self.index.load_full()
    }

    /// Config at a generation id.
    pub fn config_by_generation_id(&self, id: u16) -> Option<Arc<ResolvedBiomeConfig>> {
        self.index.load().config_by_generation_id(id).cloned()
    }

    /// Config stored under a saved id.
    pub fn config_by_saved_id(&self, id: u16) -> Option<Arc<ResolvedBiomeConfig>> {
        self.index.load().config_by_saved_id(id).cloned()
    }

    fn run_pipeline(&self) -> Result<(BiomeIndex, LoadReport), BiomeLoadError> {
        let mut warnings = Vec::new();

        let mut stubs: BTreeMap<String, SettingsStub> = BTreeMap::new();
        for entry in self.source.list_settings_sources()? {
            let stub = SettingsStub::new(entry, &mut warnings);
            let unknown = schema::unknown_keys(stub.own_settings());
            if !unknown.is_empty() {
                tracing::trace!("Biome {} has unrecognised settings: {:?}", stub.name(), unknown);
            }
            stubs.insert(stub.name().to_string(), stub);
        }

        let names: Vec<String> = stubs.keys().cloned().collect();
        for name in &names {
            resolve_inheritance(&mut stubs, name, 0, &mut warnings)?;
        }
        for name in &names {
            resolve_mob_inheritance(&mut stubs, name, 0, self.catalog.as_ref(), &mut warnings)?;
        }

        let mut configs: Vec<ResolvedBiomeConfig> = stubs
            .values()
            .map(|stub| ResolvedBiomeConfig::from_stub(stub, &mut warnings))
            .collect();
        drop(stubs);

        let registration = BiomeIdRegistry::new(&self.world, self.catalog.as_ref()).register(
            &self.store,
            &mut configs,
            &mut warnings,
        )?;

        if self.write_inherited {
            write_inherited_configs(&configs);
        }

        let report = LoadReport {
            world: self.world.name.clone(),
            biome_count: registration.identities.len(),
            biome_names: registration.identities.keys().cloned().collect(),
            virtual_count: registration.identities.values().filter(|id| id.is_virtual()).count(),
            orphaned: registration.orphaned,
            warnings,
        };
        let index = BiomeIndex::build(&self.world, configs, &registration.identities);
        Ok((index, report))
    }
}

/// Writes `<file>.inherited` for every biome that extends another. Failures
/// are logged; the files are informational only.
fn write_inherited_configs(configs: &[ResolvedBiomeConfig]) {
    for config in configs.iter().filter(|c| c.extends_another()) {
        let Some(source) = &config.source else {
            continue;
        };
        let path = inherited_path(source);
        match write_settings_file(&config.effective_settings(), &path) {
            Ok(()) => tracing::trace!("Wrote {}", path.display()),
            Err(e) => tracing::warn!("Could not write inherited config for biome {}: {}", config.name, e),
        }
    }
}

fn inherited_path(source: &std::path::Path) -> PathBuf {
    let mut name = OsString::from(source.as_os_str());
    name.push(".inherited");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nebula_settings::MemorySource;

    fn provider(source: MemorySource, save_dir: &std::path::Path) -> BiomeConfigProvider {
        BiomeConfigProvider::new(
            WorldConfig::default(),
            source,
            Arc::new(VanillaBiomeCatalog),
            BiomeIdStore::in_save_dir(save_dir),
        )
    }

    #[test]
    fn test_empty_before_load() {
        let dir = tempfile::tempdir().unwrap();
        let provider = provider(MemorySource::new(), dir.path());
        assert!(provider.index().is_empty());
        assert!(provider.config_by_generation_id(0).is_none());
    }

    #[test]
    fn test_load_publishes_resolved_configs() {
        let dir = tempfile::tempdir().unwrap();
        let source = MemorySource::new()
            .with("Alps", [("SmoothRadius", "5"), ("BiomeTemperature", "0.1")])
            .with("Alps Peaks", [("extends", "Alps"), ("ReplaceToBiomeName", "Alps")])
            .with("Plains Extra", [("inherit-mobs", "Plains")]);
        let provider = provider(source, dir.path());

        let report = provider.load().unwrap();
        assert_eq!(report.biome_count, 3);
        assert_eq!(report.virtual_count, 1);
        assert!(report.warnings.is_empty());

        let peaks = provider.config_by_generation_id(256).unwrap();
        assert_eq!(peaks.name, "Alps Peaks");
        assert_eq!(peaks.smooth_radius, 5);
        assert_eq!(provider.config_by_saved_id(40).unwrap().name, "Alps");
        assert!(provider.index().by_name("Plains Extra").unwrap().config.mob_spawns.contains_mob("minecraft:horse"));
        assert_eq!(provider.index().stats().max_smooth_radius, 5);
        assert!(BiomeIdStore::in_save_dir(dir.path()).path().exists());
    }

    #[test]
    fn test_warnings_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let source = MemorySource::new().with("Alps", [("extends", "Nowhere")]);
        let report = provider(source, dir.path()).load().unwrap();
        assert_eq!(
            report.warnings,
            vec![LoadWarning::MissingParent {
                biome: "Alps".into(),
                parent: "Nowhere".into(),
            }]
        );
    }

    #[test]
    fn test_inherited_path() {
        assert_eq!(
            inherited_path(std::path::Path::new("biomes/Alps.bc")),
            PathBuf::from("biomes/Alps.bc.inherited")
        );
    }
}
