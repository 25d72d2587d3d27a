//! Published, read-only lookup tables of a loaded world.

use std::collections::BTreeMap;
use std::sync::Arc;

use hashbrown::HashMap;
use nebula_config::{BiomeMode, WorldConfig};

use crate::config::ResolvedBiomeConfig;
use crate::identity::{BiomeIdentity, PHYSICAL_BIOME_LIMIT};

/// A resolved biome together with its identity.
#[derive(Debug)]
pub struct RegisteredBiome {
    /// Generation and saved id.
    pub identity: BiomeIdentity,
    /// Resolved configuration.
    pub config: Arc<ResolvedBiomeConfig>,
}

/// Aggregates over every registered biome of a world.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorldBiomeStats {
    /// Largest smoothing radius of any biome.
    pub max_smooth_radius: i32,
    /// Whether any biome has block replacement rules.
    pub has_replaced_blocks: bool,
    /// Biome color → generation id, only for image-driven worlds.
    pub color_map: Option<BTreeMap<u32, u16>>,
}

/// Generation-id and saved-id arrays plus a name map. Built whole per load
/// and never mutated afterwards.
#[derive(Debug)]
pub struct BiomeIndex {
    world: String,
    by_generation_id: Vec<Option<Arc<RegisteredBiome>>>,
    by_saved_id: Vec<Option<Arc<RegisteredBiome>>>,
    by_name: HashMap<String, Arc<RegisteredBiome>>,
    stats: WorldBiomeStats,
}

impl BiomeIndex {
    /// An index with no biomes, published before the first load.
    pub fn empty(world: &WorldConfig) -> Self {
        Self {
            world: world.name.clone(),
            by_generation_id: vec![None; world.max_biome_slots],
            by_saved_id: vec![None; usize::from(PHYSICAL_BIOME_LIMIT)],
            by_name: HashMap::new(),
            stats: WorldBiomeStats::default(),
        }
    }

    /// Builds the index from resolved configs and their identities. Configs
    /// without an identity are left out.
    pub fn build(
        world: &WorldConfig,
        configs: Vec<ResolvedBiomeConfig>,
        identities: &BTreeMap<String, BiomeIdentity>,
    ) -> Self {
        let mut index = Self::empty(world);

        let mut registered: Vec<Arc<RegisteredBiome>> = configs
            .into_iter()
            .filter_map(|config| {
                let identity = *identities.get(&config.name)?;
                Some(Arc::new(RegisteredBiome {
                    identity,
                    config: Arc::new(config),
                }))
            })
            .collect();
        registered.sort_by_key(|biome| biome.identity.generation_id);

        let mut color_map = (world.biome_mode == BiomeMode::FromImage).then(BTreeMap::new);
        for biome in registered {
            let identity = biome.identity;
            let config = &biome.config;

            index.stats.max_smooth_radius = index.stats.max_smooth_radius.max(config.smooth_radius);
            index.stats.has_replaced_blocks |= config.has_replaced_blocks();
            if let Some(colors) = color_map.as_mut()
                && let Some(previous) = colors.insert(config.biome_color, identity.generation_id)
            {
                // Lowest generation id keeps the color.
                colors.insert(config.biome_color, previous);
                tracing::debug!(
                    "Biome {} shares color {:06X} with generation id {}",
                    config.name,
                    config.biome_color,
                    previous
                );
            }

            if let Some(slot) = index.by_generation_id.get_mut(usize::from(identity.generation_id)) {
                *slot = Some(Arc::clone(&biome));
            }
            if identity.owns_saved_id()
                && let Some(slot) = index.by_saved_id.get_mut(usize::from(identity.saved_id))
            {
                *slot = Some(Arc::clone(&biome));
            }
            index.by_name.insert(config.name.clone(), biome);
        }
        index.stats.color_map = color_map;
        index
    }

    /// World the index belongs to.
    pub fn world(&self) -> &str {
        &self.world
    }

    /// Size of the generation array.
    pub fn capacity(&self) -> usize {
        self.by_generation_id.len()
    }

    /// Biome at a generation id.
    pub fn biome_by_generation_id(&self, id: u16) -> Option<&Arc<RegisteredBiome>> {
        self.by_generation_id.get(usize::from(id))?.as_ref()
    }

    /// Biome stored under a saved id.
    pub fn biome_by_saved_id(&self, id: u16) -> Option<&Arc<RegisteredBiome>> {
        self.by_saved_id.get(usize::from(id))?.as_ref()
    }

    /// Config at a generation id.
    pub fn config_by_generation_id(&self, id: u16) -> Option<&Arc<ResolvedBiomeConfig>> {
        self.biome_by_generation_id(id).map(|b| &b.config)
    }

    /// Config stored under a saved id.
    pub fn config_by_saved_id(&self, id: u16) -> Option<&Arc<ResolvedBiomeConfig>> {
        self.biome_by_saved_id(id).map(|b| &b.config)
    }

    /// Biome by name.
    pub fn by_name(&self, name: &str) -> Option<&Arc<RegisteredBiome>> {
        self.by_name.get(name)
    }

    /// Number of registered biomes.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Returns `true` if no biome is registered.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Registered biomes in generation id order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<RegisteredBiome>> {
        self.by_generation_id.iter().flatten()
    }

    /// World aggregates.
    pub fn stats(&self) -> &WorldBiomeStats {
        &self.stats
    }
}
