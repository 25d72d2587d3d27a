//! Two-tier biome id allocation and reconciliation with persisted records.
//!
//! Every resolved biome gets a generation id (its slot in the generator's
//! array) and a saved id (what chunk data stores). Biomes without a
//! replace-to target live in the physical range `0..256` and save under their
//! own generation id. Biomes with one are virtual: they live at `256..` and
//! borrow the saved id of their target.
//!
//! The saved ids of the platform's built-in biomes are reserved, so a virtual
//! biome borrowing one never shares it with a world biome.
//!
//! Previously recorded identities are always reclaimed exactly, so ids never
//! move between loads. Records of biomes that no longer exist keep their slot.

use std::collections::{BTreeMap, BTreeSet};

use nebula_config::WorldConfig;

use crate::catalog::DefaultBiomeCatalog;
use crate::config::ResolvedBiomeConfig;
use crate::error::{BiomeLoadError, LoadWarning, push_warning};
use crate::id_store::{BiomeIdStore, PersistedIdRecord};
use crate::identity::{BiomeIdentity, PHYSICAL_BIOME_LIMIT};

/// Outcome of one registration pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Registration {
    /// Identity of every registered biome, by name.
    pub identities: BTreeMap<String, BiomeIdentity>,
    /// Records of this world to persist, orphans included, by generation id.
    pub records: Vec<PersistedIdRecord>,
    /// Recorded biomes that no longer resolve. Their slots stay reserved.
    pub orphaned: Vec<String>,
}

/// Occupancy of one generation id during assignment.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Slot {
    Free,
    /// Saved id of a built-in biome.
    Default,
    Biome(String),
}

/// Allocates [`BiomeIdentity`] values for one world.
pub struct BiomeIdRegistry<'a> {
    world: &'a WorldConfig,
    catalog: &'a dyn DefaultBiomeCatalog,
}

impl<'a> BiomeIdRegistry<'a> {
    /// Registry for `world`, resolving default biomes through `catalog`.
    pub fn new(world: &'a WorldConfig, catalog: &'a dyn DefaultBiomeCatalog) -> Self {
        Self { world, catalog }
    }

    /// Loads this world's records from `store`, assigns identities and writes
    /// the updated records back. Nothing is written if assignment fails.
    pub fn register(
        &self,
        store: &BiomeIdStore,
        configs: &mut [ResolvedBiomeConfig],
        warnings: &mut Vec<LoadWarning>,
    ) -> Result<Registration, BiomeLoadError> {
        let prior = store.load_world(&self.world.name)?;
        let registration = self.assign(configs, &prior, warnings)?;
        store.replace_world(&self.world.name, registration.records.clone())?;
        Ok(registration)
    }

    /// Assigns an identity to every config, reclaiming `prior` records.
    ///
    /// Configs are handled in a fixed order: recorded non-virtual, recorded
    /// virtual, new non-virtual, new virtual, by name within each group.
    /// `configs` may have their replace-to target rewritten to a registry name
    /// when it was given as a legacy display name.
    pub fn assign(
        &self,
        configs: &mut [ResolvedBiomeConfig],
        prior: &[PersistedIdRecord],
        warnings: &mut Vec<LoadWarning>,
    ) -> Result<Registration, BiomeLoadError> {
        let mut prior: Vec<PersistedIdRecord> = prior
            .iter()
            .filter(|r| r.world == self.world.name)
            .cloned()
            .collect();
        if prior.is_empty() {
            self.upgrade_legacy_replace_to(configs);
            prior = self.seed_custom_ids(configs);
        }

        let capacity = self.world.max_biome_slots;
        let physical = capacity.min(usize::from(PHYSICAL_BIOME_LIMIT));
        let mut slots: Vec<Slot> = vec![Slot::Free; capacity];
        let recorded = claim_recorded_slots(&mut slots, prior)?;
        // Recorded biomes may already sit on a default id in older worlds.
        for id in self.catalog.reserved_saved_ids() {
            if let Some(slot) = slots[..physical].get_mut(usize::from(id))
                && *slot == Slot::Free
            {
                *slot = Slot::Default;
            }
        }

        let mut order: Vec<usize> = (0..configs.len()).collect();
        order.sort_by(|&a, &b| configs[a].name.cmp(&configs[b].name));
        // Stable: names stay sorted within each group.
        order.sort_by_key(|&i| (!recorded.contains_key(&configs[i].name), configs[i].is_virtual()));

        let mut next_physical = 0;
        let mut next_virtual = physical;
        let mut assigned: Vec<(usize, u16)> = Vec::with_capacity(order.len());
        for i in order {
            let name = &configs[i].name;
            let generation_id = match recorded.get(name) {
                Some(record) => record.generation_id,
                None if !configs[i].is_virtual() => take_free_slot(&mut slots, &mut next_physical, physical, name)
                    .ok_or_else(|| BiomeLoadError::NoFreeBiomeIds {
                        biome: name.clone(),
                        start: 0,
                        end: physical,
                    })?,
                None => take_free_slot(&mut slots, &mut next_virtual, capacity, name).ok_or_else(|| {
                    BiomeLoadError::NoFreeBiomeIds {
                        biome: name.clone(),
                        start: physical,
                        end: capacity,
                    }
                })?,
            };
            assigned.push((i, generation_id));
        }

        // Biomes a replace-to target may name: physical and saved under their own id.
        let owners: BTreeMap<String, u16> = assigned
            .iter()
            .filter(|&&(i, id)| id < PHYSICAL_BIOME_LIMIT && !configs[i].is_virtual())
            .map(|&(i, id)| (configs[i].name.clone(), id))
            .collect();

        let mut registration = Registration::default();
        for (i, generation_id) in assigned {
            let record = recorded.get(&configs[i].name);
            let config = &mut configs[i];
            let saved_id = self.resolve_saved_id(config, generation_id, record, &owners, &slots, warnings)?;
            let identity = BiomeIdentity::new(generation_id, saved_id);
            tracing::trace!(
                "Biome {} registered with generation id {} and saved id {}",
                config.name,
                generation_id,
                saved_id
            );
            registration.identities.insert(config.name.clone(), identity);
            registration.records.push(PersistedIdRecord {
                world: self.world.name.clone(),
                biome: config.name.clone(),
                generation_id,
                saved_id: Some(saved_id),
            });
        }

        for (name, record) in recorded {
            if !registration.identities.contains_key(&name) {
                tracing::debug!(
                    "Keeping generation id {} reserved for missing biome {}",
                    record.generation_id,
                    name
                );
                registration.orphaned.push(name);
                registration.records.push(record);
            }
        }
        registration.records.sort_by_key(|r| r.generation_id);
        Ok(registration)
    }

    /// Saved id of a config at `generation_id`. A recorded saved id is kept
    /// as is, so chunks written by earlier loads keep reading back as the
    /// same biome.
    fn resolve_saved_id(
        &self,
        config: &mut ResolvedBiomeConfig,
        generation_id: u16,
        record: Option<&PersistedIdRecord>,
        owners: &BTreeMap<String, u16>,
        slots: &[Slot],
        warnings: &mut Vec<LoadWarning>,
    ) -> Result<u16, BiomeLoadError> {
        if generation_id < PHYSICAL_BIOME_LIMIT && !config.is_virtual() {
            return Ok(generation_id);
        }
        if let Some(target) = config.replace_to_name.clone()
            && !owners.contains_key(&target)
            && self.catalog.saved_id(&target).is_none()
            && let Some(registry_name) = self.catalog.registry_name_for_legacy(&target)
        {
            tracing::debug!(
                "Biome {} replace-to target {} translated to {}",
                config.name,
                target,
                registry_name
            );
            config.replace_to_name = Some(registry_name);
        }
        if let Some(saved_id) = record
            .and_then(|r| r.saved_id)
            .filter(|&id| id < PHYSICAL_BIOME_LIMIT)
        {
            return Ok(saved_id);
        }

        let Some(target) = config.replace_to_name.clone() else {
            return self.fall_back_to_ocean(&config.name, "", owners, slots, warnings);
        };
        match self.save_target_id(&target, owners, slots) {
            Some(saved_id) => Ok(saved_id),
            None => self.fall_back_to_ocean(&config.name, &target, owners, slots, warnings),
        }
    }

    /// Saved id a virtual biome may borrow from `name`: a world biome's own id,
    /// or a built-in biome's id that no world biome holds.
    fn save_target_id(&self, name: &str, owners: &BTreeMap<String, u16>, slots: &[Slot]) -> Option<u16> {
        if let Some(&saved_id) = owners.get(name) {
            return Some(saved_id);
        }
        let saved_id = self.catalog.saved_id(name)?;
        match slots.get(usize::from(saved_id)) {
            None | Some(Slot::Default) => Some(saved_id),
            Some(_) => {
                tracing::debug!("Saved id {} of {} is already taken", saved_id, name);
                None
            }
        }
    }

    fn fall_back_to_ocean(
        &self,
        biome: &str,
        target: &str,
        owners: &BTreeMap<String, u16>,
        slots: &[Slot],
        warnings: &mut Vec<LoadWarning>,
    ) -> Result<u16, BiomeLoadError> {
        let ocean = &self.world.default_ocean_biome;
        let saved_id = self.save_target_id(ocean, owners, slots).or_else(|| {
            self.catalog
                .registry_name_for_legacy(ocean)
                .and_then(|name| self.save_target_id(&name, owners, slots))
        });
        match saved_id {
            Some(saved_id) => {
                push_warning(
                    warnings,
                    LoadWarning::SaveTargetFallback {
                        biome: biome.to_string(),
                        target: target.to_string(),
                        fallback: ocean.clone(),
                    },
                );
                Ok(saved_id)
            }
            None => {
                let err = BiomeLoadError::UnresolvedSaveTarget {
                    biome: biome.to_string(),
                    target: target.to_string(),
                };
                tracing::error!("{}", err);
                Err(err)
            }
        }
    }

    /// Worlds created before registry names existed give replace-to targets as
    /// display names. Only done for worlds without records.
    fn upgrade_legacy_replace_to(&self, configs: &mut [ResolvedBiomeConfig]) {
        let names: BTreeSet<String> = configs.iter().map(|c| c.name.clone()).collect();
        for config in configs.iter_mut() {
            let upgraded = config
                .replace_to_name
                .as_deref()
                .filter(|target| !names.contains(*target))
                .and_then(|target| self.catalog.registry_name_for_legacy(target));
            if let Some(registry_name) = upgraded {
                tracing::debug!(
                    "Biome {} replace-to target upgraded to {}",
                    config.name,
                    registry_name
                );
                config.replace_to_name = Some(registry_name);
            }
        }
    }

    /// Turns `world.custom_biome_ids` into records for worlds that predate the
    /// id file.
    fn seed_custom_ids(&self, configs: &[ResolvedBiomeConfig]) -> Vec<PersistedIdRecord> {
        self.world
            .custom_biome_ids
            .iter()
            .filter_map(|(name, &id)| {
                let Some(config) = configs.iter().find(|c| &c.name == name) else {
                    tracing::debug!("Ignoring custom id {} of unknown biome {}", id, name);
                    return None;
                };
                Some(PersistedIdRecord {
                    world: self.world.name.clone(),
                    biome: name.clone(),
                    generation_id: id,
                    saved_id: (id < PHYSICAL_BIOME_LIMIT && !config.is_virtual()).then_some(id),
                })
            })
            .collect()
    }
}

/// Reserves the slot of every record. Returns the records by biome name.
fn claim_recorded_slots(
    slots: &mut [Slot],
    mut prior: Vec<PersistedIdRecord>,
) -> Result<BTreeMap<String, PersistedIdRecord>, BiomeLoadError> {
    prior.sort_by(|a, b| a.generation_id.cmp(&b.generation_id).then_with(|| a.biome.cmp(&b.biome)));

    let mut recorded: BTreeMap<String, PersistedIdRecord> = BTreeMap::new();
    for record in prior {
        let slot = usize::from(record.generation_id);
        if slot >= slots.len() {
            return Err(BiomeLoadError::RecordOutOfRange {
                biome: record.biome,
                generation_id: record.generation_id,
                capacity: slots.len(),
            });
        }
        if let Some(first) = recorded.get(&record.biome)
            && first.generation_id != record.generation_id
        {
            return Err(BiomeLoadError::ConflictingRecords {
                biome: record.biome,
                first: first.generation_id,
                second: record.generation_id,
            });
        }
        match &slots[slot] {
            // Same biome recorded twice: the world was unloaded and loaded again.
            Slot::Biome(owner) if *owner == record.biome => {
                tracing::trace!("Biome {} reclaims generation id {}", owner, slot);
            }
            Slot::Biome(owner) => {
                let err = BiomeLoadError::IdentityConflict {
                    generation_id: record.generation_id,
                    existing: owner.clone(),
                    claimant: record.biome,
                };
                tracing::error!("{}", err);
                return Err(err);
            }
            Slot::Free | Slot::Default => {}
        }
        slots[slot] = Slot::Biome(record.biome.clone());
        recorded.insert(record.biome.clone(), record);
    }
    Ok(recorded)
}

/// Takes the lowest free slot in `*cursor..end`.
fn take_free_slot(slots: &mut [Slot], cursor: &mut usize, end: usize, name: &str) -> Option<u16> {
    while *cursor < end {
        let slot = *cursor;
        *cursor += 1;
        if slots[slot] == Slot::Free {
            slots[slot] = Slot::Biome(name.to_string());
            return Some(slot as u16);
        }
    }
    None
}
