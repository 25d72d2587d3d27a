//! Fully resolved, immutable biome configuration.

use std::path::PathBuf;

use nebula_settings::{InvalidSetting, SettingsMap};

use crate::error::{LoadWarning, push_warning};
use crate::mobs::{MobGroup, MobSpawnTable, render_mob_list};
use crate::schema;
use crate::stub::SettingsStub;

/// One block replacement rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockReplacement {
    /// Block to replace.
    pub from: String,
    /// Replacement block.
    pub to: String,
    /// Lowest affected y (inclusive).
    pub min_y: i32,
    /// Highest affected y (inclusive).
    pub max_y: i32,
}

/// A biome's settings after `extends` and `inherit-mobs` resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedBiomeConfig {
    /// Biome name.
    pub name: String,
    /// File the biome was read from.
    pub source: Option<PathBuf>,
    /// Own settings flattened over the `extends` chain.
    pub settings: SettingsMap,
    /// Ancestors flattened into `settings`, nearest first.
    pub inheritance_chain: Vec<String>,
    /// Biome whose saved id this one borrows. `Some` makes the biome virtual.
    pub replace_to_name: Option<String>,
    /// Own spawn rules merged with all `inherit-mobs` parents.
    pub mob_spawns: MobSpawnTable,
    /// Border smoothing radius.
    pub smooth_radius: i32,
    /// Color on biome images.
    pub biome_color: u32,
    /// Layer size.
    pub biome_size: i32,
    /// Relative rarity.
    pub biome_rarity: i32,
    /// Temperature.
    pub temperature: f32,
    /// Base height.
    pub height: f32,
    /// Block replacement rules.
    pub replaced_blocks: Vec<BlockReplacement>,
}

impl ResolvedBiomeConfig {
    /// Reads typed values out of a resolved stub. Unparsable values fall back
    /// to their defaults and are reported in `warnings`.
    pub fn from_stub(stub: &SettingsStub, warnings: &mut Vec<LoadWarning>) -> Self {
        let settings = stub.merged_settings();
        let mut on_invalid = |invalid: InvalidSetting| {
            push_warning(
                warnings,
                LoadWarning::InvalidSetting {
                    biome: stub.name().to_string(),
                    setting: invalid.setting,
                    value: invalid.value,
                    reason: invalid.reason,
                },
            );
        };

        let replace_to = schema::REPLACE_TO_BIOME_NAME.get_or_default(settings, &mut on_invalid);

        Self {
            name: stub.name().to_string(),
            source: stub.path().map(PathBuf::from),
            settings: settings.clone(),
            inheritance_chain: stub.inheritance_chain().to_vec(),
            replace_to_name: Some(replace_to).filter(|r| !r.is_empty()),
            mob_spawns: stub.mobs().clone(),
            smooth_radius: schema::SMOOTH_RADIUS.get_or_default(settings, &mut on_invalid),
            biome_color: schema::BIOME_COLOR.get_or_default(settings, &mut on_invalid),
            biome_size: schema::BIOME_SIZE.get_or_default(settings, &mut on_invalid),
            biome_rarity: schema::BIOME_RARITY.get_or_default(settings, &mut on_invalid),
            temperature: schema::BIOME_TEMPERATURE.get_or_default(settings, &mut on_invalid),
            height: schema::BIOME_HEIGHT.get_or_default(settings, &mut on_invalid),
            replaced_blocks: schema::REPLACED_BLOCKS.get_or_default(settings, &mut on_invalid),
        }
    }

    /// Returns `true` if the biome declares a replace-to target.
    pub fn is_virtual(&self) -> bool {
        self.replace_to_name.is_some()
    }

    /// Returns `true` if the biome has block replacement rules.
    pub fn has_replaced_blocks(&self) -> bool {
        !self.replaced_blocks.is_empty()
    }

    /// Returns `true` if the biome extends another biome.
    pub fn extends_another(&self) -> bool {
        !self.inheritance_chain.is_empty()
    }

    /// The settings as they take effect: the flattened map with spawn lists
    /// replaced by the merged tables and the final replace-to target.
    pub fn effective_settings(&self) -> SettingsMap {
        let mut map = self.settings.clone();
        for group in MobGroup::ALL {
            let entries = self.mob_spawns.group(group);
            let setting = schema::spawn_setting(group);
            if !entries.is_empty() || setting.raw(&map).is_some() {
                map.insert(setting.name, render_mob_list(entries));
            }
        }
        if let Some(target) = &self.replace_to_name {
            map.insert(schema::REPLACE_TO_BIOME_NAME.name, target.clone());
        }
        map
    }
}
