//! Default biome metadata supplied by the host world.
//!
//! The pipeline needs three facts about the platform's built-in biomes: how
//! legacy display names map to registry names, which mobs a built-in biome
//! spawns, and which saved id the platform registered it under.

use nebula_settings::normalize_key;

use crate::mobs::{MobGroup, MobSpawnEntry, MobSpawnTable};

/// Lookup of the platform's built-in biomes.
pub trait DefaultBiomeCatalog: Send + Sync {
    /// Registry name for a legacy display name, e.g. `Plains` → `minecraft:plains`.
    fn registry_name_for_legacy(&self, name: &str) -> Option<String>;

    /// Default spawn table of a built-in biome, by registry name.
    fn mob_table(&self, registry_name: &str) -> Option<MobSpawnTable>;

    /// Saved id the platform registered a built-in biome under, by registry name.
    fn saved_id(&self, registry_name: &str) -> Option<u16>;

    /// Every saved id the platform's built-in biomes occupy. World biomes are
    /// never allocated one of these.
    fn reserved_saved_ids(&self) -> Vec<u16>;
}

/// Spawn profile shared by several default biomes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MobProfile {
    Land,
    Plains,
    Forest,
    Taiga,
    Snowy,
    Desert,
    Jungle,
    Water,
    Mushroom,
    Nether,
    End,
}

struct DefaultBiome {
    legacy_name: &'static str,
    registry_name: &'static str,
    saved_id: u16,
    profile: MobProfile,
}

const fn biome(
    legacy_name: &'static str,
    registry_name: &'static str,
    saved_id: u16,
    profile: MobProfile,
) -> DefaultBiome {
    DefaultBiome {
        legacy_name,
        registry_name,
        saved_id,
        profile,
    }
}

#[rustfmt::skip]
const DEFAULT_BIOMES: &[DefaultBiome] = &[
    biome("Ocean", "minecraft:ocean", 0, MobProfile::Water),
    biome("Plains", "minecraft:plains", 1, MobProfile::Plains),
    biome("Desert", "minecraft:desert", 2, MobProfile::Desert),
    biome("Extreme Hills", "minecraft:extreme_hills", 3, MobProfile::Land),
    biome("Forest", "minecraft:forest", 4, MobProfile::Forest),
    biome("Taiga", "minecraft:taiga", 5, MobProfile::Taiga),
    biome("Swampland", "minecraft:swampland", 6, MobProfile::Land),
    biome("River", "minecraft:river", 7, MobProfile::Water),
    biome("Hell", "minecraft:hell", 8, MobProfile::Nether),
    biome("Sky", "minecraft:sky", 9, MobProfile::End),
    biome("FrozenOcean", "minecraft:frozen_ocean", 10, MobProfile::Water),
    biome("FrozenRiver", "minecraft:frozen_river", 11, MobProfile::Water),
    biome("Ice Plains", "minecraft:ice_flats", 12, MobProfile::Snowy),
    biome("Ice Mountains", "minecraft:ice_mountains", 13, MobProfile::Snowy),
    biome("MushroomIsland", "minecraft:mushroom_island", 14, MobProfile::Mushroom),
    biome("MushroomIslandShore", "minecraft:mushroom_island_shore", 15, MobProfile::Mushroom),
    biome("Beach", "minecraft:beaches", 16, MobProfile::Land),
    biome("DesertHills", "minecraft:desert_hills", 17, MobProfile::Desert),
    biome("ForestHills", "minecraft:forest_hills", 18, MobProfile::Forest),
    biome("TaigaHills", "minecraft:taiga_hills", 19, MobProfile::Taiga),
    biome("Extreme Hills Edge", "minecraft:smaller_extreme_hills", 20, MobProfile::Land),
    biome("Jungle", "minecraft:jungle", 21, MobProfile::Jungle),
    biome("JungleHills", "minecraft:jungle_hills", 22, MobProfile::Jungle),
    biome("JungleEdge", "minecraft:jungle_edge", 23, MobProfile::Jungle),
    biome("Deep Ocean", "minecraft:deep_ocean", 24, MobProfile::Water),
    biome("Stone Beach", "minecraft:stone_beach", 25, MobProfile::Land),
    biome("Cold Beach", "minecraft:cold_beach", 26, MobProfile::Snowy),
    biome("Birch Forest", "minecraft:birch_forest", 27, MobProfile::Forest),
    biome("Birch Forest Hills", "minecraft:birch_forest_hills", 28, MobProfile::Forest),
    biome("Roofed Forest", "minecraft:roofed_forest", 29, MobProfile::Forest),
    biome("Cold Taiga", "minecraft:taiga_cold", 30, MobProfile::Snowy),
    biome("Cold Taiga Hills", "minecraft:taiga_cold_hills", 31, MobProfile::Snowy),
    biome("Mega Taiga", "minecraft:redwood_taiga", 32, MobProfile::Taiga),
    biome("Mega Taiga Hills", "minecraft:redwood_taiga_hills", 33, MobProfile::Taiga),
    biome("Extreme Hills+", "minecraft:extreme_hills_with_trees", 34, MobProfile::Land),
    biome("Savanna", "minecraft:savanna", 35, MobProfile::Plains),
    biome("Savanna Plateau", "minecraft:savanna_rock", 36, MobProfile::Plains),
    biome("Mesa", "minecraft:mesa", 37, MobProfile::Land),
    biome("Mesa Plateau F", "minecraft:mesa_rock", 38, MobProfile::Land),
    biome("Mesa Plateau", "minecraft:mesa_clear_rock", 39, MobProfile::Land),
];

/// The classic default biome set with its spawn tables.
#[derive(Clone, Copy, Debug, Default)]
pub struct VanillaBiomeCatalog;

impl VanillaBiomeCatalog {
    fn by_registry_name(registry_name: &str) -> Option<&'static DefaultBiome> {
        DEFAULT_BIOMES
            .iter()
            .find(|b| b.registry_name.eq_ignore_ascii_case(registry_name))
    }
}

impl DefaultBiomeCatalog for VanillaBiomeCatalog {
    fn registry_name_for_legacy(&self, name: &str) -> Option<String> {
        let key = normalize_key(name);
        DEFAULT_BIOMES
            .iter()
            .find(|b| normalize_key(b.legacy_name) == key)
            .map(|b| b.registry_name.to_string())
    }

    fn mob_table(&self, registry_name: &str) -> Option<MobSpawnTable> {
        Self::by_registry_name(registry_name).map(|b| profile_table(b.profile))
    }

    fn saved_id(&self, registry_name: &str) -> Option<u16> {
        Self::by_registry_name(registry_name).map(|b| b.saved_id)
    }

    fn reserved_saved_ids(&self) -> Vec<u16> {
        DEFAULT_BIOMES.iter().map(|b| b.saved_id).collect()
    }
}

fn entry(mob: &str, weight: u32, min: u32, max: u32) -> MobSpawnEntry {
    MobSpawnEntry::new(format!("minecraft:{mob}"), weight, min, max)
}

fn overworld_monsters() -> Vec<MobSpawnEntry> {
    vec![
        entry("spider", 100, 4, 4),
        entry("zombie", 95, 4, 4),
        entry("zombie_villager", 5, 1, 1),
        entry("skeleton", 100, 4, 4),
        entry("creeper", 100, 4, 4),
        entry("slime", 100, 4, 4),
        entry("enderman", 10, 1, 4),
        entry("witch", 5, 1, 1),
    ]
}

fn farm_animals() -> Vec<MobSpawnEntry> {
    vec![
        entry("sheep", 12, 4, 4),
        entry("pig", 10, 4, 4),
        entry("chicken", 10, 4, 4),
        entry("cow", 8, 4, 4),
    ]
}

fn profile_table(profile: MobProfile) -> MobSpawnTable {
    let mut table = MobSpawnTable::new();
    let mut monsters = overworld_monsters();
    let mut creatures = farm_animals();
    let mut water = vec![entry("squid", 10, 4, 4)];
    let ambient = vec![entry("bat", 10, 8, 8)];

    match profile {
        MobProfile::Land => {}
        MobProfile::Plains => {
            creatures.push(entry("horse", 5, 2, 6));
            creatures.push(entry("donkey", 1, 1, 3));
        }
        MobProfile::Forest => creatures.push(entry("wolf", 5, 4, 4)),
        MobProfile::Taiga => {
            creatures.push(entry("wolf", 8, 4, 4));
            creatures.push(entry("rabbit", 4, 2, 3));
        }
        MobProfile::Snowy => {
            monsters.retain(|e| e.mob != "minecraft:skeleton");
            monsters.push(entry("skeleton", 20, 4, 4));
            monsters.push(entry("stray", 80, 4, 4));
            creatures = vec![entry("rabbit", 10, 2, 3), entry("polar_bear", 1, 1, 2)];
        }
        MobProfile::Desert => {
            monsters.retain(|e| e.mob != "minecraft:zombie");
            monsters.push(entry("zombie", 19, 4, 4));
            monsters.push(entry("husk", 80, 4, 4));
            creatures = vec![entry("rabbit", 4, 2, 3)];
            water.clear();
        }
        MobProfile::Jungle => {
            creatures.push(entry("parrot", 40, 1, 2));
            monsters.push(entry("ocelot", 2, 1, 1));
        }
        MobProfile::Water => creatures.clear(),
        MobProfile::Mushroom => {
            monsters.clear();
            creatures = vec![entry("mooshroom", 8, 4, 8)];
            water.clear();
        }
        MobProfile::Nether => {
            monsters = vec![
                entry("ghast", 50, 4, 4),
                entry("zombie_pigman", 100, 4, 4),
                entry("magma_cube", 2, 4, 4),
            ];
            creatures.clear();
            water.clear();
        }
        MobProfile::End => {
            monsters = vec![entry("enderman", 10, 4, 4)];
            creatures.clear();
            water.clear();
        }
    }

    let ambient = match profile {
        MobProfile::Nether | MobProfile::End => Vec::new(),
        _ => ambient,
    };

    table.set_group(MobGroup::Monster, monsters);
    table.set_group(MobGroup::Creature, creatures);
    table.set_group(MobGroup::WaterCreature, water);
    table.set_group(MobGroup::Ambient, ambient);
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_names_translate() {
        let catalog = VanillaBiomeCatalog;
        assert_eq!(
            catalog.registry_name_for_legacy("Plains").as_deref(),
            Some("minecraft:plains")
        );
        assert_eq!(
            catalog.registry_name_for_legacy("ExtremeHills").as_deref(),
            Some("minecraft:extreme_hills")
        );
        assert_eq!(catalog.registry_name_for_legacy("minecraft:plains"), None);
        assert_eq!(catalog.registry_name_for_legacy("Candy Land"), None);
    }

    #[test]
    fn test_saved_ids() {
        let catalog = VanillaBiomeCatalog;
        assert_eq!(catalog.saved_id("minecraft:ocean"), Some(0));
        assert_eq!(catalog.saved_id("minecraft:mesa_clear_rock"), Some(39));
        assert_eq!(catalog.saved_id("Plains"), None);
    }

    #[test]
    fn test_saved_ids_are_unique() {
        for (i, a) in DEFAULT_BIOMES.iter().enumerate() {
            for b in &DEFAULT_BIOMES[i + 1..] {
                assert_ne!(a.saved_id, b.saved_id, "{} / {}", a.registry_name, b.registry_name);
            }
        }
    }

    #[test]
    fn test_reserved_saved_ids() {
        let reserved = VanillaBiomeCatalog.reserved_saved_ids();
        assert_eq!(reserved.len(), DEFAULT_BIOMES.len());
        assert!(reserved.contains(&0));
        assert!(reserved.contains(&39));
        assert!(!reserved.contains(&40));
    }

    #[test]
    fn test_profiles() {
        let catalog = VanillaBiomeCatalog;
        let mushroom = catalog.mob_table("minecraft:mushroom_island").unwrap();
        assert!(mushroom.group(MobGroup::Monster).is_empty());
        assert!(mushroom.contains_mob("minecraft:mooshroom"));

        let ocean = catalog.mob_table("minecraft:ocean").unwrap();
        assert!(ocean.group(MobGroup::Creature).is_empty());
        assert!(ocean.contains_mob("minecraft:squid"));

        let hell = catalog.mob_table("minecraft:hell").unwrap();
        assert!(hell.contains_mob("minecraft:ghast"));
        assert!(!hell.contains_mob("minecraft:bat"));
    }
}
