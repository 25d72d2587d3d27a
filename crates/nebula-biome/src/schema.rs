//! Biome setting schema: one descriptor per recognised key.

use nebula_settings::setting::{
    parse_color, parse_f32, parse_i32, parse_name_list, parse_string,
};
use nebula_settings::{Setting, SettingInfo, SettingsMap};

use crate::config::BlockReplacement;
use crate::mobs::{MobGroup, MobSpawnEntry, parse_mob_list};

/// Parent whose settings this biome falls back to.
pub const BIOME_EXTENDS: Setting<String> = Setting {
    name: "BiomeExtends",
    aliases: &["extends"],
    default: String::new,
    parse: parse_string,
};

/// Biomes whose mob spawns are merged into this one, comma-separated.
pub const INHERIT_MOBS: Setting<Vec<String>> = Setting {
    name: "InheritMobsBiomeName",
    aliases: &["inherit-mobs", "InheritMobs"],
    default: Vec::new,
    parse: parse_name_list,
};

/// Biome whose saved id this biome is stored under. Makes the biome virtual.
pub const REPLACE_TO_BIOME_NAME: Setting<String> = Setting {
    name: "ReplaceToBiomeName",
    aliases: &["replace-to"],
    default: String::new,
    parse: parse_string,
};

/// Border smoothing radius in blocks.
pub const SMOOTH_RADIUS: Setting<i32> = Setting {
    name: "SmoothRadius",
    aliases: &[],
    default: default_smooth_radius,
    parse: parse_smooth_radius,
};

/// Color identifying the biome on biome images.
pub const BIOME_COLOR: Setting<u32> = Setting {
    name: "BiomeColor",
    aliases: &[],
    default: default_color,
    parse: parse_color,
};

/// Size of the biome in the layer stack.
pub const BIOME_SIZE: Setting<i32> = Setting {
    name: "BiomeSize",
    aliases: &[],
    default: default_biome_size,
    parse: parse_biome_size,
};

/// How often the biome is picked relative to its group.
pub const BIOME_RARITY: Setting<i32> = Setting {
    name: "BiomeRarity",
    aliases: &[],
    default: default_biome_rarity,
    parse: parse_biome_rarity,
};

/// Temperature, used for snow and biome grouping.
pub const BIOME_TEMPERATURE: Setting<f32> = Setting {
    name: "BiomeTemperature",
    aliases: &[],
    default: default_temperature,
    parse: parse_f32,
};

/// Base terrain height.
pub const BIOME_HEIGHT: Setting<f32> = Setting {
    name: "BiomeHeight",
    aliases: &[],
    default: default_height,
    parse: parse_f32,
};

/// Block replacement rules applied after terrain generation.
pub const REPLACED_BLOCKS: Setting<Vec<BlockReplacement>> = Setting {
    name: "ReplacedBlocks",
    aliases: &[],
    default: Vec::new,
    parse: parse_replaced_blocks,
};

/// Hostile mob spawns.
pub const SPAWN_MONSTERS: Setting<Vec<MobSpawnEntry>> = Setting {
    name: "SpawnMonsters",
    aliases: &[],
    default: Vec::new,
    parse: parse_mob_list,
};

/// Passive mob spawns.
pub const SPAWN_CREATURES: Setting<Vec<MobSpawnEntry>> = Setting {
    name: "SpawnCreatures",
    aliases: &[],
    default: Vec::new,
    parse: parse_mob_list,
};

/// Water mob spawns.
pub const SPAWN_WATER_CREATURES: Setting<Vec<MobSpawnEntry>> = Setting {
    name: "SpawnWaterCreatures",
    aliases: &[],
    default: Vec::new,
    parse: parse_mob_list,
};

/// Ambient mob spawns.
pub const SPAWN_AMBIENT_CREATURES: Setting<Vec<MobSpawnEntry>> = Setting {
    name: "SpawnAmbientCreatures",
    aliases: &[],
    default: Vec::new,
    parse: parse_mob_list,
};

/// Every recognised biome setting.
pub const BIOME_SETTINGS: &[SettingInfo] = &[
    BIOME_EXTENDS.info(),
    INHERIT_MOBS.info(),
    REPLACE_TO_BIOME_NAME.info(),
    SMOOTH_RADIUS.info(),
    BIOME_COLOR.info(),
    BIOME_SIZE.info(),
    BIOME_RARITY.info(),
    BIOME_TEMPERATURE.info(),
    BIOME_HEIGHT.info(),
    REPLACED_BLOCKS.info(),
    SPAWN_MONSTERS.info(),
    SPAWN_CREATURES.info(),
    SPAWN_WATER_CREATURES.info(),
    SPAWN_AMBIENT_CREATURES.info(),
];

/// Spawn list setting for a mob group.
pub fn spawn_setting(group: MobGroup) -> &'static Setting<Vec<MobSpawnEntry>> {
    match group {
        MobGroup::Monster => &SPAWN_MONSTERS,
        MobGroup::Creature => &SPAWN_CREATURES,
        MobGroup::WaterCreature => &SPAWN_WATER_CREATURES,
        MobGroup::Ambient => &SPAWN_AMBIENT_CREATURES,
    }
}

/// Keys in `map` that no descriptor recognises.
pub fn unknown_keys(map: &SettingsMap) -> Vec<&str> {
    map.iter()
        .map(|(key, _)| key)
        .filter(|key| !BIOME_SETTINGS.iter().any(|info| info.matches(key)))
        .collect()
}

// ---------------------------------------------------------------------------
// Defaults and parsers
// ---------------------------------------------------------------------------

fn default_smooth_radius() -> i32 {
    2
}

fn default_color() -> u32 {
    0
}

fn default_biome_size() -> i32 {
    4
}

fn default_biome_rarity() -> i32 {
    100
}

fn default_temperature() -> f32 {
    0.5
}

fn default_height() -> f32 {
    0.1
}

fn parse_in_range(raw: &str, min: i32, max: i32) -> Result<i32, String> {
    let value = parse_i32(raw)?;
    if !(min..=max).contains(&value) {
        return Err(format!("{value} is outside {min}..={max}"));
    }
    Ok(value)
}

fn parse_smooth_radius(raw: &str) -> Result<i32, String> {
    parse_in_range(raw, 0, 32)
}

fn parse_biome_size(raw: &str) -> Result<i32, String> {
    parse_in_range(raw, 0, 20)
}

fn parse_biome_rarity(raw: &str) -> Result<i32, String> {
    parse_in_range(raw, 1, 1000)
}

/// Parses `None`, an empty value, or `[(from,to[,minY,maxY]),...]`.
pub fn parse_replaced_blocks(raw: &str) -> Result<Vec<BlockReplacement>, String> {
    let body = raw.trim();
    if body.is_empty() || body.eq_ignore_ascii_case("none") {
        return Ok(Vec::new());
    }
    let body = body
        .strip_prefix('[')
        .and_then(|b| b.strip_suffix(']'))
        .unwrap_or(body);

    let mut rules = Vec::new();
    let mut rest = body.trim();
    while !rest.is_empty() {
        let open = rest
            .find('(')
            .ok_or_else(|| format!("expected '(' in {rest:?}"))?;
        let close = rest[open..]
            .find(')')
            .map(|i| open + i)
            .ok_or_else(|| format!("unclosed '(' in {rest:?}"))?;
        rules.push(parse_replacement(&rest[open + 1..close])?);
        rest = rest[close + 1..].trim_start_matches([',', ' ']).trim();
    }
    Ok(rules)
}

fn parse_replacement(inner: &str) -> Result<BlockReplacement, String> {
    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    let (from, to, min_y, max_y) = match parts.as_slice() {
        [from, to] => (*from, *to, 0, 255),
        [from, to, min_y, max_y] => (*from, *to, parse_i32(min_y)?, parse_i32(max_y)?),
        _ => return Err(format!("expected (from,to) or (from,to,minY,maxY), got ({inner})")),
    };
    if from.is_empty() || to.is_empty() {
        return Err(format!("empty block name in ({inner})"));
    }
    if min_y > max_y {
        return Err(format!("minY {min_y} is above maxY {max_y}"));
    }
    Ok(BlockReplacement {
        from: from.to_string(),
        to: to.to_string(),
        min_y,
        max_y,
    })
}
