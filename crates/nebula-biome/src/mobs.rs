//! Mob spawn tables and their additive merge.

use serde::{Deserialize, Serialize};

/// Spawn category a mob entry belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MobGroup {
    /// Hostile mobs.
    Monster,
    /// Passive land animals.
    Creature,
    /// Squid, fish and the like.
    WaterCreature,
    /// Bats and other ambient mobs.
    Ambient,
}

impl MobGroup {
    /// Every group, in table order.
    pub const ALL: [MobGroup; 4] = [
        MobGroup::Monster,
        MobGroup::Creature,
        MobGroup::WaterCreature,
        MobGroup::Ambient,
    ];
}

/// One weighted spawn rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MobSpawnEntry {
    /// Mob type, e.g. `minecraft:zombie`.
    pub mob: String,
    /// Relative spawn weight.
    pub weight: u32,
    /// Minimum group size.
    pub min: u32,
    /// Maximum group size.
    pub max: u32,
}

impl MobSpawnEntry {
    /// Creates an entry.
    pub fn new(mob: impl Into<String>, weight: u32, min: u32, max: u32) -> Self {
        Self {
            mob: mob.into(),
            weight,
            min,
            max,
        }
    }

    fn same_mob(&self, other: &MobSpawnEntry) -> bool {
        self.mob.eq_ignore_ascii_case(&other.mob)
    }
}

/// Spawn rules of a biome, per [`MobGroup`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MobSpawnTable {
    monsters: Vec<MobSpawnEntry>,
    creatures: Vec<MobSpawnEntry>,
    water_creatures: Vec<MobSpawnEntry>,
    ambient: Vec<MobSpawnEntry>,
}

impl MobSpawnTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries of one group.
    pub fn group(&self, group: MobGroup) -> &[MobSpawnEntry] {
        match group {
            MobGroup::Monster => &self.monsters,
            MobGroup::Creature => &self.creatures,
            MobGroup::WaterCreature => &self.water_creatures,
            MobGroup::Ambient => &self.ambient,
        }
    }

    fn group_mut(&mut self, group: MobGroup) -> &mut Vec<MobSpawnEntry> {
        match group {
            MobGroup::Monster => &mut self.monsters,
            MobGroup::Creature => &mut self.creatures,
            MobGroup::WaterCreature => &mut self.water_creatures,
            MobGroup::Ambient => &mut self.ambient,
        }
    }

    /// Replaces the entries of one group.
    pub fn set_group(&mut self, group: MobGroup, entries: Vec<MobSpawnEntry>) {
        *self.group_mut(group) = entries;
    }

    /// Adds `entry` unless the group already has a rule for the same mob.
    /// Returns `true` if it was added.
    pub fn add(&mut self, group: MobGroup, entry: MobSpawnEntry) -> bool {
        let entries = self.group_mut(group);
        if entries.iter().any(|e| e.same_mob(&entry)) {
            return false;
        }
        entries.push(entry);
        true
    }

    /// Union of `self` and `other`, group by group. Rules already present keep
    /// their values; mobs only `other` knows about are appended in its order.
    /// Returns the number of entries added.
    pub fn merge_from(&mut self, other: &MobSpawnTable) -> usize {
        let mut added = 0;
        for group in MobGroup::ALL {
            for entry in other.group(group) {
                if self.add(group, entry.clone()) {
                    added += 1;
                }
            }
        }
        added
    }

    /// Total number of entries across groups.
    pub fn len(&self) -> usize {
        MobGroup::ALL.iter().map(|&g| self.group(g).len()).sum()
    }

    /// Returns `true` if no group has entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if any group has a rule for `mob`.
    pub fn contains_mob(&self, mob: &str) -> bool {
        MobGroup::ALL
            .iter()
            .any(|&g| self.group(g).iter().any(|e| e.mob.eq_ignore_ascii_case(mob)))
    }
}

/// Parses a JSON spawn list: `[{"mob": "Zombie", "weight": 100, "min": 4, "max": 4}]`.
///
/// An empty value means no entries.
pub fn parse_mob_list(raw: &str) -> Result<Vec<MobSpawnEntry>, String> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    let entries: Vec<MobSpawnEntry> =
        serde_json::from_str(raw).map_err(|e| format!("not a mob spawn list: {e}"))?;
    if let Some(bad) = entries.iter().find(|e| e.min > e.max) {
        return Err(format!("{}: min {} is greater than max {}", bad.mob, bad.min, bad.max));
    }
    Ok(entries)
}

/// Renders a spawn list in the form [`parse_mob_list`] reads.
pub fn render_mob_list(entries: &[MobSpawnEntry]) -> String {
    serde_json::to_string(entries).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mob_list() {
        let raw = r#"[{"mob": "Zombie", "weight": 100, "min": 4, "max": 4}, {"mob": "Bat", "weight": 10, "min": 8, "max": 8}]"#;
        let entries = parse_mob_list(raw).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], MobSpawnEntry::new("Zombie", 100, 4, 4));
    }

    #[test]
    fn test_parse_rejects_inverted_group_size() {
        let raw = r#"[{"mob": "Cow", "weight": 8, "min": 5, "max": 2}]"#;
        assert!(parse_mob_list(raw).is_err());
        assert!(parse_mob_list("Cow,8").is_err());
    }

    #[test]
    fn test_empty_value_is_empty_list() {
        assert_eq!(parse_mob_list(""), Ok(Vec::new()));
        assert_eq!(parse_mob_list("[]"), Ok(Vec::new()));
    }

    #[test]
    fn test_merge_is_union_keyed_by_mob() {
        let mut own = MobSpawnTable::new();
        own.add(MobGroup::Monster, MobSpawnEntry::new("Zombie", 50, 1, 2));

        let mut parent = MobSpawnTable::new();
        parent.add(MobGroup::Monster, MobSpawnEntry::new("zombie", 100, 4, 4));
        parent.add(MobGroup::Monster, MobSpawnEntry::new("Skeleton", 100, 4, 4));
        parent.add(MobGroup::Creature, MobSpawnEntry::new("Cow", 8, 4, 4));

        assert_eq!(own.merge_from(&parent), 2);
        assert_eq!(own.len(), 3);
        // own rule wins over the parent's rule for the same mob
        assert_eq!(own.group(MobGroup::Monster)[0].weight, 50);
        assert!(own.contains_mob("cow"));
    }

    #[test]
    fn test_same_mob_in_different_groups_kept() {
        let mut table = MobSpawnTable::new();
        assert!(table.add(MobGroup::Creature, MobSpawnEntry::new("Squid", 10, 1, 4)));
        assert!(table.add(MobGroup::WaterCreature, MobSpawnEntry::new("Squid", 10, 1, 4)));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_render_reads_back() {
        let entries = vec![MobSpawnEntry::new("Slime", 100, 4, 4)];
        assert_eq!(parse_mob_list(&render_mob_list(&entries)), Ok(entries));
    }
}
