//! `inherit-mobs` resolution: multi-parent, additive merge of spawn tables.

use std::collections::BTreeMap;

use crate::catalog::DefaultBiomeCatalog;
use crate::error::{BiomeLoadError, LoadWarning, push_warning};
use crate::identity::MAX_INHERITANCE_DEPTH;
use crate::stub::SettingsStub;

/// Merges the spawn tables of every `inherit-mobs` parent of `name` into it.
///
/// Parents are processed in declaration order, each resolved first. A parent
/// that is not a biome of this world (or is the biome itself) is looked up in
/// `catalog` as a default biome; failing that it is a warning. The depth bound
/// applies per parent branch.
pub fn resolve_mob_inheritance(
    stubs: &mut BTreeMap<String, SettingsStub>,
    name: &str,
    depth: usize,
    catalog: &dyn DefaultBiomeCatalog,
    warnings: &mut Vec<LoadWarning>,
) -> Result<(), BiomeLoadError> {
    let Some(stub) = stubs.get(name) else {
        return Ok(());
    };
    if stub.mobs_resolved() {
        return Ok(());
    }
    let parents = stub.mob_parent_names().to_vec();

    for parent in parents {
        let is_self = parent == name;
        if is_self || !stubs.contains_key(&parent) {
            merge_default_biome(stubs, name, &parent, is_self, catalog, warnings);
            continue;
        }

        if depth > MAX_INHERITANCE_DEPTH {
            let err = BiomeLoadError::MobInheritanceTooDeep {
                biome: name.to_string(),
                parent,
                max: MAX_INHERITANCE_DEPTH,
            };
            tracing::error!("{}", err);
            return Err(err);
        }

        resolve_mob_inheritance(stubs, &parent, depth + 1, catalog, warnings)?;

        let Some(table) = stubs.get(&parent).map(|p| p.mobs().clone()) else {
            continue;
        };
        if let Some(stub) = stubs.get_mut(name) {
            let added = stub.merge_mobs(&table);
            tracing::trace!("Biome {} inherits {} mob spawns from {}", name, added, parent);
        }
    }

    if let Some(stub) = stubs.get_mut(name) {
        stub.mark_mobs_resolved();
    }
    Ok(())
}

fn merge_default_biome(
    stubs: &mut BTreeMap<String, SettingsStub>,
    name: &str,
    parent: &str,
    is_self: bool,
    catalog: &dyn DefaultBiomeCatalog,
    warnings: &mut Vec<LoadWarning>,
) {
    // Legacy display names ("Plains") map to registry names ("minecraft:plains").
    let table = match catalog.registry_name_for_legacy(parent) {
        Some(registry_name) => catalog.mob_table(&registry_name),
        None if is_self => {
            push_warning(
                warnings,
                LoadWarning::SelfMobInheritance {
                    biome: name.to_string(),
                },
            );
            return;
        }
        None => catalog.mob_table(parent),
    };

    match (table, stubs.get_mut(name)) {
        (Some(table), Some(stub)) => {
            let added = stub.merge_mobs(&table);
            tracing::trace!("Biome {} inherits {} default mob spawns from {}", name, added, parent);
        }
        (None, _) => push_warning(
            warnings,
            LoadWarning::MissingMobParent {
                biome: name.to_string(),
                parent: parent.to_string(),
            },
        ),
        (Some(_), None) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::VanillaBiomeCatalog;
    use crate::mobs::{MobGroup, MobSpawnEntry};
    use nebula_settings::{SettingsMap, SettingsSourceEntry};

    fn spawn(mob: &str) -> String {
        format!(r#"[{{"mob": "{mob}", "weight": 10, "min": 1, "max": 2}}]"#)
    }

    fn stubs(docs: Vec<(&str, Vec<(&str, String)>)>) -> BTreeMap<String, SettingsStub> {
        docs.into_iter()
            .map(|(name, pairs)| {
                let entry = SettingsSourceEntry {
                    name: name.to_string(),
                    path: None,
                    settings: SettingsMap::from_pairs(name, pairs),
                };
                (name.to_string(), SettingsStub::new(entry, &mut Vec::new()))
            })
            .collect()
    }

    fn resolve_all(
        map: &mut BTreeMap<String, SettingsStub>,
        warnings: &mut Vec<LoadWarning>,
    ) -> Result<(), BiomeLoadError> {
        let names: Vec<String> = map.keys().cloned().collect();
        for name in names {
            resolve_mob_inheritance(map, &name, 0, &VanillaBiomeCatalog, warnings)?;
        }
        Ok(())
    }

    #[test]
    fn test_union_of_parents_and_own() {
        let mut map = stubs(vec![
            (
                "X",
                vec![
                    ("inherit-mobs", "Y,Z".to_string()),
                    ("SpawnMonsters", spawn("Zombie")),
                ],
            ),
            ("Y", vec![("SpawnCreatures", spawn("Cow"))]),
            ("Z", vec![("SpawnCreatures", spawn("Sheep"))]),
        ]);
        resolve_all(&mut map, &mut Vec::new()).unwrap();

        let x = map["X"].mobs();
        assert_eq!(x.len(), 3);
        assert!(x.contains_mob("Zombie"));
        assert!(x.contains_mob("Cow"));
        assert!(x.contains_mob("Sheep"));
        assert!(map["X"].mobs_resolved());
    }

    #[test]
    fn test_shared_mob_appears_once() {
        let mut map = stubs(vec![
            ("X", vec![("inherit-mobs", "Y,Z".to_string())]),
            ("Y", vec![("SpawnCreatures", spawn("Cow"))]),
            ("Z", vec![("SpawnCreatures", spawn("Cow"))]),
        ]);
        resolve_all(&mut map, &mut Vec::new()).unwrap();
        assert_eq!(
            map["X"].mobs().group(MobGroup::Creature),
            [MobSpawnEntry::new("Cow", 10, 1, 2)]
        );
    }

    #[test]
    fn test_transitive_inheritance() {
        let mut map = stubs(vec![
            ("A", vec![("inherit-mobs", "B".to_string())]),
            ("B", vec![("inherit-mobs", "C".to_string())]),
            ("C", vec![("SpawnAmbientCreatures", spawn("Bat"))]),
        ]);
        resolve_all(&mut map, &mut Vec::new()).unwrap();
        assert!(map["A"].mobs().contains_mob("Bat"));
    }

    #[test]
    fn test_default_biome_parent_uses_catalog() {
        let mut map = stubs(vec![("X", vec![("inherit-mobs", "Plains".to_string())])]);
        let mut warnings = Vec::new();
        resolve_all(&mut map, &mut warnings).unwrap();
        assert!(warnings.is_empty());
        assert!(map["X"].mobs().contains_mob("minecraft:horse"));
    }

    #[test]
    fn test_registry_name_parent_uses_catalog() {
        let mut map = stubs(vec![("X", vec![("inherit-mobs", "minecraft:ocean".to_string())])]);
        resolve_all(&mut map, &mut Vec::new()).unwrap();
        assert!(map["X"].mobs().contains_mob("minecraft:squid"));
    }

    #[test]
    fn test_self_reference_warns() {
        let mut map = stubs(vec![(
            "X",
            vec![
                ("inherit-mobs", "X".to_string()),
                ("SpawnMonsters", spawn("Zombie")),
            ],
        )]);
        let mut warnings = Vec::new();
        resolve_all(&mut map, &mut warnings).unwrap();
        assert_eq!(
            warnings,
            vec![LoadWarning::SelfMobInheritance { biome: "X".into() }]
        );
        assert_eq!(map["X"].mobs().len(), 1);
        assert!(map["X"].mobs_resolved());
    }

    #[test]
    fn test_self_reference_with_default_name_uses_catalog() {
        let mut map = stubs(vec![("Desert", vec![("inherit-mobs", "Desert".to_string())])]);
        let mut warnings = Vec::new();
        resolve_all(&mut map, &mut warnings).unwrap();
        assert!(warnings.is_empty());
        assert!(map["Desert"].mobs().contains_mob("minecraft:husk"));
    }

    #[test]
    fn test_unknown_parent_warns() {
        let mut map = stubs(vec![("X", vec![("inherit-mobs", "Nowhere".to_string())])]);
        let mut warnings = Vec::new();
        resolve_all(&mut map, &mut warnings).unwrap();
        assert!(matches!(&warnings[0], LoadWarning::MissingMobParent { parent, .. } if parent == "Nowhere"));
    }

    #[test]
    fn test_cycle_fails() {
        let mut map = stubs(vec![
            ("A", vec![("inherit-mobs", "B".to_string())]),
            ("B", vec![("inherit-mobs", "C".to_string())]),
            ("C", vec![("inherit-mobs", "A".to_string())]),
        ]);
        let result = resolve_all(&mut map, &mut Vec::new());
        assert!(matches!(result, Err(BiomeLoadError::MobInheritanceTooDeep { .. })));
    }
}
