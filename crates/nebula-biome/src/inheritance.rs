//! `extends` resolution: single-parent settings fallback.

use std::collections::BTreeMap;

use crate::error::{BiomeLoadError, LoadWarning, push_warning};
use crate::identity::MAX_INHERITANCE_DEPTH;
use crate::stub::SettingsStub;

/// Resolves the `extends` chain of the stub `name`, parents first.
///
/// Each stub is resolved at most once per load. A missing parent is a warning
/// and leaves the stub with only its own settings. Recursing deeper than
/// [`MAX_INHERITANCE_DEPTH`] is treated as a cycle and fails the load.
pub fn resolve_inheritance(
    stubs: &mut BTreeMap<String, SettingsStub>,
    name: &str,
    depth: usize,
    warnings: &mut Vec<LoadWarning>,
) -> Result<(), BiomeLoadError> {
    let Some(stub) = stubs.get(name) else {
        return Ok(());
    };
    if stub.extends_resolved() {
        return Ok(());
    }

    let Some(parent_name) = stub.parent_name().map(str::to_string) else {
        if let Some(stub) = stubs.get_mut(name) {
            stub.mark_extends_resolved();
        }
        return Ok(());
    };

    if !stubs.contains_key(&parent_name) {
        push_warning(
            warnings,
            LoadWarning::MissingParent {
                biome: name.to_string(),
                parent: parent_name,
            },
        );
        if let Some(stub) = stubs.get_mut(name) {
            stub.mark_parent_missing();
        }
        return Ok(());
    }

    if depth > MAX_INHERITANCE_DEPTH {
        let err = BiomeLoadError::InheritanceTooDeep {
            biome: name.to_string(),
            parent: parent_name,
            max: MAX_INHERITANCE_DEPTH,
        };
        tracing::error!("{}", err);
        return Err(err);
    }

    resolve_inheritance(stubs, &parent_name, depth + 1, warnings)?;

    let (parent_merged, parent_chain) = match stubs.get(&parent_name) {
        Some(parent) => (
            parent.merged_settings().clone(),
            parent.inheritance_chain().to_vec(),
        ),
        None => return Ok(()),
    };
    if let Some(stub) = stubs.get_mut(name) {
        stub.attach_parent(&parent_name, &parent_merged, &parent_chain);
        tracing::trace!("Biome {} extends {}", name, parent_name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nebula_settings::{SettingsMap, SettingsSourceEntry};

    fn stubs(docs: &[(&str, &[(&str, &str)])]) -> BTreeMap<String, SettingsStub> {
        docs.iter()
            .map(|(name, pairs)| {
                let entry = SettingsSourceEntry {
                    name: name.to_string(),
                    path: None,
                    settings: SettingsMap::from_pairs(*name, pairs.iter().copied()),
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
            resolve_inheritance(map, &name, 0, warnings)?;
        }
        Ok(())
    }

    #[test]
    fn test_child_falls_back_to_parent() {
        let mut map = stubs(&[("X", &[("extends", "Y")]), ("Y", &[("k", "5")])]);
        resolve_all(&mut map, &mut Vec::new()).unwrap();
        assert_eq!(map["X"].merged_settings().get("k"), Some("5"));
    }

    #[test]
    fn test_child_overrides_parent() {
        let mut map = stubs(&[("X", &[("extends", "Y"), ("k", "7")]), ("Y", &[("k", "5")])]);
        resolve_all(&mut map, &mut Vec::new()).unwrap();
        assert_eq!(map["X"].merged_settings().get("k"), Some("7"));
    }

    #[test]
    fn test_nearest_ancestor_wins() {
        let mut map = stubs(&[
            ("A", &[("extends", "B")]),
            ("B", &[("extends", "C"), ("k", "b")]),
            ("C", &[("k", "c"), ("j", "c")]),
        ]);
        resolve_all(&mut map, &mut Vec::new()).unwrap();
        let a = &map["A"];
        assert_eq!(a.merged_settings().get("k"), Some("b"));
        assert_eq!(a.merged_settings().get("j"), Some("c"));
        assert_eq!(a.inheritance_chain(), ["B", "C"]);
    }

    #[test]
    fn test_missing_parent_warns_and_continues() {
        let mut map = stubs(&[("X", &[("extends", "Ghost"), ("k", "1")])]);
        let mut warnings = Vec::new();
        resolve_all(&mut map, &mut warnings).unwrap();
        assert_eq!(
            warnings,
            vec![LoadWarning::MissingParent {
                biome: "X".into(),
                parent: "Ghost".into()
            }]
        );
        let x = &map["X"];
        assert!(x.parent_missing());
        assert!(x.extends_resolved());
        assert_eq!(x.merged_settings().get("k"), Some("1"));
    }

    #[test]
    fn test_missing_parent_warns_once() {
        let mut map = stubs(&[("X", &[("extends", "Ghost")]), ("Y", &[("extends", "X")])]);
        let mut warnings = Vec::new();
        resolve_all(&mut map, &mut warnings).unwrap();
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_three_way_cycle_fails() {
        let mut map = stubs(&[
            ("A", &[("extends", "B")]),
            ("B", &[("extends", "C")]),
            ("C", &[("extends", "A")]),
        ]);
        let result = resolve_all(&mut map, &mut Vec::new());
        assert!(matches!(result, Err(BiomeLoadError::InheritanceTooDeep { .. })));
    }

    #[test]
    fn test_self_extension_fails() {
        let mut map = stubs(&[("A", &[("extends", "A")])]);
        let result = resolve_all(&mut map, &mut Vec::new());
        assert!(matches!(result, Err(BiomeLoadError::InheritanceTooDeep { .. })));
    }

    #[test]
    fn test_chain_at_bound_resolves() {
        // 16 stubs: S0 extends S1 ... S14 extends S15; deepest recursion is depth 14.
        let names: Vec<String> = (0..16).map(|i| format!("S{i:02}")).collect();
        let mut map = BTreeMap::new();
        for (i, name) in names.iter().enumerate() {
            let mut pairs = vec![("k".to_string(), name.clone())];
            if let Some(parent) = names.get(i + 1) {
                pairs.push(("extends".to_string(), parent.clone()));
            }
            let entry = SettingsSourceEntry {
                name: name.clone(),
                path: None,
                settings: SettingsMap::from_pairs(name.as_str(), pairs),
            };
            map.insert(name.clone(), SettingsStub::new(entry, &mut Vec::new()));
        }
        resolve_inheritance(&mut map, "S00", 0, &mut Vec::new()).unwrap();
        assert_eq!(map["S00"].inheritance_chain().len(), 15);
        assert_eq!(map["S00"].merged_settings().get("k"), Some("S00"));
    }
}
