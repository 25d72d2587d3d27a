//! Per-biome working state during one load pass.

use std::path::{Path, PathBuf};

use nebula_settings::{SettingsMap, SettingsSourceEntry};

use crate::error::{LoadWarning, push_warning};
use crate::mobs::{MobGroup, MobSpawnTable};
use crate::schema;

/// A discovered biome document while `extends` and `inherit-mobs` are being
/// resolved.
///
/// `merged` starts as a copy of the biome's own settings and is replaced by
/// the flattened chain once `extends` is resolved. The mob table starts with
/// the biome's own spawn lists and grows as `inherit-mobs` parents are merged.
/// Both resolved flags only ever go from `false` to `true`.
#[derive(Clone, Debug)]
pub struct SettingsStub {
    name: String,
    path: Option<PathBuf>,
    own: SettingsMap,
    merged: SettingsMap,
    parent_name: Option<String>,
    mob_parent_names: Vec<String>,
    mobs: MobSpawnTable,
    inheritance_chain: Vec<String>,
    extends_resolved: bool,
    parent_missing: bool,
    mobs_resolved: bool,
}

impl SettingsStub {
    /// Builds a stub from a discovered document, reading `extends`,
    /// `inherit-mobs` and the biome's own spawn lists.
    pub fn new(entry: SettingsSourceEntry, warnings: &mut Vec<LoadWarning>) -> Self {
        let SettingsSourceEntry {
            name,
            path,
            settings,
        } = entry;

        let mut on_invalid = |invalid: nebula_settings::InvalidSetting| {
            push_warning(
                warnings,
                LoadWarning::InvalidSetting {
                    biome: name.clone(),
                    setting: invalid.setting,
                    value: invalid.value,
                    reason: invalid.reason,
                },
            );
        };

        let parent = schema::BIOME_EXTENDS.get_or_default(&settings, &mut on_invalid);
        let mob_parent_names = schema::INHERIT_MOBS.get_or_default(&settings, &mut on_invalid);

        let mut mobs = MobSpawnTable::new();
        for group in MobGroup::ALL {
            let entries = schema::spawn_setting(group).get_or_default(&settings, &mut on_invalid);
            for entry in entries {
                mobs.add(group, entry);
            }
        }

        Self {
            path,
            merged: settings.clone(),
            own: settings,
            parent_name: Some(parent).filter(|p| !p.is_empty()),
            mob_parent_names,
            mobs,
            inheritance_chain: Vec::new(),
            extends_resolved: false,
            parent_missing: false,
            mobs_resolved: false,
            name,
        }
    }

    /// Biome name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File the settings came from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Settings exactly as written for this biome.
    pub fn own_settings(&self) -> &SettingsMap {
        &self.own
    }

    /// Own settings flattened over the resolved `extends` chain.
    pub fn merged_settings(&self) -> &SettingsMap {
        &self.merged
    }

    /// Declared `extends` parent.
    pub fn parent_name(&self) -> Option<&str> {
        self.parent_name.as_deref()
    }

    /// Declared `inherit-mobs` parents, in order.
    pub fn mob_parent_names(&self) -> &[String] {
        &self.mob_parent_names
    }

    /// Own spawn rules plus everything merged from mob parents so far.
    pub fn mobs(&self) -> &MobSpawnTable {
        &self.mobs
    }

    /// Ancestors whose settings were flattened into this one, nearest first.
    pub fn inheritance_chain(&self) -> &[String] {
        &self.inheritance_chain
    }

    /// `extends` has been processed (successfully or not).
    pub fn extends_resolved(&self) -> bool {
        self.extends_resolved
    }

    /// `extends` named a biome that does not exist.
    pub fn parent_missing(&self) -> bool {
        self.parent_missing
    }

    /// `inherit-mobs` has been processed.
    pub fn mobs_resolved(&self) -> bool {
        self.mobs_resolved
    }

    pub(crate) fn mark_extends_resolved(&mut self) {
        self.extends_resolved = true;
    }

    pub(crate) fn mark_parent_missing(&mut self) {
        self.parent_missing = true;
        self.extends_resolved = true;
    }

    /// Flattens own settings over the already resolved `parent`.
    pub(crate) fn attach_parent(&mut self, parent_name: &str, parent_merged: &SettingsMap, parent_chain: &[String]) {
        self.merged = self.own.with_fallback(parent_merged);
        self.inheritance_chain = std::iter::once(parent_name.to_string())
            .chain(parent_chain.iter().cloned())
            .collect();
        self.extends_resolved = true;
    }

    pub(crate) fn merge_mobs(&mut self, table: &MobSpawnTable) -> usize {
        self.mobs.merge_from(table)
    }

    pub(crate) fn mark_mobs_resolved(&mut self) {
        self.mobs_resolved = true;
    }
}
