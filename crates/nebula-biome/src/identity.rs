//! Two-tier biome identity.

use serde::{Deserialize, Serialize};

/// Number of biome ids the save format can physically store. Generation ids
/// at or above this are virtual.
pub const PHYSICAL_BIOME_LIMIT: u16 = 256;

/// Deepest `extends` / `inherit-mobs` chain followed before the chain is
/// treated as cyclical.
pub const MAX_INHERITANCE_DEPTH: usize = 15;

/// Identity of a registered biome within one world.
///
/// `generation_id` indexes the generator's biome array and is unique per
/// world. `saved_id` is what ends up in save data: a non-virtual biome saves
/// under its own generation id, a virtual one borrows the saved id of its
/// replace-to target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BiomeIdentity {
    /// Index into the generation array.
    pub generation_id: u16,
    /// Id written to save data; always below [`PHYSICAL_BIOME_LIMIT`].
    pub saved_id: u16,
}

impl BiomeIdentity {
    /// Creates an identity.
    pub const fn new(generation_id: u16, saved_id: u16) -> Self {
        Self {
            generation_id,
            saved_id,
        }
    }

    /// Returns `true` if the generation id lies outside the physical save range.
    pub const fn is_virtual(&self) -> bool {
        self.generation_id >= PHYSICAL_BIOME_LIMIT
    }

    /// Returns `true` if this biome is the one stored under its saved id.
    pub const fn owns_saved_id(&self) -> bool {
        !self.is_virtual() && self.saved_id == self.generation_id
    }
}
