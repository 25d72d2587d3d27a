//! Load errors and warnings.

use std::fmt;

use nebula_settings::SettingsError;

use crate::id_store::IdStoreError;

/// Broad class of a [`BiomeLoadError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The biome configs themselves are inconsistent.
    Configuration,
    /// The world ran out of biome ids.
    Capacity,
    /// Persisted identities contradict each other.
    Invariant,
    /// Reading or writing files failed.
    Io,
}

/// A fatal error. The load (or reload) that raised it is abandoned and the
/// previously published index stays in place.
#[derive(Debug, thiserror::Error)]
pub enum BiomeLoadError {
    /// Settings discovery or parsing failed.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// The biome id file could not be read or written.
    #[error(transparent)]
    IdStore(#[from] IdStoreError),

    /// An `extends` chain is longer than [`crate::MAX_INHERITANCE_DEPTH`].
    #[error(
        "biome {biome} cannot extend biome {parent}: more than {max} levels of inheritance, cyclical inheritance?"
    )]
    InheritanceTooDeep {
        /// Biome being resolved when the bound was hit.
        biome: String,
        /// Parent it tried to extend.
        parent: String,
        /// The bound.
        max: usize,
    },

    /// An `inherit-mobs` chain is longer than [`crate::MAX_INHERITANCE_DEPTH`].
    #[error(
        "biome {biome} cannot inherit mobs from biome {parent}: more than {max} levels of inheritance, cyclical inheritance?"
    )]
    MobInheritanceTooDeep {
        /// Biome being resolved when the bound was hit.
        biome: String,
        /// Parent it tried to inherit from.
        parent: String,
        /// The bound.
        max: usize,
    },

    /// A virtual biome has no save target and no default ocean to fall back on.
    #[error(
        "biome {biome} replaces to {target}, which could not be found and no default ocean biome is available; a replace-to target must be a non-virtual or default biome"
    )]
    UnresolvedSaveTarget {
        /// Virtual biome.
        biome: String,
        /// Its declared target (empty if it declares none).
        target: String,
    },

    /// No generation id is left in the range the biome needs.
    #[error("biome {biome} could not be registered, no free biome ids in {start}..{end}")]
    NoFreeBiomeIds {
        /// First biome that did not fit.
        biome: String,
        /// Start of the searched range.
        start: usize,
        /// End of the searched range (exclusive).
        end: usize,
    },

    /// Two different biomes are recorded under the same generation id.
    #[error("biomes {existing} and {claimant} are both recorded with generation id {generation_id}")]
    IdentityConflict {
        /// Contested id.
        generation_id: u16,
        /// Biome that claimed it first.
        existing: String,
        /// Biome that claimed it second.
        claimant: String,
    },

    /// One biome is recorded twice with different generation ids.
    #[error("biome {biome} is recorded with two generation ids, {first} and {second}")]
    ConflictingRecords {
        /// Biome name.
        biome: String,
        /// Id from the first record.
        first: u16,
        /// Id from the second record.
        second: u16,
    },

    /// A record points past the end of the generation array.
    #[error("biome {biome} is recorded with generation id {generation_id}, but the world only has {capacity} biome slots")]
    RecordOutOfRange {
        /// Biome name.
        biome: String,
        /// Recorded id.
        generation_id: u16,
        /// Array size.
        capacity: usize,
    },
}

impl BiomeLoadError {
    /// Which class of failure this is.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Settings(_) | Self::IdStore(_) => ErrorKind::Io,
            Self::InheritanceTooDeep { .. }
            | Self::MobInheritanceTooDeep { .. }
            | Self::UnresolvedSaveTarget { .. } => ErrorKind::Configuration,
            Self::NoFreeBiomeIds { .. } => ErrorKind::Capacity,
            Self::IdentityConflict { .. }
            | Self::ConflictingRecords { .. }
            | Self::RecordOutOfRange { .. } => ErrorKind::Invariant,
        }
    }
}

/// A problem that degrades a biome but does not stop the load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadWarning {
    /// `extends` names a biome that does not exist.
    MissingParent {
        /// Extending biome.
        biome: String,
        /// Missing parent.
        parent: String,
    },
    /// `inherit-mobs` names neither a biome nor a default biome.
    MissingMobParent {
        /// Inheriting biome.
        biome: String,
        /// Unknown parent.
        parent: String,
    },
    /// A biome lists itself in `inherit-mobs`.
    SelfMobInheritance {
        /// The biome.
        biome: String,
    },
    /// A setting value could not be parsed; the default was used.
    InvalidSetting {
        /// The biome.
        biome: String,
        /// Setting name.
        setting: &'static str,
        /// Raw value.
        value: String,
        /// Parser message.
        reason: String,
    },
    /// A virtual biome's target was not found; the default ocean's saved id
    /// was used instead.
    SaveTargetFallback {
        /// Virtual biome.
        biome: String,
        /// Declared target.
        target: String,
        /// Biome whose saved id was borrowed.
        fallback: String,
    },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingParent { biome, parent } => write!(
                f,
                "biome {biome} tried to extend biome {parent}, but that biome doesn't exist"
            ),
            Self::MissingMobParent { biome, parent } => write!(
                f,
                "biome {biome} tried to inherit mobs from biome {parent}, but that biome doesn't exist"
            ),
            Self::SelfMobInheritance { biome } => {
                write!(f, "biome {biome} tried to inherit mobs from itself")
            }
            Self::InvalidSetting {
                biome,
                setting,
                value,
                reason,
            } => write!(
                f,
                "biome {biome}: invalid value {value:?} for {setting} ({reason}), using default"
            ),
            Self::SaveTargetFallback {
                biome,
                target,
                fallback,
            } => write!(
                f,
                "biome {biome} replaces to {target}, which could not be found; saving it as {fallback}"
            ),
        }
    }
}

/// Logs `warning` and keeps it for the load report.
pub(crate) fn push_warning(warnings: &mut Vec<LoadWarning>, warning: LoadWarning) {
    tracing::warn!("{}", warning);
    warnings.push(warning);
}
