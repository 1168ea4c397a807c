//! Error types for the progression engine.

use lineage_store::StoreError;
use lineage_types::{PlayerId, Track};

/// Errors that can occur while awarding experience.
///
/// Gameplay inputs never produce an error; only the persistence
/// collaborator can fail, and its failures propagate unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// A store call failed while updating one player's track.
    #[error("store failed for player {player} on track {track}: {source}")]
    Store {
        /// The player being updated.
        player: PlayerId,
        /// The track being read or written.
        track: Track,
        /// The underlying store error.
        source: StoreError,
    },

    /// A store call failed outside any one track (cache derivation, prestige).
    #[error("store failed: {source}")]
    Unavailable {
        /// The underlying store error.
        #[from]
        source: StoreError,
    },
}

impl EngineError {
    /// The store error underneath, whichever variant carries it.
    pub const fn store_error(&self) -> &StoreError {
        match self {
            Self::Store { source, .. } | Self::Unavailable { source } => source,
        }
    }
}
