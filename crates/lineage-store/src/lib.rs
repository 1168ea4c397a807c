//! Persistence interface for the Lineage progression engine.
//!
//! The engine treats per-player records as a synchronous key-value store.
//! File formats, locations, and flushing belong to the implementation
//! behind [`ProgressionStore`]; the engine only reads and writes whole
//! records for one player at a time.
//!
//! # Key Space
//!
//! | Key | Value | Missing reads as |
//! |-----|-------|------------------|
//! | `(player, track)` | [`ExperienceRecord`] | `{ level: 0, xp: 0.0 }` |
//! | `player` | [`PrestigeRecord`] | every counter at zero |
//! | `player` | [`RestedXpRecord`] | `None` |
//!
//! # Modules
//!
//! - [`memory`] -- [`MemoryStore`], an in-process implementation
//! - [`error`] -- [`StoreError`]

pub mod error;
pub mod memory;

pub use error::StoreError;
pub use memory::MemoryStore;

use lineage_types::{ExperienceRecord, PlayerId, PrestigeRecord, RestedXpRecord, Track};

/// Synchronous per-player record storage.
///
/// Implementations must be safe to share between threads. They do not have
/// to provide multi-key transactions: the engine serializes every
/// read-modify-write of one player itself.
pub trait ProgressionStore: Send + Sync {
    /// Read a player's record on `track`.
    fn experience(&self, player: PlayerId, track: Track) -> Result<ExperienceRecord, StoreError>;

    /// Replace a player's record on `track`.
    fn set_experience(
        &self,
        player: PlayerId,
        track: Track,
        record: ExperienceRecord,
    ) -> Result<(), StoreError>;

    /// Read a player's prestige counters.
    fn prestige(&self, player: PlayerId) -> Result<PrestigeRecord, StoreError>;

    /// Replace a player's prestige counters.
    fn set_prestige(&self, player: PlayerId, record: PrestigeRecord) -> Result<(), StoreError>;

    /// Read a player's rested pool, if they have one.
    fn rested_xp(&self, player: PlayerId) -> Result<Option<RestedXpRecord>, StoreError>;

    /// Replace a player's rested pool.
    fn set_rested_xp(&self, player: PlayerId, record: RestedXpRecord) -> Result<(), StoreError>;
}
