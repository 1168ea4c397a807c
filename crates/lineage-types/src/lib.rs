//! Shared type definitions for the Lineage progression engine.
//!
//! This crate is the single source of truth for the identifiers, tracks,
//! and records used across the workspace. It holds no logic beyond
//! constructors and accessors.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe identifiers for players, kills, and familiars
//! - [`enums`] -- Weapons, bloods, tracks, and prestige tags
//! - [`structs`] -- Persisted records and kill-event descriptors

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{BloodType, PrestigeTag, Track, TrackKind, WeaponType};
pub use ids::{FamiliarId, KillId, PlayerId};
pub use structs::{
    ExperienceRecord, KillEvent, Participant, PrestigeEntry, PrestigeRecord, ProgressionSnapshot,
    RestedXpRecord, VictimDescriptor,
};
