//! Record and event structs.
//!
//! Records ([`ExperienceRecord`], [`PrestigeRecord`], [`RestedXpRecord`])
//! are what the persistence collaborator stores per player. Descriptors
//! ([`VictimDescriptor`], [`Participant`], [`KillEvent`]) are what the host
//! reads from the game world and hands to the engine.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{BloodType, PrestigeTag, Track, WeaponType};
use crate::ids::{KillId, PlayerId};

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Level and cumulative experience on one track.
///
/// `level` always equals the curve level of `xp`, clamped to the track's
/// max level. Records are created lazily: a missing record reads as the
/// default `{ level: 0, xp: 0.0 }`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceRecord {
    /// Current level.
    pub level: u32,
    /// Cumulative experience.
    pub xp: f64,
}

impl ExperienceRecord {
    /// Create a record from a level and XP pair.
    pub const fn new(level: u32, xp: f64) -> Self {
        Self { level, xp }
    }
}

/// One `(tag, count)` pair as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrestigeEntry {
    /// The prestige counter.
    pub tag: PrestigeTag,
    /// How many times the player has prestiged it.
    pub count: u32,
}

/// Every prestige counter of one player.
///
/// Shared by all of the player's tracks. Serialized as a list of
/// [`PrestigeEntry`] values because the tags are not string keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<PrestigeEntry>", into = "Vec<PrestigeEntry>")]
pub struct PrestigeRecord {
    counts: BTreeMap<PrestigeTag, u32>,
}

impl PrestigeRecord {
    /// Create an empty record (every counter at zero).
    pub const fn new() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }

    /// Return the count for `tag`, zero when the player never prestiged it.
    pub fn count(&self, tag: PrestigeTag) -> u32 {
        self.counts.get(&tag).copied().unwrap_or(0)
    }

    /// Set the count for `tag`. Setting zero removes the entry.
    pub fn set(&mut self, tag: PrestigeTag, count: u32) {
        if count == 0 {
            self.counts.remove(&tag);
        } else {
            self.counts.insert(tag, count);
        }
    }

    /// Builder form of [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, tag: PrestigeTag, count: u32) -> Self {
        self.set(tag, count);
        self
    }

    /// Whether the overall experience prestige is above zero.
    pub fn has_prestiged(&self) -> bool {
        self.count(PrestigeTag::Experience) > 0
    }
}

impl From<Vec<PrestigeEntry>> for PrestigeRecord {
    fn from(entries: Vec<PrestigeEntry>) -> Self {
        let mut record = Self::new();
        for entry in entries {
            record.set(entry.tag, entry.count);
        }
        record
    }
}

impl From<PrestigeRecord> for Vec<PrestigeEntry> {
    fn from(record: PrestigeRecord) -> Self {
        record
            .counts
            .into_iter()
            .map(|(tag, count)| PrestigeEntry { tag, count })
            .collect()
    }
}

/// A player's rested-XP pool on the leveling track.
///
/// The pool shrinks by every bonus it grants. The timestamp belongs to the
/// accrual process and is never touched by an award.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RestedXpRecord {
    /// When the pool was last accrued.
    pub timestamp: DateTime<Utc>,
    /// Remaining bonus experience, never negative.
    pub pool: f64,
}

/// Cached `(level, has_prestiged)` view of a player.
///
/// Derived from the leveling [`ExperienceRecord`] and the
/// [`PrestigeTag::Experience`] counter; never authoritative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProgressionSnapshot {
    /// Leveling-track level.
    pub level: u32,
    /// Whether the overall experience prestige is above zero.
    pub has_prestiged: bool,
}

// ---------------------------------------------------------------------------
// Kill events
// ---------------------------------------------------------------------------

/// Attributes of a slain unit, read by the host before calling the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VictimDescriptor {
    /// Unit level.
    pub level: u32,
    /// Maximum health.
    pub max_health: f64,
    /// Physical power stat.
    pub physical_power: f64,
    /// Spell power stat.
    pub spell_power: f64,
    /// Whether the unit is an elite (`VBlood`) unit.
    #[serde(default)]
    pub is_elite: bool,
}

/// A player taking part in a kill, as seen from the killer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// The player.
    pub player: PlayerId,
    /// Currently equipped weapon (keys expertise routing).
    pub weapon: WeaponType,
    /// Current blood type (keys the legacy track).
    ///
    /// Kill distribution never reads it: legacy is awarded per blood
    /// through [`Participant::legacy_track`] when the host asks for it.
    pub blood: BloodType,
    /// Whether the player is allied with the killer.
    #[serde(default)]
    pub allied_with_source: bool,
    /// Whether the killer has this player on an ignore list.
    #[serde(default)]
    pub ignored: bool,
}

impl Participant {
    /// Expertise track of the equipped weapon.
    pub const fn expertise_track(&self) -> Track {
        Track::Expertise(self.weapon)
    }

    /// Legacy track of the current blood type.
    pub const fn legacy_track(&self) -> Track {
        Track::Legacy(self.blood)
    }
}

/// One kill handed to the engine by the host.
///
/// The engine never discovers participants itself; it only filters the
/// supplied list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KillEvent {
    /// Identifier for log correlation.
    #[serde(default)]
    pub id: KillId,
    /// The killer. Always receives a share.
    pub source: Participant,
    /// Other players near the kill. Duplicates and the killer are ignored.
    #[serde(default)]
    pub participants: Vec<Participant>,
    /// The slain unit.
    pub victim: VictimDescriptor,
    /// Whether the victim is a non-player unit.
    #[serde(default = "default_true")]
    pub is_pve: bool,
    /// Explicit group multiplier; when absent the engine derives one.
    #[serde(default)]
    pub group_multiplier: Option<f64>,
}

const fn default_true() -> bool {
    true
}
