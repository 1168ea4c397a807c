//! Enumeration types for the Lineage progression engine.
//!
//! A [`Track`] names one independent progression ladder. Weapon expertise
//! and blood legacy tracks are keyed by [`WeaponType`] and [`BloodType`];
//! familiar tracks by [`FamiliarId`]. Every track has exactly one
//! [`PrestigeTag`] whose counter slows that track down.

use serde::{Deserialize, Serialize};

use crate::ids::FamiliarId;

// ---------------------------------------------------------------------------
// Weapons and blood
// ---------------------------------------------------------------------------

/// A weapon category with its own expertise ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponType {
    /// One-handed sword.
    Sword,
    /// Axes.
    Axe,
    /// Mace.
    Mace,
    /// Spear.
    Spear,
    /// Crossbow.
    Crossbow,
    /// Two-handed great sword.
    GreatSword,
    /// Paired slashers.
    Slashers,
    /// Pistols.
    Pistols,
    /// Reaper scythe.
    Reaper,
    /// Longbow.
    Longbow,
    /// Whip.
    Whip,
    /// No weapon equipped.
    Unarmed,
    /// Fishing pole.
    FishingPole,
    /// Twin blades.
    TwinBlades,
    /// Daggers.
    Daggers,
    /// Claws.
    Claws,
}

impl WeaponType {
    /// Every weapon type, in declaration order.
    pub const ALL: [Self; 16] = [
        Self::Sword,
        Self::Axe,
        Self::Mace,
        Self::Spear,
        Self::Crossbow,
        Self::GreatSword,
        Self::Slashers,
        Self::Pistols,
        Self::Reaper,
        Self::Longbow,
        Self::Whip,
        Self::Unarmed,
        Self::FishingPole,
        Self::TwinBlades,
        Self::Daggers,
        Self::Claws,
    ];
}

impl core::fmt::Display for WeaponType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Sword => "sword",
            Self::Axe => "axe",
            Self::Mace => "mace",
            Self::Spear => "spear",
            Self::Crossbow => "crossbow",
            Self::GreatSword => "great_sword",
            Self::Slashers => "slashers",
            Self::Pistols => "pistols",
            Self::Reaper => "reaper",
            Self::Longbow => "longbow",
            Self::Whip => "whip",
            Self::Unarmed => "unarmed",
            Self::FishingPole => "fishing_pole",
            Self::TwinBlades => "twin_blades",
            Self::Daggers => "daggers",
            Self::Claws => "claws",
        };
        f.write_str(name)
    }
}

/// A blood type with its own legacy ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BloodType {
    /// Worker blood.
    Worker,
    /// Warrior blood.
    Warrior,
    /// Scholar blood.
    Scholar,
    /// Rogue blood.
    Rogue,
    /// Mutant blood.
    Mutant,
    /// Draculin blood.
    Draculin,
    /// Immortal blood.
    Immortal,
    /// Creature blood.
    Creature,
    /// Brute blood.
    Brute,
    /// Corruption blood.
    Corruption,
}

impl core::fmt::Display for BloodType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Worker => "worker",
            Self::Warrior => "warrior",
            Self::Scholar => "scholar",
            Self::Rogue => "rogue",
            Self::Mutant => "mutant",
            Self::Draculin => "draculin",
            Self::Immortal => "immortal",
            Self::Creature => "creature",
            Self::Brute => "brute",
            Self::Corruption => "corruption",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Tracks
// ---------------------------------------------------------------------------

/// Which raw-gain formula and multiplier set a track uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackKind {
    /// Overall character leveling.
    Leveling,
    /// Per-weapon expertise.
    Expertise,
    /// Per-blood legacy.
    Legacy,
    /// Per-familiar leveling.
    Familiar,
}

/// One independent progression ladder, including its sub-key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Track {
    /// Overall character leveling.
    Leveling,
    /// Expertise in one weapon type.
    Expertise(WeaponType),
    /// Legacy of one blood type.
    Legacy(BloodType),
    /// Level of one familiar.
    Familiar(FamiliarId),
}

impl Track {
    /// The formula family this track belongs to.
    pub const fn kind(self) -> TrackKind {
        match self {
            Self::Leveling => TrackKind::Leveling,
            Self::Expertise(_) => TrackKind::Expertise,
            Self::Legacy(_) => TrackKind::Legacy,
            Self::Familiar(_) => TrackKind::Familiar,
        }
    }

    /// The prestige counter that governs this track's rate.
    pub const fn prestige_tag(self) -> PrestigeTag {
        match self {
            Self::Leveling => PrestigeTag::Experience,
            Self::Expertise(weapon) => PrestigeTag::Expertise(weapon),
            Self::Legacy(blood) => PrestigeTag::Legacy(blood),
            Self::Familiar(familiar) => PrestigeTag::Familiar(familiar),
        }
    }
}

impl core::fmt::Display for Track {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Leveling => f.write_str("leveling"),
            Self::Expertise(weapon) => write!(f, "expertise:{weapon}"),
            Self::Legacy(blood) => write!(f, "legacy:{blood}"),
            Self::Familiar(familiar) => write!(f, "{familiar}"),
        }
    }
}

/// Identifies one prestige counter on a player's [`PrestigeRecord`].
///
/// [`PrestigeTag::Experience`] is the overall experience prestige. It is the
/// leveling track's own counter and also boosts every other track.
///
/// [`PrestigeRecord`]: crate::structs::PrestigeRecord
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrestigeTag {
    /// Overall experience prestige.
    Experience,
    /// Prestige of one weapon's expertise.
    Expertise(WeaponType),
    /// Prestige of one blood legacy.
    Legacy(BloodType),
    /// Prestige of one familiar.
    Familiar(FamiliarId),
}
