//! Raw experience awarded by a single kill.
//!
//! Evaluated once per (kill, recipient, track) before any modifier:
//!
//! | Track | Raw gain |
//! |-------|----------|
//! | Leveling | `mult * victim_level + floor(max_health / 2.5)`, decayed by `exp(-scaling * (recipient_level - victim_level))` when the recipient out-levels the victim |
//! | Expertise, Legacy | `(physical_power + spell_power) * mult` |
//! | Familiar | `victim_level * mult` |
//!
//! `mult` is the track's elite multiplier for `VBlood` victims and its unit
//! multiplier otherwise.

use lineage_types::{TrackKind, VictimDescriptor};

use crate::rates::{GainRates, LevelingRates, TrackRates};

/// Divisor turning victim max health into flat bonus leveling experience.
pub const HEALTH_BONUS_DIVISOR: f64 = 2.5;

/// Compute the raw gain for one recipient on one track family.
///
/// `recipient_level` is only read by the leveling formula.
pub fn raw_gain(
    kind: TrackKind,
    victim: &VictimDescriptor,
    recipient_level: u32,
    rates: &GainRates,
) -> f64 {
    match kind {
        TrackKind::Leveling => leveling_gain(victim, recipient_level, &rates.leveling),
        TrackKind::Expertise => power_gain(victim, &rates.expertise),
        TrackKind::Legacy => power_gain(victim, &rates.legacy),
        TrackKind::Familiar => familiar_gain(victim, &rates.familiar),
    }
}

/// Leveling formula with level-difference decay.
pub fn leveling_gain(victim: &VictimDescriptor, recipient_level: u32, rates: &LevelingRates) -> f64 {
    let base = rates.rates.multiplier(victim.is_elite) * f64::from(victim.level);
    let extra = (victim.max_health / HEALTH_BONUS_DIVISOR).floor();
    let raw = base + extra;

    match recipient_level.checked_sub(victim.level) {
        Some(difference) if difference > 0 => {
            raw * (-rates.level_scaling_multiplier * f64::from(difference)).exp()
        }
        _ => raw,
    }
}

/// Expertise and legacy formula.
pub fn power_gain(victim: &VictimDescriptor, rates: &TrackRates) -> f64 {
    (victim.physical_power + victim.spell_power) * rates.multiplier(victim.is_elite)
}

/// Familiar formula.
pub fn familiar_gain(victim: &VictimDescriptor, rates: &TrackRates) -> f64 {
    f64::from(victim.level) * rates.multiplier(victim.is_elite)
}
