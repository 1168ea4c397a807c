//! Tunable rates for the gain formulas.
//!
//! These values correspond to the per-track multipliers, level caps, and
//! prestige constants loaded from `lineage-config.yaml`. The [`GainRates`]
//! struct bundles every tunable so that callers (the engine, tests) can
//! override defaults.

use lineage_types::TrackKind;

/// Multipliers and cap for one track family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackRates {
    /// Multiplier for ordinary unit kills.
    pub unit_multiplier: f64,
    /// Multiplier for elite (`VBlood`) kills.
    pub elite_multiplier: f64,
    /// Highest reachable level.
    pub max_level: u32,
}

impl TrackRates {
    /// Pick the multiplier for a victim category.
    pub const fn multiplier(&self, is_elite: bool) -> f64 {
        if is_elite {
            self.elite_multiplier
        } else {
            self.unit_multiplier
        }
    }
}

/// Leveling-track rates, which add level-difference decay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelingRates {
    /// Multipliers and cap.
    pub rates: TrackRates,
    /// Exponential decay rate per level the recipient is above the victim.
    pub level_scaling_multiplier: f64,
}

/// Prestige constants shared by every track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrestigeRates {
    /// Rate lost per prestige of the track being awarded.
    pub rates_reducer: f64,
    /// Rate gained per overall experience prestige.
    pub rate_multiplier: f64,
}

impl Default for PrestigeRates {
    fn default() -> Self {
        Self {
            rates_reducer: 0.10,
            rate_multiplier: 0.10,
        }
    }
}

/// Every rate the gain pipeline reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainRates {
    /// Overall leveling (default: 7.5 / 15, cap 90, scaling 0.05).
    pub leveling: LevelingRates,
    /// Weapon expertise (default: 2 / 5, cap 100).
    pub expertise: TrackRates,
    /// Blood legacy (default: 1 / 5, cap 100).
    pub legacy: TrackRates,
    /// Familiar leveling (default: 7.5 / 15, cap 90).
    pub familiar: TrackRates,
    /// Prestige reducer and bonus.
    pub prestige: PrestigeRates,
}

impl Default for GainRates {
    fn default() -> Self {
        Self {
            leveling: LevelingRates {
                rates: TrackRates {
                    unit_multiplier: 7.5,
                    elite_multiplier: 15.0,
                    max_level: 90,
                },
                level_scaling_multiplier: 0.05,
            },
            expertise: TrackRates {
                unit_multiplier: 2.0,
                elite_multiplier: 5.0,
                max_level: 100,
            },
            legacy: TrackRates {
                unit_multiplier: 1.0,
                elite_multiplier: 5.0,
                max_level: 100,
            },
            familiar: TrackRates {
                unit_multiplier: 7.5,
                elite_multiplier: 15.0,
                max_level: 90,
            },
            prestige: PrestigeRates::default(),
        }
    }
}

impl GainRates {
    /// The multiplier set for a track family.
    pub const fn track(&self, kind: TrackKind) -> &TrackRates {
        match kind {
            TrackKind::Leveling => &self.leveling.rates,
            TrackKind::Expertise => &self.expertise,
            TrackKind::Legacy => &self.legacy,
            TrackKind::Familiar => &self.familiar,
        }
    }

    /// The level cap for a track family.
    pub const fn max_level(&self, kind: TrackKind) -> u32 {
        self.track(kind).max_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_caps() {
        let rates = GainRates::default();
        assert_eq!(rates.max_level(TrackKind::Leveling), 90);
        assert_eq!(rates.max_level(TrackKind::Expertise), 100);
        assert_eq!(rates.max_level(TrackKind::Legacy), 100);
        assert_eq!(rates.max_level(TrackKind::Familiar), 90);
    }

    #[test]
    fn elite_multiplier_is_distinct() {
        let rates = GainRates::default();
        for kind in [
            TrackKind::Leveling,
            TrackKind::Expertise,
            TrackKind::Legacy,
            TrackKind::Familiar,
        ] {
            let track = rates.track(kind);
            assert!(track.multiplier(true) > track.multiplier(false), "{kind:?}");
        }
    }
}
