//! Prestige and group modifiers applied on top of a raw gain.
//!
//! ```text
//! factor = max(0, 1 - reducer * own_prestige + multiplier * overall_prestige)
//! final  = raw * factor * group_multiplier
//! ```
//!
//! `own_prestige` is the counter of the track being awarded and
//! `overall_prestige` the [`PrestigeTag::Experience`] counter. The leveling
//! track's own counter *is* the experience counter, so it never receives
//! the overall bonus: a prestiged player levels slower, and every other
//! track of theirs levels faster.

use lineage_types::{PrestigeRecord, PrestigeTag, Track};

use crate::rates::PrestigeRates;

/// The inputs that scale a raw gain for one recipient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModifierStack {
    /// Prestige count of the awarded track.
    pub own_prestige: u32,
    /// Overall experience prestige count contributing a bonus.
    pub overall_prestige: u32,
    /// Scalar applied uniformly to every participant of a shared kill.
    pub group_multiplier: f64,
}

impl ModifierStack {
    /// A stack with no prestige and a neutral group multiplier.
    pub const fn neutral() -> Self {
        Self {
            own_prestige: 0,
            overall_prestige: 0,
            group_multiplier: 1.0,
        }
    }

    /// Read the relevant counters for `track` out of a prestige record.
    pub fn for_track(track: Track, prestige: &PrestigeRecord, group_multiplier: f64) -> Self {
        let own_prestige = prestige.count(track.prestige_tag());
        let overall_prestige = match track {
            Track::Leveling => 0,
            _ => prestige.count(PrestigeTag::Experience),
        };
        Self {
            own_prestige,
            overall_prestige,
            group_multiplier,
        }
    }

    /// The combined prestige factor, never negative.
    pub fn prestige_factor(&self, rates: &PrestigeRates) -> f64 {
        let mut factor = 1.0;
        if self.own_prestige > 0 {
            factor -= rates.rates_reducer * f64::from(self.own_prestige);
        }
        if self.overall_prestige > 0 {
            factor += rates.rate_multiplier * f64::from(self.overall_prestige);
        }
        factor.max(0.0)
    }

    /// Scale `raw` by the prestige factor and the group multiplier.
    pub fn apply(&self, raw: f64, rates: &PrestigeRates) -> f64 {
        raw * self.prestige_factor(rates) * self.group_multiplier
    }
}

impl Default for ModifierStack {
    fn default() -> Self {
        Self::neutral()
    }
}

#[cfg(test)]
mod tests {
    use lineage_types::WeaponType;

    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn stack(own: u32, overall: u32, group: f64) -> ModifierStack {
        ModifierStack {
            own_prestige: own,
            overall_prestige: overall,
            group_multiplier: group,
        }
    }

    #[test]
    fn neutral_is_identity() {
        let rates = PrestigeRates::default();
        assert!(approx(ModifierStack::neutral().apply(123.0, &rates), 123.0));
    }

    #[test]
    fn own_prestige_reduces() {
        let rates = PrestigeRates::default();
        assert!(approx(stack(2, 0, 1.0).prestige_factor(&rates), 0.8));
        assert!(approx(stack(4, 0, 1.0).apply(100.0, &rates), 60.0));
    }

    #[test]
    fn overall_prestige_adds() {
        let rates = PrestigeRates::default();
        assert!(approx(stack(0, 3, 1.0).prestige_factor(&rates), 1.3));
        // Both terms on one factor: 1 - 0.1 * 2 + 0.1 * 1
        assert!(approx(stack(2, 1, 1.0).prestige_factor(&rates), 0.9));
    }

    #[test]
    fn factor_clamps_at_zero() {
        let rates = PrestigeRates::default();
        assert!(approx(stack(15, 0, 1.0).prestige_factor(&rates), 0.0));
        assert!(approx(stack(15, 0, 2.0).apply(500.0, &rates), 0.0));
    }

    #[test]
    fn group_multiplier_applies_last() {
        let rates = PrestigeRates::default();
        // 100 * 0.8 * 1.5
        assert!(approx(stack(2, 0, 1.5).apply(100.0, &rates), 120.0));
    }

    #[test]
    fn leveling_track_skips_overall_bonus() {
        let prestige = PrestigeRecord::new().with(PrestigeTag::Experience, 3);
        let leveling = ModifierStack::for_track(Track::Leveling, &prestige, 1.0);
        assert_eq!(leveling.own_prestige, 3);
        assert_eq!(leveling.overall_prestige, 0);

        let expertise = ModifierStack::for_track(Track::Expertise(WeaponType::Mace), &prestige, 1.0);
        assert_eq!(expertise.own_prestige, 0);
        assert_eq!(expertise.overall_prestige, 3);
    }
}
