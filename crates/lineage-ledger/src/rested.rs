//! Rested-experience bonus on the leveling track.
//!
//! A rested pool matches each leveling gain one-for-one until it runs dry:
//! `bonus = min(gain, pool)`, the award becomes `gain + bonus`, and the pool
//! loses `bonus`. The pool's timestamp belongs to the accrual process and is
//! carried through untouched.

use lineage_types::RestedXpRecord;

/// Result of drawing on a rested pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestedDraw {
    /// Bonus granted on top of the gain.
    pub bonus: f64,
    /// The pool after the draw, `None` when there was no pool to draw on.
    pub record: Option<RestedXpRecord>,
}

impl RestedDraw {
    /// A draw that grants nothing and leaves storage alone.
    pub const fn none() -> Self {
        Self {
            bonus: 0.0,
            record: None,
        }
    }

    /// Whether the pool changed and must be written back.
    pub fn is_spent(&self) -> bool {
        self.bonus > 0.0 && self.record.is_some()
    }
}

/// Draw a bonus for `gain` out of `record`.
///
/// Grants nothing when the feature is disabled or the player has no pool.
pub fn draw_rested_bonus(gain: f64, record: Option<RestedXpRecord>, enabled: bool) -> RestedDraw {
    let Some(mut record) = record.filter(|_| enabled) else {
        return RestedDraw::none();
    };

    let bonus = gain.min(record.pool).max(0.0);
    record.pool = (record.pool - bonus).max(0.0);

    RestedDraw {
        bonus,
        record: Some(record),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn pool(amount: f64) -> RestedXpRecord {
        RestedXpRecord {
            timestamp: Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).single().unwrap_or_default(),
            pool: amount,
        }
    }

    #[test]
    fn bonus_matches_gain_when_pool_is_large() {
        let draw = draw_rested_bonus(150.0, Some(pool(900.0)), true);
        assert!(approx(draw.bonus, 150.0));
        assert!(approx(draw.record.map_or(-1.0, |r| r.pool), 750.0));
    }

    #[test]
    fn bonus_capped_by_pool() {
        let draw = draw_rested_bonus(150.0, Some(pool(120.0)), true);
        assert!(approx(draw.bonus, 120.0));
        assert!(approx(draw.record.map_or(-1.0, |r| r.pool), 0.0));
    }

    #[test]
    fn timestamp_preserved() {
        let before = pool(200.0);
        let draw = draw_rested_bonus(50.0, Some(before), true);
        assert_eq!(draw.record.map(|r| r.timestamp), Some(before.timestamp));
    }

    #[test]
    fn disabled_grants_nothing() {
        let draw = draw_rested_bonus(150.0, Some(pool(900.0)), false);
        assert_eq!(draw, RestedDraw::none());
        assert!(!draw.is_spent());
    }

    #[test]
    fn missing_pool_grants_nothing() {
        let draw = draw_rested_bonus(150.0, None, true);
        assert_eq!(draw, RestedDraw::none());
    }

    #[test]
    fn empty_pool_is_not_spent() {
        let draw = draw_rested_bonus(150.0, Some(pool(0.0)), true);
        assert!(approx(draw.bonus, 0.0));
        assert!(!draw.is_spent());
    }

    #[test]
    fn bonus_never_exceeds_either_bound() {
        for (gain, amount) in [(10.0, 5.0), (5.0, 10.0), (0.0, 10.0), (7.25, 7.25)] {
            let draw = draw_rested_bonus(gain, Some(pool(amount)), true);
            assert!(draw.bonus <= gain.min(amount) + 1e-12);
            let after = draw.record.map_or(-1.0, |r| r.pool);
            assert!(approx(after, amount - draw.bonus));
        }
    }
}
