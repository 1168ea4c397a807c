//! Apply-and-cap: the one state transition every track shares.
//!
//! Given a track's current `(level, xp)`, a fully modified gain, and the
//! track's max level:
//!
//! 1. At or above max level: no-op, the gain is not consumed.
//! 2. `xp += gain`, `level = xp_to_level(xp)`.
//! 3. `leveled_up = level > previous level`.
//! 4. Past max level: clamp to `(max_level, level_to_xp(max_level))`.
//!
//! [`apply_gain`] is the pure transition. [`apply_and_persist`] wraps it in
//! a `(get, set)` accessor pair so the same code drives every track and
//! sub-key regardless of where the record lives.

use lineage_types::ExperienceRecord;

use crate::curve::{level_to_xp, xp_to_level};

/// Result of applying a gain to one track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedgerOutcome {
    /// The record before the gain.
    pub previous: ExperienceRecord,
    /// The record after the gain (equal to `previous` on a no-op).
    pub record: ExperienceRecord,
    /// Experience actually added, after clamping.
    pub gained: f64,
    /// Whether the level increased.
    pub leveled_up: bool,
    /// Whether the track was already capped and nothing happened.
    pub capped: bool,
}

impl LedgerOutcome {
    /// Outcome for a track already at its cap.
    pub const fn capped(record: ExperienceRecord) -> Self {
        Self {
            previous: record,
            record,
            gained: 0.0,
            leveled_up: false,
            capped: true,
        }
    }
}

/// Apply `gained` to `current` under `max_level`.
///
/// Negative gains are treated as zero; experience never decreases except
/// when the cap clamps it.
pub fn apply_gain(current: ExperienceRecord, gained: f64, max_level: u32) -> LedgerOutcome {
    if current.level >= max_level {
        return LedgerOutcome::capped(current);
    }

    let mut xp = current.xp + gained.max(0.0);
    let mut level = xp_to_level(xp);
    let leveled_up = level > current.level;

    if level > max_level {
        level = max_level;
        xp = level_to_xp(max_level);
    }

    let record = ExperienceRecord::new(level, xp);
    LedgerOutcome {
        previous: current,
        record,
        gained: record.xp - current.xp,
        leveled_up,
        capped: false,
    }
}

/// Load a record, apply a gain, and write the result back.
///
/// A capped track is not written. Errors from either accessor propagate
/// unchanged; a failed `get` never reaches `set`.
pub fn apply_and_persist<E, G, S>(
    get: G,
    set: S,
    gained: f64,
    max_level: u32,
) -> Result<LedgerOutcome, E>
where
    G: FnOnce() -> Result<ExperienceRecord, E>,
    S: FnOnce(ExperienceRecord) -> Result<(), E>,
{
    let current = get()?;
    let outcome = apply_gain(current, gained, max_level);
    if outcome.capped {
        tracing::trace!(level = current.level, max_level, "Track capped, gain dropped");
        return Ok(outcome);
    }
    set(outcome.record)?;
    Ok(outcome)
}
