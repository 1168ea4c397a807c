//! The level curve shared by every track.
//!
//! # Formula
//!
//! ```text
//! level = floor(c * sqrt(xp))        c = 0.1
//! xp    = floor((level / c) ^ 2)
//! ```
//!
//! `1 / c` is stored as the integer step [`LEVEL_STEP`] and divided by, not
//! multiplied by `c`: `3.0 / 0.1` is `29.999999999999996` in binary floating
//! point and would floor level 3 to 899 XP. With the step form every
//! threshold is an exact perfect square and the two functions are exact
//! inverses for every level below nine million.

/// The curve constant `c`.
pub const CURVE_CONSTANT: f64 = 0.1;

/// `1 / CURVE_CONSTANT`: experience-root units per level.
pub const LEVEL_STEP: f64 = 10.0;

/// Convert cumulative experience to a level.
///
/// Non-decreasing in `xp`. Negative input is not a valid experience value
/// and reads as zero.
pub fn xp_to_level(xp: f64) -> u32 {
    floor_to_u32(xp.max(0.0).sqrt() / LEVEL_STEP)
}

/// Convert a level to the cumulative experience at which it starts.
pub fn level_to_xp(level: u32) -> f64 {
    let root = f64::from(level) * LEVEL_STEP;
    (root * root).floor()
}

/// How far `xp` is between its level's threshold and the next one, as a
/// percentage in `[0, 100)`.
pub fn level_progress_percent(xp: f64) -> f64 {
    let level = xp_to_level(xp);
    let floor = level_to_xp(level);
    let ceiling = level_to_xp(level.saturating_add(1));
    let span = ceiling - floor;
    if span <= 0.0 {
        return 0.0;
    }
    (((xp - floor) / span) * 100.0).clamp(0.0, 100.0)
}

/// Floor a non-negative float into a `u32`, saturating at both ends.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn floor_to_u32(value: f64) -> u32 {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    if value >= f64::from(u32::MAX) {
        return u32::MAX;
    }
    value.floor() as u32
}
