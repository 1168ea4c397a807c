//! Progression math for the Lineage engine.
//!
//! Every track (leveling, weapon expertise, blood legacy, familiars) runs
//! the same pipeline for each kill. This crate holds that pipeline as pure
//! functions: nothing here touches storage, locks, or the clock.
//!
//! # Pipeline
//!
//! ```text
//! raw_gain  -->  ModifierStack::apply  -->  draw_rested_bonus  -->  apply_gain
//!  (gain)          (modifiers)             (rested, leveling only)   (apply)
//! ```
//!
//! # Modules
//!
//! - [`curve`] -- The shared level/XP curve.
//! - [`rates`] -- Per-track multipliers, caps, and prestige constants.
//! - [`gain`] -- Raw gain formulas per track family.
//! - [`modifiers`] -- Prestige reduction, overall-prestige bonus, group multiplier.
//! - [`rested`] -- Rested-XP pool draws.
//! - [`apply`] -- Apply-and-cap transition and its `(get, set)` wrapper.
//!
//! # Usage
//!
//! ```
//! use lineage_ledger::{GainRates, ModifierStack, apply_gain, final_gain};
//! use lineage_types::{ExperienceRecord, Track, VictimDescriptor};
//!
//! let rates = GainRates::default();
//! let victim = VictimDescriptor {
//!     level: 20,
//!     max_health: 250.0,
//!     physical_power: 30.0,
//!     spell_power: 10.0,
//!     is_elite: false,
//! };
//!
//! // 7.5 * 20 + floor(250 / 2.5) = 250
//! let gain = final_gain(Track::Leveling, &victim, 10, &ModifierStack::neutral(), &rates);
//! let outcome = apply_gain(ExperienceRecord::new(1, 100.0), gain, 90);
//! assert_eq!(outcome.record.level, 1);
//! assert!(!outcome.leveled_up);
//! ```

pub mod apply;
pub mod curve;
pub mod gain;
pub mod modifiers;
pub mod rates;
pub mod rested;

// Re-export primary types at crate root.
pub use apply::{LedgerOutcome, apply_and_persist, apply_gain};
pub use curve::{level_progress_percent, level_to_xp, xp_to_level};
pub use gain::raw_gain;
pub use modifiers::ModifierStack;
pub use rates::{GainRates, LevelingRates, PrestigeRates, TrackRates};
pub use rested::{RestedDraw, draw_rested_bonus};

use lineage_types::{Track, VictimDescriptor};

/// Raw gain for `track`, scaled by `modifiers`.
///
/// The rested bonus is not included; it depends on mutable pool state and
/// is drawn separately by the caller.
pub fn final_gain(
    track: Track,
    victim: &VictimDescriptor,
    recipient_level: u32,
    modifiers: &ModifierStack,
    rates: &GainRates,
) -> f64 {
    let raw = raw_gain(track.kind(), victim, recipient_level, rates);
    modifiers.apply(raw, &rates.prestige)
}
