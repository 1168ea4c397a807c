//! Kill distribution, sharing, and caching for the Lineage progression engine.
//!
//! This crate wires the pure progression math in `lineage_ledger` to a
//! [`ProgressionStore`] and runs it once per kill for every player who
//! earned a share.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `lineage-config.yaml` into
//!   strongly-typed structs.
//! - [`sharing`] -- Which participants of a kill receive a share.
//! - [`cache`] -- [`ProgressionCache`] of leveling level and prestige flag.
//! - [`notify`] -- [`NotificationSink`] trait and built-in sinks.
//! - [`locks`] -- Per-player mutual exclusion.
//! - [`engine`] -- [`ProgressionEngine`], multi-participant distribution and
//!   single-track awards.
//! - [`error`] -- [`EngineError`].
//!
//! [`ProgressionStore`]: lineage_store::ProgressionStore

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod locks;
pub mod notify;
pub mod sharing;

pub use cache::{CacheSlot, ProgressionCache};
pub use config::{ConfigError, ProgressionConfig};
pub use engine::{AwardOutcome, KillOutcome, ParticipantOutcome, ProgressionEngine};
pub use error::EngineError;
pub use locks::PlayerLocks;
pub use notify::{NotificationSink, NullSink, ProgressNotice, RecordingSink, TracingSink};
pub use sharing::{ShareCheck, should_share};
