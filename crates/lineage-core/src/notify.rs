//! Notification sink trait and built-in implementations.
//!
//! The engine reports numeric facts after each award; turning them into
//! chat messages, sounds, or UI is the host's job. A [`NotificationSink`]
//! is called synchronously from inside the award, after the store and the
//! cache have both been updated.

use parking_lot::Mutex;
use serde::Serialize;

use lineage_types::{PlayerId, Track};

/// A fact about one player's progression, produced by an award.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProgressNotice {
    /// The track reached a new level.
    LevelUp {
        /// Track that leveled.
        track: Track,
        /// The level now stored.
        new_level: u32,
    },
    /// Experience was added to the track.
    Gain {
        /// Track that gained.
        track: Track,
        /// Experience actually stored, rested bonus included.
        gained: f64,
        /// Portion of `gained` that came from the rested pool.
        rested_bonus: f64,
        /// Progress from the current level's threshold to the next, in percent.
        progress_percent: f64,
    },
}

impl ProgressNotice {
    /// The track this notice is about.
    pub const fn track(&self) -> Track {
        match self {
            Self::LevelUp { track, .. } | Self::Gain { track, .. } => *track,
        }
    }
}

/// Receives progression notices.
///
/// Implementations must not call back into the engine for the same player;
/// the player's lock is held while `notify` runs.
pub trait NotificationSink: Send + Sync {
    /// Deliver one notice for `player`.
    fn notify(&self, player: PlayerId, notice: ProgressNotice);
}

/// Discards every notice.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&self, _player: PlayerId, _notice: ProgressNotice) {}
}

/// Emits every notice as a `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, player: PlayerId, notice: ProgressNotice) {
        match notice {
            ProgressNotice::LevelUp { track, new_level } => {
                tracing::info!(%player, %track, new_level, "Level up");
            }
            ProgressNotice::Gain {
                track,
                gained,
                rested_bonus,
                progress_percent,
            } => {
                tracing::debug!(%player, %track, gained, rested_bonus, progress_percent, "Experience gained");
            }
        }
    }
}

/// Keeps every notice in memory, in delivery order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    notices: Mutex<Vec<(PlayerId, ProgressNotice)>>,
}

impl RecordingSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every notice received so far.
    pub fn notices(&self) -> Vec<(PlayerId, ProgressNotice)> {
        self.notices.lock().clone()
    }

    /// Notices received for one player.
    pub fn for_player(&self, player: PlayerId) -> Vec<ProgressNotice> {
        self.notices
            .lock()
            .iter()
            .filter(|(p, _)| *p == player)
            .map(|(_, notice)| *notice)
            .collect()
    }

    /// Forget everything received so far.
    pub fn clear(&self) {
        self.notices.lock().clear();
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, player: PlayerId, notice: ProgressNotice) {
        self.notices.lock().push((player, notice));
    }
}

#[cfg(test)]
mod tests {
    use lineage_types::WeaponType;

    use super::*;

    #[test]
    fn recording_sink_keeps_order_per_player() {
        let sink = RecordingSink::new();
        let alice = PlayerId::new();
        let bob = PlayerId::new();
        let sword = Track::Expertise(WeaponType::Sword);

        sink.notify(alice, ProgressNotice::LevelUp {
            track: Track::Leveling,
            new_level: 2,
        });
        sink.notify(bob, ProgressNotice::LevelUp {
            track: sword,
            new_level: 1,
        });
        sink.notify(alice, ProgressNotice::LevelUp {
            track: Track::Leveling,
            new_level: 3,
        });

        assert_eq!(sink.notices().len(), 3);
        let levels: Vec<u32> = sink
            .for_player(alice)
            .iter()
            .filter_map(|notice| match notice {
                ProgressNotice::LevelUp { new_level, .. } => Some(*new_level),
                ProgressNotice::Gain { .. } => None,
            })
            .collect();
        assert_eq!(levels, vec![2, 3]);
        assert!(sink.for_player(bob).iter().all(|n| n.track() == sword));

        sink.clear();
        assert!(sink.notices().is_empty());
    }

    #[test]
    fn null_sink_accepts_anything() {
        NullSink.notify(PlayerId::new(), ProgressNotice::LevelUp {
            track: Track::Leveling,
            new_level: 1,
        });
    }
}
