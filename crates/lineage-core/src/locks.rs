//! Per-player mutual exclusion.
//!
//! A kill touches several records of each participant (leveling, rested
//! pool, possibly expertise). Two kills that share a participant must not
//! interleave those read-modify-writes, but kills with disjoint
//! participants should not wait on each other. [`PlayerLocks`] hands out
//! one mutex per player for that purpose.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use lineage_types::PlayerId;

/// Lazily created mutex per player.
#[derive(Debug, Default)]
pub struct PlayerLocks {
    locks: RwLock<HashMap<PlayerId, Arc<Mutex<()>>>>,
}

impl PlayerLocks {
    /// Create an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The mutex guarding `player`, created on first use.
    ///
    /// Callers lock the returned mutex for the duration of one player's
    /// update. The entry stays until [`PlayerLocks::release`] drops it.
    pub fn for_player(&self, player: PlayerId) -> Arc<Mutex<()>> {
        if let Some(lock) = self.locks.read().get(&player) {
            return Arc::clone(lock);
        }
        Arc::clone(self.locks.write().entry(player).or_default())
    }

    /// Drop `player`'s mutex if nobody outside the table holds it.
    ///
    /// Handles are only cloned under the table's read lock, so with the
    /// write lock held a strong count of one means no caller has, or can
    /// get, the same mutex. Returns whether the entry was removed.
    pub fn release(&self, player: PlayerId) -> bool {
        let mut locks = self.locks.write();
        let idle = locks
            .get(&player)
            .is_some_and(|lock| Arc::strong_count(lock) == 1);
        if idle {
            locks.remove(&player);
        }
        idle
    }

    /// Number of players that have a lock.
    pub fn len(&self) -> usize {
        self.locks.read().len()
    }

    /// Whether no lock has been created yet.
    pub fn is_empty(&self) -> bool {
        self.locks.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_player_shares_one_lock() {
        let locks = PlayerLocks::new();
        let player = PlayerId::new();
        let a = locks.for_player(player);
        let b = locks.for_player(player);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(locks.len(), 1);
    }

    #[test]
    fn different_players_do_not_block() {
        let locks = PlayerLocks::new();
        let a = locks.for_player(PlayerId::new());
        let b = locks.for_player(PlayerId::new());
        let _held = a.lock();
        assert!(b.try_lock().is_some());
    }

    #[test]
    fn held_lock_excludes_second_holder() {
        let locks = PlayerLocks::new();
        let player = PlayerId::new();
        let lock = locks.for_player(player);
        let _held = lock.lock();
        assert!(locks.for_player(player).try_lock().is_none());
    }

    #[test]
    fn release_drops_idle_lock() {
        let locks = PlayerLocks::new();
        let player = PlayerId::new();
        drop(locks.for_player(player));
        assert!(locks.release(player));
        assert!(locks.is_empty());
        assert!(!locks.release(player));
    }

    #[test]
    fn release_keeps_lock_still_handed_out() {
        let locks = PlayerLocks::new();
        let player = PlayerId::new();
        let lock = locks.for_player(player);
        let _held = lock.lock();
        assert!(!locks.release(player));
        assert_eq!(locks.len(), 1);
        assert!(locks.for_player(player).try_lock().is_none());
    }
}
