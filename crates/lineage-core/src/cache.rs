//! Progression cache: per-player leveling level and prestige flag.
//!
//! The cache is a read-through view of the store, used by sharing checks so
//! a group kill does not hit storage once per candidate. It is never
//! authoritative: every engine write updates the store first and the cache
//! second.
//!
//! # Concurrency
//!
//! The map itself sits behind a [`RwLock`] that is only write-locked to
//! insert or remove a slot. Each slot holds its fields in atomics, so
//! updating a known player's level takes a read lock and a single store.
//! A slot is handed out as an [`Arc`] and stays the same instance until it
//! is invalidated.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use parking_lot::RwLock;

use lineage_store::{ProgressionStore, StoreError};
use lineage_types::{PlayerId, PrestigeTag, ProgressionSnapshot, Track};

/// One player's cached progression facts.
#[derive(Debug)]
pub struct CacheSlot {
    level: AtomicU32,
    has_prestiged: AtomicBool,
}

impl CacheSlot {
    fn new(snapshot: ProgressionSnapshot) -> Self {
        Self {
            level: AtomicU32::new(snapshot.level),
            has_prestiged: AtomicBool::new(snapshot.has_prestiged),
        }
    }

    /// Current leveling level.
    pub fn level(&self) -> u32 {
        self.level.load(Ordering::Acquire)
    }

    /// Whether the player has an overall experience prestige.
    pub fn has_prestiged(&self) -> bool {
        self.has_prestiged.load(Ordering::Acquire)
    }

    /// Copy both fields out.
    pub fn snapshot(&self) -> ProgressionSnapshot {
        ProgressionSnapshot {
            level: self.level(),
            has_prestiged: self.has_prestiged(),
        }
    }

    fn store(&self, snapshot: ProgressionSnapshot) {
        self.level.store(snapshot.level, Ordering::Release);
        self.has_prestiged
            .store(snapshot.has_prestiged, Ordering::Release);
    }
}

/// Thread-safe map from player to [`CacheSlot`].
#[derive(Debug, Default)]
pub struct ProgressionCache {
    slots: RwLock<HashMap<PlayerId, Arc<CacheSlot>>>,
}

impl ProgressionCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the player's slot, deriving it from `store` on a miss.
    ///
    /// Repeated calls return the same `Arc` until [`invalidate`] or
    /// [`clear`] drops it.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the slot has to be derived and a read
    /// fails. Nothing is inserted in that case.
    ///
    /// [`invalidate`]: Self::invalidate
    /// [`clear`]: Self::clear
    pub fn get_snapshot<S>(&self, player: PlayerId, store: &S) -> Result<Arc<CacheSlot>, StoreError>
    where
        S: ProgressionStore + ?Sized,
    {
        if let Some(slot) = self.slots.read().get(&player) {
            return Ok(Arc::clone(slot));
        }

        let derived = derive_snapshot(player, store)?;

        // Another caller may have inserted while the store was read; keep
        // whichever slot landed first.
        let mut slots = self.slots.write();
        let slot = slots
            .entry(player)
            .or_insert_with(|| Arc::new(CacheSlot::new(derived)));
        tracing::trace!(%player, level = slot.level(), "Progression cache miss");
        Ok(Arc::clone(slot))
    }

    /// Overwrite or insert both fields for `player`.
    pub fn set_snapshot(&self, player: PlayerId, snapshot: ProgressionSnapshot) {
        if let Some(slot) = self.slots.read().get(&player) {
            slot.store(snapshot);
            return;
        }
        self.slots
            .write()
            .entry(player)
            .and_modify(|slot| slot.store(snapshot))
            .or_insert_with(|| Arc::new(CacheSlot::new(snapshot)));
    }

    /// Update the level, deriving the slot first if it is missing.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the slot had to be derived and a read
    /// failed.
    pub fn set_level<S>(&self, player: PlayerId, level: u32, store: &S) -> Result<(), StoreError>
    where
        S: ProgressionStore + ?Sized,
    {
        self.get_snapshot(player, store)?
            .level
            .store(level, Ordering::Release);
        Ok(())
    }

    /// Update the level of an existing slot without touching the store.
    ///
    /// A missing slot is left missing; the next read derives it from the
    /// store, which already holds the new level. Returns whether a slot was
    /// updated.
    pub fn refresh_level(&self, player: PlayerId, level: u32) -> bool {
        self.slots.read().get(&player).is_some_and(|slot| {
            slot.level.store(level, Ordering::Release);
            true
        })
    }

    /// Update the prestige flag, deriving the slot first if it is missing.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the slot had to be derived and a read
    /// failed.
    pub fn set_prestiged<S>(
        &self,
        player: PlayerId,
        has_prestiged: bool,
        store: &S,
    ) -> Result<(), StoreError>
    where
        S: ProgressionStore + ?Sized,
    {
        self.get_snapshot(player, store)?
            .has_prestiged
            .store(has_prestiged, Ordering::Release);
        Ok(())
    }

    /// Drop one player's slot. Returns whether it was present.
    pub fn invalidate(&self, player: PlayerId) -> bool {
        self.slots.write().remove(&player).is_some()
    }

    /// Drop every slot.
    pub fn clear(&self) {
        self.slots.write().clear();
    }

    /// Number of cached players.
    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }
}

fn derive_snapshot<S>(player: PlayerId, store: &S) -> Result<ProgressionSnapshot, StoreError>
where
    S: ProgressionStore + ?Sized,
{
    let level = store.experience(player, Track::Leveling)?.level;
    let has_prestiged = store.prestige(player)?.count(PrestigeTag::Experience) > 0;
    Ok(ProgressionSnapshot {
        level,
        has_prestiged,
    })
}
