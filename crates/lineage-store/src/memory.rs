//! In-process [`ProgressionStore`] implementation.
//!
//! [`MemoryStore`] keeps every record in `parking_lot` guarded maps. It is
//! what the engine's tests and the replay binary run against, and doubles
//! as the reference for what a persistent backend has to provide.
//!
//! An offline switch makes every call fail with
//! [`StoreError::Unavailable`], for exercising error propagation.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use lineage_types::{ExperienceRecord, PlayerId, PrestigeRecord, RestedXpRecord, Track};

use crate::{ProgressionStore, StoreError};

/// Everything stored for one player.
#[derive(Debug, Clone, Default)]
struct PlayerRecords {
    tracks: BTreeMap<Track, ExperienceRecord>,
    prestige: PrestigeRecord,
    rested: Option<RestedXpRecord>,
}

/// Thread-safe in-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    players: RwLock<HashMap<PlayerId, PlayerRecords>>,
    offline: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail (or succeed again).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Release);
    }

    /// Number of players with at least one stored record.
    pub fn player_count(&self) -> usize {
        self.players.read().len()
    }

    /// Every track a player has a record on, in track order.
    pub fn tracks(&self, player: PlayerId) -> Vec<(Track, ExperienceRecord)> {
        self.players
            .read()
            .get(&player)
            .map(|records| records.tracks.iter().map(|(t, r)| (*t, *r)).collect())
            .unwrap_or_default()
    }

    /// Drop every record.
    pub fn clear(&self) {
        self.players.write().clear();
        tracing::debug!("Memory store cleared");
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::Acquire) {
            return Err(StoreError::Unavailable {
                reason: "memory store switched offline".to_owned(),
            });
        }
        Ok(())
    }
}

impl ProgressionStore for MemoryStore {
    fn experience(&self, player: PlayerId, track: Track) -> Result<ExperienceRecord, StoreError> {
        self.check_online()?;
        Ok(self
            .players
            .read()
            .get(&player)
            .and_then(|records| records.tracks.get(&track).copied())
            .unwrap_or_default())
    }

    fn set_experience(
        &self,
        player: PlayerId,
        track: Track,
        record: ExperienceRecord,
    ) -> Result<(), StoreError> {
        self.check_online()?;
        self.players
            .write()
            .entry(player)
            .or_default()
            .tracks
            .insert(track, record);
        Ok(())
    }

    fn prestige(&self, player: PlayerId) -> Result<PrestigeRecord, StoreError> {
        self.check_online()?;
        Ok(self
            .players
            .read()
            .get(&player)
            .map(|records| records.prestige.clone())
            .unwrap_or_default())
    }

    fn set_prestige(&self, player: PlayerId, record: PrestigeRecord) -> Result<(), StoreError> {
        self.check_online()?;
        self.players.write().entry(player).or_default().prestige = record;
        Ok(())
    }

    fn rested_xp(&self, player: PlayerId) -> Result<Option<RestedXpRecord>, StoreError> {
        self.check_online()?;
        Ok(self
            .players
            .read()
            .get(&player)
            .and_then(|records| records.rested))
    }

    fn set_rested_xp(&self, player: PlayerId, record: RestedXpRecord) -> Result<(), StoreError> {
        self.check_online()?;
        self.players.write().entry(player).or_default().rested = Some(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use lineage_types::{BloodType, PrestigeTag, WeaponType};

    use super::*;

    #[test]
    fn missing_records_read_as_defaults() {
        let store = MemoryStore::new();
        let player = PlayerId::new();
        assert_eq!(
            store.experience(player, Track::Leveling),
            Ok(ExperienceRecord::default())
        );
        assert_eq!(store.prestige(player), Ok(PrestigeRecord::new()));
        assert_eq!(store.rested_xp(player), Ok(None));
        assert_eq!(store.player_count(), 0);
    }

    #[test]
    fn tracks_are_independent() {
        let store = MemoryStore::new();
        let player = PlayerId::new();
        let sword = Track::Expertise(WeaponType::Sword);
        let brute = Track::Legacy(BloodType::Brute);

        assert!(store.set_experience(player, sword, ExperienceRecord::new(3, 950.0)).is_ok());
        assert_eq!(store.experience(player, sword), Ok(ExperienceRecord::new(3, 950.0)));
        assert_eq!(store.experience(player, brute), Ok(ExperienceRecord::default()));
        assert_eq!(store.tracks(player).len(), 1);
    }

    #[test]
    fn players_are_independent() {
        let store = MemoryStore::new();
        let alice = PlayerId::new();
        let bob = PlayerId::new();
        let prestige = PrestigeRecord::new().with(PrestigeTag::Experience, 2);

        assert!(store.set_prestige(alice, prestige.clone()).is_ok());
        assert_eq!(store.prestige(alice), Ok(prestige));
        assert_eq!(store.prestige(bob), Ok(PrestigeRecord::new()));
    }

    #[test]
    fn rested_round_trip() {
        let store = MemoryStore::new();
        let player = PlayerId::new();
        let record = RestedXpRecord {
            timestamp: Utc::now(),
            pool: 300.0,
        };
        assert!(store.set_rested_xp(player, record).is_ok());
        assert_eq!(store.rested_xp(player), Ok(Some(record)));
    }

    #[test]
    fn offline_fails_every_call() {
        let store = MemoryStore::new();
        let player = PlayerId::new();
        store.set_offline(true);
        assert!(matches!(
            store.experience(player, Track::Leveling),
            Err(StoreError::Unavailable { .. })
        ));
        assert!(store.set_prestige(player, PrestigeRecord::new()).is_err());

        store.set_offline(false);
        assert!(store.experience(player, Track::Leveling).is_ok());
    }

    #[test]
    fn clear_drops_everything() {
        let store = MemoryStore::new();
        let player = PlayerId::new();
        assert!(store.set_experience(player, Track::Leveling, ExperienceRecord::new(1, 100.0)).is_ok());
        store.clear();
        assert_eq!(store.player_count(), 0);
    }
}
