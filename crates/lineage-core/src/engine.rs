//! The progression engine: kill distribution and single-track awards.
//!
//! [`ProgressionEngine`] ties the pure gain pipeline from `lineage_ledger`
//! to a [`ProgressionStore`], the [`ProgressionCache`], and a
//! [`NotificationSink`]. It is synchronous and holds no thread of its own:
//! the host calls [`process_kill`] once per kill, from whatever thread
//! observed it.
//!
//! # Per-Participant Flow
//!
//! ```text
//! read leveling record
//!   |-- level >= max --> award Expertise(weapon) with the same multiplier
//!   '-- otherwise ----> raw gain -> modifiers -> rested draw -> apply-and-cap
//!                         -> write pool -> write record -> cache level -> notify
//! ```
//!
//! Every participant's update runs under that player's lock from
//! [`PlayerLocks`], so two kills sharing a player never interleave their
//! read-modify-writes. A store failure inside one participant's update
//! leaves that participant as it was: the pool is debited before the
//! record is written and restored if the write fails, and the cache only
//! moves after the record is stored. Participants are independent of each
//! other: a failure stops the kill there, and updates already made for
//! earlier participants stay.
//!
//! [`process_kill`]: ProgressionEngine::process_kill

use std::collections::HashSet;
use std::sync::Arc;

use lineage_ledger::{
    GainRates, LedgerOutcome, ModifierStack, apply_and_persist, draw_rested_bonus,
    level_progress_percent, raw_gain,
};
use lineage_store::{ProgressionStore, StoreError};
use lineage_types::{
    ExperienceRecord, KillEvent, KillId, Participant, PlayerId, PrestigeRecord,
    ProgressionSnapshot, RestedXpRecord, Track, VictimDescriptor,
};

use crate::cache::ProgressionCache;
use crate::config::ProgressionConfig;
use crate::error::EngineError;
use crate::locks::PlayerLocks;
use crate::notify::{NotificationSink, NullSink, ProgressNotice};
use crate::sharing::{ShareCheck, should_share};

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// What one award did to one track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AwardOutcome {
    /// The track that was updated (or found capped).
    pub track: Track,
    /// Gain from the victim before any modifier.
    pub raw_gain: f64,
    /// Gain after prestige and group modifiers.
    pub modified_gain: f64,
    /// Bonus drawn from the rested pool.
    pub rested_bonus: f64,
    /// The ledger transition.
    pub ledger: LedgerOutcome,
}

impl AwardOutcome {
    const fn capped(track: Track, record: ExperienceRecord) -> Self {
        Self {
            track,
            raw_gain: 0.0,
            modified_gain: 0.0,
            rested_bonus: 0.0,
            ledger: LedgerOutcome::capped(record),
        }
    }

    /// Whether the track gained a level.
    pub const fn leveled_up(&self) -> bool {
        self.ledger.leveled_up
    }

    /// Level after the award.
    pub const fn new_level(&self) -> u32 {
        self.ledger.record.level
    }

    /// Experience actually stored.
    pub const fn gained(&self) -> f64 {
        self.ledger.gained
    }

    /// Whether the track was already at its cap.
    pub const fn was_capped(&self) -> bool {
        self.ledger.capped
    }
}

/// One eligible player's result for a kill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticipantOutcome {
    /// The player.
    pub player: PlayerId,
    /// What happened on the track the player was routed to.
    pub outcome: AwardOutcome,
}

impl ParticipantOutcome {
    /// The track the player was awarded on.
    pub const fn track(&self) -> Track {
        self.outcome.track
    }
}

/// Result of distributing one kill.
#[derive(Debug, Clone, PartialEq)]
pub struct KillOutcome {
    /// The kill that was processed.
    pub kill: KillId,
    /// The multiplier applied to every participant.
    pub group_multiplier: f64,
    /// One entry per eligible player, killer first.
    pub participants: Vec<ParticipantOutcome>,
}

impl KillOutcome {
    /// The entry for `player`, if they were eligible.
    pub fn for_player(&self, player: PlayerId) -> Option<&ParticipantOutcome> {
        self.participants.iter().find(|p| p.player == player)
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Distributes kill experience across tracks and players.
pub struct ProgressionEngine<S: ProgressionStore> {
    config: ProgressionConfig,
    rates: GainRates,
    store: Arc<S>,
    cache: ProgressionCache,
    locks: PlayerLocks,
    sink: Arc<dyn NotificationSink>,
}

impl<S: ProgressionStore> ProgressionEngine<S> {
    /// Create an engine over `store` that discards notifications.
    pub fn new(config: ProgressionConfig, store: Arc<S>) -> Self {
        let rates = config.gain_rates();
        Self {
            config,
            rates,
            store,
            cache: ProgressionCache::new(),
            locks: PlayerLocks::new(),
            sink: Arc::new(NullSink),
        }
    }

    /// Replace the notification sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sink = sink;
        self
    }

    /// The configuration the engine was built with.
    pub const fn config(&self) -> &ProgressionConfig {
        &self.config
    }

    /// The rate tables derived from the configuration.
    pub const fn rates(&self) -> &GainRates {
        &self.rates
    }

    /// The backing store.
    pub const fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// The progression cache.
    pub const fn cache(&self) -> &ProgressionCache {
        &self.cache
    }

    /// Filter a kill's participants down to the players who get a share.
    ///
    /// The killer always comes first. Other participants are de-duplicated
    /// by player and checked against the sharing rules, using cached
    /// levels and prestige flags and the absolute level gap to the killer.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unavailable`] if a cache miss cannot be
    /// derived from the store.
    pub fn resolve_participants(&self, event: &KillEvent) -> Result<Vec<Participant>, EngineError> {
        let source = event.source;
        let mut seen = HashSet::from([source.player]);
        let mut eligible = vec![source];

        if event.participants.iter().all(|p| p.player == source.player) {
            return Ok(eligible);
        }

        let store = self.store.as_ref();
        let sharing = &self.config.experience_sharing;
        let source_level = self.cache.get_snapshot(source.player, store)?.level();

        for candidate in &event.participants {
            if !seen.insert(candidate.player) {
                continue;
            }
            let slot = self.cache.get_snapshot(candidate.player, store)?;
            let check = ShareCheck {
                enabled: sharing.enabled,
                is_pve: event.is_pve,
                target_has_prestiged: slot.has_prestiged(),
                level_difference: slot.level().abs_diff(source_level),
                share_level_range: sharing.share_level_range,
                allied: candidate.allied_with_source,
                ignored: candidate.ignored,
            };
            if should_share(&check) {
                eligible.push(*candidate);
            } else {
                tracing::trace!(
                    kill = %event.id,
                    player = %candidate.player,
                    level_difference = check.level_difference,
                    "Participant not eligible for a share"
                );
            }
        }

        Ok(eligible)
    }

    /// The multiplier applied to every participant of a kill.
    ///
    /// An explicit multiplier on the event wins. Otherwise the configured
    /// group multiplier applies when more than one player is eligible.
    pub fn group_multiplier(&self, event: &KillEvent, eligible_count: usize) -> f64 {
        event.group_multiplier.unwrap_or(if eligible_count > 1 {
            self.config.leveling.group_multiplier
        } else {
            1.0
        })
    }

    /// Distribute one kill to every eligible participant.
    ///
    /// Each participant is awarded on the leveling track, or on the
    /// expertise track of their equipped weapon once leveling is capped.
    ///
    /// # Errors
    ///
    /// Returns the first store failure. Participants processed before the
    /// failure keep their updates.
    pub fn process_kill(&self, event: &KillEvent) -> Result<KillOutcome, EngineError> {
        let eligible = self.resolve_participants(event)?;
        let group_multiplier = self.group_multiplier(event, eligible.len());

        tracing::debug!(
            kill = %event.id,
            eligible = eligible.len(),
            offered = event.participants.len(),
            group_multiplier,
            "Distributing kill"
        );

        let mut participants = Vec::with_capacity(eligible.len());
        for participant in &eligible {
            let lock = self.locks.for_player(participant.player);
            let _guard = lock.lock();
            let outcome = self
                .distribute_to(participant, &event.victim, group_multiplier)
                .inspect_err(|error| {
                    tracing::warn!(
                        kill = %event.id,
                        player = %participant.player,
                        error = %error,
                        "Failed to persist kill experience"
                    );
                })?;
            participants.push(ParticipantOutcome {
                player: participant.player,
                outcome,
            });
        }

        Ok(KillOutcome {
            kill: event.id,
            group_multiplier,
            participants,
        })
    }

    /// Award one kill's experience to one track of one player.
    ///
    /// This is the same pipeline a kill runs per participant, without the
    /// leveling-to-expertise routing. Hosts use it for expertise, legacy,
    /// and familiar gains of the killer.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] if a read or write fails.
    pub fn award(
        &self,
        player: PlayerId,
        track: Track,
        victim: &VictimDescriptor,
        group_multiplier: f64,
    ) -> Result<AwardOutcome, EngineError> {
        let lock = self.locks.for_player(player);
        let _guard = lock.lock();
        self.award_locked(player, track, victim, group_multiplier)
    }

    /// The player's cached leveling level and prestige flag.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unavailable`] if a cache miss cannot be
    /// derived from the store.
    pub fn snapshot(&self, player: PlayerId) -> Result<ProgressionSnapshot, EngineError> {
        Ok(self
            .cache
            .get_snapshot(player, self.store.as_ref())?
            .snapshot())
    }

    /// Replace a player's prestige counters and refresh the cached flag.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unavailable`] if the write fails. The cache
    /// is left alone in that case.
    pub fn set_prestige(&self, player: PlayerId, record: PrestigeRecord) -> Result<(), EngineError> {
        let lock = self.locks.for_player(player);
        let _guard = lock.lock();
        let has_prestiged = record.has_prestiged();
        self.store.set_prestige(player, record)?;
        self.cache
            .set_prestiged(player, has_prestiged, self.store.as_ref())?;
        tracing::debug!(%player, has_prestiged, "Prestige updated");
        Ok(())
    }

    /// Drop a player's cached snapshot and idle lock, e.g. when they
    /// disconnect. Returns whether a snapshot was cached.
    pub fn evict(&self, player: PlayerId) -> bool {
        self.locks.release(player);
        self.cache.invalidate(player)
    }

    // -----------------------------------------------------------------------
    // Internals (caller holds the player's lock)
    // -----------------------------------------------------------------------

    fn distribute_to(
        &self,
        participant: &Participant,
        victim: &VictimDescriptor,
        group_multiplier: f64,
    ) -> Result<AwardOutcome, EngineError> {
        let player = participant.player;
        let leveling = self
            .store
            .experience(player, Track::Leveling)
            .map_err(|source| EngineError::Store {
                player,
                track: Track::Leveling,
                source,
            })?;

        let max_level = self.rates.leveling.rates.max_level;
        if leveling.level >= max_level {
            let routed = participant.expertise_track();
            tracing::debug!(%player, level = leveling.level, %routed, "Leveling capped, routing to expertise");
            return self.award_locked(player, routed, victim, group_multiplier);
        }

        self.award_from(player, Track::Leveling, leveling, victim, group_multiplier)
    }

    fn award_locked(
        &self,
        player: PlayerId,
        track: Track,
        victim: &VictimDescriptor,
        group_multiplier: f64,
    ) -> Result<AwardOutcome, EngineError> {
        let current = self
            .store
            .experience(player, track)
            .map_err(|source| EngineError::Store {
                player,
                track,
                source,
            })?;
        self.award_from(player, track, current, victim, group_multiplier)
    }

    fn award_from(
        &self,
        player: PlayerId,
        track: Track,
        current: ExperienceRecord,
        victim: &VictimDescriptor,
        group_multiplier: f64,
    ) -> Result<AwardOutcome, EngineError> {
        let store = self.store.as_ref();
        let on_track = |source: StoreError| EngineError::Store {
            player,
            track,
            source,
        };

        let max_level = self.rates.max_level(track.kind());
        if current.level >= max_level {
            tracing::trace!(%player, %track, level = current.level, "Track capped");
            return Ok(AwardOutcome::capped(track, current));
        }

        let prestige = store.prestige(player).map_err(on_track)?;
        let modifiers = ModifierStack::for_track(track, &prestige, group_multiplier);
        let raw = raw_gain(track.kind(), victim, current.level, &self.rates);
        let modified = modifiers.apply(raw, &self.rates.prestige);

        let draws_rested = track == Track::Leveling && self.config.rested_xp.enabled;
        let rested_before = if draws_rested {
            store.rested_xp(player).map_err(on_track)?
        } else {
            None
        };
        let draw = draw_rested_bonus(modified, rested_before, draws_rested);

        // Pool first: a failed debit leaves nothing written, and a failed
        // experience write puts the pool back.
        let debited = draw.record.filter(|_| draw.is_spent());
        if let Some(pool) = debited {
            store.set_rested_xp(player, pool).map_err(on_track)?;
        }

        let ledger = match apply_and_persist(
            || Ok(current),
            |record| store.set_experience(player, track, record),
            modified + draw.bonus,
            max_level,
        ) {
            Ok(ledger) => ledger,
            Err(source) => {
                if let (Some(_), Some(before)) = (debited, rested_before) {
                    self.restore_pool(player, before);
                }
                return Err(on_track(source));
            }
        };

        if track == Track::Leveling {
            self.cache.refresh_level(player, ledger.record.level);
        }

        tracing::debug!(
            %player,
            %track,
            raw,
            modified,
            rested_bonus = draw.bonus,
            gained = ledger.gained,
            level = ledger.record.level,
            "Experience awarded"
        );

        self.notify(player, track, &ledger, draw.bonus);

        Ok(AwardOutcome {
            track,
            raw_gain: raw,
            modified_gain: modified,
            rested_bonus: draw.bonus,
            ledger,
        })
    }

    fn restore_pool(&self, player: PlayerId, before: RestedXpRecord) {
        if let Err(error) = self.store.set_rested_xp(player, before) {
            tracing::warn!(%player, %error, pool = before.pool, "Failed to restore rested pool");
        }
    }

    fn notify(&self, player: PlayerId, track: Track, ledger: &LedgerOutcome, rested_bonus: f64) {
        if ledger.gained > 0.0 {
            self.sink.notify(player, ProgressNotice::Gain {
                track,
                gained: ledger.gained,
                rested_bonus,
                progress_percent: level_progress_percent(ledger.record.xp),
            });
        }
        if ledger.leveled_up {
            tracing::info!(%player, %track, level = ledger.record.level, "Level up");
            self.sink.notify(player, ProgressNotice::LevelUp {
                track,
                new_level: ledger.record.level,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use lineage_ledger::level_to_xp;
    use lineage_store::MemoryStore;
    use lineage_types::{BloodType, PrestigeTag, WeaponType};

    use super::*;
    use crate::notify::RecordingSink;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn victim(level: u32, max_health: f64) -> VictimDescriptor {
        VictimDescriptor {
            level,
            max_health,
            physical_power: 40.0,
            spell_power: 20.0,
            is_elite: false,
        }
    }

    fn participant(player: PlayerId) -> Participant {
        Participant {
            player,
            weapon: WeaponType::Sword,
            blood: BloodType::Rogue,
            allied_with_source: false,
            ignored: false,
        }
    }

    fn kill(source: PlayerId, others: &[PlayerId]) -> KillEvent {
        KillEvent {
            id: KillId::new(),
            source: participant(source),
            participants: others.iter().copied().map(participant).collect(),
            victim: victim(20, 250.0),
            is_pve: true,
            group_multiplier: None,
        }
    }

    fn engine() -> ProgressionEngine<MemoryStore> {
        ProgressionEngine::new(ProgressionConfig::default(), Arc::new(MemoryStore::new()))
    }

    #[test]
    fn solo_kill_awards_leveling() {
        let engine = engine();
        let player = PlayerId::new();
        let outcome = engine.process_kill(&kill(player, &[])).ok();

        // 7.5 * 20 + floor(250 / 2.5) = 250, no decay at level 0.
        let entry = outcome.as_ref().and_then(|o| o.for_player(player)).copied();
        assert!(entry.is_some_and(|e| e.track() == Track::Leveling && approx(e.outcome.gained(), 250.0)));
        assert_eq!(
            engine.store().experience(player, Track::Leveling),
            Ok(ExperienceRecord::new(1, 250.0))
        );
        assert!(engine.snapshot(player).is_ok_and(|s| s.level == 1));
    }

    #[test]
    fn duplicates_and_source_are_collapsed() {
        let engine = engine();
        let source = PlayerId::new();
        let other = PlayerId::new();
        let event = kill(source, &[source, other, other]);
        let eligible = engine.resolve_participants(&event).unwrap_or_default();
        assert_eq!(eligible.len(), 2);
        assert!(eligible.first().is_some_and(|p| p.player == source));
    }

    #[test]
    fn group_multiplier_defaults() {
        let config = ProgressionConfig::parse("leveling:\n  group_multiplier: 1.5\n").unwrap_or_default();
        let engine = ProgressionEngine::new(config, Arc::new(MemoryStore::new()));
        let mut event = kill(PlayerId::new(), &[]);

        assert!(approx(engine.group_multiplier(&event, 1), 1.0));
        assert!(approx(engine.group_multiplier(&event, 3), 1.5));
        event.group_multiplier = Some(2.0);
        assert!(approx(engine.group_multiplier(&event, 1), 2.0));
    }

    #[test]
    fn award_on_expertise_uses_power_formula() {
        let engine = engine();
        let player = PlayerId::new();
        let track = Track::Expertise(WeaponType::Axe);
        let outcome = engine.award(player, track, &victim(20, 250.0), 1.0);
        // (40 + 20) * 2
        assert!(outcome.is_ok_and(|o| approx(o.raw_gain, 120.0) && approx(o.gained(), 120.0)));
        assert_eq!(
            engine.store().experience(player, track),
            Ok(ExperienceRecord::new(1, 120.0))
        );
        assert!(engine.store().experience(player, Track::Leveling).is_ok_and(|r| approx(r.xp, 0.0)));
    }

    #[test]
    fn level_up_notifies_after_gain() {
        let sink = Arc::new(RecordingSink::new());
        let engine = engine().with_sink(sink.clone());
        let player = PlayerId::new();
        let _ = engine.process_kill(&kill(player, &[]));

        let notices = sink.for_player(player);
        assert_eq!(notices.len(), 2);
        assert!(matches!(notices.first(), Some(ProgressNotice::Gain { .. })));
        assert!(matches!(
            notices.get(1),
            Some(ProgressNotice::LevelUp { new_level: 1, .. })
        ));
    }

    #[test]
    fn capped_expertise_is_silent_noop() {
        let sink = Arc::new(RecordingSink::new());
        let engine = engine().with_sink(sink.clone());
        let player = PlayerId::new();
        let store = engine.store();
        let _ = store.set_experience(player, Track::Leveling, ExperienceRecord::new(90, level_to_xp(90)));
        let sword = Track::Expertise(WeaponType::Sword);
        let capped = ExperienceRecord::new(100, level_to_xp(100));
        let _ = store.set_experience(player, sword, capped);

        let outcome = engine.process_kill(&kill(player, &[]));
        assert!(outcome.is_ok_and(|o| o
            .for_player(player)
            .is_some_and(|p| p.track() == sword && p.outcome.was_capped())));
        assert_eq!(store.experience(player, sword), Ok(capped));
        assert!(sink.notices().is_empty());
    }

    #[test]
    fn set_prestige_refreshes_cache() {
        let engine = engine();
        let player = PlayerId::new();
        assert!(engine.snapshot(player).is_ok_and(|s| !s.has_prestiged));
        let record = PrestigeRecord::new().with(PrestigeTag::Experience, 1);
        assert!(engine.set_prestige(player, record).is_ok());
        assert!(engine.snapshot(player).is_ok_and(|s| s.has_prestiged));
    }

    #[test]
    fn evict_drops_cached_snapshot() {
        let engine = engine();
        let player = PlayerId::new();
        let _ = engine.snapshot(player);
        assert!(engine.evict(player));
        assert!(engine.cache().is_empty());
    }

    #[test]
    fn evict_releases_idle_player_lock() {
        let engine = engine();
        let player = PlayerId::new();
        assert!(engine
            .award(player, Track::Expertise(WeaponType::Axe), &victim(20, 250.0), 1.0)
            .is_ok());
        assert_eq!(engine.locks.len(), 1);
        let _ = engine.evict(player);
        assert!(engine.locks.is_empty());
    }
}
