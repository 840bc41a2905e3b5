use serde::{Deserialize, Serialize};

use crate::event::{Event, EventKind};
use crate::feed::EventFeed;

/// Running per-session counters. Monotonic except for a full reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCounters {
    pub kills_pvp: u64,
    pub kills_pve: u64,
    pub deaths: u64,
    pub suicides: u64,
    pub jumps: u64,
    pub corpses: u64,
    pub disconnects: u64,
    pub vehicles_destroyed: u64,
}

impl SessionCounters {
    /// PvP kills per death; `deaths` is clamped to 1 so the ratio is
    /// defined for a deathless session.
    pub fn kd_ratio(&self) -> f64 {
        self.kills_pvp as f64 / self.deaths.max(1) as f64
    }
}

/// What changed when one event was applied: the event itself, the
/// post-application counters, and whether the feed evicted its oldest
/// entry. `feed_visible` is stamped by the pipeline from the active
/// filter set; filters gate display, never aggregation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateDelta {
    pub event: Event,
    pub counters: SessionCounters,
    pub evicted_oldest: bool,
    pub feed_visible: bool,
}

/// Full point-in-time copy of the session state, for initial renders and
/// window re-focus.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub counters: SessionCounters,
    pub kd_ratio: f64,
    pub event_feed: Vec<Event>,
}

/// Owns the session counters and the bounded event feed.
///
/// All mutation happens on the pipeline worker task, so readers obtain
/// snapshots through the worker and can never observe a half-applied
/// update or a partially reset session.
#[derive(Debug)]
pub struct SessionAggregator {
    counters: SessionCounters,
    feed: EventFeed,
}

impl SessionAggregator {
    pub fn new(feed_capacity: usize) -> Self {
        Self {
            counters: SessionCounters::default(),
            feed: EventFeed::new(feed_capacity),
        }
    }

    /// Applies one event: bumps exactly one counter (jump phases other
    /// than Completed only feed, never count), pushes onto the feed, and
    /// reports the resulting delta with `feed_visible` left true for the
    /// caller to stamp.
    pub fn apply(&mut self, event: Event) -> StateDelta {
        match event.kind {
            EventKind::PvpKill => self.counters.kills_pvp += 1,
            EventKind::PveKill => self.counters.kills_pve += 1,
            EventKind::Death => self.counters.deaths += 1,
            EventKind::Suicide => self.counters.suicides += 1,
            EventKind::QuantumJump => {
                if event.is_completed_jump() {
                    self.counters.jumps += 1;
                }
            }
            EventKind::Corpse => self.counters.corpses += 1,
            EventKind::Disconnect => self.counters.disconnects += 1,
            EventKind::VehicleDestroyed => self.counters.vehicles_destroyed += 1,
        }

        let evicted_oldest = self.feed.push(event.clone()).is_some();

        StateDelta {
            event,
            counters: self.counters,
            evicted_oldest,
            feed_visible: true,
        }
    }

    /// Clears counters and feed together. Callers on the worker task see
    /// this as one step; there is no observable half-reset state.
    pub fn reset(&mut self) {
        self.counters = SessionCounters::default();
        self.feed.clear();
    }

    pub fn counters(&self) -> SessionCounters {
        self.counters
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            counters: self.counters,
            kd_ratio: self.counters.kd_ratio(),
            event_feed: self.feed.iter().cloned().collect(),
        }
    }
}
