use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification of a single Game.log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    PvpKill,
    PveKill,
    Death,
    VehicleDestroyed,
    Suicide,
    QuantumJump,
    Corpse,
    Disconnect,
}

impl EventKind {
    pub const ALL: [EventKind; 8] = [
        EventKind::PvpKill,
        EventKind::PveKill,
        EventKind::Death,
        EventKind::VehicleDestroyed,
        EventKind::Suicide,
        EventKind::QuantumJump,
        EventKind::Corpse,
        EventKind::Disconnect,
    ];
}

/// Phase of a jump-drive state transition. Only `Completed` counts toward
/// the session jump counter; the other phases still appear in the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JumpPhase {
    Requested,
    Initiated,
    Aborted,
    Completed,
    Other,
}

impl JumpPhase {
    /// Maps the destination state token of a `from X to Y` transition.
    pub(crate) fn from_state_token(token: &str) -> Self {
        let lowered = token.to_ascii_lowercase();
        if lowered.contains("request") {
            JumpPhase::Requested
        } else if lowered.contains("init") || lowered.contains("spool") {
            JumpPhase::Initiated
        } else if lowered.contains("abort") || lowered.contains("cancel") {
            JumpPhase::Aborted
        } else if lowered.contains("complete") || lowered.contains("done") {
            JumpPhase::Completed
        } else {
            // The drive settles back to Idle after aborts as well as
            // completions; a `... to Idle` transition proves nothing.
            JumpPhase::Other
        }
    }
}

/// How thoroughly a vehicle was destroyed. Destruction level 2 in the log
/// is a hull break; level 1 leaves a disabled but intact ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DestructionLevel {
    Soft,
    Full,
    Unknown,
}

/// One classified occurrence derived from a single log line.
///
/// Built only by [`EventGrammar`](crate::EventGrammar) and never mutated
/// afterward; every field other than `kind`, `timestamp`, and `raw_line`
/// is kind-dependent and optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub kind: EventKind,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub victim: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weapon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ship: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jump_phase: Option<JumpPhase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destruction: Option<DestructionLevel>,
    pub raw_line: String,
    pub is_player_involved: bool,
}

impl Event {
    pub(crate) fn new(kind: EventKind, timestamp: DateTime<Utc>, raw_line: &str) -> Self {
        Self {
            kind,
            timestamp,
            actor: None,
            victim: None,
            weapon: None,
            cause: None,
            ship: None,
            direction: None,
            jump_phase: None,
            destruction: None,
            raw_line: raw_line.to_string(),
            is_player_involved: false,
        }
    }

    /// True when a jump event represents a finished jump.
    pub fn is_completed_jump(&self) -> bool {
        self.kind == EventKind::QuantumJump && self.jump_phase == Some(JumpPhase::Completed)
    }
}
