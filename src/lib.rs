//! Star Citizen Game.log ingestion and event-classification pipeline.
//!
//! Tails the client's append-only `Game.log`, classifies each appended
//! line into combat/session events, and maintains live session statistics
//! for an external presentation layer. Data flows one direction:
//! disk → [`LogTailer`] → raw lines → [`EventGrammar`] → [`Event`] →
//! [`SessionAggregator`] → [`PipelineUpdate`] stream.

mod error;
mod event;
mod feed;
mod grammar;
mod pipeline;
mod session;
mod tailer;

pub use error::PipelineError;
pub use event::{DestructionLevel, Event, EventKind, JumpPhase};
pub use feed::EventFeed;
pub use grammar::EventGrammar;
pub use pipeline::{EventFilter, PipelineConfig, PipelineHandle, PipelineUpdate};
pub use session::{SessionAggregator, SessionCounters, StateDelta, StatsSnapshot};
pub use tailer::{FileIdentity, LogTailer, StartPosition, TailerPoll};
