use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::PipelineError;
use crate::event::EventKind;
use crate::grammar::EventGrammar;
use crate::session::{SessionAggregator, StateDelta, StatsSnapshot};
use crate::tailer::{LogTailer, StartPosition};

/// Which event kinds the presentation layer currently wants to see.
/// Gates display only; aggregation counts everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventFilter {
    pub show_pvp_kills: bool,
    pub show_pve_kills: bool,
    pub show_deaths: bool,
    pub show_suicides: bool,
    pub show_vehicle_destroyed: bool,
    pub show_jumps: bool,
    pub show_corpses: bool,
    pub show_disconnects: bool,
}

impl Default for EventFilter {
    // Corpse confirmations are noise for most sessions.
    fn default() -> Self {
        Self {
            show_pvp_kills: true,
            show_pve_kills: true,
            show_deaths: true,
            show_suicides: true,
            show_vehicle_destroyed: true,
            show_jumps: true,
            show_corpses: false,
            show_disconnects: true,
        }
    }
}

impl EventFilter {
    pub fn all() -> Self {
        Self {
            show_corpses: true,
            ..Self::default()
        }
    }

    pub fn allows(&self, kind: EventKind) -> bool {
        match kind {
            EventKind::PvpKill => self.show_pvp_kills,
            EventKind::PveKill => self.show_pve_kills,
            EventKind::Death => self.show_deaths,
            EventKind::Suicide => self.show_suicides,
            EventKind::VehicleDestroyed => self.show_vehicle_destroyed,
            EventKind::QuantumJump => self.show_jumps,
            EventKind::Corpse => self.show_corpses,
            EventKind::Disconnect => self.show_disconnects,
        }
    }
}

/// Everything the pipeline needs to start. Supplied by the surrounding
/// application (config dialog, auto-discovery); never read from ambient
/// global state.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub log_path: PathBuf,
    pub player_name: String,
    pub filters: EventFilter,
    pub poll_interval: Duration,
    pub start: StartPosition,
    pub feed_capacity: usize,
    pub grammar: EventGrammar,
}

impl PipelineConfig {
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);
    pub const DEFAULT_FEED_CAPACITY: usize = 50;

    pub fn new(log_path: impl Into<PathBuf>, player_name: impl Into<String>) -> Self {
        Self {
            log_path: log_path.into(),
            player_name: player_name.into(),
            filters: EventFilter::default(),
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            start: StartPosition::End,
            feed_capacity: Self::DEFAULT_FEED_CAPACITY,
            grammar: EventGrammar::new(),
        }
    }
}

/// One notification to the presentation layer.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum PipelineUpdate {
    /// A classified event was applied; counters moved.
    Delta(StateDelta),
    /// Rotation, truncation, or an explicit reprocess wiped the session.
    SessionReset,
}

enum Command {
    UpdateConfig {
        player_name: String,
        filters: EventFilter,
    },
    Reprocess,
    Snapshot(oneshot::Sender<StatsSnapshot>),
    Stop,
}

/// Control handle for a running pipeline. All operations are serialized
/// onto the worker task's command channel, so they can never observe or
/// interleave with a half-finished poll.
pub struct PipelineHandle {
    commands: mpsc::Sender<Command>,
    worker: JoinHandle<()>,
}

impl PipelineHandle {
    /// Validates the configuration, spawns the worker task, and returns
    /// the handle plus the update stream. Invalid input fails here,
    /// synchronously; nothing is spawned. Must be called from within a
    /// Tokio runtime.
    pub fn start(
        config: PipelineConfig,
    ) -> Result<(Self, mpsc::UnboundedReceiver<PipelineUpdate>), PipelineError> {
        if config.player_name.trim().is_empty() {
            return Err(PipelineError::EmptyPlayerName);
        }
        if !config.log_path.is_file() {
            return Err(PipelineError::InvalidLogPath(config.log_path));
        }

        let (update_sender, update_receiver) = mpsc::unbounded_channel();
        let (command_sender, command_receiver) = mpsc::channel(16);

        let worker = PipelineWorker::new(config, update_sender);
        let join_handle = tokio::spawn(worker.run(command_receiver));

        Ok((
            Self {
                commands: command_sender,
                worker: join_handle,
            },
            update_receiver,
        ))
    }

    /// Applies a new player name and filter set to subsequent lines.
    /// Already-classified events are not retroactively reclassified.
    pub async fn update_config(
        &self,
        player_name: impl Into<String>,
        filters: EventFilter,
    ) -> Result<(), PipelineError> {
        self.send(Command::UpdateConfig {
            player_name: player_name.into(),
            filters,
        })
        .await
    }

    /// Rewinds the tailer to offset zero and resets the session, so the
    /// whole file is classified again from scratch.
    pub async fn reprocess_from_beginning(&self) -> Result<(), PipelineError> {
        self.send(Command::Reprocess).await
    }

    /// Full current session state, for initial render or re-focus.
    pub async fn snapshot(&self) -> Result<StatsSnapshot, PipelineError> {
        let (reply_sender, reply_receiver) = oneshot::channel();
        self.send(Command::Snapshot(reply_sender)).await?;
        reply_receiver
            .await
            .map_err(|_| PipelineError::WorkerGone)
    }

    /// Stops the pipeline. No further poll starts; a poll already in
    /// progress completes its aggregation first.
    pub async fn stop(self) -> Result<(), PipelineError> {
        self.send(Command::Stop).await?;
        self.worker.await.map_err(|_| PipelineError::WorkerGone)
    }

    async fn send(&self, command: Command) -> Result<(), PipelineError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| PipelineError::WorkerGone)
    }
}

/// Single owner of tailer, grammar, aggregator, and filter state. The
/// select loop makes polls strictly sequential and serializes commands
/// against them.
struct PipelineWorker {
    tailer: LogTailer,
    grammar: EventGrammar,
    aggregator: SessionAggregator,
    player_name: String,
    filters: EventFilter,
    poll_interval: Duration,
    updates: mpsc::UnboundedSender<PipelineUpdate>,
}

impl PipelineWorker {
    fn new(config: PipelineConfig, updates: mpsc::UnboundedSender<PipelineUpdate>) -> Self {
        Self {
            tailer: LogTailer::new(config.log_path, config.start),
            grammar: config.grammar,
            aggregator: SessionAggregator::new(config.feed_capacity),
            player_name: config.player_name,
            filters: config.filters,
            poll_interval: config.poll_interval,
            updates,
        }
    }

    async fn run(mut self, mut commands: mpsc::Receiver<Command>) {
        tracing::info!(
            path = %self.tailer.path().display(),
            player = %self.player_name,
            "Pipeline started"
        );

        let mut ticker = tokio::time::interval(self.poll_interval);
        // A poll that blocks past its slot just runs later; no catch-up
        // burst afterwards.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => self.tick(),
                command = commands.recv() => match command {
                    Some(Command::UpdateConfig { player_name, filters }) => {
                        self.player_name = player_name;
                        self.filters = filters;
                    }
                    Some(Command::Reprocess) => {
                        self.tailer.reset_to_beginning();
                        self.aggregator.reset();
                        self.send_update(PipelineUpdate::SessionReset);
                        self.tick();
                    }
                    Some(Command::Snapshot(reply)) => {
                        let _ = reply.send(self.aggregator.snapshot());
                    }
                    Some(Command::Stop) | None => break,
                },
            }
        }

        tracing::info!(path = %self.tailer.path().display(), "Pipeline stopped");
    }

    /// One poll-then-process pass. Nothing in here can abort the loop:
    /// tailer failures degrade to an empty poll, classification is total
    /// over strings, and aggregation is infallible.
    fn tick(&mut self) {
        let poll = self.tailer.poll();

        if poll.reset {
            self.aggregator.reset();
            self.send_update(PipelineUpdate::SessionReset);
        }

        for line in poll.lines {
            for event in self.grammar.classify(&line, &self.player_name) {
                let mut delta = self.aggregator.apply(event);
                delta.feed_visible = self.filters.allows(delta.event.kind);
                self.send_update(PipelineUpdate::Delta(delta));
            }
        }
    }

    fn send_update(&self, update: PipelineUpdate) {
        if self.updates.send(update).is_err() {
            tracing::debug!("Pipeline update receiver dropped");
        }
    }
}
