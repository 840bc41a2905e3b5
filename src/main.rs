//! Headless consumer of the killfeed pipeline: tails a Game.log and
//! prints every update as one JSON line, until Ctrl-C.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use killfeed::{EventFilter, PipelineConfig, PipelineHandle, PipelineUpdate, StartPosition};

#[derive(Parser)]
#[command(name = "killfeed")]
#[command(about = "Tail a Star Citizen Game.log and stream classified combat events as JSON lines")]
#[command(version)]
struct Cli {
    /// Path to the Game.log to tail
    #[arg(long)]
    log: PathBuf,

    /// In-game handle used for kill/death attribution
    #[arg(long)]
    player: String,

    /// Process the full existing file instead of attaching at the end
    #[arg(long)]
    from_start: bool,

    /// Poll cadence in milliseconds
    #[arg(long, default_value_t = 500)]
    interval_ms: u64,

    /// Event feed capacity
    #[arg(long, default_value_t = 50)]
    feed_capacity: usize,

    /// Include corpse-confirmation events in the visible feed
    #[arg(long)]
    show_corpses: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("killfeed=info".parse()?))
        .init();

    let cli = Cli::parse();

    let mut config = PipelineConfig::new(cli.log, cli.player);
    config.poll_interval = Duration::from_millis(cli.interval_ms.max(1));
    config.feed_capacity = cli.feed_capacity;
    config.start = if cli.from_start {
        StartPosition::Beginning
    } else {
        StartPosition::End
    };
    config.filters = EventFilter {
        show_corpses: cli.show_corpses,
        ..EventFilter::default()
    };

    let (handle, mut updates) = PipelineHandle::start(config)?;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            update = updates.recv() => match update {
                Some(update) => print_update(&update),
                None => break,
            },
            _ = &mut ctrl_c => {
                tracing::info!("Interrupted; shutting down");
                break;
            }
        }
    }

    handle.stop().await?;
    Ok(())
}

fn print_update(update: &PipelineUpdate) {
    match serde_json::to_string(update) {
        Ok(serialized) => println!("{serialized}"),
        Err(error) => tracing::error!(serialize_error = %error, "Failed to serialize update"),
    }
}
