use std::path::PathBuf;

/// Errors surfaced synchronously by the pipeline API.
///
/// Everything that can go wrong *inside* a running pipeline — transient
/// I/O, rotation, truncation, malformed lines, decode noise — is a
/// handled condition, not an error; the polling loop must survive an
/// entire unattended play session.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("log path '{0}' is not an existing readable file")]
    InvalidLogPath(PathBuf),

    #[error("player name must not be empty")]
    EmptyPlayerName,

    #[error("pipeline worker is no longer running")]
    WorkerGone,
}
