use std::fs::{File, Metadata};
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Stable identity of the file behind a path, used to notice rotation
/// even when the path is reused for a brand-new file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileIdentity {
    raw: (u64, u64),
}

impl FileIdentity {
    #[cfg(unix)]
    fn of(metadata: &Metadata) -> Option<Self> {
        use std::os::unix::fs::MetadataExt;
        Some(Self {
            raw: (metadata.dev(), metadata.ino()),
        })
    }

    // No inode off unix; creation time is the closest stable stand-in.
    #[cfg(not(unix))]
    fn of(metadata: &Metadata) -> Option<Self> {
        let created = metadata.created().ok()?;
        let since_epoch = created
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default();
        Some(Self {
            raw: (since_epoch.as_secs(), u64::from(since_epoch.subsec_nanos())),
        })
    }
}

/// Where a freshly constructed tailer begins reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartPosition {
    /// Process the full existing history.
    Beginning,
    /// Attach from now: only lines appended after construction.
    End,
    /// Resume from a previously persisted cursor.
    Offset(u64),
}

/// Read cursor into the monitored file: identity of the open file, the
/// last consumed byte position, and any bytes past the final terminator.
#[derive(Debug, Default)]
struct TailState {
    identity: Option<FileIdentity>,
    byte_offset: u64,
    partial: Vec<u8>,
}

impl TailState {
    fn reset(&mut self) {
        self.identity = None;
        self.byte_offset = 0;
        self.partial.clear();
    }
}

/// Result of one poll: the complete lines appended since the previous
/// poll, and whether rotation/truncation forced the cursor back to zero
/// (in which case the session aggregate must reset too).
#[derive(Debug, Default)]
pub struct TailerPoll {
    pub lines: Vec<String>,
    pub reset: bool,
}

/// Incremental reader over a growing, externally written log file.
///
/// The only component that touches the filesystem. Driven on a fixed
/// cadence by the pipeline; never self-scheduling. Transient I/O failures
/// (file missing, permissions, unmounted volume) yield an empty poll and
/// are retried from the same offset next time.
#[derive(Debug)]
pub struct LogTailer {
    path: PathBuf,
    state: TailState,
}

impl LogTailer {
    pub fn new(path: impl Into<PathBuf>, start: StartPosition) -> Self {
        let path = path.into();
        let mut state = TailState::default();

        match start {
            StartPosition::Beginning => {}
            StartPosition::Offset(byte_offset) => state.byte_offset = byte_offset,
            StartPosition::End => {
                // Missing file is fine here; the first successful poll
                // then starts from offset 0, which is also "now".
                if let Ok(metadata) = std::fs::metadata(&path) {
                    state.identity = FileIdentity::of(&metadata);
                    state.byte_offset = metadata.len();
                }
            }
        }

        Self { path, state }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current cursor, for callers that persist tail position across runs.
    pub fn position(&self) -> (Option<FileIdentity>, u64) {
        (self.state.identity, self.state.byte_offset)
    }

    /// Rewinds to offset zero against the same file, for reprocess-from-
    /// beginning semantics.
    pub fn reset_to_beginning(&mut self) {
        self.state.byte_offset = 0;
        self.state.partial.clear();
    }

    /// Reads everything appended since the last poll and splits it into
    /// complete lines. A trailing fragment with no terminator stays
    /// buffered until a later poll completes it, so a line is never
    /// emitted in two pieces or classified half-written.
    pub fn poll(&mut self) -> TailerPoll {
        let mut result = TailerPoll::default();

        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(error) => {
                tracing::debug!(
                    path = %self.path.display(),
                    io_error = %error,
                    "Log file inaccessible; retrying next poll"
                );
                return result;
            }
        };

        let metadata = match file.metadata() {
            Ok(metadata) => metadata,
            Err(error) => {
                tracing::debug!(
                    path = %self.path.display(),
                    io_error = %error,
                    "Log file unstattable; retrying next poll"
                );
                return result;
            }
        };

        let identity = FileIdentity::of(&metadata);
        let rotated = match (self.state.identity, identity) {
            (Some(previous), Some(current)) => previous != current,
            _ => false,
        };
        let truncated = metadata.len() < self.state.byte_offset;

        if rotated || truncated {
            tracing::info!(
                path = %self.path.display(),
                rotated,
                truncated,
                "Log file replaced or truncated; restarting from offset 0"
            );
            self.state.reset();
            result.reset = true;
        }
        self.state.identity = identity;

        if metadata.len() == self.state.byte_offset {
            return result;
        }

        if let Err(error) = file.seek(SeekFrom::Start(self.state.byte_offset)) {
            tracing::debug!(
                path = %self.path.display(),
                io_error = %error,
                "Seek failed; retrying next poll"
            );
            return result;
        }

        let mut appended = Vec::new();
        if let Err(error) = file.read_to_end(&mut appended) {
            tracing::debug!(
                path = %self.path.display(),
                io_error = %error,
                "Read failed; retrying next poll"
            );
            return result;
        }

        self.state.byte_offset = self.state.byte_offset.saturating_add(appended.len() as u64);

        let mut pending = std::mem::take(&mut self.state.partial);
        pending.extend_from_slice(&appended);

        let mut segments = pending.split(|byte| *byte == b'\n');
        let mut current = segments.next();
        for next in segments {
            if let Some(segment) = current {
                push_decoded_line(&mut result.lines, segment);
            }
            current = Some(next);
        }
        // The final segment had no terminator; keep it for the next poll.
        if let Some(tail) = current {
            self.state.partial = tail.to_vec();
        }

        result
    }
}

/// Lossy decode: log files carry incidental binary noise, which becomes
/// the replacement character instead of failing the whole read.
fn push_decoded_line(lines: &mut Vec<String>, raw: &[u8]) {
    let decoded = String::from_utf8_lossy(raw);
    if decoded.contains('\u{FFFD}') {
        tracing::debug!(line = %decoded, "Replaced invalid byte sequences in log line");
    }
    let trimmed = decoded.trim();
    if !trimmed.is_empty() {
        lines.push(trimmed.to_string());
    }
}
