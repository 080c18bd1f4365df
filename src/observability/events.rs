//! Structured session event stream.
//!
//! Typed events emitted by the runtime as sessions progress, serialized as
//! newline-delimited JSON with a monotonically increasing sequence number.

use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::game::GameId;
use crate::session::SessionId;

// ---------------------------------------------------------------------------
// Event variants
// ---------------------------------------------------------------------------

/// A discrete event in a session's life.
///
/// Serialized with a `"type"` tag so consumers can dispatch on the kind.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A play-through started.
    SessionStarted {
        /// When it started.
        timestamp: DateTime<Utc>,
        /// Session id.
        session: SessionId,
        /// Game played.
        game: GameId,
        /// Best score known at start.
        known_best: Option<f64>,
    },

    /// The session moved to another state.
    PhaseChanged {
        /// When the transition happened.
        timestamp: DateTime<Utc>,
        /// Session id.
        session: SessionId,
        /// Game played.
        game: GameId,
        /// State before the transition.
        from: &'static str,
        /// State after the transition.
        to: &'static str,
    },

    /// A response was scored.
    TrialScored {
        /// When it was scored.
        timestamp: DateTime<Utc>,
        /// Session id.
        session: SessionId,
        /// Game played.
        game: GameId,
        /// Whether the response was correct.
        correct: bool,
        /// Response latency.
        latency_ms: u64,
    },

    /// The play-through reached its result.
    SessionFinished {
        /// When it finished.
        timestamp: DateTime<Utc>,
        /// Session id.
        session: SessionId,
        /// Game played.
        game: GameId,
        /// The game's primary score.
        score: f64,
        /// Whether the score beat the known best.
        new_best: bool,
    },

    /// The result store accepted a submission.
    ResultSubmitted {
        /// When the store acknowledged it.
        timestamp: DateTime<Utc>,
        /// Session id.
        session: SessionId,
        /// Game played.
        game: GameId,
    },

    /// A submission failed; the result is kept for retry.
    SubmissionFailed {
        /// When the failure was observed.
        timestamp: DateTime<Utc>,
        /// Session id.
        session: SessionId,
        /// Game played.
        game: GameId,
        /// Error text.
        error: String,
    },

    /// Statistics were fetched from the store.
    StatsRefreshed {
        /// When they arrived.
        timestamp: DateTime<Utc>,
        /// Game whose statistics were fetched.
        game: GameId,
        /// Plays recorded server-side.
        total_plays: u64,
    },
}

/// Wraps an [`Event`] with its sequence number.
#[derive(Debug, Serialize)]
struct EventEnvelope {
    sequence: u64,
    #[serde(flatten)]
    event: Event,
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

/// Thread-safe, buffered JSONL event writer.
///
/// Every [`emit`](Self::emit) takes the next sequence number, writes one
/// line, and flushes. Serialization and I/O failures are dropped.
pub struct EventEmitter {
    writer: Mutex<BufWriter<Box<dyn Write + Send>>>,
    sequence: AtomicU64,
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("sequence", &self.sequence.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl EventEmitter {
    /// Creates an emitter over `writer`.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(BufWriter::new(writer)),
            sequence: AtomicU64::new(0),
        }
    }

    /// Creates an emitter that discards everything.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(Box::new(std::io::sink()))
    }

    /// Creates an emitter writing to a new file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::new(Box::new(file)))
    }

    /// Emits `event` as one JSONL line.
    pub fn emit(&self, event: Event) {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);
        let envelope = EventEnvelope { sequence, event };

        if let Ok(mut w) = self.writer.lock() {
            if let Ok(line) = serde_json::to_string(&envelope) {
                let _ = writeln!(w, "{line}");
                let _ = w.flush();
            }
        }
    }

    /// Number of events emitted so far.
    #[must_use]
    pub fn event_count(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }
}
