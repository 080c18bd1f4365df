//! Per-game session state machines.
//!
//! Every game is a value object with a pure transition function:
//!
//! ```text
//! apply(session, event, rng) -> Step { session', effects, accepted }
//! ```
//!
//! Machines never read a clock or sleep. Events carry their own timestamp
//! ([`Millis`]) and delays come back as [`Effect::Schedule`] requests that
//! the runtime turns into cancellable timers. A response that arrives in a
//! state that does not accept it yields `accepted == false` and leaves the
//! session untouched.
//!
//! `start` is accepted from the initial state and from any terminal or
//! fail state; `teardown` from any state. Both bump the session's
//! generation so timers armed earlier are dropped when they fire.

pub mod arithmetic;
pub mod digit_span;
pub mod interference;
pub mod puzzle;
pub mod reaction;
pub mod sequence;
pub mod timer;
pub mod trial;

pub use arithmetic::{ArithmeticEvent, ArithmeticSession};
pub use digit_span::{DigitSpanEvent, DigitSpanSession};
pub use interference::{InterferenceEvent, InterferenceSession};
pub use puzzle::{PuzzleEvent, PuzzleSession};
pub use reaction::{ReactionEvent, ReactionSession};
pub use sequence::{SequenceEvent, SequenceSession};
pub use timer::{FiredTimer, ScheduledEvent, TimerKind};
pub use trial::{Response, Trial};

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::schema::GamesConfig;
use crate::contract::GameMetrics;
use crate::error::GeneratorError;
use crate::game::GameId;

// ============================================================================
// Time and identity
// ============================================================================

/// A point on the session's monotonic clock, in milliseconds.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Millis(pub u64);

impl Millis {
    /// Milliseconds elapsed since `earlier`; zero if `earlier` is later.
    #[must_use]
    pub const fn since(self, earlier: Self) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// This instant shifted by `delay`.
    #[must_use]
    pub fn after(self, delay: Duration) -> Self {
        Self(
            self.0
                .saturating_add(u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)),
        )
    }
}

/// Unique id of one session object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    /// A fresh random id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// Shared session state
// ============================================================================

/// Bookkeeping shared by every game.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionHeader {
    /// Session id, fixed for the object's lifetime.
    pub id: SessionId,
    /// Bumped on every start and teardown.
    pub generation: u64,
    /// When the current play-through started.
    pub started_at: Option<Millis>,
    /// When the current play-through reached its result.
    pub finished_at: Option<Millis>,
    /// Best score known when the play-through started.
    pub known_best: Option<f64>,
    /// Whether the result beat `known_best`.
    pub new_best: bool,
}

impl SessionHeader {
    /// Header for a session in its initial state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: SessionId::new(),
            generation: 0,
            started_at: None,
            finished_at: None,
            known_best: None,
            new_best: false,
        }
    }

    /// Begins a new play-through.
    pub fn restart(&mut self, at: Millis, known_best: Option<f64>) {
        self.generation += 1;
        self.started_at = Some(at);
        self.finished_at = None;
        self.known_best = known_best;
        self.new_best = false;
    }

    /// Returns to the initial state.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.started_at = None;
        self.finished_at = None;
        self.new_best = false;
    }

    /// Whether `fired` was armed for this session in its current generation.
    #[must_use]
    pub fn owns(&self, fired: &FiredTimer) -> bool {
        fired.session == self.id && fired.generation == self.generation
    }

    /// A timer request stamped with this session's id and generation.
    #[must_use]
    pub const fn schedule(&self, kind: TimerKind, delay: Duration) -> Effect {
        Effect::Schedule(ScheduledEvent {
            session: self.id,
            generation: self.generation,
            kind,
            delay,
        })
    }

    /// Milliseconds from start to finish, once finished.
    #[must_use]
    pub fn elapsed_ms(&self) -> Option<u64> {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => Some(end.since(start)),
            _ => None,
        }
    }
}

impl Default for SessionHeader {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Transitions
// ============================================================================

/// A side effect requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Arm a timer.
    Schedule(ScheduledEvent),
    /// Cancel every pending timer of the session.
    CancelTimers,
}

/// Outcome of applying one event.
#[derive(Debug)]
pub struct Step<M> {
    /// The session after the event.
    pub session: M,
    /// Effects for the runtime to carry out, in order.
    pub effects: Vec<Effect>,
    /// Whether the event was valid in the session's state.
    pub accepted: bool,
}

impl<M> Step<M> {
    /// The event was valid.
    #[must_use]
    pub const fn accepted(session: M, effects: Vec<Effect>) -> Self {
        Self {
            session,
            effects,
            accepted: true,
        }
    }

    /// The event was ignored; the session is unchanged.
    #[must_use]
    pub const fn ignored(session: M) -> Self {
        Self {
            session,
            effects: Vec::new(),
            accepted: false,
        }
    }
}

/// A game's session state machine.
pub trait GameMachine: Sized + Clone + Send + std::fmt::Debug + 'static {
    /// Events the machine reacts to.
    type Event: Send + std::fmt::Debug;

    /// The game this machine plays.
    const GAME: GameId;

    /// Builds a session in its initial state.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidParameters`] if the game's section
    /// of `config` admits no valid stimulus.
    fn from_config(config: &GamesConfig) -> Result<Self, GeneratorError>;

    /// Shared bookkeeping.
    fn header(&self) -> &SessionHeader;

    /// Name of the current state, e.g. `"user_input"`.
    fn phase(&self) -> &'static str;

    /// Whether the session holds a final result.
    fn is_finished(&self) -> bool;

    /// Applies one event.
    fn apply<R: Rng + ?Sized>(self, event: Self::Event, rng: &mut R) -> Step<Self>;

    /// The "start" / "play again" event.
    fn start_event(at: Millis, known_best: Option<f64>) -> Self::Event;

    /// Wraps an expired timer.
    fn timer_event(fired: FiredTimer) -> Self::Event;

    /// The teardown event.
    fn teardown_event() -> Self::Event;

    /// Event applied once the result has been stored, if the game has a
    /// post-submission state.
    fn settled_event() -> Option<Self::Event> {
        None
    }

    /// Scored responses of the current play-through, oldest first.
    fn responses(&self) -> Vec<Response>;

    /// Metrics to submit, available once finished.
    fn metrics(&self) -> Option<GameMetrics>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millis_arithmetic_saturates() {
        assert_eq!(Millis(500).since(Millis(200)), 300);
        assert_eq!(Millis(200).since(Millis(500)), 0);
        assert_eq!(Millis(100).after(Duration::from_millis(50)), Millis(150));
        assert_eq!(Millis(u64::MAX).after(Duration::from_secs(1)), Millis(u64::MAX));
    }

    #[test]
    fn header_generation_gates_timers() {
        let mut header = SessionHeader::new();
        header.restart(Millis(0), None);
        let Effect::Schedule(scheduled) =
            header.schedule(TimerKind::NextRound, Duration::from_millis(500))
        else {
            panic!("expected schedule effect");
        };
        let fired = scheduled.fire(Millis(500));
        assert!(header.owns(&fired));

        header.reset();
        assert!(!header.owns(&fired));

        let other = SessionHeader::new();
        assert!(!other.owns(&fired));
    }

    #[test]
    fn elapsed_needs_both_ends() {
        let mut header = SessionHeader::new();
        assert_eq!(header.elapsed_ms(), None);
        header.restart(Millis(1_000), Some(4.0));
        header.finished_at = Some(Millis(3_500));
        assert_eq!(header.elapsed_ms(), Some(2_500));
        assert_eq!(header.known_best, Some(4.0));
    }
}
