//! Scheduled events and the timers that deliver them.
//!
//! A machine never sleeps. It returns an [`Effect::Schedule`] carrying a
//! [`ScheduledEvent`]; the runtime arms a timer and later hands back a
//! [`FiredTimer`] stamped with the session id and generation it was armed
//! for. Machines drop fired timers whose stamp no longer matches.
//!
//! [`Effect::Schedule`]: super::Effect::Schedule

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{Millis, SessionId};

/// What a timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    /// Reaction time: show the "go" signal.
    RevealGo,
    /// Digit span: hide the number and open input.
    EndMemorize,
    /// Sequential recall: flashing done, open input.
    ShowInput,
    /// Pause after a cleared round is over.
    NextRound,
    /// Sequential recall: take down the new-best banner.
    DismissCongrats,
}

/// A timer request produced by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledEvent {
    /// Session the timer belongs to.
    pub session: SessionId,
    /// Generation the session was in when the timer was armed.
    pub generation: u64,
    /// What to do on expiry.
    pub kind: TimerKind,
    /// Delay from now.
    pub delay: Duration,
}

impl ScheduledEvent {
    /// Converts this request into the event delivered at `at`.
    #[must_use]
    pub const fn fire(self, at: Millis) -> FiredTimer {
        FiredTimer {
            session: self.session,
            generation: self.generation,
            kind: self.kind,
            at,
        }
    }
}

/// A timer that has expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredTimer {
    /// Session the timer was armed for.
    pub session: SessionId,
    /// Generation the timer was armed in.
    pub generation: u64,
    /// What the timer does.
    pub kind: TimerKind,
    /// When it fired.
    pub at: Millis,
}
