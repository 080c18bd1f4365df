//! A single stimulus and the player's response to it.

use serde::Serialize;

use super::Millis;

/// Correctness and latency of a scored trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Response {
    /// Whether the answer matched.
    pub correct: bool,
    /// Milliseconds from presentation to answer.
    pub latency_ms: u64,
}

/// One scored stimulus/response unit.
///
/// Created when the stimulus is presented and scored exactly once by
/// [`Trial::record`]; later calls leave it unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trial<C, A> {
    /// What was shown.
    pub content: C,
    /// The correct answer.
    pub expected: A,
    /// When the stimulus appeared.
    pub presented_at: Millis,
    /// When the player answered; never earlier than `presented_at`.
    pub responded_at: Option<Millis>,
    /// What the player answered.
    pub given: Option<A>,
    /// Whether `given` matched `expected`.
    pub correct: bool,
}

impl<C, A: PartialEq> Trial<C, A> {
    /// Opens a trial presented at `presented_at`.
    #[must_use]
    pub const fn present(content: C, expected: A, presented_at: Millis) -> Self {
        Self {
            content,
            expected,
            presented_at,
            responded_at: None,
            given: None,
            correct: false,
        }
    }

    /// Scores the response and returns whether it was correct.
    ///
    /// A response timestamp earlier than the presentation is clamped to
    /// the presentation time.
    pub fn record(&mut self, given: A, at: Millis) -> bool {
        if self.is_scored() {
            return self.correct;
        }
        self.correct = given == self.expected;
        self.given = Some(given);
        self.responded_at = Some(at.max(self.presented_at));
        self.correct
    }

    /// Scores the trial against an answer that could not be read, which is
    /// always wrong.
    pub fn record_unreadable(&mut self, at: Millis) {
        if self.is_scored() {
            return;
        }
        self.correct = false;
        self.responded_at = Some(at.max(self.presented_at));
    }

    /// Whether a response has been recorded.
    #[must_use]
    pub const fn is_scored(&self) -> bool {
        self.responded_at.is_some()
    }

    /// Response latency in milliseconds, once scored.
    #[must_use]
    pub fn latency_ms(&self) -> Option<u64> {
        self.responded_at.map(|at| at.since(self.presented_at))
    }

    /// The scored outcome, once scored.
    #[must_use]
    pub fn response(&self) -> Option<Response> {
        self.latency_ms().map(|latency_ms| Response {
            correct: self.correct,
            latency_ms,
        })
    }
}
