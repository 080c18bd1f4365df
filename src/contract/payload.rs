//! Submitted metric sets and the payload that carries them.

use serde::{Deserialize, Serialize};

use crate::game::GameId;

use super::self_report::SelfReportMatrix;

/// Arithmetic fluency result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArithmeticMetrics {
    /// Correct answers before the first miss or the ceiling.
    pub total_correct: u32,
    /// Summed answer latency in seconds.
    pub time_taken_s: f64,
    /// Level of the tier the session ended in.
    pub difficulty_level: u32,
}

/// Digit-span recall result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitSpanMetrics {
    /// Length attempted at failure, or the ceiling on a full clear.
    pub max_number_length: u32,
    /// Rounds presented.
    pub total_attempts: u32,
    /// Input latency summed over cleared rounds.
    pub total_reaction_time_ms: u64,
}

/// Sequential colour recall result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceMetrics {
    /// Longest sequence repeated correctly.
    pub max_sequence_length: u32,
    /// Rounds presented, including the failed one.
    pub total_attempts: u32,
}

/// Sliding-tile puzzle result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleMetrics {
    /// Whole seconds from start to the solving move.
    pub time_taken_s: u64,
    /// Board size label, e.g. `"3x3"`.
    pub puzzle_size: String,
    /// Tiles slid.
    pub moves_made: u32,
}

/// Colour-word interference result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterferenceMetrics {
    /// Correct answers.
    pub total_correct: u32,
    /// Mean incongruent minus mean congruent latency, rounded.
    pub interference_score_ms: i64,
    /// Session length in seconds, two decimals.
    pub total_time_s: f64,
}

/// Reaction-time result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionMetrics {
    /// Latency from the "go" signal to the press.
    pub reaction_time_ms: u64,
}

/// The metric set of any game.
///
/// Serialized without a tag: the field names alone identify the game, as
/// the store expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GameMetrics {
    /// `additions-game`
    Arithmetic(ArithmeticMetrics),
    /// `longest-number`
    DigitSpan(DigitSpanMetrics),
    /// `memory-game`
    SequenceRecall(SequenceMetrics),
    /// `numpuz-game`
    SlidingPuzzle(PuzzleMetrics),
    /// `stroop-game`
    Interference(InterferenceMetrics),
    /// `reaction-time`
    ReactionTime(ReactionMetrics),
}

impl GameMetrics {
    /// The game these metrics belong to.
    #[must_use]
    pub const fn game(&self) -> GameId {
        match self {
            Self::Arithmetic(_) => GameId::Arithmetic,
            Self::DigitSpan(_) => GameId::DigitSpan,
            Self::SequenceRecall(_) => GameId::SequenceRecall,
            Self::SlidingPuzzle(_) => GameId::SlidingPuzzle,
            Self::Interference(_) => GameId::Interference,
            Self::ReactionTime(_) => GameId::ReactionTime,
        }
    }

    /// The headline score used for best-score and history comparisons.
    ///
    /// Moves for the puzzle, milliseconds for reaction time, and the
    /// count or length achieved for every other game.
    #[must_use]
    pub fn score(&self) -> f64 {
        match self {
            Self::Arithmetic(m) => f64::from(m.total_correct),
            Self::DigitSpan(m) => f64::from(m.max_number_length),
            Self::SequenceRecall(m) => f64::from(m.max_sequence_length),
            Self::SlidingPuzzle(m) => f64::from(m.moves_made),
            Self::Interference(m) => f64::from(m.total_correct),
            #[allow(clippy::cast_precision_loss)]
            Self::ReactionTime(m) => m.reaction_time_ms as f64,
        }
    }

    /// Time spent playing, in milliseconds.
    #[must_use]
    pub fn time_spent_ms(&self) -> u64 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let secs = |s: f64| (s.max(0.0) * 1000.0) as u64;
        match self {
            Self::Arithmetic(m) => secs(m.time_taken_s),
            Self::DigitSpan(m) => m.total_reaction_time_ms,
            Self::SequenceRecall(_) => 0,
            Self::SlidingPuzzle(m) => m.time_taken_s.saturating_mul(1000),
            Self::Interference(m) => secs(m.total_time_s),
            Self::ReactionTime(m) => m.reaction_time_ms,
        }
    }
}

/// Metrics merged with the self-report matrix: the body of a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    /// Game-specific fields.
    #[serde(flatten)]
    pub metrics: GameMetrics,
    /// The three self-report fields.
    #[serde(flatten)]
    pub self_report: SelfReportMatrix,
}

impl SubmissionPayload {
    /// Pairs metrics with a questionnaire.
    #[must_use]
    pub const fn new(metrics: GameMetrics, self_report: SelfReportMatrix) -> Self {
        Self {
            metrics,
            self_report,
        }
    }

    /// The game this payload is for.
    #[must_use]
    pub const fn game(&self) -> GameId {
        self.metrics.game()
    }
}
