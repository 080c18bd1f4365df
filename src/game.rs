//! Game identifiers.
//!
//! Each mini-game is addressed by the slug the result store uses for its
//! endpoints, e.g. `stroop-game` for the colour-word interference test.

use serde::{Deserialize, Serialize};

/// Identifies one of the six assessment games.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    clap::ValueEnum,
)]
pub enum GameId {
    /// Press as soon as the "go" signal appears.
    #[serde(rename = "reaction-time")]
    #[value(name = "reaction-time", alias = "reaction")]
    ReactionTime,

    /// Repeat a growing sequence of colours.
    #[serde(rename = "memory-game")]
    #[value(name = "memory-game", alias = "sequence")]
    SequenceRecall,

    /// Recall a growing string of digits.
    #[serde(rename = "longest-number")]
    #[value(name = "longest-number", alias = "digit-span")]
    DigitSpan,

    /// Slide numbered tiles back into order.
    #[serde(rename = "numpuz-game")]
    #[value(name = "numpuz-game", alias = "puzzle")]
    SlidingPuzzle,

    /// Name the ink colour of a colour word.
    #[serde(rename = "stroop-game")]
    #[value(name = "stroop-game", alias = "stroop")]
    Interference,

    /// Add up the terms shown before answering wrong.
    #[serde(rename = "additions-game")]
    #[value(name = "additions-game", alias = "arithmetic")]
    Arithmetic,
}

impl GameId {
    /// Every game, in dashboard order.
    pub const ALL: [Self; 6] = [
        Self::ReactionTime,
        Self::SequenceRecall,
        Self::Interference,
        Self::DigitSpan,
        Self::SlidingPuzzle,
        Self::Arithmetic,
    ];

    /// Store slug for this game.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::ReactionTime => "reaction-time",
            Self::SequenceRecall => "memory-game",
            Self::DigitSpan => "longest-number",
            Self::SlidingPuzzle => "numpuz-game",
            Self::Interference => "stroop-game",
            Self::Arithmetic => "additions-game",
        }
    }

    /// Human-readable title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::ReactionTime => "Reaction Time",
            Self::SequenceRecall => "Memory Sequence",
            Self::DigitSpan => "Longest Number",
            Self::SlidingPuzzle => "Numpuz",
            Self::Interference => "Stroop Test",
            Self::Arithmetic => "Additions",
        }
    }

    /// Path of the aggregated stats endpoint, if the store exposes one.
    ///
    /// Games without a dedicated endpoint serve their raw result list,
    /// which is aggregated client-side.
    #[must_use]
    pub const fn stats_path(self) -> Option<&'static str> {
        match self {
            Self::DigitSpan => Some("longest-number-stats"),
            Self::SlidingPuzzle => Some("numpuz-stats"),
            Self::Arithmetic => Some("additions-stats"),
            Self::ReactionTime | Self::SequenceRecall | Self::Interference => None,
        }
    }

    /// Label used for metrics and structured events.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ReactionTime => "reaction_time",
            Self::SequenceRecall => "memory_game",
            Self::DigitSpan => "longest_number",
            Self::SlidingPuzzle => "numpuz_game",
            Self::Interference => "stroop_game",
            Self::Arithmetic => "additions_game",
        }
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}
