//! Configuration schema.
//!
//! One section per game plus the result store. Every field defaults to the
//! values the games ship with, so an empty document is a valid
//! configuration. Durations are written in humantime form (`800ms`, `1s`).

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ============================================================================
// Root
// ============================================================================

/// Engine configuration for all six games.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GamesConfig {
    /// Reaction-time game tuning.
    pub reaction_time: ReactionTimeConfig,

    /// Sequential colour recall tuning.
    pub sequence_recall: SequenceRecallConfig,

    /// Digit-span recall tuning.
    pub digit_span: DigitSpanConfig,

    /// Sliding-tile puzzle tuning.
    pub sliding_puzzle: SlidingPuzzleConfig,

    /// Colour-word interference test tuning.
    pub interference: InterferenceConfig,

    /// Arithmetic fluency tuning.
    pub arithmetic: ArithmeticConfig,

    /// External result store connection.
    pub store: StoreConfig,
}

// ============================================================================
// Per-game sections
// ============================================================================

/// Reaction-time game: random wait before the "go" signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReactionTimeConfig {
    /// Shortest wait (inclusive).
    #[serde(with = "duration_str")]
    pub min_delay: Duration,

    /// Longest wait (exclusive).
    #[serde(with = "duration_str")]
    pub max_delay: Duration,
}

impl Default for ReactionTimeConfig {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(4000),
        }
    }
}

/// Sequential recall: how the sequence is flashed and paced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SequenceRecallConfig {
    /// Time between two flashed colours.
    #[serde(with = "duration_str")]
    pub flash_interval: Duration,

    /// Extra wait after the last flash before input opens.
    #[serde(with = "duration_str")]
    pub flash_tail: Duration,

    /// Pause after a cleared round before the next sequence is shown.
    #[serde(with = "duration_str")]
    pub round_pause: Duration,

    /// How long the new-best congratulation stays up.
    #[serde(with = "duration_str")]
    pub congrats_duration: Duration,
}

impl Default for SequenceRecallConfig {
    fn default() -> Self {
        Self {
            flash_interval: Duration::from_millis(800),
            flash_tail: Duration::from_millis(400),
            round_pause: Duration::from_millis(500),
            congrats_duration: Duration::from_secs(3),
        }
    }
}

/// Digit-span recall: length progression and memorisation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DigitSpanConfig {
    /// Digits shown in the first round.
    pub initial_length: usize,

    /// Ceiling; clearing this length ends the session successfully.
    pub max_length: usize,

    /// Digits added after each cleared round.
    pub length_increment: usize,

    /// Memorisation time per digit shown.
    #[serde(with = "duration_str")]
    pub memorize_per_digit: Duration,

    /// Pause after a cleared round before the next number appears.
    #[serde(with = "duration_str")]
    pub success_pause: Duration,
}

impl Default for DigitSpanConfig {
    fn default() -> Self {
        Self {
            initial_length: 1,
            max_length: 25,
            length_increment: 1,
            memorize_per_digit: Duration::from_millis(1000),
            success_pause: Duration::from_millis(1000),
        }
    }
}

/// Sliding-tile puzzle board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SlidingPuzzleConfig {
    /// Board edge length (`size x size` cells, one blank).
    pub size: usize,
}

impl Default for SlidingPuzzleConfig {
    fn default() -> Self {
        Self { size: 3 }
    }
}

/// Colour-word interference test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InterferenceConfig {
    /// Trials per session; half congruent, half incongruent.
    pub total_trials: usize,

    /// End the session on the first wrong answer.
    ///
    /// When `false` the full batch is always played and every wrong
    /// answer is simply scored as incorrect.
    pub stop_on_first_miss: bool,
}

impl Default for InterferenceConfig {
    fn default() -> Self {
        Self {
            total_trials: 20,
            stop_on_first_miss: true,
        }
    }
}

/// Arithmetic fluency: difficulty tiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArithmeticConfig {
    /// Questions asked before moving to the next tier.
    pub questions_per_tier: usize,

    /// Tiers in play order.
    pub tiers: Vec<DifficultyTier>,
}

impl Default for ArithmeticConfig {
    fn default() -> Self {
        Self {
            questions_per_tier: 5,
            tiers: vec![
                DifficultyTier::new(1, 10, 2),
                DifficultyTier::new(2, 50, 2),
                DifficultyTier::new(3, 100, 2),
                DifficultyTier::new(4, 100, 3),
                DifficultyTier::new(5, 500, 3),
            ],
        }
    }
}

/// One arithmetic difficulty step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DifficultyTier {
    /// Level reported as `difficulty_level`.
    pub level: u32,

    /// Largest operand (operands are drawn from `1..=max_value`).
    pub max_value: u32,

    /// Number of operands to add.
    pub terms: u32,
}

impl DifficultyTier {
    /// Creates a tier.
    #[must_use]
    pub const fn new(level: u32, max_value: u32, terms: u32) -> Self {
        Self {
            level,
            max_value,
            terms,
        }
    }
}

// ============================================================================
// Store
// ============================================================================

/// Connection to the external result store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Base URL the per-game endpoints are resolved against.
    pub base_url: String,

    /// Per-request timeout.
    #[serde(with = "duration_str")]
    pub timeout: Duration,

    /// Bearer token sent with every request.
    pub token: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/api/mental-games/".to_string(),
            timeout: Duration::from_secs(10),
            token: None,
        }
    }
}

// ============================================================================
// Duration (de)serialization
// ============================================================================

mod duration_str {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&humantime::format_duration(*value).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(raw.trim()).map_err(serde::de::Error::custom)
    }
}
