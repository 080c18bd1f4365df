//! Stimulus generators.
//!
//! Generators are **factories**: parameters are checked once at
//! construction, and every later call to [`StimulusGenerator::generate`]
//! is total. All randomness comes from an injected [`Rng`] so that a
//! seeded run reproduces the same stimuli.
//!
//! # Generators
//!
//! | Type | Game | Output |
//! |------|------|--------|
//! | [`ArithmeticGenerator`] | `additions-game` | [`ArithmeticProblem`] |
//! | [`SequenceGenerator`] | `memory-game` | next [`Color`] |
//! | [`DigitStringGenerator`] | `longest-number` | digit string |
//! | [`PuzzleGenerator`] | `numpuz-game` | shuffled [`Board`] |
//! | [`InterferenceGenerator`] | `stroop-game` | [`InterferenceTrial`] batch |
//! | [`ReactionDelayGenerator`] | `reaction-time` | go-signal delay |

mod arithmetic;
mod digits;
mod interference;
mod puzzle;
mod reaction;
mod sequence;

pub use arithmetic::{ArithmeticGenerator, ArithmeticProblem};
pub use digits::DigitStringGenerator;
pub use interference::{InterferenceGenerator, InterferenceTrial};
pub use puzzle::{Board, PuzzleGenerator};
pub use reaction::ReactionDelayGenerator;
pub use sequence::SequenceGenerator;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::schema::GamesConfig;
use crate::error::GeneratorError;
use crate::game::GameId;

// ============================================================================
// Core Trait
// ============================================================================

/// A stimulus generator factory.
pub trait StimulusGenerator: Send + Sync + std::fmt::Debug {
    /// What one call produces.
    type Output;

    /// Draws one stimulus.
    fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Output;

    /// Short name for logging.
    fn name(&self) -> &'static str;
}

// ============================================================================
// Colours
// ============================================================================

/// The four colours shared by sequential recall and the interference test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// Red
    Red,
    /// Blue
    Blue,
    /// Green
    Green,
    /// Yellow
    Yellow,
}

impl Color {
    /// The full alphabet, in display order.
    pub const ALL: [Self; 4] = [Self::Red, Self::Blue, Self::Green, Self::Yellow];

    /// Upper-case colour word as shown on screen.
    #[must_use]
    pub const fn word(self) -> &'static str {
        match self {
            Self::Red => "RED",
            Self::Blue => "BLUE",
            Self::Green => "GREEN",
            Self::Yellow => "YELLOW",
        }
    }

    /// Draws a colour uniformly from the alphabet.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.word())
    }
}

// ============================================================================
// Factory
// ============================================================================

/// One freshly generated stimulus for any game.
///
/// Used by the CLI to preview what a session would present first.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "game", rename_all = "kebab-case")]
pub enum Stimulus {
    /// Random wait before the "go" signal.
    ReactionTime {
        /// Delay in milliseconds.
        delay_ms: u64,
    },
    /// First colour of a recall sequence.
    MemoryGame {
        /// Sequence shown in round one.
        sequence: Vec<Color>,
    },
    /// First number to memorise.
    LongestNumber {
        /// Digits shown.
        number: String,
    },
    /// Starting board.
    NumpuzGame {
        /// The shuffled board.
        board: Board,
    },
    /// A full interference batch.
    StroopGame {
        /// Trials in presentation order.
        trials: Vec<InterferenceTrial>,
    },
    /// First question of the lowest tier.
    AdditionsGame {
        /// The problem.
        problem: ArithmeticProblem,
    },
}

/// Builds the generator for `game` from `config` and draws one stimulus.
///
/// # Errors
///
/// Returns [`GeneratorError::InvalidParameters`] if the configured
/// parameters admit no valid stimulus.
pub fn create_stimulus<R: Rng + ?Sized>(
    game: GameId,
    config: &GamesConfig,
    rng: &mut R,
) -> Result<Stimulus, GeneratorError> {
    let stimulus = match game {
        GameId::ReactionTime => {
            let generator = ReactionDelayGenerator::new(&config.reaction_time)?;
            Stimulus::ReactionTime {
                delay_ms: u64::try_from(generator.generate(rng).as_millis()).unwrap_or(u64::MAX),
            }
        }
        GameId::SequenceRecall => {
            let mut sequence = Vec::new();
            SequenceGenerator.extend(&mut sequence, rng);
            Stimulus::MemoryGame { sequence }
        }
        GameId::DigitSpan => {
            let generator = DigitStringGenerator::new(config.digit_span.initial_length)?;
            Stimulus::LongestNumber {
                number: generator.generate(rng),
            }
        }
        GameId::SlidingPuzzle => {
            let generator = PuzzleGenerator::new(config.sliding_puzzle.size)?;
            Stimulus::NumpuzGame {
                board: generator.generate(rng),
            }
        }
        GameId::Interference => {
            let generator = InterferenceGenerator::new(config.interference.total_trials)?;
            Stimulus::StroopGame {
                trials: generator.generate(rng),
            }
        }
        GameId::Arithmetic => {
            let tier = config.arithmetic.tiers.first().copied().ok_or_else(|| {
                GeneratorError::InvalidParameters("no arithmetic tiers configured".to_string())
            })?;
            let generator = ArithmeticGenerator::new(tier)?;
            Stimulus::AdditionsGame {
                problem: generator.generate(rng),
            }
        }
    };
    tracing::debug!(game = %game, "generated stimulus");
    Ok(stimulus)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn factory_covers_every_game() {
        let config = GamesConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        for game in GameId::ALL {
            let stimulus = create_stimulus(game, &config, &mut rng).unwrap();
            let json = serde_json::to_value(&stimulus).unwrap();
            assert_eq!(json["game"], game.slug());
        }
    }

    #[test]
    fn factory_is_reproducible_with_seed() {
        let config = GamesConfig::default();
        let a = create_stimulus(GameId::Interference, &config, &mut StdRng::seed_from_u64(42));
        let b = create_stimulus(GameId::Interference, &config, &mut StdRng::seed_from_u64(42));
        assert_eq!(
            serde_json::to_string(&a.unwrap()).unwrap(),
            serde_json::to_string(&b.unwrap()).unwrap()
        );
    }

    #[test]
    fn factory_rejects_empty_tiers() {
        let mut config = GamesConfig::default();
        config.arithmetic.tiers.clear();
        let result = create_stimulus(GameId::Arithmetic, &config, &mut StdRng::seed_from_u64(1));
        assert!(matches!(result, Err(GeneratorError::InvalidParameters(_))));
    }

    #[test]
    fn factory_rejects_odd_trial_count() {
        let mut config = GamesConfig::default();
        config.interference.total_trials = 7;
        let result = create_stimulus(GameId::Interference, &config, &mut StdRng::seed_from_u64(1));
        assert!(result.is_err());
    }

    #[test]
    fn color_words() {
        assert_eq!(Color::Yellow.to_string(), "YELLOW");
        assert_eq!(serde_json::to_string(&Color::Red).unwrap(), "\"red\"");
    }
}
