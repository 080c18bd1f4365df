//! Go-signal delay for the reaction-time game.

use std::time::Duration;

use rand::Rng;

use crate::config::schema::ReactionTimeConfig;
use crate::error::GeneratorError;

use super::StimulusGenerator;

/// Draws a delay uniformly from `[min_delay, max_delay)` at millisecond
/// resolution.
#[derive(Debug, Clone, Copy)]
pub struct ReactionDelayGenerator {
    min_ms: u64,
    max_ms: u64,
}

impl ReactionDelayGenerator {
    /// Creates a generator from the reaction-time settings.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidParameters`] if the range is empty.
    pub fn new(config: &ReactionTimeConfig) -> Result<Self, GeneratorError> {
        let min_ms = u64::try_from(config.min_delay.as_millis()).unwrap_or(u64::MAX);
        let max_ms = u64::try_from(config.max_delay.as_millis()).unwrap_or(u64::MAX);
        if min_ms >= max_ms {
            return Err(GeneratorError::InvalidParameters(format!(
                "reaction delay range is empty: {min_ms}ms..{max_ms}ms"
            )));
        }
        Ok(Self { min_ms, max_ms })
    }
}

impl StimulusGenerator for ReactionDelayGenerator {
    type Output = Duration;

    fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        Duration::from_millis(rng.random_range(self.min_ms..self.max_ms))
    }

    fn name(&self) -> &'static str {
        "reaction"
    }
}
