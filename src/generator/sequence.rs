//! Colour sequences for sequential recall.

use rand::Rng;

use super::{Color, StimulusGenerator};

/// Produces the next colour of a growing recall sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceGenerator;

impl SequenceGenerator {
    /// Appends one uniformly drawn colour to `sequence`.
    pub fn extend<R: Rng + ?Sized>(self, sequence: &mut Vec<Color>, rng: &mut R) {
        sequence.push(self.generate(rng));
    }
}

impl StimulusGenerator for SequenceGenerator {
    type Output = Color;

    fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Color {
        Color::random(rng)
    }

    fn name(&self) -> &'static str {
        "sequence"
    }
}
