//! Colour-word trial batches for the interference test.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::GeneratorError;

use super::{Color, StimulusGenerator};

/// A colour word printed in an ink colour. The correct answer is the ink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterferenceTrial {
    /// Word shown.
    pub word: Color,
    /// Ink the word is printed in.
    pub ink: Color,
}

impl InterferenceTrial {
    /// Word and ink agree.
    #[must_use]
    pub fn is_congruent(&self) -> bool {
        self.word == self.ink
    }
}

/// Produces a shuffled batch, half congruent and half incongruent.
#[derive(Debug, Clone, Copy)]
pub struct InterferenceGenerator {
    total: usize,
}

impl InterferenceGenerator {
    /// Creates a generator for batches of `total` trials.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidParameters`] if `total` is zero or odd.
    pub fn new(total: usize) -> Result<Self, GeneratorError> {
        if total == 0 || total % 2 != 0 {
            return Err(GeneratorError::InvalidParameters(format!(
                "interference trial count must be a positive even number, got {total}"
            )));
        }
        Ok(Self { total })
    }

    /// Trials per batch.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }
}

impl StimulusGenerator for InterferenceGenerator {
    type Output = Vec<InterferenceTrial>;

    fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<InterferenceTrial> {
        let half = self.total / 2;
        let mut batch = Vec::with_capacity(self.total);
        for _ in 0..half {
            let ink = Color::random(rng);
            batch.push(InterferenceTrial { word: ink, ink });
        }
        for _ in 0..half {
            let ink = Color::random(rng);
            let others: Vec<Color> = Color::ALL.into_iter().filter(|&c| c != ink).collect();
            let word = others[rng.random_range(0..others.len())];
            batch.push(InterferenceTrial { word, ink });
        }
        batch.shuffle(rng);
        batch
    }

    fn name(&self) -> &'static str {
        "interference"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn exact_split() {
        let generator = InterferenceGenerator::new(20).unwrap();
        let batch = generator.generate(&mut StdRng::seed_from_u64(4));
        assert_eq!(batch.len(), 20);
        assert_eq!(batch.iter().filter(|t| t.is_congruent()).count(), 10);
    }

    #[test]
    fn order_is_shuffled() {
        let generator = InterferenceGenerator::new(20).unwrap();
        let mut rng = StdRng::seed_from_u64(8);
        // with 20 trials an unshuffled congruent-first layout is vanishingly rare
        let interleaved = (0..10).any(|_| {
            let batch = generator.generate(&mut rng);
            batch[..10].iter().any(|t| !t.is_congruent())
        });
        assert!(interleaved);
    }

    #[test]
    fn rejects_odd_or_empty() {
        assert!(InterferenceGenerator::new(0).is_err());
        assert!(InterferenceGenerator::new(19).is_err());
        assert!(InterferenceGenerator::new(2).is_ok());
    }
}
