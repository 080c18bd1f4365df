//! Addition problems for the arithmetic fluency game.

use rand::Rng;
use serde::Serialize;

use crate::config::schema::DifficultyTier;
use crate::error::GeneratorError;

use super::StimulusGenerator;

/// A sum of random terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArithmeticProblem {
    /// Operands in display order.
    pub terms: Vec<u64>,
    /// Expected answer (sum of the terms).
    pub answer: u64,
    /// Level of the tier the problem was drawn from.
    pub level: u32,
}

impl ArithmeticProblem {
    /// Prompt text, e.g. `"7 + 3"`.
    #[must_use]
    pub fn prompt(&self) -> String {
        self.terms
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" + ")
    }
}

/// Draws `terms` operands uniformly from `1..=max_value`.
#[derive(Debug, Clone, Copy)]
pub struct ArithmeticGenerator {
    tier: DifficultyTier,
}

impl ArithmeticGenerator {
    /// Creates a generator for one difficulty tier.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidParameters`] if the tier has no
    /// terms or a zero `max_value`.
    pub fn new(tier: DifficultyTier) -> Result<Self, GeneratorError> {
        if tier.terms == 0 {
            return Err(GeneratorError::InvalidParameters(format!(
                "tier {} has no terms",
                tier.level
            )));
        }
        if tier.max_value == 0 {
            return Err(GeneratorError::InvalidParameters(format!(
                "tier {} has max_value 0",
                tier.level
            )));
        }
        Ok(Self { tier })
    }

    /// The tier this generator draws from.
    #[must_use]
    pub const fn tier(&self) -> DifficultyTier {
        self.tier
    }
}

impl StimulusGenerator for ArithmeticGenerator {
    type Output = ArithmeticProblem;

    fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> ArithmeticProblem {
        let max = u64::from(self.tier.max_value);
        let terms: Vec<u64> = (0..self.tier.terms)
            .map(|_| rng.random_range(1..=max))
            .collect();
        let answer = terms.iter().sum();
        ArithmeticProblem {
            terms,
            answer,
            level: self.tier.level,
        }
    }

    fn name(&self) -> &'static str {
        "arithmetic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn terms_stay_in_range_and_sum() {
        let generator = ArithmeticGenerator::new(DifficultyTier::new(4, 100, 3)).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let problem = generator.generate(&mut rng);
            assert_eq!(problem.terms.len(), 3);
            assert!(problem.terms.iter().all(|t| (1..=100).contains(t)));
            assert_eq!(problem.answer, problem.terms.iter().sum::<u64>());
            assert_eq!(problem.level, 4);
        }
    }

    #[test]
    fn prompt_joins_with_plus() {
        let problem = ArithmeticProblem {
            terms: vec![12, 7, 30],
            answer: 49,
            level: 4,
        };
        assert_eq!(problem.prompt(), "12 + 7 + 30");
    }

    #[test]
    fn rejects_degenerate_tiers() {
        assert!(ArithmeticGenerator::new(DifficultyTier::new(1, 0, 2)).is_err());
        assert!(ArithmeticGenerator::new(DifficultyTier::new(1, 10, 0)).is_err());
    }

    #[test]
    fn max_value_one_is_constant() {
        let generator = ArithmeticGenerator::new(DifficultyTier::new(1, 1, 2)).unwrap();
        let problem = generator.generate(&mut StdRng::seed_from_u64(0));
        assert_eq!(problem.answer, 2);
    }
}
