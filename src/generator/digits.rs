//! Digit strings for digit-span recall.

use rand::Rng;

use crate::error::GeneratorError;

use super::StimulusGenerator;

/// Generates a number of fixed length.
///
/// Multi-digit numbers never start with `0`; a single digit may be `0`.
#[derive(Debug, Clone, Copy)]
pub struct DigitStringGenerator {
    length: usize,
}

impl DigitStringGenerator {
    /// Creates a generator for `length`-digit numbers.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidParameters`] if `length` is zero.
    pub fn new(length: usize) -> Result<Self, GeneratorError> {
        if length == 0 {
            return Err(GeneratorError::InvalidParameters(
                "digit string length must be at least 1".to_string(),
            ));
        }
        Ok(Self { length })
    }

    /// Number of digits produced.
    #[must_use]
    pub const fn length(&self) -> usize {
        self.length
    }
}

impl StimulusGenerator for DigitStringGenerator {
    type Output = String;

    fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let mut out = String::with_capacity(self.length);
        for position in 0..self.length {
            let low = if position == 0 && self.length > 1 { 1 } else { 0 };
            let digit: u8 = rng.random_range(low..=9);
            out.push(char::from(b'0' + digit));
        }
        out
    }

    fn name(&self) -> &'static str {
        "digits"
    }
}
