//! Post-session self-report questionnaire.
//!
//! Three ratings are attached to every submitted result: mood after the
//! game (1..=5), perceived effort (1..=10) and how much the game reduced
//! stress (1..=10). Values are validated on construction and on
//! deserialization, so a [`SelfReportMatrix`] is always in range.

use serde::{Deserialize, Serialize};

use crate::error::SelfReportError;

const MOOD_RANGE: (u8, u8) = (1, 5);
const EFFORT_RANGE: (u8, u8) = (1, 10);
const STRESS_RANGE: (u8, u8) = (1, 10);

/// Mood scale used for `post_game_mood`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Mood {
    /// 1
    VeryStressed = 1,
    /// 2
    Stressed = 2,
    /// 3
    Neutral = 3,
    /// 4
    Calm = 4,
    /// 5
    VeryCalm = 5,
}

impl Mood {
    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::VeryStressed => "Very Stressed",
            Self::Stressed => "Stressed",
            Self::Neutral => "Neutral",
            Self::Calm => "Calm",
            Self::VeryCalm => "Very Calm",
        }
    }

    const fn from_rating(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::VeryStressed),
            2 => Some(Self::Stressed),
            3 => Some(Self::Neutral),
            4 => Some(Self::Calm),
            5 => Some(Self::VeryCalm),
            _ => None,
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The three self-report ratings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSelfReport")]
pub struct SelfReportMatrix {
    post_game_mood: u8,
    perceived_effort: u8,
    stress_reduction_rating: u8,
}

#[derive(Deserialize)]
struct RawSelfReport {
    post_game_mood: u8,
    perceived_effort: u8,
    stress_reduction_rating: u8,
}

impl TryFrom<RawSelfReport> for SelfReportMatrix {
    type Error = SelfReportError;

    fn try_from(raw: RawSelfReport) -> Result<Self, Self::Error> {
        Self::new(
            raw.post_game_mood,
            raw.perceived_effort,
            raw.stress_reduction_rating,
        )
    }
}

impl Default for SelfReportMatrix {
    fn default() -> Self {
        Self {
            post_game_mood: 3,
            perceived_effort: 5,
            stress_reduction_rating: 5,
        }
    }
}

fn check(field: &'static str, value: u8, (min, max): (u8, u8)) -> Result<u8, SelfReportError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(SelfReportError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

impl SelfReportMatrix {
    /// Builds a matrix from three ratings.
    ///
    /// # Errors
    ///
    /// Returns [`SelfReportError::OutOfRange`] for the first rating outside
    /// its scale.
    pub fn new(
        post_game_mood: u8,
        perceived_effort: u8,
        stress_reduction_rating: u8,
    ) -> Result<Self, SelfReportError> {
        Ok(Self {
            post_game_mood: check("post_game_mood", post_game_mood, MOOD_RANGE)?,
            perceived_effort: check("perceived_effort", perceived_effort, EFFORT_RANGE)?,
            stress_reduction_rating: check(
                "stress_reduction_rating",
                stress_reduction_rating,
                STRESS_RANGE,
            )?,
        })
    }

    /// Mood rating, 1..=5.
    #[must_use]
    pub const fn post_game_mood(&self) -> u8 {
        self.post_game_mood
    }

    /// Mood rating as a labelled value.
    #[must_use]
    pub fn mood(&self) -> Mood {
        Mood::from_rating(self.post_game_mood).unwrap_or(Mood::Neutral)
    }

    /// Effort rating, 1..=10.
    #[must_use]
    pub const fn perceived_effort(&self) -> u8 {
        self.perceived_effort
    }

    /// Stress-reduction rating, 1..=10.
    #[must_use]
    pub const fn stress_reduction_rating(&self) -> u8 {
        self.stress_reduction_rating
    }

    /// Sets the mood rating.
    ///
    /// # Errors
    ///
    /// Returns [`SelfReportError::OutOfRange`] outside 1..=5; the matrix
    /// is left unchanged.
    pub fn set_post_game_mood(&mut self, value: u8) -> Result<(), SelfReportError> {
        self.post_game_mood = check("post_game_mood", value, MOOD_RANGE)?;
        Ok(())
    }

    /// Sets the effort rating.
    ///
    /// # Errors
    ///
    /// Returns [`SelfReportError::OutOfRange`] outside 1..=10.
    pub fn set_perceived_effort(&mut self, value: u8) -> Result<(), SelfReportError> {
        self.perceived_effort = check("perceived_effort", value, EFFORT_RANGE)?;
        Ok(())
    }

    /// Sets the stress-reduction rating.
    ///
    /// # Errors
    ///
    /// Returns [`SelfReportError::OutOfRange`] outside 1..=10.
    pub fn set_stress_reduction_rating(&mut self, value: u8) -> Result<(), SelfReportError> {
        self.stress_reduction_rating = check("stress_reduction_rating", value, STRESS_RANGE)?;
        Ok(())
    }
}
