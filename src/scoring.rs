//! Derived session metrics.
//!
//! Pure functions of recorded trials and session timestamps. The session
//! machines call these at their terminal transition.

use crate::game::GameId;
use crate::generator::{Color, InterferenceTrial};
use crate::session::Trial;

/// Rounds `value` to `decimals` places (half away from zero).
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

/// Milliseconds rounded to whole seconds.
#[must_use]
pub const fn rounded_seconds(ms: u64) -> u64 {
    ms.saturating_add(500) / 1000
}

/// Milliseconds as seconds with two decimals.
#[must_use]
pub fn seconds_2dp(ms: u64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let seconds = ms as f64 / 1000.0;
    round_to(seconds, 2)
}

/// Sequential recall score: the longest length repeated correctly.
#[must_use]
pub const fn sequence_score(failing_length: usize) -> usize {
    failing_length.saturating_sub(1)
}

/// Summed latency of the correctly answered trials.
#[must_use]
pub fn correct_latency_ms<C, A: PartialEq>(trials: &[Trial<C, A>]) -> u64 {
    trials
        .iter()
        .filter(|t| t.correct)
        .filter_map(Trial::latency_ms)
        .sum()
}

/// Summed latency of every answered trial.
#[must_use]
pub fn answered_latency_ms<C, A: PartialEq>(trials: &[Trial<C, A>]) -> u64 {
    trials.iter().filter_map(Trial::latency_ms).sum()
}

/// Number of correct trials.
#[must_use]
pub fn correct_count<C, A>(trials: &[Trial<C, A>]) -> usize {
    trials.iter().filter(|t| t.correct).count()
}

/// Interference effect: mean latency of correct incongruent trials minus
/// mean latency of correct congruent trials, rounded to whole ms.
///
/// An empty group averages to zero.
#[must_use]
pub fn interference_score_ms(trials: &[Trial<InterferenceTrial, Color>]) -> i64 {
    let mean = |congruent: bool| {
        let latencies: Vec<u64> = trials
            .iter()
            .filter(|t| t.correct && t.content.is_congruent() == congruent)
            .filter_map(Trial::latency_ms)
            .collect();
        if latencies.is_empty() {
            0.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            let mean = latencies.iter().sum::<u64>() as f64 / latencies.len() as f64;
            mean
        }
    };
    #[allow(clippy::cast_possible_truncation)]
    let score = (mean(false) - mean(true)).round() as i64;
    score
}

/// Whether `score` beats `known_best` for `game`.
///
/// Lower is better for reaction time (milliseconds) and the puzzle
/// (moves); higher is better everywhere else. With no known best, any
/// reaction or puzzle result counts, while count games must beat zero.
#[must_use]
pub fn is_new_best(game: GameId, score: f64, known_best: Option<f64>) -> bool {
    match game {
        GameId::ReactionTime | GameId::SlidingPuzzle => known_best.is_none_or(|best| score < best),
        GameId::Arithmetic | GameId::DigitSpan | GameId::SequenceRecall | GameId::Interference => {
            score > known_best.unwrap_or(0.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Millis;

    fn stroop(word: Color, ink: Color, latency: u64, correct: bool) -> Trial<InterferenceTrial, Color> {
        let mut trial = Trial::present(InterferenceTrial { word, ink }, ink, Millis(0));
        let given = if correct { ink } else if ink == Color::Red { Color::Blue } else { Color::Red };
        trial.record(given, Millis(latency));
        trial
    }

    #[test]
    fn rounding() {
        assert!((round_to(3.14159, 2) - 3.14).abs() < 1e-9);
        assert!((round_to(2.25, 1) - 2.3).abs() < 1e-9);
        assert_eq!(rounded_seconds(1_499), 1);
        assert_eq!(rounded_seconds(1_500), 2);
        assert!((seconds_2dp(31_416) - 31.42).abs() < 1e-9);
    }

    #[test]
    fn interference_uses_correct_trials_only() {
        let trials = vec![
            stroop(Color::Red, Color::Red, 400, true),
            stroop(Color::Blue, Color::Blue, 500, true),
            stroop(Color::Red, Color::Green, 700, true),
            stroop(Color::Yellow, Color::Blue, 2_000, false),
        ];
        // incongruent 700 - congruent 450
        assert_eq!(interference_score_ms(&trials), 250);
    }

    #[test]
    fn interference_empty_groups_average_zero() {
        let trials = vec![stroop(Color::Red, Color::Green, 640, true)];
        assert_eq!(interference_score_ms(&trials), 640);
        assert_eq!(interference_score_ms(&[]), 0);
    }

    #[test]
    fn best_direction_per_game() {
        assert!(is_new_best(GameId::Arithmetic, 6.0, Some(5.0)));
        assert!(!is_new_best(GameId::Arithmetic, 5.0, Some(5.0)));
        assert!(!is_new_best(GameId::SequenceRecall, 0.0, None));
        assert!(is_new_best(GameId::SequenceRecall, 1.0, None));
        assert!(is_new_best(GameId::SlidingPuzzle, 30.0, None));
        assert!(is_new_best(GameId::SlidingPuzzle, 30.0, Some(31.0)));
        assert!(!is_new_best(GameId::ReactionTime, 300.0, Some(250.0)));
    }

    #[test]
    fn latency_sums() {
        let mut a = Trial::present((), 1_u8, Millis(0));
        a.record(1, Millis(300));
        let mut b = Trial::present((), 2_u8, Millis(1_000));
        b.record(9, Millis(1_250));
        let trials = vec![a, b];
        assert_eq!(correct_latency_ms(&trials), 300);
        assert_eq!(answered_latency_ms(&trials), 550);
        assert_eq!(correct_count(&trials), 1);
        assert_eq!(sequence_score(5), 4);
    }
}
