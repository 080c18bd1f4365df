//! Metrics recorded through the `metrics` facade.
//!
//! The library installs no recorder; the macros are no-ops until the
//! embedding application installs one. Label values come from closed sets
//! ([`GameId`] labels, fixed outcome strings) so cardinality stays bounded.

use std::sync::atomic::{AtomicBool, Ordering};

use metrics::{counter, describe_counter, describe_histogram, histogram};

use crate::game::GameId;

static DESCRIBED: AtomicBool = AtomicBool::new(false);

/// Registers metric descriptions with whatever recorder is installed.
///
/// Only the first call has an effect.
pub fn describe_metrics() {
    if DESCRIBED.swap(true, Ordering::SeqCst) {
        return;
    }
    describe_counter!(
        "soulcare_sessions_started_total",
        "Play-throughs started, by game"
    );
    describe_counter!(
        "soulcare_sessions_finished_total",
        "Play-throughs that reached a result, by game"
    );
    describe_counter!(
        "soulcare_trials_total",
        "Scored trials, by game and correctness"
    );
    describe_histogram!(
        "soulcare_trial_latency_ms",
        "Response latency of scored trials in milliseconds"
    );
    describe_counter!(
        "soulcare_submissions_total",
        "Result submissions, by game and outcome"
    );
    describe_counter!(
        "soulcare_stats_fetch_failures_total",
        "Failed statistics refreshes, by game"
    );
}

/// Records a started play-through.
pub fn record_session_started(game: GameId) {
    counter!("soulcare_sessions_started_total", "game" => game.label()).increment(1);
}

/// Records a play-through reaching its result.
pub fn record_session_finished(game: GameId) {
    counter!("soulcare_sessions_finished_total", "game" => game.label()).increment(1);
}

/// Records one scored trial.
#[allow(clippy::cast_precision_loss)]
pub fn record_trial(game: GameId, correct: bool, latency_ms: u64) {
    let outcome = if correct { "correct" } else { "incorrect" };
    counter!("soulcare_trials_total", "game" => game.label(), "outcome" => outcome).increment(1);
    histogram!("soulcare_trial_latency_ms", "game" => game.label()).record(latency_ms as f64);
}

/// Records a submission attempt.
pub fn record_submission(game: GameId, ok: bool) {
    let outcome = if ok { "ok" } else { "failed" };
    counter!("soulcare_submissions_total", "game" => game.label(), "outcome" => outcome)
        .increment(1);
}

/// Records a failed statistics refresh.
pub fn record_stats_fetch_failure(game: GameId) {
    counter!("soulcare_stats_fetch_failures_total", "game" => game.label()).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_functions_do_not_panic_without_recorder() {
        describe_metrics();
        describe_metrics();
        for game in GameId::ALL {
            record_session_started(game);
            record_trial(game, true, 420);
            record_trial(game, false, 1_200);
            record_session_finished(game);
            record_submission(game, true);
            record_submission(game, false);
            record_stats_fetch_failure(game);
        }
    }
}
