//! Digit-span recall session.
//!
//! ```text
//! initial ─start─▶ memorize ─EndMemorize─▶ input ─correct─▶ success ─NextRound─▶ memorize
//!                                            │                 (at the ceiling: finished)
//!                                            └─wrong─▶ finished
//! ```
//!
//! The score is the length being attempted when the player fails, or the
//! ceiling when every length up to it was cleared.

use rand::Rng;

use crate::config::schema::{DigitSpanConfig, GamesConfig};
use crate::contract::{DigitSpanMetrics, GameMetrics};
use crate::error::GeneratorError;
use crate::game::GameId;
use crate::generator::{DigitStringGenerator, StimulusGenerator};
use crate::scoring;

use super::{Effect, FiredTimer, GameMachine, Millis, Response, SessionHeader, Step, TimerKind, Trial};

/// Events accepted by [`DigitSpanSession`].
#[derive(Debug, Clone)]
pub enum DigitSpanEvent {
    /// Start or play again.
    Start {
        /// Event time.
        at: Millis,
        /// Longest known number.
        known_best: Option<f64>,
    },
    /// A timer expired.
    Timer(FiredTimer),
    /// The player submitted an answer.
    Submit {
        /// What was typed; surrounding whitespace is ignored.
        answer: String,
        /// Event time.
        at: Millis,
    },
    /// Leave the game.
    Teardown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Initial,
    Memorize,
    Input { presented_at: Millis },
    Success,
    Finished,
}

/// One digit-span play-through.
#[derive(Debug, Clone)]
pub struct DigitSpanSession {
    header: SessionHeader,
    state: State,
    config: DigitSpanConfig,
    length: usize,
    number: String,
    trials: Vec<Trial<usize, String>>,
    score: usize,
}

impl DigitSpanSession {
    /// The number shown in the current round.
    #[must_use]
    pub fn number(&self) -> &str {
        &self.number
    }

    /// Length of the current round.
    #[must_use]
    pub const fn length(&self) -> usize {
        self.length
    }

    /// Final score once finished.
    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Rounds answered so far.
    #[must_use]
    pub fn trials(&self) -> &[Trial<usize, String>] {
        &self.trials
    }

    fn memorize<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Effect {
        self.number = DigitStringGenerator::new(self.length)
            .map(|g| g.generate(rng))
            .unwrap_or_default();
        self.state = State::Memorize;
        let digits = u32::try_from(self.length).unwrap_or(u32::MAX);
        self.header.schedule(
            TimerKind::EndMemorize,
            self.config.memorize_per_digit.saturating_mul(digits),
        )
    }

    fn finish(&mut self, score: usize, at: Millis) {
        self.score = score;
        self.header.finished_at = Some(at);
        #[allow(clippy::cast_precision_loss)]
        let value = score as f64;
        self.header.new_best = scoring::is_new_best(Self::GAME, value, self.header.known_best);
        self.state = State::Finished;
    }
}

impl GameMachine for DigitSpanSession {
    type Event = DigitSpanEvent;

    const GAME: GameId = GameId::DigitSpan;

    fn from_config(config: &GamesConfig) -> Result<Self, GeneratorError> {
        let ds = &config.digit_span;
        DigitStringGenerator::new(ds.initial_length)?;
        if ds.max_length < ds.initial_length {
            return Err(GeneratorError::InvalidParameters(format!(
                "max_length {} is below initial_length {}",
                ds.max_length, ds.initial_length
            )));
        }
        if ds.length_increment == 0 {
            return Err(GeneratorError::InvalidParameters(
                "length_increment must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            header: SessionHeader::new(),
            state: State::Initial,
            config: ds.clone(),
            length: ds.initial_length,
            number: String::new(),
            trials: Vec::new(),
            score: 0,
        })
    }

    fn header(&self) -> &SessionHeader {
        &self.header
    }

    fn phase(&self) -> &'static str {
        match self.state {
            State::Initial => "initial",
            State::Memorize => "memorize",
            State::Input { .. } => "input",
            State::Success => "success",
            State::Finished => "finished",
        }
    }

    fn is_finished(&self) -> bool {
        self.state == State::Finished
    }

    fn apply<R: Rng + ?Sized>(mut self, event: DigitSpanEvent, rng: &mut R) -> Step<Self> {
        match event {
            DigitSpanEvent::Start { at, known_best } => {
                if !matches!(self.state, State::Initial | State::Finished) {
                    return Step::ignored(self);
                }
                self.header.restart(at, known_best);
                self.trials.clear();
                self.score = 0;
                self.length = self.config.initial_length;
                let timer = self.memorize(rng);
                Step::accepted(self, vec![Effect::CancelTimers, timer])
            }
            DigitSpanEvent::Timer(fired) if self.header.owns(&fired) => {
                match (fired.kind, &self.state) {
                    (TimerKind::EndMemorize, State::Memorize) => {
                        self.state = State::Input {
                            presented_at: fired.at,
                        };
                        Step::accepted(self, Vec::new())
                    }
                    (TimerKind::NextRound, State::Success) => {
                        self.length =
                            (self.length + self.config.length_increment).min(self.config.max_length);
                        let timer = self.memorize(rng);
                        Step::accepted(self, vec![timer])
                    }
                    _ => Step::ignored(self),
                }
            }
            DigitSpanEvent::Submit { answer, at } => {
                let State::Input { presented_at } = self.state else {
                    return Step::ignored(self);
                };
                let mut trial = Trial::present(self.length, self.number.clone(), presented_at);
                let correct = trial.record(answer.trim().to_string(), at);
                self.trials.push(trial);
                if !correct {
                    self.finish(self.length, at);
                    return Step::accepted(self, Vec::new());
                }
                if self.length >= self.config.max_length {
                    self.finish(self.config.max_length, at);
                    return Step::accepted(self, Vec::new());
                }
                self.state = State::Success;
                let pause = self
                    .header
                    .schedule(TimerKind::NextRound, self.config.success_pause);
                Step::accepted(self, vec![pause])
            }
            DigitSpanEvent::Teardown => {
                self.header.reset();
                self.trials.clear();
                self.score = 0;
                self.length = self.config.initial_length;
                self.number.clear();
                self.state = State::Initial;
                Step::accepted(self, vec![Effect::CancelTimers])
            }
            DigitSpanEvent::Timer(_) => Step::ignored(self),
        }
    }

    fn start_event(at: Millis, known_best: Option<f64>) -> DigitSpanEvent {
        DigitSpanEvent::Start { at, known_best }
    }

    fn timer_event(fired: FiredTimer) -> DigitSpanEvent {
        DigitSpanEvent::Timer(fired)
    }

    fn teardown_event() -> DigitSpanEvent {
        DigitSpanEvent::Teardown
    }

    fn responses(&self) -> Vec<Response> {
        self.trials.iter().filter_map(Trial::response).collect()
    }

    fn metrics(&self) -> Option<GameMetrics> {
        if !self.is_finished() {
            return None;
        }
        Some(GameMetrics::DigitSpan(DigitSpanMetrics {
            max_number_length: u32::try_from(self.score).unwrap_or(u32::MAX),
            total_attempts: u32::try_from(self.trials.len()).unwrap_or(u32::MAX),
            total_reaction_time_ms: scoring::correct_latency_ms(&self.trials),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::ScheduledEvent;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::time::Duration;

    fn timer(effects: &[Effect]) -> ScheduledEvent {
        effects
            .iter()
            .find_map(|e| match e {
                Effect::Schedule(s) => Some(*s),
                Effect::CancelTimers => None,
            })
            .unwrap()
    }

    fn config(max_length: usize) -> GamesConfig {
        let mut config = GamesConfig::default();
        config.digit_span.max_length = max_length;
        config
    }

    /// Clears `rounds` rounds answering each after 400ms and returns the
    /// session waiting for input on the next one.
    fn clear_rounds(config: &GamesConfig, rounds: usize) -> (DigitSpanSession, StdRng, u64) {
        let mut rng = StdRng::seed_from_u64(17);
        let mut now = 0;
        let session = DigitSpanSession::from_config(config).unwrap();
        let mut step = session.apply(DigitSpanEvent::Start { at: Millis(now), known_best: None }, &mut rng);
        for round in 0..=rounds {
            let memorize = timer(&step.effects);
            assert_eq!(memorize.kind, TimerKind::EndMemorize);
            now += 30_000;
            step = step.session.apply(DigitSpanEvent::Timer(memorize.fire(Millis(now))), &mut rng);
            assert_eq!(step.session.phase(), "input");
            if round == rounds {
                break;
            }
            now += 400;
            let answer = format!(" {} ", step.session.number());
            step = step.session.apply(DigitSpanEvent::Submit { answer, at: Millis(now) }, &mut rng);
            assert_eq!(step.session.phase(), "success");
            let next = timer(&step.effects);
            now += 1_000;
            step = step.session.apply(DigitSpanEvent::Timer(next.fire(Millis(now))), &mut rng);
        }
        (step.session, rng, now)
    }

    #[test]
    fn memorize_time_per_digit() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut config = GamesConfig::default();
        config.digit_span.initial_length = 4;
        let session = DigitSpanSession::from_config(&config).unwrap();
        let step = session.apply(DigitSpanEvent::Start { at: Millis(0), known_best: None }, &mut rng);
        assert_eq!(timer(&step.effects).delay, Duration::from_secs(4));
        assert_eq!(step.session.number().len(), 4);
    }

    #[test]
    fn failure_scores_attempted_length() {
        let (session, mut rng, now) = clear_rounds(&GamesConfig::default(), 3);
        assert_eq!(session.length(), 4);
        let step = session.apply(
            DigitSpanEvent::Submit { answer: "x".to_string(), at: Millis(now + 900) },
            &mut rng,
        );
        assert!(step.session.is_finished());
        assert_eq!(step.session.score(), 4);
        assert_eq!(
            step.session.metrics(),
            Some(GameMetrics::DigitSpan(DigitSpanMetrics {
                max_number_length: 4,
                total_attempts: 4,
                total_reaction_time_ms: 1_200,
            }))
        );
    }

    #[test]
    fn full_clear_scores_ceiling() {
        let config = config(3);
        let (session, mut rng, now) = clear_rounds(&config, 2);
        let answer = session.number().to_string();
        let step = session.apply(DigitSpanEvent::Submit { answer, at: Millis(now + 400) }, &mut rng);
        assert_eq!(step.session.phase(), "finished");
        assert_eq!(step.session.score(), 3);
        assert!(step.effects.is_empty());
        assert!(step.session.header().new_best);
    }

    #[test]
    fn rejects_bad_progressions() {
        let mut config = GamesConfig::default();
        config.digit_span.length_increment = 0;
        assert!(DigitSpanSession::from_config(&config).is_err());
        let mut config = GamesConfig::default();
        config.digit_span.initial_length = 30;
        assert!(DigitSpanSession::from_config(&config).is_err());
    }

    #[test]
    fn submit_during_memorize_is_ignored() {
        let mut rng = StdRng::seed_from_u64(0);
        let session = DigitSpanSession::from_config(&GamesConfig::default()).unwrap();
        let step = session.apply(DigitSpanEvent::Start { at: Millis(0), known_best: None }, &mut rng);
        let step = step.session.apply(
            DigitSpanEvent::Submit { answer: "1".to_string(), at: Millis(10) },
            &mut rng,
        );
        assert!(!step.accepted);
        assert_eq!(step.session.phase(), "memorize");
    }
}
