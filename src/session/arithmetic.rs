//! Arithmetic fluency session.
//!
//! ```text
//! initial ─start─▶ playing ─miss or ceiling─▶ submitting ─Settled─▶ finished
//! ```
//!
//! The tier is chosen from the number of questions answered: with five
//! questions per tier, questions 1-5 come from the first tier, 6-10 from
//! the second, and so on. Clearing every tier ends the session.
//!
//! `submitting` holds the final result until the store has accepted it;
//! the result is already fixed there, so it counts as finished.

use rand::Rng;

use crate::config::schema::GamesConfig;
use crate::contract::{ArithmeticMetrics, GameMetrics};
use crate::error::GeneratorError;
use crate::game::GameId;
use crate::generator::{ArithmeticGenerator, ArithmeticProblem, StimulusGenerator};
use crate::scoring;

use super::{Effect, FiredTimer, GameMachine, Millis, Response, SessionHeader, Step, Trial};

/// Events accepted by [`ArithmeticSession`].
#[derive(Debug, Clone)]
pub enum ArithmeticEvent {
    /// Start or play again.
    Start {
        /// Event time.
        at: Millis,
        /// Best known correct count.
        known_best: Option<f64>,
    },
    /// A timer expired. None are armed, so this is always ignored.
    Timer(FiredTimer),
    /// The player submitted an answer.
    Answer {
        /// What was typed; anything that is not a whole number is wrong.
        input: String,
        /// Event time.
        at: Millis,
    },
    /// The result has been stored.
    Settled,
    /// Leave the game.
    Teardown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Initial,
    Playing,
    Submitting,
    Finished,
}

/// One arithmetic play-through.
#[derive(Debug, Clone)]
pub struct ArithmeticSession {
    header: SessionHeader,
    state: State,
    tiers: Vec<ArithmeticGenerator>,
    per_tier: usize,
    trials: Vec<Trial<ArithmeticProblem, Option<u64>>>,
}

impl ArithmeticSession {
    /// The question waiting for an answer, if playing.
    #[must_use]
    pub fn current(&self) -> Option<&ArithmeticProblem> {
        if self.state == State::Playing {
            self.trials.last().map(|t| &t.content)
        } else {
            None
        }
    }

    /// Questions asked so far.
    #[must_use]
    pub fn trials(&self) -> &[Trial<ArithmeticProblem, Option<u64>>] {
        &self.trials
    }

    /// Correct answers so far.
    #[must_use]
    pub fn correct(&self) -> usize {
        scoring::correct_count(&self.trials)
    }

    /// Tier serving question number `asked` (zero-based).
    fn tier_for(&self, asked: usize) -> Option<&ArithmeticGenerator> {
        self.tiers.get(asked / self.per_tier)
    }

    fn ask<R: Rng + ?Sized>(&mut self, at: Millis, rng: &mut R) -> bool {
        let Some(generator) = self.tier_for(self.trials.len()) else {
            return false;
        };
        let problem = generator.generate(rng);
        let answer = Some(problem.answer);
        self.trials.push(Trial::present(problem, answer, at));
        true
    }

    fn level(&self) -> u32 {
        self.trials
            .last()
            .map_or_else(|| self.tiers.first().map_or(0, |g| g.tier().level), |t| t.content.level)
    }
}

impl GameMachine for ArithmeticSession {
    type Event = ArithmeticEvent;

    const GAME: GameId = GameId::Arithmetic;

    fn from_config(config: &GamesConfig) -> Result<Self, GeneratorError> {
        let section = &config.arithmetic;
        if section.tiers.is_empty() {
            return Err(GeneratorError::InvalidParameters(
                "at least one arithmetic tier is required".to_string(),
            ));
        }
        if section.questions_per_tier == 0 {
            return Err(GeneratorError::InvalidParameters(
                "questions_per_tier must be at least 1".to_string(),
            ));
        }
        let tiers = section
            .tiers
            .iter()
            .copied()
            .map(ArithmeticGenerator::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            header: SessionHeader::new(),
            state: State::Initial,
            tiers,
            per_tier: section.questions_per_tier,
            trials: Vec::new(),
        })
    }

    fn header(&self) -> &SessionHeader {
        &self.header
    }

    fn phase(&self) -> &'static str {
        match self.state {
            State::Initial => "initial",
            State::Playing => "playing",
            State::Submitting => "submitting",
            State::Finished => "finished",
        }
    }

    fn is_finished(&self) -> bool {
        matches!(self.state, State::Submitting | State::Finished)
    }

    fn apply<R: Rng + ?Sized>(mut self, event: ArithmeticEvent, rng: &mut R) -> Step<Self> {
        match (event, self.state) {
            (
                ArithmeticEvent::Start { at, known_best },
                State::Initial | State::Submitting | State::Finished,
            ) => {
                self.header.restart(at, known_best);
                self.trials.clear();
                self.ask(at, rng);
                self.state = State::Playing;
                Step::accepted(self, vec![Effect::CancelTimers])
            }
            (ArithmeticEvent::Answer { input, at }, State::Playing) => {
                let Some(trial) = self.trials.last_mut() else {
                    return Step::ignored(self);
                };
                let given = input.trim().parse::<u64>().ok();
                let correct = match given {
                    Some(_) => trial.record(given, at),
                    None => {
                        trial.record_unreadable(at);
                        false
                    }
                };
                if !correct || !self.ask(at, rng) {
                    self.header.finished_at = Some(at);
                    #[allow(clippy::cast_precision_loss)]
                    let score = self.correct() as f64;
                    self.header.new_best =
                        scoring::is_new_best(Self::GAME, score, self.header.known_best);
                    self.state = State::Submitting;
                }
                Step::accepted(self, Vec::new())
            }
            (ArithmeticEvent::Settled, State::Submitting) => {
                self.state = State::Finished;
                Step::accepted(self, Vec::new())
            }
            (ArithmeticEvent::Teardown, _) => {
                self.header.reset();
                self.trials.clear();
                self.state = State::Initial;
                Step::accepted(self, vec![Effect::CancelTimers])
            }
            _ => Step::ignored(self),
        }
    }

    fn start_event(at: Millis, known_best: Option<f64>) -> ArithmeticEvent {
        ArithmeticEvent::Start { at, known_best }
    }

    fn timer_event(fired: FiredTimer) -> ArithmeticEvent {
        ArithmeticEvent::Timer(fired)
    }

    fn teardown_event() -> ArithmeticEvent {
        ArithmeticEvent::Teardown
    }

    fn settled_event() -> Option<ArithmeticEvent> {
        Some(ArithmeticEvent::Settled)
    }

    fn responses(&self) -> Vec<Response> {
        self.trials.iter().filter_map(Trial::response).collect()
    }

    fn metrics(&self) -> Option<GameMetrics> {
        if !self.is_finished() {
            return None;
        }
        Some(GameMetrics::Arithmetic(ArithmeticMetrics {
            total_correct: u32::try_from(self.correct()).unwrap_or(u32::MAX),
            time_taken_s: scoring::seconds_2dp(scoring::answered_latency_ms(&self.trials)),
            difficulty_level: self.level(),
        }))
    }
}
