//! Reaction-time session.
//!
//! ```text
//! initial ──start──▶ waiting ──RevealGo──▶ ready ──press──▶ finished
//!                       │
//!                       └──press──▶ too_early
//! ```

use std::time::Duration;

use rand::Rng;

use crate::config::schema::GamesConfig;
use crate::contract::{GameMetrics, ReactionMetrics};
use crate::error::GeneratorError;
use crate::game::GameId;
use crate::generator::{ReactionDelayGenerator, StimulusGenerator};
use crate::scoring;

use super::{Effect, FiredTimer, GameMachine, Millis, Response, SessionHeader, Step, TimerKind, Trial};

/// Events accepted by [`ReactionSession`].
#[derive(Debug, Clone)]
pub enum ReactionEvent {
    /// Start or play again.
    Start {
        /// Event time.
        at: Millis,
        /// Fastest known reaction in ms.
        known_best: Option<f64>,
    },
    /// A timer expired.
    Timer(FiredTimer),
    /// The player pressed.
    Press {
        /// Event time.
        at: Millis,
    },
    /// Leave the game.
    Teardown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Initial,
    Waiting,
    Ready,
    TooEarly,
    Finished { reaction_ms: u64 },
}

/// One reaction-time play-through.
#[derive(Debug, Clone)]
pub struct ReactionSession {
    header: SessionHeader,
    state: State,
    delays: ReactionDelayGenerator,
    trial: Option<Trial<Duration, ()>>,
}

impl ReactionSession {
    /// The scored trial once the player pressed after "go".
    #[must_use]
    pub const fn trial(&self) -> Option<&Trial<Duration, ()>> {
        self.trial.as_ref()
    }

    /// Latency of the finished session.
    #[must_use]
    pub const fn reaction_ms(&self) -> Option<u64> {
        match self.state {
            State::Finished { reaction_ms } => Some(reaction_ms),
            _ => None,
        }
    }
}

impl GameMachine for ReactionSession {
    type Event = ReactionEvent;

    const GAME: GameId = GameId::ReactionTime;

    fn from_config(config: &GamesConfig) -> Result<Self, GeneratorError> {
        Ok(Self {
            header: SessionHeader::new(),
            state: State::Initial,
            delays: ReactionDelayGenerator::new(&config.reaction_time)?,
            trial: None,
        })
    }

    fn header(&self) -> &SessionHeader {
        &self.header
    }

    fn phase(&self) -> &'static str {
        match self.state {
            State::Initial => "initial",
            State::Waiting => "waiting",
            State::Ready => "ready",
            State::TooEarly => "too_early",
            State::Finished { .. } => "finished",
        }
    }

    fn is_finished(&self) -> bool {
        matches!(self.state, State::Finished { .. })
    }

    fn apply<R: Rng + ?Sized>(mut self, event: ReactionEvent, rng: &mut R) -> Step<Self> {
        match (event, &self.state) {
            (
                ReactionEvent::Start { at, known_best },
                State::Initial | State::TooEarly | State::Finished { .. },
            ) => {
                self.header.restart(at, known_best);
                self.trial = None;
                self.state = State::Waiting;
                let delay = self.delays.generate(rng);
                let effects = vec![
                    Effect::CancelTimers,
                    self.header.schedule(TimerKind::RevealGo, delay),
                ];
                Step::accepted(self, effects)
            }
            (ReactionEvent::Timer(fired), State::Waiting)
                if fired.kind == TimerKind::RevealGo && self.header.owns(&fired) =>
            {
                let started = self.header.started_at.unwrap_or(fired.at);
                let delay = Duration::from_millis(fired.at.since(started));
                self.trial = Some(Trial::present(delay, (), fired.at));
                self.state = State::Ready;
                Step::accepted(self, Vec::new())
            }
            (ReactionEvent::Press { .. }, State::Waiting) => {
                self.state = State::TooEarly;
                Step::accepted(self, vec![Effect::CancelTimers])
            }
            (ReactionEvent::Press { at }, State::Ready) => {
                let Some(trial) = self.trial.as_mut() else {
                    return Step::ignored(self);
                };
                trial.record((), at);
                let reaction_ms = trial.latency_ms().unwrap_or(0);
                self.header.finished_at = Some(at);
                #[allow(clippy::cast_precision_loss)]
                let score = reaction_ms as f64;
                self.header.new_best =
                    scoring::is_new_best(Self::GAME, score, self.header.known_best);
                self.state = State::Finished { reaction_ms };
                Step::accepted(self, Vec::new())
            }
            (ReactionEvent::Teardown, _) => {
                self.header.reset();
                self.trial = None;
                self.state = State::Initial;
                Step::accepted(self, vec![Effect::CancelTimers])
            }
            _ => Step::ignored(self),
        }
    }

    fn start_event(at: Millis, known_best: Option<f64>) -> ReactionEvent {
        ReactionEvent::Start { at, known_best }
    }

    fn timer_event(fired: FiredTimer) -> ReactionEvent {
        ReactionEvent::Timer(fired)
    }

    fn teardown_event() -> ReactionEvent {
        ReactionEvent::Teardown
    }

    fn responses(&self) -> Vec<Response> {
        self.trial.iter().filter_map(Trial::response).collect()
    }

    fn metrics(&self) -> Option<GameMetrics> {
        self.reaction_ms()
            .map(|reaction_time_ms| GameMetrics::ReactionTime(ReactionMetrics { reaction_time_ms }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::ScheduledEvent;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn scheduled(effects: &[Effect]) -> ScheduledEvent {
        effects
            .iter()
            .find_map(|e| match e {
                Effect::Schedule(s) => Some(*s),
                Effect::CancelTimers => None,
            })
            .unwrap()
    }

    fn started() -> (ReactionSession, ScheduledEvent, StdRng) {
        let mut rng = StdRng::seed_from_u64(1);
        let session = ReactionSession::from_config(&GamesConfig::default()).unwrap();
        let step = session.apply(ReactionEvent::Start { at: Millis(0), known_best: None }, &mut rng);
        assert!(step.accepted);
        let timer = scheduled(&step.effects);
        (step.session, timer, rng)
    }

    #[test]
    fn full_round() {
        let (session, timer, mut rng) = started();
        assert_eq!(session.phase(), "waiting");
        assert!(timer.delay >= Duration::from_millis(1000));
        assert!(timer.delay < Duration::from_millis(4000));

        let go = Millis(u64::try_from(timer.delay.as_millis()).unwrap());
        let step = session.apply(ReactionEvent::Timer(timer.fire(go)), &mut rng);
        assert_eq!(step.session.phase(), "ready");

        let step = step
            .session
            .apply(ReactionEvent::Press { at: Millis(go.0 + 237) }, &mut rng);
        assert!(step.session.is_finished());
        assert_eq!(step.session.reaction_ms(), Some(237));
        assert!(step.session.header().new_best);
        assert_eq!(
            step.session.metrics(),
            Some(GameMetrics::ReactionTime(ReactionMetrics { reaction_time_ms: 237 }))
        );
    }

    #[test]
    fn press_before_go_is_too_early() {
        let (session, timer, mut rng) = started();
        let step = session.apply(ReactionEvent::Press { at: Millis(500) }, &mut rng);
        assert_eq!(step.session.phase(), "too_early");
        assert_eq!(step.effects, vec![Effect::CancelTimers]);
        assert!(step.session.metrics().is_none());

        // the stale go timer is ignored
        let step = step
            .session
            .apply(ReactionEvent::Timer(timer.fire(Millis(2_000))), &mut rng);
        assert!(!step.accepted);

        // play again
        let step = step
            .session
            .apply(ReactionEvent::Start { at: Millis(3_000), known_best: None }, &mut rng);
        assert!(step.accepted);
        assert_eq!(step.session.phase(), "waiting");
    }

    #[test]
    fn press_in_initial_is_ignored() {
        let session = ReactionSession::from_config(&GamesConfig::default()).unwrap();
        let step = session.apply(
            ReactionEvent::Press { at: Millis(10) },
            &mut StdRng::seed_from_u64(0),
        );
        assert!(!step.accepted);
        assert_eq!(step.session.phase(), "initial");
    }

    #[test]
    fn slower_than_best_is_not_new_best() {
        let mut rng = StdRng::seed_from_u64(2);
        let session = ReactionSession::from_config(&GamesConfig::default()).unwrap();
        let step = session.apply(
            ReactionEvent::Start { at: Millis(0), known_best: Some(200.0) },
            &mut rng,
        );
        let timer = scheduled(&step.effects);
        let step = step.session.apply(ReactionEvent::Timer(timer.fire(Millis(1_500))), &mut rng);
        let step = step.session.apply(ReactionEvent::Press { at: Millis(1_800) }, &mut rng);
        assert_eq!(step.session.reaction_ms(), Some(300));
        assert!(!step.session.header().new_best);
    }

    #[test]
    fn teardown_cancels_and_resets() {
        let (session, timer, mut rng) = started();
        let step = session.apply(ReactionEvent::Teardown, &mut rng);
        assert_eq!(step.effects, vec![Effect::CancelTimers]);
        assert_eq!(step.session.phase(), "initial");
        let step = step
            .session
            .apply(ReactionEvent::Timer(timer.fire(Millis(4_000))), &mut rng);
        assert!(!step.accepted);
    }
}
