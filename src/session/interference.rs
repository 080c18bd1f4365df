//! Colour-word interference session.
//!
//! ```text
//! initial ─start─▶ running ─last trial or first miss─▶ finished
//! ```
//!
//! With `stop_on_first_miss` disabled a miss is only scored as incorrect
//! and the batch runs to the end.

use rand::Rng;

use crate::config::schema::GamesConfig;
use crate::contract::{GameMetrics, InterferenceMetrics};
use crate::error::GeneratorError;
use crate::game::GameId;
use crate::generator::{Color, InterferenceGenerator, InterferenceTrial, StimulusGenerator};
use crate::scoring;

use super::{Effect, FiredTimer, GameMachine, Millis, Response, SessionHeader, Step, Trial};

/// Events accepted by [`InterferenceSession`].
#[derive(Debug, Clone)]
pub enum InterferenceEvent {
    /// Start or play again.
    Start {
        /// Event time.
        at: Millis,
        /// Best known correct count.
        known_best: Option<f64>,
    },
    /// A timer expired. None are armed, so this is always ignored.
    Timer(FiredTimer),
    /// The player named an ink colour.
    Answer {
        /// Colour chosen.
        color: Color,
        /// Event time.
        at: Millis,
    },
    /// Leave the game.
    Teardown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Initial,
    Running,
    Finished,
}

/// One interference-test play-through.
#[derive(Debug, Clone)]
pub struct InterferenceSession {
    header: SessionHeader,
    state: State,
    batches: InterferenceGenerator,
    stop_on_first_miss: bool,
    batch: Vec<InterferenceTrial>,
    trials: Vec<Trial<InterferenceTrial, Color>>,
}

impl InterferenceSession {
    /// The trial waiting for an answer, if running.
    #[must_use]
    pub fn current(&self) -> Option<&InterferenceTrial> {
        if self.state == State::Running {
            self.trials.last().map(|t| &t.content)
        } else {
            None
        }
    }

    /// Trials presented so far, the last one possibly unanswered.
    #[must_use]
    pub fn trials(&self) -> &[Trial<InterferenceTrial, Color>] {
        &self.trials
    }

    fn present_next(&mut self, at: Millis) -> bool {
        match self.batch.get(self.trials.len()) {
            Some(&next) => {
                self.trials.push(Trial::present(next, next.ink, at));
                true
            }
            None => false,
        }
    }

    fn correct(&self) -> u32 {
        u32::try_from(scoring::correct_count(&self.trials)).unwrap_or(u32::MAX)
    }
}

impl GameMachine for InterferenceSession {
    type Event = InterferenceEvent;

    const GAME: GameId = GameId::Interference;

    fn from_config(config: &GamesConfig) -> Result<Self, GeneratorError> {
        Ok(Self {
            header: SessionHeader::new(),
            state: State::Initial,
            batches: InterferenceGenerator::new(config.interference.total_trials)?,
            stop_on_first_miss: config.interference.stop_on_first_miss,
            batch: Vec::new(),
            trials: Vec::new(),
        })
    }

    fn header(&self) -> &SessionHeader {
        &self.header
    }

    fn phase(&self) -> &'static str {
        match self.state {
            State::Initial => "initial",
            State::Running => "running",
            State::Finished => "finished",
        }
    }

    fn is_finished(&self) -> bool {
        self.state == State::Finished
    }

    fn apply<R: Rng + ?Sized>(mut self, event: InterferenceEvent, rng: &mut R) -> Step<Self> {
        match (event, self.state) {
            (InterferenceEvent::Start { at, known_best }, State::Initial | State::Finished) => {
                self.header.restart(at, known_best);
                self.batch = self.batches.generate(rng);
                self.trials.clear();
                self.present_next(at);
                self.state = State::Running;
                Step::accepted(self, vec![Effect::CancelTimers])
            }
            (InterferenceEvent::Answer { color, at }, State::Running) => {
                let Some(trial) = self.trials.last_mut() else {
                    return Step::ignored(self);
                };
                let correct = trial.record(color, at);
                let stop = !correct && self.stop_on_first_miss;
                if stop || !self.present_next(at) {
                    self.header.finished_at = Some(at);
                    self.header.new_best = scoring::is_new_best(
                        Self::GAME,
                        f64::from(self.correct()),
                        self.header.known_best,
                    );
                    self.state = State::Finished;
                }
                Step::accepted(self, Vec::new())
            }
            (InterferenceEvent::Teardown, _) => {
                self.header.reset();
                self.batch.clear();
                self.trials.clear();
                self.state = State::Initial;
                Step::accepted(self, vec![Effect::CancelTimers])
            }
            _ => Step::ignored(self),
        }
    }

    fn start_event(at: Millis, known_best: Option<f64>) -> InterferenceEvent {
        InterferenceEvent::Start { at, known_best }
    }

    fn timer_event(fired: FiredTimer) -> InterferenceEvent {
        InterferenceEvent::Timer(fired)
    }

    fn teardown_event() -> InterferenceEvent {
        InterferenceEvent::Teardown
    }

    fn responses(&self) -> Vec<Response> {
        self.trials.iter().filter_map(Trial::response).collect()
    }

    fn metrics(&self) -> Option<GameMetrics> {
        if !self.is_finished() {
            return None;
        }
        Some(GameMetrics::Interference(InterferenceMetrics {
            total_correct: self.correct(),
            interference_score_ms: scoring::interference_score_ms(&self.trials),
            total_time_s: scoring::seconds_2dp(self.header.elapsed_ms().unwrap_or(0)),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn other(color: Color) -> Color {
        if color == Color::Green { Color::Yellow } else { Color::Green }
    }

    fn start(stop_on_first_miss: bool) -> (InterferenceSession, StdRng) {
        let mut config = GamesConfig::default();
        config.interference.stop_on_first_miss = stop_on_first_miss;
        let mut rng = StdRng::seed_from_u64(31);
        let session = InterferenceSession::from_config(&config).unwrap();
        let step = session.apply(InterferenceEvent::Start { at: Millis(0), known_best: None }, &mut rng);
        (step.session, rng)
    }

    #[test]
    fn perfect_run_finishes_after_batch() {
        let (mut session, mut rng) = start(true);
        let mut now = 0;
        for _ in 0..20 {
            let ink = session.current().unwrap().ink;
            now += 500;
            session = session.apply(InterferenceEvent::Answer { color: ink, at: Millis(now) }, &mut rng).session;
        }
        assert!(session.is_finished());
        let Some(GameMetrics::Interference(m)) = session.metrics() else {
            panic!("expected interference metrics");
        };
        assert_eq!(m.total_correct, 20);
        assert_eq!(m.interference_score_ms, 0);
        assert!((m.total_time_s - 10.0).abs() < 1e-9);
        assert!(session.header().new_best);
    }

    #[test]
    fn first_miss_ends_session() {
        let (session, mut rng) = start(true);
        let ink = session.current().unwrap().ink;
        let step = session.apply(InterferenceEvent::Answer { color: ink, at: Millis(400) }, &mut rng);
        let ink = step.session.current().unwrap().ink;
        let step = step
            .session
            .apply(InterferenceEvent::Answer { color: other(ink), at: Millis(900) }, &mut rng);
        assert!(step.session.is_finished());
        assert_eq!(step.session.trials().len(), 2);
        let Some(GameMetrics::Interference(m)) = step.session.metrics() else {
            panic!("expected interference metrics");
        };
        assert_eq!(m.total_correct, 1);
        assert!((m.total_time_s - 0.9).abs() < 1e-9);
    }

    #[test]
    fn full_batch_mode_keeps_going() {
        let (mut session, mut rng) = start(false);
        for i in 0..20_u64 {
            let ink = session.current().unwrap().ink;
            session = session
                .apply(InterferenceEvent::Answer { color: other(ink), at: Millis(i * 100 + 100) }, &mut rng)
                .session;
        }
        assert!(session.is_finished());
        let Some(GameMetrics::Interference(m)) = session.metrics() else {
            panic!("expected interference metrics");
        };
        assert_eq!(m.total_correct, 0);
        assert!(!session.header().new_best);
    }

    #[test]
    fn answers_after_finish_are_ignored() {
        let (session, mut rng) = start(true);
        let ink = session.current().unwrap().ink;
        let step = session.apply(InterferenceEvent::Answer { color: other(ink), at: Millis(1) }, &mut rng);
        let step = step.session.apply(InterferenceEvent::Answer { color: ink, at: Millis(2) }, &mut rng);
        assert!(!step.accepted);
        assert_eq!(step.session.trials().len(), 1);
    }
}
