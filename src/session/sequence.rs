//! Sequential colour recall session.
//!
//! ```text
//! initial ─start─▶ showing_sequence ─ShowInput─▶ user_input
//!                        ▲                          │
//!                        └──NextRound── round_cleared ◀─ all correct
//!                                                   │
//!                        wrong colour ──▶ win_congrats ─DismissCongrats─▶ finished
//!                                     └─▶ finished            (no new best)
//! ```
//!
//! The result is fixed as soon as the player misses, so `win_congrats`
//! already counts as finished for submission purposes.

use rand::Rng;

use crate::config::schema::{GamesConfig, SequenceRecallConfig};
use crate::contract::{GameMetrics, SequenceMetrics};
use crate::error::GeneratorError;
use crate::game::GameId;
use crate::generator::{Color, SequenceGenerator};
use crate::scoring;

use super::{Effect, FiredTimer, GameMachine, Millis, Response, SessionHeader, Step, TimerKind, Trial};

/// Events accepted by [`SequenceSession`].
#[derive(Debug, Clone)]
pub enum SequenceEvent {
    /// Start or play again.
    Start {
        /// Event time.
        at: Millis,
        /// Longest known sequence.
        known_best: Option<f64>,
    },
    /// A timer expired.
    Timer(FiredTimer),
    /// The player pressed a colour.
    Press {
        /// Colour pressed.
        color: Color,
        /// Event time.
        at: Millis,
    },
    /// The result has been stored; takes down the new-best banner.
    Settled,
    /// Leave the game.
    Teardown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Initial,
    ShowingSequence,
    UserInput { entered: Vec<Color>, presented_at: Millis },
    RoundCleared,
    WinCongrats,
    Finished,
}

/// One sequential-recall play-through.
#[derive(Debug, Clone)]
pub struct SequenceSession {
    header: SessionHeader,
    state: State,
    timing: SequenceRecallConfig,
    sequence: Vec<Color>,
    rounds: Vec<Trial<Vec<Color>, Vec<Color>>>,
    score: usize,
}

impl SequenceSession {
    /// The sequence currently in play.
    #[must_use]
    pub fn sequence(&self) -> &[Color] {
        &self.sequence
    }

    /// Rounds played, one trial each.
    #[must_use]
    pub fn rounds(&self) -> &[Trial<Vec<Color>, Vec<Color>>] {
        &self.rounds
    }

    /// Longest sequence repeated correctly so far.
    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    fn show_sequence(&mut self) -> Effect {
        let flashes = u32::try_from(self.sequence.len()).unwrap_or(u32::MAX);
        let delay = self.timing.flash_interval.saturating_mul(flashes) + self.timing.flash_tail;
        self.state = State::ShowingSequence;
        self.header.schedule(TimerKind::ShowInput, delay)
    }

    fn finish(&mut self, at: Millis) -> Vec<Effect> {
        self.score = scoring::sequence_score(self.sequence.len());
        self.header.finished_at = Some(at);
        #[allow(clippy::cast_precision_loss)]
        let score = self.score as f64;
        self.header.new_best = scoring::is_new_best(Self::GAME, score, self.header.known_best);
        if self.header.new_best {
            self.state = State::WinCongrats;
            vec![
                self.header
                    .schedule(TimerKind::DismissCongrats, self.timing.congrats_duration),
            ]
        } else {
            self.state = State::Finished;
            Vec::new()
        }
    }
}

impl GameMachine for SequenceSession {
    type Event = SequenceEvent;

    const GAME: GameId = GameId::SequenceRecall;

    fn from_config(config: &GamesConfig) -> Result<Self, GeneratorError> {
        Ok(Self {
            header: SessionHeader::new(),
            state: State::Initial,
            timing: config.sequence_recall.clone(),
            sequence: Vec::new(),
            rounds: Vec::new(),
            score: 0,
        })
    }

    fn header(&self) -> &SessionHeader {
        &self.header
    }

    fn phase(&self) -> &'static str {
        match self.state {
            State::Initial => "initial",
            State::ShowingSequence => "showing_sequence",
            State::UserInput { .. } => "user_input",
            State::RoundCleared => "round_cleared",
            State::WinCongrats => "win_congrats",
            State::Finished => "finished",
        }
    }

    fn is_finished(&self) -> bool {
        matches!(self.state, State::WinCongrats | State::Finished)
    }

    fn apply<R: Rng + ?Sized>(mut self, event: SequenceEvent, rng: &mut R) -> Step<Self> {
        match event {
            SequenceEvent::Start { at, known_best } => {
                if !matches!(
                    self.state,
                    State::Initial | State::WinCongrats | State::Finished
                ) {
                    return Step::ignored(self);
                }
                self.header.restart(at, known_best);
                self.sequence.clear();
                self.rounds.clear();
                self.score = 0;
                SequenceGenerator.extend(&mut self.sequence, rng);
                let show = self.show_sequence();
                Step::accepted(self, vec![Effect::CancelTimers, show])
            }
            SequenceEvent::Timer(fired) if self.header.owns(&fired) => {
                match (fired.kind, &self.state) {
                    (TimerKind::ShowInput, State::ShowingSequence) => {
                        self.state = State::UserInput {
                            entered: Vec::new(),
                            presented_at: fired.at,
                        };
                        Step::accepted(self, Vec::new())
                    }
                    (TimerKind::NextRound, State::RoundCleared) => {
                        SequenceGenerator.extend(&mut self.sequence, rng);
                        let show = self.show_sequence();
                        Step::accepted(self, vec![show])
                    }
                    (TimerKind::DismissCongrats, State::WinCongrats) => {
                        self.state = State::Finished;
                        Step::accepted(self, Vec::new())
                    }
                    _ => Step::ignored(self),
                }
            }
            SequenceEvent::Press { color, at } => {
                let State::UserInput {
                    entered,
                    presented_at,
                } = &mut self.state
                else {
                    return Step::ignored(self);
                };
                entered.push(color);
                let position = entered.len() - 1;
                let wrong = self.sequence.get(position) != Some(&color);
                if !wrong && entered.len() < self.sequence.len() {
                    return Step::accepted(self, Vec::new());
                }
                let mut trial = Trial::present(self.sequence.clone(), self.sequence.clone(), *presented_at);
                trial.record(std::mem::take(entered), at);
                self.rounds.push(trial);
                if wrong {
                    let effects = self.finish(at);
                    Step::accepted(self, effects)
                } else {
                    self.score = self.sequence.len();
                    self.state = State::RoundCleared;
                    let pause = self.header.schedule(TimerKind::NextRound, self.timing.round_pause);
                    Step::accepted(self, vec![pause])
                }
            }
            SequenceEvent::Teardown => {
                self.header.reset();
                self.sequence.clear();
                self.rounds.clear();
                self.score = 0;
                self.state = State::Initial;
                Step::accepted(self, vec![Effect::CancelTimers])
            }
            SequenceEvent::Settled if self.state == State::WinCongrats => {
                self.state = State::Finished;
                Step::accepted(self, Vec::new())
            }
            SequenceEvent::Timer(_) | SequenceEvent::Settled => Step::ignored(self),
        }
    }

    fn start_event(at: Millis, known_best: Option<f64>) -> SequenceEvent {
        SequenceEvent::Start { at, known_best }
    }

    fn timer_event(fired: FiredTimer) -> SequenceEvent {
        SequenceEvent::Timer(fired)
    }

    fn teardown_event() -> SequenceEvent {
        SequenceEvent::Teardown
    }

    fn settled_event() -> Option<SequenceEvent> {
        Some(SequenceEvent::Settled)
    }

    fn responses(&self) -> Vec<Response> {
        self.rounds.iter().filter_map(Trial::response).collect()
    }

    fn metrics(&self) -> Option<GameMetrics> {
        if !self.is_finished() {
            return None;
        }
        Some(GameMetrics::SequenceRecall(SequenceMetrics {
            max_sequence_length: u32::try_from(self.score).unwrap_or(u32::MAX),
            total_attempts: u32::try_from(self.rounds.len()).unwrap_or(u32::MAX),
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

    fn wrong(color: Color) -> Color {
        if color == Color::Red { Color::Blue } else { Color::Red }
    }

    /// Drives a session through `rounds` cleared rounds and returns it in
    /// `user_input` for round `rounds + 1`.
    fn play_rounds(rounds: usize, known_best: Option<f64>) -> (SequenceSession, StdRng) {
        let mut rng = StdRng::seed_from_u64(21);
        let mut now = 0;
        let session = SequenceSession::from_config(&GamesConfig::default()).unwrap();
        let mut step = session.apply(SequenceEvent::Start { at: Millis(now), known_best }, &mut rng);
        for round in 0..=rounds {
            let show = timer(&step.effects);
            assert_eq!(show.kind, TimerKind::ShowInput);
            now += 10_000;
            step = step.session.apply(SequenceEvent::Timer(show.fire(Millis(now))), &mut rng);
            assert_eq!(step.session.phase(), "user_input");
            if round == rounds {
                break;
            }
            for color in step.session.sequence().to_vec() {
                now += 100;
                step = step.session.apply(SequenceEvent::Press { color, at: Millis(now) }, &mut rng);
            }
            assert_eq!(step.session.phase(), "round_cleared");
            let pause = timer(&step.effects);
            assert_eq!(pause.kind, TimerKind::NextRound);
            step = step.session.apply(SequenceEvent::Timer(pause.fire(Millis(now + 500))), &mut rng);
            assert_eq!(step.session.phase(), "showing_sequence");
        }
        (step.session, rng)
    }

    #[test]
    fn flash_duration_scales_with_length() {
        let mut rng = StdRng::seed_from_u64(1);
        let session = SequenceSession::from_config(&GamesConfig::default()).unwrap();
        let step = session.apply(SequenceEvent::Start { at: Millis(0), known_best: None }, &mut rng);
        assert_eq!(timer(&step.effects).delay, Duration::from_millis(1_200));
    }

    #[test]
    fn miss_after_l_rounds_scores_l() {
        let (session, mut rng) = play_rounds(4, Some(10.0));
        let first = session.sequence()[0];
        let step = session.apply(SequenceEvent::Press { color: wrong(first), at: Millis(99_000) }, &mut rng);
        assert_eq!(step.session.phase(), "finished");
        assert_eq!(step.session.score(), 4);
        assert_eq!(
            step.session.metrics(),
            Some(GameMetrics::SequenceRecall(SequenceMetrics {
                max_sequence_length: 4,
                total_attempts: 5
            }))
        );
    }

    #[test]
    fn new_best_goes_through_congrats() {
        let (session, mut rng) = play_rounds(2, Some(1.0));
        let first = session.sequence()[0];
        let step = session.apply(SequenceEvent::Press { color: wrong(first), at: Millis(50_000) }, &mut rng);
        assert_eq!(step.session.phase(), "win_congrats");
        assert!(step.session.is_finished());
        let dismiss = timer(&step.effects);
        assert_eq!(dismiss.kind, TimerKind::DismissCongrats);
        assert_eq!(dismiss.delay, Duration::from_secs(3));
        let step = step.session.apply(SequenceEvent::Timer(dismiss.fire(Millis(53_000))), &mut rng);
        assert_eq!(step.session.phase(), "finished");
    }

    #[test]
    fn settling_dismisses_congrats() {
        let (session, mut rng) = play_rounds(2, None);
        let first = session.sequence()[0];
        let step = session.apply(SequenceEvent::Press { color: wrong(first), at: Millis(50_000) }, &mut rng);
        assert_eq!(step.session.phase(), "win_congrats");
        let step = step.session.apply(SequenceEvent::Settled, &mut rng);
        assert!(step.accepted);
        assert_eq!(step.session.phase(), "finished");
        let step = step.session.apply(SequenceEvent::Settled, &mut rng);
        assert!(!step.accepted);
    }

    #[test]
    fn presses_outside_input_are_ignored() {
        let mut rng = StdRng::seed_from_u64(3);
        let session = SequenceSession::from_config(&GamesConfig::default()).unwrap();
        let step = session.apply(SequenceEvent::Start { at: Millis(0), known_best: None }, &mut rng);
        let step = step.session.apply(SequenceEvent::Press { color: Color::Red, at: Millis(5) }, &mut rng);
        assert!(!step.accepted);
        assert_eq!(step.session.phase(), "showing_sequence");
    }

    #[test]
    fn restart_mid_game_is_ignored_but_teardown_is_not() {
        let (session, mut rng) = play_rounds(1, None);
        let step = session.apply(SequenceEvent::Start { at: Millis(0), known_best: None }, &mut rng);
        assert!(!step.accepted);
        let step = step.session.apply(SequenceEvent::Teardown, &mut rng);
        assert!(step.accepted);
        assert_eq!(step.session.phase(), "initial");
        assert!(step.session.sequence().is_empty());
    }
}
