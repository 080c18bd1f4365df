//! `generate` command: draw one stimulus.

use std::fmt::Write as _;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::cli::args::{GenerateArgs, OutputFormat};
use crate::config::GamesConfig;
use crate::error::GamesError;
use crate::generator::{Stimulus, create_stimulus};

/// Draws one stimulus for `args.game` and prints it.
///
/// # Errors
///
/// Returns a generator error if the configured parameters are unusable, or
/// a JSON error if serialization fails.
pub fn run(args: &GenerateArgs, config: &GamesConfig) -> Result<(), GamesError> {
    let mut rng = args
        .seed
        .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
    let stimulus = create_stimulus(args.game, config, &mut rng)?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stimulus)?),
        OutputFormat::Human => print!("{}", render(&stimulus)),
    }
    Ok(())
}

/// Human-readable rendering of a stimulus.
#[must_use]
pub fn render(stimulus: &Stimulus) -> String {
    let mut out = String::new();
    match stimulus {
        Stimulus::ReactionTime { delay_ms } => {
            let _ = writeln!(out, "go signal after {delay_ms} ms");
        }
        Stimulus::MemoryGame { sequence } => {
            let words: Vec<&str> = sequence.iter().map(|c| c.word()).collect();
            let _ = writeln!(out, "sequence: {}", words.join(" "));
        }
        Stimulus::LongestNumber { number } => {
            let _ = writeln!(out, "number: {number}");
        }
        Stimulus::NumpuzGame { board } => {
            let _ = write!(out, "{board}");
        }
        Stimulus::StroopGame { trials } => {
            for (i, trial) in trials.iter().enumerate() {
                let kind = if trial.is_congruent() {
                    "congruent"
                } else {
                    "incongruent"
                };
                let _ = writeln!(
                    out,
                    "{:>3}. {:<6} in {:<6} ({kind})",
                    i + 1,
                    trial.word.word(),
                    trial.ink.word()
                );
            }
        }
        Stimulus::AdditionsGame { problem } => {
            let _ = writeln!(out, "level {}: {} = ?", problem.level, problem.prompt());
        }
    }
    out
}
