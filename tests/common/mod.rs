//! Shared integration-test helpers for running the `soulcare-games` binary.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output};

/// Runs the binary with `args` and waits for it to exit.
#[allow(clippy::missing_panics_doc)]
pub fn run_command(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_soulcare-games"))
        .args(args)
        .env_remove("SOULCARE_GAMES_CONFIG")
        .env_remove("SOULCARE_GAMES_LOG_LEVEL")
        .output()
        .expect("failed to run soulcare-games")
}

/// Path to a file under `tests/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Stdout as text.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Stderr as text.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
