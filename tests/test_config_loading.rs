use std::io::Write;
use std::time::Duration;

use soulcare_games::config::{ConfigLimits, ConfigLoader};
use soulcare_games::error::ConfigError;

fn write_config(contents: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(contents).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn loads_partial_file_over_defaults() {
    let file = write_config(b"digit_span:\n  max_length: 12\n  memorize_per_digit: 750ms\n");
    let loaded = ConfigLoader::with_defaults().load(file.path()).unwrap();
    assert!(loaded.warnings.is_empty());
    assert_eq!(loaded.config.digit_span.max_length, 12);
    assert_eq!(
        loaded.config.digit_span.memorize_per_digit,
        Duration::from_millis(750)
    );
    assert_eq!(loaded.config.digit_span.initial_length, 1);
    assert_eq!(loaded.config.sliding_puzzle.size, 3);
}

#[test]
fn byte_order_mark_is_ignored() {
    let file = write_config(b"\xef\xbb\xbfsliding_puzzle:\n  size: 5\n");
    let loaded = ConfigLoader::with_defaults().load(file.path()).unwrap();
    assert_eq!(loaded.config.sliding_puzzle.size, 5);
}

#[test]
fn env_defaults_are_substituted_before_parsing() {
    let file = write_config(
        b"interference:\n  total_trials: ${SOULCARE_TEST_UNSET_TRIALS:-12}\nstore:\n  base_url: \"${SOULCARE_TEST_UNSET_URL:-https://games.example/api/}\"\n",
    );
    let loaded = ConfigLoader::with_defaults().load(file.path()).unwrap();
    assert_eq!(loaded.config.interference.total_trials, 12);
    assert_eq!(loaded.config.store.base_url, "https://games.example/api/");
}

#[test]
fn required_env_var_reports_message() {
    let file = write_config(b"store:\n  token: ${SOULCARE_TEST_UNSET_TOKEN:?api token required}\n");
    let err = ConfigLoader::with_defaults().load(file.path()).unwrap_err();
    match err {
        ConfigError::EnvVarNotSet { var, message } => {
            assert_eq!(var, "SOULCARE_TEST_UNSET_TOKEN");
            assert_eq!(message, "api token required");
        }
        other => panic!("expected EnvVarNotSet, got {other:?}"),
    }
}

#[test]
fn validation_collects_every_error() {
    let file = write_config(
        b"sliding_puzzle:\n  size: 1\ninterference:\n  total_trials: 3\nstore:\n  timeout: 0s\n",
    );
    let err = ConfigLoader::with_defaults().load(file.path()).unwrap_err();
    let ConfigError::ValidationError { errors, .. } = err else {
        panic!("expected ValidationError");
    };
    let paths: Vec<&str> = errors.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(
        paths,
        ["sliding_puzzle.size", "interference.total_trials", "store.timeout"]
    );
}

#[test]
fn warnings_do_not_block_loading() {
    let file = write_config(b"reaction_time:\n  min_delay: 0s\n");
    let loaded = ConfigLoader::with_defaults().load(file.path()).unwrap();
    assert_eq!(loaded.warnings.len(), 1);
    assert_eq!(
        loaded.warnings[0].location.as_deref(),
        Some("reaction_time.min_delay")
    );
}

#[test]
fn unknown_field_is_parse_error() {
    let file = write_config(b"sliding_puzzle:\n  sise: 4\n");
    let err = ConfigLoader::with_defaults().load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }), "{err:?}");
}

#[test]
fn oversized_file_is_rejected() {
    let file = write_config(&vec![b'#'; 2048]);
    let loader = ConfigLoader::new(ConfigLimits {
        max_config_size: 1024,
    });
    let err = loader.load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { .. }));
}

#[test]
fn missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = ConfigLoader::with_defaults()
        .load(&dir.path().join("absent.yaml"))
        .unwrap_err();
    assert!(matches!(err, ConfigError::MissingFile { .. }));
}

#[test]
fn comment_only_file_means_defaults() {
    let file = write_config(b"# nothing configured yet\n");
    let loaded = ConfigLoader::with_defaults().load(file.path()).unwrap();
    assert_eq!(*loaded.config, soulcare_games::config::GamesConfig::default());
}
