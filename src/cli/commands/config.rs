//! `config` command handlers.

use crate::cli::args::ConfigValidateArgs;
use crate::config::{ConfigLoader, GamesConfig};
use crate::error::{ConfigError, GamesError, Severity, ValidationIssue};

/// Validates each file, logging warnings.
///
/// # Errors
///
/// Returns the first file's load or validation error. With `--strict`,
/// warnings are reported as a validation error.
pub fn validate(args: &ConfigValidateArgs) -> Result<(), GamesError> {
    let loader = ConfigLoader::with_defaults();
    for path in &args.files {
        tracing::info!(file = %path.display(), "validating configuration");
        let loaded = loader.load(path)?;

        for warning in &loaded.warnings {
            tracing::warn!(
                location = warning.location.as_deref().unwrap_or("<unknown>"),
                "{}",
                warning.message
            );
        }

        if args.strict && !loaded.warnings.is_empty() {
            return Err(ConfigError::ValidationError {
                path: path.display().to_string(),
                errors: loaded
                    .warnings
                    .iter()
                    .map(|w| ValidationIssue {
                        path: w.location.clone().unwrap_or_default(),
                        message: w.message.clone(),
                        severity: Severity::Error,
                    })
                    .collect(),
            }
            .into());
        }

        tracing::info!(file = %path.display(), "configuration valid");
    }
    Ok(())
}

/// Prints `config` as YAML.
///
/// # Errors
///
/// Returns a YAML error if serialization fails.
pub fn show(config: &GamesConfig) -> Result<(), GamesError> {
    print!("{}", serde_yaml::to_string(config)?);
    Ok(())
}
