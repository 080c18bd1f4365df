//! Configuration loader.
//!
//! Pipeline:
//! 1. Size check and read
//! 2. UTF-8 BOM strip
//! 3. Environment variable expansion on the raw text
//! 4. YAML parsing and deserialization into [`GamesConfig`]
//! 5. Validation, collecting every issue
//! 6. Freeze with `Arc`

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::schema::GamesConfig;
use crate::config::validation::Validator;
use crate::error::ConfigError;

// ============================================================================
// Public API
// ============================================================================

/// Limits applied before a file is parsed.
#[derive(Debug, Clone)]
pub struct ConfigLimits {
    /// Largest accepted configuration file, in bytes.
    pub max_config_size: usize,
}

impl Default for ConfigLimits {
    fn default() -> Self {
        Self {
            max_config_size: env_or("SOULCARE_GAMES_MAX_CONFIG_SIZE", 1024 * 1024),
        }
    }
}

/// A loaded, validated configuration.
#[derive(Debug)]
pub struct LoadResult {
    /// The frozen configuration.
    pub config: Arc<GamesConfig>,

    /// Non-fatal findings.
    pub warnings: Vec<LoadWarning>,
}

/// Non-fatal finding reported while loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadWarning {
    /// What was found.
    pub message: String,

    /// Where it was found: a file path or a dotted field path.
    pub location: Option<String>,
}

impl std::fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{} at {location}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Loads [`GamesConfig`] documents.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    limits: ConfigLimits,
}

impl ConfigLoader {
    /// Creates a loader with the given limits.
    #[must_use]
    pub const fn new(limits: ConfigLimits) -> Self {
        Self { limits }
    }

    /// Creates a loader with default limits.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Loads and validates the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingFile`] if the file cannot be read,
    /// [`ConfigError::InvalidValue`] if it exceeds the size limit,
    /// [`ConfigError::EnvVarNotSet`] for an unset `${VAR:?msg}` reference,
    /// [`ConfigError::ParseError`] for malformed YAML or unknown fields,
    /// and [`ConfigError::ValidationError`] listing every semantic error.
    pub fn load(&self, path: &Path) -> Result<LoadResult, ConfigError> {
        let metadata = std::fs::metadata(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        let file_size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if file_size > self.limits.max_config_size {
            return Err(ConfigError::InvalidValue {
                field: "file_size".to_string(),
                value: format!("{file_size} bytes"),
                expected: format!("at most {} bytes", self.limits.max_config_size),
            });
        }

        let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        self.load_str(&raw, path)
    }

    /// Loads and validates `raw`, reporting errors against `source`.
    ///
    /// # Errors
    ///
    /// As [`load`](Self::load), minus the file-system failures.
    pub fn load_str(&self, raw: &str, source: &Path) -> Result<LoadResult, ConfigError> {
        if raw.len() > self.limits.max_config_size {
            return Err(ConfigError::InvalidValue {
                field: "file_size".to_string(),
                value: format!("{} bytes", raw.len()),
                expected: format!("at most {} bytes", self.limits.max_config_size),
            });
        }

        let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

        let mut warnings = Vec::new();
        let mut env_sub = EnvSubstitution::new();
        let substituted = env_sub.substitute(raw, source)?;
        warnings.extend(env_sub.warnings);

        // An empty or comment-only document means "all defaults".
        let config: GamesConfig = if substituted.trim().is_empty() {
            GamesConfig::default()
        } else {
            let value: serde_yaml::Value =
                serde_yaml::from_str(&substituted).map_err(|e| ConfigError::ParseError {
                    path: source.to_path_buf(),
                    line: e.location().map(|l| l.line()),
                    message: e.to_string(),
                })?;
            if value.is_null() {
                GamesConfig::default()
            } else {
                serde_yaml::from_value(value).map_err(|e| ConfigError::ParseError {
                    path: source.to_path_buf(),
                    line: None,
                    message: format!("failed to deserialize configuration: {e}"),
                })?
            }
        };

        let result = Validator::new().validate(&config);
        if result.has_errors() {
            return Err(ConfigError::ValidationError {
                path: source.display().to_string(),
                errors: result.errors,
            });
        }

        warnings.extend(result.warnings.into_iter().map(|issue| LoadWarning {
            message: issue.message,
            location: Some(issue.path),
        }));

        Ok(LoadResult {
            config: Arc::new(config),
            warnings,
        })
    }

    /// Loads `path` when given, or returns the built-in defaults.
    ///
    /// # Errors
    ///
    /// As [`load`](Self::load).
    pub fn load_or_default(&self, path: Option<&Path>) -> Result<LoadResult, ConfigError> {
        match path {
            Some(path) => self.load(path),
            None => Ok(LoadResult {
                config: Arc::new(GamesConfig::default()),
                warnings: Vec::new(),
            }),
        }
    }
}

// ============================================================================
// Environment Variable Substitution
// ============================================================================

/// Expands environment references in raw YAML text before parsing, so
/// substituted values still get YAML type inference.
struct EnvSubstitution {
    warnings: Vec<LoadWarning>,
}

impl EnvSubstitution {
    const fn new() -> Self {
        Self {
            warnings: Vec::new(),
        }
    }

    /// Supports:
    /// - `${VAR}`: value, or empty string with a warning if unset
    /// - `${VAR:-default}`: `default` if unset
    /// - `${VAR:?message}`: error if unset
    /// - `$$`: a literal `$`
    fn substitute(&mut self, raw: &str, source: &Path) -> Result<String, ConfigError> {
        let mut result = String::with_capacity(raw.len());
        let mut chars = raw.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '$' {
                result.push(c);
                continue;
            }
            match chars.peek() {
                Some('$') => {
                    chars.next();
                    result.push('$');
                }
                Some('{') => {
                    chars.next();
                    let spec = Self::parse_var_spec(&mut chars, source)?;
                    match std::env::var(&spec.name) {
                        Ok(value) => result.push_str(&value),
                        Err(_) => match spec.fallback {
                            Fallback::Default(default) => result.push_str(&default),
                            Fallback::Required(message) => {
                                return Err(ConfigError::EnvVarNotSet {
                                    var: spec.name,
                                    message,
                                });
                            }
                            Fallback::Empty => self.warnings.push(LoadWarning {
                                message: format!(
                                    "environment variable '{}' is not set, using empty string",
                                    spec.name
                                ),
                                location: Some(source.display().to_string()),
                            }),
                        },
                    }
                }
                _ => result.push(c),
            }
        }

        Ok(result)
    }

    /// Parses the inside of `${...}`; the opening brace is already consumed.
    fn parse_var_spec(
        chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
        source: &Path,
    ) -> Result<VarSpec, ConfigError> {
        let mut name = String::new();

        while let Some(c) = chars.next() {
            match c {
                '}' => {
                    return Ok(VarSpec {
                        name,
                        fallback: Fallback::Empty,
                    });
                }
                ':' if chars.peek() == Some(&'-') => {
                    chars.next();
                    let default = Self::read_until_close(chars, &name, source)?;
                    return Ok(VarSpec {
                        name,
                        fallback: Fallback::Default(default),
                    });
                }
                ':' if chars.peek() == Some(&'?') => {
                    chars.next();
                    let message = Self::read_until_close(chars, &name, source)?;
                    return Ok(VarSpec {
                        name,
                        fallback: Fallback::Required(message),
                    });
                }
                _ => name.push(c),
            }
        }

        Err(unclosed(&name, source))
    }

    /// Reads up to the matching `}`, keeping nested braces.
    fn read_until_close(
        chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
        name: &str,
        source: &Path,
    ) -> Result<String, ConfigError> {
        let mut value = String::new();
        let mut depth = 1_usize;

        for c in chars.by_ref() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(value);
                    }
                }
                _ => {}
            }
            value.push(c);
        }

        Err(unclosed(name, source))
    }
}

struct VarSpec {
    name: String,
    fallback: Fallback,
}

enum Fallback {
    Empty,
    Default(String),
    Required(String),
}

fn unclosed(name: &str, source: &Path) -> ConfigError {
    ConfigError::ParseError {
        path: PathBuf::from(source),
        line: None,
        message: format!("unclosed environment variable reference: ${{{name}"),
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn load(raw: &str) -> Result<LoadResult, ConfigError> {
        ConfigLoader::with_defaults().load_str(raw, Path::new("games.yaml"))
    }

    #[test]
    fn substitution_uses_set_variable() {
        let mut sub = EnvSubstitution::new();
        let result = sub.substitute("path: ${PATH}", Path::new("t.yaml")).unwrap();
        assert!(!result.contains("${PATH}"));
        assert!(result.len() > "path: ".len());
    }

    #[test]
    fn substitution_default() {
        let mut sub = EnvSubstitution::new();
        let result = sub
            .substitute("size: ${SOULCARE_TEST_UNSET_SIZE_81:-4}", Path::new("t.yaml"))
            .unwrap();
        assert_eq!(result, "size: 4");
    }

    #[test]
    fn substitution_required_missing() {
        let mut sub = EnvSubstitution::new();
        let err = sub
            .substitute("token: ${SOULCARE_TEST_UNSET_TOKEN_81:?token needed}", Path::new("t.yaml"))
            .unwrap_err();
        match err {
            ConfigError::EnvVarNotSet { var, message } => {
                assert_eq!(var, "SOULCARE_TEST_UNSET_TOKEN_81");
                assert_eq!(message, "token needed");
            }
            other => panic!("expected EnvVarNotSet, got {other:?}"),
        }
    }

    #[test]
    fn substitution_escaped_dollar_and_missing_warning() {
        let mut sub = EnvSubstitution::new();
        let result = sub
            .substitute("a: $$5 ${SOULCARE_TEST_UNSET_WARN_81}", Path::new("t.yaml"))
            .unwrap();
        assert_eq!(result, "a: $5 ");
        assert_eq!(sub.warnings.len(), 1);
        assert!(sub.warnings[0].message.contains("SOULCARE_TEST_UNSET_WARN_81"));
    }

    #[test]
    fn substitution_unclosed_is_parse_error() {
        let mut sub = EnvSubstitution::new();
        assert!(matches!(
            sub.substitute("a: ${OPEN", Path::new("t.yaml")),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn empty_and_comment_only_documents_are_defaults() {
        assert_eq!(*load("").unwrap().config, GamesConfig::default());
        assert_eq!(*load("# nothing here\n").unwrap().config, GamesConfig::default());
    }

    #[test]
    fn bom_is_stripped() {
        let result = load("\u{feff}sliding_puzzle:\n  size: 4\n").unwrap();
        assert_eq!(result.config.sliding_puzzle.size, 4);
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let result = load("sequence_recall:\n  flash_interval: 600ms\n").unwrap();
        assert_eq!(
            result.config.sequence_recall.flash_interval,
            Duration::from_millis(600)
        );
        assert_eq!(result.config.digit_span, GamesConfig::default().digit_span);
    }

    #[test]
    fn unknown_field_is_parse_error() {
        assert!(matches!(
            load("sliding_puzzle:\n  sise: 4\n"),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn validation_errors_are_collected() {
        let err = load("sliding_puzzle:\n  size: 1\ninterference:\n  total_trials: 7\n").unwrap_err();
        match err {
            ConfigError::ValidationError { errors, .. } => {
                assert_eq!(errors.len(), 2);
            }
            other => panic!("expected ValidationError, got {other:?}"),
        }
    }

    #[test]
    fn validation_warnings_are_returned() {
        let result = load("digit_span:\n  length_increment: 2\n  max_length: 10\n").unwrap();
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(
            result.warnings[0].location.as_deref(),
            Some("digit_span.length_increment")
        );
    }

    #[test]
    fn size_limit() {
        let loader = ConfigLoader::new(ConfigLimits { max_config_size: 8 });
        assert!(matches!(
            loader.load_str("sliding_puzzle: {}\n", Path::new("t.yaml")),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn missing_file() {
        let err = ConfigLoader::with_defaults()
            .load(Path::new("/definitely/not/here/games.yaml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile { .. }));
    }

    #[test]
    fn default_when_no_path() {
        let result = ConfigLoader::with_defaults().load_or_default(None).unwrap();
        assert_eq!(*result.config, GamesConfig::default());
        assert!(result.warnings.is_empty());
    }
}
