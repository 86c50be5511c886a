//! Runtime configuration loading.
//!
//! Values come from `WORDSHIELD_*` environment variables, layered over an
//! optional TOML file named by `WORDSHIELD_CONFIG`. Invalid values fall back
//! to defaults without failing; only an unreadable or malformed config file
//! is an error.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |---|---|---|
//! | `WORDSHIELD_CONFIG` | unset | Optional TOML config file |
//! | `WORDSHIELD_REPLACEMENT` | `*` | Default replacement for filtering |
//! | `WORDSHIELD_MAX_WORD_CHARS` | 100 | Max word length (code points) |
//! | `WORDSHIELD_WORDS_FILE` | `config/sensitive-words.txt` | Flat word file |
//! | `WORDSHIELD_RECONCILE_INTERVAL` | 300 | Reload interval secs (0 = off) |
//! | `WORDSHIELD_HIT_FLUSH_INTERVAL` | 30 | Hit flush interval secs (0 = off) |
//! | `WORDSHIELD_LOG_LEVEL` | `info` | Tracing filter directive |
//! | `WORDSHIELD_LOG_FORMAT` | `json` | `json` or `pretty` |
//! | `WORDSHIELD_LOG_FILE` | unset | Log file (stderr when unset) |

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::MAX_PATTERN_CHARS;
use crate::service::ServiceConfig;
use crate::telemetry::{LogConfig, LogFormat};
use crate::vocabulary::{VocabularyConfig, DEFAULT_MAX_WORD_CHARS};

pub const ENV_CONFIG_FILE: &str = "WORDSHIELD_CONFIG";
pub const DEFAULT_REPLACEMENT: &str = "*";
pub const DEFAULT_WORDS_FILE: &str = "config/sensitive-words.txt";
pub const DEFAULT_RECONCILE_SECS: u64 = 300;
pub const DEFAULT_HIT_FLUSH_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Optional settings read from the TOML config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub replacement: Option<String>,
    pub max_word_chars: Option<usize>,
    pub words_file: Option<PathBuf>,
    pub reconcile_interval_secs: Option<u64>,
    pub hit_flush_interval_secs: Option<u64>,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl FileConfig {
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }
}

/// All runtime configuration after layering.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub replacement: String,
    pub vocabulary: VocabularyConfig,
    pub words_file: PathBuf,
    /// `None` disables periodic reconciliation.
    pub reconcile_interval: Option<Duration>,
    /// `None` disables periodic hit flushing.
    pub hit_flush_interval: Option<Duration>,
    pub log: LogConfig,
    pub config_file: Option<PathBuf>,
}

/// Serializable summary of the effective values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveConfig {
    pub replacement: String,
    pub max_word_chars: usize,
    pub words_file: String,
    pub reconcile_interval_secs: u64,
    pub hit_flush_interval_secs: u64,
    pub log_level: String,
    pub log_format: String,
    pub log_file: Option<String>,
    pub config_file: Option<String>,
}

/// Load configuration from the process environment.
pub fn load() -> Result<EnvConfig, ConfigError> {
    load_with(|key| std::env::var(key).ok())
}

/// Load configuration using `lookup` in place of the process environment.
pub fn load_with<F>(lookup: F) -> Result<EnvConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let config_file = lookup(ENV_CONFIG_FILE).map(PathBuf::from);
    let file = match &config_file {
        Some(path) => FileConfig::read(path)?,
        None => FileConfig::default(),
    };
    Ok(layer(&lookup, file, config_file))
}

fn layer<F>(lookup: &F, file: FileConfig, config_file: Option<PathBuf>) -> EnvConfig
where
    F: Fn(&str) -> Option<String>,
{
    // An empty replacement means "use the default", never "delete".
    let replacement = lookup("WORDSHIELD_REPLACEMENT")
        .filter(|r| !r.is_empty())
        .or(file.replacement.filter(|r| !r.is_empty()))
        .unwrap_or_else(|| DEFAULT_REPLACEMENT.to_string());

    let max_word_chars = parse_or(
        lookup,
        "WORDSHIELD_MAX_WORD_CHARS",
        file.max_word_chars.unwrap_or(DEFAULT_MAX_WORD_CHARS),
    )
    .clamp(1, MAX_PATTERN_CHARS);

    let words_file = lookup("WORDSHIELD_WORDS_FILE")
        .map(PathBuf::from)
        .or(file.words_file)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_WORDS_FILE));

    let reconcile_secs = parse_or(
        lookup,
        "WORDSHIELD_RECONCILE_INTERVAL",
        file.reconcile_interval_secs.unwrap_or(DEFAULT_RECONCILE_SECS),
    );
    let flush_secs = parse_or(
        lookup,
        "WORDSHIELD_HIT_FLUSH_INTERVAL",
        file.hit_flush_interval_secs.unwrap_or(DEFAULT_HIT_FLUSH_SECS),
    );

    let format = lookup("WORDSHIELD_LOG_FORMAT")
        .or(file.log_format)
        .and_then(|f| f.parse::<LogFormat>().ok())
        .unwrap_or_default();
    let log = LogConfig {
        format,
        level: lookup("WORDSHIELD_LOG_LEVEL")
            .or(file.log_level)
            .unwrap_or_else(|| "info".to_string()),
        output_path: lookup("WORDSHIELD_LOG_FILE").map(PathBuf::from).or(file.log_file),
    };

    EnvConfig {
        replacement,
        vocabulary: VocabularyConfig { max_word_chars },
        words_file,
        reconcile_interval: interval(reconcile_secs),
        hit_flush_interval: interval(flush_secs),
        log,
        config_file,
    }
}

/// Parse `key` via `lookup`, returning `default` on missing or invalid.
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|val| val.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn interval(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

impl EnvConfig {
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            default_replacement: self.replacement.clone(),
            vocabulary: self.vocabulary.clone(),
        }
    }

    pub fn effective_config(&self) -> EffectiveConfig {
        EffectiveConfig {
            replacement: self.replacement.clone(),
            max_word_chars: self.vocabulary.max_word_chars,
            words_file: self.words_file.display().to_string(),
            reconcile_interval_secs: self.reconcile_interval.map_or(0, |d| d.as_secs()),
            hit_flush_interval_secs: self.hit_flush_interval.map_or(0, |d| d.as_secs()),
            log_level: self.log.level.clone(),
            log_format: self.log.format.as_str().to_string(),
            log_file: self.log.output_path.as_ref().map(|p| p.display().to_string()),
            config_file: self.config_file.as_ref().map(|p| p.display().to_string()),
        }
    }

    /// Human-readable warnings about suspicious settings.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if !self.words_file.exists() {
            warnings.push(format!(
                "WORDSHIELD_WORDS_FILE {} does not exist; vocabulary will start empty",
                self.words_file.display()
            ));
        }
        if self.log.format == LogFormat::Pretty && self.log.output_path.is_some() {
            warnings.push("WORDSHIELD_LOG_FILE is ignored with pretty log format".to_string());
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = load_with(env(&[])).unwrap();
        assert_eq!(config.replacement, "*");
        assert_eq!(config.vocabulary.max_word_chars, 100);
        assert_eq!(config.words_file, PathBuf::from(DEFAULT_WORDS_FILE));
        assert_eq!(config.reconcile_interval, Some(Duration::from_secs(300)));
        assert_eq!(config.hit_flush_interval, Some(Duration::from_secs(30)));
        assert_eq!(config.log.format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = load_with(env(&[
            ("WORDSHIELD_MAX_WORD_CHARS", "lots"),
            ("WORDSHIELD_RECONCILE_INTERVAL", "-5"),
            ("WORDSHIELD_LOG_FORMAT", "xml"),
        ]))
        .unwrap();
        assert_eq!(config.vocabulary.max_word_chars, 100);
        assert_eq!(config.reconcile_interval, Some(Duration::from_secs(300)));
        assert_eq!(config.log.format, LogFormat::Json);
    }

    #[test]
    fn test_zero_disables_intervals() {
        let config = load_with(env(&[
            ("WORDSHIELD_RECONCILE_INTERVAL", "0"),
            ("WORDSHIELD_HIT_FLUSH_INTERVAL", "0"),
        ]))
        .unwrap();
        assert_eq!(config.reconcile_interval, None);
        assert_eq!(config.hit_flush_interval, None);
        assert_eq!(config.effective_config().reconcile_interval_secs, 0);
    }

    #[test]
    fn test_max_word_chars_clamped() {
        let config = load_with(env(&[("WORDSHIELD_MAX_WORD_CHARS", "0")])).unwrap();
        assert_eq!(config.vocabulary.max_word_chars, 1);
        let config = load_with(env(&[("WORDSHIELD_MAX_WORD_CHARS", "999999")])).unwrap();
        assert_eq!(config.vocabulary.max_word_chars, MAX_PATTERN_CHARS);
    }

    #[test]
    fn test_file_config_parse() {
        let file = FileConfig::parse(
            r#"
            replacement = "[filtered]"
            max_word_chars = 20
            log_format = "pretty"
            "#,
        )
        .unwrap();
        assert_eq!(file.replacement.as_deref(), Some("[filtered]"));
        assert_eq!(file.max_word_chars, Some(20));
        assert!(FileConfig::parse("unknown_key = 1").is_err());
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wordshield.toml");
        std::fs::write(&path, "replacement = \"#\"\nmax_word_chars = 20\n").unwrap();
        let path_str = path.display().to_string();

        let config = load_with(env(&[
            (ENV_CONFIG_FILE, path_str.as_str()),
            ("WORDSHIELD_MAX_WORD_CHARS", "50"),
        ]))
        .unwrap();
        assert_eq!(config.replacement, "#");
        assert_eq!(config.vocabulary.max_word_chars, 50);
        assert_eq!(config.config_file, Some(path));
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let result = load_with(env(&[(ENV_CONFIG_FILE, "/nonexistent/wordshield.toml")]));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_empty_replacement_falls_back_to_default() {
        let config = load_with(env(&[("WORDSHIELD_REPLACEMENT", "")])).unwrap();
        assert_eq!(config.replacement, DEFAULT_REPLACEMENT);
        assert!(!config.warnings().iter().any(|w| w.contains("REPLACEMENT")));
    }
}
