//! Configuration loaded from environment variables.
//!
//! Supported:
//! - LANTERN_TIMEOUT_SECS: per-question countdown (default 15)
//! - LANTERN_MILD_THRESHOLD: lowest accuracy (%) classified as mild (default 50)
//! - LANTERN_NORMAL_THRESHOLD: lowest accuracy (%) classified as normal (default 75)
//! - LANTERN_BANK_PATH: JSON question bank (built-in bank when unset)
//! - LANTERN_LOG_MODE: `file`, `stdout` or `auto` (default auto)
//! - LANTERN_LOG_FILE: log path in file mode (default `lantern.log`)

use std::path::PathBuf;

use crate::domain::ClassificationThresholds;
use crate::LanternError;

/// Default per-question countdown.
pub const DEFAULT_TIMEOUT_SECS: u32 = 15;

/// Engine settings.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Seconds allowed per question
    pub per_question_timeout_secs: u32,

    /// Diagnosis cut points
    pub thresholds: ClassificationThresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            per_question_timeout_secs: DEFAULT_TIMEOUT_SECS,
            thresholds: ClassificationThresholds::default(),
        }
    }
}

impl EngineConfig {
    /// Config with a custom countdown and default thresholds.
    #[must_use]
    pub fn with_timeout(per_question_timeout_secs: u32) -> Self {
        Self {
            per_question_timeout_secs,
            ..Self::default()
        }
    }

    /// # Errors
    /// Returns `LanternError::Config` if the timeout is zero or thresholds are inconsistent.
    pub fn validate(&self) -> Result<(), LanternError> {
        if self.per_question_timeout_secs == 0 {
            return Err(LanternError::Config(
                "Per-question timeout must be positive".to_string(),
            ));
        }
        self.thresholds.validate().map_err(LanternError::Config)
    }

    /// Countdown length in milliseconds.
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        u64::from(self.per_question_timeout_secs) * 1000
    }
}

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// File when stdout is a terminal, stdout otherwise
    Auto,
    File,
    Stdout,
}

/// Host application settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub bank_path: Option<PathBuf>,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            bank_path: None,
            log_mode: LogMode::Auto,
            log_file: PathBuf::from("lantern.log"),
        }
    }
}

impl AppConfig {
    /// Load from the process environment.
    ///
    /// # Errors
    /// Returns `LanternError::Config` on unparseable or out-of-range values.
    pub fn from_env() -> Result<Self, LanternError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Unset or blank keys keep defaults.
    ///
    /// # Errors
    /// Returns `LanternError::Config` on unparseable or out-of-range values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LanternError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut cfg = Self::default();

        if let Some(v) = get("LANTERN_TIMEOUT_SECS") {
            cfg.engine.per_question_timeout_secs = v.parse::<u32>().map_err(|_| {
                LanternError::Config(format!("LANTERN_TIMEOUT_SECS: invalid integer '{v}'"))
            })?;
        }

        if let Some(v) = get("LANTERN_MILD_THRESHOLD") {
            cfg.engine.thresholds.mild_min_percent = parse_percent("LANTERN_MILD_THRESHOLD", &v)?;
        }

        if let Some(v) = get("LANTERN_NORMAL_THRESHOLD") {
            cfg.engine.thresholds.normal_min_percent =
                parse_percent("LANTERN_NORMAL_THRESHOLD", &v)?;
        }

        cfg.bank_path = get("LANTERN_BANK_PATH").map(PathBuf::from);

        if let Some(v) = get("LANTERN_LOG_MODE") {
            cfg.log_mode = match v.to_ascii_lowercase().as_str() {
                "file" => LogMode::File,
                "stdout" => LogMode::Stdout,
                "auto" => LogMode::Auto,
                other => {
                    return Err(LanternError::Config(format!(
                        "LANTERN_LOG_MODE: expected file, stdout or auto, got '{other}'"
                    )))
                }
            };
        }

        if let Some(v) = get("LANTERN_LOG_FILE") {
            cfg.log_file = PathBuf::from(v);
        }

        cfg.engine.validate()?;
        Ok(cfg)
    }
}

fn parse_percent(key: &str, value: &str) -> Result<f64, LanternError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|x| x.is_finite())
        .ok_or_else(|| LanternError::Config(format!("{key}: invalid number '{value}'")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::from_lookup(lookup(&[])).expect("Should load defaults");
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.engine.per_question_timeout_secs, 15);
        assert_eq!(cfg.engine.timeout_ms(), 15_000);
    }

    #[test]
    fn test_overrides() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("LANTERN_TIMEOUT_SECS", "20"),
            ("LANTERN_MILD_THRESHOLD", "40"),
            ("LANTERN_NORMAL_THRESHOLD", " 80 "),
            ("LANTERN_BANK_PATH", "/tmp/bank.json"),
            ("LANTERN_LOG_MODE", "STDOUT"),
        ]))
        .expect("Should load");

        assert_eq!(cfg.engine.per_question_timeout_secs, 20);
        assert!((cfg.engine.thresholds.mild_min_percent - 40.0).abs() < f64::EPSILON);
        assert!((cfg.engine.thresholds.normal_min_percent - 80.0).abs() < f64::EPSILON);
        assert_eq!(cfg.bank_path, Some(PathBuf::from("/tmp/bank.json")));
        assert_eq!(cfg.log_mode, LogMode::Stdout);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = AppConfig::from_lookup(lookup(&[("LANTERN_TIMEOUT_SECS", "0")]));
        assert!(matches!(err, Err(LanternError::Config(_))));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(AppConfig::from_lookup(lookup(&[("LANTERN_TIMEOUT_SECS", "soon")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("LANTERN_MILD_THRESHOLD", "NaN")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("LANTERN_LOG_MODE", "syslog")])).is_err());
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let err = AppConfig::from_lookup(lookup(&[
            ("LANTERN_MILD_THRESHOLD", "90"),
            ("LANTERN_NORMAL_THRESHOLD", "60"),
        ]));
        assert!(matches!(err, Err(LanternError::Config(_))));
    }
}
