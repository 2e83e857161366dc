//! Configuration handling for Council Guard.
//!
//! Policy constants (recovery label, autopick sentinel, low-state cutoff,
//! recommendation bounds) and gate settings are read from environment
//! variables or a YAML file, falling back to the reference policy.

use std::env;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

use crate::state::DEFAULT_LOW_STATE_THRESHOLD;

/// Label that marks restorative, low-effort cards.
pub const DEFAULT_RECOVERY_LABEL: &str = "回復";
/// Canonical autopick rank agreed with the council.
pub const DEFAULT_AUTOPICK: &str = "A";

/// Structural problems in an otherwise parseable configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A response must be allowed at least one recommendation.
    #[error("min_recommendations must be > 0")]
    ZeroMinRecommendations,

    /// Bounds are inverted.
    #[error("min_recommendations ({min}) exceeds max_recommendations ({max})")]
    InvertedBounds {
        /// Configured lower bound.
        min: usize,
        /// Configured upper bound.
        max: usize,
    },

    /// A required string setting is blank.
    #[error("{0} must not be empty")]
    EmptyValue(&'static str),

    /// The gate must call the council at least once.
    #[error("max_attempts must be > 0")]
    ZeroAttempts,
}

/// Rule constants consumed by [`crate::PolicyValidator`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// The only label allowed under low state.
    pub recovery_label: String,
    /// Value `autopick` must literally equal.
    pub autopick_sentinel: String,
    /// Readings `<=` this value count as low.
    pub low_state_threshold: i32,
    /// Inclusive lower bound on the recommendation count.
    pub min_recommendations: usize,
    /// Inclusive upper bound on the recommendation count.
    pub max_recommendations: usize,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            recovery_label: DEFAULT_RECOVERY_LABEL.to_string(),
            autopick_sentinel: DEFAULT_AUTOPICK.to_string(),
            low_state_threshold: DEFAULT_LOW_STATE_THRESHOLD,
            min_recommendations: 1,
            max_recommendations: 3,
        }
    }
}

impl PolicyConfig {
    /// Checks invariants the validator relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_recommendations == 0 {
            return Err(ConfigError::ZeroMinRecommendations);
        }
        if self.min_recommendations > self.max_recommendations {
            return Err(ConfigError::InvertedBounds {
                min: self.min_recommendations,
                max: self.max_recommendations,
            });
        }
        if self.recovery_label.trim().is_empty() {
            return Err(ConfigError::EmptyValue("recovery_label"));
        }
        if self.autopick_sentinel.trim().is_empty() {
            return Err(ConfigError::EmptyValue("autopick_sentinel"));
        }
        Ok(())
    }
}

/// Settings for [`crate::CouncilGate`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Total council calls allowed per turn (first try included).
    pub max_attempts: u32,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self { max_attempts: 3 }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Validation rules.
    pub policy: PolicyConfig,
    /// Regeneration loop.
    pub gate: GateConfig,
}

impl GuardConfig {
    /// Loads configuration from environment variables, falling back to defaults.
    ///
    /// Recognised variables (the `GUARD_*` spelling is an alternate):
    ///
    /// - `COUNCIL_GUARD_RECOVERY_LABEL` / `GUARD_RECOVERY_LABEL`
    /// - `COUNCIL_GUARD_AUTOPICK` / `GUARD_AUTOPICK`
    /// - `COUNCIL_GUARD_LOW_STATE_THRESHOLD` / `GUARD_LOW_STATE_THRESHOLD`
    /// - `COUNCIL_GUARD_MIN_RECOMMENDATIONS` / `GUARD_MIN_RECOMMENDATIONS`
    /// - `COUNCIL_GUARD_MAX_RECOMMENDATIONS` / `GUARD_MAX_RECOMMENDATIONS`
    /// - `COUNCIL_GUARD_MAX_ATTEMPTS` / `GUARD_MAX_ATTEMPTS`
    ///
    /// Unparseable numbers and values that break [`PolicyConfig::validate`]
    /// cause an error.
    pub fn from_env() -> Result<Self> {
        let mut cfg = Self::default();

        if let Some(raw) = first_env(&["COUNCIL_GUARD_RECOVERY_LABEL", "GUARD_RECOVERY_LABEL"]) {
            cfg.policy.recovery_label = raw.trim().to_string();
        }
        if let Some(raw) = first_env(&["COUNCIL_GUARD_AUTOPICK", "GUARD_AUTOPICK"]) {
            cfg.policy.autopick_sentinel = raw.trim().to_string();
        }
        if let Some(raw) = first_env(&[
            "COUNCIL_GUARD_LOW_STATE_THRESHOLD",
            "GUARD_LOW_STATE_THRESHOLD",
        ]) {
            cfg.policy.low_state_threshold = parse_value("low_state_threshold", &raw)?;
        }
        if let Some(raw) = first_env(&[
            "COUNCIL_GUARD_MIN_RECOMMENDATIONS",
            "GUARD_MIN_RECOMMENDATIONS",
        ]) {
            cfg.policy.min_recommendations = parse_value("min_recommendations", &raw)?;
        }
        if let Some(raw) = first_env(&[
            "COUNCIL_GUARD_MAX_RECOMMENDATIONS",
            "GUARD_MAX_RECOMMENDATIONS",
        ]) {
            cfg.policy.max_recommendations = parse_value("max_recommendations", &raw)?;
        }
        if let Some(raw) = first_env(&["COUNCIL_GUARD_MAX_ATTEMPTS", "GUARD_MAX_ATTEMPTS"]) {
            cfg.gate.max_attempts = parse_value("max_attempts", &raw)?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// Parses YAML text; missing sections keep their defaults.
    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let cfg: Self = serde_yaml::from_str(raw).context("Invalid council guard YAML")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reads and parses a YAML file.
    pub fn from_yaml(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Unable to read config from {}", path.display()))?;
        Self::from_yaml_str(&raw)
    }

    /// Checks both sections.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.policy.validate()?;
        if self.gate.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        Ok(())
    }
}

/// Returns the first defined environment variable from the given list.
fn first_env(keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| env::var(key).ok())
}

fn parse_value<T>(name: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse()
        .with_context(|| format!("Invalid value for {name}: {raw}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Env is process-global; serialise the tests that touch it.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn reset_env() {
        let keys = [
            "COUNCIL_GUARD_RECOVERY_LABEL",
            "GUARD_RECOVERY_LABEL",
            "COUNCIL_GUARD_AUTOPICK",
            "GUARD_AUTOPICK",
            "COUNCIL_GUARD_LOW_STATE_THRESHOLD",
            "GUARD_LOW_STATE_THRESHOLD",
            "COUNCIL_GUARD_MIN_RECOMMENDATIONS",
            "GUARD_MIN_RECOMMENDATIONS",
            "COUNCIL_GUARD_MAX_RECOMMENDATIONS",
            "GUARD_MAX_RECOMMENDATIONS",
            "COUNCIL_GUARD_MAX_ATTEMPTS",
            "GUARD_MAX_ATTEMPTS",
        ];
        for key in keys {
            env::remove_var(key);
        }
    }

    #[test]
    fn default_config_is_reference_policy() {
        let cfg = GuardConfig::default();
        assert_eq!(cfg.policy.recovery_label, "回復");
        assert_eq!(cfg.policy.autopick_sentinel, "A");
        assert_eq!(cfg.policy.low_state_threshold, 1);
        assert_eq!(cfg.policy.min_recommendations, 1);
        assert_eq!(cfg.policy.max_recommendations, 3);
        assert_eq!(cfg.gate.max_attempts, 3);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn env_overrides_defaults() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        reset_env();
        env::set_var("COUNCIL_GUARD_RECOVERY_LABEL", "recovery");
        env::set_var("COUNCIL_GUARD_LOW_STATE_THRESHOLD", "2");
        env::set_var("COUNCIL_GUARD_MAX_ATTEMPTS", "5");

        let cfg = GuardConfig::from_env().expect("config from env");
        reset_env();

        assert_eq!(cfg.policy.recovery_label, "recovery");
        assert_eq!(cfg.policy.low_state_threshold, 2);
        assert_eq!(cfg.gate.max_attempts, 5);
        assert_eq!(cfg.policy.autopick_sentinel, "A");
    }

    #[test]
    fn alternate_env_names_are_supported() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        reset_env();
        env::set_var("GUARD_AUTOPICK", "B");
        env::set_var("GUARD_MAX_RECOMMENDATIONS", "5");

        let cfg = GuardConfig::from_env().expect("config from env");
        reset_env();

        assert_eq!(cfg.policy.autopick_sentinel, "B");
        assert_eq!(cfg.policy.max_recommendations, 5);
    }

    #[test]
    fn invalid_number_errors() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        reset_env();
        env::set_var("COUNCIL_GUARD_MAX_ATTEMPTS", "many");

        let cfg = GuardConfig::from_env();
        reset_env();

        assert!(cfg.is_err());
    }

    #[test]
    fn inverted_bounds_from_env_error() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        reset_env();
        env::set_var("COUNCIL_GUARD_MIN_RECOMMENDATIONS", "4");

        let cfg = GuardConfig::from_env();
        reset_env();

        assert!(cfg.is_err());
    }

    #[test]
    fn yaml_partial_sections_keep_defaults() {
        let cfg = GuardConfig::from_yaml_str(
            "policy:\n  recovery_label: rest\ngate:\n  max_attempts: 1\n",
        )
        .expect("yaml");

        assert_eq!(cfg.policy.recovery_label, "rest");
        assert_eq!(cfg.policy.autopick_sentinel, "A");
        assert_eq!(cfg.policy.max_recommendations, 3);
        assert_eq!(cfg.gate.max_attempts, 1);
    }

    #[test]
    fn yaml_zero_attempts_is_rejected() {
        assert!(GuardConfig::from_yaml_str("gate:\n  max_attempts: 0\n").is_err());
    }

    #[test]
    fn policy_validation_errors() {
        let mut cfg = PolicyConfig {
            min_recommendations: 0,
            ..PolicyConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroMinRecommendations));

        cfg.min_recommendations = 4;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvertedBounds { min: 4, max: 3 })
        );

        cfg.min_recommendations = 1;
        cfg.autopick_sentinel = "  ".to_string();
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyValue("autopick_sentinel")));
    }
}
