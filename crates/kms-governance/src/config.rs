//! Governance configuration

use crate::error::{GovernanceError, Result};
use crate::review::{ReviewCycle, DEFAULT_DUE_SOON_DAYS, DEFAULT_REVIEW_CYCLE_MONTHS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default retry bound for write-guard conflicts
pub const DEFAULT_MAX_TRANSITION_RETRIES: u32 = 3;

/// Tunables for the governance service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GovernanceConfig {
    /// Days before the next review date at which an item counts as due soon
    pub due_soon_threshold_days: u32,
    /// Extra attempts after a `ConcurrentModification`
    pub max_transition_retries: u32,
    /// Cycle given to content created without one
    pub default_review_cycle_months: u32,
}

impl GovernanceConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With due-soon threshold
    #[inline]
    #[must_use]
    pub fn with_due_soon_threshold_days(mut self, days: u32) -> Self {
        self.due_soon_threshold_days = days;
        self
    }

    /// With retry bound
    #[inline]
    #[must_use]
    pub fn with_max_transition_retries(mut self, retries: u32) -> Self {
        self.max_transition_retries = retries;
        self
    }

    /// With default review cycle
    #[inline]
    #[must_use]
    pub fn with_default_review_cycle_months(mut self, months: u32) -> Self {
        self.default_review_cycle_months = months;
        self
    }

    /// Default cycle as a checked value
    pub fn default_review_cycle(&self) -> Result<ReviewCycle> {
        ReviewCycle::new(self.default_review_cycle_months)
    }

    /// Reject out-of-range values
    pub fn validate(&self) -> Result<()> {
        if self.default_review_cycle_months == 0 {
            return Err(GovernanceError::Config(
                "default_review_cycle_months must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Parse and validate TOML
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| GovernanceError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| GovernanceError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            due_soon_threshold_days: DEFAULT_DUE_SOON_DAYS,
            max_transition_retries: DEFAULT_MAX_TRANSITION_RETRIES,
            default_review_cycle_months: DEFAULT_REVIEW_CYCLE_MONTHS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = GovernanceConfig::default();
        assert_eq!(config.due_soon_threshold_days, 7);
        assert_eq!(config.max_transition_retries, 3);
        assert_eq!(config.default_review_cycle().unwrap().months(), 12);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = GovernanceConfig::from_toml_str("due_soon_threshold_days = 14\n").unwrap();
        assert_eq!(config.due_soon_threshold_days, 14);
        assert_eq!(config.max_transition_retries, 3);
    }

    #[test]
    fn rejects_zero_cycle_and_unknown_keys() {
        assert!(matches!(
            GovernanceConfig::from_toml_str("default_review_cycle_months = 0"),
            Err(GovernanceError::Config(_))
        ));
        assert!(GovernanceConfig::from_toml_str("retries = 2").is_err());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_transition_retries = 5").unwrap();
        let config = GovernanceConfig::from_path(file.path()).unwrap();
        assert_eq!(config, GovernanceConfig::new().with_max_transition_retries(5));
    }

    #[test]
    fn missing_file_is_a_config_error() {
        assert!(matches!(
            GovernanceConfig::from_path("/nonexistent/kms.toml"),
            Err(GovernanceError::Config(_))
        ));
    }
}
