//! Engine configuration: rule selection, severity overrides and limits.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::diagnostic::{RuleDescriptor, Severity};
use crate::error::ConfigError;

const DEFAULT_MAX_DIAGNOSTICS_PER_UNIT: usize = 10_000;

const fn default_max_diagnostics_per_unit() -> usize {
    DEFAULT_MAX_DIAGNOSTICS_PER_UNIT
}

/// Engine configuration controlling which rules run and how loudly.
///
/// # Defaults
///
/// - every rule that is enabled by default runs
/// - no severity overrides
/// - `max_diagnostics_per_unit`: 10 000
///
/// # Example
///
/// ```
/// use exlint_core::{EngineConfig, Severity};
///
/// let config = EngineConfig::from_json(
///     r#"{ "disabled_rules": ["EX006"], "severity_overrides": { "EX001": "warning" } }"#,
/// )?;
/// assert!(!config.is_rule_disabled("EX001"));
/// assert!(config.is_rule_disabled("EX006"));
/// assert_eq!(config.severity_override("EX001"), Some(Severity::Warning));
/// assert_eq!(config.max_diagnostics_per_unit(), 10_000);
/// # Ok::<(), exlint_core::ConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Rule ids that must not report.
    disabled_rules: BTreeSet<String>,
    /// Opt-in rule ids that must report.
    enabled_rules: BTreeSet<String>,
    /// Severity to use instead of a rule's default.
    severity_overrides: BTreeMap<String, Severity>,
    /// Diagnostics kept per analysis unit before truncation.
    #[serde(default = "default_max_diagnostics_per_unit")]
    max_diagnostics_per_unit: usize,
}

impl EngineConfig {
    /// Parses a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown fields,
    /// and [`ConfigError::InvalidValue`] when a limit is out of range.
    pub fn from_json(document: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(document)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every value is in range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_diagnostics_per_unit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_diagnostics_per_unit",
                message: String::from("must be greater than zero"),
            });
        }
        if let Some(id) = self
            .enabled_rules
            .iter()
            .find(|rule| self.disabled_rules.contains(*rule))
        {
            return Err(ConfigError::InvalidValue {
                field: "enabled_rules",
                message: format!("rule '{id}' is both enabled and disabled"),
            });
        }
        Ok(())
    }

    /// Disables a rule id.
    #[must_use]
    pub fn with_disabled_rule(mut self, id: impl Into<String>) -> Self {
        let rule = id.into();
        self.enabled_rules.remove(&rule);
        self.disabled_rules.insert(rule);
        self
    }

    /// Enables a rule id, including opt-in rules.
    #[must_use]
    pub fn with_enabled_rule(mut self, id: impl Into<String>) -> Self {
        let rule = id.into();
        self.disabled_rules.remove(&rule);
        self.enabled_rules.insert(rule);
        self
    }

    /// Overrides the severity reported for a rule id.
    #[must_use]
    pub fn with_severity(mut self, id: impl Into<String>, severity: Severity) -> Self {
        self.severity_overrides.insert(id.into(), severity);
        self
    }

    /// Sets the per-unit diagnostic cap.
    #[must_use]
    pub const fn with_max_diagnostics_per_unit(mut self, max: usize) -> Self {
        self.max_diagnostics_per_unit = max;
        self
    }

    /// Returns `true` when `id` was disabled explicitly.
    #[must_use]
    pub fn is_rule_disabled(&self, id: &str) -> bool {
        self.disabled_rules.contains(id)
    }

    /// Returns whether the rule described by `descriptor` should report.
    #[must_use]
    pub fn is_enabled(&self, descriptor: &RuleDescriptor) -> bool {
        let id = descriptor.id();
        if self.disabled_rules.contains(id) {
            return false;
        }
        descriptor.enabled_by_default() || self.enabled_rules.contains(id)
    }

    /// Returns the configured override for `id`, if any.
    #[must_use]
    pub fn severity_override(&self, id: &str) -> Option<Severity> {
        self.severity_overrides.get(id).copied()
    }

    /// Returns the effective severity for the rule described by `descriptor`.
    #[must_use]
    pub fn severity_for(&self, descriptor: &RuleDescriptor) -> Severity {
        self.severity_override(descriptor.id())
            .unwrap_or_else(|| descriptor.default_severity())
    }

    /// Returns every rule id the configuration mentions.
    pub fn referenced_rule_ids(&self) -> impl Iterator<Item = &str> {
        self.disabled_rules
            .iter()
            .chain(&self.enabled_rules)
            .chain(self.severity_overrides.keys())
            .map(String::as_str)
    }

    /// Returns the per-unit diagnostic cap.
    #[must_use]
    pub const fn max_diagnostics_per_unit(&self) -> usize {
        self.max_diagnostics_per_unit
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            disabled_rules: BTreeSet::new(),
            enabled_rules: BTreeSet::new(),
            severity_overrides: BTreeMap::new(),
            max_diagnostics_per_unit: DEFAULT_MAX_DIAGNOSTICS_PER_UNIT,
        }
    }
}
