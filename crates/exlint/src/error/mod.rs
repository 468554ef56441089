//! Errors raised while assembling an engine.
//!
//! Analysis itself never fails. These errors cover rule registration and
//! configuration, both of which happen once before any tree is visited.

use exlint_core::ConfigError;
use thiserror::Error;

/// Errors arising from engine construction.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// Two registered rules claim the same diagnostic id.
    #[error("rule '{id}' is already registered")]
    DuplicateRule {
        /// The contested rule id.
        id: String,
    },

    /// The configuration names a rule id no registered rule provides.
    #[error("configuration refers to unknown rule '{id}'")]
    UnknownRule {
        /// The unrecognised rule id.
        id: String,
    },

    /// The configuration document could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl EngineError {
    /// Creates a new `DuplicateRule` error.
    #[must_use]
    pub fn duplicate_rule(id: impl Into<String>) -> Self {
        Self::DuplicateRule { id: id.into() }
    }

    /// Creates a new `UnknownRule` error.
    #[must_use]
    pub fn unknown_rule(id: impl Into<String>) -> Self {
        Self::UnknownRule { id: id.into() }
    }
}
