//! Rule registry keyed by diagnostic id and subscribed syntax kind.
//!
//! The [`RuleRegistry`] owns the rules an engine runs. Each rule is indexed
//! under every [`SyntaxKind`] it subscribes to, in registration order, so
//! the dispatcher can route a node to its rules without scanning the whole
//! set. Registering a rule whose descriptor id is already taken fails.

use std::collections::HashMap;

use exlint_core::{RuleDescriptor, SyntaxKind};
use tracing::debug;

use crate::ENGINE_TARGET;
use crate::error::EngineError;
use crate::rule::Rule;
use crate::rules::default_rules;

/// The set of rules an engine runs.
///
/// # Example
///
/// ```
/// use exlint::{RuleRegistry, SyntaxKind};
///
/// let registry = RuleRegistry::with_default_rules();
/// assert!(registry.contains("EX006"));
/// assert_eq!(registry.rules_for(SyntaxKind::CatchClause).count(), 1);
/// ```
#[derive(Default)]
pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
    by_kind: HashMap<SyntaxKind, Vec<usize>>,
}

impl RuleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in exception rules.
    #[must_use]
    pub fn with_default_rules() -> Self {
        let mut registry = Self::new();
        for rule in default_rules() {
            registry.push(rule);
        }
        registry
    }

    /// Registers a rule.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DuplicateRule`] if one of the rule's
    /// descriptor ids is already registered or repeated by the rule itself.
    pub fn register(&mut self, rule: Box<dyn Rule>) -> Result<(), EngineError> {
        let mut seen: Vec<&str> = Vec::new();
        for descriptor in rule.descriptors() {
            let id = descriptor.id();
            if self.contains(id) || seen.contains(&id) {
                return Err(EngineError::duplicate_rule(id));
            }
            seen.push(id);
        }
        self.push(rule);
        Ok(())
    }

    /// Returns every registered rule in registration order.
    pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|rule| -> &dyn Rule { rule.as_ref() })
    }

    /// Returns the rules subscribed to `kind`, in registration order.
    pub fn rules_for(&self, kind: SyntaxKind) -> impl Iterator<Item = &dyn Rule> {
        self.by_kind
            .get(&kind)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .filter_map(|&index| self.rules.get(index))
            .map(|rule| -> &dyn Rule { rule.as_ref() })
    }

    /// Returns the descriptors of every registered rule.
    pub fn descriptors(&self) -> impl Iterator<Item = &'static RuleDescriptor> {
        self.rules.iter().flat_map(|rule| rule.descriptors())
    }

    /// Looks up a descriptor by diagnostic id.
    #[must_use]
    pub fn descriptor(&self, id: &str) -> Option<&'static RuleDescriptor> {
        self.descriptors().find(|descriptor| descriptor.id() == id)
    }

    /// Returns `true` when a registered rule provides the diagnostic `id`.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.descriptor(id).is_some()
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` when no rules are registered.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn push(&mut self, rule: Box<dyn Rule>) {
        let index = self.rules.len();
        for kind in rule.subscriptions() {
            let slots = self.by_kind.entry(*kind).or_default();
            if !slots.contains(&index) {
                slots.push(index);
            }
        }
        debug!(
            target: ENGINE_TARGET,
            ids = ?rule.descriptors().iter().map(RuleDescriptor::id).collect::<Vec<_>>(),
            kinds = ?rule.subscriptions(),
            "registered rule"
        );
        self.rules.push(rule);
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field(
                "ids",
                &self.descriptors().map(RuleDescriptor::id).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}
