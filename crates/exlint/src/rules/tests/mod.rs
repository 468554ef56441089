//! Tests for the built-in rules.
//!
//! Each rule runs on its own through a one-rule registry, so a test only
//! sees the diagnostics of the rule it targets.

mod argument_param_name_tests;
mod context_aware_constructor_tests;
mod exception_driven_logic_tests;

use exlint_core::test_support::FixtureUnit;
use exlint_core::{Diagnostic, EngineConfig};

use super::default_rules;
use crate::dispatch::Dispatcher;
use crate::registry::RuleRegistry;
use crate::rule::Rule;

/// Runs `rule` alone over `unit` with the default configuration.
fn run(rule: impl Rule + 'static, unit: &FixtureUnit) -> Vec<Diagnostic> {
    run_with(rule, unit, &EngineConfig::default())
}

/// Runs `rule` alone over `unit` with `config`.
fn run_with(rule: impl Rule + 'static, unit: &FixtureUnit, config: &EngineConfig) -> Vec<Diagnostic> {
    let mut registry = RuleRegistry::new();
    registry.register(Box::new(rule)).expect("register rule");
    Dispatcher::new(&registry, config).run(&unit.tree, &unit.model)
}

/// Returns the rule ids of `diagnostics` in order.
fn ids(diagnostics: &[Diagnostic]) -> Vec<&str> {
    diagnostics.iter().map(Diagnostic::rule_id).collect()
}

#[test]
fn default_rules_cover_every_id_once() {
    let mut all: Vec<_> = default_rules()
        .iter()
        .flat_map(|rule| rule.descriptors())
        .map(|descriptor| descriptor.id())
        .collect();
    assert_eq!(all, vec!["EX001", "EX002", "EX003", "EX004", "EX005", "EX006"]);
    all.dedup();
    assert_eq!(all.len(), 6);
}

#[test]
fn every_descriptor_is_enabled_by_default_and_categorised() {
    for rule in default_rules() {
        for descriptor in rule.descriptors() {
            assert!(descriptor.enabled_by_default(), "{}", descriptor.id());
            assert_eq!(descriptor.category(), exlint_core::EXCEPTION_USAGE);
            assert!(!descriptor.title().is_empty());
        }
    }
}
