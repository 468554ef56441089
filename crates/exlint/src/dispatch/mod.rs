//! Single-pass routing of syntax nodes to subscribed rules.
//!
//! A [`Dispatcher`] is built from a registry and a configuration. It keeps,
//! for each syntax kind, the rules that subscribe to it and still have at
//! least one enabled descriptor. [`Dispatcher::run`] then walks a tree once
//! in pre-order and hands every node to its rules in registration order.

use std::collections::HashMap;

use exlint_core::{Diagnostic, EngineConfig, SemanticModel, SyntaxKind, SyntaxTree};

use crate::registry::RuleRegistry;
use crate::rule::{Rule, RuleContext};

/// Routes nodes of one tree walk to the enabled rules.
pub struct Dispatcher<'r> {
    config: &'r EngineConfig,
    routes: HashMap<SyntaxKind, Vec<&'r dyn Rule>>,
}

impl<'r> Dispatcher<'r> {
    /// Builds the routing table for `registry` under `config`.
    #[must_use]
    pub fn new(registry: &'r RuleRegistry, config: &'r EngineConfig) -> Self {
        let mut routes: HashMap<SyntaxKind, Vec<&'r dyn Rule>> = HashMap::new();
        for rule in registry.rules() {
            if !rule.descriptors().iter().any(|d| config.is_enabled(d)) {
                continue;
            }
            for kind in rule.subscriptions() {
                let slot = routes.entry(*kind).or_default();
                if !slot.iter().any(|existing| std::ptr::addr_eq(*existing, rule)) {
                    slot.push(rule);
                }
            }
        }
        Self { config, routes }
    }

    /// Returns the number of rules routed for `kind`.
    #[must_use]
    pub fn route_len(&self, kind: SyntaxKind) -> usize {
        self.routes.get(&kind).map_or(0, Vec::len)
    }

    /// Walks `tree` once and returns the diagnostics in emission order.
    #[must_use]
    pub fn run(&self, tree: &SyntaxTree, model: &dyn SemanticModel) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        if self.routes.is_empty() {
            return diagnostics;
        }
        let mut ctx = RuleContext::new(tree, model, self.config, &mut diagnostics);
        for node in tree.descendants(tree.root()) {
            let Some(rules) = tree.kind(node).and_then(|kind| self.routes.get(&kind)) else {
                continue;
            };
            ctx.visit(node);
            for rule in rules {
                rule.check(node, &mut ctx);
            }
        }
        diagnostics
    }
}

impl std::fmt::Debug for Dispatcher<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("routed_kinds", &self.routes.len())
            .finish_non_exhaustive()
    }
}
