//! Engine entrypoint for the exception rule pipeline.
//!
//! The [`Engine`] pairs a [`RuleRegistry`] with a validated
//! [`EngineConfig`]. Construction is the only fallible step: once built,
//! analysing a unit always yields a (possibly empty) diagnostic list.
//! Independent units can be analysed in parallel through
//! [`Engine::analyze_batch`].

use exlint_core::{Diagnostic, EngineConfig, SemanticModel, SyntaxTree};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::ENGINE_TARGET;
use crate::dispatch::Dispatcher;
use crate::error::EngineError;
use crate::registry::RuleRegistry;

/// One syntax tree and its semantic model, named for reporting.
#[derive(Clone, Copy)]
pub struct AnalysisUnit<'a> {
    name: &'a str,
    tree: &'a SyntaxTree,
    model: &'a dyn SemanticModel,
}

impl<'a> AnalysisUnit<'a> {
    /// Creates a unit.
    #[must_use]
    pub const fn new(name: &'a str, tree: &'a SyntaxTree, model: &'a dyn SemanticModel) -> Self {
        Self { name, tree, model }
    }

    /// Returns the unit name, typically a file path.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }

    /// Returns the syntax tree.
    #[must_use]
    pub const fn tree(&self) -> &'a SyntaxTree {
        self.tree
    }

    /// Returns the semantic model.
    #[must_use]
    pub const fn model(&self) -> &'a dyn SemanticModel {
        self.model
    }
}

impl std::fmt::Debug for AnalysisUnit<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisUnit")
            .field("name", &self.name)
            .field("nodes", &self.tree.len())
            .finish_non_exhaustive()
    }
}

/// Diagnostics produced for one [`AnalysisUnit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisReport {
    unit: String,
    diagnostics: Vec<Diagnostic>,
    truncated: usize,
}

impl AnalysisReport {
    /// Returns the name of the analysed unit.
    #[must_use]
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Returns the kept diagnostics in emission order.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns how many diagnostics were dropped by the per-unit cap.
    #[must_use]
    pub const fn truncated(&self) -> usize {
        self.truncated
    }

    /// Consumes the report, returning its diagnostics.
    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

/// Runs the registered exception rules over host-supplied trees.
///
/// # Example
///
/// ```
/// use exlint::{Engine, EngineConfig, LineCol, SemanticIndex, Span, SyntaxKind, TreeBuilder};
///
/// let engine = Engine::new(EngineConfig::default()).expect("default rules");
/// let origin = LineCol::new(0, 0);
/// let mut builder = TreeBuilder::new();
/// builder.open(SyntaxKind::CompilationUnit, Span::new(0, 0, origin, origin));
/// builder.close();
/// let tree = builder.finish().expect("tree");
/// assert!(engine.analyze(&tree, &SemanticIndex::new()).is_empty());
/// ```
#[derive(Debug)]
pub struct Engine {
    registry: RuleRegistry,
    config: EngineConfig,
}

impl Engine {
    /// Creates an engine running the built-in rules.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or names a rule
    /// id that no built-in rule provides.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        Self::with_registry(RuleRegistry::with_default_rules(), config)
    }

    /// Creates an engine running the rules in `registry`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if the configuration fails
    /// validation, or [`EngineError::UnknownRule`] if it refers to a rule
    /// id missing from `registry`.
    pub fn with_registry(registry: RuleRegistry, config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        if let Some(unknown) = config.referenced_rule_ids().find(|id| !registry.contains(id)) {
            return Err(EngineError::unknown_rule(unknown));
        }
        debug!(
            target: ENGINE_TARGET,
            rules = registry.len(),
            cap = config.max_diagnostics_per_unit(),
            "engine ready"
        );
        Ok(Self { registry, config })
    }

    /// Creates an engine with the built-in rules from a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if the document cannot be parsed or
    /// fails validation, or [`EngineError::UnknownRule`] for an unknown id.
    pub fn from_json_config(document: &str) -> Result<Self, EngineError> {
        Self::new(EngineConfig::from_json(document)?)
    }

    /// Returns the engine configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the rule registry.
    #[must_use]
    pub const fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Analyses one tree, returning its diagnostics in emission order.
    ///
    /// At most [`EngineConfig::max_diagnostics_per_unit`] diagnostics are
    /// kept.
    #[must_use]
    pub fn analyze(&self, tree: &SyntaxTree, model: &dyn SemanticModel) -> Vec<Diagnostic> {
        self.analyze_unit(&AnalysisUnit::new("<unit>", tree, model))
            .into_diagnostics()
    }

    /// Analyses one named unit.
    #[must_use]
    pub fn analyze_unit(&self, unit: &AnalysisUnit<'_>) -> AnalysisReport {
        let mut diagnostics = Dispatcher::new(&self.registry, &self.config).run(unit.tree, unit.model);
        let cap = self.config.max_diagnostics_per_unit();
        let truncated = diagnostics.len().saturating_sub(cap);
        if truncated > 0 {
            warn!(
                target: ENGINE_TARGET,
                unit = unit.name,
                cap,
                dropped = truncated,
                "diagnostic cap reached"
            );
            diagnostics.truncate(cap);
        }
        debug!(
            target: ENGINE_TARGET,
            unit = unit.name,
            nodes = unit.tree.len(),
            diagnostics = diagnostics.len(),
            "analysed unit"
        );
        AnalysisReport {
            unit: unit.name.to_owned(),
            diagnostics,
            truncated,
        }
    }

    /// Analyses independent units in parallel.
    ///
    /// Reports come back in the order of `units`.
    #[must_use]
    pub fn analyze_batch(&self, units: &[AnalysisUnit<'_>]) -> Vec<AnalysisReport> {
        units.par_iter().map(|unit| self.analyze_unit(unit)).collect()
    }
}
