//! Exlint: a rule engine for exception-handling anti-patterns.
//!
//! This facade crate re-exports stable types from [`exlint_core`] and
//! provides the rule interface, the registry and dispatcher, the built-in
//! rules, and the top-level [`Engine`] entrypoint. The host supplies an
//! already-built syntax tree and a [`SemanticModel`]; the engine walks the
//! tree once and returns [`Diagnostic`] values.
//!
//! # Stability
//!
//! The `exlint` crate is the semver-stable entrypoint. `exlint_core` may
//! evolve, but this facade preserves type names, serialisation formats, and
//! diagnostic ids within documented constraints.
//!
//! # Built-in rules
//!
//! - `EX001` [`GenericExceptionType`]: throwing `Exception`,
//!   `ApplicationException` or `SystemException`
//! - `EX002` [`ContextAwareConstructor`]: bare message-only constructors
//! - `EX003`/`EX004` [`InnerExceptionPreservation`]: handlers that drop the
//!   caught exception
//! - `EX005` [`ArgumentParamName`]: `paramName` naming a missing parameter
//! - `EX006` [`ExceptionDrivenLogic`]: throws caught by their own `try`
//!
//! # Logging
//!
//! Events are emitted through `tracing` under the `exlint::engine` and
//! `exlint::rules` targets. No subscriber is installed.
//!
//! # Example
//!
//! ```
//! use exlint::{Engine, EngineConfig, LineCol, SemanticIndex, Span, SyntaxKind, TreeBuilder};
//!
//! let span = |line| Span::new(0, 0, LineCol::new(line, 0), LineCol::new(line, 20));
//! let mut builder = TreeBuilder::new();
//! builder.open(SyntaxKind::CompilationUnit, span(0));
//! builder.open(SyntaxKind::ThrowStatement, span(1));
//! builder.open(SyntaxKind::ObjectCreation, span(1));
//! builder.leaf_with_text(SyntaxKind::TypeReference, span(1), "Exception");
//! builder.close();
//! builder.close();
//! builder.close();
//! let tree = builder.finish()?;
//!
//! let engine = Engine::new(EngineConfig::default().with_disabled_rule("EX002"))?;
//! let diagnostics = engine.analyze(&tree, &SemanticIndex::new());
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(
//!     diagnostics[0].to_string(),
//!     "EX001 error 2:1: use a more specific exception type than 'Exception'"
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod dispatch;
mod engine;
mod error;
pub mod query;
mod registry;
mod rule;
pub mod rules;

/// Tracing target for engine lifecycle events.
pub(crate) const ENGINE_TARGET: &str = "exlint::engine";

/// Tracing target for events raised while rules run.
pub(crate) const RULES_TARGET: &str = "exlint::rules";

// Re-export all stable types from exlint_core.
pub use exlint_core::{
    ConfigError, ConstantValue, Diagnostic, EXCEPTION_USAGE, EngineConfig, LineCol,
    MethodSymbol, NodeId, ParameterSymbol, RuleDescriptor, SemanticIndex, SemanticModel,
    Severity, Span, SyntaxKind, SyntaxNode, SyntaxTree, TreeBuilder, TreeError, TypeId,
    TypeSymbol, ast,
};

pub use dispatch::Dispatcher;
pub use engine::{AnalysisReport, AnalysisUnit, Engine};
pub use error::EngineError;
pub use registry::RuleRegistry;
pub use rule::{Rule, RuleContext};
pub use rules::{
    ArgumentParamName, ContextAwareConstructor, ExceptionDrivenLogic, GenericExceptionType,
    InnerExceptionPreservation,
};

#[cfg(test)]
mod tests;
