//! Core data model for the exlint exception-handling analyser.
//!
//! This crate defines everything the rule engine reads and writes: the
//! host-supplied syntax tree and semantic model, the diagnostics rules emit,
//! their static descriptors, and engine configuration. It is re-exported by
//! the `exlint` facade crate for stable public consumption.
//!
//! # Core types
//!
//! - [`SyntaxTree`], [`TreeBuilder`] and [`NodeId`]: the immutable node arena
//! - [`SyntaxKind`]: node kinds and the child layout each one promises
//! - [`ast`]: typed views such as [`ast::ThrowNode`] and [`ast::CatchClause`]
//! - [`SemanticModel`] and [`SemanticIndex`]: symbol, type and constant
//!   resolution supplied by the host
//! - [`Span`] and [`LineCol`]: byte and line/column source positions
//! - [`Diagnostic`], [`Severity`] and [`RuleDescriptor`]: rule output
//! - [`EngineConfig`]: rule selection, severity overrides and limits
//!
//! # Example
//!
//! ```
//! use exlint_core::{LineCol, Span, SyntaxKind, TreeBuilder};
//!
//! let span = Span::new(0, 10, LineCol::new(0, 0), LineCol::new(0, 10));
//! let mut builder = TreeBuilder::new();
//! builder.open(SyntaxKind::CompilationUnit, span);
//! builder.close();
//! let tree = builder.finish()?;
//! assert_eq!(tree.len(), 1);
//! # Ok::<(), exlint_core::TreeError>(())
//! ```

pub mod ast;
mod config;
mod diagnostic;
mod error;
mod semantic;
mod span;
mod syntax;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use config::EngineConfig;
pub use diagnostic::{Diagnostic, EXCEPTION_USAGE, RuleDescriptor, Severity, format_message};
pub use error::{ConfigError, TreeError};
pub use semantic::{
    BaseChain, ConstantValue, MAX_BASE_CHAIN, MethodSymbol, ParameterSymbol, SemanticIndex,
    SemanticModel, TypeId, TypeSymbol,
};
pub use span::{LineCol, Span};
pub use syntax::{Ancestors, Descendants, NodeId, SyntaxKind, SyntaxNode, SyntaxTree, TreeBuilder};

#[cfg(test)]
mod tests;
