//! Error types for tree construction and configuration loading.
//!
//! Analysis itself never fails: unresolved symbols and malformed nodes are
//! skipped by the rules. These errors cover the two places where a host can
//! hand the engine something unusable.

use std::sync::Arc;

use thiserror::Error;

use crate::syntax::NodeId;

/// Errors raised while building or validating a [`SyntaxTree`](crate::SyntaxTree).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TreeError {
    /// The builder finished without producing any node.
    #[error("syntax tree has no root node")]
    Empty,

    /// The builder finished while nodes were still open.
    #[error("{count} syntax node(s) were opened but never closed")]
    UnclosedNodes {
        /// Number of nodes left open.
        count: usize,
    },

    /// `close` was called with no open node.
    #[error("close called without a matching open node")]
    UnbalancedClose,

    /// A second top-level node was added after the root was closed.
    #[error("syntax tree already has a root; node {node} would be a second root")]
    MultipleRoots {
        /// The offending node.
        node: NodeId,
    },

    /// A node refers to a parent or child that does not exist.
    #[error("node {node} refers to missing node {missing}")]
    DanglingReference {
        /// The node holding the reference.
        node: NodeId,
        /// The id that could not be found.
        missing: NodeId,
    },

    /// The tree has more nodes than a [`NodeId`] can address.
    #[error("syntax tree exceeds the maximum number of nodes")]
    TooManyNodes,

    /// A node is not reachable from the root, or is reachable twice.
    #[error("node {node} is not reachable exactly once from the root")]
    Unreachable {
        /// The offending node.
        node: NodeId,
    },

    /// Parent and child links disagree.
    #[error("node {child} is listed under {parent} but its parent link differs")]
    InconsistentParent {
        /// The listed parent.
        parent: NodeId,
        /// The child whose parent link disagrees.
        child: NodeId,
    },
}

impl TreeError {
    /// Creates a new `DanglingReference` error.
    #[must_use]
    pub const fn dangling(node: NodeId, missing: NodeId) -> Self {
        Self::DanglingReference { node, missing }
    }

    /// Creates a new `InconsistentParent` error.
    #[must_use]
    pub const fn inconsistent_parent(parent: NodeId, child: NodeId) -> Self {
        Self::InconsistentParent { parent, child }
    }
}

/// Errors raised while loading an [`EngineConfig`](crate::EngineConfig).
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// The document is not valid configuration JSON.
    #[error("invalid engine configuration: {source}")]
    Parse {
        /// Underlying JSON error, shared so the error stays `Clone`.
        #[source]
        source: Arc<serde_json::Error>,
    },

    /// The configuration sets a value outside its accepted range.
    #[error("invalid value for '{field}': {message}")]
    InvalidValue {
        /// Name of the offending field.
        field: &'static str,
        /// Description of the problem.
        message: String,
    },
}

impl From<serde_json::Error> for ConfigError {
    fn from(source: serde_json::Error) -> Self {
        Self::Parse {
            source: Arc::new(source),
        }
    }
}
