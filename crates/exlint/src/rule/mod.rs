//! The rule interface and the context a rule reports through.
//!
//! A [`Rule`] names the syntax kinds it subscribes to and inspects one node
//! at a time. It never builds [`Diagnostic`] values itself: it asks the
//! [`RuleContext`] to report a node, and the context applies the engine
//! configuration, resolves the node's span and appends the result.

use exlint_core::{
    Diagnostic, EngineConfig, NodeId, RuleDescriptor, SemanticModel, SyntaxKind, SyntaxTree,
};
use tracing::error;

use crate::RULES_TARGET;

/// A stateless check over one kind of syntax node.
///
/// Rules are shared across worker threads, so they hold no mutable state.
///
/// # Example
///
/// ```
/// use exlint::{NodeId, Rule, RuleContext, RuleDescriptor, Severity, SyntaxKind, EXCEPTION_USAGE};
///
/// const NO_RETHROW: RuleDescriptor = RuleDescriptor::new(
///     "EX900",
///     "Do not re-throw",
///     "bare re-throw",
///     EXCEPTION_USAGE,
///     Severity::Info,
/// );
///
/// struct NoRethrow;
///
/// impl Rule for NoRethrow {
///     fn descriptors(&self) -> &'static [RuleDescriptor] {
///         &[NO_RETHROW]
///     }
///
///     fn subscriptions(&self) -> &'static [SyntaxKind] {
///         &[SyntaxKind::ThrowStatement]
///     }
///
///     fn check(&self, node: NodeId, ctx: &mut RuleContext<'_>) {
///         if ctx.tree().children(node).is_empty() {
///             ctx.report(&NO_RETHROW, node, &[]);
///         }
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the descriptors of every diagnostic this rule can emit.
    fn descriptors(&self) -> &'static [RuleDescriptor];

    /// Returns the node kinds this rule is invoked for.
    fn subscriptions(&self) -> &'static [SyntaxKind];

    /// Inspects `node`, reporting findings through `ctx`.
    fn check(&self, node: NodeId, ctx: &mut RuleContext<'_>);
}

/// Read access to one analysis unit plus a diagnostic sink.
pub struct RuleContext<'a> {
    tree: &'a SyntaxTree,
    model: &'a dyn SemanticModel,
    config: &'a EngineConfig,
    node: NodeId,
    sink: &'a mut Vec<Diagnostic>,
}

impl<'a> RuleContext<'a> {
    /// Creates a context positioned at the root of `tree`.
    #[must_use]
    pub const fn new(
        tree: &'a SyntaxTree,
        model: &'a dyn SemanticModel,
        config: &'a EngineConfig,
        sink: &'a mut Vec<Diagnostic>,
    ) -> Self {
        Self {
            tree,
            model,
            config,
            node: tree.root(),
            sink,
        }
    }

    /// Moves the context to the node about to be checked.
    pub const fn visit(&mut self, node: NodeId) {
        self.node = node;
    }

    /// Returns the syntax tree being analysed.
    #[must_use]
    pub const fn tree(&self) -> &'a SyntaxTree {
        self.tree
    }

    /// Returns the host's semantic model.
    #[must_use]
    pub const fn model(&self) -> &'a dyn SemanticModel {
        self.model
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &'a EngineConfig {
        self.config
    }

    /// Returns the node currently being checked.
    #[must_use]
    pub const fn node(&self) -> NodeId {
        self.node
    }

    /// Reports `node` under `descriptor`, formatting its message with `args`.
    ///
    /// Nothing is emitted when the configuration disables the descriptor.
    /// `node` must be the visited node or one of its descendants.
    pub fn report(&mut self, descriptor: &RuleDescriptor, node: NodeId, args: &[&str]) {
        self.emit(descriptor, node, None, args);
    }

    /// Like [`report`](Self::report), also pointing at a `related` node.
    pub fn report_related(
        &mut self,
        descriptor: &RuleDescriptor,
        node: NodeId,
        related: NodeId,
        args: &[&str],
    ) {
        self.emit(descriptor, node, Some(related), args);
    }

    fn emit(
        &mut self,
        descriptor: &RuleDescriptor,
        node: NodeId,
        related: Option<NodeId>,
        args: &[&str],
    ) {
        if !self.config.is_enabled(descriptor) {
            return;
        }
        let within = self.is_within_visited(node)
            && related.is_none_or(|other| self.is_within_visited(other));
        debug_assert!(
            within,
            "rule {} reported {node} outside the visited node {}",
            descriptor.id(),
            self.node
        );
        let Some(span) = self.tree.span(node).filter(|_| within) else {
            error!(
                target: RULES_TARGET,
                rule = descriptor.id(),
                node = %node,
                visited = %self.node,
                "diagnostic outside the visited node dropped"
            );
            return;
        };
        let mut diagnostic = Diagnostic::new(
            descriptor.id(),
            self.config.severity_for(descriptor),
            descriptor.format(args),
            node,
            span,
        );
        if let Some(related_span) = related.and_then(|other| self.tree.span(other)) {
            diagnostic = diagnostic.with_related(related_span);
        }
        self.sink.push(diagnostic);
    }

    fn is_within_visited(&self, node: NodeId) -> bool {
        self.tree.contains(node)
            && (node == self.node || self.tree.ancestors(node).any(|id| id == self.node))
    }
}

impl std::fmt::Debug for RuleContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleContext")
            .field("node", &self.node)
            .field("tree_len", &self.tree.len())
            .field("reported", &self.sink.len())
            .finish_non_exhaustive()
    }
}
