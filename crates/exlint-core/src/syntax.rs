//! Immutable syntax tree supplied by the host front-end.
//!
//! The tree is an arena of [`SyntaxNode`]s addressed by copyable [`NodeId`]
//! handles. Hosts build it once per analysis unit with a [`TreeBuilder`], or
//! hand it over in serialised form, and the engine only ever reads it.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::TreeError;
use crate::span::Span;

/// Handle to a node inside one [`SyntaxTree`].
///
/// Ids are only meaningful for the tree that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Creates a node id from its raw arena index.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw arena index.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind tag of a syntax node.
///
/// The engine relies on the child layout listed for each kind. Children not
/// mentioned are allowed and ignored; missing children make the node
/// malformed, and malformed nodes are skipped rather than reported.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[non_exhaustive]
pub enum SyntaxKind {
    /// Top-level container for one source file.
    CompilationUnit,
    /// Class, struct or record declaration; text is the type name.
    TypeDeclaration,
    /// Method declaration; text is the name. Children: `ParameterList`,
    /// then an optional `Block` body.
    MethodDeclaration,
    /// Constructor declaration, laid out like `MethodDeclaration`.
    ConstructorDeclaration,
    /// Local function declaration, laid out like `MethodDeclaration`.
    LocalFunction,
    /// Parameter list; children are `Parameter` nodes.
    ParameterList,
    /// Declared parameter; text is the name, child is a `TypeReference`.
    Parameter,
    /// Statement block; children are statements.
    Block,
    /// Expression statement; child is the expression.
    ExpressionStatement,
    /// Local variable declaration.
    LocalDeclaration,
    /// `if` statement.
    IfStatement,
    /// `return` statement.
    ReturnStatement,
    /// `throw` statement; the optional first child is the operand.
    ThrowStatement,
    /// `throw` used as an expression; the first child is the operand.
    ThrowExpression,
    /// `try` statement. Children: the protected `Block`, zero or more
    /// `CatchClause` nodes, then an optional `FinallyClause`.
    TryStatement,
    /// `catch` clause. Children: optional `CatchDeclaration`, optional
    /// `CatchFilter`, then the handler `Block`.
    CatchClause,
    /// Declaration inside a catch clause; child is the `TypeReference`, text
    /// is the variable name when one is declared.
    CatchDeclaration,
    /// `when (...)` filter on a catch clause.
    CatchFilter,
    /// `finally` clause; child is a `Block`.
    FinallyClause,
    /// `new T(...)`. Children: `TypeReference`, optional `ArgumentList`.
    ObjectCreation,
    /// Method call. Children: callee expression, `ArgumentList`.
    Invocation,
    /// Argument list; children are `Argument` nodes.
    ArgumentList,
    /// Call argument; child is the expression, text is the parameter name
    /// for a named argument.
    Argument,
    /// Type as written in source; text is the type name.
    TypeReference,
    /// Simple name; text is the identifier.
    Identifier,
    /// Member access such as `a.b`.
    MemberAccess,
    /// Literal token; text is the literal as written.
    Literal,
    /// Binary expression such as `a ?? b`.
    BinaryExpression,
    /// Lambda or anonymous function.
    Lambda,
    /// Any construct the engine does not inspect.
    Other,
}

impl SyntaxKind {
    /// Returns `true` for the kinds that raise an exception.
    #[must_use]
    pub const fn is_throw(self) -> bool {
        matches!(self, Self::ThrowStatement | Self::ThrowExpression)
    }

    /// Returns `true` for members that declare a parameter list.
    #[must_use]
    pub const fn is_method_like(self) -> bool {
        matches!(
            self,
            Self::MethodDeclaration | Self::ConstructorDeclaration | Self::LocalFunction
        )
    }
}

/// A single node stored in a [`SyntaxTree`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxNode {
    kind: SyntaxKind,
    span: Span,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<NodeId>,
}

impl SyntaxNode {
    /// Creates a node for [`SyntaxTree::from_nodes`].
    #[must_use]
    pub const fn new(
        kind: SyntaxKind,
        span: Span,
        text: Option<String>,
        parent: Option<NodeId>,
        children: Vec<NodeId>,
    ) -> Self {
        Self {
            kind,
            span,
            text,
            parent,
            children,
        }
    }

    /// Returns the node kind.
    #[must_use]
    pub const fn kind(&self) -> SyntaxKind {
        self.kind
    }

    /// Returns the source span of the node.
    #[must_use]
    pub const fn span(&self) -> Span {
        self.span
    }

    /// Returns the token text attached to the node, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Returns the parent node, or `None` for the root.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Returns the children in source order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Deserialize)]
struct RawSyntaxTree {
    nodes: Vec<SyntaxNode>,
    root: NodeId,
}

impl TryFrom<RawSyntaxTree> for SyntaxTree {
    type Error = TreeError;

    fn try_from(raw: RawSyntaxTree) -> Result<Self, Self::Error> {
        Self::from_nodes(raw.nodes, raw.root)
    }
}

/// An immutable syntax tree for one analysis unit.
///
/// # Example
///
/// ```
/// use exlint_core::{LineCol, Span, SyntaxKind, TreeBuilder};
///
/// let span = Span::new(0, 8, LineCol::new(0, 0), LineCol::new(0, 8));
/// let mut builder = TreeBuilder::new();
/// let root = builder.open(SyntaxKind::Block, span);
/// let throw = builder.leaf(SyntaxKind::ThrowStatement, span);
/// builder.close();
/// let tree = builder.finish()?;
///
/// assert_eq!(tree.root(), root);
/// assert_eq!(tree.parent(throw), Some(root));
/// # Ok::<(), exlint_core::TreeError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSyntaxTree")]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
    root: NodeId,
}

impl SyntaxTree {
    /// Assembles a tree from pre-built nodes, validating every link.
    ///
    /// # Errors
    ///
    /// Returns a [`TreeError`] when the root is missing or has a parent, a
    /// link points outside the arena, parent and child links disagree, or a
    /// node is not reachable exactly once from the root.
    pub fn from_nodes(nodes: Vec<SyntaxNode>, root: NodeId) -> Result<Self, TreeError> {
        let tree = Self { nodes, root };
        let root_node = tree.node(root).ok_or(TreeError::Empty)?;
        if root_node.parent.is_some() {
            return Err(TreeError::Unreachable { node: root });
        }
        for (id, node) in tree.iter() {
            tree.validate_links(id, node)?;
        }
        let mut seen = HashSet::with_capacity(tree.nodes.len());
        for id in tree.descendants(root) {
            if !seen.insert(id) {
                return Err(TreeError::Unreachable { node: id });
            }
        }
        if let Some((orphan, _)) = tree.iter().find(|(id, _)| !seen.contains(id)) {
            return Err(TreeError::Unreachable { node: orphan });
        }
        Ok(tree)
    }

    fn validate_links(&self, id: NodeId, node: &SyntaxNode) -> Result<(), TreeError> {
        if let Some(parent) = node.parent {
            let parent_node = self
                .node(parent)
                .ok_or_else(|| TreeError::dangling(id, parent))?;
            if !parent_node.children.contains(&id) {
                return Err(TreeError::inconsistent_parent(parent, id));
            }
        }
        for &child in &node.children {
            let child_node = self
                .node(child)
                .ok_or_else(|| TreeError::dangling(id, child))?;
            if child_node.parent != Some(id) {
                return Err(TreeError::inconsistent_parent(id, child));
            }
        }
        Ok(())
    }

    fn iter(&self) -> impl Iterator<Item = (NodeId, &SyntaxNode)> {
        (0_u32..)
            .zip(&self.nodes)
            .map(|(raw, node)| (NodeId(raw), node))
    }

    /// Returns the root node id.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the number of nodes in the tree.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` when the tree holds no nodes.
    ///
    /// A validated tree always has a root, so this only holds for trees
    /// that were never successfully built.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns `true` when `id` belongs to this tree.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// Returns the node with the given id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&SyntaxNode> {
        self.nodes.get(id.index())
    }

    /// Returns the kind of a node.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> Option<SyntaxKind> {
        self.node(id).map(SyntaxNode::kind)
    }

    /// Returns the span of a node.
    #[must_use]
    pub fn span(&self, id: NodeId) -> Option<Span> {
        self.node(id).map(SyntaxNode::span)
    }

    /// Returns the token text of a node.
    #[must_use]
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.node(id).and_then(SyntaxNode::text)
    }

    /// Returns the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(SyntaxNode::parent)
    }

    /// Returns the children of a node in source order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[], SyntaxNode::children)
    }

    /// Returns the first child of the given kind.
    #[must_use]
    pub fn first_child_of_kind(&self, id: NodeId, kind: SyntaxKind) -> Option<NodeId> {
        self.children_of_kind(id, kind).next()
    }

    /// Returns the children of the given kind in source order.
    pub fn children_of_kind(
        &self,
        id: NodeId,
        kind: SyntaxKind,
    ) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(move |&child| self.kind(child) == Some(kind))
    }

    /// Walks `start` and everything below it depth-first, in source order.
    #[must_use]
    pub fn descendants(&self, start: NodeId) -> Descendants<'_> {
        let stack = if self.contains(start) {
            vec![start]
        } else {
            Vec::new()
        };
        Descendants { tree: self, stack }
    }

    /// Walks the ancestors of `id`, nearest first, excluding `id` itself.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// Returns the nearest ancestor whose kind satisfies `predicate`.
    pub fn nearest_ancestor(
        &self,
        id: NodeId,
        predicate: impl Fn(SyntaxKind) -> bool,
    ) -> Option<NodeId> {
        self.ancestors(id)
            .find(|&ancestor| self.kind(ancestor).is_some_and(&predicate))
    }
}

/// Pre-order iterator returned by [`SyntaxTree::descendants`].
#[derive(Debug, Clone)]
pub struct Descendants<'t> {
    tree: &'t SyntaxTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

/// Iterator returned by [`SyntaxTree::ancestors`].
#[derive(Debug, Clone)]
pub struct Ancestors<'t> {
    tree: &'t SyntaxTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.tree.parent(id);
        Some(id)
    }
}

/// Incremental builder for a [`SyntaxTree`].
///
/// Nodes are added in source order: [`open`](Self::open) starts a node that
/// will receive children, [`leaf`](Self::leaf) adds a childless node, and
/// [`close`](Self::close) ends the innermost open node, widening its span to
/// cover its children. Structural mistakes are recorded and reported once
/// by [`finish`](Self::finish).
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<SyntaxNode>,
    open: Vec<NodeId>,
    root: Option<NodeId>,
    error: Option<TreeError>,
}

impl TreeBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a node that will receive children.
    pub fn open(&mut self, kind: SyntaxKind, span: Span) -> NodeId {
        let id = self.push(kind, span, None);
        self.open.push(id);
        id
    }

    /// Opens a node carrying token text.
    pub fn open_with_text(
        &mut self,
        kind: SyntaxKind,
        span: Span,
        text: impl Into<String>,
    ) -> NodeId {
        let id = self.push(kind, span, Some(text.into()));
        self.open.push(id);
        id
    }

    /// Adds a childless node under the innermost open node.
    pub fn leaf(&mut self, kind: SyntaxKind, span: Span) -> NodeId {
        self.push(kind, span, None)
    }

    /// Adds a childless node carrying token text.
    pub fn leaf_with_text(
        &mut self,
        kind: SyntaxKind,
        span: Span,
        text: impl Into<String>,
    ) -> NodeId {
        self.push(kind, span, Some(text.into()))
    }

    /// Closes the innermost open node.
    pub fn close(&mut self) {
        let Some(id) = self.open.pop() else {
            self.record(TreeError::UnbalancedClose);
            return;
        };
        if let Some(node) = self.nodes.get(id.index()) {
            let covered = [node.children.first(), node.children.last()]
                .into_iter()
                .flatten()
                .filter_map(|child| self.nodes.get(child.index()))
                .fold(node.span, |span, child| span.cover(&child.span));
            if let Some(node_mut) = self.nodes.get_mut(id.index()) {
                node_mut.span = covered;
            }
        }
    }

    /// Returns the number of nodes added so far.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` when no node has been added.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Finishes the tree.
    ///
    /// # Errors
    ///
    /// Returns the first structural error recorded while building, or an
    /// error when no node was added or nodes are still open.
    pub fn finish(self) -> Result<SyntaxTree, TreeError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if !self.open.is_empty() {
            return Err(TreeError::UnclosedNodes {
                count: self.open.len(),
            });
        }
        let root = self.root.ok_or(TreeError::Empty)?;
        Ok(SyntaxTree {
            nodes: self.nodes,
            root,
        })
    }

    fn push(&mut self, kind: SyntaxKind, span: Span, text: Option<String>) -> NodeId {
        let Ok(raw) = u32::try_from(self.nodes.len()) else {
            self.record(TreeError::TooManyNodes);
            return NodeId(u32::MAX);
        };
        let id = NodeId(raw);
        let parent = self.open.last().copied();
        match parent {
            Some(parent_id) => {
                if let Some(parent_node) = self.nodes.get_mut(parent_id.index()) {
                    parent_node.children.push(id);
                }
            }
            None if self.root.is_some() => self.record(TreeError::MultipleRoots { node: id }),
            None => self.root = Some(id),
        }
        self.nodes.push(SyntaxNode {
            kind,
            span,
            text,
            parent,
            children: Vec::new(),
        });
        id
    }

    fn record(&mut self, error: TreeError) {
        self.error.get_or_insert(error);
    }
}
