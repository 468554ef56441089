//! Typed views over [`SyntaxTree`] nodes.
//!
//! Each view wraps a node of one [`SyntaxKind`] and reads its children
//! according to the layout documented on that kind. `cast` returns `None`
//! for any other kind, and accessors return `None` when the host left a
//! required child out.

use crate::syntax::{NodeId, SyntaxKind, SyntaxTree};

/// Implements the shared `cast` / `id` / `tree` surface of a view.
macro_rules! view {
    ($(#[$meta:meta])* $name:ident, $($kind:ident)|+) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name<'t> {
            tree: &'t SyntaxTree,
            id: NodeId,
        }

        impl<'t> $name<'t> {
            /// Wraps `id` when it has the expected kind.
            #[must_use]
            pub fn cast(tree: &'t SyntaxTree, id: NodeId) -> Option<Self> {
                matches!(tree.kind(id), $(Some(SyntaxKind::$kind))|+)
                    .then_some(Self { tree, id })
            }

            /// Returns the wrapped node id.
            #[must_use]
            pub const fn id(&self) -> NodeId {
                self.id
            }

            /// Returns the tree the node belongs to.
            #[must_use]
            pub const fn tree(&self) -> &'t SyntaxTree {
                self.tree
            }
        }
    };
}

view!(
    /// A `throw` statement or `throw` expression.
    ThrowNode,
    ThrowStatement | ThrowExpression
);

impl ThrowNode<'_> {
    /// Returns the thrown operand.
    ///
    /// A bare `throw;` re-throw has no operand.
    #[must_use]
    pub fn operand(&self) -> Option<NodeId> {
        self.tree.children(self.id).first().copied()
    }
}

view!(
    /// A `new T(...)` expression.
    ObjectCreation,
    ObjectCreation
);

impl<'t> ObjectCreation<'t> {
    /// Returns the type reference node.
    #[must_use]
    pub fn type_reference(&self) -> Option<NodeId> {
        self.tree
            .first_child_of_kind(self.id, SyntaxKind::TypeReference)
    }

    /// Returns the type name as written in source.
    #[must_use]
    pub fn type_name(&self) -> Option<&'t str> {
        self.type_reference().and_then(|r| self.tree.text(r))
    }

    /// Returns the arguments in source order.
    ///
    /// A creation written without an argument list has no arguments.
    #[must_use]
    pub fn arguments(&self) -> Vec<Argument<'t>> {
        arguments_of(self.tree, self.id)
    }
}

view!(
    /// A method call.
    Invocation,
    Invocation
);

impl<'t> Invocation<'t> {
    /// Returns the arguments in source order.
    #[must_use]
    pub fn arguments(&self) -> Vec<Argument<'t>> {
        arguments_of(self.tree, self.id)
    }
}

fn arguments_of(tree: &SyntaxTree, call: NodeId) -> Vec<Argument<'_>> {
    tree.first_child_of_kind(call, SyntaxKind::ArgumentList)
        .map(|list| {
            tree.children_of_kind(list, SyntaxKind::Argument)
                .map(|id| Argument { tree, id })
                .collect()
        })
        .unwrap_or_default()
}

view!(
    /// One argument of a call.
    Argument,
    Argument
);

impl<'t> Argument<'t> {
    /// Returns the argument expression.
    #[must_use]
    pub fn expression(&self) -> Option<NodeId> {
        self.tree.children(self.id).first().copied()
    }

    /// Returns the parameter name of a named argument.
    #[must_use]
    pub fn name(&self) -> Option<&'t str> {
        self.tree.text(self.id)
    }

    /// Returns the identifier text when the expression is a simple name.
    #[must_use]
    pub fn identifier(&self) -> Option<&'t str> {
        self.expression()
            .filter(|&expr| self.tree.kind(expr) == Some(SyntaxKind::Identifier))
            .and_then(|expr| self.tree.text(expr))
    }
}

view!(
    /// A `try` statement.
    TryStatement,
    TryStatement
);

impl<'t> TryStatement<'t> {
    /// Returns the protected block.
    #[must_use]
    pub fn block(&self) -> Option<NodeId> {
        self.tree.first_child_of_kind(self.id, SyntaxKind::Block)
    }

    /// Returns the catch clauses in source order.
    #[must_use]
    pub fn catches(&self) -> Vec<CatchClause<'t>> {
        self.tree
            .children_of_kind(self.id, SyntaxKind::CatchClause)
            .map(|id| CatchClause {
                tree: self.tree,
                id,
            })
            .collect()
    }
}

view!(
    /// A `catch` clause.
    CatchClause,
    CatchClause
);

impl<'t> CatchClause<'t> {
    /// Returns the declaration, or `None` for a catch-all clause.
    #[must_use]
    pub fn declaration(&self) -> Option<CatchDeclaration<'t>> {
        self.tree
            .first_child_of_kind(self.id, SyntaxKind::CatchDeclaration)
            .map(|id| CatchDeclaration {
                tree: self.tree,
                id,
            })
    }

    /// Returns the handler block.
    #[must_use]
    pub fn block(&self) -> Option<NodeId> {
        self.tree.first_child_of_kind(self.id, SyntaxKind::Block)
    }

    /// Returns the name bound to the caught exception, if any.
    ///
    /// Blank names count as absent.
    #[must_use]
    pub fn variable(&self) -> Option<&'t str> {
        self.declaration().and_then(|d| d.variable())
    }
}

view!(
    /// The `(Type name)` part of a catch clause.
    CatchDeclaration,
    CatchDeclaration
);

impl<'t> CatchDeclaration<'t> {
    /// Returns the declared exception type reference.
    #[must_use]
    pub fn type_reference(&self) -> Option<NodeId> {
        self.tree
            .first_child_of_kind(self.id, SyntaxKind::TypeReference)
    }

    /// Returns the declared variable name, ignoring blank names.
    #[must_use]
    pub fn variable(&self) -> Option<&'t str> {
        self.tree
            .text(self.id)
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

view!(
    /// A method, constructor or local function declaration.
    MethodLike,
    MethodDeclaration | ConstructorDeclaration | LocalFunction
);

impl<'t> MethodLike<'t> {
    /// Returns the declared name.
    #[must_use]
    pub fn name(&self) -> Option<&'t str> {
        self.tree.text(self.id)
    }

    /// Returns the declared parameter names in order.
    #[must_use]
    pub fn parameter_names(&self) -> Vec<&'t str> {
        self.tree
            .first_child_of_kind(self.id, SyntaxKind::ParameterList)
            .map(|list| {
                self.tree
                    .children_of_kind(list, SyntaxKind::Parameter)
                    .filter_map(|p| self.tree.text(p))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns the nearest declaration enclosing `node`.
    #[must_use]
    pub fn enclosing(tree: &'t SyntaxTree, node: NodeId) -> Option<Self> {
        tree.nearest_ancestor(node, SyntaxKind::is_method_like)
            .map(|id| Self { tree, id })
    }

    /// Walks the declarations whose parameters are visible at `node`,
    /// nearest first. A local function sees the parameters of the member
    /// around it, so the walk continues outward until it leaves the
    /// first member that is not a local function.
    pub fn scopes(tree: &'t SyntaxTree, node: NodeId) -> impl Iterator<Item = Self> + 't {
        std::iter::successors(Self::enclosing(tree, node), move |scope| {
            if tree.kind(scope.id) == Some(SyntaxKind::LocalFunction) {
                Self::enclosing(tree, scope.id)
            } else {
                None
            }
        })
    }
}
