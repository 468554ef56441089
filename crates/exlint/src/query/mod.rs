//! Stateless syntax and symbol queries shared by the rules.
//!
//! These helpers locate throw sites, compare exception types through their
//! inheritance chains, and match resolved constructors against parameter
//! shapes. None of them report anything; rules decide what a result means.

use exlint_core::ast::ThrowNode;
use exlint_core::{
    BaseChain, MAX_BASE_CHAIN, MethodSymbol, NodeId, SemanticModel, SyntaxTree, TypeId,
};
use tracing::trace;

use crate::RULES_TARGET;

/// A `throw` found while scanning a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrowSite {
    throw: NodeId,
    operand: Option<NodeId>,
    exception_type: Option<TypeId>,
}

impl ThrowSite {
    /// Returns the throw statement or throw expression.
    #[must_use]
    pub const fn throw(&self) -> NodeId {
        self.throw
    }

    /// Returns the thrown operand, or `None` for a bare re-throw.
    #[must_use]
    pub const fn operand(&self) -> Option<NodeId> {
        self.operand
    }

    /// Returns the static type of the operand when the host resolved it.
    #[must_use]
    pub const fn exception_type(&self) -> Option<TypeId> {
        self.exception_type
    }

    /// Returns `true` when the exception type is known.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.exception_type.is_some()
    }
}

/// Collects every throw under `block`, in source order.
///
/// Nested blocks, nested `try` statements and lambdas are all searched.
/// Sites whose type the host cannot resolve are kept, marked unresolved.
#[must_use]
pub fn collect_throw_sites(
    tree: &SyntaxTree,
    model: &dyn SemanticModel,
    block: NodeId,
) -> Vec<ThrowSite> {
    tree.descendants(block)
        .filter_map(|id| ThrowNode::cast(tree, id))
        .map(|throw| {
            let operand = throw.operand();
            ThrowSite {
                throw: throw.id(),
                operand,
                exception_type: operand.and_then(|op| model.type_of(op)),
            }
        })
        .collect()
}

/// Returns `true` when `source` is `target` or derives from it.
///
/// The walk stops after [`MAX_BASE_CHAIN`] types; a longer chain counts
/// as not assignable.
#[must_use]
pub fn is_assignable(model: &dyn SemanticModel, source: TypeId, target: TypeId) -> bool {
    let mut chain = BaseChain::new(model, source);
    if chain.any(|ty| ty == target) {
        return true;
    }
    if chain.is_truncated() {
        trace!(
            target: RULES_TARGET,
            source = source.raw(),
            target_type = target.raw(),
            limit = MAX_BASE_CHAIN,
            "base chain walk hit the depth limit"
        );
    }
    false
}

/// Returns `true` when `method` takes exactly the given parameter types.
///
/// Types are compared by simple name, ignoring ASCII case, so `string`,
/// `String` and `System.String` all match the shape `"String"`. Parameter
/// names are not compared.
///
/// # Example
///
/// ```
/// use exlint::{MethodSymbol, ParameterSymbol};
/// use exlint::query::matches_signature;
///
/// let ctor = MethodSymbol::new(
///     ".ctor",
///     vec![
///         ParameterSymbol::new("System.String", "message"),
///         ParameterSymbol::new("Exception", "innerException"),
///     ],
/// );
/// assert!(matches_signature(&ctor, &["string", "exception"]));
/// assert!(!matches_signature(&ctor, &["String"]));
/// ```
#[must_use]
pub fn matches_signature(method: &MethodSymbol, shape: &[&str]) -> bool {
    method.parameters().len() == shape.len()
        && method
            .parameters()
            .iter()
            .zip(shape)
            .all(|(param, expected)| simple_type_name(param.type_name()).eq_ignore_ascii_case(expected))
}

/// Reduces a type as written in source to its simple name.
///
/// Generic arguments and namespace or alias qualifiers are dropped.
///
/// # Example
///
/// ```
/// use exlint::query::simple_type_name;
///
/// assert_eq!(simple_type_name("System.Exception"), "Exception");
/// assert_eq!(simple_type_name("global::System.SystemException"), "SystemException");
/// assert_eq!(simple_type_name("Result<Exception>"), "Result");
/// ```
#[must_use]
pub fn simple_type_name(written: &str) -> &str {
    let without_generics = written.split('<').next().unwrap_or(written);
    without_generics
        .rsplit(['.', ':'])
        .next()
        .unwrap_or(without_generics)
        .trim()
}
