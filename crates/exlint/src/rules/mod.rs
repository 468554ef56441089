//! The built-in exception-handling rules.
//!
//! | Id    | Rule                           | Default severity |
//! |-------|--------------------------------|------------------|
//! | EX001 | [`GenericExceptionType`]       | error            |
//! | EX002 | [`ContextAwareConstructor`]    | error            |
//! | EX003 | [`InnerExceptionPreservation`] | error            |
//! | EX004 | [`InnerExceptionPreservation`] | error            |
//! | EX005 | [`ArgumentParamName`]          | error            |
//! | EX006 | [`ExceptionDrivenLogic`]       | warning          |

use exlint_core::ast::{ObjectCreation, ThrowNode};
use exlint_core::{NodeId, SyntaxKind, SyntaxTree};

use crate::rule::Rule;

mod argument_param_name;
mod context_aware_constructor;
mod exception_driven_logic;
mod generic_exception_type;
mod inner_exception;

pub use argument_param_name::ArgumentParamName;
pub use context_aware_constructor::ContextAwareConstructor;
pub use exception_driven_logic::ExceptionDrivenLogic;
pub use generic_exception_type::GenericExceptionType;
pub use inner_exception::InnerExceptionPreservation;

/// Kinds that raise an exception, shared by the throw-site rules.
const THROW_KINDS: &[SyntaxKind] = &[SyntaxKind::ThrowStatement, SyntaxKind::ThrowExpression];

/// Returns the `new T(...)` raised by a throw node, if that is what it raises.
fn thrown_creation(tree: &SyntaxTree, node: NodeId) -> Option<ObjectCreation<'_>> {
    ThrowNode::cast(tree, node)
        .and_then(|throw| throw.operand())
        .and_then(|operand| ObjectCreation::cast(tree, operand))
}

/// Returns the built-in rules in diagnostic id order.
#[must_use]
pub fn default_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(GenericExceptionType),
        Box::new(ContextAwareConstructor),
        Box::new(InnerExceptionPreservation),
        Box::new(ArgumentParamName),
        Box::new(ExceptionDrivenLogic),
    ]
}

#[cfg(test)]
mod tests;
