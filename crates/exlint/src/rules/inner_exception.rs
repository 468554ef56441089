//! EX003 and EX004: re-throwing from a catch clause without the cause.

use exlint_core::ast::{Argument, CatchClause, Invocation, ObjectCreation};
use exlint_core::{EXCEPTION_USAGE, NodeId, RuleDescriptor, Severity, SyntaxKind, SyntaxTree};

use crate::query::collect_throw_sites;
use crate::rule::{Rule, RuleContext};

const DESCRIPTORS: &[RuleDescriptor] = &[
    InnerExceptionPreservation::MISSING_CAUSE_VARIABLE,
    InnerExceptionPreservation::CAUSE_NOT_FORWARDED,
];

/// Flags exceptions raised in a handler that drop the caught exception.
///
/// Every `new T(...)` or helper call thrown inside the handler block is
/// inspected. A handler that binds no variable cannot forward anything,
/// so each such throw is reported as [`MISSING_CAUSE_VARIABLE`]. Otherwise
/// a throw whose arguments never name the variable is reported as
/// [`CAUSE_NOT_FORWARDED`]. Throws inside a nested handler belong to that
/// handler.
///
/// [`MISSING_CAUSE_VARIABLE`]: Self::MISSING_CAUSE_VARIABLE
/// [`CAUSE_NOT_FORWARDED`]: Self::CAUSE_NOT_FORWARDED
#[derive(Debug, Clone, Copy, Default)]
pub struct InnerExceptionPreservation;

impl InnerExceptionPreservation {
    /// The catch clause declares no exception variable.
    pub const MISSING_CAUSE_VARIABLE: RuleDescriptor = RuleDescriptor::new(
        "EX003",
        "Declare the caught exception so it can be preserved",
        "complete the catch declaration with an exception variable and pass it as the new exception's cause",
        EXCEPTION_USAGE,
        Severity::Error,
    );

    /// The caught exception is not passed to the new exception.
    pub const CAUSE_NOT_FORWARDED: RuleDescriptor = RuleDescriptor::new(
        "EX004",
        "Preserve the caught exception as the inner exception",
        "pass '{0}' as the new exception's cause",
        EXCEPTION_USAGE,
        Severity::Error,
    );
}

impl Rule for InnerExceptionPreservation {
    fn descriptors(&self) -> &'static [RuleDescriptor] {
        DESCRIPTORS
    }

    fn subscriptions(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::CatchClause]
    }

    fn check(&self, node: NodeId, ctx: &mut RuleContext<'_>) {
        let tree = ctx.tree();
        let Some(clause) = CatchClause::cast(tree, node) else {
            return;
        };
        let Some(block) = clause.block() else {
            return;
        };
        let variable = clause.variable();
        for site in collect_throw_sites(tree, ctx.model(), block) {
            let owner = tree.nearest_ancestor(site.throw(), |kind| kind == SyntaxKind::CatchClause);
            if owner != Some(node) {
                continue;
            }
            let Some(operand) = site.operand() else {
                continue;
            };
            let Some(arguments) = call_arguments(tree, operand) else {
                continue;
            };
            match variable {
                None => ctx.report(&Self::MISSING_CAUSE_VARIABLE, operand, &[]),
                Some(name) if !arguments.iter().any(|arg| arg.identifier() == Some(name)) => {
                    ctx.report(&Self::CAUSE_NOT_FORWARDED, operand, &[name]);
                }
                Some(_) => {}
            }
        }
    }
}

/// Arguments of a thrown creation or helper call; `None` for anything else.
fn call_arguments(tree: &SyntaxTree, operand: NodeId) -> Option<Vec<Argument<'_>>> {
    ObjectCreation::cast(tree, operand)
        .map(|creation| creation.arguments())
        .or_else(|| Invocation::cast(tree, operand).map(|call| call.arguments()))
}
