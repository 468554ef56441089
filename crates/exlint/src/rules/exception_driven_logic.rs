//! EX006: control flow expressed by throwing into a local handler.

use exlint_core::ast::{CatchClause, TryStatement};
use exlint_core::{
    EXCEPTION_USAGE, NodeId, RuleDescriptor, SemanticModel, Severity, SyntaxKind, SyntaxTree,
};
use tracing::trace;

use crate::RULES_TARGET;
use crate::query::{ThrowSite, collect_throw_sites, is_assignable};
use crate::rule::{Rule, RuleContext};

const DESCRIPTORS: &[RuleDescriptor] = &[ExceptionDrivenLogic::DESCRIPTOR];

/// Flags throws in a `try` block that the same statement's handlers catch.
///
/// Handlers are tried in source order, the way the runtime selects them.
/// Each throw is reported once, for the first handler that would catch it,
/// with that handler as the related location. A catch-all takes every
/// throw still unreported and ends the search, since later handlers are
/// unreachable. Throws of unresolved type and handlers of unresolved type
/// take no part.
///
/// Only throws that would reach this statement's handlers count. A throw
/// already caught by a nested `try` belongs to that statement alone, and a
/// throw inside a lambda or local function is skipped: its body runs when
/// it is invoked, usually after the protected block has finished.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExceptionDrivenLogic;

impl ExceptionDrivenLogic {
    /// Reported at the thrown operand, related to the capturing handler.
    pub const DESCRIPTOR: RuleDescriptor = RuleDescriptor::new(
        "EX006",
        "Do not write logic driven by exceptions",
        "this exception is caught in this method; consider converting the try/catch into a conditional check",
        EXCEPTION_USAGE,
        Severity::Warning,
    );
}

impl Rule for ExceptionDrivenLogic {
    fn descriptors(&self) -> &'static [RuleDescriptor] {
        DESCRIPTORS
    }

    fn subscriptions(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::TryStatement]
    }

    fn check(&self, node: NodeId, ctx: &mut RuleContext<'_>) {
        let tree = ctx.tree();
        let model = ctx.model();
        let Some(statement) = TryStatement::cast(tree, node) else {
            return;
        };
        let catches = statement.catches();
        let Some(block) = statement.block().filter(|_| !catches.is_empty()) else {
            return;
        };

        let mut pending: Vec<ThrowSite> = collect_throw_sites(tree, model, block)
            .into_iter()
            .filter(|site| reaches_handlers(tree, model, site, node))
            .collect();

        for clause in catches {
            if pending.is_empty() {
                break;
            }
            let Some(declaration) = clause.declaration() else {
                for site in pending.drain(..) {
                    report(ctx, &site, clause.id());
                }
                break;
            };
            let Some(caught) = declaration
                .type_reference()
                .and_then(|type_ref| model.type_of(type_ref))
            else {
                trace!(
                    target: RULES_TARGET,
                    clause = %clause.id(),
                    "skipping handler of unresolved type"
                );
                continue;
            };
            let (captured, remaining): (Vec<_>, Vec<_>) = pending.into_iter().partition(|site| {
                site.exception_type()
                    .is_some_and(|thrown| is_assignable(model, thrown, caught))
            });
            for site in &captured {
                report(ctx, site, clause.id());
            }
            pending = remaining;
        }
    }
}

/// Returns `true` when `site` would propagate to the handlers of the `try`
/// statement `statement`.
fn reaches_handlers(
    tree: &SyntaxTree,
    model: &dyn SemanticModel,
    site: &ThrowSite,
    statement: NodeId,
) -> bool {
    if !site.is_resolved() {
        trace!(
            target: RULES_TARGET,
            throw = %site.throw(),
            "skipping throw of unresolved type"
        );
        return false;
    }
    let mut child = site.throw();
    for ancestor in tree.ancestors(site.throw()) {
        if ancestor == statement {
            return true;
        }
        match tree.kind(ancestor) {
            Some(SyntaxKind::Lambda | SyntaxKind::LocalFunction) => {
                trace!(
                    target: RULES_TARGET,
                    throw = %site.throw(),
                    "skipping throw in deferred body"
                );
                return false;
            }
            Some(SyntaxKind::TryStatement) => {
                let handled = TryStatement::cast(tree, ancestor)
                    .filter(|inner| inner.block() == Some(child))
                    .is_some_and(|inner| capturing_clause(model, &inner.catches(), site).is_some());
                if handled {
                    trace!(
                        target: RULES_TARGET,
                        throw = %site.throw(),
                        inner = %ancestor,
                        "throw is handled by a nested try"
                    );
                    return false;
                }
            }
            _ => {}
        }
        child = ancestor;
    }
    false
}

/// Returns the first clause in `catches` that would catch `site`.
fn capturing_clause<'t>(
    model: &dyn SemanticModel,
    catches: &[CatchClause<'t>],
    site: &ThrowSite,
) -> Option<CatchClause<'t>> {
    let thrown = site.exception_type()?;
    catches.iter().copied().find(|clause| {
        clause.declaration().is_none_or(|declaration| {
            declaration
                .type_reference()
                .and_then(|type_ref| model.type_of(type_ref))
                .is_some_and(|caught| is_assignable(model, thrown, caught))
        })
    })
}

fn report(ctx: &mut RuleContext<'_>, site: &ThrowSite, clause: NodeId) {
    let target = site.operand().unwrap_or_else(|| site.throw());
    ctx.report_related(&ExceptionDrivenLogic::DESCRIPTOR, target, clause, &[]);
}
