//! EX001: throwing an overly generic exception type.

use exlint_core::{EXCEPTION_USAGE, NodeId, RuleDescriptor, Severity, SyntaxKind};

use super::{THROW_KINDS, thrown_creation};
use crate::query::simple_type_name;
use crate::rule::{Rule, RuleContext};

/// Simple names that say nothing about what went wrong.
const GENERIC_TYPES: &[&str] = &["Exception", "ApplicationException", "SystemException"];

const DESCRIPTORS: &[RuleDescriptor] = &[GenericExceptionType::DESCRIPTOR];

/// Flags `new Exception(...)` and its two catch-all siblings at a throw.
///
/// The check is purely syntactic. It matches the written type name, so it
/// also fires when the host could not bind the type.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericExceptionType;

impl GenericExceptionType {
    /// Reported at the type reference of the thrown creation.
    pub const DESCRIPTOR: RuleDescriptor = RuleDescriptor::new(
        "EX001",
        "Do not throw generic exception types",
        "use a more specific exception type than '{0}'",
        EXCEPTION_USAGE,
        Severity::Error,
    );
}

impl Rule for GenericExceptionType {
    fn descriptors(&self) -> &'static [RuleDescriptor] {
        DESCRIPTORS
    }

    fn subscriptions(&self) -> &'static [SyntaxKind] {
        THROW_KINDS
    }

    fn check(&self, node: NodeId, ctx: &mut RuleContext<'_>) {
        let Some(creation) = thrown_creation(ctx.tree(), node) else {
            return;
        };
        let (Some(type_ref), Some(written)) = (creation.type_reference(), creation.type_name())
        else {
            return;
        };
        let name = written.trim();
        if GENERIC_TYPES.contains(&simple_type_name(name)) {
            ctx.report(&Self::DESCRIPTOR, type_ref, &[name]);
        }
    }
}
