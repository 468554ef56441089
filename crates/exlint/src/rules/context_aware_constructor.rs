//! EX002: constructing an exception through a context-free constructor.

use exlint_core::{EXCEPTION_USAGE, NodeId, RuleDescriptor, Severity, SyntaxKind};

use super::{THROW_KINDS, thrown_creation};
use crate::query::matches_signature;
use crate::rule::{Rule, RuleContext};

/// Constructor shapes that carry nothing beyond a message or a cause.
const FORBIDDEN_SHAPES: &[&[&str]] = &[
    &["String"],
    &["String", "Exception"],
    &["SerializationInfo", "StreamingContext"],
];

const DESCRIPTORS: &[RuleDescriptor] = &[ContextAwareConstructor::DESCRIPTOR];

/// Flags thrown exceptions built with a bare constructor.
///
/// A creation without arguments is always reported. With one or two
/// arguments the resolved constructor is compared against the forbidden
/// shapes, and an unresolved constructor is left alone. Three or more
/// arguments are taken to carry context.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextAwareConstructor;

impl ContextAwareConstructor {
    /// Reported at the object creation.
    pub const DESCRIPTOR: RuleDescriptor = RuleDescriptor::new(
        "EX002",
        "Use context-aware exception constructors",
        "do not use a standard exception constructor; use one that accepts context information",
        EXCEPTION_USAGE,
        Severity::Error,
    );
}

impl Rule for ContextAwareConstructor {
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
        let bare = match creation.arguments().len() {
            0 => true,
            1 | 2 => ctx.model().resolve_method(creation.id()).is_some_and(|ctor| {
                FORBIDDEN_SHAPES
                    .iter()
                    .any(|shape| matches_signature(ctor, shape))
            }),
            _ => false,
        };
        if bare {
            ctx.report(&Self::DESCRIPTOR, creation.id(), &[]);
        }
    }
}
