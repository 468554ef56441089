//! EX005: an argument exception naming a parameter that does not exist.

use exlint_core::ast::MethodLike;
use exlint_core::{ConstantValue, EXCEPTION_USAGE, NodeId, RuleDescriptor, Severity, SyntaxKind};

use super::{THROW_KINDS, thrown_creation};
use crate::rule::{Rule, RuleContext};

/// Constructor parameter that names the offending argument.
const PARAM_NAME: &str = "paramName";

const DESCRIPTORS: &[RuleDescriptor] = &[ArgumentParamName::DESCRIPTOR];

/// Checks the `paramName` argument against the enclosing member.
///
/// The rule only fires when everything is statically known: the
/// constructor resolves and has a `paramName` parameter, the matching
/// argument folds to a constant, and the throw sits inside a method,
/// constructor or local function.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArgumentParamName;

impl ArgumentParamName {
    /// Reported at the `paramName` argument expression.
    pub const DESCRIPTOR: RuleDescriptor = RuleDescriptor::new(
        "EX005",
        "Argument exceptions must name a declared parameter",
        "containing method does not declare '{0}' parameter",
        EXCEPTION_USAGE,
        Severity::Error,
    );
}

impl Rule for ArgumentParamName {
    fn descriptors(&self) -> &'static [RuleDescriptor] {
        DESCRIPTORS
    }

    fn subscriptions(&self) -> &'static [SyntaxKind] {
        THROW_KINDS
    }

    fn check(&self, node: NodeId, ctx: &mut RuleContext<'_>) {
        let tree = ctx.tree();
        let model = ctx.model();
        let Some(creation) = thrown_creation(tree, node) else {
            return;
        };
        let Some(index) = model
            .resolve_method(creation.id())
            .and_then(|ctor| ctor.parameter_index(PARAM_NAME))
        else {
            return;
        };
        let arguments = creation.arguments();
        let argument = arguments
            .iter()
            .find(|arg| arg.name() == Some(PARAM_NAME))
            .or_else(|| arguments.get(index).filter(|arg| arg.name().is_none()));
        let Some(expression) = argument.and_then(|arg| arg.expression()) else {
            return;
        };
        let Some(value) = model
            .constant_value(expression)
            .filter(|value| !matches!(value, ConstantValue::Null))
        else {
            return;
        };
        let name = value.to_string();
        let mut scopes = MethodLike::scopes(tree, node).peekable();
        if scopes.peek().is_none() {
            return;
        }
        if !scopes.any(|scope| scope.parameter_names().contains(&name.as_str())) {
            ctx.report(&Self::DESCRIPTOR, expression, &[name.as_str()]);
        }
    }
}
