//! Diagnostics, severities and rule descriptors.
//!
//! Every finding the engine produces is a [`Diagnostic`]: an immutable
//! record naming the rule that fired, its effective [`Severity`], the
//! rendered message and the node it points at. Static rule metadata lives in
//! [`RuleDescriptor`] values that are built once and shared read-only.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::span::Span;
use crate::syntax::NodeId;

/// Category shared by every exception-handling rule.
pub const EXCEPTION_USAGE: &str = "exception-usage";

/// How seriously a diagnostic should be taken.
///
/// # Example
///
/// ```
/// use std::str::FromStr;
/// use exlint_core::Severity;
///
/// assert_eq!(Severity::Warning.to_string(), "warning");
/// assert_eq!(Severity::from_str("ERROR"), Ok(Severity::Error));
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Severity {
    /// Informational finding.
    Info,
    /// Suspicious code that still behaves correctly.
    Warning,
    /// Code that should be fixed.
    Error,
}

/// Static metadata describing one diagnostic a rule can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuleDescriptor {
    id: &'static str,
    title: &'static str,
    message_format: &'static str,
    category: &'static str,
    default_severity: Severity,
    enabled_by_default: bool,
}

impl RuleDescriptor {
    /// Creates an enabled-by-default descriptor.
    #[must_use]
    pub const fn new(
        id: &'static str,
        title: &'static str,
        message_format: &'static str,
        category: &'static str,
        default_severity: Severity,
    ) -> Self {
        Self {
            id,
            title,
            message_format,
            category,
            default_severity,
            enabled_by_default: true,
        }
    }

    /// Marks the descriptor as opt-in.
    #[must_use]
    pub const fn disabled_by_default(mut self) -> Self {
        self.enabled_by_default = false;
        self
    }

    /// Returns the stable rule id, such as `EX001`.
    #[must_use]
    pub const fn id(&self) -> &'static str {
        self.id
    }

    /// Returns the one-line rule title.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        self.title
    }

    /// Returns the message template with `{0}`-style placeholders.
    #[must_use]
    pub const fn message_format(&self) -> &'static str {
        self.message_format
    }

    /// Returns the rule category.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        self.category
    }

    /// Returns the severity used when the configuration does not override it.
    #[must_use]
    pub const fn default_severity(&self) -> Severity {
        self.default_severity
    }

    /// Returns whether the rule runs without being enabled explicitly.
    #[must_use]
    pub const fn enabled_by_default(&self) -> bool {
        self.enabled_by_default
    }

    /// Renders the message template with positional arguments.
    #[must_use]
    pub fn format(&self, args: &[&str]) -> String {
        format_message(self.message_format, args)
    }
}

/// Substitutes positional `{0}`, `{1}`, ... placeholders in `template`.
///
/// Placeholders without a matching argument are left untouched.
///
/// # Example
///
/// ```
/// use exlint_core::format_message;
///
/// assert_eq!(
///     format_message("pass '{0}' as the cause", &["ex"]),
///     "pass 'ex' as the cause",
/// );
/// assert_eq!(format_message("{0} and {1}", &["a"]), "a and {1}");
/// ```
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let (before, from_brace) = rest.split_at(open);
        out.push_str(before);
        let substituted = from_brace.find('}').and_then(|close| {
            let index = from_brace.get(1..close)?.parse::<usize>().ok()?;
            let value = args.get(index)?;
            Some((value, close))
        });
        match substituted {
            Some((value, close)) => {
                out.push_str(value);
                rest = from_brace.get(close + 1..).unwrap_or_default();
            }
            None => {
                out.push('{');
                rest = from_brace.get(1..).unwrap_or_default();
            }
        }
    }
    out.push_str(rest);
    out
}

/// A finding reported by a rule.
///
/// # Example
///
/// ```
/// use exlint_core::{Diagnostic, LineCol, NodeId, Severity, Span};
///
/// let span = Span::new(40, 49, LineCol::new(3, 14), LineCol::new(3, 23));
/// let diag = Diagnostic::new(
///     "EX001",
///     Severity::Error,
///     String::from("use a more specific exception type than 'Exception'"),
///     NodeId::from_raw(7),
///     span,
/// );
/// assert_eq!(
///     diag.to_string(),
///     "EX001 error 4:15: use a more specific exception type than 'Exception'",
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    rule_id: String,
    severity: Severity,
    message: String,
    node: NodeId,
    span: Span,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    related: Option<Span>,
}

impl Diagnostic {
    /// Creates a diagnostic.
    #[must_use]
    pub fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        message: String,
        node: NodeId,
        span: Span,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            message,
            node,
            span,
            related: None,
        }
    }

    /// Attaches a secondary location.
    #[must_use]
    pub const fn with_related(mut self, related: Span) -> Self {
        self.related = Some(related);
        self
    }

    /// Returns the id of the rule that fired.
    #[must_use]
    pub fn rule_id(&self) -> &str {
        &self.rule_id
    }

    /// Returns the effective severity.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns the rendered message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the node the diagnostic points at.
    #[must_use]
    pub const fn node(&self) -> NodeId {
        self.node
    }

    /// Returns the primary location.
    #[must_use]
    pub const fn span(&self) -> Span {
        self.span
    }

    /// Returns the secondary location, if any.
    #[must_use]
    pub const fn related(&self) -> Option<Span> {
        self.related
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}: {}",
            self.rule_id,
            self.severity,
            self.span.start(),
            self.message
        )
    }
}
