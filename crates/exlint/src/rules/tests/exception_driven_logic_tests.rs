//! Tests for EX006.

use exlint_core::test_support::{Call, Catch, Fixture, New, Thrown};
use exlint_core::{Diagnostic, NodeId, Severity, Span, SyntaxKind};
use rstest::rstest;

use super::{ids, run};
use crate::rules::ExceptionDrivenLogic;

/// Pairs each diagnostic's node with the span of its capturing handler.
fn attributions(diagnostics: &[Diagnostic]) -> Vec<(NodeId, Option<Span>)> {
    diagnostics.iter().map(|d| (d.node(), d.related())).collect()
}

#[test]
fn first_matching_handler_wins() {
    let mut fx = Fixture::with_standard_exceptions();
    fx.begin_method("Parse", &[]);
    fx.begin_try();
    let thrown = fx.throw(&New::of("FormatException"));
    let specific = fx.begin_catch(&Catch::of("FormatException").bind("e"));
    fx.begin_catch(&Catch::of("Exception").bind("e"));
    let unit = fx.finish().expect("fixture");

    let diagnostics = run(ExceptionDrivenLogic, &unit);
    assert_eq!(ids(&diagnostics), vec!["EX006"]);
    let diag = diagnostics.first().expect("diagnostic");
    assert_eq!(Some(diag.node()), thrown.operand);
    assert_eq!(diag.related(), unit.tree.span(specific));
    assert_eq!(diag.severity(), Severity::Warning);
    assert_eq!(
        diag.message(),
        "this exception is caught in this method; consider converting the try/catch into a conditional check"
    );
}

#[rstest]
#[case::same_type("FormatException", "FormatException", true)]
#[case::direct_base("FormatException", "SystemException", true)]
#[case::root("FileNotFoundException", "Exception", true)]
#[case::sibling("FormatException", "IOException", false)]
#[case::narrower_handler("IOException", "FileNotFoundException", false)]
fn handlers_catch_through_the_base_chain(
    #[case] thrown: &str,
    #[case] caught: &str,
    #[case] reported: bool,
) {
    let mut fx = Fixture::with_standard_exceptions();
    fx.begin_method("Parse", &[]);
    fx.begin_try();
    fx.throw(&New::of(thrown));
    fx.begin_catch(&Catch::of(caught));
    let unit = fx.finish().expect("fixture");
    assert_eq!(run(ExceptionDrivenLogic, &unit).len(), usize::from(reported));
}

#[test]
fn sites_are_attributed_to_the_first_capturing_handler() {
    let mut fx = Fixture::with_standard_exceptions();
    fx.begin_method("Parse", &[]);
    fx.begin_try();
    let file = fx.throw(&New::of("FileNotFoundException"));
    let format = fx.throw(&New::of("FormatException"));
    let null = fx.throw(&New::of("ArgumentNullException"));
    let io = fx.begin_catch(&Catch::of("IOException"));
    let argument = fx.begin_catch(&Catch::of("ArgumentException"));
    let all = fx.begin_catch(&Catch::all());
    let unit = fx.finish().expect("fixture");

    let span = |id| unit.tree.span(id);
    let operand = |thrown: &Thrown| thrown.operand.expect("operand");
    assert_eq!(
        attributions(&run(ExceptionDrivenLogic, &unit)),
        vec![
            (operand(&file), span(io)),
            (operand(&null), span(argument)),
            (operand(&format), span(all)),
        ]
    );
}

#[test]
fn catch_all_ends_the_search() {
    let mut fx = Fixture::with_standard_exceptions();
    fx.begin_method("Parse", &[]);
    fx.begin_try();
    fx.throw(&New::of("FormatException"));
    fx.throw(&New::of("IOException"));
    let all = fx.begin_catch(&Catch::all());
    fx.begin_catch(&Catch::of("FormatException"));
    let unit = fx.finish().expect("fixture");

    let diagnostics = run(ExceptionDrivenLogic, &unit);
    assert_eq!(diagnostics.len(), 2);
    assert!(diagnostics.iter().all(|d| d.related() == unit.tree.span(all)));
}

#[test]
fn unresolved_throws_never_fire() {
    let mut fx = Fixture::with_standard_exceptions();
    fx.begin_method("Parse", &[]);
    fx.begin_try();
    fx.throw(&New::of("UnknownException"));
    fx.throw_identifier("error", None);
    fx.rethrow();
    fx.begin_catch(&Catch::of("Exception"));
    fx.begin_catch(&Catch::all());
    let unit = fx.finish().expect("fixture");
    assert!(run(ExceptionDrivenLogic, &unit).is_empty());
}

#[test]
fn unresolved_handlers_are_skipped() {
    let mut fx = Fixture::with_standard_exceptions();
    fx.begin_method("Parse", &[]);
    fx.begin_try();
    fx.throw(&New::of("FormatException"));
    fx.begin_catch(&Catch::of("ParseFailure"));
    let fallback = fx.begin_catch(&Catch::of("SystemException"));
    let unit = fx.finish().expect("fixture");

    let diagnostics = run(ExceptionDrivenLogic, &unit);
    let related: Vec<_> = diagnostics.iter().map(Diagnostic::related).collect();
    assert_eq!(related, vec![unit.tree.span(fallback)]);
}

#[test]
fn try_without_handlers_is_ignored() {
    let mut fx = Fixture::with_standard_exceptions();
    fx.begin_method("Parse", &[]);
    fx.begin_try();
    fx.throw(&New::of("FormatException"));
    fx.begin_finally();
    let unit = fx.finish().expect("fixture");
    assert!(run(ExceptionDrivenLogic, &unit).is_empty());
}

#[test]
fn throws_in_handlers_belong_to_no_protected_block() {
    let mut fx = Fixture::with_standard_exceptions();
    fx.begin_method("Parse", &[]);
    fx.begin_try();
    fx.statement();
    fx.begin_catch(&Catch::of("Exception").bind("e"));
    fx.throw(&New::of("FormatException"));
    let unit = fx.finish().expect("fixture");
    assert!(run(ExceptionDrivenLogic, &unit).is_empty());
}

#[test]
fn helper_calls_and_throw_expressions_are_sites() {
    let mut fx = Fixture::with_standard_exceptions();
    fx.begin_method("Parse", &[]);
    fx.begin_try();
    let call = fx.throw_call(&Call::to("Invalid").returns("InvalidOperationException"));
    let expr = fx.throw_expression(&New::of("ArgumentNullException"));
    fx.begin_catch(&Catch::of("SystemException"));
    let unit = fx.finish().expect("fixture");

    let nodes: Vec<_> = run(ExceptionDrivenLogic, &unit)
        .iter()
        .map(|d| Some(d.node()))
        .collect();
    assert_eq!(nodes, vec![call.operand, expr.operand]);
}

#[test]
fn nested_try_statements_are_checked_independently() {
    let mut fx = Fixture::with_standard_exceptions();
    fx.begin_method("Parse", &[]);
    fx.begin_try();
    fx.begin_try();
    let inner = fx.throw(&New::of("KeyNotFoundException"));
    let inner_clause = fx.begin_catch(&Catch::of("KeyNotFoundException"));
    fx.end();
    fx.begin_catch(&Catch::of("IOException"));
    let unit = fx.finish().expect("fixture");

    let diagnostics = run(ExceptionDrivenLogic, &unit);
    assert_eq!(
        attributions(&diagnostics),
        vec![(inner.operand.expect("operand"), unit.tree.span(inner_clause))]
    );
}

#[test]
fn throw_handled_by_an_inner_try_is_reported_once() {
    let mut fx = Fixture::with_standard_exceptions();
    fx.begin_method("Parse", &[]);
    fx.begin_try();
    fx.begin_try();
    let inner = fx.throw(&New::of("FormatException"));
    let inner_clause = fx.begin_catch(&Catch::of("FormatException"));
    fx.end();
    fx.begin_catch(&Catch::of("Exception"));
    let unit = fx.finish().expect("fixture");

    let diagnostics = run(ExceptionDrivenLogic, &unit);
    assert_eq!(
        attributions(&diagnostics),
        vec![(inner.operand.expect("operand"), unit.tree.span(inner_clause))]
    );
}

#[test]
fn throw_escaping_an_inner_try_belongs_to_the_outer_handler() {
    let mut fx = Fixture::with_standard_exceptions();
    fx.begin_method("Parse", &[]);
    fx.begin_try();
    fx.begin_try();
    let escaping = fx.throw(&New::of("FormatException"));
    fx.begin_catch(&Catch::of("IOException"));
    let from_handler = fx.throw(&New::of("KeyNotFoundException"));
    fx.end();
    let outer_clause = fx.begin_catch(&Catch::of("Exception"));
    let unit = fx.finish().expect("fixture");

    let diagnostics = run(ExceptionDrivenLogic, &unit);
    assert_eq!(
        attributions(&diagnostics),
        vec![
            (escaping.operand.expect("operand"), unit.tree.span(outer_clause)),
            (from_handler.operand.expect("operand"), unit.tree.span(outer_clause)),
        ]
    );
}

#[rstest]
#[case::lambda(SyntaxKind::Lambda)]
#[case::local_function(SyntaxKind::LocalFunction)]
fn deferred_bodies_are_not_protected(#[case] kind: SyntaxKind) {
    let mut fx = Fixture::with_standard_exceptions();
    fx.begin_method("Parse", &[]);
    fx.begin_try();
    if kind == SyntaxKind::LocalFunction {
        fx.begin_member(kind, "Fail", &[]);
    } else {
        fx.begin(kind);
    }
    fx.throw(&New::of("FormatException"));
    fx.end();
    let direct = fx.throw(&New::of("FormatException"));
    fx.begin_catch(&Catch::of("FormatException"));
    let unit = fx.finish().expect("fixture");

    let nodes: Vec<_> = run(ExceptionDrivenLogic, &unit)
        .iter()
        .map(|d| Some(d.node()))
        .collect();
    assert_eq!(nodes, vec![direct.operand]);
}
