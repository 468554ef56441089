//! Tests for EX002.

use exlint_core::NodeId;
use exlint_core::test_support::{Arg, Call, Fixture, FixtureUnit, New};
use rstest::rstest;

use super::{ids, run};
use crate::rules::ContextAwareConstructor;

fn single_throw(creation: &New<'_>) -> (FixtureUnit, Option<NodeId>) {
    let mut fx = Fixture::with_standard_exceptions();
    fx.begin_method("Run", &[]);
    let thrown = fx.throw(creation);
    (fx.finish().expect("fixture"), thrown.operand)
}

#[rstest]
#[case::resolved_type("FormatException")]
#[case::unresolved_type("UnknownException")]
#[case::generic_type("Exception")]
fn parameterless_construction_is_always_reported(#[case] type_name: &str) {
    let (unit, operand) = single_throw(&New::of(type_name));
    let diagnostics = run(ContextAwareConstructor, &unit);
    assert_eq!(ids(&diagnostics), vec!["EX002"]);
    assert_eq!(diagnostics.first().map(|d| d.node()), operand);
}

#[test]
fn missing_argument_list_counts_as_parameterless() {
    let (unit, _) = single_throw(&New::of("FormatException").without_argument_list());
    assert_eq!(ids(&run(ContextAwareConstructor, &unit)), vec!["EX002"]);
}

#[rstest]
#[case::message(vec![Arg::string("m")], vec![("String", "message")])]
#[case::keyword_spelling(vec![Arg::string("m")], vec![("string", "message")])]
#[case::qualified(vec![Arg::string("m")], vec![("System.String", "message")])]
#[case::message_and_cause(
    vec![Arg::string("m"), Arg::ident("ex")],
    vec![("String", "message"), ("Exception", "innerException")]
)]
#[case::serialization(
    vec![Arg::ident("info"), Arg::ident("context")],
    vec![("SerializationInfo", "info"), ("StreamingContext", "context")]
)]
fn forbidden_shapes_are_reported(
    #[case] args: Vec<Arg<'static>>,
    #[case] ctor: Vec<(&'static str, &'static str)>,
) {
    let (unit, operand) = single_throw(&New::of("FormatException").args(args).constructor(ctor));
    let diagnostics = run(ContextAwareConstructor, &unit);
    assert_eq!(ids(&diagnostics), vec!["EX002"]);
    assert_eq!(diagnostics.first().map(|d| d.node()), operand);
}

#[rstest]
#[case::other_single(vec![Arg::int(404)], vec![("Int32", "code")])]
#[case::two_strings(
    vec![Arg::string("m"), Arg::string("name")],
    vec![("String", "message"), ("String", "paramName")]
)]
#[case::swapped(
    vec![Arg::ident("ex"), Arg::string("m")],
    vec![("Exception", "innerException"), ("String", "message")]
)]
fn other_shapes_are_allowed(
    #[case] args: Vec<Arg<'static>>,
    #[case] ctor: Vec<(&'static str, &'static str)>,
) {
    let (unit, _) = single_throw(&New::of("FormatException").args(args).constructor(ctor));
    assert!(run(ContextAwareConstructor, &unit).is_empty());
}

#[rstest]
#[case::one(vec![Arg::string("m")])]
#[case::two(vec![Arg::string("m"), Arg::ident("ex")])]
fn unresolved_constructors_are_not_compared(#[case] args: Vec<Arg<'static>>) {
    let (unit, _) = single_throw(&New::of("FormatException").args(args));
    assert!(run(ContextAwareConstructor, &unit).is_empty());
}

#[rstest]
#[case::resolved(true)]
#[case::unresolved(false)]
fn three_or_more_arguments_are_never_reported(#[case] resolved: bool) {
    let creation = New::of("FormatException").args([
        Arg::string("m"),
        Arg::member("request.Id"),
        Arg::ident("ex"),
    ]);
    let bound = if resolved {
        creation.constructor([
            ("String", "message"),
            ("String", "requestId"),
            ("Exception", "innerException"),
        ])
    } else {
        creation
    };
    let (unit, _) = single_throw(&bound);
    assert!(run(ContextAwareConstructor, &unit).is_empty());
}

#[test]
fn throw_expressions_and_helper_calls() {
    let mut fx = Fixture::with_standard_exceptions();
    fx.begin_method("Run", &[]);
    let thrown = fx.throw_expression(&New::of("ArgumentNullException"));
    fx.throw_call(&Call::to("Fail"));
    let unit = fx.finish().expect("fixture");

    let diagnostics = run(ContextAwareConstructor, &unit);
    let nodes: Vec<_> = diagnostics.iter().map(|d| Some(d.node())).collect();
    assert_eq!(nodes, vec![thrown.operand]);
}
