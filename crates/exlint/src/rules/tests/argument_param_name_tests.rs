//! Tests for EX005.

use exlint_core::test_support::{Arg, Fixture, FixtureUnit, New, Thrown};
use exlint_core::{ConstantValue, NodeId, SyntaxKind};
use rstest::rstest;

use super::{ids, run};
use crate::rules::ArgumentParamName;

const MESSAGE_AND_NAME: [(&str, &str); 2] = [("String", "message"), ("String", "paramName")];

fn argument_exception<'a>(args: impl IntoIterator<Item = Arg<'a>>) -> New<'a> {
    New::of("ArgumentException")
        .args(args)
        .constructor(MESSAGE_AND_NAME)
}

/// `void Resize(int count) { throw <creation>; }`
fn in_method(creation: &New<'_>) -> (FixtureUnit, Thrown) {
    let mut fx = Fixture::with_standard_exceptions();
    fx.begin_method("Resize", &[("Int32", "count")]);
    let thrown = fx.throw(creation);
    (fx.finish().expect("fixture"), thrown)
}

fn expression_of(unit: &FixtureUnit, argument: Option<&NodeId>) -> Option<NodeId> {
    argument.and_then(|&arg| unit.tree.children(arg).first().copied())
}

#[rstest]
#[case::literal(Arg::string("count"))]
#[case::name_of(Arg::name_of("count"))]
fn declared_parameter_is_accepted(#[case] name: Arg<'static>) {
    let (unit, _) = in_method(&argument_exception([Arg::string("bad"), name]));
    assert!(run(ArgumentParamName, &unit).is_empty());
}

#[rstest]
#[case::literal(Arg::string("limit"))]
#[case::name_of(Arg::name_of("limit"))]
fn undeclared_parameter_is_reported_at_the_argument(#[case] name: Arg<'static>) {
    let (unit, thrown) = in_method(&argument_exception([Arg::string("bad"), name]));
    let diagnostics = run(ArgumentParamName, &unit);
    assert_eq!(ids(&diagnostics), vec!["EX005"]);
    let diag = diagnostics.first().expect("diagnostic");
    assert_eq!(diag.message(), "containing method does not declare 'limit' parameter");
    assert_eq!(Some(diag.node()), expression_of(&unit, thrown.arguments.get(1)));
}

#[test]
fn named_argument_is_found_out_of_position() {
    let (unit, thrown) = in_method(&argument_exception([
        Arg::string("limit").named("paramName"),
        Arg::string("count").named("message"),
    ]));
    let diagnostics = run(ArgumentParamName, &unit);
    assert_eq!(ids(&diagnostics), vec!["EX005"]);
    assert_eq!(
        diagnostics.first().map(|d| d.node()),
        expression_of(&unit, thrown.arguments.first())
    );
}

#[test]
fn positional_slot_naming_another_parameter_is_skipped() {
    let (unit, _) = in_method(&argument_exception([
        Arg::string("bad"),
        Arg::string("limit").named("message"),
    ]));
    assert!(run(ArgumentParamName, &unit).is_empty());
}

#[test]
fn constants_are_rendered_for_the_comparison() {
    let (unit, _) = in_method(&argument_exception([Arg::string("bad"), Arg::int(42)]));
    let diagnostics = run(ArgumentParamName, &unit);
    assert_eq!(
        diagnostics.first().map(|d| d.message().to_owned()),
        Some(String::from("containing method does not declare '42' parameter"))
    );
}

#[rstest]
#[case::not_constant(argument_exception([Arg::string("bad"), Arg::member("request.Name")]))]
#[case::missing_argument(argument_exception([Arg::string("bad")]))]
#[case::unresolved_constructor(New::of("ArgumentException").args([Arg::string("bad"), Arg::string("limit")]))]
#[case::no_param_name(
    New::of("ArgumentException")
        .args([Arg::string("bad"), Arg::string("limit")])
        .constructor([("String", "message"), ("Exception", "innerException")])
)]
fn unverifiable_arguments_are_skipped(#[case] creation: New<'static>) {
    let (unit, _) = in_method(&creation);
    assert!(run(ArgumentParamName, &unit).is_empty());
}

#[test]
fn null_constant_is_skipped() {
    let mut fx = Fixture::with_standard_exceptions();
    fx.begin_method("Resize", &[("Int32", "count")]);
    let thrown = fx.throw(&argument_exception([Arg::string("bad"), Arg::member("null")]));
    let expression = thrown
        .arguments
        .get(1)
        .map(|arg| NodeId::from_raw(arg.raw() + 1))
        .expect("argument expression");
    fx.model_mut().bind_constant(expression, ConstantValue::Null);
    let unit = fx.finish().expect("fixture");
    assert!(run(ArgumentParamName, &unit).is_empty());
}

#[test]
fn throw_outside_any_member_is_skipped() {
    let mut fx = Fixture::with_standard_exceptions();
    fx.throw(&argument_exception([Arg::string("bad"), Arg::string("limit")]));
    let unit = fx.finish().expect("fixture");
    assert!(run(ArgumentParamName, &unit).is_empty());
}

#[test]
fn local_function_sees_the_enclosing_member_parameters() {
    let mut fx = Fixture::with_standard_exceptions();
    fx.begin_member(SyntaxKind::ConstructorDeclaration, "Buffer", &[("Int32", "size")]);
    fx.throw(&argument_exception([Arg::string("bad"), Arg::string("size")]));
    fx.begin_member(SyntaxKind::LocalFunction, "Check", &[("Int32", "index")]);
    fx.throw(&argument_exception([Arg::string("bad"), Arg::string("index")]));
    fx.throw(&argument_exception([Arg::string("bad"), Arg::string("size")]));
    let undeclared = fx.throw(&argument_exception([Arg::string("bad"), Arg::string("offset")]));
    let unit = fx.finish().expect("fixture");

    let diagnostics = run(ArgumentParamName, &unit);
    assert_eq!(ids(&diagnostics), vec!["EX005"]);
    assert_eq!(
        diagnostics.first().map(|d| d.node()),
        expression_of(&unit, undeclared.arguments.get(1))
    );
}

#[test]
fn local_function_parameters_stay_inside_it() {
    let mut fx = Fixture::with_standard_exceptions();
    fx.begin_method("Resize", &[("Int32", "count")]);
    fx.begin_member(SyntaxKind::LocalFunction, "Check", &[("Int32", "index")]);
    fx.end();
    let outside = fx.throw(&argument_exception([Arg::string("bad"), Arg::string("index")]));
    let unit = fx.finish().expect("fixture");

    let diagnostics = run(ArgumentParamName, &unit);
    assert_eq!(ids(&diagnostics), vec!["EX005"]);
    assert_eq!(
        diagnostics.first().map(|d| d.node()),
        expression_of(&unit, outside.arguments.get(1))
    );
}

#[test]
fn parameter_names_match_exactly() {
    let (unit, _) = in_method(&argument_exception([Arg::string("bad"), Arg::string("Count")]));
    assert_eq!(ids(&run(ArgumentParamName, &unit)), vec!["EX005"]);
}

#[test]
fn argument_null_exception_shape() {
    let (unit, _) = in_method(
        &New::of("ArgumentNullException")
            .args([Arg::name_of("items")])
            .constructor([("String", "paramName")]),
    );
    let diagnostics = run(ArgumentParamName, &unit);
    assert_eq!(
        diagnostics.first().map(|d| d.message().to_owned()),
        Some(String::from("containing method does not declare 'items' parameter"))
    );
}
