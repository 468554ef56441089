//! Tests for the `Engine` type.

use exlint_core::test_support::{Arg, Catch, Fixture, FixtureUnit, New};
use rstest::{fixture, rstest};

use crate::{
    AnalysisUnit, ConfigError, Engine, EngineConfig, EngineError, RuleRegistry, Severity,
};

/// Three generic throws outside any `try`, each tripping EX001 and EX002.
#[fixture]
fn generic_throws() -> FixtureUnit {
    let mut fx = Fixture::with_standard_exceptions();
    fx.begin_method("Save", &[]);
    for _ in 0..3 {
        fx.throw(&New::of("Exception"));
    }
    fx.finish().expect("fixture")
}

#[test]
fn engine_new_with_default_config() {
    let engine = Engine::new(EngineConfig::default()).expect("default engine");
    assert_eq!(engine.config().max_diagnostics_per_unit(), 10_000);
    assert_eq!(engine.registry().len(), 5);
}

#[test]
fn unknown_rule_id_is_rejected() {
    let err = Engine::new(EngineConfig::default().with_disabled_rule("EX042"))
        .expect_err("unknown id should fail");
    assert!(matches!(err, EngineError::UnknownRule { ref id } if id == "EX042"));
    assert_eq!(err.to_string(), "configuration refers to unknown rule 'EX042'");
}

#[test]
fn invalid_config_is_rejected() {
    let err = Engine::new(EngineConfig::default().with_max_diagnostics_per_unit(0))
        .expect_err("zero cap should fail");
    assert!(matches!(
        err,
        EngineError::Config(ConfigError::InvalidValue {
            field: "max_diagnostics_per_unit",
            ..
        })
    ));
}

#[rstest]
#[case::malformed("{ not json")]
#[case::unknown_field(r#"{ "max_matches": 3 }"#)]
fn malformed_json_config_is_rejected(#[case] document: &str) {
    let err = Engine::from_json_config(document).expect_err("parse should fail");
    assert!(matches!(err, EngineError::Config(ConfigError::Parse { .. })));
}

#[test]
fn json_config_is_applied() {
    let engine = Engine::from_json_config(r#"{ "disabled_rules": ["EX006"] }"#)
        .expect("valid document");
    assert!(engine.config().is_rule_disabled("EX006"));
}

#[rstest]
fn default_engine_reports_every_generic_throw(generic_throws: FixtureUnit) {
    let engine = Engine::new(EngineConfig::default()).expect("engine");
    let diagnostics = engine.analyze(&generic_throws.tree, &generic_throws.model);
    let ids: Vec<_> = diagnostics.iter().map(|d| d.rule_id()).collect();
    assert_eq!(ids, ["EX001", "EX002"].repeat(3));
}

#[rstest]
fn cap_truncates_and_counts_dropped(generic_throws: FixtureUnit) {
    let engine = Engine::new(EngineConfig::default().with_max_diagnostics_per_unit(4))
        .expect("engine");
    let report = engine.analyze_unit(&AnalysisUnit::new(
        "Save.cs",
        &generic_throws.tree,
        &generic_throws.model,
    ));
    assert_eq!(report.unit(), "Save.cs");
    assert_eq!(report.diagnostics().len(), 4);
    assert_eq!(report.truncated(), 2);
}

#[rstest]
fn severity_override_is_applied(generic_throws: FixtureUnit) {
    let config = EngineConfig::default()
        .with_disabled_rule("EX002")
        .with_severity("EX001", Severity::Info);
    let engine = Engine::new(config).expect("engine");
    let diagnostics = engine.analyze(&generic_throws.tree, &generic_throws.model);
    assert_eq!(diagnostics.len(), 3);
    assert!(diagnostics.iter().all(|d| d.severity() == Severity::Info));
}

#[test]
fn analysis_is_deterministic() {
    let mut fx = Fixture::with_standard_exceptions();
    fx.begin_method("Load", &[("String", "path")]);
    fx.begin_try();
    fx.throw(&New::of("FormatException"));
    fx.begin_catch(&Catch::of("FormatException").bind("ex"));
    fx.throw(&New::of("Exception").args([Arg::string("failed")]));
    let unit = fx.finish().expect("fixture");

    let engine = Engine::new(EngineConfig::default()).expect("engine");
    let first = engine.analyze(&unit.tree, &unit.model);
    let second = engine.analyze(&unit.tree, &unit.model);
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[rstest]
fn batch_reports_follow_input_order(generic_throws: FixtureUnit) {
    let mut fx = Fixture::with_standard_exceptions();
    fx.begin_method("Noop", &[]);
    fx.statement();
    let clean = fx.finish().expect("fixture");

    let engine = Engine::new(EngineConfig::default()).expect("engine");
    let units = [
        AnalysisUnit::new("a.cs", &generic_throws.tree, &generic_throws.model),
        AnalysisUnit::new("b.cs", &clean.tree, &clean.model),
        AnalysisUnit::new("c.cs", &generic_throws.tree, &generic_throws.model),
    ];
    let reports = engine.analyze_batch(&units);
    let summary: Vec<_> = reports
        .iter()
        .map(|r| (r.unit(), r.diagnostics().len()))
        .collect();
    assert_eq!(summary, vec![("a.cs", 6), ("b.cs", 0), ("c.cs", 6)]);
}

#[test]
fn custom_registry_limits_the_rule_set() {
    let mut registry = RuleRegistry::new();
    registry
        .register(Box::new(crate::GenericExceptionType))
        .expect("register");
    let engine = Engine::with_registry(registry, EngineConfig::default()).expect("engine");
    assert!(
        Engine::with_registry(RuleRegistry::new(), EngineConfig::default().with_disabled_rule("EX001"))
            .is_err()
    );

    let mut fx = Fixture::with_standard_exceptions();
    fx.begin_method("Save", &[]);
    fx.throw(&New::of("SystemException"));
    let unit = fx.finish().expect("fixture");
    let ids: Vec<_> = engine
        .analyze(&unit.tree, &unit.model)
        .iter()
        .map(|d| d.rule_id().to_owned())
        .collect();
    assert_eq!(ids, vec![String::from("EX001")]);
}

#[test]
fn analysis_unit_debug_names_the_unit() {
    let unit = Fixture::new().finish().expect("fixture");
    let rendered = format!("{:?}", AnalysisUnit::new("x.cs", &unit.tree, &unit.model));
    assert!(rendered.contains("x.cs"));
}
