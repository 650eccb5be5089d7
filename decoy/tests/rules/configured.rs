use decoy::{
    must_have_happened, must_not_have_happened, Call, CallRule, ConfiguredRule,
    ConstraintManagerExt, MatchingContext, Method, Parameter, RuleSet, TimesRange, Type, Value,
};

use super::save;

/// `Store.TryLoad(id: i32, ref version: i32, out name: String)`
fn try_load() -> Method {
    Method::new(
        Type::reference("Store"),
        "TryLoad",
        [
            Parameter::new("id", Type::i32()),
            Parameter::new("version", Type::i32()).by_ref(),
            Parameter::new("name", Type::string()).out(),
        ],
    )
}

#[test]
fn capped_rule_yields_to_earlier_rule() {
    let context = MatchingContext::default();
    let any_save = || {
        context
            .specification(save())
            .constraint(context.that::<i32>().ignored())
            .constraint(context.that::<String>().ignored())
            .build()
            .unwrap()
    };

    let fallback = ConfiguredRule::new(any_save());
    let capped = ConfiguredRule::new(any_save()).number_of_times(2);

    assert_eq!(fallback.number_of_times_to_call(), None);
    assert_eq!(capped.number_of_times_to_call(), Some(2));

    let rules = RuleSet::new();
    rules.add(fallback);
    rules.add(capped);
    assert_eq!(rules.len(), 2);

    let call = Call::new(save(), [Value::from(1), Value::from("a")]);
    for _ in 0..4 {
        assert!(rules.apply(&call).unwrap().is_some());
    }
}

#[test]
fn exhausted_rule_is_not_applicable() {
    let context = MatchingContext::default();
    let rule = ConfiguredRule::new(
        context
            .specification(save())
            .value(1)
            .value("a")
            .build()
            .unwrap(),
    )
    .number_of_times(1);

    let call = Call::new(save(), [Value::from(1), Value::from("a")]);

    assert!(rule.is_applicable_to(&call).unwrap());
    rule.apply(&call).unwrap();
    assert_eq!(rule.applied(), 1);
    assert!(!rule.is_applicable_to(&call).unwrap());
}

#[test]
fn out_and_ref_values_are_assigned() {
    let context = MatchingContext::default();
    let rules = RuleSet::new();
    rules.add(ConfiguredRule::new(
        context
            .specification(try_load())
            .value(7)
            .value(3)
            .value("seven")
            .build()
            .unwrap(),
    ));

    let assignments = rules
        .apply(&Call::new(
            try_load(),
            [Value::from(7), Value::from(3), Value::Null],
        ))
        .unwrap()
        .unwrap();

    assert_eq!(
        assignments,
        vec![(1, Value::from(3)), (2, Value::from("seven"))]
    );

    let other = Call::new(try_load(), [Value::from(7), Value::from(4), Value::Null]);
    assert!(rules.apply(&other).unwrap().is_none());
}

#[test]
fn unmatched_call_is_not_reported() {
    let context = MatchingContext::default();
    let spec = context
        .specification(save())
        .value(1)
        .constraint(context.that::<String>().starts_with("x"))
        .build()
        .unwrap();

    let calls = [
        Call::new(save(), [Value::from(1), Value::from("abc")]),
        Call::new(save(), [Value::from(2), Value::from("xyz")]),
    ];

    must_not_have_happened(&spec, &calls).unwrap();
    assert!(must_have_happened(&spec, &calls, TimesRange::once_or_more()).is_err());
}

#[test]
fn matched_call_is_reported() {
    let context = MatchingContext::default();
    let spec = context
        .specification(save())
        .constraint(context.that::<i32>().greater_than(0))
        .constraint(context.that::<String>().ignored())
        .build()
        .unwrap();

    let calls = [
        Call::new(save(), [Value::from(1), Value::from("abc")]),
        Call::new(save(), [Value::from(0), Value::from("xyz")]),
    ];

    must_have_happened(&spec, &calls, 1_usize).unwrap();

    let err = must_not_have_happened(&spec, &calls).unwrap_err();
    assert_eq!(
        err.to_string(),
        r#"

  Assertion failed for the following call:
    Store.Save(id: <greater than 0>, name: <Ignored>)
  Expected to find it never but found it once among the calls:
    1: Store.Save(id: 1, name: "abc")
    2: Store.Save(id: 0, name: "xyz")

"#
    );
}
