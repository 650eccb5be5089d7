use decoy::{must_have_happened, Call, Method, Parameter, TimesRange, Type, Value};

use super::{context, fake_type, matching};

/// `Action.Invoke(obj: ty)`
fn invoke(ty: Type) -> Method {
    Method::new(fake_type("Action"), "Invoke", [Parameter::new("obj", ty)])
}

fn nested() -> Type {
    Type::sequence(Type::sequence(Type::i32()))
}

#[test]
fn simple_enumerable_matched_by_values() {
    let ty = Type::sequence(Type::i32());
    let calls = [Call::new(invoke(ty.clone()), [vec![1, 2, 3]])];
    let spec = context().specification(invoke(ty)).value(vec![1, 2, 3]).build().unwrap();

    assert_eq!(matching(&spec, &calls), 1);
}

#[test]
fn simple_enumerable_does_not_match_non_enumerable() {
    let calls = [Call::new(invoke(Type::object()), [vec![1, 2, 3]])];
    let spec = context().specification(invoke(Type::object())).value(6).build().unwrap();

    let err = must_have_happened(&spec, &calls, TimesRange::once_or_more()).unwrap_err();

    assert_eq!(
        err.to_string(),
        r#"

  Assertion failed for the following call:
    Action.Invoke(obj: 6)
  Expected to find it once or more but didn't find it among the calls:
    1: Action.Invoke(obj: [1, 2, 3])

"#
    );
}

#[test]
fn nested_enumerable_matched_by_values() {
    let calls = [Call::new(invoke(nested()), [vec![vec![1, 2, 3]]])];
    let spec = context()
        .specification(invoke(nested()))
        .value(vec![vec![1, 2, 3]])
        .build()
        .unwrap();

    assert_eq!(matching(&spec, &calls), 1);
}

#[test]
fn nested_enumerable_mismatched_by_inner_element() {
    let calls = [Call::new(invoke(nested()), [vec![vec![1, 2, 3]]])];
    let spec = context()
        .specification(invoke(nested()))
        .value(vec![vec![1, 4, 3]])
        .build()
        .unwrap();

    let err = must_have_happened(&spec, &calls, TimesRange::once_or_more()).unwrap_err();

    assert_eq!(
        err.to_string(),
        r#"

  Assertion failed for the following call:
    Action.Invoke(obj: [[1, 4, 3]])
  Expected to find it once or more but didn't find it among the calls:
    1: Action.Invoke(obj: [[1, 2, 3]])

"#
    );
}

#[test]
fn nested_enumerable_mismatched_by_length() {
    let calls = [Call::new(invoke(nested()), [vec![vec![1, 2, 3]]])];
    let context = context();

    for expected in [vec![vec![1, 2, 3, 4]], vec![vec![1, 2]]] {
        let spec = context
            .specification(invoke(nested()))
            .value(expected)
            .build()
            .unwrap();

        assert_eq!(matching(&spec, &calls), 0);
    }
}

#[test]
fn strings_and_char_sequences() {
    let ty = Type::sequence(Type::char());
    let context = context();
    let spec = |expected: Value| {
        context
            .specification(invoke(ty.clone()))
            .value(expected)
            .build()
            .unwrap()
    };

    let abc = [Call::new(invoke(ty.clone()), ["abc"])];
    let xyz = [Call::new(invoke(ty.clone()), [vec!['x', 'y', 'z']])];

    assert_eq!(matching(&spec(Value::from("abc")), &abc), 1);
    assert_eq!(matching(&spec(Value::from(vec!['a', 'b', 'c'])), &abc), 1);
    assert_eq!(matching(&spec(Value::from("xyz")), &xyz), 1);
    assert_eq!(matching(&spec(Value::from("def")), &abc), 0);
}
