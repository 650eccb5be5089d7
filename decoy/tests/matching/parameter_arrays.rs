use decoy::specification::Argument;
use decoy::{Call, ConstraintManagerExt, Error, Method, Parameter, Type, Value};

use super::{context, fake_type, matching};

fn strings<const N: usize>(items: [&str; N]) -> Value {
    Value::seq(Type::string(), items)
}

/// `Foo.MethodWithParameterArray(arg: String, args: ...Vec<String>)`
fn method() -> Method {
    Method::new(
        fake_type("Foo"),
        "MethodWithParameterArray",
        [
            Parameter::new("arg", Type::string()),
            Parameter::new("args", Type::sequence(Type::string())).variadic(),
        ],
    )
}

fn call(arg: &str, args: Value) -> Call {
    Call::new(method(), [Value::from(arg), args])
}

#[test]
fn expanded_values() {
    let calls = [call("foo", strings(["bar", "baz"]))];
    let context = context();

    let exact = context
        .specification(method())
        .value("foo")
        .variadic([Value::from("bar"), Value::from("baz")])
        .build()
        .unwrap();
    let shorter = context
        .specification(method())
        .value("foo")
        .variadic([Value::from("bar")])
        .build()
        .unwrap();
    let different = context
        .specification(method())
        .value("foo")
        .variadic([Value::from("qux"), Value::from("baz")])
        .build()
        .unwrap();

    assert_eq!(matching(&exact, &calls), 1);
    assert_eq!(matching(&shorter, &calls), 0);
    assert_eq!(matching(&different, &calls), 0);
}

#[test]
fn expanded_constraints() {
    let calls = [call("foo", strings(["bar", "baz"]))];
    let context = context();
    let that = context.that::<String>();

    let ignored = context
        .specification(method())
        .constraint(that.ignored())
        .variadic([that.ignored(), that.ignored()])
        .build()
        .unwrap();
    let mixed = context
        .specification(method())
        .constraint(that.ignored())
        .variadic([
            Argument::from(that.ignored()),
            Argument::from(Value::from("baz")),
        ])
        .build()
        .unwrap();

    assert_eq!(matching(&ignored, &calls), 1);
    assert_eq!(matching(&mixed, &calls), 1);
    assert_eq!(
        mixed.description().unwrap(),
        "Foo.MethodWithParameterArray(arg: <Ignored>, args: [<Ignored>, \"baz\"])"
    );
}

#[test]
fn packed_arguments() {
    let calls = [call("foo", strings(["bar", "baz"]))];
    let context = context();

    let value = context
        .specification(method())
        .value("foo")
        .value(strings(["bar", "baz"]))
        .build()
        .unwrap();
    let constraint = context
        .specification(method())
        .value("foo")
        .constraint(
            context
                .that::<Vec<String>>()
                .is_same_sequence_as(["bar".to_owned(), "baz".to_owned()]),
        )
        .build()
        .unwrap();

    assert_eq!(matching(&value, &calls), 1);
    assert_eq!(matching(&constraint, &calls), 1);
}

#[test]
fn unused_parameter_array() {
    let calls = [call("foo", strings([]))];
    let context = context();

    let omitted = context.specification(method()).value("foo").build().unwrap();
    let empty = context
        .specification(method())
        .value("foo")
        .value(strings([]))
        .build()
        .unwrap();

    assert_eq!(matching(&omitted, &calls), 1);
    assert_eq!(matching(&empty, &calls), 1);
    assert_eq!(matching(&omitted, &[call("foo", strings(["bar"]))]), 0);
}

#[test]
fn expanded_form_requires_a_variadic_parameter() {
    let err = context()
        .specification(method())
        .variadic([Value::from("foo")])
        .build()
        .unwrap_err();

    assert!(matches!(err, Error::Configuration { .. }));
}

#[test]
fn wrong_element_constraint_type() {
    let context = context();
    let err = context
        .specification(method())
        .value("foo")
        .variadic([context.that::<i32>().ignored()])
        .build()
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Argument constraint is of type i32, but parameter is of type String. No call can match this constraint."
    );
}
