use decoy::wildcard::ReferenceTypeMatcher;
use decoy::{AnyType, Call, ConstraintManagerExt, MatchingContext, Method, Parameter, Type, Value};

use super::{context, fake_type, matching};

/// `Foo.Bar<T>(baz: T)`
fn generic_bar(t: Type) -> Method {
    Method::new(fake_type("Foo"), "Bar", [Parameter::new("baz", t.clone())]).with_generic_args([t])
}

fn calls() -> Vec<Call> {
    vec![
        Call::new(generic_bar(Type::i32()), [1]),
        Call::new(generic_bar(Type::string()), ["text"]),
        Call::new(
            generic_bar(Type::reference("Widget")),
            [Value::Null],
        ),
    ]
}

#[test]
fn any_type_matches_every_instantiation() {
    let context = context();
    let spec = context
        .specification(generic_bar(AnyType::ty()))
        .constraint(context.that::<AnyType>().ignored())
        .build()
        .unwrap();

    assert_eq!(matching(&spec, &calls()), 3);
    assert_eq!(spec.description().unwrap(), "Foo.Bar<AnyType>(baz: <Ignored>)");
}

#[test]
fn concrete_type_only_matches_its_instantiation() {
    let context = context();
    let spec = context
        .specification(generic_bar(Type::string()))
        .constraint(context.that::<String>().ignored())
        .build()
        .unwrap();

    assert_eq!(matching(&spec, &calls()), 1);
}

#[test]
fn custom_wildcard_restricted_to_reference_types() {
    let any_reference = Type::reference("AnyReference");
    let context = MatchingContext::builder()
        .wildcard(any_reference.clone(), ReferenceTypeMatcher)
        .build()
        .unwrap();
    let spec = context
        .specification(generic_bar(any_reference))
        .constraint(context.any_type::<Value>().ignored())
        .build()
        .unwrap();

    assert_eq!(matching(&spec, &calls()), 1);
}

#[test]
fn wildcard_matching_is_symmetric() {
    let context = context();
    let matcher = context.matcher();

    assert!(matcher.are_matching_types(&AnyType::ty(), &Type::string()).unwrap());
    assert!(matcher.are_matching_types(&Type::string(), &AnyType::ty()).unwrap());
    assert!(!matcher.are_matching_types(&Type::string(), &Type::i32()).unwrap());
}

#[test]
fn generic_definition_declared_as_wildcard() {
    let holder = Type::reference("AnyHolder").with_args([Type::object()]);
    let context = MatchingContext::builder()
        .wildcard(Type::reference("AnyHolder"), |ty: &Type| ty.name().ends_with("Holder"))
        .build()
        .unwrap();

    assert!(context
        .matcher()
        .are_matching_types(&holder, &Type::reference("IntHolder"))
        .unwrap());
    assert!(!context
        .matcher()
        .are_matching_types(&holder, &Type::reference("Widget"))
        .unwrap());
}

#[test]
fn typed_constraint_on_generic_argument() {
    let context = context();
    let spec = context
        .specification(generic_bar(AnyType::ty()))
        .constraint(context.that::<i32>().greater_than(0))
        .build()
        .unwrap();

    assert_eq!(matching(&spec, &calls()), 1);
}

/// `Foo.Bar<T>(items: Vec<T>)`
fn generic_bar_of_items(t: Type) -> Method {
    Method::new(
        fake_type("Foo"),
        "Bar",
        [Parameter::new("items", Type::sequence(t.clone()))],
    )
    .with_generic_args([t])
}

/// `Foo.Find<T>(key: Option<T>)`
fn generic_find(t: Type) -> Method {
    Method::new(
        fake_type("Foo"),
        "Find",
        [Parameter::new("key", Type::nullable(t.clone()))],
    )
    .with_generic_args([t])
}

#[test]
fn any_type_matches_sequence_of_generic_argument() {
    let calls = [
        Call::new(generic_bar_of_items(Type::i32()), [vec![1, 2]]),
        Call::new(generic_bar_of_items(Type::string()), [vec!["a".to_owned()]]),
    ];
    let context = context();

    let typed = context
        .specification(generic_bar_of_items(AnyType::ty()))
        .constraint(context.that::<AnyType>().ignored())
        .build()
        .unwrap();
    let untyped = context
        .specification(generic_bar_of_items(AnyType::ty()))
        .constraint(context.any_type::<Value>().ignored())
        .build()
        .unwrap();
    let concrete = context
        .specification(generic_bar_of_items(Type::string()))
        .constraint(context.that::<Vec<String>>().ignored())
        .build()
        .unwrap();

    assert_eq!(matching(&typed, &calls), 2);
    assert_eq!(matching(&untyped, &calls), 2);
    assert_eq!(matching(&concrete, &calls), 1);
}

#[test]
fn any_type_matches_nullable_generic_argument() {
    let calls = [
        Call::new(generic_find(Type::i32()), [Value::from(1)]),
        Call::new(generic_find(Type::i32()), [Value::Null]),
        Call::new(generic_find(Type::reference("Widget")), [Value::Null]),
    ];
    let context = context();

    let typed = context
        .specification(generic_find(AnyType::ty()))
        .constraint(context.that::<AnyType>().ignored())
        .build()
        .unwrap();
    let untyped = context
        .specification(generic_find(AnyType::ty()))
        .constraint(context.any_type::<Value>().is_null())
        .build()
        .unwrap();

    assert_eq!(matching(&typed, &calls), 3);
    assert_eq!(matching(&untyped, &calls), 2);
}

#[test]
fn failing_wildcard_matcher_is_reported() {
    let picky = Type::reference("Picky");
    let context = MatchingContext::builder()
        .wildcard(picky.clone(), |_: &Type| -> bool { panic!("no opinion") })
        .build()
        .unwrap();
    let spec = context
        .specification(generic_bar(picky))
        .constraint(context.any_type::<Value>().ignored())
        .build()
        .unwrap();

    let err = spec
        .matches(&Call::new(generic_bar(Type::i32()), [1]))
        .unwrap_err();

    assert!(err.is_user_callback());
    assert_eq!(
        err.to_string(),
        "Wildcard type matcher of Picky failed. See the source error for details."
    );
}
