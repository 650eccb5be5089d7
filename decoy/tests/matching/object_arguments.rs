use std::any::Any;

use decoy::error::BoxError;
use decoy::{
    must_have_happened, Call, MatchingContext, Method, ObjectArgument, Parameter, TimesRange, Type,
    Value,
};

use super::{context, fake_type};

/// Test double passed as argument to another fake.
#[derive(Debug)]
struct FakeArgument {
    name: &'static str,
    broken_render: bool,
}

impl ObjectArgument for FakeArgument {
    fn runtime_type(&self) -> Type {
        Type::reference("IHaveOneGenericParameter")
    }

    fn render(&self) -> Result<String, BoxError> {
        if self.broken_render {
            Err("ToString threw".into())
        } else {
            Ok("rendered".into())
        }
    }

    fn fake_display_name(&self) -> Option<String> {
        Some(format!("Faked {}", self.name))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug)]
struct ToStringThrows;

impl ObjectArgument for ToStringThrows {
    fn runtime_type(&self) -> Type {
        Type::reference("ToStringThrows")
    }

    fn render(&self) -> Result<String, BoxError> {
        Err("ToStringThrows.ToString".into())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn generic_bar(t: Type) -> Method {
    Method::new(fake_type("Foo"), "Bar", [Parameter::new("baz", t.clone())]).with_generic_args([t])
}

fn failure_for(context: &MatchingContext, argument: Value) -> String {
    let ty = argument.runtime_type().unwrap_or_else(Type::object);
    let spec = context
        .specification(generic_bar(ty))
        .value(argument)
        .build()
        .unwrap();

    must_have_happened(&spec, &[], TimesRange::once_or_more())
        .unwrap_err()
        .to_string()
}

#[test]
fn fake_is_described_by_its_display_name() {
    for broken_render in [false, true] {
        let fake = FakeArgument {
            name: "IFoo",
            broken_render,
        };

        let message = failure_for(&context(), Value::object(fake));

        assert!(message.contains("Foo.Bar<IHaveOneGenericParameter>(baz: Faked IFoo)"));
    }
}

#[test]
fn object_with_broken_render_is_described_by_its_type() {
    let message = failure_for(&context(), Value::object(ToStringThrows));

    assert!(message.contains("Foo.Bar<ToStringThrows>(baz: ToStringThrows)"));
}

#[test]
fn objects_are_compared_by_identity() {
    let context = context();
    let argument = Value::object(ToStringThrows);
    let method = generic_bar(Type::reference("ToStringThrows"));
    let spec = context
        .specification(method.clone())
        .value(argument.clone())
        .build()
        .unwrap();

    assert!(spec.matches(&Call::new(method.clone(), [argument])).unwrap());
    assert!(!spec
        .matches(&Call::new(method, [Value::object(ToStringThrows)]))
        .unwrap());
}

#[test]
fn custom_formatter_is_used_for_calls_and_constraints() {
    let widget = Type::reference("ToStringThrows");
    let context = MatchingContext::builder()
        .formatter(widget.clone(), |_| "<a widget>".to_owned())
        .build()
        .unwrap();

    let message = failure_for(&context, Value::object(ToStringThrows));

    assert!(message.contains("(baz: <a widget>)"));
}
