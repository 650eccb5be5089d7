mod enumerables;
mod generics;
mod object_arguments;
mod parameter_arrays;
mod properties;

use decoy::{Call, CallSpecification, MatchingContext, Method, Parameter, Type};

pub fn fake_type(name: &'static str) -> Type {
    Type::reference(name)
}

/// `Foo.Bar(baz: ty)`
pub fn bar(ty: Type) -> Method {
    Method::new(fake_type("Foo"), "Bar", [Parameter::new("baz", ty)])
}

pub fn matching(spec: &CallSpecification, calls: &[Call]) -> usize {
    decoy::assertion::count_matching(spec, calls).unwrap()
}

pub fn context() -> MatchingContext {
    MatchingContext::default()
}
