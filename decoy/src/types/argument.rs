use super::{Type, Value};

/// Bridges a Rust type to the [`Type`] descriptor used for matching and
/// extracts typed views from untyped argument values.
///
/// Typed argument constraints are declared over implementors of this trait.
pub trait ArgumentType: Sized + 'static {
    /// Descriptor of the implementing type.
    fn argument_type() -> Type;

    /// Extract a typed view of the passed `value`. Returns `None` if the value
    /// is not representable as `Self`.
    fn from_argument(value: &Value) -> Option<Self>;
}

macro_rules! impl_argument_type {
    ($type:ty, $ctor:ident, $variant:ident) => {
        impl ArgumentType for $type {
            fn argument_type() -> Type {
                Type::$ctor()
            }

            fn from_argument(value: &Value) -> Option<Self> {
                match value {
                    Value::$variant(x) => Some(x.clone()),
                    _ => None,
                }
            }
        }
    };
}

impl_argument_type!(bool, bool, Bool);
impl_argument_type!(i32, i32, I32);
impl_argument_type!(i64, i64, I64);
impl_argument_type!(u8, u8, U8);
impl_argument_type!(f64, f64, F64);
impl_argument_type!(char, char, Char);
impl_argument_type!(String, string, Str);

/// The untyped argument, accepts everything including `null`.
impl ArgumentType for Value {
    fn argument_type() -> Type {
        Type::object()
    }

    fn from_argument(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl<T> ArgumentType for Option<T>
where
    T: ArgumentType,
{
    fn argument_type() -> Type {
        Type::nullable(T::argument_type())
    }

    fn from_argument(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            value => T::from_argument(value).map(Some),
        }
    }
}

impl<T> ArgumentType for Vec<T>
where
    T: ArgumentType,
{
    fn argument_type() -> Type {
        Type::sequence(T::argument_type())
    }

    fn from_argument(value: &Value) -> Option<Self> {
        value
            .elements()?
            .iter()
            .map(T::from_argument)
            .collect::<Option<Vec<_>>>()
    }
}
