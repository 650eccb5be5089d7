use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

use crate::error::BoxError;

use super::Type;

/// Argument value of an intercepted call or an expected value of a call
/// specification.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    I32(i32),
    I64(i64),
    U8(u8),
    F64(f64),
    Char(char),
    Str(String),
    Seq(Sequence),
    Object(Arc<dyn ObjectArgument>),
}

/// Ordered collection of argument values with a declared element type.
#[derive(Debug, Clone)]
pub struct Sequence {
    element: Type,
    items: Vec<Value>,
}

/// Capability a user defined type has to implement to be passed as an argument.
pub trait ObjectArgument: Debug + Send + Sync + 'static {
    /// Runtime type of the object.
    fn runtime_type(&self) -> Type;

    /// Returns `true` if `other` is equal to this object.
    ///
    /// Defaults to reference equality.
    fn equals(&self, other: &dyn ObjectArgument) -> bool {
        std::ptr::addr_eq(self as *const Self, other as *const dyn ObjectArgument)
    }

    /// Human readable representation of the object.
    ///
    /// # Errors
    /// Returns an error if the object could not be rendered.
    fn render(&self) -> Result<String, BoxError> {
        Ok(self.runtime_type().to_string())
    }

    /// Display name of the object if it is itself a test double.
    fn fake_display_name(&self) -> Option<String> {
        None
    }

    fn as_any(&self) -> &dyn Any;
}

impl Value {
    /// Create a new sequence value of the passed `element` type.
    pub fn seq<I>(element: Type, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Self::Seq(Sequence {
            element,
            items: items.into_iter().map(Into::into).collect(),
        })
    }

    /// Wrap a user defined object.
    pub fn object<O: ObjectArgument>(object: O) -> Self {
        Self::Object(Arc::new(object))
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Runtime type of the value, `None` for [`Value::Null`].
    #[must_use]
    pub fn runtime_type(&self) -> Option<Type> {
        Some(match self {
            Self::Null => return None,
            Self::Bool(_) => Type::bool(),
            Self::I32(_) => Type::i32(),
            Self::I64(_) => Type::i64(),
            Self::U8(_) => Type::u8(),
            Self::F64(_) => Type::f64(),
            Self::Char(_) => Type::char(),
            Self::Str(_) => Type::string(),
            Self::Seq(seq) => Type::sequence(seq.element.clone()),
            Self::Object(o) => o.runtime_type(),
        })
    }

    /// Elements of the value if it can be enumerated. Strings enumerate
    /// their chars.
    #[must_use]
    pub fn elements(&self) -> Option<Vec<Value>> {
        match self {
            Self::Seq(seq) => Some(seq.items.clone()),
            Self::Str(s) => Some(s.chars().map(Value::Char).collect()),
            _ => None,
        }
    }

    /// Returns `true` if the value is a sequence or a string.
    #[must_use]
    pub fn is_enumerable(&self) -> bool {
        matches!(self, Self::Seq(_) | Self::Str(_))
    }

    /// Plain equality of two values. Sequences are compared element by
    /// element using this function, objects using [`ObjectArgument::equals`].
    #[must_use]
    pub fn same_as(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::I32(a), Self::I32(b)) => a == b,
            (Self::I64(a), Self::I64(b)) => a == b,
            (Self::U8(a), Self::U8(b)) => a == b,
            (Self::F64(a), Self::F64(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Seq(a), Self::Seq(b)) => {
                a.items.len() == b.items.len()
                    && a.items.iter().zip(&b.items).all(|(a, b)| a.same_as(b))
            }
            (Self::Object(a), Self::Object(b)) => a.equals(&**b),
            (_, _) => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl Sequence {
    #[must_use]
    pub fn element(&self) -> &Type {
        &self.element
    }

    #[must_use]
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

macro_rules! impl_from {
    ($type:ty => $variant:ident) => {
        impl From<$type> for Value {
            fn from(value: $type) -> Self {
                Self::$variant(value)
            }
        }
    };
}

impl_from!(bool => Bool);
impl_from!(i32 => I32);
impl_from!(i64 => I64);
impl_from!(u8 => U8);
impl_from!(f64 => F64);
impl_from!(char => Char);
impl_from!(String => Str);

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T> From<Vec<T>> for Value
where
    T: super::ArgumentType + Into<Value>,
{
    fn from(value: Vec<T>) -> Self {
        Self::seq(T::argument_type(), value)
    }
}
