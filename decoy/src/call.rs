//! The [`call`](self) module contains the description of an intercepted call:
//! the called method and the passed arguments.

use std::borrow::Cow;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::error::Result;
use crate::output::{ArgumentValueFormatter, OutputWriter};
use crate::types::{Type, Value};

/// How an argument is passed to a parameter.
#[derive(Default, Debug, Clone, Copy, Eq, PartialEq)]
pub enum ParameterKind {
    /// Plain input parameter.
    #[default]
    In,

    /// Parameter passed by reference. The callee may read and assign it.
    Ref,

    /// Output parameter. The callee assigns it, the passed value is ignored.
    Out,
}

/// Parameter of a [`Method`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Parameter {
    name: Option<Cow<'static, str>>,
    ty: Type,
    kind: ParameterKind,
    variadic: bool,
}

impl Parameter {
    /// Create a new input parameter.
    pub fn new<N: Into<Cow<'static, str>>>(name: N, ty: Type) -> Self {
        Self {
            name: Some(name.into()),
            ty,
            kind: ParameterKind::In,
            variadic: false,
        }
    }

    /// Create a new input parameter without a name.
    pub fn anonymous(ty: Type) -> Self {
        Self {
            name: None,
            ty,
            kind: ParameterKind::In,
            variadic: false,
        }
    }

    /// Turn this into a by-reference parameter.
    #[must_use]
    pub fn by_ref(mut self) -> Self {
        self.kind = ParameterKind::Ref;

        self
    }

    /// Turn this into an output parameter.
    #[must_use]
    pub fn out(mut self) -> Self {
        self.kind = ParameterKind::Out;

        self
    }

    /// Mark this parameter as variadic. Variadic parameters take any number
    /// of trailing arguments, packed into one sequence of `ty`.
    #[must_use]
    pub fn variadic(mut self) -> Self {
        self.variadic = true;

        self
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    #[must_use]
    pub fn kind(&self) -> ParameterKind {
        self.kind
    }

    #[must_use]
    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    /// Type of the elements passed to a variadic parameter.
    #[must_use]
    pub fn element_type(&self) -> Type {
        self.ty.element().cloned().unwrap_or_else(Type::object)
    }

    fn display_name(&self, index: usize) -> Cow<'_, str> {
        match &self.name {
            Some(name) => Cow::Borrowed(&**name),
            None => Cow::Owned(format!("param{}", index + 1)),
        }
    }
}

/// Distinguishes the members every object has and event accessors from
/// ordinary methods.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum MethodKind {
    Ordinary,
    Equals,
    GetHashCode,
    ToString,

    /// Subscription to the named event.
    EventAdd(Cow<'static, str>),

    /// Unsubscription from the named event.
    EventRemove(Cow<'static, str>),
}

impl MethodKind {
    /// Returns `true` for event subscriptions and unsubscriptions.
    #[must_use]
    pub fn is_event(&self) -> bool {
        matches!(self, Self::EventAdd(_) | Self::EventRemove(_))
    }
}

/// Identity of a (possibly generic) method of a faked type.
#[derive(Debug, Clone)]
pub struct Method(Arc<MethodInner>);

#[derive(Debug)]
struct MethodInner {
    declaring_type: Type,
    name: Cow<'static, str>,
    kind: MethodKind,
    generic_args: Vec<Type>,
    parameters: Vec<Parameter>,
}

impl Method {
    /// Create a new ordinary method.
    pub fn new<N, P>(declaring_type: Type, name: N, parameters: P) -> Self
    where
        N: Into<Cow<'static, str>>,
        P: IntoIterator<Item = Parameter>,
    {
        Self::with_kind(declaring_type, name.into(), MethodKind::Ordinary, parameters)
    }

    /// The `Equals` member every object has.
    pub fn object_equals(declaring_type: Type) -> Self {
        Self::with_kind(
            declaring_type,
            Cow::Borrowed("Equals"),
            MethodKind::Equals,
            [Parameter::new("obj", Type::object())],
        )
    }

    /// The `GetHashCode` member every object has.
    pub fn object_get_hash_code(declaring_type: Type) -> Self {
        Self::with_kind(
            declaring_type,
            Cow::Borrowed("GetHashCode"),
            MethodKind::GetHashCode,
            [],
        )
    }

    /// The `ToString` member every object has.
    pub fn object_to_string(declaring_type: Type) -> Self {
        Self::with_kind(
            declaring_type,
            Cow::Borrowed("ToString"),
            MethodKind::ToString,
            [],
        )
    }

    /// Accessor that subscribes a handler of type `handler` to `event`.
    pub fn event_add<E>(declaring_type: Type, event: E, handler: Type) -> Self
    where
        E: Into<Cow<'static, str>>,
    {
        let event = event.into();

        Self::with_kind(
            declaring_type,
            Cow::Owned(format!("add_{event}")),
            MethodKind::EventAdd(event),
            [Parameter::new("value", handler)],
        )
    }

    /// Accessor that unsubscribes a handler of type `handler` from `event`.
    pub fn event_remove<E>(declaring_type: Type, event: E, handler: Type) -> Self
    where
        E: Into<Cow<'static, str>>,
    {
        let event = event.into();

        Self::with_kind(
            declaring_type,
            Cow::Owned(format!("remove_{event}")),
            MethodKind::EventRemove(event),
            [Parameter::new("value", handler)],
        )
    }

    fn with_kind<P>(declaring_type: Type, name: Cow<'static, str>, kind: MethodKind, parameters: P) -> Self
    where
        P: IntoIterator<Item = Parameter>,
    {
        Self(Arc::new(MethodInner {
            declaring_type,
            name,
            kind,
            generic_args: Vec::new(),
            parameters: parameters.into_iter().collect(),
        }))
    }

    /// Return the instantiation of this generic method with the passed type
    /// arguments.
    #[must_use]
    pub fn with_generic_args<I>(&self, args: I) -> Self
    where
        I: IntoIterator<Item = Type>,
    {
        Self(Arc::new(MethodInner {
            declaring_type: self.0.declaring_type.clone(),
            name: self.0.name.clone(),
            kind: self.0.kind.clone(),
            generic_args: args.into_iter().collect(),
            parameters: self.0.parameters.clone(),
        }))
    }

    #[must_use]
    pub fn declaring_type(&self) -> &Type {
        &self.0.declaring_type
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    #[must_use]
    pub fn kind(&self) -> &MethodKind {
        &self.0.kind
    }

    #[must_use]
    pub fn generic_args(&self) -> &[Type] {
        &self.0.generic_args
    }

    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.0.parameters
    }

    /// Returns `true` if both methods have the same definition, regardless
    /// of their generic type arguments and the parameter types that depend
    /// on them.
    #[must_use]
    pub fn is_same_definition_as(&self, other: &Method) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
            || (self.0.kind == other.0.kind
                && self.0.name == other.0.name
                && self.0.declaring_type == other.0.declaring_type
                && self.0.generic_args.len() == other.0.generic_args.len()
                && self.0.parameters.len() == other.0.parameters.len()
                && self
                    .0
                    .parameters
                    .iter()
                    .zip(&other.0.parameters)
                    .all(|(a, b)| a.kind == b.kind && a.variadic == b.variadic))
    }

    pub(crate) fn write_name(&self, writer: &mut dyn OutputWriter) {
        writer.write(&format!("{}.{}", self.0.declaring_type, self.0.name));

        if let Some((first, rest)) = self.0.generic_args.split_first() {
            writer.write(&format!("<{first}"));
            for arg in rest {
                writer.write(&format!(", {arg}"));
            }
            writer.write(">");
        }
    }

    /// Write `name: value` for each parameter using `value` to render the
    /// argument of the parameter at the passed index.
    pub(crate) fn write_arguments<F>(&self, writer: &mut dyn OutputWriter, mut value: F) -> Result<()>
    where
        F: FnMut(usize, &mut dyn OutputWriter) -> Result<()>,
    {
        writer.write("(");

        for (i, parameter) in self.0.parameters.iter().enumerate() {
            if i > 0 {
                writer.write(", ");
            }

            writer.write(&parameter.display_name(i));
            writer.write(": ");
            value(i, writer)?;
        }

        writer.write(")");

        Ok(())
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let mut out = String::new();
        self.write_name(&mut out);

        f.write_str(&out)
    }
}

/// Record of one call that was intercepted by a fake.
///
/// Arguments are stored in parameter order. The arguments of a variadic
/// parameter are packed into one sequence value.
#[derive(Debug, Clone)]
pub struct Call {
    method: Method,
    arguments: Vec<Value>,
}

impl Call {
    pub fn new<I>(method: Method, arguments: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Self {
            method,
            arguments: arguments.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    /// Write a description of the call, e.g. `Foo.Bar<i32>(baz: 1)`.
    ///
    /// # Errors
    /// Returns [`Error::UserCallback`](crate::Error::UserCallback) if a
    /// custom formatter failed.
    pub fn write_description(
        &self,
        formatter: &ArgumentValueFormatter,
        writer: &mut dyn OutputWriter,
    ) -> Result<()> {
        self.method.write_name(writer);
        self.method.write_arguments(writer, |i, w| {
            match self.arguments.get(i) {
                Some(value) => w.write(&formatter.format_or_fallback(value)?),
                None => w.write("<missing>"),
            }

            Ok(())
        })
    }

    /// See [`write_description`](Self::write_description).
    ///
    /// # Errors
    /// Returns [`Error::UserCallback`](crate::Error::UserCallback) if a
    /// custom formatter failed.
    pub fn description(&self, formatter: &ArgumentValueFormatter) -> Result<String> {
        let mut out = String::new();
        self.write_description(formatter, &mut out)?;

        Ok(out)
    }
}

impl Display for Call {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self.description(&ArgumentValueFormatter::default()) {
            Ok(s) => f.write_str(&s),
            Err(_) => write!(f, "{}(..)", self.method),
        }
    }
}
