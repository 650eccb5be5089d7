use std::borrow::Cow;
use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use once_cell::sync::Lazy;

/// Describes the type of a method parameter, a generic type argument or the
/// runtime type of an argument value.
///
/// Two descriptors are equal if their name, kind and generic arguments are
/// equal. Declared base types are not part of the identity.
#[derive(Clone)]
pub struct Type(Arc<Inner>);

struct Inner {
    name: Cow<'static, str>,
    kind: TypeKind,
    args: Vec<Type>,
    bases: Vec<Type>,
}

/// Kind of a [`Type`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum TypeKind {
    /// Plain value that can not be null.
    Value,

    /// Reference type, null is a valid value.
    Reference,

    /// Nullable form of the type stored as its only generic argument.
    Nullable,

    /// Sequence of the type stored as its only generic argument.
    Sequence,
}

impl Type {
    /// Create a new non-nullable value type.
    pub fn value<N: Into<Cow<'static, str>>>(name: N) -> Self {
        Self::new(name.into(), TypeKind::Value, Vec::new())
    }

    /// Create a new reference type that accepts null values.
    pub fn reference<N: Into<Cow<'static, str>>>(name: N) -> Self {
        Self::new(name.into(), TypeKind::Reference, Vec::new())
    }

    /// Create the nullable form (`Option<T>`) of `inner`.
    pub fn nullable(inner: Type) -> Self {
        Self::new(Cow::Borrowed("Option"), TypeKind::Nullable, vec![inner])
    }

    /// Create the sequence form (`Vec<T>`) of `element`.
    pub fn sequence(element: Type) -> Self {
        Self::new(Cow::Borrowed("Vec"), TypeKind::Sequence, vec![element])
    }

    fn new(name: Cow<'static, str>, kind: TypeKind, args: Vec<Type>) -> Self {
        Self(Arc::new(Inner {
            name,
            kind,
            args,
            bases: Vec::new(),
        }))
    }

    /// Return a copy of this type with the passed generic arguments.
    #[must_use]
    pub fn with_args<I>(&self, args: I) -> Self
    where
        I: IntoIterator<Item = Type>,
    {
        Self(Arc::new(Inner {
            name: self.0.name.clone(),
            kind: self.0.kind,
            args: args.into_iter().collect(),
            bases: self.0.bases.clone(),
        }))
    }

    /// Return a copy of this type that additionally derives from `base`.
    #[must_use]
    pub fn with_base(&self, base: Type) -> Self {
        let mut bases = self.0.bases.clone();
        bases.push(base);

        Self(Arc::new(Inner {
            name: self.0.name.clone(),
            kind: self.0.kind,
            args: self.0.args.clone(),
            bases,
        }))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    #[must_use]
    pub fn kind(&self) -> TypeKind {
        self.0.kind
    }

    /// Generic arguments of this type.
    #[must_use]
    pub fn args(&self) -> &[Type] {
        &self.0.args
    }

    #[must_use]
    pub fn bases(&self) -> &[Type] {
        &self.0.bases
    }

    /// Returns `true` if `null` is a valid value of this type.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        matches!(self.0.kind, TypeKind::Reference | TypeKind::Nullable)
    }

    #[must_use]
    pub fn is_generic(&self) -> bool {
        !self.0.args.is_empty()
    }

    /// The type wrapped by a nullable type.
    #[must_use]
    pub fn underlying(&self) -> Option<&Type> {
        match self.0.kind {
            TypeKind::Nullable => self.0.args.first(),
            _ => None,
        }
    }

    /// The element type of a sequence type.
    #[must_use]
    pub fn element(&self) -> Option<&Type> {
        match self.0.kind {
            TypeKind::Sequence => self.0.args.first(),
            _ => None,
        }
    }

    /// The generic definition of this type, i.e. the same type without
    /// generic arguments. Returns `None` if the type is not generic.
    #[must_use]
    pub fn definition(&self) -> Option<Type> {
        self.is_generic().then(|| self.with_args(Vec::new()))
    }

    /// Returns `true` if a value of this type can be used where a value of
    /// `target` is expected.
    #[must_use]
    pub fn is_assignable_to(&self, target: &Type) -> bool {
        if self == target || target == &*OBJECT {
            return true;
        }

        if target.underlying() == Some(self) {
            return true;
        }

        if let (Some(a), Some(b)) = (self.element(), target.element()) {
            if a.is_assignable_to(b) {
                return true;
            }
        }

        self.0.bases.iter().any(|base| base.is_assignable_to(target))
    }

    /// The root reference type every other type is assignable to.
    pub fn object() -> Self {
        OBJECT.clone()
    }

    pub fn bool() -> Self {
        BOOL.clone()
    }

    pub fn i32() -> Self {
        I32.clone()
    }

    pub fn i64() -> Self {
        I64.clone()
    }

    pub fn u8() -> Self {
        U8.clone()
    }

    pub fn f64() -> Self {
        F64.clone()
    }

    pub fn char() -> Self {
        CHAR.clone()
    }

    /// Strings are values that can also be used as a sequence of chars.
    pub fn string() -> Self {
        STRING.clone()
    }
}

impl Eq for Type {}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
            || (self.0.kind == other.0.kind
                && self.0.name == other.0.name
                && self.0.args == other.0.args)
    }
}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.name.hash(state);
        self.0.kind.hash(state);
        self.0.args.hash(state);
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0.name)?;

        if let Some((first, rest)) = self.0.args.split_first() {
            write!(f, "<{first}")?;
            for arg in rest {
                write!(f, ", {arg}")?;
            }
            write!(f, ">")?;
        }

        Ok(())
    }
}

impl Debug for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "Type({self})")
    }
}

static OBJECT: Lazy<Type> = Lazy::new(|| Type::reference("object"));
static BOOL: Lazy<Type> = Lazy::new(|| Type::value("bool"));
static I32: Lazy<Type> = Lazy::new(|| Type::value("i32"));
static I64: Lazy<Type> = Lazy::new(|| Type::value("i64"));
static U8: Lazy<Type> = Lazy::new(|| Type::value("u8"));
static F64: Lazy<Type> = Lazy::new(|| Type::value("f64"));
static CHAR: Lazy<Type> = Lazy::new(|| Type::value("char"));
static STRING: Lazy<Type> =
    Lazy::new(|| Type::value("String").with_base(Type::sequence(Type::char())));
