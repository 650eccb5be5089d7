//! The [`wildcard`](self) module implements wildcard types: placeholder types
//! that are used as generic type arguments while configuring a call and
//! that match a whole family of actual types when the call is made.

use std::collections::HashMap;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::error::{guard_callback, Error, Result};
use crate::types::{ArgumentType, Type, TypeKind, Value};

/// Strategy that decides which actual types a wildcard type stands for.
pub trait TypeMatcher: Send + Sync {
    /// Returns `true` if `ty` is matched by the wildcard.
    fn matches(&self, ty: &Type) -> bool;
}

impl<F> TypeMatcher for F
where
    F: Fn(&Type) -> bool + Send + Sync,
{
    fn matches(&self, ty: &Type) -> bool {
        self(ty)
    }
}

/// Matches every type.
#[derive(Default, Debug, Clone, Copy)]
pub struct AnyTypeMatcher;

impl TypeMatcher for AnyTypeMatcher {
    fn matches(&self, _ty: &Type) -> bool {
        true
    }
}

/// Matches reference types. Nullable value types (`Option<T>`) are not
/// reference types and are rejected.
#[derive(Default, Debug, Clone, Copy)]
pub struct ReferenceTypeMatcher;

impl TypeMatcher for ReferenceTypeMatcher {
    fn matches(&self, ty: &Type) -> bool {
        ty.kind() == TypeKind::Reference
    }
}

/// Matches every type that does not accept `null`.
#[derive(Default, Debug, Clone, Copy)]
pub struct ValueTypeMatcher;

impl TypeMatcher for ValueTypeMatcher {
    fn matches(&self, ty: &Type) -> bool {
        !ty.is_nullable()
    }
}

/// Built-in wildcard type that matches every other type.
///
/// Use it as generic type argument of a call specification, or as the type
/// of an argument constraint, to match a generic method regardless of the
/// type it is called with.
#[derive(Default, Debug, Clone, Copy, Eq, PartialEq)]
pub struct AnyType;

impl AnyType {
    /// Descriptor of the [`AnyType`] wildcard.
    pub fn ty() -> Type {
        ANY_TYPE.clone()
    }
}

impl ArgumentType for AnyType {
    fn argument_type() -> Type {
        Self::ty()
    }

    fn from_argument(_value: &Value) -> Option<Self> {
        Some(Self)
    }
}

static ANY_TYPE: Lazy<Type> = Lazy::new(|| Type::reference("AnyType"));

/// Set of wildcard type declarations: each declared type is associated with
/// the [`TypeMatcher`] that decides which types it stands for.
///
/// A declaration for the generic definition of a type (the type without
/// generic arguments) applies to all instantiations of that type.
#[derive(Clone)]
pub struct WildcardRegistry {
    declarations: HashMap<Type, Arc<dyn TypeMatcher>>,
}

impl WildcardRegistry {
    /// Create a new [`WildcardRegistryBuilder`] that already contains the
    /// declaration of [`AnyType`].
    pub fn builder() -> WildcardRegistryBuilder {
        WildcardRegistryBuilder::default().declare(AnyType::ty(), AnyTypeMatcher)
    }

    /// Create a new [`WildcardRegistryBuilder`] without any declaration.
    pub fn empty() -> WildcardRegistryBuilder {
        WildcardRegistryBuilder::default()
    }

    /// Find the matcher declared for `ty`.
    #[must_use]
    pub fn lookup(&self, ty: &Type) -> Option<Arc<dyn TypeMatcher>> {
        if let Some(matcher) = self.declarations.get(ty) {
            return Some(matcher.clone());
        }

        let definition = ty.definition()?;

        self.declarations.get(&definition).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

impl Default for WildcardRegistry {
    fn default() -> Self {
        let mut declarations: HashMap<Type, Arc<dyn TypeMatcher>> = HashMap::new();
        declarations.insert(AnyType::ty(), Arc::new(AnyTypeMatcher));

        Self { declarations }
    }
}

impl Debug for WildcardRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("WildcardRegistry")
            .field("declarations", &self.declarations.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for a [`WildcardRegistry`].
///
/// Declarations are validated when the registry is built.
#[must_use]
#[derive(Default)]
pub struct WildcardRegistryBuilder {
    declarations: Vec<(Type, Arc<dyn TypeMatcher>)>,
}

impl WildcardRegistryBuilder {
    /// Declare `ty` as wildcard type that matches every type accepted by
    /// `matcher`.
    pub fn declare<M>(mut self, ty: Type, matcher: M) -> Self
    where
        M: TypeMatcher + 'static,
    {
        self.declarations.push((ty, Arc::new(matcher)));

        self
    }

    /// Build the registry.
    ///
    /// # Errors
    /// Returns [`Error::Configuration`] if a type was declared more than once,
    /// or if a nullable or sequence type was declared as wildcard.
    pub fn build(self) -> Result<WildcardRegistry> {
        let mut declarations = HashMap::with_capacity(self.declarations.len());

        for (ty, matcher) in self.declarations {
            if matches!(ty.kind(), TypeKind::Nullable | TypeKind::Sequence) {
                return Err(Error::configuration(format!(
                    "Unable to declare {ty} as wildcard type: only plain value and reference types can be wildcards"
                )));
            }

            if declarations.contains_key(&ty) {
                return Err(Error::configuration(format!(
                    "The wildcard type {ty} was declared more than once"
                )));
            }

            tracing::trace!(wildcard = %ty, "declared wildcard type");

            declarations.insert(ty, matcher);
        }

        Ok(WildcardRegistry { declarations })
    }
}

/// Decides if two types are equivalent for matching purposes, taking the
/// wildcard declarations of a [`WildcardRegistry`] into account.
///
/// The matcher declared for a type is resolved lazily and cached for the
/// lifetime of the [`GenericTypeArgumentMatcher`]. The cache may be used from
/// multiple threads concurrently.
pub struct GenericTypeArgumentMatcher {
    registry: WildcardRegistry,
    cache: RwLock<HashMap<Type, Option<Arc<dyn TypeMatcher>>>>,
}

impl GenericTypeArgumentMatcher {
    /// Create a new matcher for the passed `registry`.
    #[must_use]
    pub fn new(registry: WildcardRegistry) -> Self {
        Self {
            registry,
            cache: RwLock::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &WildcardRegistry {
        &self.registry
    }

    /// Returns `true` if `left` and `right` are equal, or if one of them is a
    /// wildcard type whose matcher accepts the other one.
    ///
    /// # Errors
    /// Returns [`Error::UserCallback`] if a wildcard type matcher failed.
    pub fn are_matching_types(&self, left: &Type, right: &Type) -> Result<bool> {
        if left == right {
            return Ok(true);
        }

        Ok(self.accepts(left, right)? || self.accepts(right, left)?)
    }

    /// Returns `true` if both lists have the same length and all types are
    /// pairwise matching.
    ///
    /// # Errors
    /// Returns [`Error::UserCallback`] if a wildcard type matcher failed.
    pub fn are_matching_type_lists(&self, left: &[Type], right: &[Type]) -> Result<bool> {
        if left.len() != right.len() {
            return Ok(false);
        }

        for (l, r) in left.iter().zip(right) {
            if !self.are_matching_types(l, r)? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn accepts(&self, wildcard: &Type, ty: &Type) -> Result<bool> {
        let Some(matcher) = self.matcher_for(wildcard) else {
            return Ok(false);
        };

        guard_callback(
            || Ok(format!("Wildcard type matcher of {wildcard}")),
            || Ok(matcher.matches(ty)),
        )
    }

    fn matcher_for(&self, ty: &Type) -> Option<Arc<dyn TypeMatcher>> {
        if let Some(cached) = self.cache.read().get(ty) {
            return cached.clone();
        }

        let resolved = self.registry.lookup(ty);

        tracing::trace!(ty = %ty, wildcard = resolved.is_some(), "resolved wildcard matcher");

        self.cache
            .write()
            .entry(ty.clone())
            .or_insert(resolved)
            .clone()
    }
}

impl Default for GenericTypeArgumentMatcher {
    fn default() -> Self {
        Self::new(WildcardRegistry::default())
    }
}

impl Debug for GenericTypeArgumentMatcher {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GenericTypeArgumentMatcher")
            .field("registry", &self.registry)
            .field("cached", &self.cache.read().len())
            .finish()
    }
}
