//! The [`context`](self) module contains the [`MatchingContext`], the explicit
//! configuration every constraint and call specification is created from.

use std::sync::Arc;

use crate::call::Method;
use crate::constraint::{AnyTypeThat, Constraint, EqualityArgumentConstraint, NullConstraint, That};
use crate::equality::{ArgumentEqualityComparer, ArgumentValueComparer};
use crate::error::Result;
use crate::output::ArgumentValueFormatter;
use crate::specification::CallSpecificationBuilder;
use crate::types::{ArgumentType, Type, Value};
use crate::wildcard::{GenericTypeArgumentMatcher, TypeMatcher, WildcardRegistry, WildcardRegistryBuilder};

/// Shared configuration of the matching engine.
///
/// The context is cheap to clone; clones share the wildcard cache, the
/// equality comparer and the value formatter.
#[derive(Default, Debug, Clone)]
pub struct MatchingContext {
    matcher: Arc<GenericTypeArgumentMatcher>,
    comparer: Arc<ArgumentEqualityComparer>,
    formatter: Arc<ArgumentValueFormatter>,
}

impl MatchingContext {
    /// Create a [`MatchingContextBuilder`] to set up a new context.
    pub fn builder() -> MatchingContextBuilder {
        MatchingContextBuilder::default()
    }

    #[must_use]
    pub fn matcher(&self) -> &Arc<GenericTypeArgumentMatcher> {
        &self.matcher
    }

    #[must_use]
    pub fn comparer(&self) -> &Arc<ArgumentEqualityComparer> {
        &self.comparer
    }

    #[must_use]
    pub fn formatter(&self) -> &Arc<ArgumentValueFormatter> {
        &self.formatter
    }

    /// Constraint manager for arguments of type `T`.
    #[must_use]
    pub fn that<T: ArgumentType>(&self) -> That<T> {
        That::new(self.matcher.clone(), self.formatter.clone())
    }

    /// Constraint manager that passes untyped arguments to its predicates.
    #[must_use]
    pub fn any_type<T: ArgumentType>(&self) -> AnyTypeThat<T> {
        AnyTypeThat::new(self.formatter.clone())
    }

    /// Constraint that checks for equality with `expected`. A `null` value is
    /// lifted to a constraint that only accepts `null`.
    pub fn equal_to<V: Into<Value>>(&self, expected: V, parameter_type: Type) -> Constraint {
        match expected.into() {
            Value::Null => Constraint::new(NullConstraint),
            expected => Constraint::new(EqualityArgumentConstraint::new(
                expected,
                parameter_type,
                self.comparer.clone(),
                self.formatter.clone(),
            )),
        }
    }

    /// Start a new call specification for `method`.
    pub fn specification(&self, method: Method) -> CallSpecificationBuilder {
        CallSpecificationBuilder::new(self.clone(), method)
    }
}

/// Builder for a [`MatchingContext`].
#[must_use]
#[derive(Default)]
pub struct MatchingContextBuilder {
    wildcards: Option<WildcardRegistryBuilder>,
    comparer: ArgumentEqualityComparer,
    formatter: ArgumentValueFormatter,
}

impl MatchingContextBuilder {
    /// Declare `ty` as wildcard type that stands for every type accepted by
    /// `matcher`. The built-in [`AnyType`](crate::wildcard::AnyType) is
    /// always declared.
    pub fn wildcard<M>(mut self, ty: Type, matcher: M) -> Self
    where
        M: TypeMatcher + 'static,
    {
        let wildcards = self
            .wildcards
            .take()
            .unwrap_or_else(WildcardRegistry::builder);
        self.wildcards = Some(wildcards.declare(ty, matcher));

        self
    }

    /// Add a custom equality comparer.
    pub fn comparer<C>(mut self, comparer: C) -> Self
    where
        C: ArgumentValueComparer + 'static,
    {
        self.comparer = self.comparer.with_comparer(comparer);

        self
    }

    /// Add a custom formatter for values of the runtime type `ty`.
    pub fn formatter<F>(mut self, ty: Type, f: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.formatter = self.formatter.with_formatter(ty, f);

        self
    }

    /// Build the context.
    ///
    /// # Errors
    /// Returns [`Error::Configuration`](crate::Error::Configuration) if the
    /// wildcard declarations are invalid.
    pub fn build(self) -> Result<MatchingContext> {
        let registry = match self.wildcards {
            Some(wildcards) => wildcards.build()?,
            None => WildcardRegistry::default(),
        };

        Ok(MatchingContext {
            matcher: Arc::new(GenericTypeArgumentMatcher::new(registry)),
            comparer: Arc::new(self.comparer),
            formatter: Arc::new(self.formatter),
        })
    }
}
