use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::output::ArgumentValueFormatter;
use crate::types::{ArgumentType, Value};
use crate::wildcard::GenericTypeArgumentMatcher;

use super::manager::MatchesConstraint;
use super::{predicate, Constraint, ConstraintManager, Describe, Not, Predicate};

/// Constraint manager for arguments of type `T`.
///
/// Constraints created by this manager only invoke their predicate if the
/// argument is compatible with `T`:
/// - `null` is only accepted if `T` is nullable,
/// - other values are accepted if their runtime type is assignable to `T`, or
///   if one of both types is a wildcard type matching the other.
///
/// Incompatible arguments are rejected without invoking the predicate.
pub struct That<T> {
    matcher: Arc<GenericTypeArgumentMatcher>,
    formatter: Arc<ArgumentValueFormatter>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> That<T>
where
    T: ArgumentType,
{
    /// Create a new manager that uses `matcher` to resolve wildcard types.
    pub fn new(
        matcher: Arc<GenericTypeArgumentMatcher>,
        formatter: Arc<ArgumentValueFormatter>,
    ) -> Self {
        Self {
            matcher,
            formatter,
            _marker: PhantomData,
        }
    }

    /// Manager for the negation of the constraints of this manager.
    pub fn not(&self) -> Not<Self> {
        Not(self.clone())
    }
}

impl<T> ConstraintManager<T> for That<T>
where
    T: ArgumentType,
{
    fn matches_with(&self, predicate_fn: Predicate<T>, description: Describe) -> Constraint {
        let erased = predicate(move |value: &Value| match T::from_argument(value) {
            Some(x) => predicate_fn(&x),
            None => Ok(false),
        });

        Constraint::new(MatchesConstraint::new(
            T::argument_type(),
            Some(self.matcher.clone()),
            erased,
            description,
        ))
    }

    fn formatter(&self) -> &Arc<ArgumentValueFormatter> {
        &self.formatter
    }
}

impl<T> Clone for That<T> {
    fn clone(&self) -> Self {
        Self {
            matcher: self.matcher.clone(),
            formatter: self.formatter.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> Debug for That<T>
where
    T: ArgumentType,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "That<{}>", T::argument_type())
    }
}
