use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::output::ArgumentValueFormatter;
use crate::types::{ArgumentType, Value};

use super::manager::MatchesConstraint;
use super::{Constraint, ConstraintManager, Describe, Not, Predicate};

/// Constraint manager that passes the untyped argument to the predicate.
///
/// Unlike [`That`](super::That) no type compatibility check is done before
/// the predicate is invoked. This is useful for arguments of generic methods
/// whose concrete type is not known while the call is configured. `T` is only
/// reported as the type of the created constraints.
pub struct AnyTypeThat<T> {
    formatter: Arc<ArgumentValueFormatter>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> AnyTypeThat<T>
where
    T: ArgumentType,
{
    pub fn new(formatter: Arc<ArgumentValueFormatter>) -> Self {
        Self {
            formatter,
            _marker: PhantomData,
        }
    }

    /// Manager for the negation of the constraints of this manager.
    pub fn not(&self) -> Not<Self> {
        Not(self.clone())
    }
}

impl<T> ConstraintManager<Value> for AnyTypeThat<T>
where
    T: ArgumentType,
{
    fn matches_with(&self, predicate: Predicate<Value>, description: Describe) -> Constraint {
        Constraint::new(MatchesConstraint::new(
            T::argument_type(),
            None,
            predicate,
            description,
        ))
    }

    fn formatter(&self) -> &Arc<ArgumentValueFormatter> {
        &self.formatter
    }
}

impl<T> Clone for AnyTypeThat<T> {
    fn clone(&self) -> Self {
        Self {
            formatter: self.formatter.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> Debug for AnyTypeThat<T>
where
    T: ArgumentType,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "AnyTypeThat<{}>", T::argument_type())
    }
}
