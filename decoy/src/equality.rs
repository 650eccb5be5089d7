//! The [`equality`](self) module implements the comparison that is used to
//! check an argument against a plain expected value.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::error::{guard_callback, Result};
use crate::types::{Type, Value};

/// User supplied comparison for values of a specific type.
pub trait ArgumentValueComparer: Send + Sync {
    /// Returns `true` if this comparer is responsible for values of `ty`.
    fn can_compare(&self, ty: &Type) -> bool;

    /// Returns `true` if `expected` and `actual` are considered equal.
    fn are_equal(&self, expected: &Value, actual: &Value) -> bool;
}

/// Compares expected values with actual arguments.
///
/// Custom [`ArgumentValueComparer`]s are asked first. Otherwise sequences
/// and strings are compared element by element (a string equals a sequence of
/// the same chars), nested sequences recursively. All other values use
/// [`Value::same_as`].
#[derive(Default, Clone)]
pub struct ArgumentEqualityComparer {
    comparers: Vec<Arc<dyn ArgumentValueComparer>>,
}

impl ArgumentEqualityComparer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a custom comparer. Comparers added later take precedence.
    #[must_use]
    pub fn with_comparer<C>(mut self, comparer: C) -> Self
    where
        C: ArgumentValueComparer + 'static,
    {
        self.comparers.insert(0, Arc::new(comparer));

        self
    }

    /// Returns `true` if `actual` equals `expected`. `parameter_type` is the
    /// declared type of the parameter the argument was passed to.
    ///
    /// # Errors
    /// Returns [`Error::UserCallback`](crate::Error::UserCallback) if a custom
    /// comparer failed.
    pub fn are_equal(&self, expected: &Value, actual: &Value, parameter_type: &Type) -> Result<bool> {
        let expected_type = expected.runtime_type();
        let comparer = self.comparers.iter().find(|c| {
            c.can_compare(parameter_type) || expected_type.as_ref().is_some_and(|t| c.can_compare(t))
        });

        if let Some(comparer) = comparer {
            return guard_callback(
                || Ok(format!("Argument equality comparer for {parameter_type}")),
                || Ok(comparer.are_equal(expected, actual)),
            );
        }

        match (expected, actual) {
            (Value::Str(a), Value::Str(b)) => Ok(a == b),
            (a, b) if a.is_enumerable() && b.is_enumerable() => {
                let (Some(a), Some(b)) = (a.elements(), b.elements()) else {
                    return Ok(false);
                };

                self.are_sequences_equal(&a, &b)
            }
            (a, b) => Ok(a.same_as(b)),
        }
    }

    fn are_sequences_equal(&self, expected: &[Value], actual: &[Value]) -> Result<bool> {
        if expected.len() != actual.len() {
            return Ok(false);
        }

        for (e, a) in expected.iter().zip(actual) {
            let element_type = e.runtime_type().unwrap_or_else(Type::object);
            if !self.are_equal(e, a, &element_type)? {
                return Ok(false);
            }
        }

        Ok(true)
    }
}

impl Debug for ArgumentEqualityComparer {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ArgumentEqualityComparer")
            .field("comparers", &self.comparers.len())
            .finish()
    }
}
