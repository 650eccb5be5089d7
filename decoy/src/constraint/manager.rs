use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::error::{guard_callback, BoxError, Result};
use crate::output::{ArgumentValueFormatter, OutputWriter};
use crate::types::{Type, Value};
use crate::wildcard::GenericTypeArgumentMatcher;

use super::{describe, predicate, ArgumentConstraint, Constraint, Describe, Predicate};

/// Creates argument constraints over arguments of type `T`.
///
/// The constraint helpers of [`ConstraintManagerExt`](super::ConstraintManagerExt)
/// are available on every manager, including negated ones.
pub trait ConstraintManager<T: 'static> {
    /// Create a constraint from a fallible `predicate` and a `description`
    /// writer.
    fn matches_with(&self, predicate: Predicate<T>, description: Describe) -> Constraint;

    /// Formatter used to render expected values in descriptions.
    fn formatter(&self) -> &Arc<ArgumentValueFormatter>;

    /// Create a constraint from a `predicate` and a `description` writer.
    ///
    /// The description is only rendered when it is actually needed, and at
    /// most once.
    fn matches<P, D>(&self, predicate_fn: P, description: D) -> Constraint
    where
        Self: Sized,
        P: Fn(&T) -> bool + Send + Sync + 'static,
        D: Fn(&mut dyn OutputWriter) + Send + Sync + 'static,
    {
        self.matches_with(
            predicate(move |x: &T| Ok(predicate_fn(x))),
            describe(move |w| {
                description(w);

                Ok(())
            }),
        )
    }

    /// Like [`matches`](Self::matches) but with a fallible predicate. An error
    /// returned by the predicate is reported as user callback fault.
    fn try_matches<P, E, D>(&self, predicate_fn: P, description: D) -> Constraint
    where
        Self: Sized,
        P: Fn(&T) -> std::result::Result<bool, E> + Send + Sync + 'static,
        E: Into<BoxError>,
        D: Fn(&mut dyn OutputWriter) + Send + Sync + 'static,
    {
        self.matches_with(
            predicate(move |x: &T| predicate_fn(x).map_err(Into::into)),
            describe(move |w| {
                description(w);

                Ok(())
            }),
        )
    }
}

/// Manager that creates the logical negation of the constraints its parent
/// manager would create.
///
/// The predicate result is inverted and the description is prefixed with
/// `not `. The parent manager is left untouched.
#[must_use]
#[derive(Debug, Clone)]
pub struct Not<M>(pub(crate) M);

impl<T, M> ConstraintManager<T> for Not<M>
where
    M: ConstraintManager<T>,
    T: 'static,
{
    fn matches_with(&self, predicate_fn: Predicate<T>, description: Describe) -> Constraint {
        self.0.matches_with(
            predicate(move |x: &T| predicate_fn(x).map(|valid| !valid)),
            describe(move |w| {
                w.write("not ");
                description(w)
            }),
        )
    }

    fn formatter(&self) -> &Arc<ArgumentValueFormatter> {
        self.0.formatter()
    }
}

/// Constraint created by the constraint managers.
///
/// If a type gate is set, the argument is checked to be compatible with the
/// declared type before the predicate is invoked.
pub(crate) struct MatchesConstraint {
    ty: Type,
    gate: Option<Arc<GenericTypeArgumentMatcher>>,
    predicate: Predicate<Value>,
    description: Describe,
    rendered: OnceCell<String>,
}

impl MatchesConstraint {
    pub(crate) fn new(
        ty: Type,
        gate: Option<Arc<GenericTypeArgumentMatcher>>,
        predicate: Predicate<Value>,
        description: Describe,
    ) -> Self {
        Self {
            ty,
            gate,
            predicate,
            description,
            rendered: OnceCell::new(),
        }
    }

    fn is_valid_for_type(&self, gate: &GenericTypeArgumentMatcher, argument: &Value) -> Result<bool> {
        match argument.runtime_type() {
            None => Ok(self.ty.is_nullable()),
            Some(actual) => {
                Ok(actual.is_assignable_to(&self.ty) || gate.are_matching_types(&actual, &self.ty)?)
            }
        }
    }

    fn rendered(&self) -> Result<&str> {
        self.rendered
            .get_or_try_init(|| {
                let mut out = String::from("<");
                guard_callback(
                    || Ok("Argument matcher description".into()),
                    || {
                        let writer: &mut dyn OutputWriter = &mut out;

                        (self.description)(writer)
                    },
                )?;
                out.push('>');

                Ok(out)
            })
            .map(String::as_str)
    }
}

impl ArgumentConstraint for MatchesConstraint {
    fn is_valid(&self, argument: &Value) -> Result<bool> {
        if let Some(gate) = &self.gate {
            if !self.is_valid_for_type(gate, argument)? {
                tracing::trace!(
                    constraint_type = %self.ty,
                    argument_type = ?argument.runtime_type(),
                    "argument is not compatible with the constraint type"
                );

                return Ok(false);
            }
        }

        guard_callback(
            || Ok(format!("Argument matcher {}", self.rendered()?)),
            || (self.predicate)(argument),
        )
    }

    fn write_description(&self, writer: &mut dyn OutputWriter) -> Result<()> {
        writer.write(self.rendered()?);

        Ok(())
    }

    fn constraint_type(&self) -> Option<Type> {
        Some(self.ty.clone())
    }
}
