//! The [`constraint`](self) module contains the argument constraints a call
//! specification checks the arguments of a call against, and the managers
//! that are used to create them.

mod any_type;
mod builtin;
mod equality;
mod manager;
mod typed;

use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::error::{BoxError, Result};
use crate::output::{OutputWriter, StringOutputWriter};
use crate::types::{Type, Value};

pub use any_type::AnyTypeThat;
pub use builtin::{ConstraintManagerExt, Nullable};
pub use equality::EqualityArgumentConstraint;
pub use manager::{ConstraintManager, Not};
pub use typed::That;

/// Predicate of a constraint manager over arguments of type `T`.
pub type Predicate<T> = Arc<dyn Fn(&T) -> std::result::Result<bool, BoxError> + Send + Sync>;

/// Function that writes the description of a constraint.
pub type Describe =
    Arc<dyn Fn(&mut dyn OutputWriter) -> std::result::Result<(), BoxError> + Send + Sync>;

/// Atomic predicate over one argument of a call.
pub trait ArgumentConstraint: Send + Sync {
    /// Returns `true` if `argument` satisfies this constraint.
    ///
    /// # Errors
    /// Returns [`Error::UserCallback`](crate::Error::UserCallback) if a user
    /// supplied callback failed.
    fn is_valid(&self, argument: &Value) -> Result<bool>;

    /// Write a human readable description of the constraint to `writer`.
    ///
    /// # Errors
    /// Returns [`Error::UserCallback`](crate::Error::UserCallback) if a user
    /// supplied description failed.
    fn write_description(&self, writer: &mut dyn OutputWriter) -> Result<()>;

    /// Type the constraint was declared for, if it is a typed constraint.
    fn constraint_type(&self) -> Option<Type> {
        None
    }
}

/// Shared handle to an [`ArgumentConstraint`].
///
/// Constraint managers return handles, the call specification collects them
/// in parameter order.
#[derive(Clone)]
pub struct Constraint(Arc<dyn ArgumentConstraint>);

impl Constraint {
    /// Create a new handle for the passed `constraint`.
    pub fn new<C>(constraint: C) -> Self
    where
        C: ArgumentConstraint + 'static,
    {
        Self(Arc::new(constraint))
    }

    /// See [`ArgumentConstraint::is_valid`].
    ///
    /// # Errors
    /// Forwards the error of the underlying constraint.
    pub fn is_valid(&self, argument: &Value) -> Result<bool> {
        self.0.is_valid(argument)
    }

    /// See [`ArgumentConstraint::write_description`].
    ///
    /// # Errors
    /// Forwards the error of the underlying constraint.
    pub fn write_description(&self, writer: &mut dyn OutputWriter) -> Result<()> {
        self.0.write_description(writer)
    }

    /// Render the description of the constraint into a new string.
    ///
    /// # Errors
    /// Forwards the error of the underlying constraint.
    pub fn description(&self) -> Result<String> {
        let mut writer = StringOutputWriter::new();
        self.0.write_description(&mut writer)?;

        Ok(writer.into_string())
    }

    /// See [`ArgumentConstraint::constraint_type`].
    #[must_use]
    pub fn constraint_type(&self) -> Option<Type> {
        self.0.constraint_type()
    }
}

impl Display for Constraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self.description() {
            Ok(s) => f.write_str(&s),
            Err(_) => f.write_str("<description unavailable>"),
        }
    }
}

impl Debug for Constraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "Constraint({self})")
    }
}

/// Matches the slot of an out parameter. Out parameters carry no input
/// value, so every argument is accepted.
#[derive(Default, Debug, Clone, Copy)]
pub struct OutParameterConstraint;

impl ArgumentConstraint for OutParameterConstraint {
    fn is_valid(&self, _argument: &Value) -> Result<bool> {
        Ok(true)
    }

    fn write_description(&self, writer: &mut dyn OutputWriter) -> Result<()> {
        writer.write("<out parameter>");

        Ok(())
    }
}

/// Matches `null` arguments only. Used for `null` literals in call
/// specifications.
#[derive(Default, Debug, Clone, Copy)]
pub struct NullConstraint;

impl ArgumentConstraint for NullConstraint {
    fn is_valid(&self, argument: &Value) -> Result<bool> {
        Ok(argument.is_null())
    }

    fn write_description(&self, writer: &mut dyn OutputWriter) -> Result<()> {
        writer.write("NULL");

        Ok(())
    }
}

/// Wrap a fallible predicate over `T`.
pub fn predicate<T: 'static, F>(f: F) -> Predicate<T>
where
    F: Fn(&T) -> std::result::Result<bool, BoxError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wrap a fallible description function.
pub fn describe<F>(f: F) -> Describe
where
    F: Fn(&mut dyn OutputWriter) -> std::result::Result<(), BoxError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Description that writes a fixed text.
pub fn describe_text<S: Into<String>>(text: S) -> Describe {
    let text = text.into();

    describe(move |w| {
        w.write(&text);

        Ok(())
    })
}
