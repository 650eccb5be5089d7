use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::equality::ArgumentEqualityComparer;
use crate::error::Result;
use crate::output::{ArgumentValueFormatter, OutputWriter};
use crate::types::{Type, Value};

use super::ArgumentConstraint;

/// Constraint that checks an argument for equality with an expected value.
///
/// Literal values of a call specification are lifted to this constraint.
pub struct EqualityArgumentConstraint {
    expected: Value,
    parameter_type: Type,
    comparer: Arc<ArgumentEqualityComparer>,
    formatter: Arc<ArgumentValueFormatter>,
}

impl EqualityArgumentConstraint {
    pub fn new(
        expected: Value,
        parameter_type: Type,
        comparer: Arc<ArgumentEqualityComparer>,
        formatter: Arc<ArgumentValueFormatter>,
    ) -> Self {
        Self {
            expected,
            parameter_type,
            comparer,
            formatter,
        }
    }

    #[must_use]
    pub fn expected(&self) -> &Value {
        &self.expected
    }

    /// Render the expected value.
    ///
    /// If the value could not be rendered, the display name of the value (if
    /// it is a test double) or the name of its runtime type is returned
    /// instead.
    ///
    /// # Errors
    /// Faults of user supplied formatters are not recovered and returned as
    /// [`Error::UserCallback`](crate::Error::UserCallback).
    pub fn description(&self) -> Result<String> {
        self.formatter.format_or_fallback(&self.expected)
    }
}

impl ArgumentConstraint for EqualityArgumentConstraint {
    fn is_valid(&self, argument: &Value) -> Result<bool> {
        if argument.is_null() {
            return Ok(false);
        }

        self.comparer
            .are_equal(&self.expected, argument, &self.parameter_type)
    }

    fn write_description(&self, writer: &mut dyn OutputWriter) -> Result<()> {
        writer.write(&self.description()?);

        Ok(())
    }
}

impl Debug for EqualityArgumentConstraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("EqualityArgumentConstraint")
            .field("expected", &self.expected)
            .field("parameter_type", &self.parameter_type)
            .finish_non_exhaustive()
    }
}
