//! The [`specification`](self) module contains the call specification: the
//! method a rule or an assertion is about, and one argument constraint for
//! each of its parameters.

use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::call::{Call, Method, Parameter, ParameterKind};
use crate::constraint::{Constraint, OutParameterConstraint};
use crate::context::MatchingContext;
use crate::error::{guard_callback, BoxError, Error, Result};
use crate::output::{OutputWriter, StringOutputWriter};
use crate::types::{Type, Value};
use crate::wildcard::GenericTypeArgumentMatcher;

/// Argument of a call specification: either a constraint or a literal value
/// that is compared for equality.
#[derive(Debug, Clone)]
pub enum Argument {
    Constraint(Constraint),
    Value(Value),
}

impl From<Constraint> for Argument {
    fn from(value: Constraint) -> Self {
        Self::Constraint(value)
    }
}

impl From<Value> for Argument {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

type ArgumentsPredicate = Arc<dyn Fn(&[Value]) -> std::result::Result<bool, BoxError> + Send + Sync>;

#[derive(Debug)]
enum Slot {
    Single(Argument),
    Expanded(Vec<Argument>),
}

/// Builder for a [`CallSpecification`].
///
/// Arguments are added in parameter order. The arguments of a variadic
/// parameter may either be passed packed (one sequence value or one
/// constraint over the whole sequence, using [`value`](Self::value) or
/// [`constraint`](Self::constraint)) or expanded (one argument per element,
/// using [`variadic`](Self::variadic)).
#[must_use]
pub struct CallSpecificationBuilder {
    context: MatchingContext,
    method: Method,
    slots: Vec<Slot>,
    predicates: Vec<(String, ArgumentsPredicate)>,
}

impl CallSpecificationBuilder {
    pub(crate) fn new(context: MatchingContext, method: Method) -> Self {
        Self {
            context,
            method,
            slots: Vec::new(),
            predicates: Vec::new(),
        }
    }

    /// Add a constraint for the next parameter.
    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.slots.push(Slot::Single(Argument::Constraint(constraint)));

        self
    }

    /// Add a literal value for the next parameter.
    ///
    /// For input and by-reference parameters the argument has to be equal to
    /// the value. For output parameters every argument is accepted and the
    /// value is retained to be assigned to the parameter.
    pub fn value<V: Into<Value>>(mut self, value: V) -> Self {
        self.slots.push(Slot::Single(Argument::Value(value.into())));

        self
    }

    /// Add the arguments of a variadic parameter in expanded form.
    pub fn variadic<I>(mut self, arguments: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Argument>,
    {
        self.slots
            .push(Slot::Expanded(arguments.into_iter().map(Into::into).collect()));

        self
    }

    /// Add a predicate over all arguments of the call that has to be
    /// fulfilled additionally to the argument constraints.
    pub fn when_arguments_match<S, P>(mut self, description: S, predicate: P) -> Self
    where
        S: Into<String>,
        P: Fn(&[Value]) -> bool + Send + Sync + 'static,
    {
        let predicate: ArgumentsPredicate =
            Arc::new(move |arguments: &[Value]| Ok::<_, BoxError>(predicate(arguments)));
        self.predicates.push((description.into(), predicate));

        self
    }

    /// Build the call specification.
    ///
    /// # Errors
    /// - [`Error::Configuration`] if too many or too few arguments were
    ///   specified,
    /// - [`Error::TypeMismatch`] if a constraint can never match the parameter
    ///   it was specified for.
    /// - [`Error::UserCallback`] if the description of a superfluous
    ///   constraint failed.
    pub fn build(self) -> Result<CallSpecification> {
        let Self {
            context,
            method,
            slots,
            predicates,
        } = self;

        let parameters = method.parameters();

        if let Some(superfluous) = slots.get(parameters.len()) {
            let first = match superfluous {
                Slot::Single(argument) => argument,
                Slot::Expanded(arguments) => match arguments.first() {
                    Some(argument) => argument,
                    None => {
                        return Err(Error::configuration(format!(
                            "{method} has no variadic parameter."
                        )))
                    }
                },
            };

            return Err(Error::configuration(format!(
                "Too many argument constraints specified. First superfluous constraint is {}.",
                describe_argument(&context, first)?
            )));
        }

        let mut slots = slots.into_iter();
        let mut arguments = Vec::with_capacity(parameters.len());
        let mut assignments = Vec::new();

        for (index, parameter) in parameters.iter().enumerate() {
            let slot = match slots.next() {
                Some(slot) => slot,
                None if parameter.is_variadic() => Slot::Expanded(Vec::new()),
                None => {
                    return Err(Error::configuration(format!(
                        "No argument specified for parameter {} of {method}.",
                        parameter.name().map_or_else(|| format!("#{}", index + 1), str::to_owned)
                    )))
                }
            };

            let matcher = match slot {
                Slot::Single(argument) => {
                    let (constraint, assigned) =
                        lift(&context, parameter, parameter.ty(), argument)?;
                    if let Some(value) = assigned {
                        assignments.push((index, value));
                    }

                    ArgumentMatcher::Single(constraint)
                }
                Slot::Expanded(items) if parameter.is_variadic() => {
                    let element = parameter.element_type();
                    let constraints = items
                        .into_iter()
                        .map(|item| lift(&context, parameter, &element, item).map(|(c, _)| c))
                        .collect::<Result<Vec<_>>>()?;

                    ArgumentMatcher::Expanded(constraints)
                }
                Slot::Expanded(_) => {
                    return Err(Error::configuration(format!(
                        "Parameter {} of {method} is not variadic.",
                        parameter.name().unwrap_or("?")
                    )))
                }
            };

            arguments.push(matcher);
        }

        Ok(CallSpecification {
            context,
            method,
            arguments,
            assignments,
            predicates,
        })
    }
}

impl Debug for CallSpecificationBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CallSpecificationBuilder")
            .field("method", &self.method)
            .field("slots", &self.slots)
            .finish_non_exhaustive()
    }
}

/// Lift `argument` to the constraint for `parameter`, checking arguments of
/// type `ty`. Returns the value to assign to a ref or out parameter as well.
fn lift(
    context: &MatchingContext,
    parameter: &Parameter,
    ty: &Type,
    argument: Argument,
) -> Result<(Constraint, Option<Value>)> {
    match (argument, parameter.kind()) {
        (Argument::Constraint(constraint), _) => {
            if let Some(constraint_type) = constraint.constraint_type() {
                check_compatible(context, &constraint_type, ty)?;
            }

            Ok((constraint, None))
        }
        (Argument::Value(value), ParameterKind::Out) => {
            Ok((Constraint::new(OutParameterConstraint), Some(value)))
        }
        (Argument::Value(value), ParameterKind::Ref) => Ok((
            context.equal_to(value.clone(), ty.clone()),
            Some(value),
        )),
        (Argument::Value(value), ParameterKind::In) => {
            Ok((context.equal_to(value, ty.clone()), None))
        }
    }
}

fn check_compatible(context: &MatchingContext, constraint: &Type, parameter: &Type) -> Result<()> {
    let assignable = |a: &Type, b: &Type| a.is_assignable_to(b) || b.is_assignable_to(a);

    let compatible = assignable(constraint, parameter)
        || parameter
            .underlying()
            .is_some_and(|underlying| assignable(constraint, underlying))
        || context.matcher().are_matching_types(constraint, parameter)?;

    if compatible {
        Ok(())
    } else {
        Err(Error::TypeMismatch {
            constraint: constraint.clone(),
            parameter: parameter.clone(),
        })
    }
}

/// Parameter types of a generic method may be constructed from its generic
/// arguments, e.g. `Vec<T>`. They are compared argument by argument.
fn are_matching_parameter_types(
    matcher: &GenericTypeArgumentMatcher,
    expected: &Type,
    actual: &Type,
) -> Result<bool> {
    if matcher.are_matching_types(expected, actual)? {
        return Ok(true);
    }

    if !expected.is_generic()
        || expected.name() != actual.name()
        || expected.kind() != actual.kind()
        || expected.args().len() != actual.args().len()
    {
        return Ok(false);
    }

    for (e, a) in expected.args().iter().zip(actual.args()) {
        if !are_matching_parameter_types(matcher, e, a)? {
            return Ok(false);
        }
    }

    Ok(true)
}

fn describe_argument(context: &MatchingContext, argument: &Argument) -> Result<String> {
    match argument {
        Argument::Constraint(constraint) => constraint.description(),
        Argument::Value(value) => context.formatter().format_or_fallback(value),
    }
}

enum ArgumentMatcher {
    Single(Constraint),
    Expanded(Vec<Constraint>),
}

impl ArgumentMatcher {
    fn is_valid(&self, argument: &Value) -> Result<bool> {
        match self {
            Self::Single(constraint) => constraint.is_valid(argument),
            Self::Expanded(constraints) => {
                let Some(elements) = argument.elements() else {
                    return Ok(false);
                };

                if elements.len() != constraints.len() {
                    return Ok(false);
                }

                for (constraint, element) in constraints.iter().zip(&elements) {
                    if !constraint.is_valid(element)? {
                        return Ok(false);
                    }
                }

                Ok(true)
            }
        }
    }

    fn write_description(&self, writer: &mut dyn OutputWriter) -> Result<()> {
        match self {
            Self::Single(constraint) => constraint.write_description(writer),
            Self::Expanded(constraints) => {
                writer.write("[");
                for (i, constraint) in constraints.iter().enumerate() {
                    if i > 0 {
                        writer.write(", ");
                    }
                    constraint.write_description(writer)?;
                }
                writer.write("]");

                Ok(())
            }
        }
    }
}

/// Specification of the calls a rule applies to, or an assertion looks for.
///
/// Matching a call is a pure function of the specification and the call.
pub struct CallSpecification {
    context: MatchingContext,
    method: Method,
    arguments: Vec<ArgumentMatcher>,
    assignments: Vec<(usize, Value)>,
    predicates: Vec<(String, ArgumentsPredicate)>,
}

impl CallSpecification {
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Context the specification was created from.
    #[must_use]
    pub fn context(&self) -> &MatchingContext {
        &self.context
    }

    /// Values to assign to the by-reference and output parameters of a
    /// matching call, as `(parameter index, value)`.
    #[must_use]
    pub fn assignments(&self) -> &[(usize, Value)] {
        &self.assignments
    }

    /// Returns `true` if `call` matches this specification.
    ///
    /// # Errors
    /// Returns [`Error::UserCallback`] if a user supplied predicate failed.
    pub fn matches(&self, call: &Call) -> Result<bool> {
        let method = call.method();

        if !self.method.is_same_definition_as(method) {
            return Ok(false);
        }

        let matcher = self.context.matcher();
        if !matcher.are_matching_type_lists(self.method.generic_args(), method.generic_args())? {
            tracing::trace!(call = %method, "generic type arguments do not match");

            return Ok(false);
        }

        for (expected, actual) in self.method.parameters().iter().zip(method.parameters()) {
            if !are_matching_parameter_types(matcher, expected.ty(), actual.ty())? {
                tracing::trace!(call = %method, "parameter types do not match");

                return Ok(false);
            }
        }

        let values = call.arguments();
        if values.len() != self.arguments.len() {
            return Ok(false);
        }

        for (index, (argument, value)) in self.arguments.iter().zip(values).enumerate() {
            if !argument.is_valid(value)? {
                tracing::trace!(call = %method, index, "argument does not match");

                return Ok(false);
            }
        }

        for (description, predicate) in &self.predicates {
            let valid = guard_callback(
                || Ok(format!("Arguments predicate {description}")),
                || predicate(values),
            )?;

            if !valid {
                tracing::trace!(call = %method, predicate = %description, "arguments predicate does not match");

                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Write a description of the specified call, e.g. `Foo.Bar(baz: <Ignored>)`.
    ///
    /// # Errors
    /// Returns [`Error::UserCallback`] if the description of a constraint
    /// failed.
    pub fn write_description(&self, writer: &mut dyn OutputWriter) -> Result<()> {
        self.method.write_name(writer);
        self.method.write_arguments(writer, |i, w| match self.arguments.get(i) {
            Some(argument) => argument.write_description(w),
            None => Ok(()),
        })
    }

    /// See [`write_description`](Self::write_description).
    ///
    /// # Errors
    /// Returns [`Error::UserCallback`] if the description of a constraint
    /// failed.
    pub fn description(&self) -> Result<String> {
        let mut writer = StringOutputWriter::new();
        self.write_description(&mut writer)?;

        Ok(writer.into_string())
    }
}

impl Display for CallSpecification {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self.description() {
            Ok(s) => f.write_str(&s),
            Err(_) => write!(f, "{}(..)", self.method),
        }
    }
}

impl Debug for CallSpecification {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "CallSpecification({self})")
    }
}
