pub mod assertion;
pub mod call;
pub mod constraint;
pub mod context;
pub mod equality;
pub mod error;
pub mod output;
pub mod rule;
pub mod specification;
pub mod strict;
pub mod times;
pub mod types;
pub mod wildcard;

pub use assertion::{must_have_happened, must_not_have_happened};
pub use call::{Call, Method, MethodKind, Parameter, ParameterKind};
pub use constraint::{
    ArgumentConstraint, Constraint, ConstraintManager, ConstraintManagerExt, Not,
};
pub use context::{MatchingContext, MatchingContextBuilder};
pub use error::{Error, Result};
pub use output::{ArgumentValueFormatter, OutputWriter, StringOutputWriter};
pub use rule::{CallRule, ConfiguredRule, RuleSet};
pub use specification::{Argument, CallSpecification, CallSpecificationBuilder};
pub use strict::{StrictFakeOptions, StrictFakeRule};
pub use times::{Times, TimesRange};
pub use types::{ArgumentType, ObjectArgument, Type, Value};
pub use wildcard::{AnyType, TypeMatcher};
