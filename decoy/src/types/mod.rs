//! The [`types`](self) module defines the type descriptors and the dynamic
//! argument values the matching engine operates on.

mod argument;
mod ty;
mod value;

pub use argument::ArgumentType;
pub use ty::{Type, TypeKind};
pub use value::{ObjectArgument, Sequence, Value};
