//! The [`error`](self) module defines the errors raised while configuring
//! call specifications and while matching calls against them.

use std::any::Any;
use std::error::Error as StdError;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::types::Type;

/// Boxed error type returned by fallible user callbacks.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Result type used throughout this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised by the matching engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A wildcard declaration or call specification was set up incorrectly.
    #[error("{message}")]
    Configuration { message: String },

    /// An argument constraint can never match the parameter it was applied to.
    #[error("Argument constraint is of type {constraint}, but parameter is of type {parameter}. No call can match this constraint.")]
    TypeMismatch { constraint: Type, parameter: Type },

    /// A user supplied predicate, description or formatter failed.
    #[error("{message}")]
    UserCallback {
        message: String,
        #[source]
        source: BoxError,
    },

    /// A call violated an expectation, e.g. an unconfigured call to a strict fake.
    #[error("{message}")]
    Expectation { message: String },

    /// A value could not be rendered for a diagnostic message.
    #[error("unable to render value of type {ty}: {reason}")]
    Render { ty: Type, reason: String },
}

impl Error {
    pub(crate) fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub(crate) fn expectation<S: Into<String>>(message: S) -> Self {
        Self::Expectation {
            message: message.into(),
        }
    }

    /// Returns `true` if this error wraps a fault of a user supplied callback.
    #[must_use]
    pub fn is_user_callback(&self) -> bool {
        matches!(self, Self::UserCallback { .. })
    }
}

/// Source error of a [`Error::UserCallback`] that was caused by a panic.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct CallbackPanic {
    /// Message of the panic payload, if it was a string.
    pub message: String,
}

impl CallbackPanic {
    fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_owned()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "callback panicked".to_owned()
        };

        Self { message }
    }
}

/// Run a user supplied callback and turn any fault it raises (an error it
/// returns or a panic) into a [`Error::UserCallback`].
///
/// `callback` names the callback in the resulting message. It is only
/// evaluated if the callback failed and may itself fail.
pub(crate) fn guard_callback<R, F, N>(callback: N, f: F) -> Result<R>
where
    F: FnOnce() -> std::result::Result<R, BoxError>,
    N: FnOnce() -> Result<String>,
{
    let source = match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => return Ok(value),
        Ok(Err(err)) => err,
        Err(payload) => Box::new(CallbackPanic::from_payload(payload)) as BoxError,
    };

    let callback = callback()?;

    tracing::debug!(%callback, error = %source, "user callback failed");

    Err(Error::UserCallback {
        message: format!("{callback} failed. See the source error for details."),
        source,
    })
}
