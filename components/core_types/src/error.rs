//! Error taxonomy shared by the built-ins and the async runtime.
//!
//! Validation failures are reported synchronously through [`JsResult`].
//! Values thrown by user callbacks travel as [`JsError::Thrown`] and become
//! promise rejection reasons via [`JsError::into_reason`].

use thiserror::Error;

use crate::Value;

/// An error raised while running a built-in.
///
/// # Examples
///
/// ```
/// use core_types::{JsError, Value};
///
/// let err = JsError::invalid_argument("callback is not a function");
/// assert_eq!(err.to_string(), "TypeError: callback is not a function");
///
/// let thrown = JsError::Thrown(Value::Smi(7));
/// assert_eq!(thrown.into_reason(), Value::Smi(7));
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum JsError {
    /// The primary input has the wrong shape, or a required callback is not callable
    #[error("TypeError: {0}")]
    InvalidArgument(String),
    /// `reduce` was called without a seed on an array with no populated elements
    #[error("TypeError: Reduce of empty array with no initial value")]
    EmptyReduce,
    /// A value thrown by a user callback
    #[error("Uncaught {0}")]
    Thrown(Value),
    /// Engine misuse, such as waiting on a promise that can never settle
    #[error("InternalError: {0}")]
    InternalError(String),
}

impl JsError {
    /// Creates an [`JsError::InvalidArgument`] error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        JsError::InvalidArgument(message.into())
    }

    /// Creates an [`JsError::InternalError`] error.
    pub fn internal(message: impl Into<String>) -> Self {
        JsError::InternalError(message.into())
    }

    /// Converts the error into a value usable as a rejection reason.
    ///
    /// Thrown values are passed through untouched; every other variant is
    /// rendered to its message string.
    pub fn into_reason(self) -> Value {
        match self {
            JsError::Thrown(value) => value,
            other => Value::String(other.to_string()),
        }
    }
}

/// Result type for fallible built-in operations
pub type JsResult<T> = Result<T, JsError>;
