//! Core value types and error handling.
//!
//! This crate provides the foundational types shared by the sequence
//! built-ins and the async runtime.
//!
//! # Overview
//!
//! - [`Value`] - Tagged representation of script values
//! - [`ArrayData`] - Sparse array storage, holes included
//! - [`NativeFunction`] - Host closure callable as a script function
//! - [`JsError`] - Validation failures and thrown values
//!
//! # Examples
//!
//! ```
//! use core_types::{JsError, Value};
//!
//! let num = Value::Smi(42);
//! assert!(num.is_truthy());
//! assert_eq!(num.type_of(), "number");
//!
//! let callback = Value::function("id", |args| {
//!     Ok(args.into_iter().next().unwrap_or(Value::Undefined))
//! });
//! assert!(callback.is_callable());
//!
//! let error = JsError::invalid_argument("undefined is not a function");
//! assert_eq!(error.to_string(), "TypeError: undefined is not a function");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod function;
mod value;

pub use error::{JsError, JsResult};
pub use function::NativeFunction;
pub use value::{ArrayData, ArrayRef, FunctionRef, Value};
