//! Array iteration built-ins written from primitive loops
//!
//! This crate provides the Array.prototype iteration methods over the
//! sparse [`Value`] arrays of `core_types`:
//! - forEach, map, filter, reduce, every, some
//! - entries, as an explicit cursor ([`ArrayEntries`])
//!
//! Callbacks are function values, so both the array and the callback are
//! validated at call time and a wrong shape is reported as
//! [`JsError::InvalidArgument`].
//!
//! # Example
//!
//! ```
//! use builtins::ArrayPrototype;
//! use core_types::Value;
//!
//! let arr = Value::array(vec![
//!     Value::Smi(1),
//!     Value::Smi(2),
//!     Value::Smi(3),
//! ]);
//!
//! let double = Value::function("double", |args| {
//!     Ok(Value::from(args[0].as_number().unwrap_or(0.0) * 2.0))
//! });
//! let doubled = ArrayPrototype::map(&arr, &double).unwrap();
//! assert_eq!(doubled.to_string(), "2,4,6");
//!
//! let big = Value::function("big", |args| {
//!     Ok(Value::from(args[0].as_number().unwrap_or(0.0) > 4.0))
//! });
//! assert!(ArrayPrototype::some(&doubled, &big).unwrap());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod array;
pub mod iterator;

// Re-export main types for convenience
pub use array::{ArrayPrototype, ReduceSeed};
pub use core_types::{JsError, JsResult, Value};
pub use iterator::{ArrayEntries, IteratorStep};
