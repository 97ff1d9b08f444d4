//! Native callable values.

use std::fmt;

use crate::{JsResult, Value};

type Callback = Box<dyn Fn(Vec<Value>) -> JsResult<Value>>;

/// A host closure exposed to scripts as a function value.
///
/// Arguments are passed positionally; missing arguments are simply absent
/// from the vector, so callbacks should use `args.first()` and friends
/// rather than indexing.
///
/// # Examples
///
/// ```
/// use core_types::{NativeFunction, Value};
///
/// let double = NativeFunction::new("double", |args| {
///     let n = args.first().and_then(Value::as_number).unwrap_or(0.0);
///     Ok(Value::from(n * 2.0))
/// });
///
/// assert_eq!(double.call(vec![Value::Smi(21)]).unwrap(), Value::Smi(42));
/// ```
pub struct NativeFunction {
    name: String,
    callback: Callback,
}

impl NativeFunction {
    /// Wraps a closure as a named function.
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Vec<Value>) -> JsResult<Value> + 'static,
    {
        Self {
            name: name.into(),
            callback: Box::new(f),
        }
    }

    /// Calls the function with the given arguments.
    pub fn call(&self, args: Vec<Value>) -> JsResult<Value> {
        (self.callback)(args)
    }

    /// Returns the function's name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFunction {{ name: {:?} }}", self.name)
    }
}
