//! Script value representation.
//!
//! This module provides the `Value` enum shared by the sequence built-ins and
//! the async runtime. Arrays are sparse: each slot is an `Option<Value>` and
//! `None` marks a hole, an index that was never assigned.

use num_bigint::BigInt;
use num_traits::Zero;
use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::{JsResult, NativeFunction};

/// Shared, mutable array storage.
pub type ArrayRef = Rc<RefCell<ArrayData>>;

/// Shared function handle.
pub type FunctionRef = Rc<NativeFunction>;

/// Backing storage of an array value.
///
/// # Examples
///
/// ```
/// use core_types::{ArrayData, Value};
///
/// let mut data = ArrayData::with_length(3);
/// data.set(1, Value::Smi(7));
///
/// assert_eq!(data.len(), 3);
/// assert!(!data.has(0));
/// assert_eq!(data.get(1), Some(Value::Smi(7)));
/// assert_eq!(data.populated(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArrayData {
    /// Array slots; `None` is a hole
    pub elements: Vec<Option<Value>>,
}

impl ArrayData {
    /// Creates an empty array.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an array of `len` holes, like `new Array(len)`.
    pub fn with_length(len: usize) -> Self {
        Self {
            elements: vec![None; len],
        }
    }

    /// Creates a dense array from values.
    pub fn from_values(values: Vec<Value>) -> Self {
        Self {
            elements: values.into_iter().map(Some).collect(),
        }
    }

    /// Returns the array length, holes included.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if the array has length zero.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns true if `index` holds an assigned element.
    pub fn has(&self, index: usize) -> bool {
        matches!(self.elements.get(index), Some(Some(_)))
    }

    /// Returns a copy of the element at `index`, or `None` for holes and
    /// out-of-range indices.
    pub fn get(&self, index: usize) -> Option<Value> {
        self.elements.get(index).cloned().flatten()
    }

    /// Assigns `index`, growing the array with holes if needed.
    pub fn set(&mut self, index: usize, value: Value) {
        if index >= self.elements.len() {
            self.elements.resize(index + 1, None);
        }
        self.elements[index] = Some(value);
    }

    /// Appends an element.
    pub fn push(&mut self, value: Value) {
        self.elements.push(Some(value));
    }

    /// Turns `index` into a hole, like `delete arr[index]`.
    pub fn delete(&mut self, index: usize) {
        if let Some(slot) = self.elements.get_mut(index) {
            *slot = None;
        }
    }

    /// Counts the populated (non-hole) slots.
    pub fn populated(&self) -> usize {
        self.elements.iter().filter(|slot| slot.is_some()).count()
    }
}

/// Represents any script value.
///
/// # Examples
///
/// ```
/// use core_types::Value;
///
/// let undefined = Value::Undefined;
/// let number = Value::Smi(42);
/// let float = Value::Double(3.14);
///
/// assert!(!undefined.is_truthy());
/// assert!(number.is_truthy());
/// assert_eq!(float.type_of(), "number");
///
/// let arr = Value::array(vec![Value::Smi(1), Value::Smi(2)]);
/// assert_eq!(arr.to_string(), "1,2");
/// ```
#[derive(Clone)]
pub enum Value {
    /// undefined
    Undefined,
    /// null
    Null,
    /// Boolean (true or false)
    Boolean(bool),
    /// Small integer
    Smi(i32),
    /// IEEE 754 double-precision floating point
    Double(f64),
    /// String value
    String(std::string::String),
    /// Arbitrary precision integer
    BigInt(BigInt),
    /// Sparse array, shared by reference
    Array(ArrayRef),
    /// Callable function, shared by reference
    Function(FunctionRef),
    /// Opaque host object (a promise, for instance)
    NativeObject(Rc<RefCell<dyn Any>>),
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "Undefined"),
            Value::Null => write!(f, "Null"),
            Value::Boolean(b) => f.debug_tuple("Boolean").field(b).finish(),
            Value::Smi(n) => f.debug_tuple("Smi").field(n).finish(),
            Value::Double(n) => f.debug_tuple("Double").field(n).finish(),
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::BigInt(n) => f.debug_tuple("BigInt").field(n).finish(),
            Value::Array(data) => f.debug_list().entries(data.borrow().elements.iter()).finish(),
            Value::Function(func) => f.debug_tuple("Function").field(&func.name()).finish(),
            Value::NativeObject(_) => write!(f, "NativeObject(...)"),
        }
    }
}

/// Strict equality: numbers compare by numeric value, reference types by
/// identity. Use [`Value::deep_eq`] to compare array contents.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Smi(a), Value::Smi(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Smi(a), Value::Double(b)) | (Value::Double(b), Value::Smi(a)) => {
                f64::from(*a) == *b
            }
            (Value::String(a), Value::String(b)) => a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::NativeObject(a), Value::NativeObject(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Value {
    /// Creates a number, using the small-integer form when it is exact.
    pub fn number(n: f64) -> Self {
        let is_negative_zero = n == 0.0 && n.is_sign_negative();
        if n.fract() == 0.0
            && n >= f64::from(i32::MIN)
            && n <= f64::from(i32::MAX)
            && !is_negative_zero
        {
            Value::Smi(n as i32)
        } else {
            Value::Double(n)
        }
    }

    /// Creates the number value for an array index.
    pub fn from_index(index: usize) -> Self {
        i32::try_from(index)
            .map(Value::Smi)
            .unwrap_or(Value::Double(index as f64))
    }

    /// Creates a string value.
    pub fn string(s: impl Into<std::string::String>) -> Self {
        Value::String(s.into())
    }

    /// Creates a dense array.
    pub fn array(values: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(ArrayData::from_values(values))))
    }

    /// Creates an array from explicit slots, `None` marking holes.
    ///
    /// ```
    /// use core_types::Value;
    ///
    /// let sparse = Value::sparse_array(vec![Some(Value::Smi(1)), None, Some(Value::Smi(3))]);
    /// assert_eq!(sparse.to_string(), "1,,3");
    /// ```
    pub fn sparse_array(slots: Vec<Option<Value>>) -> Self {
        Value::Array(Rc::new(RefCell::new(ArrayData { elements: slots })))
    }

    /// Creates a function value from a closure.
    pub fn function<F>(name: impl Into<std::string::String>, f: F) -> Self
    where
        F: Fn(Vec<Value>) -> JsResult<Value> + 'static,
    {
        Value::Function(Rc::new(NativeFunction::new(name, f)))
    }

    /// Wraps a host object.
    pub fn native<T: Any>(object: T) -> Self {
        let cell: Rc<RefCell<dyn Any>> = Rc::new(RefCell::new(object));
        Value::NativeObject(cell)
    }

    /// Returns a copy of the wrapped host object if it has type `T`.
    pub fn downcast_native<T: Any + Clone>(&self) -> Option<T> {
        match self {
            Value::NativeObject(cell) => cell.borrow().downcast_ref::<T>().cloned(),
            _ => None,
        }
    }

    /// Returns the array storage if this is an array.
    pub fn as_array(&self) -> Option<&ArrayRef> {
        match self {
            Value::Array(data) => Some(data),
            _ => None,
        }
    }

    /// Returns the function if this value is callable.
    pub fn as_function(&self) -> Option<&FunctionRef> {
        match self {
            Value::Function(func) => Some(func),
            _ => None,
        }
    }

    /// Returns true if the value can be called.
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    /// Returns the numeric value of `Smi` and `Double`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Smi(n) => Some(f64::from(*n)),
            Value::Double(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the string contents of a `String` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns whether this value is truthy.
    ///
    /// `undefined`, `null`, `false`, `0`, `NaN`, `""` and `0n` are falsy;
    /// everything else, including every array and function, is truthy.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_types::Value;
    ///
    /// assert!(!Value::Undefined.is_truthy());
    /// assert!(!Value::Smi(0).is_truthy());
    /// assert!(!Value::Double(f64::NAN).is_truthy());
    /// assert!(!Value::string("").is_truthy());
    /// assert!(Value::array(vec![]).is_truthy());
    /// ```
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined => false,
            Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Smi(n) => *n != 0,
            Value::Double(n) => !n.is_nan() && *n != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::BigInt(n) => !n.is_zero(),
            Value::Array(_) => true,
            Value::Function(_) => true,
            Value::NativeObject(_) => true,
        }
    }

    /// Returns the `typeof` result for this value.
    pub fn type_of(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "object".to_string(),
            Value::Boolean(_) => "boolean".to_string(),
            Value::Smi(_) | Value::Double(_) => "number".to_string(),
            Value::String(_) => "string".to_string(),
            Value::BigInt(_) => "bigint".to_string(),
            Value::Array(_) | Value::NativeObject(_) => "object".to_string(),
            Value::Function(_) => "function".to_string(),
        }
    }

    /// Structural equality: arrays are equal when they have the same length,
    /// the same hole positions and deep-equal elements.
    ///
    /// ```
    /// use core_types::Value;
    ///
    /// let a = Value::array(vec![Value::Smi(1), Value::array(vec![Value::Smi(2)])]);
    /// let b = Value::array(vec![Value::Smi(1), Value::array(vec![Value::Smi(2)])]);
    /// assert_ne!(a, b);
    /// assert!(a.deep_eq(&b));
    /// ```
    pub fn deep_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Array(a), Value::Array(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let a = a.borrow();
                let b = b.borrow();
                a.len() == b.len()
                    && a.elements.iter().zip(b.elements.iter()).all(|pair| match pair {
                        (Some(x), Some(y)) => x.deep_eq(y),
                        (None, None) => true,
                        _ => false,
                    })
            }
            _ => self == other,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Smi(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<std::string::String> for Value {
    fn from(s: std::string::String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::array(values)
    }
}

/// String conversion, following `String(value)`.
///
/// Arrays join their elements with `,`; holes, `undefined` and `null`
/// elements render as empty strings.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Smi(n) => write!(f, "{}", n),
            Value::Double(n) => {
                if n.is_nan() {
                    write!(f, "NaN")
                } else if n.is_infinite() {
                    if n.is_sign_positive() {
                        write!(f, "Infinity")
                    } else {
                        write!(f, "-Infinity")
                    }
                } else if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else if n.abs() >= 1e21 || (*n != 0.0 && n.abs() < 1e-6) {
                    // Exponent form, with an explicit sign: 1e+21, 1.5e-7
                    let exp = format!("{:e}", n);
                    match exp.split_once('e') {
                        Some((mantissa, power)) if !power.starts_with('-') => {
                            write!(f, "{}e+{}", mantissa, power)
                        }
                        _ => write!(f, "{}", exp),
                    }
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::String(s) => write!(f, "{}", s),
            Value::BigInt(n) => write!(f, "{}", n),
            Value::Array(data) => {
                let data = data.borrow();
                for (i, slot) in data.elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    match slot {
                        None | Some(Value::Undefined) | Some(Value::Null) => {}
                        Some(value) => write!(f, "{}", value)?,
                    }
                }
                Ok(())
            }
            Value::Function(func) => write!(f, "function {}() {{ [native code] }}", func.name()),
            Value::NativeObject(_) => write!(f, "[object Object]"),
        }
    }
}
