//! Array.prototype iteration methods
//!
//! Every method is a plain indexed loop over `0..length`, with the length
//! read once when the call starts. Elements are re-read on each step, so a
//! callback that mutates the array sees its own writes, but the number of
//! steps never changes. Holes are skipped by everything except `entries`.

use core_types::{ArrayRef, FunctionRef, JsError, JsResult, Value};

use crate::iterator::{ArrayEntries, IteratorStep};

/// Seed for [`ArrayPrototype::reduce`].
#[derive(Debug, Clone, PartialEq)]
pub enum ReduceSeed {
    /// Start from this accumulator and fold every populated element
    Value(Value),
    /// Seed the accumulator from the first populated element and start
    /// folding at this index instead of the one after it
    StartIndex(usize),
}

/// Array.prototype methods
pub struct ArrayPrototype;

impl ArrayPrototype {
    /// Array.prototype.forEach(callback)
    ///
    /// Calls `callback(element, index, array)` for every populated index in
    /// ascending order.
    pub fn for_each(arr: &Value, callback: &Value) -> JsResult<()> {
        let data = expect_array(arr, "forEach")?;
        let callback = expect_callable(callback, "forEach")?;
        let len = data.borrow().len();

        for i in 0..len {
            if let Some(element) = element_at(data, i) {
                callback.call(vec![element, Value::from_index(i), arr.clone()])?;
            }
        }
        Ok(())
    }

    /// Array.prototype.map(callback)
    ///
    /// The result has the input's length; holes stay holes.
    pub fn map(arr: &Value, callback: &Value) -> JsResult<Value> {
        let data = expect_array(arr, "map")?;
        let callback = expect_callable(callback, "map")?;
        let len = data.borrow().len();

        let mut slots = vec![None; len];
        for (i, slot) in slots.iter_mut().enumerate() {
            if let Some(element) = element_at(data, i) {
                *slot = Some(callback.call(vec![element, Value::from_index(i), arr.clone()])?);
            }
        }
        Ok(Value::sparse_array(slots))
    }

    /// Array.prototype.filter(callback)
    ///
    /// Returns a dense array of the elements whose callback result is truthy.
    pub fn filter(arr: &Value, callback: &Value) -> JsResult<Value> {
        let data = expect_array(arr, "filter")?;
        let callback = expect_callable(callback, "filter")?;
        let len = data.borrow().len();

        let mut kept = Vec::new();
        for i in 0..len {
            if let Some(element) = element_at(data, i) {
                let keep = callback
                    .call(vec![element.clone(), Value::from_index(i), arr.clone()])?
                    .is_truthy();
                if keep {
                    kept.push(element);
                }
            }
        }
        Ok(Value::array(kept))
    }

    /// Array.prototype.reduce(callback, seed)
    ///
    /// Calls `callback(accumulator, element, index, array)` left to right.
    ///
    /// # Errors
    ///
    /// - [`JsError::EmptyReduce`] if there is no populated element to seed
    ///   from and no [`ReduceSeed::Value`] was given.
    /// - [`JsError::InvalidArgument`] if a [`ReduceSeed::StartIndex`] is not
    ///   below the array length.
    ///
    /// # Examples
    ///
    /// ```
    /// use builtins::{ArrayPrototype, ReduceSeed};
    /// use core_types::Value;
    ///
    /// let arr = Value::array(vec![Value::Smi(1), Value::Smi(2), Value::Smi(3)]);
    /// let sum = Value::function("sum", |args| {
    ///     let acc = args[0].as_number().unwrap_or(0.0);
    ///     let x = args[1].as_number().unwrap_or(0.0);
    ///     Ok(Value::from(acc + x))
    /// });
    ///
    /// assert_eq!(ArrayPrototype::reduce(&arr, &sum, None).unwrap(), Value::Smi(6));
    /// assert_eq!(
    ///     ArrayPrototype::reduce(&arr, &sum, Some(ReduceSeed::Value(Value::Smi(10)))).unwrap(),
    ///     Value::Smi(16)
    /// );
    /// ```
    pub fn reduce(arr: &Value, callback: &Value, seed: Option<ReduceSeed>) -> JsResult<Value> {
        let data = expect_array(arr, "reduce")?;
        let callback = expect_callable(callback, "reduce")?;
        let len = data.borrow().len();

        let (mut accumulator, start) = match seed {
            Some(ReduceSeed::Value(initial)) => (initial, 0),
            Some(ReduceSeed::StartIndex(index)) => {
                if index >= len {
                    return Err(JsError::invalid_argument(format!(
                        "reduce start index {} is out of range for an array of length {}",
                        index, len
                    )));
                }
                let (first, element) = first_populated(data, len).ok_or(JsError::EmptyReduce)?;
                (element, index.max(first + 1))
            }
            None => {
                let (first, element) = first_populated(data, len).ok_or(JsError::EmptyReduce)?;
                (element, first + 1)
            }
        };

        for i in start..len {
            if let Some(element) = element_at(data, i) {
                accumulator =
                    callback.call(vec![accumulator, element, Value::from_index(i), arr.clone()])?;
            }
        }
        Ok(accumulator)
    }

    /// Array.prototype.every(callback)
    ///
    /// Stops at the first falsy callback result. Vacuously true for arrays
    /// without populated elements.
    pub fn every(arr: &Value, callback: &Value) -> JsResult<bool> {
        let data = expect_array(arr, "every")?;
        let callback = expect_callable(callback, "every")?;
        let len = data.borrow().len();

        let mut i = 0;
        while i < len {
            if let Some(element) = element_at(data, i) {
                if !callback
                    .call(vec![element, Value::from_index(i), arr.clone()])?
                    .is_truthy()
                {
                    return Ok(false);
                }
            }
            i += 1;
        }
        Ok(true)
    }

    /// Array.prototype.some(callback)
    ///
    /// Stops at the first truthy callback result.
    pub fn some(arr: &Value, callback: &Value) -> JsResult<bool> {
        let data = expect_array(arr, "some")?;
        let callback = expect_callable(callback, "some")?;
        let len = data.borrow().len();

        let mut i = 0;
        while i < len {
            if let Some(element) = element_at(data, i) {
                if callback
                    .call(vec![element, Value::from_index(i), arr.clone()])?
                    .is_truthy()
                {
                    return Ok(true);
                }
            }
            i += 1;
        }
        Ok(false)
    }

    /// Array.prototype.entries(transform)
    ///
    /// Returns a fresh cursor of `(index, element)` pairs. When a transform
    /// is given, each element is passed through it (as its only argument)
    /// before being yielded. `Some(&Value::Undefined)` counts as no
    /// transform.
    pub fn entries(arr: &Value, transform: Option<&Value>) -> JsResult<ArrayEntries> {
        let data = expect_array(arr, "entries")?;
        let transform = match transform {
            None | Some(Value::Undefined) => None,
            Some(f) => Some(expect_callable(f, "entries")?.clone()),
        };
        Ok(ArrayEntries::new(data.clone(), transform))
    }

    /// Drains [`ArrayPrototype::entries`] into an array of `[index, element]`
    /// arrays.
    pub fn entries_array(arr: &Value, transform: Option<&Value>) -> JsResult<Value> {
        let mut entries = Self::entries(arr, transform)?;
        let mut pairs = Vec::with_capacity(entries.remaining());
        while let IteratorStep::Yield(index, element) = entries.step()? {
            pairs.push(Value::array(vec![Value::from_index(index), element]));
        }
        Ok(Value::array(pairs))
    }
}

fn expect_array<'a>(arr: &'a Value, method: &str) -> JsResult<&'a ArrayRef> {
    arr.as_array().ok_or_else(|| {
        JsError::invalid_argument(format!(
            "{} called on non-array ({})",
            method,
            arr.type_of()
        ))
    })
}

fn expect_callable<'a>(callback: &'a Value, method: &str) -> JsResult<&'a FunctionRef> {
    callback.as_function().ok_or_else(|| {
        JsError::invalid_argument(format!(
            "{}: callback ({}) is not a function",
            method,
            callback.type_of()
        ))
    })
}

// Reads one slot without holding the borrow across the callback.
fn element_at(data: &ArrayRef, index: usize) -> Option<Value> {
    data.borrow().get(index)
}

fn first_populated(data: &ArrayRef, len: usize) -> Option<(usize, Value)> {
    (0..len).find_map(|i| element_at(data, i).map(|element| (i, element)))
}
