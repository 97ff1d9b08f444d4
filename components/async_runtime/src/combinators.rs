//! Promise combinators: `all`, `race`, `last` and `ignore_errors`.
//!
//! Every combinator validates its input synchronously, coerces each element
//! to a promise, subscribes to the inputs in index order and returns the
//! aggregate promise. Bookkeeping lives in an `Rc<RefCell<_>>` shared by the
//! observers; observers never run concurrently, so no lock is needed.

use std::cell::RefCell;
use std::rc::Rc;

use crate::event_loop::LoopHandle;
use crate::promise::{Promise, Settlement};
use core_types::{JsError, JsResult, Value};
use log::{debug, trace};

struct AllState {
    values: Vec<Option<Value>>,
    remaining: usize,
}

struct LastState {
    remaining: usize,
    last_rejection: Option<Value>,
}

struct IgnoreErrorsState {
    values: Vec<Value>,
    remaining: usize,
}

impl Promise {
    /// Promise.all(promises)
    ///
    /// Fulfills with the input values in input order once every input has
    /// fulfilled. Rejects with the reason of the first input observed to
    /// reject; later settlements are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use async_runtime::{EventLoop, Promise};
    /// use core_types::Value;
    ///
    /// let mut event_loop = EventLoop::new();
    /// let handle = event_loop.handle();
    /// let inputs = Value::array(vec![
    ///     Promise::resolve_after(&handle, 30, Value::Smi(1)).to_value(),
    ///     Value::Smi(2),
    ///     Promise::resolve_after(&handle, 10, Value::Smi(3)).to_value(),
    /// ]);
    ///
    /// let all = Promise::all(&handle, &inputs).unwrap();
    /// event_loop.run_until_done().unwrap();
    /// assert_eq!(all.result().unwrap().to_string(), "1,2,3");
    /// ```
    pub fn all(handle: &LoopHandle, promises: &Value) -> JsResult<Promise> {
        let inputs = coerce_inputs(handle, promises, "Promise.all")?;
        let aggregate = Promise::new(handle);

        if inputs.is_empty() {
            aggregate.resolve(Value::array(Vec::new()));
            return Ok(aggregate);
        }

        let state = Rc::new(RefCell::new(AllState {
            values: vec![None; inputs.len()],
            remaining: inputs.len(),
        }));

        for (index, input) in inputs.into_iter().enumerate() {
            let state = state.clone();
            let aggregate = aggregate.clone();
            input.subscribe(move |settlement| match settlement {
                Settlement::Fulfilled(value) => {
                    let finished = {
                        let mut state = state.borrow_mut();
                        state.values[index] = Some(value);
                        state.remaining -= 1;
                        if state.remaining == 0 {
                            Some(std::mem::take(&mut state.values))
                        } else {
                            None
                        }
                    };
                    if let Some(values) = finished {
                        debug!("Promise.all #{}: every input fulfilled", aggregate.id());
                        aggregate.resolve(Value::array(values.into_iter().flatten().collect()));
                    }
                }
                Settlement::Rejected(reason) => {
                    if aggregate.is_pending() {
                        debug!("Promise.all #{}: input {} rejected", aggregate.id(), index);
                    }
                    aggregate.reject(reason);
                }
            });
        }

        Ok(aggregate)
    }

    /// Promise.race(promises)
    ///
    /// Settles the same way as the first input to settle. An empty input
    /// fulfills immediately with the input array itself.
    pub fn race(handle: &LoopHandle, promises: &Value) -> JsResult<Promise> {
        let inputs = coerce_inputs(handle, promises, "Promise.race")?;
        let aggregate = Promise::new(handle);

        if inputs.is_empty() {
            aggregate.resolve(promises.clone());
            return Ok(aggregate);
        }

        for (index, input) in inputs.into_iter().enumerate() {
            let aggregate = aggregate.clone();
            input.subscribe(move |settlement| {
                if !aggregate.is_pending() {
                    trace!("Promise.race #{}: ignoring late input {}", aggregate.id(), index);
                    return;
                }
                debug!("Promise.race #{}: won by input {}", aggregate.id(), index);
                match settlement {
                    Settlement::Fulfilled(value) => aggregate.resolve(value),
                    Settlement::Rejected(reason) => aggregate.reject(reason),
                }
            });
        }

        Ok(aggregate)
    }

    /// Waits for every input to settle, then fulfills with the value of the
    /// input that settled last. If any input rejected, rejects instead with
    /// the reason of the last rejection to occur.
    ///
    /// An empty input fulfills immediately with the input array itself.
    pub fn last(handle: &LoopHandle, promises: &Value) -> JsResult<Promise> {
        let inputs = coerce_inputs(handle, promises, "Promise.last")?;
        let aggregate = Promise::new(handle);

        if inputs.is_empty() {
            aggregate.resolve(promises.clone());
            return Ok(aggregate);
        }

        let state = Rc::new(RefCell::new(LastState {
            remaining: inputs.len(),
            last_rejection: None,
        }));

        for input in inputs {
            let state = state.clone();
            let aggregate = aggregate.clone();
            input.subscribe(move |settlement| {
                let outcome = {
                    let mut state = state.borrow_mut();
                    state.remaining -= 1;
                    if let Settlement::Rejected(reason) = &settlement {
                        state.last_rejection = Some(reason.clone());
                    }
                    if state.remaining > 0 {
                        return;
                    }
                    match state.last_rejection.take() {
                        Some(reason) => Settlement::Rejected(reason),
                        None => settlement,
                    }
                };

                debug!(
                    "Promise.last #{}: all inputs settled, {}",
                    aggregate.id(),
                    if outcome.is_fulfilled() { "fulfilling" } else { "rejecting" }
                );
                match outcome {
                    Settlement::Fulfilled(value) => aggregate.resolve(value),
                    Settlement::Rejected(reason) => aggregate.reject(reason),
                }
            });
        }

        Ok(aggregate)
    }

    /// Waits for every input to settle, then fulfills with the values of
    /// the inputs that fulfilled, in the order they fulfilled. Never
    /// rejects; rejection reasons are dropped.
    pub fn ignore_errors(handle: &LoopHandle, promises: &Value) -> JsResult<Promise> {
        let inputs = coerce_inputs(handle, promises, "Promise.ignoreErrors")?;
        let aggregate = Promise::new(handle);

        if inputs.is_empty() {
            aggregate.resolve(Value::array(Vec::new()));
            return Ok(aggregate);
        }

        let state = Rc::new(RefCell::new(IgnoreErrorsState {
            values: Vec::with_capacity(inputs.len()),
            remaining: inputs.len(),
        }));

        for (index, input) in inputs.into_iter().enumerate() {
            let state = state.clone();
            let aggregate = aggregate.clone();
            input.subscribe(move |settlement| {
                let finished = {
                    let mut state = state.borrow_mut();
                    state.remaining -= 1;
                    match settlement {
                        Settlement::Fulfilled(value) => state.values.push(value),
                        Settlement::Rejected(_) => {
                            debug!(
                                "Promise.ignoreErrors #{}: dropping rejection of input {}",
                                aggregate.id(),
                                index
                            );
                        }
                    }
                    if state.remaining == 0 {
                        Some(std::mem::take(&mut state.values))
                    } else {
                        None
                    }
                };
                if let Some(values) = finished {
                    aggregate.resolve(Value::array(values));
                }
            });
        }

        Ok(aggregate)
    }
}

fn coerce_inputs(handle: &LoopHandle, promises: &Value, method: &str) -> JsResult<Vec<Promise>> {
    let data = promises.as_array().ok_or_else(|| {
        JsError::invalid_argument(format!(
            "{}: the provided object ({}) is not an Array",
            method,
            promises.type_of()
        ))
    })?;

    let len = data.borrow().len();
    let mut inputs = Vec::with_capacity(len);
    for i in 0..len {
        let element = data.borrow().get(i).unwrap_or(Value::Undefined);
        inputs.push(Promise::resolve_value(handle, &element));
    }
    Ok(inputs)
}
