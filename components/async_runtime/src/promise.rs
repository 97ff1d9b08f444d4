//! Promise implementation following the Promise/A+ specification.
//!
//! A [`Promise`] is a cheap, cloneable handle to shared settlement state.
//! It settles at most once, and every observer registered before or after
//! settlement is notified exactly once, always from a microtask on the
//! owning event loop.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::event_loop::LoopHandle;
use crate::task_queue::MicroTask;
use core_types::{JsError, Value};
use log::trace;

/// The state of a Promise.
///
/// Once settled (Fulfilled or Rejected), a Promise cannot change state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromiseState {
    /// The initial state; the promise is neither fulfilled nor rejected.
    Pending,
    /// The promise has been resolved with a value.
    Fulfilled,
    /// The promise has been rejected with a reason.
    Rejected,
}

/// The terminal outcome of a promise.
#[derive(Debug, Clone, PartialEq)]
pub enum Settlement {
    /// Fulfilled with a value
    Fulfilled(Value),
    /// Rejected with a reason
    Rejected(Value),
}

impl Settlement {
    /// Returns the fulfillment value or rejection reason.
    pub fn into_value(self) -> Value {
        match self {
            Settlement::Fulfilled(value) | Settlement::Rejected(value) => value,
        }
    }

    /// Returns true for [`Settlement::Fulfilled`].
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, Settlement::Fulfilled(_))
    }

    fn state(&self) -> PromiseState {
        match self {
            Settlement::Fulfilled(_) => PromiseState::Fulfilled,
            Settlement::Rejected(_) => PromiseState::Rejected,
        }
    }
}

type Reaction = Box<dyn FnOnce(Settlement)>;

struct PromiseInner {
    id: u64,
    settlement: Option<Settlement>,
    // Set once `resolve` adopted another promise; the outcome is then locked in
    // even though the state is still pending.
    locked: bool,
    reactions: Vec<Reaction>,
}

/// A promise bound to an event loop.
///
/// # Examples
///
/// ```
/// use async_runtime::{EventLoop, Promise, PromiseState};
/// use core_types::Value;
///
/// let event_loop = EventLoop::new();
/// let promise = Promise::new(&event_loop.handle());
/// assert_eq!(promise.state(), PromiseState::Pending);
///
/// promise.resolve(Value::Smi(42));
/// assert_eq!(promise.state(), PromiseState::Fulfilled);
/// assert_eq!(promise.result(), Some(Value::Smi(42)));
/// ```
#[derive(Clone)]
pub struct Promise {
    inner: Rc<RefCell<PromiseInner>>,
    handle: LoopHandle,
}

impl Promise {
    /// Creates a new pending Promise on the given loop.
    pub fn new(handle: &LoopHandle) -> Self {
        Self {
            inner: Rc::new(RefCell::new(PromiseInner {
                id: handle.next_promise_id(),
                settlement: None,
                locked: false,
                reactions: Vec::new(),
            })),
            handle: handle.clone(),
        }
    }

    /// Creates a promise resolved with `value`, like `Promise.resolve(value)`
    /// without the promise pass-through (see [`Promise::resolve_value`]).
    pub fn resolved(handle: &LoopHandle, value: Value) -> Self {
        let promise = Self::new(handle);
        promise.resolve(value);
        promise
    }

    /// Creates a promise rejected with `reason`.
    pub fn rejected(handle: &LoopHandle, reason: Value) -> Self {
        let promise = Self::new(handle);
        promise.reject(reason);
        promise
    }

    /// Coerces a value to a promise: a value carrying a promise yields that
    /// same promise, anything else an already-fulfilled one.
    pub fn resolve_value(handle: &LoopHandle, value: &Value) -> Self {
        match Self::from_value(value) {
            Some(promise) => promise,
            None => Self::resolved(handle, value.clone()),
        }
    }

    /// Creates a promise fulfilled with `value` after `delay_ms` on the loop
    /// clock.
    pub fn resolve_after(handle: &LoopHandle, delay_ms: u64, value: Value) -> Self {
        let promise = Self::new(handle);
        let target = promise.clone();
        handle.set_timeout(delay_ms, move || {
            target.resolve(value);
            Ok(Value::Undefined)
        });
        promise
    }

    /// Creates a promise rejected with `reason` after `delay_ms` on the loop
    /// clock.
    pub fn reject_after(handle: &LoopHandle, delay_ms: u64, reason: Value) -> Self {
        let promise = Self::new(handle);
        let target = promise.clone();
        handle.set_timeout(delay_ms, move || {
            target.reject(reason);
            Ok(Value::Undefined)
        });
        promise
    }

    /// Wraps this promise in a [`Value`] so it can travel through arrays.
    pub fn to_value(&self) -> Value {
        Value::native(self.clone())
    }

    /// Extracts a promise previously wrapped with [`Promise::to_value`].
    pub fn from_value(value: &Value) -> Option<Promise> {
        value.downcast_native::<Promise>()
    }

    /// Resolves the Promise with a value.
    ///
    /// If the value carries another promise, this promise follows it and
    /// settles the same way. Resolving with itself rejects with a
    /// `TypeError`. If the Promise is already settled or already following
    /// another promise, this is a no-op.
    pub fn resolve(&self, value: Value) {
        if self.is_locked() {
            return;
        }

        match Self::from_value(&value) {
            Some(other) if Rc::ptr_eq(&other.inner, &self.inner) => {
                self.settle(Settlement::Rejected(
                    JsError::invalid_argument("Chaining cycle detected for promise").into_reason(),
                ));
            }
            Some(other) => {
                trace!("promise #{} follows promise #{}", self.id(), other.id());
                self.inner.borrow_mut().locked = true;
                let this = self.clone();
                other.subscribe(move |settlement| this.settle(settlement));
            }
            None => self.settle(Settlement::Fulfilled(value)),
        }
    }

    /// Rejects the Promise with a reason.
    ///
    /// If the Promise is already settled or following another promise, this
    /// is a no-op.
    pub fn reject(&self, reason: Value) {
        if self.is_locked() {
            return;
        }
        self.settle(Settlement::Rejected(reason));
    }

    /// Registers an observer called with the settlement.
    ///
    /// The observer always runs from a microtask, even when the promise has
    /// already settled.
    pub fn subscribe<F>(&self, observer: F)
    where
        F: FnOnce(Settlement) + 'static,
    {
        let settled = self.inner.borrow().settlement.clone();
        match settled {
            Some(settlement) => self.schedule(Box::new(observer), settlement),
            None => self.inner.borrow_mut().reactions.push(Box::new(observer)),
        }
    }

    /// Adds handlers for fulfillment and/or rejection.
    ///
    /// Returns a new Promise resolved with the handler's return value, or
    /// rejected with what the handler threw. A missing or non-callable
    /// handler passes the settlement through unchanged.
    pub fn then(&self, on_fulfilled: Option<Value>, on_rejected: Option<Value>) -> Promise {
        let chained = Promise::new(&self.handle);
        let next = chained.clone();

        self.subscribe(move |settlement| {
            let handler = match &settlement {
                Settlement::Fulfilled(_) => on_fulfilled,
                Settlement::Rejected(_) => on_rejected,
            };

            match handler.as_ref().and_then(Value::as_function) {
                Some(function) => match function.call(vec![settlement.into_value()]) {
                    Ok(value) => next.resolve(value),
                    Err(error) => next.reject(error.into_reason()),
                },
                None => match settlement {
                    Settlement::Fulfilled(value) => next.resolve(value),
                    Settlement::Rejected(reason) => next.reject(reason),
                },
            }
        });

        chained
    }

    /// Adds a rejection handler, like `promise.catch(handler)`.
    pub fn catch(&self, on_rejected: Value) -> Promise {
        self.then(None, Some(on_rejected))
    }

    /// Current state.
    pub fn state(&self) -> PromiseState {
        match &self.inner.borrow().settlement {
            Some(settlement) => settlement.state(),
            None => PromiseState::Pending,
        }
    }

    /// Returns true while the promise has not settled.
    pub fn is_pending(&self) -> bool {
        self.state() == PromiseState::Pending
    }

    /// The settlement, once there is one.
    pub fn settlement(&self) -> Option<Settlement> {
        self.inner.borrow().settlement.clone()
    }

    /// The fulfillment value, if fulfilled.
    pub fn result(&self) -> Option<Value> {
        match self.settlement() {
            Some(Settlement::Fulfilled(value)) => Some(value),
            _ => None,
        }
    }

    /// The rejection reason, if rejected.
    pub fn reason(&self) -> Option<Value> {
        match self.settlement() {
            Some(Settlement::Rejected(reason)) => Some(reason),
            _ => None,
        }
    }

    /// Number of observers waiting for settlement.
    pub fn pending_reactions(&self) -> usize {
        self.inner.borrow().reactions.len()
    }

    /// Identifier unique within the owning event loop, used in log output.
    pub fn id(&self) -> u64 {
        self.inner.borrow().id
    }

    fn is_locked(&self) -> bool {
        let inner = self.inner.borrow();
        inner.locked || inner.settlement.is_some()
    }

    fn settle(&self, settlement: Settlement) {
        let reactions = {
            let mut inner = self.inner.borrow_mut();
            if inner.settlement.is_some() {
                return;
            }
            trace!(
                "promise #{} {}",
                inner.id,
                if settlement.is_fulfilled() { "fulfilled" } else { "rejected" }
            );
            inner.settlement = Some(settlement.clone());
            std::mem::take(&mut inner.reactions)
        };

        for reaction in reactions {
            self.schedule(reaction, settlement.clone());
        }
    }

    fn schedule(&self, reaction: Reaction, settlement: Settlement) {
        self.handle.enqueue_microtask(MicroTask::new(move || {
            reaction(settlement);
            Ok(Value::Undefined)
        }));
    }
}

impl fmt::Debug for Promise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Promise")
            .field("id", &inner.id)
            .field("settlement", &inner.settlement)
            .field("reactions", &inner.reactions.len())
            .finish()
    }
}
