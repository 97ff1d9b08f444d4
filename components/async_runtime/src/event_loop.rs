//! Event loop implementation.
//!
//! This module provides the main event loop that coordinates task, microtask
//! and timer execution following the JavaScript event loop model.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::config::{ClockMode, EventLoopConfig};
use crate::promise::{Promise, Settlement};
use crate::task_queue::{MicroTask, MicrotaskQueue, Task, TaskQueue, TimerQueue};
use core_types::{JsError, JsResult, Value};
use log::{debug, trace};

#[derive(Debug, Default)]
struct Queues {
    tasks: TaskQueue,
    microtasks: MicrotaskQueue,
    timers: TimerQueue,
    now_ms: u64,
    next_promise_id: u64,
}

/// Shared handle to an event loop's queues and clock.
///
/// Promises keep a handle so that settling one can schedule its reactions.
/// Cloning is cheap; every clone refers to the same loop.
#[derive(Debug, Clone, Default)]
pub struct LoopHandle {
    queues: Rc<RefCell<Queues>>,
}

impl LoopHandle {
    /// Adds a task to the task queue.
    pub fn enqueue_task(&self, task: Task) {
        self.queues.borrow_mut().tasks.enqueue(task);
    }

    /// Adds a microtask to the microtask queue.
    pub fn enqueue_microtask(&self, microtask: MicroTask) {
        self.queues.borrow_mut().microtasks.enqueue(microtask);
    }

    /// Runs `f` as a task once `delay_ms` milliseconds have elapsed on the
    /// loop clock.
    pub fn set_timeout<F>(&self, delay_ms: u64, f: F)
    where
        F: FnOnce() -> JsResult<Value> + 'static,
    {
        let mut queues = self.queues.borrow_mut();
        let due = queues.now_ms.saturating_add(delay_ms);
        trace!("timer scheduled for {} ms (now {} ms)", due, queues.now_ms);
        queues.timers.schedule(due, Task::new(f));
    }

    /// Current loop time in milliseconds since the loop was created.
    pub fn now(&self) -> u64 {
        self.queues.borrow().now_ms
    }

    pub(crate) fn next_promise_id(&self) -> u64 {
        let mut queues = self.queues.borrow_mut();
        queues.next_promise_id += 1;
        queues.next_promise_id
    }

    fn pop_task(&self) -> Option<Task> {
        self.queues.borrow_mut().tasks.dequeue()
    }

    fn pop_microtask(&self) -> Option<MicroTask> {
        self.queues.borrow_mut().microtasks.dequeue()
    }

    fn is_idle(&self) -> bool {
        let queues = self.queues.borrow();
        queues.tasks.is_empty() && queues.microtasks.is_empty() && queues.timers.is_empty()
    }
}

/// The event loop.
///
/// Each iteration (turn) of the loop:
/// 1. Takes the oldest task from the task queue and executes it
/// 2. Drains all microtasks in the microtask queue
/// 3. If there was nothing to run, advances the clock to the next timer
///    and queues every timer due at that instant
///
/// # Examples
///
/// ```
/// use async_runtime::{EventLoop, Task};
/// use core_types::Value;
///
/// let mut event_loop = EventLoop::new();
///
/// event_loop.enqueue_task(Task::new(|| Ok(Value::Undefined)));
/// event_loop.run_until_done().unwrap();
/// ```
#[derive(Debug, Default)]
pub struct EventLoop {
    handle: LoopHandle,
    config: EventLoopConfig,
}

impl EventLoop {
    /// Creates a new EventLoop with empty queues and the default configuration.
    pub fn new() -> Self {
        Self::with_config(EventLoopConfig::default())
    }

    /// Creates a new EventLoop with the given configuration.
    pub fn with_config(config: EventLoopConfig) -> Self {
        Self {
            handle: LoopHandle::default(),
            config,
        }
    }

    /// Returns a handle for creating promises and timers on this loop.
    pub fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    /// Returns the loop configuration.
    pub fn config(&self) -> &EventLoopConfig {
        &self.config
    }

    /// Current loop time in milliseconds.
    pub fn now(&self) -> u64 {
        self.handle.now()
    }

    /// Runs the event loop until all tasks, microtasks and timers are
    /// processed.
    ///
    /// # Returns
    ///
    /// `Ok(())` if all tasks completed successfully, or the first error a
    /// task or microtask returned.
    pub fn run_until_done(&mut self) -> JsResult<()> {
        let mut turns = 0;
        while self.turn(&mut turns)? {}
        Ok(())
    }

    /// Runs the event loop until `promise` settles.
    ///
    /// # Errors
    ///
    /// Returns [`JsError::InternalError`] if the loop runs out of work while
    /// the promise is still pending, or if the turn limit is exceeded.
    ///
    /// # Examples
    ///
    /// ```
    /// use async_runtime::{EventLoop, Promise, Settlement};
    /// use core_types::Value;
    ///
    /// let mut event_loop = EventLoop::new();
    /// let promise = Promise::resolve_after(&event_loop.handle(), 250, Value::Smi(1));
    ///
    /// let settlement = event_loop.run_until_settled(&promise).unwrap();
    /// assert_eq!(settlement, Settlement::Fulfilled(Value::Smi(1)));
    /// assert_eq!(event_loop.now(), 250);
    /// ```
    pub fn run_until_settled(&mut self, promise: &Promise) -> JsResult<Settlement> {
        let mut turns = 0;
        loop {
            if let Some(settlement) = promise.settlement() {
                return Ok(settlement);
            }
            if !self.turn(&mut turns)? {
                return Err(JsError::internal(format!(
                    "promise #{} is still pending but the event loop has no work left",
                    promise.id()
                )));
            }
        }
    }

    /// Adds a task to the task queue.
    pub fn enqueue_task(&mut self, task: Task) {
        self.handle.enqueue_task(task);
    }

    /// Adds a microtask to the microtask queue.
    pub fn enqueue_microtask(&mut self, microtask: MicroTask) {
        self.handle.enqueue_microtask(microtask);
    }

    /// Returns true if the task queue is empty.
    pub fn is_task_queue_empty(&self) -> bool {
        self.handle.queues.borrow().tasks.is_empty()
    }

    /// Returns true if the microtask queue is empty.
    pub fn is_microtask_queue_empty(&self) -> bool {
        self.handle.queues.borrow().microtasks.is_empty()
    }

    /// Returns the number of timers that have not fired yet.
    pub fn pending_timers(&self) -> usize {
        self.handle.queues.borrow().timers.len()
    }

    /// Runs all microtasks in the queue until empty.
    ///
    /// New microtasks added during execution are also processed before this
    /// method returns.
    pub fn run_all_microtasks(&mut self) -> JsResult<()> {
        while let Some(microtask) = self.handle.pop_microtask() {
            microtask.run()?;
        }
        Ok(())
    }

    /// Processes one complete cycle: one task followed by all microtasks.
    ///
    /// Timers are not consulted.
    pub fn process_one_cycle(&mut self) -> JsResult<()> {
        if let Some(task) = self.handle.pop_task() {
            task.run()?;
        }
        self.run_all_microtasks()
    }

    // Returns false once there is nothing left to do.
    fn turn(&mut self, turns: &mut usize) -> JsResult<bool> {
        if self.handle.is_idle() {
            return Ok(false);
        }
        if let Some(limit) = self.config.max_turns {
            if *turns >= limit {
                return Err(JsError::internal(format!(
                    "event loop exceeded the limit of {} turns",
                    limit
                )));
            }
        }
        *turns += 1;

        if let Some(task) = self.handle.pop_task() {
            task.run()?;
            self.run_all_microtasks()?;
        } else if !self.is_microtask_queue_empty() {
            self.run_all_microtasks()?;
        } else {
            self.advance_clock();
        }
        Ok(true)
    }

    fn advance_clock(&mut self) {
        let next_due = self.handle.queues.borrow().timers.next_due();
        let Some(due) = next_due else {
            return;
        };

        let now = self.handle.now();
        if due > now {
            debug!("advancing clock from {} ms to {} ms", now, due);
            if self.config.clock == ClockMode::RealTime {
                std::thread::sleep(Duration::from_millis(due - now));
            }
        }

        let mut queues = self.handle.queues.borrow_mut();
        queues.now_ms = queues.now_ms.max(due);
        let now = queues.now_ms;
        let expired = queues.timers.take_due(now);
        trace!("{} timer(s) expired at {} ms", expired.len(), now);
        for task in expired {
            queues.tasks.enqueue(task);
        }
    }
}

impl Drop for EventLoop {
    fn drop(&mut self) {
        // Queued closures own promises, which own a handle back to these
        // queues. Emptying the queues breaks that cycle.
        let pending = match self.handle.queues.try_borrow_mut() {
            Ok(mut queues) => Some((
                std::mem::take(&mut queues.tasks),
                std::mem::take(&mut queues.microtasks),
                std::mem::take(&mut queues.timers),
            )),
            Err(_) => None,
        };
        if let Some((tasks, microtasks, timers)) = pending {
            if !timers.is_empty() {
                debug!("event loop dropped with {} pending timer(s)", timers.len());
            }
            drop((tasks, microtasks, timers));
        }
    }
}
