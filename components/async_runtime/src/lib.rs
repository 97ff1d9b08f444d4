//! Async runtime: event loop, promises and promise combinators.
//!
//! This crate provides the async building blocks the combinators are made
//! of, and the combinators themselves:
//! - Event loop with task, microtask and timer queues
//! - Promise implementation following the Promise/A+ specification
//! - `all`, `race`, `last` and `ignore_errors`
//!
//! # Overview
//!
//! - [`EventLoop`] - Single-threaded loop driving every settlement
//! - [`LoopHandle`] - Cloneable handle used to create promises and timers
//! - [`Promise`] - Settle-once handle observed through microtasks
//!
//! # Examples
//!
//! ## Event Loop Usage
//!
//! ```
//! use async_runtime::{EventLoop, Task};
//! use core_types::Value;
//!
//! let mut event_loop = EventLoop::new();
//! event_loop.enqueue_task(Task::new(|| Ok(Value::Undefined)));
//! event_loop.run_until_done().unwrap();
//! ```
//!
//! ## Combinator Usage
//!
//! ```
//! use async_runtime::{EventLoop, Promise, Settlement};
//! use core_types::Value;
//!
//! let mut event_loop = EventLoop::new();
//! let handle = event_loop.handle();
//!
//! let inputs = Value::array(vec![
//!     Promise::resolve_after(&handle, 1500, Value::string("first")).to_value(),
//!     Promise::reject_after(&handle, 1000, Value::string("second")).to_value(),
//!     Promise::resolve_after(&handle, 3000, Value::string("third")).to_value(),
//! ]);
//!
//! let race = Promise::race(&handle, &inputs).unwrap();
//! let settlement = event_loop.run_until_settled(&race).unwrap();
//! assert_eq!(settlement, Settlement::Rejected(Value::string("second")));
//! assert_eq!(event_loop.now(), 1000);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod combinators;
pub mod config;
pub mod event_loop;
pub mod promise;
pub mod task_queue;

// Re-export main types at crate root
pub use config::{ClockMode, EventLoopConfig};
pub use event_loop::{EventLoop, LoopHandle};
pub use promise::{Promise, PromiseState, Settlement};
pub use task_queue::{MicroTask, MicrotaskQueue, Task, TaskQueue, TimerQueue};
