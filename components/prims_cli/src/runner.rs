//! Scenario orchestration
//!
//! The Runner builds a fresh event loop per combinator so every scenario
//! starts at time zero, then drives it until the combinator settles.

use std::cell::RefCell;
use std::rc::Rc;

use crate::cli::{Combinator, Command};
use crate::error::CliResult;
use crate::output::Report;
use async_runtime::{EventLoop, EventLoopConfig, LoopHandle, Promise};
use builtins::{ArrayPrototype, ReduceSeed};
use core_types::{JsResult, Value};
use log::info;

/// Runs the demo scenarios
#[derive(Debug, Clone, Default)]
pub struct Runner {
    config: EventLoopConfig,
}

impl Runner {
    /// Create a runner whose event loops use `config`
    ///
    /// # Example
    /// ```
    /// use async_runtime::EventLoopConfig;
    /// use prims_cli::{Combinator, Runner, Status};
    ///
    /// let runner = Runner::new(EventLoopConfig::default());
    /// let report = runner.run_combinator(Combinator::Race).unwrap();
    /// assert_eq!(report.status, Status::Rejected);
    /// assert_eq!(report.settled_at_ms, Some(1000));
    /// ```
    pub fn new(config: EventLoopConfig) -> Self {
        Self { config }
    }

    /// Runs the scenario named by `command`.
    pub fn run(&self, command: &Command) -> CliResult<Vec<Report>> {
        match command {
            Command::Combinators { only: Some(c) } => Ok(vec![self.run_combinator(*c)?]),
            Command::Combinators { only: None } => Combinator::ALL
                .iter()
                .map(|c| self.run_combinator(*c))
                .collect(),
            Command::Arrays => Ok(run_arrays()?),
        }
    }

    /// Applies one combinator to [`sample_promises`] and waits for it.
    pub fn run_combinator(&self, combinator: Combinator) -> CliResult<Report> {
        let mut event_loop = EventLoop::with_config(self.config.clone());
        let handle = event_loop.handle();
        let inputs = sample_promises(&handle);

        let promise = match combinator {
            Combinator::All => Promise::all(&handle, &inputs),
            Combinator::Race => Promise::race(&handle, &inputs),
            Combinator::Last => Promise::last(&handle, &inputs),
            Combinator::IgnoreErrors => Promise::ignore_errors(&handle, &inputs),
        }?;

        let settlement = event_loop.run_until_settled(&promise)?;
        info!("{} settled at {} ms", combinator.name(), event_loop.now());
        Ok(Report::settled(combinator.name(), settlement, event_loop.now()))
    }
}

/// The three timed promises: the first resolves after 1500 ms, the second
/// rejects after 1000 ms and the third resolves after 3000 ms.
pub fn sample_promises(handle: &LoopHandle) -> Value {
    Value::array(vec![
        Promise::resolve_after(handle, 1500, Value::string("First promise resolved")).to_value(),
        Promise::reject_after(handle, 1000, Value::string("Second promise rejected")).to_value(),
        Promise::resolve_after(handle, 3000, Value::string("Third promise resolved")).to_value(),
    ])
}

/// `[1, 2, <hole>, 4, 5]`
pub fn sample_array() -> Value {
    Value::sparse_array(vec![
        Some(Value::Smi(1)),
        Some(Value::Smi(2)),
        None,
        Some(Value::Smi(4)),
        Some(Value::Smi(5)),
    ])
}

/// Runs every sequence utility over [`sample_array`].
pub fn run_arrays() -> JsResult<Vec<Report>> {
    let arr = sample_array();
    let mut reports = Vec::new();

    let visited = Rc::new(RefCell::new(Vec::new()));
    let sink = visited.clone();
    ArrayPrototype::for_each(
        &arr,
        &Value::function("record", move |args| {
            sink.borrow_mut().push(arg(&args, 1));
            Ok(Value::Undefined)
        }),
    )?;
    let visited = Value::array(visited.take());
    reports.push(Report::returned("forEach (visited indices)", &visited));

    let double = Value::function("double", |args| Ok(Value::number(number(&args, 0) * 2.0)));
    reports.push(Report::returned("map (x * 2)", &ArrayPrototype::map(&arr, &double)?));

    let is_even = Value::function("isEven", |args| {
        Ok(Value::Boolean(number(&args, 0) % 2.0 == 0.0))
    });
    reports.push(Report::returned("filter (even)", &ArrayPrototype::filter(&arr, &is_even)?));

    let sum = Value::function("sum", |args| {
        Ok(Value::number(number(&args, 0) + number(&args, 1)))
    });
    reports.push(Report::returned("reduce (sum)", &ArrayPrototype::reduce(&arr, &sum, None)?));
    reports.push(Report::returned(
        "reduce (sum, from 3)",
        &ArrayPrototype::reduce(&arr, &sum, Some(ReduceSeed::StartIndex(3)))?,
    ));

    let positive = Value::function("positive", |args| Ok(Value::Boolean(number(&args, 0) > 0.0)));
    let every = ArrayPrototype::every(&arr, &positive)?;
    reports.push(Report::returned("every (x > 0)", &Value::Boolean(every)));

    let above_four = Value::function("aboveFour", |args| Ok(Value::Boolean(number(&args, 0) > 4.0)));
    let some = ArrayPrototype::some(&arr, &above_four)?;
    reports.push(Report::returned("some (x > 4)", &Value::Boolean(some)));

    reports.push(Report::returned("entries", &ArrayPrototype::entries_array(&arr, None)?));

    Ok(reports)
}

fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or(Value::Undefined)
}

fn number(args: &[Value], index: usize) -> f64 {
    args.get(index).and_then(Value::as_number).unwrap_or(f64::NAN)
}
