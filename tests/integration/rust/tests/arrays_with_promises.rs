//! Sequence utilities and promise combinators used together

use async_runtime::{EventLoop, Promise, Settlement};
use builtins::{ArrayPrototype, ReduceSeed};
use core_types::{JsError, Value};

fn delays(values: &[i32]) -> Value {
    Value::array(values.iter().map(|n| Value::Smi(*n)).collect())
}

/// Test: map builds the promises, all collects them in input order
#[test]
fn test_map_to_promises_then_all() {
    let mut event_loop = EventLoop::new();
    let handle = event_loop.handle();

    let h = handle.clone();
    let to_promise = Value::function("toPromise", move |args| {
        let ms = args[0].as_number().unwrap_or(0.0) as u64;
        Ok(Promise::resolve_after(&h, ms, Value::number(ms as f64 / 10.0)).to_value())
    });
    let promises = ArrayPrototype::map(&delays(&[30, 10, 20]), &to_promise).unwrap();

    let all = Promise::all(&handle, &promises).unwrap();
    let settlement = event_loop.run_until_settled(&all).unwrap();

    let expected = delays(&[3, 1, 2]);
    assert!(settlement.into_value().deep_eq(&expected));
    assert_eq!(event_loop.now(), 30);
}

/// Test: holes in a mapped array become undefined inputs to all
#[test]
fn test_map_preserves_holes_for_all() {
    let mut event_loop = EventLoop::new();
    let handle = event_loop.handle();

    let h = handle.clone();
    let to_promise = Value::function("toPromise", move |args| {
        Ok(Promise::resolved(&h, args[0].clone()).to_value())
    });
    let sparse = Value::sparse_array(vec![Some(Value::Smi(1)), None, Some(Value::Smi(3))]);
    let promises = ArrayPrototype::map(&sparse, &to_promise).unwrap();

    let all = Promise::all(&handle, &promises).unwrap();
    event_loop.run_until_done().unwrap();

    let expected = Value::array(vec![Value::Smi(1), Value::Undefined, Value::Smi(3)]);
    assert!(all.result().unwrap().deep_eq(&expected));
}

/// Test: ignore_errors output feeds reduce
#[test]
fn test_ignore_errors_then_reduce() {
    let mut event_loop = EventLoop::new();
    let handle = event_loop.handle();
    let inputs = Value::array(vec![
        Promise::resolve_after(&handle, 5, Value::Smi(10)).to_value(),
        Promise::reject_after(&handle, 1, Value::string("skip")).to_value(),
        Promise::resolve_after(&handle, 2, Value::Smi(32)).to_value(),
    ]);

    let ignored = Promise::ignore_errors(&handle, &inputs).unwrap();
    let values = match event_loop.run_until_settled(&ignored).unwrap() {
        Settlement::Fulfilled(values) => values,
        Settlement::Rejected(reason) => panic!("unexpected rejection: {}", reason),
    };

    let sum = Value::function("sum", |args| {
        let a = args[0].as_number().unwrap_or(0.0);
        let b = args[1].as_number().unwrap_or(0.0);
        Ok(Value::number(a + b))
    });
    assert_eq!(
        ArrayPrototype::reduce(&values, &sum, Some(ReduceSeed::Value(Value::Smi(0)))).unwrap(),
        Value::Smi(42)
    );
}

/// Test: filter on settled values chosen by a then() handler
#[test]
fn test_then_handler_uses_filter() {
    let mut event_loop = EventLoop::new();
    let handle = event_loop.handle();
    let source = Promise::resolve_after(&handle, 10, delays(&[1, 2, 3, 4]));

    let evens = source.then(
        Some(Value::function("keepEven", |args| {
            let is_even = Value::function("isEven", |inner| {
                Ok(Value::Boolean(inner[0].as_number().unwrap_or(1.0) % 2.0 == 0.0))
            });
            ArrayPrototype::filter(&args[0], &is_even)
        })),
        None,
    );

    event_loop.run_until_done().unwrap();
    assert!(evens.result().unwrap().deep_eq(&delays(&[2, 4])));
}

/// Test: a sequence utility failing inside a handler rejects the chain
#[test]
fn test_invalid_argument_inside_handler_rejects() {
    let mut event_loop = EventLoop::new();
    let handle = event_loop.handle();
    let source = Promise::resolved(&handle, Value::Smi(7));

    let chained = source.then(
        Some(Value::function("badReduce", |args| {
            ArrayPrototype::reduce(&args[0], &Value::Null, None)
        })),
        None,
    );

    event_loop.run_until_done().unwrap();
    let reason = chained.reason().unwrap();
    assert!(reason.to_string().starts_with("TypeError"));
}

/// Test: every and some over combinator results
#[test]
fn test_every_and_some_over_race_results() {
    let mut event_loop = EventLoop::new();
    let handle = event_loop.handle();

    let mut winners = Vec::new();
    for round in 0..3 {
        let inputs = Value::array(vec![
            Promise::resolve_after(&handle, 10 + round, Value::Boolean(true)).to_value(),
            Promise::resolve_after(&handle, 20 + round, Value::Boolean(false)).to_value(),
        ]);
        winners.push(Promise::race(&handle, &inputs).unwrap());
    }
    event_loop.run_until_done().unwrap();

    let results = Value::array(winners.iter().filter_map(Promise::result).collect());
    let identity = Value::function("identity", |args| Ok(args[0].clone()));
    assert!(ArrayPrototype::every(&results, &identity).unwrap());
    assert!(ArrayPrototype::some(&results, &identity).unwrap());
}

/// Test: entries over promise values tracks their state
#[test]
fn test_entries_over_promises() {
    let mut event_loop = EventLoop::new();
    let handle = event_loop.handle();
    let inputs = Value::array(vec![
        Promise::resolve_after(&handle, 1, Value::Smi(1)).to_value(),
        Promise::new(&handle).to_value(),
    ]);
    event_loop.run_until_done().unwrap();

    let state = Value::function("state", |args| {
        let promise = Promise::from_value(&args[0])
            .ok_or_else(|| JsError::invalid_argument("not a promise"))?;
        Ok(Value::string(format!("{:?}", promise.state())))
    });
    let pairs = ArrayPrototype::entries_array(&inputs, Some(&state)).unwrap();
    assert_eq!(pairs.to_string(), "0,Fulfilled,1,Pending");
}
