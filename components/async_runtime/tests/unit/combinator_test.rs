//! Unit tests for Promise.all, Promise.race, Promise.last and
//! Promise.ignoreErrors

use async_runtime::{EventLoop, LoopHandle, Promise, PromiseState, Settlement};
use core_types::{JsError, Value};

fn ok(handle: &LoopHandle, delay_ms: u64, value: &str) -> Value {
    Promise::resolve_after(handle, delay_ms, Value::string(value)).to_value()
}

fn err(handle: &LoopHandle, delay_ms: u64, reason: &str) -> Value {
    Promise::reject_after(handle, delay_ms, Value::string(reason)).to_value()
}

fn strings(values: &[&str]) -> Value {
    Value::array(values.iter().map(|s| Value::string(*s)).collect())
}

// The three promises used throughout: p1 resolves at 1500 ms, p2 rejects at
// 1000 ms and p3 resolves at 3000 ms.
fn sample(handle: &LoopHandle) -> Value {
    Value::array(vec![
        ok(handle, 1500, "First promise resolved"),
        err(handle, 1000, "Second promise rejected"),
        ok(handle, 3000, "Third promise resolved"),
    ])
}

mod all {
    use super::*;

    #[test]
    fn empty_input_fulfills_with_empty_array() {
        let mut event_loop = EventLoop::new();
        let all = Promise::all(&event_loop.handle(), &Value::array(vec![])).unwrap();

        event_loop.run_until_done().unwrap();
        assert!(all.result().unwrap().deep_eq(&Value::array(vec![])));
    }

    #[test]
    fn values_follow_input_order_not_completion_order() {
        let mut event_loop = EventLoop::new();
        let handle = event_loop.handle();
        let inputs = Value::array(vec![
            ok(&handle, 30, "a"),
            ok(&handle, 10, "b"),
            ok(&handle, 20, "c"),
        ]);

        let all = Promise::all(&handle, &inputs).unwrap();
        event_loop.run_until_done().unwrap();

        assert!(all.result().unwrap().deep_eq(&strings(&["a", "b", "c"])));
    }

    #[test]
    fn plain_values_are_treated_as_fulfilled() {
        let mut event_loop = EventLoop::new();
        let handle = event_loop.handle();
        let inputs = Value::array(vec![Value::Smi(1), ok(&handle, 5, "two")]);

        let all = Promise::all(&handle, &inputs).unwrap();
        event_loop.run_until_done().unwrap();

        let expected = Value::array(vec![Value::Smi(1), Value::string("two")]);
        assert!(all.result().unwrap().deep_eq(&expected));
    }

    #[test]
    fn rejects_with_earliest_rejection() {
        let mut event_loop = EventLoop::new();
        let handle = event_loop.handle();
        let all = Promise::all(&handle, &sample(&handle)).unwrap();

        let settlement = event_loop.run_until_settled(&all).unwrap();
        assert_eq!(
            settlement,
            Settlement::Rejected(Value::string("Second promise rejected"))
        );
        assert_eq!(event_loop.now(), 1000);
    }

    #[test]
    fn earliest_rejection_wins_in_any_completion_order() {
        // (p1, p2, p3) delays; p2 always rejects first
        for (d1, d2, d3) in [(300, 200, 100), (50, 10, 5), (20, 15, 400)] {
            let mut event_loop = EventLoop::new();
            let handle = event_loop.handle();
            let inputs = Value::array(vec![
                ok(&handle, d1, "p1"),
                err(&handle, d2, "p2"),
                ok(&handle, d3, "p3"),
            ]);

            let all = Promise::all(&handle, &inputs).unwrap();
            let settlement = event_loop.run_until_settled(&all).unwrap();
            assert_eq!(settlement, Settlement::Rejected(Value::string("p2")));
            assert_eq!(event_loop.now(), d2);
        }
    }

    #[test]
    fn later_rejections_do_not_change_outcome() {
        let mut event_loop = EventLoop::new();
        let handle = event_loop.handle();
        let inputs = Value::array(vec![err(&handle, 20, "late"), err(&handle, 10, "early")]);

        let all = Promise::all(&handle, &inputs).unwrap();
        event_loop.run_until_done().unwrap();
        assert_eq!(all.reason(), Some(Value::string("early")));
    }

    #[test]
    fn input_array_is_not_mutated() {
        let mut event_loop = EventLoop::new();
        let handle = event_loop.handle();
        let inputs = Value::array(vec![Value::Smi(1), Value::Smi(2)]);

        Promise::all(&handle, &inputs).unwrap();
        event_loop.run_until_done().unwrap();
        assert_eq!(inputs.to_string(), "1,2");
    }
}

mod race {
    use super::*;

    #[test]
    fn empty_input_fulfills_with_input_array() {
        let mut event_loop = EventLoop::new();
        let inputs = Value::array(vec![]);
        let race = Promise::race(&event_loop.handle(), &inputs).unwrap();

        event_loop.run_until_done().unwrap();
        assert_eq!(race.result(), Some(inputs));
    }

    #[test]
    fn fast_rejection_wins() {
        let mut event_loop = EventLoop::new();
        let handle = event_loop.handle();
        let inputs = Value::array(vec![ok(&handle, 100, "slow"), err(&handle, 10, "fast")]);

        let race = Promise::race(&handle, &inputs).unwrap();
        let settlement = event_loop.run_until_settled(&race).unwrap();

        assert_eq!(settlement, Settlement::Rejected(Value::string("fast")));
        assert_eq!(event_loop.now(), 10);
    }

    #[test]
    fn fast_fulfillment_wins() {
        let mut event_loop = EventLoop::new();
        let handle = event_loop.handle();
        let inputs = Value::array(vec![err(&handle, 100, "slow"), ok(&handle, 10, "fast")]);

        let race = Promise::race(&handle, &inputs).unwrap();
        event_loop.run_until_done().unwrap();

        assert_eq!(race.result(), Some(Value::string("fast")));
    }

    #[test]
    fn sample_settles_with_second_promise() {
        let mut event_loop = EventLoop::new();
        let handle = event_loop.handle();
        let race = Promise::race(&handle, &sample(&handle)).unwrap();

        event_loop.run_until_done().unwrap();
        assert_eq!(race.reason(), Some(Value::string("Second promise rejected")));
    }
}

mod last {
    use super::*;

    #[test]
    fn empty_input_fulfills_with_input_array() {
        let mut event_loop = EventLoop::new();
        let inputs = Value::array(vec![]);
        let last = Promise::last(&event_loop.handle(), &inputs).unwrap();

        event_loop.run_until_done().unwrap();
        assert_eq!(last.result(), Some(inputs));
    }

    #[test]
    fn rejection_overrides_later_fulfillment() {
        let mut event_loop = EventLoop::new();
        let handle = event_loop.handle();
        let inputs = Value::array(vec![
            ok(&handle, 10, "a"),
            err(&handle, 30, "b"),
            ok(&handle, 20, "c"),
        ]);

        let last = Promise::last(&handle, &inputs).unwrap();
        event_loop.run_until_done().unwrap();

        assert_eq!(last.reason(), Some(Value::string("b")));
    }

    #[test]
    fn early_rejection_still_wins_over_final_fulfillment() {
        let mut event_loop = EventLoop::new();
        let handle = event_loop.handle();
        let last = Promise::last(&handle, &sample(&handle)).unwrap();

        let settlement = event_loop.run_until_settled(&last).unwrap();
        assert_eq!(
            settlement,
            Settlement::Rejected(Value::string("Second promise rejected"))
        );
        // Waits for the 3000 ms promise before settling
        assert_eq!(event_loop.now(), 3000);
    }

    #[test]
    fn reason_is_chronologically_last_rejection() {
        let mut event_loop = EventLoop::new();
        let handle = event_loop.handle();
        let inputs = Value::array(vec![
            err(&handle, 40, "second"),
            err(&handle, 10, "first"),
            ok(&handle, 50, "done"),
        ]);

        let last = Promise::last(&handle, &inputs).unwrap();
        event_loop.run_until_done().unwrap();

        assert_eq!(last.reason(), Some(Value::string("second")));
    }

    #[test]
    fn fulfills_with_last_completed_value() {
        let mut event_loop = EventLoop::new();
        let handle = event_loop.handle();
        let inputs = Value::array(vec![
            ok(&handle, 30, "slowest"),
            ok(&handle, 10, "fastest"),
        ]);

        let last = Promise::last(&handle, &inputs).unwrap();
        event_loop.run_until_done().unwrap();

        assert_eq!(last.result(), Some(Value::string("slowest")));
    }
}

mod ignore_errors {
    use super::*;

    #[test]
    fn empty_input_fulfills_with_empty_array() {
        let mut event_loop = EventLoop::new();
        let ignored = Promise::ignore_errors(&event_loop.handle(), &Value::array(vec![])).unwrap();

        event_loop.run_until_done().unwrap();
        assert!(ignored.result().unwrap().deep_eq(&Value::array(vec![])));
    }

    #[test]
    fn drops_rejections() {
        let mut event_loop = EventLoop::new();
        let handle = event_loop.handle();
        let inputs = Value::array(vec![
            Promise::resolved(&handle, Value::Smi(1)).to_value(),
            Promise::rejected(&handle, Value::string("x")).to_value(),
            Promise::resolved(&handle, Value::Smi(2)).to_value(),
        ]);

        let ignored = Promise::ignore_errors(&handle, &inputs).unwrap();
        event_loop.run_until_done().unwrap();

        let expected = Value::array(vec![Value::Smi(1), Value::Smi(2)]);
        assert!(ignored.result().unwrap().deep_eq(&expected));
    }

    #[test]
    fn values_follow_completion_order() {
        let mut event_loop = EventLoop::new();
        let handle = event_loop.handle();
        let inputs = Value::array(vec![
            ok(&handle, 30, "c"),
            err(&handle, 5, "x"),
            ok(&handle, 10, "a"),
            ok(&handle, 20, "b"),
        ]);

        let ignored = Promise::ignore_errors(&handle, &inputs).unwrap();
        event_loop.run_until_done().unwrap();

        assert!(ignored.result().unwrap().deep_eq(&strings(&["a", "b", "c"])));
    }

    #[test]
    fn all_rejected_fulfills_with_empty_array() {
        let mut event_loop = EventLoop::new();
        let handle = event_loop.handle();
        let inputs = Value::array(vec![err(&handle, 1, "x"), err(&handle, 2, "y")]);

        let ignored = Promise::ignore_errors(&handle, &inputs).unwrap();
        event_loop.run_until_done().unwrap();

        assert_eq!(ignored.state(), PromiseState::Fulfilled);
        assert!(ignored.result().unwrap().deep_eq(&Value::array(vec![])));
    }

    #[test]
    fn sample_keeps_fulfilled_values() {
        let mut event_loop = EventLoop::new();
        let handle = event_loop.handle();
        let ignored = Promise::ignore_errors(&handle, &sample(&handle)).unwrap();

        event_loop.run_until_done().unwrap();
        assert!(ignored.result().unwrap().deep_eq(&strings(&[
            "First promise resolved",
            "Third promise resolved",
        ])));
    }
}

#[test]
fn non_array_input_is_rejected_synchronously() {
    let event_loop = EventLoop::new();
    let handle = event_loop.handle();
    let not_an_array = Promise::resolved(&handle, Value::Smi(1)).to_value();

    let err = Promise::all(&handle, &not_an_array).unwrap_err();
    assert!(matches!(err, JsError::InvalidArgument(_)));
    assert!(err.to_string().contains("Promise.all"));
}
