//! Property-based tests for hook mediation
//!
//! These tests verify correctness properties of the callback mediator:
//! - Iteration limits bound the number of invocations
//! - Bypass freezes the invocation counter
//! - Callbacks receive as many arguments as they declare
//! - Gated invocations hand back the original value

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use proptest::prelude::*;
use serde_json::{json, Value};
use silk_hooks::*;

fn counting_hook(
    dispatcher: &Arc<InMemoryDispatcher>,
    handle: &str,
) -> (Hook, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let counter = count.clone();
    let hook = Hook::on(dispatcher.clone(), handle).set_callback(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    (hook, count)
}

fn args_strategy() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(any::<i64>().prop_map(Value::from), 0..8)
}

proptest! {
    /// Only X times: N dispatches beyond the bound still invoke exactly N times
    #[test]
    fn prop_only_x_times_bounds_invocations(times in 0u64..20) {
        let dispatcher = Arc::new(InMemoryDispatcher::new());
        let (hook, count) = counting_hook(&dispatcher, "bounded");
        let hook = hook.only_x_times(times).listen().unwrap();

        for _ in 0..times + 5 {
            dispatcher.do_action("bounded", vec![]).unwrap();
        }

        prop_assert_eq!(count.load(Ordering::SeqCst) as u64, times);
        prop_assert_eq!(hook.iterations(), times);
        prop_assert!(hook.has_exceeded_iterations());
    }

    /// Bypass after K invocations keeps the counter at K
    #[test]
    fn prop_bypass_freezes_counter(before in 0usize..10, after in 1usize..10) {
        let dispatcher = Arc::new(InMemoryDispatcher::new());
        let (hook, count) = counting_hook(&dispatcher, "bypassed");
        let hook = hook.listen().unwrap();

        for _ in 0..before {
            dispatcher.do_action("bypassed", vec![]).unwrap();
        }
        let hook = hook.bypass();
        for _ in 0..after {
            dispatcher.do_action("bypassed", vec![]).unwrap();
        }

        prop_assert_eq!(count.load(Ordering::SeqCst), before);
        prop_assert_eq!(hook.iterations(), before as u64);
        prop_assert!(hook.is_listening());
    }

    /// A callback declaring P > 0 parameters receives min(P, given) arguments
    #[test]
    fn prop_arity_truncation(arity in 1usize..6, args in args_strategy()) {
        let dispatcher = Arc::new(InMemoryDispatcher::new());
        let received = Arc::new(AtomicUsize::new(usize::MAX));
        let sink = received.clone();

        let hook = Hook::on(dispatcher.clone(), "truncated")
            .set_callback(Callback::with_arity(arity, move |args: &[Value]| {
                sink.store(args.len(), Ordering::SeqCst);
            }))
            .listen()
            .unwrap();

        dispatcher.do_action("truncated", args.clone()).unwrap();

        prop_assert_eq!(received.load(Ordering::SeqCst), arity.min(args.len()));
        prop_assert_eq!(hook.iterations(), 1);
    }

    /// A callback declaring no parameters receives every argument
    #[test]
    fn prop_variadic_receives_everything(args in args_strategy()) {
        let dispatcher = Arc::new(InMemoryDispatcher::new());
        let received = Arc::new(AtomicUsize::new(usize::MAX));
        let sink = received.clone();

        Hook::on(dispatcher.clone(), "variadic")
            .set_callback(move |args: &[Value]| sink.store(args.len(), Ordering::SeqCst))
            .listen()
            .unwrap();

        dispatcher.do_action("variadic", args.clone()).unwrap();

        prop_assert_eq!(received.load(Ordering::SeqCst), args.len());
    }

    /// A failing condition returns the filtered value unchanged
    #[test]
    fn prop_gated_filter_returns_original(value in any::<i64>(), extra in args_strategy()) {
        let dispatcher = Arc::new(InMemoryDispatcher::new());

        let hook = Hook::on(dispatcher.clone(), "gated")
            .set_callback(|_v: Value| json!("replaced"))
            .only_if(|_| false)
            .listen()
            .unwrap();

        let result = dispatcher.apply_filters("gated", json!(value), extra).unwrap();

        prop_assert_eq!(result, json!(value));
        prop_assert_eq!(hook.iterations(), 0);
    }
}
