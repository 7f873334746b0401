//! Ordering, arity and counting behaviour seen through the public facade.

use std::sync::{Arc, Mutex};

use hookline::{ALL_HOOK, Callback, HookRegistry, Value};
use serde_json::json;

use crate::helpers::CallLog;

#[test]
fn test_priority_beats_registration_order() {
    let registry = HookRegistry::new();
    let log = CallLog::new();
    registry.register_filter_with("content", log.recorder("p10"), 10, 1);
    registry.register_filter_with("content", log.recorder("p5"), 5, 1);
    registry.register_filter_with("content", log.recorder("p10b"), 10, 1);

    registry.apply_filter("content", json!(""), vec![]).unwrap();
    assert_eq!(log.entries(), ["p5", "p10", "p10b"]);
}

#[test]
fn test_unknown_filter_returns_value() {
    let registry = HookRegistry::new();
    assert_eq!(registry.apply_filter("x", json!(5), vec![]).unwrap(), json!(5));
}

#[test]
fn test_times_triggered_counts_empty_actions() {
    let registry = HookRegistry::new();
    for _ in 0..3 {
        registry.trigger_action("y", &mut []).unwrap();
    }
    assert_eq!(registry.times_triggered("y"), 3);
    assert_eq!(registry.times_triggered("z"), 0);
}

#[test]
fn test_unregistered_callback_is_not_invoked() {
    let registry = HookRegistry::new();
    let log = CallLog::new();
    let cb = log.recorder("audit");

    registry.register_action("save", cb.clone());
    assert_eq!(registry.action_priority("save", &cb), Some(10));
    assert!(registry.unregister_action("save", &cb, 10));
    assert_eq!(registry.action_priority("save", &cb), None);

    registry.trigger_action("save", &mut [json!(1)]).unwrap();
    assert!(log.entries().is_empty());
}

#[test]
fn test_arity_one_never_sees_extra() {
    let registry = HookRegistry::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    registry.register_filter(
        "tag",
        Callback::closure(move |args| {
            sink.lock().unwrap().extend(args.iter().cloned());
            Ok(args[0].clone())
        }),
    );

    registry
        .apply_filter("tag", json!("value"), vec![json!("extra")])
        .unwrap();
    assert_eq!(*seen.lock().unwrap(), vec![json!("value")]);
}

#[test]
fn test_action_callbacks_do_not_transform() {
    let registry = HookRegistry::new();
    registry.register_action_with(
        "notify",
        Callback::closure(|_| Ok(json!("discarded"))),
        10,
        2,
    );

    let mut args = [json!("a"), json!("b")];
    registry.trigger_action("notify", &mut args).unwrap();
    assert_eq!(args, [json!("a"), json!("b")]);
}

#[test]
fn test_all_hook_runs_before_each_dispatch() {
    let registry = HookRegistry::new();
    let log = CallLog::new();
    registry.register_action(ALL_HOOK, log.recorder("all"));
    registry.register_filter("title", log.recorder("title"));

    registry.apply_filter("title", json!("t"), vec![]).unwrap();
    registry.trigger_action("unregistered", &mut []).unwrap();

    assert_eq!(log.entries(), ["all", "title", "all"]);
    assert_eq!(registry.times_triggered("unregistered"), 1);
}

#[test]
fn test_all_hook_failure_aborts_dispatch() {
    let registry = HookRegistry::new();
    let log = CallLog::new();
    registry.register_action(
        ALL_HOOK,
        Callback::closure(|_| Err(hookline::HookError::invalid_argument("blocked"))),
    );
    registry.register_filter("title", log.recorder("title"));

    let err = registry
        .apply_filter("title", json!("t"), vec![])
        .unwrap_err();
    assert_eq!(err.kind, hookline::ErrorKind::InvalidArgument);
    assert!(log.entries().is_empty());
    assert_eq!(registry.current_hook(), None);
}

#[test]
fn test_with_args_variant_copies_single_object() {
    let registry = HookRegistry::new();
    let observed = Arc::new(Mutex::new(Vec::new()));
    registry.register_action(
        "save_post",
        Callback::closure(|args| {
            args[0]["dirty"] = json!(true);
            Ok(Value::Null)
        }),
    );
    let sink = Arc::clone(&observed);
    registry.register_action_with(
        "save_post",
        Callback::closure(move |args| {
            sink.lock().unwrap().push(args[0].clone());
            Ok(Value::Null)
        }),
        20,
        1,
    );

    registry
        .trigger_action_with_args("save_post", vec![json!({ "id": 9 })])
        .unwrap();
    assert_eq!(*observed.lock().unwrap(), vec![json!({ "id": 9 })]);
}
