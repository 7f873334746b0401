//! Startup wiring: configuration, logging and the process-wide registry.

use hookline::{Callback, LoggingConfig, Value, bootstrap, global, init_logging};
use serial_test::serial;

#[test]
#[serial]
fn test_bootstrap_returns_global_registry() {
    let registry = bootstrap("test").expect("bootstrap");
    assert!(std::ptr::eq(registry, global()));

    registry.register_action("bootstrap_probe", Callback::closure(|_| Ok(Value::Null)));
    global().trigger_action("bootstrap_probe", &mut []).unwrap();
    assert_eq!(registry.times_triggered("bootstrap_probe"), 1);

    registry.unregister_all_actions("bootstrap_probe", None);
    assert!(!global().has_action("bootstrap_probe"));
}

#[test]
#[serial]
fn test_second_logging_init_is_reported() {
    let config = LoggingConfig {
        level: "debug".into(),
        format: "pretty".into(),
    };
    let _ = init_logging(&config);
    assert!(init_logging(&config).is_err());
}
