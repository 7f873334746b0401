//! Deduplication and lookup across the callback variants.

use std::sync::Arc;

use hookline::{Callback, HookRegistry, HookResult, Value};

struct Mailer {
    from: String,
}

impl Mailer {
    fn on_signup(&self, args: &mut [Value]) -> HookResult<Value> {
        Ok(Value::String(format!(
            "{} -> {}",
            self.from,
            args[0].as_str().unwrap_or_default()
        )))
    }
}

fn signup_handler(mailer: &Arc<Mailer>) -> Callback {
    Callback::method(mailer, "on_signup", Mailer::on_signup)
}

#[test]
fn test_bound_method_registered_twice_is_stored_once() {
    let registry = HookRegistry::new();
    let mailer = Arc::new(Mailer {
        from: "noreply".into(),
    });

    let first = registry.register_action("signup", signup_handler(&mailer));
    let second = registry.register_action("signup", signup_handler(&mailer));

    assert_eq!(first, second);
    assert_eq!(registry.callback_count("signup"), 1);
}

#[test]
fn test_distinct_receivers_are_distinct_entries() {
    let registry = HookRegistry::new();
    let a = Arc::new(Mailer { from: "a".into() });
    let b = Arc::new(Mailer { from: "b".into() });

    registry.register_filter("signup", signup_handler(&a));
    registry.register_filter("signup", signup_handler(&b));
    assert_eq!(registry.callback_count("signup"), 2);

    assert!(registry.unregister_filter("signup", &signup_handler(&a), 10));
    let out = registry
        .apply_filter("signup", Value::String("ann".into()), vec![])
        .unwrap();
    assert_eq!(out, Value::String("b -> ann".into()));
}

#[test]
fn test_never_registered_receiver_is_not_found() {
    let registry = HookRegistry::new();
    let known = Arc::new(Mailer { from: "k".into() });
    let stranger = Arc::new(Mailer { from: "s".into() });
    registry.register_action("signup", signup_handler(&known));

    assert_eq!(registry.action_priority("signup", &signup_handler(&stranger)), None);
    assert!(!registry.unregister_action("signup", &signup_handler(&stranger), 10));
    assert!(registry.has_action("signup"));
}

#[test]
fn test_static_methods_match_by_name() {
    let registry = HookRegistry::new();
    let id = registry.register_filter(
        "slug",
        Callback::static_method("Slugger", "slugify", |args| Ok(args[0].clone())),
    );
    assert_eq!(id, "Slugger::slugify");

    let lookalike = Callback::static_method("Slugger", "slugify", |_| Ok(Value::Null));
    assert_eq!(registry.filter_priority("slug", &lookalike), Some(10));
    assert!(registry.unregister_filter("slug", &lookalike, 10));
    assert!(!registry.has_filter("slug"));
}

#[test]
fn test_closure_instances_are_independent() {
    let registry = HookRegistry::new();
    let first = Callback::closure(|args| Ok(args[0].clone()));
    let second = Callback::closure(|args| Ok(args[0].clone()));

    registry.register_filter("slug", first.clone());
    registry.register_filter("slug", first.clone());
    registry.register_filter("slug", second.clone());
    assert_eq!(registry.callback_count("slug"), 2);

    assert!(registry.unregister_filter("slug", &first, 10));
    assert_eq!(registry.filter_priority("slug", &second), Some(10));
    assert_eq!(registry.filter_priority("slug", &first), None);
}

#[test]
fn test_function_named_like_method_key_leaves_method_alone() {
    let registry = HookRegistry::new();
    let mailer = Arc::new(Mailer {
        from: "noreply".into(),
    });

    let method_id = registry.register_action("signup", signup_handler(&mailer));
    let lookalike = Callback::function(method_id.clone(), |_| Ok(Value::Null));

    assert_ne!(registry.register_action("signup", lookalike.clone()), method_id);
    assert_eq!(registry.callback_count("signup"), 2);

    assert!(registry.unregister_action("signup", &lookalike, 10));
    assert_eq!(
        registry.action_priority("signup", &signup_handler(&mailer)),
        Some(10)
    );
}
