//! Integration tests for dotted-path observation: exact and descendant
//! notification, materialization, re-entrant mutation and disposal.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;
use trellis_observe::ContextManager;
use trellis_value::{from_json, Value};

type Log = Rc<RefCell<Vec<(Value, Value)>>>;

fn log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

fn watch(manager: &ContextManager, path: &str, owner: &str) -> Log {
    let seen = log();
    let sink = seen.clone();
    manager.observe(path, owner, move |new, old| {
        sink.borrow_mut().push((new.clone(), old.clone()));
    });
    seen
}

// ------------------------------------------------------------ Exact paths

#[test]
fn test_set_notifies_the_exact_listener() {
    let manager = ContextManager::new(from_json(&json!({"user": {"age": 30}})));
    let seen = watch(&manager, "user.age", "badge");

    manager.set("user.age", Value::Number(31.0));
    assert_eq!(
        *seen.borrow(),
        vec![(Value::Number(31.0), Value::Number(30.0))]
    );
}

#[test]
fn test_setting_an_equal_value_is_a_no_op() {
    let manager = ContextManager::new(from_json(&json!({"n": 5})));
    let seen = watch(&manager, "n", "o");

    manager.set("n", Value::Number(5.0));
    assert!(seen.borrow().is_empty());
}

#[test]
fn test_listeners_fire_in_registration_order() {
    let manager = ContextManager::new(from_json(&json!({"n": 0})));
    let order = Rc::new(RefCell::new(Vec::new()));

    let first = order.clone();
    manager.observe("n", "a", move |_, _| first.borrow_mut().push(1));
    let second = order.clone();
    manager.observe("n", "b", move |_, _| second.borrow_mut().push(2));

    manager.set("n", Value::Number(1.0));
    assert_eq!(*order.borrow(), vec![1, 2]);
}

#[test]
fn test_unobserve_stops_notifications() {
    let manager = ContextManager::new(from_json(&json!({"n": 0})));
    let seen = log();
    let sink = seen.clone();
    let subscription = manager.observe("n", "o", move |new, old| {
        sink.borrow_mut().push((new.clone(), old.clone()));
    });

    manager.set("n", Value::Number(1.0));
    manager.unobserve(subscription);
    manager.set("n", Value::Number(2.0));
    assert_eq!(seen.borrow().len(), 1);
}

// ------------------------------------------------------- Descendant paths

#[test]
fn test_replacing_a_subtree_notifies_observed_descendants() {
    let manager = ContextManager::new(from_json(&json!({"a": {"b": 1}})));
    let seen = watch(&manager, "a.b", "o");

    manager.set("a", from_json(&json!({"b": 2})));
    assert_eq!(
        *seen.borrow(),
        vec![(Value::Number(2.0), Value::Number(1.0))]
    );
}

#[test]
fn test_deep_descendants_resolve_each_side_independently() {
    let manager = ContextManager::new(from_json(&json!({"a": {"b": {"c": 1}}})));
    let seen = watch(&manager, "a.b.c", "o");

    // the new subtree is missing `b` entirely
    manager.set("a", from_json(&json!({"x": true})));
    assert_eq!(
        *seen.borrow(),
        vec![(Value::Undefined, Value::Number(1.0))]
    );
}

#[test]
fn test_ancestor_listeners_stay_silent() {
    let manager = ContextManager::new(from_json(&json!({"a": {"b": 1}})));
    let parent = watch(&manager, "a", "o");
    let child = watch(&manager, "a.b", "o");

    manager.set("a.b", Value::Number(2.0));
    assert!(parent.borrow().is_empty());
    assert_eq!(child.borrow().len(), 1);
}

#[test]
fn test_sibling_listeners_stay_silent() {
    let manager = ContextManager::new(from_json(&json!({"a": {"b": 1, "c": 2}})));
    let sibling = watch(&manager, "a.c", "o");

    manager.set("a.b", Value::Number(9.0));
    assert!(sibling.borrow().is_empty());
}

// ------------------------------------------------------- Materialization

#[test]
fn test_observation_through_missing_intermediates_is_dormant() {
    let manager = ContextManager::new(from_json(&json!({})));
    let seen = watch(&manager, "a.b.c", "o");
    assert!(seen.borrow().is_empty());
    assert_eq!(manager.get("a.b.c"), Value::Undefined);
}

#[test]
fn test_materialization_activates_the_dormant_path() {
    let manager = ContextManager::new(from_json(&json!({})));
    let seen = watch(&manager, "a.b.c", "o");

    manager.set("a", from_json(&json!({"b": {"c": 7}})));
    assert_eq!(
        *seen.borrow(),
        vec![(Value::Number(7.0), Value::Undefined)]
    );
}

#[test]
fn test_set_materializes_missing_intermediates() {
    let manager = ContextManager::new(from_json(&json!({})));
    let seen = watch(&manager, "a.b.c", "o");

    manager.set("a.b.c", Value::Number(5.0));
    assert_eq!(
        *seen.borrow(),
        vec![(Value::Number(5.0), Value::Undefined)]
    );
    assert_eq!(manager.get("a.b.c"), Value::Number(5.0));
}

#[test]
fn test_set_into_an_undefined_root() {
    let manager = ContextManager::new(Value::Undefined);
    manager.set("a", Value::Number(1.0));
    assert_eq!(manager.get("a"), Value::Number(1.0));
}

// ----------------------------------------------------- Reads and writes

#[test]
fn test_get_walks_arrays_and_lengths() {
    let manager = ContextManager::new(from_json(&json!({
        "items": [{"name": "x"}, {"name": "y"}],
        "word": "hello"
    })));
    assert_eq!(manager.get("items.1.name"), Value::String("y".to_string()));
    assert_eq!(manager.get("items.length"), Value::Number(2.0));
    assert_eq!(manager.get("word.length"), Value::Number(5.0));
    assert_eq!(manager.get("items.9"), Value::Undefined);
    assert_eq!(manager.get("missing.path"), Value::Undefined);
}

#[test]
fn test_set_writes_into_array_elements() {
    let manager = ContextManager::new(from_json(&json!({"items": [{"n": 1}]})));
    let seen = watch(&manager, "items.0.n", "o");

    manager.set("items.0.n", Value::Number(2.0));
    assert_eq!(manager.get("items.0.n"), Value::Number(2.0));
    assert_eq!(
        *seen.borrow(),
        vec![(Value::Number(2.0), Value::Number(1.0))]
    );
}

#[test]
fn test_set_through_a_primitive_is_dropped() {
    let manager = ContextManager::new(from_json(&json!({"a": 5})));
    let seen = watch(&manager, "a.b", "o");

    manager.set("a.b", Value::Number(1.0));
    assert_eq!(manager.get("a"), Value::Number(5.0));
    assert!(seen.borrow().is_empty());
}

// ----------------------------------------------------------- Re-entrancy

#[test]
fn test_callback_may_mutate_the_graph() {
    let manager = ContextManager::new(from_json(&json!({"n": 0})));
    let seen = log();
    let sink = seen.clone();
    let reentrant = manager.clone();
    manager.observe("n", "o", move |new, old| {
        sink.borrow_mut().push((new.clone(), old.clone()));
        if let Value::Number(n) = new {
            if *n < 3.0 {
                reentrant.set("n", Value::Number(n + 1.0));
            }
        }
    });

    manager.set("n", Value::Number(1.0));
    assert_eq!(manager.get("n"), Value::Number(3.0));
    assert_eq!(
        *seen.borrow(),
        vec![
            (Value::Number(1.0), Value::Number(0.0)),
            (Value::Number(2.0), Value::Number(1.0)),
            (Value::Number(3.0), Value::Number(2.0)),
        ]
    );
}

#[test]
fn test_self_set_converges() {
    let manager = ContextManager::new(from_json(&json!({"x": 0})));
    let seen = log();
    let sink = seen.clone();
    let reentrant = manager.clone();
    manager.observe("x", "o", move |new, old| {
        sink.borrow_mut().push((new.clone(), old.clone()));
        // writing the value back is absorbed by the fixed point
        reentrant.set("x", new.clone());
    });

    manager.set("x", Value::Number(1.0));
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn test_callback_may_observe_during_notification() {
    let manager = ContextManager::new(from_json(&json!({"n": 0})));
    let inner_log = log();
    let sink = inner_log.clone();
    let registrar = manager.clone();
    let registered = Rc::new(RefCell::new(false));
    let flag = registered.clone();
    manager.observe("n", "o", move |_, _| {
        if !*flag.borrow() {
            *flag.borrow_mut() = true;
            let inner_sink = sink.clone();
            registrar.observe("n", "late", move |new, old| {
                inner_sink.borrow_mut().push((new.clone(), old.clone()));
            });
        }
    });

    manager.set("n", Value::Number(1.0));
    assert!(inner_log.borrow().is_empty());
    manager.set("n", Value::Number(2.0));
    assert_eq!(inner_log.borrow().len(), 1);
}

// -------------------------------------------------------------- Disposal

#[test]
fn test_dispose_removes_only_that_owner() {
    let manager = ContextManager::new(from_json(&json!({"n": 0})));
    let first = watch(&manager, "n", "a");
    let second = watch(&manager, "n", "b");

    manager.dispose("a", false);
    manager.set("n", Value::Number(1.0));
    assert!(first.borrow().is_empty());
    assert_eq!(second.borrow().len(), 1);
    // another listener remains, so the slot survives
    assert_eq!(manager.get("n"), Value::Number(1.0));
}

#[test]
fn test_dispose_clears_the_vacated_slot() {
    let manager = ContextManager::new(from_json(&json!({"user": {"name": "ada"}})));
    watch(&manager, "user.name", "card");

    manager.dispose("card", false);
    assert_eq!(manager.get("user.name"), Value::Undefined);
}

#[test]
fn test_dispose_with_persist_detaches_the_value() {
    let manager = ContextManager::new(from_json(&json!({"items": [1, 2]})));
    watch(&manager, "items", "list");
    let before = match manager.get("items") {
        Value::Array(items) => items,
        other => panic!("expected array, got {other:?}"),
    };

    manager.dispose("list", true);
    let after = match manager.get("items") {
        Value::Array(items) => items,
        other => panic!("expected array, got {other:?}"),
    };
    assert!(!before.ptr_eq(&after));
    assert_eq!(after.snapshot(), before.snapshot());
}

#[test]
fn test_dispose_clears_nested_vacated_slots() {
    let manager = ContextManager::new(from_json(&json!({"user": {"name": "ada"}})));
    watch(&manager, "user", "card");
    watch(&manager, "user.name", "card");

    manager.dispose("card", false);
    assert_eq!(manager.get("user"), Value::Undefined);
}

#[test]
fn test_dispose_unknown_owner_is_a_no_op() {
    let manager = ContextManager::new(from_json(&json!({"n": 0})));
    let seen = watch(&manager, "n", "o");

    manager.dispose("ghost", false);
    manager.set("n", Value::Number(1.0));
    assert_eq!(seen.borrow().len(), 1);
    assert_eq!(manager.get("n"), Value::Number(1.0));
}

#[test]
fn test_disposed_paths_accept_fresh_observation() {
    let manager = ContextManager::new(from_json(&json!({"n": 1})));
    watch(&manager, "n", "o");
    manager.dispose("o", false);

    let seen = watch(&manager, "n", "o2");
    manager.set("n", Value::Number(2.0));
    assert_eq!(
        *seen.borrow(),
        vec![(Value::Number(2.0), Value::Undefined)]
    );
}
