//! The context manager: one reactive root value plus its listener
//! registries.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use indexmap::IndexMap;
use trellis_value::{deep_clone, ArrayChange, ObservableArray, Value};

use crate::path::{resolve_path, resolve_segments, split_path, write_value};
use crate::trie::{ListenerRecord, PathNode};

/// A handle returned by `observe` / `observe_array`, consumed by
/// `unobserve`.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    path: String,
    target: SubscriptionTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubscriptionTarget {
    Context,
    Array,
}

impl Subscription {
    /// The dotted path this subscription listens on.
    pub fn path(&self) -> &str {
        &self.path
    }
}

struct ArrayWatch {
    id: u64,
    owner: String,
    array: ObservableArray,
    token: u64,
}

struct Inner {
    root: Value,
    listeners: PathNode,
    arrays: BTreeMap<String, Vec<ArrayWatch>>,
    next_id: u64,
}

/// Manages one observed root value.
///
/// The manager owns the root of the object graph and two registries:
/// the listener trie for dotted-path observation and the array registry
/// for per-instance array observation. Handles are cheap to clone and
/// share the same state.
///
/// Mutation flows through [`set`](ContextManager::set), which diffs the
/// written slot and notifies the listeners of that exact path plus
/// every observed descendant. Callbacks run after all internal borrows
/// are released, so a callback may synchronously read, write, observe
/// or dispose on the same manager.
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use trellis_observe::ContextManager;
/// use trellis_value::{from_json, Value};
/// use serde_json::json;
///
/// let manager = ContextManager::new(from_json(&json!({"user": {"age": 30}})));
/// let seen = Rc::new(Cell::new(0.0));
/// let inner = seen.clone();
/// let subscription = manager.observe("user.age", "badge", move |new, _old| {
///     if let Value::Number(n) = new {
///         inner.set(*n);
///     }
/// });
///
/// manager.set("user.age", Value::Number(31.0));
/// assert_eq!(seen.get(), 31.0);
/// manager.unobserve(subscription);
/// ```
#[derive(Clone)]
pub struct ContextManager {
    inner: Rc<RefCell<Inner>>,
}

impl ContextManager {
    pub fn new(root: Value) -> ContextManager {
        ContextManager {
            inner: Rc::new(RefCell::new(Inner {
                root,
                listeners: PathNode::default(),
                arrays: BTreeMap::new(),
                next_id: 0,
            })),
        }
    }

    /// A clone of the current root value.
    pub fn root(&self) -> Value {
        self.inner.borrow().root.clone()
    }

    /// Reads a dotted path. Misses yield `Undefined`.
    pub fn get(&self, path: &str) -> Value {
        resolve_path(&self.inner.borrow().root, path)
    }

    /// Writes a dotted path, materializing missing intermediate
    /// objects, and notifies listeners.
    ///
    /// Setting a slot to its current value is a no-op. Otherwise the
    /// exact path's listeners fire with the new and old value, and
    /// every observed descendant path fires with its own pair, resolved
    /// against the new and old value independently; a side that cannot
    /// be resolved reads as `Undefined`.
    pub fn set(&self, path: &str, value: Value) {
        let mut pending: Vec<(Rc<dyn Fn(&Value, &Value)>, Value, Value)> = Vec::new();
        {
            let mut inner = self.inner.borrow_mut();
            let old = resolve_path(&inner.root, path);
            if same_value(&old, &value) {
                return;
            }
            if matches!(inner.root, Value::Undefined | Value::Null) {
                inner.root = Value::Object(IndexMap::new());
            }
            let segments = split_path(path);
            if !write_value(&mut inner.root, &segments, value.clone()) {
                return;
            }
            if let Some(node) = inner.listeners.node(&segments) {
                for record in node.records() {
                    pending.push((record.callback.clone(), value.clone(), old.clone()));
                }
                node.for_each_descendant(&mut Vec::new(), &mut |suffix, records| {
                    let new_side = resolve_segments(&value, suffix.iter().map(String::as_str));
                    let old_side = resolve_segments(&old, suffix.iter().map(String::as_str));
                    for record in records {
                        pending.push((record.callback.clone(), new_side.clone(), old_side.clone()));
                    }
                });
            }
        }
        for (callback, new_value, old_value) in pending {
            callback(&new_value, &old_value);
        }
    }

    /// Registers `callback` on a dotted path for `owner`.
    ///
    /// The path may run through currently-missing intermediates; the
    /// subscription stays dormant and activates when the structure
    /// materializes. The callback receives the new value first, then
    /// the old.
    pub fn observe(
        &self,
        path: &str,
        owner: &str,
        callback: impl Fn(&Value, &Value) + 'static,
    ) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        let segments = split_path(path);
        inner.listeners.insert(
            &segments,
            ListenerRecord {
                id,
                owner: owner.to_string(),
                callback: Rc::new(callback),
            },
        );
        Subscription {
            id,
            path: path.to_string(),
            target: SubscriptionTarget::Context,
        }
    }

    /// Removes one subscription, pruning trie nodes left empty.
    pub fn unobserve(&self, subscription: Subscription) {
        let mut inner = self.inner.borrow_mut();
        match subscription.target {
            SubscriptionTarget::Context => {
                let segments = split_path(&subscription.path);
                inner.listeners.remove(&segments, subscription.id);
            }
            SubscriptionTarget::Array => {
                let mut emptied = false;
                if let Some(watches) = inner.arrays.get_mut(&subscription.path) {
                    if let Some(position) =
                        watches.iter().position(|watch| watch.id == subscription.id)
                    {
                        let watch = watches.remove(position);
                        watch.array.unsubscribe(watch.token);
                    }
                    emptied = watches.is_empty();
                }
                if emptied {
                    inner.arrays.remove(&subscription.path);
                }
            }
        }
    }

    /// Subscribes `callback` to mutations of `array`, tagged with
    /// `owner` at `path`.
    ///
    /// When `old_array` names the instance this path observed before,
    /// the owner's watch on it is unhooked first; if the two instances
    /// differ in length, one `Length` change is delivered for the swap.
    /// In-place mutators report their own changes, so a same-instance
    /// re-observe never produces a second length notification.
    pub fn observe_array(
        &self,
        owner: &str,
        callback: impl Fn(&ArrayChange) + 'static,
        path: &str,
        array: &ObservableArray,
        old_array: Option<&ObservableArray>,
    ) -> Subscription {
        let shared: Rc<dyn Fn(&ArrayChange)> = Rc::new(callback);
        let mut swapped_from: Option<Vec<Value>> = None;
        let subscription = {
            let mut inner = self.inner.borrow_mut();
            if let Some(old) = old_array {
                let mut emptied = false;
                if let Some(watches) = inner.arrays.get_mut(path) {
                    watches.retain(|watch| {
                        if watch.owner == owner && watch.array.ptr_eq(old) {
                            watch.array.unsubscribe(watch.token);
                            false
                        } else {
                            true
                        }
                    });
                    emptied = watches.is_empty();
                }
                if emptied {
                    inner.arrays.remove(path);
                }
                if !old.ptr_eq(array) && old.len() != array.len() {
                    swapped_from = Some(old.snapshot());
                }
            }
            let token = array.subscribe_shared(shared);
            let id = inner.next_id;
            inner.next_id += 1;
            inner.arrays.entry(path.to_string()).or_default().push(ArrayWatch {
                id,
                owner: owner.to_string(),
                array: array.clone(),
                token,
            });
            Subscription {
                id,
                path: path.to_string(),
                target: SubscriptionTarget::Array,
            }
        };
        if let Some(old_items) = swapped_from {
            array.notify_length(old_items);
        }
        subscription
    }

    /// Removes every listener and array watch tagged with `owner`.
    ///
    /// Each path whose last listener this removes is either left with a
    /// detached deep copy of its final value (`persist`) or cleared to
    /// `Undefined`. Unknown owners are a no-op.
    pub fn dispose(&self, owner: &str, persist: bool) {
        let mut inner = self.inner.borrow_mut();

        let mut vacated = Vec::new();
        inner
            .listeners
            .remove_owner(owner, &mut Vec::new(), &mut vacated);
        inner.listeners.prune();
        // deepest first: a child write must not re-materialize a parent
        // slot this same sweep clears
        for path in vacated.iter().rev() {
            let value = if persist {
                deep_clone(&resolve_path(&inner.root, path))
            } else {
                Value::Undefined
            };
            let segments = split_path(path);
            write_value(&mut inner.root, &segments, value);
        }

        let mut emptied = Vec::new();
        for (path, watches) in inner.arrays.iter_mut() {
            watches.retain(|watch| {
                if watch.owner == owner {
                    watch.array.unsubscribe(watch.token);
                    false
                } else {
                    true
                }
            });
            if watches.is_empty() {
                emptied.push(path.clone());
            }
        }
        for path in emptied {
            inner.arrays.remove(&path);
        }
    }
}

/// Equality used for the set fixed-point: primitives by value with
/// `NaN` equal to itself, arrays and functions by handle identity,
/// objects recursively. An equal-content array in a fresh instance is
/// NOT the same value, so instance swaps still notify.
fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x == y || (x.is_nan() && y.is_nan()),
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => x.ptr_eq(y),
        (Value::Function(f), Value::Function(g)) => f.ptr_eq(g),
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(key, value)| y.get(key).is_some_and(|other| same_value(value, other)))
        }
        _ => false,
    }
}
