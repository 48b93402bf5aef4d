use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::coerce;
use crate::value::Value;

/// The mutating operation that produced an [`ArrayChange`].
///
/// `Length` is not a method interception: it reports that an observed
/// path was assigned a different array, so the storage behind the path
/// changed hands in one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrayMethod {
    Push,
    Pop,
    Reverse,
    Shift,
    Sort,
    Splice,
    Unshift,
    Length,
}

impl ArrayMethod {
    pub fn name(&self) -> &'static str {
        match self {
            ArrayMethod::Push => "push",
            ArrayMethod::Pop => "pop",
            ArrayMethod::Reverse => "reverse",
            ArrayMethod::Shift => "shift",
            ArrayMethod::Sort => "sort",
            ArrayMethod::Splice => "splice",
            ArrayMethod::Unshift => "unshift",
            ArrayMethod::Length => "length",
        }
    }
}

impl fmt::Display for ArrayMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Description of one intercepted array mutation, delivered to every
/// subscriber of the mutated array.
#[derive(Clone, Debug)]
pub struct ArrayChange {
    /// Which operation ran.
    pub method: ArrayMethod,
    /// The arguments the operation was invoked with.
    pub arguments: Vec<Value>,
    /// What the operation returned to its caller.
    pub return_value: Value,
    /// Contents from just before the mutation.
    pub old_array: Vec<Value>,
    /// Handle to the mutated storage.
    pub new_array: ObservableArray,
}

type Callback = Rc<dyn Fn(&ArrayChange)>;

struct Storage {
    items: RefCell<Vec<Value>>,
    listeners: RefCell<BTreeMap<u64, Callback>>,
    next_id: Cell<u64>,
}

/// A shared array whose mutating methods report what they did.
///
/// Cloning the handle shares storage, so a `Value::Array` behaves like a
/// JavaScript array reference. The seven mutators (`push`, `pop`,
/// `reverse`, `shift`, `sort`, `splice`, `unshift`) snapshot the contents,
/// apply the change, then deliver an [`ArrayChange`] to every subscriber
/// in registration order. Plain slot writes through [`ObservableArray::set`]
/// are not intercepted.
///
/// Listeners may mutate the array or adjust subscriptions from inside
/// their callback; no borrow is held while callbacks run.
#[derive(Clone)]
pub struct ObservableArray {
    storage: Rc<Storage>,
}

impl ObservableArray {
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    pub fn from_vec(items: Vec<Value>) -> Self {
        ObservableArray {
            storage: Rc::new(Storage {
                items: RefCell::new(items),
                listeners: RefCell::new(BTreeMap::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    /// True when both handles share storage.
    pub fn ptr_eq(&self, other: &ObservableArray) -> bool {
        Rc::ptr_eq(&self.storage, &other.storage)
    }

    pub fn len(&self) -> usize {
        self.storage.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.items.borrow().is_empty()
    }

    /// Reads one slot. Out-of-range indexes yield `Undefined`.
    pub fn get(&self, index: usize) -> Value {
        self.storage
            .items
            .borrow()
            .get(index)
            .cloned()
            .unwrap_or(Value::Undefined)
    }

    /// Writes one slot without reporting a change. Indexes past the end
    /// grow the array with `undefined` holes first, as a plain index
    /// assignment would.
    pub fn set(&self, index: usize, value: Value) {
        let mut slots = self.storage.items.borrow_mut();
        if index >= slots.len() {
            slots.resize(index + 1, Value::Undefined);
        }
        slots[index] = value;
    }

    /// Copies the current contents out.
    pub fn snapshot(&self) -> Vec<Value> {
        self.storage.items.borrow().clone()
    }

    pub fn has_listeners(&self) -> bool {
        !self.storage.listeners.borrow().is_empty()
    }

    /// Registers a mutation listener, returning an id for
    /// [`ObservableArray::unsubscribe`].
    pub fn subscribe<F>(&self, callback: F) -> u64
    where
        F: Fn(&ArrayChange) + 'static,
    {
        self.subscribe_shared(Rc::new(callback))
    }

    /// Registers an already-shared listener handle. The observation
    /// engine uses this to move a listener onto the replacement storage
    /// when an observed path is assigned a different array.
    pub fn subscribe_shared(&self, callback: Callback) -> u64 {
        let id = self.storage.next_id.get();
        self.storage.next_id.set(id + 1);
        self.storage.listeners.borrow_mut().insert(id, callback);
        id
    }

    /// Removes a listener. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: u64) -> bool {
        self.storage.listeners.borrow_mut().remove(&id).is_some()
    }

    /// Appends the items, returning the new length.
    pub fn push(&self, items: Vec<Value>) -> f64 {
        let old = self.pre_change();
        let new_len = {
            let mut slots = self.storage.items.borrow_mut();
            slots.extend(items.iter().cloned());
            slots.len()
        };
        if let Some(old) = old {
            self.emit(ArrayMethod::Push, items, Value::Number(new_len as f64), old);
        }
        new_len as f64
    }

    /// Removes and returns the last item, or `Undefined` when empty.
    pub fn pop(&self) -> Value {
        let old = self.pre_change();
        let removed = self
            .storage
            .items
            .borrow_mut()
            .pop()
            .unwrap_or(Value::Undefined);
        if let Some(old) = old {
            self.emit(ArrayMethod::Pop, Vec::new(), removed.clone(), old);
        }
        removed
    }

    /// Removes and returns the first item, or `Undefined` when empty.
    pub fn shift(&self) -> Value {
        let old = self.pre_change();
        let removed = {
            let mut slots = self.storage.items.borrow_mut();
            if slots.is_empty() {
                Value::Undefined
            } else {
                slots.remove(0)
            }
        };
        if let Some(old) = old {
            self.emit(ArrayMethod::Shift, Vec::new(), removed.clone(), old);
        }
        removed
    }

    /// Prepends the items, returning the new length.
    pub fn unshift(&self, items: Vec<Value>) -> f64 {
        let old = self.pre_change();
        let new_len = {
            let mut slots = self.storage.items.borrow_mut();
            slots.splice(0..0, items.iter().cloned());
            slots.len()
        };
        if let Some(old) = old {
            self.emit(
                ArrayMethod::Unshift,
                items,
                Value::Number(new_len as f64),
                old,
            );
        }
        new_len as f64
    }

    /// Reverses in place, returning the same handle.
    pub fn reverse(&self) -> ObservableArray {
        let old = self.pre_change();
        self.storage.items.borrow_mut().reverse();
        if let Some(old) = old {
            self.emit(
                ArrayMethod::Reverse,
                Vec::new(),
                Value::Array(self.clone()),
                old,
            );
        }
        self.clone()
    }

    /// Sorts in place with the default comparison: `undefined` last, the
    /// rest ordered by their string forms. Returns the same handle.
    pub fn sort(&self) -> ObservableArray {
        self.sort_by(default_compare)
    }

    /// Sorts in place with a caller-supplied comparison. Returns the
    /// same handle.
    pub fn sort_by<F>(&self, compare: F) -> ObservableArray
    where
        F: Fn(&Value, &Value) -> Ordering,
    {
        let old = self.pre_change();
        self.storage.items.borrow_mut().sort_by(|a, b| compare(a, b));
        if let Some(old) = old {
            self.emit(
                ArrayMethod::Sort,
                Vec::new(),
                Value::Array(self.clone()),
                old,
            );
        }
        self.clone()
    }

    /// Removes `delete_count` items at `start` (negative `start` counts
    /// from the end, both clamp to the array bounds) and inserts `items`
    /// in their place. Returns the removed items as a fresh array.
    pub fn splice(&self, start: isize, delete_count: isize, items: Vec<Value>) -> ObservableArray {
        let old = self.pre_change();
        let removed: Vec<Value> = {
            let mut slots = self.storage.items.borrow_mut();
            let len = slots.len() as isize;
            let begin = if start < 0 {
                (len + start).max(0)
            } else {
                start.min(len)
            } as usize;
            let count = delete_count.clamp(0, len - begin as isize) as usize;
            slots
                .splice(begin..begin + count, items.iter().cloned())
                .collect()
        };
        let removed = ObservableArray::from_vec(removed);
        if let Some(old) = old {
            let mut arguments = vec![
                Value::Number(start as f64),
                Value::Number(delete_count as f64),
            ];
            arguments.extend(items);
            self.emit(
                ArrayMethod::Splice,
                arguments,
                Value::Array(removed.clone()),
                old,
            );
        }
        removed
    }

    /// Reports a wholesale replacement of the storage behind an observed
    /// path. `old_items` is the previous storage's contents; the change
    /// goes to this handle's listeners.
    pub fn notify_length(&self, old_items: Vec<Value>) {
        let change = ArrayChange {
            method: ArrayMethod::Length,
            arguments: Vec::new(),
            return_value: Value::Number(self.len() as f64),
            old_array: old_items,
            new_array: self.clone(),
        };
        self.notify(&change);
    }

    // Snapshot taken before mutating; None when nobody is listening.
    fn pre_change(&self) -> Option<Vec<Value>> {
        if self.has_listeners() {
            Some(self.snapshot())
        } else {
            None
        }
    }

    fn emit(
        &self,
        method: ArrayMethod,
        arguments: Vec<Value>,
        return_value: Value,
        old: Vec<Value>,
    ) {
        let change = ArrayChange {
            method,
            arguments,
            return_value,
            old_array: old,
            new_array: self.clone(),
        };
        self.notify(&change);
    }

    fn notify(&self, change: &ArrayChange) {
        let callbacks: Vec<Callback> = self.storage.listeners.borrow().values().cloned().collect();
        for callback in callbacks {
            callback(change);
        }
    }
}

fn default_compare(a: &Value, b: &Value) -> Ordering {
    match (a.is_undefined(), b.is_undefined()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => coerce::to_display(a).cmp(&coerce::to_display(b)),
    }
}

impl Default for ObservableArray {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Value> for ObservableArray {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl fmt::Debug for ObservableArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.snapshot()).finish()
    }
}
