use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::array::ObservableArray;
use crate::coerce;
use crate::deep_equal::deep_equal;

/// A host function callable from expressions.
///
/// Wraps an `Rc` closure receiving the `this` receiver and the argument
/// list. Equality is pointer identity, like function identity in
/// JavaScript.
#[derive(Clone)]
pub struct NativeFunction {
    f: Rc<dyn Fn(&Value, &[Value]) -> Value>,
}

impl NativeFunction {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Value + 'static,
    {
        NativeFunction { f: Rc::new(f) }
    }

    /// Invokes the function with `this` bound to `receiver`.
    pub fn call(&self, receiver: &Value, args: &[Value]) -> Value {
        (self.f)(receiver, args)
    }

    /// True when both handles refer to the same underlying closure.
    pub fn ptr_eq(&self, other: &NativeFunction) -> bool {
        Rc::ptr_eq(&self.f, &other.f)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFunction({:p})", Rc::as_ptr(&self.f))
    }
}

impl PartialEq for NativeFunction {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

/// A value in the binding language.
///
/// Numbers are IEEE-754 doubles, so `NaN` and the infinities are ordinary
/// values. Objects keep insertion order. `Array` holds a shared handle:
/// cloning a `Value::Array` yields a second handle to the same storage,
/// matching reference semantics for arrays. Use [`crate::deep_clone`] to
/// detach.
#[derive(Clone, Debug)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(ObservableArray),
    Object(IndexMap<String, Value>),
    Function(NativeFunction),
}

impl Value {
    /// JavaScript `typeof`-style tag, with `null` and arrays given their
    /// own names.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Property lookup with JavaScript member semantics.
    ///
    /// Objects resolve keys; arrays resolve numeric indexes and `length`;
    /// strings resolve `length` and numeric indexes to one-character
    /// strings. Anything else, including a missing key, yields
    /// `Undefined`.
    pub fn get(&self, key: &str) -> Value {
        match self {
            Value::Object(map) => map.get(key).cloned().unwrap_or(Value::Undefined),
            Value::Array(arr) => {
                if key == "length" {
                    Value::Number(arr.len() as f64)
                } else if let Ok(index) = key.parse::<usize>() {
                    arr.get(index)
                } else {
                    Value::Undefined
                }
            }
            Value::String(s) => {
                if key == "length" {
                    Value::Number(s.chars().count() as f64)
                } else if let Ok(index) = key.parse::<usize>() {
                    s.chars()
                        .nth(index)
                        .map(|c| Value::String(c.to_string()))
                        .unwrap_or(Value::Undefined)
                } else {
                    Value::Undefined
                }
            }
            _ => Value::Undefined,
        }
    }

    /// True in a boolean context, per JavaScript truthiness.
    pub fn is_truthy(&self) -> bool {
        coerce::is_truthy(self)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        deep_equal(self, other)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", coerce::to_display(self))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(ObservableArray::from_vec(items))
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(map: IndexMap<String, Value>) -> Self {
        Value::Object(map)
    }
}
