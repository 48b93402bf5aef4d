use crate::value::Value;

/// Performs a deep equality check between two runtime values.
///
/// This function compares values recursively, checking equality for:
/// - Primitives (undefined, null, bool, number, string)
/// - Arrays (element-by-element comparison)
/// - Objects (key-by-key comparison, insertion order ignored)
/// - Functions (pointer identity)
///
/// Number comparison follows IEEE-754, so `NaN` is not equal to itself.
///
/// # Examples
///
/// ```
/// use trellis_value::{deep_equal, from_json};
/// use serde_json::json;
///
/// let a = from_json(&json!({"foo": [1, 2, 3]}));
/// let b = from_json(&json!({"foo": [1, 2, 3]}));
/// let c = from_json(&json!({"foo": [1, 2, 4]}));
///
/// assert!(deep_equal(&a, &b));
/// assert!(!deep_equal(&a, &c));
/// ```
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Undefined, Value::Undefined) => true,
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,

        // Arrays: same handle short-circuits, otherwise element by element
        (Value::Array(arr_a), Value::Array(arr_b)) => {
            if arr_a.ptr_eq(arr_b) {
                return true;
            }
            let items_a = arr_a.snapshot();
            let items_b = arr_b.snapshot();
            if items_a.len() != items_b.len() {
                return false;
            }
            for i in 0..items_a.len() {
                if !deep_equal(&items_a[i], &items_b[i]) {
                    return false;
                }
            }
            true
        }

        // Objects
        (Value::Object(obj_a), Value::Object(obj_b)) => {
            if obj_a.len() != obj_b.len() {
                return false;
            }
            for (key, val_a) in obj_a {
                match obj_b.get(key) {
                    Some(val_b) => {
                        if !deep_equal(val_a, val_b) {
                            return false;
                        }
                    }
                    None => return false,
                }
            }
            true
        }

        // Functions compare by identity
        (Value::Function(f_a), Value::Function(f_b)) => f_a.ptr_eq(f_b),

        // Different types are never equal
        _ => false,
    }
}
