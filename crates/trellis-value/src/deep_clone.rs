use crate::array::ObservableArray;
use crate::value::Value;

/// Creates a deep copy of a runtime value.
///
/// Arrays get fresh storage with no listeners attached, so the copy is
/// detached from the observation machinery of the original. Function
/// values keep their handle, since a host closure has no structural copy.
///
/// # Examples
///
/// ```
/// use trellis_value::{deep_clone, Value, ObservableArray};
///
/// let original = ObservableArray::from_vec(vec![Value::from(1.0)]);
/// let copy = deep_clone(&Value::Array(original.clone()));
///
/// original.push(vec![Value::from(2.0)]);
/// match copy {
///     Value::Array(arr) => assert_eq!(arr.len(), 1),
///     _ => unreachable!(),
/// }
/// ```
pub fn deep_clone(value: &Value) -> Value {
    match value {
        Value::Undefined => Value::Undefined,
        Value::Null => Value::Null,
        Value::Bool(b) => Value::Bool(*b),
        Value::Number(n) => Value::Number(*n),
        Value::String(s) => Value::String(s.clone()),
        Value::Array(arr) => {
            let items = arr.snapshot().iter().map(deep_clone).collect();
            Value::Array(ObservableArray::from_vec(items))
        }
        Value::Object(map) => {
            let cloned = map
                .iter()
                .map(|(key, val)| (key.clone(), deep_clone(val)))
                .collect();
            Value::Object(cloned)
        }
        Value::Function(f) => Value::Function(f.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_detaches_nested_arrays() {
        let inner = ObservableArray::from_vec(vec![Value::from(1.0)]);
        let mut map = indexmap::IndexMap::new();
        map.insert("list".to_string(), Value::Array(inner.clone()));
        let copy = deep_clone(&Value::Object(map));

        inner.push(vec![Value::from(2.0)]);

        match copy.get("list") {
            Value::Array(arr) => assert_eq!(arr.len(), 1),
            other => panic!("expected array, got {}", other.type_name()),
        }
    }

    #[test]
    fn test_clone_preserves_key_order() {
        let mut map = indexmap::IndexMap::new();
        map.insert("z".to_string(), Value::from(1.0));
        map.insert("a".to_string(), Value::from(2.0));
        match deep_clone(&Value::Object(map)) {
            Value::Object(copy) => {
                let keys: Vec<&String> = copy.keys().collect();
                assert_eq!(keys, ["z", "a"]);
            }
            other => panic!("expected object, got {}", other.type_name()),
        }
    }
}
