//! Conversions between runtime values and `serde_json` trees.

use crate::array::ObservableArray;
use crate::value::Value;

/// Builds a runtime value from a JSON tree.
///
/// Arrays come back as fresh [`ObservableArray`] storage and objects keep
/// their key order.
///
/// ```
/// use trellis_value::from_json;
/// use serde_json::json;
///
/// let value = from_json(&json!({"user": {"name": "Ada"}}));
/// assert_eq!(value.get("user").get("name"), "Ada".into());
/// ```
pub fn from_json(json: &serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(items) => {
            let converted = items.iter().map(from_json).collect();
            Value::Array(ObservableArray::from_vec(converted))
        }
        serde_json::Value::Object(map) => {
            let converted = map
                .iter()
                .map(|(key, val)| (key.clone(), from_json(val)))
                .collect();
            Value::Object(converted)
        }
    }
}

/// Renders a runtime value as a JSON tree.
///
/// `undefined`, functions, `NaN` and the infinities have no JSON form and
/// become `null`. Arrays are snapshotted at the moment of conversion.
pub fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Undefined | Value::Null | Value::Function(_) => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => serde_json::Number::from_f64(*n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Array(arr) => {
            serde_json::Value::Array(arr.snapshot().iter().map(to_json).collect())
        }
        Value::Object(map) => {
            let converted = map
                .iter()
                .map(|(key, val)| (key.clone(), to_json(val)))
                .collect();
            serde_json::Value::Object(converted)
        }
    }
}

impl From<&serde_json::Value> for Value {
    fn from(json: &serde_json::Value) -> Self {
        from_json(json)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_round_trip_preserves_key_order() {
        let source = json!({"zeta": 1, "alpha": {"nested": [1, 2]}});
        assert_eq!(to_json(&from_json(&source)), source);
    }

    #[test]
    fn test_non_finite_numbers_become_null() {
        assert_eq!(to_json(&Value::Number(f64::NAN)), json!(null));
        assert_eq!(to_json(&Value::Number(f64::INFINITY)), json!(null));
    }

    #[test]
    fn test_undefined_becomes_null() {
        assert_eq!(to_json(&Value::Undefined), json!(null));
    }
}
