//! JavaScript abstract conversions: `ToNumber`, `ToInt32`, `ToUint32`,
//! `ToString` and boolean truthiness.

use crate::value::Value;

/// Converts a value to a number, following JavaScript `ToNumber`.
///
/// `undefined` becomes `NaN`, `null` becomes `0`, strings are trimmed and
/// parsed (empty string is `0`), containers and functions become `NaN`.
///
/// ```
/// use trellis_value::{coerce, Value};
/// assert_eq!(coerce::to_number(&Value::String("  12 ".into())), 12.0);
/// assert_eq!(coerce::to_number(&Value::Null), 0.0);
/// assert!(coerce::to_number(&Value::Undefined).is_nan());
/// ```
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Undefined => f64::NAN,
        Value::Null => 0.0,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Number(n) => *n,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(f64::NAN)
            }
        }
        Value::Array(_) | Value::Object(_) | Value::Function(_) => f64::NAN,
    }
}

/// `ToInt32`: converts to a number, then wraps modulo 2^32 into the
/// signed 32-bit range. `NaN` and the infinities become `0`.
pub fn to_int32(value: &Value) -> i32 {
    to_uint32(value) as i32
}

/// `ToUint32`: like [`to_int32`] but reinterpreted as unsigned, as the
/// `>>>` operator requires.
pub fn to_uint32(value: &Value) -> u32 {
    let n = to_number(value);
    if !n.is_finite() {
        return 0;
    }
    // trunc and fmod are exact on f64, so the wrap loses nothing even
    // past 2^53
    let wrapped = n.trunc() % 4_294_967_296.0;
    if wrapped < 0.0 {
        (wrapped + 4_294_967_296.0) as u32
    } else {
        wrapped as u32
    }
}

/// Boolean coercion. Falsy values are `undefined`, `null`, `false`, `0`,
/// `NaN` and the empty string; everything else, containers and functions
/// included, is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Undefined | Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => *n != 0.0 && !n.is_nan(),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) | Value::Function(_) => true,
    }
}

/// String conversion, following JavaScript `ToString`.
///
/// Arrays join their display forms with commas, with `null` and
/// `undefined` elements rendered empty. Plain objects become
/// `[object Object]`.
///
/// ```
/// use trellis_value::{coerce, Value};
/// let list = Value::from(vec![Value::from(1.0), Value::Null, Value::from(2.0)]);
/// assert_eq!(coerce::to_display(&list), "1,,2");
/// ```
pub fn to_display(value: &Value) -> String {
    match value {
        Value::Undefined => "undefined".to_string(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(*n),
        Value::String(s) => s.clone(),
        Value::Array(arr) => {
            let parts: Vec<String> = arr
                .snapshot()
                .iter()
                .map(|item| match item {
                    Value::Undefined | Value::Null => String::new(),
                    other => to_display(other),
                })
                .collect();
            parts.join(",")
        }
        Value::Object(_) => "[object Object]".to_string(),
        Value::Function(_) => "function".to_string(),
    }
}

/// Formats a double the way JavaScript renders one: no trailing `.0` on
/// integral values, `NaN`, `Infinity` and `-Infinity` spelled out, and
/// negative zero collapsed to `0`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if n.fract() == 0.0 && n.abs() < 9.007_199_254_740_992e15 {
        return format!("{}", n as i64);
    }
    format!("{}", n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_strings_parse_after_trimming() {
        assert_eq!(to_number(&Value::String(" 3.5 ".into())), 3.5);
        assert!(to_number(&Value::String("3px".into())).is_nan());
        assert_eq!(to_number(&Value::String("".into())), 0.0);
    }

    #[test]
    fn int32_wraps_like_the_bitwise_operators() {
        assert_eq!(to_int32(&Value::Number(-1.0)), -1);
        assert_eq!(to_int32(&Value::Number(f64::NAN)), 0);
        assert_eq!(to_uint32(&Value::Number(-1.0)), u32::MAX);
        assert_eq!(to_int32(&Value::Number(3.7)), 3);
        assert_eq!(to_int32(&Value::Number(2_147_483_648.0)), i32::MIN);
    }

    #[test]
    fn int32_zeroes_the_infinities_and_wraps_huge_magnitudes() {
        assert_eq!(to_int32(&Value::Number(f64::INFINITY)), 0);
        assert_eq!(to_int32(&Value::Number(f64::NEG_INFINITY)), 0);
        assert_eq!(to_uint32(&Value::Number(f64::INFINITY)), 0);
        // 2^64 and 2^63 are exact multiples of 2^32
        assert_eq!(to_int32(&Value::Number(18_446_744_073_709_551_616.0)), 0);
        assert_eq!(to_uint32(&Value::Number(9_223_372_036_854_775_808.0)), 0);
        assert_eq!(to_uint32(&Value::Number(-9_223_372_036_854_775_808.0)), 0);
    }

    #[test]
    fn truthiness_matches_javascript() {
        assert!(!is_truthy(&Value::Number(f64::NAN)));
        assert!(!is_truthy(&Value::String("".into())));
        assert!(is_truthy(&Value::String("0".into())));
        assert!(is_truthy(&Value::from(Vec::new())));
        assert!(is_truthy(&Value::Object(Default::default())));
    }

    #[test]
    fn numbers_render_without_float_suffix() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(3.25), "3.25");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }
}
