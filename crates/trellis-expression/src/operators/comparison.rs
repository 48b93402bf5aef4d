//! Relational and equality operators.
//!
//! Relational comparison is lexicographic when both sides are strings,
//! numeric otherwise; a `NaN` on either side makes every relation false.
//! Loose equality coerces across types; strict equality requires the
//! same type. Arrays compare by storage identity under both forms.

use trellis_value::{coerce, deep_equal, Value};

use super::{Associativity, OperatorDefinition, OperatorEval};

fn less_eval(lhs: &Value, rhs: &Value) -> Value {
    if let (Value::String(a), Value::String(b)) = (lhs, rhs) {
        return Value::Bool(a < b);
    }
    Value::Bool(coerce::to_number(lhs) < coerce::to_number(rhs))
}

fn less_eq_eval(lhs: &Value, rhs: &Value) -> Value {
    if let (Value::String(a), Value::String(b)) = (lhs, rhs) {
        return Value::Bool(a <= b);
    }
    Value::Bool(coerce::to_number(lhs) <= coerce::to_number(rhs))
}

fn greater_eval(lhs: &Value, rhs: &Value) -> Value {
    less_eval(rhs, lhs)
}

fn greater_eq_eval(lhs: &Value, rhs: &Value) -> Value {
    less_eq_eval(rhs, lhs)
}

/// Loose (`==`) equality. `null` and `undefined` match each other and
/// nothing else; arrays compare by storage identity, objects
/// structurally, and either container compares through its string form
/// against primitives.
fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Undefined | Value::Null, Value::Undefined | Value::Null) => true,
        (Value::Undefined | Value::Null, _) | (_, Value::Undefined | Value::Null) => false,
        (Value::Function(f), Value::Function(g)) => f.ptr_eq(g),
        (Value::Function(_), _) | (_, Value::Function(_)) => false,
        (Value::Array(x), Value::Array(y)) => x.ptr_eq(y),
        (Value::Object(_), Value::Object(_)) => deep_equal(a, b),
        (Value::Array(_) | Value::Object(_), Value::Array(_) | Value::Object(_)) => false,
        (Value::Array(_) | Value::Object(_), _) => {
            loose_eq(&Value::String(coerce::to_display(a)), b)
        }
        (_, Value::Array(_) | Value::Object(_)) => {
            loose_eq(a, &Value::String(coerce::to_display(b)))
        }
        (Value::String(x), Value::String(y)) => x == y,
        _ => coerce::to_number(a) == coerce::to_number(b),
    }
}

/// Strict (`===`) equality: no coercion across types.
fn strict_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Undefined, Value::Undefined) => true,
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => x.ptr_eq(y),
        // Plain objects have value semantics here, so structural
        // equality stands in for identity.
        (Value::Object(_), Value::Object(_)) => deep_equal(a, b),
        (Value::Function(f), Value::Function(g)) => f.ptr_eq(g),
        _ => false,
    }
}

fn loose_eq_eval(lhs: &Value, rhs: &Value) -> Value {
    Value::Bool(loose_eq(lhs, rhs))
}

fn loose_ne_eval(lhs: &Value, rhs: &Value) -> Value {
    Value::Bool(!loose_eq(lhs, rhs))
}

fn strict_eq_eval(lhs: &Value, rhs: &Value) -> Value {
    Value::Bool(strict_eq(lhs, rhs))
}

fn strict_ne_eval(lhs: &Value, rhs: &Value) -> Value {
    Value::Bool(!strict_eq(lhs, rhs))
}

pub fn operators() -> Vec<OperatorDefinition> {
    vec![
        OperatorDefinition {
            symbol: "<",
            precedence: 5,
            associativity: Associativity::Left,
            arity: 2,
            eval: OperatorEval::Binary(less_eval),
        },
        OperatorDefinition {
            symbol: "<=",
            precedence: 5,
            associativity: Associativity::Left,
            arity: 2,
            eval: OperatorEval::Binary(less_eq_eval),
        },
        OperatorDefinition {
            symbol: ">",
            precedence: 5,
            associativity: Associativity::Left,
            arity: 2,
            eval: OperatorEval::Binary(greater_eval),
        },
        OperatorDefinition {
            symbol: ">=",
            precedence: 5,
            associativity: Associativity::Left,
            arity: 2,
            eval: OperatorEval::Binary(greater_eq_eval),
        },
        OperatorDefinition {
            symbol: "==",
            precedence: 6,
            associativity: Associativity::Left,
            arity: 2,
            eval: OperatorEval::Binary(loose_eq_eval),
        },
        OperatorDefinition {
            symbol: "!=",
            precedence: 6,
            associativity: Associativity::Left,
            arity: 2,
            eval: OperatorEval::Binary(loose_ne_eval),
        },
        OperatorDefinition {
            symbol: "===",
            precedence: 6,
            associativity: Associativity::Left,
            arity: 2,
            eval: OperatorEval::Binary(strict_eq_eval),
        },
        OperatorDefinition {
            symbol: "!==",
            precedence: 6,
            associativity: Associativity::Left,
            arity: 2,
            eval: OperatorEval::Binary(strict_ne_eval),
        },
    ]
}
