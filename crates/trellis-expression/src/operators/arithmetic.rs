//! Additive, multiplicative and sign operators, with JavaScript number
//! semantics: division by zero gives an infinity, invalid arithmetic
//! gives `NaN`, and `+` concatenates when either side stringifies.

use trellis_value::{coerce, Value};

use super::{Associativity, OperatorDefinition, OperatorEval};

// Strings concatenate; arrays and objects convert to strings first, the
// way ToPrimitive lands for them.
fn concatenates(value: &Value) -> bool {
    matches!(
        value,
        Value::String(_) | Value::Array(_) | Value::Object(_)
    )
}

fn add_eval(lhs: &Value, rhs: &Value) -> Value {
    if concatenates(lhs) || concatenates(rhs) {
        let mut joined = coerce::to_display(lhs);
        joined.push_str(&coerce::to_display(rhs));
        Value::String(joined)
    } else {
        Value::Number(coerce::to_number(lhs) + coerce::to_number(rhs))
    }
}

fn subtract_eval(lhs: &Value, rhs: &Value) -> Value {
    Value::Number(coerce::to_number(lhs) - coerce::to_number(rhs))
}

fn multiply_eval(lhs: &Value, rhs: &Value) -> Value {
    Value::Number(coerce::to_number(lhs) * coerce::to_number(rhs))
}

fn divide_eval(lhs: &Value, rhs: &Value) -> Value {
    Value::Number(coerce::to_number(lhs) / coerce::to_number(rhs))
}

fn remainder_eval(lhs: &Value, rhs: &Value) -> Value {
    Value::Number(coerce::to_number(lhs) % coerce::to_number(rhs))
}

fn plus_eval(operand: &Value) -> Value {
    Value::Number(coerce::to_number(operand))
}

fn negate_eval(operand: &Value) -> Value {
    Value::Number(-coerce::to_number(operand))
}

pub fn operators() -> Vec<OperatorDefinition> {
    vec![
        OperatorDefinition {
            symbol: "u+",
            precedence: 1,
            associativity: Associativity::Right,
            arity: 1,
            eval: OperatorEval::Unary(plus_eval),
        },
        OperatorDefinition {
            symbol: "u-",
            precedence: 1,
            associativity: Associativity::Right,
            arity: 1,
            eval: OperatorEval::Unary(negate_eval),
        },
        OperatorDefinition {
            symbol: "*",
            precedence: 2,
            associativity: Associativity::Left,
            arity: 2,
            eval: OperatorEval::Binary(multiply_eval),
        },
        OperatorDefinition {
            symbol: "/",
            precedence: 2,
            associativity: Associativity::Left,
            arity: 2,
            eval: OperatorEval::Binary(divide_eval),
        },
        OperatorDefinition {
            symbol: "%",
            precedence: 2,
            associativity: Associativity::Left,
            arity: 2,
            eval: OperatorEval::Binary(remainder_eval),
        },
        OperatorDefinition {
            symbol: "+",
            precedence: 3,
            associativity: Associativity::Left,
            arity: 2,
            eval: OperatorEval::Binary(add_eval),
        },
        OperatorDefinition {
            symbol: "-",
            precedence: 3,
            associativity: Associativity::Left,
            arity: 2,
            eval: OperatorEval::Binary(subtract_eval),
        },
    ]
}
