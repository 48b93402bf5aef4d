//! Bitwise operators. Operands pass through ToInt32/ToUint32 first, so
//! `NaN` and out-of-range doubles collapse into the 32-bit lane.

use trellis_value::{coerce, Value};

use super::{Associativity, OperatorDefinition, OperatorEval};

fn bit_not_eval(operand: &Value) -> Value {
    Value::Number(!coerce::to_int32(operand) as f64)
}

fn shift_left_eval(lhs: &Value, rhs: &Value) -> Value {
    Value::Number((coerce::to_int32(lhs) << (coerce::to_uint32(rhs) & 31)) as f64)
}

fn shift_right_eval(lhs: &Value, rhs: &Value) -> Value {
    Value::Number((coerce::to_int32(lhs) >> (coerce::to_uint32(rhs) & 31)) as f64)
}

fn shift_right_zero_eval(lhs: &Value, rhs: &Value) -> Value {
    Value::Number((coerce::to_uint32(lhs) >> (coerce::to_uint32(rhs) & 31)) as f64)
}

fn bit_and_eval(lhs: &Value, rhs: &Value) -> Value {
    Value::Number((coerce::to_int32(lhs) & coerce::to_int32(rhs)) as f64)
}

fn bit_xor_eval(lhs: &Value, rhs: &Value) -> Value {
    Value::Number((coerce::to_int32(lhs) ^ coerce::to_int32(rhs)) as f64)
}

fn bit_or_eval(lhs: &Value, rhs: &Value) -> Value {
    Value::Number((coerce::to_int32(lhs) | coerce::to_int32(rhs)) as f64)
}

pub fn operators() -> Vec<OperatorDefinition> {
    vec![
        OperatorDefinition {
            symbol: "~",
            precedence: 1,
            associativity: Associativity::Right,
            arity: 1,
            eval: OperatorEval::Unary(bit_not_eval),
        },
        OperatorDefinition {
            symbol: "<<",
            precedence: 4,
            associativity: Associativity::Left,
            arity: 2,
            eval: OperatorEval::Binary(shift_left_eval),
        },
        OperatorDefinition {
            symbol: ">>",
            precedence: 4,
            associativity: Associativity::Left,
            arity: 2,
            eval: OperatorEval::Binary(shift_right_eval),
        },
        OperatorDefinition {
            symbol: ">>>",
            precedence: 4,
            associativity: Associativity::Left,
            arity: 2,
            eval: OperatorEval::Binary(shift_right_zero_eval),
        },
        OperatorDefinition {
            symbol: "&",
            precedence: 7,
            associativity: Associativity::Left,
            arity: 2,
            eval: OperatorEval::Binary(bit_and_eval),
        },
        OperatorDefinition {
            symbol: "^",
            precedence: 8,
            associativity: Associativity::Left,
            arity: 2,
            eval: OperatorEval::Binary(bit_xor_eval),
        },
        OperatorDefinition {
            symbol: "|",
            precedence: 9,
            associativity: Associativity::Left,
            arity: 2,
            eval: OperatorEval::Binary(bit_or_eval),
        },
    ]
}
