//! Logical operators. `&&` and `||` are lazy and value-returning: they
//! yield an operand, not a boolean. The assembled ternary lives here
//! too; the tokenizer emits it as a single three-operand `?:` token.

use trellis_value::{coerce, Value};

use super::{Associativity, OperatorDefinition, OperatorEval};

fn not_eval(operand: &Value) -> Value {
    Value::Bool(!coerce::is_truthy(operand))
}

pub fn operators() -> Vec<OperatorDefinition> {
    vec![
        OperatorDefinition {
            symbol: "!",
            precedence: 1,
            associativity: Associativity::Right,
            arity: 1,
            eval: OperatorEval::Unary(not_eval),
        },
        OperatorDefinition {
            symbol: "&&",
            precedence: 10,
            associativity: Associativity::Left,
            arity: 2,
            eval: OperatorEval::And,
        },
        OperatorDefinition {
            symbol: "||",
            precedence: 11,
            associativity: Associativity::Left,
            arity: 2,
            eval: OperatorEval::Or,
        },
        OperatorDefinition {
            symbol: "?:",
            precedence: 12,
            associativity: Associativity::Right,
            arity: 3,
            eval: OperatorEval::Ternary,
        },
    ]
}
