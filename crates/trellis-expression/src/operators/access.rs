//! Member access. The tokenizer emits `.` for both the static form
//! (`a.b`) and, with an argument count of one, the computed form
//! (`a[b]`); the compiler folds both into access nodes.

use super::{Associativity, OperatorDefinition, OperatorEval};

pub fn operators() -> Vec<OperatorDefinition> {
    vec![OperatorDefinition {
        symbol: ".",
        precedence: 0,
        associativity: Associativity::Left,
        arity: 2,
        eval: OperatorEval::Member,
    }]
}
