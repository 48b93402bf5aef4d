//! The assignment and update family. Bindings are read-only, so these
//! operators tokenize and parse like any other but refuse to evaluate;
//! keeping them in the table gives a broken binding a precise error
//! instead of a stray-character failure at the `=`.

use super::{Associativity, OperatorDefinition, OperatorEval};

const COMPOUND: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "<<=", ">>=", ">>>=", "&=", "^=", "|=",
];

pub fn operators() -> Vec<OperatorDefinition> {
    let mut ops: Vec<OperatorDefinition> = COMPOUND
        .iter()
        .copied()
        .map(|symbol| OperatorDefinition {
            symbol,
            precedence: 13,
            associativity: Associativity::Right,
            arity: 2,
            eval: OperatorEval::Assignment,
        })
        .collect();
    ops.push(OperatorDefinition {
        symbol: "++",
        precedence: 1,
        associativity: Associativity::Right,
        arity: 1,
        eval: OperatorEval::Update,
    });
    ops.push(OperatorDefinition {
        symbol: "--",
        precedence: 1,
        associativity: Associativity::Right,
        arity: 1,
        eval: OperatorEval::Update,
    });
    ops
}
