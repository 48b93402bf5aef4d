//! The operator table: every operator the tokenizer accepts, with its
//! binding strength, associativity, arity and evaluation behavior.

pub mod access;
pub mod arithmetic;
pub mod assignment;
pub mod bitwise;
pub mod comparison;
pub mod logical;

use std::collections::HashMap;
use std::sync::OnceLock;

use trellis_value::Value;

/// How an operator groups against neighbors of equal precedence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

/// What evaluating an operator node does.
///
/// `Unary` and `Binary` compute from eagerly-evaluated operands. `And`,
/// `Or` and `Ternary` decide which operands are evaluated at all.
/// `Member` never reaches evaluation: the compiler folds it into access
/// nodes. `Assignment` and `Update` parse like any operator, then fail
/// when evaluated.
#[derive(Clone, Copy, Debug)]
pub enum OperatorEval {
    Unary(fn(&Value) -> Value),
    Binary(fn(&Value, &Value) -> Value),
    And,
    Or,
    Ternary,
    Member,
    Assignment,
    Update,
}

/// One operator table entry.
///
/// `precedence` is a binding strength where numerically lower binds
/// tighter: member access is 0, unary operators 1, and the assignment
/// family is loosest at 13.
#[derive(Debug)]
pub struct OperatorDefinition {
    pub symbol: &'static str,
    pub precedence: u8,
    pub associativity: Associativity,
    pub arity: u8,
    pub eval: OperatorEval,
}

/// All operators combined.
pub fn all_operators() -> Vec<OperatorDefinition> {
    let mut ops = Vec::new();
    ops.extend(access::operators());
    ops.extend(arithmetic::operators());
    ops.extend(bitwise::operators());
    ops.extend(comparison::operators());
    ops.extend(logical::operators());
    ops.extend(assignment::operators());
    ops
}

fn table() -> &'static [OperatorDefinition] {
    static TABLE: OnceLock<Vec<OperatorDefinition>> = OnceLock::new();
    TABLE.get_or_init(all_operators)
}

/// Looks a symbol up in the static table.
pub fn lookup(symbol: &str) -> Option<&'static OperatorDefinition> {
    static MAP: OnceLock<HashMap<&'static str, &'static OperatorDefinition>> = OnceLock::new();
    MAP.get_or_init(|| table().iter().map(|def| (def.symbol, def)).collect())
        .get(symbol)
        .copied()
}

// Symbols the tokenizer never reaches by plain text matching: member
// access and the ternary have their own scan paths, and the unary signs
// are rewritten from `+` / `-` by position.
const UNSCANNABLE: &[&str] = &[".", "?:", "u+", "u-"];

/// Greedily matches the longest operator symbol at the start of `rest`.
pub fn match_symbol(rest: &str) -> Option<&'static OperatorDefinition> {
    for len in (1..=4).rev() {
        if let Some(prefix) = rest.get(..len) {
            if UNSCANNABLE.contains(&prefix) {
                continue;
            }
            if let Some(def) = lookup(prefix) {
                return Some(def);
            }
        }
    }
    None
}

fn builtin(symbol: &str) -> &'static OperatorDefinition {
    match lookup(symbol) {
        Some(def) => def,
        None => panic!("operator table is missing '{symbol}'"),
    }
}

/// The member access operator.
pub fn member() -> &'static OperatorDefinition {
    builtin(".")
}

/// The assembled ternary operator.
pub fn ternary() -> &'static OperatorDefinition {
    builtin("?:")
}

/// Unary plus, the positional rewrite of `+`.
pub fn unary_plus() -> &'static OperatorDefinition {
    builtin("u+")
}

/// Unary minus, the positional rewrite of `-`.
pub fn unary_minus() -> &'static OperatorDefinition {
    builtin("u-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols_are_unique() {
        let ops = all_operators();
        let mut seen = std::collections::HashSet::new();
        for def in &ops {
            assert!(seen.insert(def.symbol), "duplicate symbol {}", def.symbol);
        }
    }

    #[test]
    fn test_longest_match_wins() {
        assert_eq!(match_symbol(">>>=1").map(|d| d.symbol), Some(">>>="));
        assert_eq!(match_symbol(">>>1").map(|d| d.symbol), Some(">>>"));
        assert_eq!(match_symbol(">=1").map(|d| d.symbol), Some(">="));
        assert_eq!(match_symbol(">1").map(|d| d.symbol), Some(">"));
        assert_eq!(match_symbol("===x").map(|d| d.symbol), Some("==="));
        assert_eq!(match_symbol("==x").map(|d| d.symbol), Some("=="));
    }

    #[test]
    fn test_member_binds_tightest() {
        let member = member();
        for def in all_operators() {
            if def.symbol != "." {
                assert!(def.precedence > member.precedence, "{}", def.symbol);
            }
        }
    }
}
