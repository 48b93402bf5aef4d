//! The compiled expression tree.

use trellis_value::Value;

use crate::operators::OperatorDefinition;

/// One node of a compiled expression.
///
/// Operator nodes hold a reference into the static operator table, so an
/// evaluator dispatches on the table entry rather than re-resolving
/// symbols. Member chains are folded into `Member` / `Index` nodes at
/// compile time.
#[derive(Clone, Debug)]
pub enum Expr {
    /// A value baked in at compile time.
    Literal(Value),
    /// Scope lookup by name.
    Identifier(String),
    /// Template-alias lookup; the name is stored without its `@` sigil.
    Alias(String),
    /// Static member access `base.key`.
    Member { base: Box<Expr>, key: String },
    /// Computed member access `base[index]`.
    Index { base: Box<Expr>, index: Box<Expr> },
    /// Function call. A member-access callee supplies the receiver.
    Call { callee: Box<Expr>, args: Vec<Expr> },
    Unary {
        op: &'static OperatorDefinition,
        operand: Box<Expr>,
    },
    Binary {
        op: &'static OperatorDefinition,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Ternary {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    /// Array literal `[a, b, c]`.
    ArrayLit(Vec<Expr>),
    /// Object literal with ordered pairs.
    ObjectLit(Vec<(String, Expr)>),
}

impl Expr {
    /// A readable name for the expression, used in call-failure errors:
    /// identifier and member chains render as their dotted path.
    pub fn describe(&self) -> String {
        match self {
            Expr::Identifier(name) => name.clone(),
            Expr::Alias(name) => format!("@{name}"),
            Expr::Member { base, key } => format!("{}.{}", base.describe(), key),
            Expr::Index { base, index } => match index.as_ref() {
                Expr::Literal(value) => {
                    format!("{}.{}", base.describe(), trellis_value::coerce::to_display(value))
                }
                _ => format!("{}[..]", base.describe()),
            },
            Expr::Call { callee, .. } => format!("{}()", callee.describe()),
            _ => "expression".to_string(),
        }
    }
}
