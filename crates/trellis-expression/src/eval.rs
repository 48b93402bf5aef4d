//! Scope-chain evaluation.
//!
//! Evaluation follows JavaScript loose semantics throughout: missing
//! names and members read as `undefined`, `&&` and `||` return the
//! deciding operand, comparisons and arithmetic coerce through
//! `trellis_value::coerce`. The only hard failures are assignment and
//! update operators, which compile but never evaluate, and calling a
//! value that is not a function.

use indexmap::IndexMap;
use trellis_value::{coerce, Value};

use crate::ast::Expr;
use crate::compile::{CompiledExpression, ExprState};
use crate::error::ExprError;
use crate::operators::OperatorEval;

/// One frame of the lookup chain an expression evaluates against.
///
/// A frame wraps a context value and optionally a set of template
/// aliases. Lookups try the frame's own data first and fall back to the
/// parent, so a repeated item can shadow names from its surroundings.
///
/// ```
/// use trellis_expression::{parse, Scope};
/// use trellis_value::from_json;
/// use serde_json::json;
///
/// let outer_data = from_json(&json!({"tax": 0.2, "price": 1.0}));
/// let inner_data = from_json(&json!({"price": 40.0}));
/// let outer = Scope::new(&outer_data);
/// let inner = outer.child(&inner_data);
///
/// let expr = parse("price * (1 + tax)").unwrap();
/// assert_eq!(expr.evaluate_in(&inner).unwrap(), 48.0.into());
/// ```
pub struct Scope<'a> {
    data: &'a Value,
    aliases: Option<&'a IndexMap<String, Value>>,
    parent: Option<&'a Scope<'a>>,
}

impl<'a> Scope<'a> {
    /// A root frame over a context value.
    pub fn new(data: &'a Value) -> Scope<'a> {
        Scope {
            data,
            aliases: None,
            parent: None,
        }
    }

    /// A root frame carrying template aliases alongside the data.
    pub fn with_aliases(data: &'a Value, aliases: &'a IndexMap<String, Value>) -> Scope<'a> {
        Scope {
            data,
            aliases: Some(aliases),
            parent: None,
        }
    }

    /// A child frame whose lookups fall back to this frame.
    pub fn child(&'a self, data: &'a Value) -> Scope<'a> {
        Scope {
            data,
            aliases: None,
            parent: Some(self),
        }
    }

    /// A child frame with its own aliases.
    pub fn child_with_aliases(
        &'a self,
        data: &'a Value,
        aliases: &'a IndexMap<String, Value>,
    ) -> Scope<'a> {
        Scope {
            data,
            aliases: Some(aliases),
            parent: Some(self),
        }
    }

    /// The context value of this frame.
    pub fn data(&self) -> &Value {
        self.data
    }

    /// Whether `value` itself answers for `name`, as opposed to the
    /// lookup falling through to a parent frame.
    fn has(value: &Value, name: &str) -> bool {
        match value {
            Value::Object(map) => map.contains_key(name),
            Value::Array(items) => {
                name == "length"
                    || name
                        .parse::<usize>()
                        .map(|i| i < items.len())
                        .unwrap_or(false)
            }
            Value::String(s) => {
                name == "length"
                    || name
                        .parse::<usize>()
                        .map(|i| i < s.chars().count())
                        .unwrap_or(false)
            }
            _ => false,
        }
    }

    fn lookup(&self, name: &str) -> Value {
        let mut frame = Some(self);
        while let Some(scope) = frame {
            if Self::has(scope.data, name) {
                return scope.data.get(name);
            }
            frame = scope.parent;
        }
        Value::Undefined
    }

    /// Resolves a bare callee together with the frame value it was
    /// found on, which becomes the call receiver.
    fn lookup_function(&self, name: &str) -> (Value, Value) {
        let mut frame = Some(self);
        while let Some(scope) = frame {
            if Self::has(scope.data, name) {
                return (scope.data.get(name), scope.data.clone());
            }
            frame = scope.parent;
        }
        (Value::Undefined, Value::Undefined)
    }

    fn lookup_alias(&self, name: &str) -> Value {
        let mut frame = Some(self);
        while let Some(scope) = frame {
            if let Some(found) = scope.aliases.and_then(|aliases| aliases.get(name)) {
                return found.clone();
            }
            frame = scope.parent;
        }
        Value::Undefined
    }
}

impl CompiledExpression {
    /// Evaluates against a single context value.
    pub fn evaluate(&self, data: &Value) -> Result<Value, ExprError> {
        self.evaluate_in(&Scope::new(data))
    }

    /// Evaluates in a scope chain.
    ///
    /// A one-time expression, or one that reads no identifiers and no
    /// aliases, captures the result: every later call returns the same
    /// value without touching the scope.
    pub fn evaluate_in(&self, scope: &Scope<'_>) -> Result<Value, ExprError> {
        let tree = match &*self.state.borrow() {
            ExprState::Constant(value) => return Ok(value.clone()),
            ExprState::Dynamic(tree) => tree.clone(),
        };
        let value = eval_expr(&tree, scope, self.source())?;
        if self.is_one_time() || (self.identifiers().is_empty() && self.aliases().is_empty()) {
            *self.state.borrow_mut() = ExprState::Constant(value.clone());
        }
        Ok(value)
    }
}

fn eval_expr(expr: &Expr, scope: &Scope<'_>, source: &str) -> Result<Value, ExprError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Identifier(name) => Ok(scope.lookup(name)),
        Expr::Alias(name) => Ok(scope.lookup_alias(name)),
        Expr::Member { base, key } => Ok(eval_expr(base, scope, source)?.get(key)),
        Expr::Index { base, index } => {
            let base = eval_expr(base, scope, source)?;
            let key = coerce::to_display(&eval_expr(index, scope, source)?);
            Ok(base.get(&key))
        }
        Expr::Call { callee, args } => eval_call(callee, args, scope, source),
        Expr::Unary { op, operand } => match op.eval {
            OperatorEval::Unary(apply) => Ok(apply(&eval_expr(operand, scope, source)?)),
            _ => Err(ExprError::AssignmentUnsupported {
                operator: op.symbol.to_string(),
                expression: source.to_string(),
            }),
        },
        Expr::Binary { op, lhs, rhs } => match op.eval {
            OperatorEval::Binary(apply) => {
                let left = eval_expr(lhs, scope, source)?;
                let right = eval_expr(rhs, scope, source)?;
                Ok(apply(&left, &right))
            }
            OperatorEval::And => {
                let left = eval_expr(lhs, scope, source)?;
                if coerce::is_truthy(&left) {
                    eval_expr(rhs, scope, source)
                } else {
                    Ok(left)
                }
            }
            OperatorEval::Or => {
                let left = eval_expr(lhs, scope, source)?;
                if coerce::is_truthy(&left) {
                    Ok(left)
                } else {
                    eval_expr(rhs, scope, source)
                }
            }
            _ => Err(ExprError::AssignmentUnsupported {
                operator: op.symbol.to_string(),
                expression: source.to_string(),
            }),
        },
        Expr::Ternary {
            cond,
            then,
            otherwise,
        } => {
            if coerce::is_truthy(&eval_expr(cond, scope, source)?) {
                eval_expr(then, scope, source)
            } else {
                eval_expr(otherwise, scope, source)
            }
        }
        Expr::ArrayLit(items) => {
            let values = items
                .iter()
                .map(|item| eval_expr(item, scope, source))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::from(values))
        }
        Expr::ObjectLit(pairs) => {
            let mut map = IndexMap::new();
            for (key, value) in pairs {
                map.insert(key.clone(), eval_expr(value, scope, source)?);
            }
            Ok(Value::Object(map))
        }
    }
}

/// Calls resolve the callee and its receiver together: `a.b()` binds
/// `a` as the receiver, a bare `f()` binds the frame `f` was found on.
fn eval_call(
    callee: &Expr,
    args: &[Expr],
    scope: &Scope<'_>,
    source: &str,
) -> Result<Value, ExprError> {
    let (function, receiver) = match callee {
        Expr::Member { base, key } => {
            let receiver = eval_expr(base, scope, source)?;
            let function = receiver.get(key);
            (function, receiver)
        }
        Expr::Index { base, index } => {
            let receiver = eval_expr(base, scope, source)?;
            let key = coerce::to_display(&eval_expr(index, scope, source)?);
            let function = receiver.get(&key);
            (function, receiver)
        }
        Expr::Identifier(name) => scope.lookup_function(name),
        other => (eval_expr(other, scope, source)?, Value::Undefined),
    };

    let mut evaluated = Vec::with_capacity(args.len());
    for arg in args {
        evaluated.push(eval_expr(arg, scope, source)?);
    }
    match function {
        Value::Function(f) => Ok(f.call(&receiver, &evaluated)),
        _ => Err(ExprError::NotAFunction {
            target: callee.describe(),
            expression: source.to_string(),
        }),
    }
}
