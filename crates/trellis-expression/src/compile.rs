//! Folds the postfix token queue into an expression tree, collecting the
//! observable paths along the way.
//!
//! Fragments on the build stack carry an optional dotted path. Static
//! member access and literal subscripts extend the path (`a['b'].c` is
//! the path `a.b.c`); a computed subscript commits the base and the
//! index as separate paths and breaks the chain; calls are transparent,
//! so `user.load().name` still reads as `user.load.name`. A fragment's
//! path is committed when the fragment is consumed as an operand, an
//! argument, an element or a pair value. Object literal keys never
//! commit.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexSet;
use trellis_value::{coerce, Value};

use crate::ast::Expr;
use crate::error::ExprError;
use crate::operators::{self, OperatorEval};
use crate::token::{Token, TokenValue, ARG_COMPUTED, ARG_NONE};
use crate::tokenizer::tokenize;

/// A compiled, reusable binding expression.
///
/// Holds the source text, the collected identifier and alias sets, and
/// the expression tree. After a one-time or dependency-free expression
/// evaluates successfully, the tree is replaced by the captured value
/// and later evaluations return it unchanged.
#[derive(Debug)]
pub struct CompiledExpression {
    source: String,
    one_time: bool,
    identifiers: IndexSet<String>,
    aliases: IndexSet<String>,
    pub(crate) state: RefCell<ExprState>,
}

#[derive(Debug)]
pub(crate) enum ExprState {
    Dynamic(Rc<Expr>),
    Constant(Value),
}

impl CompiledExpression {
    /// The text this expression was compiled from, leading `=` included.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// True for `=`-prefixed expressions that capture their first value.
    pub fn is_one_time(&self) -> bool {
        self.one_time
    }

    /// The dotted paths the expression reads from the context, in the
    /// order they complete. One-time expressions report none.
    pub fn identifiers(&self) -> &IndexSet<String> {
        &self.identifiers
    }

    /// Alias names the expression references, without their `@` sigil.
    pub fn aliases(&self) -> &IndexSet<String> {
        &self.aliases
    }

    /// True once the expression has specialized to a captured constant.
    pub fn is_constant(&self) -> bool {
        matches!(&*self.state.borrow(), ExprState::Constant(_))
    }
}

/// Compiles `source` into a reusable expression.
///
/// A leading `=` marks the expression one-time: it reports no
/// observable identifiers and keeps the first value it evaluates to.
/// Empty input compiles to a constant `undefined`.
pub fn parse(source: &str) -> Result<CompiledExpression, ExprError> {
    let trimmed = source.trim();
    let (one_time, body) = match trimmed.strip_prefix('=') {
        Some(rest) if !rest.starts_with('=') => (true, rest),
        _ => (false, trimmed),
    };
    let tokens = tokenize(body)?;
    let mut collector = Collector::default();
    let root = build_tree(&tokens, body, &mut collector)?;
    let identifiers = if one_time {
        IndexSet::new()
    } else {
        collector.identifiers
    };
    Ok(CompiledExpression {
        source: source.to_string(),
        one_time,
        identifiers,
        aliases: collector.aliases,
        state: RefCell::new(ExprState::Dynamic(Rc::new(root))),
    })
}

/// A partial expression on the build stack, with the dotted path it
/// still extends, when it extends one.
struct Frag {
    expr: Expr,
    path: Option<String>,
}

impl Frag {
    fn plain(expr: Expr) -> Frag {
        Frag { expr, path: None }
    }

    fn pathed(expr: Expr, path: String) -> Frag {
        Frag {
            expr,
            path: Some(path),
        }
    }
}

#[derive(Default)]
struct Collector {
    identifiers: IndexSet<String>,
    aliases: IndexSet<String>,
}

impl Collector {
    fn commit(&mut self, frag: &mut Frag) {
        if let Some(path) = frag.path.take() {
            match path.strip_prefix('@') {
                Some(alias) => {
                    // resolver maps are keyed by bare alias name, so a
                    // member chain contributes only its head segment
                    let name = alias.split_once('.').map_or(alias, |(head, _)| head);
                    self.aliases.insert(name.to_string());
                }
                None => {
                    self.identifiers.insert(path);
                }
            }
        }
    }
}

fn build_tree(
    tokens: &[Token],
    source: &str,
    collector: &mut Collector,
) -> Result<Expr, ExprError> {
    let mut frags: Vec<Frag> = Vec::new();

    for token in tokens {
        match &token.value {
            TokenValue::Number(n) => frags.push(Frag::plain(Expr::Literal(Value::Number(*n)))),
            TokenValue::Text(text) => {
                if text == "[]" && token.arg_count < ARG_NONE {
                    frags.push(Frag::plain(Expr::ArrayLit(Vec::new())));
                } else if token.arg_count < ARG_NONE {
                    let expr = match text.strip_prefix('@') {
                        Some(name) => Expr::Alias(name.to_string()),
                        None => Expr::Identifier(text.clone()),
                    };
                    frags.push(Frag::pathed(expr, text.clone()));
                } else {
                    apply_text(text, token.arg_count, &mut frags, source, collector)?;
                }
            }
        }
    }

    let mut result = Expr::Literal(Value::Undefined);
    for mut frag in frags {
        collector.commit(&mut frag);
        // several loose fragments resolve to the last one, so `1.2.3`
        // evaluates to its final decimal
        result = frag.expr;
    }
    Ok(result)
}

fn apply_text(
    text: &str,
    arg_count: i32,
    frags: &mut Vec<Frag>,
    source: &str,
    collector: &mut Collector,
) -> Result<(), ExprError> {
    match text {
        "." if arg_count == ARG_COMPUTED => apply_computed_index(frags, source, collector),
        "." => apply_member(frags, source),
        "()" => apply_call(arg_count, frags, source, collector),
        "[]" => apply_array(arg_count, frags, source, collector),
        "{}" => apply_object(arg_count, frags, source, collector),
        _ => {
            if text.starts_with('\'') || text.starts_with('"') {
                let inner = &text[1..text.len() - 1];
                frags.push(Frag::plain(Expr::Literal(Value::String(inner.to_string()))));
                return Ok(());
            }
            match text {
                "true" => frags.push(Frag::plain(Expr::Literal(Value::Bool(true)))),
                "false" => frags.push(Frag::plain(Expr::Literal(Value::Bool(false)))),
                "null" => frags.push(Frag::plain(Expr::Literal(Value::Null))),
                "undefined" => frags.push(Frag::plain(Expr::Literal(Value::Undefined))),
                _ => {
                    if let Some(def) = operators::lookup(text) {
                        apply_operator(def, frags, source, collector)?;
                    } else {
                        // member key word
                        frags.push(Frag::plain(Expr::Literal(Value::String(text.to_string()))));
                    }
                }
            }
            Ok(())
        }
    }
}

fn pop(frags: &mut Vec<Frag>, operator: &str, source: &str) -> Result<Frag, ExprError> {
    frags.pop().ok_or_else(|| ExprError::MissingOperand {
        operator: operator.to_string(),
        expression: source.to_string(),
    })
}

fn apply_member(frags: &mut Vec<Frag>, source: &str) -> Result<(), ExprError> {
    let key_frag = pop(frags, ".", source)?;
    let base = pop(frags, ".", source)?;
    let Some(key) = literal_key(&key_frag.expr) else {
        return Err(ExprError::MissingOperand {
            operator: ".".to_string(),
            expression: source.to_string(),
        });
    };
    let path = base.path.as_ref().map(|p| format!("{p}.{key}"));
    frags.push(Frag {
        expr: Expr::Member {
            base: Box::new(base.expr),
            key,
        },
        path,
    });
    Ok(())
}

fn apply_computed_index(
    frags: &mut Vec<Frag>,
    source: &str,
    collector: &mut Collector,
) -> Result<(), ExprError> {
    let mut index = pop(frags, "[]", source)?;
    let mut base = pop(frags, "[]", source)?;
    match literal_subscript(&index.expr) {
        Some(key) => {
            // a literal subscript reads like a static member
            let path = base.path.as_ref().map(|p| format!("{p}.{key}"));
            frags.push(Frag {
                expr: Expr::Index {
                    base: Box::new(base.expr),
                    index: Box::new(index.expr),
                },
                path,
            });
        }
        None => {
            collector.commit(&mut base);
            collector.commit(&mut index);
            frags.push(Frag::plain(Expr::Index {
                base: Box::new(base.expr),
                index: Box::new(index.expr),
            }));
        }
    }
    Ok(())
}

fn apply_call(
    arg_count: i32,
    frags: &mut Vec<Frag>,
    source: &str,
    collector: &mut Collector,
) -> Result<(), ExprError> {
    let mut args = Vec::with_capacity(arg_count.max(0) as usize);
    for _ in 0..arg_count.max(0) {
        let mut arg = pop(frags, "()", source)?;
        collector.commit(&mut arg);
        args.push(arg.expr);
    }
    args.reverse();
    let callee = pop(frags, "()", source)?;
    // calls stay transparent to the path, so chains continue through them
    let path = callee.path.clone();
    frags.push(Frag {
        expr: Expr::Call {
            callee: Box::new(callee.expr),
            args,
        },
        path,
    });
    Ok(())
}

fn apply_array(
    arg_count: i32,
    frags: &mut Vec<Frag>,
    source: &str,
    collector: &mut Collector,
) -> Result<(), ExprError> {
    let mut items = Vec::with_capacity(arg_count.max(0) as usize);
    for _ in 0..arg_count.max(0) {
        let mut item = pop(frags, "[]", source)?;
        collector.commit(&mut item);
        items.push(item.expr);
    }
    items.reverse();
    frags.push(Frag::plain(Expr::ArrayLit(items)));
    Ok(())
}

fn apply_object(
    arg_count: i32,
    frags: &mut Vec<Frag>,
    source: &str,
    collector: &mut Collector,
) -> Result<(), ExprError> {
    let mut pairs = Vec::with_capacity(arg_count.max(0) as usize);
    for _ in 0..arg_count.max(0) {
        let mut value = pop(frags, "{}", source)?;
        let key_frag = pop(frags, "{}", source)?;
        let Some(key) = literal_key(&key_frag.expr) else {
            return Err(ExprError::MalformedObject {
                expression: source.to_string(),
            });
        };
        collector.commit(&mut value);
        pairs.push((key, value.expr));
    }
    pairs.reverse();
    frags.push(Frag::plain(Expr::ObjectLit(pairs)));
    Ok(())
}

fn apply_operator(
    def: &'static operators::OperatorDefinition,
    frags: &mut Vec<Frag>,
    source: &str,
    collector: &mut Collector,
) -> Result<(), ExprError> {
    match def.eval {
        OperatorEval::Ternary => {
            let mut otherwise = pop(frags, def.symbol, source)?;
            let mut then = pop(frags, def.symbol, source)?;
            let mut cond = pop(frags, def.symbol, source)?;
            collector.commit(&mut cond);
            collector.commit(&mut then);
            collector.commit(&mut otherwise);
            frags.push(Frag::plain(Expr::Ternary {
                cond: Box::new(cond.expr),
                then: Box::new(then.expr),
                otherwise: Box::new(otherwise.expr),
            }));
        }
        _ if def.arity == 2 => {
            let mut rhs = pop(frags, def.symbol, source)?;
            let mut lhs = pop(frags, def.symbol, source)?;
            collector.commit(&mut lhs);
            collector.commit(&mut rhs);
            frags.push(Frag::plain(Expr::Binary {
                op: def,
                lhs: Box::new(lhs.expr),
                rhs: Box::new(rhs.expr),
            }));
        }
        _ => {
            let mut operand = pop(frags, def.symbol, source)?;
            collector.commit(&mut operand);
            frags.push(Frag::plain(Expr::Unary {
                op: def,
                operand: Box::new(operand.expr),
            }));
        }
    }
    Ok(())
}

/// The key text an object-literal key or member-key fragment denotes.
fn literal_key(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Identifier(name) => Some(name.clone()),
        Expr::Literal(Value::String(s)) => Some(s.clone()),
        Expr::Literal(value) => Some(coerce::to_display(value)),
        _ => None,
    }
}

/// The path segment a literal subscript contributes, if the subscript
/// is a literal at all.
fn literal_subscript(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Literal(Value::String(s)) => Some(s.clone()),
        Expr::Literal(Value::Number(n)) => Some(coerce::format_number(*n)),
        _ => None,
    }
}
