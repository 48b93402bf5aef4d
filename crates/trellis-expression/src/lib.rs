//! Binding-expression engine: tokenizer, compiler, cache and evaluator.
//!
//! Expressions follow JavaScript operator semantics over the
//! `trellis-value` model: loose typing, value-returning `&&` / `||`,
//! string-aware `+`, ternaries, member, index and call access, array
//! and object literals, and `@alias` references. Scanning is a single
//! shunting-yard pass that produces a postfix token queue; compiling
//! folds the queue into a small tree and records which dotted context
//! paths the expression reads, so an observer can re-evaluate exactly
//! when those paths change.
//!
//! ```
//! use trellis_expression::parse;
//! use trellis_value::from_json;
//! use serde_json::json;
//!
//! let expr = parse("price * quantity").unwrap();
//! let data = from_json(&json!({"price": 2.5, "quantity": 4}));
//! assert_eq!(expr.evaluate(&data).unwrap(), 10.0.into());
//! assert!(expr.identifiers().contains("price"));
//! assert!(expr.identifiers().contains("quantity"));
//! ```

mod ast;
mod cache;
mod compile;
mod error;
mod eval;
pub mod operators;
mod token;
mod tokenizer;

pub use ast::Expr;
pub use cache::ExpressionCache;
pub use compile::{parse, CompiledExpression};
pub use error::ExprError;
pub use eval::Scope;
pub use token::{Token, TokenValue, ARG_COMPUTED, ARG_FUNCTION_NAME, ARG_IDENTIFIER, ARG_NONE};
pub use tokenizer::tokenize;
