//! The trellis binding engine.
//!
//! Three layers, re-exported here as one surface:
//!
//! - [`value`]: the runtime value model — JS-like loose values,
//!   coercions and the observable array.
//! - [`expression`]: the binding-expression engine — tokenizer,
//!   compiler, cache and evaluator with JavaScript operator semantics.
//! - [`observe`]: dotted-path observation over a mutable value graph,
//!   with array mutation observation.
//!
//! A binder typically compiles a template's expression once through an
//! [`ExpressionCache`], observes each path in
//! [`CompiledExpression::identifiers`] on a [`ContextManager`], and
//! re-evaluates when a path fires:
//!
//! ```
//! use trellis::{from_json, parse, ContextManager, Value};
//! use serde_json::json;
//!
//! let manager = ContextManager::new(from_json(&json!({"price": 2, "quantity": 3})));
//! let total = parse("price * quantity").unwrap();
//!
//! assert_eq!(total.evaluate(&manager.root()).unwrap(), Value::Number(6.0));
//! manager.set("price", Value::Number(5.0));
//! assert_eq!(total.evaluate(&manager.root()).unwrap(), Value::Number(15.0));
//! ```

pub use trellis_expression as expression;
pub use trellis_observe as observe;
pub use trellis_value as value;

pub use trellis_expression::{
    parse, tokenize, CompiledExpression, ExprError, ExpressionCache, Scope,
};
pub use trellis_observe::{resolve_path, ContextManager, Subscription};
pub use trellis_value::{
    deep_clone, deep_equal, from_json, to_json, ArrayChange, ArrayMethod, NativeFunction,
    ObservableArray, Value,
};
