//! Memoized parsing keyed by source text.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::compile::{parse, CompiledExpression};
use crate::error::ExprError;

/// Caches compiled expressions by their exact source text.
///
/// Repeated parses of the same text return the same `Rc` handle, so the
/// work of tokenizing and compiling is paid once per distinct binding
/// string. Because a one-time or dependency-free expression folds its
/// captured value into the shared handle, every consumer of that text
/// sees the specialization. Failed parses are not cached.
///
/// ```
/// use std::rc::Rc;
/// use trellis_expression::ExpressionCache;
///
/// let cache = ExpressionCache::new();
/// let first = cache.parse("a + b").unwrap();
/// let second = cache.parse("a + b").unwrap();
/// assert!(Rc::ptr_eq(&first, &second));
/// ```
pub struct ExpressionCache {
    entries: RefCell<HashMap<String, Rc<CompiledExpression>>>,
}

impl ExpressionCache {
    pub fn new() -> ExpressionCache {
        ExpressionCache {
            entries: RefCell::new(HashMap::new()),
        }
    }

    /// Parses `source`, reusing the cached compilation when present.
    pub fn parse(&self, source: &str) -> Result<Rc<CompiledExpression>, ExprError> {
        if let Some(hit) = self.entries.borrow().get(source) {
            return Ok(hit.clone());
        }
        let compiled = Rc::new(parse(source)?);
        self.entries
            .borrow_mut()
            .insert(source.to_string(), compiled.clone());
        Ok(compiled)
    }

    /// Number of distinct expressions cached so far.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Drops every cached expression.
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl Default for ExpressionCache {
    fn default() -> ExpressionCache {
        ExpressionCache::new()
    }
}
