//! The render-time context object: top-level variables, named exports, and
//! the macro/import registry a render populates as it runs (`spec.md` §5:
//! "the `context` object (variables+blocks+exports) is shared mutably only
//! at top level; nested set does not propagate unless declared at top
//! level").

use cascada_ir::Value;
use indexmap::IndexMap;
use std::cell::RefCell;

#[derive(Debug, Default)]
pub struct Context {
    variables: RefCell<IndexMap<String, Value>>,
    exports: RefCell<IndexMap<String, Value>>,
}

impl Context {
    pub fn new(initial: IndexMap<String, Value>) -> Self {
        Context {
            variables: RefCell::new(initial),
            exports: RefCell::new(IndexMap::new()),
        }
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.variables.borrow().get(name).cloned()
    }

    /// Top-level `set` writes into context and, unless the name starts
    /// with `_`, is also recorded as an export (`spec.md` §4.5).
    pub fn set(&self, name: &str, value: Value) {
        self.variables.borrow_mut().insert(name.to_string(), value.clone());
        if !name.starts_with('_') {
            self.exports.borrow_mut().insert(name.to_string(), value);
        }
    }

    pub fn exports(&self) -> IndexMap<String, Value> {
        self.exports.borrow().clone()
    }

    pub fn variables(&self) -> IndexMap<String, Value> {
        self.variables.borrow().clone()
    }
}
