//! Filter/test lookup (`spec.md` §1: "the large library of built-in
//! filters and tests" is out of scope — only the calling convention is
//! ours to define). Filters and tests are synchronous callables; the
//! asynchrony `spec.md` describes lives entirely in argument gathering
//! (`resolveAll`) before the call, matching `spec.md`'s framing of them as
//! "black-box callables" rather than part of the async execution model.

use crate::error::RuntimeError;
use cascada_ir::Value;
use std::rc::Rc;

pub type FilterFn = Rc<dyn Fn(&[Value]) -> Result<Value, RuntimeError>>;
pub type TestFn = Rc<dyn Fn(&[Value]) -> Result<bool, RuntimeError>>;

/// The set of named filters/tests a render has access to. The default
/// registry (`upper`, `lower`, ...) lives in the `cascada` facade crate,
/// which is free to extend or replace it; the runtime only needs the
/// lookup capability.
pub trait Registry {
    fn filter(&self, name: &str) -> Option<FilterFn>;
    fn test(&self, name: &str) -> Option<TestFn>;
}

/// A plain name-keyed registry, suitable for the facade's default filter
/// set and for tests in this crate that need a minimal stand-in.
#[derive(Default, Clone)]
pub struct MapRegistry {
    filters: std::collections::HashMap<String, FilterFn>,
    tests: std::collections::HashMap<String, TestFn>,
}

impl MapRegistry {
    pub fn new() -> Self {
        MapRegistry::default()
    }

    pub fn with_filter(mut self, name: impl Into<String>, f: FilterFn) -> Self {
        self.filters.insert(name.into(), f);
        self
    }

    pub fn with_test(mut self, name: impl Into<String>, f: TestFn) -> Self {
        self.tests.insert(name.into(), f);
        self
    }
}

impl Registry for MapRegistry {
    fn filter(&self, name: &str) -> Option<FilterFn> {
        self.filters.get(name).cloned()
    }

    fn test(&self, name: &str) -> Option<TestFn> {
        self.tests.get(name).cloned()
    }
}
