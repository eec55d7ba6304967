//! Concrete `Object` implementations for the two compound literal forms
//! `spec.md` §6 lists ("arrays, dicts (string keys only)"). `cascada-ir`
//! intentionally has no `Value::Array`/`Value::Dict` variant — compound
//! data is just another `Scalar::Object`, the same capability external
//! context data uses, so the interpreter and user-supplied objects are
//! indistinguishable to the rest of the pipeline.

use cascada_ir::{Object, Value};
use indexmap::IndexMap;
use std::fmt;
use std::rc::Rc;

#[derive(Clone)]
pub struct RtArray(Rc<Vec<Value>>);

impl RtArray {
    pub fn new(items: Vec<Value>) -> Self {
        RtArray(Rc::new(items))
    }

    pub fn items(&self) -> &[Value] {
        &self.0
    }
}

impl fmt::Debug for RtArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl Object for RtArray {
    fn get(&self, key: &str) -> Option<Value> {
        key.parse::<usize>().ok().and_then(|i| self.0.get(i)).cloned()
    }

    fn get_index(&self, key: &Value) -> Option<Value> {
        match key {
            Value::Scalar(cascada_ir::Scalar::Num(n)) if *n >= 0.0 => {
                self.0.get(*n as usize).cloned()
            }
            Value::Str(s) | Value::Safe(s) => self.get(s),
            _ => None,
        }
    }

    fn iter(&self) -> Option<Box<dyn Iterator<Item = Value> + '_>> {
        Some(Box::new(self.0.iter().cloned()))
    }

    fn len(&self) -> Option<usize> {
        Some(self.0.len())
    }
}

#[derive(Clone, Debug)]
pub struct RtDict(Rc<IndexMap<String, Value>>);

impl RtDict {
    pub fn new(entries: Vec<(String, Value)>) -> Self {
        RtDict(Rc::new(entries.into_iter().collect()))
    }

    pub fn entries(&self) -> &IndexMap<String, Value> {
        &self.0
    }
}

impl Object for RtDict {
    fn get(&self, key: &str) -> Option<Value> {
        self.0.get(key).cloned()
    }

    fn iter(&self) -> Option<Box<dyn Iterator<Item = Value> + '_>> {
        Some(Box::new(self.0.values().cloned()))
    }

    fn pairs(&self) -> Option<Box<dyn Iterator<Item = (String, Value)> + '_>> {
        Some(Box::new(self.0.iter().map(|(k, v)| (k.clone(), v.clone()))))
    }

    fn len(&self) -> Option<usize> {
        Some(self.0.len())
    }
}

/// `isArray` (ABI symbol list, `spec.md` §6): true for anything whose
/// `Object::iter` is array-style (`get_index` numeric) rather than
/// map-style. Approximated by checking it is specifically an `RtArray` —
/// user `Object`s that expose only `iter`/`len` without string keys are
/// treated as sequences too, via [`is_sequence`].
pub fn is_array(v: &Value) -> bool {
    matches!(v, Value::Scalar(cascada_ir::Scalar::Object(o)) if o.pairs().is_none() && o.iter().is_some())
}

/// `keys` (ABI symbol list): the string keys of a map-like object, in
/// insertion order; empty for sequences.
pub fn keys(v: &Value) -> Vec<String> {
    match v {
        Value::Scalar(cascada_ir::Scalar::Object(o)) => o
            .pairs()
            .map(|p| p.map(|(k, _)| k).collect())
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}
