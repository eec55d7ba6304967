//! Frame (C2): a lexical scope with variable storage, a parent chain, and a
//! write-isolation flag (`spec.md` §4.2).
//!
//! Modeled as a capability (`Scope`) rather than a base class `AsyncFrame`
//! inherits from, per `spec.md` §9's explicit instruction to replace the
//! source's class hierarchy with a trait: `Frame` and
//! [`crate::async_frame::AsyncFrame`] are two independent implementors, not
//! a base/derived pair.

use cascada_ir::{Object, Scalar, Value};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// The capability every scope type exposes to the interpreter: plain local
/// storage plus enough structure (`parent`, `isolate_writes`) for the free
/// functions [`lookup`]/[`set`] to walk the chain generically regardless of
/// which concrete frame type is active at a given point in the tree.
pub trait Scope: fmt::Debug {
    fn has_local(&self, head: &str) -> bool;
    fn get_local(&self, head: &str) -> Option<Value>;
    fn write_local(&self, head: &str, rest: &str, value: Value);
    fn parent(&self) -> Option<Rc<dyn Scope>>;
    fn isolate_writes(&self) -> bool;
}

/// A frame-local namespace object created the first time a dotted name is
/// `set` without an existing binding at its head (`spec.md` §4.2: "dotted
/// name auto-creates nested records"). Readable like any other `Object`;
/// mutable only through the owning [`Frame`]/[`crate::async_frame::AsyncFrame`].
///
/// Supports exactly one level of structural nesting: `ns.attr = v` mutates
/// (or creates) the `Record` bound to `ns`, accumulating sibling attributes
/// across repeated `set` calls. A dotted suffix with more than one segment
/// (`ns.a.b = v`) is stored under the literal key `"a.b"` rather than
/// building a second nested `Record` — the common real-world pattern this
/// mirrors (Jinja-family `namespace()` objects) is never more than one
/// level deep, and [`resolve_path`] reads the literal-suffix key first so
/// writes and reads stay consistent with each other.
#[derive(Debug, Default)]
pub struct Record(Rc<RefCell<IndexMap<String, Value>>>);

impl Record {
    pub fn new() -> Self {
        Record(Rc::new(RefCell::new(IndexMap::new())))
    }

    pub fn set(&self, key: &str, value: Value) {
        self.0.borrow_mut().insert(key.to_string(), value);
    }
}

impl Clone for Record {
    fn clone(&self) -> Self {
        Record(self.0.clone())
    }
}

impl Object for Record {
    fn get(&self, key: &str) -> Option<Value> {
        self.0.borrow().get(key).cloned()
    }

    fn pairs(&self) -> Option<Box<dyn Iterator<Item = (String, Value)> + '_>> {
        let owned: Vec<(String, Value)> = self
            .0
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Some(Box::new(owned.into_iter()))
    }

    fn len(&self) -> Option<usize> {
        Some(self.0.borrow().len())
    }
}

#[derive(Debug)]
pub struct Frame {
    variables: RefCell<IndexMap<String, Value>>,
    namespaces: RefCell<IndexMap<String, Record>>,
    parent: Option<Rc<dyn Scope>>,
    #[allow(dead_code)]
    top_level: bool,
    isolate_writes: bool,
}

impl Frame {
    pub fn root() -> Rc<Frame> {
        Rc::new(Frame {
            variables: RefCell::new(IndexMap::new()),
            namespaces: RefCell::new(IndexMap::new()),
            parent: None,
            top_level: true,
            isolate_writes: false,
        })
    }

    /// `spec.md` §4.3 `push(isolateWrites, createScope)`: a plain child
    /// frame that hosts its own variables. `createScope=false` frames
    /// (carrying only async metadata, no bindings of their own) are modeled
    /// by callers simply not writing into the child — there is no
    /// behavioral difference at the `Scope` level.
    pub fn push(parent: Rc<dyn Scope>, isolate_writes: bool) -> Rc<Frame> {
        Rc::new(Frame {
            variables: RefCell::new(IndexMap::new()),
            namespaces: RefCell::new(IndexMap::new()),
            parent: Some(parent),
            top_level: false,
            isolate_writes,
        })
    }
}

impl Scope for Frame {
    fn has_local(&self, head: &str) -> bool {
        self.namespaces.borrow().contains_key(head) || self.variables.borrow().contains_key(head)
    }

    fn get_local(&self, head: &str) -> Option<Value> {
        if let Some(record) = self.namespaces.borrow().get(head) {
            return Some(Value::Scalar(Scalar::Object(Rc::new(record.clone()))));
        }
        self.variables.borrow().get(head).cloned()
    }

    fn write_local(&self, head: &str, rest: &str, value: Value) {
        if rest.is_empty() {
            self.namespaces.borrow_mut().shift_remove(head);
            self.variables.borrow_mut().insert(head.to_string(), value);
            return;
        }
        let mut namespaces = self.namespaces.borrow_mut();
        let record = namespaces.entry(head.to_string()).or_insert_with(Record::new);
        record.set(rest, value);
    }

    fn parent(&self) -> Option<Rc<dyn Scope>> {
        self.parent.clone()
    }

    fn isolate_writes(&self) -> bool {
        self.isolate_writes
    }
}

pub(crate) fn split_first_segment(name: &str) -> (&str, &str) {
    match name.split_once('.') {
        Some((head, rest)) => (head, rest),
        None => (name, ""),
    }
}

/// Reads `name` (possibly dotted) by walking the parent chain for its head
/// segment, then resolving any remaining path against the bound value
/// (`spec.md` §4.2: "Lookup walks the parent chain until a bound name is
/// found; `null` otherwise" — modeled as `None` here, turned into
/// `Value::UNDEFINED` by the caller, matching the `undefined`/`null` split
/// `cascada-ir::Scalar` draws).
pub fn lookup(scope: &Rc<dyn Scope>, name: &str) -> Option<Value> {
    let (head, rest) = split_first_segment(name);
    let base = scope
        .get_local(head)
        .or_else(|| scope.parent().and_then(|p| lookup(&p, head)))?;
    resolve_path(base, rest)
}

pub(crate) fn resolve_path(base: Value, rest: &str) -> Option<Value> {
    if rest.is_empty() {
        return Some(base);
    }
    if let Value::Scalar(Scalar::Object(o)) = &base {
        if let Some(v) = o.get(rest) {
            return Some(v);
        }
    }
    let mut cur = base;
    for seg in rest.split('.') {
        cur = match &cur {
            Value::Scalar(Scalar::Object(o)) => o.get(seg)?,
            _ => return None,
        };
    }
    Some(cur)
}

/// Writes `name` (possibly dotted), honoring `resolveUp` (`spec.md` §4.2):
/// first resolve the root segment by walking ancestors (stopping at any
/// frame with `isolate_writes`), delegating the write there if found;
/// otherwise write locally with nested-record auto-creation.
pub fn set(scope: &Rc<dyn Scope>, name: &str, value: Value, resolve_up: bool) {
    let (head, rest) = split_first_segment(name);
    if resolve_up {
        if let Some(owner) = find_owner(scope, head) {
            owner.write_local(head, rest, value);
            return;
        }
    }
    scope.write_local(head, rest, value);
}

fn find_owner(scope: &Rc<dyn Scope>, head: &str) -> Option<Rc<dyn Scope>> {
    if scope.has_local(head) {
        return Some(scope.clone());
    }
    if scope.isolate_writes() {
        return None;
    }
    scope.parent().and_then(|p| find_owner(&p, head))
}
