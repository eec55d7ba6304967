use crate::{RenderError, Value};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

/// A synchronous, non-string leaf value: "number, boolean, null, or
/// arbitrary opaque object" (`spec.md` §3).
#[derive(Clone)]
pub enum Scalar {
    Num(f64),
    Bool(bool),
    Null,
    /// Distinct from `Null` so `ensureDefined` and the `default` filter can
    /// tell "explicitly set to null" apart from "never bound", matching the
    /// source template languages' `undefined` vs `null` split that
    /// `spec.md` §4.1 carries through unchanged (`ensureDefined(v, ...)`
    /// treats `v ∈ {null, undefined}` as one failure class).
    Undefined,
    Object(Rc<dyn Object>),
}

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Num(n) => write!(f, "Num({n})"),
            Scalar::Bool(b) => write!(f, "Bool({b})"),
            Scalar::Null => write!(f, "Null"),
            Scalar::Undefined => write!(f, "Undefined"),
            Scalar::Object(o) => write!(f, "Object({o:?})"),
        }
    }
}

impl Scalar {
    pub fn is_nullish(&self) -> bool {
        matches!(self, Scalar::Null | Scalar::Undefined)
    }

    /// Template truthiness: `0`, `""`-equivalent scalars, `false`, `null`
    /// and `undefined` are falsy; everything else (including any `Object`)
    /// is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Scalar::Num(n) => *n != 0.0 && !n.is_nan(),
            Scalar::Bool(b) => *b,
            Scalar::Null | Scalar::Undefined => false,
            Scalar::Object(_) => true,
        }
    }
}

/// The capability surface of an opaque context object: member access, index
/// access, and (optionally) iteration. Mirrors the duck-typed `Object`
/// pattern `minijinja` exposes for dynamic values — user data need only
/// implement the operations a given template actually exercises, with
/// every method defaulting to "unsupported".
pub trait Object: fmt::Debug {
    /// `a.member` / `a["member"]` with a statically-known string key.
    fn get(&self, _key: &str) -> Option<Value> {
        None
    }

    /// `a[expr]` with a dynamically-computed key.
    fn get_index(&self, key: &Value) -> Option<Value> {
        match key {
            Value::Str(s) | Value::Safe(s) => self.get(s),
            Value::Scalar(Scalar::Num(n)) => self.get(&n.to_string()),
            _ => None,
        }
    }

    /// Sequence iteration for `for v in obj`. `None` if this object is not
    /// array-like.
    fn iter(&self) -> Option<Box<dyn Iterator<Item = Value> + '_>> {
        None
    }

    /// Keyed iteration for `for k, v in obj`. `None` if this object is not
    /// map-like.
    fn pairs(&self) -> Option<Box<dyn Iterator<Item = (String, Value)> + '_>> {
        None
    }

    /// `length` / `len` filter support, and truthiness of empty containers.
    fn len(&self) -> Option<usize> {
        None
    }

    /// Invocation for objects that stand in for a callable (`FunCall` on a
    /// macro value, `spec.md` §4.5 `makeMacro`). `None` means "not
    /// callable" — the vast majority of `Object` implementors. Boxed rather
    /// than an associated type so `Object` stays dyn-safe; `'static` since
    /// the only implementor that needs this (a bound macro) owns everything
    /// the call needs (its body, closure scope, and render environment) by
    /// `Rc`, not by borrowing `self`.
    fn call(
        &self,
        _positional: Vec<Value>,
        _keyword: Vec<(String, Value)>,
    ) -> Option<Pin<Box<dyn Future<Output = Result<Value, RenderError>>>>> {
        None
    }
}
