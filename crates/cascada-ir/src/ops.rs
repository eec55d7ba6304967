//! The C1 value operations (`spec.md` §4.1): the handful of primitives the
//! emitted program calls at every "use site" rather than eagerly, so that
//! awaits happen exactly where the emitter contracts in §4.5 say they do.

use crate::escape::html_escape;
use crate::join::{join2, join_all};
use crate::{RenderError, Scalar, Value};

/// Awaits `v` until it is no longer a `Future`, then unwraps a sticky
/// `Error` into `Err`. Everything else passes through unchanged.
///
/// Loops rather than recursing once: invariant (a) says a `Future` never
/// directly *contains* another `Future`, but nothing stops a promise from
/// resolving to a value that is itself still a `Future` one level removed
/// (a call whose result is itself deferred); looping keeps `resolve` total
/// without leaning on that invariant holding at every call site.
pub async fn resolve(mut v: Value) -> Result<Value, RenderError> {
    while let Value::Future(handle) = v {
        v = handle.await;
    }
    match v {
        Value::Error(e) => Err(e),
        other => Ok(other),
    }
}

/// Resolves two values concurrently; the first failure wins.
pub async fn resolve_duo(a: Value, b: Value) -> Result<(Value, Value), RenderError> {
    let (a, b) = join2(resolve(a), resolve(b)).await;
    Ok((a?, b?))
}

/// Resolves a dynamically-sized list of values concurrently, preserving
/// order; the first failure (by list position, not completion order) wins.
pub async fn resolve_all(values: Vec<Value>) -> Result<Vec<Value>, RenderError> {
    let resolved = join_all(values.into_iter().map(resolve).collect()).await;
    resolved.into_iter().collect()
}

/// Resolves every value in a dict literal's property list concurrently,
/// keeping keys attached. Used by the `Dict` emitter contract, which
/// evaluates all entries before constructing the object.
pub async fn resolve_object_properties(
    entries: Vec<(String, Value)>,
) -> Result<Vec<(String, Value)>, RenderError> {
    let (keys, vals): (Vec<String>, Vec<Value>) = entries.into_iter().unzip();
    let vals = resolve_all(vals).await?;
    Ok(keys.into_iter().zip(vals).collect())
}

/// Converts an already-resolved value into the form that belongs in the
/// output buffer: nullish becomes empty string, and plain `Str` is
/// HTML-escaped unless autoescape is off or the value is already `Safe`
/// (invariant (b): a `Safe` value is never re-escaped). `Error` passes
/// through unsuppressed — it is sticky until a boundary unwraps it.
pub fn suppress_value(v: Value, autoescape: bool) -> Value {
    match v {
        Value::Scalar(s) if s.is_nullish() => Value::safe(""),
        Value::Str(s) if autoescape => Value::safe(html_escape(&s)),
        Value::Str(s) => Value::Safe(s),
        other => other,
    }
}

/// Fails with an error carrying `lineno`/`colno` if `v` is `null` or
/// `undefined`; otherwise passes `v` through.
pub fn ensure_defined(
    v: Value,
    pos: cascada_ast::Position,
) -> Result<Value, RenderError> {
    if v.is_nullish() {
        Err(RenderError::new("attempted to output null or undefined value").at(pos))
    } else {
        Ok(v)
    }
}

/// Left-to-right reduction of a (possibly nested) `BufferFragment` into a
/// single string. `SafeMarker` entries post-process the accumulator built
/// so far rather than contributing text themselves (`spec.md` §4.6).
/// Assumes every slot has already been resolved to a non-`Future` value —
/// the emitter always awaits `waitAllClosures` before calling this.
pub fn flatten_buffer(v: &Value) -> Result<String, RenderError> {
    let mut out = String::new();
    flatten_into(v, &mut out)?;
    Ok(out)
}

fn flatten_into(v: &Value, out: &mut String) -> Result<(), RenderError> {
    match v {
        Value::Str(s) | Value::Safe(s) => out.push_str(s),
        Value::Scalar(Scalar::Null) | Value::Scalar(Scalar::Undefined) => {}
        Value::Scalar(s) => out.push_str(&Value::Scalar(s.clone()).coerce_str()),
        Value::BufferFragment(items) => {
            for item in items.iter() {
                flatten_into(item, out)?;
            }
        }
        Value::SafeMarker(marker) => {
            let rewritten = (marker.as_ref())(std::mem::take(out));
            out.push_str(&rewritten);
        }
        Value::Error(e) => return Err(e.clone()),
        Value::Future(_) => {
            return Err(RenderError::new(
                "internal: flattenBuffer reached an unresolved Future",
            ))
        }
    }
    Ok(())
}
