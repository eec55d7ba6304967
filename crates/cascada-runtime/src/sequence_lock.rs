//! Sequence-lock serialization (`spec.md` §3 "Sequence Operation"): calls
//! sharing a `!`-marked canonical key run to completion in invocation
//! order, each one awaiting the previous holder's result (success or
//! failure) before starting its own body.
//!
//! A narrower mechanism than `AsyncFrame`'s `promiseDataById` timeline: one
//! `PromiseHandle`/`PromiseResolver` pair per key on [`Env::locks`], rather
//! than per-block write-counted slots, since a lock's only job is "the next
//! contender waits for the previous one", not partial-write visibility.

use crate::env::Env;
use cascada_ir::{promise, resolve, RenderError, Value};
use std::future::Future;
use tracing::trace;

pub async fn sequenced_call<F>(env: &Env, key: &str, inner: F) -> Result<Value, RenderError>
where
    F: Future<Output = Result<Value, RenderError>>,
{
    let prev = env.locks.borrow().get(key).cloned();
    if let Some(prev) = prev {
        trace!(key, "waiting on previous holder of sequence lock");
        let _ = resolve(prev).await;
    }
    let (handle, resolver) = promise();
    env.locks
        .borrow_mut()
        .insert(key.to_string(), Value::Future(handle));
    let result = inner.await;
    let settled = match &result {
        Ok(v) => v.clone(),
        Err(e) => Value::Error(e.clone()),
    };
    resolver.resolve(settled);
    result
}
