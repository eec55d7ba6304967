//! Minimal concurrent-gather combinators.
//!
//! `resolveDuo`/`resolveAll` (`spec.md` §4.1) need to poll several
//! independent futures without picking a winner (unlike `select`), so that
//! a slow argument doesn't block a faster sibling from finishing its own
//! work while both are pending. Hand-rolled rather than pulled from
//! `futures-lite`: the combinator only needs to live here, poll-driven by
//! whatever executor `cascada-runtime` installs, with no allocation beyond
//! the output vector itself.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Polls two futures to completion, each independently, returning both
/// outputs once both are ready. Futures are boxed internally so callers
/// don't need to reason about `Unpin` for arbitrary `async fn` bodies.
pub struct Join2<A: Future, B: Future> {
    a: Option<Pin<Box<A>>>,
    b: Option<Pin<Box<B>>>,
    a_out: Option<A::Output>,
    b_out: Option<B::Output>,
}

impl<A: Future, B: Future> Unpin for Join2<A, B> {}

pub fn join2<A: Future, B: Future>(a: A, b: B) -> Join2<A, B> {
    Join2 {
        a: Some(Box::pin(a)),
        b: Some(Box::pin(b)),
        a_out: None,
        b_out: None,
    }
}

impl<A: Future, B: Future> Future for Join2<A, B> {
    type Output = (A::Output, B::Output);

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if let Some(fut) = this.a.as_mut() {
            if let Poll::Ready(out) = fut.as_mut().poll(cx) {
                this.a_out = Some(out);
                this.a = None;
            }
        }
        if let Some(fut) = this.b.as_mut() {
            if let Poll::Ready(out) = fut.as_mut().poll(cx) {
                this.b_out = Some(out);
                this.b = None;
            }
        }
        if this.a.is_none() && this.b.is_none() {
            Poll::Ready((this.a_out.take().unwrap(), this.b_out.take().unwrap()))
        } else {
            Poll::Pending
        }
    }
}

/// Polls an arbitrary number of futures to completion, preserving input
/// order in the output `Vec`. Used for `resolveAll`/argument-list/array
/// gather, where the arity is only known at emission time.
pub struct JoinAll<F: Future> {
    slots: Vec<Option<Pin<Box<F>>>>,
    out: Vec<Option<F::Output>>,
}

impl<F: Future> Unpin for JoinAll<F> {}

pub fn join_all<F: Future>(futures: Vec<F>) -> JoinAll<F> {
    let len = futures.len();
    JoinAll {
        slots: futures.into_iter().map(|f| Some(Box::pin(f))).collect(),
        out: (0..len).map(|_| None).collect(),
    }
}

impl<F: Future> Future for JoinAll<F> {
    type Output = Vec<F::Output>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let mut all_ready = true;
        for (slot, out) in this.slots.iter_mut().zip(this.out.iter_mut()) {
            if let Some(fut) = slot.as_mut() {
                match fut.as_mut().poll(cx) {
                    Poll::Ready(value) => {
                        *out = Some(value);
                        *slot = None;
                    }
                    Poll::Pending => all_ready = false,
                }
            }
        }
        if all_ready {
            Poll::Ready(this.out.iter_mut().map(|o| o.take().unwrap()).collect())
        } else {
            Poll::Pending
        }
    }
}
