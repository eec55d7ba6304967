//! The multi-reader promise cell backing `Value::Future`.
//!
//! `spec.md` §3 describes `promiseDataById` entries as `{ value, resolve }`
//! pairs that more than one downstream reader can await concurrently (a
//! block's output and a sibling block's `readVars` snapshot may both depend
//! on the same producer). That rules out a plain oneshot channel (single
//! consumer); this is a small broadcast-style cell instead, the async
//! equivalent of `cranelift_entity`'s pattern of a cheap `Copy` handle
//! pointing at shared backing storage — here the storage is `Rc`-shared
//! instead of arena-indexed, since cells are created and dropped for the
//! lifetime of one render rather than living in a long-lived arena.

use crate::Value;
use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

enum State {
    Pending(Vec<Waker>),
    Ready(Value),
}

struct Cell {
    state: RefCell<State>,
}

/// A cloneable, awaitable handle to a value that some other task will
/// eventually produce exactly once (`spec.md` §3 invariant 1: "exactly one
/// `resolve` call occurs ... or the render terminates with an error").
/// Every clone observes the same resolution.
#[derive(Clone)]
pub struct PromiseHandle(Rc<Cell>);

/// The producer side. Consumed by [`PromiseResolver::resolve`]; dropping it
/// without resolving leaves every waiting reader pending forever, matching
/// the spec's treatment of a missed resolve as a render-level bug rather
/// than a recoverable error.
pub struct PromiseResolver(Rc<Cell>);

/// Creates a connected `(handle, resolver)` pair, the async analogue of a
/// reserved [`crate::SlotId`]: the slot is claimed synchronously, filled in
/// later.
pub fn promise() -> (PromiseHandle, PromiseResolver) {
    let cell = Rc::new(Cell {
        state: RefCell::new(State::Pending(Vec::new())),
    });
    (PromiseHandle(cell.clone()), PromiseResolver(cell))
}

impl PromiseResolver {
    /// Resolves every pending and future awaiter to `value`. A second call
    /// on an already-resolved cell (a `writeCounters` bookkeeping bug) is
    /// ignored rather than panicking, since the render already has a
    /// well-defined first value and silently overwriting it would be worse.
    pub fn resolve(self, value: Value) {
        let wakers = {
            let mut state = self.0.state.borrow_mut();
            match std::mem::replace(&mut *state, State::Ready(value)) {
                State::Pending(wakers) => wakers,
                ready @ State::Ready(_) => {
                    *state = ready;
                    return;
                }
            }
        };
        for waker in wakers {
            waker.wake();
        }
    }
}

impl Future for PromiseHandle {
    type Output = Value;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Value> {
        let mut state = self.0.state.borrow_mut();
        match &mut *state {
            State::Ready(value) => Poll::Ready(value.clone()),
            State::Pending(wakers) => {
                wakers.push(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}
