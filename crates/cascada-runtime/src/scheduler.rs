//! The scheduler's closure counter (`spec.md` §4.3, §4.6: "a simple atomic
//! counter ... tracks pending async blocks").
//!
//! There is no task queue here. Every "async block" in this implementation
//! is a plain `async` Rust value nested inside its caller's own future tree
//! (`spec.md` §9: "pick one: native async/await ... every promisified
//! bridge becomes a direct async function") rather than a detached spawned
//! task, so the only thing the scheduler needs to track is *how many such
//! blocks are still outstanding* and *let something wait until that count
//! drops to a target* — `waitAllClosures(n)` below is a genuine combinator
//! future, woken through the same `Waker` chain every nested `.await`
//! already participates in, not a poll loop over a task registry.
//!
//! `spec.md`'s `promiseDataById` table (a published promise per
//! `(blockId, name)` that a reader can await while its producer is still
//! running) is not implemented: every `AsyncFrame` this interpreter builds
//! is fully evaluated, including draining `wait_all_closures` to its own
//! target, before the next sibling/iteration gets its own snapshot (see
//! `crate::async_frame`'s module docs), so no reader in this tree is ever
//! scheduled concurrently with that value's producer. Keeping a promise
//! table with no reader that could ever observe a pending entry would be
//! dead weight; dropped here rather than carried as an unused option,
//! recorded as an Open Question Decision in `DESIGN.md`.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

/// Shared scheduler state for one render. `Rc`-held by every frame and by
/// the interpreter's recursion so a single instance backs the whole tree.
#[derive(Default)]
pub struct Scheduler {
    closure_count: Cell<u32>,
    /// Wakers registered by a pending `WaitAllClosures`. Woken in a batch
    /// whenever the counter moves, the standard "wake, let the poller
    /// re-check its own condition" pattern — cheaper than threading a
    /// per-target waker list through every `leave_async_block` call.
    waiters: RefCell<Vec<Waker>>,
}

impl Scheduler {
    pub fn new() -> Rc<Scheduler> {
        Rc::new(Scheduler::default())
    }

    pub fn enter_async_block(&self) {
        self.closure_count.set(self.closure_count.get() + 1);
    }

    pub fn leave_async_block(&self) {
        debug_assert!(self.closure_count.get() > 0);
        self.closure_count.set(self.closure_count.get().saturating_sub(1));
        for waker in self.waiters.borrow_mut().drain(..) {
            waker.wake();
        }
    }

    pub fn closure_count(&self) -> u32 {
        self.closure_count.get()
    }
}

/// `waitAllClosures(n)` (`spec.md` §4.3): resolves once the scheduler's
/// closure counter is at most `n`. The root render awaits `n=0`; a
/// sequential loop body awaits `n=1` at the end of each iteration so at
/// most one iteration's async work is outstanding at a time.
pub struct WaitAllClosures {
    scheduler: Rc<Scheduler>,
    target: u32,
}

pub fn wait_all_closures(scheduler: Rc<Scheduler>, target: u32) -> WaitAllClosures {
    WaitAllClosures { scheduler, target }
}

impl Future for WaitAllClosures {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.scheduler.closure_count() <= self.target {
            Poll::Ready(())
        } else {
            self.scheduler.waiters.borrow_mut().push(cx.waker().clone());
            Poll::Pending
        }
    }
}
