//! AsyncFrame (C3): the async-aware scope wrapper (`spec.md` §3, §4.3).
//!
//! Implements the part of the source's `AsyncFrame` that matters for
//! observable correctness — a reader that was scheduled (in program order)
//! before a concurrently-still-running writer must see the pre-write view,
//! a reader scheduled after must see the resolved post-write value — using
//! a single eagerly-copied `asyncVars` overlay per async block rather than
//! `spec.md`'s multi-record backward-walking timeline. The timeline exists
//! in the source to let a *long-lived* frame accumulate many writes across
//! many overlapping snapshots cheaply; this implementation creates a fresh,
//! short-lived `AsyncFrame` per async block instead (one per `if`
//! branch/loop iteration/capture/macro call), so there is only ever one
//! snapshot per frame and the timeline collapses to that single anchor —
//! recorded as an Open Question Decision in `DESIGN.md`.
//!
//! `spec.md`'s `promiseDataById` table (a reader awaits a producer's
//! not-yet-resolved promise) has no counterpart here: every `AsyncFrame` this
//! interpreter constructs is driven to completion, including draining its
//! own closures, before the next one is snapshotted (`eval_for`'s sequential
//! branch `await`s each iteration in turn), so no reader is ever scheduled
//! while a producer for the same block is still in flight. The only cross-
//! frame concern left is *where a write actually lands* — `has_local` below
//! must not let the read-snapshot overlay masquerade as the variable's real
//! owner, or `resolve_up` writes (`crate::frame::set`) stop one frame too
//! early and never reach the ancestor that declared the name. Recorded as an
//! Open Question Decision in `DESIGN.md`.

use crate::frame::Scope;
use cascada_ir::{BlockId, Value};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug)]
pub struct AsyncFrame {
    base: Rc<dyn Scope>,
    /// The nearest enclosing `AsyncFrame`, if the immediate lexical parent
    /// happens to be one — tracked explicitly by the interpreter at
    /// construction time rather than discovered by downcasting `base`, so
    /// write propagation (`track_write`) can walk a mixed `AsyncFrame`/
    /// `Frame` chain without needing `Any`.
    async_parent: Option<Rc<AsyncFrame>>,
    /// Compiler-assigned id of the async block this frame represents
    /// (`spec.md` §3: "the id of the async block this frame represents").
    id: BlockId,
    /// Eagerly-copied view of every name this block reads, captured
    /// synchronously at `snapshot` time — the single-record equivalent of
    /// the source's timeline anchor. Also the target of in-block writes
    /// (`write_local`), so a read later in the same block sees its own
    /// prior write; never consulted by `has_local`, which asks a narrower
    /// question ("does a real frame already own this name") than "is a
    /// value available here".
    async_vars: RefCell<IndexMap<String, Value>>,
    isolate_writes: bool,
}

impl AsyncFrame {
    /// `spec.md` §4.3 `snapshot(dependIds, id, writeCounters, ...)`: reads
    /// every name in `read_vars` off `base` right now (synchronously, before
    /// any interleaving). The source's per-name write countdown has no
    /// counterpart here (see module doc).
    pub fn snapshot(
        base: Rc<dyn Scope>,
        async_parent: Option<Rc<AsyncFrame>>,
        id: BlockId,
        read_vars: &[String],
        isolate_writes: bool,
    ) -> Rc<AsyncFrame> {
        let mut async_vars = IndexMap::new();
        for name in read_vars {
            if let Some(v) = crate::frame::lookup(&base, name) {
                async_vars.insert(name.clone(), v);
            }
        }
        Rc::new(AsyncFrame {
            base,
            async_parent,
            id,
            async_vars: RefCell::new(async_vars),
            isolate_writes,
        })
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    /// Records one completed write to `name` in this block's own overlay
    /// and, unless isolated, propagates the same write to every enclosing
    /// `AsyncFrame` up the chain (`spec.md` §4.3 step 2: "Propagate to
    /// ancestors (respecting isolateWrites)"), so an outer block's
    /// in-progress reads of `name` see it too. This is purely about keeping
    /// *overlay* views in sync; the write's real, durable home is decided by
    /// `crate::frame::set`'s `resolve_up` walk before `track_write` is ever
    /// called — see the module docs for why no promise/counter bookkeeping
    /// is needed here.
    pub fn track_write(self: &Rc<Self>, name: &str, value: Value) {
        self.async_vars
            .borrow_mut()
            .insert(name.to_string(), value.clone());
        if !self.isolate_writes {
            if let Some(parent) = &self.async_parent {
                parent.track_write(name, value);
            }
        }
    }

    /// `spec.md` §4.3 `dispose`: releases this block's state once it
    /// completes. With one snapshot per frame (see module docs) this is
    /// simply dropping the `Rc`; callers just stop holding a reference.
    pub fn dispose(self: Rc<Self>) {}
}


impl Scope for AsyncFrame {
    /// Deliberately does *not* consult `async_vars`: that overlay holds
    /// every name this block has read (and any it has since written), but
    /// ownership for `resolve_up` purposes belongs to whichever real `Frame`
    /// originally declared the name. If this answered `true` for a merely
    /// snapshotted name, `crate::frame::find_owner` would stop its ancestor
    /// walk right here and hand the write to this block's throwaway overlay
    /// instead of the frame that actually owns the storage — exactly the
    /// read-modify-write bug a sequential loop accumulator would otherwise
    /// hit (`{% set total = total + i %}` never reaching the `total`
    /// declared outside the loop).
    fn has_local(&self, head: &str) -> bool {
        self.base.has_local(head)
    }

    fn get_local(&self, head: &str) -> Option<Value> {
        self.async_vars
            .borrow()
            .get(head)
            .cloned()
            .or_else(|| self.base.get_local(head))
    }

    fn write_local(&self, head: &str, rest: &str, value: Value) {
        if rest.is_empty() {
            self.async_vars
                .borrow_mut()
                .insert(head.to_string(), value.clone());
        }
        self.base.write_local(head, rest, value);
    }

    fn parent(&self) -> Option<Rc<dyn Scope>> {
        Some(self.base.clone())
    }

    fn isolate_writes(&self) -> bool {
        self.isolate_writes
    }
}
