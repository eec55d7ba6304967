//! The render-time environment: everything an [`crate::interp::eval`] call
//! needs that isn't the current scope — the compiled program, the shared
//! scheduler, the top-level context, the filter/test registry, and the
//! template loader `spec.md` §1 treats as an external collaborator.

use crate::context::Context;
use crate::frame::Scope;
use crate::registry::Registry;
use crate::scheduler::Scheduler;
use cascada_ir::{Program, RenderError, Value};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;

/// Loads a named template for `include`/`extends`/`import`. Filesystem
/// access and caching are out of scope (`spec.md` §1); this crate only
/// needs the contract, implemented by whatever hosts it (the `cascada`
/// facade crate, or a test harness).
pub trait TemplateLoader {
    fn load(&self, name: &str) -> Result<Rc<Program>, RenderError>;
}

pub struct Env {
    pub registry: Rc<dyn Registry>,
    pub scheduler: Rc<Scheduler>,
    pub context: Rc<Context>,
    pub loader: Option<Rc<dyn TemplateLoader>>,
    pub program: Rc<Program>,
    /// The render's outermost frame. `set` targets matching this frame
    /// (`spec.md` §4.5: "for top-level sets, also write into context") are
    /// the ones that also land in `context`'s export list.
    pub root_frame: Rc<dyn Scope>,
    /// Current holder of each sequence-lock key (`spec.md` §3 "Sequence
    /// Operation", `!seg1!seg2…`): a `Value::Future` that resolves once the
    /// previous call along that key has finished, or absent if the key has
    /// never been acquired.
    pub locks: Rc<RefCell<IndexMap<String, Value>>>,
}

impl Env {
    pub fn new(
        program: Rc<Program>,
        registry: Rc<dyn Registry>,
        scheduler: Rc<Scheduler>,
        context: Rc<Context>,
        loader: Option<Rc<dyn TemplateLoader>>,
        root_frame: Rc<dyn Scope>,
    ) -> Rc<Env> {
        Rc::new(Env {
            registry,
            scheduler,
            context,
            loader,
            program,
            root_frame,
            locks: Rc::new(RefCell::new(IndexMap::new())),
        })
    }

    /// Same render environment, retargeted at a different compiled program,
    /// a fresh top-level frame/context — used by `include`/`import` to
    /// render a sub-template under the same scheduler (closure-count
    /// bookkeeping stays global to one render) without leaking its exports
    /// into the including template's context.
    pub fn with_program(
        &self,
        program: Rc<Program>,
        context: Rc<Context>,
        root_frame: Rc<dyn Scope>,
    ) -> Rc<Env> {
        Rc::new(Env {
            registry: self.registry.clone(),
            scheduler: self.scheduler.clone(),
            context,
            loader: self.loader.clone(),
            program,
            root_frame,
            locks: Rc::new(RefCell::new(IndexMap::new())),
        })
    }
}

/// Per-call evaluation context threaded through `eval`'s recursion:
/// everything besides the current scope, bundled so adding a new piece of
/// context (like `current_block`) doesn't change every call site's arity.
/// Cheap to clone — every field is `Rc`- or `Copy`-backed.
#[derive(Clone)]
pub struct EvalCtx {
    pub env: Rc<Env>,
    /// The nearest enclosing `AsyncFrame`, if the current point in the tree
    /// is inside one (`spec.md` §4.3 write tracking).
    pub actx: Option<Rc<crate::async_frame::AsyncFrame>>,
    /// `(block name, index into that block's super chain)` while evaluating
    /// inside a `{% block %}` body, so `{% super() %}` knows which
    /// less-derived definition to resolve next.
    pub current_block: Option<Rc<(String, usize)>>,
}

impl EvalCtx {
    pub fn new(env: Rc<Env>) -> Self {
        EvalCtx {
            env,
            actx: None,
            current_block: None,
        }
    }

    pub fn with_async(&self, actx: Rc<crate::async_frame::AsyncFrame>) -> Self {
        EvalCtx {
            env: self.env.clone(),
            actx: Some(actx),
            current_block: self.current_block.clone(),
        }
    }

    pub fn with_block(&self, name: String, index: usize) -> Self {
        EvalCtx {
            env: self.env.clone(),
            actx: self.actx.clone(),
            current_block: Some(Rc::new((name, index))),
        }
    }
}

pub fn is_top_level(scope: &Rc<dyn Scope>, env: &Env) -> bool {
    Rc::ptr_eq(scope, &env.root_frame)
}
