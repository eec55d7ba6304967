//! The top-level facade: `compile(ast) -> Template`, then
//! `Template::render_sync`/`render_async`. No template loader, no
//! `Environment`/`Template` registry surface, no built-in filter library
//! beyond the handful of black-box callables (`upper`, `lower`, `default`,
//! `safe`, `escape`, `even`, `odd`) needed to exercise the emitter
//! contracts end to end — anything wider belongs to a host embedding this
//! crate, not to it.

mod filters;

pub use cascada_compiler::CompileError;
pub use cascada_ir::{CompileOptions, RenderError, Value};
pub use cascada_runtime::{MapRegistry, Registry, TemplateLoader};

use cascada_ast::Node;
use cascada_compiler::NoResolver;
use cascada_ir::Program;
use cascada_runtime::{render, render_sync};
use indexmap::IndexMap;
use std::rc::Rc;

/// A compiled template, ready to render against any number of independent
/// contexts. Cheap to clone: the compiled tree and the registry are both
/// `Rc`-shared.
#[derive(Clone)]
pub struct Template {
    program: Rc<Program>,
    registry: Rc<dyn Registry>,
}

impl Template {
    /// Blocks the current thread to completion (`spec.md` §4.5: the emitted
    /// program's signature "drops `astate`" in the sync variant).
    pub fn render_sync(&self, context: IndexMap<String, Value>) -> Result<String, RenderError> {
        render_sync(self.program.clone(), context, self.registry.clone(), None)
    }

    /// Native `async`/`await` entry point (`spec.md` §9's REDESIGN note).
    pub async fn render_async(&self, context: IndexMap<String, Value>) -> Result<String, RenderError> {
        render(self.program.clone(), context, self.registry.clone(), None).await
    }
}

/// Compiles `root` with the default autoescaping options
/// and the built-in filter/test set. `{% extends %}`/`{% include %}`/
/// `{% import %}` all fail at compile or render time since no loader is
/// configured — a host that needs them builds its own `TemplateResolver`/
/// `TemplateLoader` pair against `cascada-compiler`/`cascada-runtime`
/// directly rather than through this facade.
pub fn compile(root: Node) -> Result<Template, CompileError> {
    compile_with_options(root, CompileOptions::default())
}

pub fn compile_with_options(root: Node, options: CompileOptions) -> Result<Template, CompileError> {
    let program = cascada_compiler::compile(root, options, &NoResolver)?;
    Ok(Template {
        program: Rc::new(program),
        registry: filters::default_registry(),
    })
}

/// Compiles with a caller-supplied registry instead of the default one —
/// for a host that wants to add or replace filters/tests without going
/// through `cascada-compiler` directly.
pub fn compile_with_registry(
    root: Node,
    options: CompileOptions,
    registry: Rc<dyn Registry>,
) -> Result<Template, CompileError> {
    let program = cascada_compiler::compile(root, options, &NoResolver)?;
    Ok(Template {
        program: Rc::new(program),
        registry,
    })
}
