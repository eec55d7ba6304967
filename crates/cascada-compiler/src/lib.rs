//! C5, the emitter: validates an analyzed AST and indexes it into an
//! executable [`cascada_ir::Program`].
//!
//! `spec.md` §9 describes an emitted representation the runtime interprets;
//! `cascada_ir::Program`'s own docs already settle that the emitted program
//! *is* the analyzed AST (`cascada_ast::NodeKind` already has the tagged-sum
//! shape an emitter would otherwise lower into), so this crate's job
//! narrows to what compiling a tree genuinely requires: running the static
//! passes (C4), rejecting structurally invalid trees with a positioned
//! `TemplateError` before any `Program` is handed to the runtime, indexing
//! `{% block %}` definitions by name, and — when a template extends another
//! — resolving and compiling the parent chain.

mod blocks;
mod error;
mod resolver;

pub use error::CompileError;
pub use resolver::{NoResolver, TemplateResolver};

use cascada_analyzer::analyze;
use cascada_ast::Node;
use cascada_ir::{CompileOptions, Program};
use tracing::debug;

/// Validates and indexes `root`, resolving `{% extends %}` through
/// `resolver` if present, into a fully linked [`Program`] ready for
/// `cascada_runtime::render`/`render_sync`.
#[tracing::instrument(skip_all)]
pub fn compile(
    root: Node,
    options: CompileOptions,
    resolver: &dyn TemplateResolver,
) -> Result<Program, CompileError> {
    let extends = blocks::find_extends(&root)?;
    let own_blocks = blocks::collect_blocks(&root)?;
    debug!(blocks = own_blocks.len(), extends = extends.is_some(), "validated template shape");

    let analysis = analyze(&root)?;

    let program = Program::new(root, analysis, options, own_blocks);

    match extends {
        Some(name) => {
            let parent_root = resolver.resolve(&name).map_err(|e| CompileError::UnresolvedParent {
                name: name.clone(),
                source: Box::new(e),
            })?;
            debug!(parent = %name, "compiling extended parent template");
            let parent = compile(parent_root, options, resolver)?;
            Ok(program.with_parent(parent))
        }
        None => Ok(program),
    }
}
