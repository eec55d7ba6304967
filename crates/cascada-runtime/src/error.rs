//! The closed error-kind enum (`spec.md` §7) plus conversion into the
//! `RenderError` poison value `cascada-ir`'s `Value::Error` carries.

use cascada_ast::Position;
use cascada_ir::RenderError;
use thiserror::Error;

/// The five user-facing failure kinds plus an unreachable-assertion kind,
/// matching `spec.md` §7 exactly. Each variant's `Display` is the message
/// half of the user-visible `"[context] message (line, col)"` form; the
/// position and context are attached separately via `RenderError::at`/
/// `with_context` when this is converted at a render boundary.
#[derive(Debug, Error, Clone)]
pub enum RuntimeError {
    #[error("{0}")]
    Template(String),
    #[error("{0}")]
    RuntimeLookup(String),
    #[error("{0}")]
    UserThrown(String),
    #[error("attempted to output null or undefined value")]
    UndefinedOutput,
    #[error("{0}")]
    SequenceViolation(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl RuntimeError {
    pub fn into_render_error(self, pos: Position, context: impl Into<String>) -> RenderError {
        RenderError::new(self.to_string())
            .at(pos)
            .with_context(context)
    }
}
