use cascada_ast::Position;
use thiserror::Error;

/// Compile-time failures raised by the static passes, before any `Program`
/// is emitted (`spec.md` §7: "Compile errors (C4, C5) abort emission with
/// line/column of the offending AST node").
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("sequence marker `!` must follow a static string key at {0}")]
    NonStaticMarker(Position),

    #[error("sequence-locked path has a dynamic segment before the marker at {0}")]
    DynamicPrefix(Position),

    #[error("a call path may carry at most one `!` marker at {0}")]
    MultipleMarkers(Position),

    #[error("sequence lock root `{name}` is a locally declared variable, not a context path, at {pos}")]
    LocalRoot { name: String, pos: Position },

    #[error("sequence locks are not allowed inside a macro body at {0}")]
    InsideMacro(Position),
}
