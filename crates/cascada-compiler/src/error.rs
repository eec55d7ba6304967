use cascada_analyzer::AnalysisError;
use cascada_ast::Position;
use thiserror::Error;

/// Compile-time failures (`spec.md` §7 `TemplateError`): detected before any
/// `Program` is emitted, each carrying the position of the offending node.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("block `{name}` defined more than once (first at {first}, again at {second})")]
    DuplicateBlock {
        name: String,
        first: Position,
        second: Position,
    },

    #[error("{{% extends %}} must be the first statement in a template, found one at {0}")]
    ExtendsNotFirst(Position),

    #[error("{{% extends %}} target must be a string literal at {0}")]
    DynamicExtends(Position),

    #[error("cannot resolve extended template `{name}`: {source}")]
    UnresolvedParent {
        name: String,
        #[source]
        source: Box<CompileError>,
    },

    #[error("cannot resolve template `{name}`")]
    UnknownTemplate { name: String },

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}
