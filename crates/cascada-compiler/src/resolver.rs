use crate::error::CompileError;
use cascada_ast::Node;

/// Supplies the AST for a named template so `{% extends %}` can be resolved
/// into a full parent [`cascada_ir::Program`] chain at compile time
/// (`spec.md` §4.5: "register the parent's blocks into the context").
///
/// Parsing is out of scope (`spec.md` §1), so this trait hands back an
/// already-typed `Node`, the same shape [`compile`](crate::compile) itself
/// takes for the child template — whatever parses source text into a `Node`
/// lives above this crate.
pub trait TemplateResolver {
    fn resolve(&self, name: &str) -> Result<Node, CompileError>;
}

/// A resolver with no parent templates available — every `{% extends %}`
/// fails to resolve. Useful for compiling a template known not to extend
/// anything, or in tests that only exercise non-inheriting seed scenarios.
pub struct NoResolver;

impl TemplateResolver for NoResolver {
    fn resolve(&self, name: &str) -> Result<Node, CompileError> {
        Err(CompileError::UnknownTemplate {
            name: name.to_string(),
        })
    }
}
