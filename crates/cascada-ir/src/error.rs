use cascada_ast::Position;
use std::fmt;
use std::rc::Rc;

/// A render-time error (`spec.md` §6). Cloned freely via `Rc` sharing since
/// the same error can surface through several awaiters of the same
/// rejected future.
#[derive(Debug, Clone)]
pub struct RenderError(Rc<RenderErrorInner>);

#[derive(Debug)]
struct RenderErrorInner {
    message: String,
    pos: Option<Position>,
    /// The `NodeKind` (and, for nested failures, `NodeKind(InnerNodeKind)`)
    /// the error was attributed to, per `spec.md` §6.
    context: Option<String>,
}

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self {
        RenderError(Rc::new(RenderErrorInner {
            message: message.into(),
            pos: None,
            context: None,
        }))
    }

    pub fn at(mut self, pos: Position) -> Self {
        Rc::make_mut(&mut self.0).pos = Some(pos);
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        let ctx = context.into();
        let inner = Rc::make_mut(&mut self.0);
        inner.context = Some(match inner.context.take() {
            Some(prev) => format!("{ctx}({prev})"),
            None => ctx,
        });
        self
    }

    pub fn message(&self) -> &str {
        &self.0.message
    }

    pub fn pos(&self) -> Option<Position> {
        self.0.pos
    }

    pub fn context(&self) -> Option<&str> {
        self.0.context.as_deref()
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.message)?;
        if let Some(pos) = self.0.pos {
            write!(f, " at {pos}")?;
        }
        if let Some(ctx) = &self.0.context {
            write!(f, " (in {ctx})")?;
        }
        Ok(())
    }
}

impl std::error::Error for RenderError {}

// `Rc::make_mut` needs `Clone` on the pointee even though we only ever clone
// it while holding the sole reference (freshly constructed or about to be
// replaced).
impl Clone for RenderErrorInner {
    fn clone(&self) -> Self {
        RenderErrorInner {
            message: self.message.clone(),
            pos: self.pos,
            context: self.context.clone(),
        }
    }
}
