//! The emitted program (`spec.md` §9): the artifact C5 produces and C2/C3
//! interpret. Rather than a separate bytecode, the "program" is the
//! analyzed AST itself — `cascada_ast::NodeKind` already is the tagged sum
//! type `spec.md` asks the emitted representation to reduce to, and its
//! `children()` method already gives a uniform walk order. Compiling is
//! validating and indexing that tree, not translating it to a second one.

use cascada_analyzer::Analysis;
use cascada_ast::{Node, NodeId, NodeKind};
use indexmap::IndexMap;

/// Render-time toggles fixed at compile time (`spec.md` §5/§9).
#[derive(Debug, Clone, Copy)]
pub struct CompileOptions {
    /// Whether `Output` children are HTML-escaped unless marked safe.
    pub autoescape: bool,
    /// Whether `ensureDefined` raises on `undefined`/`null` or renders `""`.
    pub throw_on_undefined: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            autoescape: true,
            throw_on_undefined: false,
        }
    }
}

/// One compiled template: its root node, the analysis side-tables the
/// interpreter consults at every step, its named `{% block %}` bodies, and
/// (if it has an `{% extends %}`) the parent it overrides blocks of.
///
/// `super()` resolution walks `parent` links outward from the child,
/// exactly mirroring `spec.md` §9's "arena of compiled templates, blocks
/// referenced by integer index" except the "arena" here is just Rust's own
/// ownership graph: a `Box<Program>` chain instead of a side index, since a
/// single render only ever has one active extends chain at a time.
#[derive(Debug)]
pub struct Program {
    pub root: Node,
    pub analysis: Analysis,
    pub options: CompileOptions,
    /// `{% block name %}` definitions keyed by name, as `NodeId`s into
    /// `root`. Looked up by [`Program::find`] rather than cached by
    /// reference so `Program` stays a plain owned tree.
    pub blocks: IndexMap<String, NodeId>,
    pub parent: Option<Box<Program>>,
}

impl Program {
    pub fn new(
        root: Node,
        analysis: Analysis,
        options: CompileOptions,
        blocks: IndexMap<String, NodeId>,
    ) -> Self {
        Program {
            root,
            analysis,
            options,
            blocks,
            parent: None,
        }
    }

    pub fn with_parent(mut self, parent: Program) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    /// Finds a node by id within this template's own tree (not the parent
    /// chain). `O(n)` in the worst case; called rarely (`super()` lookups,
    /// named-block dispatch), never in the hot expression-eval path.
    pub fn find(&self, id: NodeId) -> Option<&Node> {
        find_in(&self.root, id)
    }

    /// The body of `{% block name %}` as declared in this template,
    /// ignoring any parent override.
    pub fn own_block(&self, name: &str) -> Option<&Node> {
        self.blocks.get(name).and_then(|id| self.find(*id))
    }

    /// Resolves the block a top-level render should actually emit for
    /// `name`: a child's override if it has one (`spec.md`'s
    /// `extends`/`block` semantics — the most-derived definition wins),
    /// falling back through the parent chain, then finally to this
    /// template's own body if nothing overrides it.
    pub fn resolve_block(&self, name: &str) -> Option<&Node> {
        self.own_block(name).or_else(|| {
            self.parent
                .as_ref()
                .and_then(|parent| parent.resolve_block(name))
        })
    }

    /// The chain of ancestor templates this block could be overriding,
    /// innermost (this template) first, used by `{% super() %}` to find
    /// "the next less-derived body" rather than jumping straight to the
    /// root ancestor.
    pub fn super_chain<'a>(&'a self, name: &str) -> Vec<&'a Node> {
        let mut chain = Vec::new();
        if let Some(node) = self.own_block(name) {
            chain.push(node);
        }
        if let Some(parent) = &self.parent {
            chain.extend(parent.super_chain(name));
        }
        chain
    }
}

fn find_in(node: &Node, id: NodeId) -> Option<&Node> {
    if node.id == id {
        return Some(node);
    }
    for child in node.kind.children() {
        if let Some(found) = find_in(child, id) {
            return Some(found);
        }
    }
    None
}

/// True for node kinds the top-level render walks without first matching a
/// `{% block %}` name (everything outside named blocks) — used by the
/// compiler to decide which `Output`/statement nodes belong to the
/// template's unnamed top-level body versus a block it should register.
pub fn is_block(node: &Node) -> bool {
    matches!(node.kind, NodeKind::Block { .. })
}
