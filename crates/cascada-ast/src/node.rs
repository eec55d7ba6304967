use crate::ops::{ArithOp, BoolOp, CompareOp, UnaryOp};
use crate::Position;
use std::fmt;

/// A dense, densely-numbered reference to a [`Node`] within a single tree.
///
/// Mirrors the newtype-over-`u32` entity references cranelift's IR uses
/// (`cranelift_codegen::ir::entities::Value`, `Inst`, ...): opaque, `Copy`,
/// and cheap to use as a map key for the side-tables the analyzer attaches
/// (`isAsync`, `SequenceOp`, `wrapInAsyncBlock`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn from_u32(n: u32) -> Self {
        NodeId(n)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One node of the AST the parser (out of scope) hands to the compiler.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub pos: Position,
    pub kind: NodeKind,
}

impl Node {
    pub fn new(id: NodeId, pos: Position, kind: NodeKind) -> Self {
        Node { id, pos, kind }
    }

    /// The stable name used in error `context` strings (`spec.md` §6: the
    /// `context` string is `NodeKind` or `NodeKind(PositionNodeKind)`).
    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }
}

#[derive(Debug, Clone)]
pub enum Literal {
    Str(String),
    Num(f64),
    Bool(bool),
    Null,
}

#[derive(Debug, Clone)]
pub struct KeywordArg {
    pub name: String,
    pub value: Node,
}

/// Positional and keyword arguments to a call/filter/test.
#[derive(Debug, Clone, Default)]
pub struct CallArgs {
    pub positional: Vec<Node>,
    pub keyword: Vec<KeywordArg>,
}

#[derive(Debug, Clone)]
pub struct SwitchCase {
    pub value: Node,
    pub body: Node,
}

#[derive(Debug, Clone)]
pub struct MacroParam {
    pub name: String,
    pub default: Option<Node>,
}

/// The loop target of a `for`: a plain name, or a destructured pair
/// (`for k, v in ...`).
#[derive(Debug, Clone)]
pub enum ForTarget {
    Single(String),
    Pair(String, String),
}

#[derive(Debug, Clone)]
pub struct Output {
    pub children: Vec<Node>,
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    // ---- literals and compound values ----
    Literal(Literal),
    /// A bare name lookup. `sequence_marker` is set when this symbol itself
    /// is the `!`-marked root of a static sequence-lock path with no
    /// further member access (rare but legal: `lock!()`).
    Symbol {
        name: String,
        sequence_marker: bool,
    },
    Group(Box<Node>),
    Array(Vec<Node>),
    /// String-keyed dict literal (`spec.md` §6: "dicts (string keys only)").
    Dict(Vec<(String, Node)>),
    Pair(Box<Node>, Box<Node>),

    // ---- operators ----
    Arith {
        op: ArithOp,
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Node>,
    },
    Compare {
        op: CompareOp,
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
    Bool {
        op: BoolOp,
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
    Not(Box<Node>),
    In {
        needle: Box<Node>,
        haystack: Box<Node>,
    },
    Is {
        target: Box<Node>,
        test: String,
        args: CallArgs,
    },
    /// Inline `a if c else b`.
    CondExpr {
        cond: Box<Node>,
        then_branch: Box<Node>,
        else_branch: Option<Box<Node>>,
    },

    // ---- member/index access ----
    /// Covers both `.member` and `[index]` access. `sequence_marker` is set
    /// when the static key at this node was written with a trailing `!` in
    /// the surface syntax (`db!.read()` marks the `db` segment).
    LookupVal {
        target: Box<Node>,
        key: Box<Node>,
        sequence_marker: bool,
    },

    // ---- calls ----
    FunCall {
        callee: Box<Node>,
        args: CallArgs,
    },
    Filter {
        name: String,
        target: Box<Node>,
        args: CallArgs,
    },
    Caller {
        params: Vec<MacroParam>,
        body: Box<Node>,
    },

    // ---- statements ----
    Root(Vec<Node>),
    /// Raw template text, spliced into the buffer without the escape shim
    /// (`spec.md` §4.5: "`TemplateData` (raw text) goes straight in").
    TemplateData(String),
    Output(Output),
    Set {
        targets: Vec<Node>,
        value: Option<Box<Node>>,
        body: Option<Box<Node>>,
    },
    If {
        cond: Box<Node>,
        then_branch: Box<Node>,
        else_branch: Option<Box<Node>>,
    },
    Switch {
        discriminant: Box<Node>,
        cases: Vec<SwitchCase>,
        default: Option<Box<Node>>,
    },
    For {
        target: ForTarget,
        iter: Box<Node>,
        body: Box<Node>,
        else_branch: Option<Box<Node>>,
    },
    Block {
        name: String,
        body: Box<Node>,
    },
    Extends(Box<Node>),
    Super,
    Include {
        name: Box<Node>,
        ignore_missing: bool,
    },
    Import {
        name: Box<Node>,
        target: String,
    },
    FromImport {
        name: Box<Node>,
        names: Vec<(String, Option<String>)>,
        with_context: bool,
    },
    Macro {
        name: String,
        params: Vec<MacroParam>,
        body: Box<Node>,
    },
    Call {
        call: Box<Node>,
        caller_body: Option<Box<Node>>,
    },
    Capture {
        target: Option<String>,
        body: Box<Node>,
    },
    Do(Vec<Node>),
    FilterBlock {
        name: String,
        args: CallArgs,
        body: Box<Node>,
    },
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Literal(_) => "Literal",
            NodeKind::Symbol { .. } => "Symbol",
            NodeKind::Group(_) => "Group",
            NodeKind::Array(_) => "Array",
            NodeKind::Dict(_) => "Dict",
            NodeKind::Pair(_, _) => "Pair",
            NodeKind::Arith { .. } => "Arith",
            NodeKind::Unary { .. } => "Unary",
            NodeKind::Compare { .. } => "Compare",
            NodeKind::Bool { .. } => "Bool",
            NodeKind::Not(_) => "Not",
            NodeKind::In { .. } => "In",
            NodeKind::Is { .. } => "Is",
            NodeKind::CondExpr { .. } => "CondExpr",
            NodeKind::LookupVal { .. } => "LookupVal",
            NodeKind::FunCall { .. } => "FunCall",
            NodeKind::Filter { .. } => "Filter",
            NodeKind::Caller { .. } => "Caller",
            NodeKind::Root(_) => "Root",
            NodeKind::TemplateData(_) => "TemplateData",
            NodeKind::Output(_) => "Output",
            NodeKind::Set { .. } => "Set",
            NodeKind::If { .. } => "If",
            NodeKind::Switch { .. } => "Switch",
            NodeKind::For { .. } => "For",
            NodeKind::Block { .. } => "Block",
            NodeKind::Extends(_) => "Extends",
            NodeKind::Super => "Super",
            NodeKind::Include { .. } => "Include",
            NodeKind::Import { .. } => "Import",
            NodeKind::FromImport { .. } => "FromImport",
            NodeKind::Macro { .. } => "Macro",
            NodeKind::Call { .. } => "Call",
            NodeKind::Capture { .. } => "Capture",
            NodeKind::Do(_) => "Do",
            NodeKind::FilterBlock { .. } => "FilterBlock",
        }
    }

    /// Nodes that are async regardless of their children (`spec.md` §4.4):
    /// `LookupVal`, `Symbol`, `FunCall`, `Filter`, `Is`, `Caller`, extension
    /// calls, and control nodes that load templates (`Extends`, `Include`,
    /// `Import`, `FromImport`, `Super`).
    pub fn is_intrinsically_async(&self) -> bool {
        matches!(
            self,
            NodeKind::LookupVal { .. }
                | NodeKind::Symbol { .. }
                | NodeKind::FunCall { .. }
                | NodeKind::Filter { .. }
                | NodeKind::Is { .. }
                | NodeKind::Caller { .. }
                | NodeKind::Extends(_)
                | NodeKind::Include { .. }
                | NodeKind::Import { .. }
                | NodeKind::FromImport { .. }
                | NodeKind::Super
        )
    }

    /// Children of this node, in left-to-right evaluation order. Used
    /// uniformly by the analyzer's `isAsync` propagation and sequence-op
    /// classification passes so neither has to special-case every variant
    /// twice.
    pub fn children(&self) -> Vec<&Node> {
        use NodeKind::*;
        match self {
            Literal(_) | Symbol { .. } | Super | TemplateData(_) => vec![],
            Group(n) | Extends(n) | Unary { operand: n, .. } | Not(n) => vec![n.as_ref()],
            Array(items) | Root(items) | Do(items) => items.iter().collect(),
            Dict(pairs) => pairs.iter().map(|(_, v)| v).collect(),
            Pair(a, b) => vec![a.as_ref(), b.as_ref()],
            Arith { lhs, rhs, .. } | Compare { lhs, rhs, .. } | Bool { lhs, rhs, .. } => {
                vec![lhs.as_ref(), rhs.as_ref()]
            }
            In { needle, haystack } => vec![needle.as_ref(), haystack.as_ref()],
            Is { target, args, .. } => {
                let mut v = vec![target.as_ref()];
                v.extend(args.positional.iter());
                v.extend(args.keyword.iter().map(|k| &k.value));
                v
            }
            CondExpr {
                cond,
                then_branch,
                else_branch,
            }
            | If {
                cond,
                then_branch,
                else_branch,
            } => {
                let mut v = vec![cond.as_ref(), then_branch.as_ref()];
                if let Some(e) = else_branch {
                    v.push(e.as_ref());
                }
                v
            }
            LookupVal { target, key, .. } => vec![target.as_ref(), key.as_ref()],
            FunCall { callee, args } => {
                let mut v = vec![callee.as_ref()];
                v.extend(args.positional.iter());
                v.extend(args.keyword.iter().map(|k| &k.value));
                v
            }
            Filter { target, args, .. } => {
                let mut v = vec![target.as_ref()];
                v.extend(args.positional.iter());
                v.extend(args.keyword.iter().map(|k| &k.value));
                v
            }
            Caller { body, .. } => vec![body.as_ref()],
            Output(o) => o.children.iter().collect(),
            Set {
                targets,
                value,
                body,
            } => {
                let mut v: Vec<&Node> = targets.iter().collect();
                if let Some(val) = value {
                    v.push(val.as_ref());
                }
                if let Some(b) = body {
                    v.push(b.as_ref());
                }
                v
            }
            Switch {
                discriminant,
                cases,
                default,
            } => {
                let mut v = vec![discriminant.as_ref()];
                for case in cases {
                    v.push(&case.value);
                    v.push(&case.body);
                }
                if let Some(d) = default {
                    v.push(d.as_ref());
                }
                v
            }
            For {
                iter,
                body,
                else_branch,
                ..
            } => {
                let mut v = vec![iter.as_ref(), body.as_ref()];
                if let Some(e) = else_branch {
                    v.push(e.as_ref());
                }
                v
            }
            Block { body, .. } => vec![body.as_ref()],
            Include { name, .. } => vec![name.as_ref()],
            Import { name, .. } => vec![name.as_ref()],
            FromImport { name, .. } => vec![name.as_ref()],
            Macro { body, .. } => vec![body.as_ref()],
            Call { call, caller_body } => {
                let mut v = vec![call.as_ref()];
                if let Some(b) = caller_body {
                    v.push(b.as_ref());
                }
                v
            }
            Capture { body, .. } => vec![body.as_ref()],
            FilterBlock { args, body, .. } => {
                let mut v: Vec<&Node> = args.positional.iter().collect();
                v.extend(args.keyword.iter().map(|k| &k.value));
                v.push(body.as_ref());
                v
            }
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
