use cascada_ast::NodeId;
use indexmap::{IndexMap, IndexSet};

/// What kind of sequence-lock contention a node carries for a given
/// canonical key (`spec.md` §3, "Sequence Operation").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    /// Reads a statically-named context path some sibling/ancestor might
    /// lock.
    Path,
    /// A `FunCall` whose callee path is user-marked `!`.
    Lock,
    /// A join of a `Path` with a `Lock`, or two `Lock`s, on the same key.
    Contended,
}

/// Per-node sequence-lock tags, keyed by canonical lock key
/// (`!seg1!seg2…!segN`). Most nodes touch zero keys; a handful touch one.
pub type SequenceOps = IndexMap<String, OpKind>;

/// The full result of the three static passes (`spec.md` §4.4), keyed by
/// `NodeId` so the emitter can look up a node's facts in O(1) while
/// walking the same tree a second time.
#[derive(Debug, Default)]
pub struct Analysis {
    /// Sequence-lock keys declared on the root `sequenceLockFrame`, in
    /// declaration order.
    pub declared_keys: IndexSet<String>,
    /// Per-node `PATH`/`LOCK`/`CONTENDED` tags.
    pub sequence_ops: IndexMap<NodeId, SequenceOps>,
}

impl Analysis {
    pub fn ops_for(&self, id: NodeId) -> Option<&SequenceOps> {
        self.sequence_ops.get(&id)
    }
}
