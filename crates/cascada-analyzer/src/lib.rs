//! The static passes the compiler runs over an AST before emission
//! (`spec.md` §4.4): sequence-lock declaration, then sequence-operation
//! classification.
//!
//! Grounded on `cranelift-wasm`'s pattern of computing side-tables over an
//! externally-owned tree in dedicated passes rather than mutating the tree
//! in place — here the side-tables are keyed by `NodeId` instead of
//! Cranelift's `Value`/`Inst` references.
//!
//! `spec.md` §4.4 also describes an `isAsync` propagation pass and an
//! async-block wrap-placement pass gated by a compile-time
//! `asyncOptimization` toggle. Neither survives here: this interpreter
//! decides concurrency dynamically at each construct instead of
//! precomputing a placement plan for a separate emission step (a `for`
//! loop inspects its own body for sequential dependencies at render time,
//! an `Output`'s children race via `join_all` unconditionally), so a
//! static `isAsync`/wrap table would sit unread. Dropped along with the
//! toggle rather than shipped as dead output; recorded as an Open Question
//! Decision in `DESIGN.md`.

mod analysis;
mod error;
mod passes;
mod scope;

pub use analysis::{Analysis, OpKind, SequenceOps};
pub use error::AnalysisError;

use cascada_ast::Node;
use tracing::debug;

/// Runs the static passes over `root` and returns the combined facts the
/// interpreter needs.
#[tracing::instrument(skip_all)]
pub fn analyze(root: &Node) -> Result<Analysis, AnalysisError> {
    let declared_keys = passes::sequence_lock::declare(root)?;
    debug!(keys = declared_keys.len(), "sequence locks declared");

    let sequence_ops = passes::classify::classify(root, &declared_keys);

    Ok(Analysis {
        declared_keys,
        sequence_ops,
    })
}
