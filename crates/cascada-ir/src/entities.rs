//! Densely-numbered, opaque references used by the compiler and runtime.
//!
//! Mirrors `cranelift_codegen::ir::entities`: a newtype over `u32` per
//! entity kind instead of a shared integer type, so a `BlockId` can never be
//! used where a `SlotId` was meant even though both are "just a number" at
//! runtime.

use cranelift_entity::entity_impl;

/// Identifies an async block: the compiler-assigned id `spec.md` §3
/// ("AsyncFrame ... id: Option<BlockId>") uses as the key into
/// `promiseDataById`. Unique within a single compiled template.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(u32);
entity_impl!(BlockId, "block");

/// Identifies a reserved slot in an output buffer (`spec.md` §3, "Buffer
/// slot"). Assigned synchronously at block-creation time; filled in
/// asynchronously.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(u32);
entity_impl!(SlotId, "slot");
