//! The value model (C1) and the entity-indexed reference types the
//! compiler and runtime share.
//!
//! Grounded on `cranelift-codegen::ir::entities` for the newtype-over-`u32`
//! references (here [`entities::BlockId`], [`entities::SlotId`], ...) and
//! on `cranelift-entity`'s map types for the arenas that index them. The
//! value representation itself has no cranelift analogue; it follows
//! `spec.md` §3 directly, with every variant kept cheap to `Clone` by
//! `Rc`-sharing its payload rather than deep-copying it.

mod error;
mod escape;
mod join;
mod ops;
mod program;
mod promise;
mod scalar;
mod value;

pub mod entities;

pub use cranelift_entity::{EntityRef, PrimaryMap, SecondaryMap};

pub use entities::{BlockId, SlotId};
pub use error::RenderError;
pub use escape::html_escape;
pub use join::{join2, join_all, Join2, JoinAll};
pub use ops::{
    ensure_defined, flatten_buffer, resolve, resolve_all, resolve_duo, resolve_object_properties,
    suppress_value,
};
pub use program::{CompileOptions, Program};
pub use promise::{promise, PromiseHandle, PromiseResolver};
pub use scalar::{Object, Scalar};
pub use value::{SafeMarkerFn, Value};
