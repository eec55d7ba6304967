//! The runtime: Frame/AsyncFrame scopes (C2/C3), the scheduler, the output
//! buffer (C6), and the tree-walking interpreter that plays the emitter's
//! role (C5) by evaluating a compiled [`cascada_ir::Program`] directly
//! rather than translating it into a second representation first.

mod async_frame;
mod buffer;
mod context;
mod env;
mod error;
mod frame;
mod interp;
mod macro_value;
mod registry;
mod scheduler;
mod sequence_lock;
mod values;

pub use async_frame::AsyncFrame;
pub use buffer::Buffer;
pub use context::Context;
pub use env::{is_top_level, Env, EvalCtx, TemplateLoader};
pub use error::RuntimeError;
pub use frame::{Frame, Record, Scope};
pub use interp::{eval, render, render_sync};
pub use macro_value::MacroHandle;
pub use registry::{FilterFn, MapRegistry, Registry, TestFn};
pub use scheduler::{wait_all_closures, Scheduler};
pub use values::{is_array, keys, RtArray, RtDict};
