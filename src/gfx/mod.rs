//! Graphics-context abstraction
//!
//! The renderer never talks to a GPU API directly; it issues every call
//! through the [`GraphicsContext`] trait defined here.

pub mod trace;
pub mod traits;
pub mod types;

pub use trace::{TraceContext, TraceOp};
pub use traits::*;
pub use types::*;
