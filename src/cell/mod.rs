//! Grid cells
//!
//! Structured cell values and their textual token form:
//! `SYMBOL[(params,...)][{triggerId}]`.

mod decode;
mod encode;
mod types;

pub use decode::*;
pub use encode::*;
pub use types::*;
