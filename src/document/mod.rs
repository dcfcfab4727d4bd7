//! Level document model
//!
//! A [`LevelDocument`] owns its cell grid and the level-wide settings written
//! after the grid. Portal and tesla ids are checked by
//! [`LevelDocument::validate`] before a document is saved.

mod grid;
mod validate;

pub use grid::*;
pub use validate::*;
