//! Level editing core for a brick-breaker game
//!
//! Decodes and encodes the game's textual level files:
//! - Piece catalog mapping file symbols to piece kinds
//! - Per-cell parameter tokens (portals, teslas, item drops, cannons, switches, warps)
//! - Grid documents with resize and portal/tesla id validation
//! - Every historical level file layout on read, the newest on write

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod catalog;
pub mod cell;
pub mod config;
pub mod document;
pub mod error;
pub mod level_file;

#[cfg(test)]
mod test_support;

pub use catalog::Catalog;
pub use config::EditorConfig;
pub use document::LevelDocument;
pub use error::{CatalogError, CellError, ConfigError, DocumentError, LevelFileError};
pub use level_file::{decode_level, encode_level, load_level, save_level};
