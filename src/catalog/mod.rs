//! Piece catalog
//!
//! Maps level-file symbols to piece definitions. Built once from a plain text
//! resource of line triples separated by blank lines:
//!
//! ```text
//! Empty
//! images/empty.png
//! E
//!
//! Solid Block
//! images/solid.png
//! S
//! ```
//!
//! The first entry is the default (empty) piece used to fill new grids.

mod items;
mod piece;

pub use items::*;
pub use piece::*;

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{CatalogError, CellError};

/// Immutable symbol registry passed to every decode and encode call
#[derive(Debug, Clone)]
pub struct Catalog {
    pieces: Vec<PieceDefinition>,
    by_symbol: HashMap<String, usize>,
    items: ItemCatalog,
}

impl Catalog {
    /// Parse a catalog resource. When `image_root` is given every image
    /// reference is resolved under it and must decode as an image.
    pub fn load(text: &str, image_root: Option<&Path>) -> Result<Self, CatalogError> {
        let mut pieces = Vec::new();
        let mut by_symbol = HashMap::new();
        let mut lines = text
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .enumerate()
            .map(|(i, l)| (i + 1, l));

        while let Some((line_no, name)) = lines.next() {
            if name.trim().is_empty() {
                continue;
            }

            let image_ref = match lines.next() {
                Some((_, l)) if !l.trim().is_empty() => l.trim(),
                _ => return Err(CatalogError::TruncatedEntry(line_no)),
            };
            let symbol = match lines.next() {
                Some((_, l)) if !l.trim().is_empty() => l.trim(),
                _ => return Err(CatalogError::TruncatedEntry(line_no)),
            };

            if by_symbol.contains_key(symbol) {
                return Err(CatalogError::DuplicateSymbol(symbol.to_string()));
            }

            let mut piece = PieceDefinition::new(name.trim(), image_ref, symbol, pieces.is_empty());
            if let Some(root) = image_root {
                piece.image_size = Some(resolve_image(root, image_ref)?);
            }

            by_symbol.insert(piece.symbol.clone(), pieces.len());
            pieces.push(piece);
        }

        if pieces.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }

        log::debug!("Loaded {} level pieces", pieces.len());

        Ok(Self {
            pieces,
            by_symbol,
            items: ItemCatalog::default(),
        })
    }

    /// Load a catalog resource from disk
    pub fn load_file<P: AsRef<Path>>(path: P, image_root: Option<&Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| CatalogError::UnreadableResource {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load(&text, image_root)
    }

    /// Attach the item types used for item-drop settings
    pub fn with_items(mut self, items: ItemCatalog) -> Self {
        self.items = items;
        self
    }

    pub fn items(&self) -> &ItemCatalog {
        &self.items
    }

    pub fn lookup(&self, symbol: &str) -> Result<&PieceDefinition, CellError> {
        self.by_symbol
            .get(symbol)
            .map(|&i| &self.pieces[i])
            .ok_or_else(|| CellError::UnknownSymbol(symbol.to_string()))
    }

    /// The piece new and grown cells are filled with
    pub fn default_piece(&self) -> &PieceDefinition {
        &self.pieces[0]
    }

    /// First piece of the given kind, in catalog order
    pub fn piece_of_kind(&self, kind: PieceKind) -> Option<&PieceDefinition> {
        self.pieces.iter().find(|p| p.kind == kind)
    }

    pub fn pieces(&self) -> &[PieceDefinition] {
        &self.pieces
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }
}

fn resolve_image(root: &Path, image_ref: &str) -> Result<(u32, u32), CatalogError> {
    let path = root.join(image_ref);
    image::image_dimensions(&path).map_err(|e| CatalogError::UnresolvedImage {
        path,
        reason: e.to_string(),
    })
}
