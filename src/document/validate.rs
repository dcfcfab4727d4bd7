//! Portal and tesla id checks
//!
//! The set of ids in use is never stored; [`BlockIdIndex`] is rebuilt from
//! the grid whenever it is needed, so it can not drift out of sync with the
//! cells it describes.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use super::LevelDocument;
use crate::catalog::PieceKind;
use crate::cell::{is_valid_block_id, is_valid_world_name};

/// Every portal and tesla id in a grid, with the cells that register it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockIdIndex {
    portals: BTreeMap<char, Vec<(usize, usize)>>,
    teslas: BTreeMap<char, Vec<(usize, usize)>>,
}

impl BlockIdIndex {
    pub fn build(doc: &LevelDocument) -> Self {
        let mut index = Self::default();
        for (row, col, cell) in doc.cells() {
            if let Some(id) = cell.own_block_id() {
                if let Some(ids) = index.ids_mut(cell.kind()) {
                    ids.entry(id).or_default().push((row, col));
                }
            }
        }
        index
    }

    fn ids_mut(&mut self, kind: PieceKind) -> Option<&mut BTreeMap<char, Vec<(usize, usize)>>> {
        match kind {
            PieceKind::Portal => Some(&mut self.portals),
            PieceKind::Tesla => Some(&mut self.teslas),
            _ => None,
        }
    }

    fn ids(&self, kind: PieceKind) -> Option<&BTreeMap<char, Vec<(usize, usize)>>> {
        match kind {
            PieceKind::Portal => Some(&self.portals),
            PieceKind::Tesla => Some(&self.teslas),
            _ => None,
        }
    }

    /// True if a cell of `kind` registers `id`
    pub fn contains(&self, kind: PieceKind, id: char) -> bool {
        self.ids(kind).is_some_and(|ids| ids.contains_key(&id))
    }

    /// Cells of `kind` registering `id`, in row-major order
    pub fn positions(&self, kind: PieceKind, id: char) -> &[(usize, usize)] {
        self.ids(kind)
            .and_then(|ids| ids.get(&id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn portal_ids(&self) -> impl Iterator<Item = char> + '_ {
        self.portals.keys().copied()
    }

    pub fn tesla_ids(&self) -> impl Iterator<Item = char> + '_ {
        self.teslas.keys().copied()
    }

    /// Lowest valid id not yet used by any cell of `kind`
    pub fn next_free_id(&self, kind: PieceKind) -> Option<char> {
        ('0'..='9')
            .chain('A'..='Z')
            .chain('a'..='z')
            .find(|id| !self.contains(kind, *id))
    }
}

/// Why a cell can not be written
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdProblem {
    #[error("block id {0:?} is not alphanumeric")]
    InvalidBlockId(char),
    #[error("sibling id {0:?} is not alphanumeric")]
    InvalidSiblingId(char),
    #[error("block id {0:?} is used by more than one cell")]
    DuplicateBlockId(char),
    #[error("links to itself")]
    LinksToItself,
    #[error("has no siblings")]
    NoSiblings,
    #[error("sibling {0:?} does not exist")]
    UnknownSibling(char),
    #[error("sibling {0:?} does not link back")]
    NotReciprocal(char),
    #[error("warp world name {0:?} is empty or holds whitespace, commas or brackets")]
    InvalidWorldName(String),
}

/// One failed check, tied to the cell it was found on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellProblem {
    pub row: usize,
    pub col: usize,
    pub problem: IdProblem,
}

impl fmt::Display for CellProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}, column {}: {}", self.row, self.col, self.problem)
    }
}

impl LevelDocument {
    pub fn block_ids(&self) -> BlockIdIndex {
        BlockIdIndex::build(self)
    }

    /// Check every portal, tesla and warp cell. All problems are collected, in
    /// row-major order, rather than stopping at the first one.
    pub fn validate(&self) -> Result<(), Vec<CellProblem>> {
        let index = self.block_ids();
        let mut problems = Vec::new();

        for (row, col, cell) in self.cells() {
            if let Some(warp) = cell.warp() {
                if !is_valid_world_name(&warp.world_name) {
                    let problem = IdProblem::InvalidWorldName(warp.world_name.clone());
                    problems.push(CellProblem { row, col, problem });
                }
            }
            let Some(id) = cell.own_block_id() else {
                continue;
            };
            let kind = cell.kind();
            let mut report = |problem| problems.push(CellProblem { row, col, problem });

            if !is_valid_block_id(id) {
                report(IdProblem::InvalidBlockId(id));
            } else if index.positions(kind, id).len() > 1 {
                report(IdProblem::DuplicateBlockId(id));
            }

            let siblings = cell.sibling_ids();
            if siblings.is_empty() {
                report(IdProblem::NoSiblings);
            }

            for sibling in siblings {
                if !is_valid_block_id(sibling) {
                    report(IdProblem::InvalidSiblingId(sibling));
                } else if sibling == id {
                    report(IdProblem::LinksToItself);
                } else if !index.contains(kind, sibling) {
                    report(IdProblem::UnknownSibling(sibling));
                } else if !self.links_back(&index, kind, sibling, id) {
                    report(IdProblem::NotReciprocal(sibling));
                }
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            log::debug!("Validation found {} cell problem(s)", problems.len());
            Err(problems)
        }
    }

    fn links_back(&self, index: &BlockIdIndex, kind: PieceKind, sibling: char, id: char) -> bool {
        index.positions(kind, sibling).iter().any(|&(r, c)| {
            self.cell(r, c)
                .is_some_and(|cell| cell.sibling_ids().contains(&id))
        })
    }
}
