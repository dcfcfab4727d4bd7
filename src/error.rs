//! Error types for catalog loading, cell decoding and level file I/O

use std::path::PathBuf;
use thiserror::Error;

use crate::document::CellProblem;

/// Error while loading the piece or item catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read catalog resource {path}: {source}")]
    UnreadableResource {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The resource ended in the middle of an entry
    #[error("catalog entry starting at line {0} is incomplete")]
    TruncatedEntry(usize),
    #[error("catalog resource defines no pieces")]
    EmptyCatalog,
    #[error("symbol '{0}' is defined more than once")]
    DuplicateSymbol(String),
    #[error("image '{path}' could not be resolved: {reason}")]
    UnresolvedImage { path: PathBuf, reason: String },
    #[error("malformed item definition at line {0}")]
    MalformedItemEntry(usize),
}

/// Error while decoding a single cell token
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CellError {
    #[error("unknown piece symbol '{0}'")]
    UnknownSymbol(String),
    #[error("malformed cell '{token}': {reason}")]
    Malformed { token: String, reason: String },
}

impl CellError {
    pub(crate) fn malformed(token: &str, reason: impl Into<String>) -> Self {
        CellError::Malformed {
            token: token.to_string(),
            reason: reason.into(),
        }
    }
}

/// Error raised by grid document mutations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("level dimensions {width}x{height} are outside 1..=500")]
    DimensionOutOfRange { width: usize, height: usize },
    #[error("cell ({row}, {col}) is outside the grid")]
    OutOfBounds { row: usize, col: usize },
}

/// Error while reading or writing a level file. Every variant is terminal for
/// the load or save attempt; no partial document is ever returned.
#[derive(Debug, Error)]
pub enum LevelFileError {
    #[error("could not read {path}: {source}")]
    FileUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    FileUnwritable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("level header is missing or incomplete")]
    TruncatedHeader,
    #[error("level dimensions {width}x{height} are outside 1..=500")]
    DimensionOutOfRange { width: i64, height: i64 },
    #[error("expected {expected} cells but the file only holds {found}")]
    GridSizeMismatch { expected: usize, found: usize },
    #[error("unknown piece symbol '{symbol}' at row {row}, column {col}")]
    UnknownSymbol {
        row: usize,
        col: usize,
        symbol: String,
    },
    #[error("malformed cell '{token}' at row {row}, column {col}: {reason}")]
    MalformedCell {
        row: usize,
        col: usize,
        token: String,
        reason: String,
    },
    #[error("malformed {section} section near '{token}'")]
    MalformedTrailer { section: &'static str, token: String },
    #[error("{} cell(s) can not be written", .0.len())]
    InvalidBlockIds(Vec<CellProblem>),
    #[error("level name {0:?} must fit on one line and not be blank")]
    InvalidName(String),
}

impl LevelFileError {
    /// Attach a grid position to a cell decoding failure
    pub(crate) fn at_cell(row: usize, col: usize, err: CellError) -> Self {
        match err {
            CellError::UnknownSymbol(symbol) => LevelFileError::UnknownSymbol { row, col, symbol },
            CellError::Malformed { token, reason } => LevelFileError::MalformedCell {
                row,
                col,
                token,
                reason,
            },
        }
    }
}

/// Error while loading or saving the editor configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),
}
