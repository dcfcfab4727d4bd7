//! Level file loading and saving
//!
//! Level files are plain text: a name line, the grid dimensions, one line of
//! cell tokens per row, then the star milestones and item drop likelihoods.

mod read;
mod write;

pub use read::*;
pub use write::*;

use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::Catalog;
use crate::document::LevelDocument;
use crate::error::LevelFileError;

/// File extension used by level files
pub const LEVEL_FILE_EXTENSION: &str = "lvl";

/// Load a level file from disk
pub fn load_level<P: AsRef<Path>>(path: P, catalog: &Catalog) -> Result<LevelDocument, LevelFileError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| LevelFileError::FileUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let doc = decode_level(&text, catalog)?;
    log::info!("Loaded level '{}' ({}x{}) from {}", doc.name(), doc.width(), doc.height(), path.display());
    Ok(doc)
}

/// Save a level file to disk. Nothing is written if the document fails
/// validation.
pub fn save_level<P: AsRef<Path>>(doc: &LevelDocument, path: P) -> Result<(), LevelFileError> {
    let path = path.as_ref();
    let contents = encode_level(doc)?;
    fs::write(path, contents).map_err(|source| LevelFileError::FileUnwritable {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Saved level '{}' to {}", doc.name(), path.display());
    Ok(())
}

/// A level file found on disk (without loading it)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelFileInfo {
    /// File name without extension
    pub name: String,
    pub path: PathBuf,
}

/// List the level files in a directory, sorted by name. An unreadable
/// directory yields an empty list.
pub fn discover_levels<P: AsRef<Path>>(dir: P) -> Vec<LevelFileInfo> {
    let dir = dir.as_ref();
    let mut levels = Vec::new();

    match fs::read_dir(dir) {
        Ok(entries) => {
            for entry in entries.filter_map(|e| e.ok()) {
                let path = entry.path();
                if path.is_file() && path.extension().is_some_and(|e| e == LEVEL_FILE_EXTENSION) {
                    let name = path
                        .file_stem()
                        .map(|s| s.to_string_lossy().to_string())
                        .unwrap_or_else(|| "unnamed".to_string());
                    levels.push(LevelFileInfo { name, path });
                }
            }
        }
        Err(e) => log::warn!("Could not list levels in {}: {}", dir.display(), e),
    }

    levels.sort_by(|a, b| a.name.cmp(&b.name));
    levels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::full_catalog;

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("level.lvl");
        let catalog = full_catalog();

        let mut doc = LevelDocument::create_empty(5, 4, &catalog).unwrap();
        doc.set_name("Saved");
        doc.set_star_thresholds([1, 2, 3, 4, 5]);
        save_level(&doc, &path).unwrap();

        let loaded = load_level(&path, &catalog).unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_level(dir.path().join("missing.lvl"), &full_catalog()).unwrap_err();
        assert!(matches!(err, LevelFileError::FileUnreadable { .. }));
    }

    #[test]
    fn test_invalid_document_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.lvl");
        let catalog = full_catalog();

        let mut doc = LevelDocument::create_empty(1, 1, &catalog).unwrap();
        doc.set_cell(0, 0, crate::cell::Cell::new(catalog.lookup("X").unwrap()))
            .unwrap();
        assert!(matches!(save_level(&doc, &path), Err(LevelFileError::InvalidBlockIds(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_save_to_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = full_catalog();
        let doc = LevelDocument::create_empty(1, 1, &catalog).unwrap();
        let err = save_level(&doc, dir.path().join("nope/level.lvl")).unwrap_err();
        assert!(matches!(err, LevelFileError::FileUnwritable { .. }));
    }

    #[test]
    fn test_bundled_levels_load() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets");
        let items = fs::read_to_string(root.join("bbb_item_types.txt")).unwrap();
        let catalog = Catalog::load_file(root.join("bbb_block_types.txt"), None)
            .unwrap()
            .with_items(crate::catalog::ItemCatalog::parse(&items).unwrap());

        let levels = discover_levels(root.join("levels"));
        assert!(!levels.is_empty());
        for info in levels {
            let doc = load_level(&info.path, &catalog).unwrap();
            assert!(doc.validate().is_ok(), "{}", info.name);
        }
    }

    #[test]
    fn test_discover_levels() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.lvl", "a.lvl", "notes.txt"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        fs::create_dir(dir.path().join("c.lvl")).unwrap();

        let names: Vec<_> = discover_levels(dir.path()).into_iter().map(|l| l.name).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(discover_levels(dir.path().join("missing")).is_empty());
    }
}
