//! Editor configuration
//!
//! Stored as RON so it can be edited by hand alongside the catalog resources.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, ItemCatalog};
use crate::error::{CatalogError, ConfigError};

/// Default name of the configuration file
pub const CONFIG_FILE_NAME: &str = "bbb_level.ron";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Piece catalog resource
    pub block_types: PathBuf,
    /// Item type resource; without it every item name in a level is kept
    pub item_types: Option<PathBuf>,
    /// When set, piece images are resolved under this directory and checked
    pub image_root: Option<PathBuf>,
    /// Directory scanned when no level paths are given
    pub levels_dir: PathBuf,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            block_types: PathBuf::from("assets/bbb_block_types.txt"),
            item_types: Some(PathBuf::from("assets/bbb_item_types.txt")),
            image_root: None,
            levels_dir: PathBuf::from("assets/levels"),
        }
    }
}

impl EditorConfig {
    /// Load a configuration file; a missing file gives the defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        Ok(ron::from_str(&contents)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let config = ron::ser::PrettyConfig::new()
            .depth_limit(2)
            .indentor("  ".to_string());

        let contents = ron::ser::to_string_pretty(self, config)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Build the catalog this configuration points at
    pub fn load_catalog(&self) -> Result<Catalog, CatalogError> {
        let catalog = Catalog::load_file(&self.block_types, self.image_root.as_deref())?;
        match &self.item_types {
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|source| CatalogError::UnreadableResource {
                    path: path.clone(),
                    source,
                })?;
                Ok(catalog.with_items(ItemCatalog::parse(&text)?))
            }
            None => Ok(catalog),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EditorConfig::load(dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let config = EditorConfig {
            block_types: "blocks.txt".into(),
            item_types: None,
            image_root: Some("art".into()),
            levels_dir: "levels".into(),
        };
        config.save(&path).unwrap();
        assert_eq!(EditorConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "(levels_dir: \"mine\")").unwrap();
        let config = EditorConfig::load(&path).unwrap();
        assert_eq!(config.levels_dir, PathBuf::from("mine"));
        assert_eq!(config.block_types, EditorConfig::default().block_types);
    }

    #[test]
    fn test_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "(levels_dir: 5").unwrap();
        assert!(matches!(EditorConfig::load(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_catalog_from_resources() {
        let dir = tempfile::tempdir().unwrap();
        let blocks = dir.path().join("blocks.txt");
        let items = dir.path().join("items.txt");
        fs::write(&blocks, "Empty\nempty.png\n0\n\nPortal\nportal.png\nX\n").unwrap();
        fs::write(&items, "+ ballgrow\nBigger ball\n").unwrap();

        let config = EditorConfig {
            block_types: blocks,
            item_types: Some(items),
            image_root: None,
            levels_dir: dir.path().to_path_buf(),
        };
        let catalog = config.load_catalog().unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.items().contains("ballgrow"));
    }
}
