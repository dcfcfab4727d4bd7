//! The in-memory level document: a grid of cells plus level metadata

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::cell::{Cell, Likelihood};
use crate::error::DocumentError;

/// Smallest allowed width or height
pub const MIN_DIMENSION: usize = 1;
/// Largest allowed width or height
pub const MAX_DIMENSION: usize = 500;
/// Number of star point milestones per level
pub const STAR_COUNT: usize = 5;

/// Level-wide item name to drop likelihood table
pub type ItemDropSettings = BTreeMap<String, Likelihood>;

pub fn dimensions_in_range(width: usize, height: usize) -> bool {
    (MIN_DIMENSION..=MAX_DIMENSION).contains(&width) && (MIN_DIMENSION..=MAX_DIMENSION).contains(&height)
}

/// Point milestones for the five stars, never negative and never decreasing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StarThresholds([i32; STAR_COUNT]);

impl StarThresholds {
    /// Build thresholds, raising negative values to zero and any value that
    /// is lower than the one before it
    pub fn new(mut values: [i32; STAR_COUNT]) -> Self {
        values[0] = values[0].max(0);
        for i in 1..STAR_COUNT {
            values[i] = values[i].max(values[i - 1]);
        }
        Self(values)
    }

    /// True if `values` would be changed by [`StarThresholds::new`]
    pub fn needs_clamping(values: &[i32; STAR_COUNT]) -> bool {
        values[0] < 0 || values.windows(2).any(|w| w[1] < w[0])
    }

    pub fn values(&self) -> [i32; STAR_COUNT] {
        self.0
    }

    pub fn get(&self, star: usize) -> Option<i32> {
        self.0.get(star).copied()
    }
}

/// A level being edited. Rows run top to bottom, columns left to right.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDocument {
    name: String,
    width: usize,
    height: usize,
    rows: Vec<Vec<Cell>>,
    stars: StarThresholds,
    item_drops: ItemDropSettings,
    has_boss: bool,
    /// `None` means the game's default paddle position
    paddle_start_x: Option<f64>,
}

impl LevelDocument {
    /// A new document filled with the catalog's default piece. Every item in
    /// the item catalog starts at medium drop likelihood.
    pub fn create_empty(width: usize, height: usize, catalog: &Catalog) -> Result<Self, DocumentError> {
        if !dimensions_in_range(width, height) {
            return Err(DocumentError::DimensionOutOfRange { width, height });
        }

        let blank = Cell::new(catalog.default_piece());
        Ok(Self {
            name: String::new(),
            width,
            height,
            rows: vec![vec![blank; width]; height],
            stars: StarThresholds::default(),
            item_drops: default_item_drops(catalog),
            has_boss: false,
            paddle_start_x: None,
        })
    }

    /// Assemble a document from decoded rows. The caller guarantees every row
    /// holds `width` cells.
    pub(crate) fn from_rows(name: String, width: usize, rows: Vec<Vec<Cell>>, catalog: &Catalog) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == width));
        Self {
            name,
            width,
            height: rows.len(),
            rows,
            stars: StarThresholds::default(),
            item_drops: default_item_drops(catalog),
            has_boss: false,
            paddle_start_x: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        self.rows.get_mut(row).and_then(|r| r.get_mut(col))
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Iterate `(row, col, cell)` in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, &Cell)> {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(r, row)| row.iter().enumerate().map(move |(c, cell)| (r, c, cell)))
    }

    /// Replace a cell and return the old one. Portal and tesla ids are not
    /// checked here; see [`LevelDocument::validate`].
    pub fn set_cell(&mut self, row: usize, col: usize, cell: Cell) -> Result<Cell, DocumentError> {
        let slot = self
            .cell_mut(row, col)
            .ok_or(DocumentError::OutOfBounds { row, col })?;
        Ok(std::mem::replace(slot, cell))
    }

    /// Change the grid size. Columns are added or removed on the right edge,
    /// rows are added or removed at the top. New cells hold the default piece.
    pub fn resize(&mut self, new_width: usize, new_height: usize, catalog: &Catalog) -> Result<(), DocumentError> {
        if !dimensions_in_range(new_width, new_height) {
            return Err(DocumentError::DimensionOutOfRange {
                width: new_width,
                height: new_height,
            });
        }

        let blank = Cell::new(catalog.default_piece());

        if new_width != self.width {
            for row in &mut self.rows {
                row.resize(new_width, blank.clone());
            }
            self.width = new_width;
        }

        if new_height < self.height {
            self.rows.drain(..self.height - new_height);
        } else if new_height > self.height {
            let mut grown = vec![vec![blank; new_width]; new_height - self.height];
            grown.append(&mut self.rows);
            self.rows = grown;
        }
        self.height = new_height;

        Ok(())
    }

    pub fn star_thresholds(&self) -> StarThresholds {
        self.stars
    }

    pub fn set_star_thresholds(&mut self, values: [i32; STAR_COUNT]) {
        self.stars = StarThresholds::new(values);
    }

    pub fn item_drops(&self) -> &ItemDropSettings {
        &self.item_drops
    }

    pub fn set_item_drop(&mut self, name: impl Into<String>, likelihood: Likelihood) {
        self.item_drops.insert(name.into(), likelihood);
    }

    pub fn has_boss(&self) -> bool {
        self.has_boss
    }

    /// Boss levels award no stars, so enabling the boss zeroes the thresholds
    pub fn set_has_boss(&mut self, has_boss: bool) {
        self.has_boss = has_boss;
        if has_boss {
            self.stars = StarThresholds::default();
        }
    }

    pub fn paddle_start_x(&self) -> Option<f64> {
        self.paddle_start_x
    }

    /// Set the paddle start position; negative values select the default
    pub fn set_paddle_start_x(&mut self, x: Option<f64>) {
        self.paddle_start_x = x.filter(|x| *x >= 0.0);
    }
}

fn default_item_drops(catalog: &Catalog) -> ItemDropSettings {
    catalog
        .items()
        .iter()
        .map(|item| (item.name.clone(), Likelihood::Medium))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::full_catalog;

    fn marked(catalog: &Catalog) -> LevelDocument {
        // 3x2 grid where each cell carries its own position as a trigger id
        let mut doc = LevelDocument::create_empty(3, 2, catalog).unwrap();
        let solid = catalog.lookup("S").unwrap();
        for row in 0..2 {
            for col in 0..3 {
                let cell = Cell::new(solid).with_trigger_id((row * 10 + col) as i32);
                doc.set_cell(row, col, cell).unwrap();
            }
        }
        doc
    }

    #[test]
    fn test_create_empty() {
        let catalog = full_catalog();
        let doc = LevelDocument::create_empty(4, 3, &catalog).unwrap();
        assert_eq!(doc.width(), 4);
        assert_eq!(doc.height(), 3);
        assert!(doc.cells().all(|(_, _, c)| c.symbol() == "0" && c.trigger_id().is_none()));
        assert_eq!(doc.item_drops().len(), catalog.items().len());
        assert!(doc.item_drops().values().all(|l| *l == Likelihood::Medium));
        assert_eq!(doc.paddle_start_x(), None);
    }

    #[test]
    fn test_dimension_limits() {
        let catalog = full_catalog();
        assert!(LevelDocument::create_empty(1, 1, &catalog).is_ok());
        assert!(LevelDocument::create_empty(500, 500, &catalog).is_ok());
        assert_eq!(
            LevelDocument::create_empty(501, 10, &catalog),
            Err(DocumentError::DimensionOutOfRange { width: 501, height: 10 })
        );
        assert!(LevelDocument::create_empty(10, 0, &catalog).is_err());
    }

    #[test]
    fn test_set_cell_returns_old() {
        let catalog = full_catalog();
        let mut doc = LevelDocument::create_empty(2, 2, &catalog).unwrap();
        let old = doc.set_cell(1, 0, Cell::new(catalog.lookup("S").unwrap())).unwrap();
        assert_eq!(old.symbol(), "0");
        assert_eq!(doc.cell(1, 0).unwrap().symbol(), "S");
        assert_eq!(
            doc.set_cell(2, 0, old),
            Err(DocumentError::OutOfBounds { row: 2, col: 0 })
        );
    }

    #[test]
    fn test_width_changes_on_right_edge() {
        let catalog = full_catalog();
        let mut doc = marked(&catalog);
        doc.resize(4, 2, &catalog).unwrap();
        assert_eq!(doc.cell(0, 2).unwrap().trigger_id(), Some(2));
        assert_eq!(doc.cell(0, 3).unwrap().symbol(), "0");

        doc.resize(2, 2, &catalog).unwrap();
        assert_eq!(doc.width(), 2);
        assert_eq!(doc.cell(1, 1).unwrap().trigger_id(), Some(11));
        assert!(doc.cell(1, 2).is_none());
    }

    #[test]
    fn test_height_changes_at_top() {
        let catalog = full_catalog();
        let mut doc = marked(&catalog);
        doc.resize(3, 4, &catalog).unwrap();
        assert_eq!(doc.height(), 4);
        assert_eq!(doc.cell(0, 0).unwrap().symbol(), "0");
        assert_eq!(doc.cell(1, 0).unwrap().symbol(), "0");
        assert_eq!(doc.cell(2, 1).unwrap().trigger_id(), Some(1));
        assert_eq!(doc.cell(3, 2).unwrap().trigger_id(), Some(12));

        // Shrinking drops the top row first
        doc.resize(3, 1, &catalog).unwrap();
        assert_eq!(doc.cell(0, 0).unwrap().trigger_id(), Some(10));
    }

    #[test]
    fn test_resize_is_reversible() {
        let catalog = full_catalog();
        let original = marked(&catalog);

        let mut doc = original.clone();
        doc.resize(4, 2, &catalog).unwrap();
        doc.resize(3, 2, &catalog).unwrap();
        assert_eq!(doc, original);

        doc.resize(3, 5, &catalog).unwrap();
        doc.resize(3, 2, &catalog).unwrap();
        assert_eq!(doc, original);
    }

    #[test]
    fn test_resize_rejects_out_of_range() {
        let catalog = full_catalog();
        let mut doc = marked(&catalog);
        assert!(doc.resize(501, 2, &catalog).is_err());
        assert_eq!(doc.width(), 3);
    }

    #[test]
    fn test_star_thresholds_clamp_upward() {
        let stars = StarThresholds::new([100, 50, 300, 200, 400]);
        assert_eq!(stars.values(), [100, 100, 300, 300, 400]);
        assert!(StarThresholds::needs_clamping(&[5, 4, 6, 7, 8]));
        assert!(!StarThresholds::needs_clamping(&[1, 1, 2, 3, 3]));
    }

    #[test]
    fn test_negative_star_thresholds_raised_to_zero() {
        assert!(StarThresholds::needs_clamping(&[-5, 10, 20, 30, 40]));
        let stars = StarThresholds::new([-5, -2, 20, -1, 40]);
        assert_eq!(stars.values(), [0, 0, 20, 20, 40]);
    }

    #[test]
    fn test_boss_clears_stars() {
        let catalog = full_catalog();
        let mut doc = LevelDocument::create_empty(1, 1, &catalog).unwrap();
        doc.set_star_thresholds([1, 2, 3, 4, 5]);
        doc.set_has_boss(true);
        assert_eq!(doc.star_thresholds().values(), [0; 5]);
    }

    #[test]
    fn test_negative_paddle_position_means_default() {
        let catalog = full_catalog();
        let mut doc = LevelDocument::create_empty(1, 1, &catalog).unwrap();
        doc.set_paddle_start_x(Some(12.5));
        assert_eq!(doc.paddle_start_x(), Some(12.5));
        doc.set_paddle_start_x(Some(-1.0));
        assert_eq!(doc.paddle_start_x(), None);
    }
}
