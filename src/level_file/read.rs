//! Level file decoding
//!
//! Reading happens in three phases over whitespace separated tokens:
//! the header (name line, then width and height), exactly `width * height`
//! grid tokens in row-major order, and an optional trailer holding the star
//! milestones and item drop likelihoods in either order. Older files without
//! a name line or with the item lines first are still accepted.

use std::str::SplitWhitespace;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::cell::{decode_cell, Likelihood};
use crate::document::{dimensions_in_range, LevelDocument, StarThresholds, STAR_COUNT};
use crate::error::LevelFileError;

/// Trailer keyword introducing the five star milestones
pub const STARS_KEYWORD: &str = "STARS:";
/// Trailer keyword marking a boss level
pub const BOSS_KEYWORD: &str = "BOSS:";
/// Trailer keyword followed by the paddle start position
pub const PADDLE_START_KEYWORD: &str = "PADDLE_START_X:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeaderStyle {
    /// Name line followed by the dimensions
    Named,
    /// Dimensions only, from before levels had names
    Unnamed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrailerOrder {
    StarsFirst,
    ItemsFirst,
    /// Nothing follows the grid
    Absent,
}

/// The file layout a level was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatVariant {
    pub header: HeaderStyle,
    pub trailer: TrailerOrder,
}

impl FormatVariant {
    /// The layout every write produces
    pub const NEWEST: FormatVariant = FormatVariant {
        header: HeaderStyle::Named,
        trailer: TrailerOrder::StarsFirst,
    };
}

/// Decode level file text into a document
pub fn decode_level(text: &str, catalog: &Catalog) -> Result<LevelDocument, LevelFileError> {
    decode_level_with_variant(text, catalog).map(|(doc, _)| doc)
}

/// Decode level file text, also reporting which layout it was written in
pub fn decode_level_with_variant(
    text: &str,
    catalog: &Catalog,
) -> Result<(LevelDocument, FormatVariant), LevelFileError> {
    let (header, name, body) = split_header(text);
    let mut tokens = body.split_whitespace();

    // Header
    let width = next_dimension(&mut tokens)?;
    let height = next_dimension(&mut tokens)?;
    if width < 1 || height < 1 || !dimensions_in_range(width as usize, height as usize) {
        return Err(LevelFileError::DimensionOutOfRange { width, height });
    }
    let (width, height) = (width as usize, height as usize);

    // Grid
    let expected = width * height;
    let mut rows = Vec::with_capacity(height);
    for row in 0..height {
        let mut cells = Vec::with_capacity(width);
        for col in 0..width {
            let token = tokens.next().ok_or(LevelFileError::GridSizeMismatch {
                expected,
                found: row * width + col,
            })?;
            let cell = decode_cell(token, catalog).map_err(|e| LevelFileError::at_cell(row, col, e))?;
            cells.push(cell);
        }
        rows.push(cells);
    }

    let mut doc = LevelDocument::from_rows(name, width, rows, catalog);

    // Trailer
    let mut tokens = tokens.peekable();
    let trailer = match tokens.peek() {
        None => TrailerOrder::Absent,
        Some(&STARS_KEYWORD) => TrailerOrder::StarsFirst,
        Some(_) => TrailerOrder::ItemsFirst,
    };
    let variant = FormatVariant { header, trailer };
    log::debug!("Level '{}' is {}x{} in format {:?}", doc.name(), width, height, variant);

    let mut has_boss = false;
    while let Some(token) = tokens.next() {
        match token {
            STARS_KEYWORD => {
                let mut values = [0i32; STAR_COUNT];
                for value in &mut values {
                    *value = parse_trailer_value(tokens.next(), "STARS")?;
                }
                if StarThresholds::needs_clamping(&values) {
                    log::warn!("Star thresholds {:?} are negative or not ascending, raising them", values);
                }
                doc.set_star_thresholds(values);
            }
            BOSS_KEYWORD => has_boss = true,
            PADDLE_START_KEYWORD => {
                let x: f64 = parse_trailer_value(tokens.next(), "PADDLE_START_X")?;
                doc.set_paddle_start_x(Some(x));
            }
            item_name => {
                let known = catalog.items().is_empty() || catalog.items().contains(item_name);
                if known {
                    let likelihood: i64 = parse_trailer_value(tokens.next(), "item drop")?;
                    doc.set_item_drop(item_name, Likelihood::from_clamped(likelihood));
                } else {
                    log::warn!("Skipping unknown item '{}' in level trailer", item_name);
                    if tokens.peek().is_some_and(|t| t.parse::<i64>().is_ok()) {
                        tokens.next();
                    }
                }
            }
        }
    }

    if has_boss {
        doc.set_has_boss(true);
    }

    Ok((doc, variant))
}

/// Separate the optional name line from the rest of the file
fn split_header(text: &str) -> (HeaderStyle, String, &str) {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let first = lines.next().unwrap_or_default();
    let second = lines.next().unwrap_or_default();

    // A name that looks like dimensions is followed by the real dimension line
    let named_like_dimensions = dimension_line(second).is_some_and(|(w, h)| {
        w >= 1 && h >= 1 && dimensions_in_range(w as usize, h as usize)
    });
    if dimension_line(first).is_some() && !named_like_dimensions {
        return (HeaderStyle::Unnamed, String::new(), text);
    }

    match text.split_once('\n') {
        Some((name, rest)) => (HeaderStyle::Named, name.trim_end_matches('\r').to_string(), rest),
        None => (HeaderStyle::Named, text.trim_end_matches('\r').to_string(), ""),
    }
}

/// Width and height if `line` holds exactly two integers
fn dimension_line(line: &str) -> Option<(i64, i64)> {
    let mut fields = line.split_whitespace().map(str::parse::<i64>);
    match (fields.next(), fields.next(), fields.next()) {
        (Some(Ok(w)), Some(Ok(h)), None) => Some((w, h)),
        _ => None,
    }
}

fn next_dimension(tokens: &mut SplitWhitespace<'_>) -> Result<i64, LevelFileError> {
    tokens
        .next()
        .and_then(|t| t.parse().ok())
        .ok_or(LevelFileError::TruncatedHeader)
}

fn parse_trailer_value<T: std::str::FromStr>(
    token: Option<&str>,
    section: &'static str,
) -> Result<T, LevelFileError> {
    let token = token.unwrap_or_default();
    token.parse().map_err(|_| LevelFileError::MalformedTrailer {
        section,
        token: token.to_string(),
    })
}
