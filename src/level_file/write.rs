//! Level file encoding, always in the newest layout

use std::fmt::Write;

use super::read::{BOSS_KEYWORD, PADDLE_START_KEYWORD, STARS_KEYWORD};
use crate::cell::encode_cell;
use crate::document::LevelDocument;
use crate::error::LevelFileError;

const NEWLINE: &str = "\r\n";

/// Encode a document as level file text. Documents that fail validation are
/// refused, with every offending cell listed.
pub fn encode_level(doc: &LevelDocument) -> Result<String, LevelFileError> {
    let name = doc.name();
    if name.contains(['\r', '\n']) || (!name.is_empty() && name.trim().is_empty()) {
        return Err(LevelFileError::InvalidName(name.to_string()));
    }
    doc.validate().map_err(LevelFileError::InvalidBlockIds)?;

    let mut out = String::new();
    let _ = write!(out, "{}{}", doc.name(), NEWLINE);
    let _ = write!(out, "{} {}{}", doc.width(), doc.height(), NEWLINE);

    for row in doc.rows() {
        for cell in row {
            out.push_str(&encode_cell(cell));
            out.push(' ');
        }
        out.push_str(NEWLINE);
    }
    out.push_str(NEWLINE);

    let _ = write!(out, "{}{}", STARS_KEYWORD, NEWLINE);
    for value in doc.star_thresholds().values() {
        let _ = write!(out, "{}{}", value, NEWLINE);
    }
    out.push_str(NEWLINE);

    for (name, likelihood) in doc.item_drops() {
        let _ = write!(out, "{} {}{}", name, likelihood.value(), NEWLINE);
    }

    if doc.has_boss() {
        let _ = write!(out, "{}{}", BOSS_KEYWORD, NEWLINE);
    }
    if let Some(x) = doc.paddle_start_x() {
        let _ = write!(out, "{}{}{}{}", PADDLE_START_KEYWORD, NEWLINE, x, NEWLINE);
    }

    Ok(out)
}
