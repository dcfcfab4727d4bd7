//! Item types that can drop from item-drop blocks
//!
//! Resource format, one entry per pair of lines:
//!
//! ```text
//! + Ball Grow
//! Makes the ball bigger
//! ```
//!
//! The leading character is `+` (power-up), `~` (neutral) or `-` (power-down).

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Whether an item helps, hinders or does neither
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    PowerUp,
    Neutral,
    PowerDown,
}

impl ItemKind {
    fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "+" => Some(ItemKind::PowerUp),
            "~" => Some(ItemKind::Neutral),
            "-" => Some(ItemKind::PowerDown),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemType {
    pub name: String,
    pub description: String,
    pub kind: ItemKind,
}

/// All item types known to the editor, in resource order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemCatalog {
    items: Vec<ItemType>,
}

impl ItemCatalog {
    /// Parse the item type resource. Any malformed entry fails the whole load.
    pub fn parse(text: &str) -> Result<Self, CatalogError> {
        let mut items = Vec::new();
        let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l.trim()));

        while let Some((line_no, line)) = lines.next() {
            if line.is_empty() {
                continue;
            }

            let (marker, name) = match line.split_once(char::is_whitespace) {
                Some((marker, name)) => (marker, name.trim()),
                None => return Err(CatalogError::MalformedItemEntry(line_no)),
            };
            let kind = ItemKind::from_marker(marker)
                .ok_or(CatalogError::MalformedItemEntry(line_no))?;
            if name.is_empty() {
                return Err(CatalogError::MalformedItemEntry(line_no));
            }

            let description = match lines.next() {
                Some((_, desc)) if !desc.is_empty() => desc.to_string(),
                _ => return Err(CatalogError::MalformedItemEntry(line_no)),
            };

            items.push(ItemType {
                name: name.to_string(),
                description,
                kind,
            });
        }

        Ok(Self { items })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.iter().any(|item| item.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&ItemType> {
        self.items.iter().find(|item| item.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemType> {
        self.items.iter()
    }

    /// Items of one kind, in resource order
    pub fn of_kind(&self, kind: ItemKind) -> impl Iterator<Item = &ItemType> {
        self.items.iter().filter(move |item| item.kind == kind)
    }
}
