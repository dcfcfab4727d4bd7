//! Piece definitions and the symbols that carry extra per-cell parameters

use serde::{Deserialize, Serialize};

/// Symbol of the portal block, `X(<id>,<sibling>)`
pub const PORTAL_SYMBOL: &str = "X";
/// Symbol of the tesla block, `A(<on>,<changeable>,<id>,<siblings>...)`
pub const TESLA_SYMBOL: &str = "A";
/// Symbol of the random item drop block, `D(<items>...)`
pub const ITEM_DROP_SYMBOL: &str = "D";
/// Symbol of the always-drop block, `K(<items>...)`
pub const ALWAYS_DROP_SYMBOL: &str = "K";
/// Symbol of the cannon block, `C(<angle>)` or `C(<min>-<max>)`
pub const CANNON_SYMBOL: &str = "C";
/// Symbol of the one-shot cannon block (same parameters as the cannon)
pub const ONE_SHOT_CANNON_SYMBOL: &str = "CO";
/// Symbol of the switch block, `W(<trigger>)`
pub const SWITCH_SYMBOL: &str = "W";
/// Symbol of the warp portal block, `P(<start>,<end>,<world>,<level>)`
pub const WARP_PORTAL_SYMBOL: &str = "P";

/// Semantic category of a piece, decides which parameters a cell carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Empty,
    Solid,
    Portal,
    Tesla,
    ItemDrop,
    AlwaysDrop,
    Cannon,
    OneShotCannon,
    Switch,
    WarpPortal,
}

impl PieceKind {
    /// Kind for a catalog symbol. Parameterised kinds are recognised by their
    /// well-known symbols; the first catalog entry is the empty piece.
    pub fn for_symbol(symbol: &str, is_default: bool) -> Self {
        match symbol {
            PORTAL_SYMBOL => PieceKind::Portal,
            TESLA_SYMBOL => PieceKind::Tesla,
            ITEM_DROP_SYMBOL => PieceKind::ItemDrop,
            ALWAYS_DROP_SYMBOL => PieceKind::AlwaysDrop,
            CANNON_SYMBOL => PieceKind::Cannon,
            ONE_SHOT_CANNON_SYMBOL => PieceKind::OneShotCannon,
            SWITCH_SYMBOL => PieceKind::Switch,
            WARP_PORTAL_SYMBOL => PieceKind::WarpPortal,
            _ if is_default => PieceKind::Empty,
            _ => PieceKind::Solid,
        }
    }

    /// True for kinds whose cells carry block ids (portal and tesla)
    pub fn has_block_ids(self) -> bool {
        matches!(self, PieceKind::Portal | PieceKind::Tesla)
    }

    pub fn is_drop(self) -> bool {
        matches!(self, PieceKind::ItemDrop | PieceKind::AlwaysDrop)
    }

    pub fn is_cannon(self) -> bool {
        matches!(self, PieceKind::Cannon | PieceKind::OneShotCannon)
    }

    /// True if tokens of this kind may carry a parenthesised parameter list
    pub fn takes_parameters(self) -> bool {
        !matches!(self, PieceKind::Empty | PieceKind::Solid)
    }
}

/// A catalog entry: one paintable piece
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceDefinition {
    /// Name shown in the piece list
    pub display_name: String,
    /// Symbol written to level files
    pub symbol: String,
    /// Image path as listed in the catalog resource
    pub image_ref: String,
    pub kind: PieceKind,
    /// Pixel size of the image, when it was resolved at load time
    #[serde(default)]
    pub image_size: Option<(u32, u32)>,
}

impl PieceDefinition {
    pub fn new(display_name: &str, image_ref: &str, symbol: &str, is_default: bool) -> Self {
        Self {
            display_name: display_name.to_string(),
            symbol: symbol.to_string(),
            image_ref: image_ref.to_string(),
            kind: PieceKind::for_symbol(symbol, is_default),
            image_size: None,
        }
    }
}
