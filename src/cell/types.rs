//! Structured cell values
//!
//! Pure data with the kind-specific parameters each piece carries.
//! Parsing lives in `decode`, formatting in `encode`.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::catalog::{PieceDefinition, PieceKind};
use crate::error::CellError;

/// Trigger id of a cell that is not linked to any triggerable event
pub const NO_TRIGGER_ID: i32 = -1;

/// Placeholder for a portal or tesla id that has not been assigned yet
pub const INVALID_BLOCK_ID: char = '\0';

/// Warp portal destination used when a warp portal is first placed
pub const DEFAULT_WARP_WORLD: &str = "surrealism_dada";

/// Portal and tesla ids are single ASCII letters or digits
pub fn is_valid_block_id(id: char) -> bool {
    id.is_ascii_alphanumeric()
}

/// Warp world names sit inside a `P(...)` token, so they can not be empty or
/// hold whitespace, field separators or brackets
pub fn is_valid_world_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, ',' | '(' | ')' | '{' | '}'))
}

/// How often an item drops, None/Low/Medium/High
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Likelihood {
    None = 0,
    Low = 1,
    Medium = 2,
    High = 3,
}

impl Likelihood {
    /// Map any integer onto the 0..=3 scale
    pub fn from_clamped(value: i64) -> Self {
        match value {
            i64::MIN..=0 => Likelihood::None,
            1 => Likelihood::Low,
            2 => Likelihood::Medium,
            _ => Likelihood::High,
        }
    }

    pub fn value(self) -> u8 {
        self as u8
    }

    /// One step more likely, saturating at `High`
    pub fn increment(self) -> Self {
        Self::from_clamped(self as i64 + 1)
    }

    pub fn label(self) -> &'static str {
        match self {
            Likelihood::None => "None",
            Likelihood::Low => "Low",
            Likelihood::Medium => "Medium",
            Likelihood::High => "High",
        }
    }
}

/// Per-item settings inside an item-drop cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropSettings {
    pub likelihood: Likelihood,
    /// Only drop the item once the player has unlocked it
    pub only_if_unlocked: bool,
}

impl DropSettings {
    pub fn new(likelihood: Likelihood, only_if_unlocked: bool) -> Self {
        Self {
            likelihood,
            only_if_unlocked,
        }
    }
}

/// Item name to drop settings, ordered by name for stable output
pub type DropTable = BTreeMap<String, DropSettings>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalLink {
    pub block_id: char,
    pub sibling_id: char,
    /// Passing through flips the paddle
    pub flips_paddle: bool,
}

impl Default for PortalLink {
    fn default() -> Self {
        Self {
            block_id: INVALID_BLOCK_ID,
            sibling_id: INVALID_BLOCK_ID,
            flips_paddle: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeslaLink {
    pub block_id: char,
    pub sibling_ids: BTreeSet<char>,
    pub starts_on: bool,
    /// Whether the player can toggle the tesla on and off
    pub changeable: bool,
}

impl Default for TeslaLink {
    fn default() -> Self {
        Self {
            block_id: INVALID_BLOCK_ID,
            sibling_ids: BTreeSet::new(),
            starts_on: false,
            changeable: true,
        }
    }
}

/// Firing angle range in degrees; equal bounds is a fixed angle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CannonAngles {
    min: i32,
    max: i32,
}

impl CannonAngles {
    /// Angle written by old files to mean "fire in a random direction"
    pub const RANDOM_SENTINEL: i32 = -1;
    /// Range a random cannon is expanded to
    pub const RANDOM: CannonAngles = CannonAngles { min: 0, max: 359 };

    pub fn fixed(angle: i32) -> Self {
        Self::range(angle, angle)
    }

    /// Build a range; the random sentinel in either bound selects the full circle
    pub fn range(min: i32, max: i32) -> Self {
        if min == Self::RANDOM_SENTINEL || max == Self::RANDOM_SENTINEL {
            Self::RANDOM
        } else {
            Self { min, max }
        }
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn is_fixed(&self) -> bool {
        self.min == self.max
    }

    pub fn is_random(&self) -> bool {
        *self == Self::RANDOM
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarpTarget {
    pub start_time: f64,
    pub end_time: f64,
    pub world_name: String,
    pub level_number: i32,
}

impl Default for WarpTarget {
    fn default() -> Self {
        Self {
            start_time: 0.0,
            end_time: -1.0,
            world_name: DEFAULT_WARP_WORLD.to_string(),
            level_number: 1,
        }
    }
}

/// Kind-specific parameters of a cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellPayload {
    Plain,
    Portal(PortalLink),
    Tesla(TeslaLink),
    /// Shared by item-drop and always-drop pieces
    Drops(DropTable),
    /// Shared by cannon and one-shot cannon pieces
    Cannon(CannonAngles),
    /// Id of what the switch triggers
    Switch(i32),
    Warp(WarpTarget),
}

impl CellPayload {
    /// Parameters of a freshly placed piece of `kind`
    pub fn default_for(kind: PieceKind) -> Self {
        match kind {
            PieceKind::Empty | PieceKind::Solid => CellPayload::Plain,
            PieceKind::Portal => CellPayload::Portal(PortalLink::default()),
            PieceKind::Tesla => CellPayload::Tesla(TeslaLink::default()),
            PieceKind::ItemDrop | PieceKind::AlwaysDrop => CellPayload::Drops(DropTable::new()),
            PieceKind::Cannon | PieceKind::OneShotCannon => CellPayload::Cannon(CannonAngles::default()),
            PieceKind::Switch => CellPayload::Switch(0),
            PieceKind::WarpPortal => CellPayload::Warp(WarpTarget::default()),
        }
    }

    pub fn fits(&self, kind: PieceKind) -> bool {
        match self {
            CellPayload::Plain => !kind.takes_parameters(),
            CellPayload::Portal(_) => kind == PieceKind::Portal,
            CellPayload::Tesla(_) => kind == PieceKind::Tesla,
            CellPayload::Drops(_) => kind.is_drop(),
            CellPayload::Cannon(_) => kind.is_cannon(),
            CellPayload::Switch(_) => kind == PieceKind::Switch,
            CellPayload::Warp(_) => kind == PieceKind::WarpPortal,
        }
    }
}

/// One grid position: the piece placed there plus its parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    symbol: String,
    kind: PieceKind,
    payload: CellPayload,
    trigger_id: i32,
}

impl Cell {
    /// A cell holding `piece` with default parameters and no trigger id
    pub fn new(piece: &PieceDefinition) -> Self {
        Self {
            symbol: piece.symbol.clone(),
            kind: piece.kind,
            payload: CellPayload::default_for(piece.kind),
            trigger_id: NO_TRIGGER_ID,
        }
    }

    /// A cell holding `piece` with explicit parameters, which must suit its kind
    pub fn with_payload(piece: &PieceDefinition, payload: CellPayload) -> Result<Self, CellError> {
        if !payload.fits(piece.kind) {
            return Err(CellError::malformed(
                &piece.symbol,
                format!("parameters do not suit a {:?} piece", piece.kind),
            ));
        }
        Ok(Self {
            symbol: piece.symbol.clone(),
            kind: piece.kind,
            payload,
            trigger_id: NO_TRIGGER_ID,
        })
    }

    pub fn with_trigger_id(mut self, trigger_id: i32) -> Self {
        self.trigger_id = trigger_id;
        self
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn payload(&self) -> &CellPayload {
        &self.payload
    }

    pub fn trigger_id(&self) -> Option<i32> {
        (self.trigger_id != NO_TRIGGER_ID).then_some(self.trigger_id)
    }

    pub fn set_trigger_id(&mut self, trigger_id: i32) {
        self.trigger_id = trigger_id;
    }

    pub fn clear_trigger_id(&mut self) {
        self.trigger_id = NO_TRIGGER_ID;
    }

    pub fn portal(&self) -> Option<&PortalLink> {
        match &self.payload {
            CellPayload::Portal(link) => Some(link),
            _ => None,
        }
    }

    pub fn portal_mut(&mut self) -> Option<&mut PortalLink> {
        match &mut self.payload {
            CellPayload::Portal(link) => Some(link),
            _ => None,
        }
    }

    pub fn tesla(&self) -> Option<&TeslaLink> {
        match &self.payload {
            CellPayload::Tesla(link) => Some(link),
            _ => None,
        }
    }

    pub fn tesla_mut(&mut self) -> Option<&mut TeslaLink> {
        match &mut self.payload {
            CellPayload::Tesla(link) => Some(link),
            _ => None,
        }
    }

    pub fn drops(&self) -> Option<&DropTable> {
        match &self.payload {
            CellPayload::Drops(table) => Some(table),
            _ => None,
        }
    }

    pub fn drops_mut(&mut self) -> Option<&mut DropTable> {
        match &mut self.payload {
            CellPayload::Drops(table) => Some(table),
            _ => None,
        }
    }

    pub fn cannon(&self) -> Option<CannonAngles> {
        match self.payload {
            CellPayload::Cannon(angles) => Some(angles),
            _ => None,
        }
    }

    pub fn cannon_mut(&mut self) -> Option<&mut CannonAngles> {
        match &mut self.payload {
            CellPayload::Cannon(angles) => Some(angles),
            _ => None,
        }
    }

    pub fn switch_target(&self) -> Option<i32> {
        match self.payload {
            CellPayload::Switch(id) => Some(id),
            _ => None,
        }
    }

    pub fn switch_target_mut(&mut self) -> Option<&mut i32> {
        match &mut self.payload {
            CellPayload::Switch(id) => Some(id),
            _ => None,
        }
    }

    pub fn warp(&self) -> Option<&WarpTarget> {
        match &self.payload {
            CellPayload::Warp(target) => Some(target),
            _ => None,
        }
    }

    pub fn warp_mut(&mut self) -> Option<&mut WarpTarget> {
        match &mut self.payload {
            CellPayload::Warp(target) => Some(target),
            _ => None,
        }
    }

    /// The portal or tesla id this cell registers, if any
    pub fn own_block_id(&self) -> Option<char> {
        match &self.payload {
            CellPayload::Portal(link) => Some(link.block_id),
            CellPayload::Tesla(link) => Some(link.block_id),
            _ => None,
        }
    }

    /// Ids this cell links to (one for a portal, any number for a tesla)
    pub fn sibling_ids(&self) -> Vec<char> {
        match &self.payload {
            CellPayload::Portal(link) => vec![link.sibling_id],
            CellPayload::Tesla(link) => link.sibling_ids.iter().copied().collect(),
            _ => Vec::new(),
        }
    }

    /// True unless this is a portal or tesla with an id outside `[A-Za-z0-9]`
    pub fn has_valid_block_ids(&self) -> bool {
        match self.own_block_id() {
            Some(id) => is_valid_block_id(id) && self.sibling_ids().into_iter().all(is_valid_block_id),
            None => true,
        }
    }
}
