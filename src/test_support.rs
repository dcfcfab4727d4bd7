//! Catalogs shared by unit tests

use crate::catalog::{Catalog, ItemCatalog};

const PIECES: &str = "\
Empty
images/empty.png
0

Solid Block
images/solid.png
S

Portal
images/portal.png
X

Tesla Coil
images/tesla.png
A

Item Drop
images/item_drop.png
D

Always Drop
images/always_drop.png
K

Cannon
images/cannon.png
C

One Shot Cannon
images/one_shot_cannon.png
CO

Switch
images/switch.png
W

Warp Portal
images/warp_portal.png
P
";

const ITEMS: &str = "\
+ ballgrow
Makes the ball bigger
- gravity
Pulls the ball towards the paddle
~ slowball
Slows the ball down
";

/// Every piece kind, without item types
pub fn piece_catalog() -> Catalog {
    Catalog::load(PIECES, None).unwrap()
}

/// Every piece kind plus three item types
pub fn full_catalog() -> Catalog {
    piece_catalog().with_items(ItemCatalog::parse(ITEMS).unwrap())
}
