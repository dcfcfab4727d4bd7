//! Cell token encoding, the exact inverse of `decode_cell`
//!
//! Encoding does not check portal and tesla ids; documents are validated
//! before they are written.

use std::fmt::Write;

use super::types::*;

/// Encode a cell as a grid token in the newest format
pub fn encode_cell(cell: &Cell) -> String {
    let mut out = String::from(cell.symbol());

    match cell.payload() {
        CellPayload::Plain => {}
        CellPayload::Portal(link) => {
            let _ = write!(out, "({},{}", link.block_id, link.sibling_id);
            if link.flips_paddle {
                out.push_str(",f");
            }
            out.push(')');
        }
        CellPayload::Tesla(link) => {
            let _ = write!(
                out,
                "({},{},{}",
                flag(link.starts_on),
                flag(link.changeable),
                link.block_id
            );
            for sibling in &link.sibling_ids {
                out.push(',');
                out.push(*sibling);
            }
            out.push(')');
        }
        CellPayload::Drops(table) => {
            out.push('(');
            for (i, (name, settings)) in table.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                if settings.only_if_unlocked {
                    out.push_str("*,");
                }
                let _ = write!(out, "{}({})", name, settings.likelihood.value());
            }
            out.push(')');
        }
        CellPayload::Cannon(angles) => {
            if angles.is_fixed() {
                let _ = write!(out, "({})", angles.min());
            } else {
                let _ = write!(out, "({}-{})", angles.min(), angles.max());
            }
        }
        CellPayload::Switch(target) => {
            let _ = write!(out, "({})", target);
        }
        CellPayload::Warp(warp) => {
            // Debug formatting keeps the ".0" on whole numbers
            let _ = write!(
                out,
                "({:?},{:?},{},{})",
                warp.start_time, warp.end_time, warp.world_name, warp.level_number
            );
        }
    }

    if let Some(trigger_id) = cell.trigger_id() {
        let _ = write!(out, "{{{}}}", trigger_id);
    }

    out
}

fn flag(value: bool) -> char {
    if value {
        '1'
    } else {
        '0'
    }
}
