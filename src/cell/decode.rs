//! Cell token decoding
//!
//! A token is `SYMBOL[(params)][{trigger}]`. The trigger suffix is stripped
//! first, then the symbol is split from its parameter list and resolved in
//! the catalog, and finally the parameters are parsed according to the kind
//! of piece the symbol names.

use std::collections::BTreeSet;

use crate::catalog::{Catalog, PieceKind};
use crate::error::CellError;

use super::types::*;

/// The item-drop parameter syntaxes written by different editor revisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropSyntax {
    /// `D(a,b,a)`: names only, repeating a name raises its likelihood
    Repetition,
    /// `D(a(2),b(1))` or `D(a,2,b,1)`: explicit likelihood per name
    Likelihood,
    /// Like `Likelihood`, with `*` marking items that must be unlocked first
    Unlockable,
}

/// Token split into its syntactic parts
struct TokenParts<'a> {
    symbol: &'a str,
    params: Option<&'a str>,
    /// Text after the closing parenthesis (only portals use it)
    tail: &'a str,
    trigger_id: i32,
}

/// Decode one whitespace-delimited grid token
pub fn decode_cell(token: &str, catalog: &Catalog) -> Result<Cell, CellError> {
    let parts = split_token(token)?;
    let piece = catalog.lookup(parts.symbol)?;

    if !parts.tail.is_empty() && piece.kind != PieceKind::Portal {
        return Err(CellError::malformed(token, "unexpected text after the parameter list"));
    }

    let payload = match piece.kind {
        PieceKind::Empty | PieceKind::Solid => match parts.params {
            Some(_) => return Err(CellError::malformed(token, "piece takes no parameters")),
            None => CellPayload::Plain,
        },
        PieceKind::Portal => CellPayload::Portal(decode_portal(token, parts.params, parts.tail)?),
        PieceKind::Tesla => CellPayload::Tesla(decode_tesla(token, parts.params)?),
        PieceKind::ItemDrop | PieceKind::AlwaysDrop => {
            CellPayload::Drops(decode_drops(token, parts.params.unwrap_or(""))?)
        }
        PieceKind::Cannon | PieceKind::OneShotCannon => {
            CellPayload::Cannon(decode_cannon(token, parts.params)?)
        }
        PieceKind::Switch => CellPayload::Switch(match parts.params {
            Some(p) => parse_int(token, p, "switch trigger id")?,
            None => 0,
        }),
        PieceKind::WarpPortal => CellPayload::Warp(decode_warp(token, parts.params)?),
    };

    Ok(Cell::with_payload(piece, payload)?.with_trigger_id(parts.trigger_id))
}

fn split_token(token: &str) -> Result<TokenParts<'_>, CellError> {
    let (body, trigger_id) = match token.strip_suffix('}') {
        Some(rest) => {
            let open = rest
                .rfind('{')
                .ok_or_else(|| CellError::malformed(token, "unmatched '}'"))?;
            let id = parse_int(token, &rest[open + 1..], "trigger id")?;
            (&rest[..open], id)
        }
        None => (token, NO_TRIGGER_ID),
    };

    if body.contains(['{', '}']) {
        return Err(CellError::malformed(token, "misplaced trigger id braces"));
    }

    let (symbol, params, tail) = match body.find('(') {
        Some(open) => {
            let close = body
                .rfind(')')
                .filter(|&close| close > open)
                .ok_or_else(|| CellError::malformed(token, "unterminated parameter list"))?;
            (&body[..open], Some(&body[open + 1..close]), &body[close + 1..])
        }
        None if body.contains(')') => {
            return Err(CellError::malformed(token, "unmatched ')'"));
        }
        None => (body, None, ""),
    };

    if symbol.is_empty() {
        return Err(CellError::malformed(token, "missing piece symbol"));
    }

    Ok(TokenParts {
        symbol,
        params,
        tail,
        trigger_id,
    })
}

fn parse_int(token: &str, field: &str, what: &str) -> Result<i32, CellError> {
    field
        .trim()
        .parse()
        .map_err(|_| CellError::malformed(token, format!("{} '{}' is not an integer", what, field)))
}

fn parse_float(token: &str, field: &str, what: &str) -> Result<f64, CellError> {
    field
        .trim()
        .parse()
        .map_err(|_| CellError::malformed(token, format!("{} '{}' is not a number", what, field)))
}

fn single_char(token: &str, field: &str) -> Result<char, CellError> {
    let mut chars = field.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(CellError::malformed(token, format!("block id '{}' must be one character", field))),
    }
}

fn parse_flag(token: &str, field: &str) -> Result<bool, CellError> {
    match field {
        "1" => Ok(true),
        "0" => Ok(false),
        _ => Err(CellError::malformed(token, format!("expected 0 or 1, found '{}'", field))),
    }
}

fn split_fields(params: &str) -> Vec<&str> {
    params.split(',').map(str::trim).collect()
}

fn decode_portal(token: &str, params: Option<&str>, tail: &str) -> Result<PortalLink, CellError> {
    let params = params.ok_or_else(|| CellError::malformed(token, "portal needs an id and a sibling id"))?;

    let (id, sibling, flag_inside) = match split_fields(params).as_slice() {
        [id, sibling] => (*id, *sibling, false),
        [id, sibling, "f"] => (*id, *sibling, true),
        _ => return Err(CellError::malformed(token, "portal takes exactly one sibling id")),
    };

    let flag_after = match tail {
        "" => false,
        "f" => true,
        _ => return Err(CellError::malformed(token, "unexpected text after the parameter list")),
    };

    Ok(PortalLink {
        block_id: single_char(token, id)?,
        sibling_id: single_char(token, sibling)?,
        flips_paddle: flag_inside || flag_after,
    })
}

fn decode_tesla(token: &str, params: Option<&str>) -> Result<TeslaLink, CellError> {
    let params = params.ok_or_else(|| CellError::malformed(token, "tesla needs a state, an id and siblings"))?;
    let fields = split_fields(params);
    if fields.len() < 3 {
        return Err(CellError::malformed(token, "tesla needs a state, an id and at least one sibling"));
    }

    let starts_on = parse_flag(token, fields[0])?;

    // Older files have no changeable flag: A(<on>,<id>,<siblings>...)
    let legacy = fields.len() == 3 || !matches!(fields[1], "0" | "1");
    let (changeable, id_field, sibling_fields) = if legacy {
        log::debug!("Tesla '{}' uses the parameter order without a changeable flag", token);
        (true, fields[1], &fields[2..])
    } else {
        (parse_flag(token, fields[1])?, fields[2], &fields[3..])
    };

    let sibling_ids = sibling_fields
        .iter()
        .map(|f| single_char(token, f))
        .collect::<Result<BTreeSet<_>, _>>()?;
    if sibling_ids.is_empty() {
        return Err(CellError::malformed(token, "tesla needs at least one sibling"));
    }

    Ok(TeslaLink {
        block_id: single_char(token, id_field)?,
        sibling_ids,
        starts_on,
        changeable,
    })
}

fn item_tokens(params: &str) -> Vec<&str> {
    params
        .split(['(', ')', ','])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Work out which item-drop syntax a parameter list was written in
pub fn sniff_drop_syntax(params: &str) -> DropSyntax {
    let tokens = item_tokens(params);
    if tokens.iter().any(|t| t.starts_with('*')) {
        DropSyntax::Unlockable
    } else if tokens.iter().any(|t| t.parse::<i64>().is_ok()) {
        DropSyntax::Likelihood
    } else {
        DropSyntax::Repetition
    }
}

fn decode_drops(token: &str, params: &str) -> Result<DropTable, CellError> {
    let tokens = item_tokens(params);
    match sniff_drop_syntax(params) {
        DropSyntax::Repetition => Ok(decode_repeated_drops(&tokens)),
        DropSyntax::Likelihood => decode_weighted_drops(token, &tokens, false),
        DropSyntax::Unlockable => decode_weighted_drops(token, &tokens, true),
    }
}

fn decode_repeated_drops(tokens: &[&str]) -> DropTable {
    let mut table = DropTable::new();
    for name in tokens {
        table
            .entry(name.to_string())
            .and_modify(|s| s.likelihood = s.likelihood.increment())
            .or_insert(DropSettings::new(Likelihood::Low, false));
    }
    table
}

fn decode_weighted_drops(token: &str, tokens: &[&str], allow_unlock: bool) -> Result<DropTable, CellError> {
    let mut table = DropTable::new();
    let mut i = 0;

    while i < tokens.len() {
        let mut name = tokens[i];
        let mut only_if_unlocked = false;

        if allow_unlock && name.starts_with('*') {
            only_if_unlocked = true;
            name = &name[1..];
            if name.is_empty() {
                i += 1;
                name = tokens
                    .get(i)
                    .copied()
                    .ok_or_else(|| CellError::malformed(token, "'*' is not followed by an item name"))?;
            }
        }

        if name.parse::<i64>().is_ok() {
            return Err(CellError::malformed(token, format!("likelihood {} has no item name", name)));
        }

        let likelihood = match tokens.get(i + 1).and_then(|t| t.parse::<i64>().ok()) {
            Some(value) => {
                i += 1;
                Likelihood::from_clamped(value)
            }
            None => Likelihood::Low,
        };

        table
            .entry(name.to_string())
            .and_modify(|s| s.likelihood = s.likelihood.increment())
            .or_insert(DropSettings::new(likelihood, only_if_unlocked));
        i += 1;
    }

    Ok(table)
}

fn decode_cannon(token: &str, params: Option<&str>) -> Result<CannonAngles, CellError> {
    let params = match params {
        Some(p) => p.trim(),
        None => return Ok(CannonAngles::default()),
    };

    // A leading '-' belongs to the first angle, not the range separator
    let hyphen = params.get(1..).and_then(|rest| rest.find('-')).map(|i| i + 1);
    match hyphen {
        Some(i) => Ok(CannonAngles::range(
            parse_int(token, &params[..i], "cannon angle")?,
            parse_int(token, &params[i + 1..], "cannon angle")?,
        )),
        None => Ok(CannonAngles::fixed(parse_int(token, params, "cannon angle")?)),
    }
}

fn decode_warp(token: &str, params: Option<&str>) -> Result<WarpTarget, CellError> {
    let params = match params {
        Some(p) => p,
        None => return Ok(WarpTarget::default()),
    };

    match split_fields(params).as_slice() {
        [start, end, world, level] if !world.is_empty() => Ok(WarpTarget {
            start_time: parse_float(token, start, "warp start time")?,
            end_time: parse_float(token, end, "warp end time")?,
            world_name: world.to_string(),
            level_number: parse_int(token, level, "warp level number")?,
        }),
        _ => Err(CellError::malformed(token, "warp portal takes exactly 4 parameters")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::full_catalog;

    fn decode(token: &str) -> Result<Cell, CellError> {
        decode_cell(token, &full_catalog())
    }

    fn is_malformed(result: Result<Cell, CellError>) -> bool {
        matches!(result, Err(CellError::Malformed { .. }))
    }

    #[test]
    fn test_plain_symbol() {
        let cell = decode("S").unwrap();
        assert_eq!(cell.symbol(), "S");
        assert_eq!(cell.kind(), PieceKind::Solid);
        assert_eq!(cell.payload(), &CellPayload::Plain);
        assert_eq!(cell.trigger_id(), None);
    }

    #[test]
    fn test_unknown_symbol() {
        assert_eq!(decode("Q"), Err(CellError::UnknownSymbol("Q".to_string())));
        assert_eq!(decode("Q(1){2}"), Err(CellError::UnknownSymbol("Q".to_string())));
    }

    #[test]
    fn test_portal() {
        let cell = decode("X(A,B)").unwrap();
        let link = cell.portal().unwrap();
        assert_eq!(link.block_id, 'A');
        assert_eq!(link.sibling_id, 'B');
        assert!(!link.flips_paddle);
    }

    #[test]
    fn test_portal_flip_flag() {
        assert!(decode("X(A,B,f)").unwrap().portal().unwrap().flips_paddle);
        assert!(decode("X(A,B)f").unwrap().portal().unwrap().flips_paddle);
        assert!(decode("X(A,B)f{3}").unwrap().portal().unwrap().flips_paddle);
    }

    #[test]
    fn test_portal_sibling_count() {
        assert!(is_malformed(decode("X(A)")));
        assert!(is_malformed(decode("X(A,B,C)")));
        assert!(is_malformed(decode("X")));
        assert!(is_malformed(decode("X(AB,C)")));
    }

    #[test]
    fn test_tesla() {
        let cell = decode("A(1,0,C,D,E)").unwrap();
        let link = cell.tesla().unwrap();
        assert!(link.starts_on);
        assert!(!link.changeable);
        assert_eq!(link.block_id, 'C');
        assert_eq!(link.sibling_ids, ['D', 'E'].into_iter().collect());
    }

    #[test]
    fn test_tesla_legacy_order() {
        let link = decode("A(0,C,D)").unwrap().tesla().unwrap().clone();
        assert!(!link.starts_on);
        assert!(link.changeable);
        assert_eq!(link.block_id, 'C');
        assert_eq!(link.sibling_ids.len(), 1);

        let link = decode("A(1,Q,R,S)").unwrap().tesla().unwrap().clone();
        assert_eq!(link.block_id, 'Q');
        assert_eq!(link.sibling_ids.len(), 2);
    }

    #[test]
    fn test_tesla_malformed() {
        assert!(is_malformed(decode("A(1,C)")));
        assert!(is_malformed(decode("A(2,0,C,D)")));
        assert!(is_malformed(decode("A(1,0,CC,D)")));
    }

    #[test]
    fn test_drop_syntax_sniffing() {
        assert_eq!(sniff_drop_syntax("ballgrow,ballgrow,gravity"), DropSyntax::Repetition);
        assert_eq!(sniff_drop_syntax("ballgrow(2),gravity(0)"), DropSyntax::Likelihood);
        assert_eq!(sniff_drop_syntax("*,ballgrow(2),gravity(1)"), DropSyntax::Unlockable);
        assert_eq!(sniff_drop_syntax(""), DropSyntax::Repetition);
    }

    #[test]
    fn test_drops_by_repetition() {
        let cell = decode("D(ballgrow,gravity,ballgrow,ballgrow,ballgrow)").unwrap();
        let table = cell.drops().unwrap();
        assert_eq!(table["ballgrow"].likelihood, Likelihood::High);
        assert_eq!(table["gravity"].likelihood, Likelihood::Low);
        assert!(!table["gravity"].only_if_unlocked);
    }

    #[test]
    fn test_drops_with_likelihood() {
        let cell = decode("K(ballgrow(3),gravity(0),slowball,9)").unwrap();
        assert_eq!(cell.kind(), PieceKind::AlwaysDrop);
        let table = cell.drops().unwrap();
        assert_eq!(table["ballgrow"].likelihood, Likelihood::High);
        assert_eq!(table["gravity"].likelihood, Likelihood::None);
        // Out-of-range likelihoods are clamped
        assert_eq!(table["slowball"].likelihood, Likelihood::High);
    }

    #[test]
    fn test_drops_with_unlock_marker() {
        let cell = decode("D(*,ballgrow(2),gravity(1),*slowball(3))").unwrap();
        let table = cell.drops().unwrap();
        assert!(table["ballgrow"].only_if_unlocked);
        assert!(!table["gravity"].only_if_unlocked);
        assert!(table["slowball"].only_if_unlocked);
        assert_eq!(table["slowball"].likelihood, Likelihood::High);
    }

    #[test]
    fn test_drops_malformed() {
        assert!(is_malformed(decode("D(ballgrow(2),*)")));
        assert!(is_malformed(decode("D(3,ballgrow)")));
    }

    #[test]
    fn test_bare_drop_is_empty() {
        assert!(decode("D").unwrap().drops().unwrap().is_empty());
        assert!(decode("D()").unwrap().drops().unwrap().is_empty());
    }

    #[test]
    fn test_cannon() {
        let cell = decode("C(45-90){7}").unwrap();
        assert_eq!(cell.cannon(), Some(CannonAngles::range(45, 90)));
        assert_eq!(cell.trigger_id(), Some(7));

        assert_eq!(decode("C(30)").unwrap().cannon(), Some(CannonAngles::fixed(30)));
        assert_eq!(decode("C(-1)").unwrap().cannon(), Some(CannonAngles::RANDOM));
    }

    #[test]
    fn test_one_shot_cannon() {
        let cell = decode("CO(10-20)").unwrap();
        assert_eq!(cell.kind(), PieceKind::OneShotCannon);
        assert_eq!(cell.cannon(), Some(CannonAngles::range(10, 20)));
    }

    #[test]
    fn test_cannon_bad_angle() {
        assert!(is_malformed(decode("C(abc)")));
        assert!(is_malformed(decode("C(10-)")));
    }

    #[test]
    fn test_switch() {
        let cell = decode("W(12){4}").unwrap();
        assert_eq!(cell.switch_target(), Some(12));
        assert_eq!(cell.trigger_id(), Some(4));
        assert!(is_malformed(decode("W(x)")));
    }

    #[test]
    fn test_warp_portal() {
        let cell = decode("P(1.5,-1.0,deco,3)").unwrap();
        let warp = cell.warp().unwrap();
        assert_eq!(warp.start_time, 1.5);
        assert_eq!(warp.end_time, -1.0);
        assert_eq!(warp.world_name, "deco");
        assert_eq!(warp.level_number, 3);
    }

    #[test]
    fn test_warp_portal_field_count() {
        assert!(is_malformed(decode("P(1.5,-1.0,deco)")));
        assert!(is_malformed(decode("P(1.5,-1.0,deco,3,4)")));
    }

    #[test]
    fn test_trigger_suffix_on_plain_piece() {
        let cell = decode("S{15}").unwrap();
        assert_eq!(cell.trigger_id(), Some(15));
        assert!(is_malformed(decode("S{x}")));
        assert!(is_malformed(decode("S}")));
        assert!(is_malformed(decode("S{1}{2}")));
    }

    #[test]
    fn test_unterminated_params() {
        assert!(is_malformed(decode("X(A,B")));
        assert!(is_malformed(decode("S(1)")));
        assert!(is_malformed(decode("C(10)x")));
    }
}
