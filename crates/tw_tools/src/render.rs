//! ASCII rendering of worlds for quick terminal review.
//!
//! Every tile is two characters: a unit code and its player (`T1`), or a
//! terrain code and its owner (`B2`, `F.`). Odd rows are shifted right by
//! half a tile, as on the hex grid.

use std::fmt::Write;

use tw_core::constants::{Terrain, NEUTRAL};
use tw_core::grid::{Coord, World};

/// Legend printed below a rendering.
pub const LEGEND: &str = "units: A artillery, U soldier, T tank | \
terrain: B base, D dirt, F forest, G grass, H hill, O hole, M mountain, S structure, W water";

fn owner_char(player: u8) -> char {
    if player == NEUTRAL {
        '.'
    } else {
        char::from_digit(u32::from(player), 36).unwrap_or('?')
    }
}

/// Render `world` row by row.
#[must_use]
pub fn render(world: &World) -> String {
    let mut out = String::new();
    for y in 0..world.height() as i32 {
        if y % 2 == 1 {
            out.push_str("  ");
        }
        for x in 0..world.width() as i32 {
            let Some(tile) = world.tile(Coord::new(x, y)) else {
                continue;
            };
            let (code, owner) = match tile.unit.as_ref() {
                Some(unit) => (unit.kind.code(), owner_char(unit.player)),
                None if tile.terrain == Terrain::Base => ('B', owner_char(tile.owner)),
                None => (tile.terrain.code(), '.'),
            };
            if x > 0 {
                out.push_str("  ");
            }
            out.push(code);
            out.push(owner);
        }
        out.push('\n');
    }
    let _ = writeln!(out, "tick {}", world.tick);
    out
}
