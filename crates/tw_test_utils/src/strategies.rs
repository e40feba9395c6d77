//! Proptest strategies.
//!
//! These strategies generate random but reproducible worlds and command
//! scripts for property-based testing of the simulation.

use proptest::prelude::*;
use tw_core::constants::{PlayerId, Terrain, UnitKind};
use tw_core::grid::{Coord, World};

use crate::determinism::{Script, ScriptedCommand};
use crate::fixtures::prime;

/// Any terrain type.
pub fn arb_terrain() -> impl Strategy<Value = Terrain> {
    proptest::sample::select(Terrain::ALL.to_vec())
}

/// Any unit kind.
pub fn arb_unit_kind() -> impl Strategy<Value = UnitKind> {
    proptest::sample::select(UnitKind::ALL.to_vec())
}

/// One of the first `players` player numbers.
pub fn arb_player(players: PlayerId) -> impl Strategy<Value = PlayerId> {
    1..=players.max(1)
}

/// A coordinate inside a `width` x `height` grid.
pub fn arb_coord(width: usize, height: usize) -> impl Strategy<Value = Coord> {
    (0..width as i32, 0..height as i32).prop_map(|(x, y)| Coord::new(x, y))
}

/// A coordinate that may fall one tile outside the grid.
pub fn arb_coord_near(width: usize, height: usize) -> impl Strategy<Value = Coord> {
    (-1..=width as i32, -1..=height as i32).prop_map(|(x, y)| Coord::new(x, y))
}

/// A primed world with random terrain and roughly one unit per five tiles
/// for up to three players. Bases start neutral; a soldier reinforcement
/// is scheduled every 40 ticks.
pub fn arb_world(width: usize, height: usize) -> impl Strategy<Value = World> {
    let cells = width * height;
    (
        proptest::collection::vec(arb_terrain(), cells),
        proptest::collection::vec(
            proptest::option::weighted(0.2, (arb_player(3), arb_unit_kind())),
            cells,
        ),
    )
        .prop_map(move |(terrain, units)| {
            let mut world = World::new(width, height);
            for (i, (terrain, unit)) in terrain.into_iter().zip(units).enumerate() {
                let at = Coord::new((i / height) as i32, (i % height) as i32);
                let Some(tile) = world.tile_mut(at) else {
                    continue;
                };
                tile.terrain = terrain;
                if let Some((player, kind)) = unit {
                    if !kind.can_enter(terrain) {
                        tile.terrain = Terrain::Dirt;
                    }
                    world.spawn_unit(at, player, kind);
                }
            }
            for t in (40..400).step_by(40) {
                world.reinforcement.insert(t, UnitKind::Soldier);
            }
            prime(&mut world);
            world
        })
}

/// A move or fire command between two tiles of the grid, by one of three
/// players.
pub fn arb_command(width: usize, height: usize) -> impl Strategy<Value = ScriptedCommand> {
    (
        any::<bool>(),
        arb_player(3),
        arb_coord(width, height),
        arb_coord_near(width, height),
    )
        .prop_map(|(fire, player, from, to)| {
            if fire {
                ScriptedCommand::Fire { player, from, to }
            } else {
                ScriptedCommand::Move { player, from, to }
            }
        })
}

/// Up to `max_len` commands spread over the first `ticks` ticks.
pub fn arb_script(
    width: usize,
    height: usize,
    ticks: u64,
    max_len: usize,
) -> impl Strategy<Value = Script> {
    proptest::collection::vec((0..ticks.max(1), arb_command(width, height)), 0..max_len)
}
