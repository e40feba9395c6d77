//! Test fixtures and helpers.
//!
//! Pre-built worlds and scenario descriptions for consistent testing.

use std::collections::BTreeMap;

use fixed::types::I32F32;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use tw_core::constants::{PlayerId, Terrain, UnitKind, BLUE, RED};
use tw_core::engine::Engine;
use tw_core::grid::{Coord, World};
use tw_core::update::{refresh_attributes, update_supply, update_visibility};

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> I32F32 {
    I32F32::from_num(n)
}

/// Run the derived-state steps of the pipeline without advancing the tick,
/// so freshly placed units have speeds, ranges and visibility.
pub fn prime(world: &mut World) {
    update_supply(world);
    refresh_attributes(world);
    update_visibility(world);
}

/// An empty dirt field.
#[must_use]
pub fn open_field(width: usize, height: usize) -> World {
    World::new(width, height)
}

/// 10x10 field with a wall of mountain, water and structure at x = 1 from
/// the top edge down to y = 2.
#[must_use]
pub fn walled_field() -> World {
    let mut world = World::new(10, 10);
    for (y, terrain) in [(0, Terrain::Mountain), (1, Terrain::Water), (2, Terrain::Structure)] {
        if let Some(tile) = world.tile_mut(Coord::new(1, y)) {
            tile.terrain = terrain;
        }
    }
    world
}

/// Place an owned base.
pub fn place_base(world: &mut World, at: Coord, owner: PlayerId) {
    if let Some(tile) = world.tile_mut(at) {
        tile.terrain = Terrain::Base;
        tile.owner = owner;
    }
}

/// Two players on a 10x10 field: each has a base, a tank next to it and a
/// soldier behind it. A soldier reinforcement arrives at tick 10.
#[must_use]
pub fn duel() -> World {
    let mut world = World::new(10, 10);
    for (x, player, back) in [(2, RED, 1), (7, BLUE, 8)] {
        place_base(&mut world, Coord::new(x, 5), player);
        world.spawn_unit(Coord::new(x, 4), player, UnitKind::Tank);
        world.spawn_unit(Coord::new(back, 5), player, UnitKind::Soldier);
    }
    world.reinforcement.insert(10, UnitKind::Soldier);
    prime(&mut world);
    world
}

/// A 16x12 battlefield with seeded random terrain and two full armies.
#[must_use]
pub fn skirmish(seed: u64) -> World {
    const WIDTH: usize = 16;
    const HEIGHT: usize = 12;
    const SCATTER: [Terrain; 7] = [
        Terrain::Forest,
        Terrain::Grass,
        Terrain::Hill,
        Terrain::Hole,
        Terrain::Mountain,
        Terrain::Structure,
        Terrain::Water,
    ];

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut world = World::new(WIDTH, HEIGHT);
    world.randomize_cosmetics(&mut rng);
    for tile in world.tiles_mut() {
        if rng.gen_ratio(1, 3) {
            tile.terrain = SCATTER[rng.gen_range(0..SCATTER.len())];
        }
    }

    let armies = [(RED, Coord::new(2, 2), 1), (BLUE, Coord::new(13, 9), -1)];
    for (player, base, dir) in armies {
        place_base(&mut world, base, player);
        let posts = [
            (Coord::new(base.x + dir, base.y), UnitKind::Tank),
            (Coord::new(base.x, base.y + dir), UnitKind::Soldier),
            (Coord::new(base.x + dir, base.y + dir), UnitKind::Soldier),
            (Coord::new(base.x - dir, base.y), UnitKind::Artillery),
        ];
        for (at, kind) in posts {
            if let Some(tile) = world.tile_mut(at) {
                tile.terrain = Terrain::Dirt;
            }
            world.spawn_unit(at, player, kind);
        }
    }

    for t in (300..3000).step_by(300) {
        let kind = if t % 900 == 0 { UnitKind::Tank } else { UnitKind::Soldier };
        world.reinforcement.insert(t, kind);
    }

    prime(&mut world);
    world
}

/// Wrap `world` in an engine seeded with `seed`.
#[must_use]
pub fn engine(world: World, seed: u64) -> Engine {
    Engine::with_seed(world, seed)
}

/// A world described in RON, for tests that read better as data.
///
/// ```ron
/// (
///     width: 6,
///     height: 4,
///     terrain: [(1, 0, mountain)],
///     bases: [(0, 0, 1)],
///     units: [(0, 1, 1, tank), (5, 3, 2, soldier)],
///     reinforcement: { 30: soldier },
/// )
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Scenario {
    /// Width in tiles.
    pub width: usize,
    /// Height in tiles.
    pub height: usize,
    /// Non-dirt terrain as `(x, y, terrain)`.
    pub terrain: Vec<(i32, i32, Terrain)>,
    /// Owned bases as `(x, y, owner)`.
    pub bases: Vec<(i32, i32, PlayerId)>,
    /// Units as `(x, y, player, kind)`.
    pub units: Vec<(i32, i32, PlayerId, UnitKind)>,
    /// Reinforcement schedule.
    pub reinforcement: BTreeMap<u64, UnitKind>,
}

impl Scenario {
    /// Parse a scenario from RON text.
    ///
    /// # Errors
    ///
    /// Returns the RON error if the text does not describe a scenario.
    pub fn from_ron(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }

    /// Build the primed world.
    #[must_use]
    pub fn build(&self) -> World {
        let mut world = World::new(self.width, self.height);
        for &(x, y, terrain) in &self.terrain {
            if let Some(tile) = world.tile_mut(Coord::new(x, y)) {
                tile.terrain = terrain;
            }
        }
        for &(x, y, owner) in &self.bases {
            place_base(&mut world, Coord::new(x, y), owner);
        }
        for &(x, y, player, kind) in &self.units {
            if world.spawn_unit(Coord::new(x, y), player, kind).is_none() {
                tracing::warn!(x, y, "scenario unit could not be placed");
            }
        }
        world.reinforcement = self.reinforcement.clone();
        prime(&mut world);
        world
    }
}
