//! The world grid: tiles, coordinates and hex-neighbor queries.
//!
//! The grid uses an "odd-row shifted" hex layout: every odd row is pushed
//! half a tile to the right. For a tile at `(x, y)` with `s = y mod 2` the
//! six neighbors, in order, are
//!
//! ```text
//! (x-1+s, y-1)  (x+s, y-1)  (x+1, y)  (x+s, y+1)  (x-1+s, y+1)  (x-1, y)
//! ```
//!
//! Tiles are stored column-major (`tiles[x][y]`). Every lookup outside the
//! grid yields `None` instead of panicking.

use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{PlayerId, Terrain, UnitKind, Visibility, NEUTRAL};
use crate::error::{GameError, Result};
use crate::unit::{Activity, ActivityKind, Unit, UnitId};

/// Grid coordinate: column `x`, row `y`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Coord {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Coord {
    /// Create a coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The six hex-adjacent coordinates, in canonical order. May lie outside
    /// any grid.
    #[must_use]
    pub const fn adjacent(self) -> [Self; 6] {
        let Self { x, y } = self;
        let s = y.rem_euclid(2);
        [
            Self::new(x - 1 + s, y - 1),
            Self::new(x + s, y - 1),
            Self::new(x + 1, y),
            Self::new(x + s, y + 1),
            Self::new(x - 1 + s, y + 1),
            Self::new(x - 1, y),
        ]
    }

    /// Manhattan distance on raw coordinates.
    #[must_use]
    pub const fn manhattan(self, other: Self) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A single hexagonal tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
    /// Terrain type. Degrades under fire.
    pub terrain: Terrain,
    /// Cosmetic variant used by renderers.
    pub cosmetic: u8,
    /// Player that last held this tile (bases only), or neutral.
    pub owner: PlayerId,
    /// Per-player supply level, 1 (best) to [`MAX_SUPPLY`](crate::constants::MAX_SUPPLY).
    pub supply: BTreeMap<PlayerId, usize>,
    /// Per-player visibility.
    pub visibility: BTreeMap<PlayerId, Visibility>,
    /// The unit standing here.
    pub unit: Option<Unit>,
}

impl Tile {
    /// Create an empty, neutral tile.
    #[must_use]
    pub fn new(x: i32, y: i32, terrain: Terrain) -> Self {
        Self {
            x,
            y,
            terrain,
            cosmetic: 0,
            owner: NEUTRAL,
            supply: BTreeMap::new(),
            visibility: BTreeMap::new(),
            unit: None,
        }
    }

    /// Coordinate of this tile.
    #[must_use]
    pub const fn coord(&self) -> Coord {
        Coord::new(self.x, self.y)
    }

    /// Supply level for `player`, if supplied.
    #[must_use]
    pub fn supply_for(&self, player: PlayerId) -> Option<usize> {
        self.supply.get(&player).copied()
    }

    /// Visibility for `player`; absent entries count as fog of war.
    #[must_use]
    pub fn visibility_for(&self, player: PlayerId) -> Visibility {
        self.visibility.get(&player).copied().unwrap_or_default()
    }
}

/// The complete game world.
///
/// Owns every tile, and through them every unit. Mutated only by the tick
/// pipeline ([`crate::update::tick`]) and the command gateway
/// ([`World::move_unit`], [`World::fire`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    width: usize,
    height: usize,
    tiles: Vec<Vec<Tile>>,
    /// Current tick.
    pub tick: u64,
    /// When set, [`crate::update::tick`] has no effect.
    pub freeze: bool,
    /// Reinforcement schedule: tick -> unit kind spawned for every supplied player.
    pub reinforcement: BTreeMap<u64, UnitKind>,
    next_unit_id: UnitId,
}

impl World {
    /// Create a world of `width` x `height` dirt tiles with cosmetic id 0.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        let tiles = (0..width)
            .map(|x| {
                (0..height)
                    .map(|y| Tile::new(x as i32, y as i32, Terrain::default()))
                    .collect()
            })
            .collect();

        Self {
            width,
            height,
            tiles,
            tick: 0,
            freeze: false,
            reinforcement: BTreeMap::new(),
            next_unit_id: 1,
        }
    }

    /// Assign every tile a random cosmetic id.
    pub fn randomize_cosmetics<R: Rng>(&mut self, rng: &mut R) {
        for tile in self.tiles_mut() {
            tile.cosmetic = rng.gen_range(0..u8::MAX);
        }
    }

    /// Width in tiles.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height in tiles.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Whether `coord` lies on the grid.
    #[must_use]
    pub fn contains(&self, coord: Coord) -> bool {
        self.tile(coord).is_some()
    }

    /// Tile at `coord`, or `None` if out of bounds.
    #[must_use]
    pub fn tile(&self, coord: Coord) -> Option<&Tile> {
        let x = usize::try_from(coord.x).ok()?;
        let y = usize::try_from(coord.y).ok()?;
        self.tiles.get(x)?.get(y)
    }

    /// Mutable tile at `coord`, or `None` if out of bounds.
    pub fn tile_mut(&mut self, coord: Coord) -> Option<&mut Tile> {
        let x = usize::try_from(coord.x).ok()?;
        let y = usize::try_from(coord.y).ok()?;
        self.tiles.get_mut(x)?.get_mut(y)
    }

    /// Tile at `coord`, or [`GameError::TileNotFound`].
    pub fn require_tile(&self, coord: Coord) -> Result<&Tile> {
        self.tile(coord).ok_or(GameError::TileNotFound(coord))
    }

    /// Unit standing on `coord`.
    #[must_use]
    pub fn unit_at(&self, coord: Coord) -> Option<&Unit> {
        self.tile(coord)?.unit.as_ref()
    }

    /// Mutable unit standing on `coord`.
    pub fn unit_at_mut(&mut self, coord: Coord) -> Option<&mut Unit> {
        self.tile_mut(coord)?.unit.as_mut()
    }

    /// All tiles, column by column.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().flatten()
    }

    /// All tiles, mutably, column by column.
    pub fn tiles_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.tiles.iter_mut().flatten()
    }

    /// Tiles of the given terrain, or all tiles for `None`.
    #[must_use]
    pub fn tile_list(&self, terrain: Option<Terrain>) -> Vec<&Tile> {
        self.tiles()
            .filter(|t| terrain.map_or(true, |kind| t.terrain == kind))
            .collect()
    }

    /// Tiles holding a unit of `player`; `0` matches every player.
    #[must_use]
    pub fn units(&self, player: PlayerId) -> Vec<&Tile> {
        self.tiles()
            .filter(|t| {
                t.unit
                    .as_ref()
                    .is_some_and(|u| player == NEUTRAL || u.player == player)
            })
            .collect()
    }

    /// Coordinates of tiles holding a unit of `player` (`0` = any).
    #[must_use]
    pub fn unit_coords(&self, player: PlayerId) -> Vec<Coord> {
        self.units(player).into_iter().map(Tile::coord).collect()
    }

    /// All base tiles.
    #[must_use]
    pub fn bases(&self) -> Vec<&Tile> {
        self.tile_list(Some(Terrain::Base))
    }

    /// Number of distinct players that still own units.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.tiles()
            .filter_map(|t| t.unit.as_ref().map(|u| u.player))
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Activities of all units targeting `coord`.
    #[must_use]
    pub fn activities_to(&self, coord: Coord, fire_only: bool) -> Vec<Activity> {
        self.tiles()
            .filter_map(|t| t.unit.as_ref()?.activity)
            .filter(|a| a.to == coord && (!fire_only || a.kind == ActivityKind::Fire))
            .collect()
    }

    /// Existing direct neighbors of `coord`, in canonical order.
    #[must_use]
    pub fn neighbors(&self, coord: Coord) -> Vec<Coord> {
        coord
            .adjacent()
            .into_iter()
            .filter(|&c| self.contains(c))
            .collect()
    }

    /// Whether `a` and `b` are direct neighbors.
    #[must_use]
    pub fn is_neighbor(&self, a: Coord, b: Coord) -> bool {
        self.contains(a) && self.contains(b) && a.adjacent().contains(&b)
    }

    /// Tiles around `coord` grouped into distance bands.
    ///
    /// Band `i` holds the tiles first reached after `i + 1` hops, in
    /// discovery order. Always returns exactly `radius` bands; the origin is
    /// never included.
    #[must_use]
    pub fn ext_neighbors(&self, coord: Coord, radius: usize) -> Vec<Vec<Coord>> {
        let mut bands = vec![Vec::new(); radius];
        if !self.contains(coord) {
            return bands;
        }

        let mut known = HashSet::new();
        known.insert(coord);
        let mut open = self.neighbors(coord);

        for band in &mut bands {
            let mut next = Vec::new();
            for c in open {
                if !known.insert(c) {
                    continue;
                }
                band.push(c);
                next.extend(self.neighbors(c));
            }
            if next.is_empty() {
                break;
            }
            open = next;
        }

        bands
    }

    /// Place a fresh unit on `coord` with the next unit id.
    ///
    /// Returns `None` if the tile does not exist or is occupied.
    pub fn spawn_unit(&mut self, coord: Coord, player: PlayerId, kind: UnitKind) -> Option<UnitId> {
        let id = self.next_unit_id;
        let tile = self.tile_mut(coord)?;
        if tile.unit.is_some() {
            return None;
        }
        tile.unit = Some(Unit::new(id, player, kind, coord));
        self.next_unit_id += 1;
        Some(id)
    }

    /// Id the next spawned unit receives.
    #[must_use]
    pub const fn next_unit_id(&self) -> UnitId {
        self.next_unit_id
    }

    /// Calculate a hash of the current world state.
    ///
    /// Two worlds with identical state produce identical hashes.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();

        self.tick.hash(&mut hasher);
        self.freeze.hash(&mut hasher);
        self.width.hash(&mut hasher);
        self.height.hash(&mut hasher);
        self.next_unit_id.hash(&mut hasher);

        for tile in self.tiles() {
            tile.terrain.hash(&mut hasher);
            tile.owner.hash(&mut hasher);
            tile.supply.hash(&mut hasher);
            tile.visibility.hash(&mut hasher);

            if let Some(ref unit) = tile.unit {
                unit.id.hash(&mut hasher);
                unit.player.hash(&mut hasher);
                unit.kind.hash(&mut hasher);
                unit.health.hash(&mut hasher);
                unit.ammunition.to_bits().hash(&mut hasher);
                unit.demoralized.hash(&mut hasher);
                unit.activity.hash(&mut hasher);
                unit.position.hash(&mut hasher);
            }
        }

        hasher.finish()
    }

    /// Serialize the world into a compact binary snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| GameError::Serialization(format!("failed to serialize world: {e}")))
    }

    /// Restore a world from a binary snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        bincode::deserialize(data)
            .map_err(|e| GameError::Serialization(format!("failed to deserialize world: {e}")))
    }

    /// JSON snapshot of the world.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
