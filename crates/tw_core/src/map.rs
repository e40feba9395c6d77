//! Map documents: the JSON format worlds are loaded from and saved to.
//!
//! A map document has the same shape as a world snapshot, so a saved
//! `STATUS` reply can be loaded as a map. Only the static parts are read:
//! terrain, cosmetic ids, unit owners and kinds, and the reinforcement
//! schedule. Runtime fields (supply, visibility, health, activities) are
//! ignored and units start fresh.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{PlayerId, Terrain, UnitKind, NEUTRAL};
use crate::error::{GameError, Result};
use crate::grid::{Coord, World};
use crate::update::refresh_attributes;

/// A unit placement in a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapUnit {
    /// Owning player.
    pub player: PlayerId,
    /// Unit kind.
    pub kind: UnitKind,
}

/// One tile of a map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapTile {
    /// Terrain type.
    pub terrain: Terrain,
    /// Cosmetic variant.
    pub cosmetic: u8,
    /// Unit standing here at game start.
    pub unit: Option<MapUnit>,
}

/// A complete map, indexed `tiles[x][y]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapDocument {
    /// Width in tiles.
    pub width: usize,
    /// Height in tiles.
    pub height: usize,
    /// Tile columns.
    pub tiles: Vec<Vec<MapTile>>,
    /// Reinforcement schedule: tick -> unit kind.
    pub reinforcement: BTreeMap<u64, UnitKind>,
}

impl MapDocument {
    /// A blank map of dirt tiles.
    #[must_use]
    pub fn blank(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![vec![MapTile::default(); height]; width],
            reinforcement: BTreeMap::new(),
        }
    }

    /// Parse a JSON map document.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON for a map.
    pub fn parse(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON map document from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Write this document as pretty JSON to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Check that the tile columns match the declared dimensions and that
    /// every unit has an owner.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::MapFormat`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(GameError::MapFormat(format!(
                "map is empty ({}x{})",
                self.width, self.height
            )));
        }
        if self.tiles.len() != self.width {
            return Err(GameError::MapFormat(format!(
                "expected {} columns, found {}",
                self.width,
                self.tiles.len()
            )));
        }
        for (x, column) in self.tiles.iter().enumerate() {
            if column.len() != self.height {
                return Err(GameError::MapFormat(format!(
                    "column {x} has {} rows, expected {}",
                    column.len(),
                    self.height
                )));
            }
            for (y, tile) in column.iter().enumerate() {
                if tile.unit.is_some_and(|u| u.player == NEUTRAL) {
                    return Err(GameError::MapFormat(format!(
                        "unit on ({x}, {y}) has no owner"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Build a fresh world from this map.
    ///
    /// Unit attributes are computed from their terrain right away, so units
    /// accept commands before the first tick.
    ///
    /// # Errors
    ///
    /// Returns an error if the document fails [`validate`](Self::validate).
    pub fn to_world(&self) -> Result<World> {
        self.validate()?;

        let mut world = World::new(self.width, self.height);
        for (x, column) in self.tiles.iter().enumerate() {
            for (y, map_tile) in column.iter().enumerate() {
                let coord = Coord::new(x as i32, y as i32);
                let Some(tile) = world.tile_mut(coord) else {
                    continue;
                };
                tile.terrain = map_tile.terrain;
                tile.cosmetic = map_tile.cosmetic;
                if let Some(unit) = map_tile.unit {
                    world.spawn_unit(coord, unit.player, unit.kind);
                }
            }
        }
        world.reinforcement = self.reinforcement.clone();
        refresh_attributes(&mut world);

        tracing::debug!(
            width = self.width,
            height = self.height,
            units = world.units(NEUTRAL).len(),
            "map loaded"
        );
        Ok(world)
    }

    /// Capture the static parts of `world`.
    #[must_use]
    pub fn from_world(world: &World) -> Self {
        let tiles = (0..world.width())
            .map(|x| {
                (0..world.height())
                    .map(|y| {
                        world
                            .tile(Coord::new(x as i32, y as i32))
                            .map(|t| MapTile {
                                terrain: t.terrain,
                                cosmetic: t.cosmetic,
                                unit: t.unit.as_ref().map(|u| MapUnit {
                                    player: u.player,
                                    kind: u.kind,
                                }),
                            })
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();

        Self {
            width: world.width(),
            height: world.height(),
            tiles,
            reinforcement: world.reinforcement.clone(),
        }
    }

    /// Count of tiles per terrain.
    #[must_use]
    pub fn terrain_histogram(&self) -> BTreeMap<Terrain, usize> {
        let mut counts = BTreeMap::new();
        for tile in self.tiles.iter().flatten() {
            *counts.entry(tile.terrain).or_insert(0) += 1;
        }
        counts
    }

    /// Players with at least one unit on the map.
    #[must_use]
    pub fn players(&self) -> Vec<PlayerId> {
        let mut players: Vec<_> = self
            .tiles
            .iter()
            .flatten()
            .filter_map(|t| t.unit.map(|u| u.player))
            .collect();
        players.sort_unstable();
        players.dedup();
        players
    }
}

impl World {
    /// Load a world from JSON map text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid map.
    pub fn from_map_str(json: &str) -> Result<Self> {
        MapDocument::parse(json)?.to_world()
    }

    /// Load a world from a JSON map file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid map.
    pub fn from_map_file(path: impl AsRef<Path>) -> Result<Self> {
        MapDocument::load(path)?.to_world()
    }

    /// The static parts of this world as a map document.
    #[must_use]
    pub fn to_map_document(&self) -> MapDocument {
        MapDocument::from_world(self)
    }
}
