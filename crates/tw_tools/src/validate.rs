//! Map validation and creation.

use std::collections::BTreeMap;
use std::path::Path;

use rand::SeedableRng;
use serde::Serialize;
use thiserror::Error;
use tw_core::constants::{PlayerId, Terrain};
use tw_core::engine::GameRng;
use tw_core::error::GameError;
use tw_core::grid::World;
use tw_core::map::MapDocument;

/// Errors of the tools.
#[derive(Error, Debug)]
pub enum ToolError {
    /// The map could not be read or is malformed.
    #[error(transparent)]
    Game(#[from] GameError),

    /// Output could not be encoded.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid command-line input.
    #[error("{0}")]
    Usage(String),
}

/// What a map contains, plus things worth a second look.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapSummary {
    /// Width in tiles.
    pub width: usize,
    /// Height in tiles.
    pub height: usize,
    /// Players with units.
    pub players: Vec<PlayerId>,
    /// Units per player.
    pub units: BTreeMap<PlayerId, usize>,
    /// Tiles per terrain.
    pub terrain: BTreeMap<Terrain, usize>,
    /// Scheduled reinforcements.
    pub reinforcements: usize,
    /// Playable but suspicious findings.
    pub warnings: Vec<String>,
}

/// Check a map document and summarize it.
///
/// # Errors
///
/// Returns an error if the map is malformed.
pub fn validate_map(doc: &MapDocument) -> Result<MapSummary, ToolError> {
    doc.validate()?;

    let mut units: BTreeMap<PlayerId, usize> = BTreeMap::new();
    let mut based: Vec<PlayerId> = Vec::new();
    let mut warnings = Vec::new();

    for (x, column) in doc.tiles.iter().enumerate() {
        for (y, tile) in column.iter().enumerate() {
            let Some(unit) = tile.unit else {
                continue;
            };
            *units.entry(unit.player).or_insert(0) += 1;
            if tile.terrain == Terrain::Base {
                based.push(unit.player);
            }
            if !unit.kind.can_enter(tile.terrain) {
                warnings.push(format!(
                    "{:?} of player {} stands on {:?} at ({x}, {y})",
                    unit.kind, unit.player, tile.terrain
                ));
            }
        }
    }

    let players = doc.players();
    if players.len() < 2 {
        warnings.push(format!("only {} player(s) on the map", players.len()));
    }
    for &player in &players {
        if !based.contains(&player) {
            warnings.push(format!(
                "player {player} starts without a base and gets no supply"
            ));
        }
    }
    if !doc.reinforcement.is_empty() && doc.terrain_histogram().get(&Terrain::Base).is_none() {
        warnings.push("reinforcements are scheduled but the map has no base".to_string());
    }

    for warning in &warnings {
        tracing::warn!("{warning}");
    }

    Ok(MapSummary {
        width: doc.width,
        height: doc.height,
        players,
        units,
        terrain: doc.terrain_histogram(),
        reinforcements: doc.reinforcement.len(),
        warnings,
    })
}

/// Load and check the map at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the map is malformed.
pub fn validate_map_file(path: &Path) -> Result<MapSummary, ToolError> {
    let doc = MapDocument::load(path)?;
    validate_map(&doc)
}

/// A blank dirt map with seeded cosmetic variants.
///
/// # Errors
///
/// Returns [`ToolError::Usage`] for an empty size.
pub fn new_map(width: usize, height: usize, seed: u64) -> Result<MapDocument, ToolError> {
    if width == 0 || height == 0 {
        return Err(ToolError::Usage(format!(
            "map size must be positive, got {width}x{height}"
        )));
    }
    let mut world = World::new(width, height);
    world.randomize_cosmetics(&mut GameRng::seed_from_u64(seed));
    Ok(world.to_map_document())
}
