//! # Tank Wars Core
//!
//! Authoritative simulation engine for a tick-driven tactical wargame played
//! on a hexagonal grid.
//!
//! This crate owns the single source of truth for terrain, unit positions,
//! ownership, supply, visibility and combat outcomes:
//! - No rendering
//! - No network IO
//! - All randomness flows through one seeded [`engine::GameRng`]
//! - Fractional quantities use fixed-point math
//!
//! External callers (network sessions, scripted players) only touch the world
//! through the command gateway ([`grid::World::move_unit`],
//! [`grid::World::fire`]), the tick pipeline ([`update::tick`]) and the
//! snapshot censor ([`censor::censorship`]), normally via the lock-guarded
//! [`engine::SharedEngine`].
//!
//! ## Crate Structure
//!
//! - [`grid`] - World, tiles and hex-neighbor queries
//! - [`unit`] - Units and activities
//! - [`stats`] - Unit attributes by (kind, terrain)
//! - [`pathfinding`] - A* over the hex grid
//! - [`combat`] - Dice damage and terrain degradation
//! - [`commands`] - Move/Fire validation
//! - [`update`] - The per-tick pipeline
//! - [`censor`] - Player-restricted snapshots
//! - [`engine`] - World + random source behind one lock
//! - [`map`] - Map documents
//! - [`intel`] - Last-known positions of unseen units

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod censor;
pub mod combat;
pub mod commands;
pub mod constants;
pub mod engine;
pub mod error;
pub mod grid;
pub mod intel;
pub mod map;
pub mod math;
pub mod pathfinding;
pub mod stats;
pub mod unit;
pub mod update;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::censor::censorship;
    pub use crate::constants::{
        PlayerId, Terrain, UnitKind, Visibility, GAME_SPEED, MAX_SUPPLY, NEUTRAL,
    };
    pub use crate::engine::{Engine, GameRng, SharedEngine};
    pub use crate::error::{ErrorCategory, GameError, Result};
    pub use crate::grid::{Coord, Tile, World};
    pub use crate::intel::{Phantom, ShadowTracker};
    pub use crate::map::MapDocument;
    pub use crate::math::Fixed;
    pub use crate::pathfinding::find_path;
    pub use crate::unit::{Activity, ActivityKind, Unit, UnitId};
    pub use crate::update::{tick, TickReport};
}
