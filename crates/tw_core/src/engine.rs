//! The world together with its random source, and a lock-guarded handle for
//! sharing it between the tick loop and client sessions.
//!
//! All randomness of a game (dice, reinforcement shuffles, cosmetic ids)
//! comes from the one seeded [`GameRng`] owned by the [`Engine`]. The same
//! seed and the same command sequence therefore replay the same game.

use std::sync::{Arc, Mutex, MutexGuard};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::censor::censorship;
use crate::constants::PlayerId;
use crate::error::{GameError, Result};
use crate::grid::{Coord, World};
use crate::update::{tick, TickReport};

/// The seeded random source of a game.
pub type GameRng = ChaCha8Rng;

/// A world and the random source that drives it.
#[derive(Debug, Clone)]
pub struct Engine {
    world: World,
    rng: GameRng,
}

impl Engine {
    /// Wrap `world` with a random source seeded from `seed`.
    #[must_use]
    pub fn with_seed(world: World, seed: u64) -> Self {
        Self {
            world,
            rng: GameRng::seed_from_u64(seed),
        }
    }

    /// The world.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// The world, mutably.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The random source, mutably.
    pub fn rng_mut(&mut self) -> &mut GameRng {
        &mut self.rng
    }

    /// Consume the engine, returning the world.
    #[must_use]
    pub fn into_world(self) -> World {
        self.world
    }

    /// Run one tick of the pipeline.
    pub fn tick(&mut self) -> TickReport {
        tick(&mut self.world, &mut self.rng)
    }

    /// See [`World::move_unit`].
    pub fn move_unit(&mut self, from: Coord, to: Coord, player: PlayerId) -> Result<Coord> {
        self.world.move_unit(from, to, player)
    }

    /// See [`World::fire`].
    pub fn fire(&mut self, from: Coord, to: Coord, player: PlayerId) -> Result<()> {
        self.world.fire(from, to, player)
    }

    /// Snapshot of what `player` may see.
    #[must_use]
    pub fn status(&self, player: PlayerId) -> World {
        censorship(&self.world, player)
    }
}

/// Cloneable, thread-safe handle to an [`Engine`].
///
/// Every method holds the lock for the whole operation and releases it on
/// every exit path. Never hold the lock across an `.await`; all methods here
/// are synchronous.
#[derive(Debug, Clone)]
pub struct SharedEngine {
    inner: Arc<Mutex<Engine>>,
}

impl SharedEngine {
    /// Share `engine`.
    #[must_use]
    pub fn new(engine: Engine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Engine>> {
        self.inner.lock().map_err(|_| GameError::LockPoisoned)
    }

    /// Run `f` with exclusive access to the engine.
    pub fn with<T>(&self, f: impl FnOnce(&mut Engine) -> T) -> Result<T> {
        let mut engine = self.lock()?;
        Ok(f(&mut engine))
    }

    /// Run one tick.
    pub fn tick(&self) -> Result<TickReport> {
        Ok(self.lock()?.tick())
    }

    /// Issue a move command.
    pub fn move_unit(&self, from: Coord, to: Coord, player: PlayerId) -> Result<Coord> {
        self.lock()?.move_unit(from, to, player)
    }

    /// Issue a fire command.
    pub fn fire(&self, from: Coord, to: Coord, player: PlayerId) -> Result<()> {
        self.lock()?.fire(from, to, player)
    }

    /// Censored snapshot for `player`.
    pub fn status(&self, player: PlayerId) -> Result<World> {
        Ok(self.lock()?.status(player))
    }

    /// Full, uncensored snapshot.
    pub fn snapshot(&self) -> Result<World> {
        Ok(self.lock()?.world().clone())
    }

    /// Freeze or unfreeze the pipeline.
    pub fn set_freeze(&self, freeze: bool) -> Result<()> {
        self.lock()?.world_mut().freeze = freeze;
        Ok(())
    }

    /// Number of players that still own units.
    pub fn player_count(&self) -> Result<usize> {
        Ok(self.lock()?.world().player_count())
    }

    /// Hash of the current world state.
    pub fn state_hash(&self) -> Result<u64> {
        Ok(self.lock()?.world().state_hash())
    }
}
