//! Determinism testing utilities.
//!
//! Provides a harness for verifying that the simulation produces identical
//! results given identical inputs.
//!
//! # Testing Strategy
//!
//! A game must replay exactly from its seed and its command log. Sources of
//! non-determinism include:
//!
//! - **Floating-point math**: ammunition uses [`tw_core::math::Fixed`].
//! - **HashMap iteration order**: per-player maps are `BTreeMap`s and tiles
//!   are walked in column order.
//! - **System randomness**: every die and shuffle draws from the engine's
//!   seeded [`tw_core::engine::GameRng`].

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use tw_core::constants::PlayerId;
use tw_core::engine::Engine;
use tw_core::error::Result;
use tw_core::grid::{Coord, World};

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of ticks simulated.
    pub ticks: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for deterministic simulation).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the simulation was deterministic.
    ///
    /// # Panics
    ///
    /// Panics if the simulation produced different hashes across runs.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Simulation is non-deterministic!\n\
                 Runs: {}\n\
                 Ticks: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.ticks,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a simulation multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run the simulation
/// * `ticks` - Number of ticks to simulate per run
/// * `setup` - Function to create initial simulation state
/// * `step` - Function to advance simulation by one tick
/// * `hash` - Function to compute state hash
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    ticks: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();

        for _ in 0..ticks {
            step(&mut state);
        }

        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        ticks,
    }
}

/// Run an engine twice from identical setups and compare the final world
/// hashes.
pub fn verify_engine_determinism<F>(setup_fn: F, num_ticks: u64) -> bool
where
    F: Fn() -> Engine,
{
    verify_determinism(
        2,
        num_ticks,
        &setup_fn,
        |engine| {
            engine.tick();
        },
        |engine| engine.world().state_hash(),
    )
    .is_deterministic
}

/// Final world hashes of `num_sims` engines run on scoped threads.
///
/// # Panics
///
/// Panics if a simulation thread panics.
pub fn run_parallel_engines<F>(setup_fn: F, num_sims: usize, num_ticks: u64) -> Vec<u64>
where
    F: Fn() -> Engine + Sync,
{
    thread::scope(|s| {
        let handles: Vec<_> = (0..num_sims)
            .map(|_| {
                s.spawn(|| {
                    let mut engine = setup_fn();
                    for _ in 0..num_ticks {
                        engine.tick();
                    }
                    engine.world().state_hash()
                })
            })
            .collect();

        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
}

/// Compare two runs tick-by-tick.
///
/// Returns `None` if they never differ, `Some(tick)` at the first tick
/// after which their states differ (`0` for differing setups).
pub fn find_first_divergence<F>(setup_fn: F, num_ticks: u64) -> Option<u64>
where
    F: Fn() -> Engine,
{
    let mut a = setup_fn();
    let mut b = setup_fn();

    if a.world().state_hash() != b.world().state_hash() {
        return Some(0);
    }

    for tick in 1..=num_ticks {
        a.tick();
        b.tick();

        if a.world().state_hash() != b.world().state_hash() {
            tracing::warn!(tick, "runs diverged");
            return Some(tick);
        }
    }

    None
}

/// Verify that a bincode round trip preserves the world exactly.
pub fn verify_serialization_determinism<F>(setup_fn: F, num_ticks: u64) -> bool
where
    F: Fn() -> Engine,
{
    let mut engine = setup_fn();
    for _ in 0..num_ticks {
        engine.tick();
    }

    let hash_before = engine.world().state_hash();

    let Ok(bytes) = engine.world().serialize() else {
        return false;
    };
    let Ok(restored) = World::deserialize(&bytes) else {
        return false;
    };

    hash_before == restored.state_hash() && &restored == engine.world()
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// A command a test issues on behalf of a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptedCommand {
    /// `MOVE from to`.
    Move {
        /// Issuing player.
        player: PlayerId,
        /// Unit tile.
        from: Coord,
        /// Requested destination.
        to: Coord,
    },
    /// `FIRE from to`.
    Fire {
        /// Issuing player.
        player: PlayerId,
        /// Unit tile.
        from: Coord,
        /// Target tile.
        to: Coord,
    },
}

impl ScriptedCommand {
    /// Issue the command.
    ///
    /// # Errors
    ///
    /// Returns the gateway's rejection.
    pub fn apply(&self, engine: &mut Engine) -> Result<()> {
        match *self {
            Self::Move { player, from, to } => engine.move_unit(from, to, player).map(|_| ()),
            Self::Fire { player, from, to } => engine.fire(from, to, player),
        }
    }
}

/// Commands keyed by the tick before which they are issued.
pub type Script = Vec<(u64, ScriptedCommand)>;

/// Run `num_ticks` ticks, issuing each scripted command right before its
/// tick. Rejected commands are ignored. Returns the final world hash.
pub fn run_script(engine: &mut Engine, script: &[(u64, ScriptedCommand)], num_ticks: u64) -> u64 {
    for t in 0..num_ticks {
        for (_, command) in script.iter().filter(|(at, _)| *at == t) {
            let _ = command.apply(engine);
        }
        engine.tick();
    }
    engine.world().state_hash()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{duel, engine, skirmish};
    use tw_core::constants::{BLUE, RED};

    #[test]
    fn test_verify_determinism_simple() {
        let result = verify_determinism(3, 10, || 0u64, |s| *s += 1, |s| *s);
        assert!(result.is_deterministic);
        assert_eq!(result.unique_hashes(), vec![10]);
    }

    #[test]
    #[should_panic(expected = "non-deterministic")]
    fn test_assert_deterministic_panics() {
        DeterminismResult {
            is_deterministic: false,
            hashes: vec![1, 2],
            ticks: 1,
        }
        .assert_deterministic();
    }

    #[test]
    fn test_duel_determinism() {
        assert!(verify_engine_determinism(|| engine(duel(), 7), 300));
    }

    #[test]
    fn test_skirmish_has_no_divergence() {
        assert_eq!(find_first_divergence(|| engine(skirmish(1), 1), 200), None);
    }

    #[test]
    fn test_parallel_skirmishes_match() {
        let hashes = run_parallel_engines(|| engine(skirmish(2), 5), 4, 150);
        assert_eq!(hashes.len(), 4);
        assert!(hashes.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_serialization_preserves_world() {
        assert!(verify_serialization_determinism(|| engine(skirmish(3), 3), 120));
    }

    #[test]
    fn test_script_replays() {
        let script: Script = vec![
            (
                0,
                ScriptedCommand::Move {
                    player: RED,
                    from: Coord::new(2, 4),
                    to: Coord::new(4, 4),
                },
            ),
            (
                5,
                ScriptedCommand::Fire {
                    player: BLUE,
                    from: Coord::new(7, 4),
                    to: Coord::new(6, 4),
                },
            ),
        ];
        let a = run_script(&mut engine(duel(), 11), &script, 200);
        let b = run_script(&mut engine(duel(), 11), &script, 200);
        assert_eq!(a, b);
    }

    #[test]
    fn test_compute_hash_is_stable() {
        assert_eq!(compute_hash(&(1, "a")), compute_hash(&(1, "a")));
    }
}
