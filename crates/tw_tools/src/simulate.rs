//! Headless simulation runs for balance checks and replay verification.

use std::collections::BTreeMap;

use serde::Serialize;
use tw_core::constants::{PlayerId, NEUTRAL};
use tw_core::engine::Engine;
use tw_core::grid::World;

/// Outcome of a headless run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationSummary {
    /// Ticks simulated.
    pub ticks: u64,
    /// Seed of the random source.
    pub seed: u64,
    /// Hash of the final world.
    pub state_hash: u64,
    /// Surviving units per player.
    pub units: BTreeMap<PlayerId, usize>,
    /// Units destroyed during the run.
    pub destroyed: usize,
    /// Shots resolved during the run.
    pub shots: usize,
    /// Reinforcements spawned during the run.
    pub spawned: usize,
}

/// Tick `world` `ticks` times with no commands.
#[must_use]
pub fn simulate(world: World, ticks: u64, seed: u64) -> SimulationSummary {
    let mut engine = Engine::with_seed(world, seed);
    let mut destroyed = 0;
    let mut shots = 0;
    let mut spawned = 0;

    for _ in 0..ticks {
        let report = engine.tick();
        destroyed += report.destroyed.len();
        shots += report.shots.len();
        spawned += report.spawned.len();
    }

    let mut units = BTreeMap::new();
    for tile in engine.world().units(NEUTRAL) {
        if let Some(unit) = tile.unit.as_ref() {
            *units.entry(unit.player).or_insert(0) += 1;
        }
    }

    let summary = SimulationSummary {
        ticks,
        seed,
        state_hash: engine.world().state_hash(),
        units,
        destroyed,
        shots,
        spawned,
    };
    tracing::info!(ticks, seed, state_hash = summary.state_hash, "simulation finished");
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use tw_test_utils::fixtures::skirmish;

    #[test]
    fn test_same_seed_same_summary() {
        let a = simulate(skirmish(1), 400, 9);
        let b = simulate(skirmish(1), 400, 9);
        assert_eq!(a, b);
        assert_eq!(a.ticks, 400);
    }

    #[test]
    fn test_reinforcements_counted() {
        // the skirmish schedules its first reinforcement at tick 300
        let summary = simulate(skirmish(2), 301, 0);
        assert_eq!(summary.spawned, 2);
        assert_eq!(summary.units.values().sum::<usize>(), 10);
    }
}
