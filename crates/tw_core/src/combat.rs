//! Dice-based combat resolution and terrain degradation.
//!
//! Attacker and defender each roll twenty-sided dice, sort them and keep the
//! best three. The attacker rolls two extra dice unless demoralized; the
//! defender rolls one extra die per armour point and adds its armour as a
//! flat bonus. Damage is the difference, never less than [`MIN_DAMAGE`].

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{Terrain, NEUTRAL};
use crate::grid::Tile;

/// Sides of every die.
pub const DIE_SIDES: i32 = 20;

/// Dice kept by both sides.
pub const KEPT_DICE: usize = 3;

/// Extra attack dice of a unit that is not demoralized.
pub const BONUS_DICE: usize = 2;

/// Damage floor of any resolved hit.
pub const MIN_DAMAGE: i32 = 3;

/// Outcome of a single hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Damage {
    /// Health removed from the target.
    pub amount: i32,
    /// Critical hits demoralize the target.
    pub critical: bool,
}

/// Roll `kept + extra` dice and return the sum of the best `kept` plus `bonus`.
pub fn roll_dice<R: Rng>(rng: &mut R, kept: usize, extra: usize, bonus: i32) -> i32 {
    let mut dice: Vec<i32> = (0..kept + extra)
        .map(|_| rng.gen_range(1..=DIE_SIDES))
        .collect();
    dice.sort_unstable_by(|a, b| b.cmp(a));
    dice.iter().take(kept).sum::<i32>() + bonus
}

/// Roll the damage of one hit against a defender with `defender_armour`.
pub fn roll_damage<R: Rng>(rng: &mut R, attacker_demoralized: bool, defender_armour: i32) -> Damage {
    let bonus = if attacker_demoralized { 0 } else { BONUS_DICE };
    let armour = defender_armour.max(0);

    let attack = roll_dice(rng, KEPT_DICE, bonus, 0);
    let defense = roll_dice(rng, KEPT_DICE, armour as usize, armour);

    let amount = (attack - defense).max(MIN_DAMAGE);

    let flip = rng.gen_range(0..100);
    let critical = (flip < 5 && amount > 10) || (flip < 60 && amount > 30) || amount > 50;

    Damage { amount, critical }
}

/// A permanent change caused by fire hitting a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerrainChange {
    /// A base lost its owner.
    BaseNeutralized,
    /// Terrain was degraded.
    Degraded {
        /// Terrain before the hit.
        from: Terrain,
        /// Terrain after the hit.
        to: Terrain,
    },
}

/// Apply the effect of a shot on the terrain of `tile`.
///
/// Bases may lose their owner; structure, forest, grass and dirt may degrade
/// one step. Terrain never improves.
pub fn degrade_terrain<R: Rng>(rng: &mut R, tile: &mut Tile) -> Option<TerrainChange> {
    let (odds, next) = match tile.terrain {
        Terrain::Base => {
            if rng.gen_range(0..5) == 0 && tile.owner != NEUTRAL {
                tile.owner = NEUTRAL;
                return Some(TerrainChange::BaseNeutralized);
            }
            return None;
        }
        Terrain::Structure => (10, Terrain::Forest),
        Terrain::Forest => (10, Terrain::Grass),
        Terrain::Grass => (15, Terrain::Dirt),
        Terrain::Dirt => (25, Terrain::Hole),
        Terrain::Hill | Terrain::Hole | Terrain::Mountain | Terrain::Water => return None,
    };

    if rng.gen_range(0..odds) != 0 {
        return None;
    }
    let from = tile.terrain;
    tile.terrain = next;
    Some(TerrainChange::Degraded { from, to: next })
}
