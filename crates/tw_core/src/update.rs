//! The per-tick update pipeline.
//!
//! [`tick`] advances the world by exactly one step. The steps always run in
//! this order:
//!
//! 1. **Ownership** - occupied bases change hands
//! 2. **Supply** - supply levels spread out from owned bases
//! 3. **Movement** - moving units switch tiles at their switch point
//! 4. **Fire** - shots are resolved one tick before the activity ends
//! 5. **Reinforcements** - scheduled units spawn near supplied bases
//! 6. **Attributes** - stats are refreshed and ammunition refilled
//! 7. **Healing** - units on bases recover every 100 ticks
//! 8. **Visibility** - what each player sees is recomputed
//! 9. The tick counter advances
//!
//! No step fails. Missing tiles or units make a step skip that entry.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::combat::{degrade_terrain, roll_damage, TerrainChange};
use crate::constants::{
    PlayerId, Terrain, UnitKind, Visibility, GAME_SPEED, MAX_HEALTH, MAX_SUPPLY, NEUTRAL,
    SUPPLY_SPEED,
};
use crate::grid::{Coord, World};
use crate::math::{ratio, Fixed};
use crate::stats::stats;
use crate::unit::{ActivityKind, UnitId};

/// Ticks between two healing rounds.
pub const HEAL_INTERVAL: u64 = 100;

/// Reinforcements only appear on tiles with a supply level below this.
pub const SPAWN_SUPPLY_LIMIT: usize = 9;

/// A unit changed tiles, or failed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveEvent {
    /// The moving unit.
    pub unit: UnitId,
    /// Tile it left (or stayed on).
    pub from: Coord,
    /// Tile it entered (or could not enter).
    pub to: Coord,
}

/// A shot that was resolved this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotEvent {
    /// The firing unit.
    pub attacker: UnitId,
    /// The tile that was hit.
    pub target: Coord,
    /// Unit that took damage, if the tile was occupied.
    pub victim: Option<UnitId>,
    /// Damage dealt; zero for an empty tile.
    pub damage: i32,
    /// Whether the hit was critical.
    pub critical: bool,
}

/// A reinforcement unit appeared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnEvent {
    /// New unit.
    pub unit: UnitId,
    /// Owning player.
    pub player: PlayerId,
    /// Unit kind.
    pub kind: UnitKind,
    /// Where it spawned.
    pub at: Coord,
}

/// Everything that happened during one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    /// The tick that was processed.
    pub tick: u64,
    /// Units that switched tiles.
    pub moves: Vec<MoveEvent>,
    /// Moves aborted because the destination was occupied.
    pub aborted_moves: Vec<MoveEvent>,
    /// Resolved shots.
    pub shots: Vec<ShotEvent>,
    /// Units removed with health at or below zero.
    pub destroyed: Vec<UnitId>,
    /// Terrain effects of shots.
    pub terrain_changes: Vec<(Coord, TerrainChange)>,
    /// Reinforcements.
    pub spawned: Vec<SpawnEvent>,
}

impl TickReport {
    /// Whether nothing noteworthy happened.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
            && self.aborted_moves.is_empty()
            && self.shots.is_empty()
            && self.destroyed.is_empty()
            && self.terrain_changes.is_empty()
            && self.spawned.is_empty()
    }
}

/// Advance the world by one tick.
///
/// A frozen world is left untouched, including the tick counter.
pub fn tick<R: Rng>(world: &mut World, rng: &mut R) -> TickReport {
    let mut report = TickReport {
        tick: world.tick,
        ..TickReport::default()
    };
    if world.freeze {
        return report;
    }

    update_base_owner(world);
    update_supply(world);
    process_moves(world, &mut report);
    process_fire(world, rng, &mut report);
    spawn_reinforcements(world, rng, &mut report);
    refresh_attributes(world);
    heal_units(world);
    update_visibility(world);

    world.tick += 1;

    #[cfg(debug_assertions)]
    {
        let hash = world.state_hash();
        tracing::debug!(tick = world.tick, state_hash = hash, "world state hash");
    }

    report
}

/// Units on a base claim it for their player. Ownership stays after the
/// unit leaves.
pub fn update_base_owner(world: &mut World) {
    for tile in world.tiles_mut() {
        if tile.terrain != Terrain::Base {
            continue;
        }
        if let Some(ref unit) = tile.unit {
            tile.owner = unit.player;
        }
    }
}

/// Rebuild all supply maps from the owned bases.
///
/// An owned base has supply 1 for its owner; tiles `n` hops away get
/// `n + 1`, up to [`MAX_SUPPLY`]. The best (lowest) level wins.
pub fn update_supply(world: &mut World) {
    for tile in world.tiles_mut() {
        tile.supply.clear();
    }

    let bases: Vec<(Coord, PlayerId)> = world
        .bases()
        .into_iter()
        .filter(|b| b.owner != NEUTRAL)
        .map(|b| (b.coord(), b.owner))
        .collect();

    for (base, owner) in bases {
        if let Some(tile) = world.tile_mut(base) {
            tile.supply.insert(owner, 1);
        }

        for (band, coords) in world.ext_neighbors(base, MAX_SUPPLY).into_iter().enumerate() {
            let level = band + 1;
            for c in coords {
                let Some(tile) = world.tile_mut(c) else {
                    continue;
                };
                let entry = tile.supply.entry(owner).or_insert(level);
                *entry = (*entry).min(level);
            }
        }
    }
}

/// Coordinates and ids of all units, in grid order.
fn unit_roster(world: &World) -> Vec<(Coord, UnitId)> {
    world
        .units(NEUTRAL)
        .into_iter()
        .filter_map(|t| t.unit.as_ref().map(|u| (t.coord(), u.id)))
        .collect()
}

/// Whether the unit `id` still stands on `coord`.
fn still_there(world: &World, coord: Coord, id: UnitId) -> bool {
    world.unit_at(coord).is_some_and(|u| u.id == id)
}

/// Carry out MOVE activities.
///
/// Expired activities are cleared. At the switch point the unit relocates
/// unless the destination is occupied, which aborts the move.
pub fn process_moves(world: &mut World, report: &mut TickReport) {
    let now = world.tick;

    for (coord, id) in unit_roster(world) {
        if !still_there(world, coord, id) {
            continue;
        }
        let Some(unit) = world.unit_at_mut(coord) else {
            continue;
        };
        let Some(activity) = unit.activity else {
            continue;
        };
        if activity.kind != ActivityKind::Move {
            continue;
        }
        if activity.end < now {
            unit.activity = None;
            continue;
        }
        if activity.switch_point() != now {
            continue;
        }

        let event = MoveEvent {
            unit: id,
            from: coord,
            to: activity.to,
        };

        let destination_free = world.tile(activity.to).is_some_and(|t| t.unit.is_none());
        if !destination_free {
            if let Some(unit) = world.unit_at_mut(coord) {
                unit.activity = None;
            }
            tracing::warn!(tick = now, unit = id, to = %activity.to, "move aborted, destination occupied");
            report.aborted_moves.push(event);
            continue;
        }

        let Some(mut unit) = world.tile_mut(coord).and_then(|t| t.unit.take()) else {
            continue;
        };
        unit.position = activity.to;
        if let Some(target) = world.tile_mut(activity.to) {
            target.unit = Some(unit);
        }
        report.moves.push(event);
    }
}

/// Resolve FIRE activities.
///
/// Expired activities are cleared. One tick before the activity ends the
/// target tile is hit: its terrain may degrade and any unit on it takes
/// damage, dying at zero health.
pub fn process_fire<R: Rng>(world: &mut World, rng: &mut R, report: &mut TickReport) {
    let now = world.tick;

    for (coord, id) in unit_roster(world) {
        if !still_there(world, coord, id) {
            continue;
        }
        let Some(attacker) = world.unit_at_mut(coord) else {
            continue;
        };
        let Some(activity) = attacker.activity else {
            continue;
        };
        if activity.kind != ActivityKind::Fire {
            continue;
        }
        if activity.end < now {
            attacker.activity = None;
            continue;
        }
        if activity.impact_tick() != Some(now) {
            continue;
        }
        let demoralized = attacker.demoralized;

        let Some(target) = world.tile_mut(activity.to) else {
            continue;
        };
        if let Some(change) = degrade_terrain(rng, target) {
            report.terrain_changes.push((activity.to, change));
        }

        let mut shot = ShotEvent {
            attacker: id,
            target: activity.to,
            victim: None,
            damage: 0,
            critical: false,
        };

        if let Some(victim) = target.unit.as_mut() {
            let damage = roll_damage(rng, demoralized, victim.armour);
            victim.health -= damage.amount;
            if damage.critical {
                victim.demoralized = true;
            }
            shot.victim = Some(victim.id);
            shot.damage = damage.amount;
            shot.critical = damage.critical;

            if victim.health <= 0 {
                report.destroyed.push(victim.id);
                tracing::debug!(tick = now, unit = victim.id, by = id, "unit destroyed");
                target.unit = None;
            }
        }

        report.shots.push(shot);
    }
}

/// Spawn the reinforcement scheduled for the current tick.
///
/// Every player with supplied, free, spawnable tiles gets one unit. Candidate
/// tiles are shuffled, then stably sorted by supply, so ties are broken at
/// random but better supplied tiles always win.
pub fn spawn_reinforcements<R: Rng>(world: &mut World, rng: &mut R, report: &mut TickReport) {
    let Some(&kind) = world.reinforcement.get(&world.tick) else {
        return;
    };

    let mut candidates: BTreeMap<PlayerId, Vec<(Coord, usize)>> = BTreeMap::new();
    for tile in world.tiles() {
        if tile.unit.is_some() || !tile.terrain.is_spawnable() {
            continue;
        }
        for (&player, &supply) in &tile.supply {
            if supply > 0 && supply < SPAWN_SUPPLY_LIMIT {
                candidates
                    .entry(player)
                    .or_default()
                    .push((tile.coord(), supply));
            }
        }
    }

    for (player, tiles) in &mut candidates {
        tiles.shuffle(rng);
        tiles.sort_by_key(|&(_, supply)| supply);

        for &(at, _) in tiles.iter() {
            if let Some(unit) = world.spawn_unit(at, *player, kind) {
                tracing::debug!(tick = world.tick, player = *player, ?kind, %at, "reinforcement");
                report.spawned.push(SpawnEvent {
                    unit,
                    player: *player,
                    kind,
                    at,
                });
                break;
            }
        }
    }
}

/// Copy the stats of each unit's terrain onto it and refill ammunition.
///
/// Supplied units gain `1 / (supply * 2 * GAME_SPEED)` rounds per tick,
/// capped at the kind's maximum.
pub fn refresh_attributes(world: &mut World) {
    for tile in world.tiles_mut() {
        let terrain = tile.terrain;
        let Some(unit) = tile.unit.as_mut() else {
            continue;
        };
        let supply = tile.supply.get(&unit.player).copied();
        let s = stats(unit.kind, terrain);

        unit.view = s.view;
        unit.close_view = s.close_view;
        unit.armour = s.armour;
        unit.fire_range = s.fire_range;
        unit.speed = s.speed;
        unit.fire_speed = s.fire_speed;
        unit.hidden = s.hidden;

        if let Some(level) = supply.filter(|l| (1..=MAX_SUPPLY).contains(l)) {
            let denominator = level as i32 * 2 * GAME_SPEED as i32;
            unit.ammunition += ratio(SUPPLY_SPEED, denominator);
        }

        let cap = Fixed::from_num(s.max_ammunition);
        if unit.ammunition > cap {
            unit.ammunition = cap;
        }
    }
}

/// Every [`HEAL_INTERVAL`] ticks, units on a base heal one point and
/// recover from demoralization.
pub fn heal_units(world: &mut World) {
    if world.tick % HEAL_INTERVAL != 0 {
        return;
    }
    for tile in world.tiles_mut() {
        if tile.terrain != Terrain::Base {
            continue;
        }
        if let Some(unit) = tile.unit.as_mut() {
            unit.demoralized = false;
            if unit.health < MAX_HEALTH {
                unit.health += 1;
            }
        }
    }
}

/// Rebuild all visibility maps from unit positions.
///
/// A unit sees its own tile closely. Band `i` around it is seen closely if
/// `i < close_view` and normally if `i < view`. The best level wins.
pub fn update_visibility(world: &mut World) {
    for tile in world.tiles_mut() {
        tile.visibility.clear();
    }

    let observers: Vec<(Coord, PlayerId, usize, usize)> = world
        .units(NEUTRAL)
        .into_iter()
        .filter_map(|t| {
            let u = t.unit.as_ref()?;
            Some((t.coord(), u.player, u.view, u.close_view))
        })
        .collect();

    for (coord, player, view, close_view) in observers {
        if let Some(tile) = world.tile_mut(coord) {
            tile.visibility.insert(player, Visibility::CloseView);
        }

        for (band, coords) in world.ext_neighbors(coord, view).into_iter().enumerate() {
            let level = if band < close_view {
                Visibility::CloseView
            } else if band < view {
                Visibility::NormalView
            } else {
                continue;
            };
            for c in coords {
                let Some(tile) = world.tile_mut(c) else {
                    continue;
                };
                let entry = tile.visibility.entry(player).or_insert(level);
                *entry = (*entry).max(level);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{BLUE, RED};
    use crate::unit::Activity;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    #[test]
    fn test_base_owner_is_sticky() {
        let mut world = World::new(10, 10);
        let base = Coord::new(5, 5);
        world.tile_mut(base).unwrap().terrain = Terrain::Base;
        world.spawn_unit(base, RED, UnitKind::Soldier);

        assert_eq!(world.tile(base).unwrap().owner, NEUTRAL);
        update_base_owner(&mut world);
        assert_eq!(world.tile(base).unwrap().owner, RED);

        world.tile_mut(base).unwrap().unit = None;
        update_base_owner(&mut world);
        assert_eq!(world.tile(base).unwrap().owner, RED);
    }

    #[test]
    fn test_supply_from_lone_base() {
        let mut world = World::new(10, 10);
        let base = world.tile_mut(Coord::new(9, 0)).unwrap();
        base.terrain = Terrain::Base;
        base.owner = RED;

        assert!(world.tile(Coord::new(0, 0)).unwrap().supply.is_empty());
        update_supply(&mut world);

        let far = world.tile(Coord::new(0, 0)).unwrap();
        assert_eq!(far.supply.len(), 1);
        assert_eq!(far.supply_for(RED), Some(9));
        assert_eq!(far.supply_for(BLUE), None);
        assert_eq!(world.tile(Coord::new(9, 0)).unwrap().supply_for(RED), Some(1));
    }

    #[test]
    fn test_supply_keeps_best_level() {
        let mut world = World::new(10, 1);
        for x in [0, 9] {
            let base = world.tile_mut(Coord::new(x, 0)).unwrap();
            base.terrain = Terrain::Base;
            base.owner = RED;
        }
        update_supply(&mut world);
        assert_eq!(world.tile(Coord::new(1, 0)).unwrap().supply_for(RED), Some(2));
        assert_eq!(world.tile(Coord::new(8, 0)).unwrap().supply_for(RED), Some(2));
        assert_eq!(world.tile(Coord::new(4, 0)).unwrap().supply_for(RED), Some(5));
    }

    #[test]
    fn test_neutral_bases_supply_nobody() {
        let mut world = World::new(5, 5);
        world.tile_mut(Coord::new(2, 2)).unwrap().terrain = Terrain::Base;
        update_supply(&mut world);
        assert!(world.tiles().all(|t| t.supply.is_empty()));
    }

    #[test]
    fn test_visibility_of_tank_on_hill() {
        let mut world = World::new(10, 10);
        let at = Coord::new(9, 0);
        world.tile_mut(at).unwrap().terrain = Terrain::Hill;
        world.spawn_unit(at, RED, UnitKind::Tank);

        assert!(world.tile(Coord::new(8, 0)).unwrap().visibility.is_empty());
        refresh_attributes(&mut world);
        update_visibility(&mut world);

        let near = world.tile(Coord::new(8, 0)).unwrap();
        assert_eq!(near.visibility.len(), 1);
        assert_eq!(near.visibility_for(RED), Visibility::CloseView);
        assert_eq!(near.visibility_for(BLUE), Visibility::FogOfWar);
        assert_eq!(world.tile(at).unwrap().visibility_for(RED), Visibility::CloseView);
        assert_eq!(world.tile(Coord::new(7, 0)).unwrap().visibility_for(RED), Visibility::CloseView);
        assert_eq!(world.tile(Coord::new(6, 0)).unwrap().visibility_for(RED), Visibility::NormalView);
        assert_eq!(world.tile(Coord::new(5, 0)).unwrap().visibility_for(RED), Visibility::NormalView);
        assert!(world.tile(Coord::new(4, 0)).unwrap().visibility.is_empty());
    }

    #[test]
    fn test_refresh_attributes_clamps_fresh_ammunition() {
        let mut world = World::new(10, 10);
        let at = Coord::new(5, 5);
        let tile = world.tile_mut(at).unwrap();
        tile.owner = RED;
        tile.terrain = Terrain::Grass;
        world.spawn_unit(at, RED, UnitKind::Soldier);

        refresh_attributes(&mut world);

        let unit = world.unit_at(at).unwrap();
        assert_eq!(unit.view, 3);
        assert_eq!(unit.close_view, 1);
        assert_eq!(unit.armour, 0);
        assert_eq!(unit.fire_range, 1);
        assert_eq!(unit.speed, 90);
        assert_eq!(unit.fire_speed, 69);
        assert!(unit.hidden);
        assert_eq!(unit.ammunition, Fixed::from_num(9));
    }

    #[test]
    fn test_ammunition_refill_rate() {
        let mut world = World::new(3, 3);
        let at = Coord::new(1, 1);
        let tile = world.tile_mut(at).unwrap();
        tile.terrain = Terrain::Base;
        tile.owner = RED;
        world.spawn_unit(at, RED, UnitKind::Tank);
        world.unit_at_mut(at).unwrap().ammunition = Fixed::ZERO;
        update_supply(&mut world);

        for _ in 0..60 {
            refresh_attributes(&mut world);
        }
        assert!(world.unit_at(at).unwrap().ammunition < Fixed::ONE);
        refresh_attributes(&mut world);
        assert!(world.unit_at(at).unwrap().ammunition >= Fixed::ONE);
    }

    #[test]
    fn test_heal_units() {
        let mut world = World::new(10, 10);
        let at = Coord::new(5, 5);
        let tile = world.tile_mut(at).unwrap();
        tile.terrain = Terrain::Base;
        tile.owner = RED;
        world.spawn_unit(at, RED, UnitKind::Soldier);
        world.unit_at_mut(at).unwrap().health = 50;

        world.tick = 100;
        heal_units(&mut world);
        let unit = world.unit_at(at).unwrap();
        assert_eq!(unit.health, 51);
        assert!(!unit.demoralized);

        world.tick = 150;
        heal_units(&mut world);
        assert_eq!(world.unit_at(at).unwrap().health, 51);

        world.tick = 200;
        world.unit_at_mut(at).unwrap().demoralized = true;
        heal_units(&mut world);
        assert!(!world.unit_at(at).unwrap().demoralized);
    }

    #[test]
    fn test_heal_caps_at_full_health() {
        let mut world = World::new(3, 3);
        let at = Coord::new(1, 1);
        world.tile_mut(at).unwrap().terrain = Terrain::Base;
        world.spawn_unit(at, RED, UnitKind::Soldier);
        heal_units(&mut world);
        assert_eq!(world.unit_at(at).unwrap().health, MAX_HEALTH);
    }

    #[test]
    fn test_move_switches_tile_at_switch_point() {
        let mut world = World::new(10, 10);
        let from = Coord::new(5, 5);
        let to = Coord::new(5, 6);
        world.spawn_unit(from, RED, UnitKind::Tank);
        refresh_attributes(&mut world);
        world.move_unit(from, to, RED).unwrap();

        let mut rng = rng();
        let mut switched_at = None;
        for _ in 0..80 {
            let report = tick(&mut world, &mut rng);
            if !report.moves.is_empty() {
                switched_at = Some(report.tick);
            }
        }
        assert_eq!(switched_at, Some(35));
        assert!(world.unit_at(from).is_none());
        let unit = world.unit_at(to).unwrap();
        assert_eq!(unit.position, to);
        assert!(unit.activity.is_none());
    }

    #[test]
    fn test_move_aborted_when_destination_taken() {
        let mut world = World::new(10, 10);
        let from = Coord::new(5, 5);
        let to = Coord::new(5, 6);
        world.spawn_unit(from, RED, UnitKind::Tank);
        refresh_attributes(&mut world);
        world.move_unit(from, to, RED).unwrap();
        world.spawn_unit(to, BLUE, UnitKind::Soldier);

        let mut rng = rng();
        let mut aborted = 0;
        for _ in 0..80 {
            aborted += tick(&mut world, &mut rng).aborted_moves.len();
        }
        assert_eq!(aborted, 1);
        assert_eq!(world.unit_at(from).unwrap().player, RED);
        assert!(world.unit_at(from).unwrap().activity.is_none());
        assert_eq!(world.unit_at(to).unwrap().player, BLUE);
    }

    #[test]
    fn test_unit_processed_once_per_tick() {
        let mut world = World::new(10, 1);
        world.spawn_unit(Coord::new(0, 0), RED, UnitKind::Tank);
        world.unit_at_mut(Coord::new(0, 0)).unwrap().activity = Some(Activity {
            kind: ActivityKind::Move,
            from: Coord::new(0, 0),
            to: Coord::new(1, 0),
            start: 0,
            end: 0,
        });
        let mut report = TickReport::default();
        process_moves(&mut world, &mut report);
        assert_eq!(report.moves.len(), 1);
        assert!(world.unit_at(Coord::new(1, 0)).is_some());
    }

    #[test]
    fn test_fire_resolves_one_tick_before_end() {
        let mut world = World::new(10, 10);
        let from = Coord::new(5, 5);
        let target = Coord::new(5, 6);
        world.tile_mut(target).unwrap().terrain = Terrain::Hill;
        world.spawn_unit(from, RED, UnitKind::Tank);
        world.spawn_unit(target, BLUE, UnitKind::Tank);
        refresh_attributes(&mut world);
        world.fire(from, target, RED).unwrap();

        let mut rng = rng();
        let mut shots = Vec::new();
        for _ in 0..62 {
            let report = tick(&mut world, &mut rng);
            shots.extend(report.shots.iter().map(|s| (report.tick, *s)));
        }
        assert_eq!(shots.len(), 1);
        let (at, shot) = shots[0];
        assert_eq!(at, 59);
        assert!(shot.victim.is_some());
        assert!(shot.damage >= 3);
        let victim = world.unit_at(target).unwrap();
        assert_eq!(victim.health, MAX_HEALTH - shot.damage);
        assert!(world.unit_at(from).unwrap().activity.is_none());
    }

    #[test]
    fn test_fire_removes_dead_unit() {
        let mut world = World::new(10, 10);
        let from = Coord::new(5, 5);
        let target = Coord::new(5, 6);
        world.spawn_unit(from, RED, UnitKind::Tank);
        world.spawn_unit(target, BLUE, UnitKind::Soldier);
        world.unit_at_mut(target).unwrap().health = 1;
        world.unit_at_mut(from).unwrap().activity = Some(Activity {
            kind: ActivityKind::Fire,
            from,
            to: target,
            start: 0,
            end: 1,
        });

        let mut report = TickReport::default();
        process_fire(&mut world, &mut rng(), &mut report);
        assert_eq!(report.destroyed.len(), 1);
        assert!(world.unit_at(target).is_none());
    }

    #[test]
    fn test_reinforcements_spawn_near_best_supply() {
        let mut world = World::new(10, 10);
        let base = Coord::new(5, 5);
        let tile = world.tile_mut(base).unwrap();
        tile.terrain = Terrain::Base;
        tile.owner = RED;
        world.reinforcement.insert(0, UnitKind::Soldier);

        let report = tick(&mut world, &mut rng());
        assert_eq!(report.spawned.len(), 1);
        let spawn = report.spawned[0];
        assert_eq!(spawn.player, RED);
        assert_eq!(spawn.kind, UnitKind::Soldier);
        // the base itself is the only tile with supply 1
        assert_eq!(spawn.at, base);
        assert_eq!(world.unit_at(base).unwrap().player, RED);
    }

    #[test]
    fn test_reinforcements_skip_blocked_tiles() {
        let mut world = World::new(10, 10);
        let base = Coord::new(5, 5);
        let tile = world.tile_mut(base).unwrap();
        tile.terrain = Terrain::Base;
        tile.owner = RED;
        world.spawn_unit(base, RED, UnitKind::Tank);
        for c in world.neighbors(base) {
            world.tile_mut(c).unwrap().terrain = Terrain::Water;
        }
        world.reinforcement.insert(0, UnitKind::Tank);

        let report = tick(&mut world, &mut rng());
        assert_eq!(report.spawned.len(), 1);
        let supply = world.tile(report.spawned[0].at).unwrap().supply_for(RED);
        assert_eq!(supply, Some(3));
    }

    #[test]
    fn test_no_reinforcement_without_schedule() {
        let mut world = World::new(5, 5);
        let tile = world.tile_mut(Coord::new(2, 2)).unwrap();
        tile.terrain = Terrain::Base;
        tile.owner = RED;
        world.reinforcement.insert(5, UnitKind::Tank);
        let report = tick(&mut world, &mut rng());
        assert!(report.spawned.is_empty());
    }

    #[test]
    fn test_frozen_world_is_untouched() {
        let mut world = World::new(6, 6);
        world.spawn_unit(Coord::new(2, 2), RED, UnitKind::Tank);
        world.freeze = true;
        let before = world.serialize().unwrap();

        let report = tick(&mut world, &mut rng());
        assert!(report.is_empty());
        assert_eq!(world.serialize().unwrap(), before);
        assert_eq!(world.tick, 0);
    }

    #[test]
    fn test_tick_increments_counter() {
        let mut world = World::new(4, 4);
        let mut rng = rng();
        for expected in 1..=5 {
            tick(&mut world, &mut rng);
            assert_eq!(world.tick, expected);
        }
    }
}
