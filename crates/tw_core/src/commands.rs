//! The command gateway: validating Move and Fire requests.
//!
//! These two methods are the only legal way to give a unit an intent. On
//! success they attach an [`Activity`] to the unit; the tick pipeline
//! carries it out later.

use crate::constants::{PlayerId, NEUTRAL};
use crate::error::{GameError, Result};
use crate::grid::{Coord, World};
use crate::math::Fixed;
use crate::pathfinding::find_path;
use crate::unit::{Activity, ActivityKind, Unit};

impl World {
    /// Look up the idle unit on `from` that `player` may command.
    fn commandable_unit(&self, from: Coord, to: Coord, player: PlayerId) -> Result<&Unit> {
        let source = self.require_tile(from)?;
        self.require_tile(to)?;

        let unit = source.unit.as_ref().ok_or(GameError::NoUnit(from))?;
        if player != NEUTRAL && unit.player != player {
            return Err(GameError::WrongPlayer {
                owner: unit.player,
                player,
            });
        }
        if unit.is_busy() {
            return Err(GameError::UnitBusy);
        }
        Ok(unit)
    }

    /// Order the unit on `from` to move towards `to`.
    ///
    /// If `to` is not adjacent, the first step of a path towards it is used
    /// instead. `player` restricts the command to that player's units; `0`
    /// accepts any unit. Returns the tile the unit will actually move to.
    pub fn move_unit(&mut self, from: Coord, to: Coord, player: PlayerId) -> Result<Coord> {
        let unit = self.commandable_unit(from, to, player)?;
        let kind = unit.kind;
        let speed = unit.speed;
        if speed == 0 {
            return Err(GameError::NotReady);
        }

        let target = if self.is_neighbor(from, to) {
            to
        } else {
            match find_path(self, kind, from, to) {
                Some(path) if path.len() > 1 => path[1],
                _ => return Err(GameError::NoPath),
            }
        };

        let terrain = self.require_tile(target)?.terrain;
        if !kind.can_enter(terrain) {
            return Err(GameError::InvalidTarget);
        }

        let tick = self.tick;
        let unit = self.unit_at_mut(from).ok_or(GameError::NoUnit(from))?;
        unit.activity = Some(Activity {
            kind: ActivityKind::Move,
            from,
            to: target,
            start: tick,
            end: tick + speed,
        });

        tracing::debug!(tick, unit = unit.id, %from, to = %target, "move accepted");
        Ok(target)
    }

    /// Order the unit on `from` to fire at `to`.
    ///
    /// The target must lie within the unit's fire range and the unit needs
    /// at least one full round of ammunition, which is spent immediately.
    pub fn fire(&mut self, from: Coord, to: Coord, player: PlayerId) -> Result<()> {
        let unit = self.commandable_unit(from, to, player)?;
        let fire_range = unit.fire_range;

        let in_range = self
            .ext_neighbors(from, fire_range)
            .iter()
            .any(|band| band.contains(&to));
        if !in_range {
            return Err(GameError::OutOfRange);
        }

        let tick = self.tick;
        let unit = self.unit_at_mut(from).ok_or(GameError::NoUnit(from))?;
        if unit.ammunition < Fixed::ONE {
            return Err(GameError::NoAmmunition);
        }

        unit.ammunition -= Fixed::ONE;
        unit.activity = Some(Activity {
            kind: ActivityKind::Fire,
            from,
            to,
            start: tick,
            end: tick + unit.fire_speed,
        });

        tracing::debug!(tick, unit = unit.id, %from, %to, "fire accepted");
        Ok(())
    }
}
