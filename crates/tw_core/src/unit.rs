//! Units and the activities they carry out.

use serde::{Deserialize, Serialize};

use crate::constants::{PlayerId, UnitKind, MAX_HEALTH};
use crate::grid::Coord;
use crate::math::{fixed_serde, Fixed};

/// Unique identifier for a unit within one world.
pub type UnitId = u64;

/// Ammunition of a freshly created unit. Clamped to the kind maximum on the
/// first attribute refresh.
pub const FRESH_AMMUNITION: i32 = 99;

/// What a unit is busy doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActivityKind {
    /// Relocating to a neighboring tile.
    Move,
    /// Shooting at a tile.
    Fire,
}

/// A scheduled MOVE or FIRE with a start/end tick window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Activity {
    /// Move or fire.
    pub kind: ActivityKind,
    /// Tile the unit stood on when the command was issued.
    pub from: Coord,
    /// Destination (move) or target (fire).
    pub to: Coord,
    /// Tick the command was accepted.
    pub start: u64,
    /// Tick the activity ends.
    pub end: u64,
}

impl Activity {
    /// Tick at which a moving unit changes tiles.
    #[must_use]
    pub const fn switch_point(&self) -> u64 {
        self.start + self.end.saturating_sub(self.start) / 2
    }

    /// Tick at which a shot is resolved.
    #[must_use]
    pub const fn impact_tick(&self) -> Option<u64> {
        self.end.checked_sub(1)
    }
}

/// A military unit standing on exactly one tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// Unique id.
    pub id: UnitId,
    /// Owning player.
    pub player: PlayerId,
    /// Artillery, soldier or tank.
    pub kind: UnitKind,
    /// Current health; the unit dies at zero or below.
    pub health: i32,
    /// Fractional ammunition; one round is spent per shot.
    #[serde(with = "fixed_serde")]
    pub ammunition: Fixed,
    /// Defensive dice and flat bonus.
    pub armour: i32,
    /// Set by critical hits; removes bonus attack dice.
    pub demoralized: bool,
    /// View radius.
    pub view: usize,
    /// Radius within which hidden units are revealed.
    pub close_view: usize,
    /// Fire radius.
    pub fire_range: usize,
    /// Ticks needed to move one tile.
    pub speed: u64,
    /// Ticks between two shots.
    pub fire_speed: u64,
    /// Invisible above close view.
    pub hidden: bool,
    /// Current activity, if busy.
    pub activity: Option<Activity>,
    /// Tile the unit stands on.
    pub position: Coord,
}

impl Unit {
    /// Create a fresh unit. Derived stats stay zero until the first
    /// attribute refresh.
    #[must_use]
    pub fn new(id: UnitId, player: PlayerId, kind: UnitKind, position: Coord) -> Self {
        Self {
            id,
            player,
            kind,
            health: MAX_HEALTH,
            ammunition: Fixed::from_num(FRESH_AMMUNITION),
            armour: 0,
            demoralized: false,
            view: 0,
            close_view: 0,
            fire_range: 0,
            speed: 0,
            fire_speed: 0,
            hidden: false,
            activity: None,
            position,
        }
    }

    /// Whether the unit processes a command.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.activity.is_some()
    }

    /// Whether the unit is moving.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        matches!(self.activity, Some(a) if a.kind == ActivityKind::Move)
    }

    /// Whether the unit is firing.
    #[must_use]
    pub fn is_firing(&self) -> bool {
        matches!(self.activity, Some(a) if a.kind == ActivityKind::Fire)
    }

    /// Whole rounds of ammunition available.
    #[must_use]
    pub fn rounds(&self) -> i32 {
        self.ammunition.to_num::<i32>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::RED;

    #[test]
    fn test_new_unit() {
        let unit = Unit::new(7, RED, UnitKind::Soldier, Coord::new(1, 2));
        assert_eq!(unit.id, 7);
        assert_eq!(unit.player, RED);
        assert_eq!(unit.kind, UnitKind::Soldier);
        assert_eq!(unit.health, 100);
        assert!(unit.activity.is_none());
        assert_eq!(unit.view, 0);
        assert_eq!(unit.close_view, 0);
        assert_eq!(unit.fire_range, 0);
        assert_eq!(unit.speed, 0);
        assert_eq!(unit.fire_speed, 0);
        assert!(!unit.hidden);
        assert_eq!(unit.armour, 0);
        assert!(!unit.demoralized);
        assert_eq!(unit.ammunition, Fixed::from_num(99));
        assert_eq!(unit.rounds(), 99);
    }

    #[test]
    fn test_switch_point() {
        let activity = Activity {
            kind: ActivityKind::Move,
            from: Coord::new(0, 0),
            to: Coord::new(1, 0),
            start: 10,
            end: 100,
        };
        assert_eq!(activity.switch_point(), 55);
        assert_eq!(activity.impact_tick(), Some(99));
    }

    #[test]
    fn test_busy_flags() {
        let mut unit = Unit::new(1, RED, UnitKind::Tank, Coord::new(0, 0));
        assert!(!unit.is_busy());
        unit.activity = Some(Activity {
            kind: ActivityKind::Fire,
            from: Coord::new(0, 0),
            to: Coord::new(1, 0),
            start: 0,
            end: 60,
        });
        assert!(unit.is_busy());
        assert!(unit.is_firing());
        assert!(!unit.is_moving());
    }

    #[test]
    fn test_clone_is_deep() {
        let original = Unit::new(3, RED, UnitKind::Artillery, Coord::new(4, 4));
        let mut cloned = original.clone();
        cloned.health = 1;
        assert_eq!(original.health, 100);
    }
}
