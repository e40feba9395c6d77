//! Unit attributes by (unit kind, terrain).
//!
//! This table is the main balance knob of the game. Every tick the pipeline
//! copies the entry for a unit's current tile onto the unit.

use crate::constants::{Terrain, UnitKind};

/// Attributes of a unit standing on a given terrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitStats {
    /// Distance in tiles within which enemies are seen.
    pub view: usize,
    /// Distance within which hidden enemies are seen.
    pub close_view: usize,
    /// Dice bonus on defense.
    pub armour: i32,
    /// Attack radius; zero disables the weapon.
    pub fire_range: usize,
    /// Ammunition cap.
    pub max_ammunition: i32,
    /// Ticks per tile moved.
    pub speed: u64,
    /// Ticks per shot.
    pub fire_speed: u64,
    /// Camouflaged: invisible beyond close view.
    pub hidden: bool,
}

/// Scale a speed by `factor`, truncating toward zero.
///
/// The f64 product is truncated, so 90 * 1.4 gives 125.
#[allow(clippy::cast_precision_loss)]
fn slow_down(speed: u64, factor: f64) -> u64 {
    (speed as f64 * factor) as u64
}

/// Look up the attributes of `kind` standing on `terrain`.
#[must_use]
pub fn stats(kind: UnitKind, terrain: Terrain) -> UnitStats {
    let mut s = match kind {
        UnitKind::Artillery => UnitStats {
            view: 3,
            close_view: 1,
            armour: 1,
            fire_range: 4,
            max_ammunition: 2,
            speed: 150,
            fire_speed: 100,
            hidden: false,
        },
        UnitKind::Tank => UnitStats {
            view: 3,
            close_view: 1,
            armour: 2,
            fire_range: 2,
            max_ammunition: 3,
            speed: 70,
            fire_speed: 60,
            hidden: false,
        },
        UnitKind::Soldier => UnitStats {
            view: 3,
            close_view: 1,
            armour: 0,
            fire_range: 1,
            max_ammunition: 9,
            speed: 90,
            fire_speed: 69,
            hidden: false,
        },
    };
    let vehicle = !matches!(kind, UnitKind::Soldier);

    match terrain {
        Terrain::Base => {
            s.armour += 2;
            s.fire_range = 0;
            // bases scan for hidden units
            s.close_view += 2;
        }
        Terrain::Dirt => {}
        Terrain::Forest => {
            s.hidden = true;
            s.view -= 1;
            if vehicle {
                s.speed = slow_down(s.speed, 1.2);
            }
        }
        Terrain::Grass => {
            s.hidden = !vehicle;
        }
        Terrain::Hill => {
            s.fire_range += 1;
            s.view += 1;
            s.close_view += 1;
            if vehicle {
                s.speed = slow_down(s.speed, 1.2);
            }
        }
        Terrain::Hole => {
            s.armour += 1;
            if vehicle {
                s.speed = slow_down(s.speed, 1.2);
            }
        }
        Terrain::Mountain => {
            s.fire_range += 1;
            s.view += 1;
            s.close_view += 1;
            s.speed = slow_down(s.speed, 1.4);
        }
        Terrain::Structure => {
            s.armour += 2;
            s.hidden = true;
        }
        Terrain::Water => {
            s.fire_range = 0;
            s.speed = slow_down(s.speed, 1.4);
        }
    }

    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soldier_on_grass() {
        let s = stats(UnitKind::Soldier, Terrain::Grass);
        assert_eq!(s.view, 3);
        assert_eq!(s.close_view, 1);
        assert_eq!(s.armour, 0);
        assert_eq!(s.fire_range, 1);
        assert_eq!(s.max_ammunition, 9);
        assert_eq!(s.speed, 90);
        assert_eq!(s.fire_speed, 69);
        assert!(s.hidden);
    }

    #[test]
    fn test_artillery_on_base() {
        let s = stats(UnitKind::Artillery, Terrain::Base);
        assert_eq!(s.view, 3);
        assert_eq!(s.close_view, 3);
        assert_eq!(s.armour, 3);
        assert_eq!(s.fire_range, 0);
        assert_eq!(s.max_ammunition, 2);
        assert_eq!(s.speed, 150);
        assert_eq!(s.fire_speed, 100);
        assert!(!s.hidden);
    }

    #[test]
    fn test_tank_on_hill() {
        let s = stats(UnitKind::Tank, Terrain::Hill);
        assert_eq!(s.view, 4);
        assert_eq!(s.close_view, 2);
        assert_eq!(s.fire_range, 3);
        assert_eq!(s.speed, 84);
    }

    #[test]
    fn test_grass_hides_only_soldiers() {
        assert!(!stats(UnitKind::Tank, Terrain::Grass).hidden);
        assert!(!stats(UnitKind::Artillery, Terrain::Grass).hidden);
    }

    #[test]
    fn test_speed_scaling() {
        assert_eq!(stats(UnitKind::Tank, Terrain::Forest).speed, 84);
        assert_eq!(stats(UnitKind::Artillery, Terrain::Hole).speed, 180);
        assert_eq!(stats(UnitKind::Soldier, Terrain::Forest).speed, 90);
        assert_eq!(stats(UnitKind::Soldier, Terrain::Mountain).speed, 125);
        assert_eq!(stats(UnitKind::Soldier, Terrain::Water).speed, 125);
        assert_eq!(stats(UnitKind::Tank, Terrain::Water).speed, 98);
        assert_eq!(stats(UnitKind::Artillery, Terrain::Water).speed, 210);
        assert_eq!(stats(UnitKind::Tank, Terrain::Mountain).speed, 98);
    }

    #[test]
    fn test_disabled_weapons() {
        for kind in UnitKind::ALL {
            assert_eq!(stats(kind, Terrain::Base).fire_range, 0);
            assert_eq!(stats(kind, Terrain::Water).fire_range, 0);
        }
    }

    #[test]
    fn test_forest_hides_and_limits_view() {
        for kind in UnitKind::ALL {
            let s = stats(kind, Terrain::Forest);
            assert!(s.hidden);
            assert_eq!(s.view, 2);
        }
    }

    #[test]
    fn test_structure_armour() {
        assert_eq!(stats(UnitKind::Tank, Terrain::Structure).armour, 4);
        assert_eq!(stats(UnitKind::Soldier, Terrain::Hole).armour, 1);
    }
}
