//! Last-known positions of units that dropped out of view.
//!
//! A [`ShadowTracker`] belongs to one observing player (typically one client
//! session) and is fed that player's censored snapshots. Units that vanish
//! are remembered as shadows; while a shadow is plausibly still where it was
//! last seen, it yields a [`Phantom`] so a player can keep track of units
//! hiding in forests or grass.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{PlayerId, UnitKind, Visibility, NEUTRAL};
use crate::grid::{Coord, World};
use crate::stats::stats;
use crate::unit::{Unit, UnitId};

/// Ticks after which an unseen unit is written off.
pub const FORGET_AFTER: u64 = 650;

/// Window after disappearing in which a clear view of the last tile proves
/// the unit is gone.
const CONFIRM_WINDOW: u64 = 5;

/// What is known about one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    /// The unit as last seen.
    pub unit: Unit,
    /// Tick it was last seen.
    pub last_seen: u64,
    /// Seen in the latest snapshot.
    pub visible: bool,
    /// Unseen for longer than it needs to move away.
    pub lost: bool,
    /// Confirmed gone, or unseen for [`FORGET_AFTER`] ticks.
    pub destroyed: bool,
}

impl Shadow {
    /// Where the unit most likely is at `tick`, judging by its last activity.
    #[must_use]
    pub fn estimated_position(&self, tick: u64) -> Coord {
        match self.unit.activity {
            Some(a) if self.unit.is_moving() && a.switch_point() < tick => a.to,
            _ => self.unit.position,
        }
    }
}

/// An estimated enemy unit that is not currently visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phantom {
    /// Unit id.
    pub unit: UnitId,
    /// Owning player.
    pub player: PlayerId,
    /// Unit kind.
    pub kind: UnitKind,
    /// Estimated position.
    pub position: Coord,
}

/// Shadow registry of one observing player.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShadowTracker {
    player: PlayerId,
    shadows: BTreeMap<UnitId, Shadow>,
}

impl ShadowTracker {
    /// Empty tracker for `player`.
    #[must_use]
    pub fn new(player: PlayerId) -> Self {
        Self {
            player,
            shadows: BTreeMap::new(),
        }
    }

    /// The observing player.
    #[must_use]
    pub const fn player(&self) -> PlayerId {
        self.player
    }

    /// Shadow of unit `id`.
    #[must_use]
    pub fn get(&self, id: UnitId) -> Option<&Shadow> {
        self.shadows.get(&id)
    }

    /// All shadows, by unit id.
    pub fn shadows(&self) -> impl Iterator<Item = &Shadow> {
        self.shadows.values()
    }

    /// Feed the observer's censored view of the current tick.
    pub fn observe(&mut self, view: &World) {
        let now = view.tick;

        for shadow in self.shadows.values_mut() {
            shadow.visible = false;
        }

        for tile in view.units(NEUTRAL) {
            let Some(unit) = tile.unit.as_ref() else {
                continue;
            };
            let shadow = self.shadows.entry(unit.id).or_insert_with(|| Shadow {
                unit: unit.clone(),
                last_seen: now,
                visible: true,
                lost: false,
                destroyed: false,
            });
            if shadow.destroyed && !shadow.lost {
                tracing::warn!(unit = unit.id, tick = now, "unit seen again after confirmed loss");
            }
            shadow.unit = unit.clone();
            shadow.unit.position = tile.coord();
            shadow.last_seen = now;
            shadow.visible = true;
            shadow.lost = false;
            shadow.destroyed = false;
        }

        let observer = self.player;
        for shadow in self.shadows.values_mut() {
            let recently_vanished = !shadow.visible
                && !shadow.destroyed
                && !shadow.lost
                && shadow.last_seen + CONFIRM_WINDOW > now;
            if recently_vanished && Self::would_be_seen(view, observer, shadow, now) {
                shadow.destroyed = true;
            }

            let lost_after = shadow.unit.speed * 3 / 2;
            if !shadow.destroyed && shadow.last_seen + lost_after < now {
                shadow.lost = true;
            }
            if !shadow.destroyed && shadow.last_seen + FORGET_AFTER < now {
                shadow.destroyed = true;
            }
        }
    }

    /// Whether the observer would see the shadow's unit if it were still at
    /// its estimated tile.
    fn would_be_seen(view: &World, observer: PlayerId, shadow: &Shadow, now: u64) -> bool {
        let Some(tile) = view.tile(shadow.estimated_position(now)) else {
            return false;
        };
        match tile.visibility_for(observer) {
            Visibility::CloseView => true,
            Visibility::NormalView => !stats(shadow.unit.kind, tile.terrain).hidden,
            Visibility::FogOfWar => false,
        }
    }

    /// Enemy units that are out of sight but probably still around, placed
    /// on tiles that are empty in `view`.
    #[must_use]
    pub fn phantoms(&self, view: &World) -> Vec<Phantom> {
        let now = view.tick;

        self.shadows
            .values()
            .filter(|s| !s.visible && !s.destroyed && s.unit.player != self.player)
            .filter_map(|s| {
                let unit = &s.unit;
                let linger = unit.speed / 2;
                let until = match unit.activity {
                    None => s.last_seen + linger,
                    Some(a) => a.end + linger,
                };
                if until <= now {
                    return None;
                }
                let position = match unit.activity {
                    Some(a) if unit.is_moving() => {
                        if a.switch_point() > now {
                            a.from
                        } else {
                            a.to
                        }
                    }
                    _ => unit.position,
                };
                view.tile(position)
                    .filter(|t| t.unit.is_none())
                    .map(|_| Phantom {
                        unit: unit.id,
                        player: unit.player,
                        kind: unit.kind,
                        position,
                    })
            })
            .collect()
    }
}
