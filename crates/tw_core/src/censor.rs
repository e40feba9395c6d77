//! Player-restricted snapshots.
//!
//! A censored world is what one player is allowed to know: only that
//! player's supply and visibility entries survive, and units or base owners
//! on tiles the player cannot see are withheld.

use crate::constants::{PlayerId, Visibility, NEUTRAL};
use crate::grid::World;

/// Deep-copy `world` and strip everything `player` may not see.
///
/// - Fog of war (or no entry): the owner is reset unless it is `player`,
///   and any unit is removed.
/// - Normal view: hidden units are removed.
/// - Close view: everything stays.
#[must_use]
pub fn censorship(world: &World, player: PlayerId) -> World {
    let mut censored = world.clone();

    for tile in censored.tiles_mut() {
        tile.supply.retain(|&p, _| p == player);
        tile.visibility.retain(|&p, _| p == player);

        match tile.visibility_for(player) {
            Visibility::FogOfWar => {
                if tile.owner != player {
                    tile.owner = NEUTRAL;
                }
                tile.unit = None;
            }
            Visibility::NormalView => {
                if tile.unit.as_ref().is_some_and(|u| u.hidden) {
                    tile.unit = None;
                }
            }
            Visibility::CloseView => {}
        }
    }

    censored
}
