//! Game-wide constants and the small closed vocabularies of the world:
//! terrain types, unit kinds, players and visibility levels.

use serde::{Deserialize, Serialize};

/// Simulation ticks per second.
pub const GAME_SPEED: u64 = 30;

/// Largest (worst) supply level a tile can carry.
pub const MAX_SUPPLY: usize = 15;

/// Multiplier on the per-tick ammunition refill.
pub const SUPPLY_SPEED: i32 = 1;

/// Starting and maximum health of a unit.
pub const MAX_HEALTH: i32 = 100;

/// Player number. `0` is neutral / "no filter".
pub type PlayerId = u8;

/// Neutral owner.
pub const NEUTRAL: PlayerId = 0;
/// First player.
pub const RED: PlayerId = 1;
/// Second player.
pub const BLUE: PlayerId = 2;
/// Third player.
pub const GREEN: PlayerId = 3;
/// Fourth player.
pub const YELLOW: PlayerId = 4;
/// Fifth player.
pub const WHITE: PlayerId = 5;
/// Sixth player.
pub const BLACK: PlayerId = 6;

/// All playable player numbers in join order.
pub const PLAYERS: [PlayerId; 6] = [RED, BLUE, GREEN, YELLOW, WHITE, BLACK];

/// Terrain type of a tile.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Terrain {
    /// Supply depot; can be captured.
    Base,
    /// Open ground.
    #[default]
    Dirt,
    /// Hides everyone standing in it.
    Forest,
    /// Hides soldiers.
    Grass,
    /// Elevated ground with better view and range.
    Hill,
    /// Crater; extra cover.
    Hole,
    /// Impassable for vehicles.
    Mountain,
    /// Building; impassable for vehicles.
    Structure,
    /// Impassable for vehicles; disables weapons.
    Water,
}

impl Terrain {
    /// All terrain types.
    pub const ALL: [Self; 9] = [
        Self::Base,
        Self::Dirt,
        Self::Forest,
        Self::Grass,
        Self::Hill,
        Self::Hole,
        Self::Mountain,
        Self::Structure,
        Self::Water,
    ];

    /// Single-letter map code.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Base => 'B',
            Self::Dirt => 'D',
            Self::Forest => 'F',
            Self::Grass => 'G',
            Self::Hill => 'H',
            Self::Hole => 'O',
            Self::Mountain => 'M',
            Self::Structure => 'S',
            Self::Water => 'W',
        }
    }

    /// Parse a single-letter map code.
    #[must_use]
    pub fn from_code(code: char) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    /// Whether tanks and artillery may enter this terrain.
    #[must_use]
    pub const fn is_vehicle_passable(self) -> bool {
        !matches!(self, Self::Mountain | Self::Structure | Self::Water)
    }

    /// Whether reinforcements may appear on this terrain.
    #[must_use]
    pub const fn is_spawnable(self) -> bool {
        matches!(
            self,
            Self::Dirt | Self::Grass | Self::Forest | Self::Base | Self::Hole | Self::Hill
        )
    }
}

/// Kind of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    /// Long range, slow.
    Artillery,
    /// Infantry; crosses any terrain.
    Soldier,
    /// Armoured and fast.
    Tank,
}

impl UnitKind {
    /// All unit kinds.
    pub const ALL: [Self; 3] = [Self::Artillery, Self::Soldier, Self::Tank];

    /// Single-letter map code.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Artillery => 'A',
            Self::Soldier => 'U',
            Self::Tank => 'T',
        }
    }

    /// Parse a single-letter map code.
    #[must_use]
    pub fn from_code(code: char) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.code() == code)
    }

    /// Whether this kind may enter `terrain`.
    #[must_use]
    pub const fn can_enter(self, terrain: Terrain) -> bool {
        match self {
            Self::Soldier => true,
            Self::Artillery | Self::Tank => terrain.is_vehicle_passable(),
        }
    }
}

/// What a player can see of a tile. Ordered from worst to best.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Nothing is seen; owner and units are withheld.
    #[default]
    FogOfWar,
    /// Unhidden units are seen.
    NormalView,
    /// Everything is seen.
    CloseView,
}
