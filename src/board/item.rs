//! Items occupying board cells.

use serde::{Deserialize, Serialize};

use crate::board::Coord;
use crate::combat::ArmyComposition;

/// One of the two sides of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerType {
    /// The player who moves first.
    First,
    /// The player who moves second.
    Second,
}

impl PlayerType {
    /// The opposing player.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }
}

/// Role of an army item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArmyKind {
    /// A regular army that moves and fights on the board.
    Field,
    /// A reinforcement waiting on the bonus layer to be picked up.
    Reinforcement,
}

/// An army standing on a cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Army {
    /// Owning player.
    pub owner: PlayerType,
    /// Field army or reinforcement.
    pub kind: ArmyKind,
    /// Unit counts and experience.
    pub composition: ArmyComposition,
    /// Whether the army may still move this turn.
    pub active: bool,
}

impl Army {
    /// Create an active field army.
    #[must_use]
    pub const fn field(owner: PlayerType, composition: ArmyComposition) -> Self {
        Self {
            owner,
            kind: ArmyKind::Field,
            composition,
            active: true,
        }
    }

    /// Create a reinforcement for the bonus layer.
    #[must_use]
    pub const fn reinforcement(owner: PlayerType, composition: ArmyComposition) -> Self {
        Self {
            owner,
            kind: ArmyKind::Reinforcement,
            composition,
            active: false,
        }
    }
}

/// A one-way link from the cell it is anchored at to a cell in some block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Portal {
    /// Local position of the portal inside its own block.
    pub anchor: Coord,
    /// Address of the destination block.
    pub dest_block: Coord,
    /// Local position inside the destination block.
    pub dest_position: Coord,
}

impl Portal {
    /// Create a new portal.
    #[must_use]
    pub const fn new(anchor: Coord, dest_block: Coord, dest_position: Coord) -> Self {
        Self {
            anchor,
            dest_block,
            dest_position,
        }
    }
}

/// The content of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BoardItem {
    /// Nothing.
    #[default]
    Empty,
    /// A player's army.
    Army(Army),
    /// A player's castle: immovable, the target of the opponent's armies.
    Castle {
        /// Owning player.
        owner: PlayerType,
    },
    /// A portal to another cell.
    Portal(Portal),
}

impl BoardItem {
    /// Check if the cell holds nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// The army on this cell, if any.
    #[must_use]
    pub const fn army(&self) -> Option<&Army> {
        match self {
            Self::Army(army) => Some(army),
            _ => None,
        }
    }

    /// Mutable access to the army on this cell, if any.
    #[must_use]
    pub fn army_mut(&mut self) -> Option<&mut Army> {
        match self {
            Self::Army(army) => Some(army),
            _ => None,
        }
    }

    /// The portal on this cell, if any.
    #[must_use]
    pub const fn portal(&self) -> Option<&Portal> {
        match self {
            Self::Portal(portal) => Some(portal),
            _ => None,
        }
    }

    /// Owner of the army or castle on this cell.
    #[must_use]
    pub const fn owner(&self) -> Option<PlayerType> {
        match self {
            Self::Army(army) => Some(army.owner),
            Self::Castle { owner } => Some(*owner),
            Self::Empty | Self::Portal(_) => None,
        }
    }
}
