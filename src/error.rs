//! Error types for the board model, combat arithmetic and scenario loading.

use thiserror::Error;

use crate::board::{Cell, Coord};

/// Structural errors raised by the composite board and its blocks.
///
/// These abort the current operation without modifying the board.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoardError {
    /// A block address lies outside the configured block grid.
    #[error("block address {addr} outside {cols}x{rows} block grid")]
    BlockOutOfRange {
        /// The offending block address.
        addr: Coord,
        /// Number of block columns.
        cols: u16,
        /// Number of block rows.
        rows: u16,
    },
    /// A local coordinate lies outside a block.
    #[error("position {coord} outside {width}x{height} block")]
    CoordOutOfRange {
        /// The offending coordinate.
        coord: Coord,
        /// Block width.
        width: u16,
        /// Block height.
        height: u16,
    },
    /// The block grid has a hole at this address.
    #[error("no block filled at {0}")]
    MissingBlock(Coord),
    /// No block contains the cell.
    #[error("cell {0} is not on the board")]
    UnknownCell(Cell),
    /// Fill input rejected before touching the board.
    #[error("malformed fill input: {0}")]
    MalformedFill(String),
    /// A portal whose anchor or destination is inconsistent.
    #[error("invalid portal at {cell}: {reason}")]
    InvalidPortal {
        /// Where the portal sits.
        cell: Cell,
        /// What is wrong with it.
        reason: String,
    },
    /// Blocks do not share identical dimensions.
    #[error("block {addr} is {width}x{height}, expected {expected_width}x{expected_height}")]
    MismatchedBlocks {
        /// The mismatched block.
        addr: Coord,
        /// Its width.
        width: u16,
        /// Its height.
        height: u16,
        /// Width shared by the other blocks.
        expected_width: u16,
        /// Height shared by the other blocks.
        expected_height: u16,
    },
    /// The target cell is not one step away from the source.
    #[error("{to} is not adjacent to {from}")]
    NotAdjacent {
        /// Source cell.
        from: Cell,
        /// Requested destination.
        to: Cell,
    },
    /// The cell does not hold a movable army.
    #[error("no active army at {0}")]
    NoArmy(Cell),
    /// The destination cannot be entered.
    #[error("cannot move onto {0}")]
    Blocked(Cell),
    /// Combat arithmetic precondition violated during move resolution.
    #[error(transparent)]
    Combat(#[from] CombatError),
}

/// Domain errors of the combat formulas.
///
/// Each variant corresponds to an input for which the closed-form arithmetic
/// would divide by zero or produce a value outside its domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CombatError {
    /// Both armies of a merge have zero units.
    #[error("cannot merge two empty armies")]
    EmptyMerge,
    /// The designated winner has no combat power.
    #[error("winner has zero power")]
    ZeroPowerWinner,
    /// The designated winner is weaker than the loser.
    #[error("winner is weaker than loser")]
    WinnerWeaker,
    /// Experience must be finite and strictly positive.
    #[error("experience must be finite and positive")]
    InvalidExperience,
    /// A unit count does not fit in `u32`.
    #[error("unit count overflow")]
    Overflow,
}

/// Errors raised while loading a scenario file.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// The file could not be read.
    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid scenario JSON.
    #[error("invalid scenario json: {0}")]
    Json(#[from] serde_json::Error),
    /// The char map or side tables are inconsistent.
    #[error("invalid scenario layout: {0}")]
    Layout(String),
    /// The board rejected the scenario.
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Result type for board operations.
pub type BoardResult<T> = Result<T, BoardError>;

/// Result type for combat arithmetic.
pub type CombatResult<T> = Result<T, CombatError>;
