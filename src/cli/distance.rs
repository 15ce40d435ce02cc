//! Distance query command implementation.

use super::{CliError, CoordArg, PlayerArg, load_board};
use portalwar::board::{Cell, PlayerType};
use std::path::Path;

/// Execute the distance command.
///
/// # Errors
///
/// Returns an error if the scenario cannot be loaded or the cell is not on
/// the board.
pub(crate) fn execute(
    scenario: &Path,
    block: CoordArg,
    pos: CoordArg,
    owner: PlayerArg,
) -> Result<(), CliError> {
    let board = load_board(scenario)?;
    let cell = Cell::new(block.0, pos.0);
    let owner = PlayerType::from(owner);

    match board.distance_to_enemy_castle(cell, owner)? {
        Some(distance) => println!("{cell}: {distance} moves to the nearest enemy castle"),
        None => println!("{cell}: unreachable"),
    }

    Ok(())
}
