//! Board rendering command implementation.

use super::output::JsonBoard;
use super::{CliError, OutputFormat, load_board};
use portalwar::render::render_ascii;
use std::path::Path;

/// Execute the show command.
///
/// # Errors
///
/// Returns an error if the scenario cannot be loaded.
pub(crate) fn execute(scenario: &Path, invert: bool, format: OutputFormat) -> Result<(), CliError> {
    let mut board = load_board(scenario)?;
    if invert {
        board.invert_board();
    }

    match format {
        OutputFormat::Text => print!("{}", render_ascii(&board)),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonBoard::from_board(&board))?;
            println!("{json}");
        }
    }

    Ok(())
}
