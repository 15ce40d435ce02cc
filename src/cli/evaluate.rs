//! Move look-ahead command implementation.

use super::output::{JsonEvaluation, format_evaluations_text};
use super::{CliError, OutputFormat, PlayerArg, load_board};
use portalwar::board::PlayerType;
use portalwar::lookahead::evaluate_moves;
use std::path::Path;

/// Execute the evaluate command.
///
/// # Errors
///
/// Returns an error if the scenario cannot be loaded.
pub(crate) fn execute(scenario: &Path, player: PlayerArg, format: OutputFormat) -> Result<(), CliError> {
    let board = load_board(scenario)?;
    let player = PlayerType::from(player);
    let evaluations = evaluate_moves(&board, player);

    match format {
        OutputFormat::Text => print!("{}", format_evaluations_text(player, &evaluations)),
        OutputFormat::Json => {
            let rows: Vec<JsonEvaluation> = evaluations.iter().map(JsonEvaluation::from).collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }

    Ok(())
}
