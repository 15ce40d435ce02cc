//! Output formatting utilities for CLI.

use portalwar::board::{Cell, PlayerType};
use portalwar::lookahead::MoveEvaluation;
use portalwar::moves::MoveOutcome;
use portalwar::{BoardConfig, CompositeBoard};
use serde::Serialize;
use std::fmt::Write;

/// JSON-serializable board summary.
#[derive(Debug, Serialize)]
pub(super) struct JsonBoard {
    /// Block grid and block dimensions.
    config: BoardConfig,
    /// Focused block address.
    current_block: Option<[u16; 2]>,
    /// Every portal as a source/destination pair.
    passes: Vec<JsonPass>,
    /// Castle cells of the first player.
    first_castles: Vec<JsonCell>,
    /// Castle cells of the second player.
    second_castles: Vec<JsonCell>,
    /// Total power of the first player.
    first_power: f64,
    /// Total power of the second player.
    second_power: f64,
}

/// JSON-serializable cell.
#[derive(Debug, Clone, Copy, Serialize)]
pub(super) struct JsonCell {
    /// Block address.
    block: [u16; 2],
    /// Position inside the block.
    pos: [u16; 2],
}

impl From<Cell> for JsonCell {
    fn from(cell: Cell) -> Self {
        Self {
            block: [cell.block.x, cell.block.y],
            pos: [cell.local.x, cell.local.y],
        }
    }
}

/// JSON-serializable portal.
#[derive(Debug, Serialize)]
pub(super) struct JsonPass {
    /// Portal cell.
    from: JsonCell,
    /// Where stepping onto the portal lands.
    to: JsonCell,
}

impl JsonBoard {
    /// Create from a filled board.
    pub(super) fn from_board(board: &CompositeBoard) -> Self {
        let (block_width, block_height) = board.block_dimensions().unwrap_or((0, 0));
        let castles = |player: PlayerType| -> Vec<JsonCell> {
            board.castles(player).iter().copied().map(JsonCell::from).collect()
        };
        Self {
            config: BoardConfig {
                block_cols: board.block_cols(),
                block_rows: board.block_rows(),
                block_width,
                block_height,
            },
            current_block: board.current_block_address().map(|c| [c.x, c.y]),
            passes: board
                .passes_as_from_to_cells()
                .into_iter()
                .map(|(from, to)| JsonPass {
                    from: from.into(),
                    to: to.into(),
                })
                .collect(),
            first_castles: castles(PlayerType::First),
            second_castles: castles(PlayerType::Second),
            first_power: board.total_power(PlayerType::First),
            second_power: board.total_power(PlayerType::Second),
        }
    }
}

/// JSON-serializable move evaluation.
#[derive(Debug, Serialize)]
pub(super) struct JsonEvaluation {
    /// Source cell.
    from: JsonCell,
    /// Destination cell.
    to: JsonCell,
    /// Outcome name.
    outcome: &'static str,
    /// Moves left to the nearest enemy castle (null if unreachable).
    distance_to_enemy_castle: Option<u32>,
    /// Power of the moving player afterwards.
    own_power: f64,
    /// Power of the opponent afterwards.
    enemy_power: f64,
    /// Winner after the move (null if undecided).
    winner: Option<PlayerType>,
}

impl From<&MoveEvaluation> for JsonEvaluation {
    fn from(eval: &MoveEvaluation) -> Self {
        Self {
            from: eval.from.into(),
            to: eval.to.into(),
            outcome: outcome_name(&eval.outcome),
            distance_to_enemy_castle: eval.distance_to_enemy_castle,
            own_power: eval.own_power,
            enemy_power: eval.enemy_power,
            winner: eval.winner,
        }
    }
}

/// Short name of a move outcome.
pub(super) const fn outcome_name(outcome: &MoveOutcome) -> &'static str {
    match outcome {
        MoveOutcome::Moved => "moved",
        MoveOutcome::Merged => "merged",
        MoveOutcome::Won { .. } => "won",
        MoveOutcome::Lost { .. } => "lost",
        MoveOutcome::CastleCaptured { .. } => "castle",
    }
}

/// Format evaluations as a human-readable table.
pub(super) fn format_evaluations_text(player: PlayerType, evaluations: &[MoveEvaluation]) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Moves for {player:?} ({} candidates)", evaluations.len());
    output.push_str("========================================\n");
    for eval in evaluations {
        let distance = eval
            .distance_to_enemy_castle
            .map_or_else(|| "-".to_string(), |d| d.to_string());
        let _ = write!(
            output,
            "  {} -> {}  {:<7} dist {:>3}  power {:.1} vs {:.1}",
            eval.from,
            eval.to,
            outcome_name(&eval.outcome),
            distance,
            eval.own_power,
            eval.enemy_power
        );
        if let Some(winner) = eval.winner {
            let _ = write!(output, "  [{winner:?} wins]");
        }
        output.push('\n');
    }

    output
}
