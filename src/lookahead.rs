//! One-move look-ahead for AI players.
//!
//! Every candidate move is played on its own clone of the board, so the live
//! board is never touched and candidates can be evaluated in parallel.

use rayon::prelude::*;

use crate::board::{Cell, CompositeBoard, PlayerType};
use crate::moves::{MoveOutcome, resolve_move, winner};

/// Result of playing one candidate move on a cloned board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveEvaluation {
    /// Where the army started.
    pub from: Cell,
    /// Where it moved.
    pub to: Cell,
    /// What happened.
    pub outcome: MoveOutcome,
    /// Moves left from `to` to the nearest enemy castle afterwards, if the
    /// player's army holds `to` and a castle is reachable.
    pub distance_to_enemy_castle: Option<u32>,
    /// Total power of the moving player afterwards.
    pub own_power: f64,
    /// Total power of the opponent afterwards.
    pub enemy_power: f64,
    /// Winner after the move, if the game is decided.
    pub winner: Option<PlayerType>,
}

/// Every legal single move of `player` with its consequences.
///
/// Results are sorted by `(from, to)`. Candidates the board rejects (for
/// example moves onto the player's own castle) are left out.
#[must_use]
pub fn evaluate_moves(board: &CompositeBoard, player: PlayerType) -> Vec<MoveEvaluation> {
    let candidates = candidate_moves(board, player);
    tracing::debug!(?player, candidates = candidates.len(), "evaluating moves");

    let mut evaluations: Vec<MoveEvaluation> = candidates
        .into_par_iter()
        .filter_map(|(from, to)| evaluate_move(board, player, from, to))
        .collect();
    evaluations.sort_by_key(|e| (e.from, e.to));
    evaluations
}

/// All `(from, to)` pairs reachable in one step by the player's active armies.
#[must_use]
pub fn candidate_moves(board: &CompositeBoard, player: PlayerType) -> Vec<(Cell, Cell)> {
    board
        .find_active_player_armies(player)
        .into_iter()
        .flat_map(|from| {
            board
                .adjacent(from)
                .unwrap_or_default()
                .into_iter()
                .map(move |to| (from, to))
        })
        .collect()
}

/// Play a single move on a clone and measure the result.
fn evaluate_move(
    board: &CompositeBoard,
    player: PlayerType,
    from: Cell,
    to: Cell,
) -> Option<MoveEvaluation> {
    let mut scratch = board.clone_board();
    let outcome = resolve_move(&mut scratch, from, to).ok()?;

    let holds_target = scratch
        .item(to)
        .ok()
        .and_then(|item| item.army())
        .is_some_and(|army| army.owner == player);
    let distance_to_enemy_castle = if holds_target {
        scratch.distance_to_enemy_castle(to, player).ok().flatten()
    } else {
        None
    };

    Some(MoveEvaluation {
        from,
        to,
        outcome,
        distance_to_enemy_castle,
        own_power: scratch.total_power(player),
        enemy_power: scratch.total_power(player.opponent()),
        winner: winner(&scratch),
    })
}
