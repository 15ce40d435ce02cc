//! Scenario-level integration tests.
//!
//! These tests load boards from scenario files and play short move
//! sequences through portals, fights and castle captures.
//!
//! Run with: cargo test --release board_integration

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::io::Write;
use std::path::PathBuf;

use portalwar::lookahead::evaluate_moves;
use portalwar::moves::{MoveOutcome, flip_turn, resolve_move, winner};
use portalwar::render::render_ascii;
use portalwar::{BoardError, Cell, CompositeBoard, Coord, PlayerType, Scenario, ScenarioError};

/// Two blocks side by side on top, two below; one portal from the top-left
/// block into the top-right block.
const PORTAL_SCENARIO: &str = r#"{
    "config": { "block_cols": 2, "block_rows": 2, "block_width": 3, "block_height": 3 },
    "map": [".....c", "..P...", "......", "......", "......", "C....."],
    "portals": [ { "at": [3, 2], "dest_block": [2, 1], "dest_position": [1, 2] } ],
    "armies": [ { "at": [1, 1], "owner": "first", "spearmen": 10 },
                { "at": [6, 6], "owner": "second", "archers": 2 } ],
    "bonus": [ { "at": [5, 2], "spearmen": 3 } ]
}"#;

fn cell(bx: u16, by: u16, x: u16, y: u16) -> Cell {
    Cell::new(Coord::new(bx, by), Coord::new(x, y))
}

/// Write a scenario to a temporary file and load it back.
fn load_from_tempfile(json: &str) -> CompositeBoard {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    Scenario::load(file.path()).unwrap().build_board().unwrap()
}

fn crossroads() -> CompositeBoard {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios/crossroads.json");
    Scenario::load(&path).unwrap().build_board().unwrap()
}

#[test]
fn test_portal_scenario_distance() {
    let board = load_from_tempfile(PORTAL_SCENARIO);
    // Two steps to the portal, one through it, three to the castle.
    assert_eq!(
        board.distance_to_enemy_castle(cell(1, 1, 1, 1), PlayerType::First).unwrap(),
        Some(6)
    );
    // The bottom blocks have no way out.
    assert_eq!(
        board.distance_to_enemy_castle(cell(1, 2, 1, 3), PlayerType::First).unwrap(),
        None
    );
    assert_eq!(
        board.passes_as_from_to_cells(),
        vec![(cell(1, 1, 3, 2), cell(2, 1, 1, 2))]
    );
}

#[test]
fn test_march_through_portal_and_capture() {
    let mut board = load_from_tempfile(PORTAL_SCENARIO);
    let path = [
        (cell(1, 1, 1, 1), cell(1, 1, 2, 1)),
        (cell(1, 1, 2, 1), cell(1, 1, 3, 1)),
        // Stepping towards the portal lands on its far side.
        (cell(1, 1, 3, 1), cell(2, 1, 1, 2)),
        (cell(2, 1, 1, 2), cell(2, 1, 2, 2)),
        (cell(2, 1, 2, 2), cell(2, 1, 2, 1)),
    ];
    for (from, to) in path {
        assert_eq!(resolve_move(&mut board, from, to).unwrap(), MoveOutcome::Moved);
        flip_turn(&mut board, PlayerType::First, false);
    }

    // The reinforcement at (2,2) of the top-right block was picked up.
    let army = board.item(cell(2, 1, 2, 1)).unwrap().army().copied().unwrap();
    assert_eq!(army.composition.spearmen(), 13);
    assert!(board.bonus_item(cell(2, 1, 2, 2)).unwrap().is_empty());
    assert_eq!(winner(&board), None);

    let outcome = resolve_move(&mut board, cell(2, 1, 2, 1), cell(2, 1, 3, 1)).unwrap();
    assert_eq!(
        outcome,
        MoveOutcome::CastleCaptured {
            owner: PlayerType::Second
        }
    );
    assert!(board.castles(PlayerType::Second).is_empty());
    assert_eq!(winner(&board), Some(PlayerType::First));
}

#[test]
fn test_spent_army_cannot_move_twice() {
    let mut board = load_from_tempfile(PORTAL_SCENARIO);
    resolve_move(&mut board, cell(1, 1, 1, 1), cell(1, 1, 1, 2)).unwrap();
    assert!(matches!(
        resolve_move(&mut board, cell(1, 1, 1, 2), cell(1, 1, 1, 3)),
        Err(BoardError::NoArmy(_))
    ));
}

#[test]
fn test_crossroads_distances() {
    let board = crossroads();
    assert_eq!(board.castles(PlayerType::First), &[cell(1, 1, 1, 1)]);
    assert_eq!(board.castles(PlayerType::Second), &[cell(2, 2, 4, 4)]);
    // Three steps through the first portal, four across the far block.
    assert_eq!(
        board.distance_to_enemy_castle(cell(1, 1, 2, 1), PlayerType::First).unwrap(),
        Some(7)
    );
    // Four steps to the second portal, one through it, four home.
    assert_eq!(
        board.distance_to_enemy_castle(cell(2, 2, 3, 4), PlayerType::Second).unwrap(),
        Some(9)
    );
    assert_eq!(
        board.distance_to_enemy_castle(cell(2, 1, 1, 1), PlayerType::First).unwrap(),
        None
    );
}

#[test]
fn test_crossroads_inversion_keeps_distances() {
    let mut board = crossroads();
    board.invert_board();
    assert_eq!(board.castles(PlayerType::Second), &[cell(2, 2, 1, 1)]);
    // The army that sat at (2,1) now sits at (3,4).
    assert_eq!(
        board.distance_to_enemy_castle(cell(1, 1, 3, 4), PlayerType::First).unwrap(),
        Some(7)
    );
    board.invert_board();
    assert_eq!(
        board.distance_to_enemy_castle(cell(1, 1, 2, 1), PlayerType::First).unwrap(),
        Some(7)
    );
}

#[test]
fn test_crossroads_evaluation() {
    let board = crossroads();
    let evaluations = evaluate_moves(&board, PlayerType::First);
    // Each army has three neighbors, one of them the home castle.
    assert_eq!(evaluations.len(), 4);
    assert!(
        evaluations
            .iter()
            .all(|e| e.to != cell(1, 1, 1, 1) && e.outcome == MoveOutcome::Moved)
    );
    assert!(evaluations.windows(2).all(|w| (w[0].from, w[0].to) < (w[1].from, w[1].to)));
    assert!((evaluations[0].own_power - 21.0).abs() < 1e-9);
    assert!((evaluations[0].enemy_power - 20.4).abs() < 1e-9);
}

#[test]
fn test_crossroads_renders() {
    let board = crossroads();
    let output = render_ascii(&board);
    assert!(output.contains("2x2 blocks of 4x4 cells"));
    assert!(output.contains("block (1,1) pos (4,2) -> block (2,2) pos (2,2)"));
    assert!(output.contains("block (2,2) pos (1,1) -> block (1,1) pos (3,3)"));
}

#[test]
fn test_scenario_army_without_units_rejected() {
    let json = r#"{
        "config": { "block_cols": 1, "block_rows": 1, "block_width": 4, "block_height": 1 },
        "map": ["C..c"],
        "armies": [ { "at": [2, 1], "owner": "first", "spearmen": 10 },
                    { "at": [3, 1], "owner": "second" } ]
    }"#;
    let result = Scenario::from_json(json).unwrap().build_board();
    assert!(matches!(result, Err(ScenarioError::Layout(_))));
}

#[test]
fn test_missing_scenario_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = Scenario::load(&dir.path().join("absent.json"));
    assert!(matches!(result, Err(ScenarioError::Io(_))));
}
