#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use portalwar::{
    Army, ArmyComposition, BoardItem, CompositeBoard, Coord, ItemGrid, PlayerType, Portal,
};

/// One cell of the fill input. Portal fields are taken raw, so anchors and
/// destinations may be inconsistent and must be rejected by `fill`.
#[derive(Arbitrary, Debug, Clone, Copy)]
enum CellInput {
    Empty,
    Castle(bool),
    Army(bool, u8),
    Portal {
        anchor: (u8, u8),
        dest_block: (u8, u8),
        dest_position: (u8, u8),
    },
}

/// Structured input for board fuzzing.
#[derive(Arbitrary, Debug)]
struct BoardInput {
    block_cols: u8,
    block_rows: u8,
    width: u8,
    height: u8,
    cells: Vec<CellInput>,
    bonus: Vec<bool>,
}

fn owner(first: bool) -> PlayerType {
    if first { PlayerType::First } else { PlayerType::Second }
}

fn item(input: CellInput) -> BoardItem {
    match input {
        CellInput::Empty => BoardItem::Empty,
        CellInput::Castle(first) => BoardItem::Castle { owner: owner(first) },
        CellInput::Army(first, units) => match ArmyComposition::new(u32::from(units), 0, 0, 1.0) {
            Ok(composition) => BoardItem::Army(Army::field(owner(first), composition)),
            Err(_) => BoardItem::Empty,
        },
        CellInput::Portal {
            anchor,
            dest_block,
            dest_position,
        } => BoardItem::Portal(Portal::new(
            Coord::new(u16::from(anchor.0), u16::from(anchor.1)),
            Coord::new(u16::from(dest_block.0), u16::from(dest_block.1)),
            Coord::new(u16::from(dest_position.0), u16::from(dest_position.1)),
        )),
    }
}

fuzz_target!(|input: BoardInput| {
    // Cap sizes to avoid OOM
    let cols = u16::from(input.block_cols % 4);
    let rows = u16::from(input.block_rows % 4);
    let width = u16::from(input.width % 24);
    let height = u16::from(input.height % 24);

    let Ok(mut board) = CompositeBoard::new(cols, rows) else {
        assert!(cols == 0 || rows == 0);
        return;
    };
    let (Some(mut items), Some(mut bonus)) =
        (ItemGrid::new(width, height), ItemGrid::new(width, height))
    else {
        return;
    };

    let mut cells = input.cells.iter().copied().cycle();
    let mut bonuses = input.bonus.iter().copied().cycle();
    for y in 1..=height {
        for x in 1..=width {
            let at = Coord::new(x, y);
            if let Some(cell) = cells.next() {
                items.set(at, item(cell)).unwrap();
            }
            if bonuses.next() == Some(true) {
                let composition = ArmyComposition::new(3, 0, 0, 1.0).unwrap();
                bonus
                    .set(at, BoardItem::Army(Army::reinforcement(PlayerType::First, composition)))
                    .unwrap();
            }
        }
    }

    // A rejected fill must leave the board untouched.
    if board.fill(&items, &bonus).is_err() {
        assert!(board.block_dimensions().is_none());
        return;
    }

    let (out_items, out_bonus) = board.convert_to_arrays().unwrap();
    assert_eq!(out_items, items);
    assert_eq!(out_bonus, bonus);

    // Every adjacency target must be a cell of the board.
    for cell in board.cells() {
        for neighbor in board.adjacent(cell).unwrap() {
            board.item(neighbor).unwrap();
        }
    }

    let copy = board.clone_board();
    board.invert_board();
    board.invert_board();
    assert_eq!(board.convert_to_arrays().unwrap(), copy.convert_to_arrays().unwrap());

    // A castle is zero moves from itself.
    for castle in board.castles(PlayerType::Second) {
        assert_eq!(board.distance_to_enemy_castle(*castle, PlayerType::First).unwrap(), Some(0));
    }
});
