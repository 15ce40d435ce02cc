//! ASCII renderer for terminal viewing with ANSI colors.

use std::fmt::Write;

use crate::board::{BoardItem, CompositeBoard, Coord, PlayerType};

/// ANSI color codes for players.
const FIRST_COLOR: &str = "\x1b[31m";
const SECOND_COLOR: &str = "\x1b[34m";

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const MAGENTA: &str = "\x1b[35m";

/// Render a composite board to ASCII with ANSI colors.
///
/// Output format:
/// ```text
/// 2x1 blocks of 3x3 cells, current block (1,1)
/// ┌───────┬───────┐
/// │ A . . │ . . a │
/// │ . . @ │ . . . │
/// │ C . . │ . . c │
/// └───────┴───────┘
///
/// Legend: .=Empty  C/c=Castle  A/a=Army  @=Portal  Upper case=First player
///
/// Passes:
///   block (1,1) pos (3,2) -> block (2,1) pos (1,2)
///
/// First:   castles 1  armies 1  power 10.0
/// Second:  castles 1  armies 1  power 6.0
/// ```
///
/// The borders around the current block are drawn in bold.
#[must_use]
pub fn render_ascii(board: &CompositeBoard) -> String {
    let mut output = String::new();
    let Some((width, height)) = board.block_dimensions() else {
        output.push_str("(board not filled)\n");
        return output;
    };

    render_header(&mut output, board, width, height);
    render_map(&mut output, board, width, height);

    output.push_str("\nLegend: .=Empty  C/c=Castle  A/a=Army  @=Portal  Upper case=First player\n");

    render_passes(&mut output, board);
    output.push('\n');
    render_player_stats(&mut output, board);

    output
}

/// Render the header line with the block layout and focus.
fn render_header(output: &mut String, board: &CompositeBoard, width: u16, height: u16) {
    let _ = write!(
        output,
        "{}x{} blocks of {width}x{height} cells",
        board.block_cols(),
        board.block_rows()
    );
    if let Some(current) = board.current_block_address() {
        let _ = write!(output, ", current block {current}");
    }
    output.push('\n');
}

/// Render the map grid, one line per global row.
fn render_map(output: &mut String, board: &CompositeBoard, width: u16, height: u16) {
    let current = board.current_block_address();
    let cols = board.block_cols();
    let rows = board.block_rows();
    let segment = "─".repeat(usize::from(width) * 2 + 1);

    render_border(output, &segment, current, cols, 0, ['┌', '┬', '┐']);
    for by in 1..=rows {
        for y in 1..=height {
            for bx in 0..=cols {
                // Vertical line `bx` sits left of block column `bx + 1`.
                let bold = current.is_some_and(|c| c.y == by && (c.x == bx || c.x == bx + 1));
                if bold {
                    let _ = write!(output, "{BOLD}│{RESET}");
                } else {
                    output.push('│');
                }
                if bx == cols {
                    break;
                }
                output.push(' ');
                for x in 1..=width {
                    let item = board
                        .block(Coord::new(bx + 1, by))
                        .and_then(|block| block.item(Coord::new(x, y)));
                    match item {
                        Ok(item) => render_item(output, item),
                        Err(_) => output.push('?'),
                    }
                    output.push(' ');
                }
            }
            output.push('\n');
        }
        if by == rows {
            render_border(output, &segment, current, cols, by, ['└', '┴', '┘']);
        } else {
            render_border(output, &segment, current, cols, by, ['├', '┼', '┤']);
        }
    }
}

/// Render the horizontal border below block row `j` (0 is the top edge).
fn render_border(
    output: &mut String,
    segment: &str,
    current: Option<Coord>,
    cols: u16,
    j: u16,
    [left, mid, right]: [char; 3],
) {
    output.push(left);
    for bx in 1..=cols {
        let bold = current.is_some_and(|c| c.x == bx && (c.y == j || c.y == j + 1));
        if bold {
            let _ = write!(output, "{BOLD}{segment}{RESET}");
        } else {
            output.push_str(segment);
        }
        output.push(if bx == cols { right } else { mid });
    }
    output.push('\n');
}

/// Render a single item glyph.
fn render_item(output: &mut String, item: &BoardItem) {
    match item {
        BoardItem::Empty => {
            let _ = write!(output, "{DIM}.{RESET}");
        }
        BoardItem::Castle { owner } => {
            let _ = write!(output, "{BOLD}{}{}{RESET}", player_color(*owner), glyph(item));
        }
        BoardItem::Army(army) => {
            let _ = write!(output, "{}{}{RESET}", player_color(army.owner), glyph(item));
        }
        BoardItem::Portal(_) => {
            let _ = write!(output, "{MAGENTA}@{RESET}");
        }
    }
}

/// Plain glyph for an item.
fn glyph(item: &BoardItem) -> char {
    match item {
        BoardItem::Empty => '.',
        BoardItem::Castle {
            owner: PlayerType::First,
        } => 'C',
        BoardItem::Castle {
            owner: PlayerType::Second,
        } => 'c',
        BoardItem::Army(army) if army.owner == PlayerType::First => 'A',
        BoardItem::Army(_) => 'a',
        BoardItem::Portal(_) => '@',
    }
}

/// Get ANSI color for a player.
const fn player_color(player: PlayerType) -> &'static str {
    match player {
        PlayerType::First => FIRST_COLOR,
        PlayerType::Second => SECOND_COLOR,
    }
}

/// Render the portal list.
fn render_passes(output: &mut String, board: &CompositeBoard) {
    let passes = board.passes_as_from_to_cells();
    if passes.is_empty() {
        return;
    }
    output.push_str("\nPasses:\n");
    for (from, to) in passes {
        let _ = writeln!(output, "  {from} -> {to}");
    }
}

/// Render per-player castle, army and power totals.
fn render_player_stats(output: &mut String, board: &CompositeBoard) {
    for player in [PlayerType::First, PlayerType::Second] {
        let name = format!("{player:?}:");
        let _ = writeln!(
            output,
            "{}{name:<8}{RESET} castles {}  armies {}  power {:.1}",
            player_color(player),
            board.castles(player).len(),
            board.find_player_armies(player).len(),
            board.total_power(player)
        );
    }
}
