//! The composite board: a grid of blocks stitched together by portals.

use std::collections::HashMap;

use crate::board::{Block, BoardItem, Cell, Coord, ItemGrid, PlayerType, Portal, PortalGraph};
use crate::error::{BoardError, BoardResult};

/// The whole playing board.
///
/// Owns every block, the current-block focus, and two derived indexes: the
/// castle registry and the portal graph. Both indexes are rebuilt from the
/// item layers whenever the board is filled, cloned or inverted, or a castle
/// or portal item is replaced; they are never patched.
#[derive(Debug)]
pub struct CompositeBoard {
    /// Number of block columns.
    block_cols: u16,
    /// Number of block rows.
    block_rows: u16,
    /// Blocks in row-major order; `None` marks an unfilled slot.
    blocks: Vec<Option<Block>>,
    /// Address of the block with focus.
    current_block: Option<Coord>,
    /// Castle cells per owner.
    castles: HashMap<PlayerType, Vec<Cell>>,
    /// Shortest-path index.
    graph: PortalGraph,
}

impl CompositeBoard {
    /// Create an unfilled board with the given block grid dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::MalformedFill`] if either dimension is zero.
    pub fn new(block_cols: u16, block_rows: u16) -> BoardResult<Self> {
        if block_cols == 0 || block_rows == 0 {
            return Err(BoardError::MalformedFill(format!(
                "block grid must be non-empty, got {block_cols}x{block_rows}"
            )));
        }
        let slots = usize::from(block_cols) * usize::from(block_rows);
        Ok(Self {
            block_cols,
            block_rows,
            blocks: vec![None; slots],
            current_block: None,
            castles: HashMap::new(),
            graph: PortalGraph::default(),
        })
    }

    /// Number of block columns.
    #[must_use]
    pub const fn block_cols(&self) -> u16 {
        self.block_cols
    }

    /// Number of block rows.
    #[must_use]
    pub const fn block_rows(&self) -> u16 {
        self.block_rows
    }

    /// Row-major slot of a block address.
    fn slot(&self, addr: Coord) -> BoardResult<usize> {
        if addr.within(self.block_cols, self.block_rows) {
            Ok(usize::from(addr.y - 1) * usize::from(self.block_cols) + usize::from(addr.x - 1))
        } else {
            Err(BoardError::BlockOutOfRange {
                addr,
                cols: self.block_cols,
                rows: self.block_rows,
            })
        }
    }

    /// Get the block at an address.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::BlockOutOfRange`] outside the grid and
    /// [`BoardError::MissingBlock`] for an unfilled slot.
    pub fn block(&self, addr: Coord) -> BoardResult<&Block> {
        let slot = self.slot(addr)?;
        self.blocks[slot]
            .as_ref()
            .ok_or(BoardError::MissingBlock(addr))
    }

    /// Get a mutable reference to the block at an address.
    fn block_mut(&mut self, addr: Coord) -> BoardResult<&mut Block> {
        let slot = self.slot(addr)?;
        self.blocks[slot]
            .as_mut()
            .ok_or(BoardError::MissingBlock(addr))
    }

    /// Iterate over all filled blocks.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().flatten()
    }

    /// Width and height shared by the blocks, or `None` before the first fill.
    #[must_use]
    pub fn block_dimensions(&self) -> Option<(u16, u16)> {
        self.blocks()
            .next()
            .map(|block| (block.width(), block.height()))
    }

    /// Populate every block from two global item arrays.
    ///
    /// Each block receives the axis-aligned slice of the arrays at its
    /// address. All validation happens before the board is touched, so on
    /// error the previous contents are left intact.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::MalformedFill`] if the arrays differ in size or
    /// do not split evenly into the block grid, and
    /// [`BoardError::InvalidPortal`] for a portal whose anchor is not its own
    /// position or whose destination is off the board.
    pub fn fill(&mut self, items: &ItemGrid, bonus_items: &ItemGrid) -> BoardResult<()> {
        if items.width() != bonus_items.width() || items.height() != bonus_items.height() {
            return Err(BoardError::MalformedFill(format!(
                "item layer is {}x{} but bonus layer is {}x{}",
                items.width(),
                items.height(),
                bonus_items.width(),
                bonus_items.height()
            )));
        }
        if items.width() % self.block_cols != 0 || items.height() % self.block_rows != 0 {
            return Err(BoardError::MalformedFill(format!(
                "{}x{} board does not split into {}x{} blocks",
                items.width(),
                items.height(),
                self.block_cols,
                self.block_rows
            )));
        }
        let block_width = items.width() / self.block_cols;
        let block_height = items.height() / self.block_rows;

        let mut blocks = Vec::with_capacity(self.blocks.len());
        for by in 1..=self.block_rows {
            for bx in 1..=self.block_cols {
                let addr = Coord::new(bx, by);
                let Some(mut block) = Block::new(addr, block_width, block_height) else {
                    return Err(BoardError::MalformedFill(format!(
                        "block {addr} would be empty"
                    )));
                };
                for y in 1..=block_height {
                    for x in 1..=block_width {
                        let local = Coord::new(x, y);
                        let global = Coord::new(
                            (bx - 1) * block_width + x,
                            (by - 1) * block_height + y,
                        );
                        block.set_item(local, *items.get(global)?)?;
                        block.set_bonus_item(local, *bonus_items.get(global)?)?;
                    }
                }
                blocks.push(block);
            }
        }

        for block in &blocks {
            for (cell, item) in block.iter() {
                if let BoardItem::Portal(portal) = item {
                    self.check_portal(cell, portal, block_width, block_height)?;
                }
            }
        }

        self.blocks = blocks.into_iter().map(Some).collect();
        tracing::debug!(
            cols = self.block_cols,
            rows = self.block_rows,
            block_width,
            block_height,
            "board filled"
        );
        self.complete_initialization();
        Ok(())
    }

    /// Check a portal's anchor and destination against the board layout.
    fn check_portal(
        &self,
        cell: Cell,
        portal: &Portal,
        block_width: u16,
        block_height: u16,
    ) -> BoardResult<()> {
        let invalid = |reason: String| BoardError::InvalidPortal { cell, reason };
        if portal.anchor != cell.local {
            return Err(invalid(format!("anchored at {}", portal.anchor)));
        }
        if !portal.dest_block.within(self.block_cols, self.block_rows) {
            return Err(invalid(format!("destination block {} off the grid", portal.dest_block)));
        }
        if !portal.dest_position.within(block_width, block_height) {
            return Err(invalid(format!(
                "destination position {} outside block",
                portal.dest_position
            )));
        }
        Ok(())
    }

    /// Settle focus and rebuild every derived index.
    fn complete_initialization(&mut self) {
        let focus = self
            .current_block
            .filter(|&addr| self.block(addr).is_ok())
            .or_else(|| self.blocks().next().map(Block::address));
        for block in self.blocks.iter_mut().flatten() {
            block.deactivate();
        }
        self.current_block = focus;
        if let Some(addr) = focus
            && let Ok(block) = self.block_mut(addr)
        {
            block.activate();
        }
        self.rebuild_indexes();
    }

    /// Rebuild the castle registry and the portal graph from the items.
    fn rebuild_indexes(&mut self) {
        let mut castles = HashMap::new();
        for player in [PlayerType::First, PlayerType::Second] {
            let cells: Vec<Cell> = self.blocks().flat_map(|b| b.find_castle(player)).collect();
            castles.insert(player, cells);
        }
        self.castles = castles;
        self.graph = PortalGraph::build(self);
    }

    /// Reassemble the global item arrays, the inverse of [`Self::fill`].
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::MissingBlock`] if any slot is unfilled and
    /// [`BoardError::MismatchedBlocks`] if blocks differ in size.
    pub fn convert_to_arrays(&self) -> BoardResult<(ItemGrid, ItemGrid)> {
        let mut dims = None;
        for by in 1..=self.block_rows {
            for bx in 1..=self.block_cols {
                let block = self.block(Coord::new(bx, by))?;
                let (width, height) = *dims.get_or_insert((block.width(), block.height()));
                if block.width() != width || block.height() != height {
                    return Err(BoardError::MismatchedBlocks {
                        addr: block.address(),
                        width: block.width(),
                        height: block.height(),
                        expected_width: width,
                        expected_height: height,
                    });
                }
            }
        }
        let Some((block_width, block_height)) = dims else {
            return Err(BoardError::MissingBlock(Coord::new(1, 1)));
        };

        let too_large = || BoardError::MalformedFill("board exceeds u16 extents".to_string());
        let width = block_width
            .checked_mul(self.block_cols)
            .ok_or_else(too_large)?;
        let height = block_height
            .checked_mul(self.block_rows)
            .ok_or_else(too_large)?;
        let (Some(mut items), Some(mut bonus_items)) =
            (ItemGrid::new(width, height), ItemGrid::new(width, height))
        else {
            return Err(too_large());
        };

        for block in self.blocks() {
            let addr = block.address();
            for (cell, item) in block.iter() {
                let global = Coord::new(
                    (addr.x - 1) * block_width + cell.local.x,
                    (addr.y - 1) * block_height + cell.local.y,
                );
                items.set(global, *item)?;
                bonus_items.set(global, *block.bonus_item(cell.local)?)?;
            }
        }

        Ok((items, bonus_items))
    }

    /// Address of the block with focus.
    #[must_use]
    pub const fn current_block_address(&self) -> Option<Coord> {
        self.current_block
    }

    /// The block with focus.
    #[must_use]
    pub fn current_block(&self) -> Option<&Block> {
        self.current_block.and_then(|addr| self.block(addr).ok())
    }

    /// Move focus to another block.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::BlockOutOfRange`] or [`BoardError::MissingBlock`]
    /// if there is no block at `addr`; focus is unchanged in that case.
    pub fn set_current_block(&mut self, addr: Coord) -> BoardResult<()> {
        self.block(addr)?;
        if let Some(previous) = self.current_block
            && let Ok(block) = self.block_mut(previous)
        {
            block.deactivate();
        }
        self.block_mut(addr)?.activate();
        self.current_block = Some(addr);
        Ok(())
    }

    /// Let the current block's cells accept input.
    pub fn enable_board_buttons(&mut self) {
        if let Some(addr) = self.current_block
            && let Ok(block) = self.block_mut(addr)
        {
            block.enable_board_buttons();
        }
    }

    /// Stop the current block's cells from accepting input.
    pub fn disable_board_buttons(&mut self) {
        if let Some(addr) = self.current_block
            && let Ok(block) = self.block_mut(addr)
        {
            block.disable_board_buttons();
        }
    }

    /// Clear the presentation state of every block.
    pub fn reset(&mut self) {
        for block in self.blocks.iter_mut().flatten() {
            block.reset();
        }
    }

    /// Rotate the whole board by 180°.
    ///
    /// Portals are remapped first, while every block still knows the sizes
    /// needed to rotate anchors and destinations; only then are the item
    /// grids rotated. Block addresses stay where they are. The derived
    /// indexes are rebuilt afterwards, so distances reflect the new layout.
    pub fn invert_board(&mut self) {
        let dims: Vec<Option<(u16, u16)>> = self
            .blocks
            .iter()
            .map(|slot| slot.as_ref().map(|b| (b.width(), b.height())))
            .collect();
        let block_cols = self.block_cols;
        let block_rows = self.block_rows;
        let dims_of = |addr: Coord| {
            if !addr.within(block_cols, block_rows) {
                return None;
            }
            let slot = usize::from(addr.y - 1) * usize::from(block_cols) + usize::from(addr.x - 1);
            dims[slot]
        };

        let mut remapped = 0usize;
        for block in self.blocks.iter_mut().flatten() {
            let (width, height) = (block.width(), block.height());
            for portal in block.passes_mut() {
                portal.anchor = portal.anchor.inverted(width, height);
                if let Some((dest_width, dest_height)) = dims_of(portal.dest_block) {
                    portal.dest_position = portal.dest_position.inverted(dest_width, dest_height);
                }
                remapped += 1;
            }
        }

        for block in self.blocks.iter_mut().flatten() {
            block.invert();
        }

        tracing::debug!(portals = remapped, "board inverted");
        self.rebuild_indexes();
    }

    /// Deep-copy the board for speculative play.
    ///
    /// Blocks are copied; the castle registry and graph are rebuilt from
    /// scratch, so nothing is shared with the original.
    #[must_use]
    pub fn clone_board(&self) -> Self {
        let mut clone = Self {
            block_cols: self.block_cols,
            block_rows: self.block_rows,
            blocks: self.blocks.clone(),
            current_block: self.current_block,
            castles: HashMap::new(),
            graph: PortalGraph::default(),
        };
        clone.complete_initialization();
        tracing::debug!(current = ?clone.current_block, "board cloned");
        clone
    }

    /// Address of the block holding a cell, or `None` if it is not on the board.
    #[must_use]
    pub fn block_address_of(&self, cell: Cell) -> Option<Coord> {
        self.block(cell.block)
            .ok()
            .filter(|block| block.contains_cell(cell))
            .map(Block::address)
    }

    /// Block holding a cell.
    fn block_of(&self, cell: Cell) -> BoardResult<&Block> {
        let addr = self
            .block_address_of(cell)
            .ok_or(BoardError::UnknownCell(cell))?;
        self.block(addr)
    }

    /// Get the item on a cell.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownCell`] if the cell is not on the board.
    pub fn item(&self, cell: Cell) -> BoardResult<&BoardItem> {
        self.block_of(cell)?.item(cell.local)
    }

    /// Replace the item on a cell, returning the previous one.
    ///
    /// Replacing or placing a castle or portal rebuilds the derived indexes.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownCell`] if the cell is not on the board and
    /// [`BoardError::InvalidPortal`] for an inconsistent portal.
    pub fn set_item(&mut self, cell: Cell, item: BoardItem) -> BoardResult<BoardItem> {
        let addr = self
            .block_address_of(cell)
            .ok_or(BoardError::UnknownCell(cell))?;
        if let BoardItem::Portal(portal) = &item {
            let (width, height) = self
                .block_dimensions()
                .ok_or(BoardError::UnknownCell(cell))?;
            self.check_portal(cell, portal, width, height)?;
        }

        let slot = self.block_mut(addr)?.item_mut(cell.local)?;
        let previous = std::mem::replace(slot, item);

        if is_structural(&previous) || is_structural(&item) {
            self.rebuild_indexes();
        }
        Ok(previous)
    }

    /// Empty a cell, returning what was on it.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownCell`] if the cell is not on the board.
    pub fn take_item(&mut self, cell: Cell) -> BoardResult<BoardItem> {
        self.set_item(cell, BoardItem::Empty)
    }

    /// Get the bonus item on a cell.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownCell`] if the cell is not on the board.
    pub fn bonus_item(&self, cell: Cell) -> BoardResult<&BoardItem> {
        self.block_of(cell)?.bonus_item(cell.local)
    }

    /// Replace the bonus item on a cell.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownCell`] if the cell is not on the board.
    pub fn set_bonus_item(&mut self, cell: Cell, item: BoardItem) -> BoardResult<()> {
        let addr = self
            .block_address_of(cell)
            .ok_or(BoardError::UnknownCell(cell))?;
        self.block_mut(addr)?.set_bonus_item(cell.local, item)
    }

    /// Cells one move away from `cell`.
    ///
    /// Local 4-neighbors, except that a neighbor holding a portal is replaced
    /// by the portal's destination: stepping onto a portal lands on its far
    /// side in the same move.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownCell`] if the cell is not on the board.
    pub fn adjacent(&self, cell: Cell) -> BoardResult<Vec<Cell>> {
        let block = self.block_of(cell)?;
        let mut result = Vec::with_capacity(4);
        for neighbor in block.adjacent(cell)? {
            let effective = match block.item(neighbor.local)? {
                BoardItem::Portal(portal) => Cell::new(portal.dest_block, portal.dest_position),
                _ => neighbor,
            };
            if !result.contains(&effective) {
                result.push(effective);
            }
        }
        Ok(result)
    }

    /// Every cell of the board.
    #[must_use]
    pub fn cells(&self) -> Vec<Cell> {
        self.blocks().flat_map(Block::cells).collect()
    }

    /// Cells holding armies of a player, in no particular order.
    #[must_use]
    pub fn find_player_armies(&self, player: PlayerType) -> Vec<Cell> {
        self.blocks()
            .flat_map(|b| b.find_player_armies(player))
            .collect()
    }

    /// Cells holding armies of a player that may still move.
    #[must_use]
    pub fn find_active_player_armies(&self, player: PlayerType) -> Vec<Cell> {
        self.blocks()
            .flat_map(|b| b.find_active_player_armies(player))
            .collect()
    }

    /// Check if the player has any army left.
    #[must_use]
    pub fn contains_player_armies(&self, player: PlayerType) -> bool {
        self.blocks().any(|b| b.contains_player_armies(player))
    }

    /// Mark every army of the player as able to move.
    pub fn enable_armies(&mut self, player: PlayerType) {
        for block in self.blocks.iter_mut().flatten() {
            block.enable_armies(player);
        }
    }

    /// Sum of the power of every army of a player.
    #[must_use]
    pub fn total_power(&self, player: PlayerType) -> f64 {
        self.blocks()
            .flat_map(|b| b.items().iter())
            .filter_map(BoardItem::army)
            .filter(|army| army.owner == player)
            .map(|army| army.composition.power())
            .sum()
    }

    /// Castle cells registered for a player.
    #[must_use]
    pub fn castles(&self, player: PlayerType) -> &[Cell] {
        self.castles.get(&player).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Castle cells of both players.
    #[must_use]
    pub fn all_castles(&self) -> Vec<Cell> {
        self.castles.values().flatten().copied().collect()
    }

    /// The shortest-path index of the current layout.
    #[must_use]
    pub const fn graph(&self) -> &PortalGraph {
        &self.graph
    }

    /// Moves needed from `cell` to the nearest castle of `owner`'s opponent.
    ///
    /// Returns `Ok(None)` when no enemy castle is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownCell`] if the cell is not on the board.
    pub fn distance_to_enemy_castle(&self, cell: Cell, owner: PlayerType) -> BoardResult<Option<u32>> {
        self.block_of(cell)?;
        Ok(self
            .graph
            .distance_to_nearest(cell, self.castles(owner.opponent())))
    }

    /// Every portal as a `(from, to)` pair of cells.
    #[must_use]
    pub fn passes_as_from_to_cells(&self) -> Vec<(Cell, Cell)> {
        self.blocks()
            .flat_map(|block| {
                let addr = block.address();
                block.passes().into_iter().map(move |portal| {
                    (
                        Cell::new(addr, portal.anchor),
                        Cell::new(portal.dest_block, portal.dest_position),
                    )
                })
            })
            .collect()
    }
}

impl Clone for CompositeBoard {
    fn clone(&self) -> Self {
        self.clone_board()
    }
}

/// Items whose placement changes the derived indexes.
const fn is_structural(item: &BoardItem) -> bool {
    matches!(item, BoardItem::Castle { .. } | BoardItem::Portal(_))
}
