//! A single rectangular block of the board.

use crate::board::{Army, BoardItem, Cell, Coord, PlayerType, Portal};
use crate::error::{BoardError, BoardResult};

/// One rectangular sub-grid of the board.
///
/// Holds the item layer and a bonus layer of identical dimensions, stored in
/// row-major order, plus the presentation state toggled by the composite
/// board (focus and whether the cells accept clicks).
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Address of this block in the block grid.
    address: Coord,
    /// Width in cells.
    width: u16,
    /// Height in cells.
    height: u16,
    /// Items stored in row-major order.
    items: Vec<BoardItem>,
    /// Bonus items stored in row-major order.
    bonus_items: Vec<BoardItem>,
    /// Whether this block currently has focus.
    active: bool,
    /// Whether cells of this block accept input.
    buttons_enabled: bool,
}

impl Block {
    /// Create an empty block.
    ///
    /// Returns `None` if width or height is zero.
    #[must_use]
    pub fn new(address: Coord, width: u16, height: u16) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        let size = usize::from(width) * usize::from(height);
        Some(Self {
            address,
            width,
            height,
            items: vec![BoardItem::Empty; size],
            bonus_items: vec![BoardItem::Empty; size],
            active: false,
            buttons_enabled: false,
        })
    }

    /// Address of this block in the block grid.
    #[must_use]
    pub const fn address(&self) -> Coord {
        self.address
    }

    /// Width of the block in cells.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Height of the block in cells.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Number of cells in the block.
    #[must_use]
    pub fn number_of_cells(&self) -> usize {
        self.items.len()
    }

    /// Convert a local coordinate to an index into the item arrays.
    fn index(&self, coord: Coord) -> BoardResult<usize> {
        if coord.within(self.width, self.height) {
            Ok(usize::from(coord.y - 1) * usize::from(self.width) + usize::from(coord.x - 1))
        } else {
            Err(BoardError::CoordOutOfRange {
                coord,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Convert an index back into a local coordinate.
    #[allow(clippy::cast_possible_truncation)]
    fn coord_at(&self, idx: usize) -> Coord {
        let width = usize::from(self.width);
        Coord::new((idx % width) as u16 + 1, (idx / width) as u16 + 1)
    }

    /// Get the item at a local coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::CoordOutOfRange`] if the coordinate is outside the block.
    pub fn item(&self, coord: Coord) -> BoardResult<&BoardItem> {
        self.index(coord).map(|idx| &self.items[idx])
    }

    /// Get a mutable reference to the item at a local coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::CoordOutOfRange`] if the coordinate is outside the block.
    pub fn item_mut(&mut self, coord: Coord) -> BoardResult<&mut BoardItem> {
        let idx = self.index(coord)?;
        Ok(&mut self.items[idx])
    }

    /// Replace the item at a local coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::CoordOutOfRange`] if the coordinate is outside the block.
    pub fn set_item(&mut self, coord: Coord, item: BoardItem) -> BoardResult<()> {
        let idx = self.index(coord)?;
        self.items[idx] = item;
        Ok(())
    }

    /// Get the bonus item at a local coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::CoordOutOfRange`] if the coordinate is outside the block.
    pub fn bonus_item(&self, coord: Coord) -> BoardResult<&BoardItem> {
        self.index(coord).map(|idx| &self.bonus_items[idx])
    }

    /// Replace the bonus item at a local coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::CoordOutOfRange`] if the coordinate is outside the block.
    pub fn set_bonus_item(&mut self, coord: Coord, item: BoardItem) -> BoardResult<()> {
        let idx = self.index(coord)?;
        self.bonus_items[idx] = item;
        Ok(())
    }

    /// Give this block focus.
    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Remove focus from this block.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Check if this block has focus.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Let the cells of this block accept input.
    pub fn enable_board_buttons(&mut self) {
        self.buttons_enabled = true;
    }

    /// Stop the cells of this block from accepting input.
    pub fn disable_board_buttons(&mut self) {
        self.buttons_enabled = false;
    }

    /// Check if the cells of this block accept input.
    #[must_use]
    pub const fn buttons_enabled(&self) -> bool {
        self.buttons_enabled
    }

    /// Clear the presentation state. Items are untouched.
    pub fn reset(&mut self) {
        self.active = false;
        self.buttons_enabled = false;
    }

    /// Rotate both item layers by 180°.
    ///
    /// Portal anchors and destinations are not remapped here; that is the
    /// composite board's job, because it needs the destination block's size.
    pub fn invert(&mut self) {
        // Reversing a row-major grid is exactly a 180° rotation.
        self.items.reverse();
        self.bonus_items.reverse();
    }

    /// All portals in this block.
    #[must_use]
    pub fn passes(&self) -> Vec<Portal> {
        self.items.iter().filter_map(BoardItem::portal).copied().collect()
    }

    /// Mutable access to all portals in this block.
    pub fn passes_mut(&mut self) -> impl Iterator<Item = &mut Portal> {
        self.items.iter_mut().filter_map(|item| match item {
            BoardItem::Portal(portal) => Some(portal),
            _ => None,
        })
    }

    /// Check if the cell belongs to this block.
    #[must_use]
    pub fn contains_cell(&self, cell: Cell) -> bool {
        cell.block == self.address && cell.local.within(self.width, self.height)
    }

    /// The cell handle for a local coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::CoordOutOfRange`] if the coordinate is outside the block.
    pub fn cell_by_position(&self, coord: Coord) -> BoardResult<Cell> {
        self.index(coord)?;
        Ok(Cell::new(self.address, coord))
    }

    /// Local position of a cell, or `None` if it belongs elsewhere.
    #[must_use]
    pub fn position_on_board(&self, cell: Cell) -> Option<Coord> {
        self.contains_cell(cell).then_some(cell.local)
    }

    /// Local 4-neighbors of a cell, without portal resolution.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownCell`] if the cell is not in this block.
    pub fn adjacent(&self, cell: Cell) -> BoardResult<Vec<Cell>> {
        if !self.contains_cell(cell) {
            return Err(BoardError::UnknownCell(cell));
        }
        let (adj, count) = cell.local.adjacent(self.width, self.height);
        Ok(adj[..usize::from(count)]
            .iter()
            .map(|&local| Cell::new(self.address, local))
            .collect())
    }

    /// Iterate over all cells and their items.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, &BoardItem)> {
        self.items
            .iter()
            .enumerate()
            .map(|(idx, item)| (Cell::new(self.address, self.coord_at(idx)), item))
    }

    /// All cells of this block in row-major order.
    #[must_use]
    pub fn cells(&self) -> Vec<Cell> {
        self.iter().map(|(cell, _)| cell).collect()
    }

    /// Cells holding a castle of the given player.
    #[must_use]
    pub fn find_castle(&self, player: PlayerType) -> Vec<Cell> {
        self.iter()
            .filter(|(_, item)| matches!(item, BoardItem::Castle { owner } if *owner == player))
            .map(|(cell, _)| cell)
            .collect()
    }

    /// Field armies owned by a player.
    fn player_armies(&self, player: PlayerType) -> impl Iterator<Item = (Cell, &Army)> {
        self.iter().filter_map(move |(cell, item)| {
            item.army()
                .filter(|army| army.owner == player)
                .map(|army| (cell, army))
        })
    }

    /// Cells holding armies of the given player.
    #[must_use]
    pub fn find_player_armies(&self, player: PlayerType) -> Vec<Cell> {
        self.player_armies(player).map(|(cell, _)| cell).collect()
    }

    /// Cells holding armies of the given player that may still move.
    #[must_use]
    pub fn find_active_player_armies(&self, player: PlayerType) -> Vec<Cell> {
        self.player_armies(player)
            .filter(|(_, army)| army.active)
            .map(|(cell, _)| cell)
            .collect()
    }

    /// Check if the player has any army in this block.
    #[must_use]
    pub fn contains_player_armies(&self, player: PlayerType) -> bool {
        self.player_armies(player).next().is_some()
    }

    /// Mark every army of the player as able to move.
    pub fn enable_armies(&mut self, player: PlayerType) {
        for item in &mut self.items {
            if let Some(army) = item.army_mut()
                && army.owner == player
            {
                army.active = true;
            }
        }
    }

    /// Raw item slice in row-major order.
    #[must_use]
    pub fn items(&self) -> &[BoardItem] {
        &self.items
    }

    /// Raw bonus item slice in row-major order.
    #[must_use]
    pub fn bonus_items(&self) -> &[BoardItem] {
        &self.bonus_items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::ArmyComposition;

    fn soldiers(n: u32) -> ArmyComposition {
        ArmyComposition::new(n, 0, 0, 1.0).unwrap()
    }

    fn block() -> Block {
        Block::new(Coord::new(1, 1), 3, 3).unwrap()
    }

    #[test]
    fn test_block_zero_size() {
        assert!(Block::new(Coord::new(1, 1), 0, 3).is_none());
        assert!(Block::new(Coord::new(1, 1), 3, 0).is_none());
    }

    #[test]
    fn test_block_get_set() {
        let mut b = block();
        let coord = Coord::new(2, 3);
        assert!(b.item(coord).unwrap().is_empty());
        b.set_item(coord, BoardItem::Castle { owner: PlayerType::First })
            .unwrap();
        assert_eq!(b.item(coord).unwrap().owner(), Some(PlayerType::First));
        assert!(b.bonus_item(coord).unwrap().is_empty());
    }

    #[test]
    fn test_block_out_of_range() {
        let mut b = block();
        assert!(matches!(
            b.item(Coord::new(4, 1)),
            Err(BoardError::CoordOutOfRange { .. })
        ));
        assert!(b.set_item(Coord::new(0, 1), BoardItem::Empty).is_err());
        assert!(b.cell_by_position(Coord::new(1, 4)).is_err());
    }

    #[test]
    fn test_block_invert() {
        let mut b = block();
        b.set_item(Coord::new(1, 1), BoardItem::Castle { owner: PlayerType::First })
            .unwrap();
        b.set_bonus_item(Coord::new(3, 2), BoardItem::Castle { owner: PlayerType::Second })
            .unwrap();
        b.invert();
        assert!(b.item(Coord::new(1, 1)).unwrap().is_empty());
        assert_eq!(
            b.item(Coord::new(3, 3)).unwrap().owner(),
            Some(PlayerType::First)
        );
        assert_eq!(
            b.bonus_item(Coord::new(1, 2)).unwrap().owner(),
            Some(PlayerType::Second)
        );
    }

    #[test]
    fn test_block_armies() {
        let mut b = block();
        let mut tired = Army::field(PlayerType::First, soldiers(3));
        tired.active = false;
        b.set_item(Coord::new(1, 1), BoardItem::Army(tired)).unwrap();
        b.set_item(
            Coord::new(2, 2),
            BoardItem::Army(Army::field(PlayerType::First, soldiers(1))),
        )
        .unwrap();

        assert_eq!(b.find_player_armies(PlayerType::First).len(), 2);
        assert_eq!(
            b.find_active_player_armies(PlayerType::First),
            vec![Cell::new(Coord::new(1, 1), Coord::new(2, 2))]
        );
        assert!(!b.contains_player_armies(PlayerType::Second));

        b.enable_armies(PlayerType::First);
        assert_eq!(b.find_active_player_armies(PlayerType::First).len(), 2);
    }

    #[test]
    fn test_block_adjacent_and_cells() {
        let b = block();
        assert_eq!(b.number_of_cells(), 9);
        assert_eq!(b.cells().len(), 9);
        assert_eq!(b.cells()[3], Cell::new(Coord::new(1, 1), Coord::new(1, 2)));

        let centre = Cell::new(Coord::new(1, 1), Coord::new(2, 2));
        assert_eq!(b.adjacent(centre).unwrap().len(), 4);

        let foreign = Cell::new(Coord::new(2, 1), Coord::new(2, 2));
        assert!(!b.contains_cell(foreign));
        assert_eq!(b.position_on_board(foreign), None);
        assert!(matches!(b.adjacent(foreign), Err(BoardError::UnknownCell(_))));
    }

    #[test]
    fn test_block_presentation_state() {
        let mut b = block();
        b.activate();
        b.enable_board_buttons();
        assert!(b.is_active());
        assert!(b.buttons_enabled());
        b.reset();
        assert!(!b.is_active());
        assert!(!b.buttons_enabled());
    }

    #[test]
    fn test_block_passes() {
        let mut b = block();
        let portal = Portal::new(Coord::new(3, 2), Coord::new(2, 1), Coord::new(1, 2));
        b.set_item(Coord::new(3, 2), BoardItem::Portal(portal)).unwrap();
        assert_eq!(b.passes(), vec![portal]);
    }
}
