//! Flat global item arrays used to fill and export a composite board.

use crate::board::{BoardItem, Coord};
use crate::error::{BoardError, BoardResult};

/// A whole-board rectangle of items addressed by 1-based global coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemGrid {
    /// Width in cells.
    width: u16,
    /// Height in cells.
    height: u16,
    /// Items stored in row-major order.
    items: Vec<BoardItem>,
}

impl ItemGrid {
    /// Create a grid of empty cells.
    ///
    /// Returns `None` if width or height is zero.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self {
            width,
            height,
            items: vec![BoardItem::Empty; usize::from(width) * usize::from(height)],
        })
    }

    /// Width of the grid.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Height of the grid.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

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

    /// Get the item at a global coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::CoordOutOfRange`] outside the grid.
    pub fn get(&self, coord: Coord) -> BoardResult<&BoardItem> {
        self.index(coord).map(|idx| &self.items[idx])
    }

    /// Replace the item at a global coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::CoordOutOfRange`] outside the grid.
    pub fn set(&mut self, coord: Coord, item: BoardItem) -> BoardResult<()> {
        let idx = self.index(coord)?;
        self.items[idx] = item;
        Ok(())
    }

    /// Raw items in row-major order.
    #[must_use]
    pub fn items(&self) -> &[BoardItem] {
        &self.items
    }
}
