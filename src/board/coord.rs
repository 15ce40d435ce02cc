//! Coordinates and cell handles.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A 1-based position, used both for cells inside a block and for block
/// addresses inside the block grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    /// X coordinate (column), starting at 1.
    pub x: u16,
    /// Y coordinate (row), starting at 1.
    pub y: u16,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Check if this coordinate lies inside a `width` x `height` rectangle.
    #[must_use]
    pub const fn within(self, width: u16, height: u16) -> bool {
        self.x >= 1 && self.y >= 1 && self.x <= width && self.y <= height
    }

    /// The position this coordinate occupies after a 180° rotation of a
    /// `width` x `height` rectangle.
    ///
    /// Only meaningful for coordinates inside the rectangle.
    #[must_use]
    pub const fn inverted(self, width: u16, height: u16) -> Self {
        Self {
            x: width - self.x + 1,
            y: height - self.y + 1,
        }
    }

    /// Get adjacent coordinates (up, down, left, right) inside a
    /// `width` x `height` rectangle.
    ///
    /// Returns a fixed-size array and count to avoid heap allocation.
    /// The array contains valid coordinates in indices 0..count.
    #[must_use]
    #[inline]
    pub fn adjacent(&self, width: u16, height: u16) -> ([Coord; 4], u8) {
        let mut result = [Coord::new(1, 1); 4];
        let mut count = 0u8;

        if self.y > 1 {
            result[count as usize] = Coord::new(self.x, self.y - 1); // up
            count += 1;
        }
        if self.y < height {
            result[count as usize] = Coord::new(self.x, self.y + 1); // down
            count += 1;
        }
        if self.x > 1 {
            result[count as usize] = Coord::new(self.x - 1, self.y); // left
            count += 1;
        }
        if self.x < width {
            result[count as usize] = Coord::new(self.x + 1, self.y); // right
            count += 1;
        }

        (result, count)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// A globally addressable board position: a block address plus a local
/// coordinate inside that block.
///
/// Equality is component-wise and independent of which block is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    /// Address of the block in the block grid.
    pub block: Coord,
    /// Position inside the block.
    pub local: Coord,
}

impl Cell {
    /// Create a new cell handle.
    #[must_use]
    pub const fn new(block: Coord, local: Coord) -> Self {
        Self { block, local }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block {} pos {}", self.block, self.local)
    }
}
