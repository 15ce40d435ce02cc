//! Board configuration.

use serde::{Deserialize, Serialize};

use crate::error::{BoardError, BoardResult};

/// Dimensions of the block grid and of every block in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Number of block columns.
    pub block_cols: u16,
    /// Number of block rows.
    pub block_rows: u16,
    /// Width of each block in cells.
    pub block_width: u16,
    /// Height of each block in cells.
    pub block_height: u16,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            block_cols: 2,
            block_rows: 2,
            block_width: 8,
            block_height: 8,
        }
    }
}

impl BoardConfig {
    /// Width of the whole board in cells.
    #[must_use]
    pub fn global_width(&self) -> u32 {
        u32::from(self.block_cols) * u32::from(self.block_width)
    }

    /// Height of the whole board in cells.
    #[must_use]
    pub fn global_height(&self) -> u32 {
        u32::from(self.block_rows) * u32::from(self.block_height)
    }

    /// Check that every dimension is non-zero and the board fits `u16` extents.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::MalformedFill`] describing the bad dimension.
    pub fn validate(&self) -> BoardResult<()> {
        if self.block_cols == 0 || self.block_rows == 0 {
            return Err(BoardError::MalformedFill(format!(
                "block grid must be non-empty, got {}x{}",
                self.block_cols, self.block_rows
            )));
        }
        if self.block_width == 0 || self.block_height == 0 {
            return Err(BoardError::MalformedFill(format!(
                "blocks must be non-empty, got {}x{}",
                self.block_width, self.block_height
            )));
        }
        if self.global_width() > u32::from(u16::MAX) || self.global_height() > u32::from(u16::MAX)
        {
            return Err(BoardError::MalformedFill(format!(
                "board of {}x{} cells is too large",
                self.global_width(),
                self.global_height()
            )));
        }
        Ok(())
    }
}
