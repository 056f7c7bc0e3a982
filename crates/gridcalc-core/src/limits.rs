//! Sheet size limits

use crate::cell::CellAddress;
use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};

/// Maximum sheet dimensions
///
/// Enforced by the cell store on writes, by the formula parser when resolving
/// references, and by CSV import (which truncates and reports).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SheetLimits {
    /// Number of addressable rows
    pub max_rows: u32,
    /// Number of addressable columns
    pub max_cols: u16,
}

impl Default for SheetLimits {
    fn default() -> Self {
        Self {
            max_rows: MAX_ROWS,
            max_cols: MAX_COLS,
        }
    }
}

impl SheetLimits {
    /// Create limits with the given dimensions
    pub fn new(max_rows: u32, max_cols: u16) -> Self {
        Self { max_rows, max_cols }
    }

    /// Check whether an address lies inside the sheet
    pub fn contains(&self, addr: &CellAddress) -> bool {
        addr.row < self.max_rows && addr.col < self.max_cols
    }

    /// Validate a cell position, reporting which axis is out of bounds
    pub fn validate(&self, row: u32, col: u16) -> Result<()> {
        if row >= self.max_rows {
            return Err(Error::RowOutOfBounds(row, self.max_rows.saturating_sub(1)));
        }
        if col >= self.max_cols {
            return Err(Error::ColumnOutOfBounds(col, self.max_cols.saturating_sub(1)));
        }
        Ok(())
    }
}
