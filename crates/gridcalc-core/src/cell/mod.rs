//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellAddress`] - A cell's location (e.g., "A1")
//! - [`CellRange`] - A range of cells (e.g., "A1:C5")
//! - [`CellError`] - Error markers shown in place of a value

mod address;
mod value;

pub use address::{CellAddress, CellRange, CellRangeIterator};
pub use value::CellError;
