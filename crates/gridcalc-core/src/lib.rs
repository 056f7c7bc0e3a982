//! # gridcalc-core
//!
//! Core data structures for the gridcalc formula engine.
//!
//! This crate provides the fundamental types used throughout gridcalc:
//! - [`CellAddress`] and [`CellRange`] - A1-style cell addressing and ranges
//! - [`CellError`] - Error markers shown in place of a value
//! - [`CellStore`] - The sparse raw cell store edited by the user
//! - [`SheetLimits`] - Sheet dimensions enforced on writes and references
//!
//! ## Example
//!
//! ```rust
//! use gridcalc_core::{CellAddress, CellStore};
//!
//! let mut store = CellStore::new();
//!
//! // Using string addresses
//! store.set_value("A1", "2").unwrap();
//!
//! // Or using row/column indices (0-based)
//! store.set(1, 0, "=A1*3").unwrap();
//!
//! assert_eq!(store.get_value("A2").unwrap(), "=A1*3");
//! assert_eq!(CellAddress::new(1, 0).to_string(), "A2");
//! ```

pub mod cell;
pub mod error;
pub mod limits;
pub mod store;

// Re-exports for convenience
pub use cell::{CellAddress, CellError, CellRange, CellRangeIterator};
pub use error::{Error, Result};
pub use limits::SheetLimits;
pub use store::{is_formula, CellStore};

/// Default maximum number of rows in a sheet
pub const MAX_ROWS: u32 = 10_000;

/// Default maximum number of columns in a sheet
pub const MAX_COLS: u16 = 5_000;
