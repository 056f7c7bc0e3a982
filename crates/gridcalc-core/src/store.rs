//! Sparse raw cell storage
//!
//! The store holds exactly what the user typed into each cell. Evaluation only ever
//! reads from it; the evaluated snapshot is derived from it on every recompute.

use std::collections::BTreeMap;

use crate::cell::{CellAddress, CellRange};
use crate::error::Result;
use crate::limits::SheetLimits;

/// Check whether a raw cell value is a formula (`=` after trimming)
pub fn is_formula(raw: &str) -> bool {
    raw.trim_start().starts_with('=')
}

/// Sparse mapping from cell address to raw string
///
/// Absence of a key means an empty cell. Empty strings are never stored: setting a
/// cell to `""` removes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellStore {
    cells: BTreeMap<CellAddress, String>,
    limits: SheetLimits,
}

impl CellStore {
    /// Create an empty store with the default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with custom limits
    pub fn with_limits(limits: SheetLimits) -> Self {
        Self {
            cells: BTreeMap::new(),
            limits,
        }
    }

    /// Limits enforced on writes
    pub fn limits(&self) -> SheetLimits {
        self.limits
    }

    // === Cell Access ===

    /// Get the raw value at row/column, `""` when empty
    pub fn get(&self, row: u32, col: u16) -> &str {
        self.get_at(&CellAddress::new(row, col))
    }

    /// Get the raw value at an address, `""` when empty
    pub fn get_at(&self, addr: &CellAddress) -> &str {
        self.cells.get(addr).map(String::as_str).unwrap_or("")
    }

    /// Get the raw value by A1 address string (e.g., "B12")
    pub fn get_value(&self, address: &str) -> Result<&str> {
        let addr = CellAddress::parse(address)?;
        Ok(self.get_at(&addr))
    }

    /// Set the raw value at row/column
    ///
    /// An empty value deletes the cell.
    pub fn set<S: Into<String>>(&mut self, row: u32, col: u16, value: S) -> Result<()> {
        self.set_at(CellAddress::new(row, col), value)
    }

    /// Set the raw value at an address
    pub fn set_at<S: Into<String>>(&mut self, addr: CellAddress, value: S) -> Result<()> {
        self.limits.validate(addr.row, addr.col)?;

        let value = value.into();
        if value.is_empty() {
            self.cells.remove(&addr);
        } else {
            self.cells.insert(addr, value);
        }
        Ok(())
    }

    /// Set the raw value by A1 address string
    pub fn set_value<S: Into<String>>(&mut self, address: &str, value: S) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_at(addr, value)
    }

    /// Remove a cell, returning its previous raw value
    pub fn delete(&mut self, row: u32, col: u16) -> Option<String> {
        self.cells.remove(&CellAddress::new(row, col))
    }

    // === Iteration ===

    /// Iterate over all non-empty cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (&CellAddress, &str)> + '_ {
        self.cells.iter().map(|(addr, raw)| (addr, raw.as_str()))
    }

    /// Addresses of all non-empty cells in row-major order
    pub fn addresses(&self) -> impl Iterator<Item = CellAddress> + '_ {
        self.cells.keys().copied()
    }

    /// Get the number of non-empty cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Smallest range covering every non-empty cell
    pub fn used_range(&self) -> Option<CellRange> {
        let mut cells = self.cells.keys();
        let first = cells.next()?;
        let (mut min_row, mut min_col) = (first.row, first.col);
        let (mut max_row, mut max_col) = (first.row, first.col);

        for addr in cells {
            min_row = min_row.min(addr.row);
            min_col = min_col.min(addr.col);
            max_row = max_row.max(addr.row);
            max_col = max_col.max(addr.col);
        }

        Some(CellRange::from_indices(min_row, min_col, max_row, max_col))
    }
}

impl<'a> IntoIterator for &'a CellStore {
    type Item = (&'a CellAddress, &'a String);
    type IntoIter = std::collections::btree_map::Iter<'a, CellAddress, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_get_set_delete() {
        let mut store = CellStore::new();
        assert_eq!(store.get(0, 0), "");

        store.set(0, 0, "42").unwrap();
        store.set_value("B3", "=A1*2").unwrap();
        assert_eq!(store.get(0, 0), "42");
        assert_eq!(store.get(2, 1), "=A1*2");
        assert_eq!(store.get_value("b3").unwrap(), "=A1*2");
        assert_eq!(store.len(), 2);

        assert_eq!(store.delete(0, 0), Some("42".to_string()));
        assert_eq!(store.get(0, 0), "");
        assert_eq!(store.delete(0, 0), None);
    }

    #[test]
    fn test_empty_value_removes_cell() {
        let mut store = CellStore::new();
        store.set(1, 1, "x").unwrap();
        store.set(1, 1, "").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_set_out_of_bounds() {
        let mut store = CellStore::with_limits(SheetLimits::new(5, 2));
        assert!(matches!(store.set(5, 0, "x"), Err(Error::RowOutOfBounds(5, 4))));
        assert!(matches!(store.set(0, 2, "x"), Err(Error::ColumnOutOfBounds(2, 1))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_iteration_is_row_major() {
        let mut store = CellStore::new();
        store.set_value("B2", "d").unwrap();
        store.set_value("A2", "c").unwrap();
        store.set_value("B1", "b").unwrap();
        store.set_value("A1", "a").unwrap();

        let values: Vec<&str> = store.iter().map(|(_, raw)| raw).collect();
        assert_eq!(values, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_used_range() {
        let mut store = CellStore::new();
        assert_eq!(store.used_range(), None);

        store.set_value("C2", "1").unwrap();
        store.set_value("B5", "2").unwrap();
        assert_eq!(store.used_range(), Some(CellRange::parse("B2:C5").unwrap()));
    }

    #[test]
    fn test_is_formula() {
        assert!(is_formula("=1+2"));
        assert!(is_formula("  =A1"));
        assert!(!is_formula("1+2"));
        assert!(!is_formula("a=b"));
        assert!(!is_formula(""));
    }
}
