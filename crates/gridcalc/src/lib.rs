//! # gridcalc
//!
//! A spreadsheet formula engine.
//!
//! Raw cell strings live in a sparse [`CellStore`]. Formulas (cells starting with `=`)
//! are tokenized, compiled to a postfix instruction stream and evaluated against the
//! store; [`recompute`] turns the whole store into an evaluated snapshot, detecting
//! reference cycles along the way.
//!
//! ## Features
//!
//! - A1 references and rectangular ranges (`A1`, `B2:D10`)
//! - Arithmetic, comparisons and unary minus with spreadsheet precedence
//! - Built-in functions: aggregates, math, logical, text, criteria and time
//! - Error markers instead of failures: `#CYCLE!`, `#NAME?`, `#REF!`, `#ERROR`
//! - CSV import and export of the raw store
//!
//! ## Example
//!
//! ```rust
//! use gridcalc::prelude::*;
//!
//! let mut store = CellStore::new();
//! store.set_value("A1", "1").unwrap();
//! store.set_value("A2", "2").unwrap();
//! store.set_value("A3", "3").unwrap();
//! store.set_value("B1", "=SUM(A1:A3)").unwrap();
//! store.set_value("B2", "=B2").unwrap();
//!
//! let snapshot = store.recompute();
//! assert_eq!(snapshot[&CellAddress::new(0, 1)], "6");
//! assert_eq!(snapshot[&CellAddress::new(1, 1)], "#CYCLE!");
//! ```

pub mod calculation;
pub mod prelude;

// Re-export calculation types
pub use calculation::{
    evaluate_formula, recompute, recompute_with_stats, CalculationStats, EvaluatedSnapshot,
    StoreCalculationExt,
};

// Re-export core types
pub use gridcalc_core::{
    is_formula, CellAddress, CellError, CellRange, CellRangeIterator, CellStore, Error, Result,
    SheetLimits, MAX_COLS, MAX_ROWS,
};

// Re-export formula types
pub use gridcalc_formula::{
    evaluate, evaluate_to_display, function_registry, parse_formula, parse_formula_with_limits,
    tokenize, CellLookup, FormulaError, FormulaResult, FormulaValue, Instruction, Scalar,
};

// Re-export I/O types
pub use gridcalc_csv::{
    CsvError, CsvImport, CsvReadOptions, CsvReader, CsvResult, CsvWriteOptions, CsvWriter,
};

use std::path::Path;

/// Extension trait for CellStore to add file I/O
pub trait CellStoreExt: Sized {
    /// Open a store from a CSV file
    ///
    /// Fields outside the default sheet limits are dropped (and logged).
    fn open<P: AsRef<Path>>(path: P) -> CsvResult<Self>;

    /// Save the raw store to a CSV file
    fn save<P: AsRef<Path>>(&self, path: P) -> CsvResult<()>;
}

impl CellStoreExt for CellStore {
    fn open<P: AsRef<Path>>(path: P) -> CsvResult<CellStore> {
        let import = CsvReader::read_file(path, &CsvReadOptions::default())?;
        Ok(import.store)
    }

    fn save<P: AsRef<Path>>(&self, path: P) -> CsvResult<()> {
        CsvWriter::write_file(self, path, &CsvWriteOptions::default())
    }
}
