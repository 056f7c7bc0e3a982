//! Prelude module - common imports for gridcalc users
//!
//! ```rust
//! use gridcalc::prelude::*;
//! ```

pub use crate::{
    // Calculation
    evaluate_formula,
    recompute,
    recompute_with_stats,
    CalculationStats,
    // Cell types
    CellAddress,
    CellError,
    CellRange,
    // Extension traits
    CellStoreExt,
    CellStore,
    // I/O types
    CsvReadOptions,
    CsvReader,
    CsvWriteOptions,
    CsvWriter,
    // Error types
    Error,
    EvaluatedSnapshot,
    Result,
    SheetLimits,
    StoreCalculationExt,
};
