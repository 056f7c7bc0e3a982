//! # gridcalc-csv
//!
//! CSV reader and writer for the raw gridcalc cell store.
//!
//! The format is deliberately plain: fields are split on the delimiter with no
//! quoting or escaping, so values containing the delimiter or a line break do not
//! survive a round trip.

mod error;
mod options;
mod reader;
mod writer;

pub use error::{CsvError, CsvResult};
pub use options::{CsvReadOptions, CsvWriteOptions, LineTerminator};
pub use reader::{CsvImport, CsvReader};
pub use writer::CsvWriter;
