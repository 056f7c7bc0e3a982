//! CSV reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::options::CsvReadOptions;
use gridcalc_core::CellStore;

/// Result of a CSV import
#[derive(Debug, Clone, Default)]
pub struct CsvImport {
    /// Imported cells
    pub store: CellStore,
    /// Non-empty fields dropped because they fall outside the sheet limits
    pub truncated: usize,
}

/// CSV file reader
pub struct CsvReader;

impl CsvReader {
    /// Read CSV file into a store
    pub fn read_file<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> CsvResult<CsvImport> {
        let file = File::open(path)?;
        Self::read(file, options)
    }

    /// Read CSV from a reader into a store
    pub fn read<R: Read>(mut reader: R, options: &CsvReadOptions) -> CsvResult<CsvImport> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;

        let text = String::from_utf8(bytes).map_err(|e| {
            let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
            let line_start = valid.iter().rposition(|b| *b == b'\n').map_or(0, |i| i + 1);
            let delimiter = options.delimiter as u32;
            CsvError::Parse {
                row: valid.iter().filter(|b| **b == b'\n').count() + 1,
                column: valid[line_start..]
                    .iter()
                    .filter(|b| u32::from(**b) == delimiter)
                    .count()
                    + 1,
                message: "invalid UTF-8".into(),
            }
        })?;

        Self::read_str(&text, options)
    }

    /// Parse CSV text into a store
    ///
    /// Lines end with `\n` or `\r\n`; trailing empty lines are ignored. Fields are
    /// stored verbatim, but only when they contain something besides whitespace.
    pub fn read_str(text: &str, options: &CsvReadOptions) -> CsvResult<CsvImport> {
        let limits = options.limits;
        let mut store = CellStore::with_limits(limits);
        let mut truncated = 0usize;

        let mut lines: Vec<&str> = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect();
        while lines.last().map_or(false, |line| line.is_empty()) {
            lines.pop();
        }

        for (row, line) in lines.iter().enumerate() {
            for (col, field) in line.split(options.delimiter).enumerate() {
                if field.trim().is_empty() {
                    continue;
                }

                let position = u32::try_from(row)
                    .ok()
                    .zip(u16::try_from(col).ok())
                    .filter(|(r, c)| *r < limits.max_rows && *c < limits.max_cols);

                match position {
                    Some((r, c)) => store.set(r, c, field)?,
                    None => truncated += 1,
                }
            }
        }

        if truncated > 0 {
            log::warn!(
                "CSV import dropped {} non-empty fields outside the {}x{} sheet",
                truncated,
                limits.max_rows,
                limits.max_cols
            );
        }

        Ok(CsvImport { store, truncated })
    }
}
