//! CSV writer

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::CsvResult;
use crate::options::CsvWriteOptions;
use gridcalc_core::{CellAddress, CellStore};

/// CSV file writer
///
/// Every row from the first up to the last populated one is written, each padded
/// to the widest populated column. An empty sheet produces empty output.
pub struct CsvWriter;

impl CsvWriter {
    /// Write a store to a CSV file
    pub fn write_file<P: AsRef<Path>>(
        store: &CellStore,
        path: P,
        options: &CsvWriteOptions,
    ) -> CsvResult<()> {
        let file = File::create(path)?;
        Self::write(store, file, options)
    }

    /// Write a store to a writer
    pub fn write<W: Write>(store: &CellStore, mut writer: W, options: &CsvWriteOptions) -> CsvResult<()> {
        writer.write_all(Self::write_string(store, options).as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Render a store as CSV text
    pub fn write_string(store: &CellStore, options: &CsvWriteOptions) -> String {
        Self::cells_to_string(store.iter().map(|(addr, raw)| (*addr, raw)), options)
    }

    /// Render arbitrary addressed values (such as an evaluated snapshot) as CSV text
    pub fn cells_to_string<I, S>(cells: I, options: &CsvWriteOptions) -> String
    where
        I: IntoIterator<Item = (CellAddress, S)>,
        S: AsRef<str>,
    {
        let cells: BTreeMap<CellAddress, S> = cells.into_iter().collect();

        let (Some(max_row), Some(max_col)) = (
            cells.keys().map(|addr| addr.row).max(),
            cells.keys().map(|addr| addr.col).max(),
        ) else {
            return String::new();
        };

        let terminator = options.line_terminator.as_str();
        let mut entries = cells.iter().peekable();
        let mut out = String::new();

        for row in 0..=max_row {
            if row > 0 {
                out.push_str(terminator);
            }
            for col in 0..=max_col {
                if col > 0 {
                    out.push(options.delimiter);
                }
                if let Some((_, value)) =
                    entries.next_if(|(addr, _)| addr.row == row && addr.col == col)
                {
                    out.push_str(value.as_ref());
                }
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::LineTerminator;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_write_empty_store() {
        let store = CellStore::new();
        assert_eq!(CsvWriter::write_string(&store, &CsvWriteOptions::default()), "");
    }

    #[test]
    fn test_write_pads_rows_and_columns() {
        let mut store = CellStore::new();
        store.set_value("A1", "1").unwrap();
        store.set_value("C1", "=A1*2").unwrap();
        store.set_value("B3", "x").unwrap();

        let csv = CsvWriter::write_string(&store, &CsvWriteOptions::default());
        assert_eq!(csv, "1,,=A1*2\r\n,,\r\n,x,");
    }

    #[test]
    fn test_write_starts_at_origin() {
        let mut store = CellStore::new();
        store.set_value("B2", "v").unwrap();

        let options = CsvWriteOptions {
            delimiter: ';',
            line_terminator: LineTerminator::LF,
        };
        assert_eq!(CsvWriter::write_string(&store, &options), ";\n;v");
    }

    #[test]
    fn test_cells_to_string() {
        let cells = vec![
            (CellAddress::new(0, 1), "b".to_string()),
            (CellAddress::new(0, 0), "a".to_string()),
        ];
        assert_eq!(
            CsvWriter::cells_to_string(cells, &CsvWriteOptions::default()),
            "a,b"
        );
    }
}
