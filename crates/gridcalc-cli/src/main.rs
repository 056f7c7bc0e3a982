//! gridcalc CLI - evaluate spreadsheet formulas from the shell

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use gridcalc::prelude::*;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "gridcalc")]
#[command(author, version, about = "Spreadsheet formula evaluation tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate every cell of a CSV sheet and output the results as CSV
    Eval {
        /// Input CSV file with raw cell values and formulas
        input: PathBuf,

        /// Output CSV file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        csv: CsvArgs,
    },

    /// Print the evaluated value of one cell
    Cell {
        /// Input CSV file
        input: PathBuf,

        /// Cell address (e.g., B12)
        address: String,

        #[command(flatten)]
        csv: CsvArgs,
    },

    /// Evaluate a single formula, optionally against a sheet
    Formula {
        /// Formula text (the leading '=' is optional)
        expr: String,

        /// CSV sheet the formula's references read from
        #[arg(short, long)]
        sheet: Option<PathBuf>,

        #[command(flatten)]
        csv: CsvArgs,
    },

    /// Show information about a sheet
    Info {
        /// Input CSV file
        input: PathBuf,

        #[command(flatten)]
        csv: CsvArgs,
    },
}

/// CSV options shared by every subcommand
#[derive(Args, Debug, Clone, Copy, PartialEq)]
struct CsvArgs {
    /// Field delimiter (default: comma)
    #[arg(short, long, default_value = ",")]
    delimiter: char,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Eval { input, output, csv } => {
            eval_sheet(&input, output.as_deref(), csv.delimiter)
        }
        Commands::Cell {
            input,
            address,
            csv,
        } => show_cell(&input, &address, csv.delimiter),
        Commands::Formula { expr, sheet, csv } => {
            eval_formula(&expr, sheet.as_deref(), csv.delimiter)
        }
        Commands::Info { input, csv } => show_info(&input, csv.delimiter),
    }
}

fn load(input: &Path, delimiter: char) -> Result<CellStore> {
    let options = CsvReadOptions {
        delimiter,
        ..Default::default()
    };
    let import = CsvReader::read_file(input, &options)
        .with_context(|| format!("Failed to open '{}'", input.display()))?;

    if import.truncated > 0 {
        eprintln!(
            "Warning: dropped {} cells outside the {}x{} sheet",
            import.truncated,
            import.store.limits().max_rows,
            import.store.limits().max_cols
        );
    }

    Ok(import.store)
}

fn eval_sheet(input: &Path, output: Option<&Path>, delimiter: char) -> Result<()> {
    let store = load(input, delimiter)?;
    let (snapshot, stats) = recompute_with_stats(&store);

    eprintln!(
        "Calculated {} formulas ({} errors, {} in cycles)",
        stats.formula_count, stats.errors, stats.circular_references
    );

    let options = CsvWriteOptions {
        delimiter,
        ..Default::default()
    };
    let csv_output = CsvWriter::cells_to_string(snapshot, &options);

    if let Some(output_path) = output {
        std::fs::write(output_path, &csv_output)
            .with_context(|| format!("Failed to write '{}'", output_path.display()))?;
        eprintln!("Wrote {} cells to '{}'", store.len(), output_path.display());
    } else {
        let mut stdout = io::stdout();
        stdout
            .write_all(csv_output.as_bytes())
            .and_then(|_| stdout.write_all(b"\n"))
            .context("Failed to write to stdout")?;
    }

    Ok(())
}

fn show_cell(input: &Path, address: &str, delimiter: char) -> Result<()> {
    let addr =
        CellAddress::parse(address).with_context(|| format!("Invalid cell address '{}'", address))?;
    let store = load(input, delimiter)?;
    let snapshot = store.recompute();

    let value = snapshot.get(&addr).map(String::as_str).unwrap_or("");
    println!("{}", value);
    Ok(())
}

fn eval_formula(expr: &str, sheet: Option<&Path>, delimiter: char) -> Result<()> {
    let store = match sheet {
        Some(path) => load(path, delimiter)?,
        None => CellStore::new(),
    };

    println!("{}", evaluate_formula(expr, &store));
    Ok(())
}

fn show_info(input: &Path, delimiter: char) -> Result<()> {
    let store = load(input, delimiter)?;
    let (_, stats) = recompute_with_stats(&store);

    println!("File: {}", input.display());
    println!("Cells: {}", store.len());
    match store.used_range() {
        Some(range) => println!("Used range: {}", range),
        None => println!("Used range: (empty)"),
    }
    println!("Formulas: {}", stats.formula_count);
    println!("Volatile formulas: {}", stats.volatile_cells);
    println!("Errors: {}", stats.errors);
    println!("Cells in cycles: {}", stats.circular_references);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delimiter_of(args: &[&str]) -> char {
        match Cli::try_parse_from(args).unwrap().command {
            Commands::Eval { csv, .. }
            | Commands::Cell { csv, .. }
            | Commands::Formula { csv, .. }
            | Commands::Info { csv, .. } => csv.delimiter,
        }
    }

    #[test]
    fn test_delimiter_on_every_subcommand() {
        assert_eq!(delimiter_of(&["gridcalc", "eval", "in.csv", "-d", ";"]), ';');
        assert_eq!(delimiter_of(&["gridcalc", "cell", "in.csv", "B2", "-d", ";"]), ';');
        assert_eq!(
            delimiter_of(&["gridcalc", "formula", "=A1", "--sheet", "in.csv", "--delimiter", "\t"]),
            '\t'
        );
        assert_eq!(delimiter_of(&["gridcalc", "info", "in.csv", "-d", "|"]), '|');
    }

    #[test]
    fn test_delimiter_defaults_to_comma() {
        assert_eq!(delimiter_of(&["gridcalc", "info", "in.csv"]), ',');
        assert_eq!(delimiter_of(&["gridcalc", "formula", "=1+2"]), ',');
    }

    #[test]
    fn test_load_with_delimiter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.csv");
        std::fs::write(&path, "1;2\n=A1+B1\n").unwrap();
        let store = load(&path, ';').unwrap();

        assert_eq!(store.evaluate_formula("=A2*10"), "30");
    }
}
