//! Formula error types

use gridcalc_core::CellError;
use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur during formula evaluation
///
/// Every variant collapses to one of the cell error markers via
/// [`FormulaError::to_cell_error`]; formulas never fail louder than that.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    /// An error instruction emitted by the parser
    #[error("Cell error: {0}")]
    Cell(CellError),

    /// Formula evaluation error (stack imbalance, empty formula)
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// Unknown function
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Wrong number of arguments
    #[error("Wrong number of arguments for {function}: expected {expected}, got {actual}")]
    ArgumentCount {
        function: String,
        expected: String,
        actual: usize,
    },
}

impl FormulaError {
    /// The marker shown in a cell whose formula failed with this error
    pub fn to_cell_error(&self) -> CellError {
        match self {
            FormulaError::Cell(err) => *err,
            FormulaError::UnknownFunction(_) => CellError::Name,
            _ => CellError::Error,
        }
    }
}

impl From<CellError> for FormulaError {
    fn from(err: CellError) -> Self {
        FormulaError::Cell(err)
    }
}
