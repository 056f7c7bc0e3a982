//! Cell error markers

use std::fmt;

/// Error marker placed in an evaluated cell in place of a value
///
/// Errors at the formula-cell boundary are values, not exceptions: every failure
/// resolves to one of these markers in the evaluated snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellError {
    /// #CYCLE! - The cell depends on its own evaluation
    Cycle,
    /// #NAME? - Bare identifier or unknown function name
    Name,
    /// #REF! - Reference that cannot be resolved to valid coordinates
    Ref,
    /// #ERROR - Any other failure (syntax, arity, evaluation)
    Error,
}

impl CellError {
    /// Get the display string for this error
    pub fn as_str(&self) -> &'static str {
        match self {
            CellError::Cycle => "#CYCLE!",
            CellError::Name => "#NAME?",
            CellError::Ref => "#REF!",
            CellError::Error => "#ERROR",
        }
    }

    /// Parse an error marker
    pub fn from_marker(s: &str) -> Option<Self> {
        match s {
            "#CYCLE!" => Some(CellError::Cycle),
            "#NAME?" => Some(CellError::Name),
            "#REF!" => Some(CellError::Ref),
            "#ERROR" => Some(CellError::Error),
            _ => None,
        }
    }
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
