//! # gridcalc-formula
//!
//! Formula tokenizer, parser and evaluator for gridcalc.
//!
//! This crate provides:
//! - Tokenizing (text → tokens)
//! - Parsing (tokens → postfix instruction stream)
//! - Evaluation (instructions → value) against any [`CellLookup`]
//! - Built-in functions (aggregates, math, logical, text, criteria, time)
//!
//! ## Example
//!
//! ```rust
//! use gridcalc_core::CellAddress;
//! use gridcalc_formula::{evaluate, parse_formula, Scalar};
//!
//! let program = parse_formula("=SUM(A1:A3)*2");
//! let mut lookup = |addr: CellAddress| Scalar::Number(addr.row as f64 + 1.0);
//! let result = evaluate(&program, &mut lookup).unwrap();
//! assert_eq!(result.to_display(), "12");
//! ```

pub mod error;
pub mod evaluator;
pub mod functions;
pub mod parser;
pub mod rpn;
pub mod tokenizer;
pub mod value;

pub use error::{FormulaError, FormulaResult};
pub use evaluator::{evaluate, evaluate_to_display, function_registry, CellLookup};
pub use parser::{parse_formula, parse_formula_with_limits};
pub use rpn::{BinaryOperator, Instruction};
pub use tokenizer::{tokenize, Token};
pub use value::{format_number, parse_number, FormulaValue, Scalar};
