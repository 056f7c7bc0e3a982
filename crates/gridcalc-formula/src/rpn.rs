//! Postfix instruction stream produced by the parser

use gridcalc_core::{CellAddress, CellError, CellRange};
use std::fmt;

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,

    // Comparison
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
}

impl BinaryOperator {
    /// Binding strength, higher binds tighter
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Equal
            | BinaryOperator::NotEqual
            | BinaryOperator::LessThan
            | BinaryOperator::LessEqual
            | BinaryOperator::GreaterThan
            | BinaryOperator::GreaterEqual => 1,
            BinaryOperator::Add | BinaryOperator::Subtract => 2,
            BinaryOperator::Multiply | BinaryOperator::Divide => 3,
            BinaryOperator::Power => 4,
        }
    }

    /// Only exponentiation groups right to left
    pub fn is_right_associative(self) -> bool {
        self == BinaryOperator::Power
    }

    pub fn is_comparison(self) -> bool {
        self.precedence() == 1
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Power => "^",
            BinaryOperator::Equal => "=",
            BinaryOperator::NotEqual => "<>",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::GreaterEqual => ">=",
        }
    }
}

/// Precedence of prefix negation (binds tighter than `^`)
pub const NEGATE_PRECEDENCE: u8 = 5;

/// A single step of a compiled formula
///
/// Operands come before their operators; parentheses and commas never appear.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// Push a number
    Number(f64),
    /// Push a string literal
    Text(String),
    /// Push the value of a single cell
    Ref(CellAddress),
    /// Push every cell of a rectangle, row-major, as one array
    Range(CellRange),
    /// Pop two operands, push the result
    Binary(BinaryOperator),
    /// Pop one operand, push its negation
    Negate,
    /// Pop `argc` operands and call a function with them
    Call { name: String, argc: usize },
    /// The formula is malformed; evaluation yields this marker
    Error(CellError),
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Number(n) => write!(f, "{}", n),
            Instruction::Text(s) => write!(f, "\"{}\"", s.replace('"', "\"\"")),
            Instruction::Ref(addr) => write!(f, "{}", addr),
            Instruction::Range(range) => write!(f, "{}", range),
            Instruction::Binary(op) => f.write_str(op.symbol()),
            Instruction::Negate => f.write_str("NEG"),
            Instruction::Call { name, argc } => write!(f, "{}/{}", name, argc),
            Instruction::Error(err) => write!(f, "{}", err),
        }
    }
}

/// Render an instruction stream as space-separated postfix text
pub fn to_postfix_string(program: &[Instruction]) -> String {
    program
        .iter()
        .map(|instr| instr.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_order() {
        assert!(BinaryOperator::Equal.precedence() < BinaryOperator::Add.precedence());
        assert!(BinaryOperator::Add.precedence() < BinaryOperator::Multiply.precedence());
        assert!(BinaryOperator::Multiply.precedence() < BinaryOperator::Power.precedence());
        assert!(BinaryOperator::Power.precedence() < NEGATE_PRECEDENCE);
        assert!(BinaryOperator::Power.is_right_associative());
        assert!(!BinaryOperator::Subtract.is_right_associative());
    }

    #[test]
    fn test_postfix_display() {
        let program = vec![
            Instruction::Number(1.0),
            Instruction::Ref(CellAddress::new(0, 1)),
            Instruction::Binary(BinaryOperator::Add),
            Instruction::Range(CellRange::from_indices(0, 0, 2, 0)),
            Instruction::Call {
                name: "SUM".into(),
                argc: 2,
            },
        ];
        assert_eq!(to_postfix_string(&program), "1 B1 + A1:A3 SUM/2");
    }
}
