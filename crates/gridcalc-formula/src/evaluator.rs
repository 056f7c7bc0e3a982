//! Formula evaluator
//!
//! Executes postfix instruction streams on a single operand stack.

use crate::error::{FormulaError, FormulaResult};
use crate::functions::FunctionRegistry;
use crate::rpn::{BinaryOperator, Instruction};
use crate::value::{FormulaValue, Scalar};
use gridcalc_core::CellAddress;
use std::cmp::Ordering;
use std::sync::OnceLock;

/// Global function registry (lazily initialized)
static FUNCTION_REGISTRY: OnceLock<FunctionRegistry> = OnceLock::new();

/// The built-in function registry
pub fn function_registry() -> &'static FunctionRegistry {
    FUNCTION_REGISTRY.get_or_init(FunctionRegistry::new)
}

/// Source of cell values for references
///
/// The recompute engine implements this by recursively evaluating the referenced
/// cell; tests usually pass a closure.
pub trait CellLookup {
    fn cell_value(&mut self, addr: CellAddress) -> Scalar;
}

impl<F> CellLookup for F
where
    F: FnMut(CellAddress) -> Scalar,
{
    fn cell_value(&mut self, addr: CellAddress) -> Scalar {
        self(addr)
    }
}

/// Evaluate a compiled formula
///
/// If the stream contains an error instruction the first one is returned without
/// touching any cell.
pub fn evaluate<L>(program: &[Instruction], lookup: &mut L) -> FormulaResult<FormulaValue>
where
    L: CellLookup + ?Sized,
{
    if let Some(err) = program.iter().find_map(|instr| match instr {
        Instruction::Error(err) => Some(*err),
        _ => None,
    }) {
        return Err(FormulaError::Cell(err));
    }

    if program.is_empty() {
        return Err(FormulaError::Evaluation("empty formula".into()));
    }

    let mut stack: Vec<FormulaValue> = Vec::new();

    for instr in program {
        let value = match instr {
            Instruction::Number(n) => FormulaValue::number(*n),
            Instruction::Text(s) => FormulaValue::text(s.as_str()),
            Instruction::Ref(addr) => FormulaValue::Scalar(lookup.cell_value(*addr)),
            Instruction::Range(range) => {
                FormulaValue::Array(range.cells().map(|addr| lookup.cell_value(addr)).collect())
            }
            Instruction::Negate => {
                let operand = pop(&mut stack)?;
                FormulaValue::number(-operand.to_number())
            }
            Instruction::Binary(op) => {
                let right = pop(&mut stack)?;
                let left = pop(&mut stack)?;
                evaluate_binary_op(*op, &left, &right)
            }
            Instruction::Call { name, argc } => {
                if stack.len() < *argc {
                    return Err(stack_underflow());
                }
                let args = stack.split_off(stack.len() - argc);
                evaluate_function(name, &args)?
            }
            Instruction::Error(err) => return Err(FormulaError::Cell(*err)),
        };
        stack.push(value);
    }

    match (stack.pop(), stack.is_empty()) {
        (Some(result), true) => Ok(result),
        _ => Err(FormulaError::Evaluation(
            "formula leaves more than one value".into(),
        )),
    }
}

/// Evaluate a compiled formula and render the text its cell shows
///
/// Failures become their error marker.
pub fn evaluate_to_display<L>(program: &[Instruction], lookup: &mut L) -> String
where
    L: CellLookup + ?Sized,
{
    match evaluate(program, lookup) {
        Ok(value) => value.to_display(),
        Err(err) => err.to_cell_error().to_string(),
    }
}

fn pop(stack: &mut Vec<FormulaValue>) -> FormulaResult<FormulaValue> {
    stack.pop().ok_or_else(stack_underflow)
}

fn stack_underflow() -> FormulaError {
    FormulaError::Evaluation("missing operand".into())
}

/// Evaluate a binary operation
fn evaluate_binary_op(op: BinaryOperator, left: &FormulaValue, right: &FormulaValue) -> FormulaValue {
    if op.is_comparison() {
        let ord = compare_values(&left.first(), &right.first());
        let result = match op {
            BinaryOperator::Equal => ord == Ordering::Equal,
            BinaryOperator::NotEqual => ord != Ordering::Equal,
            BinaryOperator::LessThan => ord == Ordering::Less,
            BinaryOperator::LessEqual => ord != Ordering::Greater,
            BinaryOperator::GreaterThan => ord == Ordering::Greater,
            _ => ord != Ordering::Less,
        };
        return FormulaValue::boolean(result);
    }

    let l = left.to_number();
    let r = right.to_number();

    let result = match op {
        BinaryOperator::Add => l + r,
        BinaryOperator::Subtract => l - r,
        BinaryOperator::Multiply => l * r,
        BinaryOperator::Divide => {
            if r == 0.0 {
                0.0
            } else {
                l / r
            }
        }
        _ => l.powf(r),
    };

    FormulaValue::number(result)
}

/// Compare two values: numerically when both are numeric, otherwise as
/// case-insensitive text
fn compare_values(left: &Scalar, right: &Scalar) -> Ordering {
    let numeric = |s: &Scalar| match s {
        Scalar::Empty => Some(0.0),
        other => other.as_number(),
    };

    match (numeric(left), numeric(right)) {
        (Some(l), Some(r)) => l.partial_cmp(&r).unwrap_or(Ordering::Equal),
        _ => {
            let l = left.to_display().to_lowercase();
            let r = right.to_display().to_lowercase();
            l.cmp(&r)
        }
    }
}

/// Evaluate a function call
fn evaluate_function(name: &str, args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let registry = function_registry();

    let func = registry
        .get(name)
        .ok_or_else(|| FormulaError::UnknownFunction(name.to_string()))?;

    // Check argument count
    if args.len() < func.min_args {
        return Err(FormulaError::ArgumentCount {
            function: func.name.to_string(),
            expected: format!("at least {}", func.min_args),
            actual: args.len(),
        });
    }

    if let Some(max) = func.max_args {
        if args.len() > max {
            return Err(FormulaError::ArgumentCount {
                function: func.name.to_string(),
                expected: format!("at most {}", max),
                actual: args.len(),
            });
        }
    }

    (func.implementation)(args)
}
