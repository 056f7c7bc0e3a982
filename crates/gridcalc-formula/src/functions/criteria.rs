//! Criteria matching for COUNTIF and SUMIF
//!
//! Criteria can be:
//! - A comparison expression: ">5", ">=10", "<100", "<=50", "<>0", "=5"
//! - Anything else: exact match against the cell's display string

use crate::error::FormulaResult;
use crate::value::{parse_number, FormulaValue, Scalar};

/// Criteria matcher for COUNTIF/SUMIF
#[derive(Debug)]
pub struct CriteriaMatcher {
    criteria_type: CriteriaType,
}

#[derive(Debug)]
enum CriteriaType {
    /// Comparison with number (operator, value)
    Comparison(ComparisonOp, f64),
    /// Exact display-string match
    Exact(String),
}

#[derive(Debug, Clone, Copy)]
enum ComparisonOp {
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
}

impl CriteriaMatcher {
    /// Create a new criteria matcher from a criteria value
    pub fn new(criteria: &Scalar) -> Self {
        let text = criteria.to_display();
        let criteria_type = Self::try_parse_comparison(&text).unwrap_or(CriteriaType::Exact(text));
        Self { criteria_type }
    }

    fn try_parse_comparison(s: &str) -> Option<CriteriaType> {
        // Longer operators first
        let (op, rest) = if let Some(rest) = s.strip_prefix(">=") {
            (ComparisonOp::GreaterEqual, rest)
        } else if let Some(rest) = s.strip_prefix("<=") {
            (ComparisonOp::LessEqual, rest)
        } else if let Some(rest) = s.strip_prefix("<>") {
            (ComparisonOp::NotEqual, rest)
        } else if let Some(rest) = s.strip_prefix('>') {
            (ComparisonOp::GreaterThan, rest)
        } else if let Some(rest) = s.strip_prefix('<') {
            (ComparisonOp::LessThan, rest)
        } else if let Some(rest) = s.strip_prefix('=') {
            (ComparisonOp::Equal, rest)
        } else {
            return None;
        };

        let n = parse_number(rest)?;
        Some(CriteriaType::Comparison(op, n))
    }

    /// Check if a value matches the criteria
    pub fn matches(&self, value: &Scalar) -> bool {
        match &self.criteria_type {
            CriteriaType::Comparison(op, criteria_num) => {
                // Comparisons only apply to numeric cells
                let Some(n) = value.as_number() else {
                    return false;
                };
                match op {
                    ComparisonOp::Equal => n == *criteria_num,
                    ComparisonOp::NotEqual => n != *criteria_num,
                    ComparisonOp::LessThan => n < *criteria_num,
                    ComparisonOp::LessEqual => n <= *criteria_num,
                    ComparisonOp::GreaterThan => n > *criteria_num,
                    ComparisonOp::GreaterEqual => n >= *criteria_num,
                }
            }
            CriteriaType::Exact(expected) => value.to_display() == *expected,
        }
    }
}

/// COUNTIF(range, criteria)
pub fn fn_countif(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let [range, criteria, ..] = args else {
        return Ok(FormulaValue::number(0.0));
    };

    let matcher = CriteriaMatcher::new(&criteria.first());
    let count = range.flatten().filter(|value| matcher.matches(value)).count();
    Ok(FormulaValue::number(count as f64))
}

/// SUMIF(range, criteria, [sum_range])
///
/// Cells are paired with the sum range by row-major position; without a sum range
/// the matched cells themselves are summed.
pub fn fn_sumif(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let [range, criteria, rest @ ..] = args else {
        return Ok(FormulaValue::number(0.0));
    };

    let matcher = CriteriaMatcher::new(&criteria.first());
    let sum_range = rest.first().unwrap_or(range);

    let sum = range
        .flatten()
        .zip(sum_range.flatten())
        .filter(|(value, _)| matcher.matches(value))
        .filter_map(|(_, addend)| addend.as_number())
        .sum();

    Ok(FormulaValue::number(sum))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(values: &[f64]) -> FormulaValue {
        FormulaValue::Array(values.iter().map(|n| Scalar::Number(*n)).collect())
    }

    #[test]
    fn test_comparison_criteria() {
        let gt = CriteriaMatcher::new(&Scalar::Text(">5".into()));
        assert!(gt.matches(&Scalar::Number(6.0)));
        assert!(!gt.matches(&Scalar::Number(5.0)));
        assert!(!gt.matches(&Scalar::Text("9".into())));

        let ne = CriteriaMatcher::new(&Scalar::Text("<>0".into()));
        assert!(ne.matches(&Scalar::Number(1.0)));
        assert!(!ne.matches(&Scalar::Number(0.0)));

        let le = CriteriaMatcher::new(&Scalar::Text("<= 2.5".into()));
        assert!(le.matches(&Scalar::Number(2.5)));
        assert!(!le.matches(&Scalar::Empty));
    }

    #[test]
    fn test_exact_criteria() {
        let apple = CriteriaMatcher::new(&Scalar::Text("apple".into()));
        assert!(apple.matches(&Scalar::Text("apple".into())));
        assert!(!apple.matches(&Scalar::Text("Apple".into())));

        let two = CriteriaMatcher::new(&Scalar::Number(2.0));
        assert!(two.matches(&Scalar::Number(2.0)));
        assert!(!two.matches(&Scalar::Number(2.5)));

        // Operator without a number is a plain string
        let odd = CriteriaMatcher::new(&Scalar::Text(">abc".into()));
        assert!(odd.matches(&Scalar::Text(">abc".into())));

        let inf = CriteriaMatcher::new(&Scalar::Text(">inf".into()));
        assert!(!inf.matches(&Scalar::Number(1e300)));
        assert!(inf.matches(&Scalar::Text(">inf".into())));
    }

    #[test]
    fn test_countif() {
        let args = [numbers(&[1.0, 5.0, 7.0, 9.0]), FormulaValue::text(">=5")];
        assert_eq!(fn_countif(&args).unwrap(), FormulaValue::number(3.0));
    }

    #[test]
    fn test_sumif() {
        let args = [numbers(&[1.0, 5.0, 7.0]), FormulaValue::text(">2")];
        assert_eq!(fn_sumif(&args).unwrap(), FormulaValue::number(12.0));

        let labels = FormulaValue::Array(vec![
            Scalar::Text("a".into()),
            Scalar::Text("b".into()),
            Scalar::Text("a".into()),
        ]);
        let args = [labels, FormulaValue::text("a"), numbers(&[10.0, 20.0, 30.0])];
        assert_eq!(fn_sumif(&args).unwrap(), FormulaValue::number(40.0));
    }
}
