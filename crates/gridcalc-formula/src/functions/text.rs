//! Text functions

use crate::error::FormulaResult;
use crate::value::FormulaValue;

/// CONCAT(text1, ...) - joins the display strings of all values, ranges included
pub fn fn_concat(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let result: String = args
        .iter()
        .flat_map(FormulaValue::flatten)
        .map(|value| value.to_display())
        .collect();
    Ok(FormulaValue::text(result))
}

/// TEXT(value, format)
///
/// The format argument is accepted but not applied; the value is returned as its
/// display string.
pub fn fn_text(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let value = args.first().map(|v| v.first().to_display()).unwrap_or_default();
    Ok(FormulaValue::text(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Scalar;

    #[test]
    fn test_concat() {
        let args = [
            FormulaValue::text("a"),
            FormulaValue::number(1.5),
            FormulaValue::Array(vec![Scalar::Boolean(true), Scalar::Empty, Scalar::Number(2.0)]),
        ];
        assert_eq!(fn_concat(&args).unwrap(), FormulaValue::text("a1.5TRUE2"));
    }

    #[test]
    fn test_text_ignores_format() {
        let args = [FormulaValue::number(0.25), FormulaValue::text("0.00%")];
        assert_eq!(fn_text(&args).unwrap(), FormulaValue::text("0.25"));
    }
}
