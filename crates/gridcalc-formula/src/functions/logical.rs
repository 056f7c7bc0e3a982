//! Logical functions

use crate::error::FormulaResult;
use crate::value::FormulaValue;

/// IF(condition, value_if_true, [value_if_false])
///
/// A missing third argument yields FALSE.
pub fn fn_if(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let condition = args.first().map_or(false, FormulaValue::is_truthy);

    let chosen = if condition { args.get(1) } else { args.get(2) };
    Ok(chosen.cloned().unwrap_or(FormulaValue::boolean(false)))
}

/// AND(logical1, ...) - TRUE when every value is truthy
pub fn fn_and(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let result = args
        .iter()
        .flat_map(FormulaValue::flatten)
        .all(|value| value.is_truthy());
    Ok(FormulaValue::boolean(result))
}

/// OR(logical1, ...) - TRUE when any value is truthy
pub fn fn_or(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let result = args
        .iter()
        .flat_map(FormulaValue::flatten)
        .any(|value| value.is_truthy());
    Ok(FormulaValue::boolean(result))
}

/// NOT(logical)
pub fn fn_not(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let value = args.first().map_or(false, FormulaValue::is_truthy);
    Ok(FormulaValue::boolean(!value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Scalar;

    #[test]
    fn test_if() {
        let yes = FormulaValue::text("yes");
        let no = FormulaValue::text("no");
        assert_eq!(
            fn_if(&[FormulaValue::number(1.0), yes.clone(), no.clone()]).unwrap(),
            yes
        );
        assert_eq!(fn_if(&[FormulaValue::number(0.0), yes.clone(), no.clone()]).unwrap(), no);
        assert_eq!(
            fn_if(&[FormulaValue::text("FALSE"), yes]).unwrap(),
            FormulaValue::boolean(false)
        );
    }

    #[test]
    fn test_and_or_over_ranges() {
        let mixed = FormulaValue::Array(vec![Scalar::Number(1.0), Scalar::Number(0.0)]);
        let all = FormulaValue::Array(vec![Scalar::Boolean(true), Scalar::Text("x".into())]);

        assert_eq!(fn_and(&[mixed.clone()]).unwrap(), FormulaValue::boolean(false));
        assert_eq!(fn_or(&[mixed]).unwrap(), FormulaValue::boolean(true));
        assert_eq!(fn_and(&[all]).unwrap(), FormulaValue::boolean(true));
    }

    #[test]
    fn test_not() {
        assert_eq!(
            fn_not(&[FormulaValue::Scalar(Scalar::Empty)]).unwrap(),
            FormulaValue::boolean(true)
        );
        assert_eq!(fn_not(&[FormulaValue::number(3.0)]).unwrap(), FormulaValue::boolean(false));
    }
}
