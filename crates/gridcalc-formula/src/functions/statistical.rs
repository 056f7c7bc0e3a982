//! Statistical and aggregate functions
//!
//! All aggregates work on the numbers found in their arguments: numbers and booleans
//! count, text and empty cells are skipped. An aggregate over no numbers is 0.

use crate::error::FormulaResult;
use crate::value::{FormulaValue, Scalar};

/// Flatten all arguments into the numbers they contain
pub fn collect_numbers(args: &[FormulaValue]) -> Vec<f64> {
    args.iter()
        .flat_map(FormulaValue::flatten)
        .filter_map(Scalar::as_number)
        .collect()
}

/// AVERAGE function
pub fn fn_average(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let numbers = collect_numbers(args);
    Ok(FormulaValue::number(mean(&numbers).unwrap_or(0.0)))
}

/// MIN function
pub fn fn_min(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let min = collect_numbers(args).into_iter().reduce(f64::min);
    Ok(FormulaValue::number(min.unwrap_or(0.0)))
}

/// MAX function
pub fn fn_max(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let max = collect_numbers(args).into_iter().reduce(f64::max);
    Ok(FormulaValue::number(max.unwrap_or(0.0)))
}

/// COUNT function - counts numeric values
pub fn fn_count(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    Ok(FormulaValue::number(collect_numbers(args).len() as f64))
}

/// COUNTA function - counts non-empty values
pub fn fn_counta(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let count = args
        .iter()
        .flat_map(FormulaValue::flatten)
        .filter(|value| !value.is_empty())
        .count();
    Ok(FormulaValue::number(count as f64))
}

/// MEDIAN function
pub fn fn_median(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let mut numbers = collect_numbers(args);
    if numbers.is_empty() {
        return Ok(FormulaValue::number(0.0));
    }

    numbers.sort_by(f64::total_cmp);
    let mid = numbers.len() / 2;
    let median = if numbers.len() % 2 == 0 {
        (numbers[mid - 1] + numbers[mid]) / 2.0
    } else {
        numbers[mid]
    };

    Ok(FormulaValue::number(median))
}

/// STDEV function - sample standard deviation
pub fn fn_stdev(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let variance = sample_variance(&collect_numbers(args));
    Ok(FormulaValue::number(variance.map_or(0.0, f64::sqrt)))
}

/// VAR function - sample variance
pub fn fn_var(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let variance = sample_variance(&collect_numbers(args));
    Ok(FormulaValue::number(variance.unwrap_or(0.0)))
}

fn mean(numbers: &[f64]) -> Option<f64> {
    if numbers.is_empty() {
        None
    } else {
        Some(numbers.iter().sum::<f64>() / numbers.len() as f64)
    }
}

/// Variance with n - 1 in the denominator, None below two values
fn sample_variance(numbers: &[f64]) -> Option<f64> {
    if numbers.len() < 2 {
        return None;
    }
    let mean = mean(numbers)?;
    let squares: f64 = numbers.iter().map(|n| (n - mean).powi(2)).sum();
    Some(squares / (numbers.len() - 1) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(values: &[f64]) -> FormulaValue {
        FormulaValue::Array(values.iter().map(|n| Scalar::Number(*n)).collect())
    }

    fn number(result: FormulaResult<FormulaValue>) -> f64 {
        result.unwrap().to_number()
    }

    #[test]
    fn test_collect_numbers_skips_text_and_empty() {
        let args = vec![
            FormulaValue::Array(vec![
                Scalar::Number(1.0),
                Scalar::Text("x".into()),
                Scalar::Empty,
                Scalar::Boolean(true),
            ]),
            FormulaValue::number(5.0),
        ];
        assert_eq!(collect_numbers(&args), vec![1.0, 1.0, 5.0]);
    }

    #[test]
    fn test_average_min_max() {
        let args = [range(&[1.0, 2.0, 3.0])];
        assert_eq!(number(fn_average(&args)), 2.0);
        assert_eq!(number(fn_min(&args)), 1.0);
        assert_eq!(number(fn_max(&args)), 3.0);
    }

    #[test]
    fn test_empty_aggregates_are_zero() {
        let args = [FormulaValue::Array(vec![Scalar::Empty, Scalar::Text("a".into())])];
        assert_eq!(number(fn_average(&args)), 0.0);
        assert_eq!(number(fn_min(&args)), 0.0);
        assert_eq!(number(fn_max(&args)), 0.0);
        assert_eq!(number(fn_median(&args)), 0.0);
        assert_eq!(number(fn_count(&args)), 0.0);
        assert_eq!(number(fn_counta(&args)), 1.0);
    }

    #[test]
    fn test_median() {
        assert_eq!(number(fn_median(&[range(&[3.0, 1.0, 2.0])])), 2.0);
        assert_eq!(number(fn_median(&[range(&[4.0, 1.0, 3.0, 2.0])])), 2.5);
    }

    #[test]
    fn test_sample_statistics() {
        let args = [range(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0])];
        let var = number(fn_var(&args));
        assert!((var - 32.0 / 7.0).abs() < 1e-12);
        let stdev = number(fn_stdev(&args));
        assert!((stdev - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);

        assert_eq!(number(fn_var(&[FormulaValue::number(3.0)])), 0.0);
        assert_eq!(number(fn_stdev(&[FormulaValue::number(3.0)])), 0.0);
    }
}
