//! Math functions

use super::statistical::collect_numbers;
use crate::error::FormulaResult;
use crate::value::FormulaValue;

/// Numeric argument at `index`, or `default` when omitted
fn number_arg(args: &[FormulaValue], index: usize, default: f64) -> f64 {
    args.get(index).map_or(default, FormulaValue::to_number)
}

fn unary(args: &[FormulaValue], f: fn(f64) -> f64) -> FormulaResult<FormulaValue> {
    Ok(FormulaValue::number(f(number_arg(args, 0, 0.0))))
}

/// SUM function
pub fn fn_sum(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    Ok(FormulaValue::number(collect_numbers(args).iter().sum()))
}

/// PRODUCT function (0 when there is nothing to multiply)
pub fn fn_product(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let numbers = collect_numbers(args);
    if numbers.is_empty() {
        return Ok(FormulaValue::number(0.0));
    }
    Ok(FormulaValue::number(numbers.iter().product()))
}

/// SQRT(number)
pub fn fn_sqrt(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    unary(args, f64::sqrt)
}

/// ABS(number)
pub fn fn_abs(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    unary(args, f64::abs)
}

/// POWER(base, exponent)
pub fn fn_power(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let base = number_arg(args, 0, 0.0);
    let exponent = number_arg(args, 1, 1.0);
    Ok(FormulaValue::number(base.powf(exponent)))
}

/// ROUND(number, [num_digits]) - Rounds a number to a specified number of digits
///
/// Rounds half away from zero. Negative digits round to the left of the decimal
/// point: `ROUND(1250, -2)` is 1300.
pub fn fn_round(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let number = number_arg(args, 0, 0.0);
    let digits = number_arg(args, 1, 0.0).trunc() as i32;

    // f64::round is half away from zero
    let result = if digits >= 0 {
        let multiplier = 10_f64.powi(digits);
        (number * multiplier).round() / multiplier
    } else {
        let divisor = 10_f64.powi(-digits);
        (number / divisor).round() * divisor
    };

    Ok(FormulaValue::number(result))
}

/// FLOOR(number, [significance]) - Rounds down to a multiple of significance
pub fn fn_floor(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    round_to_multiple(args, f64::floor)
}

/// CEILING(number, [significance]) - Rounds up to a multiple of significance
pub fn fn_ceiling(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    round_to_multiple(args, f64::ceil)
}

fn round_to_multiple(args: &[FormulaValue], f: fn(f64) -> f64) -> FormulaResult<FormulaValue> {
    let number = number_arg(args, 0, 0.0);
    let significance = number_arg(args, 1, 1.0);
    if significance == 0.0 {
        return Ok(FormulaValue::number(0.0));
    }
    Ok(FormulaValue::number(f(number / significance) * significance))
}

/// LOG(number, [base]) - Logarithm, base 10 by default
pub fn fn_log(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let number = number_arg(args, 0, 0.0);
    let base = number_arg(args, 1, 10.0);
    let result = if base == 10.0 {
        number.log10()
    } else {
        number.ln() / base.ln()
    };
    Ok(FormulaValue::number(result))
}

/// LOG10(number)
pub fn fn_log10(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    unary(args, f64::log10)
}

/// LN(number)
pub fn fn_ln(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    unary(args, f64::ln)
}

/// EXP(number)
pub fn fn_exp(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    unary(args, f64::exp)
}

pub fn fn_sin(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    unary(args, f64::sin)
}

pub fn fn_cos(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    unary(args, f64::cos)
}

pub fn fn_tan(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    unary(args, f64::tan)
}

pub fn fn_asin(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    unary(args, f64::asin)
}

pub fn fn_acos(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    unary(args, f64::acos)
}

pub fn fn_atan(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    unary(args, f64::atan)
}

/// PI()
pub fn fn_pi(_args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    Ok(FormulaValue::number(std::f64::consts::PI))
}

/// RAND() - Returns a random number between 0 and 1
/// This is a volatile function that returns a different value on each calculation.
pub fn fn_rand(_args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    Ok(FormulaValue::number(rng.gen::<f64>()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Scalar;

    fn call(f: fn(&[FormulaValue]) -> FormulaResult<FormulaValue>, args: &[f64]) -> f64 {
        let args: Vec<FormulaValue> = args.iter().map(|n| FormulaValue::number(*n)).collect();
        f(&args).unwrap().to_number()
    }

    #[test]
    fn test_sum_and_product() {
        let range = FormulaValue::Array(vec![
            Scalar::Number(2.0),
            Scalar::Text("skip".into()),
            Scalar::Number(3.0),
        ]);
        assert_eq!(fn_sum(&[range.clone(), FormulaValue::number(1.0)]).unwrap().to_number(), 6.0);
        assert_eq!(fn_product(&[range]).unwrap().to_number(), 6.0);
        assert_eq!(
            fn_product(&[FormulaValue::Array(vec![Scalar::Empty])]).unwrap().to_number(),
            0.0
        );
    }

    #[test]
    fn test_round() {
        assert_eq!(call(fn_round, &[2.5]), 3.0);
        assert_eq!(call(fn_round, &[-2.5]), -3.0);
        assert_eq!(call(fn_round, &[3.14159, 2.0]), 3.14);
        assert_eq!(call(fn_round, &[1250.0, -2.0]), 1300.0);
        assert_eq!(call(fn_round, &[-1250.0, -2.0]), -1300.0);
    }

    #[test]
    fn test_floor_ceiling() {
        assert_eq!(call(fn_floor, &[2.7]), 2.0);
        assert_eq!(call(fn_ceiling, &[2.1]), 3.0);
        assert_eq!(call(fn_floor, &[17.0, 5.0]), 15.0);
        assert_eq!(call(fn_ceiling, &[17.0, 5.0]), 20.0);
        assert_eq!(call(fn_floor, &[17.0, 0.0]), 0.0);
        assert_eq!(call(fn_ceiling, &[17.0, 0.0]), 0.0);
    }

    #[test]
    fn test_log() {
        assert_eq!(call(fn_log, &[1000.0]), 3.0);
        assert_eq!(call(fn_log, &[8.0, 2.0]), 3.0);
        assert_eq!(call(fn_log10, &[100.0]), 2.0);
        assert_eq!(call(fn_ln, &[1.0]), 0.0);
    }

    #[test]
    fn test_power_and_roots() {
        assert_eq!(call(fn_power, &[2.0, 10.0]), 1024.0);
        assert_eq!(call(fn_sqrt, &[16.0]), 4.0);
        assert!(matches!(
            fn_sqrt(&[FormulaValue::number(-1.0)]).unwrap(),
            FormulaValue::Scalar(Scalar::Number(n)) if n.is_nan()
        ));
        assert_eq!(call(fn_abs, &[-3.5]), 3.5);
    }

    #[test]
    fn test_rand_range() {
        for _ in 0..100 {
            let n = call(fn_rand, &[]);
            assert!((0.0..1.0).contains(&n));
        }
    }
}
