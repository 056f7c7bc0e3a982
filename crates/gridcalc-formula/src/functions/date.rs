//! Date and time functions
//!
//! Both functions read the local clock and return text, so they are volatile.

use crate::error::FormulaResult;
use crate::value::FormulaValue;
use chrono::Local;

/// NOW() - Current local date and time as `YYYY-MM-DD HH:MM:SS`
pub fn fn_now(_args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let now = Local::now();
    Ok(FormulaValue::text(now.format("%Y-%m-%d %H:%M:%S").to_string()))
}

/// TODAY() - Current local date as `YYYY-MM-DD`
pub fn fn_today(_args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let today = Local::now();
    Ok(FormulaValue::text(today.format("%Y-%m-%d").to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn text(value: FormulaValue) -> String {
        value.first().to_display()
    }

    #[test]
    fn test_now_format() {
        let now = text(fn_now(&[]).unwrap());
        assert_eq!(now.len(), 19);
        assert!(NaiveDateTime::parse_from_str(&now, "%Y-%m-%d %H:%M:%S").is_ok());
    }

    #[test]
    fn test_today_format() {
        let today = text(fn_today(&[]).unwrap());
        assert_eq!(today.len(), 10);
        assert!(NaiveDate::parse_from_str(&today, "%Y-%m-%d").is_ok());
    }
}
