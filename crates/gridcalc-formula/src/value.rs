//! Runtime values on the evaluator stack

use gridcalc_core::CellError;

/// A single cell-sized value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Number(f64),
    Text(String),
    Boolean(bool),
    Empty,
}

impl Scalar {
    /// Convert a displayed cell string back into a value
    ///
    /// Error markers and overflowing numbers read as 0 so that formulas over
    /// broken cells keep evaluating.
    pub fn from_display(s: &str) -> Self {
        if s.is_empty() {
            return Scalar::Empty;
        }
        if CellError::from_marker(s).is_some() {
            return Scalar::Number(0.0);
        }
        if let Some(n) = parse_number(s) {
            return Scalar::Number(if n.is_finite() { n } else { 0.0 });
        }
        match s {
            "TRUE" => Scalar::Boolean(true),
            "FALSE" => Scalar::Boolean(false),
            _ => Scalar::Text(s.to_string()),
        }
    }

    /// Numeric view used by aggregates: numbers and booleans only
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => Some(*n),
            Scalar::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Total numeric coercion used by arithmetic
    pub fn to_number(&self) -> f64 {
        let n = match self {
            Scalar::Text(s) => parse_number(s)
                .filter(|n| n.is_finite())
                .unwrap_or(0.0),
            Scalar::Empty => 0.0,
            other => other.as_number().unwrap_or(0.0),
        };
        if n.is_nan() {
            0.0
        } else {
            n
        }
    }

    /// Truthiness for IF/AND/OR/NOT
    pub fn is_truthy(&self) -> bool {
        match self {
            Scalar::Number(n) => *n != 0.0 && !n.is_nan(),
            Scalar::Boolean(b) => *b,
            Scalar::Text(s) => !s.is_empty() && !s.eq_ignore_ascii_case("FALSE"),
            Scalar::Empty => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Scalar::Empty)
    }

    /// String shown for this value (`""` for empty)
    pub fn to_display(&self) -> String {
        match self {
            Scalar::Number(n) => format_number(*n),
            Scalar::Text(s) => s.clone(),
            Scalar::Boolean(true) => "TRUE".to_string(),
            Scalar::Boolean(false) => "FALSE".to_string(),
            Scalar::Empty => String::new(),
        }
    }
}

/// Parse numeric cell text
///
/// Only text with at least one digit counts, so words such as `inf`, `NaN` or
/// `Infinity` stay text.
pub fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if !s.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<f64>().ok()
}

/// Format a number with the shortest representation that round-trips
///
/// Non-finite values have no display and render as `#ERROR`.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return CellError::Error.to_string();
    }
    if n == 0.0 {
        // Also folds -0
        return "0".to_string();
    }
    n.to_string()
}

/// Value types during formula evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaValue {
    Scalar(Scalar),
    /// Cells of a range, row-major
    Array(Vec<Scalar>),
}

impl FormulaValue {
    pub fn number(n: f64) -> Self {
        FormulaValue::Scalar(Scalar::Number(n))
    }

    pub fn text<S: Into<String>>(s: S) -> Self {
        FormulaValue::Scalar(Scalar::Text(s.into()))
    }

    pub fn boolean(b: bool) -> Self {
        FormulaValue::Scalar(Scalar::Boolean(b))
    }

    /// The value a scalar operator sees (first element of an array)
    pub fn first(&self) -> Scalar {
        match self {
            FormulaValue::Scalar(s) => s.clone(),
            FormulaValue::Array(items) => items.first().cloned().unwrap_or(Scalar::Empty),
        }
    }

    /// All scalars, arrays flattened in order
    pub fn flatten(&self) -> std::slice::Iter<'_, Scalar> {
        match self {
            FormulaValue::Scalar(s) => std::slice::from_ref(s).iter(),
            FormulaValue::Array(items) => items.iter(),
        }
    }

    pub fn to_number(&self) -> f64 {
        self.first().to_number()
    }

    pub fn is_truthy(&self) -> bool {
        self.first().is_truthy()
    }

    /// Stringify a final formula result
    ///
    /// A bare empty result shows as `0`; an array shows its first element.
    pub fn to_display(&self) -> String {
        match self {
            FormulaValue::Scalar(Scalar::Empty) => "0".to_string(),
            FormulaValue::Scalar(s) => s.to_display(),
            FormulaValue::Array(items) => items.first().map(Scalar::to_display).unwrap_or_default(),
        }
    }
}

impl From<Scalar> for FormulaValue {
    fn from(value: Scalar) -> Self {
        FormulaValue::Scalar(value)
    }
}

impl From<f64> for FormulaValue {
    fn from(n: f64) -> Self {
        FormulaValue::number(n)
    }
}

impl From<bool> for FormulaValue {
    fn from(b: bool) -> Self {
        FormulaValue::boolean(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(7.0), "7");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(-12.25), "-12.25");
        assert_eq!(format_number(f64::NAN), "#ERROR");
        assert_eq!(format_number(f64::INFINITY), "#ERROR");
    }

    #[test]
    fn test_from_display() {
        assert_eq!(Scalar::from_display(""), Scalar::Empty);
        assert_eq!(Scalar::from_display("42"), Scalar::Number(42.0));
        assert_eq!(Scalar::from_display(" 1.5 "), Scalar::Number(1.5));
        assert_eq!(Scalar::from_display("#CYCLE!"), Scalar::Number(0.0));
        assert_eq!(Scalar::from_display("#NAME?"), Scalar::Number(0.0));
        assert_eq!(Scalar::from_display("1e400"), Scalar::Number(0.0));
        assert_eq!(Scalar::from_display("TRUE"), Scalar::Boolean(true));
        assert_eq!(Scalar::from_display("apple"), Scalar::Text("apple".into()));
    }

    #[test]
    fn test_to_number() {
        assert_eq!(Scalar::Text("abc".into()).to_number(), 0.0);
        assert_eq!(Scalar::Text("3".into()).to_number(), 3.0);
        assert_eq!(Scalar::Boolean(true).to_number(), 1.0);
        assert_eq!(Scalar::Empty.to_number(), 0.0);
        assert_eq!(Scalar::Number(f64::NAN).to_number(), 0.0);
        assert_eq!(Scalar::Text("inf".into()).to_number(), 0.0);
        assert_eq!(Scalar::Text("-Infinity".into()).to_number(), 0.0);
        assert_eq!(Scalar::Text("1e400".into()).to_number(), 0.0);
    }

    #[test]
    fn test_special_float_words_stay_text() {
        for word in ["Nan", "nan", "inf", "-INF", "Infinity", "+infinity"] {
            assert_eq!(parse_number(word), None, "{word}");
            assert_eq!(Scalar::from_display(word), Scalar::Text(word.to_string()));
        }
        assert_eq!(parse_number(" 2.5e3 "), Some(2500.0));
        assert_eq!(parse_number(".5"), Some(0.5));
    }

    #[test]
    fn test_truthiness() {
        assert!(Scalar::Number(2.0).is_truthy());
        assert!(!Scalar::Number(0.0).is_truthy());
        assert!(Scalar::Text("yes".into()).is_truthy());
        assert!(!Scalar::Text("false".into()).is_truthy());
        assert!(!Scalar::Text(String::new()).is_truthy());
        assert!(!Scalar::Empty.is_truthy());
    }

    #[test]
    fn test_result_display() {
        assert_eq!(FormulaValue::Scalar(Scalar::Empty).to_display(), "0");
        assert_eq!(FormulaValue::boolean(false).to_display(), "FALSE");
        assert_eq!(
            FormulaValue::Array(vec![Scalar::Number(3.0), Scalar::Number(4.0)]).to_display(),
            "3"
        );
        assert_eq!(FormulaValue::Array(vec![]).to_display(), "");
    }
}
