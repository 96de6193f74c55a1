use std::fmt;

use chrono::NaiveDate;

use crate::convert::culture::Culture;

/// Best-effort typed view of a raw field.
#[derive(Debug, Clone, PartialEq)]
pub enum InferredValue {
    Boolean(bool),
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Date(NaiveDate),
    Text(String),
}

impl InferredValue {
    /// Infers the narrowest type that accepts `field`, trying boolean, 32-bit
    /// integer, 64-bit integer, single and double precision float, short
    /// date and long date in that order. Anything else is text.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use delimited_rs::convert::culture::Culture;
    /// use delimited_rs::row::value::InferredValue;
    ///
    /// let culture = Culture::en_gb();
    ///
    /// assert_eq!(InferredValue::infer("TRUE", &culture), InferredValue::Boolean(true));
    /// assert_eq!(InferredValue::infer("11", &culture), InferredValue::Integer(11));
    /// assert_eq!(InferredValue::infer("37.5", &culture), InferredValue::Float(37.5));
    /// assert_eq!(
    ///     InferredValue::infer("20/11/2003", &culture),
    ///     InferredValue::Date(NaiveDate::from_ymd_opt(2003, 11, 20).unwrap())
    /// );
    /// assert_eq!(
    ///     InferredValue::infer("Road Runner", &culture),
    ///     InferredValue::Text("Road Runner".to_string())
    /// );
    /// ```
    pub fn infer(field: &str, culture: &Culture) -> Self {
        let trimmed = field.trim();

        if trimmed.eq_ignore_ascii_case("true") {
            return InferredValue::Boolean(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return InferredValue::Boolean(false);
        }
        if let Ok(value) = trimmed.parse::<i32>() {
            return InferredValue::Integer(value);
        }
        if let Ok(value) = trimmed.parse::<i64>() {
            return InferredValue::Long(value);
        }

        if looks_numeric(trimmed) {
            let normalized = culture.normalize_number(trimmed);
            if let Some(value) = normalized.parse::<f32>().ok().filter(|v| v.is_finite()) {
                return InferredValue::Float(value);
            }
            if let Some(value) = normalized.parse::<f64>().ok().filter(|v| v.is_finite()) {
                return InferredValue::Double(value);
            }
        }

        if let Some(date) = culture
            .parse_short_date(trimmed)
            .or_else(|| culture.parse_long_date(trimmed))
        {
            return InferredValue::Date(date);
        }

        InferredValue::Text(field.to_string())
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            InferredValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            InferredValue::Integer(value) => Some(i64::from(*value)),
            InferredValue::Long(value) => Some(*value),
            _ => None,
        }
    }

    /// Any numeric variant widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            InferredValue::Integer(value) => Some(f64::from(*value)),
            InferredValue::Long(value) => Some(*value as f64),
            InferredValue::Float(value) => Some(f64::from(*value)),
            InferredValue::Double(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            InferredValue::Date(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            InferredValue::Text(value) => Some(value),
            _ => None,
        }
    }
}

/// Digits with at most sign, exponent, separator characters. Keeps words
/// such as `inf` or `NaN` out of the float parsers.
fn looks_numeric(field: &str) -> bool {
    field.chars().any(|c| c.is_ascii_digit())
        && field
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | 'e' | 'E' | '.' | ',' | ' '))
}

impl fmt::Display for InferredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferredValue::Boolean(value) => write!(f, "{}", value),
            InferredValue::Integer(value) => write!(f, "{}", value),
            InferredValue::Long(value) => write!(f, "{}", value),
            InferredValue::Float(value) => write!(f, "{}", value),
            InferredValue::Double(value) => write!(f, "{}", value),
            InferredValue::Date(value) => write!(f, "{}", value),
            InferredValue::Text(value) => write!(f, "{}", value),
        }
    }
}
