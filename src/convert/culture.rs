use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Formatting conventions used when converting fields to and from dates and
/// numbers.
///
/// Patterns use `chrono` strftime syntax. The default is British English,
/// where `20/11/2003` is the 20th of November.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use delimited_rs::convert::culture::Culture;
///
/// let gb = Culture::en_gb();
/// let us = Culture::en_us();
///
/// assert_eq!(
///     gb.parse_date("20/11/2003"),
///     Some(NaiveDate::from_ymd_opt(2003, 11, 20).unwrap())
/// );
/// assert_eq!(
///     us.parse_date("11/20/2003"),
///     Some(NaiveDate::from_ymd_opt(2003, 11, 20).unwrap())
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Culture {
    pub name: String,
    pub short_date_pattern: String,
    pub long_date_pattern: String,
    pub long_time_pattern: String,
    pub decimal_separator: char,
    pub group_separator: char,
}

impl Default for Culture {
    fn default() -> Self {
        Self::en_gb()
    }
}

impl Culture {
    pub fn en_gb() -> Self {
        Self {
            name: "en-GB".to_string(),
            short_date_pattern: "%d/%m/%Y".to_string(),
            long_date_pattern: "%d %B %Y".to_string(),
            long_time_pattern: "%H:%M:%S".to_string(),
            decimal_separator: '.',
            group_separator: ',',
        }
    }

    pub fn en_us() -> Self {
        Self {
            name: "en-US".to_string(),
            short_date_pattern: "%m/%d/%Y".to_string(),
            long_date_pattern: "%A, %B %d, %Y".to_string(),
            long_time_pattern: "%I:%M:%S %p".to_string(),
            decimal_separator: '.',
            group_separator: ',',
        }
    }

    pub fn invariant() -> Self {
        Self {
            name: String::new(),
            short_date_pattern: "%m/%d/%Y".to_string(),
            long_date_pattern: "%A, %d %B %Y".to_string(),
            long_time_pattern: "%H:%M:%S".to_string(),
            decimal_separator: '.',
            group_separator: ',',
        }
    }

    /// Parses a date written with the short date pattern only.
    pub fn parse_short_date(&self, field: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(field.trim(), &self.short_date_pattern).ok()
    }

    /// Parses a date written with the long date pattern only.
    pub fn parse_long_date(&self, field: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(field.trim(), &self.long_date_pattern).ok()
    }

    /// Parses a date in the short or long date pattern, or ISO 8601.
    pub fn parse_date(&self, field: &str) -> Option<NaiveDate> {
        let field = field.trim();
        self.parse_short_date(field)
            .or_else(|| self.parse_long_date(field))
            .or_else(|| NaiveDate::parse_from_str(field, "%Y-%m-%d").ok())
    }

    /// Parses a date and time. Dates without a time component are taken as
    /// midnight.
    pub fn parse_date_time(&self, field: &str) -> Option<NaiveDateTime> {
        let field = field.trim();

        let with_time = [
            format!("{} {}", self.short_date_pattern, self.long_time_pattern),
            format!("{} %H:%M:%S", self.short_date_pattern),
            format!("{} %H:%M", self.short_date_pattern),
            format!("{} {}", self.long_date_pattern, self.long_time_pattern),
            "%Y-%m-%dT%H:%M:%S%.f".to_string(),
            "%Y-%m-%d %H:%M:%S%.f".to_string(),
        ];

        with_time
            .iter()
            .find_map(|pattern| NaiveDateTime::parse_from_str(field, pattern).ok())
            .or_else(|| {
                self.parse_date(field)
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
    }

    pub fn format_date(&self, date: &NaiveDate) -> String {
        date.format(&self.short_date_pattern).to_string()
    }

    pub fn format_date_time(&self, date_time: &NaiveDateTime) -> String {
        date_time
            .format(&format!(
                "{} {}",
                self.short_date_pattern, self.long_time_pattern
            ))
            .to_string()
    }

    /// Rewrites a culture formatted number into the form Rust's parsers accept.
    pub(crate) fn normalize_number(&self, field: &str) -> String {
        field
            .trim()
            .chars()
            .filter(|&c| c != self.group_separator || self.group_separator == self.decimal_separator)
            .map(|c| if c == self.decimal_separator { '.' } else { c })
            .collect()
    }

    pub(crate) fn localize_number(&self, number: String) -> String {
        if self.decimal_separator == '.' {
            number
        } else {
            number.replace('.', &self.decimal_separator.to_string())
        }
    }
}
