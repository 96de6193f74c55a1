use chrono::{NaiveDate, NaiveDateTime};

use crate::{
    convert::culture::Culture,
    error::{DelimitedError, Result},
};

/// Broad category of a field type, used to pick the default for empty fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Boolean,
    Integer,
    Float,
    Char,
    Text,
    Date,
    Optional,
}

impl FieldKind {
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldKind::Integer | FieldKind::Float)
    }
}

/// A type a field can be converted to and from.
///
/// Implemented for the primitive numbers, `bool`, `char`, `String`, the
/// `chrono` naive date types and `Option` of any of these.
pub trait FieldValue: Sized {
    const KIND: FieldKind;

    /// Name used in conversion errors.
    const TYPE_NAME: &'static str;

    fn parse_field(raw: &str, culture: &Culture) -> Result<Self>;

    fn format_field(&self, culture: &Culture) -> String;
}

/// Converts a raw field to `V`.
///
/// An empty field becomes zero for numeric targets and `false` for booleans;
/// every other target receives the field unchanged.
///
/// # Examples
///
/// ```
/// use delimited_rs::convert::{culture::Culture, value::coerce};
///
/// let culture = Culture::default();
///
/// assert_eq!(coerce::<i32>("", &culture).unwrap(), 0);
/// assert_eq!(coerce::<bool>("", &culture).unwrap(), false);
/// assert_eq!(coerce::<bool>(" y ", &culture).unwrap(), true);
/// assert!(coerce::<i32>("eleven", &culture).is_err());
/// ```
pub fn coerce<V: FieldValue>(raw: &str, culture: &Culture) -> Result<V> {
    V::parse_field(default_for_empty(raw, V::KIND), culture)
}

fn default_for_empty(raw: &str, kind: FieldKind) -> &str {
    if !raw.is_empty() {
        return raw;
    }
    match kind {
        FieldKind::Integer | FieldKind::Float => "0",
        FieldKind::Boolean => "false",
        _ => raw,
    }
}

/// Parses `true`/`false` and `Y`/`N`, ignoring case and surrounding
/// whitespace.
pub fn parse_bool(raw: &str) -> Option<bool> {
    let value = raw.trim();
    if value.eq_ignore_ascii_case("y") || value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("n") || value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

impl FieldValue for bool {
    const KIND: FieldKind = FieldKind::Boolean;
    const TYPE_NAME: &'static str = "bool";

    fn parse_field(raw: &str, _culture: &Culture) -> Result<Self> {
        parse_bool(raw).ok_or_else(|| {
            DelimitedError::conversion(raw, Self::TYPE_NAME, "expected true, false, Y or N")
        })
    }

    fn format_field(&self, _culture: &Culture) -> String {
        self.to_string()
    }
}

macro_rules! integer_field {
    ($($t:ty),*) => {$(
        impl FieldValue for $t {
            const KIND: FieldKind = FieldKind::Integer;
            const TYPE_NAME: &'static str = stringify!($t);

            fn parse_field(raw: &str, _culture: &Culture) -> Result<Self> {
                raw.trim()
                    .parse::<$t>()
                    .map_err(|e| DelimitedError::conversion(raw, Self::TYPE_NAME, e))
            }

            fn format_field(&self, _culture: &Culture) -> String {
                self.to_string()
            }
        }
    )*};
}

integer_field!(i8, i16, i32, i64, u8, u16, u32, u64, isize, usize);

macro_rules! float_field {
    ($($t:ty),*) => {$(
        impl FieldValue for $t {
            const KIND: FieldKind = FieldKind::Float;
            const TYPE_NAME: &'static str = stringify!($t);

            fn parse_field(raw: &str, culture: &Culture) -> Result<Self> {
                culture
                    .normalize_number(raw)
                    .parse::<$t>()
                    .map_err(|e| DelimitedError::conversion(raw, Self::TYPE_NAME, e))
            }

            fn format_field(&self, culture: &Culture) -> String {
                culture.localize_number(self.to_string())
            }
        }
    )*};
}

float_field!(f32, f64);

impl FieldValue for char {
    const KIND: FieldKind = FieldKind::Char;
    const TYPE_NAME: &'static str = "char";

    fn parse_field(raw: &str, _culture: &Culture) -> Result<Self> {
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(DelimitedError::conversion(
                raw,
                Self::TYPE_NAME,
                "expected exactly one character",
            )),
        }
    }

    fn format_field(&self, _culture: &Culture) -> String {
        self.to_string()
    }
}

impl FieldValue for String {
    const KIND: FieldKind = FieldKind::Text;
    const TYPE_NAME: &'static str = "String";

    fn parse_field(raw: &str, _culture: &Culture) -> Result<Self> {
        Ok(raw.to_string())
    }

    fn format_field(&self, _culture: &Culture) -> String {
        self.clone()
    }
}

impl FieldValue for NaiveDate {
    const KIND: FieldKind = FieldKind::Date;
    const TYPE_NAME: &'static str = "NaiveDate";

    fn parse_field(raw: &str, culture: &Culture) -> Result<Self> {
        culture
            .parse_date(raw)
            .or_else(|| culture.parse_date_time(raw).map(|value| value.date()))
            .ok_or_else(|| {
                DelimitedError::conversion(raw, Self::TYPE_NAME, unrecognised_date(culture))
            })
    }

    fn format_field(&self, culture: &Culture) -> String {
        culture.format_date(self)
    }
}

impl FieldValue for NaiveDateTime {
    const KIND: FieldKind = FieldKind::Date;
    const TYPE_NAME: &'static str = "NaiveDateTime";

    fn parse_field(raw: &str, culture: &Culture) -> Result<Self> {
        culture.parse_date_time(raw).ok_or_else(|| {
            DelimitedError::conversion(raw, Self::TYPE_NAME, unrecognised_date(culture))
        })
    }

    fn format_field(&self, culture: &Culture) -> String {
        culture.format_date_time(self)
    }
}

fn unrecognised_date(culture: &Culture) -> String {
    format!("not a date in the {} culture", culture.name)
}

/// Blank fields map to `None`; anything else must convert to `V`.
impl<V: FieldValue> FieldValue for Option<V> {
    const KIND: FieldKind = FieldKind::Optional;
    const TYPE_NAME: &'static str = V::TYPE_NAME;

    fn parse_field(raw: &str, culture: &Culture) -> Result<Self> {
        if raw.trim().is_empty() {
            Ok(None)
        } else {
            V::parse_field(raw, culture).map(Some)
        }
    }

    fn format_field(&self, culture: &Culture) -> String {
        self.as_ref()
            .map(|value| value.format_field(culture))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn empty_numbers_should_be_zero() -> Result<()> {
        let culture = Culture::default();
        assert_eq!(coerce::<i32>("", &culture)?, 0);
        assert_eq!(coerce::<u8>("", &culture)?, 0);
        assert_eq!(coerce::<f64>("", &culture)?, 0.0);
        assert!(!coerce::<bool>("", &culture)?);
        assert_eq!(coerce::<String>("", &culture)?, "");
        Ok(())
    }

    #[test]
    fn empty_optional_should_be_none() -> Result<()> {
        let culture = Culture::default();
        assert_eq!(coerce::<Option<i32>>("", &culture)?, None);
        assert_eq!(coerce::<Option<i32>>("12", &culture)?, Some(12));
        Ok(())
    }

    #[test]
    fn booleans_should_accept_yes_no() {
        for (raw, expected) in [
            ("Y", true),
            ("y", true),
            (" N ", false),
            ("n", false),
            ("True", true),
            ("false", false),
        ] {
            assert_eq!(parse_bool(raw), Some(expected), "{raw}");
        }
        assert_eq!(parse_bool("yes"), None);
        assert_eq!(parse_bool("1"), None);
    }

    #[test]
    fn invalid_boolean_should_be_conversion_error() {
        let result = coerce::<bool>("maybe", &Culture::default());
        assert!(matches!(
            result,
            Err(DelimitedError::Conversion { target: "bool", .. })
        ));
    }

    #[test]
    fn integers_should_be_trimmed() -> Result<()> {
        assert_eq!(coerce::<i64>(" -42 ", &Culture::default())?, -42);
        assert!(coerce::<u32>("-1", &Culture::default()).is_err());
        Ok(())
    }

    #[test]
    fn floats_should_follow_culture() -> Result<()> {
        let mut culture = Culture::default();
        assert_eq!(coerce::<f64>("1,234.5", &culture)?, 1234.5);

        culture.decimal_separator = ',';
        culture.group_separator = ' ';
        assert_eq!(coerce::<f64>("1 234,5", &culture)?, 1234.5);
        assert_eq!(1234.5f64.format_field(&culture), "1234,5");
        Ok(())
    }

    #[test]
    fn chars_should_be_single() -> Result<()> {
        assert_eq!(coerce::<char>("x", &Culture::default())?, 'x');
        assert!(coerce::<char>("xy", &Culture::default()).is_err());
        assert!(coerce::<char>("", &Culture::default()).is_err());
        Ok(())
    }

    #[test]
    fn dates_should_use_culture() -> Result<()> {
        let expected = NaiveDate::from_ymd_opt(2003, 11, 20).unwrap();
        assert_eq!(coerce::<NaiveDate>("20/11/2003", &Culture::en_gb())?, expected);
        assert_eq!(coerce::<NaiveDate>("11/20/2003", &Culture::en_us())?, expected);
        assert!(coerce::<NaiveDate>("", &Culture::en_gb()).is_err());
        Ok(())
    }

    #[test]
    fn none_should_format_as_empty() {
        let value: Option<NaiveDate> = None;
        assert_eq!(value.format_field(&Culture::default()), "");
    }
}
