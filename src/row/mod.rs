pub mod enumerator;
pub mod value;

use std::sync::Arc;

use crate::{convert::culture::Culture, core::item::Row};

use self::value::InferredValue;

/// Addresses a column by heading or by zero-based position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKey<'a> {
    Heading(&'a str),
    Index(usize),
}

impl<'a> From<&'a str> for ColumnKey<'a> {
    fn from(heading: &'a str) -> Self {
        ColumnKey::Heading(heading)
    }
}

impl<'a> From<&'a String> for ColumnKey<'a> {
    fn from(heading: &'a String) -> Self {
        ColumnKey::Heading(heading)
    }
}

impl From<usize> for ColumnKey<'_> {
    fn from(index: usize) -> Self {
        ColumnKey::Index(index)
    }
}

/// One row of fields together with the headings of its source.
///
/// # Examples
///
/// ```
/// use delimited_rs::row::{DelimitedRow, value::InferredValue};
///
/// let row = DelimitedRow::new(
///     vec!["Name".to_string(), "Age".to_string()],
///     vec!["Road Runner".to_string(), "11".to_string()],
/// );
///
/// assert_eq!(row.get("Age"), Some(InferredValue::Integer(11)));
/// assert_eq!(row.get(0usize), Some(InferredValue::Text("Road Runner".to_string())));
/// assert_eq!(row.get("Colour"), None);
/// assert_eq!(row.get(7usize), None);
/// ```
#[derive(Debug, Clone)]
pub struct DelimitedRow {
    headings: Arc<[String]>,
    fields: Row,
    culture: Arc<Culture>,
}

impl DelimitedRow {
    pub fn new(headings: Row, fields: Row) -> Self {
        Self::with_culture(headings.into(), fields, Arc::new(Culture::default()))
    }

    pub(crate) fn with_culture(headings: Arc<[String]>, fields: Row, culture: Arc<Culture>) -> Self {
        Self {
            headings,
            fields,
            culture,
        }
    }

    /// Names columns `Column1` to `ColumnN` for rows read without a header.
    pub fn generated_headings(count: usize) -> Row {
        (1..=count).map(|i| format!("Column{}", i)).collect()
    }

    /// The raw field for `key`. Heading lookups are exact; when a heading
    /// repeats, the first occurrence backed by a field wins.
    pub fn raw<'a, K: Into<ColumnKey<'a>>>(&self, key: K) -> Option<&str> {
        let field = match key.into() {
            ColumnKey::Index(index) => self.fields.get(index),
            ColumnKey::Heading(heading) => self
                .headings
                .iter()
                .enumerate()
                .filter(|(_, candidate)| candidate.as_str() == heading)
                .find_map(|(index, _)| self.fields.get(index)),
        };
        field.map(String::as_str)
    }

    /// The inferred value for `key`, or `None` when there is no such column.
    pub fn get<'a, K: Into<ColumnKey<'a>>>(&self, key: K) -> Option<InferredValue> {
        self.raw(key)
            .map(|field| InferredValue::infer(field, &self.culture))
    }

    pub fn headings(&self) -> &[String] {
        &self.headings
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn into_fields(self) -> Row {
        self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(headings: &[&str], fields: &[&str]) -> DelimitedRow {
        DelimitedRow::new(
            headings.iter().map(|s| s.to_string()).collect(),
            fields.iter().map(|s| s.to_string()).collect(),
        )
    }

    #[test]
    fn heading_lookup_is_case_sensitive() {
        let row = row(&["Name"], &["Wile"]);
        assert_eq!(row.raw("Name"), Some("Wile"));
        assert_eq!(row.raw("name"), None);
    }

    #[test]
    fn duplicate_heading_should_use_first_backed_column() {
        let row = row(&["A", "B", "A"], &["1", "2", "3"]);
        assert_eq!(row.raw("A"), Some("1"));

        let short = DelimitedRow::new(
            vec!["X".to_string(), "A".to_string(), "A".to_string()],
            vec!["x".to_string()],
        );
        assert_eq!(short.raw("A"), None);
    }

    #[test]
    fn heading_without_field_is_not_found() {
        let row = row(&["Name", "Age"], &["Wile"]);
        assert_eq!(row.get("Age"), None);
        assert_eq!(row.len(), 1);
    }

    #[test]
    fn generated_headings_start_at_one() {
        assert_eq!(
            DelimitedRow::generated_headings(3),
            vec!["Column1", "Column2", "Column3"]
        );
    }
}
