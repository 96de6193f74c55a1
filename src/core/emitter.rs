use std::{borrow::Cow, io::Write};

use crate::{
    core::{
        item::{RowWriterResult, SeparatedWriter},
        options::DelimitedOptions,
    },
    error::DelimitedError,
};

/// Joins fields into a delimited line, qualifying fields where needed.
///
/// A field is wrapped in qualifiers when the options ask for every field to
/// be qualified, or when it contains the qualifier, the delimiter, a line
/// feed or a carriage return. Embedded qualifiers are doubled.
#[derive(Debug, Clone, Default)]
pub struct DelimitedSeparatedWriter {
    options: Option<DelimitedOptions>,
}

impl DelimitedSeparatedWriter {
    pub fn new(options: DelimitedOptions) -> Self {
        Self {
            options: Some(options),
        }
    }

    pub fn options(&self) -> Option<&DelimitedOptions> {
        self.options.as_ref()
    }

    pub fn set_options(&mut self, options: DelimitedOptions) {
        self.options = Some(options);
    }
}

impl SeparatedWriter for DelimitedSeparatedWriter {
    fn write(&self, out: &mut dyn Write, fields: &[String]) -> RowWriterResult {
        let options = self.options.as_ref().ok_or_else(|| {
            DelimitedError::Configuration(
                "The options need to be supplied and with a delimiter set".to_string(),
            )
        })?;

        let mut delimiter = [0u8; 4];
        let delimiter = options.delimiter().encode_utf8(&mut delimiter);

        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                out.write_all(delimiter.as_bytes())?;
            }
            out.write_all(escape(field, options).as_bytes())?;
        }
        Ok(())
    }
}

/// Formats a whole row into a `String`, without line terminator.
///
/// # Examples
///
/// ```
/// use delimited_rs::core::{emitter::format_row, options::DelimitedOptions};
///
/// let fields = vec!["plain".to_string(), "a,b".to_string(), "say \"hi\"".to_string()];
/// assert_eq!(
///     format_row(&fields, &DelimitedOptions::csv()),
///     "plain,\"a,b\",\"say \"\"hi\"\"\""
/// );
/// ```
pub fn format_row(fields: &[String], options: &DelimitedOptions) -> String {
    let mut line = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            line.push(options.delimiter());
        }
        line.push_str(&escape(field, options));
    }
    line
}

fn escape<'a>(field: &'a str, options: &DelimitedOptions) -> Cow<'a, str> {
    let qualifier = options.qualifier();
    let needs_qualifying = options.qualifies_all()
        || field
            .chars()
            .any(|c| c == qualifier || c == options.delimiter() || c == '\n' || c == '\r');

    if !needs_qualifying {
        return Cow::Borrowed(field);
    }

    let mut escaped = String::with_capacity(field.len() + 2);
    escaped.push(qualifier);
    for c in field.chars() {
        if c == qualifier {
            escaped.push(qualifier);
        }
        escaped.push(c);
    }
    escaped.push(qualifier);
    Cow::Owned(escaped)
}
