use log::trace;

use crate::{
    core::{
        item::{Row, RowReaderResult, SeparatedReader},
        options::DelimitedOptions,
    },
    error::DelimitedError,
};

/// Splits delimited lines into fields using a set of [`DelimitedOptions`].
///
/// This is the low level half of reading: it knows nothing about streams and
/// works on one physical line at a time. Line sources such as
/// [`DelimitedStreamReader`](crate::item::stream_reader::DelimitedStreamReader)
/// feed it lines.
///
/// A reader built with [`Default`] has no options; splitting with it fails
/// with a configuration error until options are set.
///
/// # Examples
///
/// ```
/// use delimited_rs::core::{
///     item::SeparatedReader, options::DelimitedOptions, tokenizer::DelimitedSeparatedReader,
/// };
///
/// let reader = DelimitedSeparatedReader::new(DelimitedOptions::with_delimiter('|').unwrap());
/// let fields = reader.split("One|Two|\"|Three|\"").unwrap().unwrap();
/// assert_eq!(fields, vec!["One", "Two", "|Three|"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DelimitedSeparatedReader {
    options: Option<DelimitedOptions>,
}

impl DelimitedSeparatedReader {
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

impl SeparatedReader for DelimitedSeparatedReader {
    fn split(&self, line: &str) -> RowReaderResult {
        let options = self.options.as_ref().ok_or_else(|| {
            DelimitedError::Configuration(
                "The options need to be supplied and with a delimiter set".to_string(),
            )
        })?;

        let fields = tokenize(line, options.delimiter(), options.qualifier());
        trace!("Tokenized line into {:?}", fields);
        Ok(fields)
    }
}

/// Splits a single line into trimmed fields.
///
/// A field starting with `qualifier` runs to the next unescaped qualifier;
/// a qualifier is escaped when doubled or preceded by a backslash, and doubled
/// qualifiers collapse to one in the result. Other fields run to the next
/// `delimiter`. A trailing delimiter produces a final empty field.
///
/// Returns `None` when the line starts with NUL, which marks the end of the
/// stream.
///
/// # Examples
///
/// ```
/// use delimited_rs::core::tokenizer::tokenize;
///
/// assert_eq!(tokenize("One|Two|Three", '|', '"').unwrap(), vec!["One", "Two", "Three"]);
/// assert_eq!(tokenize("\"Hello, World\"", ',', '"').unwrap(), vec!["Hello, World"]);
/// assert_eq!(tokenize("a,", ',', '"').unwrap(), vec!["a", ""]);
/// assert!(tokenize("\0", ',', '"').is_none());
/// ```
pub fn tokenize(line: &str, delimiter: char, qualifier: char) -> Option<Row> {
    if line.starts_with('\0') {
        return None;
    }

    let chars: Vec<char> = line.chars().collect();
    let mut fields = Vec::new();

    // index of the first character of the next field
    let mut start = 0;
    while start <= chars.len() {
        fields.push(next_field(&chars, delimiter, qualifier, &mut start));
    }

    Some(fields)
}

fn next_field(chars: &[char], delimiter: char, qualifier: char, start: &mut usize) -> String {
    let len = chars.len();

    if *start == len {
        // the previous field ended on the last character
        *start = len + 1;
        return String::new();
    }

    let from = *start;

    if chars[from] == qualifier {
        if from == len - 1 {
            *start = len + 1;
            return qualifier.to_string();
        }

        let closing = find_qualifier(chars, from + 1, qualifier);
        *start = closing + 2;

        let extracted: String = chars[from + 1..closing].iter().collect();
        let single = qualifier.to_string();
        let doubled = format!("{qualifier}{qualifier}");
        return extracted.replace(&doubled, &single).trim().to_string();
    }

    let end = chars[from..]
        .iter()
        .position(|&c| c == delimiter)
        .map(|offset| from + offset);

    match end {
        Some(end) => {
            *start = end + 1;
            chars[from..end].iter().collect::<String>().trim().to_string()
        }
        None => {
            *start = len + 1;
            chars[from..].iter().collect::<String>().trim().to_string()
        }
    }
}

/// Index of the closing qualifier at or after `from`, or `chars.len()` when
/// the field is unterminated.
fn find_qualifier(chars: &[char], from: usize, qualifier: char) -> usize {
    let len = chars.len();
    let mut i = from;
    while i < len {
        if chars[i] == qualifier {
            if i < len - 1 && (chars[i + 1] == qualifier || chars[i - 1] == '\\') {
                i += 2;
                continue;
            }
            return i;
        }
        i += 1;
    }
    len
}
