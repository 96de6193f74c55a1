use serde::{Deserialize, Serialize};

use crate::error::{DelimitedError, Result};

/// Default qualifier used to wrap fields that need escaping.
pub const DEFAULT_QUALIFIER: char = '"';

/// Tells readers and writers which characters delimit and qualify fields.
///
/// The delimiter may not be NUL and must differ from the qualifier; both rules
/// are checked when the options are built, so an instance is always usable.
///
/// # Examples
///
/// ```
/// use delimited_rs::core::options::DelimitedOptions;
///
/// let pipes = DelimitedOptions::with_delimiter('|').unwrap();
/// assert_eq!(pipes.delimiter(), '|');
/// assert_eq!(pipes.qualifier(), '"');
/// assert!(!pipes.qualifies_all());
///
/// assert!(DelimitedOptions::with_delimiter('\0').is_err());
/// assert!(DelimitedOptions::new('"', '"', false).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "OptionsConfig")]
pub struct DelimitedOptions {
    delimiter: char,
    qualifier: char,
    qualify_all: bool,
}

impl DelimitedOptions {
    pub fn new(delimiter: char, qualifier: char, qualify_all: bool) -> Result<Self> {
        if delimiter == '\0' {
            return Err(DelimitedError::Configuration(
                "The options need to be supplied with a delimiter set".to_string(),
            ));
        }
        if delimiter == qualifier {
            return Err(DelimitedError::Configuration(format!(
                "The delimiter and qualifier must differ, both are '{}'",
                delimiter
            )));
        }

        Ok(Self {
            delimiter,
            qualifier,
            qualify_all,
        })
    }

    /// Options with the given delimiter and the default `"` qualifier.
    pub fn with_delimiter(delimiter: char) -> Result<Self> {
        Self::new(delimiter, DEFAULT_QUALIFIER, false)
    }

    /// Comma separated values.
    pub const fn csv() -> Self {
        Self {
            delimiter: ',',
            qualifier: DEFAULT_QUALIFIER,
            qualify_all: false,
        }
    }

    /// Tab separated values.
    pub const fn tsv() -> Self {
        Self {
            delimiter: '\t',
            qualifier: DEFAULT_QUALIFIER,
            qualify_all: false,
        }
    }

    /// Returns a copy that wraps every written field in qualifiers.
    pub fn with_qualify_all(mut self, yes: bool) -> Self {
        self.qualify_all = yes;
        self
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    pub fn qualifier(&self) -> char {
        self.qualifier
    }

    pub fn qualifies_all(&self) -> bool {
        self.qualify_all
    }
}

/// Unvalidated shape of [`DelimitedOptions`] as found in configuration files.
#[derive(Deserialize)]
struct OptionsConfig {
    delimiter: char,
    #[serde(default = "default_qualifier")]
    qualifier: char,
    #[serde(default)]
    qualify_all: bool,
}

fn default_qualifier() -> char {
    DEFAULT_QUALIFIER
}

impl TryFrom<OptionsConfig> for DelimitedOptions {
    type Error = DelimitedError;

    fn try_from(config: OptionsConfig) -> Result<Self> {
        DelimitedOptions::new(config.delimiter, config.qualifier, config.qualify_all)
    }
}

/// Line terminator appended by writers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Terminator {
    /// `\r\n`
    #[default]
    CRLF,
    /// `\n`
    LF,
}

impl Terminator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Terminator::CRLF => "\r\n",
            Terminator::LF => "\n",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_should_be_valid() {
        assert_eq!(DelimitedOptions::csv().delimiter(), ',');
        assert_eq!(DelimitedOptions::tsv().delimiter(), '\t');
        assert_eq!(DelimitedOptions::csv().qualifier(), '"');
        assert!(DelimitedOptions::csv().with_qualify_all(true).qualifies_all());
    }

    #[test]
    fn nul_delimiter_should_fail() {
        let result = DelimitedOptions::with_delimiter('\0');
        assert!(matches!(result, Err(DelimitedError::Configuration(_))));
    }

    #[test]
    fn same_delimiter_and_qualifier_should_fail() {
        let result = DelimitedOptions::new('\'', '\'', false);
        assert!(matches!(result, Err(DelimitedError::Configuration(_))));
    }

    #[test]
    fn terminator_should_default_to_crlf() {
        assert_eq!(Terminator::default().as_str(), "\r\n");
        assert_eq!(Terminator::LF.as_str(), "\n");
    }
}
