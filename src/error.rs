use std::io;

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, DelimitedError>;

#[derive(Error, Debug)]
/// Delimited error
pub enum DelimitedError {
    /// Invalid or missing configuration, such as an unset delimiter.
    #[error("Configuration: {0}")]
    Configuration(String),

    /// The underlying stream could not be opened, read or written.
    #[error("Stream: {0}")]
    Stream(String),

    /// Structural problem with the data, such as no recognisable headings
    /// or a missing required field.
    #[error("Serialization: {0}")]
    Serialization(String),

    /// A field could not be converted to the type of its target property.
    #[error("Unable to convert '{value}' to {target}: {reason}")]
    Conversion {
        value: String,
        target: &'static str,
        reason: String,
    },

    /// The external mapping document could not be parsed.
    #[error("Mapping document: {0}")]
    MappingDocument(String),
}

impl From<io::Error> for DelimitedError {
    fn from(error: io::Error) -> Self {
        DelimitedError::Stream(error.to_string())
    }
}

impl DelimitedError {
    pub(crate) fn conversion<S: ToString>(value: &str, target: &'static str, reason: S) -> Self {
        DelimitedError::Conversion {
            value: value.to_string(),
            target,
            reason: reason.to_string(),
        }
    }
}
