use std::{
    cell::{Cell, RefCell},
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use log::{debug, error};

use crate::{
    core::{
        item::{RowReader, RowReaderResult, SeparatedReader},
        options::DelimitedOptions,
        tokenizer::DelimitedSeparatedReader,
    },
    error::{DelimitedError, Result},
    item::line::{decode_line, read_physical_line},
};

#[cfg(feature = "async")]
use crate::item::async_stream::AsyncDelimitedStreamReader;

/// Low level reader returning one row of fields per physical line.
///
/// The reader owns its input and releases it exactly once, either on
/// [`close`](DelimitedStreamReader::close) or when dropped. Reading after
/// closing is a stream error; closing twice does nothing.
///
/// # Examples
///
/// ```
/// use delimited_rs::core::{item::RowReader, options::DelimitedOptions};
/// use delimited_rs::item::stream_reader::DelimitedStreamReaderBuilder;
///
/// let data = "\n\nOne|Two|Three\n\n\nFour|Five|Six\n";
/// let reader = DelimitedStreamReaderBuilder::new()
///     .options(DelimitedOptions::with_delimiter('|').unwrap())
///     .from_reader(data.as_bytes());
///
/// let first = reader.read_line_ignoring_empty(true).unwrap().unwrap();
/// assert_eq!(first, vec!["One", "Two", "Three"]);
///
/// let second = reader.read_line_ignoring_empty(true).unwrap().unwrap();
/// assert_eq!(second, vec!["Four", "Five", "Six"]);
///
/// assert!(reader.read_line_ignoring_empty(true).unwrap().is_none());
/// ```
pub struct DelimitedStreamReader<R, S = DelimitedSeparatedReader> {
    separated: S,
    reader: RefCell<Option<BufReader<R>>>,
    /// Set after a line ended with `\r`, so a following `\n` is swallowed.
    skip_lf: Cell<bool>,
    buffer: RefCell<Vec<u8>>,
}

impl<R: Read, S: SeparatedReader> DelimitedStreamReader<R, S> {
    pub fn new(separated: S, rdr: R) -> Self {
        Self::with_capacity(separated, rdr, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(separated: S, rdr: R, capacity: usize) -> Self {
        Self {
            separated,
            reader: RefCell::new(Some(BufReader::with_capacity(capacity, rdr))),
            skip_lf: Cell::new(false),
            buffer: RefCell::new(Vec::with_capacity(256)),
        }
    }

    pub fn separated(&self) -> &S {
        &self.separated
    }

    /// Releases the underlying input. Calling it again is a no-op.
    pub fn close(&self) {
        if self.reader.borrow_mut().take().is_some() {
            debug!("Delimited stream reader closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.reader.borrow().is_none()
    }
}

impl<S: SeparatedReader> DelimitedStreamReader<File, S> {
    /// Opens `path` for reading.
    pub fn from_path<P: AsRef<Path>>(separated: S, path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            error!("Failed to open delimited file {}: {}", path.display(), e);
            DelimitedError::Stream(format!(
                "Unable to read from {}: {}",
                path.display(),
                e
            ))
        })?;
        debug!("Delimited stream reader opened on {}", path.display());
        Ok(Self::new(separated, file))
    }
}

impl<R: Read, S: SeparatedReader> RowReader for DelimitedStreamReader<R, S> {
    fn read_line(&self) -> RowReaderResult {
        let mut guard = self.reader.borrow_mut();
        let reader = guard
            .as_mut()
            .ok_or_else(|| DelimitedError::Stream("The reader has been closed".to_string()))?;

        let mut buffer = self.buffer.borrow_mut();
        let mut skip_lf = self.skip_lf.get();
        let found = read_physical_line(reader, &mut skip_lf, &mut buffer);
        self.skip_lf.set(skip_lf);

        if !found? {
            return Ok(None);
        }

        let line = decode_line(std::mem::take(&mut *buffer))?;
        self.separated.split(&line)
    }
}

pub(crate) const DEFAULT_CAPACITY: usize = 8 * 1024;

/// A builder for [`DelimitedStreamReader`].
///
/// Without [`options`](DelimitedStreamReaderBuilder::options) the reader is
/// built unconfigured and every read fails with a configuration error.
pub struct DelimitedStreamReaderBuilder {
    separated: DelimitedSeparatedReader,
    capacity: usize,
}

impl Default for DelimitedStreamReaderBuilder {
    fn default() -> Self {
        Self {
            separated: DelimitedSeparatedReader::default(),
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl DelimitedStreamReaderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(mut self, options: DelimitedOptions) -> Self {
        self.separated.set_options(options);
        self
    }

    /// Sets the read buffer capacity in bytes.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn from_reader<R: Read>(self, rdr: R) -> DelimitedStreamReader<R> {
        DelimitedStreamReader::with_capacity(self.separated, rdr, self.capacity)
    }

    pub fn from_path<P: AsRef<Path>>(self, path: P) -> Result<DelimitedStreamReader<File>> {
        let reader = DelimitedStreamReader::from_path(self.separated, path)?;
        Ok(reader)
    }

    #[cfg(feature = "async")]
    pub fn from_async_reader<R: tokio::io::AsyncRead + Unpin>(
        self,
        rdr: R,
    ) -> AsyncDelimitedStreamReader<R> {
        AsyncDelimitedStreamReader::with_capacity(self.separated, rdr, self.capacity)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    fn pipes() -> DelimitedOptions {
        DelimitedOptions::with_delimiter('|').unwrap()
    }

    #[test]
    fn should_read_each_line() -> std::result::Result<(), Box<dyn Error>> {
        let data = "One|Two|Three\r\nFour|Five|Six\r\nSeven|Eight|Nine";
        let reader = DelimitedStreamReaderBuilder::new()
            .options(pipes())
            .from_reader(data.as_bytes());

        assert_eq!(reader.read_line()?.unwrap(), vec!["One", "Two", "Three"]);
        assert_eq!(reader.read_line()?.unwrap(), vec!["Four", "Five", "Six"]);
        assert_eq!(reader.read_line()?.unwrap(), vec!["Seven", "Eight", "Nine"]);
        assert!(reader.read_line()?.is_none());

        Ok(())
    }

    #[test]
    fn rows_may_differ_in_length() -> std::result::Result<(), Box<dyn Error>> {
        let data = "One|Two|Three\nFour|Six\nSeven|Eight";
        let reader = DelimitedStreamReaderBuilder::new()
            .options(pipes())
            .from_reader(data.as_bytes());

        assert_eq!(reader.read_line()?.unwrap().len(), 3);
        assert_eq!(reader.read_line()?.unwrap(), vec!["Four", "Six"]);
        assert_eq!(reader.read_line()?.unwrap(), vec!["Seven", "Eight"]);

        Ok(())
    }

    #[test]
    fn empty_rows_should_be_ignored_on_request() -> std::result::Result<(), Box<dyn Error>> {
        let data = "\n\nOne|Two|Three\n\n\nFour|Five|Six\nSeven|Eight|Nine\n\n";
        let reader = DelimitedStreamReaderBuilder::new()
            .options(pipes())
            .from_reader(data.as_bytes());

        let mut rows = Vec::new();
        while let Some(row) = reader.read_line_ignoring_empty(true)? {
            rows.push(row);
        }

        assert_eq!(
            rows,
            vec![
                vec!["One", "Two", "Three"],
                vec!["Four", "Five", "Six"],
                vec!["Seven", "Eight", "Nine"],
            ]
        );
        Ok(())
    }

    #[test]
    fn empty_input_should_end_immediately() -> std::result::Result<(), Box<dyn Error>> {
        let reader = DelimitedStreamReaderBuilder::new()
            .options(DelimitedOptions::csv())
            .from_reader("".as_bytes());

        assert!(reader.read_line()?.is_none());
        Ok(())
    }

    #[test]
    fn nul_sentinel_should_end_stream() -> std::result::Result<(), Box<dyn Error>> {
        let reader = DelimitedStreamReaderBuilder::new()
            .options(DelimitedOptions::csv())
            .from_reader("a,b\n\0\nc,d".as_bytes());

        assert_eq!(reader.read_line()?.unwrap(), vec!["a", "b"]);
        assert!(reader.read_line()?.is_none());
        Ok(())
    }

    #[test]
    fn unconfigured_reader_should_fail_on_read() {
        let reader = DelimitedStreamReaderBuilder::new().from_reader("One|Two".as_bytes());

        assert!(matches!(
            reader.read_line(),
            Err(DelimitedError::Configuration(_))
        ));
    }

    #[test]
    fn close_should_be_idempotent() {
        let reader = DelimitedStreamReaderBuilder::new()
            .options(DelimitedOptions::csv())
            .from_reader("Hello, World".as_bytes());

        reader.close();
        reader.close();

        assert!(reader.is_closed());
        assert!(matches!(reader.read_line(), Err(DelimitedError::Stream(_))));
    }

    #[test]
    fn missing_file_should_be_a_stream_error() {
        let result = DelimitedStreamReaderBuilder::new()
            .options(DelimitedOptions::csv())
            .from_path("/definitely/not/here.csv");

        assert!(matches!(result, Err(DelimitedError::Stream(_))));
    }
}
