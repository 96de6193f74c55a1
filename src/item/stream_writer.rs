use std::{
    cell::RefCell,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use log::{debug, error};

use crate::{
    core::{
        emitter::DelimitedSeparatedWriter,
        item::{RowWriter, RowWriterResult, SeparatedWriter},
        options::{DelimitedOptions, Terminator},
    },
    error::{DelimitedError, Result},
};

#[cfg(feature = "async")]
use crate::item::async_stream::AsyncDelimitedStreamWriter;

/// Low level writer emitting one physical line per row.
///
/// Output is buffered; call [`flush`](RowWriter::flush) or
/// [`close`](RowWriter::close) to push it to the underlying writer, or
/// [`into_inner`](DelimitedStreamWriter::into_inner) to get it back.
///
/// # Examples
///
/// ```
/// use delimited_rs::core::{item::RowWriter, options::DelimitedOptions};
/// use delimited_rs::item::stream_writer::DelimitedStreamWriterBuilder;
///
/// let writer = DelimitedStreamWriterBuilder::new()
///     .options(DelimitedOptions::csv())
///     .from_writer(Vec::new());
///
/// writer.write_line(&["Hello".to_string(), "World".to_string()]).unwrap();
///
/// let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();
/// assert_eq!(output, "Hello,World\r\n");
/// ```
pub struct DelimitedStreamWriter<W: Write, S = DelimitedSeparatedWriter> {
    separated: S,
    writer: RefCell<Option<BufWriter<W>>>,
    terminator: Terminator,
}

impl<W: Write, S: SeparatedWriter> DelimitedStreamWriter<W, S> {
    pub fn new(separated: S, wtr: W) -> Self {
        Self::with_terminator(separated, wtr, Terminator::default())
    }

    pub fn with_terminator(separated: S, wtr: W, terminator: Terminator) -> Self {
        Self {
            separated,
            writer: RefCell::new(Some(BufWriter::new(wtr))),
            terminator,
        }
    }

    pub fn separated(&self) -> &S {
        &self.separated
    }

    pub fn terminator(&self) -> Terminator {
        self.terminator
    }

    /// Writes the fields of one row without a line terminator.
    pub fn write(&self, fields: &[String]) -> RowWriterResult {
        let mut guard = self.writer.borrow_mut();
        let writer = guard.as_mut().ok_or_else(closed)?;
        self.separated.write(writer, fields)
    }

    pub fn is_closed(&self) -> bool {
        self.writer.borrow().is_none()
    }

    /// Flushes buffered output and hands back the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        let writer = self.writer.into_inner().ok_or_else(closed)?;
        writer
            .into_inner()
            .map_err(|error| DelimitedError::Stream(error.error().to_string()))
    }
}

impl<S: SeparatedWriter> DelimitedStreamWriter<File, S> {
    /// Creates (or truncates) `path` for writing.
    pub fn from_path<P: AsRef<Path>>(separated: S, path: P, terminator: Terminator) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| {
            error!("Failed to create delimited file {}: {}", path.display(), e);
            DelimitedError::Stream(format!("Unable to write to {}: {}", path.display(), e))
        })?;
        debug!("Delimited stream writer opened on {}", path.display());
        Ok(Self::with_terminator(separated, file, terminator))
    }
}

impl<W: Write, S: SeparatedWriter> RowWriter for DelimitedStreamWriter<W, S> {
    fn write_line(&self, fields: &[String]) -> RowWriterResult {
        let mut guard = self.writer.borrow_mut();
        let writer = guard.as_mut().ok_or_else(closed)?;
        self.separated.write(writer, fields)?;
        writer.write_all(self.terminator.as_str().as_bytes())?;
        Ok(())
    }

    fn flush(&self) -> RowWriterResult {
        if let Some(writer) = self.writer.borrow_mut().as_mut() {
            writer.flush()?;
        }
        Ok(())
    }

    /// Flushes and releases the underlying writer. Calling it again is a no-op.
    fn close(&self) -> RowWriterResult {
        if let Some(mut writer) = self.writer.borrow_mut().take() {
            writer.flush()?;
            debug!("Delimited stream writer closed");
        }
        Ok(())
    }
}

fn closed() -> DelimitedError {
    DelimitedError::Stream("The writer has been closed".to_string())
}

/// A builder for [`DelimitedStreamWriter`].
#[derive(Default)]
pub struct DelimitedStreamWriterBuilder {
    separated: DelimitedSeparatedWriter,
    terminator: Terminator,
}

impl DelimitedStreamWriterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(mut self, options: DelimitedOptions) -> Self {
        self.separated.set_options(options);
        self
    }

    pub fn terminator(mut self, terminator: Terminator) -> Self {
        self.terminator = terminator;
        self
    }

    pub fn from_writer<W: Write>(self, wtr: W) -> DelimitedStreamWriter<W> {
        DelimitedStreamWriter::with_terminator(self.separated, wtr, self.terminator)
    }

    pub fn from_path<P: AsRef<Path>>(self, path: P) -> Result<DelimitedStreamWriter<File>> {
        DelimitedStreamWriter::from_path(self.separated, path, self.terminator)
    }

    #[cfg(feature = "async")]
    pub fn from_async_writer<W: tokio::io::AsyncWrite + Unpin>(
        self,
        wtr: W,
    ) -> AsyncDelimitedStreamWriter<W> {
        AsyncDelimitedStreamWriter::new(self.separated, wtr, self.terminator)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn should_write_lines_with_crlf() -> std::result::Result<(), Box<dyn Error>> {
        let writer = DelimitedStreamWriterBuilder::new()
            .options(DelimitedOptions::csv())
            .from_writer(Vec::new());

        writer.write_line(&row(&["Hello", "World"]))?;
        writer.write_line(&row(&["a,b", "c"]))?;

        let output = String::from_utf8(writer.into_inner()?)?;
        assert_eq!(output, "Hello,World\r\n\"a,b\",c\r\n");
        Ok(())
    }

    #[test]
    fn should_honour_terminator() -> std::result::Result<(), Box<dyn Error>> {
        let writer = DelimitedStreamWriterBuilder::new()
            .options(DelimitedOptions::tsv())
            .terminator(Terminator::LF)
            .from_writer(Vec::new());

        writer.write_line(&row(&["Hello", "World"]))?;

        assert_eq!(String::from_utf8(writer.into_inner()?)?, "Hello\tWorld\n");
        Ok(())
    }

    #[test]
    fn write_without_terminator() -> std::result::Result<(), Box<dyn Error>> {
        let writer = DelimitedStreamWriterBuilder::new()
            .options(DelimitedOptions::csv())
            .from_writer(Vec::new());

        writer.write(&row(&["a", "b"]))?;

        assert_eq!(String::from_utf8(writer.into_inner()?)?, "a,b");
        Ok(())
    }

    #[test]
    fn close_should_be_idempotent() -> std::result::Result<(), Box<dyn Error>> {
        let writer = DelimitedStreamWriterBuilder::new()
            .options(DelimitedOptions::csv())
            .from_writer(Vec::new());

        writer.close()?;
        writer.close()?;

        assert!(writer.is_closed());
        assert!(matches!(
            writer.write_line(&row(&["a"])),
            Err(DelimitedError::Stream(_))
        ));
        Ok(())
    }

    #[test]
    fn unconfigured_writer_should_fail() {
        let writer = DelimitedStreamWriterBuilder::new().from_writer(Vec::new());

        assert!(matches!(
            writer.write_line(&row(&["a"])),
            Err(DelimitedError::Configuration(_))
        ));
    }
}
