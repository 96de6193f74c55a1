use std::io;

use log::debug;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, BufWriter,
};

use crate::{
    core::{
        emitter::DelimitedSeparatedWriter,
        item::{RowReaderResult, RowWriterResult, SeparatedReader, SeparatedWriter, is_empty_row},
        options::Terminator,
        tokenizer::DelimitedSeparatedReader,
    },
    error::{DelimitedError, Result},
    item::line::{decode_line, scan_chunk},
};

/// Non-blocking counterpart of
/// [`DelimitedStreamReader`](crate::item::stream_reader::DelimitedStreamReader).
///
/// # Examples
///
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use delimited_rs::core::options::DelimitedOptions;
/// use delimited_rs::item::stream_reader::DelimitedStreamReaderBuilder;
///
/// let mut reader = DelimitedStreamReaderBuilder::new()
///     .options(DelimitedOptions::csv())
///     .from_async_reader("a,b\r\nc,d".as_bytes());
///
/// assert_eq!(reader.read_line().await.unwrap().unwrap(), vec!["a", "b"]);
/// assert_eq!(reader.read_line().await.unwrap().unwrap(), vec!["c", "d"]);
/// assert!(reader.read_line().await.unwrap().is_none());
/// # }
/// ```
pub struct AsyncDelimitedStreamReader<R, S = DelimitedSeparatedReader> {
    separated: S,
    reader: Option<BufReader<R>>,
    skip_lf: bool,
    buffer: Vec<u8>,
}

impl<R: AsyncRead + Unpin, S: SeparatedReader> AsyncDelimitedStreamReader<R, S> {
    pub fn new(separated: S, rdr: R) -> Self {
        Self::with_capacity(separated, rdr, crate::item::stream_reader::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(separated: S, rdr: R, capacity: usize) -> Self {
        Self {
            separated,
            reader: Some(BufReader::with_capacity(capacity, rdr)),
            skip_lf: false,
            buffer: Vec::with_capacity(256),
        }
    }

    pub async fn read_line(&mut self) -> RowReaderResult {
        let reader = self
            .reader
            .as_mut()
            .ok_or_else(|| DelimitedError::Stream("The reader has been closed".to_string()))?;

        if !read_physical_line(reader, &mut self.skip_lf, &mut self.buffer).await? {
            return Ok(None);
        }

        let line = decode_line(std::mem::take(&mut self.buffer))?;
        self.separated.split(&line)
    }

    pub async fn read_line_ignoring_empty(&mut self, ignore_empty_rows: bool) -> RowReaderResult {
        loop {
            match self.read_line().await? {
                Some(fields) if ignore_empty_rows && is_empty_row(&fields) => continue,
                line => return Ok(line),
            }
        }
    }

    /// Releases the underlying input. Calling it again is a no-op.
    pub fn close(&mut self) {
        if self.reader.take().is_some() {
            debug!("Async delimited stream reader closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.reader.is_none()
    }
}

async fn read_physical_line<B: AsyncBufRead + Unpin>(
    reader: &mut B,
    skip_lf: &mut bool,
    buf: &mut Vec<u8>,
) -> io::Result<bool> {
    buf.clear();
    let mut read_any = false;

    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Ok(read_any);
        }

        let chunk = scan_chunk(available, skip_lf, buf);
        reader.consume(chunk.consumed);
        if chunk.complete {
            return Ok(true);
        }
        read_any |= chunk.extended;
    }
}

/// Non-blocking counterpart of
/// [`DelimitedStreamWriter`](crate::item::stream_writer::DelimitedStreamWriter).
pub struct AsyncDelimitedStreamWriter<W, S = DelimitedSeparatedWriter> {
    separated: S,
    writer: Option<BufWriter<W>>,
    terminator: Terminator,
}

impl<W: AsyncWrite + Unpin, S: SeparatedWriter> AsyncDelimitedStreamWriter<W, S> {
    pub fn new(separated: S, wtr: W, terminator: Terminator) -> Self {
        Self {
            separated,
            writer: Some(BufWriter::new(wtr)),
            terminator,
        }
    }

    pub async fn write_line(&mut self, fields: &[String]) -> RowWriterResult {
        let writer = self.writer.as_mut().ok_or_else(closed)?;

        let mut line = Vec::with_capacity(64);
        self.separated.write(&mut line, fields)?;
        line.extend_from_slice(self.terminator.as_str().as_bytes());

        writer.write_all(&line).await?;
        Ok(())
    }

    pub async fn flush(&mut self) -> RowWriterResult {
        if let Some(writer) = self.writer.as_mut() {
            writer.flush().await?;
        }
        Ok(())
    }

    /// Flushes and releases the underlying writer. Calling it again is a no-op.
    pub async fn close(&mut self) -> RowWriterResult {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().await?;
            debug!("Async delimited stream writer closed");
        }
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.writer.is_none()
    }

    /// Flushes buffered output and hands back the underlying writer.
    pub async fn into_inner(mut self) -> Result<W> {
        let mut writer = self.writer.take().ok_or_else(closed)?;
        writer.flush().await?;
        Ok(writer.into_inner())
    }
}

fn closed() -> DelimitedError {
    DelimitedError::Stream("The writer has been closed".to_string())
}

#[cfg(test)]
mod tests {
    use crate::{
        core::options::DelimitedOptions,
        item::{
            stream_reader::DelimitedStreamReaderBuilder,
            stream_writer::DelimitedStreamWriterBuilder,
        },
    };

    use super::*;

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[tokio::test]
    async fn should_read_like_the_blocking_reader() -> Result<()> {
        let data = "\n\nOne|Two|Three\r\n\r\n\rFour|Five|Six\nSeven|Eight|Nine\n\n";
        let mut reader = DelimitedStreamReaderBuilder::new()
            .options(DelimitedOptions::with_delimiter('|')?)
            .capacity(5)
            .from_async_reader(data.as_bytes());

        let mut rows = Vec::new();
        while let Some(fields) = reader.read_line_ignoring_empty(true).await? {
            rows.push(fields);
        }

        assert_eq!(
            rows,
            vec![
                row(&["One", "Two", "Three"]),
                row(&["Four", "Five", "Six"]),
                row(&["Seven", "Eight", "Nine"]),
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn closed_reader_should_fail() {
        let mut reader = DelimitedStreamReaderBuilder::new()
            .options(DelimitedOptions::csv())
            .from_async_reader("a".as_bytes());

        reader.close();
        reader.close();

        assert!(reader.is_closed());
        assert!(matches!(
            reader.read_line().await,
            Err(DelimitedError::Stream(_))
        ));
    }

    #[tokio::test]
    async fn should_write_lines() -> Result<()> {
        let mut writer = DelimitedStreamWriterBuilder::new()
            .options(DelimitedOptions::csv())
            .from_async_writer(Vec::new());

        writer.write_line(&row(&["Hello", "World"])).await?;
        writer.write_line(&row(&["a,b"])).await?;

        let output = writer.into_inner().await?;
        assert_eq!(String::from_utf8_lossy(&output), "Hello,World\r\n\"a,b\"\r\n");
        Ok(())
    }

    #[tokio::test]
    async fn closed_writer_should_fail() -> Result<()> {
        let mut writer = DelimitedStreamWriterBuilder::new()
            .options(DelimitedOptions::csv())
            .from_async_writer(Vec::new());

        writer.close().await?;
        writer.close().await?;

        assert!(matches!(
            writer.write_line(&row(&["a"])).await,
            Err(DelimitedError::Stream(_))
        ));
        Ok(())
    }
}
