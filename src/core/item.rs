use std::io::Write;

use crate::error::Result;

/// An ordered sequence of fields; insertion order is column order.
pub type Row = Vec<String>;

/// Result of reading one row: `Ok(None)` once the source is exhausted.
pub type RowReaderResult = Result<Option<Row>>;

/// Result of writing one row.
pub type RowWriterResult = Result<()>;

/// Turns one physical line (terminator already stripped) into fields.
pub trait SeparatedReader {
    /// Returns `Ok(None)` for the end-of-stream sentinel line.
    fn split(&self, line: &str) -> RowReaderResult;
}

/// Turns fields back into one escaped line, written straight to `out`.
pub trait SeparatedWriter {
    fn write(&self, out: &mut dyn Write, fields: &[String]) -> RowWriterResult;
}

/// A source of rows, one physical line at a time.
pub trait RowReader {
    fn read_line(&self) -> RowReaderResult;

    /// Reads the next row, passing over rows where every field is empty
    /// when `ignore_empty_rows` is set.
    fn read_line_ignoring_empty(&self, ignore_empty_rows: bool) -> RowReaderResult {
        let mut line = self.read_line()?;
        if ignore_empty_rows {
            while let Some(fields) = &line {
                if !is_empty_row(fields) {
                    break;
                }
                line = self.read_line()?;
            }
        }
        Ok(line)
    }
}

/// A sink of rows, one physical line at a time.
pub trait RowWriter {
    fn write_line(&self, fields: &[String]) -> RowWriterResult;
    fn flush(&self) -> RowWriterResult;
    fn close(&self) -> RowWriterResult {
        Ok(())
    }
}

/// True when the row has no fields or only empty ones.
pub fn is_empty_row(fields: &[String]) -> bool {
    fields.iter().all(String::is_empty)
}
