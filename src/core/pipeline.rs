use std::{
    cell::Cell,
    time::{Duration, Instant},
};

use log::debug;

use crate::{
    core::item::{Row, RowReader, RowWriter},
    error::Result,
};

type Filter<'a> = Box<dyn Fn(&[String]) -> bool + 'a>;
type Processor<'a> = Box<dyn Fn(Row) -> Row + 'a>;

#[derive(Debug)]
pub struct PipelineResult {
    pub start: Instant,
    pub end: Instant,
    pub duration: Duration,
    pub read_count: usize,
    pub skip_count: usize,
    pub filter_count: usize,
    pub write_count: usize,
}

/// Copies rows from one or more sources to a sink.
///
/// Sources are drained in the order they were added. The first `skip` rows
/// of every source are discarded, rows rejected by any filter are dropped,
/// and processors run in order on the rest before they are written. The
/// sink is flushed once every source is exhausted.
///
/// # Examples
///
/// ```
/// use delimited_rs::core::{
///     options::DelimitedOptions,
///     pipeline::PipelineBuilder,
/// };
/// use delimited_rs::item::{
///     stream_reader::DelimitedStreamReaderBuilder,
///     stream_writer::DelimitedStreamWriterBuilder,
/// };
///
/// let january = DelimitedStreamReaderBuilder::new()
///     .options(DelimitedOptions::csv())
///     .from_reader("Name,Age\nWile,3\n".as_bytes());
/// let february = DelimitedStreamReaderBuilder::new()
///     .options(DelimitedOptions::csv())
///     .from_reader("Name,Age\nRoad Runner,11\n".as_bytes());
/// let writer = DelimitedStreamWriterBuilder::new()
///     .options(DelimitedOptions::tsv())
///     .from_writer(Vec::new());
///
/// let result = PipelineBuilder::new()
///     .reader(&january)
///     .reader(&february)
///     .skip(1)
///     .processor(|mut row| {
///         row[0] = row[0].to_uppercase();
///         row
///     })
///     .build()
///     .write(&writer)
///     .unwrap();
///
/// assert_eq!(result.write_count, 2);
/// let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();
/// assert_eq!(output, "WILE\t3\r\nROAD RUNNER\t11\r\n");
/// ```
pub struct Pipeline<'a> {
    readers: Vec<&'a dyn RowReader>,
    filters: Vec<Filter<'a>>,
    processors: Vec<Processor<'a>>,
    skip: usize,
    read_count: Cell<usize>,
    skip_count: Cell<usize>,
    filter_count: Cell<usize>,
    write_count: Cell<usize>,
}

impl Pipeline<'_> {
    pub fn write(&self, writer: &dyn RowWriter) -> Result<PipelineResult> {
        let start = Instant::now();
        debug!("Start of pipeline over {} readers", self.readers.len());

        for (index, reader) in self.readers.iter().enumerate() {
            self.drain(*reader, writer)?;
            debug!("Reader {} drained", index);
        }

        writer.flush()?;
        debug!(
            "End of pipeline: {} read, {} written",
            self.read_count.get(),
            self.write_count.get()
        );

        Ok(PipelineResult {
            start,
            end: Instant::now(),
            duration: start.elapsed(),
            read_count: self.read_count.get(),
            skip_count: self.skip_count.get(),
            filter_count: self.filter_count.get(),
            write_count: self.write_count.get(),
        })
    }

    fn drain(&self, reader: &dyn RowReader, writer: &dyn RowWriter) -> Result<()> {
        for _ in 0..self.skip {
            if reader.read_line()?.is_none() {
                return Ok(());
            }
            Self::inc(&self.skip_count);
        }

        while let Some(row) = reader.read_line()? {
            Self::inc(&self.read_count);

            if !self.filters.iter().all(|keep| keep(&row)) {
                Self::inc(&self.filter_count);
                continue;
            }

            let row = self
                .processors
                .iter()
                .fold(row, |current, processor| processor(current));
            writer.write_line(&row)?;
            Self::inc(&self.write_count);
        }
        Ok(())
    }

    fn inc(counter: &Cell<usize>) {
        counter.set(counter.get() + 1);
    }
}

#[derive(Default)]
pub struct PipelineBuilder<'a> {
    readers: Vec<&'a dyn RowReader>,
    filters: Vec<Filter<'a>>,
    processors: Vec<Processor<'a>>,
    skip: usize,
}

impl<'a> PipelineBuilder<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a source; sources are read one after the other.
    pub fn reader(mut self, reader: &'a impl RowReader) -> Self {
        self.readers.push(reader);
        self
    }

    /// Keeps only rows for which `filter` returns `true`.
    ///
    /// Filters are keep predicates, not exclusion predicates: with several
    /// filters a row is written only when every one of them returns `true`,
    /// and a single `false` drops it.
    pub fn filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&[String]) -> bool + 'a,
    {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn processor<F>(mut self, processor: F) -> Self
    where
        F: Fn(Row) -> Row + 'a,
    {
        self.processors.push(Box::new(processor));
        self
    }

    /// Rows to discard at the start of each source.
    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    pub fn build(self) -> Pipeline<'a> {
        Pipeline {
            readers: self.readers,
            filters: self.filters,
            processors: self.processors,
            skip: self.skip,
            read_count: Cell::new(0),
            skip_count: Cell::new(0),
            filter_count: Cell::new(0),
            write_count: Cell::new(0),
        }
    }
}

/// Copies every row of `input` after the first `skip` to `output`.
///
/// With a CSV reader and a TSV writer this converts between the formats.
pub fn pipe(input: &dyn RowReader, output: &dyn RowWriter, skip: usize) -> Result<PipelineResult> {
    PipelineBuilder {
        readers: vec![input],
        ..PipelineBuilder::default()
    }
    .skip(skip)
    .build()
    .write(output)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use crate::{
        core::item::RowWriterResult,
        error::DelimitedError,
    };

    use super::*;

    struct VecReader {
        rows: RefCell<Vec<Row>>,
    }

    impl VecReader {
        fn new(rows: &[&[&str]]) -> Self {
            let mut rows: Vec<Row> = rows
                .iter()
                .map(|r| r.iter().map(|f| f.to_string()).collect())
                .collect();
            rows.reverse();
            Self {
                rows: RefCell::new(rows),
            }
        }
    }

    impl RowReader for VecReader {
        fn read_line(&self) -> Result<Option<Row>> {
            Ok(self.rows.borrow_mut().pop())
        }
    }

    #[derive(Default)]
    struct VecWriter {
        rows: RefCell<Vec<Row>>,
        flushed: Cell<bool>,
    }

    impl RowWriter for VecWriter {
        fn write_line(&self, fields: &[String]) -> RowWriterResult {
            self.rows.borrow_mut().push(fields.to_vec());
            Ok(())
        }

        fn flush(&self) -> RowWriterResult {
            self.flushed.set(true);
            Ok(())
        }
    }

    #[test]
    fn should_concatenate_skip_filter_and_process() -> Result<()> {
        let first = VecReader::new(&[&["h"], &["1"], &["2"], &["3"]]);
        let second = VecReader::new(&[&["h"], &["4"]]);
        let writer = VecWriter::default();

        let result = PipelineBuilder::new()
            .reader(&first)
            .reader(&second)
            .skip(1)
            .filter(|row| row[0] != "2")
            .processor(|mut row| {
                row.push("x".to_string());
                row
            })
            .processor(|row| row.into_iter().rev().collect())
            .build()
            .write(&writer)?;

        assert_eq!(
            writer.rows.borrow().clone(),
            vec![vec!["x", "1"], vec!["x", "3"], vec!["x", "4"]]
        );
        assert!(writer.flushed.get());
        assert_eq!(result.read_count, 4);
        assert_eq!(result.skip_count, 2);
        assert_eq!(result.filter_count, 1);
        assert_eq!(result.write_count, 3);
        Ok(())
    }

    #[test]
    fn one_rejecting_filter_should_drop_the_row() -> Result<()> {
        let reader = VecReader::new(&[&["keep", "1"], &["drop", "1"], &["keep", "2"]]);
        let writer = VecWriter::default();

        let result = PipelineBuilder::new()
            .reader(&reader)
            .filter(|row| row[0] == "keep")
            .filter(|row| row[1] == "1")
            .build()
            .write(&writer)?;

        assert_eq!(writer.rows.borrow().clone(), vec![vec!["keep", "1"]]);
        assert_eq!(result.filter_count, 2);
        Ok(())
    }

    #[test]
    fn skip_beyond_end_should_not_fail() -> Result<()> {
        let reader = VecReader::new(&[&["only"]]);
        let writer = VecWriter::default();

        let result = pipe(&reader, &writer, 5)?;

        assert_eq!(result.write_count, 0);
        assert!(writer.rows.borrow().is_empty());
        Ok(())
    }

    struct FailingReader;

    impl RowReader for FailingReader {
        fn read_line(&self) -> Result<Option<Row>> {
            Err(DelimitedError::Stream("disk on fire".to_string()))
        }
    }

    #[test]
    fn reader_errors_should_stop_the_pipeline() {
        let writer = VecWriter::default();
        let result = pipe(&FailingReader, &writer, 0);

        assert!(matches!(result, Err(DelimitedError::Stream(_))));
        assert!(!writer.flushed.get());
    }
}
