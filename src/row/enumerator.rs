use std::{fs::File, io::Read, path::Path, sync::Arc};

use log::debug;

use crate::{
    convert::culture::Culture,
    core::{item::RowReader, options::DelimitedOptions},
    error::Result,
    item::stream_reader::{DelimitedStreamReader, DelimitedStreamReaderBuilder},
    row::DelimitedRow,
};

/// Lazily reads [`DelimitedRow`]s.
///
/// With headings the first row (after any skipped rows) names the columns
/// and empty rows may be skipped. Without headings every row is returned and
/// columns are named `Column1` to `ColumnN`.
///
/// # Examples
///
/// ```
/// use delimited_rs::core::options::DelimitedOptions;
/// use delimited_rs::row::enumerator::RowEnumeratorBuilder;
///
/// let data = "Name,Age\nRoad Runner,11\nCoyote,12\n";
/// let total: f64 = RowEnumeratorBuilder::new()
///     .options(DelimitedOptions::csv())
///     .from_str(data)
///     .filter_map(|row| row.ok())
///     .filter_map(|row| row.get("Age").and_then(|age| age.as_f64()))
///     .sum();
///
/// assert_eq!(total, 23.0);
/// ```
pub struct RowEnumerator<R> {
    reader: R,
    use_headings: bool,
    ignore_first_n_rows: usize,
    ignore_empty_rows: bool,
    culture: Arc<Culture>,
    headings: Option<Arc<[String]>>,
    started: bool,
    done: bool,
}

impl<R: RowReader> RowEnumerator<R> {
    pub fn new(reader: R, options: RowEnumeratorOptions) -> Self {
        Self {
            reader,
            use_headings: options.use_headings,
            ignore_first_n_rows: options.ignore_first_n_rows,
            ignore_empty_rows: options.ignore_empty_rows,
            culture: Arc::new(options.culture),
            headings: None,
            started: false,
            done: false,
        }
    }

    fn start(&mut self) -> Result<bool> {
        for _ in 0..self.ignore_first_n_rows {
            if self.reader.read_line()?.is_none() {
                return Ok(false);
            }
        }

        if self.use_headings {
            match self.reader.read_line()? {
                Some(headings) => {
                    debug!("Row headings: {:?}", headings);
                    self.headings = Some(headings.into());
                }
                None => return Ok(false),
            }
        }
        Ok(true)
    }

    fn next_row(&mut self) -> Result<Option<DelimitedRow>> {
        if !self.started {
            self.started = true;
            if !self.start()? {
                return Ok(None);
            }
        }

        let row = match &self.headings {
            Some(headings) => self
                .reader
                .read_line_ignoring_empty(self.ignore_empty_rows)?
                .map(|fields| {
                    DelimitedRow::with_culture(Arc::clone(headings), fields, Arc::clone(&self.culture))
                }),
            None => self.reader.read_line()?.map(|fields| {
                let headings = DelimitedRow::generated_headings(fields.len());
                DelimitedRow::with_culture(headings.into(), fields, Arc::clone(&self.culture))
            }),
        };
        Ok(row)
    }
}

impl<R: RowReader> Iterator for RowEnumerator<R> {
    type Item = Result<DelimitedRow>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_row() {
            Ok(Some(row)) => Some(Ok(row)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(error) => {
                self.done = true;
                Some(Err(error))
            }
        }
    }
}

/// Options for [`RowEnumerator`].
#[derive(Debug, Clone)]
pub struct RowEnumeratorOptions {
    pub use_headings: bool,
    pub ignore_first_n_rows: usize,
    pub ignore_empty_rows: bool,
    pub culture: Culture,
}

impl Default for RowEnumeratorOptions {
    fn default() -> Self {
        Self {
            use_headings: true,
            ignore_first_n_rows: 0,
            ignore_empty_rows: true,
            culture: Culture::default(),
        }
    }
}

/// A builder for [`RowEnumerator`] over a delimited stream.
#[derive(Default)]
pub struct RowEnumeratorBuilder {
    reader: DelimitedStreamReaderBuilder,
    options: RowEnumeratorOptions,
}

impl RowEnumeratorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(mut self, options: DelimitedOptions) -> Self {
        self.reader = self.reader.options(options);
        self
    }

    pub fn use_headings(mut self, yes: bool) -> Self {
        self.options.use_headings = yes;
        self
    }

    pub fn ignore_first_n_rows(mut self, rows: usize) -> Self {
        self.options.ignore_first_n_rows = rows;
        self
    }

    pub fn ignore_empty_rows(mut self, yes: bool) -> Self {
        self.options.ignore_empty_rows = yes;
        self
    }

    pub fn culture(mut self, culture: Culture) -> Self {
        self.options.culture = culture;
        self
    }

    pub fn from_reader<R: Read>(self, rdr: R) -> RowEnumerator<DelimitedStreamReader<R>> {
        RowEnumerator::new(self.reader.from_reader(rdr), self.options)
    }

    pub fn from_str(self, data: &str) -> RowEnumerator<DelimitedStreamReader<&[u8]>> {
        self.from_reader(data.as_bytes())
    }

    pub fn from_path<P: AsRef<Path>>(
        self,
        path: P,
    ) -> Result<RowEnumerator<DelimitedStreamReader<File>>> {
        Ok(RowEnumerator::new(self.reader.from_path(path)?, self.options))
    }
}
