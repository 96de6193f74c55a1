use std::{fs::File, io::Read, path::Path};

use log::debug;

use crate::{
    convert::culture::Culture,
    core::{
        item::{Row, RowReader},
        options::DelimitedOptions,
        tokenizer::DelimitedSeparatedReader,
    },
    error::{DelimitedError, Result},
    item::stream_reader::{DelimitedStreamReader, DelimitedStreamReaderBuilder},
    mapping::{
        binding::FieldReadBinding,
        resolver::{Probe, resolve},
        schema::{Record, Schema},
    },
    serializer::options::DeserializeOptions,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Rows,
    Done,
}

/// Lazily reads records of type `T` from a row source.
///
/// Each call to `next` reads at most one data row. After the first error the
/// iterator is exhausted.
///
/// # Examples
///
/// ```
/// use delimited_rs::core::options::DelimitedOptions;
/// use delimited_rs::mapping::{binding::FieldRead, schema::{Record, Schema}};
/// use delimited_rs::serializer::deserialize::DeserializerBuilder;
///
/// #[derive(Default, Debug)]
/// struct Person {
///     name: String,
///     age: i32,
/// }
///
/// impl Record for Person {
///     fn describe(schema: &mut Schema<Self>) {
///         schema
///             .property("Name", |p: &Person| p.name.clone(), |p, v| p.name = v)
///             .read(FieldRead::heading("Name"));
///         schema
///             .property("Age", |p: &Person| p.age, |p, v| p.age = v)
///             .read(FieldRead::heading("Age"));
///     }
/// }
///
/// let data = "Name,Age\r\nRoad Runner,11\r\nCoyote,12";
/// let people: Vec<Person> = DeserializerBuilder::new()
///     .options(DelimitedOptions::csv())
///     .from_str(data)
///     .collect::<Result<_, _>>()
///     .unwrap();
///
/// assert_eq!(people.len(), 2);
/// assert_eq!(people[1].name, "Coyote");
/// assert_eq!(people[1].age, 12);
/// ```
pub struct Deserializer<R, T> {
    reader: R,
    bindings: Vec<FieldReadBinding<T>>,
    use_headings: bool,
    enforce_required_fields: bool,
    ignore_first_n_rows: usize,
    ignore_empty_rows: bool,
    culture: Culture,
    headings: Option<Row>,
    state: State,
    /// Raised by the previous record, returned on the following call.
    pending: Option<DelimitedError>,
}

impl<R: RowReader, T: Record> Deserializer<R, T> {
    pub fn new(reader: R, mut options: DeserializeOptions<T>) -> Self {
        let bindings = options
            .mappings
            .take()
            .unwrap_or_else(|| Schema::<T>::of().read_bindings());

        Self {
            reader,
            bindings,
            use_headings: options.use_headings,
            enforce_required_fields: options.enforce_required_fields,
            ignore_first_n_rows: options.ignore_first_n_rows,
            ignore_empty_rows: options.ignore_empty_rows,
            culture: options.culture,
            headings: None,
            state: State::Idle,
            pending: None,
        }
    }

    /// The header row, once it has been read.
    pub fn headings(&self) -> Option<&[String]> {
        self.headings.as_deref()
    }

    pub fn into_reader(self) -> R {
        self.reader
    }

    /// Skips leading rows and reads the header row. Returns `false` when the
    /// source ran out first.
    fn start(&mut self) -> Result<bool> {
        for skipped in 0..self.ignore_first_n_rows {
            if self.reader.read_line()?.is_none() {
                debug!("Source exhausted after skipping {} rows", skipped);
                return Ok(false);
            }
        }

        if !self.use_headings {
            return Ok(true);
        }

        let Some(headings) = self.reader.read_line()? else {
            return Ok(false);
        };

        let resolved = headings
            .iter()
            .any(|heading| resolve(&self.bindings, Probe::Heading(heading.as_str())).is_some());
        if !resolved {
            return Err(DelimitedError::Serialization(
                "Expected to find heading names within the first row of the data but none were found."
                    .to_string(),
            ));
        }

        debug!("Header row read: {:?}", headings);
        self.headings = Some(headings);
        Ok(true)
    }

    fn next_record(&mut self) -> Result<Option<T>> {
        let fields = match self.headings {
            Some(_) => self.reader.read_line_ignoring_empty(self.ignore_empty_rows)?,
            None => self.reader.read_line()?,
        };
        let Some(fields) = fields else {
            return Ok(None);
        };

        let mut record = T::default();
        let mut assigned = vec![false; self.bindings.len()];

        let probes: Vec<Probe<'_>> = match &self.headings {
            Some(headings) => headings
                .iter()
                .take(fields.len())
                .map(|heading| Probe::Heading(heading.as_str()))
                .collect(),
            None => (0..fields.len()).map(Probe::Column).collect(),
        };

        for (probe, field) in probes.into_iter().zip(fields.iter()) {
            if let Some(position) = resolve(&self.bindings, probe) {
                self.bindings[position]
                    .accessor
                    .set(&mut record, field, &self.culture)?;
                assigned[position] = true;
            }
        }

        if self.enforce_required_fields {
            self.pending = self.missing_required(&assigned);
        }

        Ok(Some(record))
    }

    fn missing_required(&self, assigned: &[bool]) -> Option<DelimitedError> {
        let missing: Vec<&str> = self
            .bindings
            .iter()
            .zip(assigned)
            .filter(|(binding, assigned)| binding.field.required && !**assigned)
            .map(|(binding, _)| {
                binding
                    .field
                    .heading
                    .as_deref()
                    .unwrap_or(binding.property.as_str())
            })
            .collect();

        if missing.is_empty() {
            None
        } else {
            Some(DelimitedError::Serialization(format!(
                "One or more required fields were not supplied. Requires {}",
                missing.join(", ")
            )))
        }
    }

    fn fail(&mut self, error: DelimitedError) -> Option<Result<T>> {
        self.state = State::Done;
        Some(Err(error))
    }
}

impl<R: RowReader, T: Record> Iterator for Deserializer<R, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(error) = self.pending.take() {
            return self.fail(error);
        }

        if self.state == State::Idle {
            match self.start() {
                Ok(true) => self.state = State::Rows,
                Ok(false) => self.state = State::Done,
                Err(error) => return self.fail(error),
            }
        }

        if self.state == State::Done {
            return None;
        }

        match self.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                debug!("End of delimited data");
                self.state = State::Done;
                None
            }
            Err(error) => self.fail(error),
        }
    }
}

/// A builder for [`Deserializer`] over a delimited stream.
pub struct DeserializerBuilder<T> {
    reader: DelimitedStreamReaderBuilder,
    options: DeserializeOptions<T>,
}

impl<T> Default for DeserializerBuilder<T> {
    fn default() -> Self {
        Self {
            reader: DelimitedStreamReaderBuilder::new(),
            options: DeserializeOptions::default(),
        }
    }
}

impl<T: Record> DeserializerBuilder<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(mut self, options: DelimitedOptions) -> Self {
        self.reader = self.reader.options(options);
        self
    }

    /// Replaces every deserialize option at once.
    pub fn deserialize_options(mut self, options: DeserializeOptions<T>) -> Self {
        self.options = options;
        self
    }

    pub fn use_headings(mut self, yes: bool) -> Self {
        self.options.use_headings = yes;
        self
    }

    pub fn enforce_required_fields(mut self, yes: bool) -> Self {
        self.options.enforce_required_fields = yes;
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

    pub fn mappings(mut self, mappings: Vec<FieldReadBinding<T>>) -> Self {
        self.options.mappings = Some(mappings);
        self
    }

    pub fn culture(mut self, culture: Culture) -> Self {
        self.options.culture = culture;
        self
    }

    pub fn from_reader<R: Read>(self, rdr: R) -> Deserializer<DelimitedStreamReader<R>, T> {
        Deserializer::new(self.reader.from_reader(rdr), self.options)
    }

    pub fn from_str(self, data: &str) -> Deserializer<DelimitedStreamReader<&[u8]>, T> {
        self.from_reader(data.as_bytes())
    }

    pub fn from_path<P: AsRef<Path>>(
        self,
        path: P,
    ) -> Result<Deserializer<DelimitedStreamReader<File>, T>> {
        Ok(Deserializer::new(self.reader.from_path(path)?, self.options))
    }
}

/// Reads records of type `T` from `rdr`.
pub fn deserialize<T: Record, R: Read>(
    options: DelimitedOptions,
    rdr: R,
    deserialize_options: DeserializeOptions<T>,
) -> Deserializer<DelimitedStreamReader<R>, T> {
    Deserializer::new(
        DelimitedStreamReader::new(DelimitedSeparatedReader::new(options), rdr),
        deserialize_options,
    )
}
