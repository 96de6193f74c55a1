use std::{
    cell::Cell,
    fs::File,
    io::Write,
    path::Path,
};

use log::debug;

use crate::{
    convert::culture::Culture,
    core::{
        emitter::DelimitedSeparatedWriter,
        item::{Row, RowWriter},
        options::{DelimitedOptions, Terminator},
    },
    error::Result,
    item::stream_writer::{DelimitedStreamWriter, DelimitedStreamWriterBuilder},
    mapping::{
        binding::FieldWriteBinding,
        schema::{Record, Schema},
    },
    serializer::options::SerializeOptions,
};

/// Orders bindings by column index. Bindings without an index sort as if
/// their index were the number of bindings; ties keep declaration order.
pub fn sort_bindings<T>(bindings: &mut [FieldWriteBinding<T>]) {
    let unset = bindings.len();
    bindings.sort_by_key(|binding| binding.field.column_index.unwrap_or(unset));
}

/// Writes records of type `T` as rows.
///
/// With headings enabled the header row is written before the first record,
/// or by [`finish`](Serializer::finish) when no record was written.
///
/// # Examples
///
/// ```
/// use delimited_rs::core::options::DelimitedOptions;
/// use delimited_rs::mapping::{binding::FieldWrite, schema::{Record, Schema}};
/// use delimited_rs::serializer::serialize::SerializerBuilder;
///
/// #[derive(Default)]
/// struct Person {
///     name: String,
///     age: i32,
/// }
///
/// impl Record for Person {
///     fn describe(schema: &mut Schema<Self>) {
///         schema
///             .property("Age", |p: &Person| p.age, |p, v| p.age = v)
///             .write(FieldWrite::heading("Age").column_index(1));
///         schema
///             .property("Name", |p: &Person| p.name.clone(), |p, v| p.name = v)
///             .write(FieldWrite::heading("Name").column_index(0));
///     }
/// }
///
/// let serializer = SerializerBuilder::new()
///     .options(DelimitedOptions::csv())
///     .include_headings(true)
///     .from_writer(Vec::new());
///
/// serializer
///     .serialize(&Person { name: "Road Runner".to_string(), age: 11 })
///     .unwrap();
///
/// let output = String::from_utf8(serializer.finish().unwrap()).unwrap();
/// assert_eq!(output, "Name,Age\r\nRoad Runner,11\r\n");
/// ```
pub struct Serializer<W, T> {
    writer: W,
    bindings: Vec<FieldWriteBinding<T>>,
    include_headings: bool,
    culture: Culture,
    headings_written: Cell<bool>,
}

impl<W: RowWriter, T: Record> Serializer<W, T> {
    pub fn new(writer: W, mut options: SerializeOptions<T>) -> Self {
        let mut bindings = options
            .mappings
            .take()
            .unwrap_or_else(|| Schema::<T>::of().write_bindings());
        sort_bindings(&mut bindings);

        Self {
            writer,
            bindings,
            include_headings: options.include_headings,
            culture: options.culture,
            headings_written: Cell::new(false),
        }
    }

    /// Bindings in output order.
    pub fn bindings(&self) -> &[FieldWriteBinding<T>] {
        &self.bindings
    }

    /// Heading of each output column; empty for bindings without one.
    pub fn headings(&self) -> Row {
        self.bindings
            .iter()
            .map(|binding| binding.field.heading.clone().unwrap_or_default())
            .collect()
    }

    fn write_headings_once(&self) -> Result<()> {
        if self.include_headings && !self.headings_written.get() {
            self.writer.write_line(&self.headings())?;
            self.headings_written.set(true);
            debug!("Header row written");
        }
        Ok(())
    }

    pub fn serialize(&self, record: &T) -> Result<()> {
        self.write_headings_once()?;
        let row: Row = self
            .bindings
            .iter()
            .map(|binding| binding.accessor.get(record, &self.culture))
            .collect();
        self.writer.write_line(&row)
    }

    /// Writes the header row (when enabled) followed by every record.
    pub fn serialize_all<'a, I>(&self, records: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a T>,
    {
        self.write_headings_once()?;
        let mut count = 0;
        for record in records {
            self.serialize(record)?;
            count += 1;
        }
        debug!("{} records serialized", count);
        Ok(())
    }

    pub fn flush(&self) -> Result<()> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write, T: Record> Serializer<DelimitedStreamWriter<W>, T> {
    /// Completes the output and hands back the underlying writer.
    pub fn finish(self) -> Result<W> {
        self.write_headings_once()?;
        self.writer.into_inner()
    }
}

/// A builder for [`Serializer`] over a delimited stream.
pub struct SerializerBuilder<T> {
    writer: DelimitedStreamWriterBuilder,
    options: SerializeOptions<T>,
}

impl<T> Default for SerializerBuilder<T> {
    fn default() -> Self {
        Self {
            writer: DelimitedStreamWriterBuilder::new(),
            options: SerializeOptions::default(),
        }
    }
}

impl<T: Record> SerializerBuilder<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(mut self, options: DelimitedOptions) -> Self {
        self.writer = self.writer.options(options);
        self
    }

    pub fn terminator(mut self, terminator: Terminator) -> Self {
        self.writer = self.writer.terminator(terminator);
        self
    }

    /// Replaces every serialize option at once.
    pub fn serialize_options(mut self, options: SerializeOptions<T>) -> Self {
        self.options = options;
        self
    }

    pub fn include_headings(mut self, yes: bool) -> Self {
        self.options.include_headings = yes;
        self
    }

    pub fn mappings(mut self, mappings: Vec<FieldWriteBinding<T>>) -> Self {
        self.options.mappings = Some(mappings);
        self
    }

    pub fn culture(mut self, culture: Culture) -> Self {
        self.options.culture = culture;
        self
    }

    pub fn from_writer<W: Write>(self, wtr: W) -> Serializer<DelimitedStreamWriter<W>, T> {
        Serializer::new(self.writer.from_writer(wtr), self.options)
    }

    pub fn from_path<P: AsRef<Path>>(
        self,
        path: P,
    ) -> Result<Serializer<DelimitedStreamWriter<File>, T>> {
        Ok(Serializer::new(self.writer.from_path(path)?, self.options))
    }
}

/// Writes `records` to `wtr` and returns it once everything is flushed.
pub fn serialize<T: Record, W: Write>(
    options: DelimitedOptions,
    wtr: W,
    records: &[T],
    serialize_options: SerializeOptions<T>,
) -> Result<W> {
    let serializer = Serializer::new(
        DelimitedStreamWriter::new(DelimitedSeparatedWriter::new(options), wtr),
        serialize_options,
    );
    serializer.serialize_all(records)?;
    serializer.finish()
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use crate::mapping::binding::{Accessor, FieldWrite};

    use super::*;

    #[derive(Default)]
    struct Item {
        code: String,
        price: f64,
        note: Option<String>,
    }

    impl Record for Item {
        fn describe(schema: &mut Schema<Self>) {
            schema
                .property("Note", |i: &Item| i.note.clone(), |i, v| i.note = v)
                .write(FieldWrite::heading("Note"));
            schema
                .property("Price", |i: &Item| i.price, |i, v| i.price = v)
                .write(FieldWrite::heading("Price").column_index(1));
            schema
                .property("Code", |i: &Item| i.code.clone(), |i, v| i.code = v)
                .write(FieldWrite::heading("Code").column_index(0));
        }
    }

    fn items() -> Vec<Item> {
        vec![
            Item {
                code: "A1".to_string(),
                price: 2.5,
                note: None,
            },
            Item {
                code: "B,2".to_string(),
                price: 10.0,
                note: Some("say \"hi\"".to_string()),
            },
        ]
    }

    #[test]
    fn should_order_columns_by_index() -> std::result::Result<(), Box<dyn Error>> {
        let output = serialize(
            DelimitedOptions::csv(),
            Vec::new(),
            &items(),
            SerializeOptions {
                include_headings: true,
                ..SerializeOptions::default()
            },
        )?;

        assert_eq!(
            String::from_utf8(output)?,
            "Code,Price,Note\r\nA1,2.5,\r\n\"B,2\",10,\"say \"\"hi\"\"\"\r\n"
        );
        Ok(())
    }

    #[test]
    fn headings_are_optional() -> std::result::Result<(), Box<dyn Error>> {
        let output = serialize(
            DelimitedOptions::tsv(),
            Vec::new(),
            &items()[..1],
            SerializeOptions::default(),
        )?;

        assert_eq!(String::from_utf8(output)?, "A1\t2.5\t\r\n");
        Ok(())
    }

    #[test]
    fn header_should_be_written_without_records() -> std::result::Result<(), Box<dyn Error>> {
        let serializer = SerializerBuilder::<Item>::new()
            .options(DelimitedOptions::csv())
            .include_headings(true)
            .terminator(Terminator::LF)
            .from_writer(Vec::new());

        assert_eq!(String::from_utf8(serializer.finish()?)?, "Code,Price,Note\n");
        Ok(())
    }

    #[test]
    fn unset_indexes_should_sort_as_list_length() {
        let accessor = Accessor::new(|i: &Item| i.code.clone(), |i: &mut Item, v| i.code = v);
        let binding = |heading: &str, column_index: Option<usize>| FieldWriteBinding {
            property: heading.to_string(),
            accessor: accessor.clone(),
            field: FieldWrite {
                heading: Some(heading.to_string()),
                column_index,
            },
        };

        let mut bindings = vec![
            binding("unset", None),
            binding("five", Some(5)),
            binding("three", Some(3)),
            binding("zero", Some(0)),
        ];
        sort_bindings(&mut bindings);

        let order: Vec<_> = bindings.iter().map(|b| b.property.as_str()).collect();
        assert_eq!(order, vec!["zero", "three", "unset", "five"]);
    }

    #[test]
    fn mappings_should_override_schema() -> std::result::Result<(), Box<dyn Error>> {
        let mappings = vec![FieldWriteBinding {
            property: "Code".to_string(),
            accessor: Accessor::new(|i: &Item| i.code.clone(), |i: &mut Item, v| i.code = v),
            field: FieldWrite::heading("Id"),
        }];

        let serializer = SerializerBuilder::new()
            .options(DelimitedOptions::csv())
            .include_headings(true)
            .mappings(mappings)
            .from_writer(Vec::new());
        serializer.serialize_all(&items())?;

        assert_eq!(
            String::from_utf8(serializer.finish()?)?,
            "Id\r\nA1\r\n\"B,2\"\r\n"
        );
        Ok(())
    }
}
