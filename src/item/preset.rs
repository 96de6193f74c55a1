use crate::{
    core::options::DelimitedOptions,
    item::{
        stream_reader::DelimitedStreamReaderBuilder, stream_writer::DelimitedStreamWriterBuilder,
    },
    mapping::schema::Record,
    row::enumerator::RowEnumeratorBuilder,
    serializer::{deserialize::DeserializerBuilder, serialize::SerializerBuilder},
};

/// Builders preconfigured for one delimited format.
///
/// # Examples
///
/// ```
/// use delimited_rs::core::item::{RowReader, RowWriter};
/// use delimited_rs::item::preset::{Csv, Preset, Tsv};
///
/// let reader = Csv::reader().from_reader("\"Hello, World\",2".as_bytes());
/// let writer = Tsv::writer().from_writer(Vec::new());
///
/// while let Some(row) = reader.read_line().unwrap() {
///     writer.write_line(&row).unwrap();
/// }
///
/// let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();
/// assert_eq!(output, "Hello, World\t2\r\n");
/// ```
pub trait Preset {
    const OPTIONS: DelimitedOptions;

    fn reader() -> DelimitedStreamReaderBuilder {
        DelimitedStreamReaderBuilder::new().options(Self::OPTIONS)
    }

    fn writer() -> DelimitedStreamWriterBuilder {
        DelimitedStreamWriterBuilder::new().options(Self::OPTIONS)
    }

    fn deserializer<T: Record>() -> DeserializerBuilder<T> {
        DeserializerBuilder::new().options(Self::OPTIONS)
    }

    fn serializer<T: Record>() -> SerializerBuilder<T> {
        SerializerBuilder::new().options(Self::OPTIONS)
    }

    fn enumerator() -> RowEnumeratorBuilder {
        RowEnumeratorBuilder::new().options(Self::OPTIONS)
    }
}

/// Comma separated values, `"` qualified.
pub struct Csv;

impl Preset for Csv {
    const OPTIONS: DelimitedOptions = DelimitedOptions::csv();
}

/// Tab separated values, `"` qualified.
pub struct Tsv;

impl Preset for Tsv {
    const OPTIONS: DelimitedOptions = DelimitedOptions::tsv();
}
