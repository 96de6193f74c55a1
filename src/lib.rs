#![cfg_attr(docsrs, feature(doc_cfg))]
//#![warn(missing_docs)]

/*!
 # Delimited for Rust

 Read and write delimited text such as CSV and TSV, either as raw rows, as
 rows of inferred values or as typed records.

 ## Core Concepts

- **RowReader / RowWriter:** a source or sink of rows, one physical line at a time.
  [`DelimitedStreamReader`](item::stream_reader::DelimitedStreamReader) and
  [`DelimitedStreamWriter`](item::stream_writer::DelimitedStreamWriter) implement them
  over any `std::io` stream.
- **Record:** a type that describes its properties once, with the heading or
  column each one is read from and written to.
- **Deserializer / Serializer:** turn rows into records and records into rows.
- **RowEnumerator:** yields untyped [`DelimitedRow`](row::DelimitedRow)s whose
  values are typed on demand.
- **Pipeline:** copies rows from one or more readers to a writer, with skip,
  filter and processing stages.

 ## Features

| **Feature**   | **Description**                                               |
|---------------|---------------------------------------------------------------|
| xml           | Enables loading field mappings from an XML document (default) |
| async         | Enables `tokio` based stream readers and writers              |
| full          | Enables all available features                                |

 ## Getting Started

```rust
use delimited_rs::{
    item::preset::{Csv, Preset},
    mapping::{
        binding::{FieldRead, FieldWrite},
        schema::{Record, Schema},
    },
    DelimitedError,
};

#[derive(Default, Debug, PartialEq)]
struct Character {
    name: String,
    age: i32,
}

impl Record for Character {
    fn describe(schema: &mut Schema<Self>) {
        schema
            .property("Name", |c: &Character| c.name.clone(), |c, v| c.name = v)
            .read(FieldRead::heading("Name").required(true))
            .write(FieldWrite::heading("Name").column_index(0));
        schema
            .property("Age", |c: &Character| c.age, |c, v| c.age = v)
            .read(FieldRead::heading("Age"))
            .write(FieldWrite::heading("Age").column_index(1));
    }
}

fn main() -> Result<(), DelimitedError> {
    let serializer = Csv::serializer().include_headings(true).from_writer(Vec::new());
    serializer.serialize(&Character { name: "Road Runner".to_string(), age: 11 })?;
    serializer.serialize(&Character { name: "Wile E. Coyote".to_string(), age: 12 })?;

    let output = String::from_utf8(serializer.finish()?)
        .map_err(|e| DelimitedError::Stream(e.to_string()))?;
    assert_eq!(output, "Name,Age\r\nRoad Runner,11\r\nWile E. Coyote,12\r\n");

    let characters = Csv::deserializer::<Character>()
        .from_str(&output)
        .collect::<Result<Vec<_>, _>>()?;
    assert_eq!(characters[1].name, "Wile E. Coyote");

    Ok(())
}
```

 ## License
 Licensed under either of

 -   Apache License, Version 2.0
     ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
 -   MIT license
     ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)

 at your option.
 */

/// Value conversion and culture-sensitive formatting
pub mod convert;

/// Row traits, delimiter options, tokenizer, emitter and pipeline
pub mod core;

/// Error types
pub mod error;

#[doc(inline)]
pub use error::*;

/// Stream readers and writers, and CSV/TSV presets
pub mod item;

/// Field bindings between record properties and columns
pub mod mapping;

/// Untyped rows with inferred values
pub mod row;

/// Typed record readers and writers
pub mod serializer;
