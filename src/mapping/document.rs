use std::{fs, path::Path};

use log::{debug, warn};
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::{
    error::{DelimitedError, Result},
    mapping::{
        binding::{Accessor, FieldRead, FieldReadBinding, FieldWrite, FieldWriteBinding},
        schema::{Record, Schema},
    },
};

/// Root of an external mapping document. The root element name is not
/// checked.
#[derive(Debug, Deserialize)]
struct MappingDocument {
    #[serde(rename = "Mapping", default)]
    mappings: Vec<MappingEntry>,
}

#[derive(Debug, Deserialize)]
struct MappingEntry {
    #[serde(rename = "@Property")]
    property: Option<String>,
    #[serde(rename = "@Heading")]
    heading: Option<String>,
    #[serde(rename = "@ColumnIndex")]
    column_index: Option<String>,
    #[serde(rename = "@Required")]
    required: Option<String>,
}

impl MappingEntry {
    fn column_index(&self) -> Result<Option<usize>> {
        match self.column_index.as_deref().map(str::trim) {
            None => Ok(None),
            Some(raw) => {
                let index = raw.parse::<i64>().map_err(|e| {
                    DelimitedError::MappingDocument(format!("Invalid ColumnIndex '{}': {}", raw, e))
                })?;
                Ok(usize::try_from(index).ok())
            }
        }
    }

    fn required(&self) -> Result<bool> {
        match self.required.as_deref().map(str::trim) {
            None => Ok(false),
            Some(raw) if raw.eq_ignore_ascii_case("true") => Ok(true),
            Some(raw) if raw.eq_ignore_ascii_case("false") => Ok(false),
            Some(raw) => Err(DelimitedError::MappingDocument(format!(
                "Invalid Required '{}': expected true or false",
                raw
            ))),
        }
    }
}

fn parse_document(document: &str) -> Result<Vec<MappingEntry>> {
    let parsed: MappingDocument =
        from_str(document).map_err(|e| DelimitedError::MappingDocument(e.to_string()))?;
    debug!("Mapping document has {} entries", parsed.mappings.len());
    Ok(parsed.mappings)
}

/// Builds read bindings for `T` from a mapping document.
///
/// ```xml
/// <DelimitedSerializerMappings>
///   <Mapping Heading="Name" Property="Name" Required="true"/>
///   <Mapping Heading="Age" ColumnIndex="1" Property="Age"/>
/// </DelimitedSerializerMappings>
/// ```
///
/// Entries naming a property `T` does not declare are skipped. A negative
/// `ColumnIndex` leaves the index unset.
pub fn generate_read_mappings<T: Record>(document: &str) -> Result<Vec<FieldReadBinding<T>>> {
    let schema = Schema::<T>::of();
    let mut bindings = Vec::new();

    for entry in parse_document(document)? {
        let Some((property, accessor)) = lookup(&schema, &entry) else {
            continue;
        };
        bindings.push(FieldReadBinding {
            property,
            accessor,
            field: FieldRead {
                heading: entry.heading.clone(),
                column_index: entry.column_index()?,
                required: entry.required()?,
                alternate_names: Vec::new(),
            },
        });
    }

    Ok(bindings)
}

/// Builds write bindings for `T` from a mapping document. `Required` is
/// ignored.
pub fn generate_write_mappings<T: Record>(document: &str) -> Result<Vec<FieldWriteBinding<T>>> {
    let schema = Schema::<T>::of();
    let mut bindings = Vec::new();

    for entry in parse_document(document)? {
        let Some((property, accessor)) = lookup(&schema, &entry) else {
            continue;
        };
        bindings.push(FieldWriteBinding {
            property,
            accessor,
            field: FieldWrite {
                heading: entry.heading.clone(),
                column_index: entry.column_index()?,
            },
        });
    }

    Ok(bindings)
}

pub fn read_mappings_from_path<T: Record, P: AsRef<Path>>(
    path: P,
) -> Result<Vec<FieldReadBinding<T>>> {
    generate_read_mappings(&load(path.as_ref())?)
}

pub fn write_mappings_from_path<T: Record, P: AsRef<Path>>(
    path: P,
) -> Result<Vec<FieldWriteBinding<T>>> {
    generate_write_mappings(&load(path.as_ref())?)
}

fn load(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        DelimitedError::Stream(format!(
            "Unable to read mapping document {}: {}",
            path.display(),
            e
        ))
    })
}

fn lookup<T>(schema: &Schema<T>, entry: &MappingEntry) -> Option<(String, Accessor<T>)> {
    let name = entry.property.as_deref()?;
    match schema.accessor(name) {
        Some(accessor) => Some((name.to_string(), accessor)),
        None => {
            warn!("Mapping for unknown property {} skipped", name);
            None
        }
    }
}
