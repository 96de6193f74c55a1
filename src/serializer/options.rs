use crate::{
    convert::culture::Culture,
    mapping::binding::{FieldReadBinding, FieldWriteBinding},
};

/// Options for reading records.
///
/// `mappings` replaces the bindings the record type declares.
pub struct DeserializeOptions<T> {
    pub use_headings: bool,
    pub enforce_required_fields: bool,
    pub ignore_first_n_rows: usize,
    pub ignore_empty_rows: bool,
    pub mappings: Option<Vec<FieldReadBinding<T>>>,
    pub culture: Culture,
}

impl<T> Default for DeserializeOptions<T> {
    fn default() -> Self {
        Self {
            use_headings: true,
            enforce_required_fields: false,
            ignore_first_n_rows: 0,
            ignore_empty_rows: true,
            mappings: None,
            culture: Culture::default(),
        }
    }
}

impl<T> Clone for DeserializeOptions<T> {
    fn clone(&self) -> Self {
        Self {
            use_headings: self.use_headings,
            enforce_required_fields: self.enforce_required_fields,
            ignore_first_n_rows: self.ignore_first_n_rows,
            ignore_empty_rows: self.ignore_empty_rows,
            mappings: self.mappings.clone(),
            culture: self.culture.clone(),
        }
    }
}

/// Options for writing records.
pub struct SerializeOptions<T> {
    pub include_headings: bool,
    pub mappings: Option<Vec<FieldWriteBinding<T>>>,
    pub culture: Culture,
}

impl<T> Default for SerializeOptions<T> {
    fn default() -> Self {
        Self {
            include_headings: false,
            mappings: None,
            culture: Culture::default(),
        }
    }
}

impl<T> Clone for SerializeOptions<T> {
    fn clone(&self) -> Self {
        Self {
            include_headings: self.include_headings,
            mappings: self.mappings.clone(),
            culture: self.culture.clone(),
        }
    }
}
