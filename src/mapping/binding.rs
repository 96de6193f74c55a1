use std::{fmt, sync::Arc};

use crate::{
    convert::{
        culture::Culture,
        value::{FieldValue, coerce},
    },
    error::Result,
};

type Getter<T> = dyn Fn(&T, &Culture) -> String;
type Setter<T> = dyn Fn(&mut T, &str, &Culture) -> Result<()>;

/// Type-erased get/set pair for one property of `T`.
///
/// The getter formats the property as a field, the setter converts a raw
/// field and assigns it.
pub struct Accessor<T> {
    get: Arc<Getter<T>>,
    set: Arc<Setter<T>>,
}

impl<T> Clone for Accessor<T> {
    fn clone(&self) -> Self {
        Self {
            get: Arc::clone(&self.get),
            set: Arc::clone(&self.set),
        }
    }
}

impl<T> Accessor<T> {
    pub fn new<V, G, S>(get: G, set: S) -> Self
    where
        T: 'static,
        V: FieldValue + 'static,
        G: Fn(&T) -> V + 'static,
        S: Fn(&mut T, V) + 'static,
    {
        Self {
            get: Arc::new(move |record: &T, culture: &Culture| {
                get(record).format_field(culture)
            }),
            set: Arc::new(move |record: &mut T, raw: &str, culture: &Culture| {
                set(record, coerce::<V>(raw, culture)?);
                Ok(())
            }),
        }
    }

    pub fn get(&self, record: &T, culture: &Culture) -> String {
        (self.get)(record, culture)
    }

    pub fn set(&self, record: &mut T, raw: &str, culture: &Culture) -> Result<()> {
        (self.set)(record, raw, culture)
    }
}

/// Read metadata: where a property's value comes from.
///
/// # Examples
///
/// ```
/// use delimited_rs::mapping::binding::FieldRead;
///
/// let read = FieldRead::heading("Name")
///     .alternate_names(["Full Name", "FullName"])
///     .required(true);
///
/// assert_eq!(read.heading.as_deref(), Some("Name"));
/// assert!(read.required);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldRead {
    pub heading: Option<String>,
    pub column_index: Option<usize>,
    pub required: bool,
    pub alternate_names: Vec<String>,
}

impl FieldRead {
    pub fn heading<S: Into<String>>(heading: S) -> Self {
        Self {
            heading: Some(heading.into()),
            ..Self::default()
        }
    }

    pub fn column(column_index: usize) -> Self {
        Self {
            column_index: Some(column_index),
            ..Self::default()
        }
    }

    pub fn column_index(mut self, column_index: usize) -> Self {
        self.column_index = Some(column_index);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn alternate_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.alternate_names = names.into_iter().map(Into::into).collect();
        self
    }
}

/// Write metadata: heading and column position of a property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldWrite {
    pub heading: Option<String>,
    pub column_index: Option<usize>,
}

impl FieldWrite {
    pub fn heading<S: Into<String>>(heading: S) -> Self {
        Self {
            heading: Some(heading.into()),
            column_index: None,
        }
    }

    pub fn column(column_index: usize) -> Self {
        Self {
            heading: None,
            column_index: Some(column_index),
        }
    }

    pub fn column_index(mut self, column_index: usize) -> Self {
        self.column_index = Some(column_index);
        self
    }
}

/// A property of `T` paired with its read metadata.
pub struct FieldReadBinding<T> {
    pub property: String,
    pub accessor: Accessor<T>,
    pub field: FieldRead,
}

impl<T> Clone for FieldReadBinding<T> {
    fn clone(&self) -> Self {
        Self {
            property: self.property.clone(),
            accessor: self.accessor.clone(),
            field: self.field.clone(),
        }
    }
}

impl<T> fmt::Debug for FieldReadBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldReadBinding")
            .field("property", &self.property)
            .field("field", &self.field)
            .finish()
    }
}

/// A property of `T` paired with its write metadata.
pub struct FieldWriteBinding<T> {
    pub property: String,
    pub accessor: Accessor<T>,
    pub field: FieldWrite,
}

impl<T> Clone for FieldWriteBinding<T> {
    fn clone(&self) -> Self {
        Self {
            property: self.property.clone(),
            accessor: self.accessor.clone(),
            field: self.field.clone(),
        }
    }
}

impl<T> fmt::Debug for FieldWriteBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldWriteBinding")
            .field("property", &self.property)
            .field("field", &self.field)
            .finish()
    }
}
