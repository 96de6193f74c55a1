use crate::{
    convert::value::FieldValue,
    mapping::binding::{Accessor, FieldRead, FieldReadBinding, FieldWrite, FieldWriteBinding},
};

/// A type that can be read from and written to delimited rows.
///
/// `describe` declares each property once, with the metadata used when
/// reading, writing or both. Declaration order is binding order.
///
/// # Examples
///
/// ```
/// use delimited_rs::mapping::{
///     binding::{FieldRead, FieldWrite},
///     schema::{Record, Schema},
/// };
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
///             .property("Name", |p: &Person| p.name.clone(), |p, v| p.name = v)
///             .read(FieldRead::heading("Name"))
///             .write(FieldWrite::heading("Name").column_index(0));
///         schema
///             .property("Age", |p: &Person| p.age, |p, v| p.age = v)
///             .read(FieldRead::heading("Age").required(true))
///             .write(FieldWrite::heading("Age").column_index(1));
///     }
/// }
///
/// let schema = Schema::<Person>::of();
/// assert_eq!(schema.read_bindings().len(), 2);
/// assert!(schema.accessor("Age").is_some());
/// ```
pub trait Record: Default + 'static {
    fn describe(schema: &mut Schema<Self>);
}

/// One declared property.
pub struct Property<T> {
    name: String,
    accessor: Accessor<T>,
    read: Option<FieldRead>,
    write: Option<FieldWrite>,
}

impl<T> Property<T> {
    pub fn read(&mut self, read: FieldRead) -> &mut Self {
        self.read = Some(read);
        self
    }

    pub fn write(&mut self, write: FieldWrite) -> &mut Self {
        self.write = Some(write);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The declared properties of a record type.
pub struct Schema<T> {
    properties: Vec<Property<T>>,
}

impl<T> Default for Schema<T> {
    fn default() -> Self {
        Self {
            properties: Vec::new(),
        }
    }
}

impl<T> Schema<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a property. Attach metadata with [`Property::read`] and
    /// [`Property::write`]; a property without either is never bound.
    pub fn property<V, G, S>(&mut self, name: &str, get: G, set: S) -> &mut Property<T>
    where
        T: 'static,
        V: FieldValue + 'static,
        G: Fn(&T) -> V + 'static,
        S: Fn(&mut T, V) + 'static,
    {
        self.properties.push(Property {
            name: name.to_string(),
            accessor: Accessor::new(get, set),
            read: None,
            write: None,
        });
        let last = self.properties.len() - 1;
        &mut self.properties[last]
    }

    /// Looks a property up by exact name.
    pub fn accessor(&self, name: &str) -> Option<Accessor<T>> {
        self.properties
            .iter()
            .find(|property| property.name == name)
            .map(|property| property.accessor.clone())
    }

    pub fn read_bindings(&self) -> Vec<FieldReadBinding<T>> {
        self.properties
            .iter()
            .filter_map(|property| {
                property.read.as_ref().map(|field| FieldReadBinding {
                    property: property.name.clone(),
                    accessor: property.accessor.clone(),
                    field: field.clone(),
                })
            })
            .collect()
    }

    pub fn write_bindings(&self) -> Vec<FieldWriteBinding<T>> {
        self.properties
            .iter()
            .filter_map(|property| {
                property.write.as_ref().map(|field| FieldWriteBinding {
                    property: property.name.clone(),
                    accessor: property.accessor.clone(),
                    field: field.clone(),
                })
            })
            .collect()
    }
}

impl<T: Record> Schema<T> {
    /// Builds the schema `T` declares.
    pub fn of() -> Self {
        let mut schema = Self::new();
        T::describe(&mut schema);
        schema
    }
}
