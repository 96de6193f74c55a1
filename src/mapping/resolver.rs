use crate::mapping::binding::FieldReadBinding;

/// Describes one column of the input while looking for its binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe<'a> {
    /// A column named by the header row.
    Heading(&'a str),
    /// A column known only by position.
    Column(usize),
}

/// Finds the binding a column should be written to.
///
/// Returns the position of the binding in `bindings`, or `None` when the
/// column has no destination.
///
/// # Examples
///
/// ```
/// use delimited_rs::mapping::{
///     binding::{Accessor, FieldRead, FieldReadBinding},
///     resolver::{Probe, resolve},
/// };
///
/// #[derive(Default)]
/// struct Person { name: String }
///
/// let bindings = vec![FieldReadBinding {
///     property: "name".to_string(),
///     accessor: Accessor::new(|p: &Person| p.name.clone(), |p: &mut Person, v| p.name = v),
///     field: FieldRead::heading("Name").alternate_names(["Full Name"]),
/// }];
///
/// assert_eq!(resolve(&bindings, Probe::Heading("NAME")), Some(0));
/// assert_eq!(resolve(&bindings, Probe::Heading("full name")), Some(0));
/// assert_eq!(resolve(&bindings, Probe::Heading("Age")), None);
/// ```
pub fn resolve<T>(bindings: &[FieldReadBinding<T>], probe: Probe<'_>) -> Option<usize> {
    match probe {
        Probe::Column(column) => by_column(bindings, column),
        Probe::Heading(heading) => {
            by_heading(bindings, heading).or_else(|| by_alternate_name(bindings, heading))
        }
    }
}

fn by_column<T>(bindings: &[FieldReadBinding<T>], column: usize) -> Option<usize> {
    bindings
        .iter()
        .position(|binding| binding.field.column_index == Some(column))
        .or_else(|| {
            bindings
                .get(column)
                .filter(|binding| binding.field.column_index.is_none())
                .map(|_| column)
        })
}

fn by_heading<T>(bindings: &[FieldReadBinding<T>], heading: &str) -> Option<usize> {
    bindings.iter().position(|binding| {
        binding
            .field
            .heading
            .as_deref()
            .is_some_and(|candidate| same_heading(candidate, heading))
    })
}

fn by_alternate_name<T>(bindings: &[FieldReadBinding<T>], heading: &str) -> Option<usize> {
    bindings.iter().position(|binding| {
        binding
            .field
            .alternate_names
            .iter()
            .any(|name| same_heading(name, heading))
    })
}

fn same_heading(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}
