pub mod binding;
#[cfg(feature = "xml")]
pub mod document;
pub mod resolver;
pub mod schema;
