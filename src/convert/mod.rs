pub mod culture;
pub mod value;
