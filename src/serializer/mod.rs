pub mod deserialize;
pub mod options;
pub mod serialize;
