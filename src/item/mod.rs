#[cfg(feature = "async")]
pub mod async_stream;
pub(crate) mod line;
pub mod preset;
pub mod stream_reader;
pub mod stream_writer;
