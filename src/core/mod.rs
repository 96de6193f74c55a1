/// Row traits shared by readers and writers.
pub mod item;

/// Delimiter, qualifier and line terminator settings.
pub mod options;

/// Splitting a line into fields.
pub mod tokenizer;

/// Joining fields into a line.
pub mod emitter;

/// Copying rows from sources to a sink.
pub mod pipeline;
