// In: src/error.rs

//! This module defines the single, unified error type for the entire tracebin
//! library.
//!
//! By using a single error enum, an error from any decode primitive or
//! pipeline stage can be propagated to the application boundary without
//! translation layers. The `thiserror` crate is used to reduce boilerplate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TracebinError {
    /// An input or output path could not be opened.
    #[error("failed to open '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The byte stream violates the file or parameter format: bad magic,
    /// unsupported version, conflicting attribute flags, or a value that
    /// cannot be represented in the requested host type.
    #[error("malformed input: {0}")]
    Format(String),

    /// A decode primitive needed more bytes than the buffer holds.
    #[error("truncated input: needed {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    /// A compression or decompression kernel rejected its input.
    #[error("codec failure: {0}")]
    Codec(String),

    /// A fan-out consumer failed mid-stream. The pipeline treats this as
    /// fatal to the current run.
    #[error("consumer {index} failed: {source}")]
    Consumer {
        index: usize,
        #[source]
        source: Box<TracebinError>,
    },

    /// An error originating from the underlying I/O subsystem, typically
    /// while writing the transcoded output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
