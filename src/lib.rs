//! This file is the root of the `tracebin` Rust crate.
//!
//! tracebin is the decode/transcode core for a binary trace-file format: a
//! stream of captured API-call records whose parameters use a compact,
//! attribute-tagged pointer/array/string encoding, optionally compressed per
//! frame. The crate provides the generic parameter decoder (`decode`), the
//! compression kernel adapter (`kernels`), and the frame-oriented file
//! pipeline with its transcoding consumer (`pipeline`).

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//==================================================================================
// 1. Module Declarations
//==================================================================================

pub mod config;
pub mod decode;
pub mod error;
pub mod format;
pub mod kernels;
pub mod pipeline;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================

pub use config::CompressionType;
pub use decode::{PointerAttributes, PointerDecoder, ValueReader};
pub use error::TracebinError;
pub use format::{FileHeader, FileOptions};
pub use pipeline::{FileProcessor, FrameDecoder, Transcoder};
