// In: src/config.rs

//! The single source of truth for the compression configuration shared by the
//! file option parser, the CLI argument parser, and the kernel adapter.
//!
//! `CompressionType` is created once at the application boundary (from the
//! file's option block or from a command-line argument) and then passed by
//! value through every layer. No ambient global state is involved.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TracebinError;

//==================================================================================
// I. Compression Type
//==================================================================================

/// The closed set of compression schemes a trace file may declare.
///
/// The integer tags are part of the on-disk contract: they are stored verbatim
/// in the file's option block and must survive a rewrite bit-for-bit, so they
/// are version-stable and must never be renumbered.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CompressionType {
    /// **Default:** Frame payloads are stored as-is.
    #[default]
    None,

    /// Frame payloads are LZ4 block-compressed.
    Lz4,

    /// Frame payloads are DEFLATE (LZ77-family) compressed.
    Lz77,
}

impl CompressionType {
    /// The on-disk integer tag for this compression scheme.
    pub fn tag(self) -> u32 {
        match self {
            CompressionType::None => 0,
            CompressionType::Lz4 => 1,
            CompressionType::Lz77 => 2,
        }
    }

    /// Try to convert from a raw option-block tag.
    pub fn from_tag(tag: u32) -> Option<Self> {
        match tag {
            0 => Some(CompressionType::None),
            1 => Some(CompressionType::Lz4),
            2 => Some(CompressionType::Lz77),
            _ => None,
        }
    }
}

impl fmt::Display for CompressionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CompressionType::None => "NONE",
            CompressionType::Lz4 => "LZ4",
            CompressionType::Lz77 => "LZ77",
        };
        f.write_str(label)
    }
}

impl FromStr for CompressionType {
    type Err = TracebinError;

    /// Parses the CLI spelling of a compression scheme. The accepted values
    /// are exactly `NONE`, `LZ4`, and `LZ77`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NONE" => Ok(CompressionType::None),
            "LZ4" => Ok(CompressionType::Lz4),
            "LZ77" => Ok(CompressionType::Lz77),
            other => Err(TracebinError::Format(format!(
                "unknown compression '{}' (expected NONE, LZ4 or LZ77)",
                other
            ))),
        }
    }
}

//==================================================================================
// II. Unit Tests
//==================================================================================
