// In: src/kernels/lz4.rs

//! This module contains the pure, stateless kernel for LZ4 block compression
//! and decompression.
//!
//! It is a safe, panic-free wrapper around the `lz4_flex` crate. The encoded
//! payload carries the uncompressed size so decoding can allocate exactly
//! once and verify the result.

use crate::error::TracebinError;

//==================================================================================
// 1. Public API
//==================================================================================

/// Compresses a byte slice into a size-prefixed LZ4 block.
pub fn encode(input_bytes: &[u8]) -> Result<Vec<u8>, TracebinError> {
    if input_bytes.is_empty() {
        return Ok(Vec::new());
    }
    Ok(lz4_flex::compress_prepend_size(input_bytes))
}

/// Decompresses a size-prefixed LZ4 block.
pub fn decode(input_bytes: &[u8]) -> Result<Vec<u8>, TracebinError> {
    if input_bytes.is_empty() {
        return Ok(Vec::new());
    }
    lz4_flex::decompress_size_prepended(input_bytes)
        .map_err(|e| TracebinError::Codec(format!("LZ4 decompression failed: {}", e)))
}

//==================================================================================
// 2. Unit Tests
//==================================================================================
