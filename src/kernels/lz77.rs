// In: src/kernels/lz77.rs

//! This module contains the pure, stateless kernel for DEFLATE (LZ77-family)
//! compression and decompression.
//!
//! It is a safe, panic-free wrapper around the `flate2` crate. The encoded
//! payload prepends the uncompressed size so decoding can pre-allocate and
//! verify the inflated result against what the encoder promised.

use std::io::Write;

use flate2::write::DeflateEncoder;
use flate2::Compression;

use crate::error::TracebinError;

/// Cap on the pre-allocation derived from the (untrusted) size header. The
/// buffer still grows to the real inflated size; this only bounds the upfront
/// reservation.
const MAX_PREALLOCATION: usize = 16 * 1024 * 1024;

//==================================================================================
// 1. Public API
//==================================================================================

/// Compresses a byte slice, prepending the uncompressed size.
pub fn encode(input_bytes: &[u8]) -> Result<Vec<u8>, TracebinError> {
    if input_bytes.is_empty() {
        return Ok(Vec::new());
    }

    let mut output_buf = Vec::with_capacity(input_bytes.len() / 2 + 8);
    let uncompressed_len: u64 = input_bytes.len() as u64;
    output_buf.extend_from_slice(&uncompressed_len.to_le_bytes());

    let mut encoder = DeflateEncoder::new(output_buf, Compression::default());
    encoder
        .write_all(input_bytes)
        .map_err(|e| TracebinError::Codec(format!("DEFLATE compression failed: {}", e)))?;

    // `finish` is essential to flush the final DEFLATE block.
    encoder
        .finish()
        .map_err(|e| TracebinError::Codec(format!("DEFLATE compression failed: {}", e)))
}

/// Decompresses a size-prefixed DEFLATE payload.
pub fn decode(input_bytes: &[u8]) -> Result<Vec<u8>, TracebinError> {
    if input_bytes.is_empty() {
        return Ok(Vec::new());
    }

    if input_bytes.len() < 8 {
        return Err(TracebinError::Codec(
            "input too short to contain size header".to_string(),
        ));
    }
    let len_bytes: [u8; 8] = input_bytes[0..8].try_into().unwrap();
    let uncompressed_len = u64::from_le_bytes(len_bytes) as usize;

    // The actual compressed data starts after the size header.
    let compressed_data = &input_bytes[8..];

    let mut decompressed_data = Vec::with_capacity(uncompressed_len.min(MAX_PREALLOCATION));
    let mut decoder = flate2::read::DeflateDecoder::new(compressed_data);
    std::io::copy(&mut decoder, &mut decompressed_data)
        .map_err(|e| TracebinError::Codec(format!("DEFLATE decompression failed: {}", e)))?;

    if decompressed_data.len() != uncompressed_len {
        return Err(TracebinError::Codec(format!(
            "decompressed size does not match header: expected {}, got {}",
            uncompressed_len,
            decompressed_data.len()
        )));
    }

    Ok(decompressed_data)
}

//==================================================================================
// 2. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lz77_roundtrip_simple_text() {
        let original_bytes =
            b"hello world, this is a test of deflate compression. hello world, again."
                .to_vec();

        let compressed_bytes = encode(&original_bytes).unwrap();
        let decompressed_bytes = decode(&compressed_bytes).unwrap();

        assert_eq!(original_bytes, decompressed_bytes);
    }

    #[test]
    fn test_lz77_roundtrip_highly_compressible_data() {
        let original_bytes = vec![42u8; 10_000];

        let compressed_bytes = encode(&original_bytes).unwrap();
        assert!(compressed_bytes.len() < 100);

        let decompressed_bytes = decode(&compressed_bytes).unwrap();
        assert_eq!(original_bytes, decompressed_bytes);
    }

    #[test]
    fn test_lz77_roundtrip_empty_input() {
        assert!(encode(&[]).unwrap().is_empty());
        assert!(decode(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_lz77_decode_too_short_for_header() {
        let result = decode(&[1, 2, 3]);
        assert!(matches!(result, Err(TracebinError::Codec(_))));
    }

    #[test]
    fn test_lz77_decode_size_mismatch() {
        let mut bytes = encode(b"some payload that compresses").unwrap();
        // Corrupt the promised uncompressed size.
        bytes[0] ^= 0xFF;
        let result = decode(&bytes);
        assert!(matches!(result, Err(TracebinError::Codec(_))));
    }
}
