// In: src/kernels/mod.rs

//! This module is the uniform adapter over the collection of pure, stateless
//! compression kernels, selected by [`CompressionType`].
//!
//! It is the only contact point between the frame pipeline and the concrete
//! algorithms: byte buffer in, byte buffer out, `Codec` error on malformed
//! compressed input. The `None` scheme is the identity function.

use crate::config::CompressionType;
use crate::error::TracebinError;

//==================================================================================
// 1. Module Declarations
//==================================================================================

pub mod lz4;
pub mod lz77;

//==================================================================================
// 2. Adapter API
//==================================================================================

/// Compresses `input_bytes` under the given scheme.
pub fn compress(
    input_bytes: &[u8],
    compression_type: CompressionType,
) -> Result<Vec<u8>, TracebinError> {
    match compression_type {
        CompressionType::None => Ok(input_bytes.to_vec()),
        CompressionType::Lz4 => lz4::encode(input_bytes),
        CompressionType::Lz77 => lz77::encode(input_bytes),
    }
}

/// Decompresses `input_bytes` under the given scheme.
pub fn decompress(
    input_bytes: &[u8],
    compression_type: CompressionType,
) -> Result<Vec<u8>, TracebinError> {
    match compression_type {
        CompressionType::None => Ok(input_bytes.to_vec()),
        CompressionType::Lz4 => lz4::decode(input_bytes),
        CompressionType::Lz77 => lz77::decode(input_bytes),
    }
}

//==================================================================================
// 3. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_is_identity() {
        let payload = b"raw frame bytes".to_vec();
        assert_eq!(compress(&payload, CompressionType::None).unwrap(), payload);
        assert_eq!(
            decompress(&payload, CompressionType::None).unwrap(),
            payload
        );
    }

    #[test]
    fn test_adapter_roundtrip_for_every_scheme() {
        let payload: Vec<u8> = (0..512u32).flat_map(|v| v.to_le_bytes()).collect();
        for ty in [
            CompressionType::None,
            CompressionType::Lz4,
            CompressionType::Lz77,
        ] {
            let compressed = compress(&payload, ty).unwrap();
            let restored = decompress(&compressed, ty).unwrap();
            assert_eq!(restored, payload, "roundtrip failed for {}", ty);
        }
    }

    #[test]
    fn test_corrupt_input_is_codec_error() {
        // Small declared sizes with data no decoder can satisfy.
        let garbage = vec![0x05, 0x00, 0x00, 0x00, 0xF0];
        for ty in [CompressionType::Lz4, CompressionType::Lz77] {
            let result = decompress(&garbage, ty);
            assert!(matches!(result, Err(TracebinError::Codec(_))));
        }
    }
}
