// In: src/decode/value.rs

//! This module contains the pure, stateless primitives for decoding
//! fixed-width values from the attribute-tagged parameter encoding.
//!
//! Everything here operates on an untrusted byte slice through a bounded
//! cursor. A primitive that fails never advances the cursor, so the consumed
//! byte count stays exact and can be used to report an error offset. All
//! malformed-input conditions are recoverable errors, never panics.

use bytemuck::Pod;
use num_traits::PrimInt;

use crate::error::TracebinError;

//==================================================================================
// 1. Pointer Attributes
//==================================================================================

bitflags::bitflags! {
    /// The attribute word leading every encoded pointer-shaped parameter,
    /// describing which optional fields follow it on the wire.
    ///
    /// Bit values are part of the on-disk contract and must never be
    /// renumbered. Unknown bits are retained but uninterpreted.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PointerAttributes: u32 {
        /// The captured pointer was null; no further fields follow.
        const IS_NULL     = 0x01;
        /// The captured source address follows, for correlation only.
        const HAS_ADDRESS = 0x02;
        /// The parameter is an array; an explicit element count follows.
        const IS_ARRAY    = 0x04;
        /// The parameter is a string; an explicit element count follows.
        const IS_STRING   = 0x08;
        /// The element data itself follows. When clear, the count may still
        /// be known while the contents are elided.
        const HAS_DATA    = 0x10;
    }
}

impl PointerAttributes {
    /// Rejects attribute combinations the encoder can never produce.
    /// `IS_ARRAY` and `IS_STRING` are mutually exclusive.
    pub fn validate(self) -> Result<(), TracebinError> {
        if self.contains(PointerAttributes::IS_ARRAY | PointerAttributes::IS_STRING) {
            return Err(TracebinError::Format(
                "attribute word sets both array and string flags".to_string(),
            ));
        }
        Ok(())
    }
}

//==================================================================================
// 2. Value Reader
//==================================================================================

/// A bounded cursor over one encoded parameter region.
///
/// `consumed()` is exact at every point, including after a failed read: a
/// primitive that cannot be satisfied returns `Truncated` without moving the
/// cursor, so the position never exceeds the buffer length.
pub struct ValueReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ValueReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes consumed so far.
    pub fn consumed(&self) -> usize {
        self.pos
    }

    /// Bytes still available.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], TracebinError> {
        let available = self.remaining();
        if n > available {
            return Err(TracebinError::Truncated {
                needed: n,
                available,
            });
        }
        let start = self.pos;
        self.pos += n;
        Ok(&self.buf[start..self.pos])
    }

    /// Decodes the leading attribute word and validates its invariants.
    pub fn decode_attribute_word(&mut self) -> Result<PointerAttributes, TracebinError> {
        let bytes = self.take(4)?;
        let raw = u32::from_le_bytes(bytes.try_into().unwrap());
        let attributes = PointerAttributes::from_bits_retain(raw);
        attributes.validate()?;
        Ok(attributes)
    }

    /// Decodes a recorded source address. Addresses are correlation keys,
    /// never dereferenced.
    pub fn decode_address(&mut self) -> Result<u64, TracebinError> {
        let bytes = self.take(8)?;
        Ok(u64::from_le_bytes(bytes.try_into().unwrap()))
    }

    /// Decodes an explicit element count.
    pub fn decode_length(&mut self) -> Result<usize, TracebinError> {
        let bytes = self.take(8)?;
        let raw = u64::from_le_bytes(bytes.try_into().unwrap());
        usize::try_from(raw).map_err(|_| {
            TracebinError::Format(format!("element count {} exceeds host addressable range", raw))
        })
    }

    /// Decodes one `Src`-width wire value and converts it to the host type
    /// `T`, preserving numeric value. A wire value that does not fit `T` is
    /// malformed input, not a panic.
    pub fn decode_scalar<Src, T>(&mut self) -> Result<T, TracebinError>
    where
        Src: Pod + PrimInt,
        T: num_traits::NumCast,
    {
        let bytes = self.take(std::mem::size_of::<Src>())?;
        let raw: Src = bytemuck::pod_read_unaligned(bytes);
        let value = Src::from_le(raw);
        num_traits::cast(value).ok_or_else(|| {
            TracebinError::Format(format!(
                "wire value does not fit host type {}",
                std::any::type_name::<T>()
            ))
        })
    }

    /// Decodes `count` consecutive `Src`-width wire values into a
    /// caller-owned buffer, converting each element to `T`.
    pub fn decode_array_into<Src, T>(
        &mut self,
        out: &mut Vec<T>,
        count: usize,
    ) -> Result<(), TracebinError>
    where
        Src: Pod + PrimInt,
        T: num_traits::NumCast,
    {
        out.reserve(count);
        for _ in 0..count {
            out.push(self.decode_scalar::<Src, T>()?);
        }
        Ok(())
    }
}

//==================================================================================
// 3. Unit Tests
//==================================================================================
