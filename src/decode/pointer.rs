// In: src/decode/pointer.rs

//! The generic decoder for pointer-shaped parameters: null pointers, single
//! values, dynamically sized arrays, strings, and opaque handles.
//!
//! One parametrized routine implements the whole algorithm; the named entry
//! points only select the source wire width. The wire may encode a logically
//! 64-bit host quantity (a handle, a device size) at a narrower width, so
//! every element is converted from the wire type to the host type as it is
//! decoded. Keeping the variants as wrappers over a single routine guarantees
//! they cannot drift apart.

use bytemuck::Pod;
use num_traits::{NumCast, PrimInt};

use crate::decode::value::{PointerAttributes, ValueReader};
use crate::error::TracebinError;
use crate::format::{
    DeviceSizeEncodeType, EnumEncodeType, FlagsEncodeType, HandleEncodeType, SampleMaskEncodeType,
    SizeTEncodeType,
};

//==================================================================================
// 1. The Decoder
//==================================================================================

/// Holds the result of the most recent decode: the attribute set, the
/// optional recorded source address, the element count, and, when the stream
/// carried data, an exclusively owned buffer of host-typed elements.
///
/// An instance may be reused across decode calls; each call releases the
/// previous buffer before taking ownership of the new one. Accessors hand out
/// borrowed views only, so there is exactly one owner at all times.
pub struct PointerDecoder<T> {
    attributes: PointerAttributes,
    address: Option<u64>,
    len: usize,
    data: Option<Vec<T>>,
    bytes_consumed: usize,
}

impl<T> Default for PointerDecoder<T> {
    fn default() -> Self {
        Self {
            attributes: PointerAttributes::empty(),
            address: None,
            len: 0,
            data: None,
            bytes_consumed: 0,
        }
    }
}

impl<T> PointerDecoder<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The attribute word of the last decode.
    pub fn attributes(&self) -> PointerAttributes {
        self.attributes
    }

    /// True if the last decode saw a null pointer.
    pub fn is_null(&self) -> bool {
        self.attributes.contains(PointerAttributes::IS_NULL)
    }

    /// The recorded source address, if the stream carried one. Used for
    /// correlating pointers across records, never dereferenced.
    pub fn address(&self) -> Option<u64> {
        self.address
    }

    /// Element count: `0` for null, `1` for a scalar, `N` for arrays and
    /// strings. A count may be known even when the data was elided.
    pub fn element_count(&self) -> usize {
        self.len
    }

    /// The decoded elements, present iff the stream carried data.
    pub fn data(&self) -> Option<&[T]> {
        self.data.as_deref()
    }

    /// Transfers ownership of the decoded buffer to the caller, leaving the
    /// decoder empty-handed until the next decode.
    pub fn take_data(&mut self) -> Option<Vec<T>> {
        self.data.take()
    }

    /// Bytes consumed by the last decode call. Exact even when the call
    /// failed, so callers can report a meaningful error offset.
    pub fn bytes_consumed(&self) -> usize {
        self.bytes_consumed
    }
}

impl<T: NumCast> PointerDecoder<T> {
    /// Decodes a parameter whose wire width equals the host width.
    pub fn decode(&mut self, buffer: &[u8]) -> Result<usize, TracebinError>
    where
        T: Pod + PrimInt,
    {
        self.run_decode::<T>(buffer)
    }

    // The remaining entry points decode types whose wire width differs from
    // the host representation.

    pub fn decode_enum(&mut self, buffer: &[u8]) -> Result<usize, TracebinError> {
        self.run_decode::<EnumEncodeType>(buffer)
    }

    pub fn decode_flags(&mut self, buffer: &[u8]) -> Result<usize, TracebinError> {
        self.run_decode::<FlagsEncodeType>(buffer)
    }

    pub fn decode_sample_mask(&mut self, buffer: &[u8]) -> Result<usize, TracebinError> {
        self.run_decode::<SampleMaskEncodeType>(buffer)
    }

    pub fn decode_handle(&mut self, buffer: &[u8]) -> Result<usize, TracebinError> {
        self.run_decode::<HandleEncodeType>(buffer)
    }

    pub fn decode_device_size(&mut self, buffer: &[u8]) -> Result<usize, TracebinError> {
        self.run_decode::<DeviceSizeEncodeType>(buffer)
    }

    pub fn decode_size_t(&mut self, buffer: &[u8]) -> Result<usize, TracebinError> {
        self.run_decode::<SizeTEncodeType>(buffer)
    }

    /// Shared driver: resets state, runs the algorithm, and records the exact
    /// consumed byte count on both the success and the failure path.
    fn run_decode<Src>(&mut self, buffer: &[u8]) -> Result<usize, TracebinError>
    where
        Src: Pod + PrimInt,
    {
        // Release the previous decode's buffer before this one begins.
        self.attributes = PointerAttributes::empty();
        self.address = None;
        self.len = 0;
        self.data = None;

        let mut reader = ValueReader::new(buffer);
        let result = self.decode_from::<Src>(&mut reader);
        self.bytes_consumed = reader.consumed();
        result.map(|()| self.bytes_consumed)
    }

    /// The one algorithm behind every entry point.
    fn decode_from<Src>(&mut self, reader: &mut ValueReader<'_>) -> Result<(), TracebinError>
    where
        Src: Pod + PrimInt,
    {
        let attributes = reader.decode_attribute_word()?;
        self.attributes = attributes;

        // Null is the terminal non-error branch: count 0, no address, no
        // data, regardless of any other bits.
        if attributes.contains(PointerAttributes::IS_NULL) {
            return Ok(());
        }

        if attributes.contains(PointerAttributes::HAS_ADDRESS) {
            self.address = Some(reader.decode_address()?);
        }

        self.len = if attributes
            .intersects(PointerAttributes::IS_ARRAY | PointerAttributes::IS_STRING)
        {
            reader.decode_length()?
        } else {
            1
        };

        if attributes.contains(PointerAttributes::HAS_DATA) {
            // The declared payload must fit in what is left of the buffer.
            // Checking before allocating keeps a corrupt count from driving
            // a huge allocation.
            let needed = self
                .len
                .checked_mul(std::mem::size_of::<Src>())
                .ok_or_else(|| {
                    TracebinError::Format("element count overflows payload size".to_string())
                })?;
            if needed > reader.remaining() {
                return Err(TracebinError::Truncated {
                    needed,
                    available: reader.remaining(),
                });
            }

            let mut data = Vec::with_capacity(self.len);
            reader.decode_array_into::<Src, T>(&mut data, self.len)?;
            self.data = Some(data);
        }

        Ok(())
    }
}

//==================================================================================
// 2. Unit Tests
//==================================================================================
