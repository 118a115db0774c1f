// In: src/pipeline/transcoder.rs

//! A pipeline decoder that rewrites the stream under a target compression
//! scheme: header unchanged, option block rewritten with the target's tag,
//! every frame re-emitted length-prefixed under the new scheme. Logical
//! content is never altered, only its on-wire representation.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::config::CompressionType;
use crate::error::TracebinError;
use crate::format::{option_key, FileHeader, FileOptions, FRAME_LENGTH_PREFIX_SIZE};
use crate::kernels;
use crate::pipeline::FrameDecoder;

//==================================================================================
// 1. The Transcoder
//==================================================================================

pub struct Transcoder {
    writer: BufWriter<File>,
    target_type: CompressionType,
    bytes_written: u64,
}

impl Transcoder {
    /// Opens the output file and writes its header and option block.
    ///
    /// The header is reproduced unchanged. The option block is reproduced in
    /// source order, except that the compression-type value is overwritten
    /// with the target's tag (appended if the source carried none).
    pub fn create<P: AsRef<Path>>(
        path: P,
        header: &FileHeader,
        options: &FileOptions,
        target_type: CompressionType,
    ) -> Result<Self, TracebinError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| TracebinError::Open {
            path: path.display().to_string(),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        let mut rewritten = options.clone();
        rewritten.set(option_key::COMPRESSION_TYPE, target_type.tag());

        header.write_to(&mut writer)?;
        rewritten.write_to(&mut writer)?;

        Ok(Self {
            writer,
            target_type,
            bytes_written: FileHeader::ENCODED_LEN + rewritten.encoded_len(),
        })
    }

    /// The compression scheme frames are rewritten under.
    pub fn target_type(&self) -> CompressionType {
        self.target_type
    }

    /// Total on-wire bytes written: header, options, every frame prefix and
    /// payload. Equals the output file size once `finish` has run.
    pub fn num_bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Flushes buffered output to the file.
    pub fn finish(&mut self) -> Result<(), TracebinError> {
        self.writer.flush()?;
        Ok(())
    }

    fn write_frame(&mut self, payload: &[u8]) -> Result<(), TracebinError> {
        self.writer
            .write_all(&(payload.len() as u64).to_le_bytes())?;
        self.writer.write_all(payload)?;
        self.bytes_written += FRAME_LENGTH_PREFIX_SIZE + payload.len() as u64;
        Ok(())
    }
}

impl FrameDecoder for Transcoder {
    fn process_frame(
        &mut self,
        frame: &[u8],
        _header: &FileHeader,
        _options: &FileOptions,
    ) -> Result<(), TracebinError> {
        match self.target_type {
            CompressionType::None => self.write_frame(frame),
            target => {
                let compressed = kernels::compress(frame, target)?;
                self.write_frame(&compressed)
            }
        }
    }
}
