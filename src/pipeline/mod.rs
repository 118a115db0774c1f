// In: src/pipeline/mod.rs

//! The frame-oriented file pipeline. A [`FileProcessor`] owns the input
//! stream, parses the header and option block once, then iterates frames in
//! file order: decompress via the kernel adapter, fan the raw frame bytes out
//! to every attached decoder, advance. Strictly single-threaded and
//! synchronous; frame order is meaningful and is never reordered.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use log::{debug, info};

use crate::config::CompressionType;
use crate::error::TracebinError;
use crate::format::{option_key, FileHeader, FileOptions, FRAME_LENGTH_PREFIX_SIZE};
use crate::kernels;

//==================================================================================
// 1. Module Declarations
//==================================================================================

pub mod transcoder;

pub use self::transcoder::Transcoder;

//==================================================================================
// 2. The Decoder Contract
//==================================================================================

/// **CONTRACT:** A fan-out consumer of decoded frames.
///
/// `process_frame` is invoked once per frame, in registration order, on the
/// pipeline's thread. The frame slice is borrowed for the duration of the
/// call only; a decoder that needs to keep data must copy it.
pub trait FrameDecoder {
    fn process_frame(
        &mut self,
        frame: &[u8],
        header: &FileHeader,
        options: &FileOptions,
    ) -> Result<(), TracebinError>;
}

//==================================================================================
// 3. The File Processor
//==================================================================================

/// Where the processor is in its run. A constructed processor has already
/// read the header; construction failure covers the uninitialized state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorState {
    HeaderRead,
    Streaming,
    Done,
    Failed,
}

/// Owns the input stream and drives the decode run. The stream cursor is
/// advanced only here; decoders receive borrowed views of each frame.
pub struct FileProcessor<'a> {
    reader: BufReader<File>,
    header: FileHeader,
    options: FileOptions,
    compression_type: CompressionType,
    decoders: Vec<&'a mut dyn FrameDecoder>,
    file_len: u64,
    bytes_read: u64,
    frames_processed: u64,
    state: ProcessorState,
}

impl<'a> FileProcessor<'a> {
    /// Opens a trace file and reads its header and option block.
    ///
    /// The compression-type option defaults to `None` when absent; an option
    /// carrying an unknown tag is malformed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, TracebinError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| TracebinError::Open {
            path: path.display().to_string(),
            source,
        })?;
        let file_len = file.metadata()?.len();
        let mut reader = BufReader::new(file);

        let header = FileHeader::read_from(&mut reader)?;
        let options = FileOptions::read_from(&mut reader)?;

        let compression_type = match options.get(option_key::COMPRESSION_TYPE) {
            Some(tag) => CompressionType::from_tag(tag).ok_or_else(|| {
                TracebinError::Format(format!("unknown compression type tag {}", tag))
            })?,
            None => CompressionType::None,
        };

        let bytes_read = FileHeader::ENCODED_LEN + options.encoded_len();
        debug!(
            "opened '{}': version {}, {} options, compression {}",
            path.display(),
            header.version,
            options.len(),
            compression_type
        );

        Ok(Self {
            reader,
            header,
            options,
            compression_type,
            decoders: Vec::new(),
            file_len,
            bytes_read,
            frames_processed: 0,
            state: ProcessorState::HeaderRead,
        })
    }

    /// Registers a fan-out decoder. Registration order is the order in which
    /// decoders receive each frame. Call before streaming begins.
    pub fn add_decoder(&mut self, decoder: &'a mut dyn FrameDecoder) {
        self.decoders.push(decoder);
    }

    /// Streams every remaining frame through the attached decoders.
    ///
    /// Clean end-of-input exactly at a frame boundary is success. Any other
    /// failure (a short read, a codec error, a decoder error) is fatal to
    /// the run: remaining frames are skipped, counters keep their last-good
    /// values, and the specific error is surfaced to the caller.
    pub fn process_all_frames(&mut self) -> Result<(), TracebinError> {
        if self.state != ProcessorState::HeaderRead {
            return Err(TracebinError::Format(
                "processor has already streamed".to_string(),
            ));
        }
        self.state = ProcessorState::Streaming;

        match self.stream_frames() {
            Ok(()) => {
                self.state = ProcessorState::Done;
                info!(
                    "processed {} frames, {} file bytes",
                    self.frames_processed, self.bytes_read
                );
                Ok(())
            }
            Err(e) => {
                self.state = ProcessorState::Failed;
                Err(e)
            }
        }
    }

    fn stream_frames(&mut self) -> Result<(), TracebinError> {
        loop {
            let frame_len = match read_frame_prefix(&mut self.reader)? {
                Some(len) => len,
                // End-of-input at a frame boundary: the stream is complete.
                None => return Ok(()),
            };

            // A declared length larger than what is left of the file is
            // corrupt; checking first keeps it from driving the allocation.
            let remaining = self
                .file_len
                .saturating_sub(self.bytes_read + FRAME_LENGTH_PREFIX_SIZE);
            if frame_len > remaining {
                return Err(TracebinError::Format(format!(
                    "frame {} declares {} bytes, only {} remain in the file",
                    self.frames_processed, frame_len, remaining
                )));
            }

            let mut payload = vec![0u8; frame_len as usize];
            self.reader.read_exact(&mut payload).map_err(|e| {
                TracebinError::Format(format!(
                    "frame {} truncated: {}",
                    self.frames_processed, e
                ))
            })?;

            // File-space accounting: on-wire bytes, before decompression.
            self.bytes_read += FRAME_LENGTH_PREFIX_SIZE + frame_len;

            let raw_frame = if self.compression_type != CompressionType::None {
                kernels::decompress(&payload, self.compression_type)?
            } else {
                payload
            };

            for (index, decoder) in self.decoders.iter_mut().enumerate() {
                decoder
                    .process_frame(&raw_frame, &self.header, &self.options)
                    .map_err(|source| TracebinError::Consumer {
                        index,
                        source: Box::new(source),
                    })?;
            }

            self.frames_processed += 1;
            debug!(
                "frame {}: {} wire bytes, {} raw bytes",
                self.frames_processed,
                frame_len,
                raw_frame.len()
            );
        }
    }

    /// File-space bytes consumed so far: header, options, every frame length
    /// prefix and (still-compressed) payload read to this point.
    pub fn num_bytes_read(&self) -> u64 {
        self.bytes_read
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    pub fn options(&self) -> &FileOptions {
        &self.options
    }

    /// The compression scheme the input file declares.
    pub fn compression_type(&self) -> CompressionType {
        self.compression_type
    }

    pub fn state(&self) -> ProcessorState {
        self.state
    }
}

//==================================================================================
// 4. Private Helpers
//==================================================================================

/// Reads the next frame's length prefix. Returns `None` on clean end-of-input
/// at a frame boundary; a partial prefix is malformed.
fn read_frame_prefix<R: Read>(reader: &mut R) -> Result<Option<u64>, TracebinError> {
    let mut prefix = [0u8; 8];
    let mut filled = 0;
    while filled < prefix.len() {
        match reader.read(&mut prefix[filled..]) {
            Ok(0) if filled == 0 => return Ok(None),
            Ok(0) => {
                return Err(TracebinError::Format(format!(
                    "truncated frame length prefix: got {} of 8 bytes",
                    filled
                )))
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(Some(u64::from_le_bytes(prefix)))
}
