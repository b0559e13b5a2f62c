//! RIFF/WAVE support for wavtap.
//!
//! Reads the header of a 44.1 kHz, stereo, 16-bit PCM WAV file, leaves the
//! stream positioned at the audio payload and then serves samples one frame
//! at a time. Only that single profile is accepted; everything else is
//! rejected while the header is parsed.

mod chunk;
mod header;
mod reader;
mod writer;

pub use chunk::{skip_bytes, walk_chunks, ChunkHeader, DataChunk};
pub use header::{parse_header, read_fmt_chunk, read_riff_header, FormatDescriptor};
pub use reader::{ReaderState, WavReader};
pub use writer::{frames_to_wav, write_wav};

use std::fmt;
use std::io;

/// The only sample rate the reader accepts.
pub const SUPPORTED_SAMPLE_RATE: u32 = 44100;
/// The only channel count the reader accepts.
pub const SUPPORTED_CHANNELS: u16 = 2;
/// The only bit depth the reader accepts.
pub const SUPPORTED_BITS_PER_SAMPLE: u16 = 16;
/// `WAVE_FORMAT_PCM`
pub const FORMAT_TAG_PCM: u16 = 1;

/// Broad class of a [`WavError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WavErrorKind {
    /// Malformed or self-inconsistent header fields
    Format,
    /// Well-formed, but outside the supported profile
    Unsupported,
    /// Chunks in an order the reader cannot accept
    Sequence,
    /// Short read, short seek, or an OS error
    Io,
}

/// Error type for WAV header parsing.
#[derive(Debug)]
pub enum WavError {
    /// A magic tag ("RIFF", "WAVE") did not match
    BadMagic { expected: [u8; 4], found: [u8; 4] },
    /// `fmt ` chunk declared fewer than 16 bytes
    FmtTooShort(u32),
    /// A derived header field disagrees with the fields it derives from
    Inconsistent {
        field: &'static str,
        declared: u32,
        computed: u32,
    },
    /// `fmt ` chunk length does not match 18 + extension size
    ExtensionSizeMismatch { chunk_len: u32, extended_size: u16 },
    /// Format tag other than linear PCM
    UnsupportedEncoding(u16),
    /// Anything but stereo
    UnsupportedChannels(u16),
    /// Anything but 44100 Hz
    UnsupportedSampleRate(u32),
    /// Anything but 16 bits per sample
    UnsupportedBitDepth(u16),
    /// `data` chunk reached before a usable `fmt ` chunk
    DataBeforeFmt,
    /// I/O error
    Io(io::Error),
}

impl WavError {
    pub fn kind(&self) -> WavErrorKind {
        match self {
            WavError::BadMagic { .. }
            | WavError::FmtTooShort(_)
            | WavError::Inconsistent { .. }
            | WavError::ExtensionSizeMismatch { .. } => WavErrorKind::Format,
            WavError::UnsupportedEncoding(_)
            | WavError::UnsupportedChannels(_)
            | WavError::UnsupportedSampleRate(_)
            | WavError::UnsupportedBitDepth(_) => WavErrorKind::Unsupported,
            WavError::DataBeforeFmt => WavErrorKind::Sequence,
            WavError::Io(_) => WavErrorKind::Io,
        }
    }
}

impl fmt::Display for WavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WavError::BadMagic { expected, found } => write!(
                f,
                "Bad magic: expected {:?}, found {:?}",
                String::from_utf8_lossy(expected),
                String::from_utf8_lossy(found)
            ),
            WavError::FmtTooShort(len) => {
                write!(f, "fmt chunk too short: {} bytes (need at least 16)", len)
            }
            WavError::Inconsistent {
                field,
                declared,
                computed,
            } => write!(
                f,
                "Inconsistent header: {} is {}, expected {}",
                field, declared, computed
            ),
            WavError::ExtensionSizeMismatch {
                chunk_len,
                extended_size,
            } => write!(
                f,
                "fmt chunk length {} does not match extension size {} (expected {})",
                chunk_len,
                extended_size,
                18 + *extended_size as u32
            ),
            WavError::UnsupportedEncoding(tag) => {
                write!(f, "Unsupported format tag {} (only PCM/1)", tag)
            }
            WavError::UnsupportedChannels(n) => {
                write!(f, "Unsupported channel count {} (only stereo)", n)
            }
            WavError::UnsupportedSampleRate(rate) => {
                write!(f, "Unsupported sample rate {} Hz (only 44100)", rate)
            }
            WavError::UnsupportedBitDepth(bits) => {
                write!(f, "Unsupported bit depth {} (only 16)", bits)
            }
            WavError::DataBeforeFmt => write!(f, "data chunk before fmt chunk"),
            WavError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for WavError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WavError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for WavError {
    fn from(e: io::Error) -> Self {
        WavError::Io(e)
    }
}

impl From<binrw::Error> for WavError {
    fn from(e: binrw::Error) -> Self {
        WavError::Io(into_io_error(e))
    }
}

/// Unwrap binrw's field-context backtraces down to the underlying I/O error.
pub(crate) fn into_io_error(e: binrw::Error) -> io::Error {
    match e {
        binrw::Error::Io(e) => e,
        binrw::Error::Backtrace(bt) => into_io_error(*bt.error),
        other => io::Error::new(io::ErrorKind::InvalidData, other.to_string()),
    }
}

#[cfg(test)]
mod fixture;
