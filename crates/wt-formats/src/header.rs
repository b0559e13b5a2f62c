//! RIFF header and `fmt ` chunk parsing.

use binrw::{BinReaderExt, BinWrite};
use std::io::{Read, Seek};

use crate::chunk::{skip_bytes, walk_chunks, DataChunk};
use crate::{
    WavError, FORMAT_TAG_PCM, SUPPORTED_BITS_PER_SAMPLE, SUPPORTED_CHANNELS,
    SUPPORTED_SAMPLE_RATE,
};

/// Smallest legal `fmt ` body (PCMWAVEFORMAT).
const FMT_BASE_LEN: u32 = 16;
/// Base body plus the `cbSize` extension length field.
const FMT_EXTENDED_BASE_LEN: u32 = 18;

/// Audio format parameters from the `fmt ` chunk.
///
/// Only ever built by [`read_fmt_chunk`], which checks that
/// `bytes_per_sample == bits_per_sample / 8` and that the declared byte rate
/// and block align agree with it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormatDescriptor {
    pub num_channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    pub bytes_per_sample: u16,
}

impl FormatDescriptor {
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * self.num_channels as u32 * self.bytes_per_sample as u32
    }

    pub fn block_align(&self) -> u16 {
        self.num_channels * self.bytes_per_sample
    }

    /// Bytes in one frame (one sample per channel).
    pub fn frame_len(&self) -> usize {
        self.block_align() as usize
    }

    /// All fields needed to stream audio are populated.
    pub fn is_complete(&self) -> bool {
        self.sample_rate != 0 && self.num_channels > 0 && self.bytes_per_sample > 0
    }

    /// Playing time of `data_len` bytes of audio.
    pub fn duration_secs(&self, data_len: u32) -> f64 {
        data_len as f64
            / self.sample_rate as f64
            / self.num_channels as f64
            / self.bytes_per_sample as f64
    }
}

/// The fixed 16-byte part of a `fmt ` chunk.
///
/// Written in one go by the encoder; the parser reads it field by field so
/// each check fires as soon as its field is in.
#[derive(BinWrite, Debug, PartialEq, Eq)]
#[bw(little)]
pub(crate) struct FmtBody {
    pub format_tag: u16,
    pub num_channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
}

impl FmtBody {
    /// Consistent linear PCM fields for the given shape.
    pub fn pcm(num_channels: u16, sample_rate: u32, bits_per_sample: u16) -> Self {
        let block_align = num_channels * (bits_per_sample / 8);
        Self {
            format_tag: FORMAT_TAG_PCM,
            num_channels,
            sample_rate,
            byte_rate: sample_rate * block_align as u32,
            block_align,
            bits_per_sample,
        }
    }
}

fn expect_tag<R: Read + Seek>(r: &mut R, expected: &[u8; 4]) -> Result<(), WavError> {
    let found: [u8; 4] = r.read_le()?;
    if &found != expected {
        return Err(WavError::BadMagic {
            expected: *expected,
            found,
        });
    }
    Ok(())
}

/// Consume the 12-byte "RIFF" <size> "WAVE" preamble.
///
/// The RIFF size is read but not checked.
pub fn read_riff_header<R: Read + Seek>(r: &mut R) -> Result<(), WavError> {
    expect_tag(r, b"RIFF")?;
    let _riff_size: u32 = r.read_le()?;
    expect_tag(r, b"WAVE")
}

/// Parse and validate a `fmt ` chunk body of `chunk_len` bytes.
///
/// Consumes exactly `chunk_len` bytes on success, extension included.
pub fn read_fmt_chunk<R: Read + Seek>(
    r: &mut R,
    chunk_len: u32,
) -> Result<FormatDescriptor, WavError> {
    if chunk_len < FMT_BASE_LEN {
        return Err(WavError::FmtTooShort(chunk_len));
    }

    let format_tag: u16 = r.read_le()?;
    if format_tag != FORMAT_TAG_PCM {
        return Err(WavError::UnsupportedEncoding(format_tag));
    }
    let num_channels: u16 = r.read_le()?;
    if num_channels != SUPPORTED_CHANNELS {
        return Err(WavError::UnsupportedChannels(num_channels));
    }
    let sample_rate: u32 = r.read_le()?;
    if sample_rate != SUPPORTED_SAMPLE_RATE {
        return Err(WavError::UnsupportedSampleRate(sample_rate));
    }
    let body = FmtBody {
        format_tag,
        num_channels,
        sample_rate,
        byte_rate: r.read_le()?,
        block_align: r.read_le()?,
        bits_per_sample: r.read_le()?,
    };

    let format = FormatDescriptor {
        num_channels: body.num_channels,
        sample_rate: body.sample_rate,
        bits_per_sample: body.bits_per_sample,
        bytes_per_sample: body.bits_per_sample / 8,
    };

    if body.byte_rate != format.byte_rate() {
        return Err(WavError::Inconsistent {
            field: "byte rate",
            declared: body.byte_rate,
            computed: format.byte_rate(),
        });
    }
    if body.block_align != format.block_align() {
        return Err(WavError::Inconsistent {
            field: "block align",
            declared: body.block_align as u32,
            computed: format.block_align() as u32,
        });
    }
    if body.bits_per_sample != SUPPORTED_BITS_PER_SAMPLE {
        return Err(WavError::UnsupportedBitDepth(body.bits_per_sample));
    }

    if chunk_len > FMT_BASE_LEN {
        let extended_size: u16 = r.read_le()?;
        if chunk_len != FMT_EXTENDED_BASE_LEN + extended_size as u32 {
            return Err(WavError::ExtensionSizeMismatch {
                chunk_len,
                extended_size,
            });
        }
        // Extension payload is not interpreted.
        skip_bytes(r, extended_size as u64)?;
    }

    Ok(format)
}

/// Read the RIFF preamble and walk chunks up to the start of the audio data.
///
/// On success the reader is positioned at byte 0 of the `data` payload.
pub fn parse_header<R: Read + Seek>(r: &mut R) -> Result<DataChunk, WavError> {
    read_riff_header(r)?;
    walk_chunks(r)
}
