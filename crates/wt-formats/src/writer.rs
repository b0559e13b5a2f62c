//! WAV encoding, built from the same records the parser reads.
//!
//! Always produces the one profile the reader accepts: a 44-byte canonical
//! header followed by interleaved 16-bit stereo frames.

use binrw::io::NoSeek;
use binrw::BinWrite;
use std::io::{self, Write};
use wt_core::Frame;

use crate::chunk::ChunkHeader;
use crate::header::FmtBody;
use crate::{into_io_error, SUPPORTED_BITS_PER_SAMPLE, SUPPORTED_CHANNELS};

/// "WAVE" tag plus the `fmt ` chunk header and body, counted in the RIFF size.
const RIFF_OVERHEAD: u32 = 4 + 8 + 16 + 8;

/// Encode `frames` as a 16-bit stereo PCM WAV stream at `sample_rate`.
pub fn write_wav(w: &mut impl Write, frames: &[Frame], sample_rate: u32) -> io::Result<()> {
    let fmt = FmtBody::pcm(SUPPORTED_CHANNELS, sample_rate, SUPPORTED_BITS_PER_SAMPLE);
    let data_len = frames.len() as u32 * fmt.block_align as u32;

    // binrw wants Seek; the records are written strictly in order, so it
    // never has to.
    let mut out = NoSeek::new(w);
    let riff = ChunkHeader {
        id: *b"RIFF",
        len: RIFF_OVERHEAD + data_len,
    };
    riff.write(&mut out).map_err(into_io_error)?;
    out.write_all(b"WAVE")?;

    let fmt_header = ChunkHeader {
        id: *b"fmt ",
        len: 16,
    };
    fmt_header.write(&mut out).map_err(into_io_error)?;
    fmt.write(&mut out).map_err(into_io_error)?;

    let data_header = ChunkHeader {
        id: *b"data",
        len: data_len,
    };
    data_header.write(&mut out).map_err(into_io_error)?;
    for frame in frames {
        out.write_all(&frame.to_le_bytes())?;
    }
    Ok(())
}

/// [`write_wav`] into a fresh buffer.
pub fn frames_to_wav(frames: &[Frame], sample_rate: u32) -> io::Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(44 + frames.len() * 4);
    write_wav(&mut buf, frames, sample_rate)?;
    Ok(buf)
}
