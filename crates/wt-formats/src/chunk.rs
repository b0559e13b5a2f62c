//! RIFF chunk traversal.

use binrw::{BinRead, BinWrite};
use std::io::{self, Read, Seek, SeekFrom};
use tracing::debug;

use crate::header::{read_fmt_chunk, FormatDescriptor};
use crate::WavError;

const FMT_ID: [u8; 4] = *b"fmt ";
const DATA_ID: [u8; 4] = *b"data";

/// Tag and byte length that precede every chunk payload.
#[derive(BinRead, BinWrite, Clone, Copy, Debug, PartialEq, Eq)]
#[brw(little)]
pub struct ChunkHeader {
    pub id: [u8; 4],
    pub len: u32,
}

impl ChunkHeader {
    pub fn id_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.id)
    }
}

/// Where the audio payload starts: the validated format and the declared
/// byte length of the `data` chunk.
///
/// `len` is informational. Nothing stops a reader from running past it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DataChunk {
    pub format: FormatDescriptor,
    pub len: u32,
}

/// Advance `n` bytes with a relative seek, failing if the stream is shorter.
///
/// A plain seek past the end succeeds on most streams, so the target is
/// checked against the stream length first.
pub fn skip_bytes<R: Seek>(r: &mut R, n: u64) -> io::Result<()> {
    let pos = r.stream_position()?;
    let end = r.seek(SeekFrom::End(0))?;
    let target = pos.saturating_add(n);
    if target > end {
        r.seek(SeekFrom::Start(pos))?;
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("cannot skip {} bytes at offset {}: stream ends at {}", n, pos, end),
        ));
    }
    r.seek(SeekFrom::Start(target))?;
    Ok(())
}

/// Walk chunks from just after the RIFF preamble until the `data` chunk.
///
/// `fmt ` chunks are parsed (a later one replaces an earlier one), anything
/// else is skipped. Odd-length chunks are not followed by a pad byte here.
pub fn walk_chunks<R: Read + Seek>(r: &mut R) -> Result<DataChunk, WavError> {
    let mut format: Option<FormatDescriptor> = None;

    loop {
        let header = ChunkHeader::read(r)?;
        match header.id {
            FMT_ID => format = Some(read_fmt_chunk(r, header.len)?),
            DATA_ID => {
                let format = format
                    .filter(FormatDescriptor::is_complete)
                    .ok_or(WavError::DataBeforeFmt)?;
                return Ok(DataChunk {
                    format,
                    len: header.len,
                });
            }
            _ => {
                debug!(chunk = %header.id_lossy(), len = header.len, "skipping chunk");
                skip_bytes(r, header.len as u64)?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{chunk, data_chunk, fmt_chunk, riff, FmtFields};
    use crate::{parse_header, WavErrorKind};
    use std::io::Cursor;

    fn stereo_fmt() -> Vec<u8> {
        fmt_chunk(&FmtFields::pcm_stereo_16(), None)
    }

    #[test]
    fn reads_chunk_header() {
        let mut cursor = Cursor::new(chunk(b"LIST", &[1, 2, 3]));
        let header = ChunkHeader::read(&mut cursor).unwrap();
        assert_eq!(header, ChunkHeader { id: *b"LIST", len: 3 });
        assert_eq!(header.id_lossy(), "LIST");
    }

    #[test]
    fn skips_unknown_chunks_before_fmt_and_data() {
        let wav = riff(&[
            chunk(b"JUNK", &[0xEE; 28]),
            stereo_fmt(),
            chunk(b"LIST", b"INFOISFT\x04\x00\x00\x00abc\x00"),
            data_chunk(&[(100, -100)]),
        ]);
        let mut cursor = Cursor::new(wav.clone());
        let data = parse_header(&mut cursor).unwrap();
        assert_eq!(data.len, 4);
        assert_eq!(cursor.position() as usize, wav.len() - 4);
    }

    #[test]
    fn data_before_fmt_is_rejected() {
        let wav = riff(&[data_chunk(&[(1, 1)]), stereo_fmt()]);
        let err = parse_header(&mut Cursor::new(wav)).unwrap_err();
        assert!(matches!(err, WavError::DataBeforeFmt));
        assert_eq!(err.kind(), WavErrorKind::Sequence);
    }

    #[test]
    fn data_after_only_unknown_chunks_is_rejected() {
        let wav = riff(&[chunk(b"fact", &[0; 4]), data_chunk(&[])]);
        let err = parse_header(&mut Cursor::new(wav)).unwrap_err();
        assert_eq!(err.kind(), WavErrorKind::Sequence);
    }

    #[test]
    fn later_fmt_chunk_replaces_earlier() {
        let wav = riff(&[stereo_fmt(), stereo_fmt(), data_chunk(&[(0, 0)])]);
        assert!(parse_header(&mut Cursor::new(wav)).is_ok());

        let bad_second = riff(&[
            stereo_fmt(),
            fmt_chunk(&FmtFields::pcm(1, 44100, 16), None),
            data_chunk(&[(0, 0)]),
        ]);
        let err = parse_header(&mut Cursor::new(bad_second)).unwrap_err();
        assert!(matches!(err, WavError::UnsupportedChannels(1)));
    }

    #[test]
    fn short_skip_is_io_error() {
        let mut wav = riff(&[stereo_fmt()]);
        wav.extend(b"LIST");
        wav.extend(&1000u32.to_le_bytes());
        wav.extend(&[0u8; 10]);
        let err = parse_header(&mut Cursor::new(wav)).unwrap_err();
        assert_eq!(err.kind(), WavErrorKind::Io);
    }

    #[test]
    fn missing_data_chunk_is_io_error() {
        let wav = riff(&[stereo_fmt(), chunk(b"JUNK", &[0; 8])]);
        let err = parse_header(&mut Cursor::new(wav)).unwrap_err();
        assert_eq!(err.kind(), WavErrorKind::Io);
        match &err {
            WavError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("expected Io, got {:?}", other),
        }
        let msg = err.to_string();
        assert!(!msg.contains('\n'), "multi-line diagnostic: {:?}", msg);
        assert!(!msg.contains("Backtrace"), "backtrace in diagnostic: {:?}", msg);
    }

    #[test]
    fn truncated_chunk_header_keeps_eof_kind() {
        let mut wav = riff(&[stereo_fmt()]);
        wav.extend(b"da");
        match parse_header(&mut Cursor::new(wav)).unwrap_err() {
            WavError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("expected Io, got {:?}", other),
        }
    }

    #[test]
    fn chunk_header_writes_its_read_layout() {
        let header = ChunkHeader { id: *b"data", len: 0x0102_0304 };
        let mut cursor = Cursor::new(Vec::new());
        header.write(&mut cursor).unwrap();
        assert_eq!(cursor.get_ref(), &b"data\x04\x03\x02\x01".to_vec());
    }

    #[test]
    fn skip_bytes_leaves_position_on_failure() {
        let mut cursor = Cursor::new(vec![0u8; 10]);
        cursor.set_position(4);
        assert!(skip_bytes(&mut cursor, 6).is_ok());
        assert_eq!(cursor.position(), 10);
        cursor.set_position(4);
        assert!(skip_bytes(&mut cursor, 7).is_err());
        assert_eq!(cursor.position(), 4);
    }
}
