//! Streaming sample reader.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek};
use std::path::Path;
use tracing::{info, warn};
use wt_core::{Frame, SampleSource};

use crate::header::{parse_header, FormatDescriptor};
use crate::WavError;

/// Every accepted file is 16-bit stereo, so a frame is always 4 bytes.
const FRAME_BYTES: usize = 4;

/// Lifecycle of a [`WavReader`] after a successful open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReaderState {
    /// Frames are still being read from the payload.
    Streaming,
    /// A read came up short. Sticky: every later call yields silence.
    Exhausted,
}

/// Pulls one frame at a time from an open WAV stream.
///
/// Opening parses the header and fails with a [`WavError`]; after that,
/// running out of data is not an error and [`next_sample`](Self::next_sample)
/// just returns `0.0` forever.
pub struct WavReader<R> {
    inner: R,
    format: FormatDescriptor,
    data_len: u32,
    state: ReaderState,
    frames_read: u64,
}

impl WavReader<BufReader<File>> {
    /// Open a WAV file and position it at the first audio frame.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, WavError> {
        let file = File::open(path.as_ref())?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> WavReader<R> {
    /// Parse the header from `inner`, which must be at the start of the file.
    pub fn new(mut inner: R) -> Result<Self, WavError> {
        let data = parse_header(&mut inner)?;
        debug_assert_eq!(data.format.frame_len(), FRAME_BYTES);

        let duration_secs = data.format.duration_secs(data.len);
        info!(
            bytes_per_sample = data.format.bytes_per_sample,
            duration_secs,
            "wav stream ready"
        );

        Ok(Self {
            inner,
            format: data.format,
            data_len: data.len,
            state: ReaderState::Streaming,
            frames_read: 0,
        })
    }
}

impl<R: Read> WavReader<R> {
    /// Read the next frame and return its left channel, normalized.
    ///
    /// The right channel is read and dropped.
    pub fn next_sample(&mut self) -> f32 {
        if self.state == ReaderState::Exhausted {
            return 0.0;
        }

        let mut buf = [0u8; FRAME_BYTES];
        match self.inner.read_exact(&mut buf) {
            Ok(()) => {
                self.frames_read += 1;
                Frame::from_le_bytes(buf).left_f32()
            }
            Err(e) => {
                if e.kind() != io::ErrorKind::UnexpectedEof {
                    warn!(
                        error = %e,
                        frames = self.frames_read,
                        "wav read failed, treating as end of stream"
                    );
                }
                self.state = ReaderState::Exhausted;
                0.0
            }
        }
    }

    pub fn format(&self) -> &FormatDescriptor {
        &self.format
    }

    /// Declared byte length of the `data` chunk.
    pub fn data_len(&self) -> u32 {
        self.data_len
    }

    pub fn duration_secs(&self) -> f64 {
        self.format.duration_secs(self.data_len)
    }

    pub fn state(&self) -> ReaderState {
        self.state
    }

    pub fn is_exhausted(&self) -> bool {
        self.state == ReaderState::Exhausted
    }

    /// Complete frames returned so far.
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> SampleSource for WavReader<R> {
    fn get_sample(&mut self, _t: f64) -> f32 {
        self.next_sample()
    }
}
