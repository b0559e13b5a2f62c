//! Opening a configured source and driving it tick by tick.

use std::fmt;
use tracing::info;
use wt_audio::MicSource;
use wt_core::SampleSource;
use wt_formats::{FormatDescriptor, WavReader};

use crate::config::{SourceConfig, SourceKind};
use crate::SourceError;

/// What was opened, for diagnostics.
#[derive(Clone, Debug, PartialEq)]
pub enum SourceInfo {
    Wav {
        format: FormatDescriptor,
        data_len: u32,
    },
    Microphone {
        sample_rate: u32,
        buffer_size: usize,
    },
}

impl SourceInfo {
    /// Playing time of the WAV data, if the source is a file.
    pub fn duration_secs(&self) -> Option<f64> {
        match self {
            SourceInfo::Wav { format, data_len } => Some(format.duration_secs(*data_len)),
            SourceInfo::Microphone { .. } => None,
        }
    }
}

impl fmt::Display for SourceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceInfo::Wav { format, data_len } => {
                writeln!(f, "bytesPerSample: {}", format.bytes_per_sample)?;
                write!(f, "len: {:.2} secs", format.duration_secs(*data_len))
            }
            SourceInfo::Microphone {
                sample_rate,
                buffer_size,
            } => write!(
                f,
                "microphone: {} Hz, {} frames per buffer",
                sample_rate, buffer_size
            ),
        }
    }
}

/// Open the source described by `config`.
///
/// All header, format and device problems surface here; once this returns
/// `Ok` the source never fails, it only goes quiet.
pub fn open_source(
    config: &SourceConfig,
) -> Result<(Box<dyn SampleSource>, SourceInfo), SourceError> {
    config.validate()?;

    match &config.kind {
        SourceKind::File(path) => {
            let reader = WavReader::open(path)?;
            let info = SourceInfo::Wav {
                format: *reader.format(),
                data_len: reader.data_len(),
            };
            info!(path = %path.display(), "opened wav source");
            let source: Box<dyn SampleSource> = Box::new(reader);
            Ok((source, info))
        }
        SourceKind::Microphone => {
            let mic = MicSource::open(config.sample_rate, config.buffer_size)?;
            let info = SourceInfo::Microphone {
                sample_rate: config.sample_rate,
                buffer_size: config.buffer_size,
            };
            let source: Box<dyn SampleSource> = Box::new(mic);
            Ok((source, info))
        }
    }
}

/// A source plus the tick clock that drives it.
///
/// Each tick calls `get_sample(t)` once with `t = tick / sample_rate`.
pub struct Input {
    source: Box<dyn SampleSource>,
    info: SourceInfo,
    sample_rate: u32,
    tick: u64,
}

impl Input {
    pub fn new(source: Box<dyn SampleSource>, info: SourceInfo, sample_rate: u32) -> Self {
        Self {
            source,
            info,
            sample_rate,
            tick: 0,
        }
    }

    pub fn open(config: &SourceConfig) -> Result<Self, SourceError> {
        let (source, info) = open_source(config)?;
        Ok(Self::new(source, info, config.sample_rate))
    }

    pub fn info(&self) -> &SourceInfo {
        &self.info
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Ticks consumed so far.
    pub fn ticks(&self) -> u64 {
        self.tick
    }

    /// Time of the next tick in seconds.
    pub fn time(&self) -> f64 {
        self.tick as f64 / self.sample_rate as f64
    }

    /// Advance one tick.
    pub fn next_sample(&mut self) -> f32 {
        let t = self.time();
        self.get_sample(t)
    }

    /// Advance `frames` ticks, collecting the samples.
    pub fn pull(&mut self, frames: usize) -> Vec<f32> {
        let mut out = vec![0.0; frames];
        self.pull_into(&mut out);
        out
    }

    pub fn pull_into(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.next_sample();
        }
    }
}

impl SampleSource for Input {
    fn get_sample(&mut self, t: f64) -> f32 {
        self.tick += 1;
        self.source.get_sample(t)
    }
}
