//! Headless front end for wavtap.
//!
//! Turns a [`SourceConfig`] into a running [`Input`] that the caller drives
//! once per tick, and provides a few helpers for looking at what came out.

mod capture;
mod config;
mod input;

pub use capture::{capture_to_wav, write_capture, CaptureStats};
pub use config::{ConfigError, SourceConfig, SourceKind};
pub use input::{open_source, Input, SourceInfo};

// Re-export common types so callers don't need the lower crates directly.
pub use wt_audio::AudioError;
pub use wt_core::SampleSource;
pub use wt_formats::{FormatDescriptor, WavError, WavErrorKind};

use std::fmt;

/// Anything that can stop a source from opening.
#[derive(Debug)]
pub enum SourceError {
    /// Bad configuration
    Config(ConfigError),
    /// WAV header rejected or file unreadable
    Wav(WavError),
    /// Capture device unavailable
    Audio(AudioError),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Config(e) => write!(f, "Config error: {}", e),
            SourceError::Wav(e) => write!(f, "WAV error: {}", e),
            SourceError::Audio(e) => write!(f, "Audio error: {}", e),
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SourceError::Config(e) => Some(e),
            SourceError::Wav(e) => Some(e),
            SourceError::Audio(e) => Some(e),
        }
    }
}

impl From<ConfigError> for SourceError {
    fn from(e: ConfigError) -> Self {
        SourceError::Config(e)
    }
}

impl From<WavError> for SourceError {
    fn from(e: WavError) -> Self {
        SourceError::Wav(e)
    }
}

impl From<AudioError> for SourceError {
    fn from(e: AudioError) -> Self {
        SourceError::Audio(e)
    }
}
