//! Summaries and WAV export of pulled samples.

use std::fmt;
use std::io::Write;
use wt_core::{quantize, Frame};

/// Level summary of a run of samples.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CaptureStats {
    pub frames: usize,
    /// Largest absolute value.
    pub peak: f32,
    pub rms: f32,
    /// Exact zeros at the end, which is what an exhausted file produces.
    pub silent_tail: usize,
}

impl CaptureStats {
    pub fn from_samples(samples: &[f32]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }
        let peak = samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
        let sum_sq: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
        let rms = (sum_sq / samples.len() as f64).sqrt() as f32;
        let silent_tail = samples.iter().rev().take_while(|&&s| s == 0.0).count();
        Self {
            frames: samples.len(),
            peak,
            rms,
            silent_tail,
        }
    }
}

impl fmt::Display for CaptureStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Frames:   {}", self.frames)?;
        writeln!(f, "Peak:     {:.4}", self.peak)?;
        writeln!(f, "RMS:      {:.4}", self.rms)?;
        write!(f, "Silent:   {} (trailing)", self.silent_tail)
    }
}

/// Write pulled samples as 16-bit stereo PCM, same value in both channels.
pub fn write_capture(w: &mut impl Write, samples: &[f32], sample_rate: u32) -> std::io::Result<()> {
    let frames: Vec<Frame> = samples.iter().map(|&s| Frame::mono(quantize(s))).collect();
    wt_formats::write_wav(w, &frames, sample_rate)
}

pub fn capture_to_wav(samples: &[f32], sample_rate: u32) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(44 + samples.len() * 4);
    write_capture(&mut buf, samples, sample_rate)?;
    Ok(buf)
}
