//! Microphone sample source.

use tracing::warn;
use wt_core::SampleSource;

use crate::cpal_backend::CpalInput;
use crate::traits::{AudioError, AudioInput};

/// Serves an [`AudioInput`] one sample per call.
///
/// Keeps a block of `buffer_size` floats and refills the whole block with a
/// single blocking read whenever it has been handed out.
pub struct MicSource<I> {
    input: I,
    buffer: Vec<f32>,
    next: usize,
    failed_reads: u64,
}

impl MicSource<CpalInput> {
    /// Open the default input device at `sample_rate` with `buffer_size`
    /// frames per block.
    pub fn open(sample_rate: u32, buffer_size: usize) -> Result<Self, AudioError> {
        let input = CpalInput::open_stream(sample_rate, buffer_size)?;
        Ok(Self::new(input, buffer_size))
    }
}

impl<I: AudioInput> MicSource<I> {
    pub fn new(input: I, buffer_size: usize) -> Self {
        let buffer_size = buffer_size.max(1);
        Self {
            input,
            buffer: vec![0.0; buffer_size],
            // Start at the end so the first call triggers a read.
            next: buffer_size,
            failed_reads: 0,
        }
    }

    pub fn next_sample(&mut self) -> f32 {
        if self.next >= self.buffer.len() {
            self.refill();
        }
        let sample = self.buffer[self.next];
        self.next += 1;
        sample
    }

    fn refill(&mut self) {
        if let Err(e) = self.input.read(&mut self.buffer) {
            // Keep the caller's clock running on silence.
            if self.failed_reads == 0 {
                warn!(error = %e, "microphone read failed");
            }
            self.failed_reads += 1;
            self.buffer.fill(0.0);
        }
        self.next = 0;
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer.len()
    }

    /// Blocks that could not be read and were replaced by silence.
    pub fn failed_reads(&self) -> u64 {
        self.failed_reads
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn into_inner(self) -> I {
        self.input
    }
}

impl<I: AudioInput> SampleSource for MicSource<I> {
    fn get_sample(&mut self, _t: f64) -> f32 {
        self.next_sample()
    }
}
