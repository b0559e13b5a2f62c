//! CPAL-based audio input backend.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, SampleRate, Stream, StreamConfig};
use ringbuf::traits::{Consumer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

use crate::traits::{AudioError, AudioInput};

/// Device buffers of headroom between the callback and the reader.
const RING_BUFFERS: usize = 8;

/// Ring capacity in samples for a given device buffer size.
pub(crate) fn ring_capacity(buffer_size: usize) -> usize {
    buffer_size.max(1) * RING_BUFFERS
}

/// State the device callbacks report into.
#[derive(Default)]
struct StreamStatus {
    failed: AtomicBool,
    last_error: Mutex<Option<String>>,
    dropped: AtomicU64,
}

impl StreamStatus {
    fn record_error(&self, msg: String) {
        if let Ok(mut slot) = self.last_error.lock() {
            *slot = Some(msg);
        }
        self.failed.store(true, Ordering::Release);
    }

    fn error(&self) -> AudioError {
        let msg = self
            .last_error
            .lock()
            .ok()
            .and_then(|slot| slot.clone())
            .unwrap_or_else(|| "unknown input stream failure".to_string());
        AudioError::Stream(msg)
    }
}

/// Push the first channel of each interleaved device frame into the ring,
/// counting what does not fit.
fn push_frames(
    producer: &mut HeapProd<f32>,
    data: &[f32],
    channels: usize,
    status: &StreamStatus,
) {
    let mut dropped = 0;
    for frame in data.chunks(channels.max(1)) {
        if producer.try_push(frame[0]).is_err() {
            dropped += 1;
        }
    }
    if dropped > 0 {
        status.dropped.fetch_add(dropped, Ordering::Relaxed);
    }
}

/// Reader side of the capture ring.
struct Drain {
    consumer: HeapCons<f32>,
    status: Arc<StreamStatus>,
    reported_dropped: u64,
}

impl Drain {
    /// Fill all of `buffer`, spinning while the ring is empty.
    ///
    /// Gives up with the recorded stream error as soon as the device
    /// callback has reported one.
    fn fill(&mut self, buffer: &mut [f32]) -> Result<usize, AudioError> {
        let mut filled = 0;
        while filled < buffer.len() {
            if self.status.failed.load(Ordering::Acquire) {
                return Err(self.status.error());
            }
            let n = self.consumer.pop_slice(&mut buffer[filled..]);
            if n == 0 {
                std::thread::yield_now();
            }
            filled += n;
        }

        let dropped = self.dropped();
        if dropped > self.reported_dropped {
            debug!(dropped = dropped - self.reported_dropped, "input overrun");
            self.reported_dropped = dropped;
        }
        Ok(filled)
    }

    fn dropped(&self) -> u64 {
        self.status.dropped.load(Ordering::Relaxed)
    }
}

/// CPAL-based mono input from the default capture device.
pub struct CpalInput {
    config: StreamConfig,
    stream: Stream,
    drain: Drain,
    running: Arc<AtomicBool>,
}

impl CpalInput {
    /// Open and start a mono f32 capture stream on the default input device.
    pub fn open_stream(sample_rate: u32, buffer_size: usize) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_input_device().ok_or(AudioError::NoDevice)?;

        let config = device
            .default_input_config()
            .map_err(|e| AudioError::DeviceInit(e.to_string()))?;

        let mut config: StreamConfig = config.into();
        // The callback only keeps the first channel, so ask for exactly one.
        config.channels = 1;
        config.sample_rate = SampleRate(sample_rate);
        config.buffer_size = BufferSize::Fixed(buffer_size as u32);

        let rb = HeapRb::<f32>::new(ring_capacity(buffer_size));
        let (mut producer, consumer) = rb.split();
        let status = Arc::new(StreamStatus::default());

        let channels = config.channels as usize;
        let status_data = status.clone();
        let status_err = status.clone();

        let stream = device
            .build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    push_frames(&mut producer, data, channels, &status_data);
                },
                move |err| {
                    warn!(error = %err, "input stream error");
                    status_err.record_error(err.to_string());
                },
                None,
            )
            .map_err(|e| AudioError::StreamCreate(e.to_string()))?;

        let mut input = Self {
            config,
            stream,
            drain: Drain {
                consumer,
                status,
                reported_dropped: 0,
            },
            running: Arc::new(AtomicBool::new(false)),
        };
        input.start()?;

        let name = device.name().unwrap_or_default();
        info!(device = %name, sample_rate, buffer_size, "input stream started");
        Ok(input)
    }

    /// Samples discarded because the reader fell behind.
    pub fn dropped_samples(&self) -> u64 {
        self.drain.dropped()
    }
}

impl AudioInput for CpalInput {
    fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    fn read(&mut self, buffer: &mut [f32]) -> Result<usize, AudioError> {
        if !self.running.load(Ordering::Relaxed) {
            return Err(AudioError::Playback("input stream is stopped".to_string()));
        }
        self.drain.fill(buffer)
    }

    fn start(&mut self) -> Result<(), AudioError> {
        self.stream
            .play()
            .map_err(|e| AudioError::Playback(e.to_string()))?;
        self.running.store(true, Ordering::Relaxed);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        self.running.store(false, Ordering::Relaxed);
        self.stream
            .pause()
            .map_err(|e| AudioError::Playback(e.to_string()))
    }
}
