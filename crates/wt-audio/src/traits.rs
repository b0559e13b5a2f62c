//! Audio input trait and error types.

/// Error type for audio operations.
#[derive(Debug)]
pub enum AudioError {
    /// Failed to initialize audio device
    DeviceInit(String),
    /// Failed to create audio stream
    StreamCreate(String),
    /// Failed to start or pause the stream
    Playback(String),
    /// The running stream reported an error
    Stream(String),
    /// No audio device available
    NoDevice,
}

impl std::fmt::Display for AudioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioError::DeviceInit(msg) => write!(f, "Device init error: {}", msg),
            AudioError::StreamCreate(msg) => write!(f, "Stream create error: {}", msg),
            AudioError::Playback(msg) => write!(f, "Playback error: {}", msg),
            AudioError::Stream(msg) => write!(f, "Stream error: {}", msg),
            AudioError::NoDevice => write!(f, "No audio input device available"),
        }
    }
}

impl std::error::Error for AudioError {}

/// Trait for blocking audio input backends.
pub trait AudioInput {
    /// Get the sample rate.
    fn sample_rate(&self) -> u32;

    /// Fill `buffer` with the next `buffer.len()` mono frames, blocking until
    /// they have all arrived. Returns the number of frames written.
    fn read(&mut self, buffer: &mut [f32]) -> Result<usize, AudioError>;

    /// Start capture.
    fn start(&mut self) -> Result<(), AudioError>;

    /// Stop capture.
    fn stop(&mut self) -> Result<(), AudioError>;
}
