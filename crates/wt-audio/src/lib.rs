//! Microphone input for wavtap.
//!
//! [`CpalInput`] captures from the default input device; [`MicSource`]
//! turns any blocking [`AudioInput`] into a one-sample-per-call
//! [`wt_core::SampleSource`].

mod cpal_backend;
mod mic;
mod traits;

pub use cpal_backend::CpalInput;
pub use mic::MicSource;
pub use traits::{AudioError, AudioInput};
