//! Core sample types for wavtap.
//!
//! Everything that produces audio in the workspace speaks the same small
//! vocabulary: stereo 16-bit [`Frame`]s on disk and normalized `f32`
//! samples at the [`SampleSource`] boundary.

mod frame;
mod source;

pub use frame::{normalize, quantize, Frame};
pub use source::SampleSource;
