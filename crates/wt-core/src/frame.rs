//! Audio frame type.

/// Full-scale divisor used for normalization. Deliberately 32767 rather than
/// 32768, so `i16::MIN` maps slightly below -1.0.
const FULL_SCALE: f32 = 32767.0;

/// A stereo audio frame (16-bit integer).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    pub left: i16,
    pub right: i16,
}

impl Frame {
    /// Create a silent frame.
    pub const fn silence() -> Self {
        Self { left: 0, right: 0 }
    }

    /// Create a mono frame (same value for both channels).
    pub const fn mono(value: i16) -> Self {
        Self {
            left: value,
            right: value,
        }
    }

    /// Decode an interleaved little-endian frame (left first).
    pub const fn from_le_bytes(bytes: [u8; 4]) -> Self {
        Self {
            left: i16::from_le_bytes([bytes[0], bytes[1]]),
            right: i16::from_le_bytes([bytes[2], bytes[3]]),
        }
    }

    pub fn to_le_bytes(self) -> [u8; 4] {
        let [l0, l1] = self.left.to_le_bytes();
        let [r0, r1] = self.right.to_le_bytes();
        [l0, l1, r0, r1]
    }

    /// Left channel as a normalized float.
    pub fn left_f32(self) -> f32 {
        normalize(self.left)
    }
}

/// Scale a raw 16-bit sample to roughly [-1.0, 1.0].
#[inline]
pub fn normalize(raw: i16) -> f32 {
    raw as f32 / FULL_SCALE
}

/// Inverse of [`normalize`], clamping out-of-range input.
pub fn quantize(value: f32) -> i16 {
    let clamped = if value.is_nan() { 0.0 } else { value.clamp(-1.0, 1.0) };
    (clamped * FULL_SCALE).round() as i16
}
