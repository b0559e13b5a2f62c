//! Integration tests: WAV files on disk → WavReader → samples.

use std::fs;
use std::path::PathBuf;
use wt_core::{Frame, SampleSource};
use wt_formats::{frames_to_wav, WavError, WavErrorKind, WavReader};

fn scratch_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("wt-formats-tests-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}

fn ramp(len: usize) -> Vec<Frame> {
    (0..len)
        .map(|i| Frame {
            left: (i as i16).wrapping_mul(97),
            right: -(i as i16),
        })
        .collect()
}

#[test]
fn file_yields_left_channel_then_silence() {
    let frames = ramp(1000);
    let path = scratch_path("ramp.wav");
    fs::write(&path, frames_to_wav(&frames, 44100).unwrap()).unwrap();

    let mut reader = WavReader::open(&path).unwrap();
    assert_eq!(reader.data_len(), 4000);
    assert_eq!(reader.format().bytes_per_sample, 2);

    for (i, frame) in frames.iter().enumerate() {
        let expected = frame.left as f32 / 32767.0;
        assert_eq!(reader.get_sample(i as f64 / 44100.0), expected, "frame {}", i);
    }
    for _ in 0..100 {
        assert_eq!(reader.next_sample(), 0.0);
    }
    assert_eq!(reader.frames_read(), 1000);
}

#[test]
fn wrong_rate_file_fails_before_any_sample() {
    let path = scratch_path("48k.wav");
    fs::write(&path, frames_to_wav(&ramp(10), 48000).unwrap()).unwrap();

    match WavReader::open(&path) {
        Err(WavError::UnsupportedSampleRate(48000)) => {}
        Err(other) => panic!("expected UnsupportedSampleRate, got {:?}", other),
        Ok(_) => panic!("48 kHz file was accepted"),
    }
}

#[test]
fn data_before_fmt_file_is_rejected() {
    let canonical = frames_to_wav(&ramp(2), 44100).unwrap();
    // Swap the fmt (bytes 12..36) and data (36..52) chunks.
    let mut reordered = canonical[..12].to_vec();
    reordered.extend(&canonical[36..]);
    reordered.extend(&canonical[12..36]);
    let path = scratch_path("reordered.wav");
    fs::write(&path, reordered).unwrap();

    let err = WavReader::open(&path).err().expect("reordered file was accepted");
    assert_eq!(err.kind(), WavErrorKind::Sequence);
}

#[test]
fn missing_file_is_io_error() {
    let err = WavReader::open(scratch_path("does-not-exist.wav"))
        .err()
        .expect("missing file opened");
    assert_eq!(err.kind(), WavErrorKind::Io);
}
