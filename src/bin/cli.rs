//! wavtap CLI — pull samples from a WAV file or the microphone.
//!
//! Usage:
//!   wt-cli path/to/file.wav [--frames N] [--wav output.wav]
//!   wt-cli --mic [--rate N] [--buffer N] [--seconds S] [--wav output.wav]
//!
//! Set `RUST_LOG=debug` for chunk-level diagnostics.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::{env, process};
use tracing_subscriber::EnvFilter;
use wt_source::{CaptureStats, Input, SourceConfig, SourceError, SourceInfo};

const USAGE: &str = "Usage: wt-cli <file.wav> [--frames N] [--wav output.wav]\n       \
                     wt-cli --mic [--rate N] [--buffer N] [--seconds S] [--wav output.wav]";

/// Microphone capture length when nothing else is asked for.
const DEFAULT_MIC_SECONDS: f64 = 5.0;

fn main() {
    init_logging();

    let args: Vec<String> = env::args().collect();
    let config = SourceConfig::from_args(&args).unwrap_or_else(|e| {
        eprintln!("{}", e);
        eprintln!("{}", USAGE);
        process::exit(1);
    });

    let wav_path = flag_value(&args, "--wav");

    let mut input = Input::open(&config).unwrap_or_else(|e| {
        report_open_error(&e);
        process::exit(1);
    });

    println!("{}", input.info());
    println!();

    let frames = frames_to_pull(&args, input.info(), config.sample_rate).unwrap_or_else(|msg| {
        eprintln!("{}", msg);
        eprintln!("{}", USAGE);
        process::exit(1);
    });

    let samples = pull_with_progress(&mut input, frames);
    println!("{}", CaptureStats::from_samples(&samples));

    if let Some(path) = wav_path {
        write_wav(&path, &samples, config.sample_rate);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn report_open_error(e: &SourceError) {
    match e {
        SourceError::Wav(wav) => eprintln!("Failed to open WAV ({:?}): {}", wav.kind(), wav),
        other => eprintln!("Failed to open source: {}", other),
    }
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

/// `--frames` wins over `--seconds`; otherwise a file is pulled to its
/// declared end and the microphone for a few seconds.
fn frames_to_pull(args: &[String], info: &SourceInfo, sample_rate: u32) -> Result<usize, String> {
    if let Some(v) = flag_value(args, "--frames") {
        return v
            .parse()
            .map_err(|_| format!("invalid value {:?} for --frames", v));
    }
    let seconds = match flag_value(args, "--seconds") {
        Some(v) => v
            .parse::<f64>()
            .ok()
            .filter(|s| s.is_finite() && *s >= 0.0)
            .ok_or_else(|| format!("invalid value {:?} for --seconds", v))?,
        None => match info {
            SourceInfo::Wav { format, data_len } => {
                return Ok(*data_len as usize / format.frame_len());
            }
            SourceInfo::Microphone { .. } => DEFAULT_MIC_SECONDS,
        },
    };
    Ok((seconds * sample_rate as f64).round() as usize)
}

fn pull_with_progress(input: &mut Input, frames: usize) -> Vec<f32> {
    let block = (input.sample_rate() as usize / 10).max(1);
    let mut samples = vec![0.0; frames];

    for chunk in samples.chunks_mut(block) {
        input.pull_into(chunk);
        print!("\rPulled: {:>10} frames ({:.1} s)", input.ticks(), input.time());
        let _ = std::io::stdout().flush();
    }
    println!();
    println!();
    samples
}

fn write_wav(path: &str, samples: &[f32], sample_rate: u32) {
    println!("Writing {} frames to {}...", samples.len(), path);
    let result = File::create(path).and_then(|file| {
        let mut w = BufWriter::new(file);
        wt_source::write_capture(&mut w, samples, sample_rate)?;
        w.flush()
    });
    if let Err(e) = result {
        eprintln!("Failed to write {}: {}", path, e);
        process::exit(1);
    }
    println!("Done.");
}
