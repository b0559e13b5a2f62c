//! Source configuration from command-line arguments and the environment.

use std::fmt;
use std::path::PathBuf;

pub const ENV_FILE: &str = "WAVTAP_FILE";
pub const ENV_MIC: &str = "WAVTAP_MIC";
pub const ENV_SAMPLE_RATE: &str = "WAVTAP_SAMPLE_RATE";
pub const ENV_BUFFER_SIZE: &str = "WAVTAP_BUFFER_SIZE";

/// Where samples come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceKind {
    File(PathBuf),
    Microphone,
}

/// Everything needed to open a source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceConfig {
    pub kind: SourceKind,
    /// Tick rate of the caller, and the capture rate for the microphone.
    pub sample_rate: u32,
    /// Microphone block size in frames.
    pub buffer_size: usize,
}

/// Error type for configuration.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Neither a file nor `--mic` was given
    MissingSource,
    /// Both a file and `--mic` were given
    ConflictingSources,
    /// A numeric option could not be parsed
    InvalidNumber { option: String, value: String },
    /// A flag that needs a value was last on the command line
    MissingValue(String),
    ZeroSampleRate,
    ZeroBufferSize,
    /// WAV files only play at 44100 Hz
    FileRateMismatch(u32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingSource => write!(f, "no source: give a WAV file or --mic"),
            ConfigError::ConflictingSources => {
                write!(f, "give either a WAV file or --mic, not both")
            }
            ConfigError::InvalidNumber { option, value } => {
                write!(f, "invalid value {:?} for {}", value, option)
            }
            ConfigError::MissingValue(option) => write!(f, "{} needs a value", option),
            ConfigError::ZeroSampleRate => write!(f, "sample rate must be non-zero"),
            ConfigError::ZeroBufferSize => write!(f, "buffer size must be non-zero"),
            ConfigError::FileRateMismatch(rate) => write!(
                f,
                "WAV files play at {} Hz, not {} Hz",
                wt_formats::SUPPORTED_SAMPLE_RATE,
                rate
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

impl SourceConfig {
    pub const DEFAULT_SAMPLE_RATE: u32 = 44100;
    pub const DEFAULT_BUFFER_SIZE: usize = 128;

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: SourceKind::File(path.into()),
            sample_rate: Self::DEFAULT_SAMPLE_RATE,
            buffer_size: Self::DEFAULT_BUFFER_SIZE,
        }
    }

    pub fn microphone() -> Self {
        Self {
            kind: SourceKind::Microphone,
            sample_rate: Self::DEFAULT_SAMPLE_RATE,
            buffer_size: Self::DEFAULT_BUFFER_SIZE,
        }
    }

    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        if self.buffer_size == 0 {
            return Err(ConfigError::ZeroBufferSize);
        }
        if matches!(self.kind, SourceKind::File(_))
            && self.sample_rate != wt_formats::SUPPORTED_SAMPLE_RATE
        {
            return Err(ConfigError::FileRateMismatch(self.sample_rate));
        }
        Ok(())
    }

    /// Build a config from `args`, with the process environment filling in
    /// whatever the arguments leave out.
    pub fn from_args(args: &[String]) -> Result<Self, ConfigError> {
        Self::resolve(args, |key| std::env::var(key).ok())
    }

    /// Build a config from the `WAVTAP_*` environment variables alone.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(&[], |key| std::env::var(key).ok())
    }

    /// Build a config from `args` (as in `env::args()`, program name first),
    /// falling back to `lookup` for anything the arguments leave out.
    ///
    /// Arguments: `<file.wav>` as the first argument, or `--mic`; plus
    /// `--rate N` and `--buffer N`.
    pub fn resolve<F>(args: &[String], lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let arg_file = args
            .get(1)
            .filter(|a| !a.starts_with("--"))
            .map(PathBuf::from);
        let arg_mic = args.iter().any(|a| a == "--mic");

        let kind = match (arg_file, arg_mic) {
            (Some(_), true) => return Err(ConfigError::ConflictingSources),
            (Some(path), false) => SourceKind::File(path),
            (None, true) => SourceKind::Microphone,
            (None, false) => {
                let env_file = lookup(ENV_FILE).filter(|v| !v.is_empty());
                let env_mic = lookup(ENV_MIC).is_some_and(|v| is_truthy(&v));
                match (env_file, env_mic) {
                    (Some(_), true) => return Err(ConfigError::ConflictingSources),
                    (Some(path), false) => SourceKind::File(PathBuf::from(path)),
                    (None, true) => SourceKind::Microphone,
                    (None, false) => return Err(ConfigError::MissingSource),
                }
            }
        };

        let sample_rate = match option_value(args, "--rate")? {
            Some(v) => parse_number("--rate", &v)?,
            None => match lookup(ENV_SAMPLE_RATE) {
                Some(v) => parse_number(ENV_SAMPLE_RATE, &v)?,
                None => Self::DEFAULT_SAMPLE_RATE,
            },
        };
        let buffer_size = match option_value(args, "--buffer")? {
            Some(v) => parse_number("--buffer", &v)?,
            None => match lookup(ENV_BUFFER_SIZE) {
                Some(v) => parse_number(ENV_BUFFER_SIZE, &v)?,
                None => Self::DEFAULT_BUFFER_SIZE,
            },
        };

        let config = Self {
            kind,
            sample_rate,
            buffer_size,
        };
        config.validate()?;
        Ok(config)
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Value following `flag`, if the flag is present.
fn option_value(args: &[String], flag: &str) -> Result<Option<String>, ConfigError> {
    match args.iter().position(|a| a == flag) {
        Some(i) => args
            .get(i + 1)
            .cloned()
            .map(Some)
            .ok_or_else(|| ConfigError::MissingValue(flag.to_string())),
        None => Ok(None),
    }
}

fn parse_number<T: std::str::FromStr>(option: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        option: option.to_string(),
        value: value.to_string(),
    })
}
