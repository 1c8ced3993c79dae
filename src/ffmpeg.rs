//! Process-wide FFmpeg setup.
//!
//! FFmpeg keeps its format and codec registries in global state. This module
//! runs the library's one-time initialisation exactly once per process and
//! exposes a thin wrapper around FFmpeg's own log-level API, so callers can
//! quiet the library's console output without importing `ffmpeg-next`.
//!
//! # Example
//!
//! ```no_run
//! use framegrab::FfmpegLogLevel;
//!
//! framegrab::set_ffmpeg_log_level(FfmpegLogLevel::Error);
//! framegrab::ffmpeg::initialize().unwrap();
//! ```
//!
//! # Note
//!
//! The log level controls **FFmpeg's own console output**, not the Rust-side
//! diagnostics emitted through the `log` crate.

use std::sync::OnceLock;

use ffmpeg_next::util::log::Level;

use crate::error::FrameGrabError;

static INITIALIZED: OnceLock<Result<(), String>> = OnceLock::new();

/// Initialise the FFmpeg registries.
///
/// The first call performs the initialisation; every later call returns the
/// cached outcome without touching FFmpeg again. No teardown is needed.
///
/// # Errors
///
/// Returns [`FrameGrabError::FfmpegError`] if FFmpeg refused to initialise.
pub fn initialize() -> Result<(), FrameGrabError> {
    INITIALIZED
        .get_or_init(|| {
            log::debug!("Initialising FFmpeg registries");
            ffmpeg_next::init().map_err(|error| error.to_string())
        })
        .clone()
        .map_err(FrameGrabError::FfmpegError)
}

/// FFmpeg internal log verbosity level.
///
/// Maps directly to FFmpeg's `AV_LOG_*` constants. Setting a level causes
/// FFmpeg to suppress all messages below that severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FfmpegLogLevel {
    /// Print no output at all.
    Quiet,
    /// Only log conditions that abort the process.
    Panic,
    /// Only log unrecoverable errors.
    Fatal,
    /// Log recoverable errors.
    Error,
    /// Log warnings (default FFmpeg level).
    Warning,
    /// Log informational messages.
    Info,
    /// Log verbose informational messages.
    Verbose,
    /// Log debugging messages.
    Debug,
    /// Extremely verbose tracing output.
    Trace,
}

impl FfmpegLogLevel {
    /// Parse a level name as accepted on the command line.
    ///
    /// Matching is case-insensitive; `warn` is accepted for `warning`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "quiet" => Some(FfmpegLogLevel::Quiet),
            "panic" => Some(FfmpegLogLevel::Panic),
            "fatal" => Some(FfmpegLogLevel::Fatal),
            "error" => Some(FfmpegLogLevel::Error),
            "warning" | "warn" => Some(FfmpegLogLevel::Warning),
            "info" => Some(FfmpegLogLevel::Info),
            "verbose" => Some(FfmpegLogLevel::Verbose),
            "debug" => Some(FfmpegLogLevel::Debug),
            "trace" => Some(FfmpegLogLevel::Trace),
            _ => None,
        }
    }

    fn to_ffmpeg_level(self) -> Level {
        match self {
            FfmpegLogLevel::Quiet => Level::Quiet,
            FfmpegLogLevel::Panic => Level::Panic,
            FfmpegLogLevel::Fatal => Level::Fatal,
            FfmpegLogLevel::Error => Level::Error,
            FfmpegLogLevel::Warning => Level::Warning,
            FfmpegLogLevel::Info => Level::Info,
            FfmpegLogLevel::Verbose => Level::Verbose,
            FfmpegLogLevel::Debug => Level::Debug,
            FfmpegLogLevel::Trace => Level::Trace,
        }
    }

    fn from_ffmpeg_level(level: Level) -> Self {
        match level {
            Level::Quiet => FfmpegLogLevel::Quiet,
            Level::Panic => FfmpegLogLevel::Panic,
            Level::Fatal => FfmpegLogLevel::Fatal,
            Level::Error => FfmpegLogLevel::Error,
            Level::Warning => FfmpegLogLevel::Warning,
            Level::Info => FfmpegLogLevel::Info,
            Level::Verbose => FfmpegLogLevel::Verbose,
            Level::Debug => FfmpegLogLevel::Debug,
            Level::Trace => FfmpegLogLevel::Trace,
        }
    }
}

/// Set the FFmpeg internal log verbosity level.
pub fn set_ffmpeg_log_level(level: FfmpegLogLevel) {
    ffmpeg_next::util::log::set_level(level.to_ffmpeg_level());
}

/// Get the current FFmpeg internal log verbosity level.
///
/// Returns `None` if the current level does not map to a known variant.
pub fn get_ffmpeg_log_level() -> Option<FfmpegLogLevel> {
    ffmpeg_next::util::log::get_level()
        .ok()
        .map(FfmpegLogLevel::from_ffmpeg_level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_is_idempotent() {
        assert!(initialize().is_ok());
        assert!(initialize().is_ok());
    }

    #[test]
    fn parse_level_names() {
        assert_eq!(FfmpegLogLevel::parse("quiet"), Some(FfmpegLogLevel::Quiet));
        assert_eq!(FfmpegLogLevel::parse("WARN"), Some(FfmpegLogLevel::Warning));
        assert_eq!(FfmpegLogLevel::parse("Trace"), Some(FfmpegLogLevel::Trace));
        assert_eq!(FfmpegLogLevel::parse("loud"), None);
    }

    #[test]
    fn log_level_round_trips() {
        set_ffmpeg_log_level(FfmpegLogLevel::Error);
        assert_eq!(get_ffmpeg_log_level(), Some(FfmpegLogLevel::Error));
        set_ffmpeg_log_level(FfmpegLogLevel::Warning);
        assert_eq!(get_ffmpeg_log_level(), Some(FfmpegLogLevel::Warning));
    }
}
