//! Extraction configuration.
//!
//! [`ExtractionConfig`] is a builder that threads output location, decode
//! error tolerance, and conversion settings through the pipeline without
//! widening every function signature.
//!
//! # Example
//!
//! ```no_run
//! use framegrab::{DecodeErrorPolicy, ExtractionConfig, ScalingAlgorithm};
//!
//! let config = ExtractionConfig::new()
//!     .with_output_directory("thumbnails")
//!     .with_decode_error_policy(DecodeErrorPolicy::Abort)
//!     .with_scaling(ScalingAlgorithm::Bicubic);
//! ```

use std::path::{Path, PathBuf};

use ffmpeg_next::software::scaling::Flags as ScalingFlags;

use crate::ffmpeg::FfmpegLogLevel;

/// What the packet pump does when a single packet fails to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeErrorPolicy {
    /// Log the failure, drop the packet, and keep reading. This is the
    /// default.
    #[default]
    Continue,
    /// Stop the run and report the decode error.
    Abort,
}

/// Resampling algorithm used by the colour-space converter.
///
/// Source and destination geometry are equal, so this only matters when the
/// source format carries subsampled chroma planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalingAlgorithm {
    /// Bilinear interpolation. This is the default.
    #[default]
    Bilinear,
    /// Faster, lower quality bilinear.
    FastBilinear,
    /// Bicubic interpolation.
    Bicubic,
    /// Nearest neighbour.
    Point,
}

impl ScalingAlgorithm {
    /// Map to the corresponding swscale flag.
    pub(crate) fn to_ffmpeg_flags(self) -> ScalingFlags {
        match self {
            ScalingAlgorithm::Bilinear => ScalingFlags::BILINEAR,
            ScalingAlgorithm::FastBilinear => ScalingFlags::FAST_BILINEAR,
            ScalingAlgorithm::Bicubic => ScalingFlags::BICUBIC,
            ScalingAlgorithm::Point => ScalingFlags::POINT,
        }
    }
}

/// Configuration for a single-frame extraction run.
///
/// All fields have defaults matching the plain `framegrab <input>` behaviour:
/// write `frame1.ppm` into the current directory, tolerate corrupt packets,
/// and convert with bilinear resampling.
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// Directory the output image is written into.
    pub(crate) output_directory: PathBuf,
    /// Sequence number used to name the saved frame.
    pub(crate) first_sequence_number: u32,
    /// How tolerant the pump is of decode failures.
    pub(crate) decode_error_policy: DecodeErrorPolicy,
    /// FFmpeg console verbosity applied before the container is opened.
    pub(crate) ffmpeg_log_level: Option<FfmpegLogLevel>,
    /// Colour conversion resampling.
    pub(crate) scaling: ScalingAlgorithm,
    /// Print FFmpeg's description of the input after probing.
    pub(crate) dump_format: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionConfig {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self {
            output_directory: PathBuf::from("."),
            first_sequence_number: 1,
            decode_error_policy: DecodeErrorPolicy::Continue,
            ffmpeg_log_level: None,
            scaling: ScalingAlgorithm::Bilinear,
            dump_format: false,
        }
    }

    /// Write the output image into `directory` instead of the working
    /// directory.
    #[must_use]
    pub fn with_output_directory<P: AsRef<Path>>(mut self, directory: P) -> Self {
        self.output_directory = directory.as_ref().to_path_buf();
        self
    }

    /// Set the sequence number used for the output file name.
    ///
    /// Clamped to a minimum of 1 since file numbering is 1-based.
    #[must_use]
    pub fn with_first_sequence_number(mut self, number: u32) -> Self {
        self.first_sequence_number = number.max(1);
        self
    }

    /// Choose how decode failures are handled.
    #[must_use]
    pub fn with_decode_error_policy(mut self, policy: DecodeErrorPolicy) -> Self {
        self.decode_error_policy = policy;
        self
    }

    /// Set FFmpeg's console log level for the run.
    #[must_use]
    pub fn with_ffmpeg_log_level(mut self, level: FfmpegLogLevel) -> Self {
        self.ffmpeg_log_level = Some(level);
        self
    }

    /// Choose the resampling algorithm used during colour conversion.
    #[must_use]
    pub fn with_scaling(mut self, scaling: ScalingAlgorithm) -> Self {
        self.scaling = scaling;
        self
    }

    /// Print FFmpeg's description of the input (streams, codecs, bitrate)
    /// to stderr once the streams have been probed.
    #[must_use]
    pub fn with_format_dump(mut self, dump: bool) -> Self {
        self.dump_format = dump;
        self
    }

    /// Directory the output image is written into.
    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    /// Sequence number of the saved frame.
    pub fn first_sequence_number(&self) -> u32 {
        self.first_sequence_number
    }

    /// Active decode error policy.
    pub fn decode_error_policy(&self) -> DecodeErrorPolicy {
        self.decode_error_policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_plain_invocation() {
        let config = ExtractionConfig::default();
        assert_eq!(config.output_directory(), Path::new("."));
        assert_eq!(config.first_sequence_number(), 1);
        assert_eq!(config.decode_error_policy(), DecodeErrorPolicy::Continue);
        assert_eq!(config.scaling, ScalingAlgorithm::Bilinear);
        assert!(config.ffmpeg_log_level.is_none());
        assert!(!config.dump_format);
    }

    #[test]
    fn sequence_number_is_one_based() {
        let config = ExtractionConfig::new().with_first_sequence_number(0);
        assert_eq!(config.first_sequence_number(), 1);
    }
}
