//! Error types for the `framegrab` crate.
//!
//! This module defines [`FrameGrabError`], the unified error type returned by
//! every fallible stage of the extraction pipeline. Each variant corresponds
//! to one failure kind of the pipeline and carries enough context (paths,
//! codec names, upstream FFmpeg messages) to diagnose the problem without
//! extra logging at the call site.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use thiserror::Error;

/// The unified error type for all `framegrab` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FrameGrabError {
    /// The input could not be opened or is not a recognised container.
    #[error("Failed to open media file at {path}: {reason}")]
    OpenFailed {
        /// Path that was passed to [`crate::Container::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// Stream parameters could not be derived from the container.
    #[error("Failed to read stream information from {path}: {reason}")]
    ProbeFailed {
        /// Path of the container being probed.
        path: PathBuf,
        /// Underlying reason the probe failed.
        reason: String,
    },

    /// No stream in the container is classified as video.
    #[error("No video stream found in file")]
    NoVideoStream,

    /// No decoder is registered for the video stream's codec.
    #[error("Unsupported codec: no decoder available for {codec}")]
    UnsupportedCodec {
        /// Name of the codec identifier that has no decoder.
        codec: String,
    },

    /// The decoder could not be initialised against the stream parameters.
    #[error("Failed to initialise decoder: {0}")]
    InitFailed(String),

    /// A single packet could not be decoded.
    #[error("Failed to decode video packet: {0}")]
    DecodeFailed(String),

    /// Reading the next packet from the container failed.
    #[error("Failed to read packet: {0}")]
    ReadFailed(String),

    /// The output image could not be created or written.
    #[error("Failed to write frame to {path}: {source}")]
    WriteFailed {
        /// Destination file path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: IoError,
    },

    /// A frame buffer or scaling context could not be allocated.
    #[error("Failed to allocate {0}")]
    AllocationFailed(String),

    /// An error originating from the FFmpeg libraries that does not map to a
    /// more specific pipeline stage.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),
}

impl FrameGrabError {
    /// Short name of the pipeline stage that produced this error.
    ///
    /// Used in diagnostic lines so a failed run identifies where it stopped.
    pub fn stage(&self) -> &'static str {
        match self {
            FrameGrabError::OpenFailed { .. } => "open",
            FrameGrabError::ProbeFailed { .. } => "probe",
            FrameGrabError::NoVideoStream => "select",
            FrameGrabError::UnsupportedCodec { .. } | FrameGrabError::InitFailed(_) => "decoder",
            FrameGrabError::DecodeFailed(_) => "decode",
            FrameGrabError::ReadFailed(_) => "read",
            FrameGrabError::AllocationFailed(_) => "allocate",
            FrameGrabError::WriteFailed { .. } => "write",
            FrameGrabError::FfmpegError(_) => "ffmpeg",
        }
    }

    /// Whether this error must abort the pipeline.
    ///
    /// Only [`DecodeFailed`](FrameGrabError::DecodeFailed) is tolerated: the
    /// offending packet is dropped and reading continues.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, FrameGrabError::DecodeFailed(_))
    }
}

impl From<FfmpegError> for FrameGrabError {
    fn from(error: FfmpegError) -> Self {
        FrameGrabError::FfmpegError(error.to_string())
    }
}
