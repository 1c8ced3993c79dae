//! Colour-space conversion.
//!
//! [`ColorConverter`] wraps an swscale context that turns decoded pictures
//! (typically planar, chroma-subsampled YUV) into interleaved RGB24 at the
//! same geometry. The context is built once for a source format/geometry pair
//! and reused for every frame that matches it.

use ffmpeg_next::{
    format::Pixel,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};

use crate::{
    config::ScalingAlgorithm,
    error::FrameGrabError,
    frame::{RawFrame, RgbFrame},
};

/// Converts raw decoded frames into a standing [`RgbFrame`].
pub struct ColorConverter {
    scaler: ScalingContext,
    source_format: Pixel,
    source_width: u32,
    source_height: u32,
}

impl ColorConverter {
    /// Build a converter from `source_format` at the source geometry into
    /// RGB24 at the target frame's geometry.
    ///
    /// # Errors
    ///
    /// Returns [`FrameGrabError::AllocationFailed`] if swscale cannot create
    /// a context for this format pair.
    pub fn new(
        source_format: Pixel,
        source_width: u32,
        source_height: u32,
        target: &RgbFrame,
        scaling: ScalingAlgorithm,
    ) -> Result<Self, FrameGrabError> {
        let flags: ScalingFlags = scaling.to_ffmpeg_flags();
        let scaler = ScalingContext::get(
            source_format,
            source_width,
            source_height,
            Pixel::RGB24,
            target.width(),
            target.height(),
            flags,
        )
        .map_err(|error| {
            FrameGrabError::AllocationFailed(format!(
                "scaling context {source_format:?} {source_width}x{source_height} -> RGB24 {}x{}: {error}",
                target.width(),
                target.height(),
            ))
        })?;

        log::debug!(
            "Created {scaling:?} converter {source_format:?} {source_width}x{source_height} -> RGB24 {}x{}",
            target.width(),
            target.height(),
        );

        Ok(Self {
            scaler,
            source_format,
            source_width,
            source_height,
        })
    }

    /// Build a converter matching `frame`'s native format and geometry.
    pub fn for_frame(
        frame: &RawFrame,
        target: &RgbFrame,
        scaling: ScalingAlgorithm,
    ) -> Result<Self, FrameGrabError> {
        Self::new(frame.format(), frame.width(), frame.height(), target, scaling)
    }

    /// Whether `frame` has the format and geometry this converter was built for.
    pub fn accepts(&self, frame: &RawFrame) -> bool {
        frame.format() == self.source_format
            && frame.width() == self.source_width
            && frame.height() == self.source_height
    }

    /// Convert `frame` into `target`, overwriting its previous contents.
    ///
    /// # Errors
    ///
    /// Returns [`FrameGrabError::FfmpegError`] if swscale rejects the frame
    /// (for example because its format differs from the one this converter
    /// was built for).
    pub fn convert(&mut self, frame: &RawFrame, target: &mut RgbFrame) -> Result<(), FrameGrabError> {
        self.scaler
            .run(frame.as_ffmpeg(), target.as_ffmpeg_mut())
            .map_err(FrameGrabError::from)
    }
}
