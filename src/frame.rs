//! Typed frame buffers.
//!
//! FFmpeg frames are untyped planes of bytes with a per-row stride that is
//! often wider than the visible picture. The types here carry geometry,
//! stride, and pixel format alongside the data so that conversion and
//! serialization never have to guess at the layout:
//!
//! - [`RawFrame`] is one decoded picture in the stream's native format.
//! - [`RgbFrame`] is the standing RGB24 conversion target.
//! - [`FrameView`] is a borrowed, validated window onto packed RGB rows.

use ffmpeg_next::{format::Pixel, frame::Video as VideoFrame};
use image::RgbImage;

use crate::error::FrameGrabError;

/// Bytes per pixel of the interleaved RGB24 layout.
pub const RGB_BYTES_PER_PIXEL: usize = 3;

/// One decoded picture in its native pixel format.
pub struct RawFrame {
    frame: VideoFrame,
}

impl RawFrame {
    pub(crate) fn new(frame: VideoFrame) -> Self {
        Self { frame }
    }

    /// Picture width in pixels.
    pub fn width(&self) -> u32 {
        self.frame.width()
    }

    /// Picture height in pixels.
    pub fn height(&self) -> u32 {
        self.frame.height()
    }

    /// Native pixel format (e.g. `YUV420P`).
    pub fn format(&self) -> Pixel {
        self.frame.format()
    }

    /// Row stride in bytes of `plane`.
    pub fn stride(&self, plane: usize) -> usize {
        self.frame.stride(plane)
    }

    /// Number of data planes.
    pub fn planes(&self) -> usize {
        self.frame.planes()
    }

    /// Presentation timestamp, if the decoder set one.
    pub fn pts(&self) -> Option<i64> {
        self.frame.pts()
    }

    pub(crate) fn as_ffmpeg(&self) -> &VideoFrame {
        &self.frame
    }
}

/// A picture in 3-byte-per-pixel interleaved RGB.
///
/// Allocated once per extraction from the stream geometry and then reused
/// as the conversion target; its dimensions never change.
pub struct RgbFrame {
    frame: VideoFrame,
}

impl RgbFrame {
    /// Allocate an RGB24 buffer of `width` × `height` pixels.
    ///
    /// # Errors
    ///
    /// Returns [`FrameGrabError::AllocationFailed`] for empty geometry or if
    /// FFmpeg could not allocate the picture buffer.
    pub fn new(width: u32, height: u32) -> Result<Self, FrameGrabError> {
        if width == 0 || height == 0 {
            return Err(FrameGrabError::AllocationFailed(format!(
                "RGB frame with empty geometry {width}x{height}"
            )));
        }

        let frame = VideoFrame::new(Pixel::RGB24, width, height);
        if frame.is_empty() {
            return Err(FrameGrabError::AllocationFailed(format!(
                "{width}x{height} RGB24 frame buffer"
            )));
        }

        log::debug!(
            "Allocated {width}x{height} RGB frame (stride {} bytes)",
            frame.stride(0)
        );
        Ok(Self { frame })
    }

    /// Picture width in pixels.
    pub fn width(&self) -> u32 {
        self.frame.width()
    }

    /// Picture height in pixels.
    pub fn height(&self) -> u32 {
        self.frame.height()
    }

    /// Row stride in bytes. At least `width * 3`.
    pub fn stride(&self) -> usize {
        self.frame.stride(0)
    }

    /// Borrow the pixel rows.
    pub fn view(&self) -> FrameView<'_> {
        FrameView {
            width: self.width(),
            height: self.height(),
            stride: self.stride(),
            data: self.frame.data(0),
        }
    }

    /// Copy the picture into a tightly packed [`RgbImage`].
    pub fn to_rgb_image(&self) -> Option<RgbImage> {
        let view = self.view();
        RgbImage::from_raw(view.width(), view.height(), view.to_packed())
    }

    pub(crate) fn as_ffmpeg_mut(&mut self) -> &mut VideoFrame {
        &mut self.frame
    }
}

/// Borrowed RGB24 rows with an explicit stride.
///
/// Only the first `width * 3` bytes of each row are picture data; anything
/// between that and `stride` is padding.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    width: u32,
    height: u32,
    stride: usize,
    data: &'a [u8],
}

impl<'a> FrameView<'a> {
    /// Wrap `data` as `height` rows of `stride` bytes.
    ///
    /// Returns `None` if the stride is narrower than a row of pixels or the
    /// buffer is too short to hold the last row.
    pub fn new(width: u32, height: u32, stride: usize, data: &'a [u8]) -> Option<Self> {
        let row_bytes = width as usize * RGB_BYTES_PER_PIXEL;
        if stride < row_bytes {
            return None;
        }
        let required = match height as usize {
            0 => 0,
            rows => (rows - 1) * stride + row_bytes,
        };
        if data.len() < required {
            return None;
        }
        Some(Self {
            width,
            height,
            stride,
            data,
        })
    }

    /// Picture width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Picture height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in bytes.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Significant bytes per row.
    pub fn row_bytes(&self) -> usize {
        self.width as usize * RGB_BYTES_PER_PIXEL
    }

    /// Picture bytes of row `y`, padding excluded.
    pub fn row(&self, y: u32) -> &'a [u8] {
        let start = y as usize * self.stride;
        &self.data[start..start + self.row_bytes()]
    }

    /// Rows from top to bottom, padding excluded.
    pub fn rows(&self) -> impl Iterator<Item = &'a [u8]> {
        let view = *self;
        (0..view.height).map(move |y| view.row(y))
    }

    /// Copy the rows into a buffer with no padding between them.
    pub fn to_packed(&self) -> Vec<u8> {
        let row_bytes = self.row_bytes();
        if self.stride == row_bytes {
            return self.data[..row_bytes * self.height as usize].to_vec();
        }
        let mut buffer = Vec::with_capacity(row_bytes * self.height as usize);
        for row in self.rows() {
            buffer.extend_from_slice(row);
        }
        buffer
    }
}
