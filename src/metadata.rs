//! Container and stream metadata types.
//!
//! These structures are filled in once, right after the container has been
//! probed, and cached on the [`Container`](crate::Container) for its whole
//! lifetime. They are plain owned values, so they can be cloned out and kept
//! after the container is closed.

use std::{fmt, time::Duration};

use ffmpeg_next::{codec::Id as CodecId, format::Pixel, media::Type};

/// Classification of a stream's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    /// Picture data.
    Video,
    /// Sound data.
    Audio,
    /// Anything else (subtitles, data, attachments, unknown).
    Other,
}

impl From<Type> for MediaKind {
    fn from(medium: Type) -> Self {
        match medium {
            Type::Video => MediaKind::Video,
            Type::Audio => MediaKind::Audio,
            _ => MediaKind::Other,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
            MediaKind::Other => "other",
        };
        f.write_str(name)
    }
}

/// Read-only description of one stream in a container.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamInfo {
    /// Position in the container's stream list.
    pub index: usize,
    /// Whether this is a video, audio, or other stream.
    pub kind: MediaKind,
    /// Codec identifier declared by the container.
    pub codec_id: CodecId,
    /// Codec name (e.g. `"h264"`, `"rawvideo"`).
    pub codec_name: String,
    /// Frame width in pixels. Zero for non-video streams.
    pub width: u32,
    /// Frame height in pixels. Zero for non-video streams.
    pub height: u32,
    /// Native pixel format. [`Pixel::None`] for non-video streams.
    pub pixel_format: Pixel,
}

impl StreamInfo {
    /// Returns `true` if this stream carries video.
    pub fn is_video(&self) -> bool {
        self.kind == MediaKind::Video
    }
}

/// Container-level metadata.
///
/// # Example
///
/// ```no_run
/// use framegrab::Container;
///
/// let mut container = Container::open("input.mp4").unwrap();
/// container.probe_streams().unwrap();
/// if let Some(metadata) = container.metadata() {
///     println!("{} ({:?})", metadata.format, metadata.duration);
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct ContainerMetadata {
    /// Container format name (e.g. `"mov,mp4,m4a,3gp,3g2,mj2"`, `"yuv4mpegpipe"`).
    pub format: String,
    /// Total duration. [`Duration::ZERO`] when the container does not say.
    pub duration: Duration,
    /// Every stream, in container order.
    pub streams: Vec<StreamInfo>,
}
