//! Container reading.
//!
//! [`Container`] owns the FFmpeg demuxer for one input file. Opening reads
//! and validates the container header; [`probe_streams`](Container::probe_streams)
//! then performs FFmpeg's bounded read-ahead so that every stream's codec
//! parameters are known. Packets read during probing are buffered by FFmpeg
//! and handed out again by [`read_packet`](Container::read_packet), so the
//! probe does not skip any data.
//!
//! The demuxer is closed when the `Container` is dropped. Packets and codec
//! parameters obtained from it keep their own references, so the container
//! may safely be the last thing released.

use std::{
    ffi::CString,
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    ptr,
    time::Duration,
};

use ffmpeg_next::{
    Error as FfmpegError, Packet,
    codec::{Parameters, context::Context as CodecContext},
    format::{Pixel, context::Input, stream::Stream},
};
use ffmpeg_sys_next::{
    AVFormatContext, av_dump_format, avformat_find_stream_info, avformat_open_input,
};

use crate::{
    error::FrameGrabError,
    metadata::{ContainerMetadata, MediaKind, StreamInfo},
};

/// An open media container.
///
/// # Example
///
/// ```no_run
/// use framegrab::{Container, FrameGrabError};
///
/// let mut container = Container::open("input.mkv")?;
/// container.probe_streams()?;
/// for stream in container.streams() {
///     println!("#{} {} {}", stream.index, stream.kind, stream.codec_name);
/// }
/// # Ok::<(), FrameGrabError>(())
/// ```
pub struct Container {
    input_context: Input,
    path: PathBuf,
    /// The path as handed to FFmpeg, reused when dumping.
    url: CString,
    /// Filled in by `probe_streams`.
    metadata: Option<ContainerMetadata>,
}

impl Debug for Container {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Container")
            .field("path", &self.path)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

impl Container {
    /// Open the file at `path` and read its container header.
    ///
    /// Initialises FFmpeg on first use. Stream codec parameters are not
    /// guaranteed to be complete until [`probe_streams`](Container::probe_streams)
    /// has run.
    ///
    /// # Errors
    ///
    /// Returns [`FrameGrabError::OpenFailed`] if the file is missing,
    /// unreadable, or not a recognised container format.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FrameGrabError> {
        let path = path.as_ref().to_path_buf();
        let open_failed = |reason: String| FrameGrabError::OpenFailed {
            path: path.clone(),
            reason,
        };

        log::debug!("Opening container: {}", path.display());

        crate::ffmpeg::initialize()
            .map_err(|error| open_failed(format!("FFmpeg initialisation failed: {error}")))?;

        let c_path = c_path(&path).map_err(open_failed)?;

        let mut context: *mut AVFormatContext = ptr::null_mut();
        // SAFETY: `context` is a valid out-pointer and `c_path` outlives the
        // call. On failure FFmpeg frees whatever it allocated and leaves
        // `context` null.
        let result = unsafe {
            avformat_open_input(
                &mut context,
                c_path.as_ptr(),
                ptr::null_mut(),
                ptr::null_mut(),
            )
        };
        if result != 0 {
            return Err(open_failed(FfmpegError::from(result).to_string()));
        }

        // SAFETY: a successful `avformat_open_input` hands us sole ownership
        // of a fully initialised input context, which `Input` closes on drop.
        let input_context = unsafe { Input::wrap(context) };

        log::info!(
            "Opened container: {} (format={})",
            path.display(),
            input_context.format().name()
        );

        Ok(Self {
            input_context,
            path,
            url: c_path,
            metadata: None,
        })
    }

    /// Read ahead far enough to populate every stream's codec parameters.
    ///
    /// Must be called before any stream is inspected. Calling it again
    /// refreshes the cached metadata.
    ///
    /// # Errors
    ///
    /// Returns [`FrameGrabError::ProbeFailed`] if FFmpeg cannot derive the
    /// stream information.
    pub fn probe_streams(&mut self) -> Result<(), FrameGrabError> {
        log::debug!("Finding stream info for {}", self.path.display());

        // SAFETY: the context pointer is owned by `self.input_context` and
        // stays valid for the duration of the call.
        let result = unsafe {
            avformat_find_stream_info(self.input_context.as_mut_ptr(), ptr::null_mut())
        };
        if result < 0 {
            return Err(FrameGrabError::ProbeFailed {
                path: self.path.clone(),
                reason: FfmpegError::from(result).to_string(),
            });
        }

        let metadata = self.collect_metadata();
        log::info!(
            "Probed {}: format={}, duration={:.2}s, streams={}",
            self.path.display(),
            metadata.format,
            metadata.duration.as_secs_f64(),
            metadata.streams.len(),
        );
        for stream in &metadata.streams {
            log::debug!(
                "Stream #{}: {} codec={} {}x{} {:?}",
                stream.index,
                stream.kind,
                stream.codec_name,
                stream.width,
                stream.height,
                stream.pixel_format,
            );
        }
        self.metadata = Some(metadata);
        Ok(())
    }

    /// Cached metadata, or `None` if the streams have not been probed yet.
    pub fn metadata(&self) -> Option<&ContainerMetadata> {
        self.metadata.as_ref()
    }

    /// Streams in container order.
    ///
    /// Empty until [`probe_streams`](Container::probe_streams) has run.
    pub fn streams(&self) -> &[StreamInfo] {
        self.metadata
            .as_ref()
            .map(|metadata| metadata.streams.as_slice())
            .unwrap_or(&[])
    }

    /// Path the container was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Codec parameters of the stream at `index`, for building a decoder.
    pub(crate) fn stream_parameters(&self, index: usize) -> Option<Parameters> {
        self.input_context
            .stream(index)
            .map(|stream| stream.parameters())
    }

    /// Read the next packet from any stream.
    ///
    /// Returns `Ok(None)` at end of stream. The packet owns its data and is
    /// released when dropped.
    ///
    /// # Errors
    ///
    /// Returns [`FrameGrabError::ReadFailed`] for any read error other than
    /// end of stream.
    pub fn read_packet(&mut self) -> Result<Option<Packet>, FrameGrabError> {
        let mut packet = Packet::empty();
        match packet.read(&mut self.input_context) {
            Ok(()) => Ok(Some(packet)),
            Err(FfmpegError::Eof) => Ok(None),
            Err(error) => Err(FrameGrabError::ReadFailed(error.to_string())),
        }
    }

    /// Read the remaining packets and count those belonging to `stream_index`.
    ///
    /// Consumes the container's read position, so this is only useful on a
    /// container opened for inspection.
    pub fn count_packets(&mut self, stream_index: usize) -> Result<u64, FrameGrabError> {
        let mut count = 0;
        while let Some(packet) = self.read_packet()? {
            if packet.stream() == stream_index {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Print FFmpeg's detailed description of the input to stderr.
    ///
    /// Covers duration, bitrate, streams, codecs, and container metadata.
    pub fn dump(&mut self) {
        if self.metadata.is_none() {
            log::warn!(
                "Dumping {} before probing; stream details may be incomplete",
                self.path.display()
            );
        }
        // SAFETY: the context is valid for the lifetime of `self`, `url`
        // outlives the call, and `av_dump_format` only reads from both.
        unsafe {
            av_dump_format(self.input_context.as_mut_ptr(), 0, self.url.as_ptr(), 0);
        }
    }

    /// Release the demuxer.
    ///
    /// Equivalent to dropping the container; provided so call sites can make
    /// the final release explicit.
    pub fn close(self) {
        log::debug!("Closing container: {}", self.path.display());
    }

    fn collect_metadata(&self) -> ContainerMetadata {
        let duration_microseconds = self.input_context.duration();
        let duration = if duration_microseconds > 0 {
            Duration::from_micros(duration_microseconds as u64)
        } else {
            Duration::ZERO
        };

        ContainerMetadata {
            format: self.input_context.format().name().to_string(),
            duration,
            streams: self.input_context.streams().map(describe_stream).collect(),
        }
    }
}

fn describe_stream(stream: Stream<'_>) -> StreamInfo {
    let parameters = stream.parameters();
    let kind = MediaKind::from(parameters.medium());
    let codec_id = parameters.id();

    // SAFETY: the parameters are owned by the stream, which outlives this
    // read-only copy of the plain-data struct.
    let raw = unsafe { *parameters.as_ptr() };

    let (width, height, pixel_format) = if kind == MediaKind::Video {
        (
            raw.width.max(0) as u32,
            raw.height.max(0) as u32,
            stream_pixel_format(parameters),
        )
    } else {
        (0, 0, Pixel::None)
    };

    StreamInfo {
        index: stream.index(),
        kind,
        codec_id,
        codec_name: codec_id.name().to_string(),
        width,
        height,
        pixel_format,
    }
}

/// Pixel format as reported by a decoder configured from `parameters`.
///
/// [`Pixel::None`] when no decoder for the codec is available.
fn stream_pixel_format(parameters: Parameters) -> Pixel {
    CodecContext::from_parameters(parameters)
        .and_then(|context| context.decoder().video())
        .map(|decoder| decoder.format())
        .unwrap_or(Pixel::None)
}

fn c_path(path: &Path) -> Result<CString, String> {
    let utf8 = path
        .to_str()
        .ok_or_else(|| format!("path is not valid UTF-8: {}", path.display()))?;
    CString::new(utf8).map_err(|_| format!("path contains a NUL byte: {}", path.display()))
}
