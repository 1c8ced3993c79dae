//! Single-frame extraction pipeline.
//!
//! [`FrameExtractor`] wires the stages together: open the container, probe
//! its streams, select the first video stream, open a decoder, allocate the
//! standing RGB buffer, and hand everything to the [`PacketPump`]. Every
//! resource is a scoped handle, so an early `?` return releases whatever was
//! acquired so far; the container is always released last.

use std::path::{Path, PathBuf};

use crate::{
    config::ExtractionConfig,
    container::Container,
    decoder::DecoderSession,
    error::FrameGrabError,
    frame::RgbFrame,
    pump::{PacketPump, PumpOutcome},
    selector::select_video_stream,
    writer::PpmWriter,
};

/// Summary of a completed extraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct ExtractionReport {
    /// Path of the written image, or `None` if the input ended before any
    /// frame could be decoded.
    pub output: Option<PathBuf>,
    /// Index of the stream frames were decoded from.
    pub stream_index: usize,
    /// Width of the saved frame in pixels.
    pub width: u32,
    /// Height of the saved frame in pixels.
    pub height: u32,
    /// Packets read from the container, all streams included.
    pub packets_read: u64,
    /// Packets that belonged to the video stream.
    pub video_packets: u64,
    /// Video packets that failed to decode and were skipped.
    pub decode_failures: u64,
    /// Frames produced by the decoder.
    pub frames_decoded: u64,
}

/// Extracts the first decodable video frame of a media file.
///
/// # Example
///
/// ```no_run
/// use framegrab::{ExtractionConfig, FrameExtractor};
///
/// let extractor = FrameExtractor::new(ExtractionConfig::new().with_output_directory("out"));
/// let report = extractor.extract("input.mp4")?;
/// if let Some(path) = &report.output {
///     println!("saved {}x{} frame to {}", report.width, report.height, path.display());
/// }
/// # Ok::<(), framegrab::FrameGrabError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct FrameExtractor {
    config: ExtractionConfig,
}

impl FrameExtractor {
    /// Create an extractor with the given configuration.
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Run the pipeline against `path`.
    ///
    /// Reaching the end of the input without a decodable frame is a
    /// successful run with [`ExtractionReport::output`] set to `None`.
    ///
    /// # Errors
    ///
    /// Any fatal [`FrameGrabError`]: open, probe, stream selection, decoder
    /// setup, buffer allocation, packet read, conversion, or write failure.
    /// Decode failures are only returned under
    /// [`DecodeErrorPolicy::Abort`](crate::DecodeErrorPolicy::Abort).
    pub fn extract<P: AsRef<Path>>(&self, path: P) -> Result<ExtractionReport, FrameGrabError> {
        if let Some(level) = self.config.ffmpeg_log_level {
            log::debug!(
                "FFmpeg log level {:?} -> {level:?}",
                crate::ffmpeg::get_ffmpeg_log_level()
            );
            crate::ffmpeg::set_ffmpeg_log_level(level);
        }

        let mut container = Container::open(path)?;
        container.probe_streams()?;
        if self.config.dump_format {
            container.dump();
        }

        let stream_index = select_video_stream(&container)?;
        let stream = container.streams()[stream_index].clone();

        let mut session = DecoderSession::open(&container, &stream)?;
        let (width, height) = (session.width(), session.height());
        let mut rgb_frame = RgbFrame::new(width, height)?;
        let writer = PpmWriter::new(&self.config.output_directory);

        let (outcome, stats) = PacketPump::new(
            &mut container,
            &mut session,
            &mut rgb_frame,
            &writer,
            &self.config,
        )
        .run()?;

        log::debug!("Releasing all resources");
        drop(rgb_frame);
        session.close();
        container.close();

        let output = match outcome {
            PumpOutcome::Saved(path) => Some(path),
            PumpOutcome::EndOfStream => None,
        };

        Ok(ExtractionReport {
            output,
            stream_index,
            width,
            height,
            packets_read: stats.packets_read,
            video_packets: stats.video_packets,
            decode_failures: stats.decode_failures,
            frames_decoded: stats.frames_decoded,
        })
    }
}

/// Extract the first frame of `path` into `frame1.ppm` in the working
/// directory, using the default configuration.
pub fn extract_first_frame<P: AsRef<Path>>(path: P) -> Result<ExtractionReport, FrameGrabError> {
    FrameExtractor::default().extract(path)
}
