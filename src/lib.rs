//! # framegrab
//!
//! Grab the first decodable video frame from a media file and save it as an
//! uncompressed PPM image.
//!
//! `framegrab` opens a container, picks its first video stream, decodes
//! packets until one picture comes out, converts that picture to RGB24, and
//! writes it to `frame1.ppm`. It stops right there: no seeking, no audio, no
//! draining of the remaining packets. Decoding and conversion are powered by
//! FFmpeg via the [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate.
//!
//! ## Quick Start
//!
//! ```no_run
//! let report = framegrab::extract_first_frame("input.mp4").unwrap();
//! println!("{:?}", report.output);
//! ```
//!
//! ### Configured Run
//!
//! ```no_run
//! use framegrab::{DecodeErrorPolicy, ExtractionConfig, FfmpegLogLevel, FrameExtractor};
//!
//! let config = ExtractionConfig::new()
//!     .with_output_directory("stills")
//!     .with_decode_error_policy(DecodeErrorPolicy::Abort)
//!     .with_ffmpeg_log_level(FfmpegLogLevel::Error);
//!
//! let report = FrameExtractor::new(config).extract("input.mkv").unwrap();
//! println!("read {} packets", report.packets_read);
//! ```
//!
//! ### Working With the Stages Directly
//!
//! ```no_run
//! use framegrab::{Container, DecoderSession, FrameGrabError, select_video_stream};
//!
//! let mut container = Container::open("input.mp4")?;
//! container.probe_streams()?;
//! let index = select_video_stream(&container)?;
//! let stream = container.streams()[index].clone();
//! let session = DecoderSession::open(&container, &stream)?;
//! println!("{}x{} {:?}", session.width(), session.height(), session.format());
//! # Ok::<(), FrameGrabError>(())
//! ```
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system.

pub mod config;
pub mod container;
mod conversion;
pub mod decoder;
pub mod error;
pub mod extractor;
pub mod ffmpeg;
pub mod frame;
pub mod metadata;
pub mod pump;
pub mod selector;
pub mod writer;

pub use config::{DecodeErrorPolicy, ExtractionConfig, ScalingAlgorithm};
pub use container::Container;
pub use conversion::ColorConverter;
pub use decoder::DecoderSession;
pub use error::FrameGrabError;
pub use extractor::{ExtractionReport, FrameExtractor, extract_first_frame};
pub use ffmpeg::{FfmpegLogLevel, get_ffmpeg_log_level, set_ffmpeg_log_level};
pub use frame::{FrameView, RawFrame, RgbFrame};
pub use metadata::{ContainerMetadata, MediaKind, StreamInfo};
pub use pump::{PacketPump, PumpOutcome, PumpStats};
pub use selector::{first_video_stream, select_video_stream};
pub use writer::{PpmWriter, frame_file_name, write_ppm};
