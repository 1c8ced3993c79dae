//! Video decoder session.
//!
//! A [`DecoderSession`] binds one FFmpeg decoder to the parameters of the
//! selected stream. The container's stream description and the live decode
//! context are separate objects, so opening a session copies the stream's
//! codec parameters (geometry, pixel format, extradata) into a freshly
//! allocated context before the codec is initialised against it.

use ffmpeg_next::{
    Error as FfmpegError, Packet,
    codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder,
    error::EAGAIN,
    format::Pixel,
    frame::Video as VideoFrame,
};

use crate::{container::Container, error::FrameGrabError, frame::RawFrame, metadata::StreamInfo};

/// Mutable decode state for one video stream.
///
/// Closed when dropped. [`close`](DecoderSession::close) consumes the
/// session, so it cannot be used to decode afterwards.
pub struct DecoderSession {
    decoder: VideoDecoder,
    stream_index: usize,
    codec_name: String,
}

impl DecoderSession {
    /// Open a decoder for `stream`.
    ///
    /// # Errors
    ///
    /// - [`FrameGrabError::UnsupportedCodec`] if no decoder is registered for
    ///   the stream's codec.
    /// - [`FrameGrabError::InitFailed`] if the parameters cannot be copied
    ///   into a decode context or the codec rejects them.
    pub fn open(container: &Container, stream: &StreamInfo) -> Result<Self, FrameGrabError> {
        log::debug!(
            "Finding a decoder for stream #{} ({})",
            stream.index,
            stream.codec_name
        );
        let codec = ffmpeg_next::decoder::find(stream.codec_id).ok_or_else(|| {
            FrameGrabError::UnsupportedCodec {
                codec: stream.codec_name.clone(),
            }
        })?;
        let decoder_name = codec.name().to_string();

        let parameters = container
            .stream_parameters(stream.index)
            .ok_or_else(|| {
                FrameGrabError::InitFailed(format!(
                    "stream #{} has no codec parameters",
                    stream.index
                ))
            })?;
        let context = CodecContext::from_parameters(parameters).map_err(|error| {
            FrameGrabError::InitFailed(format!("could not copy codec parameters: {error}"))
        })?;

        let decoder = context
            .decoder()
            .open_as(codec)
            .and_then(|opened| opened.video())
            .map_err(|error| {
                FrameGrabError::InitFailed(format!(
                    "could not open {} decoder: {error}",
                    stream.codec_name
                ))
            })?;

        log::info!(
            "Opened {} decoder: {}x{} {:?}",
            decoder_name,
            decoder.width(),
            decoder.height(),
            decoder.format(),
        );

        Ok(Self {
            decoder,
            stream_index: stream.index,
            codec_name: stream.codec_name.clone(),
        })
    }

    /// Index of the stream this session decodes.
    pub fn stream_index(&self) -> usize {
        self.stream_index
    }

    /// Coded width reported by the decoder.
    pub fn width(&self) -> u32 {
        self.decoder.width()
    }

    /// Coded height reported by the decoder.
    pub fn height(&self) -> u32 {
        self.decoder.height()
    }

    /// Pixel format reported by the decoder.
    pub fn format(&self) -> Pixel {
        self.decoder.format()
    }

    /// Feed one packet and collect at most one finished picture.
    ///
    /// Returns `Ok(None)` when the decoder needs more input before it can
    /// produce a picture; this is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`FrameGrabError::DecodeFailed`] if the decoder rejects the
    /// packet or fails while producing the picture. The session remains
    /// usable for the next packet.
    pub fn decode(&mut self, packet: &Packet) -> Result<Option<RawFrame>, FrameGrabError> {
        self.decoder
            .send_packet(packet)
            .map_err(|error| FrameGrabError::DecodeFailed(error.to_string()))?;

        let mut decoded_frame = VideoFrame::empty();
        match self.decoder.receive_frame(&mut decoded_frame) {
            Ok(()) => Ok(Some(RawFrame::new(decoded_frame))),
            Err(FfmpegError::Other { errno: EAGAIN }) | Err(FfmpegError::Eof) => Ok(None),
            Err(error) => Err(FrameGrabError::DecodeFailed(error.to_string())),
        }
    }

    /// Release the decode context.
    pub fn close(self) {
        log::debug!("Closing {} decoder", self.codec_name);
    }
}
