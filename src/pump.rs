//! The packet/frame pump.
//!
//! [`PacketPump`] owns the single read-decode-convert-write loop. It is a
//! small state machine:
//!
//! ```text
//! Reading ──packet (video)──▶ Decoding ──frame──▶ Converting ──▶ Done
//!    ▲  │                        │
//!    │  └─packet (other)─┐       │ no frame / tolerated decode error
//!    └───────────────────┴───────┘
//! ```
//!
//! End of stream moves `Reading` to `Done` without an image. Any fatal error
//! moves to `Failed`. Each packet is dropped right after its single decode
//! attempt, before the next one is read, and the pump stops as soon as the
//! first frame has been written.

use std::path::PathBuf;

use ffmpeg_next::Packet;

use crate::{
    config::{DecodeErrorPolicy, ExtractionConfig, ScalingAlgorithm},
    container::Container,
    conversion::ColorConverter,
    decoder::DecoderSession,
    error::FrameGrabError,
    frame::{RawFrame, RgbFrame},
    writer::PpmWriter,
};

/// How a pump run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PumpOutcome {
    /// A frame was converted and written to this path.
    Saved(PathBuf),
    /// The container ran out of packets before any frame was produced.
    EndOfStream,
}

/// Counters collected while pumping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpStats {
    /// Packets read from the container, all streams included.
    pub packets_read: u64,
    /// Packets that belonged to the selected video stream.
    pub video_packets: u64,
    /// Video packets the decoder rejected.
    pub decode_failures: u64,
    /// Frames the decoder produced.
    pub frames_decoded: u64,
}

enum PumpState {
    Reading,
    Decoding(Packet),
    Converting(RawFrame),
    Done(PumpOutcome),
    Failed(FrameGrabError),
}

/// Drives packets from a [`Container`] through a [`DecoderSession`] until the
/// first frame is saved or the input is exhausted.
pub struct PacketPump<'a> {
    container: &'a mut Container,
    session: &'a mut DecoderSession,
    rgb_frame: &'a mut RgbFrame,
    writer: &'a PpmWriter,
    converter: Option<ColorConverter>,
    policy: DecodeErrorPolicy,
    scaling: ScalingAlgorithm,
    sequence_number: u32,
    stats: PumpStats,
}

impl<'a> PacketPump<'a> {
    /// Borrow the pipeline's resources for one run.
    pub fn new(
        container: &'a mut Container,
        session: &'a mut DecoderSession,
        rgb_frame: &'a mut RgbFrame,
        writer: &'a PpmWriter,
        config: &ExtractionConfig,
    ) -> Self {
        Self {
            container,
            session,
            rgb_frame,
            writer,
            converter: None,
            policy: config.decode_error_policy,
            scaling: config.scaling,
            sequence_number: config.first_sequence_number,
            stats: PumpStats::default(),
        }
    }

    /// Run the loop to completion.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error: a packet read failure, a decode failure
    /// under [`DecodeErrorPolicy::Abort`], a conversion failure, or a write
    /// failure.
    pub fn run(mut self) -> Result<(PumpOutcome, PumpStats), FrameGrabError> {
        log::debug!("Reading packets");
        let mut state = PumpState::Reading;
        loop {
            state = match state {
                PumpState::Reading => self.read(),
                PumpState::Decoding(packet) => self.decode(packet),
                PumpState::Converting(frame) => self.convert_and_write(frame),
                PumpState::Done(outcome) => return Ok((outcome, self.stats)),
                PumpState::Failed(error) => return Err(error),
            };
        }
    }

    fn read(&mut self) -> PumpState {
        match self.container.read_packet() {
            Ok(Some(packet)) => {
                self.stats.packets_read += 1;
                if packet.stream() == self.session.stream_index() {
                    self.stats.video_packets += 1;
                    PumpState::Decoding(packet)
                } else {
                    PumpState::Reading
                }
            }
            Ok(None) => {
                log::info!(
                    "End of stream after {} packets, no frame decoded",
                    self.stats.packets_read
                );
                PumpState::Done(PumpOutcome::EndOfStream)
            }
            Err(error) => PumpState::Failed(error),
        }
    }

    fn decode(&mut self, packet: Packet) -> PumpState {
        log::debug!(
            "Decoding packet {} ({} bytes, pts={:?})",
            self.stats.packets_read,
            packet.size(),
            packet.pts()
        );
        let result = self.session.decode(&packet);
        drop(packet);

        after_decode(result, self.policy, &mut self.stats)
    }

    fn convert_and_write(&mut self, frame: RawFrame) -> PumpState {
        log::debug!(
            "Converting {:?} {}x{} frame to RGB24 (planes={}, luma stride={}, pts={:?})",
            frame.format(),
            frame.width(),
            frame.height(),
            frame.planes(),
            frame.stride(0),
            frame.pts()
        );

        let converter = match self.converter.take() {
            Some(converter) if converter.accepts(&frame) => converter,
            stale => {
                if stale.is_some() {
                    log::warn!(
                        "Decoded frame changed to {:?} {}x{}, rebuilding converter",
                        frame.format(),
                        frame.width(),
                        frame.height()
                    );
                }
                match ColorConverter::for_frame(&frame, self.rgb_frame, self.scaling) {
                    Ok(converter) => converter,
                    Err(error) => return PumpState::Failed(error),
                }
            }
        };
        let converter = self.converter.insert(converter);
        if let Err(error) = converter.convert(&frame, self.rgb_frame) {
            return PumpState::Failed(error);
        }
        drop(frame);

        match self.writer.write(self.rgb_frame, self.sequence_number) {
            Ok(path) => PumpState::Done(PumpOutcome::Saved(path)),
            Err(error) => PumpState::Failed(error),
        }
    }
}

/// Next state once a packet has been through the decoder.
fn after_decode(
    result: Result<Option<RawFrame>, FrameGrabError>,
    policy: DecodeErrorPolicy,
    stats: &mut PumpStats,
) -> PumpState {
    match result {
        Ok(Some(frame)) => {
            stats.frames_decoded += 1;
            PumpState::Converting(frame)
        }
        Ok(None) => PumpState::Reading,
        Err(error) => {
            stats.decode_failures += 1;
            match policy {
                DecodeErrorPolicy::Continue => {
                    log::warn!("Skipping packet {}: {error}", stats.packets_read);
                    PumpState::Reading
                }
                DecodeErrorPolicy::Abort => PumpState::Failed(error),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use ffmpeg_next::frame::Video as VideoFrame;

    use super::*;

    fn corrupt_packet() -> Result<Option<RawFrame>, FrameGrabError> {
        Err(FrameGrabError::DecodeFailed("Invalid data found".into()))
    }

    #[test]
    fn decode_failure_is_skipped_by_default() {
        let mut stats = PumpStats::default();
        let state = after_decode(corrupt_packet(), DecodeErrorPolicy::default(), &mut stats);
        assert!(matches!(state, PumpState::Reading));
        assert_eq!(stats.decode_failures, 1);
        assert_eq!(stats.frames_decoded, 0);

        let state = after_decode(corrupt_packet(), DecodeErrorPolicy::Continue, &mut stats);
        assert!(matches!(state, PumpState::Reading));
        assert_eq!(stats.decode_failures, 2);
    }

    #[test]
    fn decode_failure_aborts_when_asked() {
        let mut stats = PumpStats::default();
        let state = after_decode(corrupt_packet(), DecodeErrorPolicy::Abort, &mut stats);
        assert!(matches!(
            state,
            PumpState::Failed(FrameGrabError::DecodeFailed(_))
        ));
        assert_eq!(stats.decode_failures, 1);
    }

    #[test]
    fn pending_decoder_keeps_reading() {
        let mut stats = PumpStats::default();
        let state = after_decode(Ok(None), DecodeErrorPolicy::Abort, &mut stats);
        assert!(matches!(state, PumpState::Reading));
        assert_eq!(stats, PumpStats::default());
    }

    #[test]
    fn decoded_picture_moves_to_conversion() {
        let mut stats = PumpStats::default();
        let frame = RawFrame::new(VideoFrame::empty());
        let state = after_decode(Ok(Some(frame)), DecodeErrorPolicy::Continue, &mut stats);
        assert!(matches!(state, PumpState::Converting(_)));
        assert_eq!(stats.frames_decoded, 1);
    }
}
