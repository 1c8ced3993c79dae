//! Video stream selection.
//!
//! Unlike FFmpeg's "best stream" heuristics, selection here is a plain scan:
//! the first stream classified as video, in container order, wins.

use crate::{container::Container, error::FrameGrabError, metadata::StreamInfo};

/// Return the index of the first video stream in `container`.
///
/// The container must have been probed; an unprobed container exposes no
/// streams and therefore yields [`FrameGrabError::NoVideoStream`].
///
/// # Errors
///
/// Returns [`FrameGrabError::NoVideoStream`] if no stream qualifies.
pub fn select_video_stream(container: &Container) -> Result<usize, FrameGrabError> {
    let index = first_video_stream(container.streams()).ok_or(FrameGrabError::NoVideoStream)?;
    log::info!("Found video stream #{index}");
    Ok(index)
}

/// Position-ordered scan for the first video stream.
pub fn first_video_stream(streams: &[StreamInfo]) -> Option<usize> {
    streams
        .iter()
        .find(|stream| stream.is_video())
        .map(|stream| stream.index)
}
