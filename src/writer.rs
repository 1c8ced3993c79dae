//! PPM frame serialization.
//!
//! Frames are written as binary Netpbm pixmaps:
//!
//! ```text
//! P6\n<width> <height>\n255\n<height rows of width*3 RGB bytes>
//! ```
//!
//! Rows are written top to bottom with any in-memory stride padding removed.
//! Output files are named `frame<N>.ppm`, where `N` is the frame's 1-based
//! sequence number.

use std::{
    fs::{self, File},
    io::{BufWriter, Result as IoResult, Write},
    path::{Path, PathBuf},
};

use crate::{
    error::FrameGrabError,
    frame::{FrameView, RgbFrame},
};

/// File name for the frame with the given sequence number.
pub fn frame_file_name(sequence_number: u32) -> String {
    format!("frame{sequence_number}.ppm")
}

/// Serialize `view` as a binary PPM into `writer`.
pub fn write_ppm<W: Write>(writer: &mut W, view: &FrameView<'_>) -> IoResult<()> {
    write!(writer, "P6\n{} {}\n255\n", view.width(), view.height())?;
    for row in view.rows() {
        writer.write_all(row)?;
    }
    Ok(())
}

/// Writes RGB frames as PPM files into a fixed directory.
#[derive(Debug, Clone)]
pub struct PpmWriter {
    directory: PathBuf,
}

impl PpmWriter {
    /// Create a writer targeting `directory`.
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    /// Path the frame with `sequence_number` is written to.
    pub fn path_for(&self, sequence_number: u32) -> PathBuf {
        self.directory.join(frame_file_name(sequence_number))
    }

    /// Write `frame` to `frame<sequence_number>.ppm`, replacing any existing
    /// file.
    ///
    /// On failure the partially written file is removed.
    ///
    /// # Errors
    ///
    /// Returns [`FrameGrabError::WriteFailed`] if the destination cannot be
    /// created or written.
    pub fn write(&self, frame: &RgbFrame, sequence_number: u32) -> Result<PathBuf, FrameGrabError> {
        let path = self.path_for(sequence_number);
        log::info!(
            "Saving {}x{} frame to {}",
            frame.width(),
            frame.height(),
            path.display()
        );

        let file = File::create(&path).map_err(|source| FrameGrabError::WriteFailed {
            path: path.clone(),
            source,
        })?;

        let mut writer = BufWriter::new(file);
        let result = write_ppm(&mut writer, &frame.view()).and_then(|()| writer.flush());
        drop(writer);

        if let Err(source) = result {
            let _ = fs::remove_file(&path);
            return Err(FrameGrabError::WriteFailed { path, source });
        }

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_follow_sequence_number() {
        assert_eq!(frame_file_name(1), "frame1.ppm");
        assert_eq!(frame_file_name(12), "frame12.ppm");
        let writer = PpmWriter::new("out");
        assert_eq!(writer.path_for(1), Path::new("out").join("frame1.ppm"));
    }

    #[test]
    fn header_and_rows_are_exact() {
        let data: Vec<u8> = (0..12).collect();
        let view = FrameView::new(2, 2, 6, &data).unwrap();

        let mut output = Vec::new();
        write_ppm(&mut output, &view).unwrap();

        let mut expected = b"P6\n2 2\n255\n".to_vec();
        expected.extend(0..12u8);
        assert_eq!(output, expected);
    }

    #[test]
    fn stride_padding_never_reaches_output() {
        let width = 3u32;
        let height = 4u32;
        let stride = 16usize;
        let mut data = vec![0xAAu8; stride * height as usize];
        for y in 0..height as usize {
            for x in 0..(width as usize * 3) {
                data[y * stride + x] = (y * 10 + x) as u8;
            }
        }
        let view = FrameView::new(width, height, stride, &data).unwrap();

        let mut output = Vec::new();
        write_ppm(&mut output, &view).unwrap();

        let header = b"P6\n3 4\n255\n";
        assert!(output.starts_with(header));
        let pixels = &output[header.len()..];
        assert_eq!(pixels.len(), (width * height * 3) as usize);
        assert!(!pixels.contains(&0xAA));
        assert_eq!(&pixels[9..18], &[10, 11, 12, 13, 14, 15, 16, 17, 18]);
    }

    #[test]
    fn missing_directory_is_a_write_failure() {
        let directory = tempfile::tempdir().unwrap();
        let writer = PpmWriter::new(directory.path().join("does").join("not").join("exist"));
        let frame = RgbFrame::new(4, 4).unwrap();

        let error = writer.write(&frame, 1).unwrap_err();
        assert!(matches!(error, FrameGrabError::WriteFailed { .. }));
    }

    #[test]
    fn writes_file_into_directory() {
        let directory = tempfile::tempdir().unwrap();
        let writer = PpmWriter::new(directory.path());
        let frame = RgbFrame::new(8, 6).unwrap();

        let path = writer.write(&frame, 1).unwrap();
        assert_eq!(path, directory.path().join("frame1.ppm"));

        let bytes = fs::read(&path).unwrap();
        let header = b"P6\n8 6\n255\n";
        assert!(bytes.starts_with(header));
        assert_eq!(bytes.len(), header.len() + 8 * 6 * 3);
    }
}
