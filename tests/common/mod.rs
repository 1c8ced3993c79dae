//! Fixture generation shared by the integration tests.
//!
//! Inputs are written on the fly into temporary directories: YUV4MPEG2
//! files for raw planar video and PCM WAV files for audio-only containers.

#![allow(dead_code)]

use std::{fs, path::Path};

/// One solid YUV colour.
#[derive(Debug, Clone, Copy)]
pub struct Yuv {
    pub y: u8,
    pub u: u8,
    pub v: u8,
}

pub const GRAY: Yuv = Yuv {
    y: 128,
    u: 128,
    v: 128,
};

pub const WHITE: Yuv = Yuv {
    y: 235,
    u: 128,
    v: 128,
};

/// BT.601 limited-range red.
pub const RED: Yuv = Yuv {
    y: 81,
    u: 90,
    v: 240,
};

/// Write a 4:2:0 YUV4MPEG2 file with one solid-colour picture per entry in
/// `frames`.
pub fn write_y4m(path: &Path, width: u32, height: u32, frames: &[Yuv]) {
    let luma = (width * height) as usize;
    let chroma = ((width / 2) * (height / 2)) as usize;

    let mut bytes = format!("YUV4MPEG2 W{width} H{height} F25:1 Ip A1:1 C420jpeg\n").into_bytes();
    for colour in frames {
        bytes.extend_from_slice(b"FRAME\n");
        bytes.extend(std::iter::repeat_n(colour.y, luma));
        bytes.extend(std::iter::repeat_n(colour.u, chroma));
        bytes.extend(std::iter::repeat_n(colour.v, chroma));
    }
    fs::write(path, bytes).expect("Failed to write y4m fixture");
}

/// Write `count` gray frames.
pub fn write_gray_y4m(path: &Path, width: u32, height: u32, count: usize) {
    write_y4m(path, width, height, &vec![GRAY; count]);
}

/// Write a mono 16-bit PCM WAV file of silence.
pub fn write_wav(path: &Path, sample_rate: u32, samples: u32) {
    let data_len = samples * 2;
    let mut bytes = Vec::with_capacity(44 + data_len as usize);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
    bytes.extend_from_slice(&1u16.to_le_bytes()); // mono
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&(sample_rate * 2).to_le_bytes());
    bytes.extend_from_slice(&2u16.to_le_bytes());
    bytes.extend_from_slice(&16u16.to_le_bytes());
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len.to_le_bytes());
    bytes.resize(44 + data_len as usize, 0);
    fs::write(path, bytes).expect("Failed to write wav fixture");
}

/// Split a binary PPM into its header fields and pixel bytes.
pub fn parse_ppm(bytes: &[u8]) -> (u32, u32, &[u8]) {
    let mut fields = Vec::new();
    let mut position = 0;
    while fields.len() < 4 {
        let end = bytes[position..]
            .iter()
            .position(|byte| byte.is_ascii_whitespace())
            .map(|offset| position + offset)
            .expect("Truncated PPM header");
        fields.push(std::str::from_utf8(&bytes[position..end]).unwrap().to_string());
        position = end + 1;
    }
    assert_eq!(fields[0], "P6");
    assert_eq!(fields[3], "255");
    (
        fields[1].parse().unwrap(),
        fields[2].parse().unwrap(),
        &bytes[position..],
    )
}
