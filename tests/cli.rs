//! Exit-status tests for the `framegrab` binary.

mod common;

use std::{fs, process::Command};

use common::{write_gray_y4m, write_wav};

fn framegrab() -> Command {
    Command::new(env!("CARGO_BIN_EXE_framegrab"))
}

#[test]
fn successful_run_exits_zero_and_writes_frame1() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let input = directory.path().join("input.y4m");
    write_gray_y4m(&input, 64, 48, 10);

    let status = framegrab()
        .arg(&input)
        .current_dir(directory.path())
        .status()
        .expect("Failed to run framegrab");

    assert!(status.success());
    let bytes = fs::read(directory.path().join("frame1.ppm")).expect("frame1.ppm missing");
    assert!(bytes.starts_with(b"P6\n64 48\n255\n"));
}

#[test]
fn no_video_stream_exits_nonzero() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let input = directory.path().join("tone.wav");
    write_wav(&input, 8_000, 8_000);

    let output = framegrab()
        .arg(&input)
        .current_dir(directory.path())
        .output()
        .expect("Failed to run framegrab");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No video stream"), "stderr: {stderr}");
    assert!(!directory.path().join("frame1.ppm").exists());
}

#[test]
fn missing_input_exits_nonzero() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");

    let status = framegrab()
        .arg(directory.path().join("nope.mp4"))
        .current_dir(directory.path())
        .status()
        .expect("Failed to run framegrab");

    assert!(!status.success());
}

#[test]
fn json_prints_metadata_without_extracting() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let input = directory.path().join("input.y4m");
    write_gray_y4m(&input, 32, 16, 2);

    let output = framegrab()
        .arg(&input)
        .arg("--json")
        .current_dir(directory.path())
        .output()
        .expect("Failed to run framegrab");

    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(value["streams"][0]["kind"], "video");
    assert_eq!(value["streams"][0]["width"], 32);
    assert!(!directory.path().join("frame1.ppm").exists());
}
