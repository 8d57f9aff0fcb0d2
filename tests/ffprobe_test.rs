//! ffprobe 探測測試
//!
//! 系統沒有 ffprobe 或 ffmpeg 時跳過需要真實影片的測試

use std::fs;
use std::process::Command;

use tempfile::TempDir;
use video_duration_filter::tools::{DurationProbe, FfprobeProbe, ProbeOutcome};

fn tool_available(program: &str) -> bool {
    Command::new(program)
        .arg("-version")
        .output()
        .is_ok_and(|output| output.status.success())
}

#[test]
fn test_non_video_file_is_unreadable() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("fake.mp4");
    fs::write(&path, "this is not a video").unwrap();

    assert_eq!(FfprobeProbe::new().probe(&path), ProbeOutcome::Unreadable);
}

#[test]
fn test_missing_file_is_unreadable() {
    let temp_dir = TempDir::new().unwrap();
    assert_eq!(
        FfprobeProbe::new().probe(&temp_dir.path().join("missing.mp4")),
        ProbeOutcome::Unreadable
    );
}

#[test]
fn test_generated_video_duration() {
    if !tool_available("ffprobe") || !tool_available("ffmpeg") {
        println!("跳過測試：找不到 ffprobe 或 ffmpeg");
        return;
    }

    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("two_seconds.mp4");
    let status = Command::new("ffmpeg")
        .args([
            "-v",
            "quiet",
            "-f",
            "lavfi",
            "-i",
            "color=c=blue:s=64x64:r=25:d=2",
            "-pix_fmt",
            "yuv420p",
        ])
        .arg(&path)
        .status()
        .unwrap();
    if !status.success() {
        println!("跳過測試：無法產生測試影片");
        return;
    }

    match FfprobeProbe::new().probe(&path) {
        ProbeOutcome::Duration(seconds) => assert!((seconds - 2.0).abs() < 0.1, "{seconds}"),
        ProbeOutcome::Unreadable => panic!("應該能讀取產生的影片"),
    }
}
