use anyhow::{Context, Result, anyhow, bail};
use log::debug;
use serde::Deserialize;
use std::path::Path;
use std::process::Command;

/// 影片時長探測結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProbeOutcome {
    Duration(f64),
    /// 無法解碼、找不到視訊串流或幀率無效
    Unreadable,
}

impl ProbeOutcome {
    /// 無法讀取時回傳 0，與舊版的哨兵值一致
    #[must_use]
    pub const fn seconds(self) -> f64 {
        match self {
            Self::Duration(seconds) => seconds,
            Self::Unreadable => 0.0,
        }
    }

    #[must_use]
    pub const fn is_readable(self) -> bool {
        matches!(self, Self::Duration(_))
    }
}

/// 取得單一檔案時長的能力，任何錯誤都必須轉成 `Unreadable`
pub trait DurationProbe {
    fn probe(&self, path: &Path) -> ProbeOutcome;
}

/// 以外部 ffprobe 執行檔實作的探測器
#[derive(Debug, Clone)]
pub struct FfprobeProbe {
    program: String,
}

impl Default for FfprobeProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl FfprobeProbe {
    #[must_use]
    pub fn new() -> Self {
        Self {
            program: "ffprobe".to_string(),
        }
    }

    #[must_use]
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl DurationProbe for FfprobeProbe {
    fn probe(&self, path: &Path) -> ProbeOutcome {
        match get_video_duration(&self.program, path) {
            Ok(seconds) => ProbeOutcome::Duration(seconds),
            Err(e) => {
                debug!("無法取得影片時長 {}: {e:#}", path.display());
                ProbeOutcome::Unreadable
            }
        }
    }
}

#[derive(Deserialize)]
struct FfprobeOutput {
    format: Option<FormatInfo>,
    streams: Option<Vec<StreamInfo>>,
}

#[derive(Deserialize)]
struct FormatInfo {
    duration: Option<String>,
}

#[derive(Deserialize)]
struct StreamInfo {
    codec_type: Option<String>,
    r_frame_rate: Option<String>,
    nb_frames: Option<String>,
    duration: Option<String>,
}

fn get_video_duration(program: &str, path: &Path) -> Result<f64> {
    let output = Command::new(program)
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .with_context(|| format!("無法執行 ffprobe: {}", path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("ffprobe 執行失敗: {stderr}");
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let probe: FfprobeOutput =
        serde_json::from_str(&stdout).context("無法解析 ffprobe 輸出")?;

    duration_from_probe(&probe)
}

/// 時長 = 幀數 / 幀率；容器未提供幀數時改用 ffprobe 回報的長度
fn duration_from_probe(probe: &FfprobeOutput) -> Result<f64> {
    let video_stream = probe
        .streams
        .as_ref()
        .and_then(|streams| {
            streams
                .iter()
                .find(|s| s.codec_type.as_deref() == Some("video"))
        })
        .ok_or_else(|| anyhow!("找不到視訊串流"))?;

    let fps = video_stream
        .r_frame_rate
        .as_deref()
        .and_then(parse_frame_rate)
        .unwrap_or(0.0);
    if fps <= 0.0 {
        bail!("幀率無效");
    }

    let frame_count = video_stream
        .nb_frames
        .as_deref()
        .and_then(|n| n.parse::<u64>().ok());

    match frame_count {
        Some(0) => bail!("影片沒有任何幀"),
        Some(frames) => Ok(frames as f64 / fps),
        None => video_stream
            .duration
            .as_ref()
            .or_else(|| probe.format.as_ref().and_then(|f| f.duration.as_ref()))
            .and_then(|d| d.parse::<f64>().ok())
            .filter(|d| *d > 0.0)
            .ok_or_else(|| anyhow!("無法取得影片長度")),
    }
}

/// 解析幀率字串（例如 "30/1" 或 "30000/1001"）
fn parse_frame_rate(rate: &str) -> Option<f64> {
    if let Some((num_str, den_str)) = rate.split_once('/') {
        let num: f64 = num_str.parse().ok()?;
        let den: f64 = den_str.parse().ok()?;
        if den > 0.0 {
            return Some(num / den);
        }
        return None;
    }
    rate.parse().ok()
}
