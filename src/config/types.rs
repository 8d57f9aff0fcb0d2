use serde::{Deserialize, Serialize};
use std::fmt;

/// 最近使用路徑的保留數量
pub const MAX_RECENT_PATHS: usize = 10;

/// 單檔腳本版本使用的時長門檻（秒）
pub const LEGACY_MAX_DURATION_SECONDS: f64 = 56.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "zh-CN")]
    ZhCn,
}

impl Language {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EnUs => "en-US",
            Self::ZhCn => "zh-CN",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnUs => write!(f, "English"),
            Self::ZhCn => write!(f, "简体中文"),
        }
    }
}

/// 預設時長範圍 `(min, max]`，`max` 為 `None` 代表無上限
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationRangeSettings {
    pub min_seconds: f64,
    pub max_seconds: Option<f64>,
}

impl Default for DurationRangeSettings {
    fn default() -> Self {
        Self {
            min_seconds: 0.0,
            max_seconds: None,
        }
    }
}

impl fmt::Display for DurationRangeSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max_seconds {
            Some(max) => write!(f, "({}, {}]", self.min_seconds, max),
            None => write!(f, "({}, ∞)", self.min_seconds),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub language: Language,
    pub recent_paths: Vec<String>,
    pub last_output_dir: Option<String>,
    pub default_range: DurationRangeSettings,
    /// 無法讀取時長的影片是否以 0 秒參與篩選
    pub include_unreadable: bool,
    pub video_extensions: Vec<String>,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            language: Language::default(),
            recent_paths: Vec::new(),
            last_output_dir: None,
            default_range: DurationRangeSettings::default(),
            include_unreadable: false,
            video_extensions: vec![".mp4".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub settings: UserSettings,
}
