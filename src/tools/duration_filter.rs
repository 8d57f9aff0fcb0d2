//! 時長篩選
//!
//! 範圍為左開右閉區間 `(min, max]`

use crate::config::DurationRangeSettings;
use crate::tools::{ProbeOutcome, VideoFile};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterCriteria {
    pub min_duration: f64,
    pub max_duration: f64,
    /// 為 true 時，無法讀取時長的影片視為 0 秒參與比較
    pub include_unreadable: bool,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            min_duration: 0.0,
            max_duration: f64::INFINITY,
            include_unreadable: false,
        }
    }
}

impl From<DurationRangeSettings> for FilterCriteria {
    fn from(range: DurationRangeSettings) -> Self {
        Self::new(range.min_seconds, range.max_seconds.unwrap_or(f64::INFINITY))
    }
}

impl FilterCriteria {
    #[must_use]
    pub fn new(min_duration: f64, max_duration: f64) -> Self {
        Self {
            min_duration,
            max_duration,
            include_unreadable: false,
        }
    }

    #[must_use]
    pub const fn with_unreadable(mut self, include: bool) -> Self {
        self.include_unreadable = include;
        self
    }

    /// `min >= max` 時任何時長都不符合
    #[must_use]
    pub fn contains(&self, seconds: f64) -> bool {
        self.min_duration < seconds && seconds <= self.max_duration
    }

    #[must_use]
    pub fn matches(&self, video: &VideoFile) -> bool {
        match video.duration() {
            ProbeOutcome::Duration(seconds) => self.contains(seconds),
            ProbeOutcome::Unreadable => self.include_unreadable && self.contains(0.0),
        }
    }

    /// 保留輸入順序
    #[must_use]
    pub fn filter(&self, videos: &[VideoFile]) -> Vec<VideoFile> {
        videos
            .iter()
            .filter(|video| self.matches(video))
            .cloned()
            .collect()
    }
}
