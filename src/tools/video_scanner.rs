use crate::tools::{DurationProbe, ProbeOutcome};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 掃描得到的影片，建立後不再變動
#[derive(Debug, Clone, PartialEq)]
pub struct VideoFile {
    path: PathBuf,
    duration: ProbeOutcome,
    filename: String,
}

impl VideoFile {
    pub fn new(path: impl Into<PathBuf>, duration: ProbeOutcome) -> Self {
        let path = path.into();
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self {
            path,
            duration,
            filename,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn duration(&self) -> ProbeOutcome {
        self.duration
    }

    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }
}

/// 掃描結果：影片清單加上走訪過程中遇到的錯誤
#[derive(Debug, Default)]
pub struct ScanReport {
    pub videos: Vec<VideoFile>,
    pub warnings: Vec<String>,
}

/// 影片來源，正式實作為 [`DirectoryScanner`]，測試可替換
pub trait VideoRepository {
    fn find_videos(&self, directory: &Path) -> ScanReport;
}

/// 遞迴掃描資料夾中符合副檔名的影片並取得時長
pub struct DirectoryScanner<P> {
    probe: P,
    extensions: Vec<String>,
}

impl<P: DurationProbe> DirectoryScanner<P> {
    /// `extensions` 可含或不含前導點，比對時不分大小寫
    pub fn new(probe: P, extensions: &[String]) -> Self {
        let extensions = extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        Self { probe, extensions }
    }

    fn is_video_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.contains(&ext.to_lowercase()))
    }

    /// 走訪錯誤不會中斷掃描，只記錄為警告
    pub fn scan(&self, directory: &Path) -> ScanReport {
        info!("開始掃描目錄: {}", directory.display());

        let mut report = ScanReport::default();

        for entry in WalkDir::new(directory).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("掃描目錄時發生錯誤: {e}");
                    report.warnings.push(e.to_string());
                    continue;
                }
            };

            if !entry.file_type().is_file() || !self.is_video_file(entry.path()) {
                continue;
            }

            let duration = self.probe.probe(entry.path());
            debug!("{} -> {duration:?}", entry.path().display());
            report.videos.push(VideoFile::new(entry.into_path(), duration));
        }

        info!(
            "掃描完成，找到 {} 個影片，{} 個警告",
            report.videos.len(),
            report.warnings.len()
        );
        report
    }
}

impl<P: DurationProbe> VideoRepository for DirectoryScanner<P> {
    fn find_videos(&self, directory: &Path) -> ScanReport {
        self.scan(directory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct FixedProbe(f64);

    impl DurationProbe for FixedProbe {
        fn probe(&self, _path: &Path) -> ProbeOutcome {
            ProbeOutcome::Duration(self.0)
        }
    }

    fn mp4_scanner() -> DirectoryScanner<FixedProbe> {
        DirectoryScanner::new(FixedProbe(10.0), &[".mp4".to_string()])
    }

    #[test]
    fn test_video_file_derives_filename() {
        let video = VideoFile::new("/videos/sub/clip.mp4", ProbeOutcome::Duration(1.0));
        assert_eq!(video.filename(), "clip.mp4");
        assert_eq!(video.path(), Path::new("/videos/sub/clip.mp4"));
    }

    #[test]
    fn test_scan_recursive_and_case_insensitive() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();
        fs::create_dir_all(base.join("nested/deeper")).unwrap();

        fs::write(base.join("a.mp4"), "a").unwrap();
        fs::write(base.join("nested/B.MP4"), "b").unwrap();
        fs::write(base.join("nested/deeper/c.Mp4"), "c").unwrap();
        fs::write(base.join("notes.txt"), "x").unwrap();
        fs::write(base.join("movie.mkv"), "x").unwrap();
        fs::create_dir_all(base.join("folder.mp4")).unwrap();

        let report = mp4_scanner().scan(base);

        let mut names: Vec<&str> = report.videos.iter().map(VideoFile::filename).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["B.MP4", "a.mp4", "c.Mp4"]);
        assert!(report.warnings.is_empty());
        assert!(
            report
                .videos
                .iter()
                .all(|v| v.duration() == ProbeOutcome::Duration(10.0))
        );
    }

    #[test]
    fn test_scan_missing_root_returns_warning() {
        let temp_dir = TempDir::new().unwrap();
        let report = mp4_scanner().scan(&temp_dir.path().join("missing"));
        assert!(report.videos.is_empty());
        assert_eq!(report.warnings.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_continues_past_unreadable_directory() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();
        let locked = base.join("b_locked");
        fs::create_dir_all(&locked).unwrap();
        fs::create_dir_all(base.join("c_open")).unwrap();
        fs::write(base.join("a.mp4"), "a").unwrap();
        fs::write(locked.join("hidden.mp4"), "x").unwrap();
        fs::write(base.join("c_open/b.mp4"), "b").unwrap();

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            println!("跳過測試：以 root 執行時無法建立不可讀的資料夾");
            return;
        }

        let report = mp4_scanner().scan(base);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let mut names: Vec<&str> = report.videos.iter().map(VideoFile::filename).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["a.mp4", "b.mp4"]);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_extensions_normalized() {
        let scanner = DirectoryScanner::new(FixedProbe(1.0), &["MKV".to_string(), ".mp4".into()]);
        assert!(scanner.is_video_file(Path::new("x.mkv")));
        assert!(scanner.is_video_file(Path::new("x.MP4")));
        assert!(!scanner.is_video_file(Path::new("x.avi")));
    }
}
