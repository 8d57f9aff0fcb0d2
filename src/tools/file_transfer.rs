//! 檔案複製/移動引擎
//!
//! 逐一處理已篩選的影片，單一檔案失敗不會中斷整批作業，也不會回復已完成的檔案。

use crate::tools::VideoFile;
use crate::tools::path_validator;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub const NO_MATCHING_FILES: &str = "no matching files";

/// 檔案系統操作，正式實作為 [`StdFileSystem`]
pub trait FileSystem {
    /// 目標已存在時覆寫
    fn copy_file(&self, source: &Path, destination: &Path) -> Result<()>;
    /// 目標已存在時覆寫
    fn move_file(&self, source: &Path, destination: &Path) -> Result<()>;
    fn ensure_directory_exists(&self, directory: &Path) -> Result<()>;
    fn paths_are_equal(&self, a: &Path, b: &Path) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileSystem;

impl StdFileSystem {
    fn copy_and_delete(source: &Path, target: &Path) -> Result<()> {
        fs::copy(source, target).with_context(|| {
            format!("複製檔案失敗: {} -> {}", source.display(), target.display())
        })?;

        // 原檔刪不掉時移除剛複製的目標，避免同一檔案同時留在兩處
        if let Err(e) = fs::remove_file(source) {
            if let Err(cleanup_err) = fs::remove_file(target) {
                warn!("無法移除已複製的檔案 {}: {cleanup_err}", target.display());
            }
            return Err(e).with_context(|| format!("刪除原檔案失敗: {}", source.display()));
        }

        Ok(())
    }
}

impl FileSystem for StdFileSystem {
    fn copy_file(&self, source: &Path, destination: &Path) -> Result<()> {
        fs::copy(source, destination).with_context(|| {
            format!(
                "複製檔案失敗: {} -> {}",
                source.display(),
                destination.display()
            )
        })?;
        Ok(())
    }

    /// `fs::rename` 在所有支援平台都會覆寫既有檔案；跨檔案系統時改為複製後刪除
    fn move_file(&self, source: &Path, destination: &Path) -> Result<()> {
        match fs::rename(source, destination) {
            Ok(()) => Ok(()),
            Err(rename_err) => Self::copy_and_delete(source, destination)
                .with_context(|| format!("rename 失敗: {rename_err}")),
        }
    }

    fn ensure_directory_exists(&self, directory: &Path) -> Result<()> {
        path_validator::ensure_directory_exists(directory)
    }

    fn paths_are_equal(&self, a: &Path, b: &Path) -> bool {
        path_validator::paths_are_equal(a, b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOperation {
    Copy,
    Move,
}

impl TransferOperation {
    const fn past_tense(self) -> &'static str {
        match self {
            Self::Copy => "copied",
            Self::Move => "moved",
        }
    }
}

impl fmt::Display for TransferOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Copy => write!(f, "copy"),
            Self::Move => write!(f, "move"),
        }
    }
}

/// 單一檔案失敗的記錄
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// 一次批次作業的結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOperationResult {
    pub success: bool,
    pub message: String,
    /// 成功處理的檔案數
    pub count: usize,
    /// 實際嘗試的檔案數
    pub attempted: usize,
    pub failures: Vec<TransferFailure>,
    /// 因中斷訊號提前結束
    pub cancelled: bool,
}

impl FileOperationResult {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            count: 0,
            attempted: 0,
            failures: Vec::new(),
            cancelled: false,
        }
    }

    #[must_use]
    pub fn no_matching_files() -> Self {
        Self {
            success: true,
            message: NO_MATCHING_FILES.to_string(),
            ..Self::failure("")
        }
    }

    fn completed(
        operation: TransferOperation,
        count: usize,
        attempted: usize,
        failures: Vec<TransferFailure>,
        cancelled: bool,
    ) -> Self {
        let mut message = format!("{} {count} file(s)", operation.past_tense());
        if !failures.is_empty() {
            message.push_str(&format!(", {} failed", failures.len()));
        }
        if cancelled {
            message.push_str(", cancelled");
        }

        Self {
            success: true,
            message,
            count,
            attempted,
            failures,
            cancelled,
        }
    }
}

/// 每成功一個檔案呼叫一次，參數為影片與目前成功數
pub type ProgressCallback<'a> = &'a mut dyn FnMut(&VideoFile, usize);

pub struct FileTransferEngine<'a, F> {
    file_system: &'a F,
    shutdown_signal: Option<Arc<AtomicBool>>,
}

impl<'a, F: FileSystem> FileTransferEngine<'a, F> {
    pub const fn new(file_system: &'a F) -> Self {
        Self {
            file_system,
            shutdown_signal: None,
        }
    }

    /// 每個檔案之間檢查中斷訊號
    #[must_use]
    pub fn with_shutdown_signal(mut self, shutdown_signal: Arc<AtomicBool>) -> Self {
        self.shutdown_signal = Some(shutdown_signal);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.shutdown_signal
            .as_ref()
            .is_some_and(|signal| signal.load(Ordering::SeqCst))
    }

    /// 目的資料夾的存在與來源不同由呼叫端檢查
    pub fn apply(
        &self,
        operation: TransferOperation,
        videos: &[VideoFile],
        destination_dir: &Path,
        mut on_progress: Option<ProgressCallback<'_>>,
    ) -> FileOperationResult {
        if videos.is_empty() {
            return FileOperationResult::no_matching_files();
        }

        info!(
            "開始{operation} {} 個檔案至 {}",
            videos.len(),
            destination_dir.display()
        );

        let mut success_count = 0;
        let mut attempted = 0;
        let mut failures = Vec::new();
        let mut cancelled = false;

        for video in videos {
            if self.is_cancelled() {
                warn!("收到中斷訊號，停止處理");
                cancelled = true;
                break;
            }
            attempted += 1;

            let target = destination_dir.join(video.filename());

            match self.transfer_one(operation, video.path(), &target) {
                Ok(()) => {
                    debug!(
                        "{operation}: {} -> {}",
                        video.path().display(),
                        target.display()
                    );
                    success_count += 1;
                    if let Some(callback) = on_progress.as_mut() {
                        callback(video, success_count);
                    }
                }
                Err(e) => {
                    warn!("{operation} 失敗 {}: {e:#}", video.path().display());
                    failures.push(TransferFailure {
                        path: video.path().to_path_buf(),
                        reason: format!("{e:#}"),
                    });
                }
            }
        }

        let result =
            FileOperationResult::completed(operation, success_count, attempted, failures, cancelled);
        info!("{operation} 完成: {}", result.message);
        result
    }

    fn transfer_one(&self, operation: TransferOperation, source: &Path, target: &Path) -> Result<()> {
        // 來源與目標為同一檔案時不做任何 I/O，避免 copy 截斷自身
        if self.file_system.paths_are_equal(source, target) {
            debug!("檔案已在目的地: {}", target.display());
            return Ok(());
        }

        match operation {
            TransferOperation::Copy => self.file_system.copy_file(source, target),
            TransferOperation::Move => self.file_system.move_file(source, target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ProbeOutcome;
    use anyhow::bail;
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// 只記錄呼叫，不碰真正的檔案系統
    #[derive(Default)]
    struct RecordingFileSystem {
        calls: RefCell<Vec<(PathBuf, PathBuf)>>,
        fail_on: Option<&'static str>,
    }

    impl RecordingFileSystem {
        fn record(&self, source: &Path, destination: &Path) -> Result<()> {
            if self
                .fail_on
                .is_some_and(|name| source.file_name().is_some_and(|n| n == name))
            {
                bail!("permission denied");
            }
            self.calls
                .borrow_mut()
                .push((source.to_path_buf(), destination.to_path_buf()));
            Ok(())
        }
    }

    impl FileSystem for RecordingFileSystem {
        fn copy_file(&self, source: &Path, destination: &Path) -> Result<()> {
            self.record(source, destination)
        }

        fn move_file(&self, source: &Path, destination: &Path) -> Result<()> {
            self.record(source, destination)
        }

        fn ensure_directory_exists(&self, _directory: &Path) -> Result<()> {
            Ok(())
        }

        fn paths_are_equal(&self, a: &Path, b: &Path) -> bool {
            a == b
        }
    }

    fn videos(names: &[&str]) -> Vec<VideoFile> {
        names
            .iter()
            .map(|n| VideoFile::new(format!("/src/{n}"), ProbeOutcome::Duration(10.0)))
            .collect()
    }

    #[test]
    fn test_empty_input_short_circuits() {
        let fs = RecordingFileSystem::default();
        let result = FileTransferEngine::new(&fs).apply(
            TransferOperation::Copy,
            &[],
            Path::new("/dst"),
            None,
        );
        assert_eq!(result, FileOperationResult::no_matching_files());
        assert!(result.success);
        assert_eq!(result.message, NO_MATCHING_FILES);
        assert!(fs.calls.borrow().is_empty());
    }

    #[test]
    fn test_targets_use_filename_in_order() {
        let fs = RecordingFileSystem::default();
        let result = FileTransferEngine::new(&fs).apply(
            TransferOperation::Move,
            &videos(&["b.mp4", "a.mp4"]),
            Path::new("/dst"),
            None,
        );
        assert_eq!(result.count, 2);
        assert_eq!(result.message, "moved 2 file(s)");
        assert_eq!(
            *fs.calls.borrow(),
            vec![
                (PathBuf::from("/src/b.mp4"), PathBuf::from("/dst/b.mp4")),
                (PathBuf::from("/src/a.mp4"), PathBuf::from("/dst/a.mp4")),
            ]
        );
    }

    #[test]
    fn test_failure_is_recorded_and_skipped() {
        let fs = RecordingFileSystem {
            fail_on: Some("a.mp4"),
            ..Default::default()
        };
        let mut progress = Vec::new();
        let mut on_progress = |video: &VideoFile, count: usize| {
            progress.push((video.filename().to_string(), count));
        };

        let result = FileTransferEngine::new(&fs).apply(
            TransferOperation::Copy,
            &videos(&["a.mp4", "b.mp4", "c.mp4"]),
            Path::new("/dst"),
            Some(&mut on_progress),
        );

        assert!(result.success);
        assert_eq!(result.count, 2);
        assert_eq!(result.attempted, 3);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].path, PathBuf::from("/src/a.mp4"));
        assert!(result.failures[0].reason.contains("permission denied"));
        assert_eq!(result.message, "copied 2 file(s), 1 failed");
        assert_eq!(
            progress,
            vec![("b.mp4".to_string(), 1), ("c.mp4".to_string(), 2)]
        );
    }

    #[test]
    fn test_shutdown_signal_stops_between_files() {
        let fs = RecordingFileSystem::default();
        let signal = Arc::new(AtomicBool::new(false));
        let signal_in_callback = Arc::clone(&signal);
        let mut on_progress = |_: &VideoFile, _: usize| {
            signal_in_callback.store(true, Ordering::SeqCst);
        };

        let result = FileTransferEngine::new(&fs)
            .with_shutdown_signal(signal)
            .apply(
                TransferOperation::Copy,
                &videos(&["a.mp4", "b.mp4", "c.mp4"]),
                Path::new("/dst"),
                Some(&mut on_progress),
            );

        assert!(result.success);
        assert!(result.cancelled);
        assert_eq!(result.count, 1);
        assert_eq!(result.attempted, 1);
        assert_eq!(fs.calls.borrow().len(), 1);
    }

    #[test]
    fn test_source_equal_to_target_is_noop() {
        let fs = RecordingFileSystem::default();
        let result = FileTransferEngine::new(&fs).apply(
            TransferOperation::Copy,
            &videos(&["a.mp4"]),
            Path::new("/src"),
            None,
        );
        assert_eq!(result.count, 1);
        assert!(fs.calls.borrow().is_empty());
    }

    #[test]
    fn test_std_copy_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("a.mp4");
        let target = temp_dir.path().join("b.mp4");
        fs::write(&source, "new").unwrap();
        fs::write(&target, "old").unwrap();

        StdFileSystem.copy_file(&source, &target).unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
        assert!(source.exists());
    }

    #[test]
    fn test_std_move_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("a.mp4");
        let target = temp_dir.path().join("b.mp4");
        fs::write(&source, "new").unwrap();
        fs::write(&target, "old").unwrap();

        StdFileSystem.move_file(&source, &target).unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
        assert!(!source.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_std_move_keeps_single_copy_when_source_cannot_be_removed() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let locked_dir = temp_dir.path().join("locked");
        let output_dir = temp_dir.path().join("out");
        fs::create_dir(&locked_dir).unwrap();
        fs::create_dir(&output_dir).unwrap();
        let source = locked_dir.join("a.mp4");
        let target = output_dir.join("a.mp4");
        fs::write(&source, "video").unwrap();

        // 唯讀資料夾讓 rename 與刪除原檔都失敗，但仍可讀取複製
        fs::set_permissions(&locked_dir, fs::Permissions::from_mode(0o555)).unwrap();
        if fs::write(locked_dir.join("writable"), "").is_ok() {
            fs::set_permissions(&locked_dir, fs::Permissions::from_mode(0o755)).unwrap();
            println!("跳過測試：以 root 執行時唯讀資料夾仍可寫入");
            return;
        }

        let result = StdFileSystem.move_file(&source, &target);
        fs::set_permissions(&locked_dir, fs::Permissions::from_mode(0o755)).unwrap();

        let err = result.unwrap_err();
        assert!(format!("{err:#}").contains("刪除原檔案失敗"));
        assert!(source.exists());
        assert!(!target.exists());
    }

    #[test]
    fn test_std_copy_missing_source_fails() {
        let temp_dir = TempDir::new().unwrap();
        let result = StdFileSystem.copy_file(
            &temp_dir.path().join("missing.mp4"),
            &temp_dir.path().join("out.mp4"),
        );
        assert!(result.is_err());
    }
}
