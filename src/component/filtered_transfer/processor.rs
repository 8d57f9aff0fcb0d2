//! 影片篩選與搬移的用例層
//!
//! 組合掃描、篩選與傳輸引擎；任何情況都回傳結果值，不會回傳錯誤。

use crate::tools::{
    FileOperationResult, FileSystem, FileTransferEngine, FilterCriteria, ProgressCallback,
    ScanReport, TransferOperation, VideoFile, VideoRepository,
};
use log::{info, warn};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// 整批作業開始前就失敗的情況，`Display` 即為結果訊息
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PreconditionError {
    #[error("cannot create output directory: {reason}")]
    CannotCreateOutputDir { reason: String },
    #[error("source and destination must differ: same directory")]
    SameDirectory,
}

impl From<PreconditionError> for FileOperationResult {
    fn from(error: PreconditionError) -> Self {
        Self::failure(error.to_string())
    }
}

pub struct VideoFileProcessor<R, F> {
    repository: R,
    file_system: F,
    shutdown_signal: Option<Arc<AtomicBool>>,
}

impl<R: VideoRepository, F: FileSystem> VideoFileProcessor<R, F> {
    pub const fn new(repository: R, file_system: F) -> Self {
        Self {
            repository,
            file_system,
            shutdown_signal: None,
        }
    }

    #[must_use]
    pub fn with_shutdown_signal(mut self, shutdown_signal: Arc<AtomicBool>) -> Self {
        self.shutdown_signal = Some(shutdown_signal);
        self
    }

    pub fn get_videos_from_directory(&self, directory: &Path) -> ScanReport {
        self.repository.find_videos(directory)
    }

    #[must_use]
    pub fn filter_videos_by_duration(
        &self,
        videos: &[VideoFile],
        criteria: &FilterCriteria,
    ) -> Vec<VideoFile> {
        criteria.filter(videos)
    }

    pub fn copy_filtered(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        criteria: &FilterCriteria,
        on_progress: Option<ProgressCallback<'_>>,
    ) -> FileOperationResult {
        self.process(
            TransferOperation::Copy,
            input_dir,
            output_dir,
            criteria,
            on_progress,
        )
    }

    pub fn move_filtered(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        criteria: &FilterCriteria,
        on_progress: Option<ProgressCallback<'_>>,
    ) -> FileOperationResult {
        self.process(
            TransferOperation::Move,
            input_dir,
            output_dir,
            criteria,
            on_progress,
        )
    }

    fn check_preconditions(
        &self,
        input_dir: &Path,
        output_dir: &Path,
    ) -> Result<(), PreconditionError> {
        self.file_system
            .ensure_directory_exists(output_dir)
            .map_err(|e| PreconditionError::CannotCreateOutputDir {
                reason: format!("{e:#}"),
            })?;

        if self.file_system.paths_are_equal(input_dir, output_dir) {
            return Err(PreconditionError::SameDirectory);
        }

        Ok(())
    }

    fn process(
        &self,
        operation: TransferOperation,
        input_dir: &Path,
        output_dir: &Path,
        criteria: &FilterCriteria,
        on_progress: Option<ProgressCallback<'_>>,
    ) -> FileOperationResult {
        // 上一批的中斷只作用於上一批
        if let Some(signal) = &self.shutdown_signal {
            signal.store(false, Ordering::SeqCst);
        }

        if let Err(e) = self.check_preconditions(input_dir, output_dir) {
            warn!("{operation} 無法開始: {e}");
            return e.into();
        }

        let report = self.get_videos_from_directory(input_dir);
        let filtered = self.filter_videos_by_duration(&report.videos, criteria);
        info!(
            "{} 個影片中有 {} 個符合 ({}, {}]",
            report.videos.len(),
            filtered.len(),
            criteria.min_duration,
            criteria.max_duration
        );

        if filtered.is_empty() {
            return FileOperationResult::no_matching_files();
        }

        let mut engine = FileTransferEngine::new(&self.file_system);
        if let Some(signal) = &self.shutdown_signal {
            engine = engine.with_shutdown_signal(Arc::clone(signal));
        }
        engine.apply(operation, &filtered, output_dir, on_progress)
    }
}
