use super::processor::VideoFileProcessor;
use super::terminal_ui::{Severity, TerminalUi, UserInterface};
use crate::config::save::{add_recent_path, save_settings};
use crate::config::{Config, DurationRangeSettings, LEGACY_MAX_DURATION_SECONDS};
use crate::tools::{
    DirectoryScanner, FfprobeProbe, FileOperationResult, FilterCriteria, NO_MATCHING_FILES,
    ScanReport, StdFileSystem, TransferOperation, VideoFile, parse_duration_range,
    validate_directory_exists,
};
use anyhow::Result;
use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use rust_i18n::t;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// 失敗清單最多顯示的筆數
const MAX_DISPLAYED_FAILURES: usize = 10;

type Processor = VideoFileProcessor<DirectoryScanner<FfprobeProbe>, StdFileSystem>;

/// 依時長篩選並複製/移動影片的互動元件
pub struct FilteredTransfer<'a> {
    config: &'a mut Config,
    shutdown_signal: Arc<AtomicBool>,
}

impl<'a> FilteredTransfer<'a> {
    pub const fn new(config: &'a mut Config, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            config,
            shutdown_signal,
        }
    }

    fn processor(&self) -> Processor {
        let scanner = DirectoryScanner::new(
            FfprobeProbe::new(),
            &self.config.settings.video_extensions,
        );
        VideoFileProcessor::new(scanner, StdFileSystem)
            .with_shutdown_signal(Arc::clone(&self.shutdown_signal))
    }

    fn ui(&self) -> TerminalUi {
        TerminalUi::new(self.config.settings.recent_paths.clone())
    }

    /// 只列出資料夾中的影片與時長
    pub fn list(&mut self) -> Result<()> {
        println!("{}", style(t!("transfer.list_title")).cyan().bold());

        let ui = self.ui();
        let Some(input_dir) = self.select_input_dir(&ui)? else {
            return Ok(());
        };

        let report = self.scan_and_print(&ui, &input_dir);
        info!(
            "列出 {} 個影片: {}",
            report.videos.len(),
            input_dir.display()
        );
        Ok(())
    }

    pub fn run(&mut self, operation: TransferOperation) -> Result<()> {
        let title = match operation {
            TransferOperation::Copy => t!("transfer.title_copy"),
            TransferOperation::Move => t!("transfer.title_move"),
        };
        println!("{}", style(title).cyan().bold());

        let ui = self.ui();
        let Some(input_dir) = self.select_input_dir(&ui)? else {
            ui.show_message(
                &t!("messages.title_warning"),
                &t!("messages.missing_input"),
                Severity::Warning,
            );
            return Ok(());
        };

        let report = self.scan_and_print(&ui, &input_dir);
        if report.videos.is_empty() {
            return Ok(());
        }

        let Some(output_dir) = self.select_output_dir()? else {
            ui.show_message(
                &t!("messages.title_warning"),
                &t!("messages.missing_output"),
                Severity::Warning,
            );
            return Ok(());
        };

        let Some(criteria) = self.prompt_criteria()? else {
            return Ok(());
        };

        let processor = self.processor();
        let matched = processor.filter_videos_by_duration(&report.videos, &criteria);
        if matched.is_empty() {
            ui.show_message(
                &t!("messages.title_info"),
                &t!("messages.no_matching"),
                Severity::Info,
            );
            return Ok(());
        }

        println!(
            "{}",
            style(t!(
                "transfer.matched",
                count = matched.len(),
                range = range_label(&criteria)
            ))
            .green()
        );

        if !self.confirm(operation)? {
            println!("{}", style(t!("common.cancelled")).yellow());
            return Ok(());
        }

        let progress_bar = create_progress_bar(operation, matched.len());
        let mut on_progress = |video: &VideoFile, count: usize| {
            progress_bar.set_position(count as u64);
            progress_bar.set_message(video.filename().to_string());
        };

        let result = match operation {
            TransferOperation::Copy => {
                processor.copy_filtered(&input_dir, &output_dir, &criteria, Some(&mut on_progress))
            }
            TransferOperation::Move => {
                processor.move_filtered(&input_dir, &output_dir, &criteria, Some(&mut on_progress))
            }
        };
        progress_bar.finish_and_clear();

        self.print_result(&ui, operation, &result, matched.len());

        if operation == TransferOperation::Move && result.success && result.count > 0 {
            let remaining = remaining_after_move(report.videos.len(), &result);
            println!("{}", style(t!("transfer.remaining", count = remaining)).dim());
        }

        Ok(())
    }

    fn select_input_dir(&mut self, ui: &TerminalUi) -> Result<Option<PathBuf>> {
        let Some(input_dir) = ui.select_directory(&t!("transfer.select_input"))? else {
            return Ok(None);
        };

        validate_directory_exists(&input_dir)?;
        self.remember_input_path(&input_dir);
        Ok(Some(input_dir))
    }

    fn select_output_dir(&mut self) -> Result<Option<PathBuf>> {
        let mut candidates: Vec<String> = Vec::new();
        if let Some(last) = &self.config.settings.last_output_dir {
            candidates.push(last.clone());
        }
        for path in &self.config.settings.recent_paths {
            if !candidates.contains(path) {
                candidates.push(path.clone());
            }
        }

        let ui = TerminalUi::new(candidates);
        let Some(output_dir) = ui.select_directory(&t!("transfer.select_output"))? else {
            return Ok(None);
        };

        self.config.settings.last_output_dir = Some(output_dir.to_string_lossy().to_string());
        self.persist_settings();
        Ok(Some(output_dir))
    }

    fn remember_input_path(&mut self, path: &Path) {
        add_recent_path(&mut self.config.settings, &path.to_string_lossy());
        self.persist_settings();
    }

    fn persist_settings(&self) {
        if let Err(e) = save_settings(&self.config.settings) {
            warn!("無法儲存設定: {e:#}");
        }
    }

    fn scan_and_print(&self, ui: &TerminalUi, directory: &Path) -> ScanReport {
        println!("{}", style(t!("transfer.scanning")).dim());
        let report = self.processor().get_videos_from_directory(directory);

        if !report.warnings.is_empty() {
            ui.show_message(
                &t!("messages.title_warning"),
                &t!("transfer.scan_warnings", count = report.warnings.len()),
                Severity::Warning,
            );
            for warning in &report.warnings {
                println!("  {} {}", style("!").yellow(), warning);
            }
        }

        if report.videos.is_empty() {
            println!("{}", style(t!("transfer.none_found")).yellow());
            return report;
        }

        println!();
        println!(
            "{}",
            style(t!("transfer.found", count = report.videos.len())).green()
        );
        for video in &report.videos {
            let duration = if video.duration().is_readable() {
                ui.format_duration(video.duration().seconds())
            } else {
                t!("transfer.unreadable").to_string()
            };
            println!(
                "  {} {} | {}: {}",
                style("→").dim(),
                video.path().display(),
                t!("transfer.duration_label"),
                style(duration).cyan()
            );
        }
        println!();

        report
    }

    /// ESC 取消時回傳 `None`
    fn prompt_criteria(&self) -> Result<Option<FilterCriteria>> {
        let default_range = self.config.settings.default_range;
        let legacy_range = DurationRangeSettings {
            min_seconds: 0.0,
            max_seconds: Some(LEGACY_MAX_DURATION_SECONDS),
        };

        let options = vec![
            t!("transfer.range_default", range = default_range.to_string()).to_string(),
            t!("transfer.range_legacy", range = legacy_range.to_string()).to_string(),
            t!("transfer.range_all").to_string(),
            t!("transfer.range_custom").to_string(),
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("transfer.range_prompt"))
            .items(&options)
            .default(0)
            .interact_opt()?;

        let range = match selection {
            None => return Ok(None),
            Some(0) => default_range,
            Some(1) => legacy_range,
            Some(2) => DurationRangeSettings::default(),
            Some(_) => loop {
                let input: String = Input::new()
                    .with_prompt(t!("transfer.range_input"))
                    .allow_empty(true)
                    .interact_text()?;
                match parse_duration_range(&input) {
                    Ok(range) => break range,
                    Err(e) => println!(
                        "{}",
                        style(t!("transfer.range_invalid", error = e.to_string())).red()
                    ),
                }
            },
        };

        Ok(Some(
            FilterCriteria::from(range).with_unreadable(self.config.settings.include_unreadable),
        ))
    }

    fn confirm(&self, operation: TransferOperation) -> Result<bool> {
        let prompt = match operation {
            TransferOperation::Copy => t!("transfer.confirm_copy"),
            TransferOperation::Move => t!("transfer.confirm_move"),
        };
        let confirm = Confirm::new().with_prompt(prompt).default(true).interact()?;
        Ok(confirm)
    }

    fn print_result(
        &self,
        ui: &TerminalUi,
        operation: TransferOperation,
        result: &FileOperationResult,
        total: usize,
    ) {
        if !result.success {
            ui.show_message(&t!("messages.title_error"), &result.message, Severity::Error);
            warn!("{operation} 失敗: {}", result.message);
            return;
        }

        if result.message == NO_MATCHING_FILES {
            ui.show_message(
                &t!("messages.title_info"),
                &t!("messages.no_matching"),
                Severity::Info,
            );
            return;
        }

        let mut summary = match operation {
            TransferOperation::Copy => t!("messages.summary_copy", count = result.count),
            TransferOperation::Move => t!("messages.summary_move", count = result.count),
        }
        .to_string();
        if !result.failures.is_empty() {
            summary = format!(
                "{summary}, {}",
                t!("messages.summary_failed", count = result.failures.len())
            );
        }
        if result.cancelled {
            summary = format!(
                "{summary}, {}",
                t!(
                    "messages.summary_cancelled",
                    attempted = result.attempted,
                    total = total
                )
            );
        }

        let severity = if result.failures.is_empty() && !result.cancelled {
            Severity::Info
        } else {
            Severity::Warning
        };
        ui.show_message(&t!("messages.title_done"), &summary, severity);

        for failure in result.failures.iter().take(MAX_DISPLAYED_FAILURES) {
            println!(
                "  {} {}: {}",
                style("✗").red(),
                failure.path.display(),
                style(&failure.reason).dim()
            );
        }
        if result.failures.len() > MAX_DISPLAYED_FAILURES {
            println!(
                "  {} {}",
                style("⋯").dim(),
                t!(
                    "messages.more_failures",
                    count = result.failures.len() - MAX_DISPLAYED_FAILURES
                )
            );
        }

        info!(
            "{operation} 完成 - 成功: {}, 失敗: {}, 中斷: {}",
            result.count,
            result.failures.len(),
            result.cancelled
        );
    }
}

/// 由列出時的數量扣掉已移走的檔案，不再重新掃描與讀取時長
const fn remaining_after_move(listed: usize, result: &FileOperationResult) -> usize {
    listed.saturating_sub(result.count)
}

fn range_label(criteria: &FilterCriteria) -> String {
    let max = criteria.max_duration;
    DurationRangeSettings {
        min_seconds: criteria.min_duration,
        max_seconds: max.is_finite().then_some(max),
    }
    .to_string()
}

fn create_progress_bar(operation: TransferOperation, len: usize) -> ProgressBar {
    let progress_bar = ProgressBar::new(len as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{prefix} {spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("Invalid progress bar template")
            .progress_chars("#>-"),
    );
    progress_bar.set_prefix(match operation {
        TransferOperation::Copy => t!("transfer.progress_copy").to_string(),
        TransferOperation::Move => t!("transfer.progress_move").to_string(),
    });
    progress_bar
}
