//! 終端機介面
//!
//! 提供選擇資料夾、顯示訊息與格式化時長三項能力

use crate::tools::format_duration;
use anyhow::Result;
use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use rust_i18n::t;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

pub trait UserInterface {
    /// 使用者取消時回傳 `None`
    fn select_directory(&self, prompt: &str) -> Result<Option<PathBuf>>;
    fn show_message(&self, title: &str, text: &str, severity: Severity);
    fn format_duration(&self, seconds: f64) -> String {
        format_duration(seconds)
    }
}

pub struct TerminalUi {
    recent_paths: Vec<String>,
}

impl TerminalUi {
    #[must_use]
    pub const fn new(recent_paths: Vec<String>) -> Self {
        Self { recent_paths }
    }

    fn prompt_new_path(prompt: &str) -> Result<Option<PathBuf>> {
        let path: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        let path = path.trim();
        if path.is_empty() {
            return Ok(None);
        }
        Ok(Some(PathBuf::from(path)))
    }
}

impl UserInterface for TerminalUi {
    fn select_directory(&self, prompt: &str) -> Result<Option<PathBuf>> {
        println!("{}", style(prompt).cyan());

        if self.recent_paths.is_empty() {
            return Self::prompt_new_path(&t!("transfer.enter_path"));
        }

        let mut options: Vec<String> = self
            .recent_paths
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let indicator = if Path::new(p).is_dir() { "✓" } else { "✗" };
                format!("{} [{}] {}", i + 1, indicator, p)
            })
            .collect();
        options.push(t!("transfer.input_new_path").to_string());

        println!("{}", style(t!("common.esc_hint")).dim());

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .items(&options)
            .default(0)
            .interact_opt()?;

        match selection {
            None => Ok(None),
            Some(idx) if idx < self.recent_paths.len() => {
                Ok(Some(PathBuf::from(&self.recent_paths[idx])))
            }
            Some(_) => Self::prompt_new_path(&t!("transfer.enter_path")),
        }
    }

    fn show_message(&self, title: &str, text: &str, severity: Severity) {
        let title = format!("[{title}]");
        match severity {
            Severity::Info => println!("{} {}", style(title).green().bold(), text),
            Severity::Warning => println!("{} {}", style(title).yellow().bold(), text),
            Severity::Error => eprintln!("{} {}", style(title).red().bold(), text),
        }
    }
}
