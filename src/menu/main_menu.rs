use crate::config::save::save_settings;
use crate::config::types::{Config, Language};
use crate::menu::handlers::{run_filtered_transfer, run_list_videos};
use crate::tools::{TransferOperation, parse_duration_range};
use anyhow::Result;
use console::{Term, style};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use rust_i18n::t;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

pub fn show_main_menu(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<bool> {
    term.clear_screen()?;

    println!("{}", style(t!("main_menu.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());

    let options = vec![
        t!("main_menu.opt_copy"),
        t!("main_menu.opt_move"),
        t!("main_menu.opt_list"),
        t!("main_menu.opt_settings"),
        t!("main_menu.exit"),
    ];

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("main_menu.prompt"))
        .items(&options)
        .default(0)
        .interact_on_opt(term)?;

    match selection {
        Some(0) => {
            run_filtered_transfer(term, shutdown_signal, config, TransferOperation::Copy)?;
            Ok(true)
        }
        Some(1) => {
            run_filtered_transfer(term, shutdown_signal, config, TransferOperation::Move)?;
            Ok(true)
        }
        Some(2) => {
            run_list_videos(term, shutdown_signal, config)?;
            Ok(true)
        }
        Some(3) => {
            show_settings_menu(term, config)?;
            Ok(true)
        }
        Some(4) | None => Ok(false),
        _ => unreachable!(),
    }
}

pub fn print_goodbye(term: &Term) -> Result<()> {
    term.clear_screen()?;
    println!("\n{}", style(t!("main_menu.goodbye")).green().bold());
    Ok(())
}

/// 設定選單
fn show_settings_menu(term: &Term, config: &mut Config) -> Result<()> {
    loop {
        term.clear_screen()?;

        println!("{}", style(t!("settings.title")).cyan().bold());
        println!("{}", style(t!("common.esc_hint")).dim());

        let options = vec![
            t!("settings.opt_range"),
            t!("settings.opt_unreadable"),
            t!("settings.opt_language"),
            t!("settings.back"),
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("settings.prompt"))
            .items(&options)
            .default(0)
            .interact_on_opt(term)?;

        match selection {
            Some(0) => show_range_settings(term, config)?,
            Some(1) => show_unreadable_settings(term, config)?,
            Some(2) => show_language_menu(term, config)?,
            Some(3) | None => break,
            _ => unreachable!(),
        }
    }

    Ok(())
}

fn confirm_saved(value: impl std::fmt::Display) {
    println!("\n{} {}", style(t!("settings.saved")).green(), value);
    std::thread::sleep(std::time::Duration::from_secs(1));
}

/// 預設時長範圍
fn show_range_settings(term: &Term, config: &mut Config) -> Result<()> {
    term.clear_screen()?;

    println!("{}", style(t!("settings.range.title")).cyan().bold());
    println!(
        "\n{} {}",
        style(t!("settings.current")).dim(),
        config.settings.default_range
    );
    println!();

    let input: String = Input::new()
        .with_prompt(t!("transfer.range_input"))
        .allow_empty(true)
        .interact_text_on(term)?;

    if input.trim().is_empty() {
        return Ok(());
    }

    let range = match parse_duration_range(&input) {
        Ok(range) => range,
        Err(e) => {
            println!(
                "{}",
                style(t!("transfer.range_invalid", error = e.to_string())).red()
            );
            std::thread::sleep(std::time::Duration::from_secs(1));
            return Ok(());
        }
    };

    if range != config.settings.default_range {
        config.settings.default_range = range;
        save_settings(&config.settings)?;
        confirm_saved(range);
    }

    Ok(())
}

/// 無法讀取時長的影片處理方式
fn show_unreadable_settings(term: &Term, config: &mut Config) -> Result<()> {
    term.clear_screen()?;

    println!("{}", style(t!("settings.unreadable.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());

    let choices = [false, true];
    let items: Vec<String> = vec![
        t!("settings.unreadable.exclude").to_string(),
        t!("settings.unreadable.include").to_string(),
    ];

    let default_index = usize::from(config.settings.include_unreadable);

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("settings.unreadable.prompt"))
        .items(&items)
        .default(default_index)
        .interact_on_opt(term)?;

    let Some(selection) = selection else {
        return Ok(());
    };

    let include = choices[selection];
    if include != config.settings.include_unreadable {
        config.settings.include_unreadable = include;
        save_settings(&config.settings)?;
        confirm_saved(&items[selection]);
    }

    Ok(())
}

/// 語言設定選單
fn show_language_menu(term: &Term, config: &mut Config) -> Result<()> {
    term.clear_screen()?;

    println!("{}", style(t!("settings.language.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());

    let languages = [Language::EnUs, Language::ZhCn];

    let items: Vec<String> = languages.iter().map(ToString::to_string).collect();

    let default_index = languages
        .iter()
        .position(|&l| l == config.settings.language)
        .unwrap_or(0);

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("settings.language.prompt"))
        .items(&items)
        .default(default_index)
        .interact_on_opt(term)?;

    let Some(selection) = selection else {
        return Ok(());
    };

    let selected_lang = languages[selection];

    if selected_lang != config.settings.language {
        config.settings.language = selected_lang;
        rust_i18n::set_locale(selected_lang.as_str());
        save_settings(&config.settings)?;
        confirm_saved(selected_lang);
    }

    Ok(())
}
