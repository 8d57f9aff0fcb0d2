use crate::component::FilteredTransfer;
use crate::config::Config;
use crate::pause;
use crate::tools::TransferOperation;
use anyhow::Result;
use console::{Term, style};
use rust_i18n::t;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

fn report_error(e: &anyhow::Error) {
    eprintln!("{} {:#}", style(t!("common.error_prefix")).red().bold(), e);
}

pub fn run_filtered_transfer(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
    operation: TransferOperation,
) -> Result<()> {
    let mut transfer = FilteredTransfer::new(config, Arc::clone(shutdown_signal));

    if let Err(e) = transfer.run(operation) {
        report_error(&e);
    }

    pause(term)?;
    Ok(())
}

pub fn run_list_videos(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<()> {
    let mut transfer = FilteredTransfer::new(config, Arc::clone(shutdown_signal));

    if let Err(e) = transfer.list() {
        report_error(&e);
    }

    pause(term)?;
    Ok(())
}
