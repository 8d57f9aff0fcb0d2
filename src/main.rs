use anyhow::Result;
use console::{Term, style};
use log::{info, warn};
use video_duration_filter::config::Config;
use video_duration_filter::init;
use video_duration_filter::menu::{print_goodbye, show_main_menu};
use video_duration_filter::signal::setup_shutdown_signal;

fn main() -> Result<()> {
    init::init();
    let term = Term::stdout();
    let shutdown_signal = setup_shutdown_signal();

    let mut config = Config::new()?;
    rust_i18n::set_locale(config.settings.language.as_str());

    loop {
        match show_main_menu(&term, &shutdown_signal, &mut config) {
            Ok(true) => {}
            Ok(false) => {
                print_goodbye(&term)?;
                info!("Program exited normally");
                break;
            }
            Err(e) => {
                warn!("Program error: {e:#}");
                eprintln!("{} {:#}", style("Error:").red().bold(), e);
                break;
            }
        }
    }

    Ok(())
}
