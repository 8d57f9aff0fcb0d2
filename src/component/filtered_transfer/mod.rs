//! 依時長篩選影片並複製或移動
//!
//! 掃描資料夾中的影片、依 `(min, max]` 時長範圍篩選，再批次複製或移動到目的資料夾

mod main;
mod processor;
mod terminal_ui;

pub use main::FilteredTransfer;
pub use processor::{PreconditionError, VideoFileProcessor};
pub use terminal_ui::{Severity, TerminalUi, UserInterface};
