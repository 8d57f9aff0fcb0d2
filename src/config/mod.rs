pub mod load;
pub mod save;
pub mod types;

pub use types::{
    Config, DurationRangeSettings, LEGACY_MAX_DURATION_SECONDS, Language, MAX_RECENT_PATHS,
    UserSettings,
};
