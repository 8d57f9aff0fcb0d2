use env_logger::Env;

/// 預設只輸出 warn 以上，避免干擾互動介面；可用 `RUST_LOG` 覆寫
pub fn init() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp_secs()
        .init();
}
