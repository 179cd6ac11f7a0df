// ============================================================================
// splice-cli/src/logging.rs
// ============================================================================
//
// LOGGING UTILITIES: Logger Setup and Helper Functions
//
// The CLI uses the standard `log` crate with `env_logger` as the backend.
// RUST_LOG is respected when set:
// - RUST_LOG=info (default): lifecycle messages
// - RUST_LOG=debug (or --verbose): compiled graphs and command lines
// - RUST_LOG=trace: every ffmpeg diagnostic line

use log::LevelFilter;

/// Initializes `env_logger`; `verbose` raises the default level to debug.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(default_level).format_timestamp(None);
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }
    // A logger may already be installed (tests); that is fine.
    let _ = builder.try_init();
}

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}
