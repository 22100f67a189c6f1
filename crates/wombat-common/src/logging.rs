//! `env_logger` setup shared by the CLI and the test suites.

use log::LevelFilter;

/// Initialize logging for a binary.
///
/// `verbosity` counts `-v` flags: 0 shows warnings, 1 adds debug output
/// (parse errors as they are recorded), 2 or more adds trace output
/// (insertion mode transitions, tokenizer state switches). `RUST_LOG`
/// still overrides per-target filters.
pub fn init(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .try_init();
}

/// Initialize logging for tests.
///
/// Safe to call from every test; only the first call installs the logger.
/// Output is captured by the test harness and filtered by `RUST_LOG`.
pub fn init_for_tests() {
    let _ = env_logger::builder().is_test(true).try_init();
}
