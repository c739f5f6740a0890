// ============================================================================
// vidfit-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: env_logger backend for the `log` facade
//
// Console output from vidfit-core goes through `log` macros. Info-level
// records are printed bare so the terminal helpers control their own layout;
// other levels get a colored level tag.
//
// USAGE:
// - default: info
// - --verbose: debug (includes the full ffmpeg command lines)
// - RUST_LOG overrides both, e.g. RUST_LOG=vidfit_core=trace

use log::{Level, LevelFilter};
use owo_colors::OwoColorize;
use std::io::Write;

/// Level used when RUST_LOG is not set.
pub fn default_level(verbose: bool) -> LevelFilter {
    if verbose { LevelFilter::Debug } else { LevelFilter::Info }
}

/// Installs the global logger. Safe to call more than once; later calls are ignored.
pub fn init(verbose: bool) {
    let color = std::env::var_os("NO_COLOR").is_none();

    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(default_level(verbose))
        .format(move |buf, record| {
            if record.level() == Level::Info {
                return writeln!(buf, "{}", record.args());
            }
            let tag = match record.level() {
                Level::Error => "ERROR",
                Level::Warn => "WARN ",
                Level::Debug => "DEBUG",
                Level::Trace => "TRACE",
                Level::Info => "INFO ",
            };
            let tag = if color {
                match record.level() {
                    Level::Error => tag.bright_red().to_string(),
                    Level::Warn => tag.yellow().to_string(),
                    Level::Debug => tag.blue().to_string(),
                    _ => tag.magenta().to_string(),
                }
            } else {
                tag.to_string()
            };
            writeln!(buf, "{} {}", tag, record.args())
        });

    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }

    if builder.try_init().is_ok() {
        log::debug!("Logger initialized with level: {}", default_level(verbose));
    }
}
