/// Coloured stderr logger for the `log` facade
use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::io::stderr;

/// Environment variable overriding the log level (`error` .. `trace`)
pub const LOG_ENV: &str = "TRIMETRIC_LOG";

struct TerminalLogger;

static LOGGER: TerminalLogger = TerminalLogger;

impl Log for TerminalLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let color = match record.level() {
            Level::Error => Color::Red,
            Level::Warn => Color::Yellow,
            Level::Info => Color::Green,
            Level::Debug | Level::Trace => Color::DarkGrey,
        };

        // A broken stderr has nowhere left to report to.
        let _ = execute!(
            stderr(),
            SetForegroundColor(color),
            Print(format!("[{:<5}] ", record.level())),
            ResetColor,
            Print(format!("{}\n", record.args()))
        );
    }

    fn flush(&self) {}
}

/// Level from `TRIMETRIC_LOG`, else `Debug` when verbose, else `Info`
pub fn level_from_env(verbose: bool) -> LevelFilter {
    std::env::var(LOG_ENV)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
}

/// Install the logger; later calls only adjust the level
pub fn init(level: LevelFilter) {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}
