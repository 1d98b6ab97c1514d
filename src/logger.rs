use chrono::{SecondsFormat, Utc};
use log::{Level, Log, Metadata, Record, SetLoggerError};
use std::io::Write;

/// Writes `<timestamp> <LEVEL> <target>: <message>` lines to stderr so that
/// stdout only carries results.
struct StderrLogger {
    level: Level,
}

impl StderrLogger {
    fn format(record: &Record) -> String {
        format!(
            "{} {:<5} {}: {}",
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            record.level(),
            record.target(),
            record.args()
        )
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let _ = writeln!(std::io::stderr().lock(), "{}", Self::format(record));
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

pub fn init_logger(level: Level) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(StderrLogger { level }))?;
    log::set_max_level(level.to_level_filter());
    Ok(())
}
