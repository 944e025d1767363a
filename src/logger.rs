//! Console logger for the `log` facade.

use std::{sync::OnceLock, time::Instant};

use log::{max_level, set_logger, set_max_level, LevelFilter, Log, Metadata, Record, SetLoggerError};

const ESCAPES: [Option<&str>; 6] = [
    None,             // Default foreground
    Some("\x1B[31m"), // Error (red)
    Some("\x1B[33m"), // Warn (yellow)
    Some("\x1B[34m"), // Info (blue)
    Some("\x1B[36m"), // Debug (cyan)
    Some("\x1B[37m"), // Trace (white)
];

/// Writes colored, timestamped records to stderr. Timestamps are
/// `mm:ss:millis` since [`ConsoleLogger::init`].
pub struct ConsoleLogger {
    start: OnceLock<Instant>,
}

impl ConsoleLogger {
    pub const fn new() -> Self {
        Self {
            start: OnceLock::new(),
        }
    }

    pub fn init(&'static self, level: LevelFilter) -> Result<(), SetLoggerError> {
        self.start.get_or_init(Instant::now);
        set_logger(self)?;
        set_max_level(level);

        Ok(())
    }

    fn format(&self, record: &Record<'_>) -> String {
        let elapsed = self.start.get_or_init(Instant::now).elapsed();
        let mins = elapsed.as_secs() / 60;
        let submin_secs = elapsed.as_secs() % 60;

        format!(
            "{:02}:{:02}:{:03} {}[{}]\x1B[0m {}",
            mins,
            submin_secs,
            elapsed.subsec_millis(),
            ESCAPES[record.level() as usize].unwrap_or_default(),
            record.level(),
            record.args()
        )
    }
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("{}", self.format(record));
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use log::Level;

    use super::*;

    #[test]
    fn formats_level_and_message() {
        let logger = ConsoleLogger::new();
        let line = logger.format(
            &Record::builder()
                .args(format_args!("resampled {} particles", 100))
                .level(Level::Warn)
                .build(),
        );
        assert!(line.starts_with("00:00:"));
        assert!(line.contains("\x1B[33m[WARN]\x1B[0m"));
        assert!(line.ends_with("resampled 100 particles"));
    }
}
