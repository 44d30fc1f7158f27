use chrono::Local;
use log::{Level, LevelFilter, Metadata, Record};
use std::io::Write;

/// Stderr logger with local timestamps
pub struct CliLogger {
    level: LevelFilter,
}

impl CliLogger {
    /// Warnings by default; each `-v` raises the level one step
    pub fn new(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        Self { level }
    }

    pub fn init(self) -> Result<(), log::SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }
}

impl log::Log for CliLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let timestamp = Local::now().format("%H:%M:%S%.3f");
        let target = if record.level() <= Level::Info {
            ""
        } else {
            record.target()
        };

        let mut stderr = std::io::stderr().lock();
        let _ = if target.is_empty() {
            writeln!(stderr, "{} {:<5} {}", timestamp, record.level(), record.args())
        } else {
            writeln!(
                stderr,
                "{} {:<5} [{}] {}",
                timestamp,
                record.level(),
                target,
                record.args()
            )
        };
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;

    #[test]
    fn test_verbosity_levels() {
        let quiet = CliLogger::new(0);
        let meta = Metadata::builder().level(Level::Info).build();
        assert!(!quiet.enabled(&meta));

        let verbose = CliLogger::new(1);
        assert!(verbose.enabled(&meta));

        let debug = Metadata::builder().level(Level::Debug).build();
        assert!(!verbose.enabled(&debug));
        assert!(CliLogger::new(5).enabled(&debug));
    }
}
