//! Console-backed `log` backend.
//!
//! Records are written as `[LEVEL] message` lines. Output is not locked:
//! a task preempted mid-line simply interleaves with the next writer.

use core::fmt::{self, Write};

use log::{LevelFilter, Log, Metadata, Record};

use crate::config::LOG_LEVEL;
use crate::console::Console;
use crate::error::KernelError;

struct KernelLogger {
    level: LevelFilter,
}

static LOGGER: KernelLogger = KernelLogger { level: LOG_LEVEL };

impl Log for KernelLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // The console cannot fail.
        let _ = write_record(&mut Console, record);
    }

    fn flush(&self) {}
}

/// Render one record as a console line.
fn write_record<W: Write>(out: &mut W, record: &Record) -> fmt::Result {
    writeln!(out, "[{:<5}] {}", record.level(), record.args())
}

/// Install the console logger at `config::LOG_LEVEL`.
pub fn init() -> Result<(), KernelError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(LOGGER.level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    #[test]
    fn test_line_format() {
        let mut line = String::new();
        write_record(
            &mut line,
            &Record::builder()
                .level(Level::Info)
                .args(format_args!("task {} stack: {}", 0, 4096))
                .build(),
        )
        .unwrap();
        assert_eq!(line, "[INFO ] task 0 stack: 4096\n");

        line.clear();
        write_record(
            &mut line,
            &Record::builder().level(Level::Error).args(format_args!("2147483648 <-")).build(),
        )
        .unwrap();
        assert_eq!(line, "[ERROR] 2147483648 <-\n");
    }

    #[test]
    fn test_level_filter() {
        let logger = KernelLogger { level: LevelFilter::Info };
        let at = |level: Level| Metadata::builder().level(level).build();

        assert!(logger.enabled(&at(Level::Error)));
        assert!(logger.enabled(&at(Level::Info)));
        assert!(!logger.enabled(&at(Level::Debug)));
        assert!(!logger.enabled(&at(Level::Trace)));

        let quiet = KernelLogger { level: LevelFilter::Off };
        assert!(!quiet.enabled(&at(Level::Error)));
    }
}
