use crate::util::{read, write};
use crate::{Formatter, Level, Record};
use std::io;
use std::sync::RwLock;

/// Writes formatted log lines to a single output.
///
/// A sink has its own threshold and its own [`Formatter`]; both are replaced by the
/// process configuration whenever it propagates changes onto the loggers the sink is
/// attached to.
///
/// Implementations usually embed a [`SinkState`] and delegate the level and formatter
/// accessors to it.
pub trait Sink: Send + Sync {
    /// The threshold of the sink.
    fn level(&self) -> Level;

    /// Changes the threshold of the sink.
    fn set_level(&self, level: Level);

    /// The formatter of the sink.
    fn formatter(&self) -> Formatter;

    /// Replaces the formatter of the sink.
    fn set_formatter(&self, formatter: Formatter);

    /// Writes out a single formatted log line; `line` has no line break.
    ///
    /// # Errors
    ///
    /// `std::io::Error` if the line cannot be written.
    fn write(&self, line: &str) -> io::Result<()>;

    /// Flushes any buffered lines.
    ///
    /// # Errors
    ///
    /// `std::io::Error` if flushing fails.
    fn flush(&self) -> io::Result<()> {
        Ok(())
    }

    /// Releases the resources of the sink. Sinks may refuse to write after being closed.
    fn close(&self) {}

    /// Formats the record with the sink's formatter and writes it,
    /// if its level reaches the sink's threshold.
    ///
    /// # Errors
    ///
    /// `std::io::Error` if the line cannot be written.
    fn emit(&self, record: &Record) -> io::Result<()> {
        if record.level() < self.level() {
            return Ok(());
        }
        self.write(&self.formatter().format(record))
    }

    /// Takes a vec with three patterns per line that represent the log output,
    /// compares the written log with the expected lines,
    /// and asserts that both are in sync.
    ///
    /// This function is not meant for productive code, only for tests.
    #[doc(hidden)]
    fn validate_logs(&self, _expected: &[(&'static str, &'static str, &'static str)]) {
        unimplemented!("only useful for tests");
    }
}

/// Threshold and formatter of a sink, shareable across threads.
#[derive(Debug)]
pub struct SinkState {
    level: RwLock<Level>,
    formatter: RwLock<Formatter>,
}

impl SinkState {
    /// State with the given threshold and formatter.
    #[must_use]
    pub fn new(level: Level, formatter: Formatter) -> Self {
        Self {
            level: RwLock::new(level),
            formatter: RwLock::new(formatter),
        }
    }

    /// The threshold.
    #[must_use]
    pub fn level(&self) -> Level {
        *read(&self.level)
    }

    /// Changes the threshold.
    pub fn set_level(&self, level: Level) {
        *write(&self.level) = level;
    }

    /// The formatter.
    #[must_use]
    pub fn formatter(&self) -> Formatter {
        read(&self.formatter).clone()
    }

    /// Replaces the formatter.
    pub fn set_formatter(&self, formatter: Formatter) {
        *write(&self.formatter) = formatter;
    }
}

impl Default for SinkState {
    /// Lets everything pass, and uses the default formatter.
    fn default() -> Self {
        Self::new(Level::Debug, Formatter::default())
    }
}
