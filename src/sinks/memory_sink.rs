use super::{Sink, SinkState};
use crate::util::lock;
use crate::{Formatter, Level};
use std::io;
use std::sync::Mutex;

/// Keeps all log lines in memory.
///
/// Useful in tests, and for showing the most recent log output in an application.
#[derive(Debug, Default)]
pub struct MemorySink {
    state: SinkState,
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    /// An empty sink that lets all levels pass.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for the threshold.
    #[must_use]
    pub fn with_level(self, level: Level) -> Self {
        self.state.set_level(level);
        self
    }

    /// Builder-style setter for the formatter.
    #[must_use]
    pub fn with_formatter(self, formatter: Formatter) -> Self {
        self.state.set_formatter(formatter);
        self
    }

    /// A copy of the lines written so far.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        lock(&self.lines).clone()
    }

    /// All lines, each terminated with a line break.
    #[must_use]
    pub fn contents(&self) -> String {
        lock(&self.lines).iter().fold(String::new(), |mut s, line| {
            s.push_str(line);
            s.push('\n');
            s
        })
    }

    /// Number of lines written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.lines).len()
    }

    /// `true` if nothing was written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock(&self.lines).is_empty()
    }

    /// Forgets all lines.
    pub fn clear(&self) {
        lock(&self.lines).clear();
    }
}

impl Sink for MemorySink {
    fn level(&self) -> Level {
        self.state.level()
    }
    fn set_level(&self, level: Level) {
        self.state.set_level(level);
    }
    fn formatter(&self) -> Formatter {
        self.state.formatter()
    }
    fn set_formatter(&self, formatter: Formatter) {
        self.state.set_formatter(formatter);
    }

    fn write(&self, line: &str) -> io::Result<()> {
        lock(&self.lines).push(line.to_string());
        Ok(())
    }

    fn validate_logs(&self, expected: &[(&'static str, &'static str, &'static str)]) {
        validate_lines(&self.lines(), expected, "memory sink");
    }
}

pub(super) fn validate_lines(
    lines: &[String],
    expected: &[(&'static str, &'static str, &'static str)],
    origin: &str,
) {
    for (i, tuple) in expected.iter().enumerate() {
        let line = lines
            .get(i)
            .unwrap_or_else(|| panic!("Found only {i} log lines in {origin}, expected more"));
        assert!(
            line.contains(tuple.0),
            "Did not find tuple.0 = {} in line {line:?} of {origin}",
            tuple.0,
        );
        assert!(
            line.contains(tuple.1),
            "Did not find tuple.1 = {} in line {line:?} of {origin}",
            tuple.1,
        );
        assert!(
            line.contains(tuple.2),
            "Did not find tuple.2 = {} in line {line:?} of {origin}",
            tuple.2,
        );
    }
    if let Some(line) = lines.get(expected.len()) {
        panic!("Found more log lines than expected in {origin}: {line}");
    }
}

#[cfg(test)]
mod test {
    use super::MemorySink;
    use crate::sinks::Sink;
    use crate::{Level, Record};

    #[test]
    fn test_memory_sink() {
        let sink = MemorySink::new().with_level(Level::Warning);
        sink.emit(&Record::new("a", Level::Info, "quiet")).unwrap();
        sink.emit(&Record::new("a", Level::Warning, "loud")).unwrap();
        sink.write("raw").unwrap();

        assert_eq!(sink.len(), 2);
        assert!(sink.contents().ends_with("loud\nraw\n"));
        sink.validate_logs(&[("[a]", "[WARNING]", "loud"), ("raw", "raw", "raw")]);

        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    #[should_panic(expected = "Found more log lines than expected")]
    fn test_validate_logs_detects_surplus_lines() {
        let sink = MemorySink::new();
        sink.write("one").unwrap();
        sink.write("two").unwrap();
        sink.validate_logs(&[("one", "", "")]);
    }
}
