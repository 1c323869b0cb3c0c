use super::std_stream::StdStream;
use super::{Sink, SinkState};
use crate::util::lock;
use crate::{Formatter, Level};
use std::io::{self, Write};
use std::sync::Mutex;

/// Writes log lines to `stdout`, `stderr`, or to an arbitrary writer.
///
/// This is the sink the library creates itself when a logger needs one and no other
/// sink is configured.
pub struct StreamSink {
    state: SinkState,
    target: Target,
}

enum Target {
    Std(StdStream),
    Writer(Mutex<Box<dyn Write + Send>>),
}

impl StreamSink {
    /// Sink that writes to `stdout`.
    #[must_use]
    pub fn stdout() -> Self {
        Self::with_target(Target::Std(StdStream::Out(io::stdout())))
    }

    /// Sink that writes to `stderr`.
    #[must_use]
    pub fn stderr() -> Self {
        Self::with_target(Target::Std(StdStream::Err(io::stderr())))
    }

    /// Sink that writes to the given writer.
    #[must_use]
    pub fn with_writer(writer: Box<dyn Write + Send>) -> Self {
        Self::with_target(Target::Writer(Mutex::new(writer)))
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

    fn with_target(target: Target) -> Self {
        Self {
            state: SinkState::default(),
            target,
        }
    }
}

impl Sink for StreamSink {
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
        let mut buffer = String::with_capacity(line.len() + 1);
        buffer.push_str(line);
        buffer.push('\n');
        match &self.target {
            Target::Std(stream) => stream.lock().write_all(buffer.as_bytes()),
            Target::Writer(writer) => lock(writer).write_all(buffer.as_bytes()),
        }
    }

    fn flush(&self) -> io::Result<()> {
        match &self.target {
            Target::Std(stream) => stream.lock().flush(),
            Target::Writer(writer) => lock(writer).flush(),
        }
    }

    fn close(&self) {
        self.flush().ok();
    }
}

impl std::fmt::Debug for StreamSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let target = match &self.target {
            Target::Std(stream) => stream.name(),
            Target::Writer(_) => "writer",
        };
        f.debug_struct("StreamSink")
            .field("target", &target)
            .field("level", &self.state.level())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::StreamSink;
    use crate::sinks::Sink;
    use crate::{Formatter, Level, Record};
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);
    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_stream_sink_with_writer() {
        let buf = SharedBuf::default();
        let sink = StreamSink::with_writer(Box::new(buf.clone()))
            .with_level(Level::Info)
            .with_formatter(Formatter::Function(crate::default_format));

        sink.emit(&Record::new("svc", Level::Debug, "dropped")).unwrap();
        sink.emit(&Record::new("svc", Level::Error, "kept")).unwrap();
        sink.close();

        let written = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert_eq!(written, "ERROR [svc] kept\n");
        assert_eq!(sink.level(), Level::Info);
        assert!(format!("{sink:?}").contains("writer"));
    }

    #[test]
    fn test_stream_sink_defaults() {
        let sink = StreamSink::stderr();
        assert_eq!(sink.level(), Level::Debug);
        assert!(sink.formatter().is_extra_fields_aware());
        assert!(format!("{sink:?}").contains("stderr"));
    }
}
