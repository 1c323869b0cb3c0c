use crate::sinks::{same_sink, SharedSink};
use crate::util::{eprint_err, read, write, ErrorCode};
use crate::{ExtraFields, Level, Record};
use std::panic::Location;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

/// A named logger.
///
/// Loggers are obtained from the [`LoggerFactory`](crate::LoggerFactory) and shared as
/// `Arc<Logger>`. They are never replaced, only mutated in place: a handle that was obtained
/// once stays valid and reflects all later configuration changes.
///
/// A record passes a logger if its level reaches the logger's level; it is then handed to
/// every sink of the logger, and each sink applies its own threshold.
/// With `propagate` switched on, the record is additionally handed to the sinks of the
/// root logger. Loggers handed out by the factory never propagate.
///
/// ```rust
/// # let context = ds_common_logger::LoggingContext::new();
/// let logger = context.get_logger("billing", None);
/// logger.info("invoice sent");
/// logger.warning_with(
///     "payment overdue",
///     ds_common_logger::extra! { "invoice" => "R-1032", "days" => 14 },
/// );
/// ```
pub struct Logger {
    name: String,
    level: RwLock<Option<Level>>,
    propagate: AtomicBool,
    sinks: RwLock<Vec<SharedSink>>,
    root: Option<Arc<Logger>>,
}

impl Logger {
    pub(crate) fn new_root() -> Self {
        Self {
            name: "root".to_string(),
            level: RwLock::new(None),
            propagate: AtomicBool::new(false),
            sinks: RwLock::new(Vec::new()),
            root: None,
        }
    }

    pub(crate) fn new_child(name: &str, root: Arc<Logger>) -> Self {
        Self {
            name: name.to_string(),
            level: RwLock::new(None),
            propagate: AtomicBool::new(true),
            sinks: RwLock::new(Vec::new()),
            root: Some(root),
        }
    }

    /// The name of the logger.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The level of the logger; `None` means not set, then everything passes.
    #[must_use]
    pub fn level(&self) -> Option<Level> {
        *read(&self.level)
    }

    /// Changes the level of the logger; the sinks keep their own thresholds.
    pub fn set_level(&self, level: Option<Level>) {
        *write(&self.level) = level;
    }

    /// Sets the level of the logger and of all its sinks.
    pub fn set_level_and_sinks(&self, level: Level) {
        self.set_level(Some(level));
        for sink in self.sinks() {
            sink.set_level(level);
        }
    }

    /// `true` if records are also handed to the root logger's sinks.
    #[must_use]
    pub fn propagate(&self) -> bool {
        self.propagate.load(Ordering::Relaxed)
    }

    /// Switches forwarding to the root logger's sinks on or off.
    pub fn set_propagate(&self, propagate: bool) {
        self.propagate.store(propagate, Ordering::Relaxed);
    }

    /// `true` if a record of the given level would pass the logger's level.
    #[must_use]
    pub fn is_enabled_for(&self, level: Level) -> bool {
        self.level().is_none_or(|threshold| level >= threshold)
    }

    /// A snapshot of the attached sinks.
    #[must_use]
    pub fn sinks(&self) -> Vec<SharedSink> {
        read(&self.sinks).clone()
    }

    /// Number of attached sinks.
    #[must_use]
    pub fn sink_count(&self) -> usize {
        read(&self.sinks).len()
    }

    /// `true` if exactly this sink is attached.
    #[must_use]
    pub fn has_sink(&self, sink: &SharedSink) -> bool {
        read(&self.sinks).iter().any(|s| same_sink(s, sink))
    }

    /// How often this sink is attached; never more than once.
    #[must_use]
    pub fn attach_count(&self, sink: &SharedSink) -> usize {
        read(&self.sinks).iter().filter(|s| same_sink(s, sink)).count()
    }

    /// Attaches the sink, unless it is already attached. Returns `true` if it was attached.
    pub fn add_sink(&self, sink: SharedSink) -> bool {
        let mut sinks = write(&self.sinks);
        if sinks.iter().any(|s| same_sink(s, &sink)) {
            false
        } else {
            sinks.push(sink);
            true
        }
    }

    /// Detaches the sink. Returns `true` if it was attached.
    pub fn remove_sink(&self, sink: &SharedSink) -> bool {
        let mut sinks = write(&self.sinks);
        let count = sinks.len();
        sinks.retain(|s| !same_sink(s, sink));
        sinks.len() != count
    }

    /// Detaches all sinks and returns them.
    pub fn clear_sinks(&self) -> Vec<SharedSink> {
        std::mem::take(&mut *write(&self.sinks))
    }

    /// Flushes all attached sinks.
    pub fn flush(&self) {
        for sink in self.sinks() {
            sink.flush()
                .unwrap_or_else(|e| eprint_err(ErrorCode::Flush, "flushing sink failed", &e));
        }
    }

    /// Logs a message with level `DEBUG`.
    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.log_at(Location::caller(), Level::Debug, message.into(), ExtraFields::new());
    }

    /// Logs a message with level `INFO`.
    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.log_at(Location::caller(), Level::Info, message.into(), ExtraFields::new());
    }

    /// Logs a message with level `WARNING`.
    #[track_caller]
    pub fn warning(&self, message: impl Into<String>) {
        self.log_at(Location::caller(), Level::Warning, message.into(), ExtraFields::new());
    }

    /// Logs a message with level `ERROR`.
    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.log_at(Location::caller(), Level::Error, message.into(), ExtraFields::new());
    }

    /// Logs a message with level `CRITICAL`.
    #[track_caller]
    pub fn critical(&self, message: impl Into<String>) {
        self.log_at(Location::caller(), Level::Critical, message.into(), ExtraFields::new());
    }

    /// Logs a message with level `DEBUG` and extra fields.
    #[track_caller]
    pub fn debug_with(&self, message: impl Into<String>, extra: ExtraFields) {
        self.log_at(Location::caller(), Level::Debug, message.into(), extra);
    }

    /// Logs a message with level `INFO` and extra fields.
    #[track_caller]
    pub fn info_with(&self, message: impl Into<String>, extra: ExtraFields) {
        self.log_at(Location::caller(), Level::Info, message.into(), extra);
    }

    /// Logs a message with level `WARNING` and extra fields.
    #[track_caller]
    pub fn warning_with(&self, message: impl Into<String>, extra: ExtraFields) {
        self.log_at(Location::caller(), Level::Warning, message.into(), extra);
    }

    /// Logs a message with level `ERROR` and extra fields.
    #[track_caller]
    pub fn error_with(&self, message: impl Into<String>, extra: ExtraFields) {
        self.log_at(Location::caller(), Level::Error, message.into(), extra);
    }

    /// Logs a message with level `CRITICAL` and extra fields.
    #[track_caller]
    pub fn critical_with(&self, message: impl Into<String>, extra: ExtraFields) {
        self.log_at(Location::caller(), Level::Critical, message.into(), extra);
    }

    /// Logs a message with the given level.
    #[track_caller]
    pub fn log(&self, level: Level, message: impl Into<String>) {
        self.log_at(Location::caller(), level, message.into(), ExtraFields::new());
    }

    /// Logs a message with the given level and extra fields.
    #[track_caller]
    pub fn log_with(&self, level: Level, message: impl Into<String>, extra: ExtraFields) {
        self.log_at(Location::caller(), level, message.into(), extra);
    }

    fn log_at(
        &self,
        location: &'static Location<'static>,
        level: Level,
        message: String,
        extra: ExtraFields,
    ) {
        if !self.is_enabled_for(level) {
            return;
        }
        let record = Record::new(self.name.clone(), level, message)
            .with_location(location.file(), location.line())
            .with_extra(extra);
        self.dispatch(&record);
    }

    /// Hands an explicitly built record to the sinks, if it passes the logger's level.
    ///
    /// The record keeps its logger name, even if it differs from this logger's name.
    pub fn log_record(&self, record: &Record) {
        if self.is_enabled_for(record.level()) {
            self.dispatch(record);
        }
    }

    fn dispatch(&self, record: &Record) {
        for sink in self.sinks() {
            sink.emit(record)
                .unwrap_or_else(|e| eprint_err(ErrorCode::Write, "writing log line to sink failed", &e));
        }
        if self.propagate() {
            if let Some(root) = &self.root {
                root.dispatch(record);
            }
        }
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level())
            .field("propagate", &self.propagate())
            .field("sinks", &self.sink_count())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::Logger;
    use crate::sinks::{MemorySink, SharedSink, Sink};
    use crate::{Formatter, Level, Record};
    use std::sync::Arc;

    fn memory() -> (Arc<MemorySink>, SharedSink) {
        let sink = Arc::new(
            MemorySink::new().with_formatter(Formatter::Function(crate::default_format)),
        );
        let shared: SharedSink = sink.clone();
        (sink, shared)
    }

    #[test]
    fn test_sink_identity() {
        let root = Arc::new(Logger::new_root());
        let logger = Logger::new_child("svc", root);
        let (_, a) = memory();
        let (_, b) = memory();

        assert!(logger.add_sink(a.clone()));
        assert!(!logger.add_sink(a.clone()));
        assert!(logger.add_sink(b.clone()));
        assert_eq!(logger.attach_count(&a), 1);
        assert_eq!(logger.sink_count(), 2);

        assert!(logger.remove_sink(&a));
        assert!(!logger.remove_sink(&a));
        assert!(!logger.has_sink(&a));
        assert!(logger.has_sink(&b));
        assert_eq!(logger.clear_sinks().len(), 1);
        assert_eq!(logger.sink_count(), 0);
    }

    #[test]
    fn test_level_filtering() {
        let root = Arc::new(Logger::new_root());
        let logger = Logger::new_child("svc", root);
        logger.set_propagate(false);
        let (memory, shared) = memory();
        logger.add_sink(shared.clone());

        logger.set_level(Some(Level::Info));
        logger.debug("not shown");
        logger.info("shown");
        shared.set_level(Level::Error);
        logger.warning("filtered by the sink");
        logger.critical("shown too");

        memory.validate_logs(&[
            ("INFO", "[svc]", "shown"),
            ("CRITICAL", "[svc]", "shown too"),
        ]);

        logger.set_level_and_sinks(Level::Debug);
        assert_eq!(shared.level(), Level::Debug);
        logger.set_level(None);
        assert!(logger.is_enabled_for(Level::Debug));
    }

    #[test]
    fn test_propagation_to_root() {
        let root = Arc::new(Logger::new_root());
        let (root_memory, root_sink) = memory();
        root.add_sink(root_sink);
        let logger = Logger::new_child("svc", Arc::clone(&root));
        let (memory, sink) = memory();
        logger.add_sink(sink);

        logger.error("twice");
        logger.set_propagate(false);
        logger.error("once");

        memory.validate_logs(&[("ERROR", "", "twice"), ("ERROR", "", "once")]);
        root_memory.validate_logs(&[("ERROR", "[svc]", "twice")]);
    }

    #[test]
    fn test_location_and_extra() {
        let logger = Logger::new_child("svc", Arc::new(Logger::new_root()));
        let memory = Arc::new(MemorySink::new());
        logger.add_sink(memory.clone());

        logger.info_with("msg", crate::extra! { "k" => "v", "n" => 42 });
        let line = &memory.lines()[0];
        assert!(line.contains("[logger.rs:"), "{line}");
        assert!(line.ends_with(r#"msg | extra: {"k": "v", "n": 42}"#), "{line}");

        let record = Record::new("other", Level::Info, "explicit");
        logger.log_record(&record);
        assert!(memory.lines()[1].contains("[other]"));
    }
}
