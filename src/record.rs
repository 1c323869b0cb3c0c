use crate::{ExtraFields, ExtraValue, Level};
use chrono::{DateTime, Local};

/// One log event, as it is handed to formatters and sinks.
///
/// Records are usually created by the logging methods of [`Logger`](crate::Logger)
/// or by the `log` facade bridge, but can also be built explicitly and passed to
/// [`Logger::log_record`](crate::Logger::log_record).
#[derive(Debug, Clone)]
pub struct Record {
    timestamp: DateTime<Local>,
    logger: String,
    level: Level,
    message: String,
    file: Option<String>,
    line: Option<u32>,
    module_path: Option<String>,
    thread_name: Option<String>,
    process_id: u32,
    extra: ExtraFields,
}

impl Record {
    /// A record with the current timestamp and the current thread's name.
    #[must_use]
    pub fn new(logger: impl Into<String>, level: Level, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            logger: logger.into(),
            level,
            message: message.into(),
            file: None,
            line: None,
            module_path: None,
            thread_name: std::thread::current().name().map(ToString::to_string),
            process_id: std::process::id(),
            extra: ExtraFields::new(),
        }
    }

    /// Sets the source location.
    #[must_use]
    pub fn with_location(mut self, file: impl Into<String>, line: u32) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }

    /// Sets the module path.
    #[must_use]
    pub fn with_module_path(mut self, module_path: impl Into<String>) -> Self {
        self.module_path = Some(module_path.into());
        self
    }

    /// Sets the timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Replaces all extra fields.
    #[must_use]
    pub fn with_extra(mut self, extra: ExtraFields) -> Self {
        self.extra = extra;
        self
    }

    /// Adds or replaces a single extra field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<ExtraValue>) -> Self {
        self.extra.insert(key, value);
        self
    }

    /// Point in time when the record was created.
    #[must_use]
    pub fn timestamp(&self) -> &DateTime<Local> {
        &self.timestamp
    }

    /// Name of the logger that emitted the record.
    #[must_use]
    pub fn logger(&self) -> &str {
        &self.logger
    }

    /// Severity.
    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    /// The rendered message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Source file path, as given by the caller location.
    #[must_use]
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    /// File name part of [`Record::file`].
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.file
            .as_deref()
            .map(|f| f.rsplit(['/', '\\']).next().unwrap_or(f))
    }

    /// Source line.
    #[must_use]
    pub fn line(&self) -> Option<u32> {
        self.line
    }

    /// Module path, if known.
    #[must_use]
    pub fn module_path(&self) -> Option<&str> {
        self.module_path.as_deref()
    }

    /// Name of the thread that created the record, if it has one.
    #[must_use]
    pub fn thread_name(&self) -> Option<&str> {
        self.thread_name.as_deref()
    }

    /// Id of the process.
    #[must_use]
    pub fn process_id(&self) -> u32 {
        self.process_id
    }

    /// Extra fields attached to the log call.
    #[must_use]
    pub fn extra(&self) -> &ExtraFields {
        &self.extra
    }
}

#[cfg(test)]
mod test {
    use super::Record;
    use crate::Level;

    #[test]
    fn test_file_name() {
        let record = Record::new("a", Level::Info, "m").with_location("src/service/store.rs", 12);
        assert_eq!(record.file(), Some("src/service/store.rs"));
        assert_eq!(record.file_name(), Some("store.rs"));
        assert_eq!(record.line(), Some(12));

        let record = Record::new("a", Level::Info, "m").with_location("store.rs", 1);
        assert_eq!(record.file_name(), Some("store.rs"));
        assert_eq!(Record::new("a", Level::Info, "m").file_name(), None);
    }

    #[test]
    fn test_fields() {
        let record = Record::new("svc", Level::Warning, "disk almost full")
            .with_field("free_mb", 12)
            .with_field("mount", "/data");
        assert_eq!(record.logger(), "svc");
        assert_eq!(record.level(), Level::Warning);
        assert_eq!(record.extra().render(), r#"{"free_mb": 12, "mount": "/data"}"#);
        assert_eq!(record.process_id(), std::process::id());
    }
}
