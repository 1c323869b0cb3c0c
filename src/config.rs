use crate::sinks::{same_sink, SharedSink, StreamSink};
use crate::util::{read, write};
use crate::{
    ConfigureOptions, ExtraFieldsFormatter, Formatter, Level, LoggerError, Registry,
    DEFAULT_DATE_FORMAT, DEFAULT_FORMAT_WITH_PREFIX,
};
use std::sync::{Arc, RwLock};

/// The process-wide logging configuration: prefix, line format, date format, level,
/// and the sinks that every logger gets.
///
/// The configuration is either unconfigured, or configured with a complete set of
/// [`Settings`]. The first call of [`ProcessConfig::configure`] configures it;
/// later calls are ignored unless they are forced. Each change is pushed onto every logger
/// of the [`Registry`], including loggers that were created before the change, by
/// replacing level and formatter of their sinks in place.
///
/// ## Concurrency
///
/// All state is kept behind locks, but multi-step updates are not atomic as a whole:
/// `configure` first replaces the settings and then visits the loggers one by one.
/// Concurrent calls of `configure`, `add_handler` or `set_prefix` from several threads can
/// thus interleave so that some loggers are updated before others.
/// Each logger's level and each sink's formatter are always replaced in a single step.
pub struct ProcessConfig {
    registry: Arc<Registry>,
    state: RwLock<ConfigState>,
}

/// The values a configured [`ProcessConfig`] holds.
#[derive(Clone)]
pub struct Settings {
    /// Value for `{prefix}` tokens.
    pub prefix: String,
    /// Line format.
    pub format: String,
    /// Date format.
    pub date_format: String,
    /// Minimal level.
    pub level: Level,
    /// Sinks that are attached to every logger.
    pub handlers: Vec<SharedSink>,
    /// Sink of the root logger, also given to loggers that have no sink at all.
    pub default_handler: Option<SharedSink>,
}

impl Settings {
    /// The formatter that corresponds to these settings.
    #[must_use]
    pub fn formatter(&self) -> Formatter {
        create_formatter(&self.prefix, &self.format, &self.date_format)
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("prefix", &self.prefix)
            .field("format", &self.format)
            .field("date_format", &self.date_format)
            .field("level", &self.level)
            .field("handlers", &self.handlers.len())
            .field("default_handler", &self.default_handler.is_some())
            .finish()
    }
}

#[derive(Debug)]
enum ConfigState {
    Unconfigured,
    Configured(Settings),
}

fn create_formatter(prefix: &str, format: &str, date_format: &str) -> Formatter {
    ExtraFieldsFormatter::with_template_vars(format, date_format, [("prefix", prefix)]).into()
}

impl ProcessConfig {
    /// An unconfigured configuration for the loggers of the given registry.
    #[must_use]
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            state: RwLock::new(ConfigState::Unconfigured),
        }
    }

    /// The registry whose loggers this configuration is applied to.
    #[must_use]
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Configures logging, if it is not configured yet or if `options.force` is set;
    /// otherwise nothing happens.
    ///
    /// All settings are replaced, and the sinks are chosen as follows:
    /// if a default handler is given, it is used alone; otherwise, if handlers are given,
    /// exactly these are used; otherwise a stdout sink with the configured level is created.
    /// The chosen sinks are attached to the root logger, whose level is set to the configured
    /// level. With `force`, the root logger's previous sinks are detached first.
    ///
    /// Finally, level and formatter are propagated onto all existing loggers.
    pub fn configure(&self, options: ConfigureOptions) {
        let ConfigureOptions {
            prefix,
            format,
            date_format,
            level,
            handlers,
            default_handler,
            force,
        } = options;

        let settings = {
            let mut state = write(&self.state);
            match (&*state, force) {
                (ConfigState::Configured(_), false) => return,
                (ConfigState::Unconfigured, _) | (ConfigState::Configured(_), true) => {}
            }
            let (handlers, default_handler) = match (default_handler, handlers) {
                (Some(default_handler), _) => (Vec::new(), Some(default_handler)),
                (None, Some(handlers)) => (handlers, None),
                (None, None) => {
                    let formatter = create_formatter(&prefix, &format, &date_format);
                    let stdout: SharedSink = Arc::new(
                        StreamSink::stdout()
                            .with_level(level)
                            .with_formatter(formatter),
                    );
                    (Vec::new(), Some(stdout))
                }
            };
            let settings = Settings {
                prefix,
                format,
                date_format,
                level,
                handlers,
                default_handler,
            };
            *state = ConfigState::Configured(settings.clone());
            settings
        };

        let root = self.registry.root();
        root.set_level(Some(settings.level));
        if force {
            root.clear_sinks();
        }
        if let Some(default_handler) = &settings.default_handler {
            root.add_sink(Arc::clone(default_handler));
        }
        for handler in &settings.handlers {
            root.add_sink(Arc::clone(handler));
        }

        self.update_existing_loggers();
    }

    /// Sets the prefix and propagates it onto all loggers.
    ///
    /// If logging is not configured yet, it is configured with default options and
    /// this prefix.
    pub fn set_prefix(&self, prefix: impl Into<String>) {
        let prefix = prefix.into();
        if !self.is_configured() {
            self.configure(ConfigureOptions::default().prefix(prefix.clone()));
        }
        if let ConfigState::Configured(settings) = &mut *write(&self.state) {
            settings.prefix = prefix;
        }
        self.update_existing_loggers();
    }

    /// Adds a sink to the handlers and attaches it to the root logger and to all loggers.
    ///
    /// A sink that is already among the handlers is not added to them again, and a sink
    /// that a logger has already is not attached a second time.
    ///
    /// # Errors
    ///
    /// [`LoggerError::NotConfigured`] if logging is not configured yet.
    pub fn add_handler(&self, sink: SharedSink) -> Result<(), LoggerError> {
        match &mut *write(&self.state) {
            ConfigState::Unconfigured => return Err(LoggerError::NotConfigured("add_handler")),
            ConfigState::Configured(settings) => {
                if !settings.handlers.iter().any(|h| same_sink(h, &sink)) {
                    settings.handlers.push(Arc::clone(&sink));
                }
            }
        }
        for logger in self.registry.loggers() {
            logger.add_sink(Arc::clone(&sink));
        }
        self.registry.root().add_sink(sink);
        Ok(())
    }

    /// Removes a sink from the handlers and detaches it from the root logger and from
    /// all loggers.
    ///
    /// Does nothing if logging is not configured.
    pub fn remove_handler(&self, sink: &SharedSink) {
        match &mut *write(&self.state) {
            ConfigState::Unconfigured => return,
            ConfigState::Configured(settings) => {
                settings.handlers.retain(|h| !same_sink(h, sink));
            }
        }
        self.registry.root().remove_sink(sink);
        for logger in self.registry.loggers() {
            logger.remove_sink(sink);
        }
    }

    /// Replaces the default handler.
    ///
    /// The previous default handler is detached everywhere. The new one gets the configured
    /// level and formatter, and is attached to the root logger and to all loggers that have
    /// no sink at all.
    ///
    /// # Errors
    ///
    /// [`LoggerError::NotConfigured`] if logging is not configured yet.
    pub fn set_default_handler(&self, sink: SharedSink) -> Result<(), LoggerError> {
        let previous = match &*read(&self.state) {
            ConfigState::Unconfigured => {
                return Err(LoggerError::NotConfigured("set_default_handler"))
            }
            ConfigState::Configured(settings) => settings.default_handler.clone(),
        };
        if let Some(previous) = previous {
            self.remove_handler(&previous);
        }

        let formatter = {
            let mut state = write(&self.state);
            let ConfigState::Configured(settings) = &mut *state else {
                return Err(LoggerError::NotConfigured("set_default_handler"));
            };
            settings.default_handler = Some(Arc::clone(&sink));
            sink.set_level(settings.level);
            settings.formatter()
        };
        sink.set_formatter(formatter);

        for logger in self.registry.loggers() {
            if logger.sink_count() == 0 {
                logger.add_sink(Arc::clone(&sink));
            }
        }
        self.registry.root().add_sink(sink);
        Ok(())
    }

    /// `true` once [`ProcessConfig::configure`] was effective.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        matches!(&*read(&self.state), ConfigState::Configured(_))
    }

    /// The prefix; empty if not configured.
    #[must_use]
    pub fn get_prefix(&self) -> String {
        match &*read(&self.state) {
            ConfigState::Unconfigured => String::new(),
            ConfigState::Configured(settings) => settings.prefix.clone(),
        }
    }

    /// The line format; [`DEFAULT_FORMAT_WITH_PREFIX`] if not configured.
    #[must_use]
    pub fn get_format_string(&self) -> String {
        match &*read(&self.state) {
            ConfigState::Unconfigured => DEFAULT_FORMAT_WITH_PREFIX.to_string(),
            ConfigState::Configured(settings) => settings.format.clone(),
        }
    }

    /// The date format; [`DEFAULT_DATE_FORMAT`] if not configured.
    #[must_use]
    pub fn get_date_format(&self) -> String {
        match &*read(&self.state) {
            ConfigState::Unconfigured => DEFAULT_DATE_FORMAT.to_string(),
            ConfigState::Configured(settings) => settings.date_format.clone(),
        }
    }

    /// The configured level, if configured.
    #[must_use]
    pub fn level(&self) -> Option<Level> {
        match &*read(&self.state) {
            ConfigState::Unconfigured => None,
            ConfigState::Configured(settings) => Some(settings.level),
        }
    }

    /// The configured handlers; empty if not configured.
    #[must_use]
    pub fn handlers(&self) -> Vec<SharedSink> {
        match &*read(&self.state) {
            ConfigState::Unconfigured => Vec::new(),
            ConfigState::Configured(settings) => settings.handlers.clone(),
        }
    }

    /// The default handler, if configured.
    #[must_use]
    pub fn default_handler(&self) -> Option<SharedSink> {
        match &*read(&self.state) {
            ConfigState::Unconfigured => None,
            ConfigState::Configured(settings) => settings.default_handler.clone(),
        }
    }

    /// A copy of the settings, if configured.
    #[must_use]
    pub fn settings(&self) -> Option<Settings> {
        match &*read(&self.state) {
            ConfigState::Unconfigured => None,
            ConfigState::Configured(settings) => Some(settings.clone()),
        }
    }

    /// `true` if the sink is the default handler or one of the handlers.
    #[must_use]
    pub fn knows_sink(&self, sink: &SharedSink) -> bool {
        match &*read(&self.state) {
            ConfigState::Unconfigured => false,
            ConfigState::Configured(settings) => {
                settings.handlers.iter().any(|h| same_sink(h, sink))
                    || settings
                        .default_handler
                        .as_ref()
                        .is_some_and(|h| same_sink(h, sink))
            }
        }
    }

    /// A formatter for the current prefix, line format and date format.
    ///
    /// Works also if not configured, then with the defaults.
    #[must_use]
    pub fn create_formatter(&self) -> Formatter {
        create_formatter(
            &self.get_prefix(),
            &self.get_format_string(),
            &self.get_date_format(),
        )
    }

    /// Back to unconfigured: the settings are dropped, the root logger loses its sinks
    /// and its level.
    ///
    /// Named loggers are not touched.
    pub fn reset(&self) {
        *write(&self.state) = ConfigState::Unconfigured;
        let root = self.registry.root();
        root.clear_sinks();
        root.set_level(None);
    }

    // Pushes the complete current state onto every logger.
    fn update_existing_loggers(&self) {
        let Some(settings) = self.settings() else {
            return;
        };
        let formatter = settings.formatter();
        for sink in self.registry.root().sinks() {
            sink.set_formatter(formatter.clone());
        }
        for logger in self.registry.loggers() {
            logger.set_level(Some(settings.level));
            for sink in logger.sinks() {
                sink.set_formatter(formatter.clone());
                sink.set_level(settings.level);
            }
        }
    }
}

impl std::fmt::Debug for ProcessConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessConfig")
            .field("state", &*read(&self.state))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod test {
    use super::ProcessConfig;
    use crate::sinks::{MemorySink, SharedSink, Sink};
    use crate::{ConfigureOptions, Level, LoggerError, Registry, DEFAULT_FORMAT_WITH_PREFIX};
    use std::sync::Arc;

    fn fresh_config() -> ProcessConfig {
        ProcessConfig::new(Arc::new(Registry::new()))
    }

    fn memory_sink() -> SharedSink {
        Arc::new(MemorySink::new())
    }

    #[test]
    fn test_unconfigured_accessors() {
        let config = fresh_config();
        assert!(!config.is_configured());
        assert_eq!(config.get_prefix(), "");
        assert_eq!(config.get_format_string(), DEFAULT_FORMAT_WITH_PREFIX);
        assert_eq!(config.get_date_format(), "%Y-%m-%dT%H:%M:%S");
        assert_eq!(config.level(), None);
        assert!(config.handlers().is_empty());
        assert!(config.create_formatter().is_extra_fields_aware());
    }

    #[test]
    fn test_configure_is_idempotent() {
        let config = fresh_config();
        config.configure(ConfigureOptions::default().prefix("A"));
        config.configure(ConfigureOptions::default().prefix("B").level(Level::Error));
        assert_eq!(config.get_prefix(), "A");
        assert_eq!(config.level(), Some(Level::Info));
    }

    #[test]
    fn test_force_replaces_all_settings() {
        let config = fresh_config();
        config.configure(ConfigureOptions::default().prefix("A").level(Level::Debug));
        let first_default = config.default_handler().unwrap();
        config.configure(
            ConfigureOptions::default()
                .prefix("B")
                .format("%(message)s")
                .date_format("%H:%M")
                .force(true),
        );
        assert_eq!(config.get_prefix(), "B");
        assert_eq!(config.get_format_string(), "%(message)s");
        assert_eq!(config.get_date_format(), "%H:%M");
        assert_eq!(config.level(), Some(Level::Info));

        let root = config.registry().root();
        assert_eq!(root.sink_count(), 1);
        assert!(!root.has_sink(&first_default));
        assert_eq!(root.level(), Some(Level::Info));
    }

    #[test]
    fn test_handler_paths() {
        // implicit stdout sink
        let config = fresh_config();
        config.configure(ConfigureOptions::with_level(Level::Warning));
        let stdout = config.default_handler().unwrap();
        assert_eq!(stdout.level(), Level::Warning);
        assert!(config.handlers().is_empty());
        assert!(config.registry().root().has_sink(&stdout));

        // explicit handlers, no stdout sink
        let config = fresh_config();
        let (a, b) = (memory_sink(), memory_sink());
        config.configure(ConfigureOptions::default().handlers(vec![a.clone(), b.clone()]));
        assert!(config.default_handler().is_none());
        assert_eq!(config.handlers().len(), 2);
        assert_eq!(config.registry().root().sink_count(), 2);

        // the default handler wins over the handlers
        let config = fresh_config();
        let d = memory_sink();
        config.configure(
            ConfigureOptions::default()
                .handlers(vec![a.clone()])
                .default_handler(d.clone()),
        );
        assert!(config.handlers().is_empty());
        assert!(config.knows_sink(&d));
        assert!(!config.knows_sink(&a));
        assert_eq!(config.registry().root().sink_count(), 1);
    }

    #[test]
    fn test_not_configured_errors() {
        let config = fresh_config();
        let sink = memory_sink();
        assert!(matches!(
            config.add_handler(sink.clone()),
            Err(LoggerError::NotConfigured("add_handler"))
        ));
        assert!(matches!(
            config.set_default_handler(sink.clone()),
            Err(LoggerError::NotConfigured("set_default_handler"))
        ));
        // no error, no effect
        config.remove_handler(&sink);
        assert!(!config.is_configured());
    }

    #[test]
    fn test_add_and_remove_handler() {
        let config = fresh_config();
        config.configure(ConfigureOptions::default().handlers(vec![]));
        let logger = config.registry().get_or_create("svc");
        let sink = memory_sink();

        config.add_handler(sink.clone()).unwrap();
        config.add_handler(sink.clone()).unwrap();
        assert_eq!(config.handlers().len(), 1);
        assert_eq!(logger.attach_count(&sink), 1);
        assert_eq!(config.registry().root().attach_count(&sink), 1);

        config.remove_handler(&sink);
        assert!(config.handlers().is_empty());
        assert!(!logger.has_sink(&sink));
        assert!(!config.registry().root().has_sink(&sink));
        // removing twice is fine
        config.remove_handler(&sink);
    }

    #[test]
    fn test_set_default_handler_fills_gaps_only() {
        let config = fresh_config();
        config.configure(ConfigureOptions::with_level(Level::Error).prefix("P"));
        let old_default = config.default_handler().unwrap();
        let empty = config.registry().get_or_create("empty");
        let busy = config.registry().get_or_create("busy");
        let own = memory_sink();
        busy.add_sink(own.clone());
        busy.add_sink(old_default.clone());

        let memory = Arc::new(MemorySink::new());
        let new_default: SharedSink = memory.clone();
        config.set_default_handler(new_default.clone()).unwrap();

        assert_eq!(new_default.level(), Level::Error);
        assert_eq!(
            new_default.formatter().as_extra_fields().unwrap().template_var("prefix"),
            Some("P")
        );
        assert!(empty.has_sink(&new_default));
        assert!(!busy.has_sink(&new_default));
        assert!(!busy.has_sink(&old_default));
        assert!(busy.has_sink(&own));
        assert!(config.registry().root().has_sink(&new_default));
        assert!(!config.registry().root().has_sink(&old_default));
        assert!(config.knows_sink(&new_default));
    }

    #[test]
    fn test_set_prefix_autoconfigures_and_propagates() {
        let config = fresh_config();
        let logger = config.registry().get_or_create("svc");
        let memory = Arc::new(MemorySink::new());
        logger.add_sink(memory.clone());

        config.set_prefix("session-1");
        assert!(config.is_configured());
        assert_eq!(config.get_prefix(), "session-1");
        assert_eq!(logger.level(), Some(Level::Info));

        config.set_prefix("session-2");
        logger.info("hello");
        memory.validate_logs(&[("[session-2]", "[svc][INFO]", "hello")]);
    }

    #[test]
    fn test_reset() {
        let config = fresh_config();
        config.configure(ConfigureOptions::default().prefix("X"));
        config.reset();
        assert!(!config.is_configured());
        assert_eq!(config.get_prefix(), "");
        assert_eq!(config.registry().root().sink_count(), 0);
        assert_eq!(config.registry().root().level(), None);
        config.configure(ConfigureOptions::default().prefix("Y"));
        assert_eq!(config.get_prefix(), "Y");
    }
}
