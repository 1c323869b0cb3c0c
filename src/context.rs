use crate::{ClassLoggers, ConfigureOptions, Level, Logger, LoggerFactory, ProcessConfig, Registry};
use std::sync::{Arc, OnceLock};

/// Everything that belongs together: the logger registry, the [`ProcessConfig`], the
/// [`LoggerFactory`] and the per-type logger cache.
///
/// Most applications use the process-wide instance that is returned by [`global`].
/// Independent instances are useful in tests, which can so avoid interfering with each other.
/// Cloning is cheap; clones share all state.
#[derive(Clone, Debug)]
pub struct LoggingContext {
    config: Arc<ProcessConfig>,
    factory: LoggerFactory,
    class_loggers: ClassLoggers,
}

impl LoggingContext {
    /// A new context, not configured, without loggers.
    #[must_use]
    pub fn new() -> Self {
        let config = Arc::new(ProcessConfig::new(Arc::new(Registry::new())));
        let factory = LoggerFactory::new(Arc::clone(&config));
        let class_loggers = ClassLoggers::new(factory.clone());
        Self {
            config,
            factory,
            class_loggers,
        }
    }

    /// The configuration state.
    #[must_use]
    pub fn config(&self) -> &Arc<ProcessConfig> {
        &self.config
    }

    /// The logger registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<Registry> {
        self.config.registry()
    }

    /// The logger factory.
    #[must_use]
    pub fn factory(&self) -> &LoggerFactory {
        &self.factory
    }

    /// The per-type logger cache.
    #[must_use]
    pub fn class_loggers(&self) -> &ClassLoggers {
        &self.class_loggers
    }

    /// Shortcut for [`LoggerFactory::get_logger`].
    pub fn get_logger(&self, name: &str, level: Option<Level>) -> Arc<Logger> {
        self.factory.get_logger(name, level)
    }

    /// Shortcut for [`ProcessConfig::configure`].
    pub fn configure(&self, options: ConfigureOptions) {
        self.config.configure(options);
    }

    /// Back to the initial state: not configured, default line format, no loggers,
    /// no cached type loggers.
    ///
    /// Logger handles obtained before remain usable, but are no longer reached by
    /// configuration changes.
    pub fn reset(&self) {
        self.config.reset();
        self.factory.reset();
        self.registry().clear();
        self.class_loggers.clear();
    }
}

impl Default for LoggingContext {
    fn default() -> Self {
        Self::new()
    }
}

/// The process-wide context, created on first use.
pub fn global() -> &'static LoggingContext {
    static GLOBAL: OnceLock<LoggingContext> = OnceLock::new();
    GLOBAL.get_or_init(LoggingContext::new)
}

/// Returns a logger from the [global] context, with the level it would get anyway.
///
/// ```rust
/// let logger = ds_common_logger::get_logger("app.startup");
/// logger.info("starting");
/// ```
pub fn get_logger(name: &str) -> Arc<Logger> {
    global().get_logger(name, None)
}

/// Configures the [global] context; see [`ProcessConfig::configure`].
pub fn configure(options: ConfigureOptions) {
    global().configure(options);
}
