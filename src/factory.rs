use crate::sinks::{SharedSink, StreamSink};
use crate::util::{read, write};
use crate::{
    BasicConfig, ExtraFieldsFormatter, Formatter, Level, Logger, ProcessConfig, Registry,
    DEFAULT_DATE_FORMAT, DEFAULT_FORMAT,
};
use std::sync::{Arc, RwLock};

/// Hands out named loggers that are wired according to the [`ProcessConfig`].
///
/// Cloning is cheap; all clones share the same configuration and registry.
#[derive(Clone, Debug)]
pub struct LoggerFactory {
    config: Arc<ProcessConfig>,
    defaults: Arc<RwLock<DefaultFormat>>,
}

// Line format and date format for loggers that are created while logging is not configured.
#[derive(Clone, Debug)]
struct DefaultFormat {
    format: String,
    date_format: String,
}
impl Default for DefaultFormat {
    fn default() -> Self {
        Self {
            format: DEFAULT_FORMAT.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl LoggerFactory {
    /// A factory that applies the given configuration.
    #[must_use]
    pub fn new(config: Arc<ProcessConfig>) -> Self {
        Self {
            config,
            defaults: Arc::new(RwLock::new(DefaultFormat::default())),
        }
    }

    /// The configuration this factory applies.
    #[must_use]
    pub fn config(&self) -> &Arc<ProcessConfig> {
        &self.config
    }

    fn registry(&self) -> &Arc<Registry> {
        self.config.registry()
    }

    /// Returns the logger with the given name, ready to use.
    ///
    /// * The logger is created if it does not exist yet; it never propagates to the root logger.
    /// * Its level is, in this order of precedence, the given `level`, the configured level,
    ///   the level of the root logger, or `INFO`.
    /// * If it has no suitable sink, it gets a new stdout sink of its own, and all configured
    ///   handlers. The default handler stays with the root logger.
    ///   While logging is not configured, only sinks with an
    ///   [`ExtraFieldsFormatter`] count as suitable.
    /// * If logging is configured, all its sinks get the configured formatter and the
    ///   logger's level.
    pub fn get_logger(&self, name: &str, level: Option<Level>) -> Arc<Logger> {
        let logger = self.registry().get_or_create(name);
        logger.set_propagate(false);

        let level = self.effective_level(level);
        logger.set_level(Some(level));

        let configured = self.config.is_configured();
        if !self.has_suitable_sink(&logger, configured) {
            self.attach_sinks(&logger, level, configured);
        }

        if configured {
            let formatter = self.config.create_formatter();
            for sink in logger.sinks() {
                sink.set_formatter(formatter.clone());
                sink.set_level(level);
            }
        }
        logger
    }

    fn effective_level(&self, level: Option<Level>) -> Level {
        level
            .or_else(|| self.config.level())
            .or_else(|| self.registry().root().level())
            .unwrap_or(Level::Info)
    }

    fn has_suitable_sink(&self, logger: &Logger, configured: bool) -> bool {
        let sinks = logger.sinks();
        if configured {
            // a sink shared with the configuration is one of the sinks
            !sinks.is_empty()
        } else {
            sinks
                .iter()
                .any(|sink| sink.formatter().is_extra_fields_aware())
        }
    }

    fn attach_sinks(&self, logger: &Logger, level: Level, configured: bool) {
        let formatter = if configured {
            self.config.create_formatter()
        } else {
            self.default_formatter()
        };
        // each logger owns its stdout sink, so its level does not leak into other loggers
        logger.add_sink(Arc::new(
            StreamSink::stdout()
                .with_level(level)
                .with_formatter(formatter),
        ));
        for handler in self.config.handlers() {
            logger.add_sink(handler);
        }
    }

    /// The formatter for loggers that are created while logging is not configured.
    #[must_use]
    pub fn default_formatter(&self) -> Formatter {
        let defaults = read(&self.defaults);
        ExtraFieldsFormatter::new(defaults.format.clone(), defaults.date_format.clone()).into()
    }

    /// Changes the line format and the date format that are used while logging is not
    /// configured; `None` restores the respective default.
    ///
    /// All sinks of all loggers that use an [`ExtraFieldsFormatter`] are switched to the new
    /// format right away.
    pub fn set_log_format(&self, format: Option<&str>, date_format: Option<&str>) {
        {
            let mut defaults = write(&self.defaults);
            defaults.format = format.unwrap_or(DEFAULT_FORMAT).to_string();
            defaults.date_format = date_format.unwrap_or(DEFAULT_DATE_FORMAT).to_string();
        }
        let formatter = self.default_formatter();
        for logger in self.registry().loggers() {
            for sink in logger.sinks() {
                if sink.formatter().is_extra_fields_aware() {
                    sink.set_formatter(formatter.clone());
                }
            }
        }
    }

    /// Equips the root logger, without configuring logging.
    ///
    /// The root logger's level is set. If the root logger has no sinks yet, or if `force` is
    /// set, its sinks are replaced by the given handlers (or by a stdout sink); they get a
    /// formatter for the given line format. A given line format or date format also becomes
    /// the default for loggers that are created while logging is not configured.
    pub fn basic_config(&self, basic: BasicConfig) {
        let BasicConfig {
            level,
            format,
            date_format,
            handlers,
            force,
        } = basic;

        if format.is_some() || date_format.is_some() {
            let mut defaults = write(&self.defaults);
            if let Some(format) = format {
                defaults.format = format;
            }
            if let Some(date_format) = date_format {
                defaults.date_format = date_format;
            }
        }

        let root = self.registry().root();
        root.set_level(Some(level));
        if force {
            root.clear_sinks();
        } else if root.sink_count() > 0 {
            return;
        }
        let formatter = self.default_formatter();
        let handlers: Vec<SharedSink> =
            handlers.unwrap_or_else(|| vec![Arc::new(StreamSink::stdout())]);
        for handler in handlers {
            handler.set_formatter(formatter.clone());
            root.add_sink(handler);
        }
    }

    /// Restores the default line format and date format.
    pub fn reset(&self) {
        *write(&self.defaults) = DefaultFormat::default();
    }
}
