use crate::sinks::SharedSink;
use crate::{Level, LoggerError, DEFAULT_DATE_FORMAT, DEFAULT_FORMAT_WITH_PREFIX};

/// Name of the environment variable that is consulted by
/// [`ConfigureOptions::try_with_env_or_str`].
pub const LEVEL_ENV_VAR: &str = "RUST_LOG";

/// The parameters of [`ProcessConfig::configure`](crate::ProcessConfig::configure).
///
/// Create an instance with `ConfigureOptions::default()` (or one of the other constructors),
/// modify it with the builder methods, and hand it over to `configure`.
///
/// ## Example
///
/// Log with prefix `checkout` and level `DEBUG` to stdout,
/// unless the environment variable `RUST_LOG` demands a different level:
///
/// ```rust
/// use ds_common_logger::{ConfigureOptions, LoggingContext};
///
/// let context = LoggingContext::new();
/// context.config().configure(
///     ConfigureOptions::try_with_env_or_str("debug")
///         .unwrap()
///         .prefix("checkout"),
/// );
/// ```
#[derive(Clone)]
pub struct ConfigureOptions {
    pub(crate) prefix: String,
    pub(crate) format: String,
    pub(crate) date_format: String,
    pub(crate) level: Level,
    pub(crate) handlers: Option<Vec<SharedSink>>,
    pub(crate) default_handler: Option<SharedSink>,
    pub(crate) force: bool,
}

impl Default for ConfigureOptions {
    /// Empty prefix, [`DEFAULT_FORMAT_WITH_PREFIX`], [`DEFAULT_DATE_FORMAT`], level `INFO`,
    /// no handlers, no default handler, no force.
    fn default() -> Self {
        Self {
            prefix: String::new(),
            format: DEFAULT_FORMAT_WITH_PREFIX.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            level: Level::Info,
            handlers: None,
            default_handler: None,
            force: false,
        }
    }
}

impl ConfigureOptions {
    /// Options with the given level.
    #[must_use]
    pub fn with_level(level: Level) -> Self {
        Self::default().level(level)
    }

    /// Options with the level taken from the given string.
    ///
    /// # Errors
    ///
    /// [`LoggerError::Level`] if the string is not a level.
    pub fn try_with_str<S: AsRef<str>>(s: S) -> Result<Self, LoggerError> {
        Ok(Self::with_level(s.as_ref().parse()?))
    }

    /// Options with the level taken from the environment variable `RUST_LOG`,
    /// or, if it is not set, from the given string.
    ///
    /// # Errors
    ///
    /// [`LoggerError::Level`] if the chosen value is not a level.
    pub fn try_with_env_or_str<S: AsRef<str>>(s: S) -> Result<Self, LoggerError> {
        match std::env::var(LEVEL_ENV_VAR) {
            Ok(value) => Self::try_with_str(value),
            Err(_) => Self::try_with_str(s),
        }
    }

    /// Sets the value for `{prefix}` tokens in the line format; empty disables the prefix.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the line format; see [`ExtraFieldsFormatter`](crate::ExtraFieldsFormatter).
    #[must_use]
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Sets the `strftime` format for `%(asctime)s`.
    #[must_use]
    pub fn date_format(mut self, date_format: impl Into<String>) -> Self {
        self.date_format = date_format.into();
        self
    }

    /// Sets the minimal level.
    #[must_use]
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Uses exactly these sinks instead of the implicit stdout sink.
    #[must_use]
    pub fn handlers(mut self, handlers: Vec<SharedSink>) -> Self {
        self.handlers = Some(handlers);
        self
    }

    /// Uses exactly this sink for the root logger instead of the implicit stdout sink; wins
    /// over [`ConfigureOptions::handlers`].
    ///
    /// Loggers of the factory still get their own stdout sink.
    #[must_use]
    pub fn default_handler(mut self, sink: SharedSink) -> Self {
        self.default_handler = Some(sink);
        self
    }

    /// Makes `configure` effective even if the process is configured already.
    #[must_use]
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

impl std::fmt::Debug for ConfigureOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigureOptions")
            .field("prefix", &self.prefix)
            .field("format", &self.format)
            .field("date_format", &self.date_format)
            .field("level", &self.level)
            .field("handlers", &self.handlers.as_ref().map(Vec::len))
            .field("default_handler", &self.default_handler.is_some())
            .field("force", &self.force)
            .finish()
    }
}

/// The parameters of [`LoggerFactory::basic_config`](crate::LoggerFactory::basic_config),
/// the simple initialization that only equips the root logger.
#[derive(Clone)]
pub struct BasicConfig {
    pub(crate) level: Level,
    pub(crate) format: Option<String>,
    pub(crate) date_format: Option<String>,
    pub(crate) handlers: Option<Vec<SharedSink>>,
    pub(crate) force: bool,
}

impl Default for BasicConfig {
    /// Level `INFO`, current default format, a stdout sink, no force.
    fn default() -> Self {
        Self {
            level: Level::Info,
            format: None,
            date_format: None,
            handlers: None,
            force: false,
        }
    }
}

impl BasicConfig {
    /// Sets the level of the root logger.
    #[must_use]
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the line format, which also becomes the default for newly created loggers.
    #[must_use]
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Sets the date format, which also becomes the default for newly created loggers.
    #[must_use]
    pub fn date_format(mut self, date_format: impl Into<String>) -> Self {
        self.date_format = Some(date_format.into());
        self
    }

    /// Uses these sinks for the root logger instead of a stdout sink.
    #[must_use]
    pub fn handlers(mut self, handlers: Vec<SharedSink>) -> Self {
        self.handlers = Some(handlers);
        self
    }

    /// Replaces the sinks of the root logger even if it has some already.
    #[must_use]
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}
