use thiserror::Error;

/// Describes errors in the usage of `ds_common_logger`.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LoggerError {
    /// The operation needs a configured process configuration as baseline.
    ///
    /// Call [`ProcessConfig::configure`](crate::ProcessConfig::configure) first.
    #[error("logging is not configured; call configure() before {0}()")]
    NotConfigured(&'static str),

    /// A sink could not be created, e.g. because the log file cannot be opened.
    #[error("sink could not be created")]
    Io(#[from] std::io::Error),

    /// Installing the bridge into the `log` facade failed.
    #[error("logger initialization failed")]
    Log(#[from] log::SetLoggerError),

    /// Invalid level.
    #[error("invalid level: {0}")]
    Level(String),
}
