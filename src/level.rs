use crate::LoggerError;
use std::str::FromStr;

/// Severity of a log record, and threshold of loggers and sinks.
///
/// Records with a level below the threshold of a logger (or of a sink) are suppressed.
/// The numeric values are the conventional ones (`DEBUG` = 10, ..., `CRITICAL` = 50).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Diagnostic output.
    Debug = 10,
    /// Normal operation.
    #[default]
    Info = 20,
    /// Something unexpected that the program can handle.
    Warning = 30,
    /// A failed operation.
    Error = 40,
    /// The program may not be able to continue.
    Critical = 50,
}

impl Level {
    /// All levels, in ascending order.
    pub const ALL: [Level; 5] = [
        Level::Debug,
        Level::Info,
        Level::Warning,
        Level::Error,
        Level::Critical,
    ];

    /// The level name as it appears in log lines (`%(levelname)s`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        }
    }

    /// The numeric value (`%(levelno)d`).
    #[must_use]
    pub fn number(self) -> u8 {
        self as u8
    }

    /// The most verbose `log::LevelFilter` that still reaches this level.
    #[must_use]
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Level::Debug => log::LevelFilter::Trace,
            Level::Info => log::LevelFilter::Info,
            Level::Warning => log::LevelFilter::Warn,
            Level::Error | Level::Critical => log::LevelFilter::Error,
        }
    }
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Trace | log::Level::Debug => Level::Debug,
            log::Level::Info => Level::Info,
            log::Level::Warn => Level::Warning,
            log::Level::Error => Level::Error,
        }
    }
}

impl FromStr for Level {
    type Err = LoggerError;

    /// Accepts level names in any case, the aliases `warn`, `fatal` and `trace`,
    /// and the numeric values of the levels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "trace" | "debug" | "10" => Ok(Level::Debug),
            "info" | "20" => Ok(Level::Info),
            "warn" | "warning" | "30" => Ok(Level::Warning),
            "error" | "40" => Ok(Level::Error),
            "critical" | "fatal" | "50" => Ok(Level::Critical),
            _ => Err(LoggerError::Level(s.to_string())),
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod test {
    use super::Level;

    #[test]
    fn test_level_from_str() {
        assert_eq!("debug".parse::<Level>().unwrap(), Level::Debug);
        assert_eq!("INFO".parse::<Level>().unwrap(), Level::Info);
        assert_eq!("Warn".parse::<Level>().unwrap(), Level::Warning);
        assert_eq!(" warning ".parse::<Level>().unwrap(), Level::Warning);
        assert_eq!("40".parse::<Level>().unwrap(), Level::Error);
        assert_eq!("fatal".parse::<Level>().unwrap(), Level::Critical);
        assert!("verbose".parse::<Level>().is_err());
        assert!("".parse::<Level>().is_err());
    }

    #[test]
    fn test_level_order_and_numbers() {
        for pair in Level::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].number() < pair[1].number());
        }
        assert_eq!(Level::Warning.number(), 30);
        assert_eq!(Level::Critical.to_string(), "CRITICAL");
        assert_eq!(Level::default(), Level::Info);
    }

    #[test]
    fn test_level_from_log() {
        assert_eq!(Level::from(log::Level::Trace), Level::Debug);
        assert_eq!(Level::from(log::Level::Warn), Level::Warning);
        assert_eq!(Level::from(log::Level::Error), Level::Error);
        assert_eq!(Level::Critical.to_level_filter(), log::LevelFilter::Error);
    }
}
