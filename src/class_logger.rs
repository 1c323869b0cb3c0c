use crate::util::{dotted, read, write};
use crate::{Level, Logger, LoggerFactory};
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Gives a type its own logger, named after the type.
///
/// Implementing the trait is all that is needed; all methods have default implementations
/// that use the [global](crate::global) context.
///
/// ```rust
/// use ds_common_logger::{Level, Loggable};
///
/// struct PaymentService;
/// impl Loggable for PaymentService {
///     const LOG_LEVEL: Option<Level> = Some(Level::Debug);
/// }
///
/// impl PaymentService {
///     fn charge(&self, cents: u64) {
///         self.log().debug(format!("charging {cents} cents"));
///     }
/// }
/// # PaymentService.charge(100);
/// ```
///
/// There is one logger per implementing type, not per instance.
/// Since the default methods are instantiated for each implementing type, a log call in
/// code that is shared by several types (e.g. a default method of another trait) is
/// done with the logger of the concrete type.
pub trait Loggable: 'static {
    /// The level the type's logger starts with; `None` leaves the choice to the
    /// [`LoggerFactory`].
    const LOG_LEVEL: Option<Level> = None;

    /// The name of the type's logger: the type path, with `.` as separator.
    ///
    /// For generic types, the name contains the type arguments, e.g.
    /// `app.Cache<app.Order>`, so each instantiation gets a logger of its own.
    fn logger_name() -> String
    where
        Self: Sized,
    {
        dotted(std::any::type_name::<Self>())
    }

    /// The logger of this object's type.
    fn log(&self) -> Arc<Logger>
    where
        Self: Sized,
    {
        crate::global().class_loggers().logger::<Self>()
    }

    /// The logger of the type; a given level is applied to the logger and its sinks,
    /// without becoming the type's stored level.
    fn logger(level: Option<Level>) -> Arc<Logger>
    where
        Self: Sized,
    {
        crate::global()
            .class_loggers()
            .logger_with_level::<Self>(level)
    }

    /// Changes the stored level of the type, and, if the logger exists already, the level
    /// of the logger and its sinks.
    fn set_log_level(level: Level)
    where
        Self: Sized,
    {
        crate::global().class_loggers().set_log_level::<Self>(level);
    }
}

#[derive(Default)]
struct ClassEntry {
    level: Option<Level>,
    logger: Option<Arc<Logger>>,
}

/// The per-type logger cache behind [`Loggable`].
///
/// Each [`LoggingContext`](crate::LoggingContext) owns one; use it directly to work with an
/// explicit context.
#[derive(Clone)]
pub struct ClassLoggers {
    factory: LoggerFactory,
    entries: Arc<RwLock<HashMap<TypeId, ClassEntry>>>,
}

impl ClassLoggers {
    /// An empty cache that obtains its loggers from the given factory.
    #[must_use]
    pub fn new(factory: LoggerFactory) -> Self {
        Self {
            factory,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// The logger of type `T`, created on first access with the stored level of `T`.
    pub fn logger<T: Loggable>(&self) -> Arc<Logger> {
        if let Some(logger) = read(&self.entries)
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.logger.clone())
        {
            return logger;
        }

        let level = self.stored_level::<T>();
        let logger = self.factory.get_logger(&T::logger_name(), level);
        let mut entries = write(&self.entries);
        let entry = entries.entry(TypeId::of::<T>()).or_insert_with(|| ClassEntry {
            level,
            logger: None,
        });
        Arc::clone(entry.logger.get_or_insert(logger))
    }

    /// The logger of type `T`; a given level is applied to the logger and its sinks.
    ///
    /// The stored level of `T` is not changed; a logger that is created by this call starts
    /// with the given level.
    pub fn logger_with_level<T: Loggable>(&self, level: Option<Level>) -> Arc<Logger> {
        let Some(level) = level else {
            return self.logger::<T>();
        };
        let cached = read(&self.entries)
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.logger.clone());
        match cached {
            Some(logger) => {
                logger.set_level_and_sinks(level);
                logger
            }
            None => {
                let logger = self.factory.get_logger(&T::logger_name(), Some(level));
                let mut entries = write(&self.entries);
                let entry = entries.entry(TypeId::of::<T>()).or_insert_with(|| ClassEntry {
                    level: T::LOG_LEVEL,
                    logger: None,
                });
                Arc::clone(entry.logger.get_or_insert(logger))
            }
        }
    }

    /// Changes the stored level of type `T`, and, if its logger exists already, the level
    /// of the logger and its sinks.
    pub fn set_log_level<T: Loggable>(&self, level: Level) {
        let logger = {
            let mut entries = write(&self.entries);
            let entry = entries.entry(TypeId::of::<T>()).or_default();
            entry.level = Some(level);
            entry.logger.clone()
        };
        if let Some(logger) = logger {
            logger.set_level_and_sinks(level);
        }
    }

    /// The stored level of type `T`: the last level set with
    /// [`ClassLoggers::set_log_level`], or else [`Loggable::LOG_LEVEL`].
    #[must_use]
    pub fn stored_level<T: Loggable>(&self) -> Option<Level> {
        read(&self.entries)
            .get(&TypeId::of::<T>())
            .map_or(T::LOG_LEVEL, |entry| entry.level)
    }

    /// Number of types with a cached logger.
    #[must_use]
    pub fn len(&self) -> usize {
        read(&self.entries)
            .values()
            .filter(|entry| entry.logger.is_some())
            .count()
    }

    /// `true` if no type has a cached logger.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forgets all types, their loggers and their stored levels.
    pub fn clear(&self) {
        write(&self.entries).clear();
    }
}

impl std::fmt::Debug for ClassLoggers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassLoggers")
            .field("cached", &self.len())
            .finish_non_exhaustive()
    }
}
