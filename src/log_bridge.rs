use crate::util::dotted;
use crate::{Level, LoggerError, LoggingContext, Record};

/// Routes the records of the `log` facade to the loggers of a [`LoggingContext`].
///
/// The target of a `log` record (usually the module path, with `.` instead of `::`) is used
/// as logger name; unknown loggers are created with the [`LoggerFactory`](crate::LoggerFactory).
/// With feature `kv`, the record's key-values become extra fields.
///
/// Install it with [`try_init`] (for the global context) or [`LogBridge::install`].
///
/// ```rust
/// ds_common_logger::configure(ds_common_logger::ConfigureOptions::default().prefix("demo"));
/// ds_common_logger::log_bridge::try_init().unwrap();
/// log::info!("via the facade");
/// ```
#[derive(Debug)]
pub struct LogBridge {
    context: LoggingContext,
}

impl LogBridge {
    /// A bridge into the given context.
    #[must_use]
    pub fn new(context: LoggingContext) -> Self {
        Self { context }
    }

    /// Installs the bridge as the logger of the `log` facade.
    ///
    /// The facade's max level is set to `Trace`; filtering is left to the loggers
    /// and their sinks.
    ///
    /// # Errors
    ///
    /// [`LoggerError::Log`] if the facade has a logger already.
    pub fn install(self) -> Result<(), LoggerError> {
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(log::LevelFilter::Trace);
        Ok(())
    }

    fn to_record(record: &log::Record) -> Record {
        let mut ours = Record::new(
            dotted(record.target()),
            Level::from(record.level()),
            record.args().to_string(),
        );
        if let (Some(file), Some(line)) = (record.file(), record.line()) {
            ours = ours.with_location(file, line);
        }
        if let Some(module_path) = record.module_path() {
            ours = ours.with_module_path(module_path);
        }
        #[cfg(feature = "kv")]
        {
            let mut collector = kv::ExtraCollector::default();
            record.key_values().visit(&mut collector).ok();
            ours = ours.with_extra(collector.0);
        }
        ours
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.context
            .registry()
            .get(&dotted(metadata.target()))
            .is_none_or(|logger| logger.is_enabled_for(Level::from(metadata.level())))
    }

    fn log(&self, record: &log::Record) {
        let name = dotted(record.target());
        let logger = self
            .context
            .registry()
            .get(&name)
            .unwrap_or_else(|| self.context.get_logger(&name, None));
        logger.log_record(&Self::to_record(record));
    }

    fn flush(&self) {
        self.context.registry().root().flush();
        for logger in self.context.registry().loggers() {
            logger.flush();
        }
    }
}

/// Installs a [`LogBridge`] into the [global](crate::global) context as logger of the
/// `log` facade.
///
/// # Errors
///
/// [`LoggerError::Log`] if the facade has a logger already.
pub fn try_init() -> Result<(), LoggerError> {
    LogBridge::new(crate::global().clone()).install()
}

#[cfg(feature = "kv")]
mod kv {
    use crate::{ExtraFields, ExtraValue};

    #[derive(Default)]
    pub(super) struct ExtraCollector(pub(super) ExtraFields);

    impl<'kvs> log::kv::VisitSource<'kvs> for ExtraCollector {
        fn visit_pair(
            &mut self,
            key: log::kv::Key<'kvs>,
            value: log::kv::Value<'kvs>,
        ) -> Result<(), log::kv::Error> {
            let value = match serde_json::to_value(&value) {
                Ok(json) => ExtraValue::from(json),
                Err(_) => ExtraValue::Str(value.to_string()),
            };
            self.0.insert(key.as_str(), value);
            Ok(())
        }
    }
}

#[cfg(test)]
mod test {
    use super::LogBridge;
    use crate::sinks::{MemorySink, Sink};
    use crate::{ConfigureOptions, Level, LoggingContext};
    use log::Log;
    use std::sync::Arc;

    fn emit(bridge: &LogBridge, target: &str, level: log::Level, message: &str) {
        bridge.log(
            &log::Record::builder()
                .target(target)
                .level(level)
                .args(format_args!("{message}"))
                .file(Some("src/cart.rs"))
                .line(Some(7))
                .build(),
        );
    }

    #[test]
    fn test_routing_and_filtering() {
        let context = LoggingContext::new();
        let memory = Arc::new(MemorySink::new());
        context.configure(
            ConfigureOptions::with_level(Level::Info)
                .format("%(name)s|%(levelname)s|%(filename)s:%(lineno)d|%(message)s")
                .handlers(vec![memory.clone()]),
        );
        let bridge = LogBridge::new(context.clone());

        emit(&bridge, "shop::cart", log::Level::Warn, "low stock");
        assert!(context.registry().get("shop.cart").is_some());

        let meta = log::Metadata::builder()
            .target("shop::cart")
            .level(log::Level::Debug)
            .build();
        assert!(!bridge.enabled(&meta));
        let meta = log::Metadata::builder()
            .target("not.yet.known")
            .level(log::Level::Trace)
            .build();
        assert!(bridge.enabled(&meta));

        emit(&bridge, "shop::cart", log::Level::Trace, "too fine");
        bridge.flush();
        memory.validate_logs(&[("shop.cart|WARNING|cart.rs:7|low stock", "", "")]);
    }
}
