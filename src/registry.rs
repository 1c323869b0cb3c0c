use crate::util::{read, write};
use crate::Logger;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// All loggers of a [`LoggingContext`](crate::LoggingContext), by name, plus the root logger.
///
/// A logger is created when its name is requested the first time and then lives until
/// [`Registry::clear`] is called.
#[derive(Debug)]
pub struct Registry {
    root: Arc<Logger>,
    loggers: RwLock<HashMap<String, Arc<Logger>>>,
}

impl Registry {
    /// A registry with only the root logger, which has no sinks and no level.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Arc::new(Logger::new_root()),
            loggers: RwLock::new(HashMap::new()),
        }
    }

    /// The root logger.
    #[must_use]
    pub fn root(&self) -> &Arc<Logger> {
        &self.root
    }

    /// The logger with the given name, if it exists.
    ///
    /// The empty name denotes the root logger.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<Logger>> {
        if name.is_empty() {
            return Some(Arc::clone(&self.root));
        }
        read(&self.loggers).get(name).cloned()
    }

    /// The logger with the given name; it is created if necessary.
    ///
    /// The empty name denotes the root logger.
    pub fn get_or_create(&self, name: &str) -> Arc<Logger> {
        if let Some(logger) = self.get(name) {
            return logger;
        }
        Arc::clone(
            write(&self.loggers)
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(Logger::new_child(name, Arc::clone(&self.root)))),
        )
    }

    /// A snapshot of all named loggers, without the root logger.
    #[must_use]
    pub fn loggers(&self) -> Vec<Arc<Logger>> {
        read(&self.loggers).values().cloned().collect()
    }

    /// Names of all named loggers, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = read(&self.loggers).keys().cloned().collect();
        names.sort();
        names
    }

    /// Forgets all named loggers and resets the root logger.
    ///
    /// Loggers that are still referenced elsewhere keep working, but are no longer
    /// reached by configuration changes.
    pub fn clear(&self) {
        write(&self.loggers).clear();
        self.root.clear_sinks();
        self.root.set_level(None);
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::Registry;
    use std::sync::Arc;

    #[test]
    fn test_get_or_create() {
        let registry = Registry::new();
        assert!(registry.get("a.b").is_none());
        let a = registry.get_or_create("a.b");
        let b = registry.get_or_create("a.b");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.name(), "a.b");
        assert!(a.propagate());

        let _ = registry.get_or_create("a");
        assert_eq!(registry.names(), vec!["a".to_string(), "a.b".to_string()]);
        assert!(Arc::ptr_eq(&registry.get_or_create(""), registry.root()));
        assert_eq!(registry.loggers().len(), 2);

        registry.clear();
        assert!(registry.loggers().is_empty());
        assert!(!Arc::ptr_eq(&registry.get_or_create("a.b"), &a));
    }
}
