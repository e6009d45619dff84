//! Publisher configuration

use std::env;

use tracing::warn;

/// Environment variable overriding the worker count
pub const WORKERS_ENV: &str = "MEASURE_OBSERVE_WORKERS";

const DEFAULT_WORKERS: usize = 8;

/// Settings for a `Publisher`'s worker pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObserveConfig {
    /// Upper bound on consumer calls running at once
    pub workers: usize,
    /// Name given to worker threads
    pub thread_name: String,
}

impl ObserveConfig {
    pub fn new() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            thread_name: "measure-observe".to_string(),
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Defaults, with the worker count taken from `MEASURE_OBSERVE_WORKERS`
    /// when it is set
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let config = Self::new();
        match var(WORKERS_ENV) {
            None => config,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(workers) if workers > 0 => config.with_workers(workers),
                _ => {
                    warn!(value = %raw, "ignoring invalid {}", WORKERS_ENV);
                    config
                }
            },
        }
    }
}

impl Default for ObserveConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ObserveConfig::default();
        assert_eq!(config.workers, 8);
        assert_eq!(config.thread_name, "measure-observe");
    }

    #[test]
    fn test_builder() {
        let config = ObserveConfig::new().with_workers(2).with_thread_name("sensors");
        assert_eq!(config.workers, 2);
        assert_eq!(config.thread_name, "sensors");
    }

    #[test]
    fn test_from_vars() {
        let config = ObserveConfig::from_vars(|_| Some(" 3 ".to_string()));
        assert_eq!(config.workers, 3);

        let config = ObserveConfig::from_vars(|_| None);
        assert_eq!(config.workers, 8);
    }

    #[test]
    fn test_from_vars_ignores_invalid() {
        assert_eq!(ObserveConfig::from_vars(|_| Some("zero".to_string())).workers, 8);
        assert_eq!(ObserveConfig::from_vars(|_| Some("0".to_string())).workers, 8);
    }
}
