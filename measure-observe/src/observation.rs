//! Observations and the provider/consumer contract

use std::sync::Arc;
use std::time::SystemTime;

/// A value observed at a point in time
#[derive(Debug, Clone, PartialEq)]
pub struct Observation<T> {
    observed_at: SystemTime,
    value: T,
}

impl<T> Observation<T> {
    pub fn new(observed_at: SystemTime, value: T) -> Self {
        Self { observed_at, value }
    }

    /// Observation of `value` stamped with the current time
    pub fn now(value: T) -> Self {
        Self::new(SystemTime::now(), value)
    }

    pub fn observed_at(&self) -> SystemTime {
        self.observed_at
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

/// Receives observations from the providers it subscribed to
pub trait ObservationConsumer<T>: Send + Sync {
    /// Called on a worker thread for every published observation
    fn consume(&self, source: &dyn ObservationProvider<T>, observation: &Observation<T>);
}

impl<T, F> ObservationConsumer<T> for F
where
    F: Fn(&Observation<T>) + Send + Sync,
{
    fn consume(&self, _source: &dyn ObservationProvider<T>, observation: &Observation<T>) {
        self(observation)
    }
}

/// Source of observations that consumers can subscribe to.
///
/// Consumers are identified by their `Arc`: subscribing the same `Arc`
/// twice keeps one subscription.
pub trait ObservationProvider<T>: Send + Sync {
    fn subscribe(&self, consumer: Arc<dyn ObservationConsumer<T>>);

    fn unsubscribe(&self, consumer: &Arc<dyn ObservationConsumer<T>>);

    /// The most recently published observation, if any
    fn last_observation(&self) -> Option<Arc<Observation<T>>>;
}
