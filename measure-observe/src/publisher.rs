//! Observation publisher backed by a worker pool

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tokio::runtime::{Builder, Runtime};
use tracing::{trace, warn};

use crate::{Observation, ObservationConsumer, ObservationProvider, ObserveConfig, ObserveError};

type ConsumerList<T> = Arc<Vec<Arc<dyn ObservationConsumer<T>>>>;

/// Subscriber set and last observation, shared with in-flight deliveries
struct Subscribers<T> {
    // Copy-on-write: publishing iterates a snapshot while (un)subscribe swaps the list.
    consumers: RwLock<ConsumerList<T>>,
    last: RwLock<Option<Arc<Observation<T>>>>,
}

impl<T> Subscribers<T> {
    fn snapshot(&self) -> ConsumerList<T> {
        Arc::clone(&self.consumers.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn update(&self, edit: impl FnOnce(&mut Vec<Arc<dyn ObservationConsumer<T>>>)) {
        let mut consumers = self.consumers.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = consumers.as_ref().clone();
        edit(&mut next);
        *consumers = Arc::new(next);
    }
}

fn same_consumer<T>(a: &Arc<dyn ObservationConsumer<T>>, b: &Arc<dyn ObservationConsumer<T>>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

impl<T: Send + Sync + 'static> ObservationProvider<T> for Subscribers<T> {
    fn subscribe(&self, consumer: Arc<dyn ObservationConsumer<T>>) {
        self.update(|consumers| {
            if !consumers.iter().any(|c| same_consumer(c, &consumer)) {
                consumers.push(consumer);
            }
        });
    }

    fn unsubscribe(&self, consumer: &Arc<dyn ObservationConsumer<T>>) {
        self.update(|consumers| consumers.retain(|c| !same_consumer(c, consumer)));
    }

    fn last_observation(&self) -> Option<Arc<Observation<T>>> {
        self.last.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

/// Publishes observations to every subscribed consumer.
///
/// Each consumer call runs as its own task on the publisher's worker pool.
/// A publisher must be dropped (or shut down) outside of an async context.
pub struct Publisher<T> {
    shared: Arc<Subscribers<T>>,
    runtime: Runtime,
}

impl<T: Send + Sync + 'static> Publisher<T> {
    pub fn new(config: &ObserveConfig) -> Result<Self, ObserveError> {
        if config.workers == 0 {
            return Err(ObserveError::NoWorkers);
        }
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .max_blocking_threads(config.workers)
            .thread_name(config.thread_name.clone())
            .build()?;

        Ok(Self {
            shared: Arc::new(Subscribers {
                consumers: RwLock::new(Arc::new(Vec::new())),
                last: RwLock::new(None),
            }),
            runtime,
        })
    }

    /// Record `observation` as the latest one and deliver it to every
    /// consumer subscribed at the time of the call. Returns without waiting
    /// for delivery.
    pub fn publish(&self, observation: Observation<T>) {
        let observation = Arc::new(observation);
        *self.shared.last.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&observation));

        let consumers = self.shared.snapshot();
        trace!(consumers = consumers.len(), "publishing observation");

        for consumer in consumers.iter() {
            let consumer = Arc::clone(consumer);
            let shared = Arc::clone(&self.shared);
            let observation = Arc::clone(&observation);
            self.runtime.spawn_blocking(move || {
                let delivered = panic::catch_unwind(AssertUnwindSafe(|| {
                    consumer.consume(shared.as_ref(), &observation)
                }));
                if delivered.is_err() {
                    warn!("observation consumer panicked");
                }
            });
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.shared.snapshot().len()
    }

    /// Stop the worker pool, waiting up to `timeout` for running deliveries
    pub fn shutdown(self, timeout: Duration) {
        let Publisher { runtime, .. } = self;
        runtime.shutdown_timeout(timeout);
    }
}

impl<T: Send + Sync + 'static> ObservationProvider<T> for Publisher<T> {
    fn subscribe(&self, consumer: Arc<dyn ObservationConsumer<T>>) {
        self.shared.subscribe(consumer);
    }

    fn unsubscribe(&self, consumer: &Arc<dyn ObservationConsumer<T>>) {
        self.shared.unsubscribe(consumer);
    }

    fn last_observation(&self) -> Option<Arc<Observation<T>>> {
        self.shared.last_observation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::sync::Mutex;

    const WAIT: Duration = Duration::from_secs(5);

    fn publisher() -> Publisher<f64> {
        Publisher::new(&ObserveConfig::new().with_workers(4)).unwrap()
    }

    fn forwarding(tx: mpsc::Sender<f64>) -> Arc<dyn ObservationConsumer<f64>> {
        let tx = Mutex::new(tx);
        Arc::new(move |obs: &Observation<f64>| {
            let _ = tx.lock().unwrap().send(*obs.value());
        })
    }

    #[test]
    fn test_no_workers_rejected() {
        let result = Publisher::<f64>::new(&ObserveConfig::new().with_workers(0));
        assert!(matches!(result, Err(ObserveError::NoWorkers)));
    }

    #[test]
    fn test_every_subscriber_receives() {
        let publisher = publisher();
        let (tx, rx) = mpsc::channel();
        publisher.subscribe(forwarding(tx.clone()));
        publisher.subscribe(forwarding(tx));

        publisher.publish(Observation::now(21.5));

        assert_eq!(rx.recv_timeout(WAIT).unwrap(), 21.5);
        assert_eq!(rx.recv_timeout(WAIT).unwrap(), 21.5);
    }

    #[test]
    fn test_last_observation() {
        let publisher = publisher();
        assert!(publisher.last_observation().is_none());

        publisher.publish(Observation::now(1.0));
        publisher.publish(Observation::now(2.0));
        assert_eq!(*publisher.last_observation().unwrap().value(), 2.0);
    }

    #[test]
    fn test_subscribe_is_idempotent() {
        let publisher = publisher();
        let (tx, _rx) = mpsc::channel();
        let consumer = forwarding(tx);

        publisher.subscribe(Arc::clone(&consumer));
        publisher.subscribe(Arc::clone(&consumer));
        assert_eq!(publisher.subscriber_count(), 1);

        publisher.unsubscribe(&consumer);
        assert_eq!(publisher.subscriber_count(), 0);
    }

    #[test]
    fn test_unsubscribed_consumer_is_not_called() {
        let publisher = publisher();
        let (tx, rx) = mpsc::channel();
        let consumer = forwarding(tx);
        publisher.subscribe(Arc::clone(&consumer));
        publisher.unsubscribe(&consumer);

        publisher.publish(Observation::now(3.0));
        publisher.shutdown(WAIT);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_panicking_consumer_does_not_affect_others() {
        let publisher = publisher();
        let (tx, rx) = mpsc::channel();
        let failing: Arc<dyn ObservationConsumer<f64>> =
            Arc::new(|_: &Observation<f64>| panic!("consumer failure"));
        publisher.subscribe(failing);
        publisher.subscribe(forwarding(tx));

        publisher.publish(Observation::now(4.0));
        publisher.publish(Observation::now(5.0));

        let mut received = vec![rx.recv_timeout(WAIT).unwrap(), rx.recv_timeout(WAIT).unwrap()];
        received.sort_by(f64::total_cmp);
        assert_eq!(received, vec![4.0, 5.0]);
    }

    struct OneShot(Mutex<mpsc::Sender<f64>>);

    impl ObservationConsumer<f64> for OneShot {
        fn consume(&self, _source: &dyn ObservationProvider<f64>, observation: &Observation<f64>) {
            let _ = self.0.lock().unwrap().send(*observation.value());
        }
    }

    #[test]
    fn test_consumer_sees_source() {
        struct Unsubscriber(Mutex<Option<Arc<dyn ObservationConsumer<f64>>>>);

        impl ObservationConsumer<f64> for Unsubscriber {
            fn consume(&self, source: &dyn ObservationProvider<f64>, _: &Observation<f64>) {
                if let Some(me) = self.0.lock().unwrap().take() {
                    source.unsubscribe(&me);
                }
            }
        }

        let publisher = publisher();
        let (tx, rx) = mpsc::channel();
        let watcher: Arc<dyn ObservationConsumer<f64>> = Arc::new(OneShot(Mutex::new(tx)));
        let unsubscriber = Arc::new(Unsubscriber(Mutex::new(None)));
        let handle: Arc<dyn ObservationConsumer<f64>> = unsubscriber.clone();
        *unsubscriber.0.lock().unwrap() = Some(Arc::clone(&handle));

        publisher.subscribe(handle);
        publisher.subscribe(watcher);
        assert_eq!(publisher.subscriber_count(), 2);

        publisher.publish(Observation::now(6.0));
        assert_eq!(rx.recv_timeout(WAIT).unwrap(), 6.0);
        publisher.shutdown(WAIT);
    }
}
