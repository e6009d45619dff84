//! Measure Observe - Timestamped observations for subscribers
//!
//! A `Publisher` stores the latest observation and hands each one to every
//! subscribed consumer on a worker pool, so a slow or failing consumer does
//! not hold up the publisher or the other consumers. It is generic over the
//! observed value and knows nothing about units.

mod config;
mod error;
mod observation;
mod publisher;

pub use config::{ObserveConfig, WORKERS_ENV};
pub use error::ObserveError;
pub use observation::{Observation, ObservationConsumer, ObservationProvider};
pub use publisher::Publisher;
