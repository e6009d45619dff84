use thiserror::Error;

/// Error type for starting a publisher
#[derive(Debug, Error)]
pub enum ObserveError {
    #[error("worker pool needs at least one worker")]
    NoWorkers,

    #[error("failed to start worker pool: {0}")]
    Runtime(#[from] std::io::Error),
}
