//! Error types returned by the filter engine.
//!
//! `FilterError` covers everything that aborts a run. `DegenerateWeight` is the
//! per-pixel condition the workers recover from locally; it never leaves a run.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("invalid filter configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid image: {0}")]
    InvalidImage(String),
    #[error("failed to allocate {bytes} bytes for working buffers")]
    AllocationFailure { bytes: usize },
    #[error("failed to spawn worker thread {index}: {source}")]
    ThreadSpawn {
        index: usize,
        #[source]
        source: std::io::Error,
    },
    #[error("worker thread {index} panicked")]
    WorkerPanicked { index: usize },
    #[error("filter run cancelled")]
    Cancelled,
}

impl FilterError {
    pub(crate) fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

/// A pixel whose neighborhood contributed no usable weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("degenerate weight sum at ({x}, {y})")]
pub struct DegenerateWeight {
    pub x: usize,
    pub y: usize,
}
