//! Error types for the resource pool

use thiserror::Error;

/// Errors raised while building or exporting a pool.
///
/// Running out of time while waiting for a resource is not an error; see
/// [`ResourcePool::acquire`](crate::ResourcePool::acquire).
#[derive(Error, Debug)]
pub enum PoolError {
    #[error("Pool size must be positive, got {0}")]
    InvalidSize(usize),

    #[error("Resource factory failed while creating resource #{index}: {source}")]
    Factory {
        index: usize,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to export metrics: {0}")]
    MetricsExport(String),
}

/// Errors raised while building a [`LabelSet`](crate::LabelSet).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LabelError {
    #[error("Label \"{name}\" conflicts with existing label of value \"{existing}\"")]
    Conflict { name: String, existing: String },

    #[error("Label name must not be empty")]
    EmptyName,
}

pub type PoolResult<T> = Result<T, PoolError>;
