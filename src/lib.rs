//! # EsoxSolutions.ResourcePool
//!
//! Fixed-size, thread-safe pool of reusable resources such as network
//! connections, with scoped checkout, bounded waits and usage snapshots.
//!
//! ## Features
//!
//! - Resources built up front by a factory, never created or destroyed later
//! - Most-recently-released resource handed out first (LIFO)
//! - Automatic return of resources via RAII (Drop trait), including on panic
//! - Blocking acquisition with optional timeout; a timeout yields `None`
//! - Async acquisition for tokio tasks
//! - Per-checkout annotations and point-in-time usage stats
//! - Health status, metrics and Prometheus export
//! - `LabelSet` for tagging pools with validated named constants
//!
//! ## Quick Start
//!
//! ```rust
//! use esox_resourcepool::{AcquireTimeout, ResourcePool};
//! use std::time::Duration;
//!
//! let pool = ResourcePool::new(|| String::from("connection"), 3).unwrap();
//! {
//!     let conn = pool.acquire(Duration::from_secs(1), "report job").unwrap();
//!     println!("Got: {}", *conn);
//!     // Resource automatically returned when `conn` goes out of scope
//! }
//!
//! // No resource within the timeout is a normal outcome, not an error
//! let held: Vec<_> = (0..3).filter_map(|_| pool.acquire(AcquireTimeout::Immediate, "hog")).collect();
//! assert!(pool.acquire(AcquireTimeout::Immediate, "late").is_none());
//! drop(held);
//! ```

mod pool;
mod config;
mod metrics;
mod health;
mod ledger;
mod stack;
mod timeout;
mod labels;
mod errors;

pub use pool::{ResourcePool, ScopedResource};
pub use config::PoolConfiguration;
pub use metrics::{PoolMetrics, MetricsExporter};
pub use health::HealthStatus;
pub use ledger::{PoolStats, ResourceId};
pub use timeout::AcquireTimeout;
pub use labels::{Label, LabelSet};
pub use errors::{LabelError, PoolError, PoolResult};
