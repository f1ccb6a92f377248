//! Core resource pool implementation

use crate::config::PoolConfiguration;
use crate::errors::{PoolError, PoolResult};
use crate::health::HealthStatus;
use crate::ledger::{Ledger, PoolStats, ResourceId};
use crate::metrics::{MetricsTracker, PoolMetrics};
use crate::stack::FreeStack;
use crate::timeout::AcquireTimeout;

#[cfg(feature = "metrics")]
use crate::metrics::MetricsExporter;

use parking_lot::Mutex;
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// How often `acquire_async` re-checks the free stack while waiting.
const ASYNC_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// A checked-out resource that goes back to the pool when dropped
///
/// Dropping happens on every way out of the holder's scope: normal return,
/// `?` propagation, or a panic unwinding through it.
pub struct ScopedResource<R, A = ()> {
    resource: Option<R>,
    id: ResourceId,
    shared: Arc<Shared<R, A>>,
}

impl<R, A> ScopedResource<R, A> {
    /// Identity of the held resource, as reported by [`ResourcePool::stats`]
    pub fn id(&self) -> ResourceId {
        self.id
    }
}

impl<R, A> Deref for ScopedResource<R, A> {
    type Target = R;

    fn deref(&self) -> &Self::Target {
        self.resource.as_ref().expect("resource already released")
    }
}

impl<R, A> DerefMut for ScopedResource<R, A> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.resource.as_mut().expect("resource already released")
    }
}

impl<R, A> Drop for ScopedResource<R, A> {
    fn drop(&mut self) {
        if let Some(resource) = self.resource.take() {
            self.shared.release(self.id, resource);
        }
    }
}

impl<R: fmt::Debug, A> fmt::Debug for ScopedResource<R, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedResource")
            .field("id", &self.id)
            .field("resource", &self.resource)
            .finish()
    }
}

struct Shared<R, A> {
    free: FreeStack<R>,
    ledger: Mutex<Ledger<A>>,
    metrics: MetricsTracker,
    config: PoolConfiguration,
}

impl<R, A> Shared<R, A> {
    fn mark_acquired(&self, id: ResourceId, annotation: A) {
        let checked_out = {
            let mut ledger = self.ledger.lock();
            ledger.mark_acquired(id, annotation, Instant::now());
            ledger.checked_out_count()
        };

        self.metrics.record_acquired(checked_out);
        trace!(pool = %self.config.name, resource = %id, checked_out, "resource acquired");
    }

    /// Return a resource to the ledger and the free stack in one step.
    ///
    /// The push happens under the ledger lock so an acquirer that pops this
    /// resource can only record its checkout after the release is recorded.
    fn release(&self, id: ResourceId, resource: R) {
        let mut ledger = self.ledger.lock();
        let annotation = ledger.mark_released(id, Instant::now());
        self.free.push(id, resource);
        drop(ledger);
        drop(annotation);

        self.metrics.record_released();
        trace!(pool = %self.config.name, resource = %id, "resource released");
    }
}

/// Thread-safe pool over a fixed set of pre-built resources
///
/// Resources are handed out most-recently-released first, so under light
/// load a small subset stays in use. Each checkout carries a caller-supplied
/// annotation of type `A`, visible through [`stats`](Self::stats).
///
/// Cloning the pool is cheap; clones share the same resources.
///
/// # Examples
///
/// ```
/// use esox_resourcepool::{AcquireTimeout, ResourcePool};
///
/// let pool = ResourcePool::new(|| Vec::<u8>::new(), 2).unwrap();
///
/// if let Some(mut buf) = pool.acquire(AcquireTimeout::Unbounded, "job1") {
///     buf.push(1);
///     assert_eq!(pool.stats().checked_out.len(), 1);
/// }
///
/// assert_eq!(pool.stats().available.len(), 2);
/// ```
pub struct ResourcePool<R, A = ()> {
    shared: Arc<Shared<R, A>>,
}

impl<R, A> Clone for ResourcePool<R, A> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<R, A> fmt::Debug for ResourcePool<R, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourcePool")
            .field("name", &self.shared.config.name)
            .field("capacity", &self.shared.config.size)
            .field("available", &self.available_count())
            .field("free", &self.shared.free.len())
            .finish()
    }
}

impl<R, A> ResourcePool<R, A> {
    /// Create a pool of `size` resources, calling `factory` once for each
    pub fn new<F>(mut factory: F, size: usize) -> PoolResult<Self>
    where
        F: FnMut() -> R,
    {
        Self::try_new(|| Ok::<_, Infallible>(factory()), size)
    }

    /// Create a pool of `size` resources from a fallible factory
    ///
    /// The first factory failure aborts construction; resources built so
    /// far are dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use esox_resourcepool::{PoolError, ResourcePool};
    ///
    /// let mut built = 0;
    /// let result = ResourcePool::<u32>::try_new(
    ///     || {
    ///         built += 1;
    ///         if built == 3 { Err("connection refused") } else { Ok(built) }
    ///     },
    ///     5,
    /// );
    ///
    /// assert!(matches!(result, Err(PoolError::Factory { index: 2, .. })));
    /// ```
    pub fn try_new<F, E>(factory: F, size: usize) -> PoolResult<Self>
    where
        F: FnMut() -> Result<R, E>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::with_configuration(factory, PoolConfiguration::new().with_size(size))
    }

    /// Create a pool described by `config`
    pub fn with_configuration<F, E>(mut factory: F, config: PoolConfiguration) -> PoolResult<Self>
    where
        F: FnMut() -> Result<R, E>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let size = config.size;
        if size == 0 {
            return Err(PoolError::InvalidSize(size));
        }

        let free = FreeStack::with_capacity(size);
        let mut ledger = Ledger::with_capacity(size);

        for index in 0..size {
            let resource = factory().map_err(|e| {
                let source: Box<dyn std::error::Error + Send + Sync> = e.into();
                warn!(pool = %config.name, index, error = %source, "resource factory failed");
                PoolError::Factory { index, source }
            })?;

            let id = ResourceId::new(index);
            ledger.register(id, Instant::now());
            free.push(id, resource);
        }

        debug!(pool = %config.name, size, "resource pool created");

        Ok(Self {
            shared: Arc::new(Shared {
                free,
                ledger: Mutex::new(ledger),
                metrics: MetricsTracker::new(),
                config,
            }),
        })
    }

    /// Check out a resource, waiting up to `timeout` for one to be free
    ///
    /// Returns `None` if nothing was released in time. The resource goes
    /// back to the pool when the returned guard is dropped.
    pub fn acquire(
        &self,
        timeout: impl Into<AcquireTimeout>,
        annotation: A,
    ) -> Option<ScopedResource<R, A>> {
        let timeout = timeout.into();
        match self.shared.free.pop(timeout) {
            Some((id, resource)) => Some(self.check_out(id, resource, annotation)),
            None => {
                self.record_timeout(timeout);
                None
            }
        }
    }

    /// Check out a resource using the configured default timeout
    pub fn acquire_default(&self, annotation: A) -> Option<ScopedResource<R, A>> {
        self.acquire(self.shared.config.default_timeout, annotation)
    }

    /// Check out a resource only if one is free right now
    pub fn try_acquire(&self, annotation: A) -> Option<ScopedResource<R, A>> {
        self.acquire(AcquireTimeout::Immediate, annotation)
    }

    /// Run `f` with a checked-out resource
    ///
    /// Returns `None` without calling `f` if no resource became free within
    /// `timeout`. The resource is released however `f` exits, including by
    /// panicking.
    ///
    /// # Examples
    ///
    /// ```
    /// use esox_resourcepool::ResourcePool;
    /// use std::time::Duration;
    ///
    /// let pool = ResourcePool::new(|| 40, 1).unwrap();
    ///
    /// let answer = pool.scoped(Duration::from_secs(1), "compute", |n| *n + 2);
    /// assert_eq!(answer, Some(42));
    /// assert_eq!(pool.available_count(), 1);
    /// ```
    pub fn scoped<T, F>(&self, timeout: impl Into<AcquireTimeout>, annotation: A, f: F) -> Option<T>
    where
        F: FnOnce(&mut R) -> T,
    {
        let mut resource = self.acquire(timeout, annotation)?;
        Some(f(&mut *resource))
    }

    /// Check out a resource from an async task
    ///
    /// Waits without blocking the executor thread. Dropping the returned
    /// future before it completes leaves the pool untouched.
    pub async fn acquire_async(
        &self,
        timeout: impl Into<AcquireTimeout>,
        annotation: A,
    ) -> Option<ScopedResource<R, A>> {
        let timeout = timeout.into();
        let poll = async {
            loop {
                if let Some(slot) = self.shared.free.pop(AcquireTimeout::Immediate) {
                    return slot;
                }
                tokio::time::sleep(ASYNC_POLL_INTERVAL).await;
            }
        };

        let slot = match timeout {
            AcquireTimeout::Unbounded => Some(poll.await),
            AcquireTimeout::Immediate => self.shared.free.pop(AcquireTimeout::Immediate),
            AcquireTimeout::After(duration) => tokio::time::timeout(duration, poll).await.ok(),
        };

        match slot {
            Some((id, resource)) => Some(self.check_out(id, resource, annotation)),
            None => {
                self.record_timeout(timeout);
                None
            }
        }
    }

    /// Snapshot of available and checked-out resources
    ///
    /// Read at a single instant under the pool lock. Other threads may have
    /// acquired or released by the time the caller looks at it.
    pub fn stats(&self) -> PoolStats<A>
    where
        A: Clone,
    {
        self.shared.ledger.lock().snapshot(Instant::now())
    }

    /// Get health status
    pub fn health_status(&self) -> HealthStatus {
        let stats = self.shared.ledger.lock().snapshot_map(Instant::now(), |_| ());
        HealthStatus::from_stats(&stats, self.shared.config.long_checkout_threshold)
    }

    /// Get pool metrics
    pub fn metrics(&self) -> PoolMetrics {
        let (checked_out, available) = {
            let ledger = self.shared.ledger.lock();
            (ledger.checked_out_count(), ledger.available_count())
        };
        self.shared
            .metrics
            .get_metrics(checked_out, available, self.shared.config.size)
    }

    /// Export metrics
    pub fn export_metrics(&self) -> HashMap<String, String> {
        self.metrics().export()
    }

    /// Export metrics in Prometheus format, labelled with the pool name and
    /// configured tags
    #[cfg(feature = "metrics")]
    pub fn export_metrics_prometheus(&self) -> PoolResult<String> {
        let config = &self.shared.config;
        MetricsExporter::export_prometheus(&self.metrics(), &config.name, config.tags.as_ref())
    }

    /// Resources free right now, according to the ledger
    pub fn available_count(&self) -> usize {
        self.shared.ledger.lock().available_count()
    }

    /// Resources checked out right now, according to the ledger
    pub fn checked_out_count(&self) -> usize {
        self.shared.ledger.lock().checked_out_count()
    }

    /// Fixed number of resources in the pool
    pub fn capacity(&self) -> usize {
        self.shared.config.size
    }

    pub fn name(&self) -> &str {
        &self.shared.config.name
    }

    fn check_out(&self, id: ResourceId, resource: R, annotation: A) -> ScopedResource<R, A> {
        self.shared.mark_acquired(id, annotation);
        ScopedResource {
            resource: Some(resource),
            id,
            shared: Arc::clone(&self.shared),
        }
    }

    fn record_timeout(&self, timeout: AcquireTimeout) {
        self.shared.metrics.record_timeout();
        debug!(pool = %self.shared.config.name, ?timeout, "no resource available before timeout");
    }
}
