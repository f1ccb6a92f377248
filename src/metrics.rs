//! Metrics collection and export for resource pools

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

#[cfg(feature = "metrics")]
use crate::errors::{PoolError, PoolResult};
#[cfg(feature = "metrics")]
use crate::labels::LabelSet;
#[cfg(feature = "serde")]
use serde::Serialize;

/// Metrics data for a pool
///
/// # Examples
///
/// ```
/// use esox_resourcepool::{AcquireTimeout, ResourcePool};
///
/// let pool = ResourcePool::new(|| 0u8, 3).unwrap();
///
/// {
///     let _conn = pool.acquire(AcquireTimeout::Immediate, ()).unwrap();
///     let metrics = pool.metrics();
///     assert_eq!(metrics.total_acquired, 1);
///     assert_eq!(metrics.checked_out, 1);
/// }
///
/// assert_eq!(pool.metrics().total_released, 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PoolMetrics {
    /// Successful acquisitions
    pub total_acquired: usize,

    /// Releases back into the pool
    pub total_released: usize,

    /// Acquisitions that gave up waiting
    pub acquire_timeouts: usize,

    /// Resources currently checked out
    pub checked_out: usize,

    /// Resources currently available
    pub available: usize,

    /// Highest number of simultaneous checkouts seen
    pub peak_checked_out: usize,

    /// Checked-out share of capacity (0.0 to 1.0)
    pub utilization: f64,

    /// Fixed pool size
    pub capacity: usize,
}

impl PoolMetrics {
    /// Export metrics as a HashMap
    pub fn export(&self) -> HashMap<String, String> {
        let mut metrics = HashMap::new();
        metrics.insert("total_acquired".to_string(), self.total_acquired.to_string());
        metrics.insert("total_released".to_string(), self.total_released.to_string());
        metrics.insert("acquire_timeouts".to_string(), self.acquire_timeouts.to_string());
        metrics.insert("checked_out".to_string(), self.checked_out.to_string());
        metrics.insert("available".to_string(), self.available.to_string());
        metrics.insert("peak_checked_out".to_string(), self.peak_checked_out.to_string());
        metrics.insert("utilization".to_string(), format!("{:.2}", self.utilization));
        metrics.insert("capacity".to_string(), self.capacity.to_string());
        metrics
    }
}

/// Metrics exporter for Prometheus format
pub struct MetricsExporter;

#[cfg(feature = "metrics")]
impl MetricsExporter {
    /// Export metrics in Prometheus exposition format
    ///
    /// # Examples
    ///
    /// ```
    /// use esox_resourcepool::{LabelSet, PoolConfiguration, ResourcePool};
    ///
    /// let tags = LabelSet::new([("service", "api")]).unwrap();
    /// let config = PoolConfiguration::new().with_size(2).with_name("db").with_tags(tags);
    /// let pool = ResourcePool::<u8>::with_configuration(|| Ok::<_, std::io::Error>(0), config).unwrap();
    ///
    /// let output = pool.export_metrics_prometheus().unwrap();
    /// assert!(output.contains("resourcepool_resources_checked_out"));
    /// assert!(output.contains("pool=\"db\""));
    /// assert!(output.contains("service=\"api\""));
    /// ```
    pub fn export_prometheus(
        metrics: &PoolMetrics,
        pool_name: &str,
        tags: Option<&LabelSet>,
    ) -> PoolResult<String> {
        use prometheus::{Encoder, TextEncoder};

        Self::render(metrics, pool_name, tags)
            .and_then(|registry| {
                let mut buffer = Vec::new();
                TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
                Ok(buffer)
            })
            .map_err(|e| PoolError::MetricsExport(e.to_string()))
            .and_then(|buffer| {
                String::from_utf8(buffer).map_err(|e| PoolError::MetricsExport(e.to_string()))
            })
    }

    fn render(
        metrics: &PoolMetrics,
        pool_name: &str,
        tags: Option<&LabelSet>,
    ) -> prometheus::Result<prometheus::Registry> {
        use prometheus::{Gauge, IntCounter, IntGauge, Opts, Registry};

        let labels = Self::format_labels(pool_name, tags);
        let opts = |name: &str, help: &str| Opts::new(name, help).const_labels(labels.clone());
        let registry = Registry::new();

        // Gauge metrics
        let gauges = [
            ("resourcepool_resources_checked_out", "Current checked-out resources", metrics.checked_out),
            ("resourcepool_resources_available", "Current available resources", metrics.available),
            ("resourcepool_resources_peak_checked_out", "Highest simultaneous checkouts", metrics.peak_checked_out),
            ("resourcepool_capacity", "Fixed pool size", metrics.capacity),
        ];
        for (name, help, value) in gauges {
            let gauge = IntGauge::with_opts(opts(name, help))?;
            gauge.set(value as i64);
            registry.register(Box::new(gauge))?;
        }

        let utilization = Gauge::with_opts(opts("resourcepool_utilization", "Pool utilization ratio"))?;
        utilization.set(metrics.utilization);
        registry.register(Box::new(utilization))?;

        // Counter metrics
        let counters = [
            ("resourcepool_acquired_total", "Total successful acquisitions", metrics.total_acquired),
            ("resourcepool_released_total", "Total releases", metrics.total_released),
            ("resourcepool_acquire_timeouts_total", "Acquisitions that timed out", metrics.acquire_timeouts),
        ];
        for (name, help, value) in counters {
            let counter = IntCounter::with_opts(opts(name, help))?;
            counter.inc_by(value as u64);
            registry.register(Box::new(counter))?;
        }

        Ok(registry)
    }

    /// Tags plus the `pool` label; a tag named `pool` never overrides the
    /// pool name.
    fn format_labels(pool_name: &str, tags: Option<&LabelSet>) -> HashMap<String, String> {
        let mut labels = HashMap::new();

        if let Some(tags) = tags {
            for (key, value) in tags.iter() {
                labels.insert(key.to_string(), value.to_string());
            }
        }

        labels.insert("pool".to_string(), pool_name.to_string());
        labels
    }
}

/// Internal metrics tracker
pub(crate) struct MetricsTracker {
    pub total_acquired: AtomicUsize,
    pub total_released: AtomicUsize,
    pub acquire_timeouts: AtomicUsize,
    pub peak_checked_out: AtomicUsize,
}

impl MetricsTracker {
    pub fn new() -> Self {
        Self {
            total_acquired: AtomicUsize::new(0),
            total_released: AtomicUsize::new(0),
            acquire_timeouts: AtomicUsize::new(0),
            peak_checked_out: AtomicUsize::new(0),
        }
    }

    pub fn record_acquired(&self, checked_out: usize) {
        self.total_acquired.fetch_add(1, Ordering::Relaxed);
        self.peak_checked_out.fetch_max(checked_out, Ordering::Relaxed);
    }

    pub fn record_released(&self) {
        self.total_released.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_timeout(&self) {
        self.acquire_timeouts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_metrics(&self, checked_out: usize, available: usize, capacity: usize) -> PoolMetrics {
        let utilization = if capacity > 0 {
            checked_out as f64 / capacity as f64
        } else {
            0.0
        };

        PoolMetrics {
            total_acquired: self.total_acquired.load(Ordering::Relaxed),
            total_released: self.total_released.load(Ordering::Relaxed),
            acquire_timeouts: self.acquire_timeouts.load(Ordering::Relaxed),
            checked_out,
            available,
            peak_checked_out: self.peak_checked_out.load(Ordering::Relaxed),
            utilization,
            capacity,
        }
    }
}

impl Default for MetricsTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_counts_and_peak() {
        let tracker = MetricsTracker::new();
        tracker.record_acquired(1);
        tracker.record_acquired(2);
        tracker.record_released();
        tracker.record_acquired(2);
        tracker.record_timeout();

        let metrics = tracker.get_metrics(2, 2, 4);
        assert_eq!(metrics.total_acquired, 3);
        assert_eq!(metrics.total_released, 1);
        assert_eq!(metrics.acquire_timeouts, 1);
        assert_eq!(metrics.peak_checked_out, 2);
        assert!((metrics.utilization - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_export_map() {
        let metrics = MetricsTracker::new().get_metrics(1, 3, 4);
        let exported = metrics.export();

        assert_eq!(exported["checked_out"], "1");
        assert_eq!(exported["available"], "3");
        assert_eq!(exported["utilization"], "0.25");
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn test_prometheus_output() {
        let tracker = MetricsTracker::new();
        tracker.record_acquired(1);
        tracker.record_timeout();
        let metrics = tracker.get_metrics(1, 1, 2);
        let tags = LabelSet::new([("service", "api")]).unwrap();

        let output = MetricsExporter::export_prometheus(&metrics, "db", Some(&tags)).unwrap();

        assert!(output.contains("# TYPE resourcepool_resources_checked_out gauge"));
        assert!(output.contains("# TYPE resourcepool_acquired_total counter"));
        assert!(output.contains("pool=\"db\""));
        assert!(output.contains("service=\"api\""));
        assert!(output
            .lines()
            .any(|line| line.starts_with("resourcepool_utilization{") && line.ends_with("} 0.5")));
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn test_pool_tag_does_not_replace_pool_name() {
        let metrics = MetricsTracker::new().get_metrics(0, 1, 1);
        let tags = LabelSet::new([("pool", "impostor"), ("service", "api")]).unwrap();

        let labels = MetricsExporter::format_labels("db", Some(&tags));
        assert_eq!(labels["pool"], "db");
        assert_eq!(labels["service"], "api");

        let output = MetricsExporter::export_prometheus(&metrics, "db", Some(&tags)).unwrap();
        assert!(output.contains("pool=\"db\""));
        assert!(!output.contains("impostor"));
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn test_prometheus_rejects_invalid_label_name() {
        let metrics = MetricsTracker::new().get_metrics(0, 1, 1);
        let tags = LabelSet::new([("1st", "x")]).unwrap();

        let err = MetricsExporter::export_prometheus(&metrics, "db", Some(&tags)).unwrap_err();
        assert!(matches!(err, PoolError::MetricsExport(_)));
    }
}
