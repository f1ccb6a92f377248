//! Health monitoring for resource pools

use crate::ledger::PoolStats;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Health status of a resource pool
///
/// # Examples
///
/// ```
/// use esox_resourcepool::ResourcePool;
///
/// let pool: ResourcePool<u8> = ResourcePool::new(|| 0, 3).unwrap();
///
/// let health = pool.health_status();
/// assert!(health.is_healthy());
/// assert_eq!(health.available, 3);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct HealthStatus {
    /// Whether the pool is healthy
    pub is_healthy: bool,

    /// Number of warnings detected
    pub warning_count: usize,

    /// Current pool utilization (0.0 to 1.0)
    pub utilization: f64,

    /// Available resources count
    pub available: usize,

    /// Checked-out resources count
    pub checked_out: usize,

    /// Total capacity
    pub total_capacity: usize,

    /// Longest current checkout
    pub longest_checkout: Option<Duration>,

    /// Warning messages
    pub warnings: Vec<String>,
}

impl HealthStatus {
    /// Derive a health status from a stats snapshot
    pub fn from_stats<A>(stats: &PoolStats<A>, long_checkout_threshold: Option<Duration>) -> Self {
        let available = stats.available_count();
        let checked_out = stats.checked_out_count();
        let capacity = available + checked_out;
        let longest_checkout = stats.longest_checkout();

        let utilization = if capacity > 0 {
            checked_out as f64 / capacity as f64
        } else {
            0.0
        };

        let mut warnings = Vec::new();
        let mut is_healthy = true;

        if utilization > 0.9 {
            warnings.push(format!("High utilization: {:.1}%", utilization * 100.0));
            is_healthy = false;
        }

        if available == 0 && capacity > 0 {
            warnings.push("Pool is exhausted".to_string());
        }

        if let Some(threshold) = long_checkout_threshold {
            let overdue = stats
                .checked_out
                .iter()
                .filter(|(_, (held, _))| *held > threshold)
                .count();
            if overdue > 0 {
                warnings.push(format!(
                    "{overdue} checkout(s) held longer than {threshold:?}"
                ));
                is_healthy = false;
            }
        }

        Self {
            is_healthy,
            warning_count: warnings.len(),
            utilization,
            available,
            checked_out,
            total_capacity: capacity,
            longest_checkout,
            warnings,
        }
    }

    /// Check if the pool is healthy
    pub fn is_healthy(&self) -> bool {
        self.is_healthy
    }
}
