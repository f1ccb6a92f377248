//! Pool configuration options

use crate::labels::LabelSet;
use crate::timeout::AcquireTimeout;
use std::time::Duration;

/// Configuration for resource pool behavior
///
/// # Examples
///
/// ```
/// use esox_resourcepool::{AcquireTimeout, PoolConfiguration};
/// use std::time::Duration;
///
/// let config = PoolConfiguration::new()
///     .with_size(8)
///     .with_name("db")
///     .with_default_timeout(Duration::from_secs(5))
///     .with_long_checkout_threshold(Duration::from_secs(60));
///
/// assert_eq!(config.size, 8);
/// assert_eq!(config.name, "db");
/// assert_eq!(config.default_timeout, AcquireTimeout::After(Duration::from_secs(5)));
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfiguration {
    /// Number of resources built up front
    pub size: usize,

    /// Name used in log fields and metric labels
    pub name: String,

    /// Wait bound used by `acquire_default`
    pub default_timeout: AcquireTimeout,

    /// Extra labels attached to exported metrics
    pub tags: Option<LabelSet>,

    /// Checkouts held longer than this make the pool report unhealthy
    pub long_checkout_threshold: Option<Duration>,
}

impl Default for PoolConfiguration {
    fn default() -> Self {
        Self {
            size: 10,
            name: "default".to_string(),
            default_timeout: AcquireTimeout::After(Duration::from_secs(30)),
            tags: None,
            long_checkout_threshold: None,
        }
    }
}

impl PoolConfiguration {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of pooled resources
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the timeout used by `acquire_default`
    ///
    /// Accepts a `Duration`, an `Option<Duration>` (`None` waits forever) or
    /// an [`AcquireTimeout`].
    pub fn with_default_timeout(mut self, timeout: impl Into<AcquireTimeout>) -> Self {
        self.default_timeout = timeout.into();
        self
    }

    /// Attach labels to exported metrics
    ///
    /// # Examples
    ///
    /// ```
    /// use esox_resourcepool::{LabelSet, PoolConfiguration};
    ///
    /// let tags = LabelSet::new([("service", "api"), ("region", "eu-west")]).unwrap();
    /// let config = PoolConfiguration::new().with_tags(tags);
    ///
    /// assert_eq!(config.tags.unwrap().get("service"), Some("api"));
    /// ```
    pub fn with_tags(mut self, tags: LabelSet) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn with_long_checkout_threshold(mut self, threshold: Duration) -> Self {
        self.long_checkout_threshold = Some(threshold);
        self
    }
}
