//! How long an acquisition may wait for a free resource

use std::time::{Duration, Instant};

/// Wait bound for [`ResourcePool::acquire`](crate::ResourcePool::acquire).
///
/// # Examples
///
/// ```
/// use esox_resourcepool::AcquireTimeout;
/// use std::time::Duration;
///
/// assert_eq!(AcquireTimeout::from(None), AcquireTimeout::Unbounded);
/// assert_eq!(AcquireTimeout::from(Duration::ZERO), AcquireTimeout::Immediate);
/// assert_eq!(
///     AcquireTimeout::from(Some(Duration::from_millis(5))),
///     AcquireTimeout::After(Duration::from_millis(5)),
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AcquireTimeout {
    /// Wait until a resource is released, however long that takes
    #[default]
    Unbounded,

    /// Take whatever is free right now, never wait
    Immediate,

    /// Wait at most this long
    After(Duration),
}

impl AcquireTimeout {
    /// Deadline for this timeout measured from `start`, if it has one.
    ///
    /// A duration too long to represent as an `Instant` has no deadline.
    pub(crate) fn deadline_from(self, start: Instant) -> Option<Instant> {
        match self {
            AcquireTimeout::Unbounded => None,
            AcquireTimeout::Immediate => Some(start),
            AcquireTimeout::After(duration) => start.checked_add(duration),
        }
    }
}

impl From<Duration> for AcquireTimeout {
    fn from(duration: Duration) -> Self {
        if duration.is_zero() {
            AcquireTimeout::Immediate
        } else {
            AcquireTimeout::After(duration)
        }
    }
}

impl From<Option<Duration>> for AcquireTimeout {
    fn from(duration: Option<Duration>) -> Self {
        duration.map_or(AcquireTimeout::Unbounded, AcquireTimeout::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadlines() {
        let start = Instant::now();
        assert_eq!(AcquireTimeout::Unbounded.deadline_from(start), None);
        assert_eq!(AcquireTimeout::Immediate.deadline_from(start), Some(start));
        assert_eq!(
            AcquireTimeout::After(Duration::from_secs(2)).deadline_from(start),
            Some(start + Duration::from_secs(2))
        );
    }

    #[test]
    fn test_unrepresentable_deadline_is_unbounded() {
        let start = Instant::now();
        assert_eq!(AcquireTimeout::After(Duration::MAX).deadline_from(start), None);
        assert_eq!(
            AcquireTimeout::from(Duration::from_secs(u64::MAX)).deadline_from(start),
            None
        );
    }

    #[test]
    fn test_default_is_unbounded() {
        assert_eq!(AcquireTimeout::default(), AcquireTimeout::Unbounded);
    }
}
