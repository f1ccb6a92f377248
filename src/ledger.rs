//! Bookkeeping of which resources are available and which are checked out

use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Identity of a pooled resource.
///
/// Ids are dense, assigned `0..size` in the order the factory produced the
/// resources. Two resources that compare equal by value still get distinct
/// ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ResourceId(usize);

impl ResourceId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the resource in factory order
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "resource#{}", self.0)
    }
}

/// Point-in-time view of the pool's tracking maps.
///
/// Taken under the ledger lock at a single instant, but stale as soon as it
/// is returned: other threads keep acquiring and releasing.
///
/// # Examples
///
/// ```
/// use esox_resourcepool::{AcquireTimeout, ResourcePool};
///
/// let pool = ResourcePool::new(|| String::from("conn"), 2).unwrap();
/// let conn = pool.acquire(AcquireTimeout::Unbounded, "job1").unwrap();
///
/// let stats = pool.stats();
/// assert_eq!(stats.available.len(), 1);
/// assert_eq!(stats.checked_out.len(), 1);
/// assert_eq!(stats.checked_out[0].0, conn.id());
/// assert_eq!((stats.checked_out[0].1).1, "job1");
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PoolStats<A> {
    /// Free resources and how long each has been free, ordered by id
    pub available: Vec<(ResourceId, Duration)>,

    /// Held resources with how long they have been held and the caller's
    /// annotation, ordered by id
    pub checked_out: Vec<(ResourceId, (Duration, A))>,
}

impl<A> PoolStats<A> {
    pub fn available_count(&self) -> usize {
        self.available.len()
    }

    pub fn checked_out_count(&self) -> usize {
        self.checked_out.len()
    }

    /// Longest time any resource in the snapshot has been held
    pub fn longest_checkout(&self) -> Option<Duration> {
        self.checked_out.iter().map(|(_, (held, _))| *held).max()
    }

    /// Annotation of a checked-out resource, if it was held at snapshot time
    pub fn annotation_of(&self, id: ResourceId) -> Option<&A> {
        self.checked_out
            .iter()
            .find(|(checked_out, _)| *checked_out == id)
            .map(|(_, (_, annotation))| annotation)
    }
}

/// The two tracking maps. Every registered resource is in exactly one.
///
/// Callers hold the pool's ledger lock around every method.
pub(crate) struct Ledger<A> {
    available: HashMap<ResourceId, Instant>,
    checked_out: HashMap<ResourceId, (Instant, A)>,
}

impl<A> Ledger<A> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            available: HashMap::with_capacity(capacity),
            checked_out: HashMap::with_capacity(capacity),
        }
    }

    /// Record a freshly built resource as available.
    pub fn register(&mut self, id: ResourceId, now: Instant) {
        assert!(
            !self.available.contains_key(&id) && !self.checked_out.contains_key(&id),
            "{id} registered twice"
        );
        self.available.insert(id, now);
    }

    /// Move `id` from available to checked out.
    ///
    /// # Panics
    ///
    /// If `id` is not currently available.
    pub fn mark_acquired(&mut self, id: ResourceId, annotation: A, now: Instant) {
        assert!(
            self.available.remove(&id).is_some(),
            "mark_acquired: {id} is not in the available map"
        );
        self.checked_out.insert(id, (now, annotation));
    }

    /// Move `id` from checked out back to available, returning its
    /// annotation.
    ///
    /// # Panics
    ///
    /// If `id` is not currently checked out.
    pub fn mark_released(&mut self, id: ResourceId, now: Instant) -> A {
        let Some((_, annotation)) = self.checked_out.remove(&id) else {
            panic!("mark_released: {id} is not in the checked-out map");
        };
        self.available.insert(id, now);
        annotation
    }

    pub fn available_count(&self) -> usize {
        self.available.len()
    }

    pub fn checked_out_count(&self) -> usize {
        self.checked_out.len()
    }

    pub fn snapshot(&self, now: Instant) -> PoolStats<A>
    where
        A: Clone,
    {
        self.snapshot_map(now, A::clone)
    }

    /// Like `snapshot`, with each annotation passed through `f`.
    pub fn snapshot_map<B>(&self, now: Instant, mut f: impl FnMut(&A) -> B) -> PoolStats<B> {
        let mut available: Vec<_> = self
            .available
            .iter()
            .map(|(id, since)| (*id, now.saturating_duration_since(*since)))
            .collect();
        available.sort_unstable_by_key(|(id, _)| *id);

        let mut checked_out: Vec<_> = self
            .checked_out
            .iter()
            .map(|(id, (since, annotation))| {
                (*id, (now.saturating_duration_since(*since), f(annotation)))
            })
            .collect();
        checked_out.sort_unstable_by_key(|(id, _)| *id);

        PoolStats {
            available,
            checked_out,
        }
    }
}
