//! LIFO buffer of free resources with a blocking, timed pop

use crate::ledger::ResourceId;
use crate::timeout::AcquireTimeout;

use parking_lot::{Condvar, Mutex};
use std::time::Instant;

/// Fixed-capacity stack of resources nobody holds right now.
///
/// This is the hand-off primitive waiters block on. It has its own lock so
/// a thread parked here never holds the ledger lock.
pub(crate) struct FreeStack<R> {
    slots: Mutex<Vec<(ResourceId, R)>>,
    released: Condvar,
    capacity: usize,
}

impl<R> FreeStack<R> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Mutex::new(Vec::with_capacity(capacity)),
            released: Condvar::new(),
            capacity,
        }
    }

    /// Push a resource on top and wake one waiter.
    pub fn push(&self, id: ResourceId, resource: R) {
        let mut slots = self.slots.lock();
        assert!(
            slots.len() < self.capacity,
            "free stack overflow: {id} pushed onto a full stack of {}",
            self.capacity
        );
        slots.push((id, resource));
        drop(slots);
        self.released.notify_one();
    }

    /// Pop the most recently pushed resource, waiting up to `timeout`.
    pub fn pop(&self, timeout: AcquireTimeout) -> Option<(ResourceId, R)> {
        let deadline = timeout.deadline_from(Instant::now());
        let mut slots = self.slots.lock();

        loop {
            if let Some(slot) = slots.pop() {
                return Some(slot);
            }

            match deadline {
                None => self.released.wait(&mut slots),
                Some(deadline) => {
                    if Instant::now() >= deadline {
                        return None;
                    }
                    // A timed-out wait can still race with a push; the next
                    // iteration picks that up before checking the deadline.
                    let _ = self.released.wait_until(&mut slots, deadline);
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }
}
