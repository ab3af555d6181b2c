//! Bounded-concurrency admission gate.
//!
//! Caps how many probes are in flight at once. Built on tokio's semaphore,
//! whose wait queue is FIFO: the longest-waiting acquirer is the first one
//! woken when a slot frees.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// A counting gate with a fixed capacity.
///
/// `admit` suspends until a slot is free and returns a [`Slot`] that
/// releases the capacity when dropped, so release happens on every exit
/// path of the holding task. Cloning shares the same capacity pool.
#[derive(Clone)]
pub struct AdmissionGate {
    permits: Arc<Semaphore>,
    capacity: usize,
}

impl AdmissionGate {
    /// Create a gate. Capacities below 1 are clamped to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Wait for a free slot.
    pub async fn admit(&self) -> Slot {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .expect("admission gate semaphore is never closed");
        Slot { _permit: permit }
    }

    /// The fixed capacity of this gate.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots currently free.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }
}

/// An occupied gate slot. Dropping it frees the slot.
pub struct Slot {
    _permit: OwnedSemaphorePermit,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::mpsc;

    #[test]
    fn test_capacity_clamped_to_one() {
        assert_eq!(AdmissionGate::new(0).capacity(), 1);
        assert_eq!(AdmissionGate::new(200).capacity(), 200);
    }

    #[tokio::test]
    async fn test_slot_released_on_drop() {
        let gate = AdmissionGate::new(2);
        assert_eq!(gate.available(), 2);

        let slot = gate.admit().await;
        assert_eq!(gate.available(), 1);

        drop(slot);
        assert_eq!(gate.available(), 2);
    }

    #[tokio::test]
    async fn test_in_flight_never_exceeds_capacity() {
        let gate = AdmissionGate::new(3);
        let in_flight = Arc::new(AtomicUsize::new(0));
        let watermark = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..20 {
            let gate = gate.clone();
            let in_flight = Arc::clone(&in_flight);
            let watermark = Arc::clone(&watermark);
            handles.push(tokio::spawn(async move {
                let _slot = gate.admit().await;
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                watermark.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert!(watermark.load(Ordering::SeqCst) <= 3);
        assert_eq!(in_flight.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_waiters_wake_in_fifo_order() {
        let gate = AdmissionGate::new(1);
        let held = gate.admit().await;

        let (tx, mut rx) = mpsc::unbounded_channel();
        for id in 0..3u32 {
            let gate = gate.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let slot = gate.admit().await;
                tx.send(id).unwrap();
                drop(slot);
            });
            // Make sure each waiter is queued before the next one arrives.
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        drop(held);
        let mut order = Vec::new();
        for _ in 0..3 {
            order.push(rx.recv().await.unwrap());
        }
        assert_eq!(order, vec![0, 1, 2]);
    }
}
