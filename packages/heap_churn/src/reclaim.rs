use crate::Buffer;

/// Holds the buffers an escalation round filtered out, until the round's explicit
/// sweep.
///
/// The escalating workload models a runtime that forces a full, blocking collection
/// cycle once per round, after a settling pause. Deferring the casualties of a round
/// into this queue and releasing them together in [`sweep()`](ReclaimQueue::sweep)
/// preserves that timing: frees happen synchronously at the same program point where
/// the round forced its collection, and the heap is fully settled before any
/// measurement that follows.
///
/// Only the escalating workload wants this. The churn workload drops evicted buffers
/// immediately; see [`churn()`](crate::churn()).
#[derive(Debug, Default)]
pub struct ReclaimQueue {
    dead: Vec<Buffer>,
}

impl ReclaimQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of an evicted buffer, keeping it allocated until the next sweep.
    pub fn defer(&mut self, buffer: Buffer) {
        self.dead.push(buffer);
    }

    /// The number of buffers awaiting reclamation.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.dead.len()
    }

    /// Releases every deferred buffer, synchronously, before returning.
    ///
    /// Also returns the queue's own backing storage to the allocator so that nothing
    /// from the swept generation lingers.
    pub fn sweep(&mut self) {
        self.dead.clear();
        self.dead.shrink_to_fit();
    }
}
