use crate::Buffer;

/// An ordered, growable collection of exclusively owned [`Buffer`]s.
///
/// This models the "live, reachable" set of a workload round. Removing a buffer from
/// the set is the only way it becomes eligible for reclamation; no other component
/// ever holds a reference to it.
///
/// The set grows by appending and shrinks by point removal at arbitrary indexes.
/// Removal is order-preserving (a shifting remove, not a swap remove) so that index
/// distributions over the remaining elements stay meaningful for the workloads'
/// random eviction patterns.
#[derive(Debug, Default)]
pub struct RetentionSet {
    buffers: Vec<Buffer>,
}

impl RetentionSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a buffer to the end of the set, taking ownership of it.
    pub fn push(&mut self, buffer: Buffer) {
        self.buffers.push(buffer);
    }

    /// Removes and returns the buffer at `index`, shifting later elements down.
    ///
    /// Returns `None` if `index` is out of bounds, including on an empty set.
    /// Eviction loops rely on this being a no-op rather than a panic.
    pub fn remove_at(&mut self, index: usize) -> Option<Buffer> {
        if index < self.buffers.len() {
            Some(self.buffers.remove(index))
        } else {
            None
        }
    }

    /// The number of buffers currently retained.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    /// Whether the set holds no buffers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Sums the payload bytes of every retained buffer.
    #[must_use]
    pub fn retained_bytes(&self) -> u64 {
        self.buffers.iter().map(|buffer| buffer.len() as u64).sum()
    }
}

/// Sums the retained payload bytes across any number of retention sets.
///
/// This is a read-only accounting pass; the sets are not mutated and the result has
/// no influence on workload behavior.
pub fn total_bytes<'a, I>(collections: I) -> u64
where
    I: IntoIterator<Item = &'a RetentionSet>,
{
    collections
        .into_iter()
        .map(RetentionSet::retained_bytes)
        .sum()
}
