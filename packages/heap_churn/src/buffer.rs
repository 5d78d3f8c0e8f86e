/// An immutable contiguous block of repeated-byte content.
///
/// This is the unit of allocation pressure in every workload: the length varies, the
/// content never matters. Each buffer is exclusively owned by the [`RetentionSet`] or
/// [`ReclaimQueue`] currently holding it, so dropping it from there reclaims the
/// memory immediately.
///
/// [`RetentionSet`]: crate::RetentionSet
/// [`ReclaimQueue`]: crate::ReclaimQueue
#[derive(Debug)]
pub struct Buffer {
    bytes: Box<[u8]>,
}

impl Buffer {
    /// Allocates a buffer of `len` bytes, every byte set to `fill`.
    #[must_use]
    pub fn filled(len: usize, fill: u8) -> Self {
        Self {
            bytes: vec![fill; len].into_boxed_slice(),
        }
    }

    /// The payload length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the buffer holds zero bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The buffer contents.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}
