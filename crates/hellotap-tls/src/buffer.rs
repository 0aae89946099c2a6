//! Reusable owned byte buffer backing a captured handshake message.
//!
//! The backing storage outlives individual messages: connection reuse calls
//! [`MessageBuffer::wipe`], which zeroes the backing bytes and resizes them
//! to a standard capacity instead of freeing, so a busy endpoint does not
//! churn the allocator between handshakes. [`MessageBuffer::release`] frees
//! the storage at connection teardown.

use hellotap_types::TlsError;
use zeroize::Zeroize;

/// Backing capacity retained across connection reuse (one large TLS record).
pub const STANDARD_BUFFER_SIZE: usize = 16384;

/// An append cursor over an owned, reusable byte buffer.
///
/// The logical length (bytes written since the last clear or wipe) is
/// tracked separately from the backing storage, so a wiped buffer retains
/// its zeroed capacity while reading as empty.
#[derive(Default)]
pub struct MessageBuffer {
    data: Vec<u8>,
    len: usize,
}

impl MessageBuffer {
    /// Create an empty buffer with no backing storage; the first write
    /// allocates.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes written since the last clear or wipe.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The written region.
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// The written region, mutable.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data[..self.len]
    }

    /// The full backing storage, independent of the write cursor.
    pub fn backing(&self) -> &[u8] {
        &self.data
    }

    /// Grow the backing storage to hold at least `capacity` bytes.
    pub fn ensure_capacity(&mut self, capacity: usize) -> Result<(), TlsError> {
        if self.data.len() < capacity {
            let extra = capacity - self.data.len();
            self.data
                .try_reserve_exact(extra)
                .map_err(|_| TlsError::MemAllocFail)?;
            self.data.resize(capacity, 0);
        }
        Ok(())
    }

    /// Append `src` at the cursor, growing the backing storage on demand.
    pub fn write(&mut self, src: &[u8]) -> Result<(), TlsError> {
        self.ensure_capacity(self.len + src.len())?;
        self.data[self.len..self.len + src.len()].copy_from_slice(src);
        self.len += src.len();
        Ok(())
    }

    /// Zero the written region and reset the cursor. Backing storage keeps
    /// its current size.
    pub fn clear(&mut self) {
        self.data[..self.len].zeroize();
        self.len = 0;
    }

    /// Zero the entire backing storage, resize it to
    /// [`STANDARD_BUFFER_SIZE`], and reset the cursor. Connection-reuse
    /// path: the allocation survives, the contents do not.
    ///
    /// The cursor is reset before the resize, so even when regrowing the
    /// backing fails the buffer reads as empty, never as a zeroed
    /// "message" of its old length.
    pub fn wipe(&mut self) -> Result<(), TlsError> {
        self.data.as_mut_slice().zeroize();
        self.len = 0;
        if self.data.len() > STANDARD_BUFFER_SIZE {
            self.data.truncate(STANDARD_BUFFER_SIZE);
            self.data.shrink_to_fit();
        } else {
            self.ensure_capacity(STANDARD_BUFFER_SIZE)?;
        }
        Ok(())
    }

    /// Zero and free the backing storage. Teardown path only.
    pub fn release(&mut self) {
        self.data.as_mut_slice().zeroize();
        self.data = Vec::new();
        self.len = 0;
    }
}
