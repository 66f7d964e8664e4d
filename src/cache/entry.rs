//! Cache Entry Module
//!
//! Defines the value stored for each cached key.

use bytes::Bytes;

// == Cache Entry ==
/// A cached blob. Its size is the byte length of the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// The stored payload
    pub blob: Bytes,
}

impl CacheEntry {
    // == Constructor ==
    pub fn new(blob: Bytes) -> Self {
        Self { blob }
    }

    // == Size ==
    /// Number of bytes this entry counts against the memory budget.
    pub fn size(&self) -> usize {
        self.blob.len()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_size_matches_blob() {
        let entry = CacheEntry::new(Bytes::from_static(b"hello"));
        assert_eq!(entry.size(), 5);
    }

    #[test]
    fn test_entry_empty_blob() {
        let entry = CacheEntry::new(Bytes::new());
        assert_eq!(entry.size(), 0);
    }

    #[test]
    fn test_entry_clone_shares_bytes() {
        let entry = CacheEntry::new(Bytes::from(vec![7u8; 32]));
        let cloned = entry.clone();
        assert_eq!(cloned.blob.as_ptr(), entry.blob.as_ptr());
        assert_eq!(cloned, entry);
    }
}
