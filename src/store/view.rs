use bytes::Bytes;

use super::lru::ByteSized;

/// Immutable view over a cached byte sequence.
///
/// This is the value type every group stores and serves. Backed by
/// [`Bytes`], so clones are reference-counted and the underlying buffer can
/// never be mutated through a shared handle. Views can cross threads and
/// task boundaries without locking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteView {
    b: Bytes,
}

impl ByteView {
    /// Copies `data` into a new view, leaving the caller's buffer untouched.
    pub fn from_slice(data: &[u8]) -> Self {
        Self {
            b: Bytes::copy_from_slice(data),
        }
    }

    /// Length of the viewed bytes.
    pub fn len(&self) -> usize {
        self.b.len()
    }

    pub fn is_empty(&self) -> bool {
        self.b.is_empty()
    }

    /// Borrow the bytes without copying.
    pub fn as_bytes(&self) -> &[u8] {
        &self.b
    }

    /// A fresh copy of the bytes. Callers may mutate the result freely
    /// without affecting the cached value.
    pub fn to_vec(&self) -> Vec<u8> {
        self.b.to_vec()
    }

    /// Textual view of the bytes. Invalid UTF-8 sequences are replaced.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.b).into_owned()
    }

    /// The backing [`Bytes`], for zero-copy response bodies.
    pub fn bytes(&self) -> Bytes {
        self.b.clone()
    }
}

impl From<Vec<u8>> for ByteView {
    fn from(data: Vec<u8>) -> Self {
        Self {
            b: Bytes::from(data),
        }
    }
}

impl From<Bytes> for ByteView {
    fn from(b: Bytes) -> Self {
        Self { b }
    }
}

impl From<&str> for ByteView {
    fn from(s: &str) -> Self {
        Self::from_slice(s.as_bytes())
    }
}

impl AsRef<[u8]> for ByteView {
    fn as_ref(&self) -> &[u8] {
        &self.b
    }
}

impl ByteSized for ByteView {
    fn byte_len(&self) -> usize {
        self.b.len()
    }
}
