//! Deterministic identity primitives.
//!
//! Every identifier in the crate is an opaque wrapper around a primitive so
//! that a `NodeId` can never be confused with a `ChunkId` at a call site,
//! even though both are backed by a `String`.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Caller-supplied or filename-derived document identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(String);

impl DocumentId {
    /// Wrap a caller-chosen identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for DocumentId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Content-addressed node identity: hex-encoded SHA-256 over
/// `parent_id ‖ content`.
///
/// For a given `(parent_id, content)` pair the digest is bit-identical across
/// runs and platforms; this is the crate's determinism guarantee.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(String);

impl NodeId {
    /// Compute the content-addressed id for `content` under `parent`.
    ///
    /// `parent` is `None` for a tree root.
    pub fn compute(parent: Option<&NodeId>, content: &str) -> Self {
        let mut hasher = Sha256::new();
        if let Some(parent) = parent {
            hasher.update(parent.0.as_bytes());
        }
        hasher.update(content.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic-within-a-run chunk identity: `"{document_id}_chunk_{index}"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkId(String);

impl ChunkId {
    pub fn new(document_id: &DocumentId, index: usize) -> Self {
        Self(format!("{}_chunk_{}", document_id.as_str(), index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A non-negative token count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenCount(usize);

impl TokenCount {
    pub fn new(count: usize) -> Self {
        Self(count)
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for TokenCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::ops::Add for TokenCount {
    type Output = TokenCount;
    fn add(self, rhs: Self) -> Self::Output {
        TokenCount(self.0 + rhs.0)
    }
}

impl std::iter::Sum for TokenCount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        TokenCount(iter.map(|t| t.0).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_is_deterministic() {
        let a = NodeId::compute(None, "hello world");
        let b = NodeId::compute(None, "hello world");
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 64);
    }

    #[test]
    fn node_id_depends_on_parent() {
        let root = NodeId::compute(None, "root content");
        let a = NodeId::compute(Some(&root), "child");
        let b = NodeId::compute(None, "child");
        assert_ne!(a, b);
    }

    #[test]
    fn identical_sibling_content_yields_identical_ids() {
        let parent = NodeId::compute(None, "parent");
        let a = NodeId::compute(Some(&parent), "same text");
        let b = NodeId::compute(Some(&parent), "same text");
        assert_eq!(a, b);
    }

    #[test]
    fn chunk_id_format() {
        let doc = DocumentId::new("guide.md");
        let id = ChunkId::new(&doc, 3);
        assert_eq!(id.as_str(), "guide.md_chunk_3");
    }
}
