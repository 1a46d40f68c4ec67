//! The [`Chunk`] value type: a bounded, immutable text slice with
//! provenance, hierarchical context, and a quality score.

use crate::error::ProcessingError;
use crate::identity::{ChunkId, DocumentId, NodeId, TokenCount};
use crate::metadata::DocumentMetadata;
use crate::node::Breadcrumb;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// An immutable, embeddable unit of text plus everything needed to locate
/// and judge it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    id: ChunkId,
    document_id: DocumentId,
    content: String,
    token_count: TokenCount,
    breadcrumb: Breadcrumb,
    source_node_ids: Vec<NodeId>,
    metadata: Arc<DocumentMetadata>,
    created_at: DateTime<Utc>,
    quality_score: f64,
}

impl Chunk {
    /// Construct a chunk, enforcing the validation invariants from spec.md
    /// §3.4: non-empty trimmed content, positive token count, an in-range
    /// quality score, and internally-valid metadata.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: ChunkId,
        document_id: DocumentId,
        content: String,
        token_count: TokenCount,
        breadcrumb: Breadcrumb,
        source_node_ids: Vec<NodeId>,
        metadata: Arc<DocumentMetadata>,
        created_at: DateTime<Utc>,
        quality_score: f64,
    ) -> Result<Self, ProcessingError> {
        if content.trim().is_empty() {
            return Err(ProcessingError::chunking("chunk content is empty after trim"));
        }
        if token_count.get() == 0 {
            return Err(ProcessingError::chunking("chunk token count must be positive"));
        }
        if !(0.0..=1.0).contains(&quality_score) {
            return Err(ProcessingError::chunking(format!(
                "quality score {quality_score} out of [0, 1]"
            )));
        }
        if !metadata.is_valid() {
            return Err(ProcessingError::chunking("document metadata is invalid"));
        }

        Ok(Self {
            id,
            document_id,
            content,
            token_count,
            breadcrumb,
            source_node_ids,
            metadata,
            created_at,
            quality_score,
        })
    }

    pub fn id(&self) -> &ChunkId {
        &self.id
    }

    pub fn document_id(&self) -> &DocumentId {
        &self.document_id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn token_count(&self) -> TokenCount {
        self.token_count
    }

    pub fn breadcrumb(&self) -> &Breadcrumb {
        &self.breadcrumb
    }

    pub fn source_node_ids(&self) -> &[NodeId] {
        &self.source_node_ids
    }

    pub fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn quality_score(&self) -> f64 {
        self.quality_score
    }
}
