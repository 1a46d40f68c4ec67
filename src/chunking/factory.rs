//! Shared chunk construction: monotonic indexing, token re-counting, and
//! quality scoring in one place so the main loop, table/code handlers, and
//! the large-node splitter all produce chunks the same way.

use super::quality;
use crate::chunk::Chunk;
use crate::error::ProcessingError;
use crate::identity::{ChunkId, DocumentId, NodeId};
use crate::metadata::DocumentMetadata;
use crate::node::Breadcrumb;
use crate::tokenizer::Tokenizer;
use chrono::Utc;
use std::sync::Arc;

pub struct ChunkFactory<'a> {
    tokenizer: &'a dyn Tokenizer,
    document_id: DocumentId,
    metadata: Arc<DocumentMetadata>,
    max_tokens: usize,
    next_index: usize,
}

impl<'a> ChunkFactory<'a> {
    pub fn new(
        tokenizer: &'a dyn Tokenizer,
        document_id: DocumentId,
        metadata: Arc<DocumentMetadata>,
        max_tokens: usize,
    ) -> Self {
        Self {
            tokenizer,
            document_id,
            metadata,
            max_tokens,
            next_index: 0,
        }
    }

    pub fn tokenizer(&self) -> &'a dyn Tokenizer {
        self.tokenizer
    }

    /// Re-counts tokens over the final content and allocates the next
    /// monotonic [`ChunkId`] in this chunker's run.
    pub fn build(
        &mut self,
        content: String,
        breadcrumb: Breadcrumb,
        source_node_ids: Vec<NodeId>,
        contributing_importances: &[f64],
    ) -> Result<Chunk, ProcessingError> {
        let token_count = self.tokenizer.count_tokens(&content);
        let quality_score = quality::score(&content, token_count, contributing_importances, self.max_tokens);
        let id = ChunkId::new(&self.document_id, self.next_index);
        self.next_index += 1;
        Chunk::new(
            id,
            self.document_id.clone(),
            content,
            token_count,
            breadcrumb,
            source_node_ids,
            Arc::clone(&self.metadata),
            Utc::now(),
            quality_score,
        )
    }
}
