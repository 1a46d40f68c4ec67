//! The chunking engine: the heart of the crate (spec.md §4.4).
//!
//! A single-pass, stateful traversal over a document's top-level node
//! sequence. Grounded on the teacher's `HybridChunker` three-pass shape
//! (`src/chunking/hybrid.rs`: hierarchical pass, then split, then merge),
//! generalized here into the spec's single buffer-and-flush pass driven
//! directly by context boundaries, since the teacher's passes run strictly
//! after each other rather than interleaving split/flush/buffer decisions
//! per node as spec.md §4.4.3 requires.

mod factory;
mod handlers;
mod quality;
mod splitter;

use crate::chunk::Chunk;
use crate::config::ChunkingConfig;
use crate::error::ProcessingError;
use crate::identity::DocumentId;
use crate::metadata::DocumentMetadata;
use crate::node::{Breadcrumb, SemanticNode};
use crate::tokenizer::Tokenizer;
use factory::ChunkFactory;
use std::sync::Arc;

/// Pending nodes awaiting a flush, plus the breadcrumb the resulting chunk
/// will carry and the running token total used to decide when to flush.
struct Buffer {
    nodes: Vec<SemanticNode>,
    token_count: usize,
    breadcrumb: Breadcrumb,
}

impl Buffer {
    fn new(breadcrumb: Breadcrumb) -> Self {
        Self {
            nodes: Vec::new(),
            token_count: 0,
            breadcrumb,
        }
    }

    fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, node: SemanticNode, tokens: usize) {
        self.token_count += tokens;
        self.nodes.push(node);
    }
}

/// Stateful, single-document chunker. Per spec.md §5, this state is owned
/// per document and MUST NOT be shared across concurrently processed
/// documents; [`crate::pipeline::process`] constructs a fresh [`Chunker`]
/// call for every document.
pub struct Chunker<'a> {
    tokenizer: &'a dyn Tokenizer,
    config: ChunkingConfig,
}

impl<'a> Chunker<'a> {
    pub fn new(tokenizer: &'a dyn Tokenizer, config: ChunkingConfig) -> Self {
        Self { tokenizer, config }
    }

    /// Run the full algorithm in spec.md §4.4.3 over `nodes` and return the
    /// post-filtered chunk sequence.
    pub fn chunk(
        &self,
        nodes: &[SemanticNode],
        document_id: &DocumentId,
        metadata: Arc<DocumentMetadata>,
    ) -> Result<Vec<Chunk>, ProcessingError> {
        let max_tokens = self.config.max_tokens_per_chunk();
        let mut factory = ChunkFactory::new(self.tokenizer, document_id.clone(), Arc::clone(&metadata), max_tokens);

        let root_label = metadata.title.clone().unwrap_or_else(|| "Document".to_string());
        let mut stack: Vec<String> = vec![root_label];
        let mut buffer = Buffer::new(Breadcrumb::new(stack.clone()));
        let mut chunks = Vec::new();

        for node in nodes {
            self.process_node(node, &mut stack, &mut buffer, &mut factory, &mut chunks)?;
        }
        self.flush(&mut buffer, &mut factory, &mut chunks)?;

        chunks.retain(|chunk| {
            chunk.token_count().get() >= self.config.min_tokens_per_chunk()
                && chunk.quality_score() >= self.config.quality_threshold()
        });

        Ok(chunks)
    }

    fn process_node(
        &self,
        node: &SemanticNode,
        stack: &mut Vec<String>,
        buffer: &mut Buffer,
        factory: &mut ChunkFactory<'_>,
        chunks: &mut Vec<Chunk>,
    ) -> Result<(), ProcessingError> {
        if node.is_context_boundary() {
            self.flush(buffer, factory, chunks)?;
            if let SemanticNode::Heading { level, text, .. } = node {
                update_breadcrumb_stack(stack, *level, text);
                buffer.breadcrumb = Breadcrumb::new(stack.clone());
                // A heading only reshapes the breadcrumb; it never re-enters
                // the buffer (spec.md §4.4.3 tie-breaks).
                return Ok(());
            }
        }

        if self.config.enable_special_handling() && node.requires_special_handling() {
            let base = Breadcrumb::new(stack.clone());
            let importance = node.structural_importance();
            let mut produced = match node {
                SemanticNode::Table {
                    id,
                    caption,
                    headers,
                    rows,
                    ..
                } => handlers::table_chunks(factory, &base, id, importance, caption, headers, rows)?,
                SemanticNode::CodeBlock { id, language, code, .. } => {
                    handlers::code_chunks(factory, &base, id, importance, language, code, self.config.max_tokens_per_chunk())?
                }
                _ => unreachable!("requires_special_handling is only true for Table and CodeBlock"),
            };
            chunks.append(&mut produced);
            return Ok(());
        }

        let text = node.plain_text();
        if text.trim().is_empty() {
            // Nodes that contribute no text (e.g. a `ThematicBreak`, already
            // flushed above as a context boundary) must never enter the
            // buffer: a flush containing only such a node would hand
            // `ChunkFactory::build` empty content and fail the chunk's
            // non-empty-content invariant.
            return Ok(());
        }
        let node_tokens = self.tokenizer.count_tokens(&text).get();
        let max_tokens = self.config.max_tokens_per_chunk();

        if node_tokens > max_tokens {
            self.flush(buffer, factory, chunks)?;
            let base = Breadcrumb::new(stack.clone());
            let mut produced = splitter::split_node(
                factory,
                &base,
                node.id(),
                node.structural_importance(),
                &text,
                max_tokens,
                self.config.overlap_tokens(),
                self.config.split_unit(),
                self.config.preserve_context(),
            )?;
            chunks.append(&mut produced);
            return Ok(());
        }

        if buffer.token_count + node_tokens > max_tokens {
            self.flush(buffer, factory, chunks)?;
        }
        buffer.push(node.clone(), node_tokens);
        Ok(())
    }

    /// A no-op on an empty buffer; otherwise joins the buffered nodes'
    /// `plain_text` with blank-line separators into one chunk.
    fn flush(&self, buffer: &mut Buffer, factory: &mut ChunkFactory<'_>, chunks: &mut Vec<Chunk>) -> Result<(), ProcessingError> {
        if buffer.is_empty() {
            return Ok(());
        }
        let nodes = std::mem::take(&mut buffer.nodes);
        buffer.token_count = 0;
        let breadcrumb = buffer.breadcrumb.clone();

        let content = nodes
            .iter()
            .map(SemanticNode::plain_text)
            .collect::<Vec<_>>()
            .join("\n\n");
        let source_node_ids = nodes.iter().map(|n| n.id().clone()).collect::<Vec<_>>();
        let importances: Vec<f64> = nodes.iter().map(SemanticNode::structural_importance).collect();

        let chunk = factory.build(content, breadcrumb, source_node_ids, &importances)?;
        chunks.push(chunk);
        Ok(())
    }
}

/// Pop entries while the stack holds more than `level` ancestors, then push
/// `text`. The document-title root occupies slot 0 and is never popped by a
/// heading, since no heading level reaches 0; this is what keeps the title
/// prefixed on every breadcrumb.
fn update_breadcrumb_stack(stack: &mut Vec<String>, level: u8, text: &str) {
    let level = level as usize;
    while stack.len() > level {
        stack.pop();
    }
    stack.push(text.to_string());
}
