//! Dendrite: document preprocessing core for retrieval-augmented generation.
//!
//! Normalizes heterogeneous source formats into a semantic node tree with
//! deterministic, content-addressed identity, then chunks that tree into
//! bounded, context-preserving units suitable for embedding.
//!
//! # Example
//!
//! ```ignore
//! use dendrite::{process, Source, DendriteConfig};
//! use dendrite::tokenizer::WordTokenizer;
//!
//! let tokenizer = WordTokenizer::new(8192);
//! let config = DendriteConfig::default();
//! let source = Source::Bytes { data: b"# Hello\nWorld.".to_vec(), content_type: "md".to_string() };
//! let document = dendrite::pipeline::process(source, None, &config, &tokenizer)?;
//! ```

pub mod chunk;
pub mod chunking;
pub mod cli;
pub mod config;
pub mod error;
pub mod identity;
pub mod metadata;
pub mod node;
pub mod parser;
pub mod pipeline;
pub mod tokenizer;

pub use chunk::Chunk;
pub use config::{ChunkingConfig, DendriteConfig};
pub use error::ProcessingError;
pub use identity::{ChunkId, DocumentId, NodeId, TokenCount};
pub use metadata::DocumentMetadata;
pub use node::SemanticNode;
pub use pipeline::{process, ProcessedDocument, Source, Statistics};
