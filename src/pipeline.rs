//! Orchestrator tying parser dispatch, chunking, and statistics together
//! (spec.md §4.5/§6).

use crate::chunk::Chunk;
use crate::chunking::Chunker;
use crate::config::DendriteConfig;
use crate::error::ProcessingError;
use crate::identity::DocumentId;
use crate::metadata::DocumentMetadata;
use crate::node::SemanticNode;
use crate::parser::ParserRegistry;
use crate::tokenizer::Tokenizer;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Where the bytes to process come from.
pub enum Source {
    /// Already-read bytes, tagged with a content-type extension (e.g. `"md"`).
    Bytes { data: Vec<u8>, content_type: String },
    /// A `file://` URL the orchestrator reads itself; content-type is
    /// inferred from the extension and `document_id` defaults to the last
    /// path segment when the caller doesn't supply one.
    Url(Url),
}

/// `(processingTime, totalTokenCount, chunkCount, averageTokensPerChunk)`.
#[derive(Debug, Clone, Serialize)]
pub struct Statistics {
    pub processing_time: Duration,
    pub total_token_count: usize,
    pub chunk_count: usize,
    pub average_tokens_per_chunk: usize,
}

/// Aggregate output of [`process`]: identity, metadata, the full node tree,
/// the chunk sequence, and run statistics.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedDocument {
    pub document_id: DocumentId,
    pub metadata: Arc<DocumentMetadata>,
    pub nodes: Vec<SemanticNode>,
    pub chunks: Vec<Chunk>,
    pub statistics: Statistics,
}

/// Magic-byte fallback used when the extension-derived content type doesn't
/// match any registered parser (e.g. a misnamed or extensionless source).
/// Mirrors the teacher's `InputFormat::from_bytes` magic-number detection.
fn sniff_content_type(bytes: &[u8]) -> Option<String> {
    let kind = infer::get(bytes)?;
    match kind.mime_type() {
        "application/pdf" => Some("pdf".to_string()),
        "text/html" => Some("html".to_string()),
        _ => None,
    }
}

fn resolve_source(source: Source, document_id: Option<DocumentId>) -> Result<(Vec<u8>, String, DocumentId), ProcessingError> {
    match source {
        Source::Bytes { data, content_type } => {
            let document_id = document_id.unwrap_or_else(|| DocumentId::new(content_type.clone()));
            Ok((data, content_type, document_id))
        }
        Source::Url(url) => {
            let path = url.path();
            let content_type = path
                .rsplit('.')
                .next()
                .filter(|ext| *ext != path)
                .unwrap_or_default()
                .to_lowercase();
            let last_segment = url
                .path_segments()
                .and_then(|mut segments| segments.next_back())
                .filter(|s| !s.is_empty())
                .unwrap_or(url.as_str())
                .to_string();
            let document_id = document_id.unwrap_or_else(|| DocumentId::new(last_segment));

            let data = if url.scheme() == "file" {
                let file_path = url.to_file_path().map_err(|_| ProcessingError::FileReadFailed {
                    url: url.to_string(),
                    cause: "not a valid file path".to_string(),
                })?;
                std::fs::read(&file_path).map_err(|e| ProcessingError::FileReadFailed {
                    url: url.to_string(),
                    cause: e.to_string(),
                })?
            } else {
                return Err(ProcessingError::FileReadFailed {
                    url: url.to_string(),
                    cause: format!("unsupported URL scheme: {}", url.scheme()),
                });
            };

            Ok((data, content_type, document_id))
        }
    }
}

/// Run the full pipeline: dispatch → parse → chunk → assemble statistics.
///
/// Per-document processing is atomic; on any error, no partial
/// `ProcessedDocument` is returned.
pub fn process(
    source: Source,
    document_id: Option<DocumentId>,
    config: &DendriteConfig,
    tokenizer: &dyn Tokenizer,
) -> Result<ProcessedDocument, ProcessingError> {
    let start = std::time::Instant::now();
    let (bytes, content_type, document_id) = resolve_source(source, document_id)?;

    let registry = ParserRegistry::new(&config.parsers);
    let parser = registry
        .dispatch(&content_type)
        .or_else(|| sniff_content_type(&bytes).and_then(|sniffed| registry.dispatch(&sniffed)))
        .ok_or_else(|| ProcessingError::UnsupportedFileType {
            extension: content_type.clone(),
        })?;

    let (nodes, metadata) = parser.parse(&bytes, &content_type)?;
    let metadata = Arc::new(metadata);

    let chunker = Chunker::new(tokenizer, config.chunking.clone());
    let chunks = chunker.chunk(&nodes, &document_id, Arc::clone(&metadata))?;

    let chunk_count = chunks.len();
    let total_token_count: usize = chunks.iter().map(|c| c.token_count().get()).sum();
    let average_tokens_per_chunk = if chunk_count == 0 { 0 } else { total_token_count / chunk_count };

    Ok(ProcessedDocument {
        document_id,
        metadata,
        nodes,
        chunks,
        statistics: Statistics {
            processing_time: start.elapsed(),
            total_token_count,
            chunk_count,
            average_tokens_per_chunk,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChunkingConfig;
    use crate::tokenizer::WordTokenizer;

    fn config() -> DendriteConfig {
        DendriteConfig::new(
            ChunkingConfig::default().with_quality_threshold(0.0).with_min_tokens_per_chunk(1),
            vec![
                Box::new(crate::parser::MarkdownParser::new()),
                Box::new(crate::parser::PlainTextParser::new()),
            ],
        )
    }

    #[test]
    fn wrong_extension_falls_back_to_magic_byte_sniffing() {
        // A PDF with a misleading extension should still dispatch to the
        // PDF parser via magic-byte sniffing rather than surfacing
        // `UnsupportedFileType`; the stub parser then reports its own
        // internal `ParsingFailed`, proving dispatch, not decoding, is what
        // changed.
        let cfg = DendriteConfig::new(
            ChunkingConfig::default().with_quality_threshold(0.0).with_min_tokens_per_chunk(1),
            vec![Box::new(crate::parser::PdfParser::new())],
        );
        let tokenizer = WordTokenizer::new(512);
        let source = Source::Bytes {
            data: b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n".to_vec(),
            content_type: "bin".to_string(),
        };
        let err = process(source, Some(DocumentId::new("mystery")), &cfg, &tokenizer).unwrap_err();
        assert!(matches!(err, ProcessingError::ParsingFailed { .. }));
    }

    #[test]
    fn unsupported_extension_surfaces_as_unsupported_file_type() {
        let cfg = config();
        let tokenizer = WordTokenizer::new(512);
        let source = Source::Bytes {
            data: b"PK\x03\x04".to_vec(),
            content_type: "zip".to_string(),
        };
        let err = process(source, None, &cfg, &tokenizer).unwrap_err();
        assert!(matches!(err, ProcessingError::UnsupportedFileType { extension } if extension == "zip"));
    }

    #[test]
    fn plain_text_document_yields_statistics_matching_token_sum() {
        let cfg = config();
        let tokenizer = WordTokenizer::new(512);
        let source = Source::Bytes {
            data: b"This is a sample plain text document.".to_vec(),
            content_type: "txt".to_string(),
        };
        let doc = process(source, Some(DocumentId::new("sample")), &cfg, &tokenizer).unwrap();

        assert_eq!(doc.statistics.chunk_count, doc.chunks.len());
        let summed: usize = doc.chunks.iter().map(|c| c.token_count().get()).sum();
        assert_eq!(doc.statistics.total_token_count, summed);
    }

    #[test]
    fn source_url_reads_a_local_file_and_derives_document_id_from_its_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guide.md");
        std::fs::write(&path, b"# Intro\nHello world.\n").unwrap();

        let cfg = config();
        let tokenizer = WordTokenizer::new(512);
        let url = crate::cli::file_url(&path).unwrap();
        let doc = process(Source::Url(url), None, &cfg, &tokenizer).unwrap();

        assert_eq!(doc.document_id.as_str(), "guide.md");
        assert_eq!(doc.chunks[0].breadcrumb().joined(), "Intro");
    }

    #[test]
    fn source_url_surfaces_file_read_failed_for_a_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.md");

        let cfg = config();
        let tokenizer = WordTokenizer::new(512);
        let url = crate::cli::file_url(&missing).unwrap();
        let err = process(Source::Url(url), None, &cfg, &tokenizer).unwrap_err();
        assert!(matches!(err, ProcessingError::FileReadFailed { .. }));
    }

    #[test]
    fn markdown_with_title_front_matter_resolves_breadcrumb_prefix() {
        let cfg = config();
        let tokenizer = WordTokenizer::new(512);
        let content = "---\ntitle: Guide\nauthor: A\n---\n# Intro\nHello world.\n";
        let source = Source::Bytes {
            data: content.as_bytes().to_vec(),
            content_type: "md".to_string(),
        };
        let doc = process(source, Some(DocumentId::new("guide")), &cfg, &tokenizer).unwrap();

        assert_eq!(doc.metadata.title.as_deref(), Some("Guide"));
        assert_eq!(doc.chunks[0].breadcrumb().joined(), "Guide > Intro");
    }
}
