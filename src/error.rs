//! Structured failure taxonomy for the core pipeline.

use thiserror::Error;

/// Errors surfaced by parsing, tokenization, or chunking.
///
/// Errors from a parser or tokenizer are reported unchanged if already one of
/// these variants; otherwise the observing component wraps them. Per-document
/// processing is atomic: on any error, no partial [`crate::pipeline::ProcessedDocument`]
/// is returned, and there is no retry within the core.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// Reading bytes for a `Source::Url` failed.
    #[error("file read failed: {url}: {cause}")]
    FileReadFailed { url: String, cause: String },

    /// No registered parser's `can_parse` matched the content type.
    #[error("unsupported file type: {extension}")]
    UnsupportedFileType { extension: String },

    /// A parser could not decode bytes into text.
    #[error("decoding failed: {encoding}")]
    DecodingFailed { encoding: String },

    /// A parser failed for a reason internal to it.
    #[error("parsing failed: {parser}: {cause}")]
    ParsingFailed { parser: String, cause: String },

    /// The chunker failed an internal invariant (empty-buffer flush request,
    /// tokenizer failure).
    #[error("chunking failed: {cause}")]
    ChunkingFailed { cause: String },
}

impl ProcessingError {
    pub fn parsing(parser: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        ProcessingError::ParsingFailed {
            parser: parser.into(),
            cause: cause.to_string(),
        }
    }

    pub fn chunking(cause: impl std::fmt::Display) -> Self {
        ProcessingError::ChunkingFailed {
            cause: cause.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_follow_component_failed_pattern() {
        let err = ProcessingError::UnsupportedFileType {
            extension: "zip".into(),
        };
        assert_eq!(err.to_string(), "unsupported file type: zip");

        let err = ProcessingError::parsing("markdown", "unexpected EOF");
        assert_eq!(err.to_string(), "parsing failed: markdown: unexpected EOF");
    }
}
