//! Plain-text reference parser.

use super::Parser;
use crate::error::ProcessingError;
use crate::metadata::{DocumentMetadata, LineEnding, SourceDetails};
use crate::node::{Inline, SemanticNode};

/// One `Paragraph(Text(whole_content))` node; metadata records encoding,
/// line-ending convention, and line count.
pub struct PlainTextParser;

impl PlainTextParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlainTextParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for PlainTextParser {
    fn supported_types(&self) -> &[&str] {
        &["txt", "text"]
    }

    fn parse(
        &self,
        bytes: &[u8],
        _content_type: &str,
    ) -> Result<(Vec<SemanticNode>, DocumentMetadata), ProcessingError> {
        let content = String::from_utf8(bytes.to_vec()).map_err(|_| ProcessingError::DecodingFailed {
            encoding: "UTF-8".to_string(),
        })?;

        let line_ending = if content.contains("\r\n") {
            LineEnding::CrLf
        } else {
            LineEnding::Lf
        };
        let line_count = if content.is_empty() {
            0
        } else {
            content.lines().count()
        };

        let metadata = DocumentMetadata::new("text/plain")
            .with_file_size(bytes.len() as u64)
            .with_source_details(SourceDetails::PlainText {
                encoding: "UTF-8".to_string(),
                line_ending,
                line_count,
            });

        let nodes = if content.trim().is_empty() {
            Vec::new()
        } else {
            vec![SemanticNode::paragraph(
                None,
                vec![Inline::Text(content)],
                None,
            )]
        };

        Ok((nodes, metadata))
    }

    fn name(&self) -> &str {
        "plaintext"
    }
}
