//! PDF parser stub.
//!
//! Full PDF ingestion (page rasterization, layout analysis, table detection,
//! OCR) is an external collaborator consumed through the [`super::Parser`]
//! interface only; this crate does not implement it (spec.md §1). This stub
//! exists so the registry has a real fourth implementor to dispatch to and
//! so callers see a clear, structured error rather than a missing format.

use super::Parser;
use crate::error::ProcessingError;
use crate::metadata::DocumentMetadata;
use crate::node::SemanticNode;

pub struct PdfParser;

impl PdfParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for PdfParser {
    fn supported_types(&self) -> &[&str] {
        &["pdf"]
    }

    fn parse(
        &self,
        _bytes: &[u8],
        _content_type: &str,
    ) -> Result<(Vec<SemanticNode>, DocumentMetadata), ProcessingError> {
        Err(ProcessingError::parsing(
            self.name(),
            "PDF/OCR backend is an external collaborator and is not linked into this build",
        ))
    }

    fn name(&self) -> &str {
        "pdf"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_content_type_is_recognized_but_not_fulfilled() {
        let parser = PdfParser::new();
        assert!(parser.can_parse("pdf"));
        let err = parser.parse(b"%PDF-1.4", "pdf").unwrap_err();
        assert!(matches!(err, ProcessingError::ParsingFailed { .. }));
    }
}
