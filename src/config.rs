//! Configuration records for the core pipeline.
//!
//! Bounds are enforced at construction by clamping rather than rejecting, so
//! the chunker can never observe an invalid configuration.

use crate::parser::Parser;
use crate::tokenizer::SplitUnit;

/// Chunking behavior. See `spec.md` §4.4.1 for the field-by-field rationale.
#[derive(Clone)]
pub struct ChunkingConfig {
    max_tokens_per_chunk: usize,
    min_tokens_per_chunk: usize,
    overlap_tokens: usize,
    split_unit: SplitUnit,
    preserve_context: bool,
    quality_threshold: f64,
    enable_special_handling: bool,
}

impl ChunkingConfig {
    /// Re-derive the dependent caps (`min_tokens_per_chunk`,
    /// `overlap_tokens` are bounded at `max / 4`) after any field changes.
    fn clamp(mut self) -> Self {
        self.max_tokens_per_chunk = self.max_tokens_per_chunk.max(64);
        let dependent_cap = self.max_tokens_per_chunk / 4;
        self.min_tokens_per_chunk = self.min_tokens_per_chunk.min(dependent_cap);
        self.overlap_tokens = self.overlap_tokens.min(dependent_cap);
        self.quality_threshold = self.quality_threshold.clamp(0.0, 1.0);
        self
    }

    pub fn max_tokens_per_chunk(&self) -> usize {
        self.max_tokens_per_chunk
    }

    pub fn min_tokens_per_chunk(&self) -> usize {
        self.min_tokens_per_chunk
    }

    pub fn overlap_tokens(&self) -> usize {
        self.overlap_tokens
    }

    pub fn split_unit(&self) -> SplitUnit {
        self.split_unit
    }

    pub fn preserve_context(&self) -> bool {
        self.preserve_context
    }

    pub fn quality_threshold(&self) -> f64 {
        self.quality_threshold
    }

    pub fn enable_special_handling(&self) -> bool {
        self.enable_special_handling
    }

    pub fn with_max_tokens_per_chunk(mut self, value: usize) -> Self {
        self.max_tokens_per_chunk = value;
        self.clamp()
    }

    pub fn with_min_tokens_per_chunk(mut self, value: usize) -> Self {
        self.min_tokens_per_chunk = value;
        self.clamp()
    }

    pub fn with_overlap_tokens(mut self, value: usize) -> Self {
        self.overlap_tokens = value;
        self.clamp()
    }

    pub fn with_split_unit(mut self, unit: SplitUnit) -> Self {
        self.split_unit = unit;
        self
    }

    pub fn with_preserve_context(mut self, preserve: bool) -> Self {
        self.preserve_context = preserve;
        self
    }

    pub fn with_quality_threshold(mut self, threshold: f64) -> Self {
        self.quality_threshold = threshold;
        self.clamp()
    }

    pub fn with_special_handling(mut self, enable: bool) -> Self {
        self.enable_special_handling = enable;
        self
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_tokens_per_chunk: 512,
            min_tokens_per_chunk: 32,
            overlap_tokens: 32,
            split_unit: SplitUnit::Sentence,
            preserve_context: true,
            quality_threshold: 0.7,
            enable_special_handling: true,
        }
        .clamp()
    }
}

/// Top-level configuration: the chunking config plus the ordered parser
/// list consulted by dispatch (first `can_parse` match wins).
pub struct DendriteConfig {
    pub chunking: ChunkingConfig,
    pub parsers: Vec<Box<dyn Parser>>,
}

impl DendriteConfig {
    pub fn new(chunking: ChunkingConfig, parsers: Vec<Box<dyn Parser>>) -> Self {
        Self { chunking, parsers }
    }
}

impl Default for DendriteConfig {
    fn default() -> Self {
        use crate::parser::{HtmlParser, MarkdownParser, PdfParser, PlainTextParser};
        Self {
            chunking: ChunkingConfig::default(),
            parsers: vec![
                Box::new(MarkdownParser::new()),
                Box::new(HtmlParser::new()),
                Box::new(PlainTextParser::new()),
                Box::new(PdfParser::new()),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_tokens_is_lower_bounded_at_64() {
        let config = ChunkingConfig::default().with_max_tokens_per_chunk(10);
        assert_eq!(config.max_tokens_per_chunk(), 64);
    }

    #[test]
    fn min_and_overlap_are_capped_at_quarter_of_max() {
        let config = ChunkingConfig::default()
            .with_max_tokens_per_chunk(100)
            .with_min_tokens_per_chunk(1000)
            .with_overlap_tokens(1000);
        assert_eq!(config.min_tokens_per_chunk(), 25);
        assert_eq!(config.overlap_tokens(), 25);
    }

    #[test]
    fn quality_threshold_is_clamped_to_unit_interval() {
        let config = ChunkingConfig::default().with_quality_threshold(5.0);
        assert_eq!(config.quality_threshold(), 1.0);
        let config = ChunkingConfig::default().with_quality_threshold(-5.0);
        assert_eq!(config.quality_threshold(), 0.0);
    }
}
