//! Parser interface, dispatch registry, and the reference parsers.

mod html;
mod markdown;
mod pdf;
mod plaintext;

pub use html::HtmlParser;
pub use markdown::MarkdownParser;
pub use pdf::PdfParser;
pub use plaintext::PlainTextParser;

use crate::error::ProcessingError;
use crate::metadata::DocumentMetadata;
use crate::node::SemanticNode;

/// A format-specific parser: the sole extension point for adding a format.
///
/// Adding a format means implementing this trait and registering it ahead of
/// the defaults in `DendriteConfig::parsers`.
pub trait Parser: Send + Sync {
    /// Content-type tags (lowercase file extensions) this parser declares
    /// support for.
    fn supported_types(&self) -> &[&str];

    /// Default implementation: membership in [`Parser::supported_types`].
    fn can_parse(&self, content_type: &str) -> bool {
        self.supported_types().contains(&content_type)
    }

    /// Parse `bytes` tagged with `content_type` into a node tree and its
    /// metadata.
    fn parse(
        &self,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(Vec<SemanticNode>, DocumentMetadata), ProcessingError>;

    /// Name used in `ProcessingError::ParsingFailed { parser, .. }`.
    fn name(&self) -> &str;
}

/// Dispatches to the first registered parser whose `can_parse` matches.
pub struct ParserRegistry<'a> {
    parsers: &'a [Box<dyn Parser>],
}

impl<'a> ParserRegistry<'a> {
    pub fn new(parsers: &'a [Box<dyn Parser>]) -> Self {
        Self { parsers }
    }

    /// First `can_parse(content_type) == true` wins, in declaration order.
    pub fn dispatch(&self, content_type: &str) -> Option<&dyn Parser> {
        self.parsers
            .iter()
            .find(|parser| parser.can_parse(content_type))
            .map(|parser| parser.as_ref())
    }
}
