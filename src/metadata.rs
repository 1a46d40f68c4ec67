//! Document metadata produced by parsers and consumed unchanged by the chunker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Format-specific attributes attached to [`DocumentMetadata`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SourceDetails {
    Markdown {
        outline: Vec<String>,
        tables: usize,
        code_blocks: usize,
    },
    Html {
        images: Vec<String>,
        scripts: Vec<String>,
    },
    Pdf {
        page_count: usize,
    },
    PlainText {
        encoding: String,
        line_ending: LineEnding,
        line_count: usize,
    },
}

/// Detected line-ending convention of a plain-text source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineEnding {
    Lf,
    CrLf,
}

/// Metadata produced by a parser and carried unchanged through chunking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub keywords: HashSet<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub modified_at: Option<DateTime<Utc>>,
    pub links: HashSet<String>,
    pub language: Option<String>,
    pub mime_type: String,
    pub file_size: Option<u64>,
    pub checksum: Option<String>,
    pub source_details: Option<SourceDetails>,
}

impl DocumentMetadata {
    pub fn new(mime_type: impl Into<String>) -> Self {
        Self {
            title: None,
            author: None,
            description: None,
            keywords: HashSet::new(),
            created_at: None,
            modified_at: None,
            links: HashSet::new(),
            language: None,
            mime_type: mime_type.into(),
            file_size: None,
            checksum: None,
            source_details: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_source_details(mut self, details: SourceDetails) -> Self {
        self.source_details = Some(details);
        self
    }

    pub fn with_file_size(mut self, size: u64) -> Self {
        self.file_size = Some(size);
        self
    }

    /// `title`, if present, is non-whitespace; `file_size`, if present, is
    /// non-negative (guaranteed by the `u64` type; retained as an explicit
    /// check against an empty-but-present title).
    pub fn is_valid(&self) -> bool {
        match &self.title {
            Some(title) => !title.trim().is_empty(),
            None => true,
        }
    }
}
