//! End-to-end scenarios from spec.md §8.

use dendrite::config::{ChunkingConfig, DendriteConfig};
use dendrite::node::SemanticNode;
use dendrite::parser::{HtmlParser, MarkdownParser, PlainTextParser};
use dendrite::tokenizer::WordTokenizer;
use dendrite::{process, ProcessingError, Source};

fn lenient_config(parsers: Vec<Box<dyn dendrite::parser::Parser>>) -> DendriteConfig {
    DendriteConfig::new(
        ChunkingConfig::default()
            .with_quality_threshold(0.0)
            .with_min_tokens_per_chunk(1),
        parsers,
    )
}

// Scenario 1: Markdown with front-matter + two H1 sections + table.
#[test]
fn markdown_front_matter_two_sections_and_table() {
    let source_text = "---\ntitle: \"Guide\"\nauthor: \"A\"\n---\n\
# Intro\nHello world.\n\
# Details\nMore detail here.\n\n\
| a | b |\n|---|---|\n| 1 | 2 |\n| 3 | 4 |\n| 5 | 6 |\n";

    let config = lenient_config(vec![Box::new(MarkdownParser::new())]);
    let tokenizer = WordTokenizer::new(512);
    let source = Source::Bytes {
        data: source_text.as_bytes().to_vec(),
        content_type: "md".to_string(),
    };
    let doc = process(source, None, &config, &tokenizer).unwrap();

    assert_eq!(doc.metadata.title.as_deref(), Some("Guide"));
    assert_eq!(doc.metadata.author.as_deref(), Some("A"));

    let first_text_chunk = doc
        .chunks
        .iter()
        .find(|c| c.content().contains("Hello world."))
        .expect("intro chunk");
    assert_eq!(first_text_chunk.breadcrumb().joined(), "Guide > Intro");

    let structure = doc
        .chunks
        .iter()
        .find(|c| c.breadcrumb().joined() == "Guide > Details > Table > Structure")
        .expect("table structure chunk");
    assert!(structure.content().contains("2 columns × 3 rows"));

    for i in 1..=3 {
        let row = doc
            .chunks
            .iter()
            .find(|c| c.breadcrumb().joined() == format!("Guide > Details > Table > Row {i}"))
            .unwrap_or_else(|| panic!("row {i} chunk"));
        assert!(!row.content().trim().is_empty());
    }
}

// Scenario 2: plain text document.
#[test]
fn plain_text_single_sentence_document() {
    let config = lenient_config(vec![Box::new(PlainTextParser::new())]);
    let tokenizer = WordTokenizer::new(512);
    let source = Source::Bytes {
        data: b"This is a sample plain text document.".to_vec(),
        content_type: "txt".to_string(),
    };
    let doc = process(source, None, &config, &tokenizer).unwrap();

    assert_eq!(doc.nodes.len(), 1);
    match &doc.nodes[0] {
        SemanticNode::Paragraph { children, .. } => assert_eq!(children.len(), 1),
        other => panic!("expected paragraph, got {other:?}"),
    }
    assert_eq!(doc.chunks.len(), 1);
    assert!(doc.metadata.title.is_none());
    match &doc.metadata.source_details {
        Some(dendrite::metadata::SourceDetails::PlainText {
            encoding,
            line_ending,
            line_count,
        }) => {
            assert_eq!(encoding, "UTF-8");
            assert_eq!(*line_ending, dendrite::metadata::LineEnding::Lf);
            assert_eq!(*line_count, 1);
        }
        other => panic!("unexpected source details: {other:?}"),
    }
}

// Scenario 3: HTML single heading.
#[test]
fn html_single_heading_document() {
    let config = lenient_config(vec![Box::new(HtmlParser::new())]);
    let tokenizer = WordTokenizer::new(512);
    let source = Source::Bytes {
        data: b"<h1>Hello World</h1>".to_vec(),
        content_type: "html".to_string(),
    };
    let doc = process(source, None, &config, &tokenizer).unwrap();

    assert_eq!(doc.nodes.len(), 1);
    match &doc.nodes[0] {
        SemanticNode::Heading { level, text, .. } => {
            assert_eq!(*level, 1);
            assert_eq!(text, "Hello World");
        }
        other => panic!("expected heading, got {other:?}"),
    }
    assert_eq!(doc.chunks.len(), 1);
    assert!(doc.chunks[0].breadcrumb().joined().ends_with("Hello World"));
}

// Scenario 4: oversized paragraph split with overlap and ordered parts.
#[test]
fn oversized_paragraph_splits_with_overlap_and_ordered_parts() {
    let chunking = ChunkingConfig::default()
        .with_max_tokens_per_chunk(100)
        .with_overlap_tokens(20)
        .with_quality_threshold(0.0)
        .with_min_tokens_per_chunk(1);
    let config = DendriteConfig::new(chunking, vec![Box::new(PlainTextParser::new())]);
    let tokenizer = WordTokenizer::new(512);

    let sentence: String = (0..300)
        .map(|i| format!("This is sentence number {i} in a very long document body."))
        .collect::<Vec<_>>()
        .join(" ");
    let source = Source::Bytes {
        data: sentence.into_bytes(),
        content_type: "txt".to_string(),
    };
    let doc = process(source, None, &config, &tokenizer).unwrap();

    assert!(doc.chunks.len() >= 3);
    let single_source: Vec<_> = doc.chunks[0].source_node_ids().to_vec();
    for (i, chunk) in doc.chunks.iter().enumerate() {
        // Each piece's unique contribution (excluding any prepended overlap
        // from the previous part) is bounded by max - overlap; the overlap
        // prefix on continuations can push the full chunk somewhat higher.
        assert!(chunk.token_count().get() <= 100 + 20);
        assert_eq!(chunk.breadcrumb().joined(), format!("Document > Part {}", i + 1));
        assert_eq!(chunk.source_node_ids(), single_source.as_slice());
    }
}

// Scenario 5: 1000-line code block split on line boundaries only.
#[test]
fn code_block_1000_lines_splits_on_line_boundaries() {
    let code: String = (0..1000)
        .map(|i| format!("let x{i} = {i};"))
        .collect::<Vec<_>>()
        .join("\n");
    let markdown = format!("```swift\n{code}\n```\n");

    let chunking = ChunkingConfig::default()
        .with_max_tokens_per_chunk(200)
        .with_quality_threshold(0.0)
        .with_min_tokens_per_chunk(1);
    let config = DendriteConfig::new(chunking, vec![Box::new(MarkdownParser::new())]);
    let tokenizer = WordTokenizer::new(512);
    let source = Source::Bytes {
        data: markdown.into_bytes(),
        content_type: "md".to_string(),
    };
    let doc = process(source, None, &config, &tokenizer).unwrap();

    assert!(doc.chunks.len() >= 5);
    for chunk in &doc.chunks {
        assert!(chunk.content().starts_with("Code (swift):\n"));
        assert!(chunk.token_count().get() <= 200);
    }
    for line in code.lines() {
        assert!(doc.chunks.iter().any(|c| c.content().contains(line)));
    }
}

// Scenario 6: unsupported extension.
#[test]
fn unsupported_extension_zip_is_rejected() {
    let config = lenient_config(vec![Box::new(PlainTextParser::new())]);
    let tokenizer = WordTokenizer::new(512);
    let source = Source::Bytes {
        data: b"PK\x03\x04".to_vec(),
        content_type: "zip".to_string(),
    };
    let err = process(source, None, &config, &tokenizer).unwrap_err();
    assert!(matches!(err, ProcessingError::UnsupportedFileType { extension } if extension == "zip"));
}
