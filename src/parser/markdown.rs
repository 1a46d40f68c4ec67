//! Markdown reference parser.
//!
//! Walks the `pulldown-cmark` event stream into the semantic node tree,
//! mirroring [`super::html`]'s container/inline stack-machine shape rather
//! than the teacher's line-prefix heuristic (the teacher's
//! `MarkdownBackend` only distinguished heading/list/paragraph by leading
//! character; nested lists, tables, code blocks, and inline emphasis/links
//! require a real event walk).

use super::Parser as ParserTrait;
use crate::error::ProcessingError;
use crate::metadata::{DocumentMetadata, SourceDetails};
use crate::node::{Inline, SemanticNode};
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser as CmarkParser, Tag};
use std::collections::HashMap;

pub struct MarkdownParser;

impl MarkdownParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserTrait for MarkdownParser {
    fn supported_types(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn parse(
        &self,
        bytes: &[u8],
        _content_type: &str,
    ) -> Result<(Vec<SemanticNode>, DocumentMetadata), ProcessingError> {
        let content = String::from_utf8(bytes.to_vec()).map_err(|_| ProcessingError::DecodingFailed {
            encoding: "UTF-8".to_string(),
        })?;

        let (front_matter, body) = split_front_matter(&content);

        let mut walker = Walker::new();
        let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
        for event in CmarkParser::new_ext(body, options) {
            walker.handle(event);
        }
        let nodes = walker.finish();

        let outline: Vec<String> = nodes
            .iter()
            .filter_map(|n| match n {
                SemanticNode::Heading { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect();
        let tables = nodes.iter().filter(|n| matches!(n, SemanticNode::Table { .. })).count();
        let code_blocks = nodes
            .iter()
            .filter(|n| matches!(n, SemanticNode::CodeBlock { .. }))
            .count();

        let mut metadata = DocumentMetadata::new("text/markdown")
            .with_file_size(bytes.len() as u64)
            .with_source_details(SourceDetails::Markdown {
                outline,
                tables,
                code_blocks,
            });
        if let Some(fm) = &front_matter {
            if let Some(title) = fm.get("title") {
                metadata = metadata.with_title(title.clone());
            }
            if let Some(author) = fm.get("author") {
                metadata = metadata.with_author(author.clone());
            }
        }

        Ok((nodes, metadata))
    }

    fn name(&self) -> &str {
        "markdown"
    }
}

/// Strips a leading `---`-delimited YAML front-matter block, parsed with a
/// minimal `key: value` line reader (full YAML is out of scope; front
/// matter is exercised only for `title`/`author`).
fn split_front_matter(content: &str) -> (Option<HashMap<String, String>>, &str) {
    let Some(rest) = content.strip_prefix("---\n") else {
        return (None, content);
    };
    let Some(end) = rest.find("\n---") else {
        return (None, content);
    };
    let block = &rest[..end];
    let after_marker = end + 4;
    let after = rest[after_marker..].trim_start_matches('\n');

    let mut map = HashMap::new();
    for line in block.lines() {
        if let Some((key, value)) = line.split_once(':') {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            map.insert(key.trim().to_string(), value.to_string());
        }
    }
    (Some(map), after)
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Inline containers that can hold further nested inline content while open.
enum InlineFrame {
    Emphasis(Vec<Inline>),
    Strong(Vec<Inline>),
    /// No dedicated node-model variant for strikethrough; children are
    /// spliced into the parent unchanged when this frame closes.
    Transparent(Vec<Inline>),
    Link { destination: Option<String>, children: Vec<Inline> },
    Image { source: Option<String>, alt: Vec<Inline> },
}

impl InlineFrame {
    fn push_child(&mut self, item: Inline) {
        match self {
            InlineFrame::Emphasis(c) | InlineFrame::Strong(c) | InlineFrame::Transparent(c) => c.push(item),
            InlineFrame::Link { children, .. } => children.push(item),
            InlineFrame::Image { alt, .. } => alt.push(item),
        }
    }
}

/// Block containers under construction. Every node is built with a `None`
/// placeholder parent; the top-level nodes are fixed up with
/// [`SemanticNode::reparented`] once, which cascades the real id chain
/// through every descendant.
enum BlockFrame {
    Root {
        children: Vec<SemanticNode>,
        inline_buffer: Vec<Inline>,
    },
    BlockQuote {
        children: Vec<SemanticNode>,
        inline_buffer: Vec<Inline>,
    },
    List {
        ordered: bool,
        items: Vec<SemanticNode>,
    },
    Item {
        children: Vec<SemanticNode>,
        inline_buffer: Vec<Inline>,
    },
    Paragraph {
        inline: Vec<Inline>,
    },
    Heading {
        level: u8,
        inline: Vec<Inline>,
    },
    CodeBlock {
        language: Option<String>,
        code: String,
    },
    Table {
        caption: Option<String>,
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    TableHead {
        cells: Vec<String>,
    },
    TableRow {
        cells: Vec<String>,
    },
    TableCell {
        inline: Vec<Inline>,
    },
}

impl BlockFrame {
    /// Attach a fully-built child node, flushing any pending bare-inline
    /// content (CommonMark tight-list text with no wrapping `Paragraph`) as
    /// an implicit paragraph first, to preserve document order.
    fn push_child(&mut self, node: SemanticNode) {
        match self {
            BlockFrame::Root { children, inline_buffer }
            | BlockFrame::BlockQuote { children, inline_buffer }
            | BlockFrame::Item { children, inline_buffer } => {
                flush_inline_buffer(children, inline_buffer);
                children.push(node);
            }
            BlockFrame::List { items, .. } => items.push(node),
            _ => {}
        }
    }
}

fn flush_inline_buffer(children: &mut Vec<SemanticNode>, inline_buffer: &mut Vec<Inline>) {
    if !inline_buffer.is_empty() {
        children.push(SemanticNode::paragraph(None, std::mem::take(inline_buffer), None));
    }
}

struct Walker {
    block_stack: Vec<BlockFrame>,
    inline_stack: Vec<InlineFrame>,
}

impl Walker {
    fn new() -> Self {
        Self {
            block_stack: vec![BlockFrame::Root {
                children: Vec::new(),
                inline_buffer: Vec::new(),
            }],
            inline_stack: Vec::new(),
        }
    }

    fn append_inline(&mut self, item: Inline) {
        if let Some(frame) = self.inline_stack.last_mut() {
            frame.push_child(item);
            return;
        }
        match self.block_stack.last_mut().expect("block stack never empty") {
            BlockFrame::Paragraph { inline } => inline.push(item),
            BlockFrame::Heading { inline, .. } => inline.push(item),
            BlockFrame::TableCell { inline } => inline.push(item),
            BlockFrame::Root { inline_buffer, .. }
            | BlockFrame::BlockQuote { inline_buffer, .. }
            | BlockFrame::Item { inline_buffer, .. } => inline_buffer.push(item),
            // List/Table/TableHead/TableRow/CodeBlock do not receive bare
            // inline content per CommonMark's own grammar.
            _ => {}
        }
    }

    fn handle(&mut self, event: Event) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(text.into_string()),
            Event::Code(text) => self.append_inline(Inline::InlineCode(text.into_string())),
            Event::SoftBreak => self.append_inline(Inline::Text(" ".to_string())),
            Event::HardBreak => self.append_inline(Inline::Text("\n".to_string())),
            Event::Rule => {
                let node = SemanticNode::thematic_break(None, None);
                self.block_stack.last_mut().expect("non-empty").push_child(node);
            }
            Event::TaskListMarker(checked) => {
                let marker = if checked { "[x] " } else { "[ ] " };
                self.append_inline(Inline::Text(marker.to_string()));
            }
            Event::Html(_) | Event::FootnoteReference(_) => {}
        }
    }

    fn text(&mut self, text: String) {
        if let Some(BlockFrame::CodeBlock { code, .. }) = self.block_stack.last_mut() {
            code.push_str(&text);
            return;
        }
        self.append_inline(Inline::Text(text));
    }

    fn start(&mut self, tag: Tag) {
        match tag {
            Tag::Paragraph => self.block_stack.push(BlockFrame::Paragraph { inline: Vec::new() }),
            Tag::Heading(level, ..) => self.block_stack.push(BlockFrame::Heading {
                level: heading_level(level),
                inline: Vec::new(),
            }),
            Tag::BlockQuote => self.block_stack.push(BlockFrame::BlockQuote {
                children: Vec::new(),
                inline_buffer: Vec::new(),
            }),
            Tag::List(first) => self.block_stack.push(BlockFrame::List {
                ordered: first.is_some(),
                items: Vec::new(),
            }),
            Tag::Item => self.block_stack.push(BlockFrame::Item {
                children: Vec::new(),
                inline_buffer: Vec::new(),
            }),
            Tag::CodeBlock(kind) => {
                let language = match kind {
                    CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.into_string()),
                    _ => None,
                };
                self.block_stack.push(BlockFrame::CodeBlock {
                    language,
                    code: String::new(),
                });
            }
            Tag::Table(_) => self.block_stack.push(BlockFrame::Table {
                caption: None,
                headers: Vec::new(),
                rows: Vec::new(),
            }),
            Tag::TableHead => self.block_stack.push(BlockFrame::TableHead { cells: Vec::new() }),
            Tag::TableRow => self.block_stack.push(BlockFrame::TableRow { cells: Vec::new() }),
            Tag::TableCell => self.block_stack.push(BlockFrame::TableCell { inline: Vec::new() }),
            Tag::Emphasis => self.inline_stack.push(InlineFrame::Emphasis(Vec::new())),
            Tag::Strong => self.inline_stack.push(InlineFrame::Strong(Vec::new())),
            Tag::Strikethrough => self.inline_stack.push(InlineFrame::Transparent(Vec::new())),
            Tag::Link(_, destination, _) => self.inline_stack.push(InlineFrame::Link {
                destination: (!destination.is_empty()).then(|| destination.into_string()),
                children: Vec::new(),
            }),
            Tag::Image(_, source, _) => self.inline_stack.push(InlineFrame::Image {
                source: (!source.is_empty()).then(|| source.into_string()),
                alt: Vec::new(),
            }),
            Tag::FootnoteDefinition(_) => {}
        }
    }

    fn end(&mut self, tag: Tag) {
        match tag {
            Tag::Paragraph => {
                let Some(BlockFrame::Paragraph { inline }) = self.block_stack.pop() else {
                    return;
                };
                let node = SemanticNode::paragraph(None, inline, None);
                self.block_stack.last_mut().expect("non-empty").push_child(node);
            }
            Tag::Heading(..) => {
                let Some(BlockFrame::Heading { level, inline }) = self.block_stack.pop() else {
                    return;
                };
                let text: String = inline.iter().map(Inline::plain_text).collect::<String>();
                let node = SemanticNode::heading(None, level, text.trim().to_string(), None);
                self.block_stack.last_mut().expect("non-empty").push_child(node);
            }
            Tag::BlockQuote => {
                let Some(BlockFrame::BlockQuote { mut children, mut inline_buffer }) = self.block_stack.pop() else {
                    return;
                };
                flush_inline_buffer(&mut children, &mut inline_buffer);
                let node = SemanticNode::blockquote(None, children, None);
                self.block_stack.last_mut().expect("non-empty").push_child(node);
            }
            Tag::List(_) => {
                let Some(BlockFrame::List { ordered, items }) = self.block_stack.pop() else {
                    return;
                };
                let node = SemanticNode::list(None, ordered, items, None);
                self.block_stack.last_mut().expect("non-empty").push_child(node);
            }
            Tag::Item => {
                let Some(BlockFrame::Item { mut children, mut inline_buffer }) = self.block_stack.pop() else {
                    return;
                };
                flush_inline_buffer(&mut children, &mut inline_buffer);
                let node = SemanticNode::list_item(None, children, None);
                self.block_stack.last_mut().expect("non-empty").push_child(node);
            }
            Tag::CodeBlock(_) => {
                let Some(BlockFrame::CodeBlock { language, code }) = self.block_stack.pop() else {
                    return;
                };
                let code = code.strip_suffix('\n').map(str::to_string).unwrap_or(code);
                let node = SemanticNode::code_block(None, language, code, None);
                self.block_stack.last_mut().expect("non-empty").push_child(node);
            }
            Tag::Table(_) => {
                let Some(BlockFrame::Table { caption, headers, rows }) = self.block_stack.pop() else {
                    return;
                };
                let node = SemanticNode::table(None, caption, headers, rows, None);
                self.block_stack.last_mut().expect("non-empty").push_child(node);
            }
            Tag::TableHead => {
                let Some(BlockFrame::TableHead { cells }) = self.block_stack.pop() else {
                    return;
                };
                if let Some(BlockFrame::Table { headers, .. }) = self.block_stack.last_mut() {
                    *headers = cells;
                }
            }
            Tag::TableRow => {
                let Some(BlockFrame::TableRow { cells }) = self.block_stack.pop() else {
                    return;
                };
                if let Some(BlockFrame::Table { rows, .. }) = self.block_stack.last_mut() {
                    rows.push(cells);
                }
            }
            Tag::TableCell => {
                let Some(BlockFrame::TableCell { inline }) = self.block_stack.pop() else {
                    return;
                };
                let text: String = inline.iter().map(Inline::plain_text).collect::<String>();
                let text = text.trim().to_string();
                match self.block_stack.last_mut() {
                    Some(BlockFrame::TableHead { cells }) | Some(BlockFrame::TableRow { cells }) => {
                        cells.push(text)
                    }
                    _ => {}
                }
            }
            Tag::Emphasis => {
                if let Some(InlineFrame::Emphasis(children)) = self.inline_stack.pop() {
                    self.append_inline(Inline::Emphasis(children));
                }
            }
            Tag::Strong => {
                if let Some(InlineFrame::Strong(children)) = self.inline_stack.pop() {
                    self.append_inline(Inline::Strong(children));
                }
            }
            Tag::Strikethrough => {
                if let Some(InlineFrame::Transparent(children)) = self.inline_stack.pop() {
                    for child in children {
                        self.append_inline(child);
                    }
                }
            }
            Tag::Link(..) => {
                if let Some(InlineFrame::Link { destination, children }) = self.inline_stack.pop() {
                    self.append_inline(Inline::Link {
                        destination,
                        children,
                    });
                }
            }
            Tag::Image(..) => {
                if let Some(InlineFrame::Image { source, alt }) = self.inline_stack.pop() {
                    let alt_text: String = alt.iter().map(Inline::plain_text).collect();
                    self.append_inline(Inline::Image {
                        source,
                        alt: alt_text,
                    });
                }
            }
            Tag::FootnoteDefinition(_) => {}
        }
    }

    /// Drain the root frame into the final top-level node list, cascading
    /// real (placeholder-free) ids through every descendant.
    fn finish(mut self) -> Vec<SemanticNode> {
        let Some(BlockFrame::Root { mut children, mut inline_buffer }) = self.block_stack.pop() else {
            return Vec::new();
        };
        flush_inline_buffer(&mut children, &mut inline_buffer);
        children.into_iter().map(|n| n.reparented(None)).collect()
    }
}
