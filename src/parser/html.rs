//! HTML reference parser.

use super::Parser;
use crate::error::ProcessingError;
use crate::metadata::{DocumentMetadata, SourceDetails};
use crate::node::{Inline, SemanticNode};
use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::Html;

/// Walks `h1..h6`, `p`, `ul`/`ol`/`li`, `blockquote`, `pre > code`,
/// `table`/`tr`/`td`/`th`, `hr`, and inline `a`/`img`/`em`/`strong`/`code`
/// into the semantic node tree.
pub struct HtmlParser;

impl HtmlParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for HtmlParser {
    fn supported_types(&self) -> &[&str] {
        &["html", "htm"]
    }

    fn parse(
        &self,
        bytes: &[u8],
        _content_type: &str,
    ) -> Result<(Vec<SemanticNode>, DocumentMetadata), ProcessingError> {
        let content = String::from_utf8(bytes.to_vec()).map_err(|_| ProcessingError::DecodingFailed {
            encoding: "UTF-8".to_string(),
        })?;

        let document = Html::parse_document(&content);
        let root = document.root_element();

        let mut images = Vec::new();
        let mut scripts = Vec::new();
        collect_resources(*root, &mut images, &mut scripts);

        let nodes = convert_mixed_content(*root)
            .into_iter()
            .map(|n| n.reparented(None))
            .collect::<Vec<_>>();

        let title = select_first_text(&document, "title");

        let mut metadata = DocumentMetadata::new("text/html")
            .with_file_size(bytes.len() as u64)
            .with_source_details(SourceDetails::Html { images, scripts });
        if let Some(title) = title {
            metadata = metadata.with_title(title);
        }

        Ok((nodes, metadata))
    }

    fn name(&self) -> &str {
        "html"
    }
}

fn select_first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = scraper::Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn collect_resources(node: NodeRef<Node>, images: &mut Vec<String>, scripts: &mut Vec<String>) {
    for child in node.children() {
        if let Some(element) = child.value().as_element() {
            match element.name() {
                "img" => {
                    if let Some(src) = element.attr("src") {
                        images.push(src.to_string());
                    }
                }
                "script" => {
                    if let Some(src) = element.attr("src") {
                        scripts.push(src.to_string());
                    }
                }
                _ => {}
            }
        }
        collect_resources(child, images, scripts);
    }
}

fn collect_text(node: NodeRef<Node>) -> String {
    let mut out = String::new();
    for child in node.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => out.push_str(&collect_text(child)),
            _ => {}
        }
    }
    out
}

fn convert_inlines(node: NodeRef<Node>) -> Vec<Inline> {
    let mut result = Vec::new();
    for child in node.children() {
        match child.value() {
            Node::Text(text) => {
                let s = text.to_string();
                if !s.trim().is_empty() {
                    result.push(Inline::Text(s));
                }
            }
            Node::Element(element) => match element.name() {
                "a" => {
                    let destination = element.attr("href").map(String::from);
                    result.push(Inline::Link {
                        destination,
                        children: convert_inlines(child),
                    });
                }
                "img" => {
                    let source = element.attr("src").map(String::from);
                    let alt = element.attr("alt").unwrap_or("").to_string();
                    result.push(Inline::Image { source, alt });
                }
                "em" | "i" => result.push(Inline::Emphasis(convert_inlines(child))),
                "strong" | "b" => result.push(Inline::Strong(convert_inlines(child))),
                "code" => result.push(Inline::InlineCode(collect_text(child))),
                _ => result.extend(convert_inlines(child)),
            },
            _ => {}
        }
    }
    result
}

/// Block-level container walk shared by the document root, `<blockquote>`,
/// and `<li>`: recognized block tags produce their dedicated node; runs of
/// inline content between them are folded into an implicit paragraph.
fn convert_mixed_content(node: NodeRef<Node>) -> Vec<SemanticNode> {
    let mut blocks = Vec::new();
    let mut inline_buffer: Vec<Inline> = Vec::new();

    fn flush(buffer: &mut Vec<Inline>, blocks: &mut Vec<SemanticNode>) {
        if !buffer.is_empty() {
            blocks.push(SemanticNode::paragraph(None, std::mem::take(buffer), None));
        }
    }

    for child in node.children() {
        match child.value() {
            Node::Element(element) => match element.name() {
                "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                    flush(&mut inline_buffer, &mut blocks);
                    let level: u8 = element.name()[1..].parse().unwrap_or(1);
                    blocks.push(SemanticNode::heading(
                        None,
                        level,
                        collect_text(child).trim().to_string(),
                        None,
                    ));
                }
                "p" => {
                    flush(&mut inline_buffer, &mut blocks);
                    blocks.push(SemanticNode::paragraph(None, convert_inlines(child), None));
                }
                "ul" | "ol" => {
                    flush(&mut inline_buffer, &mut blocks);
                    blocks.push(convert_list(child, element.name() == "ol"));
                }
                "blockquote" => {
                    flush(&mut inline_buffer, &mut blocks);
                    blocks.push(SemanticNode::blockquote(
                        None,
                        convert_mixed_content(child),
                        None,
                    ));
                }
                "pre" => {
                    flush(&mut inline_buffer, &mut blocks);
                    blocks.push(convert_code_block(child));
                }
                "table" => {
                    flush(&mut inline_buffer, &mut blocks);
                    blocks.push(convert_table(child));
                }
                "hr" => {
                    flush(&mut inline_buffer, &mut blocks);
                    blocks.push(SemanticNode::thematic_break(None, None));
                }
                "li" => {
                    // Stray <li> outside a list; ignore rather than guess structure.
                }
                "head" | "script" | "style" => {
                    // Non-content.
                }
                _ => {
                    // div/section/article/body/html and similar: splice their
                    // block content in place rather than treating them as
                    // blocks themselves.
                    flush(&mut inline_buffer, &mut blocks);
                    blocks.extend(convert_mixed_content(child));
                }
            },
            Node::Text(text) => {
                let s = text.to_string();
                if !s.trim().is_empty() {
                    inline_buffer.push(Inline::Text(s));
                }
            }
            _ => {}
        }
    }
    flush(&mut inline_buffer, &mut blocks);
    blocks
}

fn convert_list(node: NodeRef<Node>, ordered: bool) -> SemanticNode {
    let mut items = Vec::new();
    for child in node.children() {
        if let Some(element) = child.value().as_element() {
            if element.name() == "li" {
                items.push(SemanticNode::list_item(None, convert_mixed_content(child), None));
            }
        }
    }
    SemanticNode::list(None, ordered, items, None)
}

fn convert_code_block(node: NodeRef<Node>) -> SemanticNode {
    let mut language = None;
    let mut text_source = node;
    for child in node.children() {
        if let Some(element) = child.value().as_element() {
            if element.name() == "code" {
                if let Some(class) = element.attr("class") {
                    language = class.strip_prefix("language-").map(String::from);
                }
                text_source = child;
                break;
            }
        }
    }
    SemanticNode::code_block(None, language, collect_text(text_source), None)
}

fn convert_table(node: NodeRef<Node>) -> SemanticNode {
    let mut caption = None;
    let mut rows_nodes = Vec::new();
    collect_rows(node, &mut rows_nodes, &mut caption);

    let mut headers = Vec::new();
    let mut rows = Vec::new();
    for (i, tr) in rows_nodes.iter().enumerate() {
        let cells: Vec<String> = tr
            .children()
            .filter(|c| {
                c.value()
                    .as_element()
                    .map(|e| e.name() == "td" || e.name() == "th")
                    .unwrap_or(false)
            })
            .map(|c| collect_text(c).trim().to_string())
            .collect();
        if i == 0 {
            headers = cells;
        } else {
            rows.push(cells);
        }
    }

    SemanticNode::table(None, caption, headers, rows, None)
}

fn collect_rows<'a>(
    node: NodeRef<'a, Node>,
    rows: &mut Vec<NodeRef<'a, Node>>,
    caption: &mut Option<String>,
) {
    for child in node.children() {
        if let Some(element) = child.value().as_element() {
            match element.name() {
                "caption" => {
                    let text = collect_text(child).trim().to_string();
                    if !text.is_empty() {
                        *caption = Some(text);
                    }
                }
                "tr" => rows.push(child),
                _ => collect_rows(child, rows, caption),
            }
        }
    }
}
