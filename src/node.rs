//! The semantic node tree (intermediate representation).
//!
//! A finite, strictly-owning tree: no cycles, no back-references. Identity is
//! explicit via [`NodeId`], not address, so the tree can be serialized,
//! cached, and rebuilt without losing its shape.

use crate::identity::NodeId;
use serde::{Deserialize, Serialize};

/// Byte/line span in the original source, when a parser can supply one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRange {
    pub start_offset: usize,
    pub end_offset: usize,
    pub start_line: usize,
    pub end_line: usize,
}

/// An ordered, non-empty-component hierarchy path (e.g. `["Guide",
/// "Details", "Table", "Row 1"]`), with a canonical `" > "`-joined form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb(Vec<String>);

impl Breadcrumb {
    pub fn new(components: Vec<String>) -> Self {
        Self(components)
    }

    pub fn root(label: impl Into<String>) -> Self {
        Self(vec![label.into()])
    }

    /// A new breadcrumb with `component` appended; does not mutate `self`.
    pub fn appending(&self, component: impl Into<String>) -> Self {
        let mut components = self.0.clone();
        components.push(component.into());
        Self(components)
    }

    pub fn components(&self) -> &[String] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn joined(&self) -> String {
        self.0.join(" > ")
    }
}

/// Inline content: identified only by its enclosing block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Inline {
    Link {
        destination: Option<String>,
        children: Vec<Inline>,
    },
    Image {
        source: Option<String>,
        alt: String,
    },
    Text(String),
    Emphasis(Vec<Inline>),
    Strong(Vec<Inline>),
    InlineCode(String),
}

impl Inline {
    /// Concatenation of textual leaves.
    pub fn plain_text(&self) -> String {
        match self {
            Inline::Link { children, .. } => children.iter().map(Inline::plain_text).collect(),
            Inline::Image { alt, .. } => alt.clone(),
            Inline::Text(s) => s.clone(),
            Inline::Emphasis(children) | Inline::Strong(children) => {
                children.iter().map(Inline::plain_text).collect()
            }
            Inline::InlineCode(s) => s.clone(),
        }
    }
}

/// A block in the semantic tree. Every variant carries a content-addressed
/// [`NodeId`] and an optional [`SourceRange`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SemanticNode {
    Heading {
        id: NodeId,
        level: u8,
        text: String,
        range: Option<SourceRange>,
    },
    Paragraph {
        id: NodeId,
        children: Vec<Inline>,
        range: Option<SourceRange>,
    },
    List {
        id: NodeId,
        ordered: bool,
        items: Vec<SemanticNode>,
        range: Option<SourceRange>,
    },
    ListItem {
        id: NodeId,
        children: Vec<SemanticNode>,
        range: Option<SourceRange>,
    },
    Blockquote {
        id: NodeId,
        children: Vec<SemanticNode>,
        range: Option<SourceRange>,
    },
    CodeBlock {
        id: NodeId,
        language: Option<String>,
        code: String,
        range: Option<SourceRange>,
    },
    Table {
        id: NodeId,
        caption: Option<String>,
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
        range: Option<SourceRange>,
    },
    ThematicBreak {
        id: NodeId,
        range: Option<SourceRange>,
    },
}

impl SemanticNode {
    pub fn heading(
        parent: Option<&NodeId>,
        level: u8,
        text: impl Into<String>,
        range: Option<SourceRange>,
    ) -> Self {
        let text = text.into();
        let level = level.clamp(1, 6);
        let id = NodeId::compute(parent, &text);
        SemanticNode::Heading {
            id,
            level,
            text,
            range,
        }
    }

    pub fn paragraph(parent: Option<&NodeId>, children: Vec<Inline>, range: Option<SourceRange>) -> Self {
        let content: String = children.iter().map(Inline::plain_text).collect();
        let id = NodeId::compute(parent, &content);
        SemanticNode::Paragraph { id, children, range }
    }

    pub fn list(
        parent: Option<&NodeId>,
        ordered: bool,
        items: Vec<SemanticNode>,
        range: Option<SourceRange>,
    ) -> Self {
        let content = join_plain_text(&items, "\n");
        let id = NodeId::compute(parent, &content);
        SemanticNode::List {
            id,
            ordered,
            items,
            range,
        }
    }

    pub fn list_item(
        parent: Option<&NodeId>,
        children: Vec<SemanticNode>,
        range: Option<SourceRange>,
    ) -> Self {
        let content = join_plain_text(&children, " ");
        let id = NodeId::compute(parent, &content);
        SemanticNode::ListItem { id, children, range }
    }

    pub fn blockquote(
        parent: Option<&NodeId>,
        children: Vec<SemanticNode>,
        range: Option<SourceRange>,
    ) -> Self {
        let content = join_plain_text(&children, "\n");
        let id = NodeId::compute(parent, &content);
        SemanticNode::Blockquote { id, children, range }
    }

    pub fn code_block(
        parent: Option<&NodeId>,
        language: Option<String>,
        code: impl Into<String>,
        range: Option<SourceRange>,
    ) -> Self {
        let code = code.into();
        let content = format!("{}{}", language.as_deref().unwrap_or(""), code);
        let id = NodeId::compute(parent, &content);
        SemanticNode::CodeBlock {
            id,
            language,
            code,
            range,
        }
    }

    pub fn table(
        parent: Option<&NodeId>,
        caption: Option<String>,
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
        range: Option<SourceRange>,
    ) -> Self {
        let flattened_rows: String = rows.iter().flatten().cloned().collect::<Vec<_>>().join("");
        let content = format!(
            "{}{}{}",
            caption.as_deref().unwrap_or(""),
            headers.join(""),
            flattened_rows
        );
        let id = NodeId::compute(parent, &content);
        SemanticNode::Table {
            id,
            caption,
            headers,
            rows,
            range,
        }
    }

    pub fn thematic_break(parent: Option<&NodeId>, range: Option<SourceRange>) -> Self {
        let id = NodeId::compute(parent, "thematicBreak");
        SemanticNode::ThematicBreak { id, range }
    }

    pub fn id(&self) -> &NodeId {
        match self {
            SemanticNode::Heading { id, .. }
            | SemanticNode::Paragraph { id, .. }
            | SemanticNode::List { id, .. }
            | SemanticNode::ListItem { id, .. }
            | SemanticNode::Blockquote { id, .. }
            | SemanticNode::CodeBlock { id, .. }
            | SemanticNode::Table { id, .. }
            | SemanticNode::ThematicBreak { id, .. } => id,
        }
    }

    pub fn range(&self) -> Option<&SourceRange> {
        match self {
            SemanticNode::Heading { range, .. }
            | SemanticNode::Paragraph { range, .. }
            | SemanticNode::List { range, .. }
            | SemanticNode::ListItem { range, .. }
            | SemanticNode::Blockquote { range, .. }
            | SemanticNode::CodeBlock { range, .. }
            | SemanticNode::Table { range, .. }
            | SemanticNode::ThematicBreak { range, .. } => range.as_ref(),
        }
    }

    /// Concatenation of textual leaves; list items and table rows are
    /// newline-separated.
    pub fn plain_text(&self) -> String {
        match self {
            SemanticNode::Heading { text, .. } => text.clone(),
            SemanticNode::Paragraph { children, .. } => {
                children.iter().map(Inline::plain_text).collect()
            }
            SemanticNode::List { items, .. } => items
                .iter()
                .map(SemanticNode::plain_text)
                .collect::<Vec<_>>()
                .join("\n"),
            SemanticNode::ListItem { children, .. } => children
                .iter()
                .map(SemanticNode::plain_text)
                .collect::<Vec<_>>()
                .join(" "),
            SemanticNode::Blockquote { children, .. } => children
                .iter()
                .map(SemanticNode::plain_text)
                .collect::<Vec<_>>()
                .join("\n"),
            SemanticNode::CodeBlock { code, .. } => code.clone(),
            SemanticNode::Table { headers, rows, .. } => {
                let mut lines = vec![headers.join(" | ")];
                lines.extend(rows.iter().map(|row| row.join(" | ")));
                lines.join("\n")
            }
            SemanticNode::ThematicBreak { .. } => String::new(),
        }
    }

    /// Heuristic weight in `[0, 1]` used by quality scoring.
    pub fn structural_importance(&self) -> f64 {
        match self {
            SemanticNode::Heading { level, .. } => 1.0 - 0.15 * (*level as f64 - 1.0),
            SemanticNode::Table { .. } => 0.9,
            SemanticNode::CodeBlock { .. } => 0.8,
            SemanticNode::List { .. } => 0.7,
            SemanticNode::Blockquote { .. } => 0.6,
            SemanticNode::Paragraph { .. } => 0.5,
            SemanticNode::ListItem { .. } | SemanticNode::ThematicBreak { .. } => 0.0,
        }
    }

    /// True for node kinds that end the current semantic run.
    pub fn is_context_boundary(&self) -> bool {
        matches!(
            self,
            SemanticNode::Heading { .. } | SemanticNode::Table { .. } | SemanticNode::CodeBlock { .. } | SemanticNode::ThematicBreak { .. }
        )
    }

    /// True for node kinds routed through a specialized chunk handler.
    pub fn requires_special_handling(&self) -> bool {
        matches!(self, SemanticNode::Table { .. } | SemanticNode::CodeBlock { .. })
    }

    /// Rebuild this node's id (and every descendant's) as if originally
    /// constructed under `parent`.
    ///
    /// Parsers build a container's children before the container's own id is
    /// known (a list's id is derived from its items' `plain_text`, which in
    /// turn requires the items to already exist). Building bottom-up with a
    /// placeholder parent and then calling `reparented` once at the node's
    /// true attachment point fixes every id in the subtree without
    /// recomputing any content, since `plain_text` never depends on a node's
    /// own id.
    pub fn reparented(self, parent: Option<&NodeId>) -> Self {
        match self {
            SemanticNode::Heading { level, text, range, .. } => {
                SemanticNode::heading(parent, level, text, range)
            }
            SemanticNode::Paragraph { children, range, .. } => {
                SemanticNode::paragraph(parent, children, range)
            }
            SemanticNode::List { ordered, items, range, .. } => {
                let content = join_plain_text(&items, "\n");
                let id = NodeId::compute(parent, &content);
                let items = items.into_iter().map(|item| item.reparented(Some(&id))).collect();
                SemanticNode::List { id, ordered, items, range }
            }
            SemanticNode::ListItem { children, range, .. } => {
                let content = join_plain_text(&children, " ");
                let id = NodeId::compute(parent, &content);
                let children = children.into_iter().map(|c| c.reparented(Some(&id))).collect();
                SemanticNode::ListItem { id, children, range }
            }
            SemanticNode::Blockquote { children, range, .. } => {
                let content = join_plain_text(&children, "\n");
                let id = NodeId::compute(parent, &content);
                let children = children.into_iter().map(|c| c.reparented(Some(&id))).collect();
                SemanticNode::Blockquote { id, children, range }
            }
            SemanticNode::CodeBlock { language, code, range, .. } => {
                SemanticNode::code_block(parent, language, code, range)
            }
            SemanticNode::Table { caption, headers, rows, range, .. } => {
                SemanticNode::table(parent, caption, headers, rows, range)
            }
            SemanticNode::ThematicBreak { range, .. } => SemanticNode::thematic_break(parent, range),
        }
    }
}

fn join_plain_text(nodes: &[SemanticNode], sep: &str) -> String {
    nodes
        .iter()
        .map(SemanticNode::plain_text)
        .collect::<Vec<_>>()
        .join(sep)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_importance_decreases_with_level() {
        let h1 = SemanticNode::heading(None, 1, "A", None);
        let h3 = SemanticNode::heading(None, 3, "B", None);
        assert!(h1.structural_importance() > h3.structural_importance());
    }

    #[test]
    fn table_plain_text_includes_headers_and_rows() {
        let table = SemanticNode::table(
            None,
            None,
            vec!["a".into(), "b".into()],
            vec![vec!["1".into(), "2".into()]],
            None,
        );
        let text = table.plain_text();
        assert!(text.contains("a | b"));
        assert!(text.contains("1 | 2"));
    }

    #[test]
    fn context_boundary_kinds() {
        assert!(SemanticNode::heading(None, 1, "x", None).is_context_boundary());
        assert!(SemanticNode::thematic_break(None, None).is_context_boundary());
        let p = SemanticNode::paragraph(None, vec![Inline::Text("x".into())], None);
        assert!(!p.is_context_boundary());
    }

    #[test]
    fn breadcrumb_appending_is_non_mutating() {
        let root = Breadcrumb::root("Doc");
        let child = root.appending("Intro");
        assert_eq!(root.depth(), 1);
        assert_eq!(child.depth(), 2);
        assert_eq!(child.joined(), "Doc > Intro");
    }

    #[test]
    fn identical_content_under_identical_parent_same_id() {
        let parent = NodeId::compute(None, "parent");
        let a = SemanticNode::paragraph(Some(&parent), vec![Inline::Text("same".into())], None);
        let b = SemanticNode::paragraph(Some(&parent), vec![Inline::Text("same".into())], None);
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn reparented_fixes_ids_through_nested_list_items() {
        let item = SemanticNode::list_item(
            None,
            vec![SemanticNode::paragraph(
                None,
                vec![Inline::Text("one".into())],
                None,
            )],
            None,
        );
        let list = SemanticNode::list(None, false, vec![item], None);
        let real_parent = NodeId::compute(None, "document");
        let list = list.reparented(Some(&real_parent));

        let expected_content = join_plain_text(
            &[SemanticNode::list_item(
                None,
                vec![SemanticNode::paragraph(
                    None,
                    vec![Inline::Text("one".into())],
                    None,
                )],
                None,
            )],
            "\n",
        );
        let expected_id = NodeId::compute(Some(&real_parent), &expected_content);
        assert_eq!(list.id(), &expected_id);
    }
}
