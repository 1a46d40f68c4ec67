//! Node tree projections and breadcrumb invariants (spec.md §8).

use dendrite::node::{Breadcrumb, Inline, SemanticNode};

#[test]
fn breadcrumb_never_has_empty_components_after_appending() {
    let root = Breadcrumb::root("Guide");
    let child = root.appending("Table").appending("Row 1");
    for component in child.components() {
        assert!(!component.is_empty());
    }
    assert_eq!(child.joined(), "Guide > Table > Row 1");
}

#[test]
fn heading_structural_importance_decreases_with_depth() {
    let h1 = SemanticNode::heading(None, 1, "Top", None);
    let h6 = SemanticNode::heading(None, 6, "Deep", None);
    assert!(h1.structural_importance() > h6.structural_importance());
}

#[test]
fn table_and_code_block_require_special_handling_but_paragraph_does_not() {
    let table = SemanticNode::table(None, None, vec!["a".into()], vec![vec!["1".into()]], None);
    let code = SemanticNode::code_block(None, Some("rust".into()), "fn main() {}", None);
    let paragraph = SemanticNode::paragraph(None, vec![Inline::Text("text".into())], None);

    assert!(table.requires_special_handling());
    assert!(code.requires_special_handling());
    assert!(!paragraph.requires_special_handling());
}

#[test]
fn reparenting_a_list_changes_every_descendant_id() {
    let item = SemanticNode::list_item(None, vec![SemanticNode::paragraph(None, vec![Inline::Text("x".into())], None)], None);
    let list = SemanticNode::list(None, false, vec![item], None);
    let before_id = list.id().clone();

    let parent = dendrite::identity::NodeId::compute(None, "document root");
    let reparented = list.reparented(Some(&parent));

    assert_ne!(reparented.id(), &before_id);
}
