//! Tests for the arena mutation API the tree builder relies on:
//! append_child (with implicit detach), insert_before, remove_child,
//! move_children and template contents allocation.

use wombat_dom::{DomTree, ElementData, Namespace, NodeId, NodeType};

fn element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc_element(ElementData::new(Namespace::Html, tag))
}

fn text(tree: &mut DomTree, data: &str) -> NodeId {
    tree.alloc(NodeType::Text {
        data: data.to_string(),
    })
}

/// Build `parent` with three children a, b, c attached under the document.
fn three_children(tree: &mut DomTree) -> (NodeId, NodeId, NodeId, NodeId) {
    let parent = element(tree, "div");
    tree.append_child(NodeId::ROOT, parent);
    let a = element(tree, "a");
    let b = element(tree, "b");
    let c = element(tree, "c");
    tree.append_child(parent, a);
    tree.append_child(parent, b);
    tree.append_child(parent, c);
    (parent, a, b, c)
}

#[test]
fn remove_first_child_relinks_siblings() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);

    tree.remove_child(parent, a);

    assert_eq!(tree.children(parent), &[b, c]);
    assert_eq!(tree.prev_sibling(b), None);
    assert_eq!(tree.parent(a), None);
    assert_eq!(tree.next_sibling(a), None);
}

#[test]
fn remove_middle_child_relinks_siblings() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);

    tree.remove_child(parent, b);

    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.next_sibling(a), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(a));
}

#[test]
fn remove_child_of_wrong_parent_is_noop() {
    let mut tree = DomTree::new();
    let (parent, a, _, _) = three_children(&mut tree);
    let other = element(&mut tree, "span");

    tree.remove_child(other, a);

    assert_eq!(tree.parent(a), Some(parent));
    assert_eq!(tree.children(parent).len(), 3);
}

#[test]
fn insert_before_first_child() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);
    let x = element(&mut tree, "x");

    tree.insert_before(parent, x, a);

    assert_eq!(tree.children(parent), &[x, a, b, c]);
    assert_eq!(tree.prev_sibling(x), None);
    assert_eq!(tree.next_sibling(x), Some(a));
    assert_eq!(tree.prev_sibling(a), Some(x));
}

#[test]
fn insert_before_middle_child() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);
    let x = element(&mut tree, "x");

    tree.insert_before(parent, x, c);

    assert_eq!(tree.children(parent), &[a, b, x, c]);
    assert_eq!(tree.next_sibling(b), Some(x));
    assert_eq!(tree.prev_sibling(c), Some(x));
}

#[test]
fn insert_before_unknown_reference_appends() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);
    let stranger = element(&mut tree, "stranger");
    let x = element(&mut tree, "x");

    tree.insert_before(parent, x, stranger);

    assert_eq!(tree.children(parent), &[a, b, c, x]);
}

#[test]
fn append_child_moves_attached_node() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);
    let other = element(&mut tree, "section");
    tree.append_child(NodeId::ROOT, other);

    tree.append_child(other, b);

    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.children(other), &[b]);
    assert_eq!(tree.parent(b), Some(other));
    assert_eq!(tree.prev_sibling(b), None);
    assert_eq!(tree.next_sibling(a), Some(c));
}

#[test]
fn move_children_preserves_order_and_links() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);
    let target = element(&mut tree, "section");
    let existing = text(&mut tree, "t");
    tree.append_child(target, existing);

    tree.move_children(parent, target);

    assert!(tree.children(parent).is_empty());
    assert_eq!(tree.children(target), &[existing, a, b, c]);
    for &id in &[a, b, c] {
        assert_eq!(tree.parent(id), Some(target));
    }
    assert_eq!(tree.next_sibling(existing), Some(a));
    assert_eq!(tree.prev_sibling(a), Some(existing));
    assert_eq!(tree.next_sibling(c), None);
}

#[test]
fn parent_and_children_stay_consistent_after_mixed_mutations() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);
    let other = element(&mut tree, "p");
    tree.append_child(NodeId::ROOT, other);

    tree.insert_before(other, c, NodeId(usize::MAX));
    tree.insert_before(parent, c, a);
    tree.move_children(parent, other);
    tree.detach(b);

    for id in 0..tree.len() {
        let id = NodeId(id);
        if let Some(p) = tree.parent(id) {
            let count = tree.children(p).iter().filter(|&&child| child == id).count();
            assert_eq!(count, 1, "node {id:?} listed {count} times under {p:?}");
        }
        for &child in tree.children(id) {
            assert_eq!(tree.parent(child), Some(id));
        }
    }
    assert_eq!(tree.children(other), &[c, a]);
}

#[test]
fn template_gets_contents_fragment() {
    let mut tree = DomTree::new();
    let template = element(&mut tree, "template");
    let div = element(&mut tree, "div");

    let contents = tree.template_contents(template).expect("template contents");
    assert!(matches!(
        tree.get(contents).map(|n| &n.node_type),
        Some(NodeType::DocumentFragment)
    ));
    assert_eq!(tree.template_contents(div), None);

    let svg_template = tree.alloc_element(ElementData::new(Namespace::Svg, "template"));
    assert_eq!(tree.template_contents(svg_template), None);
}

#[test]
fn body_finds_frameset_too() {
    let mut tree = DomTree::new();
    let html = element(&mut tree, "html");
    tree.append_child(NodeId::ROOT, html);
    let head = element(&mut tree, "head");
    let frameset = element(&mut tree, "frameset");
    tree.append_child(html, head);
    tree.append_child(html, frameset);

    assert_eq!(tree.document_element(), Some(html));
    assert_eq!(tree.body(), Some(frameset));
}
