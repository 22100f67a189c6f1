//! Tests for the html5lib-style tree dump and the JSON view.

use wombat_dom::{
    Attribute, DoctypeData, DomTree, ElementData, Namespace, NodeId, NodeRef, NodeType, dump,
};

fn element(tree: &mut DomTree, parent: NodeId, ns: Namespace, tag: &str) -> NodeId {
    let id = tree.alloc_element(ElementData::new(ns, tag));
    tree.append_child(parent, id);
    id
}

#[test]
fn dump_nests_by_two_spaces() {
    let mut tree = DomTree::new();
    let doctype = tree.alloc(NodeType::Doctype(DoctypeData {
        name: "html".to_string(),
        ..DoctypeData::default()
    }));
    tree.append_child(NodeId::ROOT, doctype);
    let html = element(&mut tree, NodeId::ROOT, Namespace::Html, "html");
    let _ = element(&mut tree, html, Namespace::Html, "head");
    let body = element(&mut tree, html, Namespace::Html, "body");
    let comment = tree.alloc(NodeType::Comment {
        data: "c".to_string(),
    });
    tree.append_child(body, comment);
    let text = tree.alloc(NodeType::Text {
        data: "hi".to_string(),
    });
    tree.append_child(body, text);

    let expected = "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     <!-- c -->
|     \"hi\"
";
    assert_eq!(dump(&tree, NodeId::ROOT), expected);
}

#[test]
fn dump_doctype_with_identifiers() {
    let mut tree = DomTree::new();
    let doctype = tree.alloc(NodeType::Doctype(DoctypeData {
        name: "html".to_string(),
        public_id: "-//W3C//DTD HTML 4.01//EN".to_string(),
        system_id: String::new(),
    }));
    tree.append_child(NodeId::ROOT, doctype);

    assert_eq!(
        dump(&tree, NodeId::ROOT),
        "| <!DOCTYPE html \"-//W3C//DTD HTML 4.01//EN\" \"\">\n"
    );
}

#[test]
fn dump_sorts_attributes_and_labels_foreign_elements() {
    let mut tree = DomTree::new();
    let svg = element(&mut tree, NodeId::ROOT, Namespace::Svg, "svg");
    if let Some(data) = tree.as_element_mut(svg) {
        data.attrs.push(Attribute::new("width", "1"));
        data.attrs.push(Attribute {
            prefix: Some("xlink".to_string()),
            namespace: Some(Namespace::XLink),
            name: "href".to_string(),
            value: "#a".to_string(),
        });
        data.attrs.push(Attribute::new("viewBox", "0 0 1 1"));
    }
    let _ = element(&mut tree, svg, Namespace::MathMl, "mi");

    let expected = "\
| <svg svg>
|   viewBox=\"0 0 1 1\"
|   width=\"1\"
|   xlink href=\"#a\"
|   <math mi>
";
    assert_eq!(dump(&tree, NodeId::ROOT), expected);
}

#[test]
fn dump_template_contents() {
    let mut tree = DomTree::new();
    let template = element(&mut tree, NodeId::ROOT, Namespace::Html, "template");
    let contents = tree.template_contents(template).expect("contents");
    let _ = element(&mut tree, contents, Namespace::Html, "p");

    let expected = "\
| <template>
|   content
|     <p>
";
    assert_eq!(dump(&tree, NodeId::ROOT), expected);
}

#[test]
fn json_view_is_a_flat_node_table() {
    let mut tree = DomTree::new();
    let html = element(&mut tree, NodeId::ROOT, Namespace::Html, "html");
    let body = element(&mut tree, html, Namespace::Html, "body");

    let value = serde_json::to_value(NodeRef::new(&tree, NodeId::ROOT)).expect("serialize");

    assert_eq!(value["root"], NodeId::ROOT.0);
    let nodes = value["nodes"].as_array().expect("node table");
    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[0]["node"]["type"], "document");
    assert_eq!(nodes[0]["children"][0], html.0);
    assert_eq!(nodes[1]["node"]["tag_name"], "html");
    assert_eq!(nodes[1]["node"]["namespace"], "html");
    assert_eq!(nodes[1]["children"][0], body.0);
    assert!(nodes[1].get("content").is_none());
}

#[test]
fn json_view_lists_template_contents() {
    let mut tree = DomTree::new();
    let template = element(&mut tree, NodeId::ROOT, Namespace::Html, "template");
    let contents = tree.template_contents(template).expect("contents");
    let p = element(&mut tree, contents, Namespace::Html, "p");

    let value = serde_json::to_value(NodeRef::new(&tree, NodeId::ROOT)).expect("serialize");
    let nodes = value["nodes"].as_array().expect("node table");

    assert_eq!(nodes[1]["content"], contents.0);
    assert_eq!(nodes[2]["id"], contents.0);
    assert_eq!(nodes[2]["children"][0], p.0);
}

fn deep_tree(depth: usize) -> DomTree {
    let mut tree = DomTree::new();
    let mut parent = NodeId::ROOT;
    for _ in 0..depth {
        parent = element(&mut tree, parent, Namespace::Html, "span");
    }
    tree
}

#[test]
fn deep_trees_dump_without_recursion() {
    let tree = deep_tree(100_000);
    let out = dump(&tree, NodeId::ROOT);
    assert_eq!(out.lines().count(), 100_000);
    assert!(out.starts_with("| <span>\n|   <span>\n"));
}

#[test]
fn deep_trees_serialize_without_recursion() {
    let tree = deep_tree(100_000);
    let json = serde_json::to_string(&NodeRef::new(&tree, NodeId::ROOT)).expect("serialize");
    assert!(json.starts_with("{\"root\":0,\"nodes\":["));
}
