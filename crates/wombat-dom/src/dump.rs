//! Textual renderings of a [`DomTree`].
//!
//! [`dump`] produces the line-oriented format used by the html5lib
//! tree-construction test suite and must stay bit-for-bit stable.
//! [`print_tree`] is a looser, human-oriented view for debugging.

use std::fmt::Write as _;

use crate::{DomTree, Namespace, NodeId, NodeType};

/// Render the children of `root` in html5lib tree-construction format.
///
/// `root` is normally the Document or the `#document-fragment` node; the root
/// itself is not printed. Every line ends in `\n`.
///
/// ```text
/// | <html>
/// |   <head>
/// |   <body>
/// |     <svg svg>
/// |       xlink href="#a"
/// ```
#[must_use]
pub fn dump(tree: &DomTree, root: NodeId) -> String {
    let mut out = String::new();
    walk(tree, root, |id, depth, phase| {
        let indent = 1 + depth * 2;
        match phase {
            Phase::Node => dump_node(tree, id, indent, &mut out),
            Phase::Content => {
                line(&mut out, indent + 2);
                out.push_str("content\n");
            }
        }
    });
    out
}

fn line(out: &mut String, indent: usize) {
    out.push('|');
    out.extend(std::iter::repeat_n(' ', indent));
}

/// What a pending frame of a tree walk still has to emit.
#[derive(Clone, Copy)]
enum Phase {
    /// The node's own lines, then its children.
    Node,
    /// A template's `content` line, then the contents' children.
    Content,
}

/// Walk the subtree below `root` in document order with an explicit stack,
/// so arbitrarily deep trees do not exhaust the call stack.
///
/// `visit` is called with each node and its depth (the root's children are
/// at depth 0). Template contents are announced with `Phase::Content` at the
/// template's depth before their children, which sit two levels deeper.
fn walk(tree: &DomTree, root: NodeId, mut visit: impl FnMut(NodeId, usize, Phase)) {
    let mut stack: Vec<(NodeId, usize, Phase)> = tree
        .children(root)
        .iter()
        .rev()
        .map(|&child| (child, 0, Phase::Node))
        .collect();

    while let Some((id, depth, phase)) = stack.pop() {
        visit(id, depth, phase);
        match phase {
            Phase::Node => {
                if tree.template_contents(id).is_some() {
                    stack.push((id, depth, Phase::Content));
                }
                stack.extend(tree.children(id).iter().rev().map(|&child| (child, depth + 1, Phase::Node)));
            }
            Phase::Content => {
                if let Some(contents) = tree.template_contents(id) {
                    stack.extend(
                        tree.children(contents)
                            .iter()
                            .rev()
                            .map(|&child| (child, depth + 2, Phase::Node)),
                    );
                }
            }
        }
    }
}

fn dump_node(tree: &DomTree, id: NodeId, indent: usize, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };

    match &node.node_type {
        // Never reached below the root; fragments only appear as template
        // contents, which are rendered through the "content" line.
        NodeType::Document | NodeType::DocumentFragment => {}
        NodeType::Doctype(doctype) => {
            line(out, indent);
            out.push_str("<!DOCTYPE ");
            out.push_str(&doctype.name);
            if !doctype.public_id.is_empty() || !doctype.system_id.is_empty() {
                let _ = write!(out, " \"{}\" \"{}\"", doctype.public_id, doctype.system_id);
            }
            out.push_str(">\n");
        }
        NodeType::Text { data } => {
            line(out, indent);
            let _ = writeln!(out, "\"{data}\"");
        }
        NodeType::Comment { data } => {
            line(out, indent);
            let _ = writeln!(out, "<!-- {data} -->");
        }
        NodeType::Element(element) => {
            line(out, indent);
            match element.namespace {
                Namespace::Svg => out.push_str("<svg "),
                Namespace::MathMl => out.push_str("<math "),
                _ => out.push('<'),
            }
            out.push_str(&element.tag_name);
            out.push_str(">\n");

            let mut attrs: Vec<(String, &str)> = element
                .attrs
                .iter()
                .map(|attr| (attr.display_name(), attr.value.as_str()))
                .collect();
            attrs.sort_by(|a, b| a.0.cmp(&b.0));
            for (name, value) in attrs {
                line(out, indent + 2);
                let _ = writeln!(out, "{name}=\"{value}\"");
            }
        }
    }
}

/// Print an indented, human-oriented view of the subtree at `id` to stdout.
///
/// Whitespace in text nodes is made visible (`\n` and `·`), which is handy
/// when chasing foster-parenting and whitespace-splitting bugs.
pub fn print_tree(tree: &DomTree, id: NodeId, indent: usize) {
    print_node(tree, id, indent);
    walk(tree, id, |node, depth, phase| match phase {
        Phase::Node => print_node(tree, node, indent + 1 + depth),
        Phase::Content => println!("{}  content", "  ".repeat(indent + 1 + depth)),
    });
}

fn print_node(tree: &DomTree, id: NodeId, indent: usize) {
    let prefix = "  ".repeat(indent);
    let Some(node) = tree.get(id) else {
        return;
    };

    match &node.node_type {
        NodeType::Document => println!("{prefix}#document ({})", tree.quirks_mode()),
        NodeType::DocumentFragment => println!("{prefix}#document-fragment"),
        NodeType::Doctype(doctype) => println!("{prefix}<!DOCTYPE {}>", doctype.name),
        NodeType::Element(data) => {
            let name = match data.namespace {
                Namespace::Svg | Namespace::MathMl => format!("{} {}", data.namespace, data.tag_name),
                _ => data.tag_name.clone(),
            };
            if data.attrs.is_empty() {
                println!("{prefix}<{name}>");
            } else {
                let attrs: Vec<String> = data
                    .attrs
                    .iter()
                    .map(|attr| {
                        if attr.value.is_empty() {
                            attr.qualified_name()
                        } else {
                            format!("{}=\"{}\"", attr.qualified_name(), attr.value)
                        }
                    })
                    .collect();
                println!("{prefix}<{name} {}>", attrs.join(" "));
            }
        }
        NodeType::Text { data } => {
            let display = data.replace('\n', "\\n").replace(' ', "\u{00B7}");
            println!("{prefix}\"{display}\"");
        }
        NodeType::Comment { data } => println!("{prefix}<!-- {data} -->"),
    }
}
