//! [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)

use wombat_dom::{DomTree, ElementData, Namespace, NodeId};

/// The flavours of "has an element in ... scope".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScopeKind {
    /// [has an element in scope](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-scope)
    Default,
    /// [has an element in list item scope](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-list-item-scope):
    /// the default set plus `ol` and `ul`.
    ListItem,
    /// [has an element in button scope](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-button-scope):
    /// the default set plus `button`.
    Button,
    /// [has an element in table scope](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-table-scope):
    /// `html`, `table`, `template`.
    Table,
    /// [has an element in select scope](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-select-scope):
    /// everything except `optgroup` and `option`.
    Select,
}

/// "The stack of open elements is said to have a particular element in scope
/// when it has that element in the specific scope consisting of the following
/// element types: applet, caption, html, table, td, th, marquee, object,
/// template, MathML mi, MathML mo, MathML mn, MathML ms, MathML mtext, MathML
/// annotation-xml, SVG foreignObject, SVG desc, SVG title."
fn in_default_scope_set(element: &ElementData) -> bool {
    match element.namespace {
        Namespace::Html => matches!(
            element.tag_name.as_str(),
            "applet" | "caption" | "html" | "table" | "td" | "th" | "marquee" | "object" | "template"
        ),
        Namespace::MathMl => matches!(
            element.tag_name.as_str(),
            "mi" | "mo" | "mn" | "ms" | "mtext" | "annotation-xml"
        ),
        Namespace::Svg => matches!(element.tag_name.as_str(), "foreignObject" | "desc" | "title"),
        _ => false,
    }
}

impl ScopeKind {
    /// Returns true if `element` ends a scope search of this kind.
    fn terminates_at(self, element: &ElementData) -> bool {
        match self {
            Self::Default => in_default_scope_set(element),
            Self::ListItem => {
                in_default_scope_set(element) || element.is_html_one_of(&["ol", "ul"])
            }
            Self::Button => in_default_scope_set(element) || element.is_html("button"),
            Self::Table => element.is_html_one_of(&["html", "table", "template"]),
            Self::Select => !element.is_html_one_of(&["optgroup", "option"]),
        }
    }
}

/// The stack of open elements. Bottom (`html`) is index 0; the current node
/// is the last entry.
#[derive(Debug, Clone, Default)]
pub(crate) struct OpenElements {
    items: Vec<NodeId>,
}

impl OpenElements {
    pub(crate) fn push(&mut self, node: NodeId) {
        self.items.push(node);
    }

    pub(crate) fn pop(&mut self) -> Option<NodeId> {
        self.items.pop()
    }

    /// "The current node is the bottommost node in this stack of open elements."
    pub(crate) fn current(&self) -> Option<NodeId> {
        self.items.last().copied()
    }

    pub(crate) fn first(&self) -> Option<NodeId> {
        self.items.first().copied()
    }

    pub(crate) fn get(&self, index: usize) -> Option<NodeId> {
        self.items.get(index).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn contains(&self, node: NodeId) -> bool {
        self.items.contains(&node)
    }

    pub(crate) fn position(&self, node: NodeId) -> Option<usize> {
        self.items.iter().position(|&id| id == node)
    }

    /// Iterate from the current node down to the `html` element.
    pub(crate) fn iter_rev(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.items.iter().rev().copied()
    }

    pub(crate) fn insert(&mut self, index: usize, node: NodeId) {
        self.items.insert(index, node);
    }

    pub(crate) fn remove_at(&mut self, index: usize) -> Option<NodeId> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Remove `node` wherever it is on the stack.
    pub(crate) fn remove(&mut self, node: NodeId) {
        if let Some(index) = self.position(node) {
            let _ = self.items.remove(index);
        }
    }

    pub(crate) fn replace(&mut self, old: NodeId, new: NodeId) {
        if let Some(index) = self.position(old) {
            self.items[index] = new;
        }
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.items.truncate(len);
    }

    /// Find the topmost HTML element named `name`.
    pub(crate) fn find_html(&self, tree: &DomTree, name: &str) -> Option<(usize, NodeId)> {
        self.items
            .iter()
            .enumerate()
            .rev()
            .find(|&(_, &id)| tree.as_element(id).is_some_and(|e| e.is_html(name)))
            .map(|(index, &id)| (index, id))
    }

    /// Returns true if the stack holds an HTML element named `name` anywhere.
    pub(crate) fn contains_html(&self, tree: &DomTree, name: &str) -> bool {
        self.find_html(tree, name).is_some()
    }

    /// Returns true if the current node is an HTML element named `name`.
    pub(crate) fn current_is(&self, tree: &DomTree, name: &str) -> bool {
        self.current()
            .and_then(|id| tree.as_element(id))
            .is_some_and(|e| e.is_html(name))
    }

    /// Returns true if the current node is an HTML element named one of `names`.
    pub(crate) fn current_is_one_of(&self, tree: &DomTree, names: &[&str]) -> bool {
        self.current()
            .and_then(|id| tree.as_element(id))
            .is_some_and(|e| e.is_html_one_of(names))
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
    ///
    /// 1. "Initialize node to be the current node (the bottommost node of the stack)."
    /// 2. "If node is the target node, terminate in a match state."
    /// 3. "Otherwise, if node is one of the element types in list, terminate in a failure state."
    /// 4. "Otherwise, set node to the previous entry in the stack of open elements
    ///    and return to step 2."
    fn has_matching_in_scope(
        &self,
        tree: &DomTree,
        kind: ScopeKind,
        is_target: impl Fn(NodeId, &ElementData) -> bool,
    ) -> bool {
        for id in self.iter_rev() {
            let Some(element) = tree.as_element(id) else {
                continue;
            };
            if is_target(id, element) {
                return true;
            }
            if kind.terminates_at(element) {
                return false;
            }
        }
        false
    }

    /// Has an HTML element named `name` in the given scope.
    pub(crate) fn has_in_scope(&self, tree: &DomTree, name: &str, kind: ScopeKind) -> bool {
        self.has_matching_in_scope(tree, kind, |_, e| e.is_html(name))
    }

    /// Has an HTML element named any of `names` in the given scope.
    pub(crate) fn has_any_in_scope(&self, tree: &DomTree, names: &[&str], kind: ScopeKind) -> bool {
        self.has_matching_in_scope(tree, kind, |_, e| e.is_html_one_of(names))
    }

    /// Has this exact node in the given scope.
    pub(crate) fn has_node_in_scope(&self, tree: &DomTree, node: NodeId, kind: ScopeKind) -> bool {
        self.has_matching_in_scope(tree, kind, |id, _| id == node)
    }
}

#[cfg(test)]
mod tests {
    use wombat_dom::NodeType;

    use super::*;

    fn push(tree: &mut DomTree, stack: &mut OpenElements, ns: Namespace, name: &str) -> NodeId {
        let id = tree.alloc(NodeType::Element(ElementData::new(ns, name)));
        stack.push(id);
        id
    }

    #[test]
    fn table_hides_paragraph_from_default_scope() {
        let mut tree = DomTree::new();
        let mut stack = OpenElements::default();
        let _ = push(&mut tree, &mut stack, Namespace::Html, "html");
        let _ = push(&mut tree, &mut stack, Namespace::Html, "body");
        let _ = push(&mut tree, &mut stack, Namespace::Html, "p");
        assert!(stack.has_in_scope(&tree, "p", ScopeKind::Default));
        assert!(stack.has_in_scope(&tree, "p", ScopeKind::Button));

        let _ = push(&mut tree, &mut stack, Namespace::Html, "table");
        assert!(!stack.has_in_scope(&tree, "p", ScopeKind::Default));
        assert!(!stack.has_in_scope(&tree, "p", ScopeKind::Button));
        assert!(stack.has_in_scope(&tree, "table", ScopeKind::Table));
    }

    #[test]
    fn list_item_and_button_scopes_add_terminators() {
        let mut tree = DomTree::new();
        let mut stack = OpenElements::default();
        let _ = push(&mut tree, &mut stack, Namespace::Html, "html");
        let _ = push(&mut tree, &mut stack, Namespace::Html, "li");
        let _ = push(&mut tree, &mut stack, Namespace::Html, "ul");
        assert!(stack.has_in_scope(&tree, "li", ScopeKind::Default));
        assert!(!stack.has_in_scope(&tree, "li", ScopeKind::ListItem));

        let _ = push(&mut tree, &mut stack, Namespace::Html, "p");
        let _ = push(&mut tree, &mut stack, Namespace::Html, "button");
        assert!(!stack.has_in_scope(&tree, "p", ScopeKind::Button));
        assert!(stack.has_in_scope(&tree, "p", ScopeKind::Default));
    }

    #[test]
    fn foreign_integration_points_terminate_default_scope() {
        let mut tree = DomTree::new();
        let mut stack = OpenElements::default();
        let _ = push(&mut tree, &mut stack, Namespace::Html, "html");
        let _ = push(&mut tree, &mut stack, Namespace::Html, "p");
        let _ = push(&mut tree, &mut stack, Namespace::Svg, "svg");
        assert!(stack.has_in_scope(&tree, "p", ScopeKind::Default));
        let _ = push(&mut tree, &mut stack, Namespace::Svg, "foreignObject");
        assert!(!stack.has_in_scope(&tree, "p", ScopeKind::Default));
    }

    #[test]
    fn target_must_be_html() {
        let mut tree = DomTree::new();
        let mut stack = OpenElements::default();
        let _ = push(&mut tree, &mut stack, Namespace::Html, "html");
        let _ = push(&mut tree, &mut stack, Namespace::Svg, "title");
        assert!(!stack.has_in_scope(&tree, "title", ScopeKind::Default));
    }

    #[test]
    fn select_scope_skips_only_options() {
        let mut tree = DomTree::new();
        let mut stack = OpenElements::default();
        let _ = push(&mut tree, &mut stack, Namespace::Html, "html");
        let select = push(&mut tree, &mut stack, Namespace::Html, "select");
        let _ = push(&mut tree, &mut stack, Namespace::Html, "optgroup");
        let _ = push(&mut tree, &mut stack, Namespace::Html, "option");
        assert!(stack.has_in_scope(&tree, "select", ScopeKind::Select));
        assert!(stack.has_node_in_scope(&tree, select, ScopeKind::Select));
        let _ = push(&mut tree, &mut stack, Namespace::Html, "div");
        assert!(!stack.has_in_scope(&tree, "select", ScopeKind::Select));
    }
}
