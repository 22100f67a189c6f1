//! JSON-friendly view of a subtree.

use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};

use crate::{DomTree, NodeId, NodeType};

/// A borrowed view of the subtree at one node that serializes as a flat
/// node table in document order:
///
/// ```text
/// {"root": 0, "nodes": [{"id": 0, "node": {...}, "children": [1]}, ...]}
/// ```
///
/// Templates also carry `content`, the id of their contents fragment, which
/// is listed right after the template's own descendants. Children are
/// referenced by id, so the depth of the tree never shows up as nesting.
///
/// ```ignore
/// let json = serde_json::to_string(&NodeRef::new(&tree, tree.root()))?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a DomTree,
    id: NodeId,
}

/// One row of the node table.
#[derive(Serialize)]
struct Entry<'a> {
    id: NodeId,
    node: &'a NodeType,
    children: &'a [NodeId],
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<NodeId>,
}

impl<'a> NodeRef<'a> {
    /// View the node `id` of `tree`.
    #[must_use]
    pub const fn new(tree: &'a DomTree, id: NodeId) -> Self {
        Self { tree, id }
    }

    fn entries(&self) -> Vec<Entry<'a>> {
        let mut entries = Vec::new();
        let mut stack = vec![self.id];
        while let Some(id) = stack.pop() {
            let Some(node) = self.tree.get(id) else {
                continue;
            };
            let children = self.tree.children(id);
            let content = self.tree.template_contents(id);
            if let Some(contents) = content {
                stack.push(contents);
            }
            stack.extend(children.iter().rev());
            entries.push(Entry {
                id,
                node: &node.node_type,
                children,
                content,
            });
        }
        entries
    }
}

impl Serialize for NodeRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Tree", 2)?;
        state.serialize_field("root", &self.id)?;
        state.serialize_field("nodes", &self.entries())?;
        state.end()
    }
}
