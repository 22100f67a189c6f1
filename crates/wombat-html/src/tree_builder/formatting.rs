//! [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)

use wombat_dom::{Namespace, NodeId};

use super::TreeBuilder;
use crate::tokenizer::Tag;

/// An entry in the list of active formatting elements.
#[derive(Debug, Clone)]
pub(crate) enum FormattingEntry {
    /// A formatting element, with the start tag it was created from so it can
    /// be re-created by reconstruction or the adoption agency.
    Element {
        /// The element in the arena.
        node: NodeId,
        /// "the token for which the element was created"
        tag: Tag,
    },
    /// "A marker is an entry in the list of active formatting elements that is
    /// distinct from any element." Pushed for applet, object, marquee,
    /// template, td, th and caption.
    Marker,
}

impl FormattingEntry {
    const fn node(&self) -> Option<NodeId> {
        match self {
            Self::Element { node, .. } => Some(*node),
            Self::Marker => None,
        }
    }
}

/// "Two elements have the same tag name, namespace, and attributes" when their
/// attribute lists hold the same name/value pairs, in any order.
fn same_attributes(a: &Tag, b: &Tag) -> bool {
    a.attrs.len() == b.attrs.len()
        && a.attrs.iter().all(|attr| {
            b.attrs
                .iter()
                .any(|other| other.name == attr.name && other.value == attr.value)
        })
}

/// The list of active formatting elements.
#[derive(Debug, Clone, Default)]
pub(crate) struct ActiveFormattingElements {
    entries: Vec<FormattingEntry>,
}

impl ActiveFormattingElements {
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn get(&self, index: usize) -> Option<&FormattingEntry> {
        self.entries.get(index)
    }

    pub(crate) fn push_marker(&mut self) {
        self.entries.push(FormattingEntry::Marker);
    }

    /// [Push onto the list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#push-onto-the-list-of-active-formatting-elements)
    ///
    /// "If there are already three elements in the list of active formatting
    /// elements after the last marker, if any, or anywhere in the list if there
    /// are no markers, that have the same tag name, namespace, and attributes as
    /// element, then remove the earliest such element from the list of active
    /// formatting elements." (the Noah's Ark clause)
    pub(crate) fn push(&mut self, node: NodeId, tag: Tag) {
        let mut matching = Vec::new();
        for (index, entry) in self.entries.iter().enumerate().rev() {
            match entry {
                FormattingEntry::Marker => break,
                FormattingEntry::Element { tag: existing, .. } => {
                    if existing.name == tag.name && same_attributes(existing, &tag) {
                        matching.push(index);
                    }
                }
            }
        }
        if matching.len() >= 3
            && let Some(&earliest) = matching.last()
        {
            let _ = self.entries.remove(earliest);
        }
        self.entries.push(FormattingEntry::Element { node, tag });
    }

    /// [Clear the list of active formatting elements up to the last marker](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-list-of-active-formatting-elements-up-to-the-last-marker)
    pub(crate) fn clear_to_last_marker(&mut self) {
        while let Some(entry) = self.entries.pop() {
            if matches!(entry, FormattingEntry::Marker) {
                break;
            }
        }
    }

    /// Index of the entry for `node`.
    pub(crate) fn position(&self, node: NodeId) -> Option<usize> {
        self.entries.iter().position(|e| e.node() == Some(node))
    }

    pub(crate) fn contains(&self, node: NodeId) -> bool {
        self.position(node).is_some()
    }

    /// "the last element in the list of active formatting elements that is
    /// between the end of the list and the last marker in the list, if any, or
    /// the start of the list otherwise, and has the tag name `name`"
    pub(crate) fn last_named_after_marker(&self, name: &str) -> Option<(usize, NodeId)> {
        for (index, entry) in self.entries.iter().enumerate().rev() {
            match entry {
                FormattingEntry::Marker => return None,
                FormattingEntry::Element { node, tag } if tag.name == name => {
                    return Some((index, *node));
                }
                FormattingEntry::Element { .. } => {}
            }
        }
        None
    }

    /// The start tag a formatting element was created from.
    pub(crate) fn tag_of(&self, index: usize) -> Option<&Tag> {
        match self.entries.get(index) {
            Some(FormattingEntry::Element { tag, .. }) => Some(tag),
            _ => None,
        }
    }

    pub(crate) fn remove_at(&mut self, index: usize) {
        if index < self.entries.len() {
            let _ = self.entries.remove(index);
        }
    }

    pub(crate) fn remove_node(&mut self, node: NodeId) {
        if let Some(index) = self.position(node) {
            let _ = self.entries.remove(index);
        }
    }

    pub(crate) fn insert(&mut self, index: usize, node: NodeId, tag: Tag) {
        let index = index.min(self.entries.len());
        self.entries.insert(index, FormattingEntry::Element { node, tag });
    }

    pub(crate) fn replace_at(&mut self, index: usize, node: NodeId) {
        if let Some(FormattingEntry::Element { node: slot, .. }) = self.entries.get_mut(index) {
            *slot = node;
        }
    }
}

impl TreeBuilder {
    /// [§ 13.2.4.3 Reconstruct the active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#reconstruct-the-active-formatting-elements)
    ///
    /// Rewind phase (steps 4-6) walks backwards to the first entry that is
    /// neither a marker nor open; create phase (steps 7-10) walks forward
    /// re-creating every entry from there on.
    pub(crate) fn reconstruct_active_formatting_elements(&mut self) {
        // STEP 1: "If there are no entries in the list of active formatting
        //          elements, then there is nothing to reconstruct; stop this algorithm."
        // STEP 2: "If the last (most recently added) entry in the list of active
        //          formatting elements is a marker, or if it is an element that is
        //          in the stack of open elements, then there is nothing to
        //          reconstruct; stop this algorithm."
        let Some(last) = self.active_formatting.len().checked_sub(1) else {
            return;
        };
        let is_settled = |builder: &Self, index: usize| match builder.active_formatting.get(index) {
            Some(FormattingEntry::Element { node, .. }) => builder.open_elements.contains(*node),
            _ => true,
        };
        if is_settled(self, last) {
            return;
        }

        // STEP 3-6: "Let entry be the last (most recently added) element... Rewind:
        //            If there are no entries before entry in the list of active
        //            formatting elements, then jump to the step labeled create.
        //            Let entry be the entry one earlier than entry... If entry is
        //            neither a marker nor an element that is also in the stack of
        //            open elements, go to the step labeled rewind."
        let mut index = last;
        while index > 0 && !is_settled(self, index - 1) {
            index -= 1;
        }

        // STEP 7-10: "Advance... Create: Insert an HTML element for the token for
        //             which the element entry was created, to obtain new element.
        //             Replace the entry for entry in the list with an entry for new
        //             element. If the entry for new element in the list of active
        //             formatting elements is not the last entry in the list, return
        //             to the step labeled advance."
        for position in index..=last {
            let Some(tag) = self.active_formatting.tag_of(position).cloned() else {
                continue;
            };
            let new_element = self.insert_element_for(&tag, Namespace::Html);
            self.active_formatting.replace_at(position, new_element);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opts::ParseOpts;
    use crate::tokenizer::Token;

    fn builder_with(tokens: Vec<Token>) -> TreeBuilder {
        let mut builder = TreeBuilder::new(ParseOpts::default());
        for token in tokens {
            let _ = builder.process_token(token);
        }
        builder
    }

    #[test]
    fn noahs_ark_keeps_three_identical_entries() {
        let mut list = ActiveFormattingElements::default();
        let tag = Tag::start("b").with_attr("class", "x");
        for i in 1..=3 {
            list.push(NodeId(i), tag.clone());
        }
        list.push(NodeId(4), tag.clone());
        assert_eq!(list.len(), 3);
        assert!(!list.contains(NodeId(1)));
        assert!(list.contains(NodeId(2)));
        assert!(list.contains(NodeId(4)));

        // Different attributes are not duplicates.
        list.push(NodeId(5), Tag::start("b").with_attr("class", "y"));
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn noahs_ark_ignores_attribute_order() {
        let mut list = ActiveFormattingElements::default();
        let ab = Tag::start("i").with_attr("a", "1").with_attr("b", "2");
        let ba = Tag::start("i").with_attr("b", "2").with_attr("a", "1");
        list.push(NodeId(1), ab.clone());
        list.push(NodeId(2), ba);
        list.push(NodeId(3), ab.clone());
        list.push(NodeId(4), ab);
        assert!(!list.contains(NodeId(1)));
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn noahs_ark_stops_at_marker() {
        let mut list = ActiveFormattingElements::default();
        let tag = Tag::start("b");
        list.push(NodeId(1), tag.clone());
        list.push(NodeId(2), tag.clone());
        list.push_marker();
        list.push(NodeId(3), tag.clone());
        list.push(NodeId(4), tag);
        assert_eq!(list.len(), 5);
        assert_eq!(list.last_named_after_marker("b"), Some((4, NodeId(4))));
        list.clear_to_last_marker();
        assert_eq!(list.len(), 2);
        assert_eq!(list.last_named_after_marker("b"), Some((1, NodeId(2))));
    }

    #[test]
    fn reconstruction_is_idempotent() {
        let mut builder = builder_with(vec![
            Token::start_tag("p"),
            Token::start_tag("b"),
            Token::start_tag("i"),
            Token::end_tag("p"),
        ]);
        let depth_before = builder.open_elements.len();
        builder.reconstruct_active_formatting_elements();
        let nodes_after_first = builder.tree.len();
        let depth_after_first = builder.open_elements.len();
        assert_eq!(depth_after_first, depth_before + 2);

        builder.reconstruct_active_formatting_elements();
        assert_eq!(builder.tree.len(), nodes_after_first);
        assert_eq!(builder.open_elements.len(), depth_after_first);
    }
}
