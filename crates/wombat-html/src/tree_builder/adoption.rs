//! [§ 13.2.6.4.7 The adoption agency algorithm](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm)

use log::trace;
use wombat_dom::Namespace;

use super::stack::ScopeKind;
use super::tags::is_special;
use super::{ParseErrorKind, TreeBuilder};

/// "If outer loop counter is greater than or equal to 8, then return."
const OUTER_LOOP_LIMIT: usize = 8;

/// "If inner loop counter is greater than 3 and node is in the list of active
/// formatting elements, then remove node from the list of active formatting
/// elements."
const INNER_LOOP_KEEP: usize = 3;

impl TreeBuilder {
    /// Run the adoption agency algorithm for an end tag (or an implied one)
    /// named `subject`.
    ///
    /// Returns false when there is no formatting element to adopt, in which
    /// case the caller must "act as described in the "any other end tag"
    /// entry".
    pub(crate) fn run_adoption_agency(&mut self, subject: &str) -> bool {
        // STEP 2: "If the current node is an HTML element whose tag name is
        //          subject, and the current node is not in the list of active
        //          formatting elements, then pop the current node off the stack
        //          of open elements and return."
        if let Some(current) = self.current_node()
            && self.is_html_element(current, subject)
            && !self.active_formatting.contains(current)
        {
            let _ = self.pop();
            return true;
        }

        // STEP 3-5: "Let outer loop counter be 0. Outer loop: If outer loop
        //            counter is greater than or equal to 8, then return.
        //            Increment outer loop counter by 1."
        for outer in 0..OUTER_LOOP_LIMIT {
            // STEP 4.3: "Let formatting element be the last element in the list
            //            of active formatting elements that: is between the end
            //            of the list and the last marker in the list, if any, or
            //            the start of the list otherwise, and has the tag name
            //            subject. If there is no such element, then return and
            //            instead act as described in the "any other end tag" entry."
            let Some((fe_entry, formatting_element)) =
                self.active_formatting.last_named_after_marker(subject)
            else {
                return false;
            };

            // STEP 4.4: "If formatting element is not in the stack of open
            //            elements, then this is a parse error; remove the element
            //            from the list, and return."
            let Some(fe_index) = self.open_elements.position(formatting_element) else {
                self.error_with(ParseErrorKind::FormattingElementNotOpen, subject);
                self.active_formatting.remove_at(fe_entry);
                return true;
            };

            // STEP 4.5: "If formatting element is in the stack of open elements,
            //            but the element is not in scope, then this is a parse
            //            error; return."
            if !self
                .open_elements
                .has_node_in_scope(&self.tree, formatting_element, ScopeKind::Default)
            {
                self.error_with(ParseErrorKind::FormattingElementNotInScope, subject);
                return true;
            }

            // STEP 4.6: "If formatting element is not the current node, this is
            //            a parse error. (But do not return.)"
            if self.current_node() != Some(formatting_element) {
                self.exact_error(ParseErrorKind::FormattingElementNotCurrentNode, subject);
            }

            // STEP 4.7: "Let furthest block be the topmost node in the stack of
            //            open elements that is lower in the stack than formatting
            //            element, and is an element in the special category."
            let furthest = (fe_index + 1..self.open_elements.len()).find_map(|index| {
                let node = self.open_elements.get(index)?;
                self.element(node)
                    .is_some_and(is_special)
                    .then_some((index, node))
            });

            // STEP 4.8: "If there is no furthest block, then the UA must first pop
            //            all the nodes from the bottom of the stack of open
            //            elements, from the current node up to and including
            //            formatting element, then remove formatting element from
            //            the list of active formatting elements, and finally return."
            let Some((fb_index, furthest_block)) = furthest else {
                self.open_elements.truncate(fe_index);
                self.active_formatting.remove_node(formatting_element);
                return true;
            };

            trace!(
                target: "wombat::tree_builder",
                "adoption agency for </{subject}>, pass {}: furthest block at depth {fb_index}",
                outer + 1
            );

            // STEP 4.9: "Let common ancestor be the element immediately above
            //            formatting element in the stack of open elements."
            let Some(common_ancestor) = fe_index
                .checked_sub(1)
                .and_then(|index| self.open_elements.get(index))
            else {
                return true;
            };

            let Some(fe_tag) = self.active_formatting.tag_of(fe_entry).cloned() else {
                return true;
            };

            // STEP 4.10: "Let a bookmark note the position of formatting element
            //             in the list of active formatting elements relative to
            //             the elements on either side of it in the list."
            let mut bookmark = fe_entry;

            // STEP 4.11: "Let node and last node be furthest block."
            let mut node_index = fb_index;
            let mut last_node = furthest_block;

            // STEP 4.12-13: "Let inner loop counter be 0. Inner loop:"
            let mut inner = 0;
            loop {
                // STEP 4.13.1: "Increment inner loop counter by 1."
                inner += 1;

                // STEP 4.13.2: "Let node be the element immediately above node in
                //               the stack of open elements, or if node is no longer
                //               in the stack of open elements (e.g. because it got
                //               removed by this algorithm), the element that was
                //               immediately above node in the stack of open
                //               elements before node was removed."
                // Removals only happen at or below `node_index`, so the entry
                // above is always one step up.
                node_index -= 1;
                let Some(node) = self.open_elements.get(node_index) else {
                    break;
                };

                // STEP 4.13.3: "If node is formatting element, then break."
                if node == formatting_element {
                    break;
                }

                // STEP 4.13.4: "If inner loop counter is greater than 3 and node is
                //               in the list of active formatting elements, then
                //               remove node from the list of active formatting
                //               elements."
                let mut node_entry = self.active_formatting.position(node);
                if inner > INNER_LOOP_KEEP
                    && let Some(entry) = node_entry
                {
                    self.active_formatting.remove_at(entry);
                    if entry < bookmark {
                        bookmark -= 1;
                    }
                    node_entry = None;
                }

                // STEP 4.13.5: "If node is not in the list of active formatting
                //               elements, then remove node from the stack of open
                //               elements and continue."
                let Some(node_entry) = node_entry else {
                    let _ = self.open_elements.remove_at(node_index);
                    continue;
                };

                // STEP 4.13.6: "Create an element for the token for which the
                //               element node was created, in the HTML namespace,
                //               with common ancestor as the intended parent; replace
                //               the entry for node in the list of active formatting
                //               elements with an entry for the new element, replace
                //               the entry for node in the stack of open elements
                //               with an entry for the new element, and let node be
                //               the new element."
                let Some(tag) = self.active_formatting.tag_of(node_entry).cloned() else {
                    break;
                };
                let replacement = self.create_element_for(&tag, Namespace::Html);
                self.active_formatting.replace_at(node_entry, replacement);
                self.open_elements.replace(node, replacement);

                // STEP 4.13.7: "If last node is furthest block, then move the
                //               aforementioned bookmark to be immediately after the
                //               new node in the list of active formatting elements."
                if last_node == furthest_block {
                    bookmark = node_entry + 1;
                }

                // STEP 4.13.8: "Append last node to node."
                self.tree.append_child(replacement, last_node);

                // STEP 4.13.9: "Set last node to node."
                last_node = replacement;
            }

            // STEP 4.14: "Insert whatever last node ended up being in the previous
            //             step at the appropriate place for inserting a node, but
            //             using common ancestor as the override target."
            let point = self.appropriate_insertion_location(Some(common_ancestor));
            self.insert_node_at(point, last_node);

            // STEP 4.15: "Create an element for the token for which formatting
            //             element was created, in the HTML namespace, with furthest
            //             block as the intended parent."
            let new_element = self.create_element_for(&fe_tag, Namespace::Html);

            // STEP 4.16: "Take all of the child nodes of furthest block and append
            //             them to the element created in the last step."
            self.tree.move_children(furthest_block, new_element);

            // STEP 4.17: "Append that new element to furthest block."
            self.tree.append_child(furthest_block, new_element);

            // STEP 4.18: "Remove formatting element from the list of active
            //             formatting elements, and insert the new element into the
            //             list of active formatting elements at the position of the
            //             aforementioned bookmark."
            if let Some(entry) = self.active_formatting.position(formatting_element) {
                self.active_formatting.remove_at(entry);
                if entry < bookmark {
                    bookmark -= 1;
                }
            }
            self.active_formatting.insert(bookmark, new_element, fe_tag);

            // STEP 4.19: "Remove formatting element from the stack of open
            //             elements, and insert the new element into the stack of
            //             open elements immediately below the position of furthest
            //             block in that stack."
            self.open_elements.remove(formatting_element);
            if let Some(position) = self.open_elements.position(furthest_block) {
                self.open_elements.insert(position + 1, new_element);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use wombat_dom::dump;

    use crate::opts::ParseOpts;
    use crate::tokenizer::{Tag, Token};
    use crate::tree_builder::{ParseErrorKind, TreeBuilder};

    fn build(tokens: Vec<Token>) -> TreeBuilder {
        let mut builder = TreeBuilder::new(ParseOpts::default());
        for token in tokens {
            let _ = builder.process_token(token);
        }
        let _ = builder.process_token(Token::EndOfFile);
        builder
    }

    #[test]
    fn anchor_is_cloned_into_the_furthest_block() {
        let builder = build(vec![
            Token::Tag(Tag::start("a").with_attr("href", "x")),
            Token::characters("1"),
            Token::start_tag("div"),
            Token::characters("2"),
            Token::end_tag("a"),
            Token::characters("3"),
        ]);
        let expected = "\
| <html>
|   <head>
|   <body>
|     <a>
|       href=\"x\"
|       \"1\"
|     <div>
|       <a>
|         href=\"x\"
|         \"2\"
|       \"3\"
";
        assert_eq!(dump(builder.tree(), wombat_dom::NodeId::ROOT), expected);
    }

    #[test]
    fn alternating_bold_and_div_terminates() {
        let mut tokens = Vec::new();
        for _ in 0..50 {
            tokens.extend([
                Token::start_tag("b"),
                Token::start_tag("div"),
                Token::end_tag("div"),
                Token::end_tag("b"),
            ]);
        }
        for _ in 0..50 {
            tokens.extend([Token::start_tag("b"), Token::start_tag("div")]);
        }
        tokens.extend(std::iter::repeat_n(Token::end_tag("b"), 50));
        let builder = build(tokens);
        assert!(builder.is_stopped());
        assert!(builder.tree().len() < 1000);
    }

    #[test]
    fn end_tag_without_formatting_entry_falls_back() {
        let mut builder = TreeBuilder::new(ParseOpts::default());
        let _ = builder.process_token(Token::start_tag("span"));
        assert!(!builder.run_adoption_agency("b"));
    }

    #[test]
    fn stale_entry_is_dropped() {
        let builder = build(vec![
            Token::start_tag("p"),
            Token::start_tag("b"),
            Token::end_tag("p"),
            Token::start_tag("table"),
            Token::end_tag("b"),
        ]);
        assert!(
            builder
                .errors()
                .iter()
                .any(|e| e.kind == ParseErrorKind::FormattingElementNotOpen)
        );
    }
}
