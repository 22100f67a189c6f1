//! [§ 13.2.6.1 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#creating-and-inserting-nodes)

use wombat_dom::{ElementData, Namespace, NodeId, NodeType};

use super::TreeBuilder;
use crate::tokenizer::Tag;

/// Where a new node goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InsertionPoint {
    /// "inside `parent`, after its last child (if any)"
    LastChild(NodeId),
    /// "inside `parent`, immediately before `sibling`"
    BeforeSibling {
        /// The node that will own the new child.
        parent: NodeId,
        /// The existing child the new node goes in front of.
        sibling: NodeId,
    },
}

impl InsertionPoint {
    pub(crate) const fn parent(self) -> NodeId {
        match self {
            Self::LastChild(parent) | Self::BeforeSibling { parent, .. } => parent,
        }
    }
}

/// Targets that make an insertion foster parented while the flag is set.
const FOSTER_TARGETS: &[&str] = &["table", "tbody", "tfoot", "thead", "tr"];

impl TreeBuilder {
    /// Returns true if inserting into `target` right now must be redirected
    /// by foster parenting.
    ///
    /// "If foster parenting is enabled and target is a table, tbody, tfoot,
    /// thead, or tr element". The table-legal children never get here: the
    /// "in table" family inserts them with the flag off.
    pub(crate) fn should_foster_parent(&self, target: NodeId) -> bool {
        self.foster_parenting
            && self
                .element(target)
                .is_some_and(|e| e.is_html_one_of(FOSTER_TARGETS))
    }

    /// [§ 13.2.6.1 Appropriate place for inserting a node](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
    pub(crate) fn appropriate_insertion_location(
        &self,
        override_target: Option<NodeId>,
    ) -> InsertionPoint {
        // STEP 1: "If there was an override target specified, then let target
        //          be the override target. Otherwise, let target be the
        //          current node."
        let target = override_target
            .or_else(|| self.current_node())
            .unwrap_or(NodeId::ROOT);

        // STEP 2: "Determine the adjusted insertion location using the first
        //          matching steps from the following list:"
        let location = if self.should_foster_parent(target) {
            self.foster_parent_location()
        } else {
            // "Otherwise: Let adjusted insertion location be inside target,
            //  after its last child (if any)."
            InsertionPoint::LastChild(target)
        };

        // STEP 3: "If the adjusted insertion location is inside a template
        //          element, let it instead be inside the template element's
        //          template contents, after its last child (if any)."
        match location {
            InsertionPoint::LastChild(parent) => self
                .tree
                .template_contents(parent)
                .map_or(location, InsertionPoint::LastChild),
            InsertionPoint::BeforeSibling { .. } => location,
        }
    }

    /// The foster parenting branch of STEP 2.
    fn foster_parent_location(&self) -> InsertionPoint {
        // 1. "Let last template be the last template element in the stack of
        //    open elements, if any."
        // 2. "Let last table be the last table element in the stack of open
        //    elements, if any."
        let last_template = self.open_elements.find_html(&self.tree, "template");
        let last_table = self.open_elements.find_html(&self.tree, "table");

        match (last_template, last_table) {
            // 3. "If there is a last template and either there is no last
            //    table, or there is one, but last template is lower (more
            //    recently added) than last table in the stack of open elements,
            //    then: let adjusted insertion location be inside last
            //    template's template contents, after its last child (if any),
            //    and abort these steps."
            (Some((template_index, template)), table)
                if table.is_none_or(|(table_index, _)| template_index > table_index) =>
            {
                InsertionPoint::LastChild(template)
            }
            // 4. "If there is no last table, then let adjusted insertion
            //    location be inside the first element in the stack of open
            //    elements (the html element), after its last child (if any),
            //    and abort these steps. (fragment case)"
            (_, None) => {
                InsertionPoint::LastChild(self.open_elements.first().unwrap_or(NodeId::ROOT))
            }
            (_, Some((table_index, table))) => {
                // 5. "If last table has a parent node, then let adjusted
                //    insertion location be inside last table's parent node,
                //    immediately before last table, and abort these steps."
                if let Some(parent) = self.tree.parent(table) {
                    return InsertionPoint::BeforeSibling {
                        parent,
                        sibling: table,
                    };
                }
                // 6. "Let previous element be the element immediately above
                //    last table in the stack of open elements."
                // 7. "Let adjusted insertion location be inside previous
                //    element, after its last child (if any)."
                let previous = table_index
                    .checked_sub(1)
                    .and_then(|index| self.open_elements.get(index))
                    .unwrap_or(NodeId::ROOT);
                InsertionPoint::LastChild(previous)
            }
        }
    }

    /// Attach a detached `node` at `point`.
    pub(crate) fn insert_node_at(&mut self, point: InsertionPoint, node: NodeId) {
        match point {
            InsertionPoint::LastChild(parent) => self.tree.append_child(parent, node),
            InsertionPoint::BeforeSibling { parent, sibling } => {
                self.tree.insert_before(parent, node, sibling);
            }
        }
    }

    /// [§ 13.2.6.1 Create an element for a token](https://html.spec.whatwg.org/multipage/parsing.html#create-an-element-for-the-token)
    ///
    /// The element is allocated detached. `tag.name` must already carry any
    /// foreign case adjustment.
    pub(crate) fn create_element_for(&mut self, tag: &Tag, namespace: Namespace) -> NodeId {
        let mut data = ElementData::new(namespace, &tag.name);
        data.attrs.clone_from(&tag.attrs);

        // [§ 13.2.6.5](https://html.spec.whatwg.org/multipage/parsing.html#html-integration-point)
        // "A MathML annotation-xml element whose start tag token had an
        //  attribute with the name "encoding" whose value was an ASCII
        //  case-insensitive match for the string "text/html"" or
        //  "application/xhtml+xml".
        if namespace == Namespace::MathMl && tag.name == "annotation-xml" {
            data.mathml_annotation_xml_integration_point =
                tag.get_attribute("encoding").is_some_and(|encoding| {
                    encoding.eq_ignore_ascii_case("text/html")
                        || encoding.eq_ignore_ascii_case("application/xhtml+xml")
                });
        }

        self.tree.alloc_element(data)
    }

    /// [§ 13.2.6.1 Insert a foreign element](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-foreign-element)
    ///
    /// 1. "Let the adjusted insertion location be the appropriate place for
    ///    inserting a node."
    /// 2. "Let element be the result of creating an element for the token in
    ///    the given namespace, with the intended parent being the element in
    ///    which the adjusted insertion location finds itself."
    /// 3. "If it is possible to insert element at the adjusted insertion
    ///    location, then insert element at the adjusted insertion location."
    /// 4. "Push element onto the stack of open elements so that it is the new
    ///    current node."
    pub(crate) fn insert_element_for(&mut self, tag: &Tag, namespace: Namespace) -> NodeId {
        let point = self.appropriate_insertion_location(None);
        let element = self.create_element_for(tag, namespace);
        self.insert_node_at(point, element);
        self.open_elements.push(element);
        element
    }

    /// [§ 13.2.6.1 Insert an HTML element](https://html.spec.whatwg.org/multipage/parsing.html#insert-an-html-element)
    pub(crate) fn insert_html_element(&mut self, tag: &Tag) -> NodeId {
        self.insert_element_for(tag, Namespace::Html)
    }

    /// Insert an HTML element and pop it straight away, for void elements.
    pub(crate) fn insert_void_element(&mut self, tag: &Tag) -> NodeId {
        let element = self.insert_html_element(tag);
        let _ = self.pop();
        element
    }

    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    ///
    /// Works on a whole run of characters at once.
    pub(crate) fn insert_characters(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }

        // STEP 2: "Let the adjusted insertion location be the appropriate place
        //          for inserting a node."
        let point = self.appropriate_insertion_location(None);

        // STEP 3: "If the adjusted insertion location is in a Document node,
        //          then return."
        if matches!(
            self.tree.get(point.parent()).map(|n| &n.node_type),
            Some(NodeType::Document)
        ) {
            return;
        }

        // STEP 4: "If there is a Text node immediately before the adjusted
        //          insertion location, then append data to that Text node's data."
        let before = match point {
            InsertionPoint::LastChild(parent) => self.tree.last_child(parent),
            InsertionPoint::BeforeSibling { sibling, .. } => self.tree.prev_sibling(sibling),
        };
        if let Some(previous) = before
            && let Some(data) = self.tree.as_text_mut(previous)
        {
            data.push_str(text);
            return;
        }

        // STEP 5: "Otherwise, create a new Text node whose data is data ...
        //          and insert the newly created node at the adjusted insertion
        //          location."
        let node = self.tree.alloc(NodeType::Text {
            data: text.to_string(),
        });
        self.insert_node_at(point, node);
    }

    /// [§ 13.2.6.1 Insert a comment](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-comment)
    pub(crate) fn insert_comment(&mut self, data: &str) {
        let point = self.appropriate_insertion_location(None);
        let node = self.tree.alloc(NodeType::Comment {
            data: data.to_string(),
        });
        self.insert_node_at(point, node);
    }

    /// Insert a comment as the last child of `parent` ("as the last child of
    /// the Document object", "as the last child of the first element in the
    /// stack of open elements").
    pub(crate) fn append_comment_to(&mut self, parent: NodeId, data: &str) {
        let node = self.tree.alloc(NodeType::Comment {
            data: data.to_string(),
        });
        self.tree.append_child(parent, node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opts::ParseOpts;
    use crate::tokenizer::Token;

    fn builder_in_table() -> TreeBuilder {
        let mut builder = TreeBuilder::new(ParseOpts::default());
        for token in [Token::start_tag("table"), Token::start_tag("tr")] {
            let _ = builder.process_token(token);
        }
        builder
    }

    #[test]
    fn foster_parenting_targets_the_table_parent() {
        let mut builder = builder_in_table();
        let tr = builder.current_node().expect("tr is open");
        assert_eq!(
            builder.appropriate_insertion_location(None),
            InsertionPoint::LastChild(tr)
        );

        builder.foster_parenting = true;
        let (_, table) = builder
            .open_elements
            .find_html(&builder.tree, "table")
            .expect("table is open");
        let body = builder.tree.parent(table).expect("table is attached");
        assert_eq!(
            builder.appropriate_insertion_location(None),
            InsertionPoint::BeforeSibling {
                parent: body,
                sibling: table,
            }
        );
    }

    #[test]
    fn detached_table_fosters_into_the_element_above_it() {
        let mut builder = builder_in_table();
        let (index, table) = builder
            .open_elements
            .find_html(&builder.tree, "table")
            .expect("table is open");
        builder.tree.detach(table);
        builder.foster_parenting = true;
        let above = builder.open_elements.get(index - 1).expect("body");
        assert_eq!(
            builder.appropriate_insertion_location(None),
            InsertionPoint::LastChild(above)
        );
    }

    #[test]
    fn adjacent_text_is_merged() {
        let mut builder = TreeBuilder::new(ParseOpts::default());
        let _ = builder.process_token(Token::start_tag("div"));
        builder.insert_characters("a");
        builder.insert_characters("b");
        let div = builder.current_node().expect("div");
        assert_eq!(builder.tree.children(div).len(), 1);
        let text = builder.tree.first_child(div).expect("text");
        assert_eq!(builder.tree.as_text(text), Some("ab"));
    }

    #[test]
    fn template_redirects_into_its_contents() {
        let mut builder = TreeBuilder::new(ParseOpts::default());
        let _ = builder.process_token(Token::start_tag("template"));
        let template = builder.current_node().expect("template");
        let contents = builder.tree.template_contents(template).expect("contents");
        assert_eq!(
            builder.appropriate_insertion_location(None),
            InsertionPoint::LastChild(contents)
        );
    }

    #[test]
    fn annotation_xml_encoding_marks_an_integration_point() {
        let mut builder = TreeBuilder::new(ParseOpts::default());
        let html = Tag::start("annotation-xml").with_attr("encoding", "Text/HTML");
        let plain = Tag::start("annotation-xml").with_attr("encoding", "image/svg+xml");
        let a = builder.create_element_for(&html, Namespace::MathMl);
        let b = builder.create_element_for(&plain, Namespace::MathMl);
        assert!(builder.tree.as_element(a).expect("element").mathml_annotation_xml_integration_point);
        assert!(!builder.tree.as_element(b).expect("element").mathml_annotation_xml_integration_point);
    }
}
