//! [§ 13.2.4.1 Reset the insertion mode appropriately](https://html.spec.whatwg.org/multipage/parsing.html#reset-the-insertion-mode-appropriately)

use wombat_dom::Namespace;

use super::{InsertionMode, TreeBuilder};

impl TreeBuilder {
    /// "When the steps below require the UA to reset the insertion mode
    /// appropriately, it means the UA must follow these steps"
    pub(crate) fn reset_insertion_mode(&mut self) {
        let mode = self.appropriate_mode();
        self.switch_to(mode);
    }

    fn appropriate_mode(&self) -> InsertionMode {
        // STEP 1: "Let last be false."
        // STEP 2: "Let node be the last node in the stack of open elements."
        let depth = self.open_elements.len();
        for index in (0..depth).rev() {
            let Some(mut node) = self.open_elements.get(index) else {
                continue;
            };

            // STEP 3: "Loop: If node is the first node in the stack of open
            //          elements, then set last to true, and, if the parser was
            //          created as part of the HTML fragment parsing algorithm
            //          (fragment case), set node to the context element passed
            //          to that algorithm."
            let last = index == 0;
            if last && let Some(context) = self.context_element {
                node = context;
            }

            let Some(element) = self.element(node) else {
                continue;
            };
            if element.namespace != Namespace::Html {
                if last {
                    return InsertionMode::InBody;
                }
                continue;
            }

            match element.tag_name.as_str() {
                // STEP 4: "If node is a select element, run these substeps:"
                "select" => return self.select_mode(index, last),
                // STEP 5: "If node is a td or th element and last is false, then
                //          switch the insertion mode to "in cell" and return."
                "td" | "th" if !last => return InsertionMode::InCell,
                // STEP 6: "If node is a tr element, then switch the insertion
                //          mode to "in row" and return."
                "tr" => return InsertionMode::InRow,
                // STEP 7: "If node is a tbody, thead, or tfoot element, then
                //          switch the insertion mode to "in table body" and return."
                "tbody" | "thead" | "tfoot" => return InsertionMode::InTableBody,
                // STEP 8: "If node is a caption element, then switch the
                //          insertion mode to "in caption" and return."
                "caption" => return InsertionMode::InCaption,
                // STEP 9: "If node is a colgroup element, then switch the
                //          insertion mode to "in column group" and return."
                "colgroup" => return InsertionMode::InColumnGroup,
                // STEP 10: "If node is a table element, then switch the insertion
                //           mode to "in table" and return."
                "table" => return InsertionMode::InTable,
                // STEP 11: "If node is a template element, then switch the
                //           insertion mode to the current template insertion mode
                //           and return."
                "template" => {
                    return self
                        .template_modes
                        .last()
                        .copied()
                        .unwrap_or(InsertionMode::InTemplate);
                }
                // STEP 12: "If node is a head element and last is false, then
                //           switch the insertion mode to "in head" and return."
                "head" if !last => return InsertionMode::InHead,
                // STEP 13: "If node is a body element, then switch the insertion
                //           mode to "in body" and return."
                "body" => return InsertionMode::InBody,
                // STEP 14: "If node is a frameset element, then switch the
                //           insertion mode to "in frameset" and return.
                //           (fragment case)"
                "frameset" => return InsertionMode::InFrameset,
                // STEP 15: "If node is an html element, run these substeps:"
                //   1. "If the head element pointer is null, switch the
                //      insertion mode to "before head" and return. (fragment case)"
                //   2. "Otherwise, the head element pointer is not null, switch
                //      the insertion mode to "after head" and return."
                "html" => {
                    return if self.head_element.is_none() {
                        InsertionMode::BeforeHead
                    } else {
                        InsertionMode::AfterHead
                    };
                }
                _ => {}
            }

            // STEP 16: "If last is true, then switch the insertion mode to "in
            //           body" and return. (fragment case)"
            if last {
                return InsertionMode::InBody;
            }
            // STEP 17: "Let node now be the node before node in the stack of
            //           open elements." STEP 18: "Return to the step labeled loop."
        }
        InsertionMode::InBody
    }

    /// STEP 4 substeps for a `select` at stack position `index`.
    fn select_mode(&self, index: usize, last: bool) -> InsertionMode {
        // 4.1: "If last is true, jump to the step below labeled done."
        if !last {
            // 4.2-4.6: "Let ancestor be node. Loop: If ancestor is the first node
            //           in the stack of open elements, jump to the step below
            //           labeled done. Let ancestor be the node before ancestor in
            //           the stack of open elements. If ancestor is a template
            //           node, jump to the step below labeled done. If ancestor is
            //           a table node, switch the insertion mode to "in select in
            //           table" and return."
            for ancestor_index in (0..index).rev() {
                let Some(ancestor) = self.open_elements.get(ancestor_index) else {
                    continue;
                };
                if self.is_html_element(ancestor, "template") {
                    break;
                }
                if self.is_html_element(ancestor, "table") {
                    return InsertionMode::InSelectInTable;
                }
            }
        }
        // 4.8: "Done: Switch the insertion mode to "in select" and return."
        InsertionMode::InSelect
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::opts::ParseOpts;
    use crate::tree_builder::{FragmentContext, InsertionMode, TreeBuilder};

    #[rstest]
    #[case("td", InsertionMode::InBody)]
    #[case("tr", InsertionMode::InRow)]
    #[case("tbody", InsertionMode::InTableBody)]
    #[case("caption", InsertionMode::InCaption)]
    #[case("colgroup", InsertionMode::InColumnGroup)]
    #[case("table", InsertionMode::InTable)]
    #[case("select", InsertionMode::InSelect)]
    #[case("template", InsertionMode::InTemplate)]
    #[case("head", InsertionMode::InBody)]
    #[case("html", InsertionMode::BeforeHead)]
    #[case("frameset", InsertionMode::InFrameset)]
    #[case("div", InsertionMode::InBody)]
    fn fragment_context_picks_the_starting_mode(#[case] context: &str, #[case] mode: InsertionMode) {
        let builder = TreeBuilder::new_for_fragment(&FragmentContext::html(context), ParseOpts::default());
        assert_eq!(builder.mode(), mode);
    }

    #[test]
    fn foreign_context_starts_in_body() {
        let context: FragmentContext = "svg path".parse().expect("valid context");
        let builder = TreeBuilder::new_for_fragment(&context, ParseOpts::default());
        assert_eq!(builder.mode(), InsertionMode::InBody);
    }
}
