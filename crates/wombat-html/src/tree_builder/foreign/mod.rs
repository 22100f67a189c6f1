//! Foreign content (SVG and MathML).
//!
//! [§ 13.2.6 Tree construction dispatcher](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction-dispatcher)
//! [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)

mod mathml;
mod svg;

use wombat_dom::{Attribute, Namespace};

use self::mathml::adjust_mathml_attributes;
use self::svg::{adjust_svg_attributes, adjusted_tag_name};
use super::tags::{FOREIGN_BREAKOUT, is_html_integration_point, is_mathml_text_integration_point};
use super::{ParseErrorKind, ProcessResult, TreeBuilder, is_whitespace};
use crate::tokenizer::{Tag, TagKind, Token};

/// [§ 13.2.6.1 Adjust foreign attributes](https://html.spec.whatwg.org/multipage/parsing.html#adjust-foreign-attributes)
///
/// "if any of the attributes on the token match the strings given in the
/// first column of the following table, let the attribute be a namespaced
/// attribute, with the prefix being the string given in the corresponding
/// cell in the second column, the local name being the string given in the
/// corresponding cell in the third column, and the namespace being the
/// namespace given in the corresponding cell in the fourth column."
const FOREIGN_ATTRIBUTES: &[(&str, Option<&str>, &str, Namespace)] = &[
    ("xlink:actuate", Some("xlink"), "actuate", Namespace::XLink),
    ("xlink:arcrole", Some("xlink"), "arcrole", Namespace::XLink),
    ("xlink:href", Some("xlink"), "href", Namespace::XLink),
    ("xlink:role", Some("xlink"), "role", Namespace::XLink),
    ("xlink:show", Some("xlink"), "show", Namespace::XLink),
    ("xlink:title", Some("xlink"), "title", Namespace::XLink),
    ("xlink:type", Some("xlink"), "type", Namespace::XLink),
    ("xml:lang", Some("xml"), "lang", Namespace::Xml),
    ("xml:space", Some("xml"), "space", Namespace::Xml),
    ("xmlns", None, "xmlns", Namespace::Xmlns),
    ("xmlns:xlink", Some("xmlns"), "xlink", Namespace::Xmlns),
];

/// Give the attributes in [`FOREIGN_ATTRIBUTES`] their prefix and namespace.
pub(crate) fn adjust_foreign_attributes(attributes: &mut [Attribute]) {
    for attr in attributes.iter_mut() {
        let Some(&(_, prefix, local, namespace)) = FOREIGN_ATTRIBUTES
            .iter()
            .find(|&&(qualified, ..)| qualified == attr.name)
        else {
            continue;
        };
        attr.prefix = prefix.map(str::to_string);
        attr.name = local.to_string();
        attr.namespace = Some(namespace);
    }
}

/// "A start tag whose tag name is "font", if the token has any attributes
/// named "color", "face", or "size"", or any tag in the breakout list.
fn breaks_out(tag: &Tag) -> bool {
    match tag.kind {
        TagKind::Start => {
            FOREIGN_BREAKOUT.contains(&tag.name.as_str())
                || (tag.name == "font"
                    && tag
                        .attrs
                        .iter()
                        .any(|a| matches!(a.name.as_str(), "color" | "face" | "size")))
        }
        TagKind::End => matches!(tag.name.as_str(), "br" | "p"),
    }
}

impl TreeBuilder {
    /// The tree construction dispatcher's choice between the current insertion
    /// mode and the rules for foreign content.
    ///
    /// HTML rules apply if the stack of open elements is empty, if the
    /// adjusted current node is an HTML element, at a MathML text
    /// integration point for start tags other than `mglyph`/`malignmark` and
    /// for characters, for an `svg` start tag in `annotation-xml`, at an
    /// HTML integration point for start tags and characters, and for EOF.
    pub(crate) fn use_foreign_rules(&self, token: &Token) -> bool {
        let Some(element) = self
            .adjusted_current_node()
            .and_then(|node| self.element(node))
        else {
            return false;
        };
        if element.namespace == Namespace::Html {
            return false;
        }

        let text_point = is_mathml_text_integration_point(element);
        let html_point = is_html_integration_point(element);
        match token {
            Token::Tag(tag) if tag.kind == TagKind::Start => {
                let text_point_tag =
                    text_point && !matches!(tag.name.as_str(), "mglyph" | "malignmark");
                let svg_in_annotation =
                    element.is(Namespace::MathMl, "annotation-xml") && tag.name == "svg";
                !(text_point_tag || svg_in_annotation || html_point)
            }
            Token::Characters(_) => !(text_point || html_point),
            Token::EndOfFile => false,
            _ => true,
        }
    }

    /// [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)
    pub(crate) fn process_foreign_content(&mut self, token: Token) -> ProcessResult {
        match token {
            // "A character token that is U+0000 NULL: Parse error. Insert a
            //  U+FFFD REPLACEMENT CHARACTER character."
            // "A character token that is one of U+0009 CHARACTER TABULATION,
            //  U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
            //  RETURN (CR), or U+0020 SPACE: Insert the token's character."
            // "Any other character token: Insert the token's character. Set the
            //  frameset-ok flag to "not ok"."
            Token::Characters(text) => {
                if text.contains('\0') {
                    self.error(ParseErrorKind::UnexpectedNullCharacter);
                }
                if text.chars().any(|c| c != '\0' && !is_whitespace(c)) {
                    self.frameset_ok = false;
                }
                self.insert_characters(&text.replace('\0', "\u{FFFD}"));
                ProcessResult::Done
            }

            // "A comment token: Insert a comment."
            Token::Comment(data) => {
                self.insert_comment(&data);
                ProcessResult::Done
            }

            // "A DOCTYPE token: Parse error. Ignore the token."
            Token::Doctype(_) => {
                self.error(ParseErrorKind::UnexpectedDoctype);
                ProcessResult::Done
            }

            Token::Tag(tag) if breaks_out(&tag) => {
                // "Parse error."
                self.error_with(ParseErrorKind::UnexpectedHtmlElementInForeignContent, &tag.name);

                // "While the current node is not a MathML text integration
                //  point, an HTML integration point, or an element in the HTML
                //  namespace, pop elements from the stack of open elements."
                while let Some(current) = self.current_node() {
                    let stop = self.element(current).is_none_or(|e| {
                        e.namespace == Namespace::Html
                            || is_mathml_text_integration_point(e)
                            || is_html_integration_point(e)
                    });
                    if stop {
                        break;
                    }
                    let _ = self.pop();
                }

                // "Reprocess the token according to the rules given in the
                //  section corresponding to the current insertion mode in HTML
                //  content."
                ProcessResult::ReprocessInHtmlContent(Token::Tag(tag))
            }

            Token::Tag(tag) if tag.kind == TagKind::Start => self.foreign_start_tag(tag),
            Token::Tag(tag) => self.foreign_end_tag(tag),

            // Parse errors are handled before dispatch and EOF never reaches
            // the foreign rules.
            Token::ParseError(_) | Token::EndOfFile => ProcessResult::Done,
        }
    }

    /// The "in body" rules for `<math>` and `<svg>`: reconstruct, adjust the
    /// attributes for `namespace`, then insert a foreign element.
    pub(crate) fn insert_foreign_root(&mut self, mut tag: Tag, namespace: Namespace) -> ProcessResult {
        self.reconstruct_active_formatting_elements();
        match namespace {
            Namespace::MathMl => adjust_mathml_attributes(&mut tag.attrs),
            Namespace::Svg => adjust_svg_attributes(&mut tag.attrs),
            _ => {}
        }
        adjust_foreign_attributes(&mut tag.attrs);
        let _ = self.insert_element_for(&tag, namespace);
        if tag.self_closing {
            let _ = self.pop();
            return ProcessResult::DoneAckSelfClosing;
        }
        ProcessResult::Done
    }

    /// "Any other start tag"
    fn foreign_start_tag(&mut self, mut tag: Tag) -> ProcessResult {
        let namespace = self
            .adjusted_current_node()
            .and_then(|node| self.element(node))
            .map_or(Namespace::Html, |e| e.namespace);

        match namespace {
            // "If the adjusted current node is an element in the MathML
            //  namespace, adjust MathML attributes for the token."
            Namespace::MathMl => adjust_mathml_attributes(&mut tag.attrs),
            // "If the adjusted current node is an element in the SVG namespace,
            //  and the token's tag name is one of the ones in the first column
            //  of the following table, change the tag name ... If the adjusted
            //  current node is an element in the SVG namespace, adjust SVG
            //  attributes for the token."
            Namespace::Svg => {
                if let Some(adjusted) = adjusted_tag_name(&tag.name) {
                    tag.name = adjusted.to_string();
                }
                adjust_svg_attributes(&mut tag.attrs);
            }
            _ => {}
        }

        // "Adjust foreign attributes for the token."
        adjust_foreign_attributes(&mut tag.attrs);

        // "Insert a foreign element for the token, with adjusted current
        //  node's namespace and false."
        let _ = self.insert_element_for(&tag, namespace);

        // "If the token has its self-closing flag set, then run the
        //  appropriate steps from the following list: ... Pop the current
        //  node off the stack of open elements and acknowledge the token's
        //  self-closing flag."
        if tag.self_closing {
            let _ = self.pop();
            return ProcessResult::DoneAckSelfClosing;
        }
        ProcessResult::Done
    }

    /// "Any other end tag"
    fn foreign_end_tag(&mut self, tag: Tag) -> ProcessResult {
        let matches_token = |builder: &Self, index: usize| {
            builder
                .open_elements
                .get(index)
                .and_then(|node| builder.element(node))
                .is_some_and(|e| e.tag_name.eq_ignore_ascii_case(&tag.name))
        };

        // 1. "Initialize node to be the current node (the bottommost node of
        //    the stack)."
        let Some(mut index) = self.open_elements.len().checked_sub(1) else {
            return ProcessResult::Done;
        };

        // 2. "If node's tag name, converted to ASCII lowercase, is not the same
        //    as the tag name of the token, then this is a parse error."
        if !matches_token(self, index) {
            self.error_with(ParseErrorKind::UnexpectedEndTagInForeignContent, &tag.name);
        }

        loop {
            // 3. "Loop: If node is the topmost element in the stack of open
            //    elements, then return. (fragment case)"
            if index == 0 {
                return ProcessResult::Done;
            }

            // 4. "If node's tag name, converted to ASCII lowercase, is the same
            //    as the tag name of the token, pop elements from the stack of
            //    open elements until node has been popped from the stack, and
            //    then return."
            if matches_token(self, index) {
                self.open_elements.truncate(index);
                return ProcessResult::Done;
            }

            // 5. "Set node to the previous entry in the stack of open elements."
            index -= 1;

            // 6. "If node is not an element in the HTML namespace, return to
            //    the step labeled loop."
            // 7. "Otherwise, process the token according to the rules given in
            //    the section corresponding to the current insertion mode in
            //    HTML content."
            let is_html = self
                .open_elements
                .get(index)
                .and_then(|node| self.element(node))
                .is_some_and(|e| e.namespace == Namespace::Html);
            if is_html {
                return ProcessResult::ReprocessInHtmlContent(Token::Tag(tag));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opts::ParseOpts;

    fn builder_after(tokens: Vec<Token>) -> TreeBuilder {
        let mut builder = TreeBuilder::new(ParseOpts::default());
        for token in tokens {
            let _ = builder.process_token(token);
        }
        builder
    }

    #[test]
    fn namespaced_attributes_get_prefix_and_namespace() {
        let mut attrs = vec![
            Attribute::new("xlink:href", "#a"),
            Attribute::new("xmlns", "http://www.w3.org/2000/svg"),
            Attribute::new("xmlns:xlink", "http://www.w3.org/1999/xlink"),
            Attribute::new("href", "b"),
        ];
        adjust_foreign_attributes(&mut attrs);
        assert_eq!(attrs[0].prefix.as_deref(), Some("xlink"));
        assert_eq!(attrs[0].name, "href");
        assert_eq!(attrs[0].namespace, Some(Namespace::XLink));
        assert_eq!(attrs[1].prefix, None);
        assert_eq!(attrs[1].namespace, Some(Namespace::Xmlns));
        assert_eq!(attrs[2].qualified_name(), "xmlns:xlink");
        assert_eq!(attrs[3].namespace, None);
    }

    #[test]
    fn font_breaks_out_only_with_presentational_attributes() {
        assert!(breaks_out(&Tag::start("font").with_attr("color", "red")));
        assert!(!breaks_out(&Tag::start("font").with_attr("id", "x")));
        assert!(breaks_out(&Tag::end("p")));
        assert!(!breaks_out(&Tag::end("div")));
    }

    #[test]
    fn svg_start_tags_use_foreign_rules() {
        let builder = builder_after(vec![Token::start_tag("svg")]);
        assert!(builder.use_foreign_rules(&Token::start_tag("g")));
        assert!(builder.use_foreign_rules(&Token::characters("x")));
        assert!(!builder.use_foreign_rules(&Token::EndOfFile));
        assert!(builder.is_cdata_allowed());
    }

    #[test]
    fn mathml_text_integration_point_lets_html_through() {
        let builder = builder_after(vec![Token::start_tag("math"), Token::start_tag("mi")]);
        assert!(!builder.use_foreign_rules(&Token::start_tag("b")));
        assert!(!builder.use_foreign_rules(&Token::characters("x")));
        assert!(builder.use_foreign_rules(&Token::start_tag("mglyph")));
        assert!(builder.use_foreign_rules(&Token::end_tag("mi")));
    }

    #[test]
    fn end_tag_matches_case_insensitively() {
        let mut builder = builder_after(vec![
            Token::start_tag("svg"),
            Token::start_tag("clippath"),
        ]);
        let depth = builder.open_elements.len();
        let _ = builder.process_token(Token::end_tag("clippath"));
        assert_eq!(builder.open_elements.len(), depth - 1);
        assert!(builder.errors().iter().all(|e| e.kind != ParseErrorKind::UnexpectedEndTagInForeignContent));
    }
}
