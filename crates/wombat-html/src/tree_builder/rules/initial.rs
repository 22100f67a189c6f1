//! The "initial", "before html" and "before head" insertion modes.

use log::debug;
use wombat_dom::{DoctypeData, ElementData, Namespace, NodeId, NodeType, QuirksMode};

use crate::tokenizer::{Tag, TagKind, Token};
use crate::tree_builder::quirks::{classify, is_doctype_error};
use crate::tree_builder::{
    InsertionMode, ParseErrorKind, ProcessResult, TreeBuilder, split_leading_whitespace,
};

/// End tags that "act as described in the "anything else" entry" before the
/// body exists.
const EARLY_END_TAGS: &[&str] = &["head", "body", "html", "br"];

impl TreeBuilder {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    pub(crate) fn step_initial(&mut self, token: Token) -> ProcessResult {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION,
            //  U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
            //  RETURN (CR), or U+0020 SPACE: Ignore the token."
            Token::Characters(text) => match split_leading_whitespace(&text) {
                (_, "") => ProcessResult::Done,
                (_, rest) => self.initial_anything_else(Token::Characters(rest.to_string())),
            },

            // "A comment token: Insert a comment as the last child of the
            //  Document object."
            Token::Comment(data) => self.insert_document_comment(&data),

            // "A DOCTYPE token"
            Token::Doctype(doctype) => {
                // "If the DOCTYPE token's name is not "html", or the token's
                //  public identifier is not missing, or the token's system
                //  identifier is neither missing nor "about:legacy-compat",
                //  then there is a parse error."
                if is_doctype_error(&doctype) {
                    self.error_with(
                        ParseErrorKind::UnknownDoctype,
                        doctype.name.as_deref().unwrap_or_default(),
                    );
                }

                // "Append a DocumentType node to the Document node, with its
                //  name set to the name given in the DOCTYPE token, or the
                //  empty string if the name was missing; its public ID set to
                //  the public identifier given in the DOCTYPE token, or the
                //  empty string if the public identifier was missing; and its
                //  system ID set to the system identifier given in the DOCTYPE
                //  token, or the empty string if the system identifier was
                //  missing."
                let node = self.tree.alloc(NodeType::Doctype(DoctypeData {
                    name: doctype.name.clone().unwrap_or_default(),
                    public_id: doctype.public_id.clone().unwrap_or_default(),
                    system_id: doctype.system_id.clone().unwrap_or_default(),
                }));
                self.tree.append_child(NodeId::ROOT, node);

                // "Then, if the document is not an iframe srcdoc document, and
                //  the parser cannot change the mode flag is false, and the
                //  DOCTYPE token matches one of the conditions in the following
                //  list, then set the Document to quirks mode ... Otherwise, if
                //  ... then set the Document to limited-quirks mode."
                let quirks = classify(&doctype, self.opts.iframe_srcdoc);
                debug!(target: "wombat::tree_builder", "doctype {:?} gives {quirks}", doctype.name);
                self.tree.set_quirks_mode(quirks);

                // "Then, switch the insertion mode to "before html"."
                self.switch_to(InsertionMode::BeforeHtml);
                ProcessResult::Done
            }

            Token::ParseError(_) => ProcessResult::Done,
            token => self.initial_anything_else(token),
        }
    }

    /// "Anything else: If the document is not an iframe srcdoc document, then
    /// this is a parse error; if the parser cannot change the mode flag is
    /// false, set the Document to quirks mode. In any case, switch the
    /// insertion mode to "before html", then reprocess the token."
    fn initial_anything_else(&mut self, token: Token) -> ProcessResult {
        if !self.opts.iframe_srcdoc {
            self.error(ParseErrorKind::MissingDoctype);
            self.tree.set_quirks_mode(QuirksMode::Quirks);
        }
        ProcessResult::Reprocess(InsertionMode::BeforeHtml, token)
    }

    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    pub(crate) fn step_before_html(&mut self, token: Token) -> ProcessResult {
        match token {
            // "A DOCTYPE token: Parse error. Ignore the token."
            Token::Doctype(_) => self.ignore_unexpected(&token),

            // "A comment token: Insert a comment as the last child of the
            //  Document object."
            Token::Comment(data) => self.insert_document_comment(&data),

            // "A character token that is ... whitespace: Ignore the token."
            Token::Characters(text) => match split_leading_whitespace(&text) {
                (_, "") => ProcessResult::Done,
                (_, rest) => self.before_html_anything_else(Token::Characters(rest.to_string())),
            },

            // "A start tag whose tag name is "html": Create an element for the
            //  token in the HTML namespace, with the Document as the intended
            //  parent. Append it to the Document object. Put this element in
            //  the stack of open elements. Switch the insertion mode to
            //  "before head"."
            Token::Tag(tag) if tag.is_start("html") => {
                let html = self.create_element_for(&tag, Namespace::Html);
                self.tree.append_child(NodeId::ROOT, html);
                self.open_elements.push(html);
                self.switch_to(InsertionMode::BeforeHead);
                ProcessResult::Done
            }

            // "An end tag whose tag name is one of: "head", "body", "html",
            //  "br": Act as described in the "anything else" entry below."
            Token::Tag(tag) if tag.is_end_of(EARLY_END_TAGS) => {
                self.before_html_anything_else(Token::Tag(tag))
            }

            // "Any other end tag: Parse error. Ignore the token."
            Token::Tag(tag) if tag.kind == TagKind::End => {
                self.unexpected(&tag);
                ProcessResult::Done
            }

            Token::ParseError(_) => ProcessResult::Done,
            token => self.before_html_anything_else(token),
        }
    }

    /// "Anything else: Create an html element whose node document is the
    /// Document object. Append it to the Document object. Put this element in
    /// the stack of open elements. Switch the insertion mode to "before head",
    /// then reprocess the token."
    fn before_html_anything_else(&mut self, token: Token) -> ProcessResult {
        let html = self
            .tree
            .alloc_element(ElementData::new(Namespace::Html, "html"));
        self.tree.append_child(NodeId::ROOT, html);
        self.open_elements.push(html);
        ProcessResult::Reprocess(InsertionMode::BeforeHead, token)
    }

    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    pub(crate) fn step_before_head(&mut self, token: Token) -> ProcessResult {
        match token {
            // "A character token that is ... whitespace: Ignore the token."
            Token::Characters(text) => match split_leading_whitespace(&text) {
                (_, "") => ProcessResult::Done,
                (_, rest) => self.before_head_anything_else(Token::Characters(rest.to_string())),
            },

            // "A comment token: Insert a comment."
            Token::Comment(data) => {
                self.insert_comment(&data);
                ProcessResult::Done
            }

            // "A DOCTYPE token: Parse error. Ignore the token."
            Token::Doctype(_) => self.ignore_unexpected(&token),

            // "A start tag whose tag name is "html": Process the token using
            //  the rules for the "in body" insertion mode."
            Token::Tag(tag) if tag.is_start("html") => self.step(InsertionMode::InBody, Token::Tag(tag)),

            // "A start tag whose tag name is "head": Insert an HTML element for
            //  the token. Set the head element pointer to the newly created head
            //  element. Switch the insertion mode to "in head"."
            Token::Tag(tag) if tag.is_start("head") => {
                let head = self.insert_html_element(&tag);
                self.head_element = Some(head);
                self.switch_to(InsertionMode::InHead);
                ProcessResult::Done
            }

            // "An end tag whose tag name is one of: "head", "body", "html",
            //  "br": Act as described in the "anything else" entry below."
            Token::Tag(tag) if tag.is_end_of(EARLY_END_TAGS) => {
                self.before_head_anything_else(Token::Tag(tag))
            }

            // "Any other end tag: Parse error. Ignore the token."
            Token::Tag(tag) if tag.kind == TagKind::End => {
                self.unexpected(&tag);
                ProcessResult::Done
            }

            Token::ParseError(_) => ProcessResult::Done,
            token => self.before_head_anything_else(token),
        }
    }

    /// "Anything else: Insert an HTML element for a "head" start tag token with
    /// no attributes. Set the head element pointer to the newly created head
    /// element. Switch the insertion mode to "in head". Reprocess the current
    /// token."
    fn before_head_anything_else(&mut self, token: Token) -> ProcessResult {
        let head = self.insert_html_element(&Tag::start("head"));
        self.head_element = Some(head);
        ProcessResult::Reprocess(InsertionMode::InHead, token)
    }
}

#[cfg(test)]
mod tests {
    use wombat_dom::{NodeId, QuirksMode, dump};

    use crate::opts::ParseOpts;
    use crate::tokenizer::{Doctype, Token};
    use crate::tree_builder::{ParseErrorKind, TreeBuilder};

    fn build(opts: ParseOpts, tokens: Vec<Token>) -> TreeBuilder {
        let mut builder = TreeBuilder::new(opts);
        for token in tokens {
            let _ = builder.process_token(token);
        }
        builder
    }

    fn html_doctype() -> Token {
        Token::Doctype(Doctype {
            name: Some("html".to_string()),
            ..Doctype::default()
        })
    }

    #[test]
    fn bare_text_gets_the_implied_skeleton_in_quirks_mode() {
        let builder = build(
            ParseOpts::default(),
            vec![Token::characters("Hello"), Token::EndOfFile],
        );
        let expected = "\
| <html>
|   <head>
|   <body>
|     \"Hello\"
";
        assert_eq!(dump(builder.tree(), NodeId::ROOT), expected);
        assert_eq!(builder.quirks_mode(), QuirksMode::Quirks);
        assert_eq!(builder.errors()[0].kind, ParseErrorKind::MissingDoctype);
    }

    #[test]
    fn html_doctype_is_no_quirks_without_errors() {
        let builder = build(
            ParseOpts::default(),
            vec![html_doctype(), Token::start_tag("p"), Token::EndOfFile],
        );
        assert_eq!(builder.quirks_mode(), QuirksMode::NoQuirks);
        assert!(builder.errors().is_empty());
        assert!(dump(builder.tree(), NodeId::ROOT).starts_with("| <!DOCTYPE html>\n"));
    }

    #[test]
    fn srcdoc_skips_the_missing_doctype_error() {
        let builder = build(
            ParseOpts::default().with_iframe_srcdoc(),
            vec![Token::characters("x"), Token::EndOfFile],
        );
        assert!(builder.errors().is_empty());
        assert_eq!(builder.quirks_mode(), QuirksMode::NoQuirks);
    }

    #[test]
    fn comments_before_html_attach_to_the_document() {
        let builder = build(
            ParseOpts::default(),
            vec![
                html_doctype(),
                Token::Comment("a".to_string()),
                Token::characters("  "),
                Token::end_tag("div"),
                Token::EndOfFile,
            ],
        );
        let expected = "\
| <!DOCTYPE html>
| <!-- a -->
| <html>
|   <head>
|   <body>
";
        assert_eq!(dump(builder.tree(), NodeId::ROOT), expected);
        assert_eq!(builder.errors()[0].kind, ParseErrorKind::UnexpectedEndTag);
    }
}
