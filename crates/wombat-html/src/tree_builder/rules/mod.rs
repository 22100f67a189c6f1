//! [§ 13.2.6.4 The rules for parsing tokens in HTML content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhtml)
//!
//! One `step_*` method per insertion mode, grouped the way the HTML standard
//! groups them.

mod after;
mod body;
mod head;
mod initial;
mod select;
mod table;
mod template;

use wombat_dom::NodeId;

use super::{InsertionMode, ParseErrorKind, ProcessResult, TreeBuilder};
use crate::tokenizer::{LexicalMode, Tag, Token};

impl TreeBuilder {
    /// [§ 13.2.6.2 Parsing elements that contain only text](https://html.spec.whatwg.org/multipage/parsing.html#parsing-elements-that-contain-only-text)
    ///
    /// The generic raw text and generic RCDATA element parsing algorithms:
    /// 1. "Insert an HTML element for the token."
    /// 2. "If the algorithm that was invoked is the generic raw text element
    ///    parsing algorithm, switch the tokenizer to the RAWTEXT state;
    ///    otherwise ... switch the tokenizer to the RCDATA state."
    /// 3. "Let the original insertion mode be the current insertion mode."
    /// 4. "Then, switch the insertion mode to "text"."
    pub(crate) fn parse_text_element(&mut self, tag: &Tag, lexer: LexicalMode) -> ProcessResult {
        let _ = self.insert_html_element(tag);
        self.original_mode = self.mode;
        self.switch_to(InsertionMode::Text);
        ProcessResult::SwitchLexer(lexer)
    }

    /// Record the parse error for a token that the current mode ignores or
    /// handles through its "anything else" entry.
    pub(crate) fn unexpected_token(&mut self, token: &Token) {
        match token {
            Token::Tag(tag) => self.unexpected(tag),
            Token::Characters(_) => self.error(ParseErrorKind::UnexpectedCharacters),
            Token::Doctype(_) => self.error(ParseErrorKind::UnexpectedDoctype),
            Token::EndOfFile => self.error(ParseErrorKind::UnexpectedEof),
            Token::Comment(_) | Token::ParseError(_) => {}
        }
    }

    /// Parse error, ignore the token.
    pub(crate) fn ignore_unexpected(&mut self, token: &Token) -> ProcessResult {
        self.unexpected_token(token);
        ProcessResult::Done
    }

    /// "Insert a comment as the last child of the Document object."
    pub(crate) fn insert_document_comment(&mut self, data: &str) -> ProcessResult {
        self.append_comment_to(NodeId::ROOT, data);
        ProcessResult::Done
    }

    /// Add every attribute of `tag` that `node` does not already carry, for
    /// repeated `<html>` and `<body>` start tags.
    pub(crate) fn merge_attributes(&mut self, node: NodeId, tag: &Tag) {
        let Some(element) = self.tree.as_element_mut(node) else {
            return;
        };
        for attr in &tag.attrs {
            let present = element
                .attrs
                .iter()
                .any(|existing| existing.namespace.is_none() && existing.name == attr.name);
            if !present {
                element.attrs.push(attr.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use wombat_dom::{NodeId, dump};

    use crate::opts::ParseOpts;
    use crate::tokenizer::{Tag, Token};
    use crate::tree_builder::TreeBuilder;

    #[test]
    fn repeated_body_tag_only_adds_missing_attributes() {
        let mut builder = TreeBuilder::new(ParseOpts::default());
        for token in [
            Token::Tag(Tag::start("body").with_attr("class", "a")),
            Token::Tag(Tag::start("body").with_attr("class", "b").with_attr("id", "x")),
            Token::EndOfFile,
        ] {
            let _ = builder.process_token(token);
        }
        let expected = "\
| <html>
|   <head>
|   <body>
|     class=\"a\"
|     id=\"x\"
";
        assert_eq!(dump(builder.tree(), NodeId::ROOT), expected);
    }
}
