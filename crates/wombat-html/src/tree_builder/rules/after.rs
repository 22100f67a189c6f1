//! The trailing insertion modes: "after body", "in frameset", "after
//! frameset", "after after body" and "after after frameset".

use crate::tokenizer::Token;
use crate::tree_builder::{
    InsertionMode, ParseErrorKind, ProcessResult, TreeBuilder, is_whitespace,
    split_leading_whitespace,
};

impl TreeBuilder {
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    pub(crate) fn step_after_body(&mut self, token: Token) -> ProcessResult {
        match token {
            // "A character token that is ... whitespace: Process the token
            //  using the rules for the "in body" insertion mode."
            Token::Characters(text) => self.whitespace_then_body(&text),

            // "A comment token: Insert a comment as the last child of the first
            //  element in the stack of open elements (the html element)."
            Token::Comment(data) => {
                if let Some(html) = self.open_elements.first() {
                    self.append_comment_to(html, &data);
                }
                ProcessResult::Done
            }

            // "A DOCTYPE token: Parse error. Ignore the token."
            Token::Doctype(_) => self.ignore_unexpected(&token),

            // "A start tag whose tag name is "html": Process the token using
            //  the rules for the "in body" insertion mode."
            Token::Tag(tag) if tag.is_start("html") => self.step(InsertionMode::InBody, Token::Tag(tag)),

            // "An end tag whose tag name is "html": If the parser was created as
            //  part of the HTML fragment parsing algorithm, this is a parse
            //  error; ignore the token. (fragment case) Otherwise, switch the
            //  insertion mode to "after after body"."
            Token::Tag(tag) if tag.is_end("html") => {
                if self.context_element.is_some() {
                    self.unexpected(&tag);
                } else {
                    self.switch_to(InsertionMode::AfterAfterBody);
                }
                ProcessResult::Done
            }

            // "An end-of-file token: Stop parsing."
            Token::EndOfFile => self.stop_parsing(),

            Token::ParseError(_) => ProcessResult::Done,

            // "Anything else: Parse error. Switch the insertion mode to "in
            //  body" and reprocess the token."
            token => {
                self.unexpected_token(&token);
                ProcessResult::Reprocess(InsertionMode::InBody, token)
            }
        }
    }

    /// Leading whitespace goes through the "in body" rules; anything after it
    /// is a parse error that sends the parser back to "in body".
    fn whitespace_then_body(&mut self, text: &str) -> ProcessResult {
        let (space, rest) = split_leading_whitespace(text);
        if !space.is_empty() {
            let _ = self.step(InsertionMode::InBody, Token::Characters(space.to_string()));
        }
        if rest.is_empty() {
            return ProcessResult::Done;
        }
        self.error(ParseErrorKind::UnexpectedCharacters);
        ProcessResult::Reprocess(InsertionMode::InBody, Token::Characters(rest.to_string()))
    }

    /// Frameset documents keep only whitespace: "Any other character token"
    /// is a parse error and ignored, one character at a time.
    fn insert_frameset_whitespace(&mut self, text: &str) {
        let kept: String = text.chars().filter(|&c| is_whitespace(c)).collect();
        if kept.len() != text.len() {
            self.error(ParseErrorKind::UnexpectedCharacters);
        }
        self.insert_characters(&kept);
    }

    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    pub(crate) fn step_in_frameset(&mut self, token: Token) -> ProcessResult {
        match token {
            // "A character token that is ... whitespace: Insert the character."
            Token::Characters(text) => {
                self.insert_frameset_whitespace(&text);
                ProcessResult::Done
            }

            // "A comment token: Insert a comment."
            Token::Comment(data) => {
                self.insert_comment(&data);
                ProcessResult::Done
            }

            // "A start tag whose tag name is "html": Process the token using
            //  the rules for the "in body" insertion mode."
            Token::Tag(tag) if tag.is_start("html") => self.step(InsertionMode::InBody, Token::Tag(tag)),

            // "A start tag whose tag name is "frameset": Insert an HTML element
            //  for the token."
            Token::Tag(tag) if tag.is_start("frameset") => {
                let _ = self.insert_html_element(&tag);
                ProcessResult::Done
            }

            // "An end tag whose tag name is "frameset": If the current node is
            //  the root html element, then this is a parse error; ignore the
            //  token. (fragment case) Otherwise, pop the current node from the
            //  stack of open elements. If the parser was not created as part of
            //  the HTML fragment parsing algorithm (fragment case), and the
            //  current node is no longer a frameset element, then switch the
            //  insertion mode to "after frameset"."
            Token::Tag(tag) if tag.is_end("frameset") => {
                if self.open_elements.len() <= 1 {
                    self.unexpected(&tag);
                    return ProcessResult::Done;
                }
                let _ = self.pop();
                if self.context_element.is_none() && !self.current_is("frameset") {
                    self.switch_to(InsertionMode::AfterFrameset);
                }
                ProcessResult::Done
            }

            // "A start tag whose tag name is "frame": Insert an HTML element for
            //  the token. Immediately pop the current node off the stack of open
            //  elements. Acknowledge the token's self-closing flag, if it is set."
            Token::Tag(tag) if tag.is_start("frame") => {
                let _ = self.insert_void_element(&tag);
                ProcessResult::DoneAckSelfClosing
            }

            // "A start tag whose tag name is "noframes": Process the token using
            //  the rules for the "in head" insertion mode."
            Token::Tag(tag) if tag.is_start("noframes") => self.step(InsertionMode::InHead, Token::Tag(tag)),

            // "An end-of-file token: If the current node is not the root html
            //  element, then this is a parse error. Note: The current node can
            //  only be the root html element in the fragment case. Stop parsing."
            Token::EndOfFile => {
                if self.open_elements.len() > 1 {
                    self.error(ParseErrorKind::UnexpectedEof);
                }
                self.stop_parsing()
            }

            Token::ParseError(_) => ProcessResult::Done,

            // "A DOCTYPE token; Anything else: Parse error. Ignore the token."
            Token::Doctype(_) | Token::Tag(_) => self.ignore_unexpected(&token),
        }
    }

    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    pub(crate) fn step_after_frameset(&mut self, token: Token) -> ProcessResult {
        match token {
            // "A character token that is ... whitespace: Insert the character."
            Token::Characters(text) => {
                self.insert_frameset_whitespace(&text);
                ProcessResult::Done
            }

            // "A comment token: Insert a comment."
            Token::Comment(data) => {
                self.insert_comment(&data);
                ProcessResult::Done
            }

            // "A start tag whose tag name is "html": Process the token using
            //  the rules for the "in body" insertion mode."
            Token::Tag(tag) if tag.is_start("html") => self.step(InsertionMode::InBody, Token::Tag(tag)),

            // "An end tag whose tag name is "html": Switch the insertion mode to
            //  "after after frameset"."
            Token::Tag(tag) if tag.is_end("html") => {
                self.switch_to(InsertionMode::AfterAfterFrameset);
                ProcessResult::Done
            }

            // "A start tag whose tag name is "noframes": Process the token using
            //  the rules for the "in head" insertion mode."
            Token::Tag(tag) if tag.is_start("noframes") => self.step(InsertionMode::InHead, Token::Tag(tag)),

            // "An end-of-file token: Stop parsing."
            Token::EndOfFile => self.stop_parsing(),

            Token::ParseError(_) => ProcessResult::Done,

            // "A DOCTYPE token; Anything else: Parse error. Ignore the token."
            Token::Doctype(_) | Token::Tag(_) => self.ignore_unexpected(&token),
        }
    }

    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    pub(crate) fn step_after_after_body(&mut self, token: Token) -> ProcessResult {
        match token {
            // "A comment token: Insert a comment as the last child of the
            //  Document object."
            Token::Comment(data) => self.insert_document_comment(&data),

            // "A DOCTYPE token; A character token that is ... whitespace; A
            //  start tag whose tag name is "html": Process the token using the
            //  rules for the "in body" insertion mode."
            Token::Doctype(_) => self.step(InsertionMode::InBody, token),
            Token::Characters(text) => self.whitespace_then_body(&text),
            Token::Tag(tag) if tag.is_start("html") => self.step(InsertionMode::InBody, Token::Tag(tag)),

            // "An end-of-file token: Stop parsing."
            Token::EndOfFile => self.stop_parsing(),

            Token::ParseError(_) => ProcessResult::Done,

            // "Anything else: Parse error. Switch the insertion mode to "in
            //  body" and reprocess the token."
            Token::Tag(tag) => {
                self.unexpected(&tag);
                ProcessResult::Reprocess(InsertionMode::InBody, Token::Tag(tag))
            }
        }
    }

    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    pub(crate) fn step_after_after_frameset(&mut self, token: Token) -> ProcessResult {
        match token {
            // "A comment token: Insert a comment as the last child of the
            //  Document object."
            Token::Comment(data) => self.insert_document_comment(&data),

            // "A DOCTYPE token; A character token that is ... whitespace; A
            //  start tag whose tag name is "html": Process the token using the
            //  rules for the "in body" insertion mode."
            Token::Doctype(_) => self.step(InsertionMode::InBody, token),
            Token::Characters(text) => {
                let kept: String = text.chars().filter(|&c| is_whitespace(c)).collect();
                if kept.len() != text.len() {
                    self.error(ParseErrorKind::UnexpectedCharacters);
                }
                if kept.is_empty() {
                    return ProcessResult::Done;
                }
                self.step(InsertionMode::InBody, Token::Characters(kept))
            }
            Token::Tag(tag) if tag.is_start("html") => self.step(InsertionMode::InBody, Token::Tag(tag)),

            // "A start tag whose tag name is "noframes": Process the token using
            //  the rules for the "in head" insertion mode."
            Token::Tag(tag) if tag.is_start("noframes") => self.step(InsertionMode::InHead, Token::Tag(tag)),

            // "An end-of-file token: Stop parsing."
            Token::EndOfFile => self.stop_parsing(),

            Token::ParseError(_) => ProcessResult::Done,

            // "Anything else: Parse error. Ignore the token."
            Token::Tag(_) => self.ignore_unexpected(&token),
        }
    }
}

#[cfg(test)]
mod tests {
    use wombat_dom::{NodeId, dump};

    use crate::opts::ParseOpts;
    use crate::tokenizer::Token;
    use crate::tree_builder::{InsertionMode, ParseErrorKind, TreeBuilder};

    fn finish(tokens: Vec<Token>) -> (String, TreeBuilder) {
        let mut builder = TreeBuilder::new(ParseOpts::default().with_iframe_srcdoc());
        for token in tokens {
            let _ = builder.process_token(token);
        }
        let _ = builder.process_token(Token::EndOfFile);
        (dump(builder.tree(), NodeId::ROOT), builder)
    }

    #[test]
    fn comment_after_body_goes_on_the_html_element() {
        let (tree, _) = finish(vec![
            Token::start_tag("body"),
            Token::end_tag("body"),
            Token::Comment("c".to_string()),
        ]);
        assert_eq!(tree, "| <html>\n|   <head>\n|   <body>\n|   <!-- c -->\n");
    }

    #[test]
    fn comment_after_html_goes_on_the_document() {
        let (tree, _) = finish(vec![
            Token::start_tag("body"),
            Token::end_tag("html"),
            Token::Comment("c".to_string()),
        ]);
        assert_eq!(tree, "| <html>\n|   <head>\n|   <body>\n| <!-- c -->\n");
    }

    #[test]
    fn text_after_body_reopens_it() {
        let (tree, builder) = finish(vec![
            Token::start_tag("body"),
            Token::end_tag("body"),
            Token::characters(" x"),
        ]);
        assert_eq!(tree, "| <html>\n|   <head>\n|   <body>\n|     \" x\"\n");
        assert_eq!(builder.errors()[0].kind, ParseErrorKind::UnexpectedCharacters);
    }

    #[test]
    fn frameset_keeps_only_whitespace_and_frames() {
        let (tree, builder) = finish(vec![
            Token::start_tag("frameset"),
            Token::characters("a b"),
            Token::start_tag("frame"),
            Token::start_tag("div"),
            Token::end_tag("frameset"),
            Token::start_tag("noframes"),
        ]);
        let expected = "\
| <html>
|   <head>
|   <frameset>
|     \" \"
|     <frame>
|   <noframes>
";
        assert_eq!(tree, expected);
        assert_eq!(builder.mode(), InsertionMode::AfterFrameset);
        assert!(builder
            .errors()
            .iter()
            .any(|e| e.kind == ParseErrorKind::UnexpectedStartTag));
    }
}
