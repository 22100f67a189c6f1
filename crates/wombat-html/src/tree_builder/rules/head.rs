//! The "in head", "in head noscript", "after head" and "text" insertion modes.

use crate::tokenizer::{LexicalMode, Tag, TagKind, Token};
use crate::tree_builder::{
    InsertionMode, ParseErrorKind, ProcessResult, TreeBuilder, split_leading_whitespace,
};

/// Start tags "after head" hands to the "in head" rules with the head element
/// pushed back on the stack.
const HEAD_CONTENT: &[&str] = &[
    "base", "basefont", "bgsound", "link", "meta", "noframes", "script", "style", "template",
    "title",
];

impl TreeBuilder {
    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    pub(crate) fn step_in_head(&mut self, token: Token) -> ProcessResult {
        match token {
            // "A character token that is ... whitespace: Insert the character."
            Token::Characters(text) => {
                let (space, rest) = split_leading_whitespace(&text);
                self.insert_characters(space);
                if rest.is_empty() {
                    return ProcessResult::Done;
                }
                self.in_head_anything_else(Token::Characters(rest.to_string()))
            }

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

            // "A start tag whose tag name is one of: "base", "basefont",
            //  "bgsound", "link": Insert an HTML element for the token.
            //  Immediately pop the current node off the stack of open elements.
            //  Acknowledge the token's self-closing flag, if it is set."
            // "A start tag whose tag name is "meta"": the same, and the
            //  character encoding steps do not apply to a decoded string.
            Token::Tag(tag) if tag.is_start_of(&["base", "basefont", "bgsound", "link", "meta"]) => {
                let _ = self.insert_void_element(&tag);
                ProcessResult::DoneAckSelfClosing
            }

            // "A start tag whose tag name is "title": Follow the generic RCDATA
            //  element parsing algorithm."
            Token::Tag(tag) if tag.is_start("title") => {
                self.parse_text_element(&tag, LexicalMode::Rcdata)
            }

            // "A start tag whose tag name is "noscript", if the scripting flag
            //  is enabled; A start tag whose tag name is one of: "noframes",
            //  "style": Follow the generic raw text element parsing algorithm."
            Token::Tag(tag)
                if tag.is_start_of(&["noframes", "style"])
                    || (tag.is_start("noscript") && self.opts.scripting_enabled) =>
            {
                self.parse_text_element(&tag, LexicalMode::Rawtext)
            }

            // "A start tag whose tag name is "noscript", if the scripting flag
            //  is disabled: Insert an HTML element for the token. Switch the
            //  insertion mode to "in head noscript"."
            Token::Tag(tag) if tag.is_start("noscript") => {
                let _ = self.insert_html_element(&tag);
                self.switch_to(InsertionMode::InHeadNoscript);
                ProcessResult::Done
            }

            // "A start tag whose tag name is "script"": insert the element at
            // the appropriate place, switch the tokenizer to the script data
            // state, remember the original insertion mode and switch to "text".
            Token::Tag(tag) if tag.is_start("script") => {
                self.parse_text_element(&tag, LexicalMode::ScriptData)
            }

            // "An end tag whose tag name is "head": Pop the current node (which
            //  will be the head element) off the stack of open elements. Switch
            //  the insertion mode to "after head"."
            Token::Tag(tag) if tag.is_end("head") => {
                let _ = self.pop();
                self.switch_to(InsertionMode::AfterHead);
                ProcessResult::Done
            }

            // "An end tag whose tag name is one of: "body", "html", "br": Act
            //  as described in the "anything else" entry below."
            Token::Tag(tag) if tag.is_end_of(&["body", "html", "br"]) => {
                self.in_head_anything_else(Token::Tag(tag))
            }

            // "A start tag whose tag name is "template""
            Token::Tag(tag) if tag.is_start("template") => {
                // "Insert an HTML element for the token. Insert a marker at the
                //  end of the list of active formatting elements. Set the
                //  frameset-ok flag to "not ok". Switch the insertion mode to
                //  "in template". Push "in template" onto the stack of template
                //  insertion modes so that it is the new current template
                //  insertion mode."
                let _ = self.insert_html_element(&tag);
                self.active_formatting.push_marker();
                self.frameset_ok = false;
                self.switch_to(InsertionMode::InTemplate);
                self.template_modes.push(InsertionMode::InTemplate);
                ProcessResult::Done
            }

            // "An end tag whose tag name is "template""
            Token::Tag(tag) if tag.is_end("template") => {
                // "If there is no template element on the stack of open
                //  elements, then this is a parse error; ignore the token."
                if !self.stack_has_template() {
                    self.unexpected(&tag);
                    return ProcessResult::Done;
                }
                // "Otherwise, run these steps:
                //  1. Generate all implied end tags thoroughly.
                //  2. If the current node is not a template element, then this
                //     is a parse error.
                //  3. Pop elements from the stack of open elements until a
                //     template element has been popped from the stack.
                //  4. Clear the list of active formatting elements up to the
                //     last marker.
                //  5. Pop the current template insertion mode off the stack of
                //     template insertion modes.
                //  6. Reset the insertion mode appropriately."
                self.generate_implied_end_tags_thoroughly();
                if !self.current_is("template") {
                    self.error_with(ParseErrorKind::EndTagWithUnclosedElements, &tag.name);
                }
                self.pop_until_named("template");
                self.active_formatting.clear_to_last_marker();
                let _ = self.template_modes.pop();
                self.reset_insertion_mode();
                ProcessResult::Done
            }

            // "A start tag whose tag name is "head"; Any other end tag: Parse
            //  error. Ignore the token."
            Token::Tag(tag) if tag.is_start("head") || tag.kind == TagKind::End => {
                self.unexpected(&tag);
                ProcessResult::Done
            }

            Token::ParseError(_) => ProcessResult::Done,
            token => self.in_head_anything_else(token),
        }
    }

    /// "Anything else: Pop the current node (which will be the head element)
    /// off the stack of open elements. Switch the insertion mode to "after
    /// head". Reprocess the token."
    fn in_head_anything_else(&mut self, token: Token) -> ProcessResult {
        let _ = self.pop();
        ProcessResult::Reprocess(InsertionMode::AfterHead, token)
    }

    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    pub(crate) fn step_in_head_noscript(&mut self, token: Token) -> ProcessResult {
        match token {
            // "A DOCTYPE token: Parse error. Ignore the token."
            Token::Doctype(_) => self.ignore_unexpected(&token),

            // "A start tag whose tag name is "html": Process the token using
            //  the rules for the "in body" insertion mode."
            Token::Tag(tag) if tag.is_start("html") => self.step(InsertionMode::InBody, Token::Tag(tag)),

            // "An end tag whose tag name is "noscript": Pop the current node
            //  (which will be a noscript element) from the stack of open
            //  elements; the new current node will be a head element. Switch
            //  the insertion mode to "in head"."
            Token::Tag(tag) if tag.is_end("noscript") => {
                let _ = self.pop();
                self.switch_to(InsertionMode::InHead);
                ProcessResult::Done
            }

            // "A character token that is ... whitespace; A comment token; A
            //  start tag whose tag name is one of: "basefont", "bgsound",
            //  "link", "meta", "noframes", "style": Process the token using
            //  the rules for the "in head" insertion mode."
            Token::Characters(text) => {
                let (space, rest) = split_leading_whitespace(&text);
                if !space.is_empty() {
                    let _ = self.step(InsertionMode::InHead, Token::Characters(space.to_string()));
                }
                if rest.is_empty() {
                    return ProcessResult::Done;
                }
                self.in_head_noscript_anything_else(Token::Characters(rest.to_string()))
            }
            Token::Comment(_) => self.step(InsertionMode::InHead, token),
            Token::Tag(tag)
                if tag.is_start_of(&["basefont", "bgsound", "link", "meta", "noframes", "style"]) =>
            {
                self.step(InsertionMode::InHead, Token::Tag(tag))
            }

            // "An end tag whose tag name is "br": Act as described in the
            //  "anything else" entry below."
            Token::Tag(tag) if tag.is_end("br") => self.in_head_noscript_anything_else(Token::Tag(tag)),

            // "A start tag whose tag name is one of: "head", "noscript"; Any
            //  other end tag: Parse error. Ignore the token."
            Token::Tag(tag) if tag.is_start_of(&["head", "noscript"]) || tag.kind == TagKind::End => {
                self.unexpected(&tag);
                ProcessResult::Done
            }

            Token::ParseError(_) => ProcessResult::Done,
            token => self.in_head_noscript_anything_else(token),
        }
    }

    /// "Anything else: Parse error. Pop the current node (which will be a
    /// noscript element) from the stack of open elements; the new current node
    /// will be a head element. Switch the insertion mode to "in head".
    /// Reprocess the token."
    fn in_head_noscript_anything_else(&mut self, token: Token) -> ProcessResult {
        self.unexpected_token(&token);
        let _ = self.pop();
        ProcessResult::Reprocess(InsertionMode::InHead, token)
    }

    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    pub(crate) fn step_after_head(&mut self, token: Token) -> ProcessResult {
        match token {
            // "A character token that is ... whitespace: Insert the character."
            Token::Characters(text) => {
                let (space, rest) = split_leading_whitespace(&text);
                self.insert_characters(space);
                if rest.is_empty() {
                    return ProcessResult::Done;
                }
                self.after_head_anything_else(Token::Characters(rest.to_string()))
            }

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

            // "A start tag whose tag name is "body": Insert an HTML element for
            //  the token. Set the frameset-ok flag to "not ok". Switch the
            //  insertion mode to "in body"."
            Token::Tag(tag) if tag.is_start("body") => {
                let _ = self.insert_html_element(&tag);
                self.frameset_ok = false;
                self.switch_to(InsertionMode::InBody);
                ProcessResult::Done
            }

            // "A start tag whose tag name is "frameset": Insert an HTML element
            //  for the token. Switch the insertion mode to "in frameset"."
            Token::Tag(tag) if tag.is_start("frameset") => {
                let _ = self.insert_html_element(&tag);
                self.switch_to(InsertionMode::InFrameset);
                ProcessResult::Done
            }

            // "A start tag whose tag name is one of: "base", "basefont",
            //  "bgsound", "link", "meta", "noframes", "script", "style",
            //  "template", "title""
            Token::Tag(tag) if tag.is_start_of(HEAD_CONTENT) => {
                // "Parse error. Push the node pointed to by the head element
                //  pointer onto the stack of open elements. Process the token
                //  using the rules for the "in head" insertion mode. Remove the
                //  node pointed to by the head element pointer from the stack
                //  of open elements. (It might not be the current node at this
                //  point.)"
                self.unexpected(&tag);
                let Some(head) = self.head_element else {
                    return self.step(InsertionMode::InHead, Token::Tag(tag));
                };
                self.open_elements.push(head);
                let result = self.step(InsertionMode::InHead, Token::Tag(tag));
                self.open_elements.remove(head);
                result
            }

            // "An end tag whose tag name is "template": Process the token using
            //  the rules for the "in head" insertion mode."
            Token::Tag(tag) if tag.is_end("template") => self.step(InsertionMode::InHead, Token::Tag(tag)),

            // "An end tag whose tag name is one of: "body", "html", "br": Act
            //  as described in the "anything else" entry below."
            Token::Tag(tag) if tag.is_end_of(&["body", "html", "br"]) => {
                self.after_head_anything_else(Token::Tag(tag))
            }

            // "A start tag whose tag name is "head"; Any other end tag: Parse
            //  error. Ignore the token."
            Token::Tag(tag) if tag.is_start("head") || tag.kind == TagKind::End => {
                self.unexpected(&tag);
                ProcessResult::Done
            }

            Token::ParseError(_) => ProcessResult::Done,
            token => self.after_head_anything_else(token),
        }
    }

    /// "Anything else: Insert an HTML element for a "body" start tag token
    /// with no attributes. Switch the insertion mode to "in body". Reprocess
    /// the current token."
    fn after_head_anything_else(&mut self, token: Token) -> ProcessResult {
        let _ = self.insert_html_element(&Tag::start("body"));
        ProcessResult::Reprocess(InsertionMode::InBody, token)
    }

    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    pub(crate) fn step_text(&mut self, token: Token) -> ProcessResult {
        match token {
            // "A character token: Insert the token's character."
            Token::Characters(text) => {
                self.insert_characters(&text);
                ProcessResult::Done
            }

            // "An end-of-file token: Parse error. If the current node is a
            //  script element, then set its already started to true. Pop the
            //  current node off the stack of open elements. Switch the
            //  insertion mode to the original insertion mode and reprocess the
            //  token."
            Token::EndOfFile => {
                self.error(ParseErrorKind::UnexpectedEof);
                let _ = self.pop();
                ProcessResult::Reprocess(self.original_mode, token)
            }

            // "An end tag whose tag name is "script"" and "Any other end tag":
            // "Pop the current node off the stack of open elements. Switch the
            //  insertion mode to the original insertion mode." Scripts are
            //  never run.
            Token::Tag(tag) if tag.kind == TagKind::End => {
                let _ = self.pop();
                self.switch_to(self.original_mode);
                ProcessResult::Done
            }

            // The tokenizer cannot produce anything else in the text lexical modes.
            _ => ProcessResult::Done,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use wombat_dom::{NodeId, dump};

    use crate::opts::ParseOpts;
    use crate::tokenizer::{LexicalMode, Tag, Token};
    use crate::tree_builder::{InsertionMode, TokenSinkResult, TreeBuilder};

    fn build(opts: ParseOpts, tokens: Vec<Token>) -> TreeBuilder {
        let mut builder = TreeBuilder::new(opts);
        for token in tokens {
            let _ = builder.process_token(token);
        }
        builder
    }

    #[rstest]
    #[case("title", LexicalMode::Rcdata)]
    #[case("style", LexicalMode::Rawtext)]
    #[case("noframes", LexicalMode::Rawtext)]
    #[case("script", LexicalMode::ScriptData)]
    fn head_text_elements_pick_a_lexer(#[case] name: &str, #[case] lexer: LexicalMode) {
        let mut builder = TreeBuilder::new(ParseOpts::default());
        assert_eq!(
            builder.process_token(Token::start_tag(name)),
            TokenSinkResult::SwitchTo(lexer)
        );
        let _ = builder.process_token(Token::characters("x"));
        let _ = builder.process_token(Token::end_tag(name));
        assert_eq!(builder.mode(), InsertionMode::InHead);
    }

    #[test]
    fn noscript_follows_the_scripting_flag() {
        let mut scripted = TreeBuilder::new(ParseOpts::default().with_scripting());
        assert_eq!(
            scripted.process_token(Token::start_tag("noscript")),
            TokenSinkResult::SwitchTo(LexicalMode::Rawtext)
        );

        let mut plain = TreeBuilder::new(ParseOpts::default());
        assert_eq!(
            plain.process_token(Token::start_tag("noscript")),
            TokenSinkResult::Continue
        );
        assert_eq!(plain.mode(), InsertionMode::InHeadNoscript);
    }

    #[test]
    fn stray_text_in_head_noscript_closes_it() {
        let builder = build(
            ParseOpts::default(),
            vec![
                Token::start_tag("noscript"),
                Token::Tag(Tag::start("link").with_attr("rel", "x")),
                Token::characters("hi"),
                Token::EndOfFile,
            ],
        );
        let expected = "\
| <html>
|   <head>
|     <noscript>
|       <link>
|         rel=\"x\"
|   <body>
|     \"hi\"
";
        assert_eq!(dump(builder.tree(), NodeId::ROOT), expected);
    }

    #[test]
    fn meta_after_head_goes_back_into_head() {
        let builder = build(
            ParseOpts::default(),
            vec![
                Token::start_tag("head"),
                Token::end_tag("head"),
                Token::characters(" "),
                Token::start_tag("meta"),
                Token::EndOfFile,
            ],
        );
        let expected = "\
| <html>
|   <head>
|     <meta>
|   \" \"
|   <body>
";
        assert_eq!(dump(builder.tree(), NodeId::ROOT), expected);
    }

    #[test]
    fn eof_in_text_mode_returns_to_the_original_mode() {
        let builder = build(
            ParseOpts::default(),
            vec![Token::start_tag("title"), Token::characters("t"), Token::EndOfFile],
        );
        assert!(builder.is_stopped());
        let expected = "\
| <html>
|   <head>
|     <title>
|       \"t\"
|   <body>
";
        assert_eq!(dump(builder.tree(), NodeId::ROOT), expected);
    }
}
