//! [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)

use wombat_dom::{Namespace, QuirksMode};

use crate::tokenizer::{LexicalMode, Tag, TagKind, Token};
use crate::tree_builder::stack::ScopeKind;
use crate::tree_builder::tags::{BODY_END_ALLOWED, FORMATTING, HEADINGS, is_special};
use crate::tree_builder::{InsertionMode, ParseErrorKind, ProcessResult, TreeBuilder, is_whitespace};

/// Start tags "in body" hands to the "in head" rules.
const HEAD_CONTENT: &[&str] = &[
    "base", "basefont", "bgsound", "link", "meta", "noframes", "script", "style", "template",
    "title",
];

/// Block containers that close an open `p` when they start.
const CLOSES_P: &[&str] = &[
    "address", "article", "aside", "blockquote", "center", "details", "dialog", "dir", "div",
    "dl", "fieldset", "figcaption", "figure", "footer", "header", "hgroup", "main", "menu", "nav",
    "ol", "p", "search", "section", "summary", "ul",
];

/// End tags that close a matching element in scope after generating implied
/// end tags.
const BLOCK_END: &[&str] = &[
    "address", "article", "aside", "blockquote", "button", "center", "details", "dialog", "dir",
    "div", "dl", "fieldset", "figcaption", "figure", "footer", "header", "hgroup", "listing",
    "main", "menu", "nav", "ol", "pre", "search", "section", "summary", "ul",
];

/// Formatting start tags other than `a` and `nobr`.
const PLAIN_FORMATTING: &[&str] = &[
    "b", "big", "code", "em", "font", "i", "s", "small", "strike", "strong", "tt", "u",
];

/// Elements that push a marker onto the list of active formatting elements.
const MARKER_ELEMENTS: &[&str] = &["applet", "marquee", "object"];

/// Void elements that also reset frameset-ok.
const VOID_PHRASING: &[&str] = &["area", "br", "embed", "img", "keygen", "wbr"];

/// Table parts that make no sense in body and are dropped.
const STRAY_TABLE_PARTS: &[&str] = &[
    "caption", "col", "colgroup", "frame", "head", "tbody", "td", "tfoot", "th", "thead", "tr",
];

/// The insertion modes a `select` start tag turns into "in select in table".
const TABLE_MODES: &[InsertionMode] = &[
    InsertionMode::InTable,
    InsertionMode::InCaption,
    InsertionMode::InTableBody,
    InsertionMode::InRow,
    InsertionMode::InCell,
];

impl TreeBuilder {
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    pub(crate) fn step_in_body(&mut self, token: Token) -> ProcessResult {
        match token {
            Token::Characters(text) => {
                self.body_characters(&text);
                ProcessResult::Done
            }

            // "A comment token: Insert a comment."
            Token::Comment(data) => {
                self.insert_comment(&data);
                ProcessResult::Done
            }

            // "A DOCTYPE token: Parse error. Ignore the token."
            Token::Doctype(_) => self.ignore_unexpected(&token),

            Token::Tag(tag) => match tag.kind {
                TagKind::Start => self.body_start_tag(tag),
                TagKind::End => self.body_end_tag(tag),
            },

            // "An end-of-file token"
            Token::EndOfFile => {
                // "If the stack of template insertion modes is not empty, then
                //  process the token using the rules for the "in template"
                //  insertion mode."
                if !self.template_modes.is_empty() {
                    return self.step(InsertionMode::InTemplate, token);
                }
                // "Otherwise: If there is a node in the stack of open elements
                //  that is not either a dd element, ... or the html element,
                //  then this is a parse error. Stop parsing."
                self.check_unclosed_at_body_end(None);
                self.stop_parsing()
            }

            Token::ParseError(_) => ProcessResult::Done,
        }
    }

    /// "A character token that is U+0000 NULL: Parse error. Ignore the token."
    /// "A character token that is ... whitespace: Reconstruct the active
    /// formatting elements, if any. Insert the token's character."
    /// "Any other character token: Reconstruct the active formatting elements,
    /// if any. Insert the token's character. Set the frameset-ok flag to "not
    /// ok"."
    fn body_characters(&mut self, text: &str) {
        let text = if text.contains('\0') {
            self.error(ParseErrorKind::UnexpectedNullCharacter);
            text.replace('\0', "")
        } else {
            text.to_string()
        };
        if text.is_empty() {
            return;
        }
        self.reconstruct_active_formatting_elements();
        self.insert_characters(&text);
        if text.chars().any(|c| !is_whitespace(c)) {
            self.frameset_ok = false;
        }
    }

    /// Parse error if the stack holds anything that must be closed explicitly
    /// before the body ends.
    fn check_unclosed_at_body_end(&mut self, closing: Option<&str>) {
        let unclosed = self.open_elements.iter_rev().any(|node| {
            self.element(node)
                .is_some_and(|e| !e.is_html_one_of(BODY_END_ALLOWED))
        });
        if unclosed {
            match closing {
                Some(name) => self.error_with(ParseErrorKind::EndTagWithUnclosedElements, name),
                None => self.error(ParseErrorKind::UnexpectedEof),
            }
        }
    }

    fn body_start_tag(&mut self, mut tag: Tag) -> ProcessResult {
        match tag.name.as_str() {
            // "A start tag whose tag name is "html": Parse error. If there is a
            //  template element on the stack of open elements, then ignore the
            //  token. Otherwise, for each attribute on the token, check to see
            //  if the attribute is already present on the top element of the
            //  stack of open elements. If it is not, add the attribute and its
            //  corresponding value to that element."
            "html" => {
                self.unexpected(&tag);
                if !self.stack_has_template()
                    && let Some(html) = self.open_elements.first()
                {
                    self.merge_attributes(html, &tag);
                }
                ProcessResult::Done
            }

            name if HEAD_CONTENT.contains(&name) => self.step(InsertionMode::InHead, Token::Tag(tag)),

            // "A start tag whose tag name is "body": Parse error. If the stack
            //  of open elements has only one node on it, if the second element
            //  on the stack of open elements is not a body element, or if there
            //  is a template element on the stack of open elements, then ignore
            //  the token. (fragment case or there is a template element on the
            //  stack) Otherwise, set the frameset-ok flag to "not ok"; then,
            //  for each attribute on the token, check to see if the attribute
            //  is already present on the body element (the second element) on
            //  the stack of open elements, and if it is not, add the attribute
            //  and its corresponding value to that element."
            "body" => {
                self.unexpected(&tag);
                let body = self
                    .open_elements
                    .get(1)
                    .filter(|&node| self.is_html_element(node, "body"));
                if let Some(body) = body
                    && !self.stack_has_template()
                {
                    self.frameset_ok = false;
                    self.merge_attributes(body, &tag);
                }
                ProcessResult::Done
            }

            // "A start tag whose tag name is "frameset""
            "frameset" => {
                // "Parse error."
                self.unexpected(&tag);
                // "If the stack of open elements has only one node on it, or if
                //  the second element on the stack of open elements is not a
                //  body element, then ignore the token. (fragment case or there
                //  is a template element on the stack)"
                // "If the frameset-ok flag is set to "not ok", ignore the token."
                let Some(body) = self
                    .open_elements
                    .get(1)
                    .filter(|&node| self.is_html_element(node, "body"))
                else {
                    return ProcessResult::Done;
                };
                if !self.frameset_ok {
                    return ProcessResult::Done;
                }
                // "Otherwise, run the following steps:
                //  1. Remove the second element on the stack of open elements
                //     from its parent node, if it has one.
                //  2. Pop all the nodes from the bottom of the stack of open
                //     elements, from the current node up to, but not including,
                //     the root html element.
                //  3. Insert an HTML element for the token.
                //  4. Switch the insertion mode to "in frameset"."
                self.tree.detach(body);
                self.open_elements.truncate(1);
                let _ = self.insert_html_element(&tag);
                self.switch_to(InsertionMode::InFrameset);
                ProcessResult::Done
            }

            // "A start tag whose tag name is one of: "address", "article", ...:
            //  If the stack of open elements has a p element in button scope,
            //  then close a p element. Insert an HTML element for the token."
            name if CLOSES_P.contains(&name) => {
                self.close_p_in_button_scope();
                let _ = self.insert_html_element(&tag);
                ProcessResult::Done
            }

            // "A start tag whose tag name is one of: "h1", "h2", "h3", "h4",
            //  "h5", "h6": If the stack of open elements has a p element in
            //  button scope, then close a p element. If the current node is an
            //  HTML element whose tag name is one of "h1", "h2", "h3", "h4",
            //  "h5", or "h6", then this is a parse error; pop the current node
            //  off the stack of open elements. Insert an HTML element for the
            //  token."
            name if HEADINGS.contains(&name) => {
                self.close_p_in_button_scope();
                if self.current_is_one_of(HEADINGS) {
                    self.unexpected(&tag);
                    let _ = self.pop();
                }
                let _ = self.insert_html_element(&tag);
                ProcessResult::Done
            }

            // "A start tag whose tag name is one of: "pre", "listing": If the
            //  stack of open elements has a p element in button scope, then
            //  close a p element. Insert an HTML element for the token. If the
            //  next token is a U+000A LINE FEED (LF) character token, then
            //  ignore that token and move on to the next one. (Newlines at the
            //  start of pre blocks are ignored as an authoring convenience.)
            //  Set the frameset-ok flag to "not ok"."
            "pre" | "listing" => {
                self.close_p_in_button_scope();
                let _ = self.insert_html_element(&tag);
                self.ignore_lf = true;
                self.frameset_ok = false;
                ProcessResult::Done
            }

            // "A start tag whose tag name is "form": If the form element
            //  pointer is not null, and there is no template element on the
            //  stack of open elements, then this is a parse error; ignore the
            //  token. Otherwise: If the stack of open elements has a p element
            //  in button scope, then close a p element. Insert an HTML element
            //  for the token, and, if there is no template element on the stack
            //  of open elements, set the form element pointer to point to the
            //  element created."
            "form" => {
                let has_template = self.stack_has_template();
                if self.form_element.is_some() && !has_template {
                    self.unexpected(&tag);
                    return ProcessResult::Done;
                }
                self.close_p_in_button_scope();
                let form = self.insert_html_element(&tag);
                if !has_template {
                    self.form_element = Some(form);
                }
                ProcessResult::Done
            }

            "li" => {
                self.close_list_item(&["li"]);
                let _ = self.insert_html_element(&tag);
                ProcessResult::Done
            }

            "dd" | "dt" => {
                self.close_list_item(&["dd", "dt"]);
                let _ = self.insert_html_element(&tag);
                ProcessResult::Done
            }

            // "A start tag whose tag name is "plaintext": If the stack of open
            //  elements has a p element in button scope, then close a p element.
            //  Insert an HTML element for the token. Switch the tokenizer to the
            //  PLAINTEXT state."
            "plaintext" => {
                self.close_p_in_button_scope();
                let _ = self.insert_html_element(&tag);
                ProcessResult::SwitchLexer(LexicalMode::Plaintext)
            }

            // "A start tag whose tag name is "button""
            "button" => {
                // "1. If the stack of open elements has a button element in
                //     scope, then run these substeps: Parse error. Generate
                //     implied end tags. Pop elements from the stack of open
                //     elements until a button element has been popped from the
                //     stack.
                //  2. Reconstruct the active formatting elements, if any.
                //  3. Insert an HTML element for the token.
                //  4. Set the frameset-ok flag to "not ok"."
                if self.in_scope("button", ScopeKind::Default) {
                    self.unexpected(&tag);
                    self.generate_implied_end_tags(None);
                    self.pop_until_named("button");
                }
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(&tag);
                self.frameset_ok = false;
                ProcessResult::Done
            }

            // "A start tag whose tag name is "a": If the list of active
            //  formatting elements contains an a element between the end of
            //  the list and the last marker on the list (or the start of the
            //  list if there is no marker on the list), then this is a parse
            //  error; run the adoption agency algorithm for the token, then
            //  remove that element from the list of active formatting elements
            //  and the stack of open elements if the adoption agency algorithm
            //  didn't already remove it (it might not have if the element is
            //  not in table scope). Reconstruct the active formatting elements,
            //  if any. Insert an HTML element for the token. Push onto the list
            //  of active formatting elements that element."
            "a" => {
                if let Some((_, stale)) = self.active_formatting.last_named_after_marker("a") {
                    self.unexpected(&tag);
                    let _ = self.run_adoption_agency("a");
                    self.active_formatting.remove_node(stale);
                    self.open_elements.remove(stale);
                }
                self.insert_formatting_element(tag)
            }

            // "A start tag whose tag name is one of: "b", "big", "code", "em",
            //  "font", "i", "s", "small", "strike", "strong", "tt", "u":
            //  Reconstruct the active formatting elements, if any. Insert an
            //  HTML element for the token. Push onto the list of active
            //  formatting elements that element."
            name if PLAIN_FORMATTING.contains(&name) => self.insert_formatting_element(tag),

            // "A start tag whose tag name is "nobr": Reconstruct the active
            //  formatting elements, if any. If the stack of open elements has a
            //  nobr element in scope, then this is a parse error; run the
            //  adoption agency algorithm for the token, then once again
            //  reconstruct the active formatting elements, if any. Insert an
            //  HTML element for the token. Push onto the list of active
            //  formatting elements that element."
            "nobr" => {
                self.reconstruct_active_formatting_elements();
                if self.in_scope("nobr", ScopeKind::Default) {
                    self.unexpected(&tag);
                    let _ = self.run_adoption_agency("nobr");
                }
                self.insert_formatting_element(tag)
            }

            // "A start tag whose tag name is one of: "applet", "marquee",
            //  "object": Reconstruct the active formatting elements, if any.
            //  Insert an HTML element for the token. Insert a marker at the end
            //  of the list of active formatting elements. Set the frameset-ok
            //  flag to "not ok"."
            name if MARKER_ELEMENTS.contains(&name) => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(&tag);
                self.active_formatting.push_marker();
                self.frameset_ok = false;
                ProcessResult::Done
            }

            // "A start tag whose tag name is "table": If the Document is not
            //  set to quirks mode, and the stack of open elements has a p
            //  element in button scope, then close a p element. Insert an HTML
            //  element for the token. Set the frameset-ok flag to "not ok".
            //  Switch the insertion mode to "in table"."
            "table" => {
                if self.tree.quirks_mode() != QuirksMode::Quirks {
                    self.close_p_in_button_scope();
                }
                let _ = self.insert_html_element(&tag);
                self.frameset_ok = false;
                self.switch_to(InsertionMode::InTable);
                ProcessResult::Done
            }

            // "A start tag whose tag name is one of: "area", "br", "embed",
            //  "img", "keygen", "wbr": Reconstruct the active formatting
            //  elements, if any. Insert an HTML element for the token.
            //  Immediately pop the current node off the stack of open elements.
            //  Acknowledge the token's self-closing flag, if it is set. Set the
            //  frameset-ok flag to "not ok"."
            name if VOID_PHRASING.contains(&name) => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_void_element(&tag);
                self.frameset_ok = false;
                ProcessResult::DoneAckSelfClosing
            }

            // "A start tag whose tag name is "input": Reconstruct the active
            //  formatting elements, if any. Insert an HTML element for the
            //  token. Immediately pop the current node off the stack of open
            //  elements. Acknowledge the token's self-closing flag, if it is
            //  set. If the token does not have an attribute with the name
            //  "type", or if it does, but that attribute's value is not an
            //  ASCII case-insensitive match for the string "hidden", then: set
            //  the frameset-ok flag to "not ok"."
            "input" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_void_element(&tag);
                if !is_hidden_input(&tag) {
                    self.frameset_ok = false;
                }
                ProcessResult::DoneAckSelfClosing
            }

            // "A start tag whose tag name is one of: "param", "source",
            //  "track": Insert an HTML element for the token. Immediately pop
            //  the current node off the stack of open elements. Acknowledge the
            //  token's self-closing flag, if it is set."
            "param" | "source" | "track" => {
                let _ = self.insert_void_element(&tag);
                ProcessResult::DoneAckSelfClosing
            }

            // "A start tag whose tag name is "hr": If the stack of open
            //  elements has a p element in button scope, then close a p
            //  element. Insert an HTML element for the token. Immediately pop
            //  the current node off the stack of open elements. Acknowledge the
            //  token's self-closing flag, if it is set. Set the frameset-ok flag
            //  to "not ok"."
            "hr" => {
                self.close_p_in_button_scope();
                let _ = self.insert_void_element(&tag);
                self.frameset_ok = false;
                ProcessResult::DoneAckSelfClosing
            }

            // "A start tag whose tag name is "image": Parse error. Change the
            //  token's tag name to "img" and reprocess it. (Don't ask.)"
            "image" => {
                self.unexpected(&tag);
                tag.name = "img".to_string();
                ProcessResult::Reprocess(self.mode, Token::Tag(tag))
            }

            // "A start tag whose tag name is "textarea""
            "textarea" => {
                // "1. Insert an HTML element for the token.
                //  2. If the next token is a U+000A LINE FEED (LF) character
                //     token, then ignore that token and move on to the next one.
                //  3. Switch the tokenizer to the RCDATA state.
                //  4. Let the original insertion mode be the current insertion mode.
                //  5. Set the frameset-ok flag to "not ok".
                //  6. Switch the insertion mode to "text"."
                let result = self.parse_text_element(&tag, LexicalMode::Rcdata);
                self.ignore_lf = true;
                self.frameset_ok = false;
                result
            }

            // "A start tag whose tag name is "xmp": If the stack of open
            //  elements has a p element in button scope, then close a p
            //  element. Reconstruct the active formatting elements, if any. Set
            //  the frameset-ok flag to "not ok". Follow the generic raw text
            //  element parsing algorithm."
            "xmp" => {
                self.close_p_in_button_scope();
                self.reconstruct_active_formatting_elements();
                self.frameset_ok = false;
                self.parse_text_element(&tag, LexicalMode::Rawtext)
            }

            // "A start tag whose tag name is "iframe": Set the frameset-ok flag
            //  to "not ok". Follow the generic raw text element parsing
            //  algorithm."
            "iframe" => {
                self.frameset_ok = false;
                self.parse_text_element(&tag, LexicalMode::Rawtext)
            }

            // "A start tag whose tag name is "noembed"; A start tag whose tag
            //  name is "noscript", if the scripting flag is enabled: Follow the
            //  generic raw text element parsing algorithm."
            "noembed" => self.parse_text_element(&tag, LexicalMode::Rawtext),
            "noscript" if self.opts.scripting_enabled => {
                self.parse_text_element(&tag, LexicalMode::Rawtext)
            }

            // "A start tag whose tag name is "select": Reconstruct the active
            //  formatting elements, if any. Insert an HTML element for the
            //  token. Set the frameset-ok flag to "not ok". If the insertion
            //  mode is one of "in table", "in caption", "in table body", "in
            //  row", or "in cell", then switch the insertion mode to "in select
            //  in table". Otherwise, switch the insertion mode to "in select"."
            "select" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(&tag);
                self.frameset_ok = false;
                let next = if TABLE_MODES.contains(&self.mode) {
                    InsertionMode::InSelectInTable
                } else {
                    InsertionMode::InSelect
                };
                self.switch_to(next);
                ProcessResult::Done
            }

            // "A start tag whose tag name is one of: "optgroup", "option": If
            //  the current node is an option element, then pop the current node
            //  off the stack of open elements. Reconstruct the active
            //  formatting elements, if any. Insert an HTML element for the
            //  token."
            "optgroup" | "option" => {
                if self.current_is("option") {
                    let _ = self.pop();
                }
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(&tag);
                ProcessResult::Done
            }

            // "A start tag whose tag name is one of: "rb", "rtc": If the stack
            //  of open elements has a ruby element in scope, then generate
            //  implied end tags. If the current node is not now a ruby element,
            //  this is a parse error. Insert an HTML element for the token."
            "rb" | "rtc" => {
                if self.in_scope("ruby", ScopeKind::Default) {
                    self.generate_implied_end_tags(None);
                    if !self.current_is("ruby") {
                        self.unexpected(&tag);
                    }
                }
                let _ = self.insert_html_element(&tag);
                ProcessResult::Done
            }

            // "A start tag whose tag name is one of: "rp", "rt": If the stack
            //  of open elements has a ruby element in scope, then generate
            //  implied end tags, except for rtc elements. If the current node
            //  is not now a rtc element or a ruby element, this is a parse
            //  error. Insert an HTML element for the token."
            "rp" | "rt" => {
                if self.in_scope("ruby", ScopeKind::Default) {
                    self.generate_implied_end_tags(Some("rtc"));
                    if !self.current_is_one_of(&["rtc", "ruby"]) {
                        self.unexpected(&tag);
                    }
                }
                let _ = self.insert_html_element(&tag);
                ProcessResult::Done
            }

            // "A start tag whose tag name is "math": Reconstruct the active
            //  formatting elements, if any. Adjust MathML attributes for the
            //  token. Adjust foreign attributes for the token. Insert a foreign
            //  element for the token, with MathML namespace and false. If the
            //  token has its self-closing flag set, pop the current node off the
            //  stack of open elements and acknowledge the token's self-closing
            //  flag."
            "math" => self.insert_foreign_root(tag, Namespace::MathMl),

            // "A start tag whose tag name is "svg"": the same, with SVG
            // attribute adjustment and the SVG namespace.
            "svg" => self.insert_foreign_root(tag, Namespace::Svg),

            // "A start tag whose tag name is one of: "caption", "col",
            //  "colgroup", "frame", "head", "tbody", "td", "tfoot", "th",
            //  "thead", "tr": Parse error. Ignore the token."
            name if STRAY_TABLE_PARTS.contains(&name) => {
                self.unexpected(&tag);
                ProcessResult::Done
            }

            // "Any other start tag: Reconstruct the active formatting elements,
            //  if any. Insert an HTML element for the token."
            _ => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(&tag);
                ProcessResult::Done
            }
        }
    }

    /// "Reconstruct the active formatting elements, if any. Insert an HTML
    /// element for the token. Push onto the list of active formatting elements
    /// that element."
    fn insert_formatting_element(&mut self, tag: Tag) -> ProcessResult {
        self.reconstruct_active_formatting_elements();
        let element = self.insert_html_element(&tag);
        self.active_formatting.push(element, tag);
        ProcessResult::Done
    }

    /// The shared steps of the "li" and "dd"/"dt" start tag entries.
    ///
    /// 1. "Set the frameset-ok flag to "not ok"."
    /// 2. "Initialize node to be the current node (the bottommost node of the
    ///    stack)."
    /// 3. "Loop: If node is an li element, then run these substeps: Generate
    ///    implied end tags, except for li elements. If the current node is not
    ///    an li element, then this is a parse error. Pop elements from the
    ///    stack of open elements until an li element has been popped from the
    ///    stack. Jump to the step labeled done below."
    /// 4. "If node is in the special category, but is not an address, div, or
    ///    p element, then jump to the step labeled done below."
    /// 5. "Otherwise, set node to the previous entry in the stack of open
    ///    elements and return to the step labeled loop."
    /// 6. "Done: If the stack of open elements has a p element in button
    ///    scope, then close a p element."
    fn close_list_item(&mut self, names: &[&str]) {
        self.frameset_ok = false;
        let mut found = None;
        for node in self.open_elements.iter_rev() {
            let Some(element) = self.element(node) else {
                continue;
            };
            if element.is_html_one_of(names) {
                found = Some(element.tag_name.clone());
                break;
            }
            if is_special(element) && !element.is_html_one_of(&["address", "div", "p"]) {
                break;
            }
        }
        if let Some(name) = found {
            self.generate_implied_end_tags(Some(&name));
            if !self.current_is(&name) {
                self.exact_error(ParseErrorKind::EndTagNotCurrentNode, &name);
            }
            self.pop_until_named(&name);
        }
        self.close_p_in_button_scope();
    }

    fn body_end_tag(&mut self, tag: Tag) -> ProcessResult {
        match tag.name.as_str() {
            // "An end tag whose tag name is "template": Process the token using
            //  the rules for the "in head" insertion mode."
            "template" => self.step(InsertionMode::InHead, Token::Tag(tag)),

            // "An end tag whose tag name is "body": If the stack of open
            //  elements does not have a body element in scope, this is a parse
            //  error; ignore the token. Otherwise, if there is a node in the
            //  stack of open elements that is not either a dd element, ... then
            //  this is a parse error. Switch the insertion mode to "after body"."
            // "An end tag whose tag name is "html"": the same, then "Reprocess
            //  the token."
            "body" | "html" => {
                if !self.in_scope("body", ScopeKind::Default) {
                    self.unexpected(&tag);
                    return ProcessResult::Done;
                }
                self.check_unclosed_at_body_end(Some(&tag.name));
                if tag.name == "html" {
                    return ProcessResult::Reprocess(InsertionMode::AfterBody, Token::Tag(tag));
                }
                self.switch_to(InsertionMode::AfterBody);
                ProcessResult::Done
            }

            // "An end tag whose tag name is one of: "address", "article", ...:
            //  If the stack of open elements does not have an element in scope
            //  that is an HTML element with the same tag name as that of the
            //  token, then this is a parse error; ignore the token. Otherwise,
            //  run these steps: Generate implied end tags. If the current node
            //  is not an HTML element with the same tag name as that of the
            //  token, then this is a parse error. Pop elements from the stack of
            //  open elements until an HTML element with the same tag name as
            //  the token has been popped from the stack."
            name if BLOCK_END.contains(&name) => {
                let _ = self.close_in_scope(&tag, ScopeKind::Default, None);
                ProcessResult::Done
            }

            "form" => {
                self.body_form_end_tag(&tag);
                ProcessResult::Done
            }

            // "An end tag whose tag name is "p": If the stack of open elements
            //  does not have a p element in button scope, then this is a parse
            //  error; insert an HTML element for a "p" start tag token with no
            //  attributes. Close a p element."
            "p" => {
                if !self.in_scope("p", ScopeKind::Button) {
                    self.unexpected(&tag);
                    let _ = self.insert_html_element(&Tag::start("p"));
                }
                self.close_p_element();
                ProcessResult::Done
            }

            // "An end tag whose tag name is "li": If the stack of open elements
            //  does not have an li element in list item scope, then this is a
            //  parse error; ignore the token. Otherwise, run these steps:
            //  Generate implied end tags, except for li elements. If the current
            //  node is not an li element, then this is a parse error. Pop
            //  elements from the stack of open elements until an li element has
            //  been popped from the stack."
            "li" => {
                let _ = self.close_in_scope(&tag, ScopeKind::ListItem, Some("li"));
                ProcessResult::Done
            }

            // "An end tag whose tag name is one of: "dd", "dt"": as "li" but in
            // plain scope and excepting the token's own tag name.
            "dd" | "dt" => {
                let name = tag.name.clone();
                let _ = self.close_in_scope(&tag, ScopeKind::Default, Some(&name));
                ProcessResult::Done
            }

            // "An end tag whose tag name is one of: "h1", "h2", "h3", "h4",
            //  "h5", "h6": If the stack of open elements does not have an
            //  element in scope that is an HTML element and whose tag name is
            //  one of "h1", "h2", "h3", "h4", "h5", or "h6", then this is a
            //  parse error; ignore the token. Otherwise, run these steps:
            //  Generate implied end tags. If the current node is not an HTML
            //  element with the same tag name as that of the token, then this
            //  is a parse error. Pop elements from the stack of open elements
            //  until an HTML element whose tag name is one of "h1", "h2", "h3",
            //  "h4", "h5", or "h6" has been popped from the stack."
            name if HEADINGS.contains(&name) => {
                if !self.any_in_scope(HEADINGS, ScopeKind::Default) {
                    self.unexpected(&tag);
                    return ProcessResult::Done;
                }
                self.generate_implied_end_tags(None);
                if !self.current_is(&tag.name) {
                    self.error_with(ParseErrorKind::EndTagWithUnclosedElements, &tag.name);
                }
                self.pop_until_one_of(HEADINGS);
                ProcessResult::Done
            }

            // "An end tag whose tag name is one of: "a", "b", "big", "code",
            //  "em", "font", "i", "nobr", "s", "small", "strike", "strong",
            //  "tt", "u": Run the adoption agency algorithm for the token."
            name if FORMATTING.contains(&name) => {
                if !self.run_adoption_agency(&tag.name) {
                    self.any_other_end_tag(&tag);
                }
                ProcessResult::Done
            }

            // "An end tag token whose tag name is one of: "applet", "marquee",
            //  "object": If the stack of open elements does not have an element
            //  in scope that is an HTML element with the same tag name as that
            //  of the token, then this is a parse error; ignore the token.
            //  Otherwise, run these steps: Generate implied end tags. If the
            //  current node is not an HTML element with the same tag name as
            //  that of the token, then this is a parse error. Pop elements from
            //  the stack of open elements until an HTML element with the same
            //  tag name as the token has been popped from the stack. Clear the
            //  list of active formatting elements up to the last marker."
            name if MARKER_ELEMENTS.contains(&name) => {
                if self.close_in_scope(&tag, ScopeKind::Default, None) {
                    self.active_formatting.clear_to_last_marker();
                }
                ProcessResult::Done
            }

            // "An end tag whose tag name is "br": Parse error. Drop the
            //  attributes from the token, and act as described in the next
            //  entry; i.e. act as if this was a "br" start tag token with no
            //  attributes, rather than the end tag token that it actually is."
            "br" => {
                self.unexpected(&tag);
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_void_element(&Tag::start("br"));
                self.frameset_ok = false;
                ProcessResult::Done
            }

            _ => {
                self.any_other_end_tag(&tag);
                ProcessResult::Done
            }
        }
    }

    /// The common "generate implied end tags, then pop until the same tag
    /// name" end tag steps. Returns false if the token was ignored.
    fn close_in_scope(&mut self, tag: &Tag, scope: ScopeKind, except: Option<&str>) -> bool {
        if !self.in_scope(&tag.name, scope) {
            self.unexpected(tag);
            return false;
        }
        self.generate_implied_end_tags(except);
        if !self.current_is(&tag.name) {
            self.error_with(ParseErrorKind::EndTagWithUnclosedElements, &tag.name);
        }
        self.pop_until_named(&tag.name);
        true
    }

    /// "An end tag whose tag name is "form""
    fn body_form_end_tag(&mut self, tag: &Tag) {
        // "If there is no template element on the stack of open elements, then
        //  run these substeps:
        //  1. Let node be the element that the form element pointer is set to,
        //     or null if it is not set to an element.
        //  2. Set the form element pointer to null.
        //  3. If node is null or if the stack of open elements does not have
        //     node in scope, then this is a parse error; return and ignore the
        //     token.
        //  4. Generate implied end tags.
        //  5. If the current node is not node, then this is a parse error.
        //  6. Remove node from the stack of open elements."
        if !self.stack_has_template() {
            let node = self.form_element.take();
            let Some(node) = node.filter(|&node| {
                self.open_elements
                    .has_node_in_scope(&self.tree, node, ScopeKind::Default)
            }) else {
                self.unexpected(tag);
                return;
            };
            self.generate_implied_end_tags(None);
            if self.current_node() != Some(node) {
                self.error_with(ParseErrorKind::EndTagWithUnclosedElements, &tag.name);
            }
            self.open_elements.remove(node);
            return;
        }

        // "If there is a template element on the stack of open elements, then
        //  run these substeps instead: If the stack of open elements does not
        //  have a form element in scope, then this is a parse error; return
        //  and ignore the token. Generate implied end tags. If the current node
        //  is not a form element, then this is a parse error. Pop elements from
        //  the stack of open elements until a form element has been popped from
        //  the stack."
        let _ = self.close_in_scope(tag, ScopeKind::Default, None);
    }

    /// "Any other end tag"
    ///
    /// 1. "Initialize node to be the current node (the bottommost node of the
    ///    stack)."
    /// 2. "Loop: If node is an HTML element with the same tag name as the
    ///    token, then: Generate implied end tags, except for HTML elements with
    ///    the same tag name as the token. If node is not the current node, then
    ///    this is a parse error. Pop all the nodes from the current node up to
    ///    node, including node, then stop these steps."
    /// 3. "Otherwise, if node is in the special category, then this is a parse
    ///    error; ignore the token, and return."
    /// 4. "Set node to the previous entry in the stack of open elements."
    /// 5. "Return to the step labeled loop."
    pub(crate) fn any_other_end_tag(&mut self, tag: &Tag) {
        let mut target = None;
        for node in self.open_elements.iter_rev() {
            let Some(element) = self.element(node) else {
                continue;
            };
            if element.is_html(&tag.name) {
                target = Some(node);
                break;
            }
            if is_special(element) {
                break;
            }
        }

        let Some(node) = target else {
            self.unexpected(tag);
            return;
        };
        self.generate_implied_end_tags(Some(&tag.name));
        if self.current_node() != Some(node) {
            self.error_with(ParseErrorKind::EndTagWithUnclosedElements, &tag.name);
        }
        self.pop_until_node(node);
    }
}

/// "If the token does not have an attribute with the name "type", or if it
/// does, but that attribute's value is not an ASCII case-insensitive match
/// for the string "hidden""
pub(crate) fn is_hidden_input(tag: &Tag) -> bool {
    tag.get_attribute("type")
        .is_some_and(|kind| kind.eq_ignore_ascii_case("hidden"))
}

#[cfg(test)]
mod tests {
    use wombat_dom::{NodeId, dump};

    use crate::opts::ParseOpts;
    use crate::tokenizer::{Tag, Token};
    use crate::tree_builder::{InsertionMode, ParseErrorKind, TreeBuilder};

    fn body_dump(tokens: Vec<Token>) -> (String, TreeBuilder) {
        let mut builder = TreeBuilder::new(ParseOpts::default().with_iframe_srcdoc());
        for token in tokens {
            let _ = builder.process_token(token);
        }
        let _ = builder.process_token(Token::EndOfFile);
        (dump(builder.tree(), NodeId::ROOT), builder)
    }

    #[test]
    fn paragraph_is_closed_by_a_block() {
        let (tree, _) = body_dump(vec![
            Token::start_tag("p"),
            Token::characters("a"),
            Token::start_tag("div"),
            Token::characters("b"),
        ]);
        let expected = "\
| <html>
|   <head>
|   <body>
|     <p>
|       \"a\"
|     <div>
|       \"b\"
";
        assert_eq!(tree, expected);
    }

    #[test]
    fn list_items_close_their_siblings() {
        let (tree, _) = body_dump(vec![
            Token::start_tag("ul"),
            Token::start_tag("li"),
            Token::characters("1"),
            Token::start_tag("li"),
            Token::characters("2"),
        ]);
        let expected = "\
| <html>
|   <head>
|   <body>
|     <ul>
|       <li>
|         \"1\"
|       <li>
|         \"2\"
";
        assert_eq!(tree, expected);
    }

    #[test]
    fn stray_paragraph_end_tag_creates_an_empty_paragraph() {
        let (tree, builder) = body_dump(vec![Token::start_tag("body"), Token::end_tag("p")]);
        assert!(tree.ends_with("|   <body>\n|     <p>\n"));
        assert_eq!(builder.errors()[0].kind, ParseErrorKind::UnexpectedEndTag);
    }

    #[test]
    fn end_br_becomes_a_br_element() {
        let (tree, _) = body_dump(vec![Token::end_tag("br")]);
        assert!(tree.ends_with("|   <body>\n|     <br>\n"));
    }

    #[test]
    fn image_is_renamed_to_img() {
        let (tree, _) = body_dump(vec![Token::Tag(Tag::start("image").with_attr("src", "a"))]);
        assert!(tree.ends_with("|     <img>\n|       src=\"a\"\n"));
    }

    #[test]
    fn second_form_is_ignored_while_the_first_is_open() {
        let (tree, builder) = body_dump(vec![
            Token::start_tag("form"),
            Token::start_tag("form"),
            Token::end_tag("form"),
        ]);
        assert!(tree.ends_with("|   <body>\n|     <form>\n"));
        assert!(builder
            .errors()
            .iter()
            .any(|e| e.kind == ParseErrorKind::UnexpectedStartTag));
    }

    #[test]
    fn frameset_replaces_an_untouched_body() {
        let (tree, builder) = body_dump(vec![
            Token::start_tag("div"),
            Token::start_tag("frameset"),
            Token::end_tag("frameset"),
        ]);
        assert_eq!(tree, "| <html>\n|   <head>\n|   <frameset>\n");
        assert_eq!(builder.mode(), InsertionMode::AfterFrameset);
    }

    #[test]
    fn frameset_is_ignored_after_content() {
        let (tree, _) = body_dump(vec![Token::characters("x"), Token::start_tag("frameset")]);
        assert!(tree.ends_with("|   <body>\n|     \"x\"\n"));
    }

    #[test]
    fn hidden_input_keeps_frameset_ok() {
        let (tree, _) = body_dump(vec![
            Token::Tag(Tag::start("input").with_attr("type", "HIDDEN")),
            Token::start_tag("frameset"),
        ]);
        assert_eq!(tree, "| <html>\n|   <head>\n|   <frameset>\n");
    }

    #[test]
    fn unknown_end_tag_stops_at_special_elements() {
        let (tree, builder) = body_dump(vec![
            Token::start_tag("span"),
            Token::start_tag("div"),
            Token::end_tag("span"),
            Token::characters("x"),
        ]);
        assert!(tree.ends_with("|     <span>\n|       <div>\n|         \"x\"\n"));
        assert!(builder
            .errors()
            .iter()
            .any(|e| e.kind == ParseErrorKind::UnexpectedEndTag));
    }

    #[test]
    fn nested_nobr_is_split_by_adoption() {
        let (tree, _) = body_dump(vec![
            Token::start_tag("nobr"),
            Token::characters("a"),
            Token::start_tag("nobr"),
            Token::characters("b"),
        ]);
        let expected = "\
| <html>
|   <head>
|   <body>
|     <nobr>
|       \"a\"
|     <nobr>
|       \"b\"
";
        assert_eq!(tree, expected);
    }

    #[test]
    fn null_characters_are_dropped() {
        let (tree, builder) = body_dump(vec![Token::characters("a\0b")]);
        assert!(tree.ends_with("|     \"ab\"\n"));
        assert_eq!(builder.errors()[0].kind, ParseErrorKind::UnexpectedNullCharacter);
    }
}
