//! The table insertion modes: "in table", "in table text", "in caption",
//! "in column group", "in table body", "in row" and "in cell".

use super::body::is_hidden_input;
use crate::tokenizer::{Tag, Token};
use crate::tree_builder::stack::ScopeKind;
use crate::tree_builder::{
    InsertionMode, ParseErrorKind, ProcessResult, TreeBuilder, is_whitespace,
    split_leading_whitespace,
};

/// "clear the stack back to a table context"
const TABLE_CONTEXT: &[&str] = &["table", "template"];

/// "clear the stack back to a table body context"
const TABLE_BODY_CONTEXT: &[&str] = &["tbody", "tfoot", "thead", "template"];

/// "clear the stack back to a table row context"
const TABLE_ROW_CONTEXT: &[&str] = &["tr", "template"];

/// Nodes that send character tokens through "in table text".
const TEXT_BUFFERING_PARENTS: &[&str] = &["table", "tbody", "template", "tfoot", "thead", "tr"];

const TABLE_SECTIONS: &[&str] = &["tbody", "tfoot", "thead"];

/// Start tags that end a caption or a cell and are then reprocessed.
const CAPTION_CLOSERS: &[&str] = &[
    "caption", "col", "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr",
];

impl TreeBuilder {
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    pub(crate) fn step_in_table(&mut self, token: Token) -> ProcessResult {
        match token {
            // "A character token, if the current node is table, tbody,
            //  template, tfoot, thead, or tr element: Let the pending table
            //  character tokens be an empty list of tokens. Let the original
            //  insertion mode be the current insertion mode. Switch the
            //  insertion mode to "in table text" and reprocess the token."
            Token::Characters(_) if self.current_is_one_of(TEXT_BUFFERING_PARENTS) => {
                self.pending_table_text.clear();
                self.original_mode = self.mode;
                ProcessResult::Reprocess(InsertionMode::InTableText, token)
            }

            // "A comment token: Insert a comment."
            Token::Comment(data) => {
                self.insert_comment(&data);
                ProcessResult::Done
            }

            // "A DOCTYPE token: Parse error. Ignore the token."
            Token::Doctype(_) => self.ignore_unexpected(&token),

            // "A start tag whose tag name is "caption": Clear the stack back to
            //  a table context. Insert a marker at the end of the list of
            //  active formatting elements. Insert an HTML element for the
            //  token, then switch the insertion mode to "in caption"."
            Token::Tag(tag) if tag.is_start("caption") => {
                self.clear_stack_back_to(TABLE_CONTEXT);
                self.active_formatting.push_marker();
                let _ = self.insert_html_element(&tag);
                self.switch_to(InsertionMode::InCaption);
                ProcessResult::Done
            }

            // "A start tag whose tag name is "colgroup": Clear the stack back to
            //  a table context. Insert an HTML element for the token, then
            //  switch the insertion mode to "in column group"."
            Token::Tag(tag) if tag.is_start("colgroup") => {
                self.clear_stack_back_to(TABLE_CONTEXT);
                let _ = self.insert_html_element(&tag);
                self.switch_to(InsertionMode::InColumnGroup);
                ProcessResult::Done
            }

            // "A start tag whose tag name is "col": Clear the stack back to a
            //  table context. Insert an HTML element for a "colgroup" start tag
            //  token with no attributes, then switch the insertion mode to "in
            //  column group". Reprocess the current token."
            Token::Tag(tag) if tag.is_start("col") => {
                self.clear_stack_back_to(TABLE_CONTEXT);
                let _ = self.insert_html_element(&Tag::start("colgroup"));
                ProcessResult::Reprocess(InsertionMode::InColumnGroup, Token::Tag(tag))
            }

            // "A start tag whose tag name is one of: "tbody", "tfoot", "thead":
            //  Clear the stack back to a table context. Insert an HTML element
            //  for the token, then switch the insertion mode to "in table body"."
            Token::Tag(tag) if tag.is_start_of(TABLE_SECTIONS) => {
                self.clear_stack_back_to(TABLE_CONTEXT);
                let _ = self.insert_html_element(&tag);
                self.switch_to(InsertionMode::InTableBody);
                ProcessResult::Done
            }

            // "A start tag whose tag name is one of: "td", "th", "tr": Clear
            //  the stack back to a table context. Insert an HTML element for a
            //  "tbody" start tag token with no attributes, then switch the
            //  insertion mode to "in table body". Reprocess the current token."
            Token::Tag(tag) if tag.is_start_of(&["td", "th", "tr"]) => {
                self.clear_stack_back_to(TABLE_CONTEXT);
                let _ = self.insert_html_element(&Tag::start("tbody"));
                ProcessResult::Reprocess(InsertionMode::InTableBody, Token::Tag(tag))
            }

            // "A start tag whose tag name is "table": Parse error. If the stack
            //  of open elements does not have a table element in table scope,
            //  ignore the token. Otherwise: Pop elements from this stack until a
            //  table element has been popped from the stack. Reset the insertion
            //  mode appropriately. Reprocess the token."
            Token::Tag(tag) if tag.is_start("table") => {
                self.unexpected(&tag);
                if !self.in_scope("table", ScopeKind::Table) {
                    return ProcessResult::Done;
                }
                self.pop_until_named("table");
                self.reset_insertion_mode();
                ProcessResult::Reprocess(self.mode, Token::Tag(tag))
            }

            // "An end tag whose tag name is "table": If the stack of open
            //  elements does not have a table element in table scope, this is a
            //  parse error; ignore the token. Otherwise: Pop elements from this
            //  stack until a table element has been popped from the stack.
            //  Reset the insertion mode appropriately."
            Token::Tag(tag) if tag.is_end("table") => {
                if !self.in_scope("table", ScopeKind::Table) {
                    self.unexpected(&tag);
                    return ProcessResult::Done;
                }
                self.pop_until_named("table");
                self.reset_insertion_mode();
                ProcessResult::Done
            }

            // "An end tag whose tag name is one of: "body", "caption", "col",
            //  "colgroup", "html", "tbody", "td", "tfoot", "th", "thead", "tr":
            //  Parse error. Ignore the token."
            Token::Tag(tag)
                if tag.is_end_of(&[
                    "body", "caption", "col", "colgroup", "html", "tbody", "td", "tfoot", "th",
                    "thead", "tr",
                ]) =>
            {
                self.unexpected(&tag);
                ProcessResult::Done
            }

            // "A start tag whose tag name is one of: "style", "script",
            //  "template"; An end tag whose tag name is "template": Process the
            //  token using the rules for the "in head" insertion mode."
            Token::Tag(tag) if tag.is_start_of(&["style", "script", "template"]) || tag.is_end("template") => {
                self.step(InsertionMode::InHead, Token::Tag(tag))
            }

            // "A start tag whose tag name is "input": If the token does not have
            //  an attribute with the name "type", or if it does, but that
            //  attribute's value is not an ASCII case-insensitive match for the
            //  string "hidden", then: act as described in the "anything else"
            //  entry below. Otherwise: Parse error. Insert an HTML element for
            //  the token. Pop that input element off the stack of open elements.
            //  Acknowledge the token's self-closing flag, if it is set."
            Token::Tag(tag) if tag.is_start("input") && is_hidden_input(&tag) => {
                self.unexpected(&tag);
                let _ = self.insert_void_element(&tag);
                ProcessResult::DoneAckSelfClosing
            }

            // "A start tag whose tag name is "form": Parse error. If there is a
            //  template element on the stack of open elements, or if the form
            //  element pointer is not null, ignore the token. Otherwise: Insert
            //  an HTML element for the token, and set the form element pointer
            //  to point to the element created. Pop that form element off the
            //  stack of open elements."
            Token::Tag(tag) if tag.is_start("form") => {
                self.unexpected(&tag);
                if self.stack_has_template() || self.form_element.is_some() {
                    return ProcessResult::Done;
                }
                let form = self.insert_void_element(&tag);
                self.form_element = Some(form);
                ProcessResult::Done
            }

            // "An end-of-file token: Process the token using the rules for the
            //  "in body" insertion mode."
            Token::EndOfFile => self.step(InsertionMode::InBody, token),

            Token::ParseError(_) => ProcessResult::Done,
            token => self.in_table_anything_else(token),
        }
    }

    /// "Anything else: Parse error. Enable foster parenting, process the token
    /// using the rules for the "in body" insertion mode, and then disable
    /// foster parenting."
    fn in_table_anything_else(&mut self, token: Token) -> ProcessResult {
        self.unexpected_token(&token);
        self.foster_parenting = true;
        let result = self.step(InsertionMode::InBody, token);
        self.foster_parenting = false;
        result
    }

    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    pub(crate) fn step_in_table_text(&mut self, token: Token) -> ProcessResult {
        match token {
            // "A character token that is U+0000 NULL: Parse error. Ignore the
            //  token."
            // "Any other character token: Append the character token to the
            //  pending table character tokens list."
            Token::Characters(text) => {
                if text.contains('\0') {
                    self.error(ParseErrorKind::UnexpectedNullCharacter);
                    self.pending_table_text.extend(text.chars().filter(|&c| c != '\0'));
                } else {
                    self.pending_table_text.push_str(&text);
                }
                ProcessResult::Done
            }

            // "Anything else: If any of the tokens in the pending table
            //  character tokens list are character tokens that are not ASCII
            //  whitespace, then this is a parse error: reprocess the character
            //  tokens in the pending table character tokens list using the rules
            //  given in the "anything else" entry in the "in table" insertion
            //  mode. Otherwise, insert the characters given by the pending table
            //  character tokens list. Switch the insertion mode to the original
            //  insertion mode and reprocess the token."
            token => {
                let pending = std::mem::take(&mut self.pending_table_text);
                if pending.chars().any(|c| !is_whitespace(c)) {
                    self.error(ParseErrorKind::FosterParentedCharacters);
                    self.foster_parenting = true;
                    let _ = self.step(InsertionMode::InBody, Token::Characters(pending));
                    self.foster_parenting = false;
                } else {
                    self.insert_characters(&pending);
                }
                ProcessResult::Reprocess(self.original_mode, token)
            }
        }
    }

    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    pub(crate) fn step_in_caption(&mut self, token: Token) -> ProcessResult {
        match token {
            // "An end tag whose tag name is "caption""
            Token::Tag(tag) if tag.is_end("caption") => {
                let _ = self.close_caption(&tag);
                ProcessResult::Done
            }

            // "A start tag whose tag name is one of: "caption", "col",
            //  "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr"; An end
            //  tag whose tag name is "table": If the stack of open elements does
            //  not have a caption element in table scope, this is a parse error;
            //  ignore the token. (fragment case) Otherwise: Generate implied end
            //  tags. Now, if the current node is not a caption element, then
            //  this is a parse error. Pop elements from this stack until a
            //  caption element has been popped from the stack. Clear the list
            //  of active formatting elements up to the last marker. Switch the
            //  insertion mode to "in table". Reprocess the token."
            Token::Tag(tag) if tag.is_start_of(CAPTION_CLOSERS) || tag.is_end("table") => {
                if self.close_caption(&tag) {
                    return ProcessResult::Reprocess(InsertionMode::InTable, Token::Tag(tag));
                }
                ProcessResult::Done
            }

            // "An end tag whose tag name is one of: "body", "col", "colgroup",
            //  "html", "tbody", "td", "tfoot", "th", "thead", "tr": Parse error.
            //  Ignore the token."
            Token::Tag(tag)
                if tag.is_end_of(&[
                    "body", "col", "colgroup", "html", "tbody", "td", "tfoot", "th", "thead", "tr",
                ]) =>
            {
                self.unexpected(&tag);
                ProcessResult::Done
            }

            // "Anything else: Process the token using the rules for the "in
            //  body" insertion mode."
            token => self.step(InsertionMode::InBody, token),
        }
    }

    /// The caption closing steps. Returns false if there was no caption in
    /// table scope and the token was ignored.
    fn close_caption(&mut self, tag: &Tag) -> bool {
        if !self.in_scope("caption", ScopeKind::Table) {
            self.unexpected(tag);
            return false;
        }
        self.generate_implied_end_tags(None);
        if !self.current_is("caption") {
            self.error_with(ParseErrorKind::EndTagWithUnclosedElements, "caption");
        }
        self.pop_until_named("caption");
        self.active_formatting.clear_to_last_marker();
        self.switch_to(InsertionMode::InTable);
        true
    }

    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolgroup)
    pub(crate) fn step_in_column_group(&mut self, token: Token) -> ProcessResult {
        match token {
            // "A character token that is ... whitespace: Insert the character."
            Token::Characters(text) => {
                let (space, rest) = split_leading_whitespace(&text);
                self.insert_characters(space);
                if rest.is_empty() {
                    return ProcessResult::Done;
                }
                if self.current_is("colgroup") {
                    let _ = self.pop();
                    return ProcessResult::Reprocess(
                        InsertionMode::InTable,
                        Token::Characters(rest.to_string()),
                    );
                }
                // Without a colgroup to pop, every non-whitespace character is
                // ignored on its own and the whitespace between them still lands.
                self.error(ParseErrorKind::UnexpectedCharacters);
                let kept: String = rest.chars().filter(|&c| is_whitespace(c)).collect();
                self.insert_characters(&kept);
                ProcessResult::Done
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

            // "A start tag whose tag name is "col": Insert an HTML element for
            //  the token. Immediately pop the current node off the stack of open
            //  elements. Acknowledge the token's self-closing flag, if it is set."
            Token::Tag(tag) if tag.is_start("col") => {
                let _ = self.insert_void_element(&tag);
                ProcessResult::DoneAckSelfClosing
            }

            // "An end tag whose tag name is "colgroup": If the current node is
            //  not a colgroup element, then this is a parse error; ignore the
            //  token. Otherwise, pop the current node from the stack of open
            //  elements. Switch the insertion mode to "in table"."
            Token::Tag(tag) if tag.is_end("colgroup") => {
                if !self.current_is("colgroup") {
                    self.unexpected(&tag);
                    return ProcessResult::Done;
                }
                let _ = self.pop();
                self.switch_to(InsertionMode::InTable);
                ProcessResult::Done
            }

            // "An end tag whose tag name is "col": Parse error. Ignore the token."
            Token::Tag(tag) if tag.is_end("col") => {
                self.unexpected(&tag);
                ProcessResult::Done
            }

            // "A start tag whose tag name is "template"; An end tag whose tag
            //  name is "template": Process the token using the rules for the
            //  "in head" insertion mode."
            Token::Tag(tag) if tag.name == "template" => self.step(InsertionMode::InHead, Token::Tag(tag)),

            // "An end-of-file token: Process the token using the rules for the
            //  "in body" insertion mode."
            Token::EndOfFile => self.step(InsertionMode::InBody, token),

            Token::ParseError(_) => ProcessResult::Done,
            token => self.in_column_group_anything_else(token),
        }
    }

    /// "Anything else: If the current node is not a colgroup element, then
    /// this is a parse error; ignore the token. Otherwise, pop the current node
    /// from the stack of open elements. Switch the insertion mode to "in
    /// table". Reprocess the token."
    fn in_column_group_anything_else(&mut self, token: Token) -> ProcessResult {
        if !self.current_is("colgroup") {
            return self.ignore_unexpected(&token);
        }
        let _ = self.pop();
        ProcessResult::Reprocess(InsertionMode::InTable, token)
    }

    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intbody)
    pub(crate) fn step_in_table_body(&mut self, token: Token) -> ProcessResult {
        match token {
            // "A start tag whose tag name is "tr": Clear the stack back to a
            //  table body context. Insert an HTML element for the token, then
            //  switch the insertion mode to "in row"."
            Token::Tag(tag) if tag.is_start("tr") => {
                self.clear_stack_back_to(TABLE_BODY_CONTEXT);
                let _ = self.insert_html_element(&tag);
                self.switch_to(InsertionMode::InRow);
                ProcessResult::Done
            }

            // "A start tag whose tag name is one of: "th", "td": Parse error.
            //  Clear the stack back to a table body context. Insert an HTML
            //  element for a "tr" start tag token with no attributes, then
            //  switch the insertion mode to "in row". Reprocess the current
            //  token."
            Token::Tag(tag) if tag.is_start_of(&["th", "td"]) => {
                self.unexpected(&tag);
                self.clear_stack_back_to(TABLE_BODY_CONTEXT);
                let _ = self.insert_html_element(&Tag::start("tr"));
                ProcessResult::Reprocess(InsertionMode::InRow, Token::Tag(tag))
            }

            // "An end tag whose tag name is one of: "tbody", "tfoot", "thead":
            //  If the stack of open elements does not have an element in table
            //  scope that is an HTML element with the same tag name as the
            //  token, this is a parse error; ignore the token. Otherwise: Clear
            //  the stack back to a table body context. Pop the current node from
            //  the stack of open elements. Switch the insertion mode to "in
            //  table"."
            Token::Tag(tag) if tag.is_end_of(TABLE_SECTIONS) => {
                if !self.in_scope(&tag.name, ScopeKind::Table) {
                    self.unexpected(&tag);
                    return ProcessResult::Done;
                }
                self.clear_stack_back_to(TABLE_BODY_CONTEXT);
                let _ = self.pop();
                self.switch_to(InsertionMode::InTable);
                ProcessResult::Done
            }

            // "A start tag whose tag name is one of: "caption", "col",
            //  "colgroup", "tbody", "tfoot", "thead"; An end tag whose tag name
            //  is "table": If the stack of open elements does not have a tbody,
            //  thead, or tfoot element in table scope, this is a parse error;
            //  ignore the token. Otherwise: Clear the stack back to a table body
            //  context. Pop the current node from the stack of open elements.
            //  Switch the insertion mode to "in table". Reprocess the token."
            Token::Tag(tag)
                if tag.is_start_of(&["caption", "col", "colgroup", "tbody", "tfoot", "thead"])
                    || tag.is_end("table") =>
            {
                if !self.any_in_scope(TABLE_SECTIONS, ScopeKind::Table) {
                    self.unexpected(&tag);
                    return ProcessResult::Done;
                }
                self.clear_stack_back_to(TABLE_BODY_CONTEXT);
                let _ = self.pop();
                ProcessResult::Reprocess(InsertionMode::InTable, Token::Tag(tag))
            }

            // "An end tag whose tag name is one of: "body", "caption", "col",
            //  "colgroup", "html", "td", "th", "tr": Parse error. Ignore the
            //  token."
            Token::Tag(tag)
                if tag.is_end_of(&["body", "caption", "col", "colgroup", "html", "td", "th", "tr"]) =>
            {
                self.unexpected(&tag);
                ProcessResult::Done
            }

            // "Anything else: Process the token using the rules for the "in
            //  table" insertion mode."
            token => self.step(InsertionMode::InTable, token),
        }
    }

    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intr)
    pub(crate) fn step_in_row(&mut self, token: Token) -> ProcessResult {
        match token {
            // "A start tag whose tag name is one of: "th", "td": Clear the stack
            //  back to a table row context. Insert an HTML element for the
            //  token, then switch the insertion mode to "in cell". Insert a
            //  marker at the end of the list of active formatting elements."
            Token::Tag(tag) if tag.is_start_of(&["th", "td"]) => {
                self.clear_stack_back_to(TABLE_ROW_CONTEXT);
                let _ = self.insert_html_element(&tag);
                self.switch_to(InsertionMode::InCell);
                self.active_formatting.push_marker();
                ProcessResult::Done
            }

            // "An end tag whose tag name is "tr": If the stack of open elements
            //  does not have a tr element in table scope, this is a parse
            //  error; ignore the token. Otherwise: Clear the stack back to a
            //  table row context. Pop the current node (which will be a tr
            //  element) from the stack of open elements. Switch the insertion
            //  mode to "in table body"."
            Token::Tag(tag) if tag.is_end("tr") => {
                let _ = self.close_row(&tag);
                ProcessResult::Done
            }

            // "A start tag whose tag name is one of: "caption", "col",
            //  "colgroup", "tbody", "tfoot", "thead", "tr"; An end tag whose tag
            //  name is "table": If the stack of open elements does not have a tr
            //  element in table scope, this is a parse error; ignore the token.
            //  Otherwise: Clear the stack back to a table row context. Pop the
            //  current node (which will be a tr element) from the stack of open
            //  elements. Switch the insertion mode to "in table body".
            //  Reprocess the token."
            Token::Tag(tag)
                if tag.is_start_of(&["caption", "col", "colgroup", "tbody", "tfoot", "thead", "tr"])
                    || tag.is_end("table") =>
            {
                if self.close_row(&tag) {
                    return ProcessResult::Reprocess(InsertionMode::InTableBody, Token::Tag(tag));
                }
                ProcessResult::Done
            }

            // "An end tag whose tag name is one of: "tbody", "tfoot", "thead":
            //  If the stack of open elements does not have an element in table
            //  scope that is an HTML element with the same tag name as the
            //  token, this is a parse error; ignore the token. If the stack of
            //  open elements does not have a tr element in table scope, ignore
            //  the token. Otherwise: Clear the stack back to a table row
            //  context. Pop the current node (which will be a tr element) from
            //  the stack of open elements. Switch the insertion mode to "in
            //  table body". Reprocess the token."
            Token::Tag(tag) if tag.is_end_of(TABLE_SECTIONS) => {
                if !self.in_scope(&tag.name, ScopeKind::Table) {
                    self.unexpected(&tag);
                    return ProcessResult::Done;
                }
                if !self.in_scope("tr", ScopeKind::Table) {
                    return ProcessResult::Done;
                }
                self.clear_stack_back_to(TABLE_ROW_CONTEXT);
                let _ = self.pop();
                ProcessResult::Reprocess(InsertionMode::InTableBody, Token::Tag(tag))
            }

            // "An end tag whose tag name is one of: "body", "caption", "col",
            //  "colgroup", "html", "td", "th": Parse error. Ignore the token."
            Token::Tag(tag)
                if tag.is_end_of(&["body", "caption", "col", "colgroup", "html", "td", "th"]) =>
            {
                self.unexpected(&tag);
                ProcessResult::Done
            }

            // "Anything else: Process the token using the rules for the "in
            //  table" insertion mode."
            token => self.step(InsertionMode::InTable, token),
        }
    }

    /// The shared "close the row" steps. Returns false if there was no `tr` in
    /// table scope and the token was ignored.
    fn close_row(&mut self, tag: &Tag) -> bool {
        if !self.in_scope("tr", ScopeKind::Table) {
            self.unexpected(tag);
            return false;
        }
        self.clear_stack_back_to(TABLE_ROW_CONTEXT);
        let _ = self.pop();
        self.switch_to(InsertionMode::InTableBody);
        true
    }

    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intd)
    pub(crate) fn step_in_cell(&mut self, token: Token) -> ProcessResult {
        match token {
            // "An end tag whose tag name is one of: "td", "th": If the stack of
            //  open elements does not have an element in table scope that is an
            //  HTML element with the same tag name as that of the token, then
            //  this is a parse error; ignore the token. Otherwise: Generate
            //  implied end tags. Now, if the current node is not an HTML element
            //  with the same tag name as the token, then this is a parse error.
            //  Pop elements from the stack of open elements until an HTML
            //  element with the same tag name as the token has been popped from
            //  the stack. Clear the list of active formatting elements up to the
            //  last marker. Switch the insertion mode to "in row"."
            Token::Tag(tag) if tag.is_end_of(&["td", "th"]) => {
                if !self.in_scope(&tag.name, ScopeKind::Table) {
                    self.unexpected(&tag);
                    return ProcessResult::Done;
                }
                self.generate_implied_end_tags(None);
                if !self.current_is(&tag.name) {
                    self.error_with(ParseErrorKind::EndTagWithUnclosedElements, &tag.name);
                }
                self.pop_until_named(&tag.name);
                self.active_formatting.clear_to_last_marker();
                self.switch_to(InsertionMode::InRow);
                ProcessResult::Done
            }

            // "A start tag whose tag name is one of: "caption", "col",
            //  "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr": Assert:
            //  The stack of open elements has a td or th element in table scope.
            //  Close the cell (see below) and reprocess the token."
            Token::Tag(tag) if tag.is_start_of(CAPTION_CLOSERS) => {
                if !self.any_in_scope(&["td", "th"], ScopeKind::Table) {
                    self.unexpected(&tag);
                    return ProcessResult::Done;
                }
                self.close_cell();
                ProcessResult::Reprocess(InsertionMode::InRow, Token::Tag(tag))
            }

            // "An end tag whose tag name is one of: "body", "caption", "col",
            //  "colgroup", "html": Parse error. Ignore the token."
            Token::Tag(tag) if tag.is_end_of(&["body", "caption", "col", "colgroup", "html"]) => {
                self.unexpected(&tag);
                ProcessResult::Done
            }

            // "An end tag whose tag name is one of: "table", "tbody", "tfoot",
            //  "thead", "tr": If the stack of open elements does not have an
            //  element in table scope that is an HTML element with the same tag
            //  name as that of the token, then this is a parse error; ignore the
            //  token. Otherwise, close the cell (see below) and reprocess the
            //  token."
            Token::Tag(tag) if tag.is_end_of(&["table", "tbody", "tfoot", "thead", "tr"]) => {
                if !self.in_scope(&tag.name, ScopeKind::Table) {
                    self.unexpected(&tag);
                    return ProcessResult::Done;
                }
                self.close_cell();
                ProcessResult::Reprocess(InsertionMode::InRow, Token::Tag(tag))
            }

            // "Anything else: Process the token using the rules for the "in
            //  body" insertion mode."
            token => self.step(InsertionMode::InBody, token),
        }
    }

    /// "Where the steps above say to close the cell, they mean to run the
    /// following algorithm: Generate implied end tags. If the current node is
    /// not now a td element or a th element, then this is a parse error. Pop
    /// elements from the stack of open elements until a td element or a th
    /// element has been popped from the stack. Clear the list of active
    /// formatting elements up to the last marker. Switch the insertion mode to
    /// "in row"."
    fn close_cell(&mut self) {
        self.generate_implied_end_tags(None);
        if !self.current_is_one_of(&["td", "th"]) {
            self.error(ParseErrorKind::EndTagWithUnclosedElements);
        }
        self.pop_until_one_of(&["td", "th"]);
        self.active_formatting.clear_to_last_marker();
        self.switch_to(InsertionMode::InRow);
    }
}

#[cfg(test)]
mod tests {
    use wombat_dom::{NodeId, dump};

    use crate::opts::ParseOpts;
    use crate::tokenizer::{Tag, Token};
    use crate::tree_builder::{InsertionMode, ParseErrorKind, TreeBuilder};

    fn build(tokens: Vec<Token>) -> TreeBuilder {
        let mut builder = TreeBuilder::new(ParseOpts::default().with_iframe_srcdoc());
        for token in tokens {
            let _ = builder.process_token(token);
        }
        builder
    }

    fn finish(tokens: Vec<Token>) -> (String, TreeBuilder) {
        let mut builder = build(tokens);
        let _ = builder.process_token(Token::EndOfFile);
        (dump(builder.tree(), NodeId::ROOT), builder)
    }

    #[test]
    fn text_in_a_table_is_foster_parented() {
        let (tree, builder) = finish(vec![
            Token::start_tag("table"),
            Token::characters("x"),
            Token::start_tag("tr"),
            Token::start_tag("td"),
            Token::characters("y"),
        ]);
        let expected = "\
| <html>
|   <head>
|   <body>
|     \"x\"
|     <table>
|       <tbody>
|         <tr>
|           <td>
|             \"y\"
";
        assert_eq!(tree, expected);
        assert!(builder
            .errors()
            .iter()
            .any(|e| e.kind == ParseErrorKind::FosterParentedCharacters));
    }

    #[test]
    fn whitespace_in_a_table_stays_in_place() {
        let (tree, builder) = finish(vec![
            Token::start_tag("table"),
            Token::characters(" \n"),
            Token::start_tag("tr"),
        ]);
        let expected = "\
| <html>
|   <head>
|   <body>
|     <table>
|       \" \n\"
|       <tbody>
|         <tr>
";
        assert_eq!(tree, expected);
        assert!(!builder
            .errors()
            .iter()
            .any(|e| e.kind == ParseErrorKind::FosterParentedCharacters));
    }

    #[test]
    fn misplaced_element_is_moved_before_the_table() {
        let (tree, _) = finish(vec![
            Token::start_tag("table"),
            Token::start_tag("div"),
            Token::characters("a"),
        ]);
        let expected = "\
| <html>
|   <head>
|   <body>
|     <div>
|       \"a\"
|     <table>
";
        assert_eq!(tree, expected);
    }

    #[test]
    fn col_gets_an_implied_colgroup() {
        let (tree, _) = finish(vec![Token::start_tag("table"), Token::start_tag("col")]);
        assert!(tree.ends_with("|     <table>\n|       <colgroup>\n|         <col>\n"));
    }

    #[test]
    fn nested_table_closes_the_outer_one() {
        let (tree, _) = finish(vec![Token::start_tag("table"), Token::start_tag("table")]);
        assert!(tree.ends_with("|   <body>\n|     <table>\n|     <table>\n"));
    }

    #[test]
    fn hidden_input_stays_inside_the_table() {
        let (tree, _) = finish(vec![
            Token::start_tag("table"),
            Token::Tag(Tag::start("input").with_attr("type", "hidden")),
        ]);
        assert!(tree.ends_with("|     <table>\n|       <input>\n|         type=\"hidden\"\n"));
    }

    #[test]
    fn cell_start_tag_closes_the_open_cell() {
        let builder = build(vec![
            Token::start_tag("table"),
            Token::start_tag("td"),
            Token::start_tag("td"),
        ]);
        assert_eq!(builder.mode(), InsertionMode::InCell);
        let (tree, _) = finish(vec![
            Token::start_tag("table"),
            Token::start_tag("td"),
            Token::characters("1"),
            Token::start_tag("td"),
            Token::characters("2"),
        ]);
        assert!(tree.ends_with("|           <td>\n|             \"1\"\n|           <td>\n|             \"2\"\n"));
    }

    #[test]
    fn caption_is_closed_by_a_row() {
        let builder = build(vec![
            Token::start_tag("table"),
            Token::start_tag("caption"),
            Token::characters("c"),
            Token::start_tag("tr"),
        ]);
        assert_eq!(builder.mode(), InsertionMode::InRow);
    }

    fn colgroup_fragment(tokens: Vec<Token>) -> String {
        let context = crate::tree_builder::FragmentContext::html("colgroup");
        let mut builder = TreeBuilder::new_for_fragment(&context, ParseOpts::default());
        for token in tokens {
            let _ = builder.process_token(token);
        }
        let _ = builder.process_token(Token::EndOfFile);
        let html = builder.tree().document_element().expect("fragment root");
        dump(builder.tree(), html)
    }

    #[test]
    fn column_group_fragment_keeps_inner_whitespace() {
        let whole = colgroup_fragment(vec![Token::characters("y z")]);
        let split = colgroup_fragment(vec![
            Token::characters("y"),
            Token::characters(" "),
            Token::characters("z"),
        ]);
        assert_eq!(whole, "| \" \"\n");
        assert_eq!(whole, split);
    }

    #[test]
    fn text_after_colgroup_goes_back_to_the_table() {
        let (tree, _) = finish(vec![
            Token::start_tag("table"),
            Token::start_tag("colgroup"),
            Token::characters(" x"),
        ]);
        let expected = "\
| <html>
|   <head>
|   <body>
|     \"x\"
|     <table>
|       <colgroup>
|         \" \"
";
        assert_eq!(tree, expected);
    }
}
