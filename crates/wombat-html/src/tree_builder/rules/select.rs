//! The "in select" and "in select in table" insertion modes.

use crate::tokenizer::{TagKind, Token};
use crate::tree_builder::stack::ScopeKind;
use crate::tree_builder::{InsertionMode, ParseErrorKind, ProcessResult, TreeBuilder};

/// Table structure tags that close a select inside a table.
const TABLE_STRUCTURE: &[&str] = &["caption", "table", "tbody", "tfoot", "thead", "tr", "td", "th"];

impl TreeBuilder {
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    pub(crate) fn step_in_select(&mut self, token: Token) -> ProcessResult {
        match token {
            // "A character token that is U+0000 NULL: Parse error. Ignore the
            //  token. Any other character token: Insert the token's character."
            Token::Characters(text) => {
                if text.contains('\0') {
                    self.error(ParseErrorKind::UnexpectedNullCharacter);
                    self.insert_characters(&text.replace('\0', ""));
                } else {
                    self.insert_characters(&text);
                }
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

            // "A start tag whose tag name is "option": If the current node is
            //  an option element, pop that node from the stack of open
            //  elements. Insert an HTML element for the token."
            Token::Tag(tag) if tag.is_start("option") => {
                if self.current_is("option") {
                    let _ = self.pop();
                }
                let _ = self.insert_html_element(&tag);
                ProcessResult::Done
            }

            // "A start tag whose tag name is "optgroup": If the current node is
            //  an option element, pop that node from the stack of open
            //  elements. If the current node is an optgroup element, pop that
            //  node from the stack of open elements. Insert an HTML element for
            //  the token."
            // "A start tag whose tag name is "hr"": the same, then pop the hr
            // straight away and acknowledge the self-closing flag.
            Token::Tag(tag) if tag.is_start_of(&["optgroup", "hr"]) => {
                if self.current_is("option") {
                    let _ = self.pop();
                }
                if self.current_is("optgroup") {
                    let _ = self.pop();
                }
                if tag.name == "hr" {
                    let _ = self.insert_void_element(&tag);
                    return ProcessResult::DoneAckSelfClosing;
                }
                let _ = self.insert_html_element(&tag);
                ProcessResult::Done
            }

            // "An end tag whose tag name is "optgroup": First, if the current
            //  node is an option element, and the node immediately before it in
            //  the stack of open elements is an optgroup element, then pop the
            //  current node from the stack of open elements. If the current
            //  node is an optgroup element, then pop that node from the stack of
            //  open elements. Otherwise, this is a parse error; ignore the
            //  token."
            Token::Tag(tag) if tag.is_end("optgroup") => {
                let depth = self.open_elements.len();
                let parent_is_optgroup = depth
                    .checked_sub(2)
                    .and_then(|index| self.open_elements.get(index))
                    .is_some_and(|node| self.is_html_element(node, "optgroup"));
                if self.current_is("option") && parent_is_optgroup {
                    let _ = self.pop();
                }
                if self.current_is("optgroup") {
                    let _ = self.pop();
                } else {
                    self.unexpected(&tag);
                }
                ProcessResult::Done
            }

            // "An end tag whose tag name is "option": If the current node is an
            //  option element, then pop that node from the stack of open
            //  elements. Otherwise, this is a parse error; ignore the token."
            Token::Tag(tag) if tag.is_end("option") => {
                if self.current_is("option") {
                    let _ = self.pop();
                } else {
                    self.unexpected(&tag);
                }
                ProcessResult::Done
            }

            // "An end tag whose tag name is "select": If the stack of open
            //  elements does not have a select element in select scope, this is
            //  a parse error; ignore the token. (fragment case) Otherwise: Pop
            //  elements from the stack of open elements until a select element
            //  has been popped from the stack. Reset the insertion mode
            //  appropriately."
            // "A start tag whose tag name is "select": Parse error. If the
            //  stack of open elements does not have a select element in select
            //  scope, ignore the token. (fragment case) Otherwise: Pop elements
            //  from the stack of open elements until a select element has been
            //  popped from the stack. Reset the insertion mode appropriately."
            //  The nested start tag itself is dropped.
            Token::Tag(tag) if tag.name == "select" => {
                if tag.kind == TagKind::Start {
                    self.unexpected(&tag);
                }
                if !self.close_select() && tag.kind == TagKind::End {
                    self.unexpected(&tag);
                }
                ProcessResult::Done
            }

            // "A start tag whose tag name is one of: "input", "keygen",
            //  "textarea": Parse error. If the stack of open elements does not
            //  have a select element in select scope, ignore the token.
            //  (fragment case) Otherwise: Pop elements from the stack of open
            //  elements until a select element has been popped from the stack.
            //  Reset the insertion mode appropriately. Reprocess the token."
            Token::Tag(tag) if tag.is_start_of(&["input", "keygen", "textarea"]) => {
                self.unexpected(&tag);
                if self.close_select() {
                    return ProcessResult::Reprocess(self.mode, Token::Tag(tag));
                }
                ProcessResult::Done
            }

            // "A start tag whose tag name is one of: "script", "template"; An
            //  end tag whose tag name is "template": Process the token using
            //  the rules for the "in head" insertion mode."
            Token::Tag(tag) if tag.is_start_of(&["script", "template"]) || tag.is_end("template") => {
                self.step(InsertionMode::InHead, Token::Tag(tag))
            }

            // "An end-of-file token: Process the token using the rules for the
            //  "in body" insertion mode."
            Token::EndOfFile => self.step(InsertionMode::InBody, token),

            Token::ParseError(_) => ProcessResult::Done,

            // "Anything else: Parse error. Ignore the token."
            Token::Tag(_) => self.ignore_unexpected(&token),
        }
    }

    /// Pop through the open `select` and reset the insertion mode. Returns
    /// false when no select is in select scope (fragment case).
    fn close_select(&mut self) -> bool {
        if !self.in_scope("select", ScopeKind::Select) {
            return false;
        }
        self.pop_until_named("select");
        self.reset_insertion_mode();
        true
    }

    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    pub(crate) fn step_in_select_in_table(&mut self, token: Token) -> ProcessResult {
        match token {
            // "A start tag whose tag name is one of: "caption", "table",
            //  "tbody", "tfoot", "thead", "tr", "td", "th": Parse error. Pop
            //  elements from the stack of open elements until a select element
            //  has been popped from the stack. Reset the insertion mode
            //  appropriately. Reprocess the token."
            Token::Tag(tag) if tag.is_start_of(TABLE_STRUCTURE) => {
                self.unexpected(&tag);
                self.pop_until_named("select");
                self.reset_insertion_mode();
                ProcessResult::Reprocess(self.mode, Token::Tag(tag))
            }

            // "An end tag whose tag name is one of: "caption", "table",
            //  "tbody", "tfoot", "thead", "tr", "td", "th": Parse error. If the
            //  stack of open elements does not have an element in table scope
            //  that is an HTML element with the same tag name as that of the
            //  token, then ignore the token. Otherwise: Pop elements from the
            //  stack of open elements until a select element has been popped
            //  from the stack. Reset the insertion mode appropriately.
            //  Reprocess the token."
            Token::Tag(tag) if tag.is_end_of(TABLE_STRUCTURE) => {
                self.unexpected(&tag);
                if !self.in_scope(&tag.name, ScopeKind::Table) {
                    return ProcessResult::Done;
                }
                self.pop_until_named("select");
                self.reset_insertion_mode();
                ProcessResult::Reprocess(self.mode, Token::Tag(tag))
            }

            // "Anything else: Process the token using the rules for the "in
            //  select" insertion mode."
            token => self.step(InsertionMode::InSelect, token),
        }
    }
}

#[cfg(test)]
mod tests {
    use wombat_dom::{NodeId, dump};

    use crate::opts::ParseOpts;
    use crate::tokenizer::Token;
    use crate::tree_builder::{InsertionMode, TreeBuilder};

    fn build(tokens: Vec<Token>) -> TreeBuilder {
        let mut builder = TreeBuilder::new(ParseOpts::default().with_iframe_srcdoc());
        for token in tokens {
            let _ = builder.process_token(token);
        }
        builder
    }

    #[test]
    fn options_close_each_other() {
        let mut builder = build(vec![
            Token::start_tag("select"),
            Token::start_tag("option"),
            Token::characters("a"),
            Token::start_tag("option"),
            Token::characters("b"),
            Token::start_tag("div"),
        ]);
        let _ = builder.process_token(Token::EndOfFile);
        let expected = "\
| <html>
|   <head>
|   <body>
|     <select>
|       <option>
|         \"a\"
|       <option>
|         \"b\"
";
        assert_eq!(dump(builder.tree(), NodeId::ROOT), expected);
    }

    #[test]
    fn nested_select_closes_the_outer_one() {
        let mut builder = build(vec![
            Token::start_tag("select"),
            Token::start_tag("option"),
            Token::characters("A"),
            Token::start_tag("select"),
            Token::start_tag("option"),
            Token::characters("B"),
        ]);
        assert_eq!(builder.mode(), InsertionMode::InBody);
        let _ = builder.process_token(Token::EndOfFile);
        let expected = "\
| <html>
|   <head>
|   <body>
|     <select>
|       <option>
|         \"A\"
|     <option>
|       \"B\"
";
        assert_eq!(dump(builder.tree(), NodeId::ROOT), expected);
    }

    #[test]
    fn input_closes_the_select_and_is_reprocessed() {
        let mut builder = build(vec![Token::start_tag("select"), Token::start_tag("input")]);
        let _ = builder.process_token(Token::EndOfFile);
        assert!(dump(builder.tree(), NodeId::ROOT).ends_with("|     <select>\n|     <input>\n"));
    }

    #[test]
    fn table_cell_tag_escapes_a_select_in_a_table() {
        let builder = build(vec![
            Token::start_tag("table"),
            Token::start_tag("tr"),
            Token::start_tag("td"),
            Token::start_tag("select"),
            Token::start_tag("td"),
        ]);
        assert_eq!(builder.mode(), InsertionMode::InCell);
    }

    #[test]
    fn select_inside_a_cell_uses_the_table_variant() {
        let builder = build(vec![
            Token::start_tag("table"),
            Token::start_tag("tr"),
            Token::start_tag("td"),
            Token::start_tag("select"),
        ]);
        assert_eq!(builder.mode(), InsertionMode::InSelectInTable);
    }
}
