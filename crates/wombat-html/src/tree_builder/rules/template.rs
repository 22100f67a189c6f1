//! [§ 13.2.6.4.18 The "in template" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)

use crate::tokenizer::{TagKind, Token};
use crate::tree_builder::{InsertionMode, ParseErrorKind, ProcessResult, TreeBuilder};

/// Start tags "in template" hands to the "in head" rules.
const HEAD_CONTENT: &[&str] = &[
    "base", "basefont", "bgsound", "link", "meta", "noframes", "script", "style", "template",
    "title",
];

impl TreeBuilder {
    /// The "in template" rules. Table parts replace the current template
    /// insertion mode with the table mode that accepts them.
    pub(crate) fn step_in_template(&mut self, token: Token) -> ProcessResult {
        match token {
            // "A character token; A comment token; A DOCTYPE token: Process the
            //  token using the rules for the "in body" insertion mode."
            Token::Characters(_) | Token::Comment(_) | Token::Doctype(_) => {
                self.step(InsertionMode::InBody, token)
            }

            // "A start tag whose tag name is one of: "base", "basefont",
            //  "bgsound", "link", "meta", "noframes", "script", "style",
            //  "template", "title"; An end tag whose tag name is "template":
            //  Process the token using the rules for the "in head" insertion
            //  mode."
            Token::Tag(tag) if tag.is_start_of(HEAD_CONTENT) || tag.is_end("template") => {
                self.step(InsertionMode::InHead, Token::Tag(tag))
            }

            Token::Tag(tag) if tag.kind == TagKind::Start => {
                // "A start tag whose tag name is one of: "caption", "colgroup",
                //  "tbody", "tfoot", "thead": ... Push "in table" ..."
                // "A start tag whose tag name is "col": ... Push "in column
                //  group" ..."
                // "A start tag whose tag name is "tr": ... Push "in table body" ..."
                // "A start tag whose tag name is one of: "td", "th": ... Push
                //  "in row" ..."
                // "Any other start tag: ... Push "in body" ..."
                //
                // Each: "Pop the current template insertion mode off the stack
                // of template insertion modes. Push <mode> onto the stack of
                // template insertion modes so that it is the new current
                // template insertion mode. Switch the insertion mode to <mode>,
                // and reprocess the token."
                let mode = match tag.name.as_str() {
                    "caption" | "colgroup" | "tbody" | "tfoot" | "thead" => InsertionMode::InTable,
                    "col" => InsertionMode::InColumnGroup,
                    "tr" => InsertionMode::InTableBody,
                    "td" | "th" => InsertionMode::InRow,
                    _ => InsertionMode::InBody,
                };
                let _ = self.template_modes.pop();
                self.template_modes.push(mode);
                ProcessResult::Reprocess(mode, Token::Tag(tag))
            }

            // "Any other end tag: Parse error. Ignore the token."
            Token::Tag(tag) => {
                self.unexpected(&tag);
                ProcessResult::Done
            }

            // "An end-of-file token"
            Token::EndOfFile => {
                // "If there is no template element on the stack of open
                //  elements, then stop parsing. (fragment case)"
                if !self.stack_has_template() {
                    return self.stop_parsing();
                }
                // "Otherwise, this is a parse error. Pop elements from the stack
                //  of open elements until a template element has been popped
                //  from the stack. Clear the list of active formatting elements
                //  up to the last marker. Pop the current template insertion
                //  mode off the stack of template insertion modes. Reset the
                //  insertion mode appropriately. Reprocess the token."
                self.error(ParseErrorKind::UnexpectedEof);
                self.pop_until_named("template");
                self.active_formatting.clear_to_last_marker();
                let _ = self.template_modes.pop();
                self.reset_insertion_mode();
                ProcessResult::Reprocess(self.mode, token)
            }

            Token::ParseError(_) => ProcessResult::Done,
        }
    }
}

#[cfg(test)]
mod tests {
    use wombat_dom::{NodeId, dump};

    use crate::opts::ParseOpts;
    use crate::tokenizer::Token;
    use crate::tree_builder::{ParseErrorKind, TreeBuilder};

    fn finish(tokens: Vec<Token>) -> (String, TreeBuilder) {
        let mut builder = TreeBuilder::new(ParseOpts::default().with_iframe_srcdoc());
        for token in tokens {
            let _ = builder.process_token(token);
        }
        let _ = builder.process_token(Token::EndOfFile);
        (dump(builder.tree(), NodeId::ROOT), builder)
    }

    #[test]
    fn table_row_parses_inside_template_contents() {
        let (tree, _) = finish(vec![
            Token::start_tag("template"),
            Token::start_tag("tr"),
            Token::start_tag("td"),
            Token::characters("x"),
            Token::end_tag("template"),
        ]);
        let expected = "\
| <html>
|   <head>
|     <template>
|       content
|         <tr>
|           <td>
|             \"x\"
|   <body>
";
        assert_eq!(tree, expected);
    }

    #[test]
    fn unclosed_template_is_closed_at_eof() {
        let (tree, builder) = finish(vec![
            Token::start_tag("body"),
            Token::start_tag("template"),
            Token::start_tag("div"),
        ]);
        assert!(tree.ends_with("|     <template>\n|       content\n|         <div>\n"));
        assert!(builder.is_stopped());
        assert!(builder
            .errors()
            .iter()
            .any(|e| e.kind == ParseErrorKind::UnexpectedEof));
    }

    #[test]
    fn stray_end_tag_in_template_is_ignored() {
        let (tree, builder) = finish(vec![
            Token::start_tag("template"),
            Token::end_tag("div"),
            Token::end_tag("template"),
        ]);
        assert!(tree.contains("|     <template>\n|       content\n|   <body>\n"));
        assert_eq!(builder.errors()[0].kind, ParseErrorKind::UnexpectedEndTag);
    }
}
