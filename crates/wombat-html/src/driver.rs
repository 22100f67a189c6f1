//! Entry points that run the tokenizer and the tree builder together.
//!
//! The tree builder never reads input itself. The driver pulls one token at a
//! time, feeds it to the builder and applies whatever lexical mode switch the
//! builder asks for before pulling the next one.

use log::debug;
use wombat_dom::{DomTree, Namespace, NodeId, NodeType, QuirksMode};

use crate::opts::ParseOpts;
use crate::tokenizer::{Token, Tokenizer};
use crate::tree_builder::{FragmentContext, ParseError, TokenSinkResult, TreeBuilder};

/// The result of a parse.
#[derive(Debug)]
pub struct ParsedDocument {
    /// The arena holding every node the parse created.
    pub tree: DomTree,
    /// The Document node, or the `#document-fragment` node for fragments.
    pub root: NodeId,
    /// Parse errors in the order they were recorded.
    pub errors: Vec<ParseError>,
    /// The document's quirks mode.
    pub quirks_mode: QuirksMode,
}

impl ParsedDocument {
    /// The html5lib test-format rendering of everything under [`Self::root`].
    #[must_use]
    pub fn dump(&self) -> String {
        wombat_dom::dump(&self.tree, self.root)
    }
}

/// Feed the tokenizer's output to `builder` until end of file.
fn run(tokenizer: &mut Tokenizer, builder: &mut TreeBuilder) {
    while let Some(token) = tokenizer.next_token() {
        if let TokenSinkResult::SwitchTo(mode) = builder.process_token(token) {
            tokenizer.set_lexical_mode(mode);
        }
        tokenizer.set_cdata_allowed(builder.is_cdata_allowed());
    }
}

/// [§ 13.2 Parsing HTML documents](https://html.spec.whatwg.org/multipage/parsing.html#parsing)
///
/// Parse a complete document.
#[must_use]
pub fn parse_document(input: &str, opts: ParseOpts) -> ParsedDocument {
    let mut tokenizer = Tokenizer::new(input);
    let mut builder = TreeBuilder::new(opts);
    run(&mut tokenizer, &mut builder);
    finish_document(builder)
}

/// Parse a pre-built token stream as a document. An end-of-file token is
/// appended if the stream does not end with one.
#[must_use]
pub fn parse_tokens<I>(tokens: I, opts: ParseOpts) -> ParsedDocument
where
    I: IntoIterator<Item = Token>,
{
    let mut builder = TreeBuilder::new(opts);
    for token in tokens {
        // Lexical mode requests have no tokenizer to go to.
        let _ = builder.process_token(token);
    }
    if !builder.is_stopped() {
        let _ = builder.process_token(Token::EndOfFile);
    }
    finish_document(builder)
}

fn finish_document(builder: TreeBuilder) -> ParsedDocument {
    let quirks_mode = builder.quirks_mode();
    let (tree, errors) = builder.finish();
    debug!(target: "wombat::tree_builder", "document parsed with {} errors", errors.len());
    ParsedDocument {
        tree,
        root: NodeId::ROOT,
        errors,
        quirks_mode,
    }
}

/// [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
///
/// Parse `input` as the contents of `context`. The returned root is a
/// `#document-fragment` node holding what the algorithm's `html` root
/// collected.
#[must_use]
pub fn parse_fragment(input: &str, context: &FragmentContext, opts: ParseOpts) -> ParsedDocument {
    let scripting = opts.scripting_enabled;
    let mut tokenizer = Tokenizer::new(input);
    let mut builder = TreeBuilder::new_for_fragment(context, opts);

    // STEP 8: "Set the state of the HTML parser's tokenization stage" from
    //         the context element.
    tokenizer.set_lexical_mode(context.lexical_mode(scripting));
    if context.namespace == Namespace::Html {
        tokenizer.set_last_start_tag_name(&context.name);
    }
    tokenizer.set_cdata_allowed(builder.is_cdata_allowed());

    run(&mut tokenizer, &mut builder);

    let quirks_mode = builder.quirks_mode();
    let (mut tree, errors) = builder.finish();

    // STEP 14: "Return root's children, in tree order."
    let fragment = tree.alloc(NodeType::DocumentFragment);
    if let Some(html) = tree.document_element() {
        tree.move_children(html, fragment);
    }
    debug!(target: "wombat::tree_builder", "fragment in {} parsed with {} errors", context.name, errors.len());

    ParsedDocument {
        tree,
        root: fragment,
        errors,
        quirks_mode,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree_builder::ParseErrorKind;

    #[test]
    fn title_text_is_not_markup() {
        let doc = parse_document("<title><b>x</b></title>", ParseOpts::default());
        assert!(doc.dump().contains("|     <title>\n|       \"<b>x</b>\"\n"));
    }

    #[test]
    fn cdata_is_text_inside_svg() {
        let doc = parse_document("<!DOCTYPE html><svg><![CDATA[a<b]]></svg>", ParseOpts::default());
        assert!(doc.dump().contains("|     <svg svg>\n|       \"a<b\"\n"));
    }

    #[test]
    fn fragment_children_hang_off_a_fragment_node() {
        let doc = parse_fragment("<td>x", &FragmentContext::html("tr"), ParseOpts::default());
        assert!(matches!(
            doc.tree.get(doc.root).map(|n| &n.node_type),
            Some(NodeType::DocumentFragment)
        ));
        assert_eq!(doc.dump(), "| <td>\n|   \"x\"\n");
    }

    #[test]
    fn rcdata_context_reads_markup_as_text() {
        let doc = parse_fragment("<b>&amp;</b>", &FragmentContext::html("textarea"), ParseOpts::default());
        assert_eq!(doc.dump(), "| \"<b>&</b>\"\n");
    }

    #[test]
    fn token_streams_get_an_implied_eof() {
        let doc = parse_tokens(vec![Token::start_tag("p")], ParseOpts::default());
        assert_eq!(doc.dump(), "| <html>\n|   <head>\n|   <body>\n|     <p>\n");
        assert_eq!(doc.errors[0].kind, ParseErrorKind::MissingDoctype);
        assert_eq!(doc.quirks_mode, QuirksMode::Quirks);
    }
}
