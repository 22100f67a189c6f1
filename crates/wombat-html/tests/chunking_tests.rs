//! The tree must not depend on how character data is chunked: a run fed as
//! one token and the same run fed one character at a time build the same
//! tree.

use rstest::rstest;
use wombat_html::{
    FragmentContext, ParseOpts, Token, TokenSinkResult, Tokenizer, TreeBuilder,
};

/// Tokenize `input` and build it, optionally splitting every character token
/// into one token per character. Returns the dump of the document, or of the
/// fragment root's children when `context` is given.
fn build(input: &str, context: Option<&str>, split: bool) -> String {
    wombat_common::logging::init_for_tests();

    let mut tokenizer = Tokenizer::new(input);
    let mut builder = match context {
        Some(context) => {
            let context: FragmentContext = context.parse().expect("valid fragment context");
            tokenizer.set_lexical_mode(context.lexical_mode(false));
            tokenizer.set_last_start_tag_name(&context.name);
            TreeBuilder::new_for_fragment(&context, ParseOpts::default())
        }
        None => TreeBuilder::new(ParseOpts::default()),
    };
    tokenizer.set_cdata_allowed(builder.is_cdata_allowed());

    while let Some(token) = tokenizer.next_token() {
        let tokens = match token {
            Token::Characters(text) if split => text.chars().map(|c| Token::Characters(c.to_string())).collect(),
            token => vec![token],
        };
        for token in tokens {
            if let TokenSinkResult::SwitchTo(mode) = builder.process_token(token) {
                tokenizer.set_lexical_mode(mode);
            }
        }
        tokenizer.set_cdata_allowed(builder.is_cdata_allowed());
    }

    let tree = builder.tree();
    let root = match context {
        Some(_) => tree.document_element().expect("fragment root"),
        None => wombat_dom::NodeId::ROOT,
    };
    wombat_dom::dump(tree, root)
}

#[rstest]
#[case::document_body(None, "<p>a b</p>  c <b> d</b>")]
#[case::document_before_head(None, " x <title>a b</title> y")]
#[case::document_head_whitespace(None, "<html> <head> x</head> <body>")]
#[case::document_table_text(None, "<table> x <tr> y z</table>")]
#[case::document_column_group(None, "<table><colgroup> x y <col> z")]
#[case::document_frameset(None, "<frameset> a b </frameset> c <noframes> d </noframes> e ")]
#[case::document_after_body(None, "<body>a</body> b c </html> d ")]
#[case::document_select(None, "<select> a <option> b c</select>")]
#[case::document_foreign(None, "<svg> a <desc> b </desc> c</svg>")]
#[case::document_leading_newline(None, "<pre>\n\nx</pre><textarea>\ny</textarea>")]
#[case::colgroup_text(Some("colgroup"), "y z")]
#[case::colgroup_after_col(Some("colgroup"), " a <col> b c ")]
#[case::template_after_col(Some("template"), "<col> x y <col> z")]
#[case::template_rows(Some("template"), "<tr> a b <td> c")]
#[case::table_text(Some("table"), " x <tr> y ")]
#[case::table_cells(Some("table"), "a b<td>c d")]
fn character_chunking_does_not_change_the_tree(#[case] context: Option<&str>, #[case] input: &str) {
    let whole = build(input, context, false);
    let split = build(input, context, true);
    assert_eq!(whole, split, "input {input:?} in {context:?}");
}

#[test]
fn split_column_group_fragment_keeps_whitespace() {
    assert_eq!(build("y z", Some("colgroup"), true), "| \" \"\n");
    assert_eq!(build("y z", Some("colgroup"), false), "| \" \"\n");
}
