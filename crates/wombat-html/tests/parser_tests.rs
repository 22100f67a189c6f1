//! Integration tests for the HTML parser.

use rstest::rstest;
use wombat_dom::{NodeType, QuirksMode};
use wombat_html::{FragmentContext, ParseErrorKind, ParseOpts, ParsedDocument, parse_document, parse_fragment};

/// Helper to parse a document with default options
fn parse(html: &str) -> ParsedDocument {
    wombat_common::logging::init_for_tests();
    parse_document(html, ParseOpts::default())
}

/// Helper to parse and render the html5lib dump
fn dump(html: &str) -> String {
    parse(html).dump()
}

#[test]
fn test_misnested_formatting_is_reconstructed_after_paragraph() {
    let expected = "\
| <html>
|   <head>
|   <body>
|     <p>
|       \"1\"
|       <b>
|         \"2\"
|         <i>
|           \"3\"
|     <b>
|       <i>
|         \"4\"
";
    assert_eq!(dump("<p>1<b>2<i>3</p>4"), expected);
}

#[test]
fn test_anchor_is_cloned_into_the_block() {
    let expected = "\
| <html>
|   <head>
|   <body>
|     <a>
|       href=\"x\"
|       \"1\"
|     <div>
|       <a>
|         href=\"x\"
|         \"2\"
|       \"3\"
";
    assert_eq!(dump("<a href=x>1<div>2</a>3"), expected);
}

#[test]
fn test_table_text_is_foster_parented() {
    let doc = parse("<table>x<tr>y</table>");
    let expected = "\
| <html>
|   <head>
|   <body>
|     \"xy\"
|     <table>
|       <tbody>
|         <tr>
";
    assert_eq!(doc.dump(), expected);
    assert!(
        doc.errors
            .iter()
            .any(|e| e.kind == ParseErrorKind::FosterParentedCharacters)
    );
}

#[test]
fn test_foreign_object_content_is_html() {
    let expected = "\
| <html>
|   <head>
|   <body>
|     <svg svg>
|       <svg foreignObject>
|         <div>
|           \"ok\"
";
    assert_eq!(
        dump("<svg><foreignObject><div>ok</div></foreignObject></svg>"),
        expected
    );
}

#[rstest]
#[case::html5("<!DOCTYPE html>", QuirksMode::NoQuirks)]
#[case::transitional_without_system_id(
    r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN">"#,
    QuirksMode::Quirks
)]
#[case::transitional_with_system_id(
    r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN" "http://www.w3.org/TR/html4/loose.dtd">"#,
    QuirksMode::LimitedQuirks
)]
#[case::xhtml_transitional(
    r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">"#,
    QuirksMode::LimitedQuirks
)]
#[case::missing("<p>", QuirksMode::Quirks)]
fn test_doctype_sets_quirks_mode(#[case] html: &str, #[case] expected: QuirksMode) {
    assert_eq!(parse(html).quirks_mode, expected);
}

#[test]
fn test_nested_select_closes_the_outer_select() {
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
    assert_eq!(dump("<select><option>A<select><option>B"), expected);
}

#[test]
fn test_doctype_is_kept_in_the_tree() {
    let doc = parse("<!DOCTYPE html><title>t</title>");
    assert!(doc.dump().starts_with("| <!DOCTYPE html>\n| <html>\n|   <head>\n|     <title>\n"));
    assert!(doc.errors.is_empty(), "unexpected errors: {:?}", doc.errors);
}

#[test]
fn test_template_contents_render_under_content() {
    let expected = "\
| <html>
|   <head>
|     <template>
|       content
|         <p>
|           \"x\"
|   <body>
";
    assert_eq!(dump("<template><p>x</template>"), expected);
}

#[test]
fn test_fragment_in_table_body_context() {
    let doc = parse_fragment("<tr><td>1", &FragmentContext::html("tbody"), ParseOpts::default());
    assert!(matches!(
        doc.tree.get(doc.root).map(|n| &n.node_type),
        Some(NodeType::DocumentFragment)
    ));
    assert_eq!(doc.dump(), "| <tr>\n|   <td>\n|     \"1\"\n");
}

#[test]
fn test_fragment_in_svg_context_stays_foreign() {
    let context: FragmentContext = "svg svg".parse().expect("valid context");
    let doc = parse_fragment("<circle/>", &context, ParseOpts::default());
    assert_eq!(doc.dump(), "| <svg circle>\n");
}

#[test]
fn test_noscript_depends_on_scripting() {
    let off = parse_document("<body><noscript><p>x</p></noscript>", ParseOpts::default());
    assert!(off.dump().contains("|     <noscript>\n|       <p>\n"));

    let on = parse_document(
        "<body><noscript><p>x</p></noscript>",
        ParseOpts::default().with_scripting(),
    );
    assert!(on.dump().contains("|     <noscript>\n|       \"<p>x</p>\"\n"));
}

#[test]
fn test_adversarial_bold_div_input_terminates() {
    let input = "<b><div></div></b>".repeat(50);
    let doc = parse(&input);
    assert!(doc.dump().starts_with("| <html>\n"));
}

#[rstest]
#[case::deep_nesting("<div>", 2000)]
#[case::table_soup("<table><tr><td><table>x", 40)]
#[case::stray_end_tags("</b></i></p></table></select></template></html>", 20)]
#[case::formatting_soup("<a><b><i><u><nobr><s>", 30)]
#[case::foreign_breakout("<svg><math><b><svg><p><mi>", 20)]
#[case::framesets("<frameset><frameset></frameset></frameset><div>x</html><!--c-->", 1)]
fn test_pathological_input_yields_a_tree(#[case] unit: &str, #[case] times: usize) {
    let doc = parse(&unit.repeat(times));
    assert!(doc.tree.document_element().is_some());
}

#[test]
fn test_errors_are_logged_in_token_order() {
    let doc = parse("</x><p></y>");
    let kinds: Vec<_> = doc.errors.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ParseErrorKind::MissingDoctype,
            ParseErrorKind::UnexpectedEndTag,
            ParseErrorKind::UnexpectedEndTag,
        ]
    );
    assert!(doc.errors.windows(2).all(|w| w[0].token_index <= w[1].token_index));
}

#[rstest]
#[case::other_name("<!DOCTYPE foo>")]
#[case::nameless("<!DOCTYPE>")]
#[case::legacy_public_id(r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 3.2//EN">"#)]
#[case::missing("<p>x")]
fn test_srcdoc_documents_are_never_quirky(#[case] html: &str) {
    let doc = parse_document(html, ParseOpts::default().with_iframe_srcdoc());
    assert_eq!(doc.quirks_mode, QuirksMode::NoQuirks);
}

#[test]
fn test_deeply_nested_document_dumps() {
    let doc = parse(&"<span>".repeat(100_000));
    let dump = doc.dump();
    assert!(dump.starts_with("| <html>\n|   <head>\n|   <body>\n|     <span>\n"));
    assert_eq!(dump.lines().count(), 100_003);
}
