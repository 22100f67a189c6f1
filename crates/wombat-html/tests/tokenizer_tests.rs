//! Integration tests for the HTML tokenizer.

use wombat_html::tokenizer::Doctype;
use wombat_html::{LexicalMode, Tag, TagKind, Token, Tokenizer};

/// Helper to tokenize a string and return the tokens
fn tokenize(input: &str) -> Vec<Token> {
    Tokenizer::new(input).collect()
}

/// Helper to drop tokenizer parse errors from a token list
fn without_errors(tokens: Vec<Token>) -> Vec<Token> {
    tokens
        .into_iter()
        .filter(|t| !matches!(t, Token::ParseError(_)))
        .collect()
}

#[test]
fn test_text_is_one_run() {
    let tokens = tokenize("Hello");
    assert_eq!(tokens, vec![Token::characters("Hello"), Token::EndOfFile]);
}

#[test]
fn test_doctype() {
    let tokens = tokenize("<!DOCTYPE html>");
    assert_eq!(tokens.len(), 2);
    match &tokens[0] {
        Token::Doctype(Doctype {
            name, force_quirks, ..
        }) => {
            assert_eq!(name.as_deref(), Some("html"));
            assert!(!force_quirks);
        }
        other => panic!("Expected DOCTYPE token, got {other:?}"),
    }
}

#[test]
fn test_start_tag_with_attributes() {
    let tokens = tokenize("<DIV Class=a id='b' hidden>");
    let Token::Tag(tag) = &tokens[0] else {
        panic!("Expected a tag, got {:?}", tokens[0]);
    };
    assert_eq!(tag.kind, TagKind::Start);
    assert_eq!(tag.name, "div");
    assert_eq!(tag.get_attribute("class"), Some("a"));
    assert_eq!(tag.get_attribute("id"), Some("b"));
    assert_eq!(tag.get_attribute("hidden"), Some(""));
}

#[test]
fn test_self_closing_and_end_tag() {
    let tokens = tokenize("<br/></p>");
    assert_eq!(
        tokens,
        vec![
            Token::Tag(Tag::start("br").with_self_closing()),
            Token::end_tag("p"),
            Token::EndOfFile,
        ]
    );
}

#[test]
fn test_duplicate_attribute_keeps_the_first() {
    let tokens = tokenize("<a x=1 x=2>");
    assert!(tokens.contains(&Token::ParseError("duplicate-attribute".to_string())));
    let tokens = without_errors(tokens);
    assert_eq!(tokens[0], Token::Tag(Tag::start("a").with_attr("x", "1")));
}

#[test]
fn test_comment() {
    let tokens = tokenize("<!-- hi -->");
    assert_eq!(tokens, vec![Token::Comment(" hi ".to_string()), Token::EndOfFile]);
}

#[test]
fn test_character_references() {
    let tokens = tokenize("a&amp;b&lt;&#x41;");
    assert_eq!(tokens, vec![Token::characters("a&b<A"), Token::EndOfFile]);
}

#[test]
fn test_newlines_are_normalized() {
    let tokens = tokenize("a\r\nb\rc");
    assert_eq!(tokens[0], Token::characters("a\nb\nc"));
}

#[test]
fn test_rawtext_mode_ends_at_the_matching_end_tag() {
    let mut tokenizer = Tokenizer::new("<style>a<b>c</style>d");
    assert_eq!(tokenizer.next_token(), Some(Token::start_tag("style")));
    tokenizer.set_lexical_mode(LexicalMode::Rawtext);
    assert_eq!(tokenizer.next_token(), Some(Token::characters("a<b>c")));
    assert_eq!(tokenizer.next_token(), Some(Token::end_tag("style")));
    assert_eq!(tokenizer.next_token(), Some(Token::characters("d")));
    assert_eq!(tokenizer.next_token(), Some(Token::EndOfFile));
    assert_eq!(tokenizer.next_token(), None);
}

#[test]
fn test_cdata_outside_foreign_content_is_a_bogus_comment() {
    let tokens = tokenize("<![CDATA[x]]>");
    assert!(tokens.contains(&Token::ParseError("cdata-in-html-content".to_string())));
    assert_eq!(without_errors(tokens)[0], Token::Comment("[CDATA[x]]".to_string()));
}

#[test]
fn test_cdata_in_foreign_content_is_text() {
    let mut tokenizer = Tokenizer::new("<![CDATA[a<b]]>");
    tokenizer.set_cdata_allowed(true);
    assert_eq!(tokenizer.next_token(), Some(Token::characters("a<b")));
}
