use std::str::FromStr;

use strum_macros::Display;
use thiserror::Error;
use wombat_dom::Namespace;

use crate::tokenizer::{LexicalMode, Token};

/// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
///
/// "The insertion mode is a state variable that controls the primary operation
/// of the tree construction stage."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum InsertionMode {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    Initial,
    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    BeforeHtml,
    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    BeforeHead,
    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    InHead,
    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    InHeadNoscript,
    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    AfterHead,
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    InBody,
    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    Text,
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    InTable,
    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    InTableText,
    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    InCaption,
    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolumngroup)
    InColumnGroup,
    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intablebody)
    InTableBody,
    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inrow)
    InRow,
    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incell)
    InCell,
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    InSelect,
    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    InSelectInTable,
    /// [§ 13.2.6.4.18 The "in template" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)
    InTemplate,
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    AfterBody,
    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    InFrameset,
    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    AfterFrameset,
    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    AfterAfterBody,
    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    AfterAfterFrameset,
}

/// What an insertion-mode handler asks the dispatcher to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ProcessResult {
    /// The token has been fully handled.
    Done,
    /// Handled, and the start tag's self-closing flag was acknowledged.
    DoneAckSelfClosing,
    /// "Reprocess the token" in the given mode.
    Reprocess(InsertionMode, Token),
    /// Reprocess using the current insertion mode's HTML rules, bypassing the
    /// foreign content check. Used by foreign end tags that reach an HTML element.
    ReprocessInHtmlContent(Token),
    /// Handled; the tokenizer must switch lexical mode before the next token.
    SwitchLexer(LexicalMode),
}

/// What the driver must do after feeding a token to the tree builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSinkResult {
    /// Keep tokenizing in the current lexical mode.
    Continue,
    /// Switch the tokenizer to this lexical mode.
    SwitchTo(LexicalMode),
}

/// [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
///
/// The context element a fragment is parsed in. Written the way the html5lib
/// test suite writes it: `td`, `svg path`, `math mi`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentContext {
    /// Namespace of the context element.
    pub namespace: Namespace,
    /// Local name of the context element.
    pub name: String,
}

impl FragmentContext {
    /// An HTML context element.
    #[must_use]
    pub fn html(name: &str) -> Self {
        Self {
            namespace: Namespace::Html,
            name: name.to_ascii_lowercase(),
        }
    }

    /// "Set the state of the HTML parser's tokenization stage as follows,
    /// switching on the context element"
    #[must_use]
    pub fn lexical_mode(&self, scripting_enabled: bool) -> LexicalMode {
        if self.namespace != Namespace::Html {
            return LexicalMode::Data;
        }
        match self.name.as_str() {
            "title" | "textarea" => LexicalMode::Rcdata,
            "style" | "xmp" | "iframe" | "noembed" | "noframes" => LexicalMode::Rawtext,
            "noscript" => {
                if scripting_enabled {
                    LexicalMode::Rawtext
                } else {
                    LexicalMode::Data
                }
            }
            "script" => LexicalMode::ScriptData,
            "plaintext" => LexicalMode::Plaintext,
            _ => LexicalMode::Data,
        }
    }
}

/// Why a fragment context string could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextParseError {
    /// The string was empty or whitespace.
    #[error("fragment context is empty")]
    Empty,
    /// The namespace prefix was not `svg` or `math`.
    #[error("unknown fragment context namespace `{0}` (expected `svg` or `math`)")]
    UnknownNamespace(String),
    /// More than a namespace and a name were given.
    #[error("fragment context `{0}` has too many parts")]
    TooManyParts(String),
}

impl FromStr for FragmentContext {
    type Err = ContextParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        match parts.as_slice() {
            [] => Err(ContextParseError::Empty),
            [name] => Ok(Self::html(name)),
            [prefix, name] => {
                let namespace = match *prefix {
                    "svg" => Namespace::Svg,
                    "math" => Namespace::MathMl,
                    other => return Err(ContextParseError::UnknownNamespace(other.to_string())),
                };
                Ok(Self {
                    namespace,
                    name: (*name).to_string(),
                })
            }
            _ => Err(ContextParseError::TooManyParts(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("td", Namespace::Html, "td")]
    #[case("TD", Namespace::Html, "td")]
    #[case("svg path", Namespace::Svg, "path")]
    #[case("svg foreignObject", Namespace::Svg, "foreignObject")]
    #[case("math mi", Namespace::MathMl, "mi")]
    fn parses_context_strings(#[case] input: &str, #[case] namespace: Namespace, #[case] name: &str) {
        let context: FragmentContext = input.parse().expect("valid context");
        assert_eq!(context.namespace, namespace);
        assert_eq!(context.name, name);
    }

    #[test]
    fn rejects_bad_context_strings() {
        assert_eq!("".parse::<FragmentContext>(), Err(ContextParseError::Empty));
        assert_eq!(
            "xul box".parse::<FragmentContext>(),
            Err(ContextParseError::UnknownNamespace("xul".to_string()))
        );
        assert!(matches!(
            "svg g extra".parse::<FragmentContext>(),
            Err(ContextParseError::TooManyParts(_))
        ));
    }

    #[test]
    fn context_picks_the_tokenizer_state() {
        assert_eq!(FragmentContext::html("title").lexical_mode(false), LexicalMode::Rcdata);
        assert_eq!(FragmentContext::html("noscript").lexical_mode(false), LexicalMode::Data);
        assert_eq!(FragmentContext::html("noscript").lexical_mode(true), LexicalMode::Rawtext);
        assert_eq!(FragmentContext::html("div").lexical_mode(true), LexicalMode::Data);
    }
}
