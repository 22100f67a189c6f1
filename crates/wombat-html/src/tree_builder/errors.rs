use std::fmt;

use serde::Serialize;
use strum_macros::{Display, EnumIter, IntoStaticStr};

/// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
///
/// The kinds of parse error the tree builder records. The `Display` form is
/// the stable, machine-readable code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, EnumIter, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ParseErrorKind {
    /// Reported by the tokenizer; the tokenizer's own code is kept as the detail.
    Tokenizer,
    /// The first token was not a DOCTYPE in a non-srcdoc document.
    MissingDoctype,
    /// A DOCTYPE that is not one of the recognised legacy-compatible forms.
    UnknownDoctype,
    /// A DOCTYPE token after the initial insertion mode.
    UnexpectedDoctype,
    /// A start tag the current insertion mode does not allow.
    UnexpectedStartTag,
    /// An end tag with no matching open element, or not allowed here.
    UnexpectedEndTag,
    /// Non-whitespace text where none is allowed.
    UnexpectedCharacters,
    /// A U+0000 NULL character in text that drops or replaces it.
    UnexpectedNullCharacter,
    /// End of file while elements that need explicit closing are open.
    UnexpectedEof,
    /// An end tag closed elements that were still open inside it.
    EndTagWithUnclosedElements,
    /// The element closed by an end tag was not the current node.
    EndTagNotCurrentNode,
    /// A self-closing flag on a start tag that does not allow one.
    NonVoidHtmlElementStartTagWithTrailingSolidus,
    /// Adoption agency: the formatting element is no longer open.
    FormattingElementNotOpen,
    /// Adoption agency: the formatting element is open but not in scope.
    FormattingElementNotInScope,
    /// Adoption agency: the formatting element is not the current node.
    FormattingElementNotCurrentNode,
    /// Non-whitespace text inside a table was moved before the table.
    FosterParentedCharacters,
    /// An HTML start tag in SVG or MathML content ended the foreign subtree.
    UnexpectedHtmlElementInForeignContent,
    /// An end tag in foreign content that does not match the current node.
    UnexpectedEndTagInForeignContent,
}

/// One entry in the tree builder's error log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseError {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// Zero-based index of the token being processed, counting every token
    /// the tree builder received.
    pub token_index: usize,
    /// Extra context: the tag name involved, or the tokenizer's error code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.token_index, self.kind)?;
        if let Some(detail) = &self.detail {
            write!(f, " ({detail})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn kinds_have_distinct_codes() {
        let codes: Vec<&'static str> = ParseErrorKind::iter().map(Into::into).collect();
        let mut deduped = codes.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(codes.len(), deduped.len());
        assert!(codes.contains(&"non-void-html-element-start-tag-with-trailing-solidus"));
    }

    #[test]
    fn display_includes_detail() {
        let error = ParseError {
            kind: ParseErrorKind::UnexpectedEndTag,
            token_index: 7,
            detail: Some("div".to_string()),
        };
        assert_eq!(error.to_string(), "7: unexpected-end-tag (div)");
    }
}
