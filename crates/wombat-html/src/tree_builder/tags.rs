//! Element categories used by the tree construction rules.

use wombat_dom::{ElementData, Namespace};

/// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#formatting)
///
/// "The elements in the formatting category are: a, b, big, code, em, font,
/// i, nobr, s, small, strike, strong, tt, u."
pub(crate) const FORMATTING: &[&str] = &[
    "a", "b", "big", "code", "em", "font", "i", "nobr", "s", "small", "strike", "strong", "tt",
    "u",
];

/// [§ 13.2.6.2 Generate implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
pub(crate) const IMPLIED_END_TAGS: &[&str] = &[
    "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc",
];

/// "generate all implied end tags thoroughly"
pub(crate) const IMPLIED_END_TAGS_THOROUGH: &[&str] = &[
    "caption", "colgroup", "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc",
    "tbody", "td", "tfoot", "th", "thead", "tr",
];

/// Elements that may stay open at the end of the body without a parse error.
///
/// "If there is a node in the stack of open elements that is not either a dd
/// element, a dt element, an li element, ... then this is a parse error."
pub(crate) const BODY_END_ALLOWED: &[&str] = &[
    "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc", "tbody", "td",
    "tfoot", "th", "thead", "tr", "body", "html",
];

/// Headings, which close each other.
pub(crate) const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// [§ 13.1.1 Special](https://html.spec.whatwg.org/multipage/parsing.html#special)
///
/// "The following elements have varying levels of special parsing rules"
const SPECIAL_HTML: &[&str] = &[
    "address", "applet", "area", "article", "aside", "base", "basefont", "bgsound",
    "blockquote", "body", "br", "button", "caption", "center", "col", "colgroup", "dd",
    "details", "dir", "div", "dl", "dt", "embed", "fieldset", "figcaption", "figure", "footer",
    "form", "frame", "frameset", "h1", "h2", "h3", "h4", "h5", "h6", "head", "header", "hgroup",
    "hr", "html", "iframe", "img", "input", "keygen", "li", "link", "listing", "main",
    "marquee", "menu", "meta", "nav", "noembed", "noframes", "noscript", "object", "ol", "p",
    "param", "plaintext", "pre", "script", "search", "section", "select", "source", "style",
    "summary", "table", "tbody", "td", "template", "textarea", "tfoot", "th", "thead", "title",
    "tr", "track", "ul", "wbr", "xmp",
];

/// "MathML mi, MathML mo, MathML mn, MathML ms, MathML mtext, and MathML annotation-xml"
pub(crate) const MATHML_TEXT_INTEGRATION: &[&str] = &["mi", "mo", "mn", "ms", "mtext"];

/// "SVG foreignObject, SVG desc, and SVG title"
const SVG_INTEGRATION: &[&str] = &["foreignObject", "desc", "title"];

/// Returns true if the element is in the special category.
pub(crate) fn is_special(element: &ElementData) -> bool {
    match element.namespace {
        Namespace::Html => SPECIAL_HTML.contains(&element.tag_name.as_str()),
        Namespace::MathMl => {
            MATHML_TEXT_INTEGRATION.contains(&element.tag_name.as_str())
                || element.tag_name == "annotation-xml"
        }
        Namespace::Svg => SVG_INTEGRATION.contains(&element.tag_name.as_str()),
        _ => false,
    }
}

/// [§ 13.2.6.5](https://html.spec.whatwg.org/multipage/parsing.html#mathml-text-integration-point)
///
/// "A node is a MathML text integration point if it is one of the following
/// elements: MathML mi, mo, mn, ms, mtext"
pub(crate) fn is_mathml_text_integration_point(element: &ElementData) -> bool {
    element.namespace == Namespace::MathMl
        && MATHML_TEXT_INTEGRATION.contains(&element.tag_name.as_str())
}

/// [§ 13.2.6.5](https://html.spec.whatwg.org/multipage/parsing.html#html-integration-point)
///
/// "A node is an HTML integration point if it is one of the following elements:
/// a MathML annotation-xml element whose start tag token had an attribute with
/// the name "encoding" whose value was an ASCII case-insensitive match for the
/// string "text/html" [or] "application/xhtml+xml"; an SVG foreignObject
/// element; an SVG desc element; an SVG title element."
pub(crate) fn is_html_integration_point(element: &ElementData) -> bool {
    match element.namespace {
        Namespace::MathMl => element.mathml_annotation_xml_integration_point,
        Namespace::Svg => SVG_INTEGRATION.contains(&element.tag_name.as_str()),
        _ => false,
    }
}

/// [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)
///
/// Start tags that break out of foreign content back into HTML.
pub(crate) const FOREIGN_BREAKOUT: &[&str] = &[
    "b", "big", "blockquote", "body", "br", "center", "code", "dd", "div", "dl", "dt", "em",
    "embed", "h1", "h2", "h3", "h4", "h5", "h6", "head", "hr", "i", "img", "li", "listing",
    "menu", "meta", "nobr", "ol", "p", "pre", "ruby", "s", "small", "span", "strong", "strike",
    "sub", "sup", "table", "tt", "u", "ul", "var",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foreign_integration_points_are_special() {
        assert!(is_special(&ElementData::new(Namespace::Svg, "foreignObject")));
        assert!(is_special(&ElementData::new(Namespace::MathMl, "mi")));
        assert!(!is_special(&ElementData::new(Namespace::Svg, "g")));
        assert!(!is_special(&ElementData::new(Namespace::Html, "b")));
    }

    #[test]
    fn annotation_xml_needs_an_html_encoding() {
        let mut element = ElementData::new(Namespace::MathMl, "annotation-xml");
        assert!(!is_html_integration_point(&element));
        element.mathml_annotation_xml_integration_point = true;
        assert!(is_html_integration_point(&element));
    }
}
