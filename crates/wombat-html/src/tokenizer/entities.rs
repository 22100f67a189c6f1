//! Named character reference lookup.
//!
//! [§ 13.5 Named character references](https://html.spec.whatwg.org/multipage/named-characters.html#named-character-references)
//!
//! The full table has 2,231 entries. This one carries the references that
//! show up in real documents, including every legacy name that may appear
//! without a trailing semicolon in the Latin-1 range.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Legacy references, valid with or without the trailing semicolon.
const LEGACY: &[(&str, &str)] = &[
    ("AElig", "\u{00C6}"),
    ("AMP", "&"),
    ("Aacute", "\u{00C1}"),
    ("Acirc", "\u{00C2}"),
    ("Agrave", "\u{00C0}"),
    ("Aring", "\u{00C5}"),
    ("Atilde", "\u{00C3}"),
    ("Auml", "\u{00C4}"),
    ("COPY", "\u{00A9}"),
    ("Ccedil", "\u{00C7}"),
    ("ETH", "\u{00D0}"),
    ("Eacute", "\u{00C9}"),
    ("Ecirc", "\u{00CA}"),
    ("Egrave", "\u{00C8}"),
    ("Euml", "\u{00CB}"),
    ("GT", ">"),
    ("Iacute", "\u{00CD}"),
    ("Icirc", "\u{00CE}"),
    ("Igrave", "\u{00CC}"),
    ("Iuml", "\u{00CF}"),
    ("LT", "<"),
    ("Ntilde", "\u{00D1}"),
    ("Oacute", "\u{00D3}"),
    ("Ocirc", "\u{00D4}"),
    ("Ograve", "\u{00D2}"),
    ("Oslash", "\u{00D8}"),
    ("Otilde", "\u{00D5}"),
    ("Ouml", "\u{00D6}"),
    ("QUOT", "\""),
    ("REG", "\u{00AE}"),
    ("THORN", "\u{00DE}"),
    ("Uacute", "\u{00DA}"),
    ("Ucirc", "\u{00DB}"),
    ("Ugrave", "\u{00D9}"),
    ("Uuml", "\u{00DC}"),
    ("Yacute", "\u{00DD}"),
    ("aacute", "\u{00E1}"),
    ("acirc", "\u{00E2}"),
    ("acute", "\u{00B4}"),
    ("aelig", "\u{00E6}"),
    ("agrave", "\u{00E0}"),
    ("amp", "&"),
    ("aring", "\u{00E5}"),
    ("atilde", "\u{00E3}"),
    ("auml", "\u{00E4}"),
    ("brvbar", "\u{00A6}"),
    ("ccedil", "\u{00E7}"),
    ("cedil", "\u{00B8}"),
    ("cent", "\u{00A2}"),
    ("copy", "\u{00A9}"),
    ("curren", "\u{00A4}"),
    ("deg", "\u{00B0}"),
    ("divide", "\u{00F7}"),
    ("eacute", "\u{00E9}"),
    ("ecirc", "\u{00EA}"),
    ("egrave", "\u{00E8}"),
    ("eth", "\u{00F0}"),
    ("euml", "\u{00EB}"),
    ("frac12", "\u{00BD}"),
    ("frac14", "\u{00BC}"),
    ("frac34", "\u{00BE}"),
    ("gt", ">"),
    ("iacute", "\u{00ED}"),
    ("icirc", "\u{00EE}"),
    ("iexcl", "\u{00A1}"),
    ("igrave", "\u{00EC}"),
    ("iquest", "\u{00BF}"),
    ("iuml", "\u{00EF}"),
    ("laquo", "\u{00AB}"),
    ("lt", "<"),
    ("macr", "\u{00AF}"),
    ("micro", "\u{00B5}"),
    ("middot", "\u{00B7}"),
    ("nbsp", "\u{00A0}"),
    ("not", "\u{00AC}"),
    ("ntilde", "\u{00F1}"),
    ("oacute", "\u{00F3}"),
    ("ocirc", "\u{00F4}"),
    ("ograve", "\u{00F2}"),
    ("ordf", "\u{00AA}"),
    ("ordm", "\u{00BA}"),
    ("oslash", "\u{00F8}"),
    ("otilde", "\u{00F5}"),
    ("ouml", "\u{00F6}"),
    ("para", "\u{00B6}"),
    ("plusmn", "\u{00B1}"),
    ("pound", "\u{00A3}"),
    ("quot", "\""),
    ("raquo", "\u{00BB}"),
    ("reg", "\u{00AE}"),
    ("sect", "\u{00A7}"),
    ("shy", "\u{00AD}"),
    ("sup1", "\u{00B9}"),
    ("sup2", "\u{00B2}"),
    ("sup3", "\u{00B3}"),
    ("szlig", "\u{00DF}"),
    ("thorn", "\u{00FE}"),
    ("times", "\u{00D7}"),
    ("uacute", "\u{00FA}"),
    ("ucirc", "\u{00FB}"),
    ("ugrave", "\u{00F9}"),
    ("uml", "\u{00A8}"),
    ("uuml", "\u{00FC}"),
    ("yacute", "\u{00FD}"),
    ("yen", "\u{00A5}"),
    ("yuml", "\u{00FF}"),
];

/// References that require the trailing semicolon.
const SEMICOLON_ONLY: &[(&str, &str)] = &[
    ("Alpha;", "\u{0391}"),
    ("Beta;", "\u{0392}"),
    ("Delta;", "\u{0394}"),
    ("Gamma;", "\u{0393}"),
    ("Omega;", "\u{03A9}"),
    ("Pi;", "\u{03A0}"),
    ("Sigma;", "\u{03A3}"),
    ("alpha;", "\u{03B1}"),
    ("apos;", "'"),
    ("beta;", "\u{03B2}"),
    ("bull;", "\u{2022}"),
    ("darr;", "\u{2193}"),
    ("delta;", "\u{03B4}"),
    ("epsilon;", "\u{03B5}"),
    ("euro;", "\u{20AC}"),
    ("fjlig;", "fj"),
    ("gamma;", "\u{03B3}"),
    ("ge;", "\u{2265}"),
    ("harr;", "\u{2194}"),
    ("hellip;", "\u{2026}"),
    ("infin;", "\u{221E}"),
    ("lambda;", "\u{03BB}"),
    ("larr;", "\u{2190}"),
    ("ldquo;", "\u{201C}"),
    ("le;", "\u{2264}"),
    ("lsquo;", "\u{2018}"),
    ("mdash;", "\u{2014}"),
    ("minus;", "\u{2212}"),
    ("mu;", "\u{03BC}"),
    ("ndash;", "\u{2013}"),
    ("ne;", "\u{2260}"),
    ("notin;", "\u{2209}"),
    ("omega;", "\u{03C9}"),
    ("pi;", "\u{03C0}"),
    ("prime;", "\u{2032}"),
    ("rarr;", "\u{2192}"),
    ("rdquo;", "\u{201D}"),
    ("rsquo;", "\u{2019}"),
    ("sigma;", "\u{03C3}"),
    ("sum;", "\u{2211}"),
    ("theta;", "\u{03B8}"),
    ("thinsp;", "\u{2009}"),
    ("trade;", "\u{2122}"),
    ("uarr;", "\u{2191}"),
    ("zwj;", "\u{200D}"),
    ("zwnj;", "\u{200C}"),
];

/// Entity name (without the leading `&`) to replacement text.
static NAMED_ENTITIES: LazyLock<HashMap<String, &'static str>> = LazyLock::new(|| {
    let mut map = HashMap::with_capacity(LEGACY.len() * 2 + SEMICOLON_ONLY.len());
    for &(name, value) in LEGACY {
        let _ = map.insert(name.to_string(), value);
        let _ = map.insert(format!("{name};"), value);
    }
    for &(name, value) in SEMICOLON_ONLY {
        let _ = map.insert(name.to_string(), value);
    }
    map
});

/// Longest entity name, in bytes.
static MAX_NAME_LEN: LazyLock<usize> =
    LazyLock::new(|| NAMED_ENTITIES.keys().map(String::len).max().unwrap_or(0));

/// Look up a named character reference. `name` excludes the leading `&`.
///
/// ```
/// use wombat_html::tokenizer::entities::lookup_entity;
/// assert_eq!(lookup_entity("amp;"), Some("&"));
/// assert_eq!(lookup_entity("amp"), Some("&"));
/// assert_eq!(lookup_entity("apos"), None);
/// ```
#[must_use]
pub fn lookup_entity(name: &str) -> Option<&'static str> {
    NAMED_ENTITIES.get(name).copied()
}

/// Find the longest entity name that is a prefix of `candidate`.
///
/// Returns the matched name's length in characters and the replacement text.
#[must_use]
pub fn longest_match(candidate: &[char]) -> Option<(usize, &'static str)> {
    let limit = candidate.len().min(*MAX_NAME_LEN);
    let mut name: String = candidate[..limit].iter().collect();
    let mut len = limit;
    while len > 0 {
        if let Some(value) = lookup_entity(&name) {
            return Some((len, value));
        }
        let _ = name.pop();
        len -= 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_longest_name() {
        let input: Vec<char> = "notin;x".chars().collect();
        assert_eq!(longest_match(&input), Some((6, "\u{2209}")));

        let input: Vec<char> = "notit;".chars().collect();
        assert_eq!(longest_match(&input), Some((3, "\u{00AC}")));
    }

    #[test]
    fn unknown_name_has_no_match() {
        let input: Vec<char> = "zzz;".chars().collect();
        assert_eq!(longest_match(&input), None);
    }
}
