//! [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
//!
//! DOCTYPE classification: whether a DOCTYPE is a parse error, and which
//! quirks mode it puts the document in.

use wombat_dom::QuirksMode;

use crate::tokenizer::Doctype;

// All lowercase; matching is ASCII case-insensitive.
const QUIRKY_PUBLIC_PREFIXES: &[&str] = &[
    "+//silmaril//dtd html pro v0r11 19970101//",
    "-//as//dtd html 3.0 aswedit + extensions//",
    "-//advasoft ltd//dtd html 3.0 aswedit + extensions//",
    "-//ietf//dtd html 2.0 level 1//",
    "-//ietf//dtd html 2.0 level 2//",
    "-//ietf//dtd html 2.0 strict level 1//",
    "-//ietf//dtd html 2.0 strict level 2//",
    "-//ietf//dtd html 2.0 strict//",
    "-//ietf//dtd html 2.0//",
    "-//ietf//dtd html 2.1e//",
    "-//ietf//dtd html 3.0//",
    "-//ietf//dtd html 3.2 final//",
    "-//ietf//dtd html 3.2//",
    "-//ietf//dtd html 3//",
    "-//ietf//dtd html level 0//",
    "-//ietf//dtd html level 1//",
    "-//ietf//dtd html level 2//",
    "-//ietf//dtd html level 3//",
    "-//ietf//dtd html strict level 0//",
    "-//ietf//dtd html strict level 1//",
    "-//ietf//dtd html strict level 2//",
    "-//ietf//dtd html strict level 3//",
    "-//ietf//dtd html strict//",
    "-//ietf//dtd html//",
    "-//metrius//dtd metrius presentational//",
    "-//microsoft//dtd internet explorer 2.0 html strict//",
    "-//microsoft//dtd internet explorer 2.0 html//",
    "-//microsoft//dtd internet explorer 2.0 tables//",
    "-//microsoft//dtd internet explorer 3.0 html strict//",
    "-//microsoft//dtd internet explorer 3.0 html//",
    "-//microsoft//dtd internet explorer 3.0 tables//",
    "-//netscape comm. corp.//dtd html//",
    "-//netscape comm. corp.//dtd strict html//",
    "-//o'reilly and associates//dtd html 2.0//",
    "-//o'reilly and associates//dtd html extended 1.0//",
    "-//o'reilly and associates//dtd html extended relaxed 1.0//",
    "-//sq//dtd html 2.0 hotmetal + extensions//",
    "-//softquad software//dtd hotmetal pro 6.0::19990601::extensions to html 4.0//",
    "-//softquad//dtd hotmetal pro 4.0::19971010::extensions to html 4.0//",
    "-//spyglass//dtd html 2.0 extended//",
    "-//sun microsystems corp.//dtd hotjava html//",
    "-//sun microsystems corp.//dtd hotjava strict html//",
    "-//w3c//dtd html 3 1995-03-24//",
    "-//w3c//dtd html 3.2 draft//",
    "-//w3c//dtd html 3.2 final//",
    "-//w3c//dtd html 3.2//",
    "-//w3c//dtd html 3.2s draft//",
    "-//w3c//dtd html 4.0 frameset//",
    "-//w3c//dtd html 4.0 transitional//",
    "-//w3c//dtd html experimental 19960712//",
    "-//w3c//dtd html experimental 970421//",
    "-//w3c//dtd w3 html//",
    "-//w3o//dtd w3 html 3.0//",
    "-//webtechs//dtd mozilla html 2.0//",
    "-//webtechs//dtd mozilla html//",
];

const QUIRKY_PUBLIC_MATCHES: &[&str] = &[
    "-//w3o//dtd w3 html strict 3.0//en//",
    "-/w3c/dtd html 4.0 transitional/en",
    "html",
];

const QUIRKY_SYSTEM_MATCHES: &[&str] =
    &["http://www.ibm.com/data/dtd/v11/ibmxhtml1-transitional.dtd"];

const LIMITED_QUIRKY_PUBLIC_PREFIXES: &[&str] = &[
    "-//w3c//dtd xhtml 1.0 frameset//",
    "-//w3c//dtd xhtml 1.0 transitional//",
];

/// Quirks without a system identifier, limited-quirks with one.
const HTML4_PUBLIC_PREFIXES: &[&str] = &[
    "-//w3c//dtd html 4.01 frameset//",
    "-//w3c//dtd html 4.01 transitional//",
];

fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn matches_any(value: &str, table: &[&str]) -> bool {
    table.iter().any(|entry| value.eq_ignore_ascii_case(entry))
}

fn has_any_prefix(value: &str, table: &[&str]) -> bool {
    table.iter().any(|prefix| starts_with_ignore_case(value, prefix))
}

/// "If the DOCTYPE token's name is not "html", or the token's public
/// identifier is not missing, or the token's system identifier is neither
/// missing nor "about:legacy-compat", then there is a parse error."
///
/// The legacy public identifiers the HTML standard still calls conforming are
/// accepted with their matching system identifiers.
#[must_use]
pub fn is_doctype_error(doctype: &Doctype) -> bool {
    let system = doctype.system_id.as_deref();
    let ok = match (doctype.name.as_deref(), doctype.public_id.as_deref()) {
        (Some("html"), None) => system.is_none_or(|s| s == "about:legacy-compat"),
        (Some("html"), Some("-//W3C//DTD HTML 4.0//EN")) => {
            system.is_none_or(|s| s == "http://www.w3.org/TR/REC-html40/strict.dtd")
        }
        (Some("html"), Some("-//W3C//DTD HTML 4.01//EN")) => {
            system.is_none_or(|s| s == "http://www.w3.org/TR/html4/strict.dtd")
        }
        (Some("html"), Some("-//W3C//DTD XHTML 1.0 Strict//EN")) => {
            system == Some("http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd")
        }
        (Some("html"), Some("-//W3C//DTD XHTML 1.1//EN")) => {
            system == Some("http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd")
        }
        _ => false,
    };
    !ok
}

/// Pick the document's quirks mode from its DOCTYPE.
///
/// "If the document is not an iframe srcdoc document": an `iframe` srcdoc
/// document is always no-quirks, whatever its DOCTYPE says, forced quirks
/// included.
#[must_use]
pub fn classify(doctype: &Doctype, iframe_srcdoc: bool) -> QuirksMode {
    if iframe_srcdoc {
        return QuirksMode::NoQuirks;
    }
    if doctype.force_quirks || doctype.name.as_deref() != Some("html") {
        return QuirksMode::Quirks;
    }

    let public = doctype.public_id.as_deref();
    let system = doctype.system_id.as_deref();

    let quirky_public = public.is_some_and(|p| {
        matches_any(p, QUIRKY_PUBLIC_MATCHES) || has_any_prefix(p, QUIRKY_PUBLIC_PREFIXES)
    });
    if quirky_public || system.is_some_and(|s| matches_any(s, QUIRKY_SYSTEM_MATCHES)) {
        return QuirksMode::Quirks;
    }

    match public {
        Some(p) if has_any_prefix(p, LIMITED_QUIRKY_PUBLIC_PREFIXES) => QuirksMode::LimitedQuirks,
        Some(p) if has_any_prefix(p, HTML4_PUBLIC_PREFIXES) => {
            if system.is_some() {
                QuirksMode::LimitedQuirks
            } else {
                QuirksMode::Quirks
            }
        }
        _ => QuirksMode::NoQuirks,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn doctype(name: &str, public: Option<&str>, system: Option<&str>) -> Doctype {
        Doctype {
            name: Some(name.to_string()),
            public_id: public.map(str::to_string),
            system_id: system.map(str::to_string),
            force_quirks: false,
        }
    }

    #[rstest]
    #[case(doctype("html", None, None), QuirksMode::NoQuirks)]
    #[case(doctype("html", None, Some("about:legacy-compat")), QuirksMode::NoQuirks)]
    #[case(doctype("svg", None, None), QuirksMode::Quirks)]
    #[case(doctype("html", Some("HTML"), None), QuirksMode::Quirks)]
    #[case(doctype("html", Some("-//IETF//DTD HTML 2.0//EN"), None), QuirksMode::Quirks)]
    #[case(
        doctype("html", None, Some("http://www.IBM.com/data/dtd/v11/ibmxhtml1-transitional.dtd")),
        QuirksMode::Quirks
    )]
    #[case(
        doctype("html", Some("-//W3C//DTD XHTML 1.0 Transitional//EN"), None),
        QuirksMode::LimitedQuirks
    )]
    #[case(
        doctype("html", Some("-//W3C//DTD HTML 4.01 Transitional//EN"), None),
        QuirksMode::Quirks
    )]
    #[case(
        doctype(
            "html",
            Some("-//W3C//DTD HTML 4.01 Transitional//EN"),
            Some("http://www.w3.org/TR/html4/loose.dtd")
        ),
        QuirksMode::LimitedQuirks
    )]
    #[case(
        doctype("html", Some("-//W3C//DTD HTML 4.01//EN"), None),
        QuirksMode::NoQuirks
    )]
    fn classifies_doctypes(#[case] doctype: Doctype, #[case] expected: QuirksMode) {
        assert_eq!(classify(&doctype, false), expected);
    }

    #[test]
    fn srcdoc_is_never_quirky() {
        let mut forced = doctype("html", None, None);
        forced.force_quirks = true;
        assert_eq!(classify(&forced, true), QuirksMode::NoQuirks);

        assert_eq!(classify(&doctype("foo", None, None), true), QuirksMode::NoQuirks);
        assert_eq!(classify(&Doctype::default(), true), QuirksMode::NoQuirks);

        let legacy = doctype("html", Some("-//W3C//DTD HTML 3.2//EN"), None);
        assert_eq!(classify(&legacy, true), QuirksMode::NoQuirks);
    }

    #[rstest]
    #[case(doctype("html", None, None), false)]
    #[case(doctype("html", None, Some("about:legacy-compat")), false)]
    #[case(doctype("html", None, Some("http://example.com/x.dtd")), true)]
    #[case(doctype("HTML5", None, None), true)]
    #[case(
        doctype("html", Some("-//W3C//DTD HTML 4.01//EN"), Some("http://www.w3.org/TR/html4/strict.dtd")),
        false
    )]
    #[case(doctype("html", Some("-//W3C//DTD XHTML 1.1//EN"), None), true)]
    #[case(doctype("html", Some("-//W3C//DTD HTML 4.01 Transitional//EN"), None), true)]
    fn reports_doctype_errors(#[case] doctype: Doctype, #[case] expected: bool) {
        assert_eq!(is_doctype_error(&doctype), expected);
    }

    #[test]
    fn missing_name_is_an_error_and_quirky() {
        let nameless = Doctype::default();
        assert!(is_doctype_error(&nameless));
        assert_eq!(classify(&nameless, false), QuirksMode::Quirks);
    }
}
