use serde::Deserialize;

/// Knobs that change how a document is parsed.
///
/// Deserializes from a JSON object where every field is optional:
///
/// ```json
/// { "scripting_enabled": true, "max_reprocess_hops": 16 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParseOpts {
    /// [§ 13.2.6.4.4](https://html.spec.whatwg.org/multipage/parsing.html#scripting-flag)
    ///
    /// "The scripting flag is set to "enabled" if scripting was enabled for the
    /// Document with which the parser is associated when the parser was created,
    /// and "disabled" otherwise."
    ///
    /// Controls whether `<noscript>` is raw text and whether the "in head
    /// noscript" insertion mode is used.
    pub scripting_enabled: bool,

    /// The document is an `iframe` srcdoc document. Forces no-quirks mode and
    /// silences the missing DOCTYPE error.
    pub iframe_srcdoc: bool,

    /// Also record the informational "current node is not the element being
    /// closed" errors.
    pub exact_errors: bool,

    /// Upper bound on how many times a single token may be reprocessed before
    /// the tree builder gives up on it.
    pub max_reprocess_hops: usize,
}

impl Default for ParseOpts {
    fn default() -> Self {
        Self {
            scripting_enabled: false,
            iframe_srcdoc: false,
            exact_errors: false,
            max_reprocess_hops: 32,
        }
    }
}

impl ParseOpts {
    /// Parse with the scripting flag enabled.
    #[must_use]
    pub const fn with_scripting(mut self) -> Self {
        self.scripting_enabled = true;
        self
    }

    /// Parse as an `iframe` srcdoc document.
    #[must_use]
    pub const fn with_iframe_srcdoc(mut self) -> Self {
        self.iframe_srcdoc = true;
        self
    }

    /// Record informational parse errors as well.
    #[must_use]
    pub const fn with_exact_errors(mut self) -> Self {
        self.exact_errors = true;
        self
    }

    /// Set the per-token reprocess bound.
    #[must_use]
    pub const fn with_max_reprocess_hops(mut self, hops: usize) -> Self {
        self.max_reprocess_hops = hops;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let opts: ParseOpts = serde_json::from_str(r#"{ "scripting_enabled": true }"#)
            .expect("valid options");
        assert_eq!(opts, ParseOpts::default().with_scripting());
        assert_eq!(opts.max_reprocess_hops, 32);
    }
}
