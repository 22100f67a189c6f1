use strum_macros::Display;
use wombat_dom::Attribute;

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// "The output of the tokenization step is a series of zero or more of the
/// following tokens: DOCTYPE, start tag, end tag, comment, character,
/// end-of-file."
///
/// Character tokens are delivered as runs. The tree builder produces the same
/// tree however a run of text is split into [`Token::Characters`] tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// "DOCTYPE tokens have a name, a public identifier, a system identifier,
    /// and a force-quirks flag."
    Doctype(Doctype),
    /// "Start and end tag tokens have a tag name, a self-closing flag, and a
    /// list of attributes, each of which has a name and a value."
    Tag(Tag),
    /// A run of one or more character tokens.
    Characters(String),
    /// "Comment and character tokens have data."
    Comment(String),
    /// A tokenizer parse error, passed through to the tree builder's error log.
    ParseError(String),
    /// The end-of-file token. Nothing follows it.
    EndOfFile,
}

/// DOCTYPE token data.
///
/// "When a DOCTYPE token is created, its name, public identifier, and system
/// identifier must be marked as missing (which is a distinct state from the
/// empty string), and the force-quirks flag must be set to off."
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Doctype {
    /// DOCTYPE name, lowercased by the tokenizer.
    pub name: Option<String>,
    /// Public identifier.
    pub public_id: Option<String>,
    /// System identifier.
    pub system_id: Option<String>,
    /// "force-quirks flag"
    pub force_quirks: bool,
}

/// Whether a [`Tag`] opens or closes an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TagKind {
    /// A start tag, `<name ...>`.
    Start,
    /// An end tag, `</name>`.
    End,
}

/// A start or end tag token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Start or end.
    pub kind: TagKind,
    /// Tag name, lowercased by the tokenizer.
    pub name: String,
    /// "self-closing flag"
    pub self_closing: bool,
    /// Attributes in source order. Duplicates have already been dropped.
    pub attrs: Vec<Attribute>,
}

impl Tag {
    /// A start tag with no attributes.
    #[must_use]
    pub fn start(name: &str) -> Self {
        Self {
            kind: TagKind::Start,
            name: name.to_string(),
            self_closing: false,
            attrs: Vec::new(),
        }
    }

    /// An end tag.
    #[must_use]
    pub fn end(name: &str) -> Self {
        Self {
            kind: TagKind::End,
            ..Self::start(name)
        }
    }

    /// Add an attribute, builder style.
    #[must_use]
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push(Attribute::new(name, value));
        self
    }

    /// Set the self-closing flag, builder style.
    #[must_use]
    pub const fn with_self_closing(mut self) -> Self {
        self.self_closing = true;
        self
    }

    /// Look up an attribute value by name.
    #[must_use]
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Returns true if this is a start tag named `name`.
    #[must_use]
    pub fn is_start(&self, name: &str) -> bool {
        self.kind == TagKind::Start && self.name == name
    }

    /// Returns true if this is an end tag named `name`.
    #[must_use]
    pub fn is_end(&self, name: &str) -> bool {
        self.kind == TagKind::End && self.name == name
    }

    /// Returns true if this is a start tag named one of `names`.
    #[must_use]
    pub fn is_start_of(&self, names: &[&str]) -> bool {
        self.kind == TagKind::Start && names.contains(&self.name.as_str())
    }

    /// Returns true if this is an end tag named one of `names`.
    #[must_use]
    pub fn is_end_of(&self, names: &[&str]) -> bool {
        self.kind == TagKind::End && names.contains(&self.name.as_str())
    }
}

impl Token {
    /// Shorthand for a start tag token.
    #[must_use]
    pub fn start_tag(name: &str) -> Self {
        Self::Tag(Tag::start(name))
    }

    /// Shorthand for an end tag token.
    #[must_use]
    pub fn end_tag(name: &str) -> Self {
        Self::Tag(Tag::end(name))
    }

    /// Shorthand for a character run.
    #[must_use]
    pub fn characters(data: &str) -> Self {
        Self::Characters(data.to_string())
    }
}

/// The lexical modes the tree builder can put the tokenizer in.
///
/// [§ 13.2.6.2](https://html.spec.whatwg.org/multipage/parsing.html#parsing-elements-that-contain-only-text)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum LexicalMode {
    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    Data,
    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
    ///
    /// `title`, `textarea`.
    Rcdata,
    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    ///
    /// `style`, `xmp`, `iframe`, `noembed`, `noframes`, and `noscript` when
    /// scripting is enabled.
    Rawtext,
    /// [§ 13.2.5.4 Script data state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-state)
    ScriptData,
    /// [§ 13.2.5.5 PLAINTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#plaintext-state)
    Plaintext,
}
