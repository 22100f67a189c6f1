use std::collections::VecDeque;

use strum_macros::Display;
use wombat_dom::Attribute;

use super::token::{Doctype, LexicalMode, Tag, TagKind, Token};

/// Which text-only state a `</` sequence was seen in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub(super) enum RawKind {
    Rcdata,
    Rawtext,
    ScriptData,
}

/// Which DOCTYPE identifier is being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub(super) enum IdKind {
    Public,
    System,
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// The tokenizer state machine. States that differ only in the text-only
/// element they serve, the quote character, or the DOCTYPE identifier
/// being read share one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub(super) enum TokenizerState {
    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    Data,
    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
    Rcdata,
    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    Rawtext,
    /// [§ 13.2.5.4 Script data state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-state)
    ScriptData,
    /// [§ 13.2.5.5 PLAINTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#plaintext-state)
    Plaintext,
    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    TagOpen,
    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    EndTagOpen,
    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    TagName,
    /// § 13.2.5.9, § 13.2.5.12, § 13.2.5.15: the less-than sign states.
    RawLessThanSign(RawKind),
    /// § 13.2.5.10, § 13.2.5.13, § 13.2.5.16: the end tag open states.
    RawEndTagOpen(RawKind),
    /// § 13.2.5.11, § 13.2.5.14, § 13.2.5.17: the end tag name states.
    RawEndTagName(RawKind),
    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    BeforeAttributeName,
    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    AttributeName,
    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    AfterAttributeName,
    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    BeforeAttributeValue,
    /// § 13.2.5.36 and § 13.2.5.37: double- and single-quoted attribute value.
    AttributeValueQuoted(char),
    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    AttributeValueUnquoted,
    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    AfterAttributeValueQuoted,
    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    SelfClosingStartTag,
    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    BogusComment,
    /// [§ 13.2.5.43 Comment start state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
    CommentStart,
    /// [§ 13.2.5.44 Comment start dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-dash-state)
    CommentStartDash,
    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    Comment,
    /// [§ 13.2.5.50 Comment end dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-dash-state)
    CommentEndDash,
    /// [§ 13.2.5.51 Comment end state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-state)
    CommentEnd,
    /// [§ 13.2.5.52 Comment end bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-bang-state)
    CommentEndBang,
    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    Doctype,
    /// [§ 13.2.5.54 Before DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-name-state)
    BeforeDoctypeName,
    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    DoctypeName,
    /// [§ 13.2.5.56 After DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-name-state)
    AfterDoctypeName,
    /// § 13.2.5.57 and § 13.2.5.63: after the PUBLIC or SYSTEM keyword.
    AfterDoctypeKeyword(IdKind),
    /// § 13.2.5.58 and § 13.2.5.64: before a DOCTYPE identifier.
    BeforeDoctypeIdentifier(IdKind),
    /// § 13.2.5.59-60 and § 13.2.5.65-66: inside a quoted identifier.
    DoctypeIdentifierQuoted(IdKind, char),
    /// § 13.2.5.61 and § 13.2.5.67: after a DOCTYPE identifier.
    AfterDoctypeIdentifier(IdKind),
    /// [§ 13.2.5.62 Between DOCTYPE public and system identifiers state](https://html.spec.whatwg.org/multipage/parsing.html#between-doctype-public-and-system-identifiers-state)
    BetweenDoctypePublicAndSystemIdentifiers,
    /// [§ 13.2.5.68 Bogus DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-doctype-state)
    BogusDoctype,
    /// [§ 13.2.5.69 CDATA section state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-state)
    CdataSection,
    /// [§ 13.2.5.70 CDATA section bracket state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-bracket-state)
    CdataSectionBracket,
    /// [§ 13.2.5.71 CDATA section end state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-end-state)
    CdataSectionEnd,
}

impl From<RawKind> for TokenizerState {
    fn from(kind: RawKind) -> Self {
        match kind {
            RawKind::Rcdata => Self::Rcdata,
            RawKind::Rawtext => Self::Rawtext,
            RawKind::ScriptData => Self::ScriptData,
        }
    }
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// "Implementations must act as if they used the following state machine to tokenize HTML."
///
/// A pull tokenizer. [`Tokenizer::next_token`] runs the state machine only
/// until the next token is ready, so the tree builder can change the lexical
/// mode between tokens:
///
/// ```
/// use wombat_html::{LexicalMode, Token, Tokenizer};
///
/// let mut tokenizer = Tokenizer::new("<title>a<b></title>");
/// assert_eq!(tokenizer.next_token(), Some(Token::start_tag("title")));
/// tokenizer.set_lexical_mode(LexicalMode::Rcdata);
/// assert_eq!(tokenizer.next_token(), Some(Token::characters("a<b>")));
/// assert_eq!(tokenizer.next_token(), Some(Token::end_tag("title")));
/// ```
pub struct Tokenizer {
    pub(super) state: TokenizerState,
    pub(super) input: Vec<char>,
    pub(super) pos: usize,
    current_input_character: Option<char>,
    // "Reconsume in the X state" sets this flag.
    reconsume: bool,
    queue: VecDeque<Token>,

    current_tag: Option<Tag>,
    current_attribute: Option<Attribute>,
    current_comment: String,
    current_doctype: Doctype,

    /// "The last start tag token emitted is used as part of the tree construction stage
    /// and in the RCDATA, RAWTEXT, and script data states."
    last_start_tag_name: Option<String>,

    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#temporary-buffer)
    temporary_buffer: String,

    /// [§ 13.2.5.42](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    ///
    /// "If there is an adjusted current node and it is not an element in the
    /// HTML namespace" then `<![CDATA[` starts a CDATA section.
    cdata_allowed: bool,

    eof_emitted: bool,
}

impl Tokenizer {
    /// Create a new tokenizer for the given input.
    ///
    /// [§ 13.2.3.5 Preprocessing the input stream](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream):
    /// "Before the tokenization stage, the input stream must be preprocessed by
    /// normalizing newlines."
    #[must_use]
    pub fn new(input: &str) -> Self {
        let normalized = input.replace("\r\n", "\n").replace('\r', "\n");
        Self {
            state: TokenizerState::Data,
            input: normalized.chars().collect(),
            pos: 0,
            current_input_character: None,
            reconsume: false,
            queue: VecDeque::new(),
            current_tag: None,
            current_attribute: None,
            current_comment: String::new(),
            current_doctype: Doctype::default(),
            last_start_tag_name: None,
            temporary_buffer: String::new(),
            cdata_allowed: false,
            eof_emitted: false,
        }
    }

    /// Switch the lexical mode. Takes effect from the next input character.
    pub fn set_lexical_mode(&mut self, mode: LexicalMode) {
        log::trace!(target: "wombat::tokenizer", "switching to {mode}");
        self.state = match mode {
            LexicalMode::Data => TokenizerState::Data,
            LexicalMode::Rcdata => TokenizerState::Rcdata,
            LexicalMode::Rawtext => TokenizerState::Rawtext,
            LexicalMode::ScriptData => TokenizerState::ScriptData,
            LexicalMode::Plaintext => TokenizerState::Plaintext,
        };
    }

    /// Pretend a start tag named `name` was the last one emitted, so that
    /// `</name>` is an appropriate end tag. Used by fragment parsing.
    pub fn set_last_start_tag_name(&mut self, name: &str) {
        self.last_start_tag_name = Some(name.to_string());
    }

    /// Tell the tokenizer whether the adjusted current node is a foreign element.
    pub const fn set_cdata_allowed(&mut self, allowed: bool) {
        self.cdata_allowed = allowed;
    }

    /// Produce the next token, or `None` once the end-of-file token has been returned.
    ///
    /// Consecutive character tokens are coalesced into a single
    /// [`Token::Characters`] run.
    pub fn next_token(&mut self) -> Option<Token> {
        loop {
            match self.queue.front() {
                Some(Token::Characters(_)) => {
                    // Gather as much text as the state machine produces before
                    // the next non-character token.
                    while self.queue.len() == 1 && !self.eof_emitted {
                        self.step();
                    }
                    let Some(Token::Characters(mut run)) = self.queue.pop_front() else {
                        continue;
                    };
                    while let Some(Token::Characters(more)) = self.queue.front() {
                        run.push_str(more);
                        let _ = self.queue.pop_front();
                    }
                    return Some(Token::Characters(run));
                }
                Some(_) => return self.queue.pop_front(),
                None if self.eof_emitted => return None,
                None => self.step(),
            }
        }
    }

    /// Run one step of the state machine: consume (or reconsume) one input
    /// character and act on it.
    fn step(&mut self) {
        if self.reconsume {
            self.reconsume = false;
        } else {
            self.current_input_character = self.consume();
        }
        let c = self.current_input_character;

        match self.state {
            TokenizerState::Data => self.handle_data_state(c),
            TokenizerState::Rcdata => self.handle_rcdata_state(c),
            TokenizerState::Rawtext | TokenizerState::ScriptData => {
                self.handle_rawtext_state(c);
            }
            TokenizerState::Plaintext => self.handle_plaintext_state(c),
            TokenizerState::TagOpen => self.handle_tag_open_state(c),
            TokenizerState::EndTagOpen => self.handle_end_tag_open_state(c),
            TokenizerState::TagName => self.handle_tag_name_state(c),
            TokenizerState::RawLessThanSign(kind) => self.handle_raw_less_than_sign_state(kind, c),
            TokenizerState::RawEndTagOpen(kind) => self.handle_raw_end_tag_open_state(kind, c),
            TokenizerState::RawEndTagName(kind) => self.handle_raw_end_tag_name_state(kind, c),
            TokenizerState::BeforeAttributeName => self.handle_before_attribute_name_state(c),
            TokenizerState::AttributeName => self.handle_attribute_name_state(c),
            TokenizerState::AfterAttributeName => self.handle_after_attribute_name_state(c),
            TokenizerState::BeforeAttributeValue => self.handle_before_attribute_value_state(c),
            TokenizerState::AttributeValueQuoted(quote) => {
                self.handle_attribute_value_quoted_state(quote, c);
            }
            TokenizerState::AttributeValueUnquoted => {
                self.handle_attribute_value_unquoted_state(c);
            }
            TokenizerState::AfterAttributeValueQuoted => {
                self.handle_after_attribute_value_quoted_state(c);
            }
            TokenizerState::SelfClosingStartTag => self.handle_self_closing_start_tag_state(c),
            TokenizerState::BogusComment => self.handle_bogus_comment_state(c),
            TokenizerState::CommentStart => self.handle_comment_start_state(c),
            TokenizerState::CommentStartDash => self.handle_comment_start_dash_state(c),
            TokenizerState::Comment => self.handle_comment_state(c),
            TokenizerState::CommentEndDash => self.handle_comment_end_dash_state(c),
            TokenizerState::CommentEnd => self.handle_comment_end_state(c),
            TokenizerState::CommentEndBang => self.handle_comment_end_bang_state(c),
            TokenizerState::Doctype => self.handle_doctype_state(c),
            TokenizerState::BeforeDoctypeName => self.handle_before_doctype_name_state(c),
            TokenizerState::DoctypeName => self.handle_doctype_name_state(c),
            TokenizerState::AfterDoctypeName => self.handle_after_doctype_name_state(c),
            TokenizerState::AfterDoctypeKeyword(kind) => {
                self.handle_after_doctype_keyword_state(kind, c);
            }
            TokenizerState::BeforeDoctypeIdentifier(kind) => {
                self.handle_before_doctype_identifier_state(kind, c);
            }
            TokenizerState::DoctypeIdentifierQuoted(kind, quote) => {
                self.handle_doctype_identifier_quoted_state(kind, quote, c);
            }
            TokenizerState::AfterDoctypeIdentifier(kind) => {
                self.handle_after_doctype_identifier_state(kind, c);
            }
            TokenizerState::BetweenDoctypePublicAndSystemIdentifiers => {
                self.handle_between_doctype_identifiers_state(c);
            }
            TokenizerState::BogusDoctype => self.handle_bogus_doctype_state(c),
            TokenizerState::CdataSection => self.handle_cdata_section_state(c),
            TokenizerState::CdataSectionBracket => self.handle_cdata_section_bracket_state(c),
            TokenizerState::CdataSectionEnd => self.handle_cdata_section_end_state(c),
        }
    }

    // =========================================================================
    // Text states
    // =========================================================================

    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    fn handle_data_state(&mut self, c: Option<char>) {
        match c {
            // "U+0026 AMPERSAND (&)"
            Some('&') => {
                let decoded = self.consume_character_reference(None);
                self.emit_str(&decoded);
            }
            // "U+003C LESS-THAN SIGN (<) - Switch to the tag open state."
            Some('<') => self.switch_to(TokenizerState::TagOpen),
            // "U+0000 NULL - This is an unexpected-null-character parse error.
            // Emit the current input character as a character token."
            Some('\0') => {
                self.error("unexpected-null-character");
                self.emit_char('\0');
            }
            Some(c) => self.emit_char(c),
            None => self.emit_eof(),
        }
    }

    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
    fn handle_rcdata_state(&mut self, c: Option<char>) {
        match c {
            Some('&') => {
                let decoded = self.consume_character_reference(None);
                self.emit_str(&decoded);
            }
            Some('<') => self.switch_to(TokenizerState::RawLessThanSign(RawKind::Rcdata)),
            Some('\0') => {
                self.error("unexpected-null-character");
                self.emit_char('\u{FFFD}');
            }
            Some(c) => self.emit_char(c),
            None => self.emit_eof(),
        }
    }

    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    /// and [§ 13.2.5.4 Script data state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-state)
    ///
    /// Script data is tokenized like RAWTEXT; the escaped sub-states only
    /// matter for `<!--` sequences inside scripts.
    fn handle_rawtext_state(&mut self, c: Option<char>) {
        let kind = if self.state == TokenizerState::ScriptData {
            RawKind::ScriptData
        } else {
            RawKind::Rawtext
        };
        match c {
            Some('<') => self.switch_to(TokenizerState::RawLessThanSign(kind)),
            Some('\0') => {
                self.error("unexpected-null-character");
                self.emit_char('\u{FFFD}');
            }
            Some(c) => self.emit_char(c),
            None => self.emit_eof(),
        }
    }

    /// [§ 13.2.5.5 PLAINTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#plaintext-state)
    fn handle_plaintext_state(&mut self, c: Option<char>) {
        match c {
            Some('\0') => {
                self.error("unexpected-null-character");
                self.emit_char('\u{FFFD}');
            }
            Some(c) => self.emit_char(c),
            None => self.emit_eof(),
        }
    }

    /// RCDATA, RAWTEXT and script data less-than sign states.
    fn handle_raw_less_than_sign_state(&mut self, kind: RawKind, c: Option<char>) {
        if c == Some('/') {
            // "Set the temporary buffer to the empty string. Switch to the ... end tag open state."
            self.temporary_buffer.clear();
            self.switch_to(TokenizerState::RawEndTagOpen(kind));
        } else {
            // "Emit a U+003C LESS-THAN SIGN character token. Reconsume in the ... state."
            self.emit_char('<');
            self.reconsume_in(kind.into());
        }
    }

    /// RCDATA, RAWTEXT and script data end tag open states.
    fn handle_raw_end_tag_open_state(&mut self, kind: RawKind, c: Option<char>) {
        match c {
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_tag = Some(Tag::end(""));
                self.reconsume_in(TokenizerState::RawEndTagName(kind));
            }
            _ => {
                self.emit_str("</");
                self.reconsume_in(kind.into());
            }
        }
    }

    /// RCDATA, RAWTEXT and script data end tag name states.
    ///
    /// "If the current end tag token is an appropriate end tag token" the tag
    /// is finished; otherwise everything consumed so far is emitted as text.
    fn handle_raw_end_tag_name_state(&mut self, kind: RawKind, c: Option<char>) {
        match c {
            Some(c) if is_whitespace(c) && self.is_appropriate_end_tag() => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') if self.is_appropriate_end_tag() => {
                self.switch_to(TokenizerState::SelfClosingStartTag);
            }
            Some('>') if self.is_appropriate_end_tag() => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_tag();
            }
            Some(c) if c.is_ascii_alphabetic() => {
                if let Some(tag) = self.current_tag.as_mut() {
                    tag.name.push(c.to_ascii_lowercase());
                }
                self.temporary_buffer.push(c);
            }
            _ => {
                // "Emit a U+003C LESS-THAN SIGN character token, a U+002F SOLIDUS
                // character token, and a character token for each of the characters
                // in the temporary buffer."
                let buffer = std::mem::take(&mut self.temporary_buffer);
                self.emit_str("</");
                self.emit_str(&buffer);
                self.current_tag = None;
                self.reconsume_in(kind.into());
            }
        }
    }

    // =========================================================================
    // Tag states
    // =========================================================================

    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    fn handle_tag_open_state(&mut self, c: Option<char>) {
        match c {
            // "U+0021 EXCLAMATION MARK (!) - Switch to the markup declaration open state."
            Some('!') => self.markup_declaration_open(),
            // "U+002F SOLIDUS (/) - Switch to the end tag open state."
            Some('/') => self.switch_to(TokenizerState::EndTagOpen),
            // "ASCII alpha - Create a new start tag token, set its tag name to the
            // empty string. Reconsume in the tag name state."
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_tag = Some(Tag::start(""));
                self.reconsume_in(TokenizerState::TagName);
            }
            Some('?') => {
                self.error("unexpected-question-mark-instead-of-tag-name");
                self.current_comment.clear();
                self.reconsume_in(TokenizerState::BogusComment);
            }
            None => {
                self.error("eof-before-tag-name");
                self.emit_char('<');
                self.emit_eof();
            }
            Some(_) => {
                self.error("invalid-first-character-of-tag-name");
                self.emit_char('<');
                self.reconsume_in(TokenizerState::Data);
            }
        }
    }

    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    fn handle_end_tag_open_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_tag = Some(Tag::end(""));
                self.reconsume_in(TokenizerState::TagName);
            }
            Some('>') => {
                self.error("missing-end-tag-name");
                self.switch_to(TokenizerState::Data);
            }
            None => {
                self.error("eof-before-tag-name");
                self.emit_str("</");
                self.emit_eof();
            }
            Some(_) => {
                self.error("invalid-first-character-of-tag-name");
                self.current_comment.clear();
                self.reconsume_in(TokenizerState::BogusComment);
            }
        }
    }

    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    fn handle_tag_name_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if is_whitespace(c) => self.switch_to(TokenizerState::BeforeAttributeName),
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_tag();
            }
            Some(c) => {
                let c = match c {
                    '\0' => {
                        self.error("unexpected-null-character");
                        '\u{FFFD}'
                    }
                    c => c.to_ascii_lowercase(),
                };
                if let Some(tag) = self.current_tag.as_mut() {
                    tag.name.push(c);
                }
            }
            None => self.eof_in_tag(),
        }
    }

    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    fn handle_before_attribute_name_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if is_whitespace(c) => {}
            Some('/' | '>') | None => self.reconsume_in(TokenizerState::AfterAttributeName),
            Some('=') => {
                self.error("unexpected-equals-sign-before-attribute-name");
                self.start_attribute();
                self.push_attribute_name('=');
                self.switch_to(TokenizerState::AttributeName);
            }
            Some(_) => {
                self.start_attribute();
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    fn handle_attribute_name_state(&mut self, c: Option<char>) {
        match c {
            Some('\t' | '\n' | '\x0C' | ' ' | '/' | '>') | None => {
                self.reconsume_in(TokenizerState::AfterAttributeName);
            }
            Some('=') => self.switch_to(TokenizerState::BeforeAttributeValue),
            Some('\0') => {
                self.error("unexpected-null-character");
                self.push_attribute_name('\u{FFFD}');
            }
            Some(c) => {
                if matches!(c, '"' | '\'' | '<') {
                    self.error("unexpected-character-in-attribute-name");
                }
                self.push_attribute_name(c.to_ascii_lowercase());
            }
        }
    }

    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    fn handle_after_attribute_name_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if is_whitespace(c) => {}
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('=') => self.switch_to(TokenizerState::BeforeAttributeValue),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_tag();
            }
            None => self.eof_in_tag(),
            Some(_) => {
                self.start_attribute();
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    fn handle_before_attribute_value_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if is_whitespace(c) => {}
            Some(quote @ ('"' | '\'')) => {
                self.switch_to(TokenizerState::AttributeValueQuoted(quote));
            }
            Some('>') => {
                self.error("missing-attribute-value");
                self.switch_to(TokenizerState::Data);
                self.emit_current_tag();
            }
            _ => self.reconsume_in(TokenizerState::AttributeValueUnquoted),
        }
    }

    /// § 13.2.5.36 and § 13.2.5.37: quoted attribute values.
    fn handle_attribute_value_quoted_state(&mut self, quote: char, c: Option<char>) {
        match c {
            Some(c) if c == quote => self.switch_to(TokenizerState::AfterAttributeValueQuoted),
            Some('&') => {
                let decoded = self.consume_character_reference(Some(quote));
                self.push_attribute_value(&decoded);
            }
            Some('\0') => {
                self.error("unexpected-null-character");
                self.push_attribute_value("\u{FFFD}");
            }
            Some(c) => self.push_attribute_value(c.encode_utf8(&mut [0; 4])),
            None => self.eof_in_tag(),
        }
    }

    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    fn handle_attribute_value_unquoted_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if is_whitespace(c) => self.switch_to(TokenizerState::BeforeAttributeName),
            Some('&') => {
                let decoded = self.consume_character_reference(Some('>'));
                self.push_attribute_value(&decoded);
            }
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_tag();
            }
            Some('\0') => {
                self.error("unexpected-null-character");
                self.push_attribute_value("\u{FFFD}");
            }
            Some(c) => {
                if matches!(c, '"' | '\'' | '<' | '=' | '`') {
                    self.error("unexpected-character-in-unquoted-attribute-value");
                }
                self.push_attribute_value(c.encode_utf8(&mut [0; 4]));
            }
            None => self.eof_in_tag(),
        }
    }

    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    fn handle_after_attribute_value_quoted_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if is_whitespace(c) => self.switch_to(TokenizerState::BeforeAttributeName),
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_tag();
            }
            None => self.eof_in_tag(),
            Some(_) => {
                self.error("missing-whitespace-between-attributes");
                self.reconsume_in(TokenizerState::BeforeAttributeName);
            }
        }
    }

    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    fn handle_self_closing_start_tag_state(&mut self, c: Option<char>) {
        match c {
            // "Set the self-closing flag of the current tag token. Switch to the
            // data state. Emit the current tag token."
            Some('>') => {
                if let Some(tag) = self.current_tag.as_mut() {
                    tag.self_closing = true;
                }
                self.switch_to(TokenizerState::Data);
                self.emit_current_tag();
            }
            None => self.eof_in_tag(),
            Some(_) => {
                self.error("unexpected-solidus-in-tag");
                self.reconsume_in(TokenizerState::BeforeAttributeName);
            }
        }
    }

    // =========================================================================
    // Comment states
    // =========================================================================

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    ///
    /// Entered right after `<!`; looks ahead without consuming.
    fn markup_declaration_open(&mut self) {
        if self.next_few_characters_are("--", false) {
            self.pos += 2;
            self.current_comment.clear();
            self.switch_to(TokenizerState::CommentStart);
        } else if self.next_few_characters_are("DOCTYPE", true) {
            self.pos += 7;
            self.switch_to(TokenizerState::Doctype);
        } else if self.next_few_characters_are("[CDATA[", false) {
            self.pos += 7;
            if self.cdata_allowed {
                self.switch_to(TokenizerState::CdataSection);
            } else {
                self.error("cdata-in-html-content");
                self.current_comment = "[CDATA[".to_string();
                self.switch_to(TokenizerState::BogusComment);
            }
        } else {
            self.error("incorrectly-opened-comment");
            self.current_comment.clear();
            self.switch_to(TokenizerState::BogusComment);
        }
    }

    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    fn handle_bogus_comment_state(&mut self, c: Option<char>) {
        match c {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_comment();
            }
            Some('\0') => {
                self.error("unexpected-null-character");
                self.current_comment.push('\u{FFFD}');
            }
            Some(c) => self.current_comment.push(c),
            None => {
                self.emit_comment();
                self.emit_eof();
            }
        }
    }

    /// [§ 13.2.5.43 Comment start state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
    fn handle_comment_start_state(&mut self, c: Option<char>) {
        match c {
            Some('-') => self.switch_to(TokenizerState::CommentStartDash),
            Some('>') => {
                self.error("abrupt-closing-of-empty-comment");
                self.switch_to(TokenizerState::Data);
                self.emit_comment();
            }
            _ => self.reconsume_in(TokenizerState::Comment),
        }
    }

    /// [§ 13.2.5.44 Comment start dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-dash-state)
    fn handle_comment_start_dash_state(&mut self, c: Option<char>) {
        match c {
            Some('-') => self.switch_to(TokenizerState::CommentEnd),
            Some('>') => {
                self.error("abrupt-closing-of-empty-comment");
                self.switch_to(TokenizerState::Data);
                self.emit_comment();
            }
            None => self.eof_in_comment(),
            Some(_) => {
                self.current_comment.push('-');
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    ///
    /// The comment less-than sign states only report nested comments, so `<`
    /// is appended directly.
    fn handle_comment_state(&mut self, c: Option<char>) {
        match c {
            Some('-') => self.switch_to(TokenizerState::CommentEndDash),
            Some('\0') => {
                self.error("unexpected-null-character");
                self.current_comment.push('\u{FFFD}');
            }
            Some(c) => self.current_comment.push(c),
            None => self.eof_in_comment(),
        }
    }

    /// [§ 13.2.5.50 Comment end dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-dash-state)
    fn handle_comment_end_dash_state(&mut self, c: Option<char>) {
        match c {
            Some('-') => self.switch_to(TokenizerState::CommentEnd),
            None => self.eof_in_comment(),
            Some(_) => {
                self.current_comment.push('-');
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.51 Comment end state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-state)
    fn handle_comment_end_state(&mut self, c: Option<char>) {
        match c {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_comment();
            }
            Some('!') => self.switch_to(TokenizerState::CommentEndBang),
            Some('-') => self.current_comment.push('-'),
            None => self.eof_in_comment(),
            Some(_) => {
                self.current_comment.push_str("--");
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.52 Comment end bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-bang-state)
    fn handle_comment_end_bang_state(&mut self, c: Option<char>) {
        match c {
            Some('-') => {
                self.current_comment.push_str("--!");
                self.switch_to(TokenizerState::CommentEndDash);
            }
            Some('>') => {
                self.error("incorrectly-closed-comment");
                self.switch_to(TokenizerState::Data);
                self.emit_comment();
            }
            None => self.eof_in_comment(),
            Some(_) => {
                self.current_comment.push_str("--!");
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    // =========================================================================
    // DOCTYPE states
    // =========================================================================

    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    fn handle_doctype_state(&mut self, c: Option<char>) {
        self.current_doctype = Doctype::default();
        match c {
            Some(c) if is_whitespace(c) => self.switch_to(TokenizerState::BeforeDoctypeName),
            Some('>') => self.reconsume_in(TokenizerState::BeforeDoctypeName),
            None => self.eof_in_doctype(),
            Some(_) => {
                self.error("missing-whitespace-before-doctype-name");
                self.reconsume_in(TokenizerState::BeforeDoctypeName);
            }
        }
    }

    /// [§ 13.2.5.54 Before DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-name-state)
    fn handle_before_doctype_name_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if is_whitespace(c) => {}
            Some('>') => {
                self.error("missing-doctype-name");
                self.current_doctype.force_quirks = true;
                self.switch_to(TokenizerState::Data);
                self.emit_doctype();
            }
            None => self.eof_in_doctype(),
            Some(c) => {
                let c = if c == '\0' {
                    self.error("unexpected-null-character");
                    '\u{FFFD}'
                } else {
                    c.to_ascii_lowercase()
                };
                self.current_doctype.name = Some(c.to_string());
                self.switch_to(TokenizerState::DoctypeName);
            }
        }
    }

    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    fn handle_doctype_name_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if is_whitespace(c) => self.switch_to(TokenizerState::AfterDoctypeName),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_doctype();
            }
            None => self.eof_in_doctype(),
            Some(c) => {
                let c = if c == '\0' {
                    self.error("unexpected-null-character");
                    '\u{FFFD}'
                } else {
                    c.to_ascii_lowercase()
                };
                self.current_doctype
                    .name
                    .get_or_insert_with(String::new)
                    .push(c);
            }
        }
    }

    /// [§ 13.2.5.56 After DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-name-state)
    fn handle_after_doctype_name_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if is_whitespace(c) => {}
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_doctype();
            }
            None => self.eof_in_doctype(),
            Some(c) => {
                // "If the six characters starting from the current input character
                // are an ASCII case-insensitive match for the word "PUBLIC"..."
                if c.eq_ignore_ascii_case(&'p') && self.next_few_characters_are("UBLIC", true) {
                    self.pos += 5;
                    self.switch_to(TokenizerState::AfterDoctypeKeyword(IdKind::Public));
                } else if c.eq_ignore_ascii_case(&'s')
                    && self.next_few_characters_are("YSTEM", true)
                {
                    self.pos += 5;
                    self.switch_to(TokenizerState::AfterDoctypeKeyword(IdKind::System));
                } else {
                    self.error("invalid-character-sequence-after-doctype-name");
                    self.current_doctype.force_quirks = true;
                    self.reconsume_in(TokenizerState::BogusDoctype);
                }
            }
        }
    }

    /// § 13.2.5.57 and § 13.2.5.63: after the PUBLIC or SYSTEM keyword.
    fn handle_after_doctype_keyword_state(&mut self, kind: IdKind, c: Option<char>) {
        match c {
            Some(c) if is_whitespace(c) => {
                self.switch_to(TokenizerState::BeforeDoctypeIdentifier(kind));
            }
            Some(quote @ ('"' | '\'')) => {
                self.error(match kind {
                    IdKind::Public => "missing-whitespace-after-doctype-public-keyword",
                    IdKind::System => "missing-whitespace-after-doctype-system-keyword",
                });
                self.begin_doctype_identifier(kind, quote);
            }
            _ => self.doctype_identifier_missing(kind, c),
        }
    }

    /// § 13.2.5.58 and § 13.2.5.64: before a DOCTYPE identifier.
    fn handle_before_doctype_identifier_state(&mut self, kind: IdKind, c: Option<char>) {
        match c {
            Some(c) if is_whitespace(c) => {}
            Some(quote @ ('"' | '\'')) => self.begin_doctype_identifier(kind, quote),
            _ => self.doctype_identifier_missing(kind, c),
        }
    }

    fn begin_doctype_identifier(&mut self, kind: IdKind, quote: char) {
        *self.doctype_identifier(kind) = Some(String::new());
        self.switch_to(TokenizerState::DoctypeIdentifierQuoted(kind, quote));
    }

    /// The shared `>`, EOF and "anything else" branches of the states that
    /// expect an identifier to start.
    fn doctype_identifier_missing(&mut self, kind: IdKind, c: Option<char>) {
        match c {
            Some('>') => {
                self.error(match kind {
                    IdKind::Public => "missing-doctype-public-identifier",
                    IdKind::System => "missing-doctype-system-identifier",
                });
                self.current_doctype.force_quirks = true;
                self.switch_to(TokenizerState::Data);
                self.emit_doctype();
            }
            None => self.eof_in_doctype(),
            Some(_) => {
                self.error(match kind {
                    IdKind::Public => "missing-quote-before-doctype-public-identifier",
                    IdKind::System => "missing-quote-before-doctype-system-identifier",
                });
                self.current_doctype.force_quirks = true;
                self.reconsume_in(TokenizerState::BogusDoctype);
            }
        }
    }

    /// § 13.2.5.59-60 and § 13.2.5.65-66: quoted DOCTYPE identifiers.
    fn handle_doctype_identifier_quoted_state(&mut self, kind: IdKind, quote: char, c: Option<char>) {
        match c {
            Some(c) if c == quote => self.switch_to(TokenizerState::AfterDoctypeIdentifier(kind)),
            Some('>') => {
                self.error(match kind {
                    IdKind::Public => "abrupt-doctype-public-identifier",
                    IdKind::System => "abrupt-doctype-system-identifier",
                });
                self.current_doctype.force_quirks = true;
                self.switch_to(TokenizerState::Data);
                self.emit_doctype();
            }
            None => self.eof_in_doctype(),
            Some(c) => {
                let c = if c == '\0' {
                    self.error("unexpected-null-character");
                    '\u{FFFD}'
                } else {
                    c
                };
                self.doctype_identifier(kind)
                    .get_or_insert_with(String::new)
                    .push(c);
            }
        }
    }

    /// § 13.2.5.61 and § 13.2.5.67: after a DOCTYPE identifier.
    fn handle_after_doctype_identifier_state(&mut self, kind: IdKind, c: Option<char>) {
        match (kind, c) {
            (IdKind::Public, Some(c)) if is_whitespace(c) => {
                self.switch_to(TokenizerState::BetweenDoctypePublicAndSystemIdentifiers);
            }
            (IdKind::System, Some(c)) if is_whitespace(c) => {}
            (_, Some('>')) => {
                self.switch_to(TokenizerState::Data);
                self.emit_doctype();
            }
            (IdKind::Public, Some(quote @ ('"' | '\''))) => {
                self.error("missing-whitespace-between-doctype-public-and-system-identifiers");
                self.begin_doctype_identifier(IdKind::System, quote);
            }
            (_, None) => self.eof_in_doctype(),
            (IdKind::Public, Some(_)) => {
                self.error("missing-quote-before-doctype-system-identifier");
                self.current_doctype.force_quirks = true;
                self.reconsume_in(TokenizerState::BogusDoctype);
            }
            (IdKind::System, Some(_)) => {
                // "This does not set the current DOCTYPE token's force-quirks flag to on."
                self.error("unexpected-character-after-doctype-system-identifier");
                self.reconsume_in(TokenizerState::BogusDoctype);
            }
        }
    }

    /// [§ 13.2.5.62 Between DOCTYPE public and system identifiers state](https://html.spec.whatwg.org/multipage/parsing.html#between-doctype-public-and-system-identifiers-state)
    fn handle_between_doctype_identifiers_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if is_whitespace(c) => {}
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_doctype();
            }
            Some(quote @ ('"' | '\'')) => self.begin_doctype_identifier(IdKind::System, quote),
            _ => self.doctype_identifier_missing(IdKind::System, c),
        }
    }

    /// [§ 13.2.5.68 Bogus DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-doctype-state)
    fn handle_bogus_doctype_state(&mut self, c: Option<char>) {
        match c {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_doctype();
            }
            Some('\0') => self.error("unexpected-null-character"),
            Some(_) => {}
            None => {
                self.emit_doctype();
                self.emit_eof();
            }
        }
    }

    // =========================================================================
    // CDATA states
    // =========================================================================

    /// [§ 13.2.5.69 CDATA section state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-state)
    fn handle_cdata_section_state(&mut self, c: Option<char>) {
        match c {
            Some(']') => self.switch_to(TokenizerState::CdataSectionBracket),
            Some(c) => self.emit_char(c),
            None => {
                self.error("eof-in-cdata");
                self.emit_eof();
            }
        }
    }

    /// [§ 13.2.5.70 CDATA section bracket state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-bracket-state)
    fn handle_cdata_section_bracket_state(&mut self, c: Option<char>) {
        if c == Some(']') {
            self.switch_to(TokenizerState::CdataSectionEnd);
        } else {
            self.emit_char(']');
            self.reconsume_in(TokenizerState::CdataSection);
        }
    }

    /// [§ 13.2.5.71 CDATA section end state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-end-state)
    fn handle_cdata_section_end_state(&mut self, c: Option<char>) {
        match c {
            Some(']') => self.emit_char(']'),
            Some('>') => self.switch_to(TokenizerState::Data),
            _ => {
                self.emit_str("]]");
                self.reconsume_in(TokenizerState::CdataSection);
            }
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// "ASCII whitespace" as seen by the tokenizer, after newline normalization.
const fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0C')
}

impl Tokenizer {
    /// "Switch to the X state"
    const fn switch_to(&mut self, new_state: TokenizerState) {
        self.state = new_state;
    }

    /// "Reconsume in the X state"
    const fn reconsume_in(&mut self, new_state: TokenizerState) {
        self.reconsume = true;
        self.state = new_state;
    }

    /// "Consume the next input character"
    pub(super) fn consume(&mut self) -> Option<char> {
        let c = self.input.get(self.pos).copied()?;
        self.pos += 1;
        Some(c)
    }

    /// Look at the input `offset` characters past the current position.
    pub(super) fn peek(&self, offset: usize) -> Option<char> {
        self.input.get(self.pos + offset).copied()
    }

    /// "If the next few characters are..."
    fn next_few_characters_are(&self, target: &str, ignore_case: bool) -> bool {
        target.chars().enumerate().all(|(i, expected)| {
            self.peek(i).is_some_and(|c| {
                if ignore_case {
                    c.eq_ignore_ascii_case(&expected)
                } else {
                    c == expected
                }
            })
        })
    }

    /// Record a tokenizer parse error. It travels to the tree builder in the
    /// token stream.
    pub(super) fn error(&mut self, code: &'static str) {
        log::trace!(target: "wombat::tokenizer", "parse error {code} at {}", self.pos);
        self.queue.push_back(Token::ParseError(code.to_string()));
    }

    /// "Emit the current input character as a character token."
    pub(super) fn emit_char(&mut self, c: char) {
        if let Some(Token::Characters(run)) = self.queue.back_mut() {
            run.push(c);
        } else {
            self.queue.push_back(Token::Characters(c.to_string()));
        }
    }

    pub(super) fn emit_str(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        if let Some(Token::Characters(run)) = self.queue.back_mut() {
            run.push_str(s);
        } else {
            self.queue.push_back(Token::Characters(s.to_string()));
        }
    }

    /// "Emit an end-of-file token."
    fn emit_eof(&mut self) {
        self.queue.push_back(Token::EndOfFile);
        self.eof_emitted = true;
    }

    /// "Emit the current tag token."
    fn emit_current_tag(&mut self) {
        self.finish_attribute();
        let Some(tag) = self.current_tag.take() else {
            return;
        };
        match tag.kind {
            TagKind::Start => self.last_start_tag_name = Some(tag.name.clone()),
            TagKind::End => {
                if !tag.attrs.is_empty() {
                    self.error("end-tag-with-attributes");
                }
                if tag.self_closing {
                    self.error("end-tag-with-trailing-solidus");
                }
            }
        }
        self.queue.push_back(Token::Tag(tag));
    }

    fn emit_comment(&mut self) {
        let data = std::mem::take(&mut self.current_comment);
        self.queue.push_back(Token::Comment(data));
    }

    fn emit_doctype(&mut self) {
        let doctype = std::mem::take(&mut self.current_doctype);
        self.queue.push_back(Token::Doctype(doctype));
    }

    /// "This is an eof-in-tag parse error. Emit an end-of-file token."
    fn eof_in_tag(&mut self) {
        self.error("eof-in-tag");
        self.current_tag = None;
        self.current_attribute = None;
        self.emit_eof();
    }

    fn eof_in_comment(&mut self) {
        self.error("eof-in-comment");
        self.emit_comment();
        self.emit_eof();
    }

    /// "Set the current DOCTYPE token's force-quirks flag to on. Emit the current
    /// DOCTYPE token. Emit an end-of-file token."
    fn eof_in_doctype(&mut self) {
        self.error("eof-in-doctype");
        self.current_doctype.force_quirks = true;
        self.emit_doctype();
        self.emit_eof();
    }

    const fn doctype_identifier(&mut self, kind: IdKind) -> &mut Option<String> {
        match kind {
            IdKind::Public => &mut self.current_doctype.public_id,
            IdKind::System => &mut self.current_doctype.system_id,
        }
    }

    /// "An appropriate end tag token is an end tag token whose tag name matches
    /// the tag name of the last start tag to have been emitted from this
    /// tokenizer, if any."
    fn is_appropriate_end_tag(&self) -> bool {
        match (&self.last_start_tag_name, &self.current_tag) {
            (Some(last), Some(tag)) => tag.kind == TagKind::End && &tag.name == last,
            _ => false,
        }
    }

    /// "Start a new attribute in the current tag token."
    fn start_attribute(&mut self) {
        self.finish_attribute();
        self.current_attribute = Some(Attribute::new("", ""));
    }

    fn push_attribute_name(&mut self, c: char) {
        if let Some(attr) = self.current_attribute.as_mut() {
            attr.name.push(c);
        }
    }

    pub(super) fn push_attribute_value(&mut self, s: &str) {
        if let Some(attr) = self.current_attribute.as_mut() {
            attr.value.push_str(s);
        }
    }

    /// "When the user agent leaves the attribute name state... if there is
    /// already an attribute on the token with the exact same name, then this is
    /// a duplicate-attribute parse error and the new attribute must be removed
    /// from the token."
    fn finish_attribute(&mut self) {
        let Some(attr) = self.current_attribute.take() else {
            return;
        };
        let Some(tag) = self.current_tag.as_mut() else {
            return;
        };
        if tag.attrs.iter().any(|existing| existing.name == attr.name) {
            self.error("duplicate-attribute");
        } else {
            tag.attrs.push(attr);
        }
    }
}

impl Iterator for Tokenizer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}
