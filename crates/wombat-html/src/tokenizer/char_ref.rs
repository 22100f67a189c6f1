use super::core::Tokenizer;
use super::entities::longest_match;

/// Longest run of alphanumerics considered when matching a named reference.
const MAX_NAME_SCAN: usize = 40;

/// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
///
/// "If the number is one of the numbers in the first column of the following
/// table, then find the row with that number in the first column, and set the
/// character reference code to the number in the second column of that row."
const C1_REPLACEMENTS: [(u32, char); 27] = [
    (0x80, '\u{20AC}'),
    (0x82, '\u{201A}'),
    (0x83, '\u{0192}'),
    (0x84, '\u{201E}'),
    (0x85, '\u{2026}'),
    (0x86, '\u{2020}'),
    (0x87, '\u{2021}'),
    (0x88, '\u{02C6}'),
    (0x89, '\u{2030}'),
    (0x8A, '\u{0160}'),
    (0x8B, '\u{2039}'),
    (0x8C, '\u{0152}'),
    (0x8E, '\u{017D}'),
    (0x91, '\u{2018}'),
    (0x92, '\u{2019}'),
    (0x93, '\u{201C}'),
    (0x94, '\u{201D}'),
    (0x95, '\u{2022}'),
    (0x96, '\u{2013}'),
    (0x97, '\u{2014}'),
    (0x98, '\u{02DC}'),
    (0x99, '\u{2122}'),
    (0x9A, '\u{0161}'),
    (0x9B, '\u{203A}'),
    (0x9C, '\u{0153}'),
    (0x9E, '\u{017E}'),
    (0x9F, '\u{0178}'),
];

impl Tokenizer {
    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    ///
    /// Called right after a `&` has been consumed. Returns the text the
    /// reference stands for, which is `&` itself when nothing matched.
    ///
    /// `additional_allowed` is the attribute's quote character (or `>` for
    /// unquoted values) and is `None` outside attributes. Inside attributes,
    /// a legacy reference without a semicolon followed by `=` or an
    /// alphanumeric is left alone.
    pub(super) fn consume_character_reference(&mut self, additional_allowed: Option<char>) -> String {
        let in_attribute = additional_allowed.is_some();
        match self.peek(0) {
            Some('#') => {
                self.pos += 1;
                self.consume_numeric_character_reference()
            }
            Some(c) if c.is_ascii_alphanumeric() => self.consume_named_character_reference(in_attribute),
            // "Flush code points consumed as a character reference. Reconsume in
            // the return state."
            _ => "&".to_string(),
        }
    }

    /// [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
    fn consume_named_character_reference(&mut self, in_attribute: bool) -> String {
        let mut candidate: Vec<char> = Vec::new();
        while candidate.len() < MAX_NAME_SCAN {
            match self.peek(candidate.len()) {
                Some(c) if c.is_ascii_alphanumeric() => candidate.push(c),
                Some(';') => {
                    candidate.push(';');
                    break;
                }
                _ => break,
            }
        }

        let Some((len, value)) = longest_match(&candidate) else {
            // [§ 13.2.5.74 Ambiguous ampersand state]
            // The alphanumerics are consumed as ordinary text by the return state.
            let alnum_len = candidate.iter().take_while(|c| c.is_ascii_alphanumeric()).count();
            if self.peek(alnum_len) == Some(';') {
                self.error("unknown-named-character-reference");
            }
            return "&".to_string();
        };

        let ends_with_semicolon = candidate.get(len - 1) == Some(&';');
        if !ends_with_semicolon && in_attribute {
            // "If the character reference was consumed as part of an attribute, and
            // the last character matched is not a U+003B SEMICOLON character (;),
            // and the next input character is either a U+003D EQUALS SIGN character
            // (=) or an ASCII alphanumeric, then, for historical reasons, flush code
            // points consumed as a character reference and switch to the return state."
            if self.peek(len).is_some_and(|c| c == '=' || c.is_ascii_alphanumeric()) {
                return "&".to_string();
            }
        }

        if !ends_with_semicolon {
            self.error("missing-semicolon-after-character-reference");
        }
        self.pos += len;
        value.to_string()
    }

    /// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
    /// through § 13.2.5.80. The `#` has been consumed.
    fn consume_numeric_character_reference(&mut self) -> String {
        let mut prefix = String::from("&#");
        let radix = match self.peek(0) {
            Some(x @ ('x' | 'X')) => {
                self.pos += 1;
                prefix.push(x);
                16
            }
            _ => 10,
        };

        let mut code: u32 = 0;
        let mut digits = 0;
        while let Some(digit) = self.peek(0).and_then(|c| c.to_digit(radix)) {
            self.pos += 1;
            digits += 1;
            // Clamp so that absurdly long references stay out of range.
            code = code.saturating_mul(radix).saturating_add(digit).min(0x11_0000);
        }

        if digits == 0 {
            // "absence-of-digits-in-numeric-character-reference parse error. Flush
            // code points consumed as a character reference."
            self.error("absence-of-digits-in-numeric-character-reference");
            return prefix;
        }

        if self.peek(0) == Some(';') {
            self.pos += 1;
        } else {
            self.error("missing-semicolon-after-character-reference");
        }

        self.numeric_reference_to_char(code).to_string()
    }

    /// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
    fn numeric_reference_to_char(&mut self, code: u32) -> char {
        if code == 0 {
            self.error("null-character-reference");
            return '\u{FFFD}';
        }
        if code > 0x10_FFFF {
            self.error("character-reference-outside-unicode-range");
            return '\u{FFFD}';
        }
        if (0xD800..=0xDFFF).contains(&code) {
            self.error("surrogate-character-reference");
            return '\u{FFFD}';
        }
        if is_noncharacter(code) {
            self.error("noncharacter-character-reference");
        }
        let is_control = code == 0x0D
            || ((code < 0x20 || (0x7F..=0x9F).contains(&code))
                && !matches!(code, 0x09 | 0x0A | 0x0C | 0x20));
        if is_control {
            self.error("control-character-reference");
            if let Some(&(_, replacement)) = C1_REPLACEMENTS.iter().find(|(n, _)| *n == code) {
                return replacement;
            }
        }
        char::from_u32(code).unwrap_or('\u{FFFD}')
    }
}

/// "A noncharacter is a code point that is in the range U+FDD0 to U+FDEF,
/// inclusive, or U+FFFE, U+FFFF, U+1FFFE, U+1FFFF, ... U+10FFFE, or U+10FFFF."
fn is_noncharacter(code: u32) -> bool {
    (0xFDD0..=0xFDEF).contains(&code) || (code & 0xFFFE) == 0xFFFE
}

#[cfg(test)]
mod tests {
    use crate::tokenizer::{Token, Tokenizer};

    fn text_of(input: &str) -> String {
        Tokenizer::new(input)
            .filter_map(|token| match token {
                Token::Characters(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn decodes_numeric_references() {
        assert_eq!(text_of("&#65;&#x42;&#X43;"), "ABC");
        assert_eq!(text_of("&#0;"), "\u{FFFD}");
        assert_eq!(text_of("&#x110000;"), "\u{FFFD}");
        assert_eq!(text_of("&#xD800;"), "\u{FFFD}");
    }

    #[test]
    fn maps_c1_controls_to_windows_1252() {
        assert_eq!(text_of("&#x80;"), "\u{20AC}");
        assert_eq!(text_of("&#150;"), "\u{2013}");
    }

    #[test]
    fn reference_without_digits_is_literal() {
        assert_eq!(text_of("&#;"), "&#;");
        assert_eq!(text_of("&#xg"), "&#xg");
    }

    #[test]
    fn legacy_reference_in_attribute_followed_by_alnum_is_literal() {
        let mut tokenizer = Tokenizer::new("<a href='?a=1&copy=2&not;'>");
        let Some(Token::Tag(tag)) = tokenizer.next_token() else {
            panic!("expected a tag");
        };
        assert_eq!(tag.get_attribute("href"), Some("?a=1&copy=2\u{00AC}"));
    }

    #[test]
    fn unknown_named_reference_is_literal() {
        assert_eq!(text_of("&bogus; &amp"), "&bogus; &");
    }
}
