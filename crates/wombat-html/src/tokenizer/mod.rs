//! HTML tokenizer module.
//!
//! Implements [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//! of the WHATWG HTML Living Standard as a pull tokenizer: the caller asks for
//! one token at a time and may switch the lexical mode in between, which is
//! how the tree builder drives RCDATA, RAWTEXT, script data and PLAINTEXT.

/// Character reference decoding per § 13.2.5.72.
mod char_ref;
/// The tokenizer state machine.
mod core;
/// Named character reference table per § 13.5.
pub mod entities;
/// Token types produced by the tokenizer.
pub mod token;

pub use self::core::Tokenizer;
pub use token::{Doctype, LexicalMode, Tag, TagKind, Token};
