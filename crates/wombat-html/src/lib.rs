//! HTML tree construction for Wombat.
//!
//! # Scope
//!
//! This crate implements:
//! - **Tree Builder** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - All 23 insertion modes, including "in head noscript" and "in select in table"
//!   - Stack of open elements with default, button, list item, table and select scope
//!   - List of active formatting elements, reconstruction and the adoption agency algorithm
//!   - Foster parenting and table text buffering
//!   - Foreign content (SVG and MathML) with integration points and breakout
//!   - Template contents and the stack of template insertion modes
//!   - DOCTYPE quirks-mode classification
//!   - Fragment parsing with a context element
//!
//! - **Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - A pull tokenizer feeding the tree builder, honouring the lexical mode
//!     switches the builder requests
//!
//! # Not Implemented
//!
//! - Script execution (the "script" end tag only pops the element)
//! - The script data escaped sub-states of the tokenizer
//! - Form owner association

/// High-level entry points that wire the tokenizer to the tree builder.
pub mod driver;
/// Parser configuration.
pub mod opts;
/// HTML tokenizer producing the token stream consumed by the tree builder.
pub mod tokenizer;
/// The tree construction stage.
pub mod tree_builder;

pub use driver::{ParsedDocument, parse_document, parse_fragment, parse_tokens};
pub use opts::ParseOpts;
pub use tokenizer::{LexicalMode, Tag, TagKind, Token, Tokenizer};
pub use tree_builder::{
    FragmentContext, InsertionMode, ParseError, ParseErrorKind, TokenSinkResult, TreeBuilder,
};
