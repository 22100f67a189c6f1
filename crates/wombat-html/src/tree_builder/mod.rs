//! [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
//!
//! The [`TreeBuilder`] consumes tokens one at a time and grows a [`DomTree`].
//! Every insertion mode is a method returning a [`ProcessResult`]; the
//! dispatcher in [`TreeBuilder::process_token`] loops on "reprocess"
//! results instead of recursing.

mod adoption;
mod errors;
mod foreign;
mod formatting;
mod insertion;
/// DOCTYPE classification.
pub mod quirks;
mod reset;
mod rules;
mod stack;
mod tags;
mod types;

use log::{debug, trace};
use wombat_common::warning::warn_once;
use wombat_dom::{DomTree, ElementData, Namespace, NodeId, QuirksMode};

pub use errors::{ParseError, ParseErrorKind};
pub(crate) use types::ProcessResult;
pub use types::{ContextParseError, FragmentContext, InsertionMode, TokenSinkResult};

use self::formatting::ActiveFormattingElements;
use self::stack::{OpenElements, ScopeKind};
use self::tags::{IMPLIED_END_TAGS, IMPLIED_END_TAGS_THOROUGH};
use crate::opts::ParseOpts;
use crate::tokenizer::{Tag, TagKind, Token};

/// The tree construction stage of the HTML parser.
///
/// Owns the document being built along with the parser state the HTML
/// standard describes in § 13.2.4: the insertion mode, the stack of open
/// elements, the list of active formatting elements, the element pointers
/// and the flags.
pub struct TreeBuilder {
    opts: ParseOpts,

    /// The document (or, for fragments, the scratch document) being built.
    tree: DomTree,

    /// Append-only parse error log.
    errors: Vec<ParseError>,

    /// How many tokens have been handed to [`Self::process_token`].
    tokens_seen: usize,

    /// Set once the "stop parsing" steps have run.
    stopped: bool,

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#insertion-mode)
    mode: InsertionMode,

    /// "the original insertion mode", used by "text" and "in table text".
    original_mode: InsertionMode,

    /// "the stack of template insertion modes"
    template_modes: Vec<InsertionMode>,

    open_elements: OpenElements,

    active_formatting: ActiveFormattingElements,

    /// [§ 13.2.4.4 The element pointers](https://html.spec.whatwg.org/multipage/parsing.html#the-element-pointers)
    ///
    /// "Once a head element has been parsed (whether implicitly or explicitly)
    /// the head element pointer gets set to point to this node."
    head_element: Option<NodeId>,

    /// "The form element pointer points to the last form element that was
    /// opened and whose end tag has not yet been seen."
    form_element: Option<NodeId>,

    /// [§ 13.2.4.5 Other parsing state flags](https://html.spec.whatwg.org/multipage/parsing.html#frameset-ok-flag)
    ///
    /// "The frameset-ok flag is set to "ok" when the parser is created. It is
    /// set to "not ok" after certain tokens are seen."
    frameset_ok: bool,

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    foster_parenting: bool,

    /// Drop a U+000A at the start of the next character token (`pre`,
    /// `listing`, `textarea`).
    ignore_lf: bool,

    /// "pending table character tokens"
    pending_table_text: String,

    /// The context element when parsing a fragment. Lives in the arena but
    /// is never attached to the document.
    context_element: Option<NodeId>,
}

impl TreeBuilder {
    /// A builder for a full document.
    #[must_use]
    pub fn new(opts: ParseOpts) -> Self {
        Self {
            opts,
            tree: DomTree::new(),
            errors: Vec::new(),
            tokens_seen: 0,
            stopped: false,
            mode: InsertionMode::Initial,
            original_mode: InsertionMode::Initial,
            template_modes: Vec::new(),
            open_elements: OpenElements::default(),
            active_formatting: ActiveFormattingElements::default(),
            head_element: None,
            form_element: None,
            frameset_ok: true,
            foster_parenting: false,
            ignore_lf: false,
            pending_table_text: String::new(),
            context_element: None,
        }
    }

    /// [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
    ///
    /// A builder for the fragment parsing algorithm. The caller is
    /// responsible for putting the tokenizer in the state given by
    /// [`FragmentContext::lexical_mode`].
    #[must_use]
    pub fn new_for_fragment(context: &FragmentContext, opts: ParseOpts) -> Self {
        let mut builder = Self::new(opts);

        // STEP 3: "If the context element's node document is in quirks mode,
        //          then let the Document be in quirks mode." A synthetic
        //          context has no node document, so the default stands.

        // STEP 4: "Let root be the result of creating an element given document,
        //          "html", and the HTML namespace."
        // STEP 5: "Append the element root to the Document node created above."
        let root = builder
            .tree
            .alloc_element(ElementData::new(Namespace::Html, "html"));
        builder.tree.append_child(NodeId::ROOT, root);

        // STEP 6: "Set up the HTML parser's stack of open elements so that it
        //          contains just the single element root."
        builder.open_elements.push(root);

        let context_element = builder
            .tree
            .alloc_element(ElementData::new(context.namespace, &context.name));
        builder.context_element = Some(context_element);

        // STEP 7: "If the context element is a template element, then push
        //          "in template" onto the stack of template insertion modes so
        //          that it is the new current template insertion mode."
        if context.namespace == Namespace::Html && context.name == "template" {
            builder.template_modes.push(InsertionMode::InTemplate);
        }

        // STEP 9: "Reset the parser's insertion mode appropriately."
        builder.reset_insertion_mode();

        // STEP 10: "Set the parser's form element pointer to the nearest node to
        //           the context element that is a form element." The synthetic
        //           context has no ancestors.
        trace!(target: "wombat::tree_builder", "fragment context {} starts in {}", context.name, builder.mode);
        builder
    }

    /// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction-dispatcher)
    ///
    /// Feed one token. The returned value tells the caller whether the
    /// tokenizer has to change lexical mode before producing the next token.
    pub fn process_token(&mut self, token: Token) -> TokenSinkResult {
        self.tokens_seen += 1;
        if self.stopped {
            return TokenSinkResult::Continue;
        }

        let mut token = match token {
            Token::ParseError(code) => {
                self.error_with(ParseErrorKind::Tokenizer, &code);
                return TokenSinkResult::Continue;
            }
            Token::Characters(text) if self.ignore_lf => {
                self.ignore_lf = false;
                match text.strip_prefix('\n') {
                    Some("") => return TokenSinkResult::Continue,
                    Some(rest) => Token::Characters(rest.to_string()),
                    None => Token::Characters(text),
                }
            }
            other => {
                self.ignore_lf = false;
                other
            }
        };

        let self_closing_start =
            matches!(&token, Token::Tag(tag) if tag.kind == TagKind::Start && tag.self_closing);
        let mut hops = 0;
        let mut html_rules_only = false;

        // "Reprocess the token" is a loop, not recursion.
        let (result, acknowledged) = loop {
            let result = if !html_rules_only && self.use_foreign_rules(&token) {
                self.process_foreign_content(token)
            } else {
                self.step(self.mode, token)
            };
            html_rules_only = false;

            match result {
                ProcessResult::Done => break (TokenSinkResult::Continue, false),
                ProcessResult::DoneAckSelfClosing => break (TokenSinkResult::Continue, true),
                ProcessResult::SwitchLexer(mode) => break (TokenSinkResult::SwitchTo(mode), false),
                ProcessResult::Reprocess(mode, next) => {
                    self.switch_to(mode);
                    token = next;
                }
                ProcessResult::ReprocessInHtmlContent(next) => {
                    html_rules_only = true;
                    token = next;
                }
            }

            hops += 1;
            if hops > self.opts.max_reprocess_hops {
                warn_once(
                    "Tree Builder",
                    &format!("token reprocessed more than {hops} times; dropping it"),
                );
                return TokenSinkResult::Continue;
            }
        };

        if self_closing_start && !acknowledged {
            self.error(ParseErrorKind::NonVoidHtmlElementStartTagWithTrailingSolidus);
        }
        result
    }

    /// Run the rules for `mode` on `token`, without changing the insertion mode.
    pub(crate) fn step(&mut self, mode: InsertionMode, token: Token) -> ProcessResult {
        match mode {
            InsertionMode::Initial => self.step_initial(token),
            InsertionMode::BeforeHtml => self.step_before_html(token),
            InsertionMode::BeforeHead => self.step_before_head(token),
            InsertionMode::InHead => self.step_in_head(token),
            InsertionMode::InHeadNoscript => self.step_in_head_noscript(token),
            InsertionMode::AfterHead => self.step_after_head(token),
            InsertionMode::InBody => self.step_in_body(token),
            InsertionMode::Text => self.step_text(token),
            InsertionMode::InTable => self.step_in_table(token),
            InsertionMode::InTableText => self.step_in_table_text(token),
            InsertionMode::InCaption => self.step_in_caption(token),
            InsertionMode::InColumnGroup => self.step_in_column_group(token),
            InsertionMode::InTableBody => self.step_in_table_body(token),
            InsertionMode::InRow => self.step_in_row(token),
            InsertionMode::InCell => self.step_in_cell(token),
            InsertionMode::InSelect => self.step_in_select(token),
            InsertionMode::InSelectInTable => self.step_in_select_in_table(token),
            InsertionMode::InTemplate => self.step_in_template(token),
            InsertionMode::AfterBody => self.step_after_body(token),
            InsertionMode::InFrameset => self.step_in_frameset(token),
            InsertionMode::AfterFrameset => self.step_after_frameset(token),
            InsertionMode::AfterAfterBody => self.step_after_after_body(token),
            InsertionMode::AfterAfterFrameset => self.step_after_after_frameset(token),
        }
    }

    /// Returns true if the tokenizer may recognise `<![CDATA[` sections:
    /// "if there is an adjusted current node and it is not an element in the
    /// HTML namespace".
    #[must_use]
    pub fn is_cdata_allowed(&self) -> bool {
        self.adjusted_current_node()
            .and_then(|id| self.tree.as_element(id))
            .is_some_and(|e| e.namespace != Namespace::Html)
    }

    /// The parse errors recorded so far.
    #[must_use]
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// The document's quirks mode.
    #[must_use]
    pub fn quirks_mode(&self) -> QuirksMode {
        self.tree.quirks_mode()
    }

    /// The current insertion mode.
    #[must_use]
    pub const fn mode(&self) -> InsertionMode {
        self.mode
    }

    /// The tree built so far.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Returns true once the end-of-file token has been processed.
    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Consume the builder, returning the tree and the error log.
    #[must_use]
    pub fn finish(self) -> (DomTree, Vec<ParseError>) {
        (self.tree, self.errors)
    }

    // ----- errors and mode bookkeeping -----

    fn current_token_index(&self) -> usize {
        self.tokens_seen.saturating_sub(1)
    }

    fn push_error(&mut self, kind: ParseErrorKind, detail: Option<String>) {
        let error = ParseError {
            kind,
            token_index: self.current_token_index(),
            detail,
        };
        debug!(target: "wombat::tree_builder", "parse error in {}: {error}", self.mode);
        self.errors.push(error);
    }

    /// Record a parse error against the current token.
    pub(crate) fn error(&mut self, kind: ParseErrorKind) {
        self.push_error(kind, None);
    }

    /// Record a parse error with context, usually the offending tag name.
    pub(crate) fn error_with(&mut self, kind: ParseErrorKind, detail: &str) {
        self.push_error(kind, Some(detail.to_string()));
    }

    /// Record an error that is informational only; kept when `exact_errors`
    /// is set.
    pub(crate) fn exact_error(&mut self, kind: ParseErrorKind, detail: &str) {
        if self.opts.exact_errors {
            self.error_with(kind, detail);
        }
    }

    /// "Parse error" for a tag the current mode does not allow.
    pub(crate) fn unexpected(&mut self, tag: &Tag) {
        let kind = match tag.kind {
            TagKind::Start => ParseErrorKind::UnexpectedStartTag,
            TagKind::End => ParseErrorKind::UnexpectedEndTag,
        };
        self.error_with(kind, &tag.name);
    }

    pub(crate) fn switch_to(&mut self, mode: InsertionMode) {
        if mode != self.mode {
            trace!(target: "wombat::tree_builder", "{} -> {mode}", self.mode);
            self.mode = mode;
        }
    }

    /// [§ 13.2.6.4.23](https://html.spec.whatwg.org/multipage/parsing.html#stop-parsing)
    pub(crate) fn stop_parsing(&mut self) -> ProcessResult {
        trace!(target: "wombat::tree_builder", "stop parsing with {} open elements", self.open_elements.len());
        self.stopped = true;
        ProcessResult::Done
    }

    // ----- stack of open elements -----

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#current-node)
    ///
    /// "The current node is the bottommost node in this stack of open elements."
    pub(crate) fn current_node(&self) -> Option<NodeId> {
        self.open_elements.current()
    }

    /// "The adjusted current node is the context element if the parser was
    /// created as part of the HTML fragment parsing algorithm and the stack of
    /// open elements has only one element in it (fragment case); otherwise,
    /// the adjusted current node is the current node."
    pub(crate) fn adjusted_current_node(&self) -> Option<NodeId> {
        match self.context_element {
            Some(context) if self.open_elements.len() == 1 => Some(context),
            _ => self.current_node(),
        }
    }

    /// Element data for `node`, if it is an element.
    pub(crate) fn element(&self, node: NodeId) -> Option<&ElementData> {
        self.tree.as_element(node)
    }

    /// Returns true if `node` is an HTML element named `name`.
    pub(crate) fn is_html_element(&self, node: NodeId, name: &str) -> bool {
        self.element(node).is_some_and(|e| e.is_html(name))
    }

    pub(crate) fn current_is(&self, name: &str) -> bool {
        self.open_elements.current_is(&self.tree, name)
    }

    pub(crate) fn current_is_one_of(&self, names: &[&str]) -> bool {
        self.open_elements.current_is_one_of(&self.tree, names)
    }

    pub(crate) fn in_scope(&self, name: &str, kind: ScopeKind) -> bool {
        self.open_elements.has_in_scope(&self.tree, name, kind)
    }

    pub(crate) fn any_in_scope(&self, names: &[&str], kind: ScopeKind) -> bool {
        self.open_elements.has_any_in_scope(&self.tree, names, kind)
    }

    pub(crate) fn stack_has_template(&self) -> bool {
        self.open_elements.contains_html(&self.tree, "template")
    }

    pub(crate) fn pop(&mut self) -> Option<NodeId> {
        self.open_elements.pop()
    }

    /// Pop elements until an HTML element named `name` has been popped.
    pub(crate) fn pop_until_named(&mut self, name: &str) {
        self.pop_until_one_of(&[name]);
    }

    /// Pop elements until an HTML element named one of `names` has been popped.
    pub(crate) fn pop_until_one_of(&mut self, names: &[&str]) {
        while let Some(node) = self.pop() {
            if self.element(node).is_some_and(|e| e.is_html_one_of(names)) {
                break;
            }
        }
    }

    /// Pop elements until `target` has been popped.
    pub(crate) fn pop_until_node(&mut self, target: NodeId) {
        while let Some(node) = self.pop() {
            if node == target {
                break;
            }
        }
    }

    /// [§ 13.2.6.3 Generate implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
    ///
    /// "while the current node is a dd element, a dt element, an li element,
    /// an optgroup element, an option element, a p element, an rb element, an
    /// rp element, an rt element, or an rtc element, the UA must pop the
    /// current node off the stack of open elements."
    ///
    /// "If a step requires the UA to generate implied end tags but lists an
    /// element to exclude from the process, then the UA must perform the above
    /// steps as if that element was not in the above list."
    pub(crate) fn generate_implied_end_tags(&mut self, except: Option<&str>) {
        while let Some(current) = self.current_node() {
            let Some(element) = self.element(current) else {
                break;
            };
            let implied = element.namespace == Namespace::Html
                && IMPLIED_END_TAGS.contains(&element.tag_name.as_str())
                && except != Some(element.tag_name.as_str());
            if !implied {
                break;
            }
            let _ = self.pop();
        }
    }

    /// "generate all implied end tags thoroughly"
    pub(crate) fn generate_implied_end_tags_thoroughly(&mut self) {
        while self.current_is_one_of(IMPLIED_END_TAGS_THOROUGH) {
            let _ = self.pop();
        }
    }

    /// [§ 13.2.6.4.7 Close a p element](https://html.spec.whatwg.org/multipage/parsing.html#close-a-p-element)
    ///
    /// 1. "Generate implied end tags, except for p elements."
    /// 2. "If the current node is not a p element, then this is a parse error."
    /// 3. "Pop elements from the stack of open elements until a p element has
    ///    been popped from the stack."
    pub(crate) fn close_p_element(&mut self) {
        self.generate_implied_end_tags(Some("p"));
        if !self.current_is("p") {
            self.exact_error(ParseErrorKind::EndTagNotCurrentNode, "p");
        }
        self.pop_until_named("p");
    }

    /// "If the stack of open elements has a p element in button scope, then
    /// close a p element."
    pub(crate) fn close_p_in_button_scope(&mut self) {
        if self.in_scope("p", ScopeKind::Button) {
            self.close_p_element();
        }
    }

    /// [§ 13.2.6.4.9 Clear the stack back to a table context](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-context)
    /// and its table body and table row variants: pop until the current node
    /// is one of `names` or `html`.
    pub(crate) fn clear_stack_back_to(&mut self, names: &[&str]) {
        while let Some(current) = self.current_node() {
            let stop = self
                .element(current)
                .is_none_or(|e| e.is_html("html") || e.is_html_one_of(names));
            if stop {
                break;
            }
            let _ = self.pop();
        }
    }
}

/// [§ 12.1.4 ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
///
/// The tree construction stage sees CR normalised away, so whitespace here is
/// TAB, LF, FF, CR and SPACE.
pub(crate) const fn is_whitespace(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' ')
}

/// Split a character run into its leading whitespace and the rest.
pub(crate) fn split_leading_whitespace(text: &str) -> (&str, &str) {
    let end = text.find(|c| !is_whitespace(c)).unwrap_or(text.len());
    text.split_at(end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(tokens: Vec<Token>) -> TreeBuilder {
        let mut builder = TreeBuilder::new(ParseOpts::default());
        for token in tokens {
            let _ = builder.process_token(token);
        }
        builder
    }

    #[test]
    fn splits_leading_whitespace() {
        assert_eq!(split_leading_whitespace(" \n x y"), (" \n ", "x y"));
        assert_eq!(split_leading_whitespace("   "), ("   ", ""));
        assert_eq!(split_leading_whitespace("x"), ("", "x"));
    }

    #[test]
    fn tokenizer_errors_pass_through_without_tree_effects() {
        let builder = run(vec![
            Token::ParseError("eof-in-tag".to_string()),
            Token::EndOfFile,
        ]);
        assert_eq!(builder.errors()[0].kind, ParseErrorKind::Tokenizer);
        assert_eq!(builder.errors()[0].detail.as_deref(), Some("eof-in-tag"));
        assert_eq!(builder.errors()[0].token_index, 0);
        assert!(builder.is_stopped());
    }

    #[test]
    fn title_start_tag_switches_the_lexer() {
        let mut builder = TreeBuilder::new(ParseOpts::default());
        let result = builder.process_token(Token::start_tag("title"));
        assert_eq!(result, TokenSinkResult::SwitchTo(crate::tokenizer::LexicalMode::Rcdata));
        assert_eq!(builder.mode(), InsertionMode::Text);
    }

    #[test]
    fn self_closing_div_is_reported_and_void_is_not() {
        let builder = run(vec![
            Token::Tag(Tag::start("br").with_self_closing()),
            Token::Tag(Tag::start("div").with_self_closing()),
            Token::EndOfFile,
        ]);
        let solidus: Vec<_> = builder
            .errors()
            .iter()
            .filter(|e| e.kind == ParseErrorKind::NonVoidHtmlElementStartTagWithTrailingSolidus)
            .collect();
        assert_eq!(solidus.len(), 1);
        assert_eq!(solidus[0].token_index, 1);
    }

    #[test]
    fn leading_newline_after_pre_is_dropped() {
        let builder = run(vec![
            Token::start_tag("pre"),
            Token::characters("\nx"),
            Token::EndOfFile,
        ]);
        let tree = builder.tree();
        let body = tree.body().expect("body");
        let pre = tree.first_child(body).expect("pre");
        let text = tree.first_child(pre).expect("text");
        assert_eq!(tree.as_text(text), Some("x"));
    }

    #[test]
    fn tokens_after_eof_are_ignored() {
        let mut builder = run(vec![Token::EndOfFile]);
        let nodes = builder.tree().len();
        let _ = builder.process_token(Token::start_tag("p"));
        assert_eq!(builder.tree().len(), nodes);
    }
}
