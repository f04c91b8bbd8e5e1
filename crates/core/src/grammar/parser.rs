//! Recursive-descent parser for fxml.
//!
//! ```text
//! document   := element
//! element    := TAG_NAME attributes? body?
//! attributes := '(' attribute* ')'
//! attribute  := (QUOTED_STRING | IDENTIFIER) ('=' value)?
//! value      := QUOTED_STRING | IDENTIFIER | ε      (ε only before ')')
//! body       := '{' (TEXT_RUN | element)* '}'
//! ```
//!
//! Every dispatch decision uses one token of lookahead. The first fatal
//! problem aborts the parse; nothing built up to that point is returned.

use std::collections::HashSet;

use fxml_diagnostics::{
    CollectingSink, DefaultSink, Diagnostic, DiagnosticSink, ParseError, Position,
};

use super::ast::Document;
use super::lexer::{Lexer, LexerState, Mode, is_whitespace};
use super::options::{ParseOptions, TrailingContent};
use super::token::{Token, TokenKind};
use super::tree::{DocumentBuilder, TreeSink};

// ─── Public API ─────────────────────────────────────────────────────────────

/// Parse `input` into an owned [`Document`] with default options.
pub fn parse_str(input: &str) -> Result<Document, ParseError> {
    parse_with_options(input, &ParseOptions::default())
}

/// Parse `input` into an owned [`Document`].
///
/// Warnings go to standard error through a [`DefaultSink`].
pub fn parse_with_options(input: &str, options: &ParseOptions) -> Result<Document, ParseError> {
    let mut sink = DefaultSink::new(input, options.source_name.as_deref());
    build_document(input, options, &mut sink)
}

/// Parse `input`, collecting warnings instead of printing them.
///
/// The returned diagnostics include the fatal error, if there was one.
pub fn parse_collecting(
    input: &str,
    options: &ParseOptions,
) -> (Result<Document, ParseError>, Vec<Diagnostic>) {
    let mut sink = CollectingSink::new(input, options.source_name.as_deref());
    let result = build_document(input, options, &mut sink);
    (result, sink.into_diagnostics())
}

/// Parse `input` with any tree sink and diagnostic sink.
///
/// Returns the handle of the document created through `tree`.
pub fn parse_with<T, D>(
    input: &str,
    options: &ParseOptions,
    tree: &mut T,
    diagnostics: &mut D,
) -> Result<T::Handle, ParseError>
where
    T: TreeSink + ?Sized,
    D: DiagnosticSink + ?Sized,
{
    Parser::new(input, options, tree, diagnostics).parse()
}

fn build_document<D: DiagnosticSink>(
    input: &str,
    options: &ParseOptions,
    sink: &mut D,
) -> Result<Document, ParseError> {
    let mut builder = DocumentBuilder::new();
    let document = parse_with(input, options, &mut builder, sink)?;
    builder
        .build(document)
        .ok_or_else(|| sink.error(None, "document has no root element"))
}

// ─── Parser ─────────────────────────────────────────────────────────────────

/// Recursive-descent parser driving a [`Lexer`] over one input.
///
/// The parser is the only component that reports through the diagnostic
/// sink; errors raised by the lexer are routed through it as well so that
/// every [`ParseError`] leaving the parser is rendered.
pub struct Parser<'a, 'p, T: TreeSink + ?Sized, D: DiagnosticSink + ?Sized> {
    lexer: Lexer<'a>,
    options: &'p ParseOptions,
    tree: &'p mut T,
    diagnostics: &'p mut D,
    depth: usize,
}

impl<'a, 'p, T, D> Parser<'a, 'p, T, D>
where
    T: TreeSink + ?Sized,
    D: DiagnosticSink + ?Sized,
{
    /// Create a parser over `input`.
    pub fn new(
        input: &'a str,
        options: &'p ParseOptions,
        tree: &'p mut T,
        diagnostics: &'p mut D,
    ) -> Self {
        Self {
            lexer: Lexer::new(input),
            options,
            tree,
            diagnostics,
            depth: 0,
        }
    }

    // ── Diagnostics ─────────────────────────────────────────────────────

    /// Report a non-fatal problem.
    pub fn warn(&mut self, position: Option<Position>, message: &str) {
        self.diagnostics.warn(position, message);
    }

    /// Build the fatal error for a problem; the caller returns it.
    pub fn error(&mut self, position: Option<Position>, message: &str) -> ParseError {
        self.diagnostics.error(position, message)
    }

    /// Route a lexer result through the diagnostic sink.
    fn lexed<R>(&mut self, result: Result<R, ParseError>) -> Result<R, ParseError> {
        result.map_err(|e| self.diagnostics.error(e.position, &e.message))
    }

    // ── Lexer access ────────────────────────────────────────────────────

    /// Capture the lexer state for later backtracking.
    pub fn save_state(&self) -> LexerState<'a> {
        self.lexer.save()
    }

    /// Backtrack to a state captured with [`save_state`](Self::save_state).
    pub fn restore_state(&mut self, state: LexerState<'a>) {
        self.lexer.restore(state);
    }

    /// The lexer's current mode.
    pub fn mode(&self) -> Mode {
        self.lexer.mode()
    }

    /// Push a lexer mode.
    pub fn push_mode(&mut self, mode: Mode) {
        self.lexer.push_mode(mode);
    }

    /// Pop the current lexer mode.
    pub fn pop_mode(&mut self) -> Option<Mode> {
        self.lexer.pop_mode()
    }

    /// Look at the next token without consuming it.
    pub fn peek(&mut self) -> Result<Token<'a>, ParseError> {
        let peeked = self.lexer.peek().cloned();
        self.lexed(peeked)
    }

    /// Consume the next token.
    pub fn next_token(&mut self) -> Result<Token<'a>, ParseError> {
        let next = self.lexer.next_token();
        self.lexed(next)
    }

    /// Whether any token other than end-of-input follows.
    pub fn has_next(&mut self) -> Result<bool, ParseError> {
        Ok(!self.peek()?.is_eof())
    }

    /// Skip whitespace at the lexer's cursor.
    pub fn skip_whitespace(&mut self) {
        self.lexer.skip_whitespace();
    }

    /// Whether the next token is one of `kinds`.
    pub fn matches(&mut self, kinds: &[TokenKind]) -> Result<bool, ParseError> {
        let kind = self.peek()?.kind;
        Ok(kinds.contains(&kind))
    }

    /// Consume the next token, requiring it to be one of `kinds`.
    pub fn expect(&mut self, kinds: &[TokenKind]) -> Result<Token<'a>, ParseError> {
        let token = self.next_token()?;
        self.check(token, kinds)
    }

    fn check(&mut self, token: Token<'a>, kinds: &[TokenKind]) -> Result<Token<'a>, ParseError> {
        if kinds.contains(&token.kind) {
            return Ok(token);
        }
        let expected = match kinds {
            [single] => single.to_string(),
            _ => {
                let labels: Vec<&str> = kinds.iter().map(|k| k.label()).collect();
                format!("any of {}", labels.join(", "))
            }
        };
        let message = format!("Unexpected token! Expected {expected}, found {token}");
        Err(self.error(Some(token.start), &message))
    }

    // ── Grammar ─────────────────────────────────────────────────────────

    /// Parse the document and return its handle.
    ///
    /// Returns as soon as the root element is complete. Input after it is
    /// only looked at when [`ParseOptions::trailing`] asks for it.
    pub fn parse(&mut self) -> Result<T::Handle, ParseError> {
        log::debug!(
            "parsing {} ({} bytes)",
            self.options.source_name.as_deref().unwrap_or("<input>"),
            self.lexer.input().len()
        );
        self.skip_whitespace();
        let first = self.peek()?;
        self.check(first, &[TokenKind::TagName])?;

        let document = self.tree.new_document();
        let root = self.element()?;
        self.tree.append_child(&document, root);

        self.check_trailing()?;
        log::debug!("parse finished at {}", self.lexer.position());
        Ok(document)
    }

    fn element(&mut self) -> Result<T::Handle, ParseError> {
        let name = self.expect(&[TokenKind::TagName])?;
        self.depth += 1;
        if self.depth > self.options.max_depth {
            let message = format!(
                "nesting too deep: more than {} levels",
                self.options.max_depth
            );
            return Err(self.error(Some(name.start), &message));
        }
        let element = self.tree.create_element(name.text());
        self.skip_whitespace();

        if self.matches(&[TokenKind::ParenOpen])? {
            self.next_token()?;
            self.skip_whitespace();
            let mut seen = HashSet::new();
            while !self.matches(&[TokenKind::ParenClose])? {
                self.attribute(&element, &mut seen)?;
                self.skip_whitespace();
            }
            self.next_token()?;
        }

        self.skip_whitespace();

        if self.matches(&[TokenKind::BraceOpen])? {
            self.next_token()?;
            self.body(&element)?;
        }

        self.depth -= 1;
        Ok(element)
    }

    fn body(&mut self, element: &T::Handle) -> Result<(), ParseError> {
        loop {
            let token = self.peek()?;
            match token.kind {
                TokenKind::TextRun => {
                    self.next_token()?;
                    let text = token.text();
                    if !text.chars().all(is_whitespace) {
                        let node = self.tree.create_text_node(text);
                        self.tree.append_child(element, node);
                    }
                }
                TokenKind::BraceClose => {
                    self.next_token()?;
                    return Ok(());
                }
                TokenKind::TagName => {
                    let child = self.element()?;
                    self.tree.append_child(element, child);
                }
                _ => {
                    self.next_token()?;
                    let message = format!("Unexpected token: {token}");
                    return Err(self.error(Some(token.start), &message));
                }
            }
        }
    }

    fn attribute(
        &mut self,
        element: &T::Handle,
        seen: &mut HashSet<String>,
    ) -> Result<(), ParseError> {
        let name = self.expect(&[TokenKind::QuotedString, TokenKind::Identifier])?;
        self.skip_whitespace();

        let value = if self.matches(&[TokenKind::Equals])? {
            self.next_token()?;
            self.skip_whitespace();
            if self.matches(&[TokenKind::ParenClose])? {
                None
            } else {
                Some(self.expect(&[TokenKind::QuotedString, TokenKind::Identifier])?)
            }
        } else {
            None
        };

        if !seen.insert(name.text().to_owned()) && self.options.warn_duplicate_attributes {
            let message = format!("duplicate attribute '{}' overrides earlier value", name.text());
            self.warn(Some(name.start), &message);
        }

        let value = match &value {
            Some(token) => token.text(),
            None => "",
        };
        self.tree.set_attribute(element, name.text(), value);
        Ok(())
    }

    /// Look past the root element without consuming anything.
    fn check_trailing(&mut self) -> Result<(), ParseError> {
        if self.options.trailing == TrailingContent::Ignore {
            return Ok(());
        }
        let state = self.save_state();
        self.skip_whitespace();
        let token = self.peek();
        self.restore_state(state);

        let token = token?;
        let blank = token.kind == TokenKind::TextRun && token.text().chars().all(is_whitespace);
        if token.is_eof() || blank {
            return Ok(());
        }
        let message = format!("trailing content after root element: {token}");
        match self.options.trailing {
            TrailingContent::Warn => {
                self.warn(Some(token.start), &message);
                Ok(())
            }
            _ => Err(self.error(Some(token.start), &message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every tree call as a line of text.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
        next: usize,
    }

    impl Recorder {
        fn id(&mut self) -> usize {
            self.next += 1;
            self.next
        }
    }

    impl TreeSink for Recorder {
        type Handle = usize;

        fn new_document(&mut self) -> usize {
            let id = self.id();
            self.calls.push(format!("doc#{id}"));
            id
        }

        fn create_element(&mut self, name: &str) -> usize {
            let id = self.id();
            self.calls.push(format!("element#{id} {name}"));
            id
        }

        fn create_text_node(&mut self, text: &str) -> usize {
            let id = self.id();
            self.calls.push(format!("text#{id} {text:?}"));
            id
        }

        fn set_attribute(&mut self, element: &usize, name: &str, value: &str) {
            self.calls.push(format!("attr #{element} {name}={value:?}"));
        }

        fn append_child(&mut self, parent: &usize, child: usize) {
            self.calls.push(format!("append #{parent} <- #{child}"));
        }
    }

    #[test]
    fn drives_tree_sink_in_order() {
        let input = "a(x=1){hi b{}}";
        let mut tree = Recorder::default();
        let mut sink = CollectingSink::new(input, None);
        let doc = parse_with(input, &ParseOptions::default(), &mut tree, &mut sink).unwrap();
        assert_eq!(doc, 1);
        assert_eq!(
            tree.calls,
            [
                "doc#1",
                "element#2 a",
                "attr #2 x=\"1\"",
                "text#3 \"hi \"",
                "append #2 <- #3",
                "element#4 b",
                "append #2 <- #4",
                "append #1 <- #2",
            ]
        );
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn error_builds_no_document() {
        let input = "a{ x";
        let mut tree = Recorder::default();
        let mut sink = CollectingSink::new(input, None);
        let err = parse_with(input, &ParseOptions::default(), &mut tree, &mut sink).unwrap_err();
        assert!(err.message.starts_with("Unexpected token"), "{}", err.message);
        assert!(!tree.calls.iter().any(|c| c.starts_with("append #1")));
    }

    #[test]
    fn lexer_errors_are_rendered_through_sink() {
        let input = "a(x=\"\\q\")";
        let (result, diags) = parse_collecting(input, &ParseOptions::default());
        let err = result.unwrap_err();
        assert_eq!(err.message, "invalid escape sequence");
        assert!(err.report.contains("--> <unnamed source>:1:5"), "{}", err.report);
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn expect_lists_alternatives() {
        let input = "a(=)";
        let err = parse_str(input).unwrap_err();
        assert_eq!(
            err.message,
            "Unexpected token! Expected any of <quoted-string>, <identifier>, found ="
        );
    }

    #[test]
    fn save_and_restore_through_parser() {
        let input = "a{b}";
        let opts = ParseOptions::default();
        let mut tree = DocumentBuilder::new();
        let mut sink = CollectingSink::new(input, None);
        let mut parser = Parser::new(input, &opts, &mut tree, &mut sink);
        let state = parser.save_state();
        assert_eq!(parser.next_token().unwrap().kind, TokenKind::TagName);
        assert_eq!(parser.mode(), Mode::Tag);
        parser.restore_state(state);
        assert_eq!(parser.mode(), Mode::Plain);
        assert_eq!(parser.peek().unwrap().text(), "a");
        assert!(parser.has_next().unwrap());
    }
}
