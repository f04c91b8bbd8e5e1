//! Shared test helpers for `fxml_core` integration tests.

#![allow(unreachable_pub)]

use fxml_core::{Document, ParseError, ParseOptions, Token, TokenKind, parse_collecting, tokenize};
use fxml_diagnostics::Diagnostic;

// ─── Lexer helpers ──────────────────────────────────────────────────────────

/// Token kinds of a whole input (end-of-input excluded).
#[allow(dead_code)]
pub fn kinds(input: &str) -> Vec<TokenKind> {
    tokens(input).iter().map(|t| t.kind).collect()
}

/// Tokens of a whole input, panicking on a lexer error.
#[allow(dead_code)]
pub fn tokens(input: &str) -> Vec<Token<'_>> {
    tokenize(input).unwrap_or_else(|e| panic!("lexing {input:?} failed: {e}"))
}

// ─── Parse helpers ──────────────────────────────────────────────────────────

/// Parse with default options, panicking with the rendered report on failure.
#[allow(dead_code)]
pub fn parse(input: &str) -> Document {
    parse_opts(input, &ParseOptions::default()).0
}

/// Parse with `options`, returning the document and collected warnings.
#[allow(dead_code)]
pub fn parse_opts(input: &str, options: &ParseOptions) -> (Document, Vec<Diagnostic>) {
    let (result, diagnostics) = parse_collecting(input, options);
    match result {
        Ok(doc) => (doc, diagnostics),
        Err(e) => panic!("parsing {input:?} failed:\n{e}"),
    }
}

/// Parse with default options, expecting failure.
#[allow(dead_code)]
pub fn parse_err(input: &str) -> ParseError {
    parse_err_opts(input, &ParseOptions::default())
}

/// Parse with `options`, expecting failure.
#[allow(dead_code)]
pub fn parse_err_opts(input: &str, options: &ParseOptions) -> ParseError {
    match parse_collecting(input, options).0 {
        Ok(doc) => panic!("parsing {input:?} should fail, got {doc:?}"),
        Err(e) => e,
    }
}

/// Names of the root's child elements, in order.
#[allow(dead_code)]
pub fn child_names(doc: &Document) -> Vec<&str> {
    doc.root.child_elements().map(|e| e.name.as_str()).collect()
}
