//! fxml core library.
//!
//! Parses the fxml brace markup dialect (`tag(attr="v"){text nested{}}`) into
//! a tree of elements, attributes and text. The main entry points are
//! [`parse_str`] for the owned [`Document`], [`parse_with`] for any
//! [`TreeSink`], and [`emit_fxml`] / [`emit_xml`] for output.

#![warn(missing_docs)]

/// Quoted-string escape decoding and encoding.
pub mod escape;
/// fxml grammar: lexer, parser, tree, emitters, and related utilities.
pub mod grammar;

// ── Convenience re-exports ──────────────────────────────────────────────────

// Parser
pub use grammar::options::{DEFAULT_MAX_DEPTH, ParseOptions, TrailingContent};
pub use grammar::parser::{Parser, parse_collecting, parse_str, parse_with, parse_with_options};

// Lexer
pub use grammar::lexer::{Lexer, LexerState, Mode, tokenize};
pub use grammar::token::{Token, TokenKind};

// Tree
pub use grammar::ast::{Document, Element, Node};
pub use grammar::tree::{DocumentBuilder, NodeId, TreeSink};

// Emitters
pub use grammar::emit::{EmitConfig, Indent, emit_fxml, emit_xml};

// Diagnostics (re-exported from the diagnostics crate)
pub use grammar::diag::{Diagnostic, DiagnosticSink, ParseError, Position, Severity};

// Serialization helpers
pub use grammar::dump::to_pretty_json;
