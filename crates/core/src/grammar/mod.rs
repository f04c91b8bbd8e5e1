/// fxml document tree types.
pub mod ast;
/// Line/column/offset tracking cursor.
mod cursor;
/// Re-exports from the diagnostics crate.
pub mod diag;
/// JSON serialization helpers for the document tree.
pub mod dump;
/// Emitters: fxml surface syntax and XML.
pub mod emit;
/// Scoped lexer: mode stack, lookahead, snapshot/restore.
pub mod lexer;
/// Parser configuration.
pub mod options;
/// Recursive-descent parser.
pub mod parser;
/// Token model.
pub mod token;
/// Tree construction capability and the owned-document builder.
pub mod tree;
