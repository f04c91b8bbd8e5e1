//! Diagnostics for the fxml toolchain.
//!
//! Provides [`Position`], [`Severity`], [`Diagnostic`], and [`ParseError`]
//! used by the lexer and parser to report problems, the [`DiagnosticSink`]
//! capability through which the parser reports them, and the default
//! caret-pointing formatter in [`render`].

#![warn(missing_docs)]

/// Source-context rendering of diagnostic messages.
pub mod render;
/// Diagnostic sinks: the [`DiagnosticSink`] trait and its stock implementations.
pub mod sink;

pub use render::{UNNAMED_SOURCE, render_context};
pub use sink::{CollectingSink, DefaultSink, DiagnosticSink};

use serde::{Deserialize, Serialize};

// ── Position ─────────────────────────────────────────────────────────────

/// A location in the source input.
///
/// All three components are **0-based**. `offset` is a byte offset into the
/// UTF-8 input, `column` counts characters since the start of the line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Zero-based line number.
    pub line: usize,
    /// Zero-based column, in characters.
    pub column: usize,
    /// Zero-based byte offset from the start of the input.
    pub offset: usize,
}

impl Position {
    /// Create a position from its three components.
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    /// The position of the first character of any input.
    pub fn start() -> Self {
        Self::default()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column)
    }
}

// ── Severity / Diagnostic ────────────────────────────────────────────────

/// Severity level for a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Severity {
    /// Fatal: the parse was aborted.
    Error,
    /// Non-fatal: the parse continued.
    Warn,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warn => write!(f, "warning"),
        }
    }
}

/// A diagnostic message captured from a parse, in structured form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity level.
    pub severity: Severity,
    /// Human-readable message, without source context.
    pub message: String,
    /// Source position the diagnostic points at, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl Diagnostic {
    /// Create a diagnostic with the given fields.
    pub fn new(severity: Severity, message: impl Into<String>, position: Option<Position>) -> Self {
        Self {
            severity,
            message: message.into(),
            position,
        }
    }

    /// Shorthand for an `Error` diagnostic.
    pub fn error(message: impl Into<String>, position: Option<Position>) -> Self {
        Self::new(Severity::Error, message, position)
    }

    /// Shorthand for a `Warn` diagnostic.
    pub fn warn(message: impl Into<String>, position: Option<Position>) -> Self {
        Self::new(Severity::Warn, message, position)
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.position {
            Some(pos) => write!(f, "{}: {} (at {})", self.severity, self.message, pos),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

// ── ParseError ───────────────────────────────────────────────────────────

/// The single fatal error kind of the fxml parser.
///
/// `message` is the bare description (e.g. `"invalid escape sequence"`);
/// `report` is what a [`DiagnosticSink`] rendered for it, usually including
/// source context. Errors created directly by the lexer carry the bare message
/// as their report until the parser routes them through its sink.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{report}")]
pub struct ParseError {
    /// Position of the offending input, if known.
    pub position: Option<Position>,
    /// Bare error message.
    pub message: String,
    /// Rendered message, as produced by a diagnostic sink.
    pub report: String,
}

impl ParseError {
    /// Create an unrendered error; the report equals the message.
    pub fn new(position: Option<Position>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            position,
            report: message.clone(),
            message,
        }
    }

    /// Create an error with an already rendered report.
    pub fn with_report(
        position: Option<Position>,
        message: impl Into<String>,
        report: impl Into<String>,
    ) -> Self {
        Self {
            position,
            message: message.into(),
            report: report.into(),
        }
    }

    /// Structured form of this error.
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.message.clone(), self.position)
    }
}
