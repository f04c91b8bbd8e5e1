use std::borrow::Cow;
use std::fmt;

use fxml_diagnostics::Position;

/// Classification of an fxml lexer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// End of input.
    Eof,
    /// Verbatim body text between tags.
    TextRun,
    /// The name that opens a tag.
    TagName,
    /// Unquoted attribute name or value.
    Identifier,
    /// Quoted attribute name or value, escapes already decoded.
    QuotedString,
    /// `(`
    ParenOpen,
    /// `)`
    ParenClose,
    /// `{`
    BraceOpen,
    /// `}`
    BraceClose,
    /// `=`
    Equals,
}

impl TokenKind {
    /// Short human-readable label used in diagnostics.
    pub fn label(self) -> &'static str {
        match self {
            TokenKind::Eof => "<eof>",
            TokenKind::TextRun => "<text>",
            TokenKind::TagName => "<tag-name>",
            TokenKind::Identifier => "<identifier>",
            TokenKind::QuotedString => "<quoted-string>",
            TokenKind::ParenOpen => "(",
            TokenKind::ParenClose => ")",
            TokenKind::BraceOpen => "{",
            TokenKind::BraceClose => "}",
            TokenKind::Equals => "=",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A lexeme with its source extent.
///
/// `text` borrows from the input whenever the lexeme is a verbatim slice;
/// quoted strings and text runs that needed line-terminator normalization
/// own their text. Punctuation and end-of-input tokens carry no text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    /// The classification of this token.
    pub kind: TokenKind,
    /// Literal (or decoded) text, if the kind has any.
    pub text: Option<Cow<'a, str>>,
    /// Position of the first character.
    pub start: Position,
    /// Position just past the last character.
    pub end: Position,
}

impl<'a> Token<'a> {
    /// Create a token without text.
    pub fn new(kind: TokenKind, start: Position, end: Position) -> Self {
        Self {
            kind,
            text: None,
            start,
            end,
        }
    }

    /// Create a token carrying text.
    pub fn with_text(
        kind: TokenKind,
        text: impl Into<Cow<'a, str>>,
        start: Position,
        end: Position,
    ) -> Self {
        Self {
            kind,
            text: Some(text.into()),
            start,
            end,
        }
    }

    /// The token's text, or `""` when it has none.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Whether this is the end-of-input token.
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    /// Detach the token from the input it was scanned from.
    pub fn into_owned(self) -> Token<'static> {
        Token {
            kind: self.kind,
            text: self.text.map(|t| Cow::Owned(t.into_owned())),
            start: self.start,
            end: self.end,
        }
    }
}

/// Renders as the kind label, followed by the text in parentheses when there
/// is any, with line terminators shown as `\n` and `\r`.
impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.text.as_deref() {
            None | Some("") => f.write_str(self.kind.label()),
            Some(text) => {
                let shown = text.replace('\n', "\\n").replace('\r', "\\r");
                write!(f, "{}({})", self.kind.label(), shown)
            }
        }
    }
}
