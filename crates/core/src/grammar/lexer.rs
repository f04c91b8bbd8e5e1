//! Scoped lexer for fxml.
//!
//! Tokenization depends on a stack of [`Mode`]s. An empty stack means
//! [`Mode::Plain`]:
//!
//! - **Plain** (document level and element bodies): a tag name when a tag
//!   start is ahead, `}` closing the body, otherwise a verbatim text run.
//! - **Tag** (after a tag name) and **Attrs** (inside `(...)`): single
//!   character punctuation, quoted strings with escapes, and identifiers.
//!
//! `(` pushes Attrs, `)` pops it (and also the enclosing Tag when no body
//! follows), `{` turns the enclosing Tag into Plain for the body, and `}`
//! pops whatever mode is current.

use std::borrow::Cow;

use fxml_diagnostics::{ParseError, Position};

use super::cursor::Cursor;
use super::token::{Token, TokenKind};
use crate::escape::{HEX_ESCAPE_DIGITS, QUOTES, decode_hex_escape, simple_escape};

/// Tokenization rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Document level or element body.
    #[default]
    Plain,
    /// Between a tag name and its attribute list or body.
    Tag,
    /// Inside an attribute list.
    Attrs,
}

/// Snapshot of everything the lexer needs to resume scanning from a point.
///
/// Plain data: restoring it with [`Lexer::restore`] rewinds the position,
/// the lookahead character, the cached peeked token, the last token start,
/// and the mode stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerState<'a> {
    /// Position of the lookahead character.
    pub position: Position,
    /// The lookahead character (`None` at end of input).
    pub current: Option<char>,
    /// Token scanned by `peek` but not yet consumed.
    pub peeked: Option<Token<'a>>,
    /// Where the most recently scanned token began.
    pub last_token_start: Position,
    /// Mode stack, bottom first.
    pub modes: Vec<Mode>,
}

/// Mode-sensitive lexer with one token of lookahead.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    modes: Vec<Mode>,
    peeked: Option<Token<'a>>,
    last_token_start: Position,
}

impl<'a> Lexer<'a> {
    /// Create a lexer at the start of `input`, in [`Mode::Plain`].
    pub fn new(input: &'a str) -> Self {
        Self {
            cursor: Cursor::new(input),
            modes: Vec::new(),
            peeked: None,
            last_token_start: Position::start(),
        }
    }

    /// The full input being scanned.
    pub fn input(&self) -> &'a str {
        self.cursor.input()
    }

    /// Position of the next unscanned character.
    pub fn position(&self) -> Position {
        self.cursor.position()
    }

    /// Where the most recently scanned token began.
    pub fn last_token_start(&self) -> Position {
        self.last_token_start
    }

    // ── Mode stack ──────────────────────────────────────────────────────

    /// The current mode; [`Mode::Plain`] when the stack is empty.
    pub fn mode(&self) -> Mode {
        self.modes.last().copied().unwrap_or_default()
    }

    /// Depth of the mode stack.
    pub fn depth(&self) -> usize {
        self.modes.len()
    }

    /// Push a mode.
    pub fn push_mode(&mut self, mode: Mode) {
        self.modes.push(mode);
        log::trace!("push {mode:?} -> {:?}", self.modes);
    }

    /// Pop the current mode. Popping an empty stack is a no-op.
    pub fn pop_mode(&mut self) -> Option<Mode> {
        let popped = self.modes.pop();
        log::trace!("pop {popped:?} -> {:?}", self.modes);
        popped
    }

    // ── Lookahead ───────────────────────────────────────────────────────

    /// Scan the next token without consuming it.
    ///
    /// Repeated calls return the cached token without scanning again.
    pub fn peek(&mut self) -> Result<&Token<'a>, ParseError> {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.read_token()?,
        };
        Ok(self.peeked.insert(token))
    }

    /// Consume and return the next token.
    pub fn next_token(&mut self) -> Result<Token<'a>, ParseError> {
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => self.read_token(),
        }
    }

    /// Whether a token other than end-of-input follows.
    pub fn has_next(&mut self) -> Result<bool, ParseError> {
        Ok(!self.peek()?.is_eof())
    }

    /// Skip raw whitespace at the cursor.
    ///
    /// Does nothing while a peeked token is cached, since that token was
    /// scanned from the current position.
    pub fn skip_whitespace(&mut self) {
        if self.peeked.is_none() {
            self.cursor.advance_while(is_whitespace);
        }
    }

    // ── Snapshot / restore ──────────────────────────────────────────────

    /// Capture the full scanning state.
    pub fn save(&self) -> LexerState<'a> {
        LexerState {
            position: self.cursor.position(),
            current: self.cursor.current(),
            peeked: self.peeked.clone(),
            last_token_start: self.last_token_start,
            modes: self.modes.clone(),
        }
    }

    /// Resume scanning exactly where `state` was captured.
    pub fn restore(&mut self, state: LexerState<'a>) {
        self.cursor.reset(state.position);
        self.peeked = state.peeked;
        self.last_token_start = state.last_token_start;
        self.modes = state.modes;
    }

    // ── Scanning ────────────────────────────────────────────────────────

    fn read_token(&mut self) -> Result<Token<'a>, ParseError> {
        if self.mode() != Mode::Plain {
            self.cursor.advance_while(is_whitespace);
        }
        self.last_token_start = self.cursor.position();

        let Some(ch) = self.cursor.current() else {
            return Ok(self.token(TokenKind::Eof));
        };

        if ch == '}' {
            self.cursor.advance();
            self.pop_mode();
            return Ok(self.token(TokenKind::BraceClose));
        }

        if self.mode() == Mode::Plain {
            if self.at_tag_start() {
                self.push_mode(Mode::Tag);
                return Ok(self.read_tag_name());
            }
            return Ok(self.read_text_run());
        }

        match ch {
            '(' => {
                self.cursor.advance();
                self.push_mode(Mode::Attrs);
                Ok(self.token(TokenKind::ParenOpen))
            }
            ')' => {
                self.cursor.advance();
                if self.mode() == Mode::Attrs {
                    self.pop_mode();
                }
                // Without a body the tag ends with its attribute list.
                if self.mode() == Mode::Tag && self.next_non_whitespace() != Some('{') {
                    self.pop_mode();
                }
                Ok(self.token(TokenKind::ParenClose))
            }
            '{' => {
                self.cursor.advance();
                if self.mode() == Mode::Tag {
                    self.pop_mode();
                }
                self.push_mode(Mode::Plain);
                Ok(self.token(TokenKind::BraceOpen))
            }
            '=' => {
                self.cursor.advance();
                Ok(self.token(TokenKind::Equals))
            }
            q if QUOTES.contains(&q) => self.read_quoted_string(q),
            _ => Ok(self.read_identifier()),
        }
    }

    fn token(&self, kind: TokenKind) -> Token<'a> {
        Token::new(kind, self.last_token_start, self.cursor.position())
    }

    fn text_token(&self, kind: TokenKind, text: impl Into<Cow<'a, str>>) -> Token<'a> {
        Token::with_text(kind, text, self.last_token_start, self.cursor.position())
    }

    /// Raw slice from the current token start to the cursor.
    fn lexeme(&self) -> &'a str {
        &self.input()[self.last_token_start.offset..self.cursor.offset()]
    }

    fn next_non_whitespace(&self) -> Option<char> {
        self.cursor.rest().chars().find(|&c| !is_whitespace(c))
    }

    /// Whether a tag name starts at the cursor: a name, optional whitespace,
    /// then `{` or `(`. Consumes nothing.
    pub fn at_tag_start(&self) -> bool {
        let mut chars = self.cursor.rest().chars().peekable();
        if !chars.next().is_some_and(is_name_start_char) {
            return false;
        }
        while chars.next_if(|&c| is_name_char(c)).is_some() {}
        while chars.next_if(|&c| is_whitespace(c)).is_some() {}
        matches!(chars.next(), Some('{' | '('))
    }

    fn read_tag_name(&mut self) -> Token<'a> {
        self.cursor.advance_while(is_name_char);
        self.text_token(TokenKind::TagName, self.lexeme())
    }

    fn read_text_run(&mut self) -> Token<'a> {
        while let Some(ch) = self.cursor.current() {
            if ch == '}' {
                break;
            }
            if is_name_start_char(ch) {
                if self.at_tag_start() {
                    break;
                }
                // Every later start inside this name run reaches the same
                // character after it, so none of them is a tag start either.
                self.cursor.advance_while(is_name_char);
                continue;
            }
            self.cursor.advance();
        }
        let raw = self.lexeme();
        let text: Cow<'a, str> = if raw.contains('\r') {
            Cow::Owned(normalize_line_terminators(raw))
        } else {
            Cow::Borrowed(raw)
        };
        self.text_token(TokenKind::TextRun, text)
    }

    fn read_identifier(&mut self) -> Token<'a> {
        self.cursor
            .advance_while(|c| !is_whitespace(c) && c != '=' && c != ')');
        self.text_token(TokenKind::Identifier, self.lexeme())
    }

    fn read_quoted_string(&mut self, quote: char) -> Result<Token<'a>, ParseError> {
        let open = self.cursor.position();
        self.cursor.advance();
        let mut buf = String::new();

        loop {
            match self.cursor.current() {
                None => {
                    return Err(ParseError::new(Some(open), "unterminated quoted string"));
                }
                Some(c) if c == quote => {
                    self.cursor.advance();
                    break;
                }
                Some('\\') => {
                    let escape_at = self.cursor.position();
                    self.cursor.advance();
                    match self.cursor.current() {
                        None => {
                            return Err(ParseError::new(Some(open), "unterminated quoted string"));
                        }
                        Some('u' | 'U') => {
                            self.cursor.advance();
                            buf.push(self.read_hex_escape()?);
                        }
                        Some(escaped) => match simple_escape(escaped, quote) {
                            Some(decoded) => {
                                self.cursor.advance();
                                buf.push(decoded);
                            }
                            None => {
                                return Err(ParseError::new(
                                    Some(escape_at),
                                    "invalid escape sequence",
                                ));
                            }
                        },
                    }
                }
                Some(c) => {
                    buf.push(c);
                    self.cursor.advance();
                }
            }
        }

        Ok(self.text_token(TokenKind::QuotedString, buf))
    }

    /// Read the maximal hex digit run after `\u`; it must be exactly four long.
    fn read_hex_escape(&mut self) -> Result<char, ParseError> {
        let start = self.cursor.position();
        self.cursor.advance_while(|c| c.is_ascii_hexdigit());
        let digits = &self.input()[start.offset..self.cursor.offset()];
        if digits.len() != HEX_ESCAPE_DIGITS {
            return Err(ParseError::new(Some(start), "invalid hex sequence"));
        }
        decode_hex_escape(digits).ok_or_else(|| ParseError::new(Some(start), "invalid hex sequence"))
    }
}

/// Iterator over a lexer's tokens, ending before end-of-input or after the
/// first error.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    lexer: Lexer<'a>,
    done: bool,
}

impl<'a> Lexer<'a> {
    /// Turn the lexer into an iterator over its remaining tokens.
    pub fn tokens(self) -> Tokens<'a> {
        Tokens {
            lexer: self,
            done: false,
        }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Result<Token<'a>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.lexer.next_token() {
            Ok(token) if token.is_eof() => {
                self.done = true;
                None
            }
            Ok(token) => Some(Ok(token)),
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

/// Tokenize a whole input, stopping at (and excluding) end-of-input.
///
/// Plain-mode whitespace that the parser would skip shows up here as part
/// of text runs.
pub fn tokenize(input: &str) -> Result<Vec<Token<'_>>, ParseError> {
    Lexer::new(input).tokens().collect()
}

fn normalize_line_terminators(raw: &str) -> String {
    raw.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Character classes ───────────────────────────────────────────────────

/// Whitespace as the fxml grammar sees it.
///
/// Unicode white space minus the no-break spaces (U+00A0, U+2007, U+202F) and
/// NEL (U+0085), plus the information separators U+001C..=U+001F.
pub fn is_whitespace(c: char) -> bool {
    match c {
        '\u{1C}'..='\u{1F}' => true,
        '\u{85}' | '\u{A0}' | '\u{2007}' | '\u{202F}' => false,
        c => c.is_whitespace(),
    }
}

/// Characters that may begin a tag name.
pub fn is_name_start_char(c: char) -> bool {
    matches!(c,
        'a'..='z'
        | 'A'..='Z'
        | '_'
        | ':'
        | '@'
        | '$'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
    )
}

/// Characters that may continue a tag name.
pub fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-'
            | '.'
            | '0'..='9'
            | '\u{B7}'
            | '\u{0300}'..='\u{036F}'
            | '\u{203F}'..='\u{2040}'
        )
}
