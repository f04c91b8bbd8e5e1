//! Character cursor with line/column/offset tracking.
//!
//! CR, LF and CRLF each count as one line terminator and are all presented
//! to the scanner as a single `'\n'`. A CRLF pair is consumed atomically.

use fxml_diagnostics::Position;

/// Cursor over the input; `current` is the character at `position`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Cursor<'a> {
    input: &'a str,
    position: Position,
    current: Option<char>,
    /// Raw byte width of the current unit (2 for CRLF).
    width: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        let mut cursor = Self {
            input,
            position: Position::start(),
            current: None,
            width: 0,
        };
        cursor.load();
        cursor
    }

    pub(crate) fn input(&self) -> &'a str {
        self.input
    }

    pub(crate) fn position(&self) -> Position {
        self.position
    }

    pub(crate) fn offset(&self) -> usize {
        self.position.offset
    }

    /// The current character, line terminators normalized to `'\n'`.
    pub(crate) fn current(&self) -> Option<char> {
        self.current
    }

    /// Raw input from the current position on.
    pub(crate) fn rest(&self) -> &'a str {
        &self.input[self.position.offset..]
    }

    /// Move past the current character (or CRLF pair).
    pub(crate) fn advance(&mut self) {
        let Some(ch) = self.current else {
            return;
        };
        self.position.offset += self.width;
        if ch == '\n' {
            self.position.line += 1;
            self.position.column = 0;
        } else {
            self.position.column += 1;
        }
        self.load();
    }

    /// Advance while `pred` holds for the current character.
    pub(crate) fn advance_while(&mut self, mut pred: impl FnMut(char) -> bool) {
        while self.current.is_some_and(&mut pred) {
            self.advance();
        }
    }

    /// Jump back (or forward) to a previously observed position.
    ///
    /// `position` must have come from this cursor, so its offset is a
    /// character boundary of the input.
    pub(crate) fn reset(&mut self, position: Position) {
        self.position = position;
        self.load();
    }

    fn load(&mut self) {
        let rest = &self.input[self.position.offset..];
        let mut chars = rest.chars();
        match chars.next() {
            None => {
                self.current = None;
                self.width = 0;
            }
            Some('\r') => {
                self.current = Some('\n');
                self.width = if rest.as_bytes().get(1) == Some(&b'\n') {
                    2
                } else {
                    1
                };
            }
            Some(ch) => {
                self.current = Some(ch);
                self.width = ch.len_utf8();
            }
        }
    }
}
