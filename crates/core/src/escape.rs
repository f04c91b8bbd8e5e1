//! Escape handling for fxml quoted strings.
//!
//! Inside a quoted string a backslash introduces one of:
//! `\t`, `\n`, `\r` (either case), `\uXXXX` (either case, exactly four hex
//! digits), `\\`, or a backslash followed by the string's own delimiter.
//! Text runs outside quoted strings are never escape-processed.

/// The three characters that can open and close a quoted string.
pub const QUOTES: [char; 3] = ['"', '\'', '`'];

/// Number of hex digits a `\u` escape must carry.
pub const HEX_ESCAPE_DIGITS: usize = 4;

/// Resolve a single-character escape (the character after the backslash).
///
/// Returns `None` for `u`/`U` (which need hex digits) and for anything that
/// is not a valid escape inside a string delimited by `quote`.
pub fn simple_escape(escaped: char, quote: char) -> Option<char> {
    match escaped {
        't' | 'T' => Some('\t'),
        'n' | 'N' => Some('\n'),
        'r' | 'R' => Some('\r'),
        '\\' => Some('\\'),
        c if c == quote => Some(quote),
        _ => None,
    }
}

/// Decode the digits of a `\u` escape into a Unicode scalar value.
///
/// `digits` must be exactly [`HEX_ESCAPE_DIGITS`] hex digits and must not
/// name a surrogate code point.
pub fn decode_hex_escape(digits: &str) -> Option<char> {
    if digits.len() != HEX_ESCAPE_DIGITS || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16)
        .ok()
        .and_then(char::from_u32)
}

/// Quote `value` with `quote`, escaping everything the lexer would decode.
///
/// The result re-lexes to exactly `value`.
pub fn quote_string(value: &str, quote: char) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}
