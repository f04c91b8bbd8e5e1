//! Caret-pointing rendering of a message against the source line it refers to.
//!
//! ```text
//! unexpected token
//!  --> page.fxml:1:2
//!   |
//! 1 |x = y
//!   |  ^ unexpected token
//!   |
//! ```

use crate::Position;

/// Source name shown in the arrow line when none was supplied.
pub const UNNAMED_SOURCE: &str = "<unnamed source>";

const LINE_TERMINATORS: [char; 2] = ['\n', '\r'];

/// Render `message` with the source context of `position`.
///
/// Without a position the message is returned unchanged. With one, the
/// output has six lines: the message, an arrow line naming the source and
/// the 1-based line with the 0-based column, a blank gutter, the offending
/// line prefixed by its number, a caret under the column followed by the
/// message again, and a closing blank gutter.
pub fn render_context(
    input: &str,
    source_name: Option<&str>,
    position: Option<Position>,
    message: &str,
) -> String {
    let Some(position) = position else {
        return message.to_string();
    };

    let (start, end) = line_bounds(input, position.offset);
    let context = &input[start..end];

    let line_num = (position.line + 1).to_string();
    let pad = " ".repeat(line_num.len());
    let caret_pad = " ".repeat(position.column);
    let name = source_name.unwrap_or(UNNAMED_SOURCE);

    format!(
        "{message}\n\
         {pad}--> {name}:{line_num}:{column}\n\
         {pad} |\n\
         {line_num} |{context}\n\
         {pad} |{caret_pad}^ {message}\n\
         {pad} |",
        column = position.column,
    )
}

/// Byte range of the line containing `offset`, terminators excluded.
///
/// Offsets past the end clamp to the last line; offsets inside a multi-byte
/// character snap back to its first byte.
fn line_bounds(input: &str, offset: usize) -> (usize, usize) {
    let mut pos = offset.min(input.len());
    while !input.is_char_boundary(pos) {
        pos -= 1;
    }
    let start = input[..pos]
        .rfind(LINE_TERMINATORS)
        .map_or(0, |i| i + 1);
    let end = input[pos..]
        .find(LINE_TERMINATORS)
        .map_or(input.len(), |i| pos + i);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_position_yields_bare_message() {
        assert_eq!(render_context("abc", Some("f"), None, "oops"), "oops");
    }

    #[test]
    fn caret_sits_under_column() {
        let out = render_context("x = y\n", None, Some(Position::new(0, 2, 2)), "bad");
        let expected = "bad\n \
                        --> <unnamed source>:1:2\n  \
                        |\n\
                        1 |x = y\n  \
                        |  ^ bad\n  \
                        |";
        assert_eq!(out, expected);
    }

    #[test]
    fn caret_line_aligns_with_source_line() {
        let out = render_context("x = y\n", Some("t.fxml"), Some(Position::new(0, 2, 2)), "m");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[3], "1 |x = y");
        let source_col = lines[3].find('=').unwrap();
        let caret_col = lines[4].find('^').unwrap();
        assert_eq!(source_col, caret_col);
    }

    #[test]
    fn picks_the_right_line_in_multiline_input() {
        let input = "first\nsecond line\nthird";
        let out = render_context(input, Some("doc.fxml"), Some(Position::new(1, 7, 13)), "here");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[1], " --> doc.fxml:2:7");
        assert_eq!(lines[3], "2 |second line");
        assert_eq!(lines[4], "  |       ^ here");
    }

    #[test]
    fn crlf_terminators_are_stripped() {
        let input = "a{\r\n  b\r\n}";
        let out = render_context(input, None, Some(Position::new(1, 2, 6)), "m");
        assert!(out.contains("2 |  b\n"), "{out}");
        assert!(!out.contains('\r'), "{out:?}");
    }

    #[test]
    fn wide_gutter_for_multi_digit_lines() {
        let input = "\n".repeat(11) + "boom";
        let out = render_context(&input, None, Some(Position::new(11, 0, 11)), "m");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[1], "  --> <unnamed source>:12:0");
        assert_eq!(lines[2], "   |");
        assert_eq!(lines[3], "12 |boom");
        assert_eq!(lines[4], "   |^ m");
    }

    #[test]
    fn offset_past_end_clamps_to_last_line() {
        let out = render_context("abc", None, Some(Position::new(0, 3, 99)), "eof");
        assert!(out.contains("1 |abc\n"), "{out}");
    }

    #[test]
    fn offset_at_terminator_shows_preceding_line() {
        let out = render_context("ab\ncd", None, Some(Position::new(0, 2, 2)), "m");
        assert!(out.contains("1 |ab\n"), "{out}");
    }

    #[test]
    fn line_bounds_snaps_to_char_boundary() {
        // '€' spans bytes 0..3
        assert_eq!(line_bounds("€x\ny", 1), (0, 4));
    }
}
