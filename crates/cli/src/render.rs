//! Diagnostic rendering for the terminal.
//!
//! Three formats: the plain caret formatter from `fxml_diagnostics`, coloured
//! source-annotated reports via ariadne, and structured JSON.

use std::io::{self, IsTerminal};

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use fxml_diagnostics::{Diagnostic, Severity, render_context};

// ── Output format ───────────────────────────────────────────────────────

/// Output format for diagnostic rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// The plain caret-pointing context formatter.
    Plain,
    /// Coloured, source-annotated output (ariadne).
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Format {
    /// Resolve the `--output` flag, detecting a default from stderr.
    pub(crate) fn resolve_or_detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("json") => Format::Json,
            Some("pretty") => Format::Pretty,
            Some("plain") => Format::Plain,
            // Default: colours only when a person is watching stderr
            _ => {
                if io::stderr().is_terminal() {
                    Format::Pretty
                } else {
                    Format::Plain
                }
            }
        }
    }
}

// ── Severity mapping ────────────────────────────────────────────────────

fn report_kind(severity: Severity) -> ReportKind<'static> {
    match severity {
        Severity::Error => ReportKind::Error,
        _ => ReportKind::Warning,
    }
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Error => Color::Red,
        _ => Color::Yellow,
    }
}

// ── Plain rendering ─────────────────────────────────────────────────────

/// Render diagnostics with the caret formatter to stderr, each prefixed by
/// its severity (`error: ` or `warning: `).
pub(crate) fn render_diagnostics_plain(source: &str, filename: &str, diagnostics: &[Diagnostic]) {
    for diag in diagnostics {
        let rendered = render_context(source, Some(filename), diag.position, &diag.message);
        eprintln!("{}: {rendered}", diag.severity);
    }
}

// ── Pretty rendering ────────────────────────────────────────────────────

/// Byte range to underline for a diagnostic at `offset`: the character
/// there, or an empty range at end of input.
fn label_range(source: &str, offset: usize) -> std::ops::Range<usize> {
    let mut start = offset.min(source.len());
    while !source.is_char_boundary(start) {
        start -= 1;
    }
    let width = source[start..].chars().next().map_or(0, char::len_utf8);
    start..start + width
}

/// Render diagnostics in pretty (ariadne) format to stderr.
///
/// Diagnostics with a position are rendered with source context. Those
/// without are rendered as standalone messages.
pub(crate) fn render_diagnostics_pretty(source: &str, filename: &str, diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }

    // Positions carry byte offsets.
    let config = Config::default()
        .with_compact(false)
        .with_index_type(IndexType::Byte);

    let mut cache = (filename, Source::from(source));

    for diag in diagnostics {
        if let Some(position) = diag.position {
            let range = label_range(source, position.offset);
            Report::build(report_kind(diag.severity), (filename, range.clone()))
                .with_message(&diag.message)
                .with_config(config)
                .with_label(
                    Label::new((filename, range))
                        .with_message(&diag.message)
                        .with_color(severity_color(diag.severity)),
                )
                .finish()
                .eprint(&mut cache)
                .ok();
        } else {
            eprintln!("{}: {}", diag.severity, diag.message);
        }
    }
}

// ── JSON rendering ──────────────────────────────────────────────────────

/// Render diagnostics as a JSON array to stdout.
pub(crate) fn render_diagnostics_json(diagnostics: &[Diagnostic]) {
    let json =
        serde_json::to_string_pretty(diagnostics).expect("Diagnostic serialization cannot fail");
    println!("{json}");
}

// ── Unified entry point ─────────────────────────────────────────────────

/// Render diagnostics in the given format.
///
/// - `Plain` / `Pretty` → stderr (document output stays on stdout).
/// - `Json`   → JSON array to stdout.
pub(crate) fn render_diagnostics(
    source: &str,
    filename: &str,
    diagnostics: &[Diagnostic],
    format: Format,
) {
    match format {
        Format::Plain => render_diagnostics_plain(source, filename, diagnostics),
        Format::Pretty => render_diagnostics_pretty(source, filename, diagnostics),
        Format::Json => render_diagnostics_json(diagnostics),
    }
}

// ── Summary line ────────────────────────────────────────────────────────

/// Print a coloured summary line showing error/warning counts.
///
/// Example: `1 error, 2 warnings`
pub(crate) fn print_summary(diagnostics: &[Diagnostic], format: Format) {
    use ariadne::Fmt;

    let errors = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    let warnings = diagnostics.len() - errors;

    if errors + warnings == 0 {
        return;
    }

    let colour = format == Format::Pretty;
    let paint = |text: String, color: Color| {
        if colour {
            format!("{}", text.fg(color))
        } else {
            text
        }
    };

    let mut parts = Vec::new();
    if errors > 0 {
        let s = if errors == 1 { "" } else { "s" };
        parts.push(paint(format!("{errors} error{s}"), Color::Red));
    }
    if warnings > 0 {
        let s = if warnings == 1 { "" } else { "s" };
        parts.push(paint(format!("{warnings} warning{s}"), Color::Yellow));
    }
    eprintln!("{}", parts.join(", "));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_range_covers_one_character() {
        assert_eq!(label_range("abc", 1), 1..2);
        assert_eq!(label_range("aé", 1), 1..3);
        assert_eq!(label_range("aé", 2), 1..3);
        assert_eq!(label_range("abc", 3), 3..3);
        assert_eq!(label_range("abc", 10), 3..3);
    }

    #[test]
    fn explicit_formats() {
        assert_eq!(Format::resolve_or_detect(Some("json")), Format::Json);
        assert_eq!(Format::resolve_or_detect(Some("plain")), Format::Plain);
        assert_eq!(Format::resolve_or_detect(Some("pretty")), Format::Pretty);
    }
}
