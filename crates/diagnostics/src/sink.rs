use crate::{Diagnostic, ParseError, Position, render_context};

/// Receiver of the parser's warnings and errors.
///
/// `warn` is informational and never interrupts the parse. `error` renders
/// the fatal condition and hands back the [`ParseError`] the parser returns,
/// abandoning everything built so far.
pub trait DiagnosticSink {
    /// Report a non-fatal problem.
    fn warn(&mut self, position: Option<Position>, message: &str);

    /// Report a fatal problem and produce the error that aborts the parse.
    fn error(&mut self, position: Option<Position>, message: &str) -> ParseError;
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn warn(&mut self, position: Option<Position>, message: &str) {
        (**self).warn(position, message);
    }

    fn error(&mut self, position: Option<Position>, message: &str) -> ParseError {
        (**self).error(position, message)
    }
}

// ── DefaultSink ──────────────────────────────────────────────────────────

/// Renders diagnostics against the input with [`render_context`].
///
/// Warnings are written to standard error; errors are returned rendered.
#[derive(Debug, Clone)]
pub struct DefaultSink<'a> {
    input: &'a str,
    source_name: Option<String>,
}

impl<'a> DefaultSink<'a> {
    /// Create a sink for `input`, optionally naming its source.
    pub fn new(input: &'a str, source_name: Option<&str>) -> Self {
        Self {
            input,
            source_name: source_name.map(str::to_owned),
        }
    }

    /// Render `message` against this sink's input.
    pub fn format(&self, position: Option<Position>, message: &str) -> String {
        render_context(self.input, self.source_name.as_deref(), position, message)
    }
}

impl DiagnosticSink for DefaultSink<'_> {
    fn warn(&mut self, position: Option<Position>, message: &str) {
        log::debug!("warning reported at {position:?}: {message}");
        eprintln!("{}", self.format(position, message));
    }

    fn error(&mut self, position: Option<Position>, message: &str) -> ParseError {
        log::debug!("error reported at {position:?}: {message}");
        ParseError::with_report(position, message, self.format(position, message))
    }
}

// ── CollectingSink ───────────────────────────────────────────────────────

/// Records every diagnostic instead of printing it.
///
/// Errors are still rendered with source context so the returned
/// [`ParseError`] matches what [`DefaultSink`] would produce.
#[derive(Debug, Clone)]
pub struct CollectingSink<'a> {
    inner: DefaultSink<'a>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> CollectingSink<'a> {
    /// Create a collecting sink for `input`.
    pub fn new(input: &'a str, source_name: Option<&str>) -> Self {
        Self {
            inner: DefaultSink::new(input, source_name),
            diagnostics: Vec::new(),
        }
    }

    /// Diagnostics recorded so far, in report order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Only the warnings recorded so far.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == crate::Severity::Warn)
    }

    /// Consume the sink, returning the recorded diagnostics.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl DiagnosticSink for CollectingSink<'_> {
    fn warn(&mut self, position: Option<Position>, message: &str) {
        self.diagnostics.push(Diagnostic::warn(message, position));
    }

    fn error(&mut self, position: Option<Position>, message: &str) -> ParseError {
        self.diagnostics.push(Diagnostic::error(message, position));
        ParseError::with_report(position, message, self.inner.format(position, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Severity;

    #[test]
    fn default_sink_renders_error_with_context() {
        let mut sink = DefaultSink::new("a{ ) }", Some("in.fxml"));
        let err = sink.error(Some(Position::new(0, 3, 3)), "Unexpected token: )");
        assert_eq!(err.message, "Unexpected token: )");
        assert!(err.report.starts_with("Unexpected token: )\n --> in.fxml:1:3\n"));
        assert!(err.report.contains("1 |a{ ) }\n"));
    }

    #[test]
    fn default_sink_error_without_position_is_bare() {
        let mut sink = DefaultSink::new("abc", None);
        let err = sink.error(None, "no root");
        assert_eq!(err.report, "no root");
        assert_eq!(err.position, None);
    }

    #[test]
    fn collecting_sink_records_in_order() {
        let mut sink = CollectingSink::new("x", None);
        sink.warn(None, "first");
        sink.warn(Some(Position::start()), "second");
        let err = sink.error(Some(Position::start()), "third");
        assert_eq!(err.message, "third");

        let severities: Vec<Severity> = sink.diagnostics().iter().map(|d| d.severity).collect();
        assert_eq!(severities, [Severity::Warn, Severity::Warn, Severity::Error]);
        assert_eq!(sink.warnings().count(), 2);
        assert_eq!(sink.into_diagnostics()[1].message, "second");
    }

    #[test]
    fn sink_works_through_mutable_reference() {
        fn report(mut sink: impl DiagnosticSink) -> ParseError {
            sink.warn(None, "w");
            sink.error(None, "e")
        }
        let mut sink = CollectingSink::new("", None);
        let err = report(&mut sink);
        assert_eq!(err.report, "e");
        assert_eq!(sink.diagnostics().len(), 2);
    }
}
