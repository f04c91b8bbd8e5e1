pub use fxml_diagnostics::{
    CollectingSink, DefaultSink, Diagnostic, DiagnosticSink, ParseError, Position, Severity,
    UNNAMED_SOURCE, render_context,
};
