/// What to do with input that follows the root element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrailingContent {
    /// Stop at the end of the root element without looking further.
    #[default]
    Ignore,
    /// Report trailing non-whitespace input as a warning.
    Warn,
    /// Treat trailing non-whitespace input as a fatal error.
    Error,
}

/// Default for [`ParseOptions::max_depth`].
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Parser configuration.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Name of the input shown in diagnostics (e.g. a file path).
    pub source_name: Option<String>,
    /// Handling of input after the root element.
    pub trailing: TrailingContent,
    /// Warn when an attribute name repeats within one element.
    pub warn_duplicate_attributes: bool,
    /// Deepest element nesting accepted; the root element is level 1.
    ///
    /// An element past this depth is a fatal "nesting too deep" error at its
    /// tag name. The parser, the tree builder and the emitters recurse once
    /// per level, so this bound is what keeps them on the stack.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            source_name: None,
            trailing: TrailingContent::default(),
            warn_duplicate_attributes: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the source name (builder pattern).
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    /// Set trailing-content handling (builder pattern).
    pub fn with_trailing(mut self, trailing: TrailingContent) -> Self {
        self.trailing = trailing;
        self
    }

    /// Enable or disable duplicate-attribute warnings (builder pattern).
    pub fn with_duplicate_attribute_warnings(mut self, enabled: bool) -> Self {
        self.warn_duplicate_attributes = enabled;
        self
    }

    /// Set the nesting limit (builder pattern).
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
