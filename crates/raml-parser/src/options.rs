//! Parser configuration.

/// Default ceiling on nested `!include` depth.
pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 64;

/// Options controlling a single parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum number of nested includes followed from the root file (default: 64).
    pub max_include_depth: usize,

    /// Apply the text fix-ups before handing the document to the YAML reader (default: true).
    pub preprocess: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
            preprocess: true,
        }
    }
}

impl ParseOptions {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the include depth limit.
    pub fn with_max_include_depth(mut self, depth: usize) -> Self {
        self.max_include_depth = depth;
        self
    }

    /// Enable or disable the text fix-ups.
    pub fn with_preprocess(mut self, enabled: bool) -> Self {
        self.preprocess = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ParseOptions::default();
        assert_eq!(options.max_include_depth, 64);
        assert!(options.preprocess);
    }

    #[test]
    fn test_options_builder() {
        let options = ParseOptions::new()
            .with_max_include_depth(3)
            .with_preprocess(false);
        assert_eq!(options.max_include_depth, 3);
        assert!(!options.preprocess);
    }
}
