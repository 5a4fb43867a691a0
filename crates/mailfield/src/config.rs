//! Parser configuration types.

use crate::error::{Error, Result};

/// Default limit on comment nesting.
pub const DEFAULT_MAX_COMMENT_DEPTH: usize = 64;

/// Header parser configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParserConfig {
    /// Deepest comment nesting accepted before `comment` stops matching.
    pub max_comment_depth: usize,
    /// Decode encoded words in unknown charsets as lossy UTF-8 instead of
    /// leaving them untouched.
    pub decode_unknown_charsets: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_comment_depth: DEFAULT_MAX_COMMENT_DEPTH,
            decode_unknown_charsets: false,
        }
    }
}

impl ParserConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration builder.
    #[must_use]
    pub fn builder() -> ParserConfigBuilder {
        ParserConfigBuilder::new()
    }
}

/// Builder for parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfigBuilder {
    max_comment_depth: usize,
    decode_unknown_charsets: bool,
}

impl Default for ParserConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_comment_depth: DEFAULT_MAX_COMMENT_DEPTH,
            decode_unknown_charsets: false,
        }
    }

    /// Sets the maximum comment nesting depth.
    #[must_use]
    pub const fn max_comment_depth(mut self, depth: usize) -> Self {
        self.max_comment_depth = depth;
        self
    }

    /// Decodes encoded words in unrecognised charsets as lossy UTF-8.
    #[must_use]
    pub const fn decode_unknown_charsets(mut self, enabled: bool) -> Self {
        self.decode_unknown_charsets = enabled;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the comment depth is zero, which would reject
    /// every comment.
    pub fn build(self) -> Result<ParserConfig> {
        if self.max_comment_depth == 0 {
            return Err(Error::InvalidConfig(
                "max_comment_depth must be at least 1".to_string(),
            ));
        }
        Ok(ParserConfig {
            max_comment_depth: self.max_comment_depth,
            decode_unknown_charsets: self.decode_unknown_charsets,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ParserConfig::default();
        assert_eq!(config.max_comment_depth, DEFAULT_MAX_COMMENT_DEPTH);
        assert!(!config.decode_unknown_charsets);
    }

    #[test]
    fn test_builder() {
        let config = ParserConfig::builder()
            .max_comment_depth(8)
            .decode_unknown_charsets(true)
            .build()
            .unwrap();
        assert_eq!(config.max_comment_depth, 8);
        assert!(config.decode_unknown_charsets);
    }

    #[test]
    fn test_builder_rejects_zero_depth() {
        let result = ParserConfig::builder().max_comment_depth(0).build();
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }
}
