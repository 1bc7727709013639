//! Parser configuration

use serde::{Deserialize, Serialize};

/// Default nesting ceiling
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Parser configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Maximum nesting of arrays and objects
    pub max_depth: usize,
    /// Accept non-whitespace bytes after the root value
    pub allow_trailing: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            allow_trailing: false,
        }
    }
}

impl ParserConfig {
    /// Configuration for untrusted input
    pub fn strict() -> Self {
        Self {
            max_depth: 64,
            allow_trailing: false,
        }
    }

    /// Configuration for trusted, deeply nested or concatenated input
    pub fn lenient() -> Self {
        Self {
            max_depth: 1024,
            allow_trailing: true,
        }
    }

    /// Set the nesting ceiling
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set whether trailing bytes are accepted
    pub fn with_allow_trailing(mut self, allow: bool) -> Self {
        self.allow_trailing = allow;
        self
    }
}
