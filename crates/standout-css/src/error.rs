//! Error type for style compilation.
//!
//! Registration is synchronous and has no recovery path: anything that goes
//! wrong while turning a description into CSS surfaces as a [`StyleError`]
//! at the call site of [`style`](fn@crate::style), [`css_rule`](crate::css_rule)
//! and friends.

use thiserror::Error;

/// Error returned when a style description cannot be compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleError {
    /// A color string could not be parsed.
    #[error("invalid color '{value}': {reason}")]
    InvalidColor {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A typed value refused to render itself as CSS text.
    #[error("invalid {kind} value: {message}")]
    InvalidValue {
        /// Type tag of the offending value (`color`, `gradient`, ...).
        kind: String,
        /// Description of the failure.
        message: String,
    },

    /// Nesting was used where only declarations are allowed.
    #[error("{context} does not support nested selectors (found '{selector}')")]
    UnexpectedNesting {
        /// Where the nesting was found (`@keyframes`, `@font-face`).
        context: String,
        /// The first offending selector.
        selector: String,
    },

    /// The description nests deeper than [`MAX_NESTING_DEPTH`](crate::style::MAX_NESTING_DEPTH).
    #[error("style nesting exceeds the maximum depth of {limit}")]
    NestingTooDeep {
        /// The configured limit.
        limit: usize,
    },

    /// A JSON or YAML description has the wrong shape.
    #[error("invalid style description at '{key}': {message}")]
    InvalidDescription {
        /// The key whose value was rejected.
        key: String,
        /// What was expected instead.
        message: String,
    },

    /// JSON or YAML syntax error.
    #[error("failed to parse style description: {0}")]
    Parse(String),

    /// Writing CSS text failed.
    #[error("failed to write css: {0}")]
    Format(#[from] std::fmt::Error),
}

impl From<serde_json::Error> for StyleError {
    fn from(err: serde_json::Error) -> Self {
        StyleError::Parse(err.to_string())
    }
}

impl From<serde_yaml::Error> for StyleError {
    fn from(err: serde_yaml::Error) -> Self {
        StyleError::Parse(err.to_string())
    }
}
