//! Error types for the comment graph analyzer

use std::fmt;
use thiserror::Error;

/// Rule broken by a raw comment record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationRule {
    /// The top-level document is not a JSON array
    NotAnArray,

    /// The comment is not a JSON object
    MalformedRecord,

    /// A required field is missing or has the wrong primitive type
    InvalidField(&'static str),

    /// The declared parent id does not match the enclosing comment
    ParentMismatch { expected: i64, found: i64 },
}

impl fmt::Display for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationRule::NotAnArray => write!(f, "input must be an array of comments"),
            ValidationRule::MalformedRecord => write!(f, "record is not an object"),
            ValidationRule::InvalidField(field) => write!(f, "field `{}` is missing or invalid", field),
            ValidationRule::ParentMismatch { expected, found } => write!(
                f,
                "parent id {} does not match enclosing comment {}",
                found, expected
            ),
        }
    }
}

/// First violation found while checking the raw comment tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("comment #{position} at depth {depth}: {rule}")]
pub struct ValidationError {
    /// 1-based position of the offending comment among its siblings
    pub position: usize,

    /// Nesting depth of the offending comment (0 = top level)
    pub depth: usize,

    /// The rule that failed
    pub rule: ValidationRule,
}

/// Main error type for the analyzer
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Raw input failed validation
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Input exceeds the configured node ceiling
    #[error("Input too large: {nodes} nodes exceeds the limit of {limit}")]
    InputTooLarge { nodes: usize, limit: usize },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV parsing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias for the analyzer
pub type Result<T> = std::result::Result<T, AnalyzerError>;
