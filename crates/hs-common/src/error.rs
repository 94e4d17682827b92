//! Error types for hmmseg.
//!
//! Every failure is fail-fast: model construction or decoding aborts on the
//! first violation and reports a structured error naming the offending row,
//! column or sequence position. Zero probabilities are never errors; they
//! become `-inf` in log-space.
//!
//! Errors carry:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Remediation hints for humans
//!
//! # Agent-Facing Output
//!
//! ```json
//! {
//!   "code": 20,
//!   "category": "sequence",
//!   "message": "unknown symbol 'N' at position 17",
//!   "context": { "position": 17, "symbol": "N" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for hmmseg operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Model parameters inconsistent or invalid.
    Model,
    /// Observed sequence cannot be decoded against the model.
    Sequence,
    /// Decoder configuration errors.
    Config,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Model => write!(f, "model"),
            ErrorCategory::Sequence => write!(f, "sequence"),
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for hmmseg.
#[derive(Error, Debug)]
pub enum Error {
    // Model errors (10-19)
    #[error("dimension mismatch in {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    #[error("invalid probability in {what} at row {row}, column {col}: {value}")]
    InvalidProbability {
        what: String,
        row: usize,
        col: usize,
        value: f64,
    },

    #[error("model must declare at least one state and one symbol")]
    EmptyModel,

    #[error("duplicate {what} identifier '{name}'")]
    DuplicateIdentifier { what: String, name: String },

    // Sequence errors (20-29)
    #[error("unknown symbol '{symbol}' at position {position}")]
    UnknownSymbol { position: usize, symbol: String },

    #[error("sequence is empty")]
    EmptySequence,

    // Configuration errors (30-39)
    #[error("configuration error: {0}")]
    Config(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Model errors
    /// - 20-29: Sequence errors
    /// - 30-39: Configuration errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::DimensionMismatch { .. } => 10,
            Error::InvalidProbability { .. } => 11,
            Error::EmptyModel => 12,
            Error::DuplicateIdentifier { .. } => 13,
            Error::UnknownSymbol { .. } => 20,
            Error::EmptySequence => 21,
            Error::Config(_) => 30,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::DimensionMismatch { .. }
            | Error::InvalidProbability { .. }
            | Error::EmptyModel
            | Error::DuplicateIdentifier { .. } => ErrorCategory::Model,

            Error::UnknownSymbol { .. } | Error::EmptySequence => ErrorCategory::Sequence,

            Error::Config(_) => ErrorCategory::Config,

            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::DimensionMismatch { .. } => "Model Dimension Mismatch",
            Error::InvalidProbability { .. } => "Invalid Model Probability",
            Error::EmptyModel => "Empty Model",
            Error::DuplicateIdentifier { .. } => "Duplicate Model Identifier",
            Error::UnknownSymbol { .. } => "Unknown Sequence Symbol",
            Error::EmptySequence => "Empty Sequence",
            Error::Config(_) => "Configuration Error",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Parse Error",
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::DimensionMismatch { .. } => {
                "Every transition row needs one entry per state and every emission row one entry per alphabet symbol."
            }
            Error::InvalidProbability { .. } => {
                "Probabilities must be finite and non-negative; each emission row needs a positive total."
            }
            Error::EmptyModel => "Declare at least one state and one alphabet symbol.",
            Error::DuplicateIdentifier { .. } => "State names and alphabet symbols must be unique.",
            Error::UnknownSymbol { .. } => {
                "Add the symbol to the model alphabet or clean the input sequence."
            }
            Error::EmptySequence => "Provide a sequence with at least one symbol.",
            Error::Config(_) => "Run 'hmmseg config show' to inspect the resolved configuration.",
            Error::Io(_) => "Check that the file exists and is readable.",
            Error::Json(_) => "Invalid JSON in file. Check syntax with 'jq . <file>'.",
        }
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Additional structured context (e.g., sequence position).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::DimensionMismatch {
                what,
                expected,
                actual,
            } => {
                context.insert("what".to_string(), serde_json::json!(what));
                context.insert("expected".to_string(), serde_json::json!(expected));
                context.insert("actual".to_string(), serde_json::json!(actual));
            }
            Error::InvalidProbability { what, row, col, .. } => {
                context.insert("what".to_string(), serde_json::json!(what));
                context.insert("row".to_string(), serde_json::json!(row));
                context.insert("col".to_string(), serde_json::json!(col));
            }
            Error::UnknownSymbol { position, symbol } => {
                context.insert("position".to_string(), serde_json::json!(position));
                context.insert("symbol".to_string(), serde_json::json!(symbol));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            context,
        }
    }
}

impl StructuredError {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }
}

/// Format an error for human-readable stderr output.
///
/// Output format:
/// ```text
/// ✗ [Headline]
///   Reason: [Error message]
///   Fix: [Remediation hint]
/// ```
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, cyan, reset) = if use_color {
        ("\x1b[31m", "\x1b[36m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    format!(
        "{red}✗{reset} {headline}\n  Reason: {message}\n  {cyan}Fix:{reset} {remediation}",
        red = red,
        cyan = cyan,
        reset = reset,
        headline = err.headline(),
        message = err,
        remediation = err.remediation()
    )
}
