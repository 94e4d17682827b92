//! Configuration validation errors and semantic validation.

use thiserror::Error;

use crate::decoder::DecoderConfig;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

impl From<ValidationError> for hs_common::Error {
    fn from(err: ValidationError) -> Self {
        hs_common::Error::Config(err.to_string())
    }
}

/// Validate a decoder config semantically.
pub fn validate_decoder_config(config: &DecoderConfig) -> ValidationResult<()> {
    if config.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: config.schema_version.clone(),
        });
    }

    let tol = config.row_sum_tolerance;
    if !(tol > 0.0 && tol < 1.0) {
        return Err(ValidationError::InvalidValue {
            field: "row_sum_tolerance".to_string(),
            message: format!("Must be in (0, 1), got {}", tol),
        });
    }

    if config.max_sequence_len == Some(0) {
        return Err(ValidationError::InvalidValue {
            field: "max_sequence_len".to_string(),
            message: "Must be at least 1 when set".to_string(),
        });
    }

    Ok(())
}
