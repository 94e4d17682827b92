//! Exit codes for the `hmmseg` CLI.
//!
//! Exit code ranges:
//! - 0: Success
//! - 10-19: Input errors (fixable by the caller)
//! - 20-29: I/O errors

use hs_common::{Error, ErrorCategory};

/// Process exit codes. Stable for scripting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Decode or sample completed.
    Clean = 0,

    /// Invalid arguments or configuration.
    ArgsError = 10,

    /// Model parameters rejected.
    ModelError = 11,

    /// Sequence could not be decoded against the model.
    SequenceError = 12,

    /// File could not be read or parsed.
    IoError = 21,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == ExitCode::Clean
    }

    /// Codes 10-19 can be resolved by fixing the input.
    pub fn is_user_error(self) -> bool {
        (10..20).contains(&(self as i32))
    }

    /// Name used in JSON error output.
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::ModelError => "ERR_MODEL",
            ExitCode::SequenceError => "ERR_SEQUENCE",
            ExitCode::IoError => "ERR_IO",
        }
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err.category() {
            ErrorCategory::Model => ExitCode::ModelError,
            ErrorCategory::Sequence => ExitCode::SequenceError,
            ErrorCategory::Config => ExitCode::ArgsError,
            ErrorCategory::Io => ExitCode::IoError,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping() {
        assert_eq!(ExitCode::from(&Error::EmptyModel), ExitCode::ModelError);
        assert_eq!(ExitCode::from(&Error::EmptySequence), ExitCode::SequenceError);
        assert_eq!(
            ExitCode::from(&Error::Config("bad".to_string())),
            ExitCode::ArgsError
        );
        let io = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(ExitCode::from(&io), ExitCode::IoError);
    }

    #[test]
    fn test_every_error_has_a_reachable_code() {
        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let errors = [
            Error::EmptyModel,
            Error::UnknownSymbol {
                position: 1,
                symbol: "N".to_string(),
            },
            Error::Config("bad".to_string()),
            Error::Json(json),
        ];
        let codes: Vec<i32> = errors.iter().map(|e| ExitCode::from(e).as_i32()).collect();
        assert_eq!(codes, vec![11, 12, 10, 21]);
    }

    #[test]
    fn test_ranges() {
        assert!(ExitCode::Clean.is_success());
        assert!(ExitCode::ModelError.is_user_error());
        assert!(!ExitCode::IoError.is_user_error());
        assert_eq!(ExitCode::SequenceError.to_string(), "ERR_SEQUENCE (12)");
        assert_eq!(i32::from(ExitCode::IoError), 21);
    }
}
