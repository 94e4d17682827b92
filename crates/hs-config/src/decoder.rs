//! Decoder configuration (`decoder.json`).

use std::path::{Path, PathBuf};

use hs_common::DecodeMethod;
use serde::{Deserialize, Serialize};

use crate::resolve::{resolve_config, ConfigSource};
use crate::validate::{validate_decoder_config, ValidationError, ValidationResult};

/// Default tolerance for the sum-to-one check on initial and transition rows.
pub const DEFAULT_ROW_SUM_TOLERANCE: f64 = 1e-6;

fn default_schema_version() -> String {
    crate::CONFIG_SCHEMA_VERSION.to_string()
}

fn default_row_sum_tolerance() -> f64 {
    DEFAULT_ROW_SUM_TOLERANCE
}

/// Tunables for a decode run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DecoderConfig {
    /// Must match [`crate::CONFIG_SCHEMA_VERSION`].
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Method used when the caller does not pick one.
    #[serde(default)]
    pub method: DecodeMethod,

    /// Reject sequences longer than this before allocating DP matrices.
    #[serde(default)]
    pub max_sequence_len: Option<usize>,

    /// Initial and transition rows further than this from 1.0 are logged.
    #[serde(default = "default_row_sum_tolerance")]
    pub row_sum_tolerance: f64,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            method: DecodeMethod::default(),
            max_sequence_len: None,
            row_sum_tolerance: DEFAULT_ROW_SUM_TOLERANCE,
        }
    }
}

impl DecoderConfig {
    /// Parse and validate a config from JSON text.
    pub fn from_json_str(content: &str) -> ValidationResult<Self> {
        let config: DecoderConfig =
            serde_json::from_str(content).map_err(|e| ValidationError::ParseError(e.to_string()))?;
        validate_decoder_config(&config)?;
        Ok(config)
    }

    /// Read, parse and validate a config file.
    pub fn from_file(path: &Path) -> ValidationResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ValidationError::IoError(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&content)
    }

    /// Check a sequence length against `max_sequence_len`.
    pub fn check_sequence_len(&self, len: usize) -> hs_common::Result<()> {
        match self.max_sequence_len {
            Some(max) if len > max => Err(hs_common::Error::Config(format!(
                "sequence length {} exceeds max_sequence_len {}",
                len, max
            ))),
            _ => Ok(()),
        }
    }
}

/// A validated config together with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: DecoderConfig,
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
}

/// Resolve and load the decoder config, falling back to defaults.
///
/// An explicit CLI path that does not exist is an error rather than a silent
/// fallback.
pub fn load_config(cli_path: Option<&Path>) -> ValidationResult<LoadedConfig> {
    if let Some(p) = cli_path {
        if !p.exists() {
            return Err(ValidationError::IoError(format!(
                "{}: config file not found",
                p.display()
            )));
        }
    }
    let (path, source) = resolve_config(cli_path);
    let config = match &path {
        Some(p) => DecoderConfig::from_file(p)?,
        None => DecoderConfig::default(),
    };
    tracing::debug!(
        source = %source,
        path = ?path,
        method = %config.method,
        "decoder config loaded"
    );
    Ok(LoadedConfig {
        config,
        path,
        source,
    })
}
