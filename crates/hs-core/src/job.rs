//! JSON job files: a model plus the sequence to decode.
//!
//! ```json
//! {
//!   "model": { "states": ["F", "L"], "initial_probs": [0.5, 0.5], ... },
//!   "sequence": "HHHHHHHHTT",
//!   "method": "posterior"
//! }
//! ```
//!
//! `sequence` is either a string read one character per symbol (whitespace
//! skipped) or an array of multi-character symbols.

use std::path::Path;

use hs_common::{DecodeMethod, Error, Result};
use hs_config::DecoderConfig;
use serde::{Deserialize, Serialize};

use crate::decode::{decode_encoded, DecodeReport};
use crate::model::{Model, ModelSpec};

/// Observed sequence as written in a job file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SequenceInput {
    Text(String),
    Symbols(Vec<String>),
}

impl SequenceInput {
    /// Encode against `model`, reporting 1-indexed positions of the
    /// compacted sequence.
    pub fn encode(&self, model: &Model) -> Result<Vec<usize>> {
        match self {
            SequenceInput::Text(text) => {
                let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
                model.encode_chars(&compact)
            }
            SequenceInput::Symbols(symbols) => model.encode(symbols),
        }
    }
}

/// A self-contained decode request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DecodeJob {
    pub model: ModelSpec,
    pub sequence: SequenceInput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<DecodeMethod>,
}

impl DecodeJob {
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Build the model, encode the sequence and decode.
    ///
    /// Method precedence: `method_override`, then the job's own `method`,
    /// then the config default.
    pub fn run(
        &self,
        config: &DecoderConfig,
        method_override: Option<DecodeMethod>,
    ) -> Result<DecodeReport> {
        let model = self.model.build(config.row_sum_tolerance)?;
        let observations = self.sequence.encode(&model)?;
        if observations.is_empty() {
            return Err(Error::EmptySequence);
        }
        config.check_sequence_len(observations.len())?;

        let method = method_override.or(self.method).unwrap_or(config.method);
        decode_encoded(&model, &observations, method)
    }
}
