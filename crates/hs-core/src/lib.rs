//! hmmseg core library
//!
//! Decodes an observed symbol sequence against a discrete hidden Markov
//! model and reports contiguous runs of hidden states:
//! - Model construction and validation
//! - Forward, backward, Viterbi and posterior engines in log-space
//! - Segment extraction (1-indexed, inclusive)
//! - Top-level `decode_viterbi` / `decode_posterior` and decode reports
//! - Sampling synthetic sequences from a model
//! - Logging setup and exit codes for the `hmmseg` binary
//!
//! ```
//! use hs_core::{decode_viterbi, Model};
//!
//! let model = Model::new(
//!     ["F", "L"],
//!     vec![0.5, 0.5],
//!     vec![vec![0.95, 0.05], vec![0.10, 0.90]],
//!     ["H", "T"],
//!     vec![vec![0.5, 0.5], vec![0.9, 0.1]],
//! )?;
//! let segments = decode_viterbi(&model, &["H", "H", "T"])?;
//! assert_eq!(segments.last().map(|s| s.end), Some(3));
//! # Ok::<(), hs_core::Error>(())
//! ```

pub mod decode;
pub mod engine;
pub mod exit_codes;
pub mod job;
pub mod logging;
pub mod model;
pub mod sample;
pub mod segment;

pub use decode::{decode, decode_posterior, decode_viterbi, DecodeReport};
pub use engine::{
    backward, forward, log_likelihood, path_log_probability, posterior_labels,
    posterior_probabilities, sequence_log_probability, viterbi, LogMatrix, ViterbiPath,
};
pub use job::{DecodeJob, SequenceInput};
pub use model::{Model, ModelSpec};
pub use sample::{sample, Sample};
pub use segment::{count_segments, expand_segments, extract_segments, mean_segment_lengths};

pub use hs_common::{DecodeMethod, Error, Result, Segment};
