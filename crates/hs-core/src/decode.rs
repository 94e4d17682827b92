//! Top-level decoding entry points.
//!
//! Two pipelines share the same model and symbol encoding:
//!
//! ```text
//! Viterbi:   model + sequence → viterbi → labels → extract_segments
//! Posterior: model + sequence → forward ┐
//!                              backward ┴→ posterior_labels → extract_segments
//! ```
//!
//! [`decode_viterbi`] and [`decode_posterior`] return only the segments;
//! [`decode`] wraps either in a [`DecodeReport`] with likelihood scores.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use hs_common::{DecodeMethod, Result, Segment, SCHEMA_VERSION};
use serde::Serialize;

use crate::engine::backward::backward_encoded;
use crate::engine::forward::{forward_encoded, log_likelihood_encoded, sequence_log_probability};
use crate::engine::posterior::posterior_labels;
use crate::engine::viterbi::viterbi_encoded;
use crate::model::Model;
use crate::segment::{count_segments, extract_segments, mean_segment_lengths};

/// Segments of the single most probable state path.
pub fn decode_viterbi<S: AsRef<str>>(model: &Model, sequence: &[S]) -> Result<Vec<Segment>> {
    let observations = model.encode(sequence)?;
    Ok(decode_encoded(model, &observations, DecodeMethod::Viterbi)?.segments)
}

/// Segments of the per-position most probable states.
pub fn decode_posterior<S: AsRef<str>>(model: &Model, sequence: &[S]) -> Result<Vec<Segment>> {
    let observations = model.encode(sequence)?;
    Ok(decode_encoded(model, &observations, DecodeMethod::Posterior)?.segments)
}

/// Outcome of one decode call.
#[derive(Debug, Clone, Serialize)]
pub struct DecodeReport {
    pub schema_version: String,
    pub generated_at: DateTime<Utc>,
    pub method: DecodeMethod,
    pub sequence_len: usize,
    /// `ln P(X)` summed over all paths. Serialized as `null` when `-inf`.
    pub log_likelihood: f64,
    /// `ln P(X, path)` of the decoded path; Viterbi only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_log_probability: Option<f64>,
    pub segments: Vec<Segment>,
    /// Segment count per state name; states never visited are absent.
    pub segment_counts: BTreeMap<String, usize>,
    /// Mean segment length in positions per state name.
    pub mean_segment_len: BTreeMap<String, f64>,
}

/// Decode `sequence` with the chosen method and report likelihoods.
pub fn decode<S: AsRef<str>>(
    model: &Model,
    sequence: &[S],
    method: DecodeMethod,
) -> Result<DecodeReport> {
    let observations = model.encode(sequence)?;
    decode_encoded(model, &observations, method)
}

pub(crate) fn decode_encoded(
    model: &Model,
    observations: &[usize],
    method: DecodeMethod,
) -> Result<DecodeReport> {
    let (labels, log_likelihood, path_log_probability) = match method {
        DecodeMethod::Viterbi => {
            let path = viterbi_encoded(model, observations)?;
            let total = log_likelihood_encoded(model, observations)?;
            (path.states, total, Some(path.log_probability))
        }
        DecodeMethod::Posterior => {
            let f = forward_encoded(model, observations)?;
            let b = backward_encoded(model, observations)?;
            let labels = posterior_labels(model, &f, &b)?;
            let total = sequence_log_probability(&f);
            if total == f64::NEG_INFINITY {
                tracing::warn!(
                    positions = observations.len(),
                    "sequence has zero probability under the model; labels resolve to lowest-index states"
                );
            }
            (labels, total, None)
        }
    };

    let segments: Vec<Segment> = extract_segments(&labels)?
        .into_iter()
        .map(|seg| seg.map_state(|k| model.state_name(k).to_string()))
        .collect();
    let segment_counts = count_segments(&segments);
    let mean_segment_len = mean_segment_lengths(&segments);

    tracing::info!(
        method = %method,
        positions = observations.len(),
        segments = segments.len(),
        log_likelihood,
        "decode complete"
    );

    Ok(DecodeReport {
        schema_version: SCHEMA_VERSION.to_string(),
        generated_at: Utc::now(),
        method,
        sequence_len: observations.len(),
        log_likelihood,
        path_log_probability,
        segments,
        segment_counts,
        mean_segment_len,
    })
}
