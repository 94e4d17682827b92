//! Posterior decoding from forward and backward matrices.
//!
//! `F[i][k] + B[i][k] = ln P(X, state_i = k)`, which differs from the true
//! log-posterior by `ln P(X)`, a constant for every state at a fixed
//! position. Labels therefore compare the raw sums directly.
//! [`posterior_probabilities`] subtracts the constant for callers that need
//! actual probabilities.

use hs_common::{Error, Result};
use hs_math::{argmax_first, normalize_log_probs};

use super::LogMatrix;
use crate::model::Model;

/// Most probable state at each position; ties go to the lowest index.
pub fn posterior_labels(
    model: &Model,
    forward: &LogMatrix,
    backward: &LogMatrix,
) -> Result<Vec<usize>> {
    check_shapes(model.num_states(), forward, backward)?;

    let mut scores = vec![f64::NEG_INFINITY; forward.cols()];
    let labels = forward
        .iter_rows()
        .zip(backward.iter_rows())
        .map(|(f, b)| {
            for (s, (fk, bk)) in scores.iter_mut().zip(f.iter().zip(b)) {
                *s = fk + bk;
            }
            argmax_first(&scores).unwrap_or(0)
        })
        .collect();
    Ok(labels)
}

/// Normalized log-posteriors `ln P(state_i = k | X)`.
///
/// Each row exponentiates to a distribution summing to 1. Rows of an
/// impossible sequence stay all `-inf`.
pub fn posterior_probabilities(forward: &LogMatrix, backward: &LogMatrix) -> Result<LogMatrix> {
    check_shapes(forward.cols(), forward, backward)?;

    let mut out = LogMatrix::filled(forward.rows(), forward.cols(), f64::NEG_INFINITY);
    let mut scores = vec![f64::NEG_INFINITY; forward.cols()];
    for (i, (f, b)) in forward.iter_rows().zip(backward.iter_rows()).enumerate() {
        for (s, (fk, bk)) in scores.iter_mut().zip(f.iter().zip(b)) {
            *s = fk + bk;
        }
        out.row_mut(i).copy_from_slice(&normalize_log_probs(&scores));
    }
    Ok(out)
}

fn check_shapes(k_states: usize, forward: &LogMatrix, backward: &LogMatrix) -> Result<()> {
    if forward.cols() != k_states {
        return Err(Error::DimensionMismatch {
            what: "forward matrix columns".to_string(),
            expected: k_states,
            actual: forward.cols(),
        });
    }
    if backward.cols() != k_states {
        return Err(Error::DimensionMismatch {
            what: "backward matrix columns".to_string(),
            expected: k_states,
            actual: backward.cols(),
        });
    }
    if backward.rows() != forward.rows() {
        return Err(Error::DimensionMismatch {
            what: "backward matrix rows".to_string(),
            expected: forward.rows(),
            actual: backward.rows(),
        });
    }
    if forward.rows() == 0 {
        return Err(Error::EmptySequence);
    }
    Ok(())
}
