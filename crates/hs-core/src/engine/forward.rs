//! Forward algorithm in log-space.

use hs_common::{Error, Result};
use hs_math::log_sum_exp;

use super::LogMatrix;
use crate::model::Model;

/// Compute the forward matrix `F` for `sequence`.
///
/// `F[0][k] = ln π_k + ln e_k(x_0)` and for `i ≥ 1`
/// `F[i][l] = logsumexp_k(F[i-1][k] + ln a_kl + ln e_l(x_i))`.
pub fn forward<S: AsRef<str>>(model: &Model, sequence: &[S]) -> Result<LogMatrix> {
    let observations = model.encode(sequence)?;
    forward_encoded(model, &observations)
}

pub(crate) fn forward_encoded(model: &Model, observations: &[usize]) -> Result<LogMatrix> {
    let Some(&first) = observations.first() else {
        return Err(Error::EmptySequence);
    };
    let n = observations.len();
    let k_states = model.num_states();

    let mut f = LogMatrix::filled(n, k_states, f64::NEG_INFINITY);
    init_column(model, first, f.row_mut(0));

    let mut terms = vec![f64::NEG_INFINITY; k_states];
    for (i, &symbol) in observations.iter().enumerate().skip(1) {
        let (prev, cur) = f.prev_and_row_mut(i);
        step(model, symbol, prev, cur, &mut terms);
    }

    tracing::debug!(positions = n, states = k_states, "forward pass complete");
    Ok(f)
}

/// `ln P(X)`: log-sum-exp over the last forward row.
pub fn sequence_log_probability(forward: &LogMatrix) -> f64 {
    match forward.rows() {
        0 => f64::NEG_INFINITY,
        n => log_sum_exp(forward.row(n - 1)),
    }
}

/// `ln P(X)` without materializing the full forward matrix.
pub fn log_likelihood<S: AsRef<str>>(model: &Model, sequence: &[S]) -> Result<f64> {
    let observations = model.encode(sequence)?;
    log_likelihood_encoded(model, &observations)
}

/// Rolling two-row forward pass; memory is `O(K)` regardless of `N`.
pub(crate) fn log_likelihood_encoded(model: &Model, observations: &[usize]) -> Result<f64> {
    let Some(&first) = observations.first() else {
        return Err(Error::EmptySequence);
    };
    let k_states = model.num_states();

    let mut prev = vec![f64::NEG_INFINITY; k_states];
    let mut cur = vec![f64::NEG_INFINITY; k_states];
    let mut terms = vec![f64::NEG_INFINITY; k_states];
    init_column(model, first, &mut prev);

    for &symbol in &observations[1..] {
        step(model, symbol, &prev, &mut cur, &mut terms);
        std::mem::swap(&mut prev, &mut cur);
    }
    Ok(log_sum_exp(&prev))
}

fn init_column(model: &Model, symbol: usize, out: &mut [f64]) {
    for (k, cell) in out.iter_mut().enumerate() {
        *cell = model.log_initial(k) + model.log_emission(k, symbol);
    }
}

fn step(model: &Model, symbol: usize, prev: &[f64], cur: &mut [f64], terms: &mut [f64]) {
    for (l, cell) in cur.iter_mut().enumerate() {
        let log_e = model.log_emission(l, symbol);
        for (k, term) in terms.iter_mut().enumerate() {
            *term = prev[k] + model.log_transition(k, l) + log_e;
        }
        *cell = log_sum_exp(terms);
    }
}
