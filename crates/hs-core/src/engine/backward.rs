//! Backward algorithm in log-space.

use hs_common::{Error, Result};
use hs_math::log_sum_exp;

use super::LogMatrix;
use crate::model::Model;

/// Compute the backward matrix `B` for `sequence`.
///
/// `B[N-1][k] = 0` and for `i` from `N-2` down to `0`
/// `B[i][k] = logsumexp_l(B[i+1][l] + ln a_kl + ln e_l(x_{i+1}))`.
pub fn backward<S: AsRef<str>>(model: &Model, sequence: &[S]) -> Result<LogMatrix> {
    let observations = model.encode(sequence)?;
    backward_encoded(model, &observations)
}

pub(crate) fn backward_encoded(model: &Model, observations: &[usize]) -> Result<LogMatrix> {
    if observations.is_empty() {
        return Err(Error::EmptySequence);
    }
    let n = observations.len();
    let k_states = model.num_states();

    let mut b = LogMatrix::filled(n, k_states, f64::NEG_INFINITY);
    b.row_mut(n - 1).fill(0.0);

    let mut next_emission = vec![f64::NEG_INFINITY; k_states];
    let mut terms = vec![f64::NEG_INFINITY; k_states];
    for i in (0..n - 1).rev() {
        let symbol = observations[i + 1];
        for (l, e) in next_emission.iter_mut().enumerate() {
            *e = model.log_emission(l, symbol);
        }

        let (cur, next) = b.row_mut_and_next(i);
        for (k, cell) in cur.iter_mut().enumerate() {
            for (l, term) in terms.iter_mut().enumerate() {
                *term = next[l] + model.log_transition(k, l) + next_emission[l];
            }
            *cell = log_sum_exp(&terms);
        }
    }

    tracing::debug!(positions = n, states = k_states, "backward pass complete");
    Ok(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::forward::{forward, sequence_log_probability};

    fn coin_model() -> Model {
        Model::new(
            ["F", "L"],
            vec![0.5, 0.5],
            vec![vec![0.95, 0.05], vec![0.10, 0.90]],
            ["H", "T"],
            vec![vec![0.5, 0.5], vec![0.9, 0.1]],
        )
        .unwrap()
    }

    #[test]
    fn test_last_row_is_zero() {
        let b = backward(&coin_model(), &["H", "T", "T"]).unwrap();
        assert_eq!(b.row(2), &[0.0, 0.0]);
    }

    #[test]
    fn test_single_position_is_zero() {
        let b = backward(&coin_model(), &["T"]).unwrap();
        assert_eq!(b.rows(), 1);
        assert_eq!(b.row(0), &[0.0, 0.0]);
    }

    #[test]
    fn test_penultimate_row_by_hand() {
        let b = backward(&coin_model(), &["H", "T"]).unwrap();
        let expected_f = 0.95 * 0.5 + 0.05 * 0.1;
        let expected_l = 0.10 * 0.5 + 0.90 * 0.1;
        assert!((b[(0, 0)] - f64::ln(expected_f)).abs() < 1e-12);
        assert!((b[(0, 1)] - f64::ln(expected_l)).abs() < 1e-12);
    }

    #[test]
    fn test_total_probability_matches_forward() {
        let model = coin_model();
        let seq: Vec<String> = "HTHHHTTTHHTHTTTH".chars().map(String::from).collect();
        let f = forward(&model, &seq).unwrap();
        let b = backward(&model, &seq).unwrap();

        let first = model.encode(&seq[..1]).unwrap()[0];
        let via_backward: Vec<f64> = (0..model.num_states())
            .map(|k| model.log_initial(k) + model.log_emission(k, first) + b[(0, k)])
            .collect();
        let total_b = log_sum_exp(&via_backward);
        assert!((sequence_log_probability(&f) - total_b).abs() < 1e-9);
    }

    #[test]
    fn test_errors() {
        let empty: [&str; 0] = [];
        assert!(matches!(
            backward(&coin_model(), &empty),
            Err(Error::EmptySequence)
        ));
        assert!(matches!(
            backward(&coin_model(), &["Q"]),
            Err(Error::UnknownSymbol { position: 1, .. })
        ));
    }
}
