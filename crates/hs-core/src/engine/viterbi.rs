//! Viterbi decoding in log-space.
//!
//! Predecessor choice and final-state choice both resolve ties to the
//! lowest state index (strict `>` comparison). The traceback is an explicit
//! loop over the pointer table, so sequence length never affects stack
//! depth.

use hs_common::{Error, Result};
use hs_math::max_first;

use super::LogMatrix;
use crate::model::Model;

/// The single most probable hidden-state path.
#[derive(Debug, Clone, PartialEq)]
pub struct ViterbiPath {
    /// State index at each position, length `N`.
    pub states: Vec<usize>,
    /// `ln P(X, path)`; `-inf` if the sequence is impossible under the model.
    pub log_probability: f64,
}

/// Dense `N×K` table of argmax predecessor state indices.
struct Traceback {
    cols: usize,
    data: Vec<usize>,
}

impl Traceback {
    fn new(rows: usize, cols: usize) -> Self {
        Self {
            cols,
            data: vec![0; rows * cols],
        }
    }

    fn set(&mut self, i: usize, k: usize, from: usize) {
        self.data[i * self.cols + k] = from;
    }

    fn get(&self, i: usize, k: usize) -> usize {
        self.data[i * self.cols + k]
    }
}

/// Decode the best path for `sequence`.
pub fn viterbi<S: AsRef<str>>(model: &Model, sequence: &[S]) -> Result<ViterbiPath> {
    let observations = model.encode(sequence)?;
    viterbi_encoded(model, &observations)
}

pub(crate) fn viterbi_encoded(model: &Model, observations: &[usize]) -> Result<ViterbiPath> {
    let Some(&first) = observations.first() else {
        return Err(Error::EmptySequence);
    };
    let n = observations.len();
    let k_states = model.num_states();

    let mut v = LogMatrix::filled(n, k_states, f64::NEG_INFINITY);
    let mut pointers = Traceback::new(n, k_states);

    for (k, cell) in v.row_mut(0).iter_mut().enumerate() {
        *cell = model.log_initial(k) + model.log_emission(k, first);
    }

    let mut candidates = vec![f64::NEG_INFINITY; k_states];
    for (i, &symbol) in observations.iter().enumerate().skip(1) {
        let (prev, cur) = v.prev_and_row_mut(i);
        for (l, cell) in cur.iter_mut().enumerate() {
            for (k, c) in candidates.iter_mut().enumerate() {
                *c = prev[k] + model.log_transition(k, l);
            }
            let (from, best) = max_first(&candidates).unwrap_or((0, f64::NEG_INFINITY));
            *cell = best + model.log_emission(l, symbol);
            pointers.set(i, l, from);
        }
    }

    let (last, log_probability) =
        max_first(v.row(n - 1)).unwrap_or((0, f64::NEG_INFINITY));

    let mut states = Vec::with_capacity(n);
    let mut k = last;
    states.push(k);
    for i in (1..n).rev() {
        k = pointers.get(i, k);
        states.push(k);
    }
    states.reverse();

    if log_probability == f64::NEG_INFINITY {
        tracing::warn!(
            positions = n,
            "sequence has zero probability under the model; path resolves to lowest-index states"
        );
    }
    tracing::debug!(
        positions = n,
        states = k_states,
        log_probability,
        "viterbi pass complete"
    );
    Ok(ViterbiPath {
        states,
        log_probability,
    })
}

/// `ln P(X, path)` for an explicit state path.
pub fn path_log_probability<S: AsRef<str>>(
    model: &Model,
    sequence: &[S],
    path: &[usize],
) -> Result<f64> {
    let observations = model.encode(sequence)?;
    if observations.is_empty() {
        return Err(Error::EmptySequence);
    }
    if path.len() != observations.len() {
        return Err(Error::DimensionMismatch {
            what: "path length".to_string(),
            expected: observations.len(),
            actual: path.len(),
        });
    }
    if let Some(&bad) = path.iter().find(|&&k| k >= model.num_states()) {
        return Err(Error::DimensionMismatch {
            what: "path state index bound".to_string(),
            expected: model.num_states(),
            actual: bad,
        });
    }

    let mut total = model.log_initial(path[0]) + model.log_emission(path[0], observations[0]);
    for i in 1..path.len() {
        total += model.log_transition(path[i - 1], path[i])
            + model.log_emission(path[i], observations[i]);
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

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

    fn chars(s: &str) -> Vec<String> {
        s.chars().map(String::from).collect()
    }

    #[test]
    fn test_hand_computed_table() {
        // Eight heads on the loaded coin, one L→F switch, two fair tails.
        let model = coin_model();
        let seq = chars("HHHHHHHHTT");
        let path = viterbi(&model, &seq).unwrap();
        assert_eq!(path.states, vec![1, 1, 1, 1, 1, 1, 1, 1, 0, 0]);

        let by_hand = 0.5f64.ln()
            + 8.0 * 0.9f64.ln()
            + 7.0 * 0.9f64.ln()
            + 0.1f64.ln()
            + 0.95f64.ln()
            + 2.0 * 0.5f64.ln();
        assert!((path.log_probability - by_hand).abs() < 1e-9);
        assert!((path.log_probability - -6.013727663928826).abs() < 1e-9);

        let all_fair = path_log_probability(&model, &seq, &[0; 10]).unwrap();
        assert!(all_fair < path.log_probability);
    }

    #[test]
    fn test_alternating_flips_stay_fair() {
        let path = viterbi(&coin_model(), &chars("HTHTHTHTHT")).unwrap();
        assert_eq!(path.states, vec![0; 10]);
        assert!((path.log_probability - -8.08625863564735).abs() < 1e-9);
    }

    #[test]
    fn test_single_position() {
        let model = coin_model();
        assert_eq!(viterbi(&model, &["H"]).unwrap().states, vec![1]);
        assert_eq!(viterbi(&model, &["T"]).unwrap().states, vec![0]);
    }

    #[test]
    fn test_ties_choose_lowest_index() {
        let model = Model::new(
            ["a", "b", "c"],
            vec![1.0 / 3.0; 3],
            vec![vec![1.0 / 3.0; 3]; 3],
            ["x"],
            vec![vec![1.0]; 3],
        )
        .unwrap();
        let path = viterbi(&model, &["x", "x", "x", "x"]).unwrap();
        assert_eq!(path.states, vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_tie_on_predecessor_only() {
        // Both predecessors reach state b equally; b must point back to a.
        let model = Model::new(
            ["a", "b"],
            vec![0.5, 0.5],
            vec![vec![0.2, 0.8], vec![0.2, 0.8]],
            ["x", "y"],
            vec![vec![0.5, 0.5], vec![0.5, 0.5]],
        )
        .unwrap();
        let path = viterbi(&model, &["x", "y"]).unwrap();
        assert_eq!(path.states, vec![0, 1]);
    }

    #[test]
    fn test_forced_alternation_with_zero_probabilities() {
        let model = Model::new(
            ["a", "b"],
            vec![1.0, 0.0],
            vec![vec![0.0, 1.0], vec![1.0, 0.0]],
            ["x", "y"],
            vec![vec![1.0, 0.0], vec![0.0, 1.0]],
        )
        .unwrap();
        let path = viterbi(&model, &["x", "y", "x", "y"]).unwrap();
        assert_eq!(path.states, vec![0, 1, 0, 1]);
        assert_eq!(path.log_probability, 0.0);
    }

    #[test]
    fn test_impossible_sequence_does_not_fail() {
        let model = Model::new(
            ["a", "b"],
            vec![1.0, 0.0],
            vec![vec![1.0, 0.0], vec![0.0, 1.0]],
            ["x", "y"],
            vec![vec![1.0, 0.0], vec![0.0, 1.0]],
        )
        .unwrap();
        let path = viterbi(&model, &["x", "y"]).unwrap();
        assert_eq!(path.log_probability, f64::NEG_INFINITY);
        assert_eq!(path.states.len(), 2);
    }

    #[test]
    fn test_errors() {
        let empty: [&str; 0] = [];
        assert!(matches!(
            viterbi(&coin_model(), &empty),
            Err(Error::EmptySequence)
        ));
        assert!(matches!(
            viterbi(&coin_model(), &["H", "h"]),
            Err(Error::UnknownSymbol { position: 2, .. })
        ));
    }

    #[test]
    fn test_path_log_probability_validates_path() {
        let model = coin_model();
        assert!(matches!(
            path_log_probability(&model, &["H", "T"], &[0]),
            Err(Error::DimensionMismatch { .. })
        ));
        assert!(matches!(
            path_log_probability(&model, &["H", "T"], &[0, 2]),
            Err(Error::DimensionMismatch { .. })
        ));
    }
}
