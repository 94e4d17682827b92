//! Draw synthetic state paths and observation sequences from a model.
//!
//! Sampling is the generative direction of the decoders: a sequence drawn
//! here can be fed straight back into [`crate::decode::decode`] and the recovered
//! segments compared with the hidden path.

use hs_common::{Error, Result};
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;

use crate::model::Model;

/// A hidden path together with the symbols it emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub states: Vec<usize>,
    pub symbols: Vec<usize>,
}

impl Sample {
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// State names along the hidden path.
    pub fn state_names<'m>(&self, model: &'m Model) -> Vec<&'m str> {
        self.states.iter().map(|&k| model.state_name(k)).collect()
    }

    /// Emitted symbols as alphabet entries.
    pub fn symbol_names<'m>(&self, model: &'m Model) -> Vec<&'m str> {
        self.symbols
            .iter()
            .map(|&m| model.alphabet()[m].as_str())
            .collect()
    }
}

/// Sample `length` positions from `model`.
///
/// Rows whose weights are all zero are only an error once the walk actually
/// lands in them.
pub fn sample<R: Rng + ?Sized>(model: &Model, length: usize, rng: &mut R) -> Result<Sample> {
    if length == 0 {
        return Err(Error::EmptySequence);
    }
    let k_states = model.num_states();

    let initial = WeightedIndex::<f64>::new(model.initial_probs())
        .map_err(|_| zero_row("initial", 0))?;
    let transitions: Vec<Option<WeightedIndex<f64>>> = (0..k_states)
        .map(|k| WeightedIndex::<f64>::new(model.transition_row(k)).ok())
        .collect();
    let emissions: Vec<Option<WeightedIndex<f64>>> = (0..k_states)
        .map(|k| WeightedIndex::<f64>::new(model.emission_row(k)).ok())
        .collect();

    let mut states = Vec::with_capacity(length);
    let mut symbols = Vec::with_capacity(length);
    let mut k = initial.sample(rng);
    for i in 0..length {
        if i > 0 {
            let row = transitions[k]
                .as_ref()
                .ok_or_else(|| zero_row("transitions", k))?;
            k = row.sample(rng);
        }
        let row = emissions[k]
            .as_ref()
            .ok_or_else(|| zero_row("emissions", k))?;
        states.push(k);
        symbols.push(row.sample(rng));
    }

    tracing::debug!(positions = length, states = k_states, "sampled sequence");
    Ok(Sample { states, symbols })
}

fn zero_row(what: &str, row: usize) -> Error {
    Error::InvalidProbability {
        what: format!("{what} (row has no positive weight)"),
        row,
        col: 0,
        value: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

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
    fn test_lengths_and_ranges() {
        let model = coin_model();
        let mut rng = StdRng::seed_from_u64(7);
        let s = sample(&model, 200, &mut rng).unwrap();
        assert_eq!(s.len(), 200);
        assert_eq!(s.symbols.len(), 200);
        assert!(s.states.iter().all(|&k| k < 2));
        assert!(s.symbols.iter().all(|&m| m < 2));
        assert_eq!(s.state_names(&model).len(), 200);
    }

    #[test]
    fn test_same_seed_same_sample() {
        let model = coin_model();
        let a = sample(&model, 50, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = sample(&model, 50, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_deterministic_model() {
        let model = Model::new(
            ["a", "b"],
            vec![1.0, 0.0],
            vec![vec![0.0, 1.0], vec![1.0, 0.0]],
            ["x", "y"],
            vec![vec![1.0, 0.0], vec![0.0, 1.0]],
        )
        .unwrap();
        let s = sample(&model, 5, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(s.states, vec![0, 1, 0, 1, 0]);
        assert_eq!(s.symbol_names(&model), vec!["x", "y", "x", "y", "x"]);
    }

    #[test]
    fn test_unreached_zero_row_is_fine() {
        let model = Model::new(
            ["a", "b"],
            vec![1.0, 0.0],
            vec![vec![1.0, 0.0], vec![0.0, 0.0]],
            ["x"],
            vec![vec![1.0], vec![1.0]],
        )
        .unwrap();
        let s = sample(&model, 4, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(s.states, vec![0; 4]);
    }

    #[test]
    fn test_reached_zero_row_errors() {
        let model = Model::new(
            ["a", "b"],
            vec![1.0, 0.0],
            vec![vec![0.0, 1.0], vec![0.0, 0.0]],
            ["x"],
            vec![vec![1.0], vec![1.0]],
        )
        .unwrap();
        let err = sample(&model, 3, &mut StdRng::seed_from_u64(3)).unwrap_err();
        assert!(matches!(err, Error::InvalidProbability { row: 1, .. }));
    }

    #[test]
    fn test_zero_length_is_error() {
        let err = sample(&coin_model(), 0, &mut StdRng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(err, Error::EmptySequence));
    }
}
