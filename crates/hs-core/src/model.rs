//! Immutable hidden Markov model parameters.
//!
//! A [`Model`] is built once from already-parsed rows and then only read.
//! Construction validates every row against the declared state count `K`
//! and alphabet size `M`, normalizes each emission row by its sum, and
//! precomputes log-space copies of all parameters so the engines never call
//! `ln` in their inner loops. Zero probabilities become `-inf`.
//!
//! Symbol and state lookups go through hash maps built at construction.

use std::collections::HashMap;

use hs_common::{Error, Result};
use hs_math::ln_prob;
use serde::{Deserialize, Serialize};

pub use hs_config::decoder::DEFAULT_ROW_SUM_TOLERANCE;

/// Serializable model parameters, before validation.
///
/// Emission rows may hold un-normalized weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelSpec {
    pub states: Vec<String>,
    pub initial_probs: Vec<f64>,
    pub transitions: Vec<Vec<f64>>,
    pub alphabet: Vec<String>,
    pub emissions: Vec<Vec<f64>>,
}

impl ModelSpec {
    /// Validate into a [`Model`], warning about initial or transition rows
    /// whose sum is further than `row_sum_tolerance` from 1.
    pub fn build(&self, row_sum_tolerance: f64) -> Result<Model> {
        Model::build(self, row_sum_tolerance)
    }
}

/// A validated HMM with `K` states and an alphabet of `M` symbols.
///
/// Matrices are stored row-major in flat buffers: `transitions[k * K + l]`
/// and `emissions[k * M + m]`.
#[derive(Debug, Clone)]
pub struct Model {
    states: Vec<String>,
    alphabet: Vec<String>,
    initial_probs: Vec<f64>,
    transitions: Vec<f64>,
    emissions: Vec<f64>,
    log_initial: Vec<f64>,
    log_transitions: Vec<f64>,
    log_emissions: Vec<f64>,
    state_index: HashMap<String, usize>,
    symbol_index: HashMap<String, usize>,
}

impl Model {
    /// Build a model from parsed rows using the default row-sum tolerance.
    pub fn new<S: Into<String>, A: Into<String>>(
        states: impl IntoIterator<Item = S>,
        initial_probs: Vec<f64>,
        transitions: Vec<Vec<f64>>,
        alphabet: impl IntoIterator<Item = A>,
        emissions: Vec<Vec<f64>>,
    ) -> Result<Self> {
        let spec = ModelSpec {
            states: states.into_iter().map(Into::into).collect(),
            initial_probs,
            transitions,
            alphabet: alphabet.into_iter().map(Into::into).collect(),
            emissions,
        };
        Self::build(&spec, DEFAULT_ROW_SUM_TOLERANCE)
    }

    /// Build a model from a spec using the default row-sum tolerance.
    pub fn from_spec(spec: &ModelSpec) -> Result<Self> {
        Self::build(spec, DEFAULT_ROW_SUM_TOLERANCE)
    }

    fn build(spec: &ModelSpec, row_sum_tolerance: f64) -> Result<Self> {
        let k_states = spec.states.len();
        let m_symbols = spec.alphabet.len();
        if k_states == 0 || m_symbols == 0 {
            return Err(Error::EmptyModel);
        }

        let state_index = index_names("state", &spec.states)?;
        let symbol_index = index_names("symbol", &spec.alphabet)?;

        check_len("initial_probs", k_states, spec.initial_probs.len())?;
        check_len("transitions", k_states, spec.transitions.len())?;
        check_len("emissions", k_states, spec.emissions.len())?;

        check_row("initial_probs", 0, &spec.initial_probs)?;

        let mut transitions = Vec::with_capacity(k_states * k_states);
        for (k, row) in spec.transitions.iter().enumerate() {
            check_len(&format!("transitions row {}", k), k_states, row.len())?;
            check_row("transitions", k, row)?;
            transitions.extend_from_slice(row);
        }

        let mut emissions = Vec::with_capacity(k_states * m_symbols);
        for (k, row) in spec.emissions.iter().enumerate() {
            check_len(&format!("emissions row {}", k), m_symbols, row.len())?;
            check_row("emissions", k, row)?;
            let total: f64 = row.iter().sum();
            if total <= 0.0 {
                return Err(Error::InvalidProbability {
                    what: "emissions row total".to_string(),
                    row: k,
                    col: 0,
                    value: total,
                });
            }
            if total.is_finite() {
                emissions.extend(row.iter().map(|w| w / total));
            } else {
                // Finite weights whose sum overflows: scale by the largest first.
                let peak = row.iter().copied().fold(0.0_f64, f64::max);
                let scaled: f64 = row.iter().map(|w| w / peak).sum();
                emissions.extend(row.iter().map(|w| (w / peak) / scaled));
            }
        }

        let model = Model {
            log_initial: spec.initial_probs.iter().map(|p| ln_prob(*p)).collect(),
            log_transitions: transitions.iter().map(|p| ln_prob(*p)).collect(),
            log_emissions: emissions.iter().map(|p| ln_prob(*p)).collect(),
            states: spec.states.clone(),
            alphabet: spec.alphabet.clone(),
            initial_probs: spec.initial_probs.clone(),
            transitions,
            emissions,
            state_index,
            symbol_index,
        };
        model.warn_unnormalized_rows(row_sum_tolerance);

        tracing::debug!(
            states = k_states,
            symbols = m_symbols,
            "model constructed"
        );
        Ok(model)
    }

    /// Rows that are accepted as given but do not sum to 1.
    fn warn_unnormalized_rows(&self, tolerance: f64) {
        let initial_sum: f64 = self.initial_probs.iter().sum();
        if (initial_sum - 1.0).abs() > tolerance {
            tracing::warn!(sum = initial_sum, "initial probabilities do not sum to 1");
        }
        for k in 0..self.num_states() {
            let sum: f64 = self.transition_row(k).iter().sum();
            if (sum - 1.0).abs() > tolerance {
                tracing::warn!(
                    state = %self.states[k],
                    sum,
                    "transition row does not sum to 1"
                );
            }
        }
    }

    /// Number of hidden states `K`.
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// Alphabet size `M`.
    pub fn num_symbols(&self) -> usize {
        self.alphabet.len()
    }

    pub fn states(&self) -> &[String] {
        &self.states
    }

    pub fn alphabet(&self) -> &[String] {
        &self.alphabet
    }

    /// Name of state `k`. Panics if `k >= K`.
    pub fn state_name(&self, k: usize) -> &str {
        &self.states[k]
    }

    /// Constant-time state name → index lookup.
    pub fn state_index(&self, name: &str) -> Option<usize> {
        self.state_index.get(name).copied()
    }

    /// Constant-time symbol → index lookup.
    pub fn symbol_index(&self, symbol: &str) -> Option<usize> {
        self.symbol_index.get(symbol).copied()
    }

    pub fn initial_probs(&self) -> &[f64] {
        &self.initial_probs
    }

    /// Outgoing transition probabilities of state `k`.
    pub fn transition_row(&self, k: usize) -> &[f64] {
        let n = self.num_states();
        &self.transitions[k * n..(k + 1) * n]
    }

    /// Normalized emission probabilities of state `k`.
    pub fn emission_row(&self, k: usize) -> &[f64] {
        let m = self.num_symbols();
        &self.emissions[k * m..(k + 1) * m]
    }

    #[inline]
    pub fn log_initial(&self, k: usize) -> f64 {
        self.log_initial[k]
    }

    #[inline]
    pub fn log_transition(&self, from: usize, to: usize) -> f64 {
        self.log_transitions[from * self.num_states() + to]
    }

    #[inline]
    pub fn log_emission(&self, state: usize, symbol: usize) -> f64 {
        self.log_emissions[state * self.num_symbols() + symbol]
    }

    /// Map a symbol sequence to alphabet indices.
    ///
    /// Fails on the first symbol outside the alphabet; the reported position
    /// is 1-indexed, matching segment coordinates.
    pub fn encode<S: AsRef<str>>(&self, sequence: &[S]) -> Result<Vec<usize>> {
        sequence
            .iter()
            .enumerate()
            .map(|(i, sym)| {
                let sym = sym.as_ref();
                self.symbol_index(sym).ok_or_else(|| Error::UnknownSymbol {
                    position: i + 1,
                    symbol: sym.to_string(),
                })
            })
            .collect()
    }

    /// Map a string to alphabet indices, one symbol per character.
    pub fn encode_chars(&self, text: &str) -> Result<Vec<usize>> {
        let mut buf = [0u8; 4];
        text.chars()
            .enumerate()
            .map(|(i, c)| {
                let sym: &str = c.encode_utf8(&mut buf);
                self.symbol_index(sym).ok_or_else(|| Error::UnknownSymbol {
                    position: i + 1,
                    symbol: c.to_string(),
                })
            })
            .collect()
    }

    /// Recover the spec this model was built from, with emission rows
    /// normalized.
    pub fn to_spec(&self) -> ModelSpec {
        ModelSpec {
            states: self.states.clone(),
            initial_probs: self.initial_probs.clone(),
            transitions: (0..self.num_states())
                .map(|k| self.transition_row(k).to_vec())
                .collect(),
            alphabet: self.alphabet.clone(),
            emissions: (0..self.num_states())
                .map(|k| self.emission_row(k).to_vec())
                .collect(),
        }
    }
}

fn index_names(what: &str, names: &[String]) -> Result<HashMap<String, usize>> {
    let mut index = HashMap::with_capacity(names.len());
    for (i, name) in names.iter().enumerate() {
        if index.insert(name.clone(), i).is_some() {
            return Err(Error::DuplicateIdentifier {
                what: what.to_string(),
                name: name.clone(),
            });
        }
    }
    Ok(index)
}

fn check_len(what: &str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(Error::DimensionMismatch {
            what: what.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

fn check_row(what: &str, row: usize, values: &[f64]) -> Result<()> {
    for (col, value) in values.iter().enumerate() {
        if !value.is_finite() || *value < 0.0 {
            return Err(Error::InvalidProbability {
                what: what.to_string(),
                row,
                col,
                value: *value,
            });
        }
    }
    Ok(())
}
