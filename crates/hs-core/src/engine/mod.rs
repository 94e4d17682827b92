//! Dynamic-programming engines over an observed symbol sequence.
//!
//! Every engine works in log-space and owns the `N×K` matrix it allocates;
//! nothing is shared between calls. Positions are processed strictly in
//! order (Forward and Viterbi left to right, Backward right to left).
//!
//! - [`forward`]: `F[i][k]`, log joint probability of `x[0..=i]` ending in `k`
//! - [`backward`]: `B[i][k]`, log probability of `x[i+1..]` given `k` at `i`
//! - [`viterbi`]: best single path plus its log probability
//! - [`posterior`]: per-position labels from `F + B`

pub mod backward;
pub mod forward;
pub mod posterior;
pub mod viterbi;

pub use backward::backward;
pub use forward::{forward, log_likelihood, sequence_log_probability};
pub use posterior::{posterior_labels, posterior_probabilities};
pub use viterbi::{path_log_probability, viterbi, ViterbiPath};

use std::ops::Index;

/// Dense row-major `rows × cols` table of log-probabilities.
///
/// Row `i` is sequence position `i` (0-indexed), column `k` is state `k`.
#[derive(Debug, Clone, PartialEq)]
pub struct LogMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl LogMatrix {
    pub(crate) fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Number of positions `N`.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of states `K`.
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, i: usize, k: usize) -> f64 {
        self.data[i * self.cols + k]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub(crate) fn row_mut(&mut self, i: usize) -> &mut [f64] {
        &mut self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Row `i - 1` for reading alongside row `i` for writing.
    pub(crate) fn prev_and_row_mut(&mut self, i: usize) -> (&[f64], &mut [f64]) {
        let cols = self.cols;
        let (head, tail) = self.data.split_at_mut(i * cols);
        (&head[(i - 1) * cols..], &mut tail[..cols])
    }

    /// Row `i` for writing alongside row `i + 1` for reading.
    pub(crate) fn row_mut_and_next(&mut self, i: usize) -> (&mut [f64], &[f64]) {
        let cols = self.cols;
        let (head, tail) = self.data.split_at_mut((i + 1) * cols);
        (&mut head[i * cols..], &tail[..cols])
    }

    /// Iterate over rows in position order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.cols.max(1)).take(self.rows)
    }
}

impl Index<(usize, usize)> for LogMatrix {
    type Output = f64;

    fn index(&self, (i, k): (usize, usize)) -> &f64 {
        &self.data[i * self.cols + k]
    }
}
