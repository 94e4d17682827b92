//! Decoded state segments.

use serde::{Deserialize, Serialize};

/// A maximal run of positions assigned the same hidden state.
///
/// Bounds are 1-indexed and inclusive: a segment covering only the first
/// position is `{ start: 1, end: 1 }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment<S = String> {
    /// First position of the run (1-indexed, inclusive).
    pub start: usize,
    /// Last position of the run (1-indexed, inclusive).
    pub end: usize,
    /// State label shared by every position in the run.
    pub state: S,
}

impl<S> Segment<S> {
    pub fn new(start: usize, end: usize, state: S) -> Self {
        Self { start, end, state }
    }

    /// Number of positions covered.
    pub fn len(&self) -> usize {
        self.end + 1 - self.start
    }

    /// Segments always cover at least one position.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Relabel the segment, keeping its bounds.
    pub fn map_state<T>(self, f: impl FnOnce(S) -> T) -> Segment<T> {
        Segment {
            start: self.start,
            end: self.end,
            state: f(self.state),
        }
    }
}

impl<S: std::fmt::Display> std::fmt::Display for Segment<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{} {}", self.start, self.end, self.state)
    }
}
