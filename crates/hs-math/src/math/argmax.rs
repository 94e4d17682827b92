//! Deterministic argmax over log-scores.
//!
//! Ties resolve to the lowest index: a later candidate replaces the current
//! winner only under a strict `>` comparison.

/// Index and value of the first maximal element, or `None` for empty input.
///
/// NaN entries never displace an earlier winner.
pub fn max_first(values: &[f64]) -> Option<(usize, f64)> {
    let (first, rest) = values.split_first()?;
    let mut best_idx = 0;
    let mut best = *first;
    for (offset, v) in rest.iter().enumerate() {
        if *v > best {
            best = *v;
            best_idx = offset + 1;
        }
    }
    Some((best_idx, best))
}

/// Index of the first maximal element, or `None` for empty input.
pub fn argmax_first(values: &[f64]) -> Option<usize> {
    max_first(values).map(|(idx, _)| idx)
}
