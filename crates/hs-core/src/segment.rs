//! Run-length encoding of per-position state labels into segments.

use std::collections::BTreeMap;

use hs_common::{Error, Result, Segment};

/// Compress a label sequence into maximal same-state runs.
///
/// Segments use 1-indexed inclusive bounds, are ordered by `start`, tile
/// `1..=N` exactly, and no two neighbours share a state. A constant sequence
/// yields one segment; a fully alternating one yields `N`.
pub fn extract_segments<L: Clone + PartialEq>(labels: &[L]) -> Result<Vec<Segment<L>>> {
    let Some((first, rest)) = labels.split_first() else {
        return Err(Error::EmptySequence);
    };

    let mut segments = Vec::new();
    let mut current = first;
    let mut start = 1;
    for (offset, label) in rest.iter().enumerate() {
        // `offset + 1` is the 0-indexed position of `label`, so the run that
        // just closed ends at 1-indexed position `offset + 1`.
        if label != current {
            segments.push(Segment::new(start, offset + 1, current.clone()));
            start = offset + 2;
            current = label;
        }
    }
    segments.push(Segment::new(start, labels.len(), current.clone()));
    Ok(segments)
}

/// Expand segments back into one label per position.
pub fn expand_segments<L: Clone>(segments: &[Segment<L>]) -> Vec<L> {
    let total = segments.last().map_or(0, |s| s.end);
    let mut labels = Vec::with_capacity(total);
    for seg in segments {
        labels.extend(std::iter::repeat(seg.state.clone()).take(seg.len()));
    }
    labels
}

/// Number of segments labelled with each state.
///
/// States that never appear are absent rather than zero.
pub fn count_segments<L: Clone + Ord>(segments: &[Segment<L>]) -> BTreeMap<L, usize> {
    let mut counts = BTreeMap::new();
    for seg in segments {
        *counts.entry(seg.state.clone()).or_insert(0) += 1;
    }
    counts
}

/// Mean segment length per state, over states that occur.
pub fn mean_segment_lengths<L: Clone + Ord>(segments: &[Segment<L>]) -> BTreeMap<L, f64> {
    let mut totals: BTreeMap<L, (usize, usize)> = BTreeMap::new();
    for seg in segments {
        let entry = totals.entry(seg.state.clone()).or_insert((0, 0));
        entry.0 += seg.len();
        entry.1 += 1;
    }
    totals
        .into_iter()
        .map(|(state, (positions, count))| (state, positions as f64 / count as f64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_labels_give_one_segment() {
        let segs = extract_segments(&["F"; 10]).unwrap();
        assert_eq!(segs, vec![Segment::new(1, 10, "F")]);
    }

    #[test]
    fn test_alternating_labels_give_unit_segments() {
        let labels = [0, 1, 0, 1, 0];
        let segs = extract_segments(&labels).unwrap();
        assert_eq!(segs.len(), 5);
        for (i, seg) in segs.iter().enumerate() {
            assert_eq!(seg.start, i + 1);
            assert_eq!(seg.end, i + 1);
            assert_eq!(seg.state, labels[i]);
        }
    }

    #[test]
    fn test_change_at_first_position() {
        let segs = extract_segments(&["a", "b", "b", "b"]).unwrap();
        assert_eq!(
            segs,
            vec![Segment::new(1, 1, "a"), Segment::new(2, 4, "b")]
        );
    }

    #[test]
    fn test_change_at_last_position() {
        let segs = extract_segments(&["a", "a", "a", "b"]).unwrap();
        assert_eq!(
            segs,
            vec![Segment::new(1, 3, "a"), Segment::new(4, 4, "b")]
        );
    }

    #[test]
    fn test_single_label() {
        assert_eq!(
            extract_segments(&[7u8]).unwrap(),
            vec![Segment::new(1, 1, 7u8)]
        );
    }

    #[test]
    fn test_empty_is_error() {
        let empty: [usize; 0] = [];
        assert!(matches!(extract_segments(&empty), Err(Error::EmptySequence)));
    }

    #[test]
    fn test_count_segments() {
        let segs = extract_segments(&["L", "L", "F", "L", "F", "F", "L"]).unwrap();
        let counts = count_segments(&segs);
        assert_eq!(counts.get("L"), Some(&3));
        assert_eq!(counts.get("F"), Some(&2));
        assert_eq!(counts.len(), 2);
        assert_eq!(counts.values().sum::<usize>(), segs.len());
    }

    #[test]
    fn test_mean_segment_lengths() {
        let segs = extract_segments(&["L", "L", "F", "L", "F", "F", "L"]).unwrap();
        let means = mean_segment_lengths(&segs);
        assert!((means["L"] - 4.0 / 3.0).abs() < 1e-12);
        assert_eq!(means["F"], 1.5);
        assert_eq!(means.len(), 2);
    }

    #[test]
    fn test_expand_round_trip() {
        let labels = vec![1, 1, 0, 0, 0, 2, 1, 1];
        let segs = extract_segments(&labels).unwrap();
        assert_eq!(expand_segments(&segs), labels);
    }
}
