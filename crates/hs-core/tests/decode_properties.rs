//! Property-based tests for the decoding engines.
//!
//! Random small models are checked against exhaustive enumeration of every
//! hidden path, so the DP recurrences are verified independently of any
//! hand-computed table.

use hs_core::{
    backward, decode, expand_segments, extract_segments, forward, log_likelihood,
    path_log_probability, posterior_labels, posterior_probabilities, sequence_log_probability,
    viterbi, DecodeMethod, Model,
};
use hs_math::{argmax_first, log_sum_exp};
use proptest::prelude::*;

const TOL: f64 = 1e-9;

fn normalize(row: Vec<f64>) -> Vec<f64> {
    let total: f64 = row.iter().sum();
    row.into_iter().map(|w| w / total).collect()
}

/// A model with `K ≤ 3` states, `M ≤ 3` symbols and a sequence of `N ≤ 6`
/// symbol names. All weights are strictly positive.
fn model_and_sequence() -> impl Strategy<Value = (Model, Vec<String>)> {
    (1usize..=3, 1usize..=3).prop_flat_map(|(k, m)| {
        let weight = 0.05f64..1.0;
        (
            prop::collection::vec(weight.clone(), k),
            prop::collection::vec(prop::collection::vec(weight.clone(), k), k),
            prop::collection::vec(prop::collection::vec(weight, m), k),
            prop::collection::vec(0..m, 1..=6),
        )
            .prop_map(move |(init, trans, emit, seq)| {
                let states: Vec<String> = (0..k).map(|i| format!("s{i}")).collect();
                let alphabet: Vec<String> = (0..m).map(|i| format!("x{i}")).collect();
                let sequence = seq.iter().map(|&i| alphabet[i].clone()).collect();
                let model = Model::new(
                    states,
                    normalize(init),
                    trans.into_iter().map(normalize).collect(),
                    alphabet,
                    emit,
                )
                .unwrap();
                (model, sequence)
            })
    })
}

/// Every path of length `n` over `k` states.
fn all_paths(k: usize, n: usize) -> Vec<Vec<usize>> {
    let mut paths = vec![Vec::new()];
    for _ in 0..n {
        paths = paths
            .into_iter()
            .flat_map(|p| {
                (0..k).map(move |s| {
                    let mut next = p.clone();
                    next.push(s);
                    next
                })
            })
            .collect();
    }
    paths
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Viterbi reaches the best score over all enumerated paths.
    #[test]
    fn viterbi_matches_brute_force((model, seq) in model_and_sequence()) {
        let best = viterbi(&model, &seq).unwrap();
        let brute = all_paths(model.num_states(), seq.len())
            .iter()
            .map(|p| path_log_probability(&model, &seq, p).unwrap())
            .fold(f64::NEG_INFINITY, f64::max);

        prop_assert!((best.log_probability - brute).abs() < TOL,
            "viterbi {} != brute force {}", best.log_probability, brute);
        let own = path_log_probability(&model, &seq, &best.states).unwrap();
        prop_assert!((own - best.log_probability).abs() < TOL);
    }

    /// Forward total equals the sum over all enumerated paths.
    #[test]
    fn forward_matches_brute_force((model, seq) in model_and_sequence()) {
        let scores: Vec<f64> = all_paths(model.num_states(), seq.len())
            .iter()
            .map(|p| path_log_probability(&model, &seq, p).unwrap())
            .collect();
        let total = log_likelihood(&model, &seq).unwrap();
        prop_assert!((total - log_sum_exp(&scores)).abs() < TOL);
    }

    /// `log_sum_exp_k(F[i][k] + B[i][k])` is the same at every position.
    #[test]
    fn total_probability_is_position_independent((model, seq) in model_and_sequence()) {
        let f = forward(&model, &seq).unwrap();
        let b = backward(&model, &seq).unwrap();
        let total = sequence_log_probability(&f);
        for i in 0..f.rows() {
            let joint: Vec<f64> = f.row(i).iter().zip(b.row(i)).map(|(x, y)| x + y).collect();
            let at_i = log_sum_exp(&joint);
            prop_assert!((at_i - total).abs() < 1e-6, "position {}: {} vs {}", i, at_i, total);
        }
    }

    /// Posterior labels are the argmax of the normalized posteriors.
    #[test]
    fn posterior_labels_follow_probabilities((model, seq) in model_and_sequence()) {
        let f = forward(&model, &seq).unwrap();
        let b = backward(&model, &seq).unwrap();
        let labels = posterior_labels(&model, &f, &b).unwrap();
        let post = posterior_probabilities(&f, &b).unwrap();
        prop_assert_eq!(labels.len(), seq.len());
        for (i, row) in post.iter_rows().enumerate() {
            let total: f64 = row.iter().map(|v| v.exp()).sum();
            prop_assert!((total - 1.0).abs() < 1e-9);
            let best = row.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!((row[labels[i]] - best).abs() < 1e-12);
        }
    }

    /// Segments tile `1..=N`, never repeat a state across a boundary and
    /// expand back to the per-position labels.
    #[test]
    fn segments_cover_sequence(
        (model, seq) in model_and_sequence(),
        posterior in any::<bool>(),
    ) {
        let method = if posterior { DecodeMethod::Posterior } else { DecodeMethod::Viterbi };
        let report = decode(&model, &seq, method).unwrap();
        let segments = &report.segments;

        prop_assert_eq!(segments[0].start, 1);
        prop_assert_eq!(segments.last().unwrap().end, seq.len());
        for pair in segments.windows(2) {
            prop_assert_eq!(pair[1].start, pair[0].end + 1);
            prop_assert_ne!(&pair[0].state, &pair[1].state);
        }
        for seg in segments {
            prop_assert!(seg.start <= seg.end);
        }

        let labels = expand_segments(segments);
        prop_assert_eq!(labels.len(), seq.len());
        prop_assert_eq!(&extract_segments(&labels).unwrap(), segments);
    }

    /// With one symbol both decoders pick `argmax_k initial[k] * e_k(x)`.
    #[test]
    fn single_symbol_uses_initial_and_emission((model, seq) in model_and_sequence()) {
        let one = &seq[..1];
        let x = model.encode(one).unwrap()[0];
        let scores: Vec<f64> = (0..model.num_states())
            .map(|k| model.log_initial(k) + model.log_emission(k, x))
            .collect();
        let expected = model.state_name(argmax_first(&scores).unwrap());

        for method in [DecodeMethod::Viterbi, DecodeMethod::Posterior] {
            let report = decode(&model, one, method).unwrap();
            prop_assert_eq!(report.segments.len(), 1);
            prop_assert_eq!(report.segments[0].state.as_str(), expected);
        }
    }

    /// Arbitrary label sequences survive extract → expand.
    #[test]
    fn extract_expand_round_trip(labels in prop::collection::vec(0u8..4, 1..200)) {
        let segments = extract_segments(&labels).unwrap();
        prop_assert!(segments.len() <= labels.len());
        prop_assert_eq!(expand_segments(&segments), labels);
    }
}
