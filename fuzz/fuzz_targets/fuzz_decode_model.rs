//! Fuzz target for the decoding engines.
//!
//! Builds small models from arbitrary weights (zeros included) and checks
//! that both decoders return segments tiling the whole sequence.

#![no_main]

use arbitrary::Arbitrary;
use hs_common::DecodeMethod;
use hs_core::{decode, Model};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    k: u8,
    m: u8,
    weights: Vec<u8>,
    sequence: Vec<u8>,
}

fn take_row(weights: &mut impl Iterator<Item = u8>, len: usize) -> Vec<f64> {
    (0..len)
        .map(|_| f64::from(weights.next().unwrap_or(1)))
        .collect()
}

fn normalized(row: Vec<f64>) -> Vec<f64> {
    let total: f64 = row.iter().sum();
    if total > 0.0 {
        row.into_iter().map(|w| w / total).collect()
    } else {
        row
    }
}

fuzz_target!(|input: Input| {
    let k = usize::from(input.k % 4) + 1;
    let m = usize::from(input.m % 4) + 1;
    if input.sequence.is_empty() || input.sequence.len() > 256 {
        return;
    }

    let mut weights = input.weights.into_iter();
    let initial = normalized(take_row(&mut weights, k));
    let transitions = (0..k)
        .map(|_| normalized(take_row(&mut weights, k)))
        .collect();
    let emissions = (0..k).map(|_| take_row(&mut weights, m)).collect();
    let states: Vec<String> = (0..k).map(|i| format!("s{i}")).collect();
    let alphabet: Vec<String> = (0..m).map(|i| format!("x{i}")).collect();

    let Ok(model) = Model::new(states, initial, transitions, alphabet.clone(), emissions) else {
        return;
    };
    let sequence: Vec<&str> = input
        .sequence
        .iter()
        .map(|&b| alphabet[usize::from(b) % m].as_str())
        .collect();

    for method in [DecodeMethod::Viterbi, DecodeMethod::Posterior] {
        let report = decode(&model, &sequence, method).expect("valid input must decode");
        assert_eq!(report.segments.first().map(|s| s.start), Some(1));
        assert_eq!(report.segments.last().map(|s| s.end), Some(sequence.len()));
        for pair in report.segments.windows(2) {
            assert_eq!(pair[1].start, pair[0].end + 1);
            assert_ne!(pair[0].state, pair[1].state);
        }
    }
});
