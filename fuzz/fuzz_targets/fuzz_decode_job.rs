//! Fuzz target for decode job files.
//!
//! Arbitrary bytes are parsed as a job and, when they parse, decoded with
//! default settings. Every failure must surface as an `Error`, never a panic.

#![no_main]

use hs_config::DecoderConfig;
use hs_core::DecodeJob;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(job) = serde_json::from_slice::<DecodeJob>(data) else {
        return;
    };
    // Bound the DP tables so the fuzzer spends time on parsing paths.
    let config = DecoderConfig {
        max_sequence_len: Some(4096),
        ..DecoderConfig::default()
    };
    let _ = job.run(&config, None);
});
