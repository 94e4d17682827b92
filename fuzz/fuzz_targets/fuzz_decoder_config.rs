//! Fuzz target for decoder.json parsing and validation.

#![no_main]

use hs_config::DecoderConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = DecoderConfig::from_json_str(text);
    }
});
