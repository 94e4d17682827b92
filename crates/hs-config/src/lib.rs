//! hmmseg configuration loading and validation.
//!
//! This crate provides:
//! - The typed `DecoderConfig` stored in `decoder.json`
//! - Config resolution (CLI → env → XDG → defaults)
//! - Semantic validation

pub mod decoder;
pub mod resolve;
pub mod validate;

pub use decoder::{load_config, DecoderConfig, LoadedConfig};
pub use resolve::{resolve_config, ConfigSource};
pub use validate::{validate_decoder_config, ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
