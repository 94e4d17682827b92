//! hmmseg common types and errors.
//!
//! This crate provides the types shared between the decoding engine and
//! its configuration and CLI layers:
//! - The unified error type with stable codes
//! - Segment records produced by decoding
//! - Decode method selection
//! - Output format specifications

pub mod error;
pub mod method;
pub mod output;
pub mod segment;

pub use error::{format_error_human, Error, ErrorCategory, Result, StructuredError};
pub use method::DecodeMethod;
pub use output::OutputFormat;
pub use segment::Segment;

/// Schema version stamped on serialized decode reports.
pub const SCHEMA_VERSION: &str = "1.0.0";
