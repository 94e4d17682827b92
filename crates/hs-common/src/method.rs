//! Decoding method selection.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How per-position state labels are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeMethod {
    /// Single most probable hidden-state path.
    #[default]
    Viterbi,
    /// Per-position most probable state from forward/backward marginals.
    Posterior,
}

impl std::fmt::Display for DecodeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeMethod::Viterbi => write!(f, "viterbi"),
            DecodeMethod::Posterior => write!(f, "posterior"),
        }
    }
}

impl std::str::FromStr for DecodeMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "viterbi" | "path" => Ok(DecodeMethod::Viterbi),
            "posterior" | "marginal" => Ok(DecodeMethod::Posterior),
            _ => Err(format!("unknown decode method: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_aliases() {
        assert_eq!("viterbi".parse::<DecodeMethod>().unwrap(), DecodeMethod::Viterbi);
        assert_eq!("Posterior".parse::<DecodeMethod>().unwrap(), DecodeMethod::Posterior);
        assert_eq!("marginal".parse::<DecodeMethod>().unwrap(), DecodeMethod::Posterior);
        assert!("baum-welch".parse::<DecodeMethod>().is_err());
    }

    #[test]
    fn default_is_viterbi() {
        assert_eq!(DecodeMethod::default(), DecodeMethod::Viterbi);
        assert_eq!(DecodeMethod::default().to_string(), "viterbi");
    }
}
