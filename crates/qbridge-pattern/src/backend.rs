//! Simulation modes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PatternError;

/// Simulation mode a target circuit is executed under.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Statevector,
    TensorNetwork,
    DensityMatrix,
    Mps,
}

impl Backend {
    pub const ALL: [Backend; 4] = [
        Backend::Statevector,
        Backend::TensorNetwork,
        Backend::DensityMatrix,
        Backend::Mps,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Backend::Statevector => "statevector",
            Backend::TensorNetwork => "tensornetwork",
            Backend::DensityMatrix => "densitymatrix",
            Backend::Mps => "mps",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Backend::ALL
            .into_iter()
            .find(|b| b.name() == lower)
            .ok_or_else(|| PatternError::UnknownBackend(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("statevector".parse::<Backend>().unwrap(), Backend::Statevector);
        assert_eq!("MPS".parse::<Backend>().unwrap(), Backend::Mps);
        assert!(matches!(
            "gpu".parse::<Backend>(),
            Err(PatternError::UnknownBackend(_))
        ));
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Backend::TensorNetwork).unwrap();
        assert_eq!(json, "\"tensornetwork\"");
        let back: Backend = serde_json::from_str("\"densitymatrix\"").unwrap();
        assert_eq!(back, Backend::DensityMatrix);
    }
}
