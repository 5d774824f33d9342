//! Disease Registry

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Condition covered by a trained risk model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Disease {
    Diabetes,
    HeartDisease,
    Parkinsons,
}

impl Disease {
    /// All supported diseases
    pub const ALL: [Disease; 3] = [
        Disease::Diabetes,
        Disease::HeartDisease,
        Disease::Parkinsons,
    ];

    /// Wire name used in routes and configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            Disease::Diabetes => "diabetes",
            Disease::HeartDisease => "heart-disease",
            Disease::Parkinsons => "parkinsons",
        }
    }

    /// Human-readable display name
    pub fn title(&self) -> &'static str {
        match self {
            Disease::Diabetes => "Diabetes",
            Disease::HeartDisease => "Heart Disease",
            Disease::Parkinsons => "Parkinson's Disease",
        }
    }
}

impl fmt::Display for Disease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Disease {
    type Err = UnknownDisease;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "diabetes" => Ok(Disease::Diabetes),
            "heart-disease" => Ok(Disease::HeartDisease),
            "parkinsons" => Ok(Disease::Parkinsons),
            other => Err(UnknownDisease(other.to_string())),
        }
    }
}

/// Parse error for unrecognized disease names
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown disease: {0}")]
pub struct UnknownDisease(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_name_round_trip() {
        for disease in Disease::ALL {
            assert_eq!(disease.as_str().parse::<Disease>().unwrap(), disease);
        }
    }

    #[test]
    fn test_unknown_disease() {
        assert!("gout".parse::<Disease>().is_err());
    }
}
