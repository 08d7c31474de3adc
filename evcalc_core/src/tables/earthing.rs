//! Earthing Systems
//!
//! The three supply earthing arrangements found on UK installations. Only
//! TN-C-S (PME) carries the PEN-conductor fault risk that BS 7671
//! Regulation 722.411.4.1 addresses for outdoor EV charging points.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Supply earthing arrangement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EarthingSystem {
    /// Separate neutral and protective conductors throughout
    #[serde(rename = "tn-s")]
    TnS,
    /// Combined neutral and earth in the supply (PME)
    #[default]
    #[serde(rename = "tn-c-s")]
    TnCS,
    /// Installation earthed by its own electrode
    #[serde(rename = "tt")]
    Tt,
}

static BY_KEY: Lazy<HashMap<&'static str, EarthingSystem>> =
    Lazy::new(|| EarthingSystem::ALL.iter().map(|e| (e.key(), *e)).collect());

impl EarthingSystem {
    /// All earthing systems for UI selection
    pub const ALL: [EarthingSystem; 3] = [EarthingSystem::TnS, EarthingSystem::TnCS, EarthingSystem::Tt];

    /// Look up an earthing system by its selector key, ignoring case
    /// ("TN-C-S" and "tn-c-s" both match).
    pub fn from_key(key: &str) -> Option<Self> {
        BY_KEY.get(key.trim().to_ascii_lowercase().as_str()).copied()
    }

    /// Selector key (e.g. "tn-c-s")
    pub fn key(&self) -> &'static str {
        match self {
            EarthingSystem::TnS => "tn-s",
            EarthingSystem::TnCS => "tn-c-s",
            EarthingSystem::Tt => "tt",
        }
    }

    /// True when the supply uses Protective Multiple Earthing
    pub fn is_pme(&self) -> bool {
        matches!(self, EarthingSystem::TnCS)
    }

    /// Short description for UI
    pub fn description(&self) -> &'static str {
        match self {
            EarthingSystem::TnS => "TN-S - separate neutral and earth (cable sheath)",
            EarthingSystem::TnCS => "TN-C-S (PME) - combined neutral and earth in the supply",
            EarthingSystem::Tt => "TT - installation earth electrode",
        }
    }
}

impl std::fmt::Display for EarthingSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_tncs_is_pme() {
        assert!(EarthingSystem::TnCS.is_pme());
        assert!(!EarthingSystem::TnS.is_pme());
        assert!(!EarthingSystem::Tt.is_pme());
    }

    #[test]
    fn test_from_key() {
        assert_eq!(EarthingSystem::from_key("tt"), Some(EarthingSystem::Tt));
        assert_eq!(EarthingSystem::from_key("TN-C-S"), Some(EarthingSystem::TnCS));
        assert_eq!(EarthingSystem::from_key(" TN-S "), Some(EarthingSystem::TnS));
        assert_eq!(EarthingSystem::from_key("it"), None);
        assert_eq!(EarthingSystem::from_key(""), None);
    }
}
