//! Diversity Factors
//!
//! Multipliers (≤ 1.0) applied to the connected charging load to estimate
//! simultaneous demand for typical site types.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Site scenario used to pick a diversity factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiversityScenario {
    /// No diversity applied: 1.0
    None,
    /// Single dwelling with one or two chargers: 1.0
    SingleDwelling,
    /// Block of flats / multiple dwellings: 0.8
    MultiDwelling,
    /// Fleet depot, vehicles charge together overnight: 0.9
    FleetDepot,
    /// Workplace car park: 0.7
    Workplace,
    /// Public destination (retail, leisure): 0.6
    PublicDestination,
    /// Dynamic load management installed: 0.5
    LoadManaged,
}

static BY_KEY: Lazy<HashMap<&'static str, DiversityScenario>> =
    Lazy::new(|| DiversityScenario::ALL.iter().map(|d| (d.key(), *d)).collect());

impl DiversityScenario {
    /// All scenarios for UI selection
    pub const ALL: [DiversityScenario; 7] = [
        DiversityScenario::None,
        DiversityScenario::SingleDwelling,
        DiversityScenario::MultiDwelling,
        DiversityScenario::FleetDepot,
        DiversityScenario::Workplace,
        DiversityScenario::PublicDestination,
        DiversityScenario::LoadManaged,
    ];

    /// Look up a scenario by its selector key.
    pub fn from_key(key: &str) -> Option<Self> {
        BY_KEY.get(key).copied()
    }

    /// Selector key (e.g. "multi-dwelling")
    pub fn key(&self) -> &'static str {
        match self {
            DiversityScenario::None => "none",
            DiversityScenario::SingleDwelling => "single-dwelling",
            DiversityScenario::MultiDwelling => "multi-dwelling",
            DiversityScenario::FleetDepot => "fleet-depot",
            DiversityScenario::Workplace => "workplace",
            DiversityScenario::PublicDestination => "public-destination",
            DiversityScenario::LoadManaged => "load-managed",
        }
    }

    /// Diversity multiplier in (0, 1]
    pub fn factor(&self) -> f64 {
        match self {
            DiversityScenario::None => 1.0,
            DiversityScenario::SingleDwelling => 1.0,
            DiversityScenario::MultiDwelling => 0.8,
            DiversityScenario::FleetDepot => 0.9,
            DiversityScenario::Workplace => 0.7,
            DiversityScenario::PublicDestination => 0.6,
            DiversityScenario::LoadManaged => 0.5,
        }
    }

    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            DiversityScenario::None => "No diversity (1.00)",
            DiversityScenario::SingleDwelling => "Single dwelling (1.00)",
            DiversityScenario::MultiDwelling => "Multiple dwellings (0.80)",
            DiversityScenario::FleetDepot => "Fleet depot (0.90)",
            DiversityScenario::Workplace => "Workplace (0.70)",
            DiversityScenario::PublicDestination => "Public destination (0.60)",
            DiversityScenario::LoadManaged => "Load managed (0.50)",
        }
    }
}

impl std::fmt::Display for DiversityScenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
